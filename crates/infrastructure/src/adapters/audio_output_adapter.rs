//! Headless audio output
//!
//! Tracks which slots are sounding without driving a device. Hosts with a real
//! audio sink implement `AudioOutputPort` themselves and report natural
//! completion through `PlaybackController::on_ended`, passing back the ticket
//! the slot was started with.

use std::collections::BTreeMap;

use application::{
    error::ApplicationError,
    ports::{AudioOutputPort, PlaybackTicket, SlotIndex},
};
use domain::{AudioFormat, SynthesizedAudio};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Audio output that only records active slots
#[derive(Debug, Default)]
pub struct HeadlessAudioOutput {
    active: Mutex<BTreeMap<SlotIndex, (PlaybackTicket, AudioFormat)>>,
}

impl HeadlessAudioOutput {
    /// Create an output with nothing playing
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots currently started, in ascending order
    pub fn active_slots(&self) -> Vec<SlotIndex> {
        self.active.lock().keys().copied().collect()
    }

    /// Ticket of the playback running in `slot`
    pub fn ticket(&self, slot: SlotIndex) -> Option<PlaybackTicket> {
        self.active.lock().get(&slot).map(|(ticket, _)| *ticket)
    }
}

impl AudioOutputPort for HeadlessAudioOutput {
    fn start(
        &self,
        slot: SlotIndex,
        ticket: PlaybackTicket,
        audio: &SynthesizedAudio,
    ) -> Result<(), ApplicationError> {
        if audio.is_empty() {
            return Err(ApplicationError::Playback(format!(
                "slot {slot}: nothing to play"
            )));
        }
        self.active.lock().insert(slot, (ticket, audio.format()));
        info!(slot, ticket, bytes = audio.size_bytes(), format = %audio.format(), "Playback started");
        Ok(())
    }

    fn stop(&self, slot: SlotIndex) {
        if self.active.lock().remove(&slot).is_some() {
            debug!(slot, "Playback stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_stop_track_slots() {
        let output = HeadlessAudioOutput::new();
        let audio = SynthesizedAudio::new(vec![1, 2, 3], AudioFormat::Mp3);

        output.start(2, 1, &audio).unwrap();
        output.start(0, 2, &audio).unwrap();
        assert_eq!(output.active_slots(), vec![0, 2]);
        assert_eq!(output.ticket(2), Some(1));

        output.stop(2);
        assert_eq!(output.active_slots(), vec![0]);
        assert_eq!(output.ticket(2), None);
    }

    #[test]
    fn empty_audio_is_rejected() {
        let output = HeadlessAudioOutput::new();
        let err = output
            .start(0, 1, &SynthesizedAudio::new(Vec::<u8>::new(), AudioFormat::Mp3))
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Playback(_)));
        assert!(output.active_slots().is_empty());
    }

    #[test]
    fn stopping_idle_slot_is_harmless() {
        let output = HeadlessAudioOutput::new();
        output.stop(7);
        assert!(output.active_slots().is_empty());
    }
}
