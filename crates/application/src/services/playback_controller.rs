//! Playback controller
//!
//! One small state machine per card slot:
//!
//! ```text
//! idle --play--> requesting --audio ready--> playing --ended/stop--> idle
//!                requesting --error/stop--> idle
//! ```
//!
//! Slots are independent; starting one never stops another. Stopping a slot
//! that is still requesting discards the audio when it arrives, but does not
//! cancel the network call.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use domain::VoiceType;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

use super::SpeechCache;
use crate::{
    error::ApplicationError,
    ports::{AudioOutputPort, PlaybackTicket, SlotIndex},
};

const EVENT_BUFFER: usize = 64;

/// State of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing happening
    Idle,
    /// Waiting for audio
    Requesting,
    /// Audio is playing
    Playing,
}

/// Published on every slot transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Audio was requested
    Requesting(SlotIndex),
    /// Playback started
    Started(SlotIndex),
    /// Stopped by the user
    Stopped(SlotIndex),
    /// Playback finished on its own
    Ended(SlotIndex),
    /// Requesting or starting audio failed
    Failed {
        /// Affected slot
        slot: SlotIndex,
        /// Failure description
        error: String,
    },
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    state: PlaybackState,
    ticket: PlaybackTicket,
}

/// Per-slot playback state machine on top of [`SpeechCache`]
pub struct PlaybackController {
    cache: Arc<SpeechCache>,
    output: Arc<dyn AudioOutputPort>,
    slots: Mutex<HashMap<SlotIndex, Slot>>,
    next_ticket: AtomicU64,
    events: broadcast::Sender<PlaybackEvent>,
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("slots", &self.slots.lock().len())
            .finish_non_exhaustive()
    }
}

impl PlaybackController {
    /// Create a controller
    pub fn new(cache: Arc<SpeechCache>, output: Arc<dyn AudioOutputPort>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            cache,
            output,
            slots: Mutex::new(HashMap::new()),
            next_ticket: AtomicU64::new(1),
            events,
        }
    }

    /// Subscribe to slot transitions
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Current state of a slot
    pub fn state(&self, slot: SlotIndex) -> PlaybackState {
        self.slots
            .lock()
            .get(&slot)
            .map_or(PlaybackState::Idle, |s| s.state)
    }

    /// Slots that are currently playing, in ascending order
    pub fn playing_slots(&self) -> Vec<SlotIndex> {
        let mut playing: Vec<_> = self
            .slots
            .lock()
            .iter()
            .filter(|(_, s)| s.state == PlaybackState::Playing)
            .map(|(slot, _)| *slot)
            .collect();
        playing.sort_unstable();
        playing
    }

    /// Request audio for `text` and play it in `slot`
    ///
    /// A slot that is not idle is left alone and its state is returned.
    /// Returns `Idle` if the slot was stopped while the audio was requested.
    ///
    /// # Errors
    /// Synthesis errors are returned unchanged; an output that refuses to
    /// start yields `Playback`. The slot is idle afterwards in both cases.
    #[instrument(skip(self, text), fields(voice = %voice))]
    pub async fn play(
        &self,
        slot: SlotIndex,
        text: &str,
        voice: &VoiceType,
    ) -> Result<PlaybackState, ApplicationError> {
        let ticket = {
            let mut slots = self.slots.lock();
            if let Some(current) = slots.get(&slot).filter(|s| s.state != PlaybackState::Idle) {
                debug!(state = ?current.state, "Slot busy, ignoring play");
                return Ok(current.state);
            }
            let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
            slots.insert(
                slot,
                Slot {
                    state: PlaybackState::Requesting,
                    ticket,
                },
            );
            ticket
        };
        self.publish(PlaybackEvent::Requesting(slot));

        let audio = match self.cache.synthesize(text, voice).await {
            Ok(audio) => audio,
            Err(error) => {
                if self.transition(slot, ticket, PlaybackState::Requesting, PlaybackState::Idle) {
                    warn!(error = %error, "Audio request failed");
                    self.publish(PlaybackEvent::Failed {
                        slot,
                        error: error.to_string(),
                    });
                    return Err(error);
                }
                return Ok(PlaybackState::Idle);
            },
        };

        if !self.transition(slot, ticket, PlaybackState::Requesting, PlaybackState::Playing) {
            debug!("Slot stopped while requesting, discarding audio");
            return Ok(PlaybackState::Idle);
        }

        if let Err(error) = self.output.start(slot, ticket, &audio) {
            self.transition(slot, ticket, PlaybackState::Playing, PlaybackState::Idle);
            warn!(error = %error, "Audio output refused to start");
            self.publish(PlaybackEvent::Failed {
                slot,
                error: error.to_string(),
            });
            return Err(match error {
                playback @ ApplicationError::Playback(_) => playback,
                other => ApplicationError::Playback(other.to_string()),
            });
        }

        self.publish(PlaybackEvent::Started(slot));
        Ok(PlaybackState::Playing)
    }

    /// Stop a slot that is playing or requesting
    ///
    /// Returns whether the slot was active.
    pub fn stop(&self, slot: SlotIndex) -> bool {
        let previous = {
            let mut slots = self.slots.lock();
            match slots.get_mut(&slot) {
                Some(s) if s.state != PlaybackState::Idle => {
                    let previous = s.state;
                    s.state = PlaybackState::Idle;
                    previous
                },
                _ => return false,
            }
        };

        if previous == PlaybackState::Playing {
            self.output.stop(slot);
        }
        self.publish(PlaybackEvent::Stopped(slot));
        true
    }

    /// Report that playback `ticket` in `slot` finished on its own
    ///
    /// Ignored unless `ticket` is the playback currently running in the
    /// slot, so a late report from replaced audio cannot end its successor.
    pub fn on_ended(&self, slot: SlotIndex, ticket: PlaybackTicket) {
        if self.transition(slot, ticket, PlaybackState::Playing, PlaybackState::Idle) {
            self.publish(PlaybackEvent::Ended(slot));
        } else {
            debug!(slot, ticket, "Ignoring end of stale playback");
        }
    }

    /// Stop the slot if it is active, otherwise start playing
    pub async fn toggle(
        &self,
        slot: SlotIndex,
        text: &str,
        voice: &VoiceType,
    ) -> Result<PlaybackState, ApplicationError> {
        if self.stop(slot) {
            return Ok(PlaybackState::Idle);
        }
        self.play(slot, text, voice).await
    }

    fn transition(
        &self,
        slot: SlotIndex,
        ticket: PlaybackTicket,
        from: PlaybackState,
        to: PlaybackState,
    ) -> bool {
        let mut slots = self.slots.lock();
        match slots.get_mut(&slot) {
            Some(s) if s.ticket == ticket && s.state == from => {
                s.state = to;
                true
            },
            _ => false,
        }
    }

    fn publish(&self, event: PlaybackEvent) {
        let _ = self.events.send(event);
    }
}
