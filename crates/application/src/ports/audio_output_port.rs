//! Audio output port - Starts and stops playback for a UI slot

use domain::SynthesizedAudio;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Index of a card slot in the UI
pub type SlotIndex = usize;

/// Identifies one playback started in a slot
pub type PlaybackTicket = u64;

/// Port for the device (or page) that actually plays audio
///
/// Implementations report natural completion back through
/// `PlaybackController::on_ended` with the ticket they were started with.
#[cfg_attr(test, automock)]
pub trait AudioOutputPort: Send + Sync {
    /// Begin playing `audio` in `slot` as playback `ticket`
    fn start(
        &self,
        slot: SlotIndex,
        ticket: PlaybackTicket,
        audio: &SynthesizedAudio,
    ) -> Result<(), ApplicationError>;

    /// Pause playback in `slot` and reset its position
    fn stop(&self, slot: SlotIndex);
}
