//! Messages passed from background generation threads to the UI thread.

use crate::error::Result;

/// Events received from the background generation task.
///
/// Sent through a channel from the worker thread and applied to the session
/// on the next frame.
pub(crate) enum GenerationEvent {
    /// The request identified by `ticket` resolved.
    Finished { ticket: u64, outcome: Result<String> },
}
