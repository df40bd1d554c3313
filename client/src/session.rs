use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use shared::AnalysisResult;

/// Ticket identifying one analysis attempt. Issued by [`ResultSlot::begin`]
/// and presented back at completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Holder for the single displayed result. A slow request that resolves
/// after a newer one has started would otherwise overwrite the fresher
/// verdict; the monotonic ticket makes such late completions identifiable so
/// they can be dropped instead.
#[derive(Debug, Default)]
pub struct ResultSlot {
    latest: AtomicU64,
    current: Mutex<Option<AnalysisResult>>,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new analysis: clears the previous result and returns the
    /// ticket the eventual completion must present.
    pub fn begin(&self) -> Ticket {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        *self.current.lock().unwrap() = None;
        Ticket(ticket)
    }

    /// Stores a completed result unless a newer analysis has begun since the
    /// ticket was issued. Returns whether the result was kept.
    pub fn commit(&self, ticket: Ticket, result: AnalysisResult) -> bool {
        if ticket.0 != self.latest.load(Ordering::SeqCst) {
            log::debug!("discarding stale result for superseded request {}", ticket.0);
            return false;
        }
        *self.current.lock().unwrap() = Some(result);
        true
    }

    pub fn latest(&self) -> Option<AnalysisResult> {
        self.current.lock().unwrap().clone()
    }
}
