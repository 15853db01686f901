//! Core traits
//!
//! Defines the event emission seam between the settlement engine's callers and
//! whatever pushes results onward (real-time broadcast, audit log, report writer).

use crate::types::SettlementEvent;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// Receiver of settlement outcomes
///
/// Callers invoke this after the engine returns; the engine never reaches it.
/// Implementations must tolerate being called from several tasks at once.
pub trait EventSink: Send + Sync {
    /// Deliver one event
    fn emit(&self, event: SettlementEvent);
}

impl EventSink for UnboundedSender<SettlementEvent> {
    fn emit(&self, event: SettlementEvent) {
        if let Err(unsent) = self.send(event) {
            warn!(
                "Settlement event for trip {} dropped: receiver closed",
                unsent.0.trip()
            );
        }
    }
}
