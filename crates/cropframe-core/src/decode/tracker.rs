//! Guard against late-arriving decodes.
//!
//! Decoding is the only step of a crop session that may complete out of
//! order: the orchestrator can start decoding a second photo before the
//! first one finishes. Each request takes a [`LoadTicket`]; only the ticket
//! issued last is allowed to deliver its result.

use super::{load_image, ImageLoadError, Raster};

/// Handle for one in-flight decode request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    source_ref: String,
    generation: u64,
}

impl LoadTicket {
    /// The image reference this ticket was issued for.
    pub fn source_ref(&self) -> &str {
        &self.source_ref
    }
}

/// Tracks the most recent decode request.
#[derive(Debug, Default)]
pub struct LoadTracker {
    generation: u64,
    current: Option<String>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a decode for `source_ref`, invalidating any request in flight.
    pub fn begin(&mut self, source_ref: impl Into<String>) -> LoadTicket {
        self.generation += 1;
        let source_ref = source_ref.into();
        self.current = Some(source_ref.clone());
        LoadTicket {
            source_ref,
            generation: self.generation,
        }
    }

    /// True if no newer request has been started since `ticket` was issued.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
            && self.current.as_deref() == Some(ticket.source_ref.as_str())
    }

    /// Drop any pending request, e.g. when the session is cancelled.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.current = None;
    }

    /// Decode `bytes` on behalf of `ticket`.
    ///
    /// Returns `Ok(None)` when the ticket was superseded, so a stale result
    /// never reaches the session. Errors are only reported for the current
    /// request.
    pub fn finish(
        &mut self,
        ticket: &LoadTicket,
        bytes: &[u8],
    ) -> Result<Option<Raster>, ImageLoadError> {
        if !self.is_current(ticket) {
            log::warn!("discarding stale decode for {}", ticket.source_ref);
            return Ok(None);
        }
        let raster = load_image(bytes)?;
        if !self.is_current(ticket) {
            log::warn!("discarding stale decode for {}", ticket.source_ref);
            return Ok(None);
        }
        self.current = None;
        Ok(Some(raster))
    }
}
