//! Reassembly of payloads that exceed single-message size limits.
//!
//! The background process splits an oversized session payload into an ordered
//! series of fragments marked `truncated`, closing the series with one marked
//! `finished`. Fragments for a given payload arrive in order on a single
//! channel; the assembler never reorders.

/// Accumulator for an in-flight multi-part payload.
#[derive(Debug, Default)]
pub struct ChunkAssembler {
    pending: Vec<String>,
}

impl ChunkAssembler {
    /// Create a new assembler with no pending fragments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one fragment; returns the complete logical payload once a
    /// terminal fragment is observed.
    ///
    /// A non-truncated fragment is complete on its own and resets any pending
    /// sequence. A truncated fragment is appended; when it is also marked
    /// finished, the whole sequence is concatenated in arrival order and
    /// returned, clearing pending state. A finished fragment with no prior
    /// fragments is equivalent to a single complete message.
    pub fn ingest(&mut self, content: String, truncated: bool, finished: bool) -> Option<String> {
        if !truncated {
            self.pending.clear();
            return Some(content);
        }
        self.pending.push(content);
        if finished {
            let payload = std::mem::take(&mut self.pending).concat();
            Some(payload)
        } else {
            None
        }
    }

    /// Whether a multi-part payload is currently in flight.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop any pending fragments.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
