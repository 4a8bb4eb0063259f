//! Session-scoped numbered result cache

use tracing::debug;

use crate::error::{AssistantError, AssistantResult};
use crate::model::ItemView;

/// The current numbered result set.
///
/// The tool-call boundary is stateless between invocations, yet callers
/// refer to items by small numbers; this cache is the translation between
/// the two. Display numbers are contiguous from 1 in the listing's result
/// order and are valid only against the current generation: every new
/// listing or search replaces the entries wholesale (never merges) and bumps
/// the generation, so a number that has no entry afterwards is rejected
/// rather than silently remapped.
///
/// One cache lives per server process, created empty at startup and owned
/// behind a single lock by the assistant service; `install` and `resolve`
/// form the critical section when the protocol layer fails to serialize
/// calls.
#[derive(Debug, Default)]
pub struct SessionCache {
    generation: u64,
    entries: Vec<ItemView>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace the entries with a new result set.
    ///
    /// Items are numbered 1..=N in the order given. Returns the new
    /// generation token.
    pub fn install(&mut self, items: Vec<ItemView>) -> u64 {
        self.entries = items;
        self.generation += 1;
        debug!(
            generation = self.generation,
            entries = self.entries.len(),
            "installed new result set"
        );
        self.generation
    }

    /// Resolve a display number against the current generation.
    ///
    /// Rejects numbers outside 1..=len, which covers both out-of-range input
    /// and numbers issued by a superseded generation that the current one no
    /// longer reaches.
    pub fn resolve(&self, number: usize) -> AssistantResult<&ItemView> {
        if self.entries.is_empty() {
            return Err(AssistantError::stale_index(
                number,
                "nothing has been listed yet; run a listing or search first",
            ));
        }
        number
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .ok_or_else(|| {
                AssistantError::stale_index(
                    number,
                    format!("the current listing has {} items", self.entries.len()),
                )
            })
    }

    /// Generation token of the current result set; 0 before any install.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
