//! Node allocation and accounting for one parse call.
//!
//! Nodes live in a [`Bump`] owned by the caller, so the whole tree is freed
//! at once when the bump is dropped or reset, and no node has a destructor
//! of its own. [`Arena`] wraps the bump for a single call and counts every
//! node the parser builds against a fixed budget, so an adversarial input
//! fails with a resource error instead of exhausting memory.

use bumpalo::Bump;

/// The node budget is used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("AST node budget of {limit} exhausted")]
pub struct ArenaExhausted {
    /// The budget that was exceeded.
    pub limit: usize,
}

/// Per-call view of a [`Bump`] with a node budget.
#[derive(Debug, Clone, Copy)]
pub struct Arena<'a> {
    bump: &'a Bump,
    allocated: usize,
    limit: usize,
}

impl<'a> Arena<'a> {
    /// Creates an arena over `bump` that accepts at most `limit` nodes.
    #[must_use]
    pub const fn new(bump: &'a Bump, limit: usize) -> Self {
        Self {
            bump,
            allocated: 0,
            limit,
        }
    }

    /// Counts `nodes` more nodes against the budget.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaExhausted`] if the budget would be exceeded; the count
    /// is left unchanged in that case.
    pub fn charge(&mut self, nodes: usize) -> Result<(), ArenaExhausted> {
        match self.allocated.checked_add(nodes) {
            Some(total) if total <= self.limit => {
                self.allocated = total;
                Ok(())
            }
            _ => Err(ArenaExhausted { limit: self.limit }),
        }
    }

    /// Moves one node into the bump.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaExhausted`] if the budget is used up.
    pub fn alloc<T>(&mut self, value: T) -> Result<&'a T, ArenaExhausted> {
        self.charge(1)?;
        Ok(self.bump.alloc(value))
    }

    /// Moves a list into the bump. The elements are not charged again;
    /// each was counted when it was built.
    ///
    /// The bump never runs destructors, so `T` should not own heap memory.
    #[must_use]
    pub fn alloc_slice<T>(&self, items: Vec<T>) -> &'a [T] {
        if items.is_empty() {
            return &[];
        }
        self.bump.alloc_slice_fill_iter(items)
    }

    /// Copies a name or literal into the bump.
    #[must_use]
    pub fn alloc_str(&self, text: &str) -> &'a str {
        self.bump.alloc_str(text)
    }

    /// Copies raw bytes into the bump.
    #[must_use]
    pub fn alloc_bytes(&self, bytes: &[u8]) -> &'a [u8] {
        self.bump.alloc_slice_copy(bytes)
    }

    /// Returns the number of nodes allocated so far.
    #[must_use]
    pub const fn allocated(&self) -> usize {
        self.allocated
    }

    /// Returns the node budget.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}
