use std::fmt;

use super::error::HarnessError;

/// A single side-effecting change applied to the shared entities.
///
/// Identity is the position inside a [`MutationSequence`]; the return value only
/// carries failure.
pub type Mutation<E> = Box<dyn FnMut(&mut E) -> anyhow::Result<()> + Send>;

/// Ordered, fixed list of mutations.
///
/// Slots may be empty: stepping onto an empty slot is a silent no-op, so the
/// index space stays `0..len()` even when a mutation is missing.
pub struct MutationSequence<E> {
    slots: Vec<Option<Mutation<E>>>,
}

impl<E> MutationSequence<E> {
    /// Build a sequence from explicit slots. `None` marks a gap.
    pub fn new(slots: Vec<Option<Mutation<E>>>) -> Result<Self, HarnessError> {
        if slots.is_empty() {
            return Err(HarnessError::EmptySequence);
        }
        Ok(Self { slots })
    }

    /// Build a dense sequence where every index has a mutation.
    pub fn from_mutations<I>(mutations: I) -> Result<Self, HarnessError>
    where
        I: IntoIterator<Item = Mutation<E>>,
    {
        Self::new(mutations.into_iter().map(Some).collect())
    }

    pub fn builder() -> MutationSequenceBuilder<E> {
        MutationSequenceBuilder { slots: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false for a constructed sequence; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.slots.len() - 1
    }

    /// Whether `index` holds a mutation (in range and not a gap).
    pub fn is_defined(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Run the mutation at `index` against `entities`.
    ///
    /// Returns `Ok(false)` when there is nothing to run at that index.
    pub(crate) fn apply(&mut self, index: usize, entities: &mut E) -> anyhow::Result<bool> {
        match self.slots.get_mut(index) {
            Some(Some(mutation)) => {
                mutation(entities)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl<E> fmt::Debug for MutationSequence<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let defined: Vec<bool> = self.slots.iter().map(Option::is_some).collect();
        f.debug_struct("MutationSequence")
            .field("len", &self.slots.len())
            .field("defined", &defined)
            .finish()
    }
}

/// Incremental construction of a [`MutationSequence`].
pub struct MutationSequenceBuilder<E> {
    slots: Vec<Option<Mutation<E>>>,
}

impl<E> MutationSequenceBuilder<E> {
    /// Append a mutation at the next index.
    pub fn then<F>(mut self, mutation: F) -> Self
    where
        F: FnMut(&mut E) -> anyhow::Result<()> + Send + 'static,
    {
        self.slots.push(Some(Box::new(mutation)));
        self
    }

    /// Reserve the next index without a mutation.
    pub fn gap(mut self) -> Self {
        self.slots.push(None);
        self
    }

    pub fn build(self) -> Result<MutationSequence<E>, HarnessError> {
        MutationSequence::new(self.slots)
    }
}
