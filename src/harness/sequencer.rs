use strum_macros::Display;
use tracing::{debug, trace};

use super::error::HarnessError;
use super::sequence::MutationSequence;

/// What happens when an advance would move past the last mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Traversal {
    /// Stop at the end; the step reports [`StepOutcome::Exhausted`].
    Bounded,
    /// Wrap around to index 0.
    Looping,
}

/// Result of a single [`Sequencer::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The sequencer moved to this index and its mutation (if any) ran.
    Applied(usize),
    /// Bounded traversal ran out of mutations. Nothing changed.
    Exhausted,
}

impl StepOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Applied(index) => Some(*index),
            Self::Exhausted => None,
        }
    }
}

/// Notified after every successful step, once the mutation has been applied.
pub trait StepObserver<E>: Send {
    fn on_step(&mut self, entities: &mut E, index: usize);
}

impl<E, F> StepObserver<E> for F
where
    F: FnMut(&mut E, usize) + Send,
{
    fn on_step(&mut self, entities: &mut E, index: usize) {
        self(entities, index)
    }
}

/// Tracks the current position in a [`MutationSequence`] and advances it.
///
/// The current index is always in `0..len`. It only changes through [`step`](Self::step).
pub struct Sequencer<E> {
    sequence: MutationSequence<E>,
    current: usize,
    observers: Vec<Box<dyn StepObserver<E>>>,
}

impl<E> Sequencer<E> {
    /// Sequencer positioned at index 0. Nothing is applied until the first step.
    pub fn new(sequence: MutationSequence<E>) -> Self {
        Self {
            sequence,
            current: 0,
            observers: Vec::new(),
        }
    }

    /// Sequencer positioned at a caller-chosen index.
    pub fn starting_at(sequence: MutationSequence<E>, index: usize) -> Result<Self, HarnessError> {
        if index >= sequence.len() {
            return Err(HarnessError::StartOutOfRange {
                index,
                len: sequence.len(),
            });
        }
        Ok(Self {
            sequence,
            current: index,
            observers: Vec::new(),
        })
    }

    /// Register an observer for successful steps.
    pub fn observe(&mut self, observer: impl StepObserver<E> + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn with_observer(mut self, observer: impl StepObserver<E> + 'static) -> Self {
        self.observe(observer);
        self
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn sequence(&self) -> &MutationSequence<E> {
        &self.sequence
    }

    /// Move to `target` (default: the next index) and apply its mutation.
    ///
    /// A target past the last index either exhausts the run ([`Traversal::Bounded`],
    /// state untouched) or wraps to 0 ([`Traversal::Looping`]). On success the
    /// mutation runs exactly once, then observers are notified. A failing mutation
    /// leaves the index moved but skips the observers.
    #[tracing::instrument(level = "debug", skip(self, entities), fields(current = self.current))]
    pub fn step(
        &mut self,
        entities: &mut E,
        traversal: Traversal,
        target: Option<usize>,
    ) -> Result<StepOutcome, HarnessError> {
        let mut target = target.unwrap_or(self.current + 1);

        if target > self.sequence.last_index() {
            match traversal {
                Traversal::Bounded => {
                    debug!(target, "sequence exhausted");
                    return Ok(StepOutcome::Exhausted);
                }
                Traversal::Looping => {
                    debug!(target, "wrapping to first mutation");
                    target = 0;
                }
            }
        }

        self.current = target;

        let ran = self
            .sequence
            .apply(target, entities)
            .map_err(|source| HarnessError::MutationFailed {
                index: target,
                source,
            })?;
        if !ran {
            trace!(index = target, "no mutation at index");
        }

        for observer in &mut self.observers {
            observer.on_step(entities, target);
        }

        Ok(StepOutcome::Applied(target))
    }

    /// Advance to the next index.
    pub fn advance(
        &mut self,
        entities: &mut E,
        traversal: Traversal,
    ) -> Result<StepOutcome, HarnessError> {
        self.step(entities, traversal, None)
    }

    /// Jump to an explicit index without wrapping.
    pub fn seek(&mut self, entities: &mut E, index: usize) -> Result<StepOutcome, HarnessError> {
        self.step(entities, Traversal::Bounded, Some(index))
    }
}

impl<E> std::fmt::Debug for Sequencer<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("current", &self.current)
            .field("sequence", &self.sequence)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Entities for tests: a log of applied indices plus a status string.
    #[derive(Debug, Default)]
    struct Probe {
        applied: Vec<usize>,
        status: String,
    }

    fn recording_sequencer(len: usize) -> Sequencer<Probe> {
        let mut builder = MutationSequence::<Probe>::builder();
        for i in 0..len {
            builder = builder.then(move |p: &mut Probe| {
                p.applied.push(i);
                Ok(())
            });
        }
        Sequencer::new(builder.build().unwrap()).with_observer(|p: &mut Probe, index: usize| {
            p.status = (index + 1).to_string();
        })
    }

    #[test]
    fn test_bounded_walk_then_exhausted() {
        let mut seq = recording_sequencer(5);
        let mut probe = Probe::default();

        assert_eq!(seq.seek(&mut probe, 0).unwrap(), StepOutcome::Applied(0));
        assert_eq!(probe.status, "1");

        for expected in 1..=3 {
            let outcome = seq.advance(&mut probe, Traversal::Bounded).unwrap();
            assert_eq!(outcome, StepOutcome::Applied(expected));
            assert_eq!(probe.status, (expected + 1).to_string());
        }

        assert_eq!(
            seq.advance(&mut probe, Traversal::Bounded).unwrap(),
            StepOutcome::Applied(4)
        );
        assert_eq!(probe.status, "5");

        let outcome = seq.advance(&mut probe, Traversal::Bounded).unwrap();
        assert_eq!(outcome, StepOutcome::Exhausted);
        assert!(!outcome.is_applied());
        assert_eq!(seq.current_index(), 4);
        assert_eq!(probe.status, "5");
        assert_eq!(probe.applied, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_looping_wraps_to_zero() {
        let mut seq = recording_sequencer(5);
        let mut probe = Probe::default();
        seq.seek(&mut probe, 0).unwrap();

        for _ in 0..4 {
            seq.advance(&mut probe, Traversal::Looping).unwrap();
        }
        assert_eq!(seq.current_index(), 4);

        let outcome = seq.advance(&mut probe, Traversal::Looping).unwrap();
        assert_eq!(outcome, StepOutcome::Applied(0));
        assert_eq!(probe.status, "1");
    }

    #[test]
    fn test_explicit_target_past_end_wraps_when_looping() {
        let mut seq = recording_sequencer(3);
        let mut probe = Probe::default();

        let outcome = seq.step(&mut probe, Traversal::Looping, Some(10)).unwrap();
        assert_eq!(outcome, StepOutcome::Applied(0));
        assert_eq!(probe.applied, vec![0]);
    }

    #[test]
    fn test_exhausted_step_does_not_touch_entities() {
        let mut seq = recording_sequencer(2);
        let mut probe = Probe::default();
        seq.seek(&mut probe, 1).unwrap();
        let before = probe.applied.clone();

        assert_eq!(
            seq.step(&mut probe, Traversal::Bounded, Some(7)).unwrap(),
            StepOutcome::Exhausted
        );
        assert_eq!(probe.applied, before);
        assert_eq!(probe.status, "2");
        assert_eq!(seq.current_index(), 1);
    }

    #[test]
    fn test_gap_still_moves_and_notifies() {
        let sequence = MutationSequence::<Probe>::builder()
            .then(|p: &mut Probe| {
                p.applied.push(0);
                Ok(())
            })
            .gap()
            .build()
            .unwrap();
        let mut seq = Sequencer::new(sequence).with_observer(|p: &mut Probe, index: usize| {
            p.status = (index + 1).to_string();
        });
        let mut probe = Probe::default();

        seq.seek(&mut probe, 0).unwrap();
        let outcome = seq.advance(&mut probe, Traversal::Bounded).unwrap();

        assert_eq!(outcome, StepOutcome::Applied(1));
        assert_eq!(probe.applied, vec![0]);
        assert_eq!(probe.status, "2");
    }

    #[test]
    fn test_failing_mutation_propagates_and_skips_observers() {
        let sequence = MutationSequence::<Probe>::builder()
            .then(|_: &mut Probe| Ok(()))
            .then(|_: &mut Probe| Err(anyhow::anyhow!("width rejected")))
            .build()
            .unwrap();
        let mut seq = Sequencer::new(sequence).with_observer(|p: &mut Probe, index: usize| {
            p.status = (index + 1).to_string();
        });
        let mut probe = Probe::default();
        seq.seek(&mut probe, 0).unwrap();

        let err = seq.advance(&mut probe, Traversal::Bounded).unwrap_err();
        assert!(matches!(err, HarnessError::MutationFailed { index: 1, .. }));
        assert_eq!(seq.current_index(), 1);
        assert_eq!(probe.status, "1");
    }

    #[test]
    fn test_starting_at_rejects_out_of_range() {
        let sequence = MutationSequence::<Probe>::builder()
            .then(|_: &mut Probe| Ok(()))
            .build()
            .unwrap();
        let err = Sequencer::starting_at(sequence, 1).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::StartOutOfRange { index: 1, len: 1 }
        ));
    }

    #[test]
    fn test_starting_index_drives_implicit_next() {
        let mut builder = MutationSequence::<Probe>::builder();
        for i in 0..4 {
            builder = builder.then(move |p: &mut Probe| {
                p.applied.push(i);
                Ok(())
            });
        }
        let mut seq = Sequencer::starting_at(builder.build().unwrap(), 2).unwrap();
        let mut probe = Probe::default();

        assert_eq!(
            seq.advance(&mut probe, Traversal::Bounded).unwrap(),
            StepOutcome::Applied(3)
        );
        assert_eq!(
            seq.advance(&mut probe, Traversal::Bounded).unwrap(),
            StepOutcome::Exhausted
        );
    }
}
