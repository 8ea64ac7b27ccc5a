//! Mutation sequencing core: the sequence, the sequencer state machine, the
//! status reflector and the two drivers that advance it.

pub mod automation;
pub mod capture;
pub mod error;
pub mod interactive;
pub mod sequence;
pub mod sequencer;
pub mod status;

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub use automation::{AutomationDriver, AutomationReport, SnapshotCapture};
pub use capture::{BufferCapture, CapturedFrame};
pub use error::HarnessError;
pub use interactive::{InteractiveDriver, Trigger, TriggerBinding};
pub use sequence::{Mutation, MutationSequence};
pub use sequencer::{Sequencer, StepObserver, StepOutcome, Traversal};
pub use status::{StatusReflector, status_text};

/// A sequencer together with the entities its mutations act on.
pub struct Harness<E> {
    sequencer: Sequencer<E>,
    entities: E,
    subscription: Option<CancellationToken>,
}

/// Harness shared between the interactive listener and whoever renders it.
pub type SharedHarness<E> = Arc<Mutex<Harness<E>>>;

impl<E> Harness<E> {
    pub fn new(sequencer: Sequencer<E>, entities: E) -> Self {
        Self {
            sequencer,
            entities,
            subscription: None,
        }
    }

    pub fn into_shared(self) -> SharedHarness<E> {
        Arc::new(Mutex::new(self))
    }

    pub fn step(
        &mut self,
        traversal: Traversal,
        target: Option<usize>,
    ) -> Result<StepOutcome, HarnessError> {
        self.sequencer.step(&mut self.entities, traversal, target)
    }

    pub fn advance(&mut self, traversal: Traversal) -> Result<StepOutcome, HarnessError> {
        self.sequencer.advance(&mut self.entities, traversal)
    }

    pub fn seek(&mut self, index: usize) -> Result<StepOutcome, HarnessError> {
        self.sequencer.seek(&mut self.entities, index)
    }

    pub fn current_index(&self) -> usize {
        self.sequencer.current_index()
    }

    pub fn len(&self) -> usize {
        self.sequencer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequencer.is_empty()
    }

    pub fn entities(&self) -> &E {
        &self.entities
    }

    pub fn sequencer(&self) -> &Sequencer<E> {
        &self.sequencer
    }

    /// Whether a trigger listener is currently subscribed.
    pub fn is_bound(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Record `token` as the live subscription. Fails while another one is live.
    pub(crate) fn claim_subscription(
        &mut self,
        token: CancellationToken,
    ) -> Result<(), HarnessError> {
        if self.is_bound() {
            return Err(HarnessError::AlreadyBound);
        }
        self.subscription = Some(token);
        Ok(())
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for Harness<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("sequencer", &self.sequencer)
            .field("entities", &self.entities)
            .field("bound", &self.is_bound())
            .finish()
    }
}
