use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use super::Harness;
use super::error::HarnessError;
use super::sequencer::{StepOutcome, Traversal};

/// Records the visual state of the entities. Awaited before the next step.
#[async_trait]
pub trait SnapshotCapture<E: Sync>: Send {
    async fn capture(&mut self, index: usize, entities: &E) -> anyhow::Result<()>;
}

/// Indices captured during an automation run, in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomationReport {
    pub captured: Vec<usize>,
}

impl AutomationReport {
    pub fn captures(&self) -> usize {
        self.captured.len()
    }
}

/// Walks the whole sequence once, without wrapping, capturing after every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutomationDriver;

impl AutomationDriver {
    pub fn new() -> Self {
        Self
    }

    /// Force index 0, capture, then advance and capture until the sequence is
    /// exhausted. Exhaustion is success; a mutation or capture error aborts the run.
    #[tracing::instrument(name = "automation", skip_all, fields(len = harness.len()))]
    pub async fn run<E, C>(
        &self,
        harness: &mut Harness<E>,
        capture: &mut C,
    ) -> Result<AutomationReport, HarnessError>
    where
        E: Sync,
        C: SnapshotCapture<E> + ?Sized,
    {
        let start = Instant::now();
        let mut report = AutomationReport {
            captured: Vec::with_capacity(harness.len()),
        };

        let mut outcome = harness.seek(0)?;
        while let StepOutcome::Applied(index) = outcome {
            capture
                .capture(index, harness.entities())
                .await
                .map_err(|source| HarnessError::Capture { index, source })?;
            debug!(index, "snapshot captured");
            report.captured.push(index);

            outcome = harness.advance(Traversal::Bounded)?;
        }

        info!(
            captures = report.captures(),
            elapsed = ?start.elapsed(),
            "automation run complete"
        );
        Ok(report)
    }
}
