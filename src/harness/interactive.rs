use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use strum_macros::Display;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::SharedHarness;
use super::error::HarnessError;
use super::sequencer::{StepOutcome, Traversal};

/// Discrete signals accepted by a [`TriggerBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Trigger {
    Advance,
}

/// Binds triggers to looping advances of a shared harness.
///
/// A harness accepts one live binding at a time; a second [`bind`](Self::bind)
/// fails with [`HarnessError::AlreadyBound`] until the first listener stops.
pub struct InteractiveDriver<E> {
    harness: SharedHarness<E>,
}

impl<E: Send + 'static> InteractiveDriver<E> {
    pub fn new(harness: SharedHarness<E>) -> Self {
        Self { harness }
    }

    /// Spawn the listener task and return the handle that owns it.
    ///
    /// Triggers are applied one at a time in arrival order. A failed or panicking
    /// advance is logged and passed to `reporter`; the listener keeps running.
    pub async fn bind<R>(self, reporter: R) -> Result<TriggerBinding, HarnessError>
    where
        R: Fn(&HarnessError) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        self.harness.lock().await.claim_subscription(cancel.clone())?;

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(listen(self.harness, rx, cancel.clone(), reporter));
        info!("trigger binding established");

        Ok(TriggerBinding {
            tx: Some(tx),
            cancel,
            handle: Some(handle),
        })
    }
}

/// Live subscription created by [`InteractiveDriver::bind`].
///
/// Dropping it cancels the listener; queued triggers are discarded.
pub struct TriggerBinding {
    tx: Option<UnboundedSender<Trigger>>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TriggerBinding {
    /// Queue a trigger without waiting for it to be applied.
    ///
    /// Returns `false` once the listener has stopped.
    pub fn trigger(&self, trigger: Trigger) -> bool {
        match &self.tx {
            Some(tx) if !self.cancel.is_cancelled() => tx.send(trigger).is_ok(),
            _ => false,
        }
    }

    pub fn advance(&self) -> bool {
        self.trigger(Trigger::Advance)
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop accepting triggers, apply the ones already queued, then wait for the
    /// listener to exit.
    pub async fn drain(mut self) {
        self.tx.take();
        self.join().await;
    }

    /// Cancel the listener immediately and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        self.join().await;
    }

    async fn join(&mut self) {
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            warn!(%e, "trigger listener ended abnormally");
        }
    }
}

impl Drop for TriggerBinding {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn listen<E, R>(
    harness: SharedHarness<E>,
    mut rx: UnboundedReceiver<Trigger>,
    cancel: CancellationToken,
    reporter: R,
) where
    E: Send + 'static,
    R: Fn(&HarnessError) + Send + 'static,
{
    loop {
        let trigger = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            trigger = rx.recv() => match trigger {
                Some(trigger) => trigger,
                None => break,
            },
        };

        match trigger {
            Trigger::Advance => match advance(&harness).await {
                Ok(StepOutcome::Applied(index)) => debug!(index, "interactive advance"),
                Ok(StepOutcome::Exhausted) => warn!("looping advance reported exhaustion"),
                Err(err) => {
                    error!(%err, "interactive advance failed");
                    reporter(&err);
                }
            },
        }
    }
    // Releases the harness for the next binding.
    cancel.cancel();
    debug!("trigger listener stopped");
}

async fn advance<E>(harness: &SharedHarness<E>) -> Result<StepOutcome, HarnessError> {
    let result = AssertUnwindSafe(async {
        let mut harness = harness.lock().await;
        harness.advance(Traversal::Looping)
    })
    .catch_unwind()
    .await;

    match result {
        Ok(result) => result,
        Err(payload) => {
            // The index moved before the mutation ran.
            let index = harness.lock().await.current_index();
            Err(HarnessError::MutationPanicked {
                index,
                message: panic_message(payload.as_ref()),
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
