//! Update handler contract and the dispatcher that runs it.
//!
//! Each dispatched update runs in its own task tracked by a [`TaskTracker`]; a semaphore caps
//! how many handler invocations execute at once. Dispatch never waits for the handler. A
//! panicking handler is logged and does not take the dispatcher down.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use hookbot_core::InboundUpdate;
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, warn};

/// Receives every dispatched update. Implemented for any
/// `Fn(InboundUpdate) -> impl Future<Output = ()>` closure.
#[async_trait]
pub trait UpdateHandler: Send + Sync + 'static {
    async fn handle(&self, update: InboundUpdate);
}

#[async_trait]
impl<F, Fut> UpdateHandler for F
where
    F: Fn(InboundUpdate) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle(&self, update: InboundUpdate) {
        (self)(update).await
    }
}

/// What happened to one inbound delivery. The webhook caller never sees this; it is for
/// logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Handler task spawned.
    Dispatched,
    /// Body was not a valid update.
    Malformed,
    /// No text tokens (and no dispatchable callback query).
    Empty,
    /// No handler registered.
    NoHandler,
    /// [`shutdown`](crate::BotClient::shutdown) has started.
    ShuttingDown,
}

pub(crate) struct Dispatcher {
    handler: RwLock<Option<Arc<dyn UpdateHandler>>>,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    /// Held shared across check-and-spawn and exclusively while closing the tracker, so no
    /// task is spawned after `shutdown` has started waiting.
    gate: RwLock<()>,
}

impl Dispatcher {
    pub fn new(max_concurrent_handlers: usize) -> Self {
        Self {
            handler: RwLock::new(None),
            permits: Arc::new(Semaphore::new(max_concurrent_handlers.max(1))),
            tracker: TaskTracker::new(),
            gate: RwLock::new(()),
        }
    }

    /// Installs the handler, replacing any previous one.
    pub fn set_handler(&self, handler: Arc<dyn UpdateHandler>) {
        *self.handler.write().unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    pub fn has_handler(&self) -> bool {
        self.handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn handler(&self) -> Option<Arc<dyn UpdateHandler>> {
        self.handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Spawns the handler for `update`. Must be called from within a Tokio runtime.
    pub fn dispatch(&self, update: InboundUpdate) -> DispatchOutcome {
        let Some(handler) = self.handler() else {
            warn!(
                update_id = update.update_id,
                "No update handler registered, update discarded"
            );
            return DispatchOutcome::NoHandler;
        };
        let _gate = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        if self.tracker.is_closed() {
            warn!(update_id = update.update_id, "Shutting down, update discarded");
            return DispatchOutcome::ShuttingDown;
        }

        let permits = Arc::clone(&self.permits);
        self.tracker.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let update_id = update.update_id;
            debug!(update_id, command = ?update.command, "step: handler started");
            // Inner task so a panic surfaces as a JoinError instead of vanishing with the
            // tracked task; the permit is held until it finishes either way.
            let run = tokio::spawn(async move { handler.handle(update).await });
            if let Err(e) = run.await {
                if e.is_panic() {
                    error!(update_id, "Update handler panicked");
                } else {
                    warn!(update_id, error = %e, "Update handler task cancelled");
                }
            }
        });
        DispatchOutcome::Dispatched
    }

    /// Handler tasks spawned and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stops accepting updates and waits for every in-flight handler. A `dispatch` racing
    /// with this call either spawns before the tracker closes (and is waited for) or is
    /// rejected with [`DispatchOutcome::ShuttingDown`].
    pub async fn shutdown(&self) {
        {
            let _gate = self.gate.write().unwrap_or_else(PoisonError::into_inner);
            self.tracker.close();
        }
        self.tracker.wait().await;
    }
}
