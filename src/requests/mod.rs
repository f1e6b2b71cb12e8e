/// Request state shared between a caller and the view
use crate::errors::{ApiError, ApiResult, ErrorInfo};
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub mod endpoints;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<ErrorInfo>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

struct Slot<T> {
    state: RequestState<T>,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl<T> Slot<T> {
    /// Invalidate whatever is running; returns the new generation
    fn supersede(&mut self) -> u64 {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation += 1;
        self.generation
    }
}

/// Held across the await in `execute`; if the caller's future is dropped
/// first, the call is cancelled and its loading flag is cleared.
struct InFlight<'a, T> {
    label: &'static str,
    slot: &'a Mutex<Slot<T>>,
    generation: u64,
    settled: bool,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut slot = self.slot.lock();
        if slot.generation != self.generation {
            return;
        }
        if let Some(token) = slot.in_flight.take() {
            token.cancel();
        }
        slot.state.loading = false;
        debug!("{}: caller dropped an in-flight request", self.label);
    }
}

pub struct RequestHandle<T> {
    label: &'static str,
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for RequestHandle<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Clone> RequestHandle<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            slot: Arc::new(Mutex::new(Slot {
                state: RequestState::default(),
                generation: 0,
                in_flight: None,
            })),
        }
    }

    /// Run `call` and record its outcome, unless a later call or a reset
    /// superseded it in the meantime.
    pub async fn execute<F, Fut>(&self, call: F) -> Option<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let (generation, token) = {
            let mut slot = self.slot.lock();
            let generation = slot.supersede();
            let token = CancellationToken::new();
            slot.in_flight = Some(token.clone());
            slot.state.loading = true;
            slot.state.error = None;
            (generation, token)
        };

        let mut guard = InFlight {
            label: self.label,
            slot: &self.slot,
            generation,
            settled: false,
        };
        let outcome = call(token).await;
        guard.settled = true;

        let mut slot = self.slot.lock();
        if slot.generation != generation {
            debug!("{}: discarding superseded response", self.label);
            return None;
        }
        slot.in_flight = None;
        slot.state.loading = false;

        match outcome {
            Ok(data) => {
                slot.state.data = Some(data.clone());
                slot.state.error = None;
                Some(data)
            }
            Err(ApiError::Cancelled) => None,
            Err(e) => {
                slot.state.error = Some(e.info());
                None
            }
        }
    }

    /// Drop data, error and loading; any in-flight call is cancelled
    pub fn reset(&self) {
        let mut slot = self.slot.lock();
        slot.supersede();
        slot.state = RequestState::default();
    }

    /// Record an error that was detected before any call went out.
    /// Data and any in-flight call are left alone.
    pub fn fail(&self, err: &ApiError) {
        self.slot.lock().state.error = Some(err.info());
    }

    pub fn clear_error(&self) {
        self.slot.lock().state.error = None;
    }

    /// Cancel the in-flight call but keep whatever data is already there
    pub fn abandon(&self) {
        let mut slot = self.slot.lock();
        if slot.in_flight.is_some() {
            debug!("{}: abandoning in-flight request", self.label);
        }
        slot.supersede();
        slot.state.loading = false;
    }

    pub fn snapshot(&self) -> RequestState<T> {
        self.slot.lock().state.clone()
    }

    pub fn data(&self) -> Option<T> {
        self.slot.lock().state.data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.slot.lock().state.loading
    }
}
