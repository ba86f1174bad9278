//! Nullable match oracle — scripted outcomes, call accounting, and an
//! optional gate for holding calls in flight.

use attest_oracle::{MatchOracle, MatchOutcome, MatchRequest, OracleError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A test oracle that replays scripted responses.
///
/// With an empty script every call passes with a fixed high score, so the
/// happy path needs no setup. `hold` turns the oracle into a gate: each
/// subsequent call parks until the test notifies, which is how tests
/// observe the flow mid-`Processing`.
pub struct NullMatchOracle {
    script: Mutex<VecDeque<Result<MatchOutcome, OracleError>>>,
    calls: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl NullMatchOracle {
    pub const DEFAULT_SCORE: f64 = 95.0;

    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    /// Enqueue the next response. Once the script runs dry, calls fall
    /// back to the default pass.
    pub fn respond(&self, response: Result<MatchOutcome, OracleError>) {
        self.script.lock().unwrap().push_back(response);
    }

    /// Park every subsequent call until the returned handle is notified.
    pub fn hold(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    /// How many match calls have completed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn default_pass() -> Result<MatchOutcome, OracleError> {
        Ok(MatchOutcome::Passed {
            score: Self::DEFAULT_SCORE,
            token: None,
            cached: false,
        })
    }
}

impl Default for NullMatchOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchOracle for NullMatchOracle {
    async fn face_match(&self, _request: &MatchRequest) -> Result<MatchOutcome, OracleError> {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Self::default_pass)
    }
}
