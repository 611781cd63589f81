//! Circuit breaker for calls to failing dependencies.
//!
//! An explicit, injected component instance — never process-global state —
//! so each client and repository owns its own breaker and tests can
//! construct isolated ones.
//!
//! States: Closed (calls pass, consecutive failures counted) → Open (calls
//! fail fast for a cooldown interval) → HalfOpen (a bounded number of trial
//! calls admitted; all must succeed to close, any failure reopens).

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use authgate_core::config::policy::BreakerConfig;

/// Breaker tuning.
#[derive(Debug, Clone)]
pub struct BreakerSettings {
    /// Consecutive failures beyond which the breaker opens.
    pub failure_threshold: u32,
    /// How long the breaker stays open before admitting trial calls.
    pub open_cooldown: Duration,
    /// Number of trial calls admitted while half-open.
    pub half_open_max_requests: u32,
}

impl From<&BreakerConfig> for BreakerSettings {
    fn from(config: &BreakerConfig) -> Self {
        Self {
            failure_threshold: config.failure_threshold,
            open_cooldown: Duration::from_secs(config.open_cooldown_seconds),
            half_open_max_requests: config.half_open_max_requests.max(1),
        }
    }
}

/// Error returned by [`CircuitBreaker::call`].
#[derive(Debug)]
pub enum BreakerError<E> {
    /// The breaker is open; the operation was not attempted.
    Open,
    /// The operation ran and failed.
    Inner(E),
}

impl<E: std::fmt::Display> std::fmt::Display for BreakerError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "circuit breaker is open"),
            Self::Inner(e) => write!(f, "{e}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for BreakerError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open => None,
            Self::Inner(e) => Some(e),
        }
    }
}

#[derive(Debug)]
enum State {
    Closed { failures: u32 },
    Open { until: Instant },
    HalfOpen { admitted: u32, successes: u32 },
}

/// A fail-fast guard around calls to a single downstream dependency.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    settings: BreakerSettings,
    state: Mutex<State>,
}

impl CircuitBreaker {
    /// Creates a closed breaker.
    pub fn new(name: impl Into<String>, settings: BreakerSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            state: Mutex::new(State::Closed { failures: 0 }),
        }
    }

    /// Runs `fut` under the breaker: fails fast when open, otherwise runs
    /// the operation exactly once and records its outcome. No retries.
    pub async fn call<T, E, Fut>(&self, fut: Fut) -> Result<T, BreakerError<E>>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.try_acquire() {
            return Err(BreakerError::Open);
        }
        match fut.await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                self.record_failure();
                Err(BreakerError::Inner(e))
            }
        }
    }

    /// Admission check; transitions Open → HalfOpen once the cooldown elapses.
    fn try_acquire(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match &mut *state {
            State::Closed { .. } => true,
            State::Open { until } => {
                if Instant::now() >= *until {
                    debug!(breaker = %self.name, "open -> half-open");
                    *state = State::HalfOpen {
                        admitted: 1,
                        successes: 0,
                    };
                    true
                } else {
                    false
                }
            }
            State::HalfOpen { admitted, .. } => {
                if *admitted < self.settings.half_open_max_requests {
                    *admitted += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn record_success(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match &mut *state {
            State::Closed { failures } => *failures = 0,
            State::HalfOpen { successes, .. } => {
                *successes += 1;
                if *successes >= self.settings.half_open_max_requests {
                    debug!(breaker = %self.name, "half-open -> closed");
                    *state = State::Closed { failures: 0 };
                }
            }
            State::Open { .. } => {}
        }
    }

    fn record_failure(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match &mut *state {
            State::Closed { failures } => {
                *failures += 1;
                if *failures > self.settings.failure_threshold {
                    warn!(breaker = %self.name, failures = *failures, "closed -> open");
                    *state = State::Open {
                        until: Instant::now() + self.settings.open_cooldown,
                    };
                }
            }
            State::HalfOpen { .. } => {
                warn!(breaker = %self.name, "half-open -> open");
                *state = State::Open {
                    until: Instant::now() + self.settings.open_cooldown,
                };
            }
            State::Open { .. } => {}
        }
    }
}
