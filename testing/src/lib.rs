//! # Slack Lists Testing
//!
//! Test doubles for the Slack Lists adapter.
//!
//! This crate provides:
//! - [`ManualClock`]: time that only moves when the code under test sleeps
//! - [`StubListService`]: in-memory list service with call recording and
//!   scripted failures
//!
//! ## Example
//!
//! ```ignore
//! use slack_lists_testing::{StubListService, test_clock};
//!
//! #[tokio::test]
//! async fn test_batch() {
//!     let clock = Arc::new(test_clock());
//!     let service = Arc::new(StubListService::new().with_clock(clock.clone()));
//!     let sequencer = BulkSubmissionSequencer::new(service.clone(), clock);
//!
//!     sequencer.submit("F1", requests, Duration::from_secs(1)).await;
//!     assert_eq!(service.create_calls(), requests.len());
//! }
//! ```

pub mod list_service;

pub use list_service::StubListService;
pub use mocks::{ManualClock, test_clock};

/// Mock implementations of environment traits
pub mod mocks {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use slack_lists_core::environment::Clock;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Manual clock for deterministic tests
    ///
    /// `now` returns a fixed instant until something calls `sleep`, which
    /// advances it by exactly the requested duration and returns at once.
    ///
    /// # Example
    ///
    /// ```
    /// use slack_lists_testing::mocks::ManualClock;
    /// use slack_lists_core::environment::Clock;
    /// use chrono::Utc;
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let clock = ManualClock::new(Utc::now());
    /// let start = clock.now();
    /// clock.sleep(Duration::from_secs(2)).await;
    /// assert_eq!((clock.now() - start).num_seconds(), 2);
    /// # });
    /// ```
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        state: Arc<Mutex<ClockState>>,
    }

    #[derive(Debug)]
    struct ClockState {
        now: DateTime<Utc>,
        sleeps: Vec<Duration>,
    }

    impl ManualClock {
        /// Create a clock stopped at `time`
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                state: Arc::new(Mutex::new(ClockState {
                    now: time,
                    sleeps: Vec::new(),
                })),
            }
        }

        /// Move time forward without recording a sleep
        ///
        /// # Panics
        ///
        /// Panics if the internal lock is poisoned
        #[allow(clippy::unwrap_used)]
        pub fn advance(&self, duration: Duration) {
            let mut state = self.state.lock().unwrap();
            state.now += to_chrono(duration);
        }

        /// Every duration passed to `sleep`, in call order
        ///
        /// # Panics
        ///
        /// Panics if the internal lock is poisoned
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn sleeps(&self) -> Vec<Duration> {
            self.state.lock().unwrap().sleeps.clone()
        }
    }

    #[allow(clippy::unwrap_used)]
    #[async_trait]
    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.state.lock().unwrap().now
        }

        async fn sleep(&self, duration: Duration) {
            let mut state = self.state.lock().unwrap();
            state.now += to_chrono(duration);
            state.sleeps.push(duration);
        }
    }

    fn to_chrono(duration: Duration) -> chrono::Duration {
        chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
    }

    /// Create a default manual clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> ManualClock {
        ManualClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Install a test-friendly tracing subscriber
///
/// Safe to call from every test; only the first call takes effect.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("slack_lists=debug")),
        )
        .with_test_writer()
        .try_init();
}
