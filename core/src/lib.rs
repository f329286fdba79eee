//! # Slack Lists Core
//!
//! Domain logic behind the Slack Lists tools.
//!
//! ## Modules
//!
//! - [`model`]: item requests, typed field values and submission results
//! - [`sequencer`]: paced, sequential bulk creation
//! - [`record`]: string-rendered view of items
//! - [`filter`]: case-insensitive column predicates
//! - [`export`]: JSON and CSV rendering
//! - [`service`]: the seam to Slack
//! - [`environment`]: injected time
//!
//! ## Example
//!
//! ```ignore
//! use slack_lists_core::*;
//!
//! let sequencer = BulkSubmissionSequencer::new(service, Arc::new(SystemClock));
//! let results = sequencer
//!     .submit("F1234ABCD", vec![Ok(ListItemRequest::new("Write docs"))], pacing_delay(1.2)?)
//!     .await;
//! ```

pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod record;
pub mod sequencer;
pub mod service;

pub use error::ListsError;
pub use export::{ExportFormat, escape_csv_field, render};
pub use filter::{FilterOperator, FilterPredicate, filter_records, matches};
pub use model::{
    FieldData, FieldInput, FieldType, FieldValue, ListItemRequest, RejectedItem, SubmissionResult,
};
pub use record::{Record, field_text, item_record};
pub use sequencer::{BulkSubmissionSequencer, DEFAULT_RATE_LIMIT_DELAY_SECS, pacing_delay};
pub use service::{CollectedItems, ListService, collect_items};

/// Environment module - injected dependencies
pub mod environment {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::time::Duration;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - real time
    /// let clock = SystemClock;
    ///
    /// // Test - time only moves when the code under test sleeps
    /// let clock = test_clock();
    /// ```
    #[async_trait]
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// Wait for `duration`
        async fn sleep(&self, duration: Duration);
    }

    /// Wall-clock time backed by tokio timers
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    #[async_trait]
    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }

        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }
    }
}

pub use environment::{Clock, SystemClock};
