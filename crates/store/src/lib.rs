//! Pinned-result bookkeeping for the launcher
//!
//! Users can pin a result so it always ranks first for the exact query text
//! they typed. [`TopMostStore`] keeps those pins and answers, for each freshly
//! produced candidate, whether it is the pinned one; the [`equality`] module
//! decides what "the same result" means when titles carry volatile text.
//!
//! # Example
//!
//! ```
//! use launchpin_core::{EqualityPattern, LaunchResult, Query};
//! use launchpin_store::TopMostStore;
//!
//! let store = TopMostStore::new();
//! store.add_or_update(&LaunchResult::new("Build #12", "ci").with_origin_query(Query::new("b")));
//!
//! let live = LaunchResult::new("Build #12 (3 new)", "ci")
//!     .with_origin_query(Query::new("b"))
//!     .with_title_pattern(EqualityPattern::new(r"^Build #(\d+)")?);
//! assert!(store.is_top_most(&live));
//! # Ok::<(), launchpin_core::Error>(())
//! ```

pub mod equality;
mod error;
mod record;
mod top_most;

pub use equality::{FieldComparison, FieldMatch, field_equal, record_equal};
pub use error::{Error, Result};
pub use record::{Record, RecordMap, TopMostData};
pub use top_most::{TOP_MOST_SCORE, TopMostStore};
