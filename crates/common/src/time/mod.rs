//! Time abstractions
//!
//! - **[`clock`]**: monotonic clock trait with real and mock implementations
//! - **[`format`]**: human-readable duration formatting for log lines
//!
//! ```rust
//! use std::time::Duration;
//!
//! use convointel_common::time::{format_duration, Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(3665));
//!
//! assert_eq!(format_duration(clock.now() - start), "1h 1m 5s");
//! ```

pub mod clock;
pub mod format;

pub use clock::{Clock, MockClock, SystemClock};
pub use format::format_duration;
