//! Retry control for sharded reads.
//!
//! The read loop is driven by two injected collaborators so that it can run
//! without wall-clock delay in tests:
//!
//! - [`BackOff`] - a stateful sequence of wait intervals ending in a stop signal
//! - [`Sleeper`] - whatever "wait this long" means for the caller
//!
//! # Architecture
//!
//! ```text
//!   ┌──────────────┐  attempt fails   ┌──────────────┐  Some(d)  ┌──────────┐
//!   │  Attempting  │─────────────────▶│ next_backoff │──────────▶│ sleep(d) │
//!   └──────────────┘                  └──────────────┘           └────┬─────┘
//!      │      ▲                              │ None                   │
//!      │ ok   └──────────────────────────────┼────────────────────────┘
//!      ▼                                     ▼
//!   Succeeded                            Exhausted (Unavailable)
//! ```

mod backoff;
mod controller;
mod sleeper;

pub use backoff::{BackOff, BackOffConfig, ExponentialBackOff};
pub use controller::RetryController;
pub use sleeper::{Sleeper, ThreadSleeper};
