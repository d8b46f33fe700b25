//! Structured logging
//!
//! Every engine command and query is bracketed by boundary events
//! (`start`, then `end` or `end_error`) carrying the operation name and its
//! duration. The binary calls [`init`] once; tests install the in-memory
//! layer from [`test_capture`] and assert on the captured events.
//!
//! ```rust
//! use vertrack_core::logging_facility::{init, Profile};
//!
//! init(Profile::Test);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
