//! Request middleware.
//!
//! Authentication is not middleware: handlers opt in through the session
//! extractors in `inbound::http::auth`. Only request correlation lives here.

pub mod trace;

pub use trace::Trace;
