//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate JSON bodies into domain drafts, resolve the caller via
//! the extractors in [`auth`], and render domain records as view structs.

pub mod acknowledgement;
pub mod admin;
pub mod announcements;
pub mod auth;
pub mod bills;
pub mod citizen;
pub mod complaints;
pub mod error;
pub mod health;
pub mod login;
pub mod notifications;
pub mod payments;
pub mod routes;
pub mod schemas;
pub mod service_requests;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
