//! SUVIDHA citizen-services backend.
//!
//! Hexagonal layout: [`domain`] holds records, services and ports;
//! [`inbound`] adapts HTTP requests onto the driving ports; [`outbound`]
//! implements the driven ports over PostgreSQL, an in-process store and the
//! credential adapters.

pub mod composition;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
pub use settings::{AuthStrategy, OtpMode, Settings};
