//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository ports are implemented over `diesel-async` with `bb8`
//! connection pooling. Row structs (`models.rs`) and the table definitions
//! (`schema.rs`) stay internal; adapters translate them to domain records
//! and map database failures onto the port error types.
//!
//! # Example
//!
//! ```ignore
//! use suvidha::outbound::persistence::{DbPool, DieselBillRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/suvidha")).await?;
//! let bills = DieselBillRepository::new(pool);
//! ```

mod diesel_admin_repository;
mod diesel_announcement_repository;
mod diesel_bill_repository;
mod diesel_casework_repository;
mod diesel_citizen_repository;
mod diesel_dashboard_repository;
mod diesel_notification_repository;
mod diesel_otp_repository;
mod diesel_payment_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_admin_repository::DieselAdminRepository;
pub use diesel_announcement_repository::DieselAnnouncementRepository;
pub use diesel_bill_repository::DieselBillRepository;
pub use diesel_casework_repository::{DieselComplaintRepository, DieselServiceRequestRepository};
pub use diesel_citizen_repository::DieselCitizenRepository;
pub use diesel_dashboard_repository::DieselDashboardRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_otp_repository::DieselOtpRepository;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
