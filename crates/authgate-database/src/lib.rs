//! # authgate-database
//!
//! PostgreSQL persistence for AuthGate. Repositories wrap every query in an
//! injected circuit breaker so a struggling database fails fast instead of
//! dragging down request latency.

pub mod connection;
mod guard;
pub mod migration;
pub mod repositories;

pub use repositories::policy::PolicyRepository;
pub use repositories::user::UserRepository;
