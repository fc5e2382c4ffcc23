//! BizNest marketplace REST backend.
//!
//! - `domain`: entities and status enums
//! - `application`: ports, use cases and pure services
//! - `infrastructure`: Postgres, disk storage and mail adapters
//! - `presentation`: axum routers and handlers
//! - `bootstrap`: config, service wiring and the admin seed

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
