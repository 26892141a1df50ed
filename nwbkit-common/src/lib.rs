//! # nwbkit Common
//!
//! Foundational pieces shared by every nwbkit crate: the error severity
//! classification used by the schema, config, and entity error types, and a
//! small helper for rendering structured values inside log lines.
//!
//! ## Modules
//!
//! - [`error`] - [`ErrorSeverity`] and the [`Severity`] trait
//! - [`logging`] - [`Pretty`] wrapper for YAML rendering in `tracing` output

pub mod error;
pub mod logging;

pub use error::{ErrorSeverity, Severity};
pub use logging::Pretty;
