//! Bidirectional key/module registry for structured JSON dispatch.
//! This crate is the single source of truth for the binding invariants.

pub mod logging;
pub mod module;
pub mod registry;

pub use logging::{default_log_level, init_logging, logging_status};
pub use module::fn_module::FnModule;
pub use module::handle::ModuleHandle;
pub use module::listeners::{LifecycleListener, LifecycleListeners};
pub use module::KeyModule;
pub use registry::core::{Mosaique, ParseError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
