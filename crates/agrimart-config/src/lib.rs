#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Layered configuration for the Agrimart console.
//!
//! Layout: `model.rs` (typed config and document forms), `defaults.rs`
//! (default endpoints and limits), `validate.rs` (parsing helpers),
//! `loader.rs` (defaults → JSON document → environment → overrides).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load, load_with_env};
pub use model::{ConfigDocument, ConfigOverrides, ConsoleConfig};
