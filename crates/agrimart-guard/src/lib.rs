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
#![allow(clippy::module_name_repetitions)]
//! Route access guard for the Agrimart console.
//!
//! A protected view activates the guard with an optional required role. The
//! guard reads the cached credential pair from a [`CredentialStore`],
//! confirms the token with a [`Verifier`] and resolves to exactly one
//! [`AccessDecision`]: the view is rendered for a granted identity, every
//! denial redirects to the login view.

pub mod cancel;
pub mod decision;
pub mod error;
pub mod guard;
pub mod store;
pub mod verify;
pub mod view;

pub use cancel::CancelFlag;
pub use decision::{AccessDecision, DenyReason, IdentitySource};
pub use error::{StoreError, StoreResult, VerifyError};
pub use guard::{DEFAULT_VERIFY_TIMEOUT, GuardPhase, GuardSettings, RouteGuard};
pub use store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredCredential, TOKEN_KEY,
    USER_KEY,
};
pub use verify::{HttpVerifier, Verifier, join_api_path};
pub use view::{ViewOutcome, guard_view};
