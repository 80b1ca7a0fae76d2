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
//! Shared HTTP DTOs for the Agrimart storefront API.
//!
//! The storefront backend is an external service; these types pin down the
//! JSON shapes the console sends and accepts so the route guard and the
//! dashboards agree on one contract. Field names follow the backend's
//! camelCase convention through serde renames.

pub mod auth;
pub mod orders;
pub mod products;

use serde::{Deserialize, Serialize};

pub use auth::{LoginRequest, LoginResponse, Role, UserRecord, VerifyResponse};
pub use orders::{
    CustomOrderCreated, CustomOrderRequest, Measurements, Order, OrderListResponse,
    OrderStatusUpdate, PaymentMethod, PaymentStatus, PaymentSuccessUpdate,
};
pub use products::{Product, ProductDraft, ProductListResponse, split_list};

/// Error document returned by the backend on failed mutations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// Human-readable failure message.
    pub message: String,
}
