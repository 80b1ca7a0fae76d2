//! Command handlers grouped by dashboard.

pub(crate) mod auth;
pub(crate) mod orders;
pub(crate) mod products;
