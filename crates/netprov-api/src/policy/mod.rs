// Policy controller API (external RESTful services)
//
// Basic auth on every request; endpoint groups and endpoints.

mod client;
mod endpoints;
pub mod models;

pub use client::PolicyClient;

/// ERS configuration root.
pub(crate) const ERS_CONFIG: &str = "ers/config";
