// Network intent controller API
//
// Token auth, template-programmer projects and templates, template
// deployment, device inventory + sync, and generic task status.

mod auth;
mod client;
mod deploy;
mod devices;
pub mod models;
mod projects;
mod tasks;
mod templates;

pub use client::IntentClient;

/// System API root; hosts the token endpoint.
pub(crate) const SYSTEM_V1: &str = "dna/system/api/v1";
/// Intent API root.
pub(crate) const INTENT_V1: &str = "dna/intent/api/v1";
/// Template programmer root (projects, templates, deploy).
pub(crate) const TEMPLATE_PROGRAMMER: &str = "dna/intent/api/v1/template-programmer";
