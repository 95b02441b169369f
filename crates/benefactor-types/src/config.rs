//! Global configuration types for Benefactor.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls nonce
//! lifetime, page chrome, and operator-defined changes to the profile form.

use serde::{Deserialize, Serialize};

use crate::field::{FieldOption, FieldType, ProfileSection};

/// Top-level configuration for the Benefactor service.
///
/// Loaded from `~/.benefactor/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Site name shown in page titles.
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Lifetime of a form nonce in seconds. A nonce is accepted for up to
    /// this long after it was issued, and at least half of it.
    #[serde(default = "default_nonce_lifetime_secs")]
    pub nonce_lifetime_secs: u64,

    /// Target of the login form embedded in the donation page.
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Changes applied to the built-in profile fields.
    #[serde(default)]
    pub field_overrides: Vec<FieldOverride>,
}

fn default_site_name() -> String {
    "Benefactor".to_string()
}

fn default_nonce_lifetime_secs() -> u64 {
    86_400
}

fn default_login_url() -> String {
    "/login".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            nonce_lifetime_secs: default_nonce_lifetime_secs(),
            login_url: default_login_url(),
            field_overrides: Vec::new(),
        }
    }
}

/// An operator-defined change to one field of a profile section.
///
/// - `remove = true` drops the field.
/// - Otherwise, if the field exists, each provided attribute replaces the
///   built-in one.
/// - Otherwise a new field is added; `label` is required in that case.
///
/// A field only becomes a select when it ends up with options, either its
/// own or the ones given here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldOverride {
    pub section: ProfileSection,
    pub key: String,
    #[serde(default)]
    pub remove: bool,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    pub priority: Option<i32>,
    pub required: Option<bool>,
    pub options: Option<Vec<FieldOption>>,
}
