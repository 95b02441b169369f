//! Donor records and the identity of the current visitor.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create a new time-sortable user ID.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Who is making the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserContext {
    Anonymous,
    Authenticated(UserId),
}

impl UserContext {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, UserContext::Anonymous)
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            UserContext::Anonymous => None,
            UserContext::Authenticated(id) => Some(*id),
        }
    }
}

/// Meta keys stored alongside the core donor columns.
pub mod meta {
    pub const COMPANY: &str = "donor_company";
    pub const ADDRESS: &str = "donor_address";
    pub const ADDRESS_2: &str = "donor_address_2";
    pub const CITY: &str = "donor_city";
    pub const STATE: &str = "donor_state";
    pub const POSTCODE: &str = "donor_postcode";
    pub const COUNTRY: &str = "donor_country";
    pub const PHONE: &str = "donor_phone";
    pub const TWITTER: &str = "twitter";
    pub const FACEBOOK: &str = "facebook";
}

/// A donor's profile record.
///
/// Core identity columns plus a free-form string meta map. Missing meta keys
/// read as the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    /// `None` for the placeholder donor of an anonymous visitor.
    pub user_id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donor {
    /// Create a donor for a newly registered user.
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: Some(user_id),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            meta: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// An all-empty donor for visitors without a session.
    pub fn anonymous() -> Self {
        let now = Utc::now();
        Self {
            user_id: None,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            meta: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Read a meta value, or `""` when unset.
    pub fn get(&self, key: &str) -> &str {
        self.meta.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.insert(key.into(), value.into());
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Request to register a new donor.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDonorRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}
