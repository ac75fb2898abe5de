//! Caller identity forwarded by the gateway.

use std::collections::HashMap;

pub const USER_ID: &str = "x-user-id";
pub const USER_ROLE: &str = "x-user-role";
pub const TENANT_ID: &str = "x-tenant-id";

/// Keys a session is built from. Anything else a caller sends is dropped.
pub const SESSION_KEYS: [&str; 3] = [USER_ID, USER_ROLE, TENANT_ID];

/// The verified claims of the caller.
///
/// The gateway that authenticates the caller forwards them as headers:
///
/// ```json
/// {
///   "x-user-id": "65a1b2c3d4e5f60718293a4b",
///   "x-user-role": "admin",
///   "x-tenant-id": "acme"
/// }
/// ```
///
/// Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
    role: Option<String>,
    tenant_id: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs; keys match case-insensitively and
    /// unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut session = Self::new();
        for (key, value) in pairs {
            session.set(key.as_ref(), value);
        }
        session
    }

    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self::from_pairs(variables)
    }

    /// Session for a user, as tests and internal callers build it.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self::new().with(USER_ID, user_id)
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// The caller's company. Tenant-scoped reports only see its documents.
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    /// Returns false when `key` is not a session key.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let slot = if key.eq_ignore_ascii_case(USER_ID) {
            &mut self.user_id
        } else if key.eq_ignore_ascii_case(USER_ROLE) {
            &mut self.role
        } else if key.eq_ignore_ascii_case(TENANT_ID) {
            &mut self.tenant_id
        } else {
            return false;
        };
        let value = value.into();
        *slot = (!value.trim().is_empty()).then_some(value);
        true
    }
}
