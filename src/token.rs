use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Bearer credential produced by the token exchange and consumed
/// immediately by the userinfo fetch. Never persisted by this crate.
///
/// Construction goes through [`exchange_authorization_code`]
/// (crate::exchange_authorization_code), which guarantees the token string
/// is non-empty and came from a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub token_type: String,
    /// Computed as receipt time plus the vendor's `expires_in`.
    pub expires_at: Option<SystemTime>,
    /// Present when the vendor issued one; feed it to
    /// [`refresh_access_token`](crate::refresh_access_token).
    pub refresh_token: Option<String>,
}

impl AccessToken {
    /// Whether the token is past its computed expiry. Tokens without an
    /// expiry are treated as unexpired.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => SystemTime::now() >= at,
            None => false,
        }
    }
}
