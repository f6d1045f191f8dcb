use serde::{Deserialize, Serialize};

use crate::mapping::ProfileMapping;

/// How a provider expects multiple scopes joined in the authorization URL.
/// Most vendors follow RFC 6749 and use spaces; a few (historically
/// Facebook, VK) expect commas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeDelimiter {
    #[default]
    Space,
    Comma,
}

impl ScopeDelimiter {
    pub(crate) fn join(self, scopes: &[String]) -> String {
        match self {
            ScopeDelimiter::Space => scopes.join(" "),
            ScopeDelimiter::Comma => scopes.join(","),
        }
    }
}

/// How the access token travels on the userinfo request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPlacement {
    /// `Authorization: Bearer <token>` header.
    #[default]
    BearerHeader,
    /// Query parameter with the given name (e.g. Facebook's
    /// `access_token`).
    QueryParam(String),
}

/// How client credentials travel on token-endpoint requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuth {
    /// `client_id` and `client_secret` in the form body.
    #[default]
    Body,
    /// RFC 6749 Section 2.3.1 Basic auth header; credentials are then
    /// omitted from the body.
    BasicHeader,
}

/// Static per-vendor settings. Built once (usually from a preset in
/// [`providers`](crate::providers) or deserialized from host configuration)
/// and treated as immutable for the provider's lifetime; flows only ever
/// borrow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Short provider identifier (e.g. "google"). Travels structurally in
    /// every error and log event.
    pub id: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub user_info_endpoint: String,
    /// RFC 7009 revocation endpoint, where the vendor offers one.
    #[serde(default)]
    pub revocation_endpoint: Option<String>,
    #[serde(default)]
    pub scope_delimiter: ScopeDelimiter,
    #[serde(default)]
    pub token_placement: TokenPlacement,
    #[serde(default)]
    pub client_auth: ClientAuth,
    /// Vendor field names for the profile payload.
    pub profile: ProfileMapping,
}
