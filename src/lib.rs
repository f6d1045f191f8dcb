//! Data-driven OAuth 2.0 and OAuth 1.0a login flows.
//!
//! One generic authorization-code flow, parameterized by a per-vendor
//! [`ProviderConfig`] (endpoints, scope joining, token placement, profile
//! field mapping), produces a normalized [`UserInformation`] record plus
//! an [`AccessToken`]. Vendor differences are configuration data, not
//! code; ready-made presets live in [`providers`].
//!
//! ```no_run
//! use tundra_oauth::{default_client, generate_state, providers, OAuth2Flow};
//!
//! # async fn example() -> Result<(), tundra_oauth::Error> {
//! let config = providers::google("client-id", "client-secret");
//! let http = default_client();
//!
//! // Step 1: redirect the user. Store `state` in the session.
//! let state = generate_state();
//! let mut flow = OAuth2Flow::new(&config, http, "https://example.com/callback");
//! let redirect = flow.start(Some(&state))?;
//!
//! // Steps 2 + 3: in the callback handler, after checking `state`.
//! let params = tundra_oauth::parse_callback_query("code=...&state=...");
//! let login = flow.complete_callback(&params).await?;
//! println!("logged in: {} ({})", login.user.id, login.user.name.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

mod authorize;
mod config;
mod error;
mod exchange;
mod flow;
mod http;
mod mapping;
mod oauth1;
mod pkce;
pub mod providers;
mod state;
mod token;
mod userinfo;

// Core OAuth2 flow
pub use authorize::{build_authorization_url, build_authorization_url_with_pkce};
pub use config::{ClientAuth, ProviderConfig, ScopeDelimiter, TokenPlacement};
pub use error::Error;
pub use exchange::{exchange_authorization_code, refresh_access_token, revoke_token};
pub use flow::{parse_callback_query, FlowStage, Login, OAuth2Flow};
pub use http::{HttpClient, HttpRequest, HttpResponse, Method};
pub use mapping::{Gender, ProfileMapping, UserInformation};
pub use token::AccessToken;
pub use userinfo::fetch_user_info;

// OAuth 1.0a flow
pub use oauth1::{OAuth1Config, OAuth1Flow, OAuth1Login, OAuth1Token, RequestToken};

// Utilities
pub use pkce::{create_code_challenge, generate_code_verifier, CodeChallengeMethod};
pub use state::generate_state;

// Default HTTP client (behind feature flag)
#[cfg(feature = "reqwest-client")]
pub use http::{default_client, ReqwestClient};
