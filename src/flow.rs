use tracing::debug;
use url::Url;

use crate::authorize::{build_authorization_url, build_authorization_url_with_pkce};
use crate::config::ProviderConfig;
use crate::error::Error;
use crate::exchange::exchange_authorization_code;
use crate::http::HttpClient;
use crate::mapping::UserInformation;
use crate::pkce::CodeChallengeMethod;
use crate::token::AccessToken;
use crate::userinfo::fetch_user_info;

/// Progress of a login attempt through the authorization-code flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    AwaitingCode,
    ExchangingToken,
    FetchingProfile,
    Complete,
    Failed,
}

/// Terminal output of a successful flow: the normalized identity record
/// plus the access token, both owned by the caller from here on.
#[derive(Debug, Clone)]
pub struct Login {
    pub user: UserInformation,
    pub token: AccessToken,
}

/// One login attempt against one provider.
///
/// A flow instance is single-use: construct it when the login starts,
/// call [`start`](OAuth2Flow::start) to obtain the redirect URL, then
/// [`complete_callback`](OAuth2Flow::complete_callback) with the query
/// parameters the provider sent back. Intermediate state (the PKCE
/// verifier) never leaks across instances, and a finished flow refuses
/// reuse.
///
/// There is no retry at any step: the first failure records
/// [`FlowStage::Failed`] and surfaces the error to the caller, who
/// decides whether to restart from step 1.
pub struct OAuth2Flow<'a, C: HttpClient> {
    config: &'a ProviderConfig,
    http_client: &'a C,
    callback_uri: String,
    stage: FlowStage,
    code_verifier: Option<String>,
}

impl<'a, C: HttpClient> OAuth2Flow<'a, C> {
    pub fn new(
        config: &'a ProviderConfig,
        http_client: &'a C,
        callback_uri: impl Into<String>,
    ) -> Self {
        Self {
            config,
            http_client,
            callback_uri: callback_uri.into(),
            stage: FlowStage::AwaitingCode,
            code_verifier: None,
        }
    }

    /// Enable PKCE (S256) for this attempt. The challenge goes into the
    /// authorization URL and the verifier into the token exchange.
    pub fn with_pkce(mut self, code_verifier: impl Into<String>) -> Self {
        self.code_verifier = Some(code_verifier.into());
        self
    }

    pub fn stage(&self) -> FlowStage {
        self.stage
    }

    /// Step 1: build the authorization URL. No network call.
    pub fn start(&self, state: Option<&str>) -> Result<Url, Error> {
        match &self.code_verifier {
            Some(verifier) => build_authorization_url_with_pkce(
                self.config,
                &self.callback_uri,
                state,
                &self.config.scopes,
                CodeChallengeMethod::S256,
                verifier,
            ),
            None => build_authorization_url(
                self.config,
                &self.callback_uri,
                state,
                &self.config.scopes,
            ),
        }
    }

    /// Steps 2 and 3: interpret the provider's callback, exchange the
    /// code for a token and fetch the normalized profile.
    ///
    /// `query_params` are the callback query-string pairs exactly as
    /// received; [`parse_callback_query`] converts a raw query string.
    /// A non-empty `error` parameter fails with
    /// [`Error::AuthorizationDenied`] before any HTTP call; a missing
    /// `code` fails with [`Error::MissingAuthorizationCode`].
    pub async fn complete_callback(
        &mut self,
        query_params: &[(String, String)],
    ) -> Result<Login, Error> {
        if self.stage != FlowStage::AwaitingCode {
            return Err(Error::invalid_argument(
                "flow",
                "flow instance already finished; start a new attempt",
            ));
        }

        match self.run_callback(query_params).await {
            Ok(login) => {
                self.stage = FlowStage::Complete;
                Ok(login)
            }
            Err(err) => {
                self.stage = FlowStage::Failed;
                Err(err)
            }
        }
    }

    async fn run_callback(
        &mut self,
        query_params: &[(String, String)],
    ) -> Result<Login, Error> {
        let lookup = |key: &str| {
            query_params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        if let Some(error) = lookup("error").filter(|e| !e.is_empty()) {
            debug!(provider = %self.config.id, error, "provider denied authorization");
            return Err(Error::AuthorizationDenied {
                provider: self.config.id.clone(),
                code: error.to_string(),
                description: lookup("error_description")
                    .filter(|d| !d.is_empty())
                    .map(String::from),
            });
        }

        let Some(code) = lookup("code").filter(|c| !c.is_empty()) else {
            return Err(Error::MissingAuthorizationCode {
                provider: self.config.id.clone(),
            });
        };

        self.stage = FlowStage::ExchangingToken;
        let token = exchange_authorization_code(
            self.config,
            self.http_client,
            code,
            &self.callback_uri,
            self.code_verifier.as_deref(),
        )
        .await?;

        self.stage = FlowStage::FetchingProfile;
        let user = fetch_user_info(self.config, self.http_client, &token).await?;

        debug!(provider = %self.config.id, user_id = %user.id, "login complete");
        Ok(Login { user, token })
    }
}

/// Split a raw callback query string (without the leading `?`) into
/// decoded key/value pairs for [`OAuth2Flow::complete_callback`].
pub fn parse_callback_query(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
