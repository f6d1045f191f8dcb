//! OAuth 1.0a three-legged flow (Twitter-style): request token →
//! user authorization → verifier → access token, with HMAC-SHA1 request
//! signing. A distinct protocol from the OAuth2 authorization-code flow;
//! only the final [`UserInformation`] normalization is shared.

mod signature;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::http::{HttpClient, HttpRequest, Method};
use crate::mapping::{ProfileMapping, UserInformation};
use signature::{authorization_header, nonce, sign, timestamp};

/// Static per-vendor settings for an OAuth 1.0a provider. Same
/// immutability contract as [`ProviderConfig`](crate::ProviderConfig).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuth1Config {
    pub id: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub request_token_endpoint: String,
    pub authorize_endpoint: String,
    pub access_token_endpoint: String,
    pub user_info_endpoint: String,
    pub profile: ProfileMapping,
}

/// Temporary credential from the request-token step. Both halves are
/// needed to sign the access-token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    pub token: String,
    pub secret: String,
}

/// Long-lived OAuth1 credential. Unlike OAuth2 bearer tokens the secret
/// is part of the credential and is returned to the caller; this crate
/// still never persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth1Token {
    pub token: String,
    pub secret: String,
}

/// Terminal output of a successful OAuth1 flow.
#[derive(Debug, Clone)]
pub struct OAuth1Login {
    pub user: UserInformation,
    pub token: OAuth1Token,
}

/// One OAuth 1.0a login attempt. Single-use, like
/// [`OAuth2Flow`](crate::OAuth2Flow): [`start`](OAuth1Flow::start)
/// obtains the temporary credential and the redirect URL (this step does
/// hit the network, unlike OAuth2), then
/// [`complete_callback`](OAuth1Flow::complete_callback) turns the
/// verifier into an access token and the normalized profile.
pub struct OAuth1Flow<'a, C: HttpClient> {
    config: &'a OAuth1Config,
    http_client: &'a C,
    callback_uri: String,
    request_token: Option<RequestToken>,
    finished: bool,
}

impl<'a, C: HttpClient> OAuth1Flow<'a, C> {
    pub fn new(
        config: &'a OAuth1Config,
        http_client: &'a C,
        callback_uri: impl Into<String>,
    ) -> Self {
        Self {
            config,
            http_client,
            callback_uri: callback_uri.into(),
            request_token: None,
            finished: false,
        }
    }

    /// Fetch a request token and build the authorization URL for the
    /// redirect.
    pub async fn start(&mut self) -> Result<Url, Error> {
        if self.callback_uri.is_empty() {
            return Err(Error::invalid_argument("callback_uri", "must not be empty"));
        }
        if self.finished || self.request_token.is_some() {
            return Err(Error::invalid_argument(
                "flow",
                "flow instance already used; start a new attempt",
            ));
        }

        let extra = vec![("oauth_callback".to_string(), self.callback_uri.clone())];
        let request = self.signed_request(
            Method::Post,
            &self.config.request_token_endpoint,
            extra,
            None,
        )?;

        debug!(provider = %self.config.id, "fetching request token");
        let (token, secret) = self
            .send_credential_request(request, "request token endpoint")
            .await?;

        let mut url = Url::parse(&self.config.authorize_endpoint).map_err(|_| {
            Error::invalid_argument("authorize_endpoint", "is not a valid URL")
        })?;
        url.query_pairs_mut().append_pair("oauth_token", &token);

        self.request_token = Some(RequestToken { token, secret });
        Ok(url)
    }

    /// Interpret the provider's callback: exchange the verifier for an
    /// access token, then fetch and normalize the profile.
    ///
    /// A `denied` parameter fails with [`Error::AuthorizationDenied`]
    /// before any HTTP call; a missing `oauth_verifier` fails with
    /// [`Error::MissingAuthorizationCode`].
    pub async fn complete_callback(
        &mut self,
        query_params: &[(String, String)],
    ) -> Result<OAuth1Login, Error> {
        if self.finished {
            return Err(Error::invalid_argument(
                "flow",
                "flow instance already finished; start a new attempt",
            ));
        }
        let Some(request_token) = self.request_token.clone() else {
            return Err(Error::invalid_argument(
                "flow",
                "start must be called before complete_callback",
            ));
        };

        match self.run_callback(&request_token, query_params).await {
            Ok(login) => {
                self.finished = true;
                Ok(login)
            }
            Err(err) => {
                self.finished = true;
                Err(err)
            }
        }
    }

    async fn run_callback(
        &self,
        request_token: &RequestToken,
        query_params: &[(String, String)],
    ) -> Result<OAuth1Login, Error> {
        let lookup = |key: &str| {
            query_params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        if lookup("denied").filter(|d| !d.is_empty()).is_some() {
            debug!(provider = %self.config.id, "user denied authorization");
            return Err(Error::AuthorizationDenied {
                provider: self.config.id.clone(),
                code: "denied".to_string(),
                description: None,
            });
        }

        let Some(verifier) = lookup("oauth_verifier").filter(|v| !v.is_empty()) else {
            return Err(Error::MissingAuthorizationCode {
                provider: self.config.id.clone(),
            });
        };

        if let Some(echoed) = lookup("oauth_token") {
            if echoed != request_token.token {
                return Err(Error::protocol(
                    &self.config.id,
                    "callback oauth_token does not match the request token",
                ));
            }
        }

        let extra = vec![("oauth_verifier".to_string(), verifier.to_string())];
        let request = self.signed_request(
            Method::Post,
            &self.config.access_token_endpoint,
            extra,
            Some((&request_token.token, &request_token.secret)),
        )?;

        debug!(provider = %self.config.id, "exchanging verifier for access token");
        let (token, secret) = self
            .send_credential_request(request, "access token endpoint")
            .await?;
        let access = OAuth1Token { token, secret };

        let user = self.fetch_user_info(&access).await?;
        debug!(provider = %self.config.id, user_id = %user.id, "login complete");

        Ok(OAuth1Login { user, token: access })
    }

    async fn fetch_user_info(&self, access: &OAuth1Token) -> Result<UserInformation, Error> {
        let request = self.signed_request(
            Method::Get,
            &self.config.user_info_endpoint,
            Vec::new(),
            Some((&access.token, &access.secret)),
        )?;

        let response = self
            .http_client
            .send(request)
            .await
            .map_err(|e| Error::transport(&self.config.id, e))?;

        if response.status != 200 {
            warn!(provider = %self.config.id, status = response.status, "profile fetch failed");
            return Err(Error::protocol_response(
                &self.config.id,
                "userinfo endpoint returned a non-success status",
                response.status,
                &response.body,
            ));
        }

        let payload: serde_json::Value =
            serde_json::from_slice(&response.body).map_err(|_| {
                Error::protocol_response(
                    &self.config.id,
                    "userinfo endpoint returned a non-JSON body",
                    response.status,
                    &response.body,
                )
            })?;

        self.config.profile.project(&payload).ok_or_else(|| {
            Error::protocol_response(
                &self.config.id,
                "profile payload is missing the provider user id",
                response.status,
                &response.body,
            )
        })
    }

    /// Build a request carrying a signed `OAuth` Authorization header.
    /// Query parameters of the endpoint URL participate in the signature
    /// base string per RFC 5849 Section 3.4.1.3.
    fn signed_request(
        &self,
        method: Method,
        endpoint: &str,
        extra_oauth: Vec<(String, String)>,
        token: Option<(&str, &str)>,
    ) -> Result<HttpRequest, Error> {
        let url = Url::parse(endpoint)
            .map_err(|_| Error::invalid_argument("endpoint", "is not a valid URL"))?;

        let mut base_url = url.clone();
        base_url.set_query(None);
        base_url.set_fragment(None);

        let mut oauth_params = vec![
            (
                "oauth_consumer_key".to_string(),
                self.config.consumer_key.clone(),
            ),
            ("oauth_nonce".to_string(), nonce()),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];
        if let Some((token_value, _)) = token {
            oauth_params.push(("oauth_token".to_string(), token_value.to_string()));
        }
        oauth_params.extend(extra_oauth);

        let mut signed_params = oauth_params.clone();
        signed_params.extend(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())));

        let method_str = match method {
            Method::Get => "GET",
            Method::Post => "POST",
        };
        let signature_value = sign(
            method_str,
            base_url.as_str(),
            &signed_params,
            &self.config.consumer_secret,
            token.map(|(_, secret)| secret),
        );
        oauth_params.push(("oauth_signature".to_string(), signature_value));

        let request = match method {
            Method::Get => HttpRequest::get(url),
            Method::Post => HttpRequest::post(url),
        };
        Ok(request
            .header("Authorization", authorization_header(&oauth_params))
            .header("Accept", "application/json")
            .header("User-Agent", "tundra-oauth"))
    }

    /// Send a token-credential request and parse the form-urlencoded
    /// `oauth_token`/`oauth_token_secret` response.
    async fn send_credential_request(
        &self,
        request: HttpRequest,
        endpoint_name: &str,
    ) -> Result<(String, String), Error> {
        let response = self
            .http_client
            .send(request)
            .await
            .map_err(|e| Error::transport(&self.config.id, e))?;

        if response.status != 200 {
            warn!(provider = %self.config.id, status = response.status, "credential request failed");
            return Err(Error::protocol_response(
                &self.config.id,
                format!("{endpoint_name} returned a non-success status"),
                response.status,
                &response.body,
            ));
        }

        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(&response.body)
            .into_owned()
            .collect();
        let field = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .filter(|v| !v.is_empty())
        };

        match (field("oauth_token"), field("oauth_token_secret")) {
            (Some(token), Some(secret)) => Ok((token, secret)),
            _ => Err(Error::protocol_response(
                &self.config.id,
                format!("{endpoint_name} response is missing token credentials"),
                response.status,
                &response.body,
            )),
        }
    }
}
