use std::time::{Duration, SystemTime};

use base64::Engine;
use tracing::{debug, warn};

use crate::config::{ClientAuth, ProviderConfig};
use crate::error::Error;
use crate::http::{HttpClient, HttpRequest};
use crate::token::AccessToken;

/// Build a form-encoded POST request with the standard OAuth2 headers.
fn form_request(endpoint: &str, body: &[(String, String)]) -> HttpRequest {
    let encoded_body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(body)
        .finish();

    let mut request = HttpRequest::post(endpoint)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Accept", "application/json")
        .header("User-Agent", "tundra-oauth");
    request.body = encoded_body.into_bytes();
    request
}

/// Encode client credentials as an HTTP Basic auth header value:
/// `Basic <base64(client_id:client_secret)>`.
pub(crate) fn encode_basic_credentials(client_id: &str, client_secret: &str) -> String {
    let credentials = format!("{client_id}:{client_secret}");
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
    format!("Basic {encoded}")
}

/// Attach client credentials per the provider's [`ClientAuth`] convention.
fn apply_client_auth(config: &ProviderConfig, body: &mut Vec<(String, String)>) -> Option<String> {
    match config.client_auth {
        ClientAuth::Body => {
            body.push(("client_id".to_string(), config.client_id.clone()));
            body.push(("client_secret".to_string(), config.client_secret.clone()));
            None
        }
        ClientAuth::BasicHeader => Some(encode_basic_credentials(
            &config.client_id,
            &config.client_secret,
        )),
    }
}

/// Exchange an authorization code for an access token (step 2 of the
/// flow).
///
/// Issues one form-encoded POST to the provider's token endpoint with
/// `grant_type=authorization_code`. The response must be HTTP 200 with a
/// JSON body carrying a non-empty `access_token`, a positive `expires_in`
/// and a non-empty `token_type`; anything else is a
/// [`Error::ProviderProtocol`]. Transport failures are wrapped, never
/// surfaced raw.
pub async fn exchange_authorization_code(
    config: &ProviderConfig,
    http_client: &(impl HttpClient + ?Sized),
    code: &str,
    redirect_uri: &str,
    code_verifier: Option<&str>,
) -> Result<AccessToken, Error> {
    if code.is_empty() {
        return Err(Error::invalid_argument("code", "must not be empty"));
    }
    if redirect_uri.is_empty() {
        return Err(Error::invalid_argument("redirect_uri", "must not be empty"));
    }

    let mut body = vec![
        ("grant_type".to_string(), "authorization_code".to_string()),
        ("code".to_string(), code.to_string()),
        ("redirect_uri".to_string(), redirect_uri.to_string()),
    ];

    if let Some(verifier) = code_verifier {
        body.push(("code_verifier".to_string(), verifier.to_string()));
    }

    let basic = apply_client_auth(config, &mut body);
    let mut request = form_request(&config.token_endpoint, &body);
    if let Some(credentials) = basic {
        request = request.header("Authorization", credentials);
    }

    debug!(provider = %config.id, "exchanging authorization code");
    send_token_request(config, http_client, request).await
}

/// Obtain a fresh access token from a refresh token
/// (`grant_type=refresh_token`). Same response validation as the code
/// exchange.
pub async fn refresh_access_token(
    config: &ProviderConfig,
    http_client: &(impl HttpClient + ?Sized),
    refresh_token: &str,
) -> Result<AccessToken, Error> {
    if refresh_token.is_empty() {
        return Err(Error::invalid_argument("refresh_token", "must not be empty"));
    }

    let mut body = vec![
        ("grant_type".to_string(), "refresh_token".to_string()),
        ("refresh_token".to_string(), refresh_token.to_string()),
    ];

    let basic = apply_client_auth(config, &mut body);
    let mut request = form_request(&config.token_endpoint, &body);
    if let Some(credentials) = basic {
        request = request.header("Authorization", credentials);
    }

    debug!(provider = %config.id, "refreshing access token");
    send_token_request(config, http_client, request).await
}

/// Revoke a token (RFC 7009) against the provider's revocation endpoint.
/// Fails with [`Error::InvalidArgument`] when the config has none.
pub async fn revoke_token(
    config: &ProviderConfig,
    http_client: &(impl HttpClient + ?Sized),
    token: &str,
) -> Result<(), Error> {
    if token.is_empty() {
        return Err(Error::invalid_argument("token", "must not be empty"));
    }
    let Some(endpoint) = config.revocation_endpoint.as_deref() else {
        return Err(Error::invalid_argument(
            "revocation_endpoint",
            "provider has no revocation endpoint configured",
        ));
    };

    let mut body = vec![("token".to_string(), token.to_string())];
    let basic = apply_client_auth(config, &mut body);
    let mut request = form_request(endpoint, &body);
    if let Some(credentials) = basic {
        request = request.header("Authorization", credentials);
    }

    debug!(provider = %config.id, "revoking token");
    let response = http_client
        .send(request)
        .await
        .map_err(|e| Error::transport(&config.id, e))?;

    match response.status {
        200 => Ok(()),
        status => Err(Error::protocol_response(
            &config.id,
            "revocation endpoint returned a non-success status",
            status,
            &response.body,
        )),
    }
}

/// Send a token-endpoint request and validate the response shape.
async fn send_token_request(
    config: &ProviderConfig,
    http_client: &(impl HttpClient + ?Sized),
    request: HttpRequest,
) -> Result<AccessToken, Error> {
    let response = http_client
        .send(request)
        .await
        .map_err(|e| Error::transport(&config.id, e))?;

    if response.status != 200 {
        // 400/401 usually carry RFC 6749 Section 5.2 error JSON; surface
        // the vendor error code in the reason when present.
        let reason = match serde_json::from_slice::<serde_json::Value>(&response.body) {
            Ok(json) => match json.get("error").and_then(|e| e.as_str()) {
                Some(code) => format!("token endpoint returned error `{code}`"),
                None => "token endpoint returned a non-success status".to_string(),
            },
            Err(_) => "token endpoint returned a non-success status".to_string(),
        };
        warn!(provider = %config.id, status = response.status, "token exchange failed");
        return Err(Error::protocol_response(
            &config.id,
            reason,
            response.status,
            &response.body,
        ));
    }

    let json: serde_json::Value = serde_json::from_slice(&response.body).map_err(|_| {
        Error::protocol_response(
            &config.id,
            "token endpoint returned a non-JSON body",
            response.status,
            &response.body,
        )
    })?;

    parse_token_response(config, &json, &response.body)
}

fn parse_token_response(
    config: &ProviderConfig,
    json: &serde_json::Value,
    raw_body: &[u8],
) -> Result<AccessToken, Error> {
    let missing = |field: &str| {
        Error::protocol_response(
            &config.id,
            format!("token response is missing a usable `{field}`"),
            200,
            raw_body,
        )
    };

    let token = json
        .get("access_token")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing("access_token"))?;

    let token_type = json
        .get("token_type")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing("token_type"))?;

    let expires_in = json
        .get("expires_in")
        .and_then(|v| v.as_u64())
        .filter(|&secs| secs > 0)
        .ok_or_else(|| missing("expires_in"))?;

    // expires_in may be absurdly large; overflow is a payload violation
    let expires_at = SystemTime::now()
        .checked_add(Duration::from_secs(expires_in))
        .ok_or_else(|| {
            Error::protocol_response(
                &config.id,
                "token response carries an unusable `expires_in`",
                200,
                raw_body,
            )
        })?;

    let refresh_token = json
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from);

    Ok(AccessToken {
        token: token.to_string(),
        token_type: token_type.to_string(),
        expires_at: Some(expires_at),
        refresh_token,
    })
}
