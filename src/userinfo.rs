use tracing::{debug, warn};
use url::Url;

use crate::config::{ProviderConfig, TokenPlacement};
use crate::error::Error;
use crate::http::{HttpClient, HttpRequest};
use crate::mapping::UserInformation;
use crate::token::AccessToken;

/// Fetch the authenticated user's profile and project it into the
/// normalized record (step 3 of the flow).
///
/// Issues one GET to the provider's userinfo endpoint. The access token
/// travels as a `Authorization: Bearer` header or a query parameter per
/// the provider's [`TokenPlacement`]. The response must be HTTP 200 with
/// a JSON body in which the mapped id path resolves to a usable value;
/// anything else is a [`Error::ProviderProtocol`].
pub async fn fetch_user_info(
    config: &ProviderConfig,
    http_client: &(impl HttpClient + ?Sized),
    access_token: &AccessToken,
) -> Result<UserInformation, Error> {
    if access_token.token.is_empty() {
        return Err(Error::invalid_argument("access_token", "must not be empty"));
    }

    let mut url = Url::parse(&config.user_info_endpoint).map_err(|_| {
        Error::invalid_argument("user_info_endpoint", "is not a valid URL")
    })?;

    let mut request = match &config.token_placement {
        TokenPlacement::BearerHeader => HttpRequest::get(url)
            .header("Authorization", format!("Bearer {}", access_token.token)),
        TokenPlacement::QueryParam(name) => {
            url.query_pairs_mut().append_pair(name, &access_token.token);
            HttpRequest::get(url)
        }
    };
    request = request
        .header("Accept", "application/json")
        .header("User-Agent", "tundra-oauth");

    debug!(provider = %config.id, "fetching user profile");
    let response = http_client
        .send(request)
        .await
        .map_err(|e| Error::transport(&config.id, e))?;

    if response.status != 200 {
        warn!(provider = %config.id, status = response.status, "profile fetch failed");
        return Err(Error::protocol_response(
            &config.id,
            "userinfo endpoint returned a non-success status",
            response.status,
            &response.body,
        ));
    }

    let payload: serde_json::Value = serde_json::from_slice(&response.body).map_err(|_| {
        Error::protocol_response(
            &config.id,
            "userinfo endpoint returned a non-JSON body",
            response.status,
            &response.body,
        )
    })?;

    config.profile.project(&payload).ok_or_else(|| {
        Error::protocol_response(
            &config.id,
            "profile payload is missing the provider user id",
            response.status,
            &response.body,
        )
    })
}
