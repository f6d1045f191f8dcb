use url::Url;

use crate::config::ProviderConfig;
use crate::error::Error;
use crate::pkce::{create_code_challenge, CodeChallengeMethod};

/// Build the authorization URL the user should be redirected to (step 1
/// of the authorization-code flow).
///
/// Query parameters: `response_type=code`, `client_id`, `redirect_uri`,
/// plus `state` when supplied and `scope` when the list is non-empty
/// (joined per the provider's [`ScopeDelimiter`]
/// (crate::ScopeDelimiter)).
///
/// Pure function: no I/O, no side effects.
pub fn build_authorization_url(
    config: &ProviderConfig,
    callback_uri: &str,
    state: Option<&str>,
    scopes: &[String],
) -> Result<Url, Error> {
    if callback_uri.is_empty() {
        return Err(Error::invalid_argument("callback_uri", "must not be empty"));
    }

    let mut url = Url::parse(&config.authorization_endpoint).map_err(|_| {
        Error::invalid_argument("authorization_endpoint", "is not a valid URL")
    })?;

    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", callback_uri);

    if let Some(state) = state {
        url.query_pairs_mut().append_pair("state", state);
    }

    if !scopes.is_empty() {
        url.query_pairs_mut()
            .append_pair("scope", &config.scope_delimiter.join(scopes));
    }

    Ok(url)
}

/// Same as [`build_authorization_url`] with PKCE parameters appended:
/// `code_challenge` and `code_challenge_method`.
pub fn build_authorization_url_with_pkce(
    config: &ProviderConfig,
    callback_uri: &str,
    state: Option<&str>,
    scopes: &[String],
    method: CodeChallengeMethod,
    code_verifier: &str,
) -> Result<Url, Error> {
    let mut url = build_authorization_url(config, callback_uri, state, scopes)?;

    let code_challenge = create_code_challenge(code_verifier, method);
    url.query_pairs_mut()
        .append_pair("code_challenge", &code_challenge)
        .append_pair("code_challenge_method", method.as_str());

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScopeDelimiter;
    use crate::mapping::ProfileMapping;

    fn config() -> ProviderConfig {
        ProviderConfig {
            id: "acme".into(),
            client_id: "my-client".into(),
            client_secret: "secret".into(),
            scopes: vec!["openid".into(), "email".into()],
            authorization_endpoint: "https://acme.test/authorize".into(),
            token_endpoint: "https://acme.test/token".into(),
            user_info_endpoint: "https://acme.test/userinfo".into(),
            revocation_endpoint: None,
            scope_delimiter: ScopeDelimiter::Space,
            token_placement: Default::default(),
            client_auth: Default::default(),
            profile: ProfileMapping {
                id: "id".into(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn url_carries_standard_parameters() {
        let config = config();
        let url = build_authorization_url(
            &config,
            "https://app.test/callback",
            Some("random-state"),
            &config.scopes,
        )
        .unwrap();

        assert_eq!(url.host_str(), Some("acme.test"));
        assert_eq!(url.path(), "/authorize");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("client_id".into(), "my-client".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "https://app.test/callback".into())));
        assert!(pairs.contains(&("state".into(), "random-state".into())));
        assert!(pairs.contains(&("scope".into(), "openid email".into())));
    }

    #[test]
    fn parameters_round_trip_through_encoding() {
        // redirect_uri with characters that need escaping must decode back
        let config = config();
        let callback = "https://app.test/cb?next=/home&lang=en";
        let url = build_authorization_url(&config, callback, Some("st/4+2="), &config.scopes)
            .unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("redirect_uri".into(), callback.into())));
        assert!(pairs.contains(&("state".into(), "st/4+2=".into())));
        assert!(pairs.contains(&("scope".into(), "openid email".into())));
    }

    #[test]
    fn empty_callback_is_rejected() {
        let config = config();
        let err = build_authorization_url(&config, "", None, &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument {
                name: "callback_uri",
                ..
            }
        ));
    }

    #[test]
    fn state_and_scope_are_optional() {
        let config = config();
        let url = build_authorization_url(&config, "https://app.test/cb", None, &[]).unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(!pairs.iter().any(|(k, _)| k == "state"));
        assert!(!pairs.iter().any(|(k, _)| k == "scope"));
    }

    #[test]
    fn comma_delimited_scopes() {
        let mut config = config();
        config.scope_delimiter = ScopeDelimiter::Comma;
        config.scopes = vec!["email".into(), "public_profile".into()];

        let url = build_authorization_url(&config, "https://app.test/cb", None, &config.scopes)
            .unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("scope".into(), "email,public_profile".into())));
    }

    #[test]
    fn unparseable_endpoint_is_rejected() {
        let mut config = config();
        config.authorization_endpoint = "not a url".into();
        let err = build_authorization_url(&config, "https://app.test/cb", None, &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument {
                name: "authorization_endpoint",
                ..
            }
        ));
    }

    #[test]
    fn pkce_parameters_appended() {
        let config = config();
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        let url = build_authorization_url_with_pkce(
            &config,
            "https://app.test/cb",
            Some("st"),
            &config.scopes,
            CodeChallengeMethod::S256,
            verifier,
        )
        .unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&(
            "code_challenge".into(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM".into()
        )));
        assert!(pairs.contains(&("code_challenge_method".into(), "S256".into())));
        // base parameters survive
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("state".into(), "st".into())));
    }
}
