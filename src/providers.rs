//! Shipped vendor presets. Each function returns plain configuration
//! data; the flow logic is identical for every provider. Hosts with a
//! vendor not listed here can build a [`ProviderConfig`] by hand or
//! deserialize one from their own settings.

use crate::config::{ClientAuth, ProviderConfig, ScopeDelimiter, TokenPlacement};
use crate::mapping::ProfileMapping;
use crate::oauth1::OAuth1Config;

/// OAuth 2.0 preset for [Google](https://developers.google.com/identity/protocols/oauth2).
///
/// Space-separated scopes, bearer-header userinfo, revocation supported.
/// Pair with [`OAuth2Flow::with_pkce`](crate::OAuth2Flow::with_pkce):
/// Google recommends S256 PKCE on all authorization requests.
pub fn google(client_id: impl Into<String>, client_secret: impl Into<String>) -> ProviderConfig {
    ProviderConfig {
        id: "google".into(),
        client_id: client_id.into(),
        client_secret: client_secret.into(),
        scopes: vec!["openid".into(), "email".into(), "profile".into()],
        authorization_endpoint: "https://accounts.google.com/o/oauth2/v2/auth".into(),
        token_endpoint: "https://oauth2.googleapis.com/token".into(),
        user_info_endpoint: "https://openidconnect.googleapis.com/v1/userinfo".into(),
        revocation_endpoint: Some("https://oauth2.googleapis.com/revoke".into()),
        scope_delimiter: ScopeDelimiter::Space,
        token_placement: TokenPlacement::BearerHeader,
        client_auth: ClientAuth::Body,
        profile: ProfileMapping {
            id: "sub".into(),
            name: Some("name".into()),
            email: Some("email".into()),
            locale: Some("locale".into()),
            picture_url: Some("picture".into()),
            ..Default::default()
        },
    }
}

/// OAuth 2.0 preset for [Facebook](https://developers.facebook.com/docs/facebook-login).
///
/// Comma-separated scopes, access token as a query parameter, numeric
/// user ids, nested picture payload.
pub fn facebook(client_id: impl Into<String>, client_secret: impl Into<String>) -> ProviderConfig {
    ProviderConfig {
        id: "facebook".into(),
        client_id: client_id.into(),
        client_secret: client_secret.into(),
        scopes: vec!["email".into(), "public_profile".into()],
        authorization_endpoint: "https://www.facebook.com/v19.0/dialog/oauth".into(),
        token_endpoint: "https://graph.facebook.com/v19.0/oauth/access_token".into(),
        user_info_endpoint:
            "https://graph.facebook.com/me?fields=id,name,email,picture,gender,locale".into(),
        revocation_endpoint: None,
        scope_delimiter: ScopeDelimiter::Comma,
        token_placement: TokenPlacement::QueryParam("access_token".into()),
        client_auth: ClientAuth::Body,
        profile: ProfileMapping {
            id: "id".into(),
            name: Some("name".into()),
            email: Some("email".into()),
            locale: Some("locale".into()),
            picture_url: Some("picture.data.url".into()),
            gender: Some("gender".into()),
            ..Default::default()
        },
    }
}

/// OAuth 2.0 preset for [LinkedIn](https://learn.microsoft.com/linkedin/shared/authentication/authorization-code-flow)
/// using the OpenID Connect userinfo endpoint.
pub fn linkedin(client_id: impl Into<String>, client_secret: impl Into<String>) -> ProviderConfig {
    ProviderConfig {
        id: "linkedin".into(),
        client_id: client_id.into(),
        client_secret: client_secret.into(),
        scopes: vec!["openid".into(), "profile".into(), "email".into()],
        authorization_endpoint: "https://www.linkedin.com/oauth/v2/authorization".into(),
        token_endpoint: "https://www.linkedin.com/oauth/v2/accessToken".into(),
        user_info_endpoint: "https://api.linkedin.com/v2/userinfo".into(),
        revocation_endpoint: Some("https://www.linkedin.com/oauth/v2/revoke".into()),
        scope_delimiter: ScopeDelimiter::Space,
        token_placement: TokenPlacement::BearerHeader,
        client_auth: ClientAuth::Body,
        profile: ProfileMapping {
            id: "sub".into(),
            name: Some("name".into()),
            email: Some("email".into()),
            locale: Some("locale".into()),
            picture_url: Some("picture".into()),
            ..Default::default()
        },
    }
}

/// OAuth 2.0 preset for [Microsoft](https://learn.microsoft.com/entra/identity-platform/v2-oauth2-auth-code-flow)
/// (Entra ID, `common` tenant). Profile comes from Microsoft Graph.
pub fn microsoft(client_id: impl Into<String>, client_secret: impl Into<String>) -> ProviderConfig {
    ProviderConfig {
        id: "microsoft".into(),
        client_id: client_id.into(),
        client_secret: client_secret.into(),
        scopes: vec!["openid".into(), "email".into(), "profile".into(), "User.Read".into()],
        authorization_endpoint:
            "https://login.microsoftonline.com/common/oauth2/v2.0/authorize".into(),
        token_endpoint: "https://login.microsoftonline.com/common/oauth2/v2.0/token".into(),
        user_info_endpoint: "https://graph.microsoft.com/v1.0/me".into(),
        revocation_endpoint: None,
        scope_delimiter: ScopeDelimiter::Space,
        token_placement: TokenPlacement::BearerHeader,
        client_auth: ClientAuth::Body,
        profile: ProfileMapping {
            id: "id".into(),
            name: Some("displayName".into()),
            email: Some("mail".into()),
            locale: Some("preferredLanguage".into()),
            user_name: Some("userPrincipalName".into()),
            ..Default::default()
        },
    }
}

/// OAuth 1.0a preset for [Twitter](https://developer.x.com/en/docs/authentication/oauth-1-0a)
/// (sign-in with the three-legged flow; HMAC-SHA1 signing).
pub fn twitter(
    consumer_key: impl Into<String>,
    consumer_secret: impl Into<String>,
) -> OAuth1Config {
    OAuth1Config {
        id: "twitter".into(),
        consumer_key: consumer_key.into(),
        consumer_secret: consumer_secret.into(),
        request_token_endpoint: "https://api.twitter.com/oauth/request_token".into(),
        authorize_endpoint: "https://api.twitter.com/oauth/authenticate".into(),
        access_token_endpoint: "https://api.twitter.com/oauth/access_token".into(),
        user_info_endpoint:
            "https://api.twitter.com/1.1/account/verify_credentials.json?include_email=true"
                .into(),
        profile: ProfileMapping {
            id: "id_str".into(),
            name: Some("name".into()),
            email: Some("email".into()),
            user_name: Some("screen_name".into()),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_preset_shape() {
        let config = google("cid", "sec");
        assert_eq!(config.id, "google");
        assert_eq!(config.scope_delimiter, ScopeDelimiter::Space);
        assert_eq!(config.token_placement, TokenPlacement::BearerHeader);
        assert!(config.revocation_endpoint.is_some());
        assert_eq!(config.profile.id, "sub");
    }

    #[test]
    fn facebook_uses_comma_scopes_and_query_token() {
        let config = facebook("cid", "sec");
        assert_eq!(config.scope_delimiter, ScopeDelimiter::Comma);
        assert_eq!(
            config.token_placement,
            TokenPlacement::QueryParam("access_token".into())
        );
        assert_eq!(config.profile.picture_url.as_deref(), Some("picture.data.url"));
    }

    #[test]
    fn twitter_preset_maps_screen_name() {
        let config = twitter("ck", "cs");
        assert_eq!(config.id, "twitter");
        assert_eq!(config.profile.id, "id_str");
        assert_eq!(config.profile.user_name.as_deref(), Some("screen_name"));
    }

    #[test]
    fn presets_serialize_round_trip() {
        let config = microsoft("cid", "sec");
        let json = serde_json::to_string(&config).unwrap();
        let back: ProviderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "microsoft");
        assert_eq!(back.profile.name.as_deref(), Some("displayName"));
    }
}
