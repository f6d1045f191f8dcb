use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tundra_oauth::{ProfileMapping, ProviderConfig};

/// A mock identity provider built on `wiremock`. Simulates the token,
/// userinfo and revocation endpoints (and the OAuth1 credential
/// endpoints) with configurable behavior.
pub struct MockProvider {
    server: MockServer,
}

impl MockProvider {
    /// Start a new mock server on a random available port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the mock server (e.g. "http://127.0.0.1:PORT").
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// A `ProviderConfig` whose endpoints all point at this server, with
    /// a plain id/name/email profile mapping. Tests tweak fields as
    /// needed.
    pub fn config(&self) -> ProviderConfig {
        let base = self.url();
        ProviderConfig {
            id: "mock".into(),
            client_id: "test-client-id".into(),
            client_secret: "test-client-secret".into(),
            scopes: vec!["openid".into(), "email".into()],
            authorization_endpoint: format!("{base}/authorize"),
            token_endpoint: format!("{base}/token"),
            user_info_endpoint: format!("{base}/userinfo"),
            revocation_endpoint: Some(format!("{base}/revoke")),
            scope_delimiter: Default::default(),
            token_placement: Default::default(),
            client_auth: Default::default(),
            profile: ProfileMapping {
                id: "id".into(),
                name: Some("name".into()),
                email: Some("email".into()),
                gender: Some("gender".into()),
                ..Default::default()
            },
        }
    }

    /// `POST /token` returns HTTP 200 with the given JSON body.
    pub async fn mock_token_success(&self, response: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response))
            .mount(&self.server)
            .await;
    }

    /// `POST /token` returns the given non-success HTTP status.
    pub async fn mock_token_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// `GET /userinfo` returns HTTP 200 with the given JSON body.
    pub async fn mock_userinfo_success(&self, response: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response))
            .mount(&self.server)
            .await;
    }

    /// `GET /userinfo` returns the given non-success HTTP status.
    pub async fn mock_userinfo_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// `POST /revoke` returns HTTP 200 with an empty body.
    pub async fn mock_revocation_success(&self) {
        Mock::given(method("POST"))
            .and(path("/revoke"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.server)
            .await;
    }

    /// OAuth1 `POST /oauth/request_token` and `POST /oauth/access_token`
    /// returning form-urlencoded credential bodies, plus
    /// `GET /oauth/verify` returning the given profile JSON.
    pub async fn mock_oauth1_endpoints(
        &self,
        request_token_body: &str,
        access_token_body: &str,
        profile: serde_json::Value,
    ) {
        Mock::given(method("POST"))
            .and(path("/oauth/request_token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(request_token_body.to_string()),
            )
            .mount(&self.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(access_token_body.to_string()))
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/oauth/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&profile))
            .mount(&self.server)
            .await;
    }

    /// All requests the server has received so far.
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .expect("request recording enabled")
    }

    /// Number of requests the server has received so far.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .expect("request recording enabled")
            .len()
    }

    /// Assert that the most recent `POST /token` request body contained
    /// the expected form-urlencoded parameters.
    pub async fn verify_token_request(&self, expected_params: &[(&str, &str)]) {
        let requests = self
            .server
            .received_requests()
            .await
            .expect("request recording enabled");
        let last = requests
            .iter()
            .filter(|r| r.url.path() == "/token")
            .next_back()
            .expect("expected at least one token request");
        let body_str = String::from_utf8(last.body.clone()).expect("body should be UTF-8");
        let parsed: Vec<(String, String)> = url::form_urlencoded::parse(body_str.as_bytes())
            .into_owned()
            .collect();

        for (key, value) in expected_params {
            let found = parsed.iter().any(|(k, v)| k == key && v == value);
            assert!(
                found,
                "expected form param {}={} in request body, got: {}",
                key, value, body_str
            );
        }
    }

    /// Assert that the most recent `POST /token` request carried Basic
    /// auth with the expected credentials.
    pub async fn verify_basic_auth(&self, client_id: &str, client_secret: &str) {
        use base64::Engine;
        let requests = self
            .server
            .received_requests()
            .await
            .expect("request recording enabled");
        let last = requests.last().expect("expected at least one request");
        let auth_header = last
            .headers
            .get("authorization")
            .expect("expected Authorization header");
        let expected_credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", client_id, client_secret));
        let expected = format!("Basic {}", expected_credentials);
        assert_eq!(
            auth_header.to_str().unwrap(),
            expected,
            "Basic auth credentials mismatch"
        );
    }
}
