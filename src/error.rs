/// Longest response-body excerpt carried inside an error.
const BODY_SNIPPET_LIMIT: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller supplied malformed or missing input (local precondition
    /// violation, no network traffic happened).
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: &'static str },

    /// The end user or the provider rejected the authorization request.
    /// `code` is the vendor error string from the callback (e.g.
    /// `access_denied`).
    #[error("{provider}: authorization denied ({code})")]
    AuthorizationDenied {
        provider: String,
        code: String,
        description: Option<String>,
    },

    /// The callback query string carried neither a `code` nor an `error`
    /// parameter.
    #[error("{provider}: callback did not include an authorization code")]
    MissingAuthorizationCode { provider: String },

    /// Talking to the provider failed: non-success HTTP status, a payload
    /// that does not have the expected shape, or a transport failure.
    /// Carries enough context for diagnostic logging by the caller.
    #[error("{provider}: {reason}")]
    ProviderProtocol {
        provider: String,
        reason: String,
        status: Option<u16>,
        body: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    pub(crate) fn invalid_argument(name: &'static str, reason: &'static str) -> Self {
        Error::InvalidArgument { name, reason }
    }

    /// Protocol violation with no HTTP context (e.g. an endpoint URL that
    /// does not parse).
    pub(crate) fn protocol(provider: &str, reason: impl Into<String>) -> Self {
        Error::ProviderProtocol {
            provider: provider.to_string(),
            reason: reason.into(),
            status: None,
            body: None,
            source: None,
        }
    }

    /// Protocol violation tied to an HTTP response. The body is kept as a
    /// lossy UTF-8 snippet.
    pub(crate) fn protocol_response(
        provider: &str,
        reason: impl Into<String>,
        status: u16,
        body: &[u8],
    ) -> Self {
        Error::ProviderProtocol {
            provider: provider.to_string(),
            reason: reason.into(),
            status: Some(status),
            body: Some(body_snippet(body)),
            source: None,
        }
    }

    /// Transport failure (DNS, TLS, timeout) from the HTTP client.
    pub(crate) fn transport(
        provider: &str,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Error::ProviderProtocol {
            provider: provider.to_string(),
            reason: "transport failure".to_string(),
            status: None,
            body: None,
            source: Some(source),
        }
    }
}

fn body_snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= BODY_SNIPPET_LIMIT {
        text.into_owned()
    } else {
        let mut end = BODY_SNIPPET_LIMIT;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text[..end].to_string()
    }
}
