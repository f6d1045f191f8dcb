use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::state::mint_url_safe_token;

/// PKCE code challenge method (RFC 7636).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeChallengeMethod {
    S256,
    Plain,
}

impl CodeChallengeMethod {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            CodeChallengeMethod::S256 => "S256",
            CodeChallengeMethod::Plain => "plain",
        }
    }
}

/// Generate a cryptographically random code verifier (43 base64url
/// chars, same minting as [`generate_state`](crate::generate_state)).
pub fn generate_code_verifier() -> String {
    mint_url_safe_token()
}

/// Derive the code challenge from a verifier.
/// - S256: SHA-256 hash of verifier, base64url-encoded without padding.
/// - Plain: the verifier itself.
pub fn create_code_challenge(verifier: &str, method: CodeChallengeMethod) -> String {
    match method {
        CodeChallengeMethod::S256 => {
            let hash = Sha256::digest(verifier.as_bytes());
            URL_SAFE_NO_PAD.encode(hash)
        }
        CodeChallengeMethod::Plain => verifier.to_string(),
    }
}
