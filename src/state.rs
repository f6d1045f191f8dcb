use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;

/// 32 random bytes, base64url-encoded without padding (43 chars). The
/// common mint for `state` values and PKCE code verifiers.
pub(crate) fn mint_url_safe_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a cryptographically random `state` parameter for CSRF
/// protection. Correlating the echoed value on the callback is the
/// caller's job.
pub fn generate_state() -> String {
    mint_url_safe_token()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_is_43_base64url_characters() {
        let state = generate_state();
        assert_eq!(state.len(), 43);
        assert!(
            state
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "state contains invalid characters: {state}"
        );
    }

    #[test]
    fn successive_states_differ() {
        assert_ne!(generate_state(), generate_state());
    }
}
