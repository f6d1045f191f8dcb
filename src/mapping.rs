use serde::{Deserialize, Serialize};

/// Gender as reported by the provider. Anything the vendor does not report
/// as a recognizable male/female string maps to `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Case-insensitive parse of a vendor gender string.
    pub fn from_provider_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("male") => Gender::Male,
            Some(v) if v.eq_ignore_ascii_case("female") => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

/// Normalized identity record, the terminal output of a login flow.
/// `id` is always present; every other field depends on what the vendor
/// exposes and which scopes were granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInformation {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub locale: Option<String>,
    pub picture_url: Option<String>,
    pub user_name: Option<String>,
    pub gender: Gender,
}

/// Per-provider table mapping normalized fields to dotted JSON paths in the
/// vendor's profile payload (e.g. `"picture.data.url"` for Facebook's nested
/// picture object). This is the only place vendor field names appear; the
/// fetch logic itself is shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMapping {
    /// Path to the provider-assigned user id. Required.
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl ProfileMapping {
    /// Project a vendor profile payload into the normalized record.
    /// Returns `None` when the id path is absent or resolves to an empty
    /// string, which callers must treat as a protocol violation.
    pub fn project(&self, payload: &serde_json::Value) -> Option<UserInformation> {
        let id = extract_string(payload, &self.id)?;

        let field = |path: &Option<String>| {
            path.as_deref()
                .and_then(|p| extract_string(payload, p))
        };

        let gender = Gender::from_provider_value(field(&self.gender).as_deref());

        Some(UserInformation {
            id,
            name: field(&self.name),
            email: field(&self.email),
            locale: field(&self.locale),
            picture_url: field(&self.picture_url),
            user_name: field(&self.user_name),
            gender,
        })
    }
}

/// Navigate a dotted path and coerce the leaf to a non-empty string.
/// Numeric ids (Facebook, VK) are stringified; empty strings count as
/// missing.
fn extract_string(payload: &serde_json::Value, path: &str) -> Option<String> {
    let value = path
        .split('.')
        .try_fold(payload, |v, key| v.get(key))?;

    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
