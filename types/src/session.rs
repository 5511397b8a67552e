use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::error::{Field, FieldErrors, Result};

pub const SESSION_COOKIE_NAME: &str = "staffdesk_session";

/// `status` the profile form redirects with after a successful save.
pub const PROFILE_SAVED: &str = "saved";

const USERNAME_TOO_SHORT: &str = "Username needs at least 5 characters.";
const PASSWORD_EMPTY: &str = "Password must not be empty.";
const DISPLAY_NAME_TOO_SHORT: &str = "Display name needs at least 5 characters.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub username: String,
    pub display_name: String,
}

impl UserSession {
    pub fn initial(&self) -> String {
        self.display_name
            .chars()
            .next()
            .unwrap_or('?')
            .to_uppercase()
            .to_string()
    }
}

/// Login form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.username.trim().chars().count() < 5 {
            errors.add(Field::Username, USERNAME_TOO_SHORT);
        }
        if self.password.is_empty() {
            errors.add(Field::Password, PASSWORD_EMPTY);
        }
        errors.into_result()
    }
}

/// Profile form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: String,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<String> {
        let name = self.display_name.trim();
        if name.chars().count() < 5 {
            let mut errors = FieldErrors::new();
            errors.add(Field::DisplayName, DISPLAY_NAME_TOO_SHORT);
            return Err(crate::Error::validation(errors));
        }
        Ok(name.to_string())
    }
}

/// Why a login or profile form was sent back, carried as a short code in the
/// redirect query (`/login?error=credentials`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    Credentials,
    Invalid(Field),
    Expired,
}

impl AuthFailure {
    /// Pick the failure to report for a rejected form.
    pub fn from_error(error: &crate::Error) -> Self {
        error
            .field_errors()
            .and_then(|fields| fields.iter().next())
            .map(|(field, _)| Self::Invalid(field))
            .unwrap_or(Self::Credentials)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::Expired => "expired",
            Self::Invalid(Field::Username) => "username",
            Self::Invalid(Field::Password) => "password",
            Self::Invalid(Field::DisplayName) => "display_name",
            Self::Invalid(_) => "invalid",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "credentials" => Self::Credentials,
            "expired" => Self::Expired,
            "username" => Self::Invalid(Field::Username),
            "password" => Self::Invalid(Field::Password),
            "display_name" => Self::Invalid(Field::DisplayName),
            "invalid" => Self::Invalid(Field::Name),
            _ => return None,
        })
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Credentials => "Invalid username or password.",
            Self::Expired => "Your session has expired. Please log in again.",
            Self::Invalid(Field::Username) => USERNAME_TOO_SHORT,
            Self::Invalid(Field::Password) => PASSWORD_EMPTY,
            Self::Invalid(Field::DisplayName) => DISPLAY_NAME_TOO_SHORT,
            Self::Invalid(_) => "The form contains invalid values.",
        }
    }
}

pub fn encode_session(session: &UserSession) -> Result<String> {
    let json = serde_json::to_string(session).context("failed to serialize session")?;
    Ok(URL_SAFE_NO_PAD.encode(json.as_bytes()))
}

pub fn decode_session(encoded: &str) -> Result<UserSession> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .context("failed to decode base64")?;
    let json = String::from_utf8(bytes).context("invalid UTF-8 in session")?;
    Ok(serde_json::from_str::<UserSession>(&json).context("failed to parse session JSON")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_roundtrip() {
        let session = UserSession {
            username: "Admin".into(),
            display_name: "Admin Kantor".into(),
        };

        let encoded = encode_session(&session).unwrap();
        assert!(!encoded.contains('='));
        assert_eq!(decode_session(&encoded).unwrap(), session);
        assert_eq!(session.initial(), "A");
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_session("not base64!").is_err());
        assert!(decode_session(&URL_SAFE_NO_PAD.encode(b"{}")).is_err());
    }

    #[test]
    fn test_credentials_rules() {
        let short = Credentials {
            username: "adm".into(),
            password: String::new(),
        };
        let error = short.validate().unwrap_err();
        let fields = error.field_errors().unwrap();
        assert!(fields.get(Field::Username).is_some());
        assert!(fields.get(Field::Password).is_some());

        let ok = Credentials {
            username: "Admin".into(),
            password: "admin".into(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_profile_name_is_trimmed() {
        let update = ProfileUpdate {
            display_name: "  Budi Setiawan ".into(),
        };
        assert_eq!(update.validate().unwrap(), "Budi Setiawan");
        assert!(ProfileUpdate::default().validate().is_err());
    }

    #[test]
    fn test_auth_failure_codes() {
        let error = Credentials::default().validate().unwrap_err();
        let failure = AuthFailure::from_error(&error);
        assert_eq!(failure, AuthFailure::Invalid(Field::Username));
        assert_eq!(AuthFailure::from_code(failure.code()), Some(failure));

        let failure = AuthFailure::from_error(&crate::Error::unauthorized("nope"));
        assert_eq!(failure, AuthFailure::Credentials);
        assert_eq!(failure.message(), "Invalid username or password.");

        assert_eq!(AuthFailure::from_code("bogus"), None);
    }
}
