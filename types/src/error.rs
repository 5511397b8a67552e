use std::collections::BTreeMap;
use std::fmt;

use dioxus::prelude::ServerFnError;
use serde::{Deserialize, Serialize};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Build an internal [`Error`] from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from($crate::internal_anyhow_dont_use!($($arg)*))
    };
}

/// A form field that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Phone,
    Position,
    Division,
    Image,
    Username,
    Password,
    DisplayName,
}

/// Per-field validation messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message wins.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(self))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum ErrorKind {
    Validation(FieldErrors),
    Query,
    NotFound,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    /// The HTTP status the kind maps to on the wire.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation(_) => 422,
            ErrorKind::Query => 502,
            ErrorKind::NotFound => 404,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Internal => 500,
        }
    }
}

/// A serializable error for client rendering.
///
/// When `RUST_BACKTRACE=1` is set, internal errors include the full backtrace
/// in their message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(fields: FieldErrors) -> Self {
        let message = match fields.len() {
            1 => "1 field is invalid".to_string(),
            n => format!("{n} fields are invalid"),
        };
        Self::new(ErrorKind::Validation(fields), message)
    }

    pub fn not_found(what: impl fmt::Display) -> Self {
        Self::new(ErrorKind::NotFound, format!("{what} not found"))
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Query, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match &self.kind {
            ErrorKind::Validation(fields) => Some(fields),
            _ => None,
        }
    }

    /// Recover the error that a server function failed with.
    ///
    /// Errors raised by the framework itself (transport, decoding) become
    /// [`ErrorKind::Query`].
    pub fn from_server_error(err: &ServerFnError) -> Self {
        match err {
            ServerFnError::ServerError {
                message, details, ..
            } => {
                let kind = details
                    .as_ref()
                    .and_then(|d| serde_json::from_value::<ErrorKind>(d.clone()).ok())
                    .unwrap_or(ErrorKind::Internal);
                Self::new(kind, message.clone())
            }
            other => Self::query(other.to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl<E> From<E> for Error
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        // The Debug representation includes the error chain and backtrace
        Self::new(ErrorKind::Internal, format!("{:?}", error.into()))
    }
}

impl From<Error> for ServerFnError {
    fn from(error: Error) -> Self {
        ServerFnError::ServerError {
            code: error.kind.status_code(),
            details: serde_json::to_value(&error.kind).ok(),
            message: error.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_field_message_wins() {
        let mut fields = FieldErrors::new();
        fields.add(Field::Name, "too short");
        fields.add(Field::Name, "ignored");

        assert_eq!(fields.get(Field::Name), Some("too short"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_empty_field_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_server_error_keeps_field_errors() {
        let mut fields = FieldErrors::new();
        fields.add(Field::Phone, "phone number needs 8 to 15 digits");
        let original = Error::validation(fields);

        let wire: ServerFnError = original.clone().into();
        let recovered = Error::from_server_error(&wire);

        assert_eq!(recovered, original);
    }

    #[test]
    fn test_server_error_keeps_not_found() {
        let wire: ServerFnError = Error::not_found("employee").into();
        let recovered = Error::from_server_error(&wire);

        assert!(recovered.is_not_found());
        assert_eq!(recovered.message, "employee not found");
    }

    #[test]
    fn test_io_errors_become_internal() {
        let io = std::io::Error::other("disk on fire");
        let error: Error = io.into();

        assert_eq!(error.kind, ErrorKind::Internal);
        assert!(error.message.contains("disk on fire"));
    }

    #[test]
    fn test_err_macro_formats() {
        let error = err!("bad token for {}", "alice");
        assert_eq!(error.kind, ErrorKind::Internal);
        assert!(error.message.starts_with("bad token for alice"));
    }
}
