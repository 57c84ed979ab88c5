//! Console error types
//!
//! Every failure of a session or synchronizer operation ends up as a
//! [`ConsoleError`]. Hosts render [`ConsoleError::user_message`] and branch
//! on [`ConsoleError::kind`]; nothing here is meant to reach the view layer
//! as a panic.

use cobra_client::ClientError;
use thiserror::Error;
use validator::ValidationErrors;

use super::session_cache::StorageError;

/// Failure category shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing field or out-of-range value, caught before any request
    Validation,
    /// Credentials rejected, or the session is no longer valid
    Authentication,
    /// Offline, timeout, unreachable server, unreadable response
    Network,
    /// Well-formed request refused by the server's business rules
    Rejected,
    /// Local session storage could not be read or written
    Storage,
    /// The owning view went away before the request finished
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// update/delete on an id that is not in the local list
    #[error("Unknown {resource} #{id}")]
    UnknownItem { resource: &'static str, id: String },

    /// An action the console never offers on this item
    #[error("Refused: {0}")]
    Refused(String),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Request cancelled: view unmounted")]
    Cancelled,
}

impl ConsoleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConsoleError::Validation(_) => ErrorKind::Validation,
            ConsoleError::NotAuthenticated | ConsoleError::Authentication(_) => {
                ErrorKind::Authentication
            }
            ConsoleError::UnknownItem { .. } | ConsoleError::Refused(_) => ErrorKind::Rejected,
            ConsoleError::Storage(_) => ErrorKind::Storage,
            ConsoleError::Cancelled => ErrorKind::Cancelled,
            ConsoleError::Client(e) => match e {
                ClientError::Unauthorized(_) | ClientError::Auth(_) => ErrorKind::Authentication,
                ClientError::Forbidden(_)
                | ClientError::NotFound(_)
                | ClientError::Validation(_) => ErrorKind::Rejected,
                ClientError::Server { status, .. } if *status < 500 => ErrorKind::Rejected,
                ClientError::Server { .. }
                | ClientError::Http(_)
                | ClientError::InvalidResponse(_)
                | ClientError::Serialization(_)
                | ClientError::Config(_) => ErrorKind::Network,
            },
        }
    }

    /// Message an operator can act on
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Validation(msg) => msg.clone(),
            ConsoleError::NotAuthenticated => "Please sign in to continue.".to_string(),
            ConsoleError::Authentication(msg) => msg.clone(),
            ConsoleError::UnknownItem { resource, .. } => {
                format!("This {resource} no longer exists. Refresh the list and try again.")
            }
            ConsoleError::Refused(msg) => msg.clone(),
            ConsoleError::Storage(_) => {
                "Your session could not be saved on this device.".to_string()
            }
            ConsoleError::Cancelled => "The screen was closed before the request finished.".to_string(),
            ConsoleError::Client(e) => match e {
                ClientError::Unauthorized(_) => {
                    "Your session has expired. Please sign in again.".to_string()
                }
                ClientError::Auth(msg) => msg.clone(),
                ClientError::Forbidden(_) => {
                    "You are not allowed to perform this action.".to_string()
                }
                ClientError::NotFound(_) => {
                    "This item no longer exists on the server. Refresh the list.".to_string()
                }
                ClientError::Validation(msg) if !msg.is_empty() => msg.clone(),
                ClientError::Server { status, message } if *status < 500 && !message.is_empty() => {
                    message.clone()
                }
                ClientError::Validation(_) | ClientError::Server { .. } if self.kind() == ErrorKind::Rejected => {
                    "The server refused this change.".to_string()
                }
                _ => "Could not reach the server. Check your connection and try again.".to_string(),
            },
        }
    }

    /// Flattens validator output into one message, fields in name order
    pub fn from_validation(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();

        ConsoleError::Validation(messages.join("; "))
    }
}

impl From<shared::models::UnknownVariant> for ConsoleError {
    fn from(err: shared::models::UnknownVariant) -> Self {
        ConsoleError::Validation(err.to_string())
    }
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
