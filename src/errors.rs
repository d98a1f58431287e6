//! Unified error type for the inventory catalog and voice entry.
//!
//! Every fallible operation in the crate returns [`Result`]. The variants line up
//! with the four kinds of failure the UI distinguishes: bad user input, a store
//! that could not be reached, a store that refused the request, and an
//! operation that needs a selected product when none is selected.

use thiserror::Error;

/// Everything that can go wrong in the catalog, the stores, and the UI.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be read or were invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// User input failed validation
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// An update or delete was asked for with nothing selected
    #[error("No product selected for {action}")]
    NoSelection { action: &'static str },

    /// The id is unknown to the store
    #[error("Product not found: {id}")]
    ProductNotFound { id: i64 },

    /// The store answered with a non-success status
    #[error("Store rejected the request with status {status}")]
    Rejected { status: u16 },

    /// The store answered with a body that could not be decoded
    #[error("Store returned an unreadable response: {0}")]
    InvalidResponse(String),

    /// The store could not be reached
    #[error("Could not reach the store: {0}")]
    Transport(String),

    /// The local database failed
    #[error("Database error: {0}")]
    Database(String),

    /// Reading console input failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the store answered but the answer was not a success.
    #[must_use]
    pub const fn is_bad_response(&self) -> bool {
        matches!(
            self,
            Self::Rejected { .. } | Self::InvalidResponse(_) | Self::ProductNotFound { .. }
        )
    }

    /// Text shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::NoSelection { action } => format!("Seleccione un producto para {action}."),
            Self::ProductNotFound { .. } | Self::Rejected { .. } | Self::InvalidResponse(_) => {
                "Error en la respuesta del servidor.".to_string()
            }
            Self::Transport(detail) => format!("Error de red: {detail}"),
            Self::Config { message } => format!("Error de configuración: {message}"),
            Self::Database(_) | Self::Io(_) => {
                "Error al conectar con la API. Verifique su conexión.".to_string()
            }
        }
    }
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Database(value.to_string())
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_response_classification() {
        assert!(Error::Rejected { status: 500 }.is_bad_response());
        assert!(Error::InvalidResponse("eof".into()).is_bad_response());
        assert!(Error::ProductNotFound { id: 3 }.is_bad_response());
        assert!(!Error::Transport("refused".into()).is_bad_response());
        assert!(!Error::Database("locked".into()).is_bad_response());
    }

    #[test]
    fn test_user_messages_differ_between_rejection_and_connectivity() {
        let rejected = Error::Rejected { status: 503 }.user_message();
        let offline = Error::Transport("connection refused".into()).user_message();
        assert_ne!(rejected, offline);
        assert!(offline.contains("connection refused"));
    }

    #[test]
    fn test_no_selection_message_names_the_action() {
        let msg = Error::NoSelection {
            action: "eliminar",
        }
        .user_message();
        assert_eq!(msg, "Seleccione un producto para eliminar.");
    }
}
