use crate::repository::RepositoryError;

/// Failure of a mutation or read, as seen by whoever issued it.
///
/// The `Display` output may carry the underlying cause and is meant for logs;
/// callers surface [`NotebookError::client_message`] instead.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    #[error("caller is not authenticated")]
    Unauthenticated,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{message}: {source}")]
    StoreRejected {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Failure reported by a remote server, already reduced to its message.
    #[error("server reported: {0}")]
    Remote(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl NotebookError {
    pub fn client_message(&self) -> String {
        match self {
            Self::Unauthenticated => "Unauthorized".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::StoreRejected { message, .. } => (*message).to_string(),
            Self::Remote(message) => message.clone(),
            Self::Unexpected(_) => "Unexpected error".to_string(),
        }
    }
}

impl From<reqwest::Error> for NotebookError {
    fn from(e: reqwest::Error) -> Self {
        Self::Unexpected(e.to_string())
    }
}
