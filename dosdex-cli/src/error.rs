use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Store operation failed
    #[error("Store error: {0}")]
    Store(#[from] dosdex_store::StoreError),

    /// LaunchBox export could not be read
    #[error("LaunchBox error: {0}")]
    LaunchBox(#[from] dosdex_import::LaunchBoxError),

    /// Reconciliation failed
    #[error("Import error: {0}")]
    Reconcile(#[from] dosdex_import::ReconcileError),

    /// Bad filter argument
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

impl CliError {
    pub(crate) fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter(msg.into())
    }
}
