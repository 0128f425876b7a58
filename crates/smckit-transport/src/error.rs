/// Errors that can occur at the controller call boundary.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The management controller service does not exist on this machine.
    #[error("management controller service not found")]
    NotFound,

    /// The caller lacks the privileges required to open the controller.
    ///
    /// Informative only: privilege failures are never retried here.
    #[error("insufficient privileges to open the management controller")]
    NotPrivileged,

    /// The kernel rejected the structured call outright.
    #[error("controller call failed: {code:#010x}")]
    Call { code: i32 },

    /// The backing device handle has gone away.
    #[error("connection to the controller is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
