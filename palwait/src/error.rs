//! Error taxonomy of the wait subsystem.
//!
//! Every failure of a wait is returned to the immediate caller; nothing is
//! retried internally. [`PalError::is_retryable`] tells callers which errors
//! are worth looping on.

use thiserror::Error;

/// Convenience result alias for wait operations.
pub type PalResult<T, E = PalError> = Result<T, E>;

/// Errors surfaced by the wait subsystem.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PalError {
    /// Nothing became ready, or there was nothing to watch.
    #[error("no handle is ready, try again")]
    WouldBlock,

    /// The blocking host call was interrupted by a signal.
    #[error("wait interrupted by a signal")]
    Interrupted,

    /// The handle kind has no way to be waited on.
    #[error("handle does not support waiting")]
    NotSupported,

    /// A descriptor is closed or otherwise invalid.
    #[error("bad handle")]
    BadHandle,

    /// The host rejected an argument of the wait.
    #[error("invalid argument")]
    InvalidArgument,

    /// The host ran out of memory.
    #[error("out of memory")]
    NoMemory,

    /// The host refused the operation.
    #[error("permission denied")]
    Denied,

    /// A descriptor cannot be placed in a `select(2)` set.
    #[error("descriptor {fd} does not fit in a select set")]
    DescriptorOutOfRange { fd: i32 },

    /// Any other host failure, carrying the raw errno.
    #[error("host error (errno {errno})")]
    Host { errno: i32 },
}

impl PalError {
    /// Translates a host errno into the PAL taxonomy.
    pub fn from_errno(errno: i32) -> Self {
        match errno {
            libc::EINTR | libc::ERESTART => PalError::Interrupted,
            libc::EAGAIN => PalError::WouldBlock,
            libc::ENOSYS | libc::EOPNOTSUPP => PalError::NotSupported,
            libc::EBADF => PalError::BadHandle,
            libc::EINVAL => PalError::InvalidArgument,
            libc::ENOMEM => PalError::NoMemory,
            libc::EACCES | libc::EPERM => PalError::Denied,
            _ => PalError::Host { errno },
        }
    }

    /// Returns `true` if the caller may simply retry the same wait.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PalError::WouldBlock | PalError::Interrupted)
    }
}

impl From<std::io::Error> for PalError {
    fn from(err: std::io::Error) -> Self {
        match err.raw_os_error() {
            Some(errno) => PalError::from_errno(errno),
            None => match err.kind() {
                std::io::ErrorKind::WouldBlock => PalError::WouldBlock,
                std::io::ErrorKind::Interrupted => PalError::Interrupted,
                std::io::ErrorKind::Unsupported => PalError::NotSupported,
                std::io::ErrorKind::InvalidInput => PalError::InvalidArgument,
                std::io::ErrorKind::OutOfMemory => PalError::NoMemory,
                std::io::ErrorKind::PermissionDenied => PalError::Denied,
                _ => PalError::Host { errno: 0 },
            },
        }
    }
}
