use std::io;

use thiserror::Error;

/// Everything that can end a readout. None of these are retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown register {0:?}")]
    InvalidRegister(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The lock could not be taken in time, or the device would not open or answer.
    #[error("device {device} busy: {reason}")]
    DeviceBusy { device: String, reason: String },

    #[error("lock file {path} unusable: {source}")]
    LockFile {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The device rejected the register index.
    #[error("register {index} rejected by device: {reason}")]
    IllegalRequest { index: u16, reason: String },

    #[error("no response reading register {index}: {reason}")]
    NoResponse { index: u16, reason: String },

    #[error("device reported a fault reading register {index}: {reason}")]
    DeviceFault { index: u16, reason: String },
}

impl Error {
    /// The short lowercase line shown to the user in place of a reading.
    #[must_use]
    pub fn diagnostic(&self) -> &'static str {
        match self {
            Error::InvalidRegister(_) | Error::IllegalRequest { .. } => "unknown",
            Error::InvalidArgument(_) => "invalid argument",
            Error::DeviceBusy { .. } | Error::LockFile { .. } => "device busy",
            Error::NoResponse { .. } => "not connected",
            Error::DeviceFault { .. } => "device fault",
        }
    }

    pub(crate) fn busy(device: &str, reason: impl ToString) -> Self {
        Error::DeviceBusy {
            device: device.to_owned(),
            reason: reason.to_string(),
        }
    }
}
