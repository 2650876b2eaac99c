//! Error types for the WSC Enrollee core.
//!
//! Most protocol-level failures are not Rust-level errors at all: a
//! malformed TLV or a failed authenticator check is a silent drop, and a
//! failed inner decryption is a NACK. Both are ordinary `Ok` values
//! returned from [`crate::session::Session::handle_request`]. `WscError`
//! covers the remaining cases: settings that fail to load, and the session
//! being driven out of the order this API expects.

use thiserror::Error;

/// Errors surfaced by the WSC Enrollee core.
#[derive(Error, Debug)]
pub enum WscError {
    #[error("required setting '{0}' is missing")]
    MissingSetting(&'static str),

    #[error("setting '{0}' has an invalid value")]
    InvalidSetting(&'static str),

    #[error("device password must be at least 8 hexadecimal characters")]
    InvalidDevicePassword,

    #[error("Diffie-Hellman key computation failed")]
    KeyAgreementFailed,

    #[error("session has not been initialized with load_settings")]
    NotInitialized,

    #[error("session has already completed or been released")]
    SessionFinished,

    #[error("probe() was called with an unsupported method name: {0}")]
    UnsupportedMethod(String),
}

/// Result type for fallible, non-protocol WSC operations.
pub type Result<T> = std::result::Result<T, WscError>;
