//! Error types for IKEv2 transform operations
//!
//! A single error type covers the cipher, integrity and PRF transforms and
//! the key schedule built on top of them. None of these errors is retryable:
//! the caller is expected to tear down or renegotiate the affected SA.

use std::fmt;

use crate::transform::TransformType;

/// Result type for transform operations
pub type Result<T> = std::result::Result<T, Error>;

/// Transform layer errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Negotiated algorithm identifier has no implementation
    UnsupportedAlgorithm {
        /// Kind of transform that was requested
        transform_type: TransformType,
        /// IANA transform identifier
        id: u16,
    },

    /// Invalid negotiated parameter (key length attribute, configuration)
    InvalidParameter(String),

    /// Key does not match the transform's declared key length
    InvalidKeyLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// IV does not match the transform's declared IV length
    InvalidIvLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Input for a block cipher is not a multiple of the block size
    NotBlockAligned {
        /// Input length in bytes
        len: usize,
        /// Cipher block size in bytes
        block_size: usize,
    },

    /// Buffer too short for operation
    BufferTooShort {
        /// Required length
        required: usize,
        /// Available length
        available: usize,
    },

    /// Integrity check (AEAD tag or checksum) did not verify
    AuthenticationFailed(String),

    /// Algorithm cannot be handed to the packet-protection data plane
    UnsupportedByDataPlane(&'static str),

    /// Cryptographic primitive failed
    CryptoError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedAlgorithm { transform_type, id } => {
                write!(f, "Unsupported {} algorithm: {}", transform_type, id)
            }
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::InvalidKeyLength { expected, actual } => {
                write!(
                    f,
                    "Invalid key length: expected {}, got {}",
                    expected, actual
                )
            }
            Error::InvalidIvLength { expected, actual } => {
                write!(f, "Invalid IV length: expected {}, got {}", expected, actual)
            }
            Error::NotBlockAligned { len, block_size } => {
                write!(
                    f,
                    "Input length {} is not a multiple of block size {}",
                    len, block_size
                )
            }
            Error::BufferTooShort {
                required,
                available,
            } => {
                write!(
                    f,
                    "Buffer too short: need {} bytes, have {}",
                    required, available
                )
            }
            Error::AuthenticationFailed(msg) => {
                write!(f, "Authentication failed: {}", msg)
            }
            Error::UnsupportedByDataPlane(name) => {
                write!(f, "Algorithm not supported by the data plane: {}", name)
            }
            Error::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<cipher::InvalidLength> for Error {
    fn from(_: cipher::InvalidLength) -> Self {
        Error::CryptoError("primitive rejected key or IV length".into())
    }
}
