//! Structured logging for transform operations
//!
//! Provides structured, contextual logging using the `tracing` framework.
//! Key material is never logged; events carry algorithm names, identifiers
//! and lengths only.
//!
//! # Log Levels
//!
//! - **TRACE**: Key material derivation (lengths only)
//! - **DEBUG**: Transform construction
//! - **WARN**: Rejected algorithms, failed integrity checks
//! - **ERROR**: Key length mismatches (negotiation defects)
//!
//! # Example
//!
//! ```no_run
//! use fynx_ike_crypto::logging;
//!
//! // Initialize tracing subscriber (in tests or applications)
//! tracing_subscriber::fmt()
//!     .with_env_filter("fynx_ike_crypto=debug")
//!     .init();
//!
//! logging::log_transform_created("ENCR", "AES-CBC", 16);
//! ```

use tracing::{debug, error, trace, warn};

/// Log transform construction
///
/// # Arguments
///
/// * `kind` - Transform type ("ENCR", "INTEG", "PRF")
/// * `name` - Algorithm name
/// * `key_len` - Required key length in bytes
pub fn log_transform_created(kind: &str, name: &str, key_len: usize) {
    debug!(
        transform = kind,
        algorithm = name,
        key_len = key_len,
        "Transform created"
    );
}

/// Log rejection of an unknown or unsupported transform identifier
///
/// # Arguments
///
/// * `kind` - Transform type
/// * `id` - IANA transform identifier
pub fn log_unsupported_algorithm(kind: &str, id: u16) {
    warn!(transform = kind, transform_id = id, "Unsupported algorithm rejected");
}

/// Log a key length mismatch
///
/// # Arguments
///
/// * `algorithm` - Algorithm name
/// * `expected` - Declared key length
/// * `actual` - Supplied key length
pub fn log_key_length_mismatch(algorithm: &str, expected: usize, actual: usize) {
    error!(
        algorithm = algorithm,
        expected = expected,
        actual = actual,
        "Key length does not match negotiated transform"
    );
}

/// Log an integrity verification failure
///
/// # Arguments
///
/// * `algorithm` - Algorithm name
/// * `context` - "AEAD open" or "checksum"
pub fn log_authentication_failed(algorithm: &str, context: &str) {
    warn!(
        algorithm = algorithm,
        context = context,
        "Integrity verification failed"
    );
}

/// Log keying material derivation
///
/// # Arguments
///
/// * `prf` - PRF algorithm name
/// * `operation` - "SKEYSEED", "rekeyed SKEYSEED" or "prf+"
/// * `output_len` - Derived length in bytes
pub fn log_key_derived(prf: &str, operation: &str, output_len: usize) {
    trace!(
        prf = prf,
        operation = operation,
        output_len = output_len,
        "Keying material derived"
    );
}

/// Log a refused data-plane descriptor conversion
///
/// # Arguments
///
/// * `algorithm` - Algorithm name
pub fn log_data_plane_unsupported(algorithm: &str) {
    warn!(
        algorithm = algorithm,
        "Algorithm cannot be installed in the data plane"
    );
}
