//! IKEv2 cryptographic transforms
//!
//! This module provides the transforms negotiated in an IKEv2 proposal:
//! - Ciphers (3DES-CBC, AES-CBC, AES-GCM)
//! - Integrity algorithms (HMAC-SHA1/SHA2, AES-XCBC-96)
//! - PRFs and key derivation (SKEYSEED, prf+)
//!
//! Integrity algorithms and PRFs share the keyed-MAC engine in [`mac`].

pub mod cipher;
pub mod integrity;
pub mod mac;
pub mod prf;
pub mod xcbc;

pub use cipher::{CipherAlgorithm, IkeCipher};
pub use integrity::{IntegrityAlgorithm, IntegrityTransform};
pub use mac::MacAlgorithm;
pub use prf::{PrfAlgorithm, PrfTransform};
