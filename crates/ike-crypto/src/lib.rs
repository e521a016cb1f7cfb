//! IKEv2 negotiated cryptographic transforms for the Fynx security ecosystem.
//!
//! This crate implements the transform layer of an IKEv2 (RFC 7296)
//! implementation. It receives negotiated transform identifiers and raw key
//! material and returns ciphertext, checksums or derived keys:
//!
//! - **Encryption** - ENCR_3DES, ENCR_AES_CBC and ENCR_AES_GCM_8/12/16
//! - **Integrity** - AUTH_HMAC_SHA1_96, AUTH_AES_XCBC_96 and the HMAC-SHA2 family
//! - **PRF** - PRF_HMAC_SHA1, PRF_AES128_XCBC and the HMAC-SHA2 family
//! - **Key derivation** - SKEYSEED, rekeyed SKEYSEED and prf+
//!
//! Message parsing, the IKE state machine, proposal negotiation and
//! installing keys into the kernel belong to the callers.
//!
//! # Features
//!
//! - `serde` - Serialize/Deserialize for [`config::TransformConfig`]
//!
//! # Example
//!
//! ```rust
//! use fynx_ike_crypto::config::{SaTransforms, TransformConfig};
//! use fynx_ike_crypto::keys::IkeSaKeys;
//!
//! // ENCR_AES_CBC-128, AUTH_HMAC_SHA2_256_128, PRF_HMAC_SHA2_256
//! let config = TransformConfig::builder()
//!     .with_encryption(12, 128)
//!     .with_integrity(12)
//!     .with_prf(5)
//!     .build()
//!     .unwrap();
//! let transforms = SaTransforms::from_config(&config).unwrap();
//!
//! let keys = IkeSaKeys::derive(
//!     transforms.require_prf().unwrap(),
//!     &[0x01; 32],
//!     &[0x02; 32],
//!     &[0x03; 256],
//!     &[0x04; 8],
//!     &[0x05; 8],
//!     transforms.integ_key_len(),
//!     transforms.encr_key_len(),
//! )
//! .unwrap();
//!
//! let integrity = transforms.integrity.unwrap();
//! let checksum = integrity.generate_checksum(&keys.sk_ai, b"IKE message").unwrap();
//! assert_eq!(checksum.len(), 16);
//! ```
//!
//! # Security
//!
//! - All primitives come from the RustCrypto project
//! - Checksums and truncated AEAD tags are compared in constant time
//! - Derived keys are held in `zeroize` buffers
//!
//! # References
//!
//! - [RFC 7296](https://datatracker.ietf.org/doc/html/rfc7296) - Internet Key Exchange Protocol Version 2 (IKEv2)
//! - [RFC 3566](https://datatracker.ietf.org/doc/html/rfc3566) - The AES-XCBC-MAC-96 Algorithm and Its Use With IPsec
//! - [RFC 4434](https://datatracker.ietf.org/doc/html/rfc4434) - The AES-XCBC-PRF-128 Algorithm for IKE
//! - [RFC 5282](https://datatracker.ietf.org/doc/html/rfc5282) - Using Authenticated Encryption Algorithms with the Encrypted Payload of IKEv2

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod config;
pub mod crypto;
pub mod error;
pub mod keys;
pub mod logging;
pub mod transform;

pub use error::{Error, Result};
