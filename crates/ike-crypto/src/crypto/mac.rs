//! Keyed-MAC signing engine
//!
//! Shared by integrity transforms and PRFs. A [`MacAlgorithm`] produces the
//! raw, untruncated signature; truncation and key normalization belong to
//! the transforms built on top of it.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use super::xcbc;
use crate::{Error, Result};

/// Signing primitive behind an integrity or PRF transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacAlgorithm {
    /// HMAC-SHA1
    HmacSha1,
    /// HMAC-SHA2-256
    HmacSha256,
    /// HMAC-SHA2-384
    HmacSha384,
    /// HMAC-SHA2-512
    HmacSha512,
    /// AES-XCBC-MAC (RFC 3566)
    AesXcbc,
}

impl MacAlgorithm {
    /// Whether the primitive is built from a block cipher rather than a hash
    pub fn is_cipher_based(self) -> bool {
        matches!(self, MacAlgorithm::AesXcbc)
    }

    /// Get signature length in bytes
    pub fn output_len(self) -> usize {
        match self {
            MacAlgorithm::HmacSha1 => 20,
            MacAlgorithm::HmacSha256 => 32,
            MacAlgorithm::HmacSha384 => 48,
            MacAlgorithm::HmacSha512 => 64,
            MacAlgorithm::AesXcbc => xcbc::XCBC_MAC_LEN,
        }
    }

    /// Compute the full signature of `data` under `key`
    ///
    /// HMAC accepts keys of any length. AES-XCBC-MAC requires exactly 16
    /// bytes and fails with [`Error::InvalidKeyLength`] otherwise.
    pub fn sign(self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        match self {
            MacAlgorithm::HmacSha1 => hmac_sign::<Hmac<Sha1>>(key, data),
            MacAlgorithm::HmacSha256 => hmac_sign::<Hmac<Sha256>>(key, data),
            MacAlgorithm::HmacSha384 => hmac_sign::<Hmac<Sha384>>(key, data),
            MacAlgorithm::HmacSha512 => hmac_sign::<Hmac<Sha512>>(key, data),
            MacAlgorithm::AesXcbc => xcbc::aes_xcbc_mac(key, data).map(|mac| mac.to_vec()),
        }
    }
}

fn hmac_sign<M: Mac + KeyInit>(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(key)
        .map_err(|_| Error::CryptoError("Failed to create HMAC".into()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_len() {
        assert_eq!(MacAlgorithm::HmacSha1.output_len(), 20);
        assert_eq!(MacAlgorithm::HmacSha256.output_len(), 32);
        assert_eq!(MacAlgorithm::HmacSha384.output_len(), 48);
        assert_eq!(MacAlgorithm::HmacSha512.output_len(), 64);
        assert_eq!(MacAlgorithm::AesXcbc.output_len(), 16);
    }

    #[test]
    fn test_cipher_based() {
        assert!(MacAlgorithm::AesXcbc.is_cipher_based());
        assert!(!MacAlgorithm::HmacSha1.is_cipher_based());
        assert!(!MacAlgorithm::HmacSha512.is_cipher_based());
    }

    #[test]
    fn test_sign_lengths_match_output_len() {
        let data = b"IKEv2 signed octets";
        for alg in [
            MacAlgorithm::HmacSha1,
            MacAlgorithm::HmacSha256,
            MacAlgorithm::HmacSha384,
            MacAlgorithm::HmacSha512,
            MacAlgorithm::AesXcbc,
        ] {
            let sig = alg.sign(&[0x0b; 16], data).unwrap();
            assert_eq!(sig.len(), alg.output_len(), "{:?}", alg);
        }
    }

    // RFC 4231 test case 2 ("Jefe")
    #[test]
    fn test_hmac_sha256_rfc4231() {
        let sig = MacAlgorithm::HmacSha256
            .sign(b"Jefe", b"what do ya want for nothing?")
            .unwrap();
        assert_eq!(
            hex::encode(sig),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    // RFC 2202 test case 2
    #[test]
    fn test_hmac_sha1_rfc2202() {
        let sig = MacAlgorithm::HmacSha1
            .sign(b"Jefe", b"what do ya want for nothing?")
            .unwrap();
        assert_eq!(hex::encode(sig), "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79");
    }

    #[test]
    fn test_xcbc_rejects_wrong_key_length() {
        let result = MacAlgorithm::AesXcbc.sign(&[0u8; 32], b"data");
        assert!(matches!(result, Err(Error::InvalidKeyLength { .. })));
    }

    #[test]
    fn test_hmac_accepts_long_keys() {
        let sig = MacAlgorithm::HmacSha256.sign(&[0x42; 200], b"data").unwrap();
        assert_eq!(sig.len(), 32);
    }
}
