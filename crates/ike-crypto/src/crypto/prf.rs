//! Pseudo-Random Function (PRF) transforms
//!
//! Implements the PRF transforms and the key derivation algorithms of
//! RFC 7296 Sections 2.13, 2.14 and 2.18:
//!
//! ```text
//! SKEYSEED          = prf(Ni | Nr, g^ir)
//! SKEYSEED (rekey)  = prf(SK_d (old), g^ir (new) | Ni | Nr)
//! prf+ (K,S)        = T1 | T2 | T3 | T4 | ...
//! ```
//!
//! `PRF_AES128_XCBC` has a fixed 128-bit key. Its keys are normalized as
//! described in RFC 4434, and SKEYSEED uses only the first 64 bits of each
//! nonce as the key (RFC 7296 Section 2.14).

use zeroize::Zeroizing;

use super::mac::MacAlgorithm;
use super::xcbc;
use crate::logging;
use crate::transform::{PrfTransformId, TransformDescriptor, TransformType};
use crate::{Error, Result};

/// Number of nonce bytes taken from each side for a fixed-key-size PRF
const FIXED_KEY_NONCE_LEN: usize = 8;

/// prf+ uses a one-octet counter, so it yields at most 255 blocks
const PRF_PLUS_MAX_BLOCKS: usize = 255;

/// PRF algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrfAlgorithm {
    /// HMAC-SHA1
    HmacSha1,
    /// AES128-XCBC (RFC 4434)
    Aes128Xcbc,
    /// HMAC-SHA2-256
    HmacSha256,
    /// HMAC-SHA2-384
    HmacSha384,
    /// HMAC-SHA2-512
    HmacSha512,
}

impl PrfAlgorithm {
    /// Get preferred key length in bytes
    ///
    /// This is also the length of SK_d, SK_pi and SK_pr.
    pub fn key_len(self) -> usize {
        match self {
            PrfAlgorithm::HmacSha1 => 20,
            PrfAlgorithm::Aes128Xcbc => xcbc::XCBC_KEY_LEN,
            PrfAlgorithm::HmacSha256 => 32,
            PrfAlgorithm::HmacSha384 => 48,
            PrfAlgorithm::HmacSha512 => 64,
        }
    }

    /// Get PRF output length in bytes
    pub fn output_len(self) -> usize {
        self.mac().output_len()
    }

    /// Signing primitive
    pub fn mac(self) -> MacAlgorithm {
        match self {
            PrfAlgorithm::HmacSha1 => MacAlgorithm::HmacSha1,
            PrfAlgorithm::Aes128Xcbc => MacAlgorithm::AesXcbc,
            PrfAlgorithm::HmacSha256 => MacAlgorithm::HmacSha256,
            PrfAlgorithm::HmacSha384 => MacAlgorithm::HmacSha384,
            PrfAlgorithm::HmacSha512 => MacAlgorithm::HmacSha512,
        }
    }

    /// Get algorithm name
    pub fn name(self) -> &'static str {
        match self {
            PrfAlgorithm::HmacSha1 => "PRF_HMAC_SHA1",
            PrfAlgorithm::Aes128Xcbc => "PRF_AES128_XCBC",
            PrfAlgorithm::HmacSha256 => "PRF_HMAC_SHA2_256",
            PrfAlgorithm::HmacSha384 => "PRF_HMAC_SHA2_384",
            PrfAlgorithm::HmacSha512 => "PRF_HMAC_SHA2_512",
        }
    }

    fn transform_id(self) -> PrfTransformId {
        match self {
            PrfAlgorithm::HmacSha1 => PrfTransformId::HmacSha1,
            PrfAlgorithm::Aes128Xcbc => PrfTransformId::Aes128Xcbc,
            PrfAlgorithm::HmacSha256 => PrfTransformId::HmacSha256,
            PrfAlgorithm::HmacSha384 => PrfTransformId::HmacSha384,
            PrfAlgorithm::HmacSha512 => PrfTransformId::HmacSha512,
        }
    }
}

/// Negotiated PRF transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrfTransform {
    algorithm: PrfAlgorithm,
    descriptor: TransformDescriptor,
}

impl PrfTransform {
    /// Create a PRF transform from a negotiated transform ID
    pub fn create(transform_id: u16) -> Result<Self> {
        let algorithm = match PrfTransformId::from_u16(transform_id) {
            Some(PrfTransformId::HmacSha1) => PrfAlgorithm::HmacSha1,
            Some(PrfTransformId::Aes128Xcbc) => PrfAlgorithm::Aes128Xcbc,
            Some(PrfTransformId::HmacSha256) => PrfAlgorithm::HmacSha256,
            Some(PrfTransformId::HmacSha384) => PrfAlgorithm::HmacSha384,
            Some(PrfTransformId::HmacSha512) => PrfAlgorithm::HmacSha512,
            None => {
                logging::log_unsupported_algorithm("PRF", transform_id);
                return Err(Error::UnsupportedAlgorithm {
                    transform_type: TransformType::Prf,
                    id: transform_id,
                });
            }
        };

        Ok(Self::new(algorithm))
    }

    /// Create a PRF transform for a known algorithm
    pub fn new(algorithm: PrfAlgorithm) -> Self {
        let descriptor = TransformDescriptor::new(
            TransformType::Prf,
            algorithm.transform_id().to_u16(),
            algorithm.key_len(),
            algorithm.name(),
        );
        logging::log_transform_created("PRF", descriptor.name, descriptor.key_len);
        Self {
            algorithm,
            descriptor,
        }
    }

    /// Get algorithm
    pub fn algorithm(&self) -> PrfAlgorithm {
        self.algorithm
    }

    /// Get transform descriptor
    pub fn descriptor(&self) -> &TransformDescriptor {
        &self.descriptor
    }

    /// Get preferred key length in bytes
    pub fn key_len(&self) -> usize {
        self.descriptor.key_len
    }

    /// Get PRF output length in bytes
    pub fn output_len(&self) -> usize {
        self.algorithm.output_len()
    }

    /// Compute prf(key, data)
    ///
    /// HMAC PRFs take keys of any length. For `PRF_AES128_XCBC` the key is
    /// first normalized to 128 bits (RFC 4434).
    pub fn sign(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        match self.algorithm {
            PrfAlgorithm::Aes128Xcbc => {
                let key = xcbc::normalize_prf_key(key)?;
                self.algorithm.mac().sign(&key[..], data)
            }
            _ => self.algorithm.mac().sign(key, data),
        }
    }

    /// Compute SKEYSEED for a new IKE SA
    ///
    /// ```text
    /// SKEYSEED = prf(Ni | Nr, g^ir)
    /// ```
    ///
    /// For `PRF_AES128_XCBC` the key is `Ni[0..8] | Nr[0..8]`.
    pub fn generate_skeyseed(
        &self,
        nonce_i: &[u8],
        nonce_r: &[u8],
        shared_secret: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        let key = match self.algorithm {
            PrfAlgorithm::Aes128Xcbc => {
                let half_i = fixed_key_half(nonce_i)?;
                let half_r = fixed_key_half(nonce_r)?;
                Zeroizing::new([half_i, half_r].concat())
            }
            _ => Zeroizing::new([nonce_i, nonce_r].concat()),
        };

        let skeyseed = Zeroizing::new(self.sign(&key, shared_secret)?);
        logging::log_key_derived(self.descriptor.name, "SKEYSEED", skeyseed.len());
        Ok(skeyseed)
    }

    /// Compute SKEYSEED when rekeying an IKE SA
    ///
    /// ```text
    /// SKEYSEED = prf(SK_d (old), g^ir (new) | Ni | Nr)
    /// ```
    ///
    /// Must be called on the PRF of the IKE SA being rekeyed.
    pub fn generate_rekeyed_skeyseed(
        &self,
        sk_d: &[u8],
        nonce_i: &[u8],
        nonce_r: &[u8],
        shared_secret: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        let data = Zeroizing::new([shared_secret, nonce_i, nonce_r].concat());

        let skeyseed = Zeroizing::new(self.sign(sk_d, &data)?);
        logging::log_key_derived(self.descriptor.name, "rekeyed SKEYSEED", skeyseed.len());
        Ok(skeyseed)
    }

    /// Compute prf+ (key expansion function)
    ///
    /// Defined in RFC 7296 Section 2.13:
    /// ```text
    /// prf+ (K,S) = T1 | T2 | T3 | T4 | ...
    ///
    /// where:
    /// T1 = prf (K, S | 0x01)
    /// T2 = prf (K, T1 | S | 0x02)
    /// T3 = prf (K, T2 | S | 0x03)
    /// T4 = prf (K, T3 | S | 0x04)
    /// ...
    /// ```
    ///
    /// # Arguments
    ///
    /// * `key` - PRF key (K)
    /// * `seed` - Seed data (S)
    /// * `output_len` - Desired output length in bytes
    ///
    /// # Returns
    ///
    /// Returns exactly `output_len` bytes of keying material
    pub fn generate_keymat(
        &self,
        key: &[u8],
        seed: &[u8],
        output_len: usize,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let max_len = PRF_PLUS_MAX_BLOCKS * self.output_len();
        if output_len > max_len {
            return Err(Error::InvalidParameter(format!(
                "prf+ output of {} bytes exceeds maximum of {}",
                output_len, max_len
            )));
        }

        let mut output = Zeroizing::new(Vec::with_capacity(output_len));
        let mut t = Zeroizing::new(Vec::new());
        let mut input = Zeroizing::new(Vec::new());
        let mut counter: u8 = 1;

        while output.len() < output_len {
            // Build input: T(i-1) | S | counter
            input.clear();
            input.extend_from_slice(&t);
            input.extend_from_slice(seed);
            input.push(counter);

            // Compute T(i) = prf(K, T(i-1) | S | counter)
            t = Zeroizing::new(self.sign(key, &input)?);
            output.extend_from_slice(&t);

            counter = counter.wrapping_add(1);
        }

        output.truncate(output_len);
        logging::log_key_derived(self.descriptor.name, "prf+", output.len());
        Ok(output)
    }
}

fn fixed_key_half(nonce: &[u8]) -> Result<&[u8]> {
    nonce
        .get(..FIXED_KEY_NONCE_LEN)
        .ok_or(Error::BufferTooShort {
            required: FIXED_KEY_NONCE_LEN,
            available: nonce.len(),
        })
}
