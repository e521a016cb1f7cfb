//! Integrity transforms
//!
//! Produces the fixed-width checksum of the SK payload (RFC 7296 Section
//! 3.14) and of ESP packets for non-AEAD suites. The checksum is the
//! leftmost `checksum_len()` bytes of the keyed-MAC output.

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::mac::MacAlgorithm;
use crate::logging;
use crate::transform::{
    data_plane, DataPlaneAlgorithm, IntegTransformId, TransformDescriptor, TransformType,
};
use crate::{Error, Result};

/// Integrity algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrityAlgorithm {
    /// AUTH_HMAC_SHA1_96
    HmacSha1_96,
    /// AUTH_AES_XCBC_96
    AesXcbc96,
    /// AUTH_HMAC_SHA2_256_128
    HmacSha256_128,
    /// AUTH_HMAC_SHA2_384_192
    HmacSha384_192,
    /// AUTH_HMAC_SHA2_512_256
    HmacSha512_256,
}

impl IntegrityAlgorithm {
    /// Get key length in bytes
    pub fn key_len(self) -> usize {
        match self {
            IntegrityAlgorithm::HmacSha1_96 => 20,
            IntegrityAlgorithm::AesXcbc96 => 16,
            IntegrityAlgorithm::HmacSha256_128 => 32,
            IntegrityAlgorithm::HmacSha384_192 => 48,
            IntegrityAlgorithm::HmacSha512_256 => 64,
        }
    }

    /// Get checksum (truncated ICV) length in bytes
    pub fn checksum_len(self) -> usize {
        match self {
            IntegrityAlgorithm::HmacSha1_96 | IntegrityAlgorithm::AesXcbc96 => 12,
            IntegrityAlgorithm::HmacSha256_128 => 16,
            IntegrityAlgorithm::HmacSha384_192 => 24,
            IntegrityAlgorithm::HmacSha512_256 => 32,
        }
    }

    /// Signing primitive
    pub fn mac(self) -> MacAlgorithm {
        match self {
            IntegrityAlgorithm::HmacSha1_96 => MacAlgorithm::HmacSha1,
            IntegrityAlgorithm::AesXcbc96 => MacAlgorithm::AesXcbc,
            IntegrityAlgorithm::HmacSha256_128 => MacAlgorithm::HmacSha256,
            IntegrityAlgorithm::HmacSha384_192 => MacAlgorithm::HmacSha384,
            IntegrityAlgorithm::HmacSha512_256 => MacAlgorithm::HmacSha512,
        }
    }

    /// Get algorithm name
    pub fn name(self) -> &'static str {
        match self {
            IntegrityAlgorithm::HmacSha1_96 => "HMAC-SHA1-96",
            IntegrityAlgorithm::AesXcbc96 => "AES-XCBC-96",
            IntegrityAlgorithm::HmacSha256_128 => "HMAC-SHA2-256-128",
            IntegrityAlgorithm::HmacSha384_192 => "HMAC-SHA2-384-192",
            IntegrityAlgorithm::HmacSha512_256 => "HMAC-SHA2-512-256",
        }
    }

    fn transform_id(self) -> IntegTransformId {
        match self {
            IntegrityAlgorithm::HmacSha1_96 => IntegTransformId::HmacSha1_96,
            IntegrityAlgorithm::AesXcbc96 => IntegTransformId::AesXcbc96,
            IntegrityAlgorithm::HmacSha256_128 => IntegTransformId::HmacSha256_128,
            IntegrityAlgorithm::HmacSha384_192 => IntegTransformId::HmacSha384_192,
            IntegrityAlgorithm::HmacSha512_256 => IntegTransformId::HmacSha512_256,
        }
    }
}

/// Negotiated integrity transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrityTransform {
    algorithm: IntegrityAlgorithm,
    descriptor: TransformDescriptor,
}

impl IntegrityTransform {
    /// Create an integrity transform from a negotiated transform ID
    ///
    /// `INTEG_NONE` is rejected with [`Error::InvalidParameter`]: an AEAD
    /// suite simply has no integrity transform. Unknown identifiers are
    /// rejected with [`Error::UnsupportedAlgorithm`].
    pub fn create(transform_id: u16) -> Result<Self> {
        let algorithm = match IntegTransformId::from_u16(transform_id) {
            Some(IntegTransformId::HmacSha1_96) => IntegrityAlgorithm::HmacSha1_96,
            Some(IntegTransformId::AesXcbc96) => IntegrityAlgorithm::AesXcbc96,
            Some(IntegTransformId::HmacSha256_128) => IntegrityAlgorithm::HmacSha256_128,
            Some(IntegTransformId::HmacSha384_192) => IntegrityAlgorithm::HmacSha384_192,
            Some(IntegTransformId::HmacSha512_256) => IntegrityAlgorithm::HmacSha512_256,
            Some(IntegTransformId::None) => {
                return Err(Error::InvalidParameter(
                    "integrity transform cannot be INTEG_NONE".into(),
                ));
            }
            None => {
                logging::log_unsupported_algorithm("INTEG", transform_id);
                return Err(Error::UnsupportedAlgorithm {
                    transform_type: TransformType::Integ,
                    id: transform_id,
                });
            }
        };

        Ok(Self::new(algorithm))
    }

    /// Create an integrity transform for a known algorithm
    pub fn new(algorithm: IntegrityAlgorithm) -> Self {
        let descriptor = TransformDescriptor::new(
            TransformType::Integ,
            algorithm.transform_id().to_u16(),
            algorithm.key_len(),
            algorithm.name(),
        );
        logging::log_transform_created("INTEG", descriptor.name, descriptor.key_len);
        Self {
            algorithm,
            descriptor,
        }
    }

    /// Get algorithm
    pub fn algorithm(&self) -> IntegrityAlgorithm {
        self.algorithm
    }

    /// Get transform descriptor
    pub fn descriptor(&self) -> &TransformDescriptor {
        &self.descriptor
    }

    /// Get key length in bytes
    pub fn key_len(&self) -> usize {
        self.descriptor.key_len
    }

    /// Get checksum length in bytes
    pub fn checksum_len(&self) -> usize {
        self.algorithm.checksum_len()
    }

    /// Compute the checksum of `data`
    ///
    /// # Arguments
    ///
    /// * `key` - Integrity key (SK_ai / SK_ar)
    /// * `data` - Octets covered by the checksum
    ///
    /// # Returns
    ///
    /// Returns the leftmost `checksum_len()` bytes of the MAC
    pub fn generate_checksum(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        self.check_key(key)?;

        let mut signature = self.algorithm.mac().sign(key, data)?;
        signature.truncate(self.checksum_len());
        Ok(signature)
    }

    /// Verify a received checksum in constant time
    pub fn verify_checksum(&self, key: &[u8], data: &[u8], checksum: &[u8]) -> Result<()> {
        let expected = self.generate_checksum(key, data)?;
        if checksum.len() == expected.len() && bool::from(expected.ct_eq(checksum)) {
            Ok(())
        } else {
            logging::log_authentication_failed(self.descriptor.name, "checksum");
            Err(Error::AuthenticationFailed(format!(
                "{} checksum mismatch",
                self.descriptor.name
            )))
        }
    }

    /// Build the data-plane descriptor used to install this transform in a
    /// Child SA
    pub fn build_key_descriptor(&self, key: &[u8]) -> Result<DataPlaneAlgorithm> {
        self.check_key(key)?;

        let name = match self.algorithm {
            IntegrityAlgorithm::HmacSha1_96 => data_plane::AUTH_HMAC_SHA1,
            IntegrityAlgorithm::HmacSha256_128 => data_plane::AUTH_HMAC_SHA256,
            IntegrityAlgorithm::HmacSha384_192 => data_plane::AUTH_HMAC_SHA384,
            IntegrityAlgorithm::HmacSha512_256 => data_plane::AUTH_HMAC_SHA512,
            IntegrityAlgorithm::AesXcbc96 => {
                logging::log_data_plane_unsupported(self.descriptor.name);
                return Err(Error::UnsupportedByDataPlane(self.descriptor.name));
            }
        };

        Ok(DataPlaneAlgorithm {
            name,
            key: Zeroizing::new(key.to_vec()),
            trunc_len_bits: (self.checksum_len() * 8) as u32,
        })
    }

    fn check_key(&self, key: &[u8]) -> Result<()> {
        if key.len() != self.key_len() {
            logging::log_key_length_mismatch(self.descriptor.name, self.key_len(), key.len());
            return Err(Error::InvalidKeyLength {
                expected: self.key_len(),
                actual: key.len(),
            });
        }
        Ok(())
    }
}
