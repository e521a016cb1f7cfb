//! IKEv2 transform identifiers and descriptors
//!
//! Transform type and transform ID values from RFC 7296 Section 3.3.2 and
//! the IANA "Internet Key Exchange Version 2 (IKEv2) Parameters" registry.
//! Only the algorithms this crate implements have an enum variant; every
//! other number is rejected by the `from_u16` conversions.

use std::fmt;

use zeroize::Zeroizing;

/// Key Length attribute value meaning "not specified" (fixed-key algorithms)
pub const KEY_LEN_UNSPECIFIED: u16 = 0;

/// Transform Type (RFC 7296 Section 3.3.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TransformType {
    /// Encryption Algorithm (ENCR)
    Encr = 1,
    /// Pseudo-random Function (PRF)
    Prf = 2,
    /// Integrity Algorithm (INTEG)
    Integ = 3,
}

impl TransformType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(TransformType::Encr),
            2 => Some(TransformType::Prf),
            3 => Some(TransformType::Integ),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for TransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformType::Encr => "ENCR",
            TransformType::Prf => "PRF",
            TransformType::Integ => "INTEG",
        };
        f.write_str(name)
    }
}

/// Transform ID for Encryption (ENCR) algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EncrTransformId {
    /// ENCR_3DES (CBC mode)
    TripleDes = 3,
    /// ENCR_AES_CBC
    AesCbc = 12,
    /// ENCR_AES_GCM_8 (8-byte ICV)
    AesGcm8 = 18,
    /// ENCR_AES_GCM_12 (12-byte ICV)
    AesGcm12 = 19,
    /// ENCR_AES_GCM_16 (16-byte ICV)
    AesGcm16 = 20,
}

impl EncrTransformId {
    /// Convert from u16
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            3 => Some(EncrTransformId::TripleDes),
            12 => Some(EncrTransformId::AesCbc),
            18 => Some(EncrTransformId::AesGcm8),
            19 => Some(EncrTransformId::AesGcm12),
            20 => Some(EncrTransformId::AesGcm16),
            _ => None,
        }
    }

    /// Convert to u16
    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Check if this is an AEAD cipher
    pub fn is_aead(self) -> bool {
        matches!(
            self,
            EncrTransformId::AesGcm8 | EncrTransformId::AesGcm12 | EncrTransformId::AesGcm16
        )
    }
}

/// Transform ID for PRF algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum PrfTransformId {
    /// PRF_HMAC_SHA1
    HmacSha1 = 2,
    /// PRF_AES128_XCBC (RFC 4434)
    Aes128Xcbc = 4,
    /// PRF_HMAC_SHA2_256
    HmacSha256 = 5,
    /// PRF_HMAC_SHA2_384
    HmacSha384 = 6,
    /// PRF_HMAC_SHA2_512
    HmacSha512 = 7,
}

impl PrfTransformId {
    /// Convert from u16
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            2 => Some(PrfTransformId::HmacSha1),
            4 => Some(PrfTransformId::Aes128Xcbc),
            5 => Some(PrfTransformId::HmacSha256),
            6 => Some(PrfTransformId::HmacSha384),
            7 => Some(PrfTransformId::HmacSha512),
            _ => None,
        }
    }

    /// Convert to u16
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// Transform ID for Integrity algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum IntegTransformId {
    /// NONE (only valid together with an AEAD cipher)
    None = 0,
    /// AUTH_HMAC_SHA1_96
    HmacSha1_96 = 2,
    /// AUTH_AES_XCBC_96 (RFC 3566)
    AesXcbc96 = 5,
    /// AUTH_HMAC_SHA2_256_128
    HmacSha256_128 = 12,
    /// AUTH_HMAC_SHA2_384_192
    HmacSha384_192 = 13,
    /// AUTH_HMAC_SHA2_512_256
    HmacSha512_256 = 14,
}

impl IntegTransformId {
    /// Convert from u16
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(IntegTransformId::None),
            2 => Some(IntegTransformId::HmacSha1_96),
            5 => Some(IntegTransformId::AesXcbc96),
            12 => Some(IntegTransformId::HmacSha256_128),
            13 => Some(IntegTransformId::HmacSha384_192),
            14 => Some(IntegTransformId::HmacSha512_256),
            _ => None,
        }
    }

    /// Convert to u16
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// Immutable description of a negotiated transform
///
/// Built once by the transform factories and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformDescriptor {
    /// Transform type
    pub transform_type: TransformType,
    /// IANA transform identifier
    pub id: u16,
    /// Required key length in bytes
    pub key_len: usize,
    /// Human-readable algorithm name
    pub name: &'static str,
}

impl TransformDescriptor {
    pub(crate) const fn new(
        transform_type: TransformType,
        id: u16,
        key_len: usize,
        name: &'static str,
    ) -> Self {
        Self {
            transform_type,
            id,
            key_len,
            name,
        }
    }
}

impl fmt::Display for TransformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}-bit key)", self.transform_type, self.name, self.key_len * 8)
    }
}

/// Algorithm names understood by the packet-protection data plane
pub mod data_plane {
    /// AES-CBC encryption
    pub const CRYPT_AES_CBC: &str = "cbc(aes)";
    /// AES-GCM combined mode (RFC 4106); key includes the 4-byte salt
    pub const AUTH_CRYPT_AES_GCM: &str = "rfc4106(gcm(aes))";
    /// HMAC-SHA1
    pub const AUTH_HMAC_SHA1: &str = "hmac(sha1)";
    /// HMAC-SHA2-256
    pub const AUTH_HMAC_SHA256: &str = "hmac(sha256)";
    /// HMAC-SHA2-384
    pub const AUTH_HMAC_SHA384: &str = "hmac(sha384)";
    /// HMAC-SHA2-512
    pub const AUTH_HMAC_SHA512: &str = "hmac(sha512)";
}

/// Algorithm descriptor handed to the packet-protection subsystem when a
/// Child SA is installed
#[derive(Clone, PartialEq, Eq)]
pub struct DataPlaneAlgorithm {
    /// Data plane algorithm name (see [`data_plane`])
    pub name: &'static str,
    /// Key material
    pub key: Zeroizing<Vec<u8>>,
    /// Truncation / ICV length in bits, 0 for pure encryption
    pub trunc_len_bits: u32,
}

impl fmt::Debug for DataPlaneAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataPlaneAlgorithm")
            .field("name", &self.name)
            .field("key_len", &self.key.len())
            .field("trunc_len_bits", &self.trunc_len_bits)
            .finish()
    }
}
