//! Negotiated transform configuration
//!
//! Provides the transform selection handed over by SA negotiation and a
//! builder for it, plus [`SaTransforms`] which instantiates the selected
//! cipher, integrity algorithm and PRF.

use crate::crypto::cipher::IkeCipher;
use crate::crypto::integrity::IntegrityTransform;
use crate::crypto::prf::PrfTransform;
use crate::transform::{EncrTransformId, IntegTransformId, KEY_LEN_UNSPECIFIED};
use crate::{Error, Result};

/// Transforms selected for one SA
///
/// IKE SAs carry a PRF; Child SAs do not. Integrity is `None` (or
/// `Some(0)`, the NONE transform) exactly when the cipher is AEAD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformConfig {
    /// ENCR transform ID
    pub encr_id: u16,

    /// Key Length attribute in bits (0 when not present)
    pub encr_key_len_bits: u16,

    /// INTEG transform ID
    pub integ_id: Option<u16>,

    /// PRF transform ID
    pub prf_id: Option<u16>,
}

impl TransformConfig {
    /// Create builder for transform configuration
    pub fn builder() -> TransformConfigBuilder {
        TransformConfigBuilder::new()
    }

    /// Validate the combination of transforms (RFC 7296 Section 3.3.3)
    pub fn validate(&self) -> Result<()> {
        let encr = EncrTransformId::from_u16(self.encr_id).ok_or_else(|| {
            Error::InvalidParameter(format!("unknown encryption transform {}", self.encr_id))
        })?;

        match (encr.is_aead(), self.integrity_id()) {
            (true, Some(id)) => Err(Error::InvalidParameter(format!(
                "AEAD encryption cannot be combined with integrity transform {}",
                id
            ))),
            (false, None) => Err(Error::InvalidParameter(
                "normal-mode encryption requires an integrity transform".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Integrity transform ID, with NONE mapped to `None`
    pub fn integrity_id(&self) -> Option<u16> {
        self.integ_id.filter(|&id| id != IntegTransformId::None.to_u16())
    }
}

/// Builder for TransformConfig
#[derive(Default)]
pub struct TransformConfigBuilder {
    encr_id: Option<u16>,
    encr_key_len_bits: Option<u16>,
    integ_id: Option<u16>,
    prf_id: Option<u16>,
}

impl TransformConfigBuilder {
    /// Create new transform configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set encryption transform and Key Length attribute
    pub fn with_encryption(mut self, transform_id: u16, key_len_bits: u16) -> Self {
        self.encr_id = Some(transform_id);
        self.encr_key_len_bits = Some(key_len_bits);
        self
    }

    /// Set integrity transform
    pub fn with_integrity(mut self, transform_id: u16) -> Self {
        self.integ_id = Some(transform_id);
        self
    }

    /// Set PRF transform
    pub fn with_prf(mut self, transform_id: u16) -> Self {
        self.prf_id = Some(transform_id);
        self
    }

    /// Build TransformConfig with validation
    pub fn build(self) -> Result<TransformConfig> {
        let config = TransformConfig {
            encr_id: self
                .encr_id
                .ok_or_else(|| Error::InvalidParameter("encryption transform is required".into()))?,
            encr_key_len_bits: self.encr_key_len_bits.unwrap_or(KEY_LEN_UNSPECIFIED),
            integ_id: self.integ_id,
            prf_id: self.prf_id,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Instantiated transforms of one SA
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaTransforms {
    /// Encryption transform
    pub cipher: IkeCipher,

    /// Integrity transform (`None` for AEAD)
    pub integrity: Option<IntegrityTransform>,

    /// PRF (`None` for Child SAs)
    pub prf: Option<PrfTransform>,
}

impl SaTransforms {
    /// Instantiate the transforms named by a configuration
    pub fn from_config(config: &TransformConfig) -> Result<Self> {
        config.validate()?;

        let cipher = IkeCipher::create(config.encr_id, config.encr_key_len_bits)?;
        let integrity = config
            .integrity_id()
            .map(IntegrityTransform::create)
            .transpose()?;
        let prf = config.prf_id.map(PrfTransform::create).transpose()?;

        Ok(Self {
            cipher,
            integrity,
            prf,
        })
    }

    /// Encryption key length in bytes (salt included for AEAD)
    pub fn encr_key_len(&self) -> usize {
        self.cipher.key_len()
    }

    /// Integrity key length in bytes (0 for AEAD)
    pub fn integ_key_len(&self) -> usize {
        self.integrity.map_or(0, |integ| integ.key_len())
    }

    /// PRF of an IKE SA
    pub fn require_prf(&self) -> Result<&PrfTransform> {
        self.prf
            .as_ref()
            .ok_or_else(|| Error::InvalidParameter("no PRF negotiated".into()))
    }
}
