//! Cipher implementations for IKEv2 encryption
//!
//! Implements the encryption transforms used for the SK payload (RFC 7296
//! Section 3.14) and handed to the data plane for Child SAs:
//!
//! - normal mode: ENCR_3DES and ENCR_AES_CBC. Input must be padded to the
//!   block size by the caller; output has the same length as the input.
//! - combined mode: ENCR_AES_GCM_8/12/16 (RFC 5282). The keying material is
//!   the AES key followed by a 4-byte salt; the GCM nonce is `salt | IV`.
//!   Sealed output is `ciphertext | ICV`.
//!
//! Every call builds a fresh primitive from the supplied key, so an
//! [`IkeCipher`] can be shared freely between threads.

use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::consts::{U12, U16};
use aes_gcm::aead::{AeadCore, AeadInPlace, Nonce, Tag};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use cipher::block_padding::NoPadding;
use cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use des::TdesEde3;
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::logging;
use crate::transform::{
    data_plane, DataPlaneAlgorithm, EncrTransformId, TransformDescriptor, TransformType,
    KEY_LEN_UNSPECIFIED,
};
use crate::{Error, Result};

type Aes192Gcm = AesGcm<Aes192, U12>;

/// 3DES key length in bytes
const TRIPLE_DES_KEY_LEN: usize = 24;

/// DES block size (and CBC IV length) in bytes
const DES_BLOCK_SIZE: usize = 8;

/// AES block size (and CBC IV length) in bytes
const AES_BLOCK_SIZE: usize = 16;

/// Explicit IV carried in each message for AES-GCM (RFC 5282 Section 3.1)
const GCM_IV_LEN: usize = 8;

/// Salt appended to the AES-GCM key in the keying material (RFC 5282 Section 7.1)
pub const GCM_SALT_LEN: usize = 4;

/// Full GCM tag length; shorter ICVs are its leftmost bytes
const GCM_FULL_ICV_LEN: usize = 16;

/// Cipher algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherAlgorithm {
    /// 3DES-EDE in CBC mode
    TripleDesCbc,
    /// AES in CBC mode
    AesCbc {
        /// AES key length in bytes (16, 24 or 32)
        key_len: usize,
    },
    /// AES-GCM combined mode (AEAD)
    AesGcm {
        /// AES key length in bytes (16, 24 or 32), salt excluded
        key_len: usize,
        /// ICV length in bytes (8, 12 or 16)
        icv_len: usize,
    },
}

impl CipherAlgorithm {
    /// Get key material length in bytes
    ///
    /// For AES-GCM this includes the 4-byte salt.
    pub fn key_len(self) -> usize {
        match self {
            CipherAlgorithm::TripleDesCbc => TRIPLE_DES_KEY_LEN,
            CipherAlgorithm::AesCbc { key_len } => key_len,
            CipherAlgorithm::AesGcm { key_len, .. } => key_len + GCM_SALT_LEN,
        }
    }

    /// Get IV length in bytes
    pub fn iv_len(self) -> usize {
        match self {
            CipherAlgorithm::TripleDesCbc => DES_BLOCK_SIZE,
            CipherAlgorithm::AesCbc { .. } => AES_BLOCK_SIZE,
            CipherAlgorithm::AesGcm { .. } => GCM_IV_LEN,
        }
    }

    /// Get cipher block size in bytes
    pub fn block_size(self) -> usize {
        match self {
            CipherAlgorithm::TripleDesCbc => DES_BLOCK_SIZE,
            CipherAlgorithm::AesCbc { .. } | CipherAlgorithm::AesGcm { .. } => AES_BLOCK_SIZE,
        }
    }

    /// Get authentication tag length in bytes (0 for normal-mode ciphers)
    pub fn icv_len(self) -> usize {
        match self {
            CipherAlgorithm::AesGcm { icv_len, .. } => icv_len,
            _ => 0,
        }
    }

    /// Check if this is an AEAD cipher
    pub fn is_aead(self) -> bool {
        matches!(self, CipherAlgorithm::AesGcm { .. })
    }

    /// Get algorithm name
    pub fn name(self) -> &'static str {
        match self {
            CipherAlgorithm::TripleDesCbc => "3DES-CBC",
            CipherAlgorithm::AesCbc { .. } => "AES-CBC",
            CipherAlgorithm::AesGcm { icv_len: 8, .. } => "AES-GCM-8",
            CipherAlgorithm::AesGcm { icv_len: 12, .. } => "AES-GCM-12",
            CipherAlgorithm::AesGcm { .. } => "AES-GCM-16",
        }
    }

    fn transform_id(self) -> EncrTransformId {
        match self {
            CipherAlgorithm::TripleDesCbc => EncrTransformId::TripleDes,
            CipherAlgorithm::AesCbc { .. } => EncrTransformId::AesCbc,
            CipherAlgorithm::AesGcm { icv_len: 8, .. } => EncrTransformId::AesGcm8,
            CipherAlgorithm::AesGcm { icv_len: 12, .. } => EncrTransformId::AesGcm12,
            CipherAlgorithm::AesGcm { .. } => EncrTransformId::AesGcm16,
        }
    }
}

/// Negotiated encryption transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IkeCipher {
    algorithm: CipherAlgorithm,
    descriptor: TransformDescriptor,
}

impl IkeCipher {
    /// Create a cipher from a negotiated transform ID and Key Length attribute
    ///
    /// # Arguments
    ///
    /// * `transform_id` - ENCR transform ID
    /// * `key_len_bits` - Key Length attribute in bits; must be 128, 192 or
    ///   256 for AES and [`KEY_LEN_UNSPECIFIED`] (or 192) for 3DES
    pub fn create(transform_id: u16, key_len_bits: u16) -> Result<Self> {
        let id = match EncrTransformId::from_u16(transform_id) {
            Some(id) => id,
            None => {
                logging::log_unsupported_algorithm("ENCR", transform_id);
                return Err(Error::UnsupportedAlgorithm {
                    transform_type: TransformType::Encr,
                    id: transform_id,
                });
            }
        };

        let algorithm = match id {
            EncrTransformId::TripleDes => {
                if key_len_bits != KEY_LEN_UNSPECIFIED
                    && usize::from(key_len_bits) != TRIPLE_DES_KEY_LEN * 8
                {
                    return Err(Error::InvalidParameter(format!(
                        "3DES has a fixed key length, got {} bits",
                        key_len_bits
                    )));
                }
                CipherAlgorithm::TripleDesCbc
            }
            EncrTransformId::AesCbc => CipherAlgorithm::AesCbc {
                key_len: aes_key_len(key_len_bits)?,
            },
            EncrTransformId::AesGcm8 => CipherAlgorithm::AesGcm {
                key_len: aes_key_len(key_len_bits)?,
                icv_len: 8,
            },
            EncrTransformId::AesGcm12 => CipherAlgorithm::AesGcm {
                key_len: aes_key_len(key_len_bits)?,
                icv_len: 12,
            },
            EncrTransformId::AesGcm16 => CipherAlgorithm::AesGcm {
                key_len: aes_key_len(key_len_bits)?,
                icv_len: 16,
            },
        };

        Ok(Self::new(algorithm))
    }

    fn new(algorithm: CipherAlgorithm) -> Self {
        let descriptor = TransformDescriptor::new(
            TransformType::Encr,
            algorithm.transform_id().to_u16(),
            algorithm.key_len(),
            algorithm.name(),
        );
        logging::log_transform_created("ENCR", descriptor.name, descriptor.key_len);
        Self {
            algorithm,
            descriptor,
        }
    }

    /// Get algorithm
    pub fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    /// Get transform descriptor
    pub fn descriptor(&self) -> &TransformDescriptor {
        &self.descriptor
    }

    /// Get key material length in bytes (salt included for AES-GCM)
    pub fn key_len(&self) -> usize {
        self.descriptor.key_len
    }

    /// Get IV length in bytes
    pub fn iv_len(&self) -> usize {
        self.algorithm.iv_len()
    }

    /// Get block size in bytes
    pub fn block_size(&self) -> usize {
        self.algorithm.block_size()
    }

    /// Get ICV length in bytes (0 for normal-mode ciphers)
    pub fn icv_len(&self) -> usize {
        self.algorithm.icv_len()
    }

    /// Check if this is an AEAD (combined-mode) cipher
    pub fn is_aead(&self) -> bool {
        self.algorithm.is_aead()
    }

    /// Generate a fresh IV from the operating system CSPRNG
    pub fn generate_iv(&self) -> Vec<u8> {
        let mut iv = vec![0u8; self.iv_len()];
        OsRng.fill_bytes(&mut iv);
        iv
    }

    /// Encrypt block-aligned data with a normal-mode cipher
    ///
    /// # Arguments
    ///
    /// * `padded_data` - Plaintext already padded to `block_size()`
    /// * `key` - Encryption key (SK_e)
    /// * `iv` - Initialization vector of `iv_len()` bytes
    ///
    /// # Returns
    ///
    /// Returns ciphertext of the same length as the input
    pub fn encrypt(&self, padded_data: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        self.require_mode(false)?;
        self.check_key_and_iv(key, iv)?;
        self.check_block_aligned(padded_data)?;

        match self.algorithm {
            CipherAlgorithm::TripleDesCbc => cbc_encrypt::<TdesEde3>(key, iv, padded_data),
            CipherAlgorithm::AesCbc { key_len: 16 } => cbc_encrypt::<Aes128>(key, iv, padded_data),
            CipherAlgorithm::AesCbc { key_len: 24 } => cbc_encrypt::<Aes192>(key, iv, padded_data),
            CipherAlgorithm::AesCbc { .. } => cbc_encrypt::<Aes256>(key, iv, padded_data),
            CipherAlgorithm::AesGcm { .. } => Err(self.mode_error()),
        }
    }

    /// Decrypt block-aligned data with a normal-mode cipher
    ///
    /// Fails with [`Error::NotBlockAligned`] before touching the cipher if
    /// `data` is not a multiple of the block size. Padding is left in place.
    pub fn decrypt(&self, data: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        self.require_mode(false)?;
        self.check_key_and_iv(key, iv)?;
        self.check_block_aligned(data)?;

        match self.algorithm {
            CipherAlgorithm::TripleDesCbc => cbc_decrypt::<TdesEde3>(key, iv, data),
            CipherAlgorithm::AesCbc { key_len: 16 } => cbc_decrypt::<Aes128>(key, iv, data),
            CipherAlgorithm::AesCbc { key_len: 24 } => cbc_decrypt::<Aes192>(key, iv, data),
            CipherAlgorithm::AesCbc { .. } => cbc_decrypt::<Aes256>(key, iv, data),
            CipherAlgorithm::AesGcm { .. } => Err(self.mode_error()),
        }
    }

    /// Encrypt and authenticate with a combined-mode cipher
    ///
    /// # Arguments
    ///
    /// * `plaintext` - Data to encrypt
    /// * `aad` - Additional authenticated data (IKE header and SK payload header)
    /// * `key` - Keying material: AES key followed by the 4-byte salt
    /// * `iv` - 8-byte explicit IV
    ///
    /// # Returns
    ///
    /// Returns ciphertext with the ICV appended
    pub fn seal(&self, plaintext: &[u8], aad: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        self.require_mode(true)?;
        self.check_key_and_iv(key, iv)?;

        let (aes_key, nonce) = self.split_gcm_key(key, iv);
        let icv_len = self.icv_len();
        match aes_key.len() {
            16 => gcm_seal::<Aes128Gcm>(aes_key, &nonce, aad, plaintext, icv_len),
            24 => gcm_seal::<Aes192Gcm>(aes_key, &nonce, aad, plaintext, icv_len),
            _ => gcm_seal::<Aes256Gcm>(aes_key, &nonce, aad, plaintext, icv_len),
        }
    }

    /// Verify and decrypt with a combined-mode cipher
    ///
    /// Fails closed: if the ICV does not verify, no plaintext is returned and
    /// the error is [`Error::AuthenticationFailed`].
    pub fn open(
        &self,
        ciphertext_and_icv: &[u8],
        aad: &[u8],
        key: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>> {
        self.require_mode(true)?;
        self.check_key_and_iv(key, iv)?;

        let icv_len = self.icv_len();
        if ciphertext_and_icv.len() < icv_len {
            return Err(Error::BufferTooShort {
                required: icv_len,
                available: ciphertext_and_icv.len(),
            });
        }

        let (aes_key, nonce) = self.split_gcm_key(key, iv);
        let result = match aes_key.len() {
            16 => gcm_open::<Aes128Gcm>(aes_key, &nonce, aad, ciphertext_and_icv, icv_len),
            24 => gcm_open::<Aes192Gcm>(aes_key, &nonce, aad, ciphertext_and_icv, icv_len),
            _ => gcm_open::<Aes256Gcm>(aes_key, &nonce, aad, ciphertext_and_icv, icv_len),
        };

        if let Err(Error::AuthenticationFailed(_)) = &result {
            logging::log_authentication_failed(self.descriptor.name, "AEAD open");
        }
        result
    }

    /// Build the data-plane descriptor used to install this cipher in a
    /// Child SA
    ///
    /// 3DES is not offered to the data plane.
    pub fn build_key_descriptor(&self, key: &[u8]) -> Result<DataPlaneAlgorithm> {
        self.check_key(key)?;

        match self.algorithm {
            CipherAlgorithm::TripleDesCbc => {
                logging::log_data_plane_unsupported(self.descriptor.name);
                Err(Error::UnsupportedByDataPlane(self.descriptor.name))
            }
            CipherAlgorithm::AesCbc { .. } => Ok(DataPlaneAlgorithm {
                name: data_plane::CRYPT_AES_CBC,
                key: Zeroizing::new(key.to_vec()),
                trunc_len_bits: 0,
            }),
            CipherAlgorithm::AesGcm { icv_len, .. } => Ok(DataPlaneAlgorithm {
                name: data_plane::AUTH_CRYPT_AES_GCM,
                key: Zeroizing::new(key.to_vec()),
                trunc_len_bits: (icv_len * 8) as u32,
            }),
        }
    }

    fn require_mode(&self, aead: bool) -> Result<()> {
        if self.is_aead() == aead {
            Ok(())
        } else {
            Err(self.mode_error())
        }
    }

    fn mode_error(&self) -> Error {
        let mode = if self.is_aead() { "combined" } else { "normal" };
        Error::InvalidParameter(format!("{} is a {}-mode cipher", self.descriptor.name, mode))
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

    fn check_key_and_iv(&self, key: &[u8], iv: &[u8]) -> Result<()> {
        self.check_key(key)?;
        if iv.len() != self.iv_len() {
            return Err(Error::InvalidIvLength {
                expected: self.iv_len(),
                actual: iv.len(),
            });
        }
        Ok(())
    }

    fn check_block_aligned(&self, data: &[u8]) -> Result<()> {
        if data.len() % self.block_size() != 0 {
            return Err(Error::NotBlockAligned {
                len: data.len(),
                block_size: self.block_size(),
            });
        }
        Ok(())
    }

    // Key and IV lengths are validated by the caller.
    fn split_gcm_key<'k>(&self, key: &'k [u8], iv: &[u8]) -> (&'k [u8], [u8; 12]) {
        let (aes_key, salt) = key.split_at(key.len() - GCM_SALT_LEN);
        let mut nonce = [0u8; 12];
        nonce[..GCM_SALT_LEN].copy_from_slice(salt);
        nonce[GCM_SALT_LEN..].copy_from_slice(iv);
        (aes_key, nonce)
    }
}

fn aes_key_len(key_len_bits: u16) -> Result<usize> {
    match key_len_bits {
        128 | 192 | 256 => Ok(usize::from(key_len_bits) / 8),
        _ => Err(Error::InvalidParameter(format!(
            "invalid AES key length: {} bits",
            key_len_bits
        ))),
    }
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let mut buffer = data.to_vec();
    cbc::Encryptor::<C>::new_from_slices(key, iv)?
        .encrypt_padded_mut::<NoPadding>(&mut buffer, data.len())
        .map_err(|_| Error::CryptoError("CBC encryption failed".into()))?;
    Ok(buffer)
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    let mut buffer = data.to_vec();
    cbc::Decryptor::<C>::new_from_slices(key, iv)?
        .decrypt_padded_mut::<NoPadding>(&mut buffer)
        .map_err(|_| Error::CryptoError("CBC decryption failed".into()))?;
    Ok(buffer)
}

fn gcm_seal<A>(
    key: &[u8],
    nonce: &[u8; 12],
    aad: &[u8],
    plaintext: &[u8],
    icv_len: usize,
) -> Result<Vec<u8>>
where
    A: AeadInPlace + AeadCore<NonceSize = U12, TagSize = U16> + KeyInit,
{
    let cipher = A::new_from_slice(key)?;
    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<A>::from_slice(nonce), aad, &mut buffer)
        .map_err(|_| Error::CryptoError("AES-GCM encryption failed".into()))?;

    // Truncated ICVs are the leftmost bytes of the full tag
    buffer.extend_from_slice(&tag[..icv_len]);
    Ok(buffer)
}

fn gcm_open<A>(
    key: &[u8],
    nonce: &[u8; 12],
    aad: &[u8],
    ciphertext_and_icv: &[u8],
    icv_len: usize,
) -> Result<Vec<u8>>
where
    A: AeadInPlace + AeadCore<NonceSize = U12, TagSize = U16> + KeyInit,
{
    let cipher = A::new_from_slice(key)?;
    let nonce = Nonce::<A>::from_slice(nonce);
    let (ciphertext, icv) = ciphertext_and_icv.split_at(ciphertext_and_icv.len() - icv_len);
    let mut buffer = ciphertext.to_vec();

    if icv_len == GCM_FULL_ICV_LEN {
        let tag = Tag::<A>::from_slice(icv);
        return match cipher.decrypt_in_place_detached(nonce, aad, &mut buffer, tag) {
            Ok(()) => Ok(buffer),
            Err(_) => {
                buffer.zeroize();
                Err(Error::AuthenticationFailed("AES-GCM ICV mismatch".into()))
            }
        };
    }

    // Truncated ICV: recover the plaintext with the GCM keystream, then
    // recompute the full tag over the received ciphertext and compare its
    // leftmost bytes.
    let mut keystream = Zeroizing::new(vec![0u8; ciphertext.len()]);
    cipher
        .encrypt_in_place_detached(nonce, &[], &mut keystream[..])
        .map_err(|_| Error::CryptoError("AES-GCM decryption failed".into()))?;
    for (b, k) in buffer.iter_mut().zip(keystream.iter()) {
        *b ^= k;
    }

    let mut resealed = buffer.clone();
    let tag = cipher
        .encrypt_in_place_detached(nonce, aad, &mut resealed)
        .map_err(|_| Error::CryptoError("AES-GCM decryption failed".into()))?;

    if bool::from(tag[..icv_len].ct_eq(icv)) {
        Ok(buffer)
    } else {
        buffer.zeroize();
        resealed.zeroize();
        Err(Error::AuthenticationFailed("AES-GCM ICV mismatch".into()))
    }
}
