//! IKEv2 key schedule
//!
//! Slices the output of prf+ into the per-direction keys of an IKE SA
//! (RFC 7296 Section 2.14) and of a Child SA (Section 2.17). All keys are
//! held in buffers that are wiped on drop.

use std::fmt;

use zeroize::Zeroizing;

use crate::crypto::prf::PrfTransform;
use crate::Result;

/// IKE SA key material
///
/// ```text
/// {SK_d | SK_ai | SK_ar | SK_ei | SK_er | SK_pi | SK_pr}
///     = prf+ (SKEYSEED, Ni | Nr | SPIi | SPIr)
/// ```
#[derive(Clone)]
pub struct IkeSaKeys {
    /// SK_d - Key for deriving Child SA keys
    pub sk_d: Zeroizing<Vec<u8>>,

    /// SK_ai - Initiator's integrity key
    pub sk_ai: Zeroizing<Vec<u8>>,

    /// SK_ar - Responder's integrity key
    pub sk_ar: Zeroizing<Vec<u8>>,

    /// SK_ei - Initiator's encryption key
    pub sk_ei: Zeroizing<Vec<u8>>,

    /// SK_er - Responder's encryption key
    pub sk_er: Zeroizing<Vec<u8>>,

    /// SK_pi - Initiator's AUTH payload key
    pub sk_pi: Zeroizing<Vec<u8>>,

    /// SK_pr - Responder's AUTH payload key
    pub sk_pr: Zeroizing<Vec<u8>>,
}

impl IkeSaKeys {
    /// Derive the keys of a new IKE SA
    ///
    /// ```text
    /// SKEYSEED = prf(Ni | Nr, g^ir)
    /// ```
    ///
    /// # Arguments
    ///
    /// * `prf` - Negotiated PRF
    /// * `nonce_i` - Initiator's nonce
    /// * `nonce_r` - Responder's nonce
    /// * `shared_secret` - DH shared secret (g^ir)
    /// * `spi_i` - Initiator's SPI
    /// * `spi_r` - Responder's SPI
    /// * `integ_key_len` - Integrity key length in bytes (0 for AEAD)
    /// * `encr_key_len` - Encryption key length in bytes (salt included for AEAD)
    pub fn derive(
        prf: &PrfTransform,
        nonce_i: &[u8],
        nonce_r: &[u8],
        shared_secret: &[u8],
        spi_i: &[u8; 8],
        spi_r: &[u8; 8],
        integ_key_len: usize,
        encr_key_len: usize,
    ) -> Result<Self> {
        let skeyseed = prf.generate_skeyseed(nonce_i, nonce_r, shared_secret)?;
        Self::expand(
            prf,
            &skeyseed,
            nonce_i,
            nonce_r,
            spi_i,
            spi_r,
            integ_key_len,
            encr_key_len,
        )
    }

    /// Derive the keys of the IKE SA replacing a rekeyed one
    ///
    /// ```text
    /// SKEYSEED = prf(SK_d (old), g^ir (new) | Ni | Nr)
    /// ```
    ///
    /// SKEYSEED is computed with the PRF of the old IKE SA; the key
    /// expansion uses the PRF negotiated for the new one.
    pub fn derive_rekeyed(
        old_prf: &PrfTransform,
        old_sk_d: &[u8],
        new_prf: &PrfTransform,
        nonce_i: &[u8],
        nonce_r: &[u8],
        shared_secret: &[u8],
        spi_i: &[u8; 8],
        spi_r: &[u8; 8],
        integ_key_len: usize,
        encr_key_len: usize,
    ) -> Result<Self> {
        let skeyseed =
            old_prf.generate_rekeyed_skeyseed(old_sk_d, nonce_i, nonce_r, shared_secret)?;
        Self::expand(
            new_prf,
            &skeyseed,
            nonce_i,
            nonce_r,
            spi_i,
            spi_r,
            integ_key_len,
            encr_key_len,
        )
    }

    fn expand(
        prf: &PrfTransform,
        skeyseed: &[u8],
        nonce_i: &[u8],
        nonce_r: &[u8],
        spi_i: &[u8; 8],
        spi_r: &[u8; 8],
        integ_key_len: usize,
        encr_key_len: usize,
    ) -> Result<Self> {
        let seed = [nonce_i, nonce_r, &spi_i[..], &spi_r[..]].concat();

        // SK_d, SK_pi and SK_pr take the preferred key length of the PRF
        let prf_key_len = prf.key_len();
        let total_len = 3 * prf_key_len + 2 * integ_key_len + 2 * encr_key_len;
        let keymat = prf.generate_keymat(skeyseed, &seed, total_len)?;

        let mut reader = KeymatReader::new(&keymat);
        Ok(IkeSaKeys {
            sk_d: reader.take(prf_key_len),
            sk_ai: reader.take(integ_key_len),
            sk_ar: reader.take(integ_key_len),
            sk_ei: reader.take(encr_key_len),
            sk_er: reader.take(encr_key_len),
            sk_pi: reader.take(prf_key_len),
            sk_pr: reader.take(prf_key_len),
        })
    }
}

impl fmt::Debug for IkeSaKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IkeSaKeys")
            .field("sk_d_len", &self.sk_d.len())
            .field("sk_a_len", &self.sk_ai.len())
            .field("sk_e_len", &self.sk_ei.len())
            .field("sk_p_len", &self.sk_pi.len())
            .finish()
    }
}

/// Child SA key material
///
/// ```text
/// KEYMAT = prf+ (SK_d, [g^ir (new) |] Ni | Nr)
/// ```
///
/// sliced as `SK_ei | SK_ai | SK_er | SK_ar`.
#[derive(Clone)]
pub struct ChildSaKeys {
    /// Initiator-to-responder encryption key
    pub sk_ei: Zeroizing<Vec<u8>>,

    /// Initiator-to-responder integrity key (empty for AEAD)
    pub sk_ai: Zeroizing<Vec<u8>>,

    /// Responder-to-initiator encryption key
    pub sk_er: Zeroizing<Vec<u8>>,

    /// Responder-to-initiator integrity key (empty for AEAD)
    pub sk_ar: Zeroizing<Vec<u8>>,
}

impl ChildSaKeys {
    /// Derive Child SA keys from SK_d
    ///
    /// `shared_secret` is the fresh DH secret when PFS was negotiated for
    /// the CREATE_CHILD_SA exchange.
    pub fn derive(
        prf: &PrfTransform,
        sk_d: &[u8],
        nonce_i: &[u8],
        nonce_r: &[u8],
        shared_secret: Option<&[u8]>,
        integ_key_len: usize,
        encr_key_len: usize,
    ) -> Result<Self> {
        let seed = Zeroizing::new(match shared_secret {
            Some(secret) => [secret, nonce_i, nonce_r].concat(),
            None => [nonce_i, nonce_r].concat(),
        });

        let total_len = 2 * encr_key_len + 2 * integ_key_len;
        let keymat = prf.generate_keymat(sk_d, &seed, total_len)?;

        let mut reader = KeymatReader::new(&keymat);
        Ok(ChildSaKeys {
            sk_ei: reader.take(encr_key_len),
            sk_ai: reader.take(integ_key_len),
            sk_er: reader.take(encr_key_len),
            sk_ar: reader.take(integ_key_len),
        })
    }
}

impl fmt::Debug for ChildSaKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildSaKeys")
            .field("sk_e_len", &self.sk_ei.len())
            .field("sk_a_len", &self.sk_ai.len())
            .finish()
    }
}

// prf+ output is always exactly the sum of the requested slices.
struct KeymatReader<'a> {
    keymat: &'a [u8],
    offset: usize,
}

impl<'a> KeymatReader<'a> {
    fn new(keymat: &'a [u8]) -> Self {
        Self { keymat, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Zeroizing<Vec<u8>> {
        let key = Zeroizing::new(self.keymat[self.offset..self.offset + len].to_vec());
        self.offset += len;
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::prf::PrfAlgorithm;

    const SPI_I: [u8; 8] = [0x04; 8];
    const SPI_R: [u8; 8] = [0x05; 8];

    fn derive_sha256(shared_secret: &[u8]) -> IkeSaKeys {
        let prf = PrfTransform::new(PrfAlgorithm::HmacSha256);
        IkeSaKeys::derive(
            &prf,
            &[0x01; 32],
            &[0x02; 32],
            shared_secret,
            &SPI_I,
            &SPI_R,
            32,
            32,
        )
        .unwrap()
    }

    #[test]
    fn test_ike_sa_key_lengths() {
        let keys = derive_sha256(&[0x03; 256]);

        assert_eq!(keys.sk_d.len(), 32);
        assert_eq!(keys.sk_ai.len(), 32);
        assert_eq!(keys.sk_ar.len(), 32);
        assert_eq!(keys.sk_ei.len(), 32);
        assert_eq!(keys.sk_er.len(), 32);
        assert_eq!(keys.sk_pi.len(), 32);
        assert_eq!(keys.sk_pr.len(), 32);

        assert_ne!(keys.sk_d, keys.sk_ai);
        assert_ne!(keys.sk_ai, keys.sk_ar);
        assert_ne!(keys.sk_ei, keys.sk_er);
        assert_ne!(keys.sk_pi, keys.sk_pr);
    }

    #[test]
    fn test_ike_sa_keys_deterministic() {
        let keys1 = derive_sha256(&[0x03; 256]);
        let keys2 = derive_sha256(&[0x03; 256]);
        assert_eq!(keys1.sk_d, keys2.sk_d);
        assert_eq!(keys1.sk_er, keys2.sk_er);

        let keys3 = derive_sha256(&[0x06; 256]);
        assert_ne!(keys1.sk_d, keys3.sk_d);
    }

    #[test]
    fn test_ike_sa_keys_match_prf_plus_layout() {
        let prf = PrfTransform::new(PrfAlgorithm::HmacSha1);
        let (ni, nr, secret) = ([0x11u8; 16], [0x22u8; 16], [0x33u8; 64]);
        let keys = IkeSaKeys::derive(&prf, &ni, &nr, &secret, &SPI_I, &SPI_R, 20, 16).unwrap();

        let skeyseed = prf.generate_skeyseed(&ni, &nr, &secret).unwrap();
        let seed = [&ni[..], &nr[..], &SPI_I[..], &SPI_R[..]].concat();
        let keymat = prf.generate_keymat(&skeyseed, &seed, 3 * 20 + 2 * 20 + 2 * 16).unwrap();

        assert_eq!(&keys.sk_d[..], &keymat[..20]);
        assert_eq!(&keys.sk_ai[..], &keymat[20..40]);
        assert_eq!(&keys.sk_ei[..], &keymat[60..76]);
        assert_eq!(&keys.sk_pr[..], &keymat[112..132]);
    }

    #[test]
    fn test_ike_sa_keys_xcbc_prf() {
        let prf = PrfTransform::new(PrfAlgorithm::Aes128Xcbc);
        let keys =
            IkeSaKeys::derive(&prf, &[0x01; 16], &[0x02; 16], &[0x03; 128], &SPI_I, &SPI_R, 16, 16)
                .unwrap();
        assert_eq!(keys.sk_d.len(), 16);
        assert_eq!(keys.sk_pi.len(), 16);
    }

    #[test]
    fn test_ike_sa_keys_aead_no_integrity() {
        let prf = PrfTransform::new(PrfAlgorithm::HmacSha384);
        let keys =
            IkeSaKeys::derive(&prf, &[0x01; 32], &[0x02; 32], &[0x03; 384], &SPI_I, &SPI_R, 0, 36)
                .unwrap();
        assert!(keys.sk_ai.is_empty());
        assert!(keys.sk_ar.is_empty());
        assert_eq!(keys.sk_ei.len(), 36);
        assert_eq!(keys.sk_d.len(), 48);
    }

    #[test]
    fn test_ike_sa_keys_short_xcbc_nonce() {
        let prf = PrfTransform::new(PrfAlgorithm::Aes128Xcbc);
        let result =
            IkeSaKeys::derive(&prf, &[0x01; 4], &[0x02; 16], &[0x03; 32], &SPI_I, &SPI_R, 16, 16);
        assert!(result.is_err());
    }

    #[test]
    fn test_rekeyed_keys_differ_from_original() {
        let prf = PrfTransform::new(PrfAlgorithm::HmacSha256);
        let old = derive_sha256(&[0x03; 256]);

        let rekeyed = IkeSaKeys::derive_rekeyed(
            &prf,
            &old.sk_d,
            &prf,
            &[0x07; 32],
            &[0x08; 32],
            &[0x09; 256],
            &[0x0a; 8],
            &[0x0b; 8],
            32,
            32,
        )
        .unwrap();

        assert_eq!(rekeyed.sk_d.len(), 32);
        assert_ne!(rekeyed.sk_d, old.sk_d);
        assert_ne!(rekeyed.sk_ei, old.sk_ei);
    }

    #[test]
    fn test_rekeyed_keys_use_new_prf_for_expansion() {
        let old_prf = PrfTransform::new(PrfAlgorithm::HmacSha256);
        let new_prf = PrfTransform::new(PrfAlgorithm::HmacSha512);
        let old_sk_d = [0x5a; 32];

        let keys = IkeSaKeys::derive_rekeyed(
            &old_prf,
            &old_sk_d,
            &new_prf,
            &[0x01; 32],
            &[0x02; 32],
            &[0x03; 64],
            &SPI_I,
            &SPI_R,
            64,
            32,
        )
        .unwrap();
        assert_eq!(keys.sk_d.len(), 64);

        let skeyseed = old_prf
            .generate_rekeyed_skeyseed(&old_sk_d, &[0x01; 32], &[0x02; 32], &[0x03; 64])
            .unwrap();
        assert_eq!(skeyseed.len(), 32);
        let seed = [&[0x01u8; 32][..], &[0x02u8; 32][..], &SPI_I[..], &SPI_R[..]].concat();
        let keymat = new_prf.generate_keymat(&skeyseed, &seed, 64).unwrap();
        assert_eq!(&keys.sk_d[..], &keymat[..]);
    }

    #[test]
    fn test_child_sa_keys() {
        let prf = PrfTransform::new(PrfAlgorithm::HmacSha256);
        let sk_d = [0xAA; 32];
        let keys = ChildSaKeys::derive(&prf, &sk_d, &[0x01; 32], &[0x02; 32], None, 32, 16).unwrap();

        assert_eq!(keys.sk_ei.len(), 16);
        assert_eq!(keys.sk_ai.len(), 32);
        assert_eq!(keys.sk_er.len(), 16);
        assert_eq!(keys.sk_ar.len(), 32);
        assert_ne!(keys.sk_ei, keys.sk_er);

        let seed = [[0x01u8; 32], [0x02u8; 32]].concat();
        let keymat = prf.generate_keymat(&sk_d, &seed, 96).unwrap();
        assert_eq!(&keys.sk_ei[..], &keymat[..16]);
        assert_eq!(&keys.sk_ai[..], &keymat[16..48]);
        assert_eq!(&keys.sk_er[..], &keymat[48..64]);
        assert_eq!(&keys.sk_ar[..], &keymat[64..]);
    }

    #[test]
    fn test_child_sa_keys_pfs() {
        let prf = PrfTransform::new(PrfAlgorithm::HmacSha256);
        let sk_d = [0xAA; 32];
        let without = ChildSaKeys::derive(&prf, &sk_d, &[0x01; 32], &[0x02; 32], None, 0, 20).unwrap();
        let with = ChildSaKeys::derive(
            &prf,
            &sk_d,
            &[0x01; 32],
            &[0x02; 32],
            Some(&[0x03u8; 256][..]),
            0,
            20,
        )
        .unwrap();

        assert!(without.sk_ai.is_empty());
        assert_ne!(without.sk_ei, with.sk_ei);
    }

    #[test]
    fn test_debug_hides_keys() {
        let keys = derive_sha256(&[0x03; 256]);
        let debug = format!("{:?}", keys);
        assert!(debug.contains("sk_d_len: 32"));
        assert!(!debug.contains(&format!("{:?}", &keys.sk_d[..4])));
    }
}
