//! AES-XCBC-MAC
//!
//! Implements the AES-XCBC-MAC construction of RFC 3566 on top of the raw
//! AES-128 block cipher. It backs two IKEv2 transforms:
//!
//! - `AUTH_AES_XCBC_96` integrity, which truncates the output to 96 bits
//! - `PRF_AES128_XCBC` (RFC 4434), which uses the full 128-bit output after
//!   normalizing the key with [`normalize_prf_key`]
//!
//! ```text
//! K1 = E(K, 0x01010101010101010101010101010101)
//! K2 = E(K, 0x02020202020202020202020202020202)
//! K3 = E(K, 0x03030303030303030303030303030303)
//!
//! E[0] = 0
//! E[i] = E(K1, M[i] ^ E[i-1])                 for i = 1 .. n-1
//! E[n] = E(K1, M[n] ^ E[n-1] ^ K2)            if M[n] is a full block
//! E[n] = E(K1, pad(M[n]) ^ E[n-1] ^ K3)       otherwise (pad = 0x80 0x00..)
//! ```

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;
use zeroize::Zeroizing;

use crate::{Error, Result};

/// AES block size in bytes
pub const XCBC_BLOCK_SIZE: usize = 16;

/// AES-XCBC-MAC key length in bytes (AES-128 only)
pub const XCBC_KEY_LEN: usize = 16;

/// AES-XCBC-MAC output length in bytes
pub const XCBC_MAC_LEN: usize = 16;

type Block = GenericArray<u8, aes::cipher::consts::U16>;

/// Compute AES-XCBC-MAC over `data` under a 16-byte `key`
///
/// Returns the full, untruncated 128-bit MAC.
pub fn aes_xcbc_mac(key: &[u8], data: &[u8]) -> Result<[u8; XCBC_MAC_LEN]> {
    if key.len() != XCBC_KEY_LEN {
        return Err(Error::InvalidKeyLength {
            expected: XCBC_KEY_LEN,
            actual: key.len(),
        });
    }

    let base = Aes128::new_from_slice(key)?;
    let k1 = derive_subkey(&base, 0x01);
    let k2 = derive_subkey(&base, 0x02);
    let k3 = derive_subkey(&base, 0x03);
    let k1 = Aes128::new(GenericArray::from_slice(&k1[..]));

    // M[n] is the last, possibly partial, block; an empty message is a
    // single empty block.
    let last_start = if data.is_empty() {
        0
    } else {
        (data.len() - 1) / XCBC_BLOCK_SIZE * XCBC_BLOCK_SIZE
    };
    let (head, last) = data.split_at(last_start);

    let mut e = Block::default();
    for block in head.chunks_exact(XCBC_BLOCK_SIZE) {
        xor_in_place(&mut e, block);
        k1.encrypt_block(&mut e);
    }

    xor_in_place(&mut e, last);
    if last.len() == XCBC_BLOCK_SIZE {
        xor_in_place(&mut e, &k2[..]);
    } else {
        e[last.len()] ^= 0x80;
        xor_in_place(&mut e, &k3[..]);
    }
    k1.encrypt_block(&mut e);

    Ok(e.into())
}

/// Normalize a PRF key for `PRF_AES128_XCBC` (RFC 4434 Section 2)
///
/// - shorter than 16 bytes: right-padded with zero bytes
/// - exactly 16 bytes: used as is
/// - longer than 16 bytes: replaced by `AES-XCBC-MAC(0^16, key)`
pub fn normalize_prf_key(key: &[u8]) -> Result<Zeroizing<[u8; XCBC_KEY_LEN]>> {
    let mut normalized = Zeroizing::new([0u8; XCBC_KEY_LEN]);
    if key.len() <= XCBC_KEY_LEN {
        normalized[..key.len()].copy_from_slice(key);
    } else {
        *normalized = aes_xcbc_mac(&[0u8; XCBC_KEY_LEN], key)?;
    }
    Ok(normalized)
}

fn derive_subkey(base: &Aes128, constant: u8) -> Zeroizing<[u8; XCBC_BLOCK_SIZE]> {
    let mut block = Block::from([constant; XCBC_BLOCK_SIZE]);
    base.encrypt_block(&mut block);
    Zeroizing::new(block.into())
}

fn xor_in_place(acc: &mut Block, data: &[u8]) {
    for (a, b) in acc.iter_mut().zip(data) {
        *a ^= b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfc_key() -> Vec<u8> {
        (0u8..16).collect()
    }

    fn counting_message(len: u8) -> Vec<u8> {
        (0..len).collect()
    }

    // RFC 3566 Section 4.6 test cases 1-6
    #[test]
    fn test_rfc3566_vectors() {
        let cases: [(u8, &str); 6] = [
            (0, "75f0251d528ac01c4573dfd584d79f29"),
            (3, "5b376580ae2f19afe7219ceef172756f"),
            (16, "d2a246fa349b68a79998a4394ff7a263"),
            (20, "47f51b4564966215b8985c63055ed308"),
            (32, "f54f0ec8d2b9f3d36807734bd5283fd4"),
            (34, "becbb3bccdb518a30677d5481fb6b4d8"),
        ];

        for (len, expected) in cases {
            let mac = aes_xcbc_mac(&rfc_key(), &counting_message(len)).unwrap();
            assert_eq!(hex::encode(mac), expected, "message length {}", len);
        }
    }

    // RFC 3566 Section 4.6 test case 7
    #[test]
    fn test_rfc3566_long_message() {
        let mac = aes_xcbc_mac(&rfc_key(), &[0u8; 1000]).unwrap();
        assert_eq!(hex::encode(mac), "f0dafee895db30253761103b5d84528f");
    }

    #[test]
    fn test_invalid_key_length() {
        let result = aes_xcbc_mac(&[0u8; 20], b"data");
        assert_eq!(
            result,
            Err(Error::InvalidKeyLength {
                expected: 16,
                actual: 20
            })
        );
    }

    #[test]
    fn test_normalize_short_key() {
        let key = [0xAAu8; 10];
        let normalized = normalize_prf_key(&key).unwrap();
        assert_eq!(&normalized[..10], &key[..]);
        assert_eq!(&normalized[10..], &[0u8; 6]);
    }

    #[test]
    fn test_normalize_exact_key() {
        let key = rfc_key();
        let normalized = normalize_prf_key(&key).unwrap();
        assert_eq!(&normalized[..], &key[..]);
    }

    #[test]
    fn test_normalize_long_key() {
        let key: Vec<u8> = (0u8..20).collect();
        let normalized = normalize_prf_key(&key).unwrap();
        let expected = aes_xcbc_mac(&[0u8; 16], &key).unwrap();
        assert_eq!(*normalized, expected);
    }
}
