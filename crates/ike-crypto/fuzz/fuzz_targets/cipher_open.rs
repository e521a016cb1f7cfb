//! Fuzz target for SK payload decryption.
//!
//! Feeds attacker-controlled ciphertext to every cipher to find:
//! - Panics on short or unaligned input
//! - Plaintext released for an unauthenticated AEAD message
//!
//! Run with:
//! ```bash
//! cd crates/ike-crypto
//! cargo +nightly fuzz run cipher_open -- -max_total_time=300
//! ```

#![no_main]
use fynx_ike_crypto::crypto::IkeCipher;
use fynx_ike_crypto::Error;
use libfuzzer_sys::fuzz_target;

const SUITES: [(u16, u16); 8] = [
    (3, 0),
    (12, 128),
    (12, 256),
    (18, 128),
    (19, 192),
    (20, 128),
    (20, 256),
    (12, 192),
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let (encr, key_bits) = SUITES[selector as usize % SUITES.len()];
    let cipher = IkeCipher::create(encr, key_bits).expect("suite is supported");

    let key = vec![0x42; cipher.key_len()];
    if rest.len() < cipher.iv_len() {
        return;
    }
    let (iv, body) = rest.split_at(cipher.iv_len());

    if cipher.is_aead() {
        // Nothing sealed under this key can be forged by the fuzzer
        match cipher.open(body, b"", &key, iv) {
            Err(Error::AuthenticationFailed(_)) | Err(Error::BufferTooShort { .. }) => {}
            other => panic!("unexpected open result: {:?}", other),
        }
    } else {
        let result = cipher.decrypt(body, &key, iv);
        if body.len() % cipher.block_size() == 0 {
            assert_eq!(result.expect("aligned input decrypts").len(), body.len());
        } else {
            assert!(matches!(result, Err(Error::NotBlockAligned { .. })));
        }
    }
});
