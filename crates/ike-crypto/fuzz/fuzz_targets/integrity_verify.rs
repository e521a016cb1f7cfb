//! Fuzz target for checksum verification.
//!
//! Verifies random checksums over random data with every integrity
//! transform; a checksum of the wrong length must never be accepted.
//!
//! Run with:
//! ```bash
//! cd crates/ike-crypto
//! cargo +nightly fuzz run integrity_verify -- -max_total_time=300
//! ```

#![no_main]
use fynx_ike_crypto::crypto::IntegrityTransform;
use libfuzzer_sys::fuzz_target;

const TRANSFORMS: [u16; 5] = [2, 5, 12, 13, 14];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let integrity = IntegrityTransform::create(TRANSFORMS[selector as usize % TRANSFORMS.len()])
        .expect("transform is supported");
    let key = vec![0x0b; integrity.key_len()];

    let split = rest.len() / 2;
    let (message, checksum) = rest.split_at(split);
    if integrity.verify_checksum(&key, message, checksum).is_ok() {
        assert_eq!(checksum.len(), integrity.checksum_len());
    }

    let computed = integrity
        .generate_checksum(&key, message)
        .expect("key length matches");
    assert!(integrity.verify_checksum(&key, message, &computed).is_ok());
});
