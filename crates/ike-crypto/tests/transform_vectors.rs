//! Known-answer tests for the negotiated transforms
//!
//! Vectors from RFC 3566 (AES-XCBC-MAC-96), RFC 4434 (AES-XCBC-PRF-128),
//! RFC 4868 (HMAC-SHA-256/384/512 truncated for IPsec) and RFC 2202.

use fynx_ike_crypto::crypto::{IkeCipher, IntegrityTransform, PrfTransform};
use fynx_ike_crypto::transform::TransformType;
use fynx_ike_crypto::Error;

fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap()
}

//
// Integrity
//

#[test]
fn test_rfc4868_hmac_sha2_truncation() {
    let cases = [
        (
            12,
            32,
            "198a607eb44bfbc69903a0f1cf2bbdc5",
        ),
        (
            13,
            48,
            "b6a8d5636f5c6a7224f9977dcf7ee6c7fb6d0c48cbdee973",
        ),
        (
            14,
            64,
            "637edc6e01dce7e6742a99451aae82df23da3e92439e590e43e761b33e910fb8",
        ),
    ];

    for (id, key_len, expected) in cases {
        let integrity = IntegrityTransform::create(id).unwrap();
        let key = vec![0x0b; key_len];
        let checksum = integrity.generate_checksum(&key, b"Hi There").unwrap();
        assert_eq!(hex::encode(&checksum), expected, "transform {}", id);
        integrity.verify_checksum(&key, b"Hi There", &checksum).unwrap();
    }
}

#[test]
fn test_rfc2202_hmac_sha1_96() {
    let integrity = IntegrityTransform::create(2).unwrap();
    let checksum = integrity
        .generate_checksum(&[0x0b; 20], b"Hi There")
        .unwrap();
    assert_eq!(hex::encode(checksum), "b617318655057264e28bc0b6");
}

#[test]
fn test_rfc3566_aes_xcbc_96() {
    let integrity = IntegrityTransform::create(5).unwrap();
    let key = unhex("000102030405060708090a0b0c0d0e0f");

    let cases = [
        ("", "75f0251d528ac01c4573dfd5"),
        ("000102", "5b376580ae2f19afe7219cee"),
        ("000102030405060708090a0b0c0d0e0f", "d2a246fa349b68a79998a439"),
        (
            "000102030405060708090a0b0c0d0e0f10111213",
            "47f51b4564966215b8985c63",
        ),
    ];

    for (message, expected) in cases {
        let checksum = integrity.generate_checksum(&key, &unhex(message)).unwrap();
        assert_eq!(hex::encode(checksum), expected, "message {}", message);
    }
}

#[test]
fn test_verify_rejects_truncated_or_modified_checksum() {
    let integrity = IntegrityTransform::create(12).unwrap();
    let key = [0x0b; 32];
    let checksum = integrity.generate_checksum(&key, b"Hi There").unwrap();

    assert!(integrity
        .verify_checksum(&key, b"Hi There", &checksum[..12])
        .is_err());

    let mut modified = checksum.clone();
    modified[15] ^= 0x80;
    assert!(matches!(
        integrity.verify_checksum(&key, b"Hi There", &modified),
        Err(Error::AuthenticationFailed(_))
    ));
}

//
// PRF
//

#[test]
fn test_rfc4434_prf_aes128_xcbc() {
    let prf = PrfTransform::create(4).unwrap();
    let message = unhex("000102030405060708090a0b0c0d0e0f10111213");

    let cases = [
        (
            "000102030405060708090a0b0c0d0e0f",
            "47f51b4564966215b8985c63055ed308",
        ),
        ("00010203040506070809", "0fa087af7d866e7653434e602fdde835"),
        (
            "000102030405060708090a0b0c0d0e0fedcb",
            "8cd3c93ae598a9803006ffb67c40e9e4",
        ),
    ];

    for (key, expected) in cases {
        let output = prf.sign(&unhex(key), &message).unwrap();
        assert_eq!(hex::encode(output), expected, "key {}", key);
    }
}

#[test]
fn test_skeyseed_hmac_sha1() {
    let prf = PrfTransform::create(2).unwrap();
    let skeyseed = prf
        .generate_skeyseed(&[0x11; 16], &[0x22; 16], &[0x33; 64])
        .unwrap();
    assert_eq!(
        hex::encode(&skeyseed[..]),
        "c0ffe361d1bef44b5be2c284e9b93fcbb8d35d68"
    );
}

#[test]
fn test_prf_plus_hmac_sha256() {
    let prf = PrfTransform::create(5).unwrap();
    let keymat = prf
        .generate_keymat(&[0x01; 32], b"IKEv2 prf+ seed", 40)
        .unwrap();
    assert_eq!(
        hex::encode(&keymat[..]),
        "9e98495bcca598315fd1a7c9b9c8be3d7af88875bd5e87f3655569b3091a3616991d7b99d595ed93"
    );
}

//
// Factories
//

#[test]
fn test_factories_reject_unknown_ids() {
    assert_eq!(
        IkeCipher::create(23, 128),
        Err(Error::UnsupportedAlgorithm {
            transform_type: TransformType::Encr,
            id: 23
        })
    );
    assert_eq!(
        IntegrityTransform::create(1),
        Err(Error::UnsupportedAlgorithm {
            transform_type: TransformType::Integ,
            id: 1
        })
    );
    assert_eq!(
        PrfTransform::create(1),
        Err(Error::UnsupportedAlgorithm {
            transform_type: TransformType::Prf,
            id: 1
        })
    );
}

#[test]
fn test_descriptors() {
    let cipher = IkeCipher::create(20, 256).unwrap();
    assert_eq!(cipher.descriptor().name, "AES-GCM-16");
    assert_eq!(cipher.descriptor().key_len, 36);
    assert_eq!(cipher.descriptor().transform_type, TransformType::Encr);

    let integrity = IntegrityTransform::create(13).unwrap();
    assert_eq!(integrity.descriptor().id, 13);
    assert_eq!(integrity.descriptor().key_len, 48);

    let prf = PrfTransform::create(4).unwrap();
    assert_eq!(prf.descriptor().key_len, 16);
    assert_eq!(prf.output_len(), 16);
}
