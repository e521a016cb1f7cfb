//! IKE SA Key Derivation Example
//!
//! Instantiates a negotiated transform suite, derives the IKE SA and Child
//! SA keys from fixed test inputs, and protects one SK payload with them.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example derive_keys -- [encr_id] [key_bits] [integ_id] [prf_id]
//! ```
//!
//! # Example
//!
//! ```bash
//! # ENCR_AES_GCM_16 with a 256-bit key, no integrity, PRF_HMAC_SHA2_384
//! RUST_LOG=trace cargo run --example derive_keys -- 20 256 0 6
//! ```

use std::env;

use fynx_ike_crypto::config::{SaTransforms, TransformConfig};
use fynx_ike_crypto::keys::{ChildSaKeys, IkeSaKeys};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Default: ENCR_AES_CBC-128, AUTH_HMAC_SHA2_256_128, PRF_HMAC_SHA2_256
    let args = env::args()
        .skip(1)
        .map(|arg| arg.parse::<u16>())
        .collect::<Result<Vec<_>, _>>()?;
    let arg = |i: usize, default: u16| args.get(i).copied().unwrap_or(default);

    let config = TransformConfig::builder()
        .with_encryption(arg(0, 12), arg(1, 128))
        .with_integrity(arg(2, 12))
        .with_prf(arg(3, 5))
        .build()?;
    let transforms = SaTransforms::from_config(&config)?;

    println!("IKEv2 Key Derivation Example");
    println!("  Encryption: {}", transforms.cipher.descriptor());
    if let Some(integrity) = &transforms.integrity {
        println!("  Integrity:  {}", integrity.descriptor());
    }
    let prf = transforms.require_prf()?;
    println!("  PRF:        {}", prf.descriptor());
    println!();

    let nonce_i = [0x11u8; 32];
    let nonce_r = [0x22u8; 32];
    let shared_secret = [0x33u8; 256];

    let keys = IkeSaKeys::derive(
        prf,
        &nonce_i,
        &nonce_r,
        &shared_secret,
        &[0x01; 8],
        &[0x02; 8],
        transforms.integ_key_len(),
        transforms.encr_key_len(),
    )?;
    println!("IKE SA keys: {:?}", keys);
    println!("  SK_d  = {}", hex::encode(&keys.sk_d[..]));
    println!("  SK_ei = {}", hex::encode(&keys.sk_ei[..]));
    if !keys.sk_ai.is_empty() {
        println!("  SK_ai = {}", hex::encode(&keys.sk_ai[..]));
    }

    // Protect one SK payload from the initiator
    let cipher = &transforms.cipher;
    let iv = cipher.generate_iv();
    let header = [0xAAu8; 32];
    let protected = if cipher.is_aead() {
        cipher.seal(b"IKE_AUTH payloads", &header, &keys.sk_ei, &iv)?
    } else {
        let block_size = cipher.block_size();
        let mut padded = b"IKE_AUTH payloads".to_vec();
        let pad_len = (block_size - (padded.len() + 1) % block_size) % block_size;
        padded.resize(padded.len() + pad_len, 0);
        padded.push(pad_len as u8);
        cipher.encrypt(&padded, &keys.sk_ei, &iv)?
    };
    println!();
    println!("SK payload: IV {} | {} bytes", hex::encode(&iv), protected.len());
    if let Some(integrity) = &transforms.integrity {
        let checksum = integrity.generate_checksum(&keys.sk_ai, &protected)?;
        println!("  checksum = {}", hex::encode(checksum));
    }

    // Child SA keys without PFS, reusing the IKE SA suite
    let child = ChildSaKeys::derive(
        prf,
        &keys.sk_d,
        &nonce_i,
        &nonce_r,
        None,
        transforms.integ_key_len(),
        transforms.encr_key_len(),
    )?;
    match cipher.build_key_descriptor(&child.sk_ei) {
        Ok(descriptor) => println!("Child SA encryption: {:?}", descriptor),
        Err(e) => println!("Child SA encryption: {}", e),
    }

    Ok(())
}
