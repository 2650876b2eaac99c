//! The WSC key schedule: shared secret -> DHKey -> KDK -> {AuthKey,
//! KeyWrapKey, EMSK}, plus PSK1/PSK2 derivation from the device password.
//!
//! Mirrors `eap_wsc_handle_m2`'s pipeline in `eap-wsc.c` line for line:
//! SHA-256 the shared secret, HMAC-SHA-256 that with the nonces and MAC to
//! get KDK, then run the WSC KDF over KDK to produce the session key
//! structure. Every intermediate buffer is zeroed as soon as it is no
//! longer needed.

use crate::crypto::{hmac_sha256, sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

const WSC_KDF_PERSONALIZATION: &[u8] = b"Wi-Fi Easy and Secure Key Derivation";

/// The three subkeys derived from a completed DH exchange.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionKeys {
    pub auth_key: [u8; 32],
    pub key_wrap_key: [u8; 16],
    pub emsk: [u8; 32],
}

/// Runs the full key schedule: `SHA-256(shared_secret)` -> DHKey,
/// `HMAC-SHA-256(DHKey; N1 || addr || N2)` -> KDK, then the WSC KDF over
/// KDK to produce AuthKey/KeyWrapKey/EMSK. `shared_secret` is zeroed by the
/// caller; this function zeroes its own DHKey and KDK buffers before
/// returning.
pub fn derive_session_keys(
    shared_secret: &[u8; 192],
    enrollee_nonce: &[u8; 16],
    enrollee_addr: &[u8; 6],
    registrar_nonce: &[u8; 16],
) -> SessionKeys {
    let mut dhkey = sha256(shared_secret);

    let mut kdk = hmac_sha256(
        &dhkey,
        &[enrollee_nonce, enrollee_addr, registrar_nonce],
    );
    dhkey.zeroize();

    let keys = wsc_kdf(&kdk);
    kdk.zeroize();
    keys
}

/// WSC v2.0.5 §4.2.3 key derivation function: counter-mode HMAC-SHA-256
/// keyed by KDK, personalized with a fixed string, iterated until enough
/// output bytes exist to fill the session key structure (80 bytes: 32 +
/// 16 + 32).
fn wsc_kdf(kdk: &[u8; 32]) -> SessionKeys {
    const OUTPUT_LEN: usize = 32 + 16 + 32;
    let output_bits: u32 = (OUTPUT_LEN * 8) as u32;

    let mut output = Vec::with_capacity(OUTPUT_LEN + 32);
    let mut counter: u32 = 1;
    while output.len() < OUTPUT_LEN {
        let counter_be = counter.to_be_bytes();
        let len_be = output_bits.to_be_bytes();
        let block = hmac_sha256(
            kdk,
            &[&counter_be, WSC_KDF_PERSONALIZATION, &len_be],
        );
        output.extend_from_slice(&block);
        counter += 1;
    }
    output.truncate(OUTPUT_LEN);

    let mut auth_key = [0u8; 32];
    let mut key_wrap_key = [0u8; 16];
    let mut emsk = [0u8; 32];
    auth_key.copy_from_slice(&output[0..32]);
    key_wrap_key.copy_from_slice(&output[32..48]);
    emsk.copy_from_slice(&output[48..80]);
    output.zeroize();

    SessionKeys {
        auth_key,
        key_wrap_key,
        emsk,
    }
}

/// Splits a hex device password into PSK1/PSK2 using AuthKey, per WSC
/// v2.0.5 §7.4: the first half gets the extra byte when the length is odd.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Psks {
    pub psk1: [u8; 16],
    pub psk2: [u8; 16],
}

pub fn derive_psks(auth_key: &[u8; 32], device_password: &[u8]) -> Psks {
    let len = device_password.len();
    let half1_len = len / 2 + (len % 2);
    let (half1, half2) = device_password.split_at(half1_len);

    let mut psk1 = [0u8; 16];
    let mut psk2 = [0u8; 16];
    crate::crypto::hmac_sha256_truncated(auth_key, &[half1], &mut psk1);
    crate::crypto::hmac_sha256_truncated(auth_key, &[half2], &mut psk2);

    Psks { psk1, psk2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_schedule_is_deterministic() {
        let secret = [0x42u8; 192];
        let nonce1 = [1u8; 16];
        let addr = [2u8; 6];
        let nonce2 = [3u8; 16];

        let a = derive_session_keys(&secret, &nonce1, &addr, &nonce2);
        let b = derive_session_keys(&secret, &nonce1, &addr, &nonce2);
        assert_eq!(a.auth_key, b.auth_key);
        assert_eq!(a.key_wrap_key, b.key_wrap_key);
        assert_eq!(a.emsk, b.emsk);
    }

    #[test]
    fn test_key_schedule_depends_on_every_input() {
        let secret = [0x42u8; 192];
        let nonce1 = [1u8; 16];
        let addr = [2u8; 6];
        let nonce2 = [3u8; 16];
        let other_nonce2 = [4u8; 16];

        let a = derive_session_keys(&secret, &nonce1, &addr, &nonce2);
        let b = derive_session_keys(&secret, &nonce1, &addr, &other_nonce2);
        assert_ne!(a.auth_key, b.auth_key);
    }

    #[test]
    fn test_psk_split_odd_length() {
        let auth_key = [9u8; 32];
        let password = b"1234567"; // length 7 -> half1 len 4, half2 len 3
        let psks = derive_psks(&auth_key, password);
        assert_ne!(psks.psk1, psks.psk2);
    }

    #[test]
    fn test_psk_deterministic() {
        let auth_key = [1u8; 32];
        let password = b"00000000";
        let a = derive_psks(&auth_key, password);
        let b = derive_psks(&auth_key, password);
        assert_eq!(a.psk1, b.psk1);
        assert_eq!(a.psk2, b.psk2);
    }
}
