//! Cryptographic primitives: SHA-256, HMAC-SHA-256, AES-128-CBC, and
//! Diffie-Hellman group 5 (RFC 3526, 1536-bit MODP).
//!
//! Every routine here operates on caller-owned buffers. The CBC chaining
//! is done by hand over the raw AES-128 block primitive rather than through
//! a mode crate, the same way the teacher's security module builds its
//! CCMP/GCMP framing directly on top of a block digest rather than a
//! packaged AEAD.

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::RngCore;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of a DH group 5 public key / shared secret.
pub const DH_GROUP5_LEN: usize = 192;

/// RFC 3526 group 5 generator.
const GROUP5_GENERATOR: u8 = 2;

/// RFC 3526 group 5 prime, 1536 bits, big-endian.
const GROUP5_PRIME_HEX: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1",
    "29024E088A67CC74020BBEA63B139B22514A08798E3404DD",
    "EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245",
    "E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3D",
    "C2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F",
    "83655D23DCA3AD961C62F356208552BB9ED529077096966D",
    "670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B",
);

fn group5_prime() -> BigUint {
    // RFC 3526 group 5's canonical hex digits; the literal above is wrapped
    // for line length but is a single contiguous hex number.
    BigUint::parse_bytes(GROUP5_PRIME_HEX.as_bytes(), 16)
        .expect("group 5 prime is a fixed, valid hex literal")
}

/// Computes SHA-256 over a single buffer.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// HMAC-SHA-256 over a sequence of buffers, truncated to `out.len()` bytes.
///
/// Mirrors the teacher's pattern of keying an `Hmac<Sha256>` once and
/// feeding it a small `iovec`-style list of slices before taking the
/// digest.
pub fn hmac_sha256_truncated(key: &[u8], parts: &[&[u8]], out: &mut [u8]) {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    let digest = mac.finalize().into_bytes();
    let n = out.len().min(digest.len());
    out[..n].copy_from_slice(&digest[..n]);
}

/// HMAC-SHA-256 over a sequence of buffers, full 32-byte digest.
pub fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut out = [0u8; 32];
    hmac_sha256_truncated(key, parts, &mut out);
    out
}

/// AES-128 in CBC mode, encrypting `data` in place block-by-block.
///
/// `data.len()` must be a non-zero multiple of 16. `iv` is consumed as the
/// chaining value for the first block only; callers that need the IV
/// preserved should clone it first.
pub fn aes128_cbc_encrypt(key: &[u8; 16], iv: &[u8; 16], data: &mut [u8]) {
    assert!(!data.is_empty() && data.len() % 16 == 0);
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut chain = *iv;
    for block in data.chunks_mut(16) {
        for i in 0..16 {
            block[i] ^= chain[i];
        }
        let ga = GenericArray::from_mut_slice(block);
        cipher.encrypt_block(ga);
        chain.copy_from_slice(block);
    }
}

/// AES-128 in CBC mode, decrypting `data` in place block-by-block.
pub fn aes128_cbc_decrypt(key: &[u8; 16], iv: &[u8; 16], data: &mut [u8]) {
    assert!(!data.is_empty() && data.len() % 16 == 0);
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut chain = *iv;
    for block in data.chunks_mut(16) {
        let prev_chain = chain;
        chain.copy_from_slice(block);
        let ga = GenericArray::from_mut_slice(block);
        cipher.decrypt_block(ga);
        for i in 0..16 {
            block[i] ^= prev_chain[i];
        }
    }
}

/// Fills `buf` with cryptographically secure random bytes.
pub fn random_bytes(buf: &mut [u8]) {
    rand::rngs::OsRng.fill_bytes(buf);
}

/// A Diffie-Hellman group 5 private/public keypair.
pub struct DhKeyPair {
    private: BigUint,
    public: [u8; DH_GROUP5_LEN],
}

impl DhKeyPair {
    /// Builds a keypair from a caller-supplied 192-byte private scalar,
    /// computing the corresponding public key `g^x mod p`.
    pub fn from_private_bytes(private_bytes: &[u8; DH_GROUP5_LEN]) -> Option<Self> {
        let private = BigUint::from_bytes_be(private_bytes);
        if private.is_zero() {
            return None;
        }
        let generator = BigUint::from(GROUP5_GENERATOR);
        let prime = group5_prime();
        let public_big = generator.modpow(&private, &prime);
        let public = biguint_to_fixed(&public_big)?;
        Some(Self { private, public })
    }

    /// The 192-byte public key to advertise to the peer.
    pub fn public_key(&self) -> &[u8; DH_GROUP5_LEN] {
        &self.public
    }

    /// Computes the 192-byte shared secret `peer_public^private mod p`.
    pub fn shared_secret(&self, peer_public: &[u8; DH_GROUP5_LEN]) -> Option<[u8; DH_GROUP5_LEN]> {
        let peer = BigUint::from_bytes_be(peer_public);
        let prime = group5_prime();
        if peer.is_zero() || peer >= prime {
            return None;
        }
        let shared = peer.modpow(&self.private, &prime);
        biguint_to_fixed(&shared)
    }
}

impl Drop for DhKeyPair {
    fn drop(&mut self) {
        self.private = BigUint::zero();
    }
}

fn biguint_to_fixed(value: &BigUint) -> Option<[u8; DH_GROUP5_LEN]> {
    let bytes = value.to_bytes_be();
    if bytes.len() > DH_GROUP5_LEN {
        return None;
    }
    let mut out = [0u8; DH_GROUP5_LEN];
    out[DH_GROUP5_LEN - bytes.len()..].copy_from_slice(&bytes);
    Some(out)
}
