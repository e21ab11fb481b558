//! Cryptographic primitives backing the secure channel: bit padding,
//! AES-CBC encrypt/decrypt, AES-CBC-MAC, SHA-512 key derivation, and
//! ECDH on NIST P-256.
//!
//! All functions here are pure and stateless; the session/engine layers own
//! key material lifetime and zeroization.

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::NoPadding};
use generic_array::GenericArray;
use p256::ecdh::SharedSecret;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use sha2::{Digest, Sha512};

use crate::error::{Error, Result};

/// Encryption/MAC key size: 32 bytes (AES-256).
pub const KEY_LEN: usize = 32;
/// Block size / IV size: 16 bytes.
pub const BLOCK_LEN: usize = 16;

type Encryptor = cbc::Encryptor<aes::Aes256>;
type Decryptor = cbc::Decryptor<aes::Aes256>;

/// Pad `data` using ISO/IEC 9797-1 Method 2 (a.k.a. ISO 7816-4 bit padding):
/// append `0x80` then zero bytes to the next 16-byte boundary. A full
/// padding block is appended even if `data` is already block-aligned.
pub fn pad_bit(data: &[u8]) -> Vec<u8> {
    let mut buf = data.to_vec();
    let pad_len = BLOCK_LEN - (buf.len() % BLOCK_LEN);
    buf.push(0x80);
    buf.resize(buf.len() + pad_len - 1, 0x00);
    buf
}

/// Reverse [`pad_bit`]: strip the trailing `0x80`-then-zeros padding block.
pub fn unpad_bit(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() || data.len() % BLOCK_LEN != 0 {
        return Err(Error::InvalidLength("padded data must be a non-empty multiple of 16"));
    }
    match data.iter().rposition(|&b| b != 0x00) {
        Some(idx) if data[idx] == 0x80 => Ok(data[..idx].to_vec()),
        _ => Err(Error::InvalidLength("missing 0x80 padding marker")),
    }
}

/// AES-CBC encrypt `plaintext` (already a multiple of 16 bytes — callers
/// apply [`pad_bit`] first where the protocol calls for bit padding) under
/// `key`/`iv`. No padding is applied here; see spec §4.1 "no padding" mode.
pub fn aes_cbc_encrypt(key: &[u8; KEY_LEN], iv: &[u8; BLOCK_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    if plaintext.is_empty() || plaintext.len() % BLOCK_LEN != 0 {
        return Err(Error::InvalidLength("AES-CBC input must be a non-empty multiple of 16 bytes"));
    }
    let mut buf = plaintext.to_vec();
    let ct = Encryptor::new(
        GenericArray::from_slice(key),
        GenericArray::from_slice(iv),
    )
    .encrypt_padded_mut::<NoPadding>(&mut buf, plaintext.len())
    .map_err(|_| Error::InvalidLength("AES-CBC encryption failed"))?;
    Ok(ct.to_vec())
}

/// AES-CBC decrypt `ciphertext` (must be a non-empty multiple of 16 bytes)
/// under `key`/`iv`, with no unpadding applied.
pub fn aes_cbc_decrypt(key: &[u8; KEY_LEN], iv: &[u8; BLOCK_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(Error::InvalidLength("AES-CBC input must be a non-empty multiple of 16 bytes"));
    }
    let mut buf = ciphertext.to_vec();
    let pt = Decryptor::new(
        GenericArray::from_slice(key),
        GenericArray::from_slice(iv),
    )
    .decrypt_padded_mut::<NoPadding>(&mut buf)
    .map_err(|_| Error::InvalidLength("AES-CBC decryption failed"))?;
    Ok(pt.to_vec())
}

/// AES-CBC-MAC: encrypt `data` (a non-empty multiple of 16 bytes) under
/// `mac_key` with an all-zero IV and no padding; return the final 16-byte
/// ciphertext block.
pub fn cbc_mac(mac_key: &[u8; KEY_LEN], data: &[u8]) -> Result<[u8; BLOCK_LEN]> {
    let zero_iv = [0u8; BLOCK_LEN];
    let ct = aes_cbc_encrypt(mac_key, &zero_iv, data)?;
    let mut mac = [0u8; BLOCK_LEN];
    mac.copy_from_slice(&ct[ct.len() - BLOCK_LEN..]);
    Ok(mac)
}

/// One-shot SHA-512 digest.
pub fn sha512(input: &[u8]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(input);
    let digest = hasher.finalize();
    let mut out = [0u8; 64];
    out.copy_from_slice(&digest);
    out
}

/// Generate an ephemeral P-256 keypair: (priv[32], pub[64] = X‖Y, no prefix).
pub fn generate_keypair<R: rand_core::CryptoRng + rand_core::RngCore>(
    rng: &mut R,
) -> ([u8; 32], [u8; 64]) {
    let secret = SecretKey::random(rng);
    let public = secret.public_key();
    let encoded = public.to_encoded_point(false);
    let mut priv_bytes = [0u8; 32];
    priv_bytes.copy_from_slice(secret.to_bytes().as_slice());
    let mut pub_bytes = [0u8; 64];
    pub_bytes.copy_from_slice(&encoded.as_bytes()[1..]);
    (priv_bytes, pub_bytes)
}

/// Compute the ECDH shared secret (X-coordinate only) between a peer's
/// uncompressed public key (`peer_pub[64]`, no `0x04` prefix) and our
/// ephemeral private key (`priv[32]`).
pub fn ecdh_shared_secret(peer_pub: &[u8; 64], priv_key: &[u8; 32]) -> Result<[u8; 32]> {
    let secret = SecretKey::from_slice(priv_key).map_err(|_| Error::EcdhFailure)?;

    let mut encoded = [0u8; 65];
    encoded[0] = 0x04;
    encoded[1..].copy_from_slice(peer_pub);
    let public = PublicKey::from_sec1_bytes(&encoded).map_err(|_| Error::EcdhFailure)?;

    let shared: SharedSecret = p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
    let bytes = shared.raw_secret_bytes();
    if bytes.iter().all(|&b| b == 0) {
        return Err(Error::EcdhFailure);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(bytes.as_slice());
    Ok(out)
}

/// Derive `(k_enc, k_mac)` as `SHA-512(shared_secret ‖ pairing_string ‖ salt)`,
/// splitting the 64-byte digest into two 32-byte halves.
pub fn derive_session_keys(
    shared_secret: &[u8; 32],
    pairing_string: &[u8],
    salt: &[u8],
) -> ([u8; KEY_LEN], [u8; KEY_LEN]) {
    let mut input = Vec::with_capacity(shared_secret.len() + pairing_string.len() + salt.len());
    input.extend_from_slice(shared_secret);
    input.extend_from_slice(pairing_string);
    input.extend_from_slice(salt);
    let digest = sha512(&input);

    let mut k_enc = [0u8; KEY_LEN];
    let mut k_mac = [0u8; KEY_LEN];
    k_enc.copy_from_slice(&digest[0..32]);
    k_mac.copy_from_slice(&digest[32..64]);
    (k_enc, k_mac)
}
