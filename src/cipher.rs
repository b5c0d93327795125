//! Encryption and decryption of stored API secret keys.
//!
//! Key material is derived with PBKDF2-HMAC-SHA512 from a process-wide passphrase and a fixed,
//! shared salt, then split into an AES-128-CBC IV and key. The fixed salt is part of the stored
//! ciphertext format: every secret under the same passphrase derives from the same salt, so
//! rotating the passphrase invalidates all previously encrypted secrets at once. Do not switch to
//! per-secret salts without a migration plan for existing records.
//!
//! CBC mode carries no integrity check. Deciphering with the wrong passphrase usually fails with
//! a padding error, but can also yield unrelated plaintext; callers must not treat a successful
//! decrypt as proof of authenticity.

use {
    crate::{
        constants::{CIPHER_ITERATIONS, CIPHER_KEY_MATERIAL_LEN, CIPHER_SALT_B64},
        SignatureError,
    },
    aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit},
    base64::{engine::general_purpose::STANDARD as BASE64, Engine},
    lazy_static::lazy_static,
    pbkdf2::pbkdf2_hmac,
    sha2::Sha512,
};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Length of the AES-128 key and of the CBC initialization vector.
const AES128_KEY_LEN: usize = 16;

lazy_static! {
    /// The decoded fixed salt.
    static ref CIPHER_SALT: Vec<u8> = BASE64.decode(CIPHER_SALT_B64).unwrap();
}

/// Derive the cipher IV and key from `passphrase`.
///
/// Derivation is deterministic and recomputed on every call; nothing is cached, so a passphrase
/// rotation takes effect on the next operation.
fn derive_key_material(passphrase: &str) -> ([u8; AES128_KEY_LEN], [u8; AES128_KEY_LEN]) {
    let mut material = [0u8; CIPHER_KEY_MATERIAL_LEN];
    pbkdf2_hmac::<Sha512>(passphrase.as_bytes(), CIPHER_SALT.as_slice(), CIPHER_ITERATIONS, &mut material);

    let mut iv = [0u8; AES128_KEY_LEN];
    let mut key = [0u8; AES128_KEY_LEN];
    iv.copy_from_slice(&material[..AES128_KEY_LEN]);
    key.copy_from_slice(&material[AES128_KEY_LEN..]);
    (iv, key)
}

/// Encrypt `secret` under `passphrase`, returning the base64-encoded ciphertext.
pub fn encrypt(secret: &str, passphrase: &str) -> String {
    let (iv, key) = derive_key_material(passphrase);
    let ciphertext = Aes128CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(secret.as_bytes());
    BASE64.encode(ciphertext)
}

/// Decrypt a base64-encoded ciphertext produced by [`encrypt`] under the same passphrase.
///
/// # Errors
/// Returns [`SignatureError::DecryptionFailure`] on bad base64, a ciphertext that is not a whole
/// number of blocks, or a padding error. A wrong passphrase that happens to unpad cleanly is not
/// detected; the resulting bytes are returned lossily as text.
pub fn decrypt(ciphertext_b64: &str, passphrase: &str) -> Result<String, SignatureError> {
    let ciphertext = BASE64
        .decode(ciphertext_b64)
        .map_err(|e| SignatureError::DecryptionFailure(format!("Invalid base64 ciphertext: {}", e)))?;
    let (iv, key) = derive_key_material(passphrase);
    let plaintext = Aes128CbcDec::new(&key.into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|e| SignatureError::DecryptionFailure(format!("Unable to decipher secret: {}", e)))?;
    Ok(String::from_utf8_lossy(&plaintext).into_owned())
}
