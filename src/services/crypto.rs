use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use ring::{aead, pbkdf2};
use std::num::NonZeroU32;

const KEYCHAIN_SERVICE: &str = "pickterm";
const KEYCHAIN_USER: &str = "api_token";
const KEYCHAIN_REFERENCE: &str = "keychain:pickterm:api_token";
const VAULT_SECRET: &[u8] = b"pickterm-vault-v1";
const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;

// The API token never lands on disk in plaintext: the OS keychain holds it
// when available, otherwise the config file carries an AES-256-GCM payload
// under a PBKDF2-derived key. Either way the stored string is only a
// reference or ciphertext.

pub fn store_token(token: &str) -> Result<String> {
    match keychain_entry().and_then(|entry| entry.set_password(token)) {
        Ok(()) => Ok(KEYCHAIN_REFERENCE.to_string()),
        Err(_) => encrypt_token(token),
    }
}

pub fn load_token(stored: &str) -> Result<String> {
    if stored.starts_with("keychain:") {
        if stored != KEYCHAIN_REFERENCE {
            return Err(anyhow!("Unknown keychain reference"));
        }
        return keychain_entry()
            .and_then(|entry| entry.get_password())
            .map_err(|e| anyhow!("Keychain fetch error: {}", e));
    }
    if stored.starts_with("enc:") {
        return decrypt_token(stored);
    }
    Err(anyhow!("Unknown stored token format"))
}

fn keychain_entry() -> keyring::Result<keyring::Entry> {
    keyring::Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_USER)
}

fn encrypt_token(token: &str) -> Result<String> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill(&mut salt)
        .and_then(|_| rng.fill(&mut nonce))
        .map_err(|_| anyhow!("Failed to generate key material"))?;

    let mut sealed = token.as_bytes().to_vec();
    derive_key(&salt)?
        .seal_in_place_append_tag(
            aead::Nonce::assume_unique_for_key(nonce),
            aead::Aad::empty(),
            &mut sealed,
        )
        .map_err(|_| anyhow!("Encryption failed"))?;

    Ok(format!(
        "enc:{}:{}:{}",
        BASE64.encode(salt),
        BASE64.encode(nonce),
        BASE64.encode(sealed)
    ))
}

fn decrypt_token(payload: &str) -> Result<String> {
    let mut fields = payload.splitn(4, ':');
    fields.next();
    let (salt, nonce, sealed) = match (fields.next(), fields.next(), fields.next()) {
        (Some(salt), Some(nonce), Some(sealed)) => (
            decode_field(salt, "salt")?,
            decode_field(nonce, "nonce")?,
            decode_field(sealed, "ciphertext")?,
        ),
        _ => return Err(anyhow!("Invalid encrypted payload")),
    };

    let nonce: [u8; NONCE_LEN] = nonce
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("Invalid nonce length"))?;

    let mut sealed = sealed;
    let opened = derive_key(&salt)?
        .open_in_place(
            aead::Nonce::assume_unique_for_key(nonce),
            aead::Aad::empty(),
            &mut sealed,
        )
        .map_err(|_| anyhow!("Decryption failed"))?;
    Ok(String::from_utf8(opened.to_vec())?)
}

fn decode_field(encoded: &str, label: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded)
        .map_err(|e| anyhow!("Decode {}: {}", label, e))
}

fn derive_key(salt: &[u8]) -> Result<aead::LessSafeKey> {
    let iterations =
        NonZeroU32::new(PBKDF2_ITERATIONS).ok_or_else(|| anyhow!("Invalid iterations"))?;
    let mut key_bytes = [0u8; 32];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        VAULT_SECRET,
        &mut key_bytes,
    );
    let unbound = aead::UnboundKey::new(&aead::AES_256_GCM, &key_bytes)
        .map_err(|_| anyhow!("Invalid key material"))?;
    Ok(aead::LessSafeKey::new(unbound))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_payload_round_trips() {
        let encrypted = encrypt_token("inv-5f2a9c").expect("encrypt");
        assert!(encrypted.starts_with("enc:"));
        let decrypted = load_token(&encrypted).expect("decrypt");
        assert_eq!(decrypted, "inv-5f2a9c");
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let encrypted = encrypt_token("inv-5f2a9c").expect("encrypt");
        let mut tampered = encrypted.clone();
        tampered.push('A');
        assert!(load_token(&tampered).is_err());
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(load_token("enc:only:three").is_err());
        assert!(load_token("plaintext-token").is_err());
        assert!(load_token("keychain:other:entry").is_err());
    }
}
