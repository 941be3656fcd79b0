//! Content API credentials (encrypted file-based storage)
//!
//! The RapidAPI key is stored encrypted with AES-256-GCM in
//! ~/.config/gitapro/credentials.enc. The encryption key is derived from
//! machine-specific identifiers. `GITAPRO_API_KEY` overrides the stored key.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use anyhow::{Context, Result, anyhow};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

const NONCE_SIZE: usize = 12;

/// Environment variable that takes precedence over the stored key
pub const API_KEY_ENV: &str = "GITAPRO_API_KEY";

const API_KEY_ENTRY: &str = "rapidapi:key";

/// Get the credentials file path
fn credentials_path() -> Result<PathBuf> {
    paths::credentials_path()
}

/// Get machine ID for key derivation
fn get_machine_id() -> String {
    #[cfg(target_os = "linux")]
    {
        for candidate in ["/etc/machine-id", "/var/lib/dbus/machine-id"] {
            if let Ok(id) = fs::read_to_string(candidate) {
                return id.trim().to_string();
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(output) = std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
        {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if let Some(uuid) = stdout
                .lines()
                .find(|line| line.contains("IOPlatformUUID"))
                .and_then(|line| line.split('"').nth(3))
            {
                return uuid.to_string();
            }
        }
    }

    // Fallback: home directory path
    dirs::home_dir().map_or_else(
        || "gitapro-fallback-key".to_string(),
        |p| p.to_string_lossy().to_string(),
    )
}

/// Derive encryption key from machine-specific data
fn derive_key() -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(get_machine_id().as_bytes());

    if let Some(home) = dirs::home_dir() {
        hasher.update(home.to_string_lossy().as_bytes());
    }

    hasher.update(b"gitapro-credentials-v1");

    hasher.finalize().into()
}

fn cipher() -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(&derive_key()).map_err(|_| anyhow!("Invalid credentials key length"))
}

/// Load all credentials from an encrypted file
fn load_credentials_from(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let encrypted = fs::read(path).context("Failed to read credentials file")?;

    if encrypted.len() < NONCE_SIZE {
        return Ok(HashMap::new());
    }

    let (nonce_bytes, ciphertext) = encrypted.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext = cipher()?
        .decrypt(nonce, ciphertext)
        .map_err(|_| anyhow!("Failed to decrypt credentials"))?;

    let json = String::from_utf8(plaintext).context("Invalid UTF-8 in credentials")?;
    let creds: HashMap<String, String> = serde_json::from_str(&json)?;

    Ok(creds)
}

/// Save all credentials to an encrypted file
fn save_credentials_to(path: &Path, creds: &HashMap<String, String>) -> Result<()> {
    let json = serde_json::to_string(creds)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rng().fill(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher()?
        .encrypt(nonce, json.as_bytes())
        .map_err(|_| anyhow!("Failed to encrypt credentials"))?;

    let mut output = nonce_bytes.to_vec();
    output.extend(ciphertext);

    fs::write(path, output).context("Failed to write credentials file")?;

    // Set restrictive permissions on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

/// Store the content API key
pub fn store_api_key(key: &str) -> Result<()> {
    store_api_key_at(&credentials_path()?, key)
}

/// Get the content API key: environment first, then the encrypted file
pub fn get_api_key() -> Result<Option<String>> {
    if let Ok(key) = std::env::var(API_KEY_ENV)
        && !key.trim().is_empty()
    {
        return Ok(Some(key.trim().to_string()));
    }
    get_api_key_at(&credentials_path()?)
}

/// Like [`get_api_key`], but an unreadable credentials file counts as no key.
///
/// For commands that never reach the network and only need a key to build
/// the client.
pub fn get_api_key_or_warn() -> Option<String> {
    if let Ok(key) = std::env::var(API_KEY_ENV)
        && !key.trim().is_empty()
    {
        return Some(key.trim().to_string());
    }
    match credentials_path() {
        Ok(path) => read_api_key_or_warn(&path),
        Err(e) => {
            tracing::warn!("Ignoring stored API key: {e:#}");
            None
        }
    }
}

/// Delete the stored content API key
pub fn delete_api_key() -> Result<()> {
    delete_api_key_at(&credentials_path()?)
}

fn store_api_key_at(path: &Path, key: &str) -> Result<()> {
    let mut creds = load_credentials_from(path).unwrap_or_default();
    creds.insert(API_KEY_ENTRY.to_string(), key.trim().to_string());
    save_credentials_to(path, &creds)
}

fn get_api_key_at(path: &Path) -> Result<Option<String>> {
    let creds = load_credentials_from(path)?;
    Ok(creds.get(API_KEY_ENTRY).cloned())
}

fn read_api_key_or_warn(path: &Path) -> Option<String> {
    get_api_key_at(path).unwrap_or_else(|e| {
        tracing::warn!("Ignoring stored API key: {e:#}");
        None
    })
}

fn delete_api_key_at(path: &Path) -> Result<()> {
    let mut creds = load_credentials_from(path).unwrap_or_default();
    creds.remove(API_KEY_ENTRY);
    save_credentials_to(path, &creds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_api_key_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.enc");

        assert_eq!(get_api_key_at(&path).unwrap(), None);

        store_api_key_at(&path, " secret-key \n").unwrap();
        assert_eq!(get_api_key_at(&path).unwrap().as_deref(), Some("secret-key"));

        // Stored bytes are not the plain key
        let raw = fs::read(&path).unwrap();
        assert!(!String::from_utf8_lossy(&raw).contains("secret-key"));

        delete_api_key_at(&path).unwrap();
        assert_eq!(get_api_key_at(&path).unwrap(), None);
    }

    #[test]
    fn test_truncated_file_reads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.enc");
        fs::write(&path, [1u8, 2, 3]).unwrap();
        assert_eq!(get_api_key_at(&path).unwrap(), None);
    }

    #[test]
    fn test_undecryptable_file_is_skipped_by_lenient_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.enc");
        fs::write(&path, [0x5au8; 40]).unwrap();

        assert!(get_api_key_at(&path).is_err());
        assert_eq!(read_api_key_or_warn(&path), None);
    }

    #[test]
    fn test_lenient_read_returns_stored_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.enc");
        store_api_key_at(&path, "secret-key").unwrap();

        assert_eq!(read_api_key_or_warn(&path).as_deref(), Some("secret-key"));
    }
}
