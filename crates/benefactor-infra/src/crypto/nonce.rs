//! HMAC-SHA256 form nonces.
//!
//! A nonce is the truncated HMAC of `action|user|session|tick` under a
//! per-installation key. The tick advances every half lifetime, and a nonce
//! verifies during the tick it was issued in and the one after, so it stays
//! valid for between half and all of the configured lifetime.

use std::path::Path;

use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use benefactor_core::service::nonce::{NonceBinding, NonceIssuer, NonceValidity};
use benefactor_types::error::NonceError;

use super::{hex_decode, hex_encode};

type HmacSha256 = Hmac<Sha256>;

/// Bytes of the HMAC kept in a nonce (20 hex characters).
const NONCE_BYTES: usize = 10;

/// Random bytes in a generated key.
const KEY_BYTES: usize = 32;

/// Shortest key accepted from the key file, in characters.
const MIN_KEY_LEN: usize = 32;

/// Nonce issuer backed by an HMAC key.
pub struct HmacNonceIssuer {
    key: SecretString,
    lifetime_secs: u64,
}

impl HmacNonceIssuer {
    /// Build an issuer from key text and a lifetime in seconds.
    pub fn new(key: SecretString, lifetime_secs: u64) -> Result<Self, NonceError> {
        if key.expose_secret().len() < MIN_KEY_LEN {
            return Err(NonceError::InvalidKey(format!(
                "key must be at least {MIN_KEY_LEN} characters"
            )));
        }
        Ok(Self {
            key,
            lifetime_secs: lifetime_secs.max(2),
        })
    }

    /// Load the key from `path`, generating and saving a new one if the
    /// file does not exist.
    pub async fn load_or_create(path: &Path, lifetime_secs: u64) -> Result<Self, NonceError> {
        let key = match tokio::fs::read_to_string(path).await {
            Ok(content) => content.trim().to_string(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let key = generate_key();
                write_key_file(path, &key).await?;
                tracing::info!(path = %path.display(), "generated new nonce key");
                key
            }
            Err(err) => {
                return Err(NonceError::KeyUnavailable(format!(
                    "{}: {err}",
                    path.display()
                )));
            }
        };

        Self::new(SecretString::from(key), lifetime_secs)
    }

    /// Tick containing `now` (seconds since the epoch).
    fn tick(&self, now: u64) -> u64 {
        now.div_ceil(self.lifetime_secs / 2)
    }

    fn mac(&self, action: &str, binding: &NonceBinding, tick: u64) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.key.expose_secret().as_bytes()).ok()?;
        let user = binding.user.map(|u| u.to_string()).unwrap_or_default();
        mac.update(format!("{action}|{user}|{}|{tick}", binding.session).as_bytes());
        Some(mac)
    }

    fn create_at(&self, action: &str, binding: &NonceBinding, now: u64) -> String {
        match self.mac(action, binding, self.tick(now)) {
            Some(mac) => hex_encode(&mac.finalize().into_bytes()[..NONCE_BYTES]),
            None => String::new(),
        }
    }

    fn verify_at(&self, nonce: &str, action: &str, binding: &NonceBinding, now: u64) -> NonceValidity {
        let Some(tag) = hex_decode(nonce).filter(|t| t.len() == NONCE_BYTES) else {
            return NonceValidity::Invalid;
        };

        let tick = self.tick(now);
        let matches = |t: u64| {
            self.mac(action, binding, t)
                .is_some_and(|mac| mac.verify_truncated_left(&tag).is_ok())
        };

        if matches(tick) {
            NonceValidity::Fresh
        } else if tick > 0 && matches(tick - 1) {
            NonceValidity::Aging
        } else {
            NonceValidity::Invalid
        }
    }
}

impl NonceIssuer for HmacNonceIssuer {
    fn create(&self, action: &str, binding: &NonceBinding) -> String {
        self.create_at(action, binding, unix_now())
    }

    fn verify(&self, nonce: &str, action: &str, binding: &NonceBinding) -> NonceValidity {
        self.verify_at(nonce, action, binding, unix_now())
    }
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

fn generate_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex_encode(&bytes)
}

async fn write_key_file(path: &Path, key: &str) -> Result<(), NonceError> {
    let unavailable = |e: std::io::Error| NonceError::KeyUnavailable(format!("{}: {e}", path.display()));

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(unavailable)?;
    }
    tokio::fs::write(path, key).await.map_err(unavailable)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(unavailable)?;
    }

    Ok(())
}
