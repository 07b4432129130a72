//! Bearer tokens signed with a BLAKE3 keyed hash.
//!
//! A token is `payload.tag`, both segments unpadded base64url. The payload is
//! the JSON object `{"id": <user id>}` and the tag is the keyed hash of the
//! encoded payload segment. Tokens carry no expiry.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::UserId;
use crate::domain::ports::{TokenCodec, TokenError};

const KEY_CONTEXT: &str = "social-events 2024 bearer token signing";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: i32,
}

/// `TokenCodec` adapter holding a key derived from the configured secret.
pub struct SignedTokenCodec {
    key: Zeroizing<[u8; blake3::KEY_LEN]>,
}

impl SignedTokenCodec {
    /// Derive the signing key from `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            key: Zeroizing::new(blake3::derive_key(KEY_CONTEXT, secret.as_bytes())),
        }
    }

    fn tag(&self, payload: &str) -> blake3::Hash {
        blake3::keyed_hash(&self.key, payload.as_bytes())
    }
}

impl std::fmt::Debug for SignedTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedTokenCodec")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl TokenCodec for SignedTokenCodec {
    fn sign(&self, user: UserId) -> Result<String, TokenError> {
        let claims = serde_json::to_vec(&Claims { id: user.get() })
            .map_err(|err| TokenError::encoding(err.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(claims);
        let tag = URL_SAFE_NO_PAD.encode(self.tag(&payload).as_bytes());
        Ok(format!("{payload}.{tag}"))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let (payload, tag) = token
            .split_once('.')
            .ok_or_else(|| TokenError::invalid("missing signature segment"))?;
        let tag_bytes: [u8; blake3::OUT_LEN] = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| TokenError::invalid("signature is not base64url"))?
            .try_into()
            .map_err(|_| TokenError::invalid("signature has the wrong length"))?;
        // `blake3::Hash` equality is constant-time.
        if blake3::Hash::from_bytes(tag_bytes) != self.tag(payload) {
            return Err(TokenError::invalid("signature mismatch"));
        }
        let claims = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::invalid("payload is not base64url"))?;
        let claims: Claims = serde_json::from_slice(&claims)
            .map_err(|_| TokenError::invalid("payload is not a claims object"))?;
        Ok(UserId::from(claims.id))
    }
}
