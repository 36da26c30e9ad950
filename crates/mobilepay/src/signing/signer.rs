use super::digest::SignedPayload;
use super::jws::CompactJws;
use super::keys::SigningKeyPair;
use super::rsa::{Rs256Signer, Rs256Verifier};
use crate::error::{ConfigurationError, Result};

/// Header carrying the compact signature on AppSwitch requests.
pub const AUTHENTICATION_SIGNATURE_HEADER: &str = "AuthenticationSignature";

/// Produces the `AuthenticationSignature` value for AppSwitch requests.
///
/// Signing runs in two phases: the JWS is produced, then re-parsed from its
/// serialized form and verified against the configured public key. Only a
/// signature that passes the self-check is returned. The signer holds no
/// mutable state and can be shared between tasks.
pub struct RequestSigner {
    signer: Rs256Signer,
    verifier: Rs256Verifier,
}

impl RequestSigner {
    pub fn new(key_pair: &SigningKeyPair) -> Self {
        Self {
            signer: Rs256Signer::new(key_pair.private_key().clone()),
            verifier: Rs256Verifier::new(key_pair.public_key().clone()),
        }
    }

    /// `url` is the absolute request URL including its query string; `body`
    /// is the exact byte sequence sent, empty when there is none.
    pub fn sign(&self, url: &str, body: &[u8]) -> Result<String> {
        let digest = SignedPayload::new(url, body).digest_base64();
        let produced = self.produce(digest.as_bytes())?;
        let verified = self.self_check(&produced.to_string(), digest.as_bytes())?;
        Ok(verified.to_string())
    }

    fn produce(&self, payload: &[u8]) -> Result<CompactJws> {
        CompactJws::sign(&self.signer, payload)
    }

    fn self_check(&self, serialized: &str, expected_payload: &[u8]) -> Result<CompactJws> {
        let parsed = CompactJws::parse(serialized)
            .map_err(|e| ConfigurationError::SelfVerification(e.to_string()))?;
        let payload = parsed.verify(&self.verifier).map_err(|e| {
            tracing::error!(error = %e, "AppSwitch signature failed self-verification");
            ConfigurationError::SelfVerification(e.to_string())
        })?;
        if payload != expected_payload {
            return Err(
                ConfigurationError::SelfVerification("signed payload was altered".into()).into(),
            );
        }
        Ok(parsed)
    }
}
