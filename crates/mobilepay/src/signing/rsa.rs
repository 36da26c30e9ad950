use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::error::{ConfigurationError, Result};

/// JWS identifier of RSASSA-PKCS1-v1_5 with SHA-256.
pub const RS256: &str = "RS256";

/// RSA PKCS#1 v1.5 signer with SHA-256 digest.
pub struct Rs256Signer {
    signing_key: SigningKey<Sha256>,
}

impl Rs256Signer {
    pub fn new(private_key: RsaPrivateKey) -> Self {
        Self {
            signing_key: SigningKey::<Sha256>::new(private_key),
        }
    }

    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signature = self
            .signing_key
            .try_sign(data)
            .map_err(|e| ConfigurationError::InvalidKey(format!("RS256 signing failed: {e}")))?;
        Ok(signature.to_vec())
    }

    pub fn algorithm(&self) -> &str {
        RS256
    }
}

pub struct Rs256Verifier {
    verifying_key: VerifyingKey<Sha256>,
}

impl Rs256Verifier {
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self {
            verifying_key: VerifyingKey::<Sha256>::new(public_key),
        }
    }

    /// Returns `false` for malformed and for non-matching signatures alike.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = Signature::try_from(signature) else {
            return false;
        };
        self.verifying_key.verify(data, &signature).is_ok()
    }
}
