use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use super::rsa::{RS256, Rs256Signer, Rs256Verifier};
use crate::error::{Error, Result};

#[derive(Debug, thiserror::Error)]
pub enum JwsError {
    #[error("malformed compact JWS: {0}")]
    Malformed(String),
    #[error("unsupported JWS algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("JWS signature does not verify")]
    BadSignature,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProtectedHeader {
    alg: String,
}

/// A JWS in compact serialization: `header.payload.signature`, each
/// segment base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactJws {
    header: String,
    payload: String,
    signature: String,
}

impl CompactJws {
    /// Signs `payload` under a protected header of `{"alg":"RS256"}`.
    pub fn sign(signer: &Rs256Signer, payload: &[u8]) -> Result<Self> {
        let header = ProtectedHeader {
            alg: signer.algorithm().to_string(),
        };
        let header = serde_json::to_vec(&header).map_err(|e| Error::Computation(e.to_string()))?;
        let header = URL_SAFE_NO_PAD.encode(header);
        let payload = URL_SAFE_NO_PAD.encode(payload);
        let signature = signer.sign(signing_input(&header, &payload).as_bytes())?;

        Ok(Self {
            header,
            payload,
            signature: URL_SAFE_NO_PAD.encode(signature),
        })
    }

    pub fn parse(compact: &str) -> Result<Self, JwsError> {
        let mut segments = compact.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(JwsError::Malformed("expected three segments".into()));
        };

        let header_json = decode_segment("header", header)?;
        let protected: ProtectedHeader = serde_json::from_slice(&header_json)
            .map_err(|e| JwsError::Malformed(format!("header: {e}")))?;
        if protected.alg != RS256 {
            return Err(JwsError::UnsupportedAlgorithm(protected.alg));
        }
        decode_segment("payload", payload)?;
        decode_segment("signature", signature)?;

        Ok(Self {
            header: header.to_string(),
            payload: payload.to_string(),
            signature: signature.to_string(),
        })
    }

    /// Checks the signature and returns the decoded payload.
    pub fn verify(&self, verifier: &Rs256Verifier) -> Result<Vec<u8>, JwsError> {
        let signature = decode_segment("signature", &self.signature)?;
        let input = signing_input(&self.header, &self.payload);
        if !verifier.verify(input.as_bytes(), &signature) {
            return Err(JwsError::BadSignature);
        }
        decode_segment("payload", &self.payload)
    }

    pub fn payload(&self) -> Result<Vec<u8>, JwsError> {
        decode_segment("payload", &self.payload)
    }
}

impl fmt::Display for CompactJws {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.header, self.payload, self.signature)
    }
}

fn signing_input(header: &str, payload: &str) -> String {
    format!("{header}.{payload}")
}

fn decode_segment(name: &str, segment: &str) -> Result<Vec<u8>, JwsError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| JwsError::Malformed(format!("{name}: {e}")))
}
