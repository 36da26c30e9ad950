mod digest;
mod jws;
mod keys;
mod legacy;
mod rsa;
mod signer;

pub use digest::SignedPayload;
pub use jws::{CompactJws, JwsError};
pub use keys::SigningKeyPair;
pub use self::rsa::{RS256, Rs256Signer, Rs256Verifier};
pub use signer::{AUTHENTICATION_SIGNATURE_HEADER, RequestSigner};
