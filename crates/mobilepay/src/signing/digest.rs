use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha1::{Digest, Sha1};

/// The bytes covered by an AppSwitch authentication signature: the absolute
/// request URL immediately followed by the raw body.
///
/// SHA-1 is what the AppSwitch backend recomputes on its side. Do not reuse
/// this digest for anything else.
#[derive(Debug, Clone, Copy)]
pub struct SignedPayload<'a> {
    url: &'a str,
    body: &'a [u8],
}

impl<'a> SignedPayload<'a> {
    /// `body` is empty for requests without a body; no marker is added.
    pub fn new(url: &'a str, body: &'a [u8]) -> Self {
        Self { url, body }
    }

    pub fn digest(&self) -> [u8; 20] {
        let mut hasher = Sha1::new();
        hasher.update(self.url.as_bytes());
        hasher.update(self.body);
        hasher.finalize().into()
    }

    /// Standard alphabet, padded.
    pub fn digest_base64(&self) -> String {
        STANDARD.encode(self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_url_then_body() {
        let payload = SignedPayload::new("https://example.com/a?b=c", b"{\"x\":1}");
        let expected: [u8; 20] = Sha1::digest(b"https://example.com/a?b=c{\"x\":1}").into();
        assert_eq!(payload.digest(), expected);
    }

    #[test]
    fn empty_body_adds_nothing() {
        let payload = SignedPayload::new("https://example.com/a", b"");
        let expected: [u8; 20] = Sha1::digest(b"https://example.com/a").into();
        assert_eq!(payload.digest(), expected);
    }

    #[test]
    fn digest_matches_sha1_of_concatenation() {
        let payload = SignedPayload::new("ab", b"c");
        assert_eq!(
            hex::encode(payload.digest()),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(payload.digest_base64(), "qZk+NkcGgWq6PiVxeFDCbJzQ2J0=");
    }

    #[test]
    fn digest_is_split_invariant() {
        let whole = SignedPayload::new("https://example.com/path", b"");
        let split = SignedPayload::new("https://example.com", b"/path");
        assert_eq!(whole.digest(), split.digest());
    }

    #[test]
    fn known_appswitch_digest() {
        let payload = SignedPayload::new(
            "https://api.mobeco.dk/appswitch/api/v1/merchants/1234/orders/1234",
            b"",
        );
        assert_eq!(payload.digest_base64(), "URrNWkZAAZaFqFA9Yny2u85TqR0=");
    }
}
