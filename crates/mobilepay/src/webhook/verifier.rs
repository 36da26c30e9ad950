use std::fmt;
use std::io;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use http::HeaderMap;
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::error::{ConfigurationError, Error, IntegrityError, Result};

/// Header MobilePay puts the webhook signature in.
pub const SIGNATURE_HEADER: &str = "x-mobilepay-signature";

type HmacSha1 = Hmac<Sha1>;

/// Verifies that a webhook body was sent by MobilePay.
///
/// The expected value is `base64(HMAC-SHA1(signature_key, webhook_url || body))`.
/// Binding the URL stops a signature for one endpoint from being replayed
/// against another endpoint that shares the secret.
///
/// One verifier per request: construct it, stream the body in with
/// [`update`](Self::update) or [`io::Write`], then call
/// [`ensure`](Self::ensure), which consumes it.
///
/// ```no_run
/// # fn handle(headers: &http::HeaderMap, body: &[u8]) -> mobilepay::Result<()> {
/// use mobilepay::webhook::WebhookVerifier;
///
/// let mut verifier = WebhookVerifier::new(headers, "https://shop.example/webhooks", "secret")?;
/// verifier.update(body);
/// verifier.ensure()
/// # }
/// ```
pub struct WebhookVerifier {
    webhook_url: String,
    signature: Vec<u8>,
    mac: HmacSha1,
}

impl WebhookVerifier {
    pub fn new(headers: &HeaderMap, webhook_url: &str, signature_key: &str) -> Result<Self> {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        Self::with_signature(signature, webhook_url, signature_key)
    }

    /// For callers that extracted the signature header themselves.
    pub fn with_signature(signature: &str, webhook_url: &str, signature_key: &str) -> Result<Self> {
        if webhook_url.is_empty() || signature.is_empty() {
            tracing::warn!(
                has_url = !webhook_url.is_empty(),
                has_signature = !signature.is_empty(),
                "webhook verifier is missing properties"
            );
            return Err(ConfigurationError::MissingVerifierProperties.into());
        }

        let mut mac = HmacSha1::new_from_slice(signature_key.as_bytes())
            .map_err(|e| Error::Computation(format!("initializing HMAC-SHA1: {e}")))?;
        mac.update(webhook_url.as_bytes());

        Ok(Self {
            webhook_url: webhook_url.to_string(),
            signature: signature.as_bytes().to_vec(),
            mac,
        })
    }

    /// Verifies a fully buffered body in one call.
    pub fn verify(
        headers: &HeaderMap,
        webhook_url: &str,
        signature_key: &str,
        body: &[u8],
    ) -> Result<()> {
        let mut verifier = Self::new(headers, webhook_url, signature_key)?;
        verifier.update(body);
        verifier.ensure()
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.mac.update(chunk);
    }

    /// Compares the computed signature with the received one in constant time.
    pub fn ensure(self) -> Result<()> {
        let computed = STANDARD.encode(self.mac.finalize().into_bytes());

        if bool::from(computed.as_bytes().ct_eq(&self.signature)) {
            return Ok(());
        }

        tracing::warn!(webhook_url = %self.webhook_url, "webhook signature mismatch");
        Err(IntegrityError::SignatureMismatch { computed }.into())
    }
}

impl io::Write for WebhookVerifier {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("webhook_url", &self.webhook_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderName, HeaderValue};
    use std::io::Write;

    const URL: &str = "https://example.com/hook";
    const KEY: &str = "secret";

    fn expected(body: &[u8]) -> String {
        let mut mac = HmacSha1::new_from_slice(KEY.as_bytes()).unwrap();
        mac.update(URL.as_bytes());
        mac.update(body);
        STANDARD.encode(mac.finalize().into_bytes())
    }

    fn headers(signature: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(signature).unwrap());
        headers
    }

    #[test]
    fn accepts_matching_signature() {
        let body = br#"{"eventType":"payment.reserved"}"#;
        let mut verifier = WebhookVerifier::new(&headers(&expected(body)), URL, KEY).unwrap();
        verifier.update(body);
        verifier.ensure().unwrap();
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"X-MobilePay-Signature").unwrap(),
            HeaderValue::from_str(&expected(b"")).unwrap(),
        );
        WebhookVerifier::new(&headers, URL, KEY).unwrap().ensure().unwrap();
    }

    #[test]
    fn empty_body_binds_url_only() {
        let verifier = WebhookVerifier::with_signature(&expected(b""), URL, KEY).unwrap();
        verifier.ensure().unwrap();
    }

    #[test]
    fn rejects_other_url() {
        let body = b"{}";
        let mut verifier =
            WebhookVerifier::with_signature(&expected(body), "https://example.com/other", KEY)
                .unwrap();
        verifier.update(body);
        assert!(matches!(verifier.ensure(), Err(Error::Integrity(_))));
    }

    #[test]
    fn mismatch_reports_computed_value() {
        let mut verifier = WebhookVerifier::with_signature("AAAA", URL, KEY).unwrap();
        verifier.update(b"{}");
        match verifier.ensure() {
            Err(Error::Integrity(IntegrityError::SignatureMismatch { computed })) => {
                assert_eq!(computed, expected(b"{}"));
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn io_write_feeds_the_accumulator() {
        let body = b"chunked body";
        let mut verifier = WebhookVerifier::with_signature(&expected(body), URL, KEY).unwrap();
        verifier.write_all(&body[..4]).unwrap();
        verifier.write_all(&body[4..]).unwrap();
        verifier.flush().unwrap();
        verifier.ensure().unwrap();
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = WebhookVerifier::new(&HeaderMap::new(), URL, KEY).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::MissingVerifierProperties)
        ));
    }

    #[test]
    fn non_ascii_header_counts_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_bytes(b"\xffabc").unwrap());
        assert!(WebhookVerifier::new(&headers, URL, KEY).is_err());
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = WebhookVerifier::with_signature("sig", "", KEY).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::MissingVerifierProperties)
        ));
    }

    #[test]
    fn empty_key_is_allowed() {
        let mut mac = HmacSha1::new_from_slice(b"").unwrap();
        mac.update(URL.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());
        WebhookVerifier::with_signature(&signature, URL, "").unwrap().ensure().unwrap();
    }

    #[test]
    fn debug_hides_secret_state() {
        let verifier = WebhookVerifier::with_signature("sig", URL, KEY).unwrap();
        assert_eq!(
            format!("{verifier:?}"),
            "WebhookVerifier { webhook_url: \"https://example.com/hook\", .. }"
        );
    }
}
