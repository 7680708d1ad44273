//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::OnceLock;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use wiremock::Request;

/// A PEM-encoded RSA private key, generated once per test binary.
pub fn test_key_pem() -> &'static str {
    static KEY: OnceLock<String> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = rand::thread_rng();
        let key = RsaPrivateKey::new(&mut rng, 2048).expect("generate RSA key");
        key.to_pkcs8_pem(LineEnding::LF)
            .expect("encode key as PEM")
            .to_string()
    })
}

/// Split a form-encoded exchange body into `(grant_type, assertion)`.
pub fn parse_exchange_body(request: &Request) -> (String, String) {
    let mut grant_type = String::new();
    let mut assertion = String::new();

    for (name, value) in url::form_urlencoded::parse(&request.body) {
        match name.as_ref() {
            "grant_type" => grant_type = value.into_owned(),
            "assertion" => assertion = value.into_owned(),
            _ => {}
        }
    }

    (grant_type, assertion)
}

/// Decode the payload of a compact JWS without verifying the signature.
pub fn decode_claims(jwt: &str) -> serde_json::Value {
    let payload = jwt.split('.').nth(1).expect("three-part JWS");
    let bytes = URL_SAFE_NO_PAD.decode(payload).expect("base64url payload");
    serde_json::from_slice(&bytes).expect("JSON claims")
}
