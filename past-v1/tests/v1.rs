use std::sync::OnceLock;

use past_core::key::Key;
use past_core::version::Protocol;
use past_v1::V1;
use rand_core::OsRng;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::spki::EncodePublicKey;

const MESSAGE: &[u8] = br#"{"sub":"alice"}"#;
const FOOTER: &[u8] = b"kid:1";

fn shared(byte: u8) -> [u8; 32] {
    [byte; 32]
}

fn keypair() -> &'static (Key, Key) {
    static KEYPAIR: OnceLock<(Key, Key)> = OnceLock::new();
    KEYPAIR.get_or_init(|| {
        let secret = rsa::RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let public = rsa::RsaPublicKey::from(&secret);
        let secret_der = secret.to_pkcs1_der().unwrap();
        let public_der = public.to_public_key_der().unwrap();
        (
            Key::asymmetric_secret(secret_der.as_bytes()),
            Key::asymmetric_public(public_der.into_vec()),
        )
    })
}

/// Flip one character of the chosen payload segment.
fn tamper(token: &str, segment: usize) -> String {
    let mut segments: Vec<String> = token.split('.').map(str::to_owned).collect();
    let target = &mut segments[segment];
    let flipped = if target.as_bytes()[1] == b'A' { 'B' } else { 'A' };
    target.replace_range(1..2, &flipped.to_string());
    segments.join(".")
}

#[test]
fn auth_round_trip() {
    let key = Key::symmetric_auth(&shared(0x11)[..]);
    let token = past_v1::authenticate(MESSAGE, &key, FOOTER).unwrap();
    assert!(token.starts_with("v1.auth."));
    assert_eq!(token.split('.').count(), 4);

    let message = V1.verify_auth(&token, &key, FOOTER).unwrap();
    assert_eq!(message, MESSAGE);
}

#[test]
fn auth_rejects_tampering_and_wrong_key() {
    let key = Key::symmetric_auth(&shared(0x11)[..]);
    let token = past_v1::authenticate(MESSAGE, &key, FOOTER).unwrap();

    assert!(V1.verify_auth(&tamper(&token, 2), &key, FOOTER).is_err());

    let other = Key::symmetric_auth(&shared(0x22)[..]);
    assert!(V1.verify_auth(&token, &other, FOOTER).is_err());
}

#[test]
fn auth_footer_is_authenticated() {
    let key = Key::symmetric_auth(&shared(0x11)[..]);
    let token = past_v1::authenticate(MESSAGE, &key, FOOTER).unwrap();

    assert!(V1.verify_auth(&token, &key, b"kid:2").is_err());
    assert!(V1.verify_auth(&token, &key, b"").is_err());
}

#[test]
fn enc_round_trip() {
    let key = Key::symmetric_crypt(&shared(0x33)[..]);
    let token = past_v1::encrypt(MESSAGE, &key, b"").unwrap();
    assert_eq!(token.split('.').count(), 3);

    // ciphertext must not leak the message
    assert!(!token.contains("eyJzdWIi"));

    let message = V1.decrypt(&token, &key, b"").unwrap();
    assert_eq!(message, MESSAGE);
}

#[test]
fn enc_rejects_tampering_and_wrong_key() {
    let key = Key::symmetric_crypt(&shared(0x33)[..]);
    let token = past_v1::encrypt(MESSAGE, &key, FOOTER).unwrap();

    assert!(V1.decrypt(&tamper(&token, 2), &key, FOOTER).is_err());

    let other = Key::symmetric_crypt(&shared(0x44)[..]);
    assert!(V1.decrypt(&token, &other, FOOTER).is_err());
}

#[test]
fn seal_round_trip() {
    let (secret, public) = keypair();
    let token = past_v1::seal(MESSAGE, public, FOOTER).unwrap();
    assert!(token.starts_with("v1.seal."));
    assert_eq!(token.split('.').count(), 5);

    let message = V1.unseal(&token, secret, FOOTER).unwrap();
    assert_eq!(message, MESSAGE);
}

#[test]
fn seal_rejects_tampering() {
    let (secret, public) = keypair();
    let token = past_v1::seal(MESSAGE, public, b"").unwrap();

    // encapsulation segment
    assert!(V1.unseal(&tamper(&token, 2), secret, b"").is_err());
    // body segment
    assert!(V1.unseal(&tamper(&token, 3), secret, b"").is_err());
}

#[test]
fn sign_round_trip() {
    let (secret, public) = keypair();
    let token = past_v1::sign(MESSAGE, secret, FOOTER).unwrap();
    assert!(token.starts_with("v1.sign."));
    assert_eq!(token.split('.').count(), 5);

    let message = V1.verify_signature(&token, public, FOOTER).unwrap();
    assert_eq!(message, MESSAGE);
}

#[test]
fn sign_rejects_tampering() {
    let (secret, public) = keypair();
    let token = past_v1::sign(MESSAGE, secret, b"").unwrap();

    assert!(V1.verify_signature(&tamper(&token, 2), public, b"").is_err());
    assert!(V1.verify_signature(&tamper(&token, 3), public, b"").is_err());
}

#[test]
fn operations_reject_wrong_capability_keys() {
    let auth_key = Key::symmetric_auth(&shared(0x11)[..]);
    let crypt_key = Key::symmetric_crypt(&shared(0x33)[..]);

    let token = past_v1::authenticate(MESSAGE, &auth_key, b"").unwrap();
    assert!(V1.verify_auth(&token, &crypt_key, b"").is_err());

    let token = past_v1::encrypt(MESSAGE, &crypt_key, b"").unwrap();
    assert!(V1.decrypt(&token, &auth_key, b"").is_err());
}
