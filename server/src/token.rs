use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use types::{Result, UserSession, decode_session, encode_session, err};

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &SecretString) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| err!("unusable signing secret"))
}

/// Append an HMAC signature: `<payload>.<signature>`.
pub fn sign(payload: &str, secret: &SecretString) -> Result<String> {
    let mut mac = mac_for(secret)?;
    mac.update(payload.as_bytes());
    let signature = BASE64_URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Ok(format!("{payload}.{signature}"))
}

/// Check the signature made by [`sign`] and return the payload.
pub fn verify<'a>(token: &'a str, secret: &SecretString) -> Result<&'a str> {
    let (payload, signature_b64) = token
        .rsplit_once('.')
        .ok_or_else(|| err!("invalid token format"))?;

    let mut mac = mac_for(secret)?;
    mac.update(payload.as_bytes());
    let signature = BASE64_URL_SAFE_NO_PAD.decode(signature_b64)?;
    mac.verify_slice(&signature)
        .map_err(|_| err!("token signature mismatch"))?;

    Ok(payload)
}

pub fn session_token(session: &UserSession, secret: &SecretString) -> Result<String> {
    sign(&encode_session(session)?, secret)
}

pub fn session_from_token(token: &str, secret: &SecretString) -> Result<UserSession> {
    decode_session(verify(token, secret)?)
}
