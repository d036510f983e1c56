//! Operator authentication and cookie session helpers.

use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use subtle::ConstantTimeEq;

use crate::config::Config;

const SESSION_COOKIE: &str = "operador";
const FLASH_COOKIE: &str = "mensagem";

/// Minimal credential check, swappable for a real identity provider without
/// touching the handlers.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Single-operator credentials from the config file.
pub struct ConfigCredentials {
    username: String,
    password: String,
}

impl ConfigCredentials {
    pub fn from_config(config: &Config) -> Self {
        Self {
            username: config.admin_username.clone(),
            password: config.admin_password.clone(),
        }
    }
}

impl CredentialVerifier for ConfigCredentials {
    /// Both fields are always compared and the results combined, so the
    /// response never reveals which credential was wrong.
    fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}

pub fn start_session(jar: SignedCookieJar, username: &str) -> SignedCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, username.to_string()))
            .path("/")
            .http_only(true),
    )
}

pub fn end_session(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
}

pub fn is_authenticated(jar: &SignedCookieJar) -> bool {
    jar.get(SESSION_COOKIE).is_some()
}

/// One-shot message surfaced on the next rendered page, Flask-flash style.
pub fn flash(jar: SignedCookieJar, mensagem: &str) -> SignedCookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, mensagem.to_string()))
            .path("/")
            .http_only(true),
    )
}

pub fn take_flash(jar: SignedCookieJar) -> (SignedCookieJar, Option<String>) {
    let mensagem = jar.get(FLASH_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/"));
    (jar, mensagem)
}
