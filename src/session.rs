use actix_web::cookie::{Cookie, CookieJar, Key, time::Duration};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "session";

/// The authenticated identity recovered from a valid token.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    name: String,
    password: String,
}

/// Issues and validates the opaque session token. The token is the session:
/// there is no server-side session table, just an authenticated-encrypted
/// cookie carrying the credential pair.
///
/// The key is generated fresh for every process, so a restart invalidates
/// every outstanding token.
pub struct SessionAuthority {
    key: Key,
    username: String,
    password: String,
}

impl SessionAuthority {
    pub fn new(username: String, password: String) -> Self {
        Self {
            key: Key::generate(),
            username,
            password,
        }
    }

    /// Seals a session cookie for the configured credential pair. Anything
    /// else is a failed login.
    pub fn issue(&self, username: &str, password: &str) -> Result<Cookie<'static>, AppError> {
        if username != self.username || password != self.password {
            return Err(AppError::InvalidCredentials);
        }
        let claims = SessionClaims {
            name: username.to_string(),
            password: password.to_string(),
        };
        let payload = serde_json::to_string(&claims)?;

        let mut jar = CookieJar::new();
        jar.private_mut(&self.key)
            .add(Cookie::build(SESSION_COOKIE, payload).path("/").finish());
        jar.get(SESSION_COOKIE)
            .map(|sealed| sealed.clone().into_owned())
            .ok_or(AppError::Internal)
    }

    /// Opens a token and re-checks the embedded pair against the configured
    /// credentials. Absent, malformed, or tampered tokens are all the same
    /// invalid session.
    pub fn validate(&self, token: &str) -> Result<Session, AppError> {
        let mut jar = CookieJar::new();
        jar.add_original(Cookie::new(SESSION_COOKIE, token.to_string()));
        let opened = jar
            .private(&self.key)
            .get(SESSION_COOKIE)
            .ok_or(AppError::InvalidSession)?;
        let claims: SessionClaims =
            serde_json::from_str(opened.value()).map_err(|_| AppError::InvalidSession)?;
        if claims.name != self.username || claims.password != self.password {
            return Err(AppError::InvalidSession);
        }
        Ok(Session {
            username: claims.name,
        })
    }

    /// An immediately-expired replacement cookie; setting it ends the
    /// client's session.
    pub fn revoke(&self) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .max_age(Duration::seconds(-1))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority() -> SessionAuthority {
        SessionAuthority::new("admin".into(), "admin".into())
    }

    #[test]
    fn issue_and_validate_roundtrip() {
        let authority = authority();
        let cookie = authority.issue("admin", "admin").unwrap();
        let session = authority.validate(cookie.value()).unwrap();
        assert_eq!(session.username, "admin");
    }

    #[test]
    fn wrong_credentials_are_rejected() {
        let authority = authority();
        assert!(matches!(
            authority.issue("admin", "wrong"),
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            authority.issue("root", "admin"),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let authority = authority();
        assert!(matches!(
            authority.validate("not-a-token"),
            Err(AppError::InvalidSession)
        ));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let authority = authority();
        let cookie = authority.issue("admin", "admin").unwrap();
        let mut tampered = cookie.value().to_string();
        tampered.push('A');
        assert!(matches!(
            authority.validate(&tampered),
            Err(AppError::InvalidSession)
        ));
    }

    #[test]
    fn token_does_not_survive_a_key_rotation() {
        // A fresh authority stands in for a restarted process: new keys,
        // every old token invalid.
        let old = authority();
        let cookie = old.issue("admin", "admin").unwrap();
        let fresh = authority();
        assert!(matches!(
            fresh.validate(cookie.value()),
            Err(AppError::InvalidSession)
        ));
    }

    #[test]
    fn revocation_cookie_expires_immediately() {
        let cookie = authority().revoke();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.max_age().unwrap() < Duration::ZERO);
        assert!(cookie.value().is_empty());
    }
}
