//! Session token types.

use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderValue, InvalidHeaderValue};

/// A short-lived DEP session token, sent as `X-ADM-Auth-Session`.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(HeaderValue);

impl SessionToken {
    /// Fails if the token cannot be carried in a header.
    pub(crate) fn new(token: &str) -> Result<Self, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(token)?;
        value.set_sensitive(true);
        Ok(Self(value))
    }

    /// Returns the value for the session header.
    pub(crate) fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}

/// A token together with the instant it stops being trusted.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) token: SessionToken,
    pub(crate) expires_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn session_token_hides_value_in_debug() {
        let token = SessionToken::new("1413412413;adf0293jfa").unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains("adf0293jfa"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn session_token_rejects_header_breaking_values() {
        assert!(SessionToken::new("bad\ntoken").is_err());
        assert!(SessionToken::new("bad\rtoken").is_err());
        let token = SessionToken::new("1413412413;adf0293jfa").unwrap();
        assert!(token.header_value().is_sensitive());
    }

    #[test]
    fn session_expires_exactly_at_deadline() {
        let now = Utc::now();
        let session = Session {
            token: SessionToken::new("token").unwrap(),
            expires_at: now + Duration::minutes(3),
        };

        assert!(!session.is_expired_at(now));
        assert!(!session.is_expired_at(now + Duration::seconds(179)));
        assert!(session.is_expired_at(now + Duration::minutes(3)));
    }
}
