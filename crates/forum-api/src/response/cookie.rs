//! Session cookie headers

use axum::http::{header::InvalidHeaderValue, HeaderValue};

/// `Set-Cookie` value carrying a session token
pub fn session_cookie(
    name: &str,
    token: &str,
    max_age_seconds: i64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie =
        format!("{name}={token}; HttpOnly; Path=/; Max-Age={max_age_seconds}; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// `Set-Cookie` value that makes the client drop its session cookie
pub fn expired_session_cookie(name: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!("{name}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("session", "abc", 3600, false).unwrap();
        assert_eq!(
            cookie,
            "session=abc; HttpOnly; Path=/; Max-Age=3600; SameSite=Lax"
        );

        let cookie = session_cookie("session", "abc", 60, true).unwrap();
        assert!(cookie.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn test_rejects_header_breaking_values() {
        assert!(session_cookie("session", "a\nb", 1, false).is_err());
    }
}
