//! Auth cookie construction and parsing.
//!
//! The JWT rides in an HttpOnly cookie with `SameSite=Lax` so it is sent on
//! top-level navigations but not exposed to scripts.

use crate::config::ServerConfig;

/// Build a `Set-Cookie` header value carrying the auth token.
pub fn build_auth_cookie(config: &ServerConfig, token: &str) -> String {
    let max_age = config.jwt.expires_days * 24 * 60 * 60;
    let mut cookie = format!(
        "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
        config.cookie_name
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build a `Set-Cookie` header value that clears the auth cookie.
pub fn build_clear_cookie(config: &ServerConfig) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.cookie_name
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extract the named cookie's value from a `Cookie` request header.
pub fn extract_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtConfig;

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "0.0.0.0".into(),
            port: 4000,
            cors_origins: vec![],
            request_timeout_secs: 30,
            cookie_name: "token".into(),
            cookie_secure: false,
            upload_dir: "uploads".into(),
            max_upload_bytes: 10 * 1024 * 1024,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                expires_days: 7,
            },
        }
    }

    #[test]
    fn test_build_auth_cookie() {
        let cookie = build_auth_cookie(&test_config(), "abc.def.ghi");
        assert!(cookie.starts_with("token=abc.def.ghi;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_secure_flag_applied() {
        let mut config = test_config();
        config.cookie_secure = true;
        let cookie = build_auth_cookie(&config, "t");
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie_zeroes_max_age() {
        let cookie = build_clear_cookie(&test_config());
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_cookie() {
        let header = "theme=dark; token=abc.def; lang=en";
        assert_eq!(extract_cookie(header, "token"), Some("abc.def"));
        assert_eq!(extract_cookie(header, "theme"), Some("dark"));
        assert_eq!(extract_cookie(header, "missing"), None);
    }
}
