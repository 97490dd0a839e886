//! URL 验证模块
//!
//! Only absolute `http://` / `https://` URLs with a host may be shortened.

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    MissingHost,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::MissingHost => write!(f, "URL has no host"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// Validate a URL submitted for shortening and return the parsed form.
///
/// Checks, in order: non-empty, no control characters, no dangerous
/// protocol, `http`/`https` scheme, parseable, has a host.
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    if url.chars().any(char::is_control) {
        return Err(UrlValidationError::InvalidFormat(
            "URL contains control characters".to_string(),
        ));
    }

    let url_lower = url.to_lowercase();

    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(UrlValidationError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("https://example.com/path?query=1").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
        assert!(validate_url("http://www.testsite1.com").is_ok());
    }

    #[test]
    fn test_dangerous_protocols() {
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
        assert!(matches!(
            validate_url("file:///etc/passwd"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
    }

    #[test]
    fn test_scheme_required() {
        assert!(matches!(
            validate_url("www.testsite.com"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
        assert!(matches!(
            validate_url("ftp://example.com"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
    }

    #[test]
    fn test_malformed() {
        assert!(validate_url("http://").is_err());
        assert!(validate_url("http://exa mple.com").is_err());
        assert_eq!(validate_url("   "), Err(UrlValidationError::EmptyUrl));
        assert!(matches!(
            validate_url("http://example.com/\r\nSet-Cookie: a=b"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_case_insensitive_scheme() {
        assert!(validate_url("HTTP://example.com").is_ok());
        assert!(matches!(
            validate_url("JAVASCRIPT:alert(1)"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
    }
}
