use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    /// The URL string could not be parsed as an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// The URL points to a private/internal IP address.
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(String),
    /// The URL points to localhost.
    #[error("Localhost not allowed")]
    Localhost,
}

/// Checks that a stored link is an absolute `http`/`https` URL with a host.
///
/// Used for the `url` field of news items, which are only ever rendered as
/// links and never fetched, so no network policy applies.
///
/// ```
/// use newsdesk::util::validate_absolute_url;
///
/// assert!(validate_absolute_url("https://www.cnbc.com/2026/02/13/story.html").is_ok());
/// assert!(validate_absolute_url("/2026/02/13/story.html").is_err());
/// assert!(validate_absolute_url("mailto:desk@example.com").is_err());
/// ```
pub fn validate_absolute_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// Validates a feed source URL before it is fetched.
///
/// On top of [`validate_absolute_url`], rejects localhost and private,
/// link-local or unspecified IP addresses so a config file cannot point the
/// fetcher at internal services.
///
/// ```
/// use newsdesk::util::validate_feed_url;
///
/// assert!(validate_feed_url("https://techcrunch.com/category/artificial-intelligence/feed/").is_ok());
/// assert!(validate_feed_url("http://localhost/feed").is_err());
/// assert!(validate_feed_url("http://192.168.1.1/feed").is_err());
/// ```
pub fn validate_feed_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = validate_absolute_url(url_str)?;

    if let Some(host) = url.host_str() {
        if host.eq_ignore_ascii_case("localhost") {
            return Err(UrlValidationError::Localhost);
        }

        let host_for_parse = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if let Ok(ip) = host_for_parse.parse::<IpAddr>() {
            if ip.is_loopback() {
                return Err(UrlValidationError::Localhost);
            }
            if is_private_ip(&ip) {
                return Err(UrlValidationError::PrivateIp(ip.to_string()));
            }
        }
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_private() || ipv4.is_link_local() || ipv4.is_unspecified()
        }
        IpAddr::V6(ipv6) => {
            if ipv6.is_unspecified() {
                return true;
            }
            let segments = ipv6.segments();
            // fc00::/7
            let is_unique_local = (segments[0] & 0xfe00) == 0xfc00;
            // fe80::/10
            let is_link_local = (segments[0] & 0xffc0) == 0xfe80;
            is_unique_local || is_link_local
        }
    }
}
