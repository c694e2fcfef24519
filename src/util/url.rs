use thiserror::Error;
use url::Url;

/// Errors that can occur while validating a bookmark URL.
#[derive(Error, Debug)]
pub enum LinkUrlError {
    /// The URL string could not be parsed as an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host, so no favicon can ever be derived for it.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates a bookmark URL before it is written to the store or passed
/// to the system browser.
///
/// Bookmarks are user-chosen browse targets opened in the user's own
/// browser, so validation stops at structure: the URL must parse as an
/// absolute http/https URL with a host.
///
/// # Examples
///
/// ```
/// use homedeck::util::validate_link_url;
///
/// let url = validate_link_url("https://www.example.com/docs").unwrap();
/// assert_eq!(url.host_str(), Some("www.example.com"));
///
/// // Relative or garbage strings are rejected
/// assert!(validate_link_url("not-a-url").is_err());
///
/// // Non-web schemes are rejected
/// assert!(validate_link_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_link_url(url_str: &str) -> Result<Url, LinkUrlError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(LinkUrlError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().is_none() {
        return Err(LinkUrlError::MissingHost);
    }

    Ok(url)
}
