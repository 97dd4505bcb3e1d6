//! `reqwest`-backed remote.

use crate::error::{ErrorKind, Result};
use crate::{RemoteSource, Response};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Client, Url, redirect::Policy};
use std::time::Duration;

/// Knobs for the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Sent as `User-Agent`; `reqwest` sends none when unset.
    pub user_agent: Option<String>,
    /// Total time allowed per request, body included.
    pub timeout: Duration,
    /// Accept invalid or self-signed TLS certificates.
    pub insecure: bool,
}
impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout: Duration::from_secs(30),
            insecure: false,
        }
    }
}

/// Normalizes the URL of an exposed repository into the URL of the directory
/// that *contains* `.git`, always with a trailing slash, so that joining a
/// path like `.git/HEAD` onto it does the right thing.
///
/// A missing scheme defaults to `http://`. Query strings and fragments are
/// dropped.
///
/// ```
/// use spelunk_remote::normalize_base_url;
/// assert_eq!(normalize_base_url("https://example.com/app/.git/").unwrap().as_str(), "https://example.com/app/");
/// assert_eq!(normalize_base_url("example.com").unwrap().as_str(), "http://example.com/");
/// assert!(normalize_base_url("ftp://example.com").is_err());
/// ```
pub fn normalize_base_url(input: &str) -> Result<Url> {
    let input = input.trim();
    let with_scheme = match input.contains("://") {
        true => input.to_string(),
        false => format!("http://{input}"),
    };
    let mut url = Url::parse(&with_scheme).or_raise(|| ErrorKind::InvalidUrl(input.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        exn::bail!(ErrorKind::InvalidUrl(input.to_string()));
    }
    let trimmed = url.path().trim_end_matches('/');
    let root = trimmed.strip_suffix("/.git").unwrap_or(trimmed);
    let path = format!("{root}/");
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Escapes the characters a URL would otherwise read as the start of a query
/// or fragment. Branch names scraped from `FETCH_HEAD` may contain them, and
/// the request has to name the same file the response is stored as.
fn encode_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '%' => encoded.push_str("%25"),
            '#' => encoded.push_str("%23"),
            '?' => encoded.push_str("%3F"),
            _ => encoded.push(c),
        }
    }
    encoded
}

/// Remote served over HTTP(S).
///
/// Redirects are not followed: a redirect away from a metadata file almost
/// always lands on a login or index page, and is reported as the 3xx status it
/// is.
#[derive(Clone)]
pub struct HttpRemote {
    client: Client,
    base: Url,
}
impl HttpRemote {
    /// Build a remote rooted at `base`, normalized with [`normalize_base_url`].
    pub fn new(base: &str, options: &HttpOptions) -> Result<Self> {
        let base = normalize_base_url(base)?;
        let mut builder = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.insecure)
            .redirect(Policy::none());
        if let Some(user_agent) = &options.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder.build().or_raise(|| ErrorKind::Client)?;
        tracing::debug!(base = %base, insecure = options.insecure, "HTTP remote ready");
        Ok(Self { client, base })
    }

    /// Normalized base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn join(&self, path: &str) -> Result<Url> {
        let relative = encode_path(path.trim_start_matches('/'));
        self.base.join(&relative).or_raise(|| ErrorKind::InvalidUrl(format!("{}{}", self.base, relative)))
    }
}

#[async_trait]
impl RemoteSource for HttpRemote {
    fn url(&self, path: &str) -> String {
        match self.join(path) {
            Ok(url) => url.into(),
            Err(_) => format!("{}{}", self.base, path.trim_start_matches('/')),
        }
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let url = self.join(path)?;
        let response =
            self.client.get(url).send().await.map_err(|e| ErrorKind::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| ErrorKind::Transport(e.to_string()))?;
        Ok(Response::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com", "https://example.com/")]
    #[case("https://example.com/", "https://example.com/")]
    #[case("https://example.com/.git", "https://example.com/")]
    #[case("https://example.com/.git/", "https://example.com/")]
    #[case("https://example.com/app/.git/", "https://example.com/app/")]
    #[case("https://example.com/app", "https://example.com/app/")]
    #[case("http://example.com:8080/a/b/?x=1#y", "http://example.com:8080/a/b/")]
    #[case("example.com/app/.git", "http://example.com/app/")]
    #[case("  https://example.com  ", "https://example.com/")]
    fn test_normalize_base_url(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_base_url(input).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("ftp://example.com/.git/")]
    #[case("file:///srv/repo/.git")]
    #[case("http://")]
    #[case("")]
    fn test_normalize_base_url_rejects(#[case] input: &str) {
        let err = normalize_base_url(input).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidUrl(_)));
    }

    #[rstest]
    #[case(".git/HEAD", "https://example.com/app/.git/HEAD")]
    #[case("/.git/HEAD", "https://example.com/app/.git/HEAD")]
    #[case(".git/refs/heads/feature/login", "https://example.com/app/.git/refs/heads/feature/login")]
    #[case(".git/logs/refs/remotes/origin/dev", "https://example.com/app/.git/logs/refs/remotes/origin/dev")]
    #[case(".git/refs/remotes/origin/fix#12", "https://example.com/app/.git/refs/remotes/origin/fix%2312")]
    #[case(".git/refs/remotes/origin/what?", "https://example.com/app/.git/refs/remotes/origin/what%3F")]
    #[case(".git/refs/remotes/origin/100%", "https://example.com/app/.git/refs/remotes/origin/100%25")]
    fn test_url_join(#[case] path: &str, #[case] expected: &str) {
        let remote = HttpRemote::new("https://example.com/app/.git/", &HttpOptions::default()).unwrap();
        assert_eq!(remote.url(path), expected);
    }
}
