// ABOUTME: DocumentSource implementations for the command line: HTTP fetching and local HTML files.
// ABOUTME: Handles status checks, timeouts, politeness delays and charset decoding.

use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use blogport_extract::{DocumentSource, SourceError};
use reqwest::header::CONTENT_TYPE;

/// Browser-like User-Agent; some site builders serve bots an empty shell.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Fetches documents over HTTP(S), waiting at least `delay` between requests.
#[derive(Debug)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
    delay: Duration,
    last_request: Cell<Option<Instant>>,
}

impl HttpSource {
    pub fn new(timeout: Duration, delay: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            delay,
            last_request: Cell::new(None),
        })
    }

    fn pace(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                thread::sleep(self.delay - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, locator: &str) -> Result<String, SourceError> {
        let url = url::Url::parse(locator).map_err(|e| {
            SourceError::invalid_locator(locator, Some(anyhow::anyhow!("invalid URL: {}", e)))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SourceError::invalid_locator(
                locator,
                Some(anyhow::anyhow!("scheme must be http or https")),
            ));
        }

        self.pace();
        tracing::debug!(url = %url, "fetching");
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                SourceError::timeout(locator, Some(e.into()))
            } else {
                SourceError::fetch(locator, Some(e.into()))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::status(locator, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .map_err(|e| SourceError::fetch(locator, Some(e.into())))?;
        Ok(decode_body(&body, content_type.as_deref()))
    }
}

/// Serves saved HTML files, each under the locator it was saved from.
#[derive(Debug, Default)]
pub struct FileSource {
    files: Vec<(String, PathBuf)>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, locator: impl Into<String>, path: impl Into<PathBuf>) {
        self.files.push((locator.into(), path.into()));
    }

    pub fn locators(&self) -> Vec<String> {
        self.files.iter().map(|(l, _)| l.clone()).collect()
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self, locator: &str) -> Result<String, SourceError> {
        let (_, path) = self
            .files
            .iter()
            .find(|(l, _)| l == locator)
            .ok_or_else(|| {
                SourceError::invalid_locator(locator, Some(anyhow::anyhow!("no file for locator")))
            })?;
        let bytes = fs::read(path).map_err(|e| SourceError::io(locator, e))?;
        Ok(decode_body(&bytes, None))
    }
}

/// Decodes body bytes using the Content-Type charset, or detection.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extracts the charset parameter from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .to_lowercase()
        .split(';')
        .find_map(|part| {
            part.trim()
                .strip_prefix("charset=")
                .map(|c| c.trim_matches('"').trim_matches('\'').to_string())
        })
}
