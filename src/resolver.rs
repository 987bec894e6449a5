// ABOUTME: Image resolution for the cranio-deck application
// ABOUTME: Downloads a record's image from its direct URL or via the page-image lookup service

use crate::config::Config;
use crate::dataset::SyndromeRecord;
use crate::errors::{DeckError, Result};
use log::{debug, info, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, REFERER};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";

/// Bytes escaped in article URLs; `/` stays literal so subpages keep their path.
const TITLE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Outcome of resolving one record's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    /// Image saved locally; `source` is the locator cited in the references
    Resolved { path: PathBuf, source: String },
    Unresolved,
}

impl ResolvedImage {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ResolvedImage::Resolved { path, .. } => Some(path),
            ResolvedImage::Unresolved => None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            ResolvedImage::Resolved { source, .. } => Some(source),
            ResolvedImage::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolvedImage::Resolved { .. })
    }
}

/// Thumbnail found by the lookup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub source: String,
    pub page_url: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    query: Option<LookupQuery>,
}

#[derive(Debug, Deserialize)]
struct LookupQuery {
    // Insertion-ordered (serde_json `preserve_order`)
    #[serde(default)]
    pages: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct LookupPage {
    title: Option<String>,
    thumbnail: Option<LookupThumbnail>,
}

#[derive(Debug, Deserialize)]
struct LookupThumbnail {
    source: String,
}

/// Fetches images for syndrome records, falling back from the direct URL to the lookup service.
pub struct Resolver {
    client: Client,
    images_dir: PathBuf,
    referer: String,
    lookup_endpoint: String,
    page_url_prefix: String,
    thumbnail_size: u32,
    offline: bool,
}

impl Resolver {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(DeckError::FetchError)?;

        Ok(Self {
            client,
            images_dir: config.images_dir.clone(),
            referer: config.referer.clone(),
            lookup_endpoint: config.lookup_endpoint.clone(),
            page_url_prefix: config.page_url_prefix.clone(),
            thumbnail_size: config.thumbnail_size,
            offline: config.offline,
        })
    }

    /// Resolve the image for a record.
    ///
    /// Every failure along the way is logged and the next source is tried, so
    /// the worst outcome is `Unresolved`.
    pub fn resolve(&self, record: &SyndromeRecord) -> ResolvedImage {
        if self.offline {
            debug!("Offline mode, skipping image for {}", record.name);
            return ResolvedImage::Unresolved;
        }

        let dest = self.images_dir.join(record.image_file_name());

        if let Some(url) = record.image_url {
            if let Some(path) = self.download_image(url, &dest) {
                return ResolvedImage::Resolved {
                    path,
                    source: url.to_string(),
                };
            }
        }

        if let Some(thumbnail) = self.lookup_thumbnail(record.lookup_title()) {
            if let Some(path) = self.download_image(&thumbnail.source, &dest) {
                return ResolvedImage::Resolved {
                    path,
                    source: thumbnail.page_url,
                };
            }
        }

        info!("No image found for {}", record.name);
        ResolvedImage::Unresolved
    }

    /// Download `url` into `dest`. Returns `None` when the fetch or the save fails.
    pub fn download_image(&self, url: &str, dest: &Path) -> Option<PathBuf> {
        let bytes = match self.fetch_image_bytes(url) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to download {}: {}", url, e);
                return None;
            }
        };

        if let Err(e) = fs::write(dest, &bytes) {
            warn!("Failed to save {} to {:?}: {}", url, dest, e);
            return None;
        }
        info!("Saved {} bytes from {} to {:?}", bytes.len(), url, dest);
        Some(dest.to_path_buf())
    }

    /// Ask the lookup service for a page thumbnail. Returns `None` on any failure.
    pub fn lookup_thumbnail(&self, title: &str) -> Option<Thumbnail> {
        match self.query_lookup(title) {
            Ok(Some(thumbnail)) => Some(thumbnail),
            Ok(None) => {
                debug!("Lookup returned no thumbnail for {}", title);
                None
            }
            Err(e) => {
                warn!("Image lookup failed for {}: {}", title, e);
                None
            }
        }
    }

    fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>> {
        info!("Fetching image: {}", url);
        let response = self
            .client
            .get(url)
            .header(REFERER, self.referer.as_str())
            .header(ACCEPT, IMAGE_ACCEPT)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeckError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }

    fn query_lookup(&self, title: &str) -> Result<Option<Thumbnail>> {
        info!("Looking up page image for: {}", title);
        let thumb_size = self.thumbnail_size.to_string();
        let response = self
            .client
            .get(&self.lookup_endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("redirects", "1"),
                ("titles", title),
                ("prop", "pageimages"),
                ("pithumbsize", thumb_size.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeckError::HttpStatusError {
                url: self.lookup_endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        first_thumbnail(&body, title, &self.page_url_prefix)
    }
}

/// Pick the first page, in response order, that carries a thumbnail.
fn first_thumbnail(body: &str, title: &str, prefix: &str) -> Result<Option<Thumbnail>> {
    let parsed: LookupResponse = serde_json::from_str(body)?;
    let pages = parsed.query.map(|q| q.pages).unwrap_or_default();

    for (_, value) in pages {
        let page: LookupPage = serde_json::from_value(value)?;
        if let Some(thumbnail) = page.thumbnail {
            let canonical = page.title.unwrap_or_else(|| title.to_string());
            return Ok(Some(Thumbnail {
                source: thumbnail.source,
                page_url: page_url(prefix, &canonical),
            }));
        }
    }
    Ok(None)
}

/// Build the article URL for a page title.
pub fn page_url(prefix: &str, title: &str) -> String {
    let underscored = title.replace(' ', "_");
    format!("{}{}", prefix, utf8_percent_encode(&underscored, TITLE_ENCODE_SET))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_encodes_title() {
        assert_eq!(
            page_url("https://en.wikipedia.org/wiki/", "Apert syndrome"),
            "https://en.wikipedia.org/wiki/Apert_syndrome"
        );
        assert_eq!(
            page_url("https://en.wikipedia.org/wiki/", "Saethre\u{2013}Chotzen syndrome"),
            "https://en.wikipedia.org/wiki/Saethre%E2%80%93Chotzen_syndrome"
        );
    }

    #[test]
    fn test_page_url_keeps_path_separators() {
        assert_eq!(
            page_url("https://en.wikipedia.org/wiki/", "AC/DC ~x*"),
            "https://en.wikipedia.org/wiki/AC/DC_~x%2A"
        );
        assert_eq!(
            page_url("https://en.wikipedia.org/wiki/", "Treacher Collins (a.k.a. TCS)"),
            "https://en.wikipedia.org/wiki/Treacher_Collins_%28a.k.a._TCS%29"
        );
    }

    #[test]
    fn test_lookup_response_without_thumbnail_parses() {
        let body = r#"{"batchcomplete":"","query":{"pages":{"-1":{"ns":0,"title":"Nope","missing":""}}}}"#;
        let found = first_thumbnail(body, "Nope", "https://en.wikipedia.org/wiki/").unwrap();
        assert_eq!(found, None);

        let no_query = first_thumbnail(r#"{"batchcomplete":""}"#, "Nope", "p/").unwrap();
        assert_eq!(no_query, None);
    }

    #[test]
    fn test_lookup_pages_are_visited_in_response_order() {
        let body = r#"{"query":{"pages":{
            "900":{"title":"Second page","thumbnail":{"source":"https://img/900.png"}},
            "-1":{"title":"Missing","missing":""},
            "100":{"title":"Third page","thumbnail":{"source":"https://img/100.png"}}
        }}}"#;

        let found = first_thumbnail(body, "Query", "https://en.wikipedia.org/wiki/")
            .unwrap()
            .expect("A page with a thumbnail");

        assert_eq!(found.source, "https://img/900.png");
        assert_eq!(found.page_url, "https://en.wikipedia.org/wiki/Second_page");
    }

    #[test]
    fn test_page_without_title_uses_queried_title() {
        let body = r#"{"query":{"pages":{"5":{"thumbnail":{"source":"https://img/5.png"}}}}}"#;
        let found = first_thumbnail(body, "Apert syndrome", "https://en.wikipedia.org/wiki/")
            .unwrap()
            .unwrap();
        assert_eq!(found.page_url, "https://en.wikipedia.org/wiki/Apert_syndrome");
    }

    #[test]
    fn test_offline_resolver_returns_unresolved() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::new();
        config.images_dir = dir.path().to_path_buf();
        config.offline = true;

        let resolver = Resolver::new(&config).unwrap();
        let resolved = resolver.resolve(&crate::dataset::SYNDROMES[0]);

        assert_eq!(resolved, ResolvedImage::Unresolved);
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
