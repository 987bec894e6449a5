// ABOUTME: Configuration module for the cranio-deck application
// ABOUTME: Provides configuration settings and environment variable handling

use std::env;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_PATH: &str = "presentation/Craniofacial_Syndromes_Anesthesia.pptx";
pub const DEFAULT_IMAGES_DIR: &str = "presentation/images";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                                      (KHTML, like Gecko) Chrome/123.0 Safari/537.36";
pub const DEFAULT_REFERER: &str = "https://commons.wikimedia.org/";
pub const DEFAULT_LOOKUP_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_PAGE_URL_PREFIX: &str = "https://en.wikipedia.org/wiki/";
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 800;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the finished presentation is written
    pub output_path: PathBuf,
    /// Directory that receives downloaded images
    pub images_dir: PathBuf,
    /// Ceiling for every HTTP request, in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Referer sent with image downloads
    pub referer: String,
    /// Page-image lookup service (MediaWiki API)
    pub lookup_endpoint: String,
    /// Prefix used to build the page URL cited for a looked-up image
    pub page_url_prefix: String,
    pub thumbnail_size: u32,
    /// Skip all network access
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            lookup_endpoint: DEFAULT_LOOKUP_ENDPOINT.to_string(),
            page_url_prefix: DEFAULT_PAGE_URL_PREFIX.to_string(),
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            offline: false,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let output_path = env::var("DECK_OUTPUT_PATH")
            .ok()
            .map(PathBuf::from)
            .unwrap_or(defaults.output_path);
        let images_dir = env::var("DECK_IMAGES_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or(defaults.images_dir);
        let timeout_secs = env::var("DECK_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let user_agent = env::var("DECK_USER_AGENT").unwrap_or(defaults.user_agent);
        let lookup_endpoint = env::var("DECK_LOOKUP_ENDPOINT").unwrap_or(defaults.lookup_endpoint);
        let page_url_prefix = env::var("DECK_PAGE_URL_PREFIX").unwrap_or(defaults.page_url_prefix);
        let offline = env::var("DECK_OFFLINE")
            .ok()
            .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            output_path,
            images_dir,
            timeout_secs,
            user_agent,
            referer: defaults.referer,
            lookup_endpoint,
            page_url_prefix,
            thumbnail_size: defaults.thumbnail_size,
            offline,
        }
    }

    /// Apply command-line overrides on top of this config
    pub fn with_overrides(
        mut self,
        output_path: Option<PathBuf>,
        images_dir: Option<PathBuf>,
        timeout_secs: Option<u64>,
        offline: bool,
    ) -> Self {
        if let Some(path) = output_path {
            self.output_path = path;
        }
        if let Some(dir) = images_dir {
            self.images_dir = dir;
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
        self.offline |= offline;
        self
    }
}
