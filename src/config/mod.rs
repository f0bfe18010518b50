use std::env;
use std::fmt;
use std::path::PathBuf;

const DEFAULT_SOURCE_URL: &str = "https://jobs.lever.co/atlassian";
const DEFAULT_INTEREST_KEYWORDS: &[&str] = &[
    "FrontendEngineer",
    "FrontendDeveloper",
    "FullStack",
    "BackEnd",
    "Frontend",
];
const DEFAULT_EXCLUSION_KEYWORDS: &[&str] = &["Senior", "architect", "Principal"];

/// Top-level configuration for the scraper.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub source: SourceConfig,
    pub filter: FilterConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let path = env::var("JOBSCOUT_DB_PATH").unwrap_or_else(|_| "jobs.db".to_string());
        let test_path =
            env::var("JOBSCOUT_TEST_DB_PATH").unwrap_or_else(|_| "test.db".to_string());

        let listing_url =
            env::var("JOBSCOUT_SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string());
        let source = SourceConfig::new(listing_url)?;

        let interest_keywords = keyword_list("JOBSCOUT_INTEREST_KEYWORDS", DEFAULT_INTEREST_KEYWORDS);
        if interest_keywords.is_empty() {
            return Err(ConfigError::EmptyInterestKeywords);
        }
        let exclusion_keywords =
            keyword_list("JOBSCOUT_EXCLUDE_KEYWORDS", DEFAULT_EXCLUSION_KEYWORDS);

        let log_level = env::var("JOBSCOUT_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            store: StoreConfig {
                path: PathBuf::from(path),
                test_path: PathBuf::from(test_path),
            },
            source,
            filter: FilterConfig {
                interest_keywords,
                exclusion_keywords,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn keyword_list(var: &str, defaults: &[&str]) -> Vec<String> {
    match env::var(var) {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => defaults.iter().map(|keyword| keyword.to_string()).collect(),
    }
}

/// Locations of the applied-jobs database and the disposable smoke-test database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub test_path: PathBuf,
}

/// The job board page that gets scraped.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub listing_url: String,
}

impl SourceConfig {
    pub fn new(listing_url: impl Into<String>) -> Result<Self, ConfigError> {
        let listing_url = listing_url.into().trim().to_string();
        if listing_url.is_empty() {
            return Err(ConfigError::EmptySourceUrl);
        }
        Ok(Self { listing_url })
    }

    /// Base for per-posting detail links; postings live at `<base>/<id>`.
    pub fn detail_base_url(&self) -> &str {
        self.listing_url.trim_end_matches('/')
    }
}

/// Keyword lists consumed by the filter pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub interest_keywords: Vec<String>,
    pub exclusion_keywords: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            interest_keywords: DEFAULT_INTEREST_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
            exclusion_keywords: DEFAULT_EXCLUSION_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptySourceUrl,
    EmptyInterestKeywords,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptySourceUrl => write!(f, "JOBSCOUT_SOURCE_URL must not be empty"),
            ConfigError::EmptyInterestKeywords => {
                write!(f, "JOBSCOUT_INTEREST_KEYWORDS must name at least one keyword")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("JOBSCOUT_DB_PATH");
        env::remove_var("JOBSCOUT_TEST_DB_PATH");
        env::remove_var("JOBSCOUT_SOURCE_URL");
        env::remove_var("JOBSCOUT_INTEREST_KEYWORDS");
        env::remove_var("JOBSCOUT_EXCLUDE_KEYWORDS");
        env::remove_var("JOBSCOUT_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.store.path, PathBuf::from("jobs.db"));
        assert_eq!(config.store.test_path, PathBuf::from("test.db"));
        assert_eq!(config.source.listing_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.filter, FilterConfig::default());
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn keyword_lists_are_split_and_trimmed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("JOBSCOUT_INTEREST_KEYWORDS", " Rust , Backend,,");
        env::set_var("JOBSCOUT_EXCLUDE_KEYWORDS", "");
        let config = AppConfig::load().expect("config loads");
        reset_env();
        assert_eq!(config.filter.interest_keywords, vec!["Rust", "Backend"]);
        assert!(config.filter.exclusion_keywords.is_empty());
    }

    #[test]
    fn rejects_empty_interest_list() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("JOBSCOUT_INTEREST_KEYWORDS", " , ");
        let result = AppConfig::load();
        reset_env();
        assert!(matches!(result, Err(ConfigError::EmptyInterestKeywords)));
    }

    #[test]
    fn detail_base_url_drops_trailing_slash() {
        let source = SourceConfig::new("https://jobs.example.com/acme/").expect("valid url");
        assert_eq!(source.detail_base_url(), "https://jobs.example.com/acme");
        assert!(matches!(
            SourceConfig::new("   "),
            Err(ConfigError::EmptySourceUrl)
        ));
    }
}
