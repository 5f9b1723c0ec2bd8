use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{EngineSettings, KeywordPolicy};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub wikipedia: WikipediaSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub relevance: RelevanceSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct WikipediaSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
}

impl Default for WikipediaSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            thumbnail_size: default_thumbnail_size(),
        }
    }
}

fn default_endpoint() -> String { "https://es.wikipedia.org/w/api.php".to_string() }
fn default_user_agent() -> String { format!("geoplaces/{}", env!("CARGO_PKG_VERSION")) }
fn default_timeout_secs() -> u64 { 30 }
fn default_thumbnail_size() -> u32 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_initial_radius_m")]
    pub initial_radius_m: f64,
    #[serde(default = "default_expansion_factor")]
    pub expansion_factor: f64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_min_results")]
    pub min_results: usize,
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    #[serde(default)]
    pub require_reference_for_text: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            initial_radius_m: default_initial_radius_m(),
            expansion_factor: default_expansion_factor(),
            max_attempts: default_max_attempts(),
            min_results: default_min_results(),
            result_limit: default_result_limit(),
            require_reference_for_text: false,
        }
    }
}

fn default_initial_radius_m() -> f64 { 2000.0 }
fn default_expansion_factor() -> f64 { 1.5 }
fn default_max_attempts() -> u32 { 3 }
fn default_min_results() -> usize { 10 }
fn default_result_limit() -> usize { 50 }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Include,
    Exclude,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceSettings {
    #[serde(default = "default_policy")]
    pub policy: PolicyKind,
    #[serde(default = "default_include_keywords")]
    pub include_keywords: Vec<String>,
    #[serde(default = "default_exclude_keywords")]
    pub exclude_keywords: Vec<String>,
}

impl Default for RelevanceSettings {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            include_keywords: default_include_keywords(),
            exclude_keywords: default_exclude_keywords(),
        }
    }
}

fn default_policy() -> PolicyKind { PolicyKind::Include }

fn default_include_keywords() -> Vec<String> {
    [
        "museo", "iglesia", "catedral", "basílica", "capilla", "ermita", "monasterio",
        "convento", "santuario", "parroquia", "monumento", "estatua", "fuente", "parque",
        "jardín", "jardines", "plaza", "castillo", "palacio", "alcázar", "torre", "muralla",
        "puerta", "puente", "teatro", "auditorio", "biblioteca", "mercado", "estadio",
        "acueducto", "yacimiento", "mirador", "faro", "galería", "zoológico", "acuario",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exclude_keywords() -> Vec<String> {
    [
        "ciudad", "municipio", "provincia", "país", "comunidad autónoma", "comarca",
        "localidad", "distrito", "barrio", "pedanía", "región", "departamento",
        "estado", "condado", "anexo:",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with GEOPLACES_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., GEOPLACES__SEARCH__MAX_ATTEMPTS -> search.max_attempts
            .add_source(
                Environment::with_prefix("GEOPLACES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("GEOPLACES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the search loop cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let search = &self.search;
        if !(search.initial_radius_m.is_finite() && search.initial_radius_m > 0.0) {
            return Err(ConfigError::Message(format!(
                "search.initial_radius_m must be positive, got {}",
                search.initial_radius_m
            )));
        }
        // A factor below 1 would shrink the radius between attempts
        if !(search.expansion_factor.is_finite() && search.expansion_factor >= 1.0) {
            return Err(ConfigError::Message(format!(
                "search.expansion_factor must be at least 1.0, got {}",
                search.expansion_factor
            )));
        }
        if search.max_attempts == 0 {
            return Err(ConfigError::Message("search.max_attempts must be at least 1".into()));
        }
        if search.result_limit == 0 {
            return Err(ConfigError::Message("search.result_limit must be at least 1".into()));
        }
        // The provider returns the nearest `result_limit` hits, so a limit at or
        // below the minimum refetches the same places on every wider attempt
        if search.result_limit <= search.min_results {
            return Err(ConfigError::Message(format!(
                "search.result_limit ({}) must exceed search.min_results ({})",
                search.result_limit, search.min_results
            )));
        }
        Ok(())
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            initial_radius_m: self.search.initial_radius_m,
            expansion_factor: self.search.expansion_factor,
            max_attempts: self.search.max_attempts,
            min_results: self.search.min_results,
            result_limit: self.search.result_limit,
            require_reference_for_text: self.search.require_reference_for_text,
        }
    }

    pub fn keyword_policy(&self) -> KeywordPolicy {
        match self.relevance.policy {
            PolicyKind::Include => KeywordPolicy::Include(self.relevance.include_keywords.clone()),
            PolicyKind::Exclude => KeywordPolicy::Exclude(self.relevance.exclude_keywords.clone()),
        }
    }
}

/// Apply shortcut environment overrides that don't follow the GEOPLACES__ scheme
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(endpoint) = env::var("WIKIPEDIA_API_URL") {
        builder = builder.set_override("wikipedia.endpoint", endpoint)?;
    }

    builder.build()
}
