//! Export configuration.
//!
//! Settings are read from a TOML file (`gallery-export.toml` by default).
//! The file is sparse: whatever it sets is merged over the stock defaults,
//! and everything it leaves out keeps its default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Data source: either a database URL or a snapshot file is required.
//! # snapshot = "gallery.json"
//!
//! [database]
//! url = "postgres://matt@localhost/tv_fanart_gallery"
//! albums_query = "SELECT ... FROM gallery_albums"
//! art_query = "SELECT ... FROM gallery_art"
//!
//! [output]
//! json_dir = "."            # Where art.json and art_by_album.json go
//!
//! [site]
//! title = "Gallery"         # Home breadcrumb and page title prefix
//! html_dir = "html"         # Root of the generated site
//! art_dir = "art"           # Full-size images, relative to html_dir or absolute
//! thumbs_dir = "thumbs"     # Thumbnails, relative to html_dir or absolute
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"
//! border = "#e0e0e0"
//! link = "#333333"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! link = "#cccccc"
//!
//! [processing]
//! max_processes = 4         # Page-rendering threads (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "gallery-export.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error(
        "No data source configured: set database.url (or DATABASE_URL / --database-url) or snapshot (or --snapshot)"
    )]
    MissingSource,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// JSON snapshot to read instead of querying the database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
    pub database: DatabaseConfig,
    pub output: OutputConfig,
    pub site: SiteConfig,
    pub colors: ColorConfig,
    pub processing: ProcessingConfig,
}

/// Where records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Database(String),
    Snapshot(PathBuf),
}

impl ExportConfig {
    /// Validate values that the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.html_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "site.html_dir must not be empty".into(),
            ));
        }
        if self.database.albums_query.trim().is_empty() || self.database.art_query.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "database.albums_query and database.art_query must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The data source to load from. A snapshot wins over a database URL.
    pub fn source(&self) -> Result<SourceSpec, ConfigError> {
        if let Some(path) = &self.snapshot {
            return Ok(SourceSpec::Snapshot(path.clone()));
        }
        match self.database.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(SourceSpec::Database(url.to_string())),
            _ => Err(ConfigError::MissingSource),
        }
    }
}

/// Database connection and the queries producing the two record sets.
///
/// Each query must return exactly the columns of
/// [`AlbumRecord`](crate::types::AlbumRecord) / [`ArtRecord`](crate::types::ArtRecord),
/// with integer columns as `bigint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub albums_query: String,
    pub art_query: String,
}

pub const DEFAULT_ALBUMS_QUERY: &str = "SELECT id::bigint AS id, COALESCE(title, '') AS title, \
COALESCE(username, '') AS username, COALESCE(fullname, '') AS fullname, \
COALESCE(email, '') AS email, filename, parent_id::bigint AS parent_id \
FROM gallery_albums ORDER BY id";

pub const DEFAULT_ART_QUERY: &str = "SELECT id::bigint AS id, COALESCE(title, '') AS title, \
description, summary, COALESCE(username, '') AS username, \
COALESCE(fullname, '') AS fullname, COALESCE(email, '') AS email, filename, \
COALESCE(mimetype, '') AS mimetype, COALESCE(filesize, 0)::bigint AS filesize, \
parent_id::bigint AS parent_id FROM gallery_items ORDER BY id";

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            albums_query: DEFAULT_ALBUMS_QUERY.to_string(),
            art_query: DEFAULT_ART_QUERY.to_string(),
        }
    }
}

/// JSON document output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub json_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_dir: PathBuf::from("."),
        }
    }
}

/// Static site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Label of the home breadcrumb and prefix of every page title.
    pub title: String,
    /// Root directory of the generated pages.
    pub html_dir: PathBuf,
    /// URL root of full-size images.
    pub art_dir: String,
    /// URL root of thumbnails.
    pub thumbs_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            html_dir: PathBuf::from("html"),
            art_dir: "art".to_string(),
            thumbs_dir: "thumbs".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Breadcrumbs, submitter lines, captions.
    pub text_muted: String,
    pub border: String,
    pub link: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#333333".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#cccccc".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

/// Parallel page rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of rendering threads. When absent, defaults to the
    /// number of CPU cores. Values larger than the core count are clamped.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// The stock defaults as a TOML table, the base layer for user overrides.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ExportConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, deserialize, validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ExportConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ExportConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration.
///
/// With `explicit == Some(path)` the file must exist. Otherwise
/// [`DEFAULT_CONFIG_FILE`] is read if present and stock defaults are used
/// if not.
pub fn load_config(explicit: Option<&Path>) -> Result<ExportConfig, ConfigError> {
    let path = explicit.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    if !path.exists() {
        if explicit.is_some() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return resolve_config(None);
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: toml::Value = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    resolve_config(Some(value))
}

/// A fully-commented stock config file, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# gallery-export configuration
# ============================
# All settings are optional except a data source. Values shown are the
# defaults. Unknown keys cause an error.

# Read records from a JSON snapshot (written by `gallery-export dump`)
# instead of the database. Takes precedence over database.url.
# snapshot = "gallery.json"

# ---------------------------------------------------------------------------
# Database
# ---------------------------------------------------------------------------
[database]
# Connection URL. Can also be given with DATABASE_URL or --database-url.
# url = "postgres://matt@localhost/tv_fanart_gallery"

# Queries producing the album and art record sets. Integer columns must be
# returned as bigint; owner columns must not be NULL.
albums_query = "SELECT id::bigint AS id, COALESCE(title, '') AS title, COALESCE(username, '') AS username, COALESCE(fullname, '') AS fullname, COALESCE(email, '') AS email, filename, parent_id::bigint AS parent_id FROM gallery_albums ORDER BY id"
art_query = "SELECT id::bigint AS id, COALESCE(title, '') AS title, description, summary, COALESCE(username, '') AS username, COALESCE(fullname, '') AS fullname, COALESCE(email, '') AS email, filename, COALESCE(mimetype, '') AS mimetype, COALESCE(filesize, 0)::bigint AS filesize, parent_id::bigint AS parent_id FROM gallery_items ORDER BY id"

# ---------------------------------------------------------------------------
# JSON documents
# ---------------------------------------------------------------------------
[output]
# Directory receiving art.json and art_by_album.json.
json_dir = "."

# ---------------------------------------------------------------------------
# Static site
# ---------------------------------------------------------------------------
[site]
# Home breadcrumb label and page title prefix.
title = "Gallery"

# Root directory of the generated pages.
html_dir = "html"

# URL roots of full-size images and thumbnails. Relative roots are
# resolved against html_dir; absolute ones ("/art", "https://...") are
# used as given. The asset files themselves are copied separately.
art_dir = "art"
thumbs_dir = "thumbs"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"    # Breadcrumbs, submitter lines
border = "#e0e0e0"
link = "#333333"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#cccccc"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum page-rendering threads.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
    )
}
