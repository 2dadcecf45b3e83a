use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::writer::SchemaVersion;

/// Options for the markdown-it instance that produced the tokens.
///
/// The converter never tokenizes, so these are only carried for callers
/// that drive a tokenizer from the same config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TokenizerOptions {
    /// Allow raw HTML in the source
    pub html: bool,
    /// Turn bare URLs into links
    pub linkify: bool,
    /// Smart quotes and dash replacement
    pub typographer: bool,
    /// Class prefix for fenced code languages
    pub lang_prefix: String,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            html: false,
            linkify: false,
            typographer: false,
            lang_prefix: "language-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub schema: SchemaVersion,
    /// Emit soft breaks as `LineBreak`
    pub breaks: bool,
    pub pretty: bool,
    pub tokenizer: TokenizerOptions,
}

#[derive(Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn schema(mut self, schema: SchemaVersion) -> Self {
        self.config.schema = schema;
        self
    }

    pub fn breaks(mut self, breaks: bool) -> Self {
        self.config.breaks = breaks;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    pub fn tokenizer(mut self, tokenizer: TokenizerOptions) -> Self {
        self.config.tokenizer = tokenizer;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

const CANDIDATE_NAMES: &[&str] = &[".pandoc-tree.toml", "pandoc-tree.toml"];

impl Config {
    /// Parse a TOML config file. Parse failures are `InvalidData` and name the file.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = toml::from_str(&text).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: {e}", path.display()),
            )
        })?;
        log::info!("Loaded config from: {}", path.display());
        Ok(config)
    }
}

/// Project config files from `start_dir` upwards, nearest first.
fn project_candidates(start_dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    start_dir
        .ancestors()
        .flat_map(|dir| CANDIDATE_NAMES.iter().map(move |name| dir.join(name)))
        .filter(|path| path.is_file())
}

fn user_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let p = Path::new(&xdg).join("pandoc-tree").join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    let p = dirs::config_dir()?.join("pandoc-tree").join("config.toml");
    p.is_file().then_some(p)
}

/// Load configuration with precedence:
/// 1) explicit path (error if unreadable/invalid)
/// 2) walk up from start_dir: .pandoc-tree.toml, pandoc-tree.toml
/// 3) $XDG_CONFIG_HOME/pandoc-tree/config.toml or the platform config dir
/// 4) default config
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((Config::from_file(path)?, Some(path.to_path_buf())));
    }

    // Only the nearest project file counts; a broken one falls through to the user config.
    let discovered = project_candidates(start_dir)
        .next()
        .into_iter()
        .chain(user_config_path());
    for path in discovered {
        match Config::from_file(&path) {
            Ok(cfg) => return Ok((cfg, Some(path))),
            Err(e) => log::debug!("Skipping config {}: {e}", path.display()),
        }
    }

    log::debug!("No config file found, using defaults");
    Ok((Config::default(), None))
}
