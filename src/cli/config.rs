//! Layered configuration: command line, environment, config file, defaults

use crate::cli::args::GlobalArgs;
use crate::error::SwitchdlError;
use crate::platform::AccessToken;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "switchdl.toml";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Contents of a `switchdl.toml` file
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub overwrite: Option<bool>,
    pub skip: Option<bool>,
    pub select_variant: Option<bool>,
    token: Option<String>,
    /// Humantime duration, e.g. "45s"
    pub timeout: Option<String>,

    #[serde(skip)]
    source: Option<PathBuf>,
}

impl FileConfig {
    /// Locations searched for a config file, in order
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("switchdl").join("config.toml"));
        }
        paths
    }

    /// Load the first config file that exists, or an empty config
    pub fn load() -> Result<Self, SwitchdlError> {
        Self::load_first(&Self::candidate_paths())
    }

    pub fn load_first(paths: &[PathBuf]) -> Result<Self, SwitchdlError> {
        for path in paths {
            if path.is_file() {
                return Self::from_file(path);
            }
            debug!("No config file at {}", path.display());
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, SwitchdlError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: FileConfig =
            toml::from_str(&content).map_err(|e| SwitchdlError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.source = Some(path.to_path_buf());
        // Reject a bad duration at load time rather than at first use
        config.timeout_duration()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// File the config was read from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn timeout_duration(&self) -> Result<Option<Duration>, SwitchdlError> {
        let Some(raw) = &self.timeout else {
            return Ok(None);
        };
        humantime::parse_duration(raw)
            .map(Some)
            .map_err(|e| SwitchdlError::Config {
                path: self.source.clone().unwrap_or_default(),
                message: format!("invalid timeout '{}': {}", raw, e),
            })
    }
}

/// Effective settings after merging every layer
#[derive(Debug, Clone)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub overwrite: bool,
    pub skip: bool,
    pub select_variant: bool,
    pub token: Option<AccessToken>,
    pub timeout: Duration,
    pub no_progress: bool,
}

impl Settings {
    /// Merge `args` (flags and environment, via clap) over `file`.
    ///
    /// Boolean switches can only be turned on by a higher layer, except that
    /// `--overwrite` and `--skip` form one collision policy: setting either
    /// flag replaces the policy from the file.
    pub fn resolve(args: &GlobalArgs, file: &FileConfig) -> Result<Self, SwitchdlError> {
        let timeout = match args.timeout_duration() {
            Some(timeout) => timeout,
            None => file.timeout_duration()?.unwrap_or(DEFAULT_TIMEOUT),
        };

        let (overwrite, skip) = if args.overwrite || args.skip {
            (args.overwrite, args.skip)
        } else {
            (file.overwrite.unwrap_or(false), file.skip.unwrap_or(false))
        };

        let token = args
            .token
            .as_deref()
            .or(file.token.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(AccessToken::new);

        Ok(Self {
            output_dir: args
                .output_dir
                .clone()
                .or_else(|| file.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
            overwrite,
            skip,
            select_variant: args.select_variant || file.select_variant.unwrap_or(false),
            token,
            timeout,
            no_progress: args.no_progress,
        })
    }

    /// Explicit token for credential resolution
    pub fn explicit_token(&self) -> Option<&str> {
        self.token.as_ref().map(AccessToken::expose)
    }
}
