use crate::Result;
use crate::facts::hosting::DEFAULT_API_URL;
use crate::metrics::{Limits, NetScore, UnavailablePolicy, Weights};
use camino::Utf8Path;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "repo-score.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the hosting API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Commit pages read for the bus factor
    #[serde(default = "default_max_commit_pages")]
    pub max_commit_pages: u32,

    /// Directory levels below the root visited by the ramp-up walk
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: u32,

    /// Directory listings requested by the ramp-up walk
    #[serde(default = "default_max_tree_listings")]
    pub max_tree_listings: u32,

    /// Deadline for each metric
    #[serde(default = "default_metric_timeout", with = "humantime_serde")]
    pub metric_timeout: Duration,

    /// Repositories scored at the same time
    #[serde(default = "default_max_concurrent_repos")]
    pub max_concurrent_repos: usize,

    /// What an unavailable metric does to the net score
    #[serde(default)]
    pub unavailable_policy: UnavailablePolicy,

    /// Relative metric weights
    #[serde(default)]
    pub weights: Weights,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_max_commit_pages() -> u32 {
    10
}

const fn default_max_tree_depth() -> u32 {
    3
}

const fn default_max_tree_listings() -> u32 {
    50
}

const fn default_metric_timeout() -> Duration {
    Duration::from_mins(2)
}

const fn default_max_concurrent_repos() -> usize {
    4
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `repo-score.toml` in `base_dir` is used when present.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading repo-score configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading repo-score configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    pub(super) fn validate(&self) -> Result<()> {
        let _ = url::Url::parse(&self.api_url).into_app_err_with(|| format!("api_url '{}' is not a valid URL", self.api_url))?;

        for (name, value) in [
            ("max_commit_pages", self.max_commit_pages),
            ("max_tree_depth", self.max_tree_depth),
            ("max_tree_listings", self.max_tree_listings),
        ] {
            if value == 0 {
                return Err(app_err!("{name} must be at least 1"));
            }
        }

        if self.max_concurrent_repos == 0 {
            return Err(app_err!("max_concurrent_repos must be at least 1"));
        }

        if self.metric_timeout.is_zero() {
            return Err(app_err!("metric_timeout must be greater than zero"));
        }

        self.weights.validate()
    }

    /// Work bounds applied to each repository
    #[must_use]
    pub const fn limits(&self) -> Limits {
        Limits {
            max_commit_pages: self.max_commit_pages,
            max_tree_depth: self.max_tree_depth,
            max_tree_listings: self.max_tree_listings,
            metric_timeout: self.metric_timeout,
        }
    }

    /// The net score aggregator described by this configuration
    pub fn net_score(&self) -> Result<NetScore> {
        NetScore::new(self.weights, self.unavailable_policy)
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
