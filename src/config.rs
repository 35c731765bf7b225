use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::{
    animation::{
        driver::AnimateThreading,
        spec::{AnimationSpec, ZoomRange},
    },
    foundation::error::StillResult,
};

pub const DEFAULT_CONFIG_FILE: &str = "stillmotion.toml";
pub const ENV_PREFIX: &str = "STILLMOTION_";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub animation: AnimationConfig,
    pub storage: StorageConfig,
    pub image_source: ImageSourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Single allowed CORS origin; any origin when unset.
    pub cors_origin: Option<String>,
    /// Upper bound for one generate request, in seconds.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub duration_secs: f64,
    pub fps: u32,
    pub zoom_start: f64,
    pub zoom_end: f64,
    pub parallel: bool,
    pub threads: Option<usize>,
    pub chunk_size: usize,
}

impl AnimationConfig {
    pub fn to_spec(&self) -> StillResult<AnimationSpec> {
        AnimationSpec::new(
            self.duration_secs,
            self.fps,
            ZoomRange::new(self.zoom_start, self.zoom_end)?,
        )
    }

    pub fn threading(&self) -> AnimateThreading {
        AnimateThreading {
            parallel: self.parallel,
            chunk_size: self.chunk_size,
            threads: self.threads,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where per-request video artifacts are written before being read back and deleted.
    pub scratch_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Sidecar text-to-image inference server.
    #[serde(rename = "http")]
    Http,
    /// One fixed still read from disk.
    #[serde(rename = "file")]
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSourceConfig {
    pub kind: SourceKind,
    pub endpoint: String,
    pub health_url: Option<String>,
    pub model: String,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub timeout_secs: u64,
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                cors_origin: None,
                request_timeout_secs: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            animation: AnimationConfig {
                duration_secs: AnimationSpec::DEFAULT_DURATION_SECS,
                fps: AnimationSpec::DEFAULT_FPS,
                zoom_start: ZoomRange::default().start,
                zoom_end: ZoomRange::default().end,
                parallel: false,
                threads: None,
                chunk_size: 32,
            },
            storage: StorageConfig {
                scratch_dir: std::env::temp_dir().join("generated_videos_temp"),
            },
            image_source: ImageSourceConfig {
                kind: SourceKind::Http,
                endpoint: "http://127.0.0.1:7860/generate".to_string(),
                health_url: None,
                model: "stabilityai/sd-turbo".to_string(),
                num_inference_steps: 2,
                guidance_scale: 0.0,
                timeout_secs: 120,
                path: None,
            },
        }
    }
}

impl Config {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port must be non-zero"));
        }

        if let Some(0) = self.server.request_timeout_secs {
            return Err(ConfigError::invalid(
                "server.request_timeout_secs must be >= 1 when set",
            ));
        }

        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            return Err(ConfigError::invalid(format!(
                "logging.level '{}' is not a valid filter",
                self.logging.level
            )));
        }

        self.animation
            .to_spec()
            .map_err(|e| ConfigError::invalid(format!("animation: {e}")))?;

        if let Some(0) = self.animation.threads {
            return Err(ConfigError::invalid(
                "animation.threads must be >= 1 when set",
            ));
        }

        if self.storage.scratch_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("storage.scratch_dir must be set"));
        }

        let source = &self.image_source;
        match source.kind {
            SourceKind::Http => {
                let is_http = source.endpoint.starts_with("http://")
                    || source.endpoint.starts_with("https://");
                if !is_http {
                    return Err(ConfigError::invalid(format!(
                        "image_source.endpoint '{}' must be an http(s) URL",
                        source.endpoint
                    )));
                }
                if source.num_inference_steps == 0 {
                    return Err(ConfigError::invalid(
                        "image_source.num_inference_steps must be >= 1",
                    ));
                }
                if source.timeout_secs == 0 {
                    return Err(ConfigError::invalid(
                        "image_source.timeout_secs must be >= 1",
                    ));
                }
            }
            SourceKind::File => {
                if source.path.is_none() {
                    return Err(ConfigError::invalid(
                        "image_source.path is required when kind = \"file\"",
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Layer defaults, an optional TOML/JSON file, then `STILLMOTION_*` environment variables
/// (`__` separates nested keys, e.g. `STILLMOTION_SERVER__PORT=9000`).
///
/// With `path = None` the default file `stillmotion.toml` (and `stillmotion.json`) is used
/// when present.
pub fn load_config(path: Option<&Path>) -> ConfigResult<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    match path {
        Some(p) if !p.exists() => {
            return Err(ConfigError::invalid(format!(
                "config file '{}' does not exist",
                p.display()
            )));
        }
        Some(p) if p.extension().is_some_and(|e| e == "json") => {
            figment = figment.merge(Json::file(p));
        }
        Some(p) => {
            figment = figment.merge(Toml::file(p));
        }
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
            }
            if Path::new("stillmotion.json").exists() {
                figment = figment.merge(Json::file("stillmotion.json"));
            }
        }
    }

    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
