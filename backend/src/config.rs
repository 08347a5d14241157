use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

/// Runtime settings, read from the environment (and `.env`) at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub model_path: PathBuf,
    pub segments_dir: PathBuf,
    pub segment_extension: String,
    pub upload_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub poll_interval: Duration,
    pub frame_sample_stride: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            model_path: PathBuf::from("models/anomaly_classifier.pt"),
            segments_dir: PathBuf::from("videos/ipcam"),
            segment_extension: "ts".to_string(),
            upload_dir: PathBuf::from("uploads"),
            frontend_dir: default_frontend_dir(),
            poll_interval: Duration::from_secs(2),
            frame_sample_stride: 10,
        }
    }
}

fn default_frontend_dir() -> PathBuf {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        PathBuf::from(format!("{}/../frontend/dist", manifest_dir))
    } else {
        PathBuf::from("/usr/src/app/frontend/dist")
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(port) = lookup("PORT") {
            config.port = parse_number("PORT", &port)?;
        }
        if let Some(path) = lookup("MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("SEGMENTS_DIR") {
            config.segments_dir = PathBuf::from(dir);
        }
        if let Some(ext) = lookup("SEGMENT_EXTENSION") {
            config.segment_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(dir) = lookup("UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            config.frontend_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup("POLL_INTERVAL_SECS") {
            let secs: u64 = parse_number("POLL_INTERVAL_SECS", &secs)?;
            if secs == 0 {
                return Err(ConfigError::Zero {
                    name: "POLL_INTERVAL_SECS",
                });
            }
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(stride) = lookup("FRAME_SAMPLE_STRIDE") {
            config.frame_sample_stride = parse_number("FRAME_SAMPLE_STRIDE", &stride)?;
            if config.frame_sample_stride == 0 {
                return Err(ConfigError::Zero {
                    name: "FRAME_SAMPLE_STRIDE",
                });
            }
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}
