//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `FF1000_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{DEFAULT_LAMBDA, DEFAULT_MASK_VALUE, DEFAULT_SIGMA2, DEFAULT_Z};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `FF1000_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// JSON-lines catalog file. Required by the server binary.
    pub catalog_path: Option<PathBuf>,

    /// Expected embedding width. `None` accepts whatever the catalog carries.
    pub embedding_dim: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            catalog_path: None,
            embedding_dim: None,
        }
    }
}

impl Config {
    pub(crate) const ENV_PORT: &'static str = "FF1000_PORT";
    pub(crate) const ENV_BIND_ADDR: &'static str = "FF1000_BIND_ADDR";
    pub(crate) const ENV_CATALOG_PATH: &'static str = "FF1000_CATALOG_PATH";
    pub(crate) const ENV_EMBEDDING_DIM: &'static str = "FF1000_EMBEDDING_DIM";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let catalog_path = parse_optional_path_from_env(Self::ENV_CATALOG_PATH);
        let embedding_dim = parse_optional_from_env::<usize>(Self::ENV_EMBEDDING_DIM)?;

        Ok(Self {
            port,
            bind_addr,
            catalog_path,
            embedding_dim,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.catalog_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if self.embedding_dim == Some(0) {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_DIM,
                value: "0".to_string(),
                reason: "embedding dimension must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the catalog path or the error the server reports when it is unset.
    pub fn require_catalog_path(&self) -> Result<&PathBuf, ConfigError> {
        self.catalog_path
            .as_ref()
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_CATALOG_PATH,
            })
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }
}

/// Hyperparameters of [`BayesianPosteriorScorer`](crate::scoring::BayesianPosteriorScorer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BayesianConfig {
    /// Prior precision `λ`. Must be strictly positive.
    pub lambda: f64,

    /// Observation-noise variance `σ²`. Must be strictly positive.
    pub sigma2: f64,

    /// Confidence multiplier applied to the predictive standard deviation.
    pub z: f64,

    /// Score written at observed indices.
    pub mask_value: f64,
}

impl Default for BayesianConfig {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
            sigma2: DEFAULT_SIGMA2,
            z: DEFAULT_Z,
            mask_value: DEFAULT_MASK_VALUE,
        }
    }
}

impl BayesianConfig {
    const ENV_LAMBDA: &'static str = "FF1000_LAMBDA";
    const ENV_SIGMA2: &'static str = "FF1000_SIGMA2";
    const ENV_Z: &'static str = "FF1000_Z";

    pub fn new(lambda: f64, sigma2: f64, z: f64) -> Self {
        Self {
            lambda,
            sigma2,
            z,
            mask_value: DEFAULT_MASK_VALUE,
        }
    }

    pub fn with_mask_value(mut self, mask_value: f64) -> Self {
        self.mask_value = mask_value;
        self
    }

    /// First out-of-range hyperparameter as `(field, value, reason)`.
    pub fn invalid_parameter(&self) -> Option<(&'static str, f64, &'static str)> {
        if !(self.lambda.is_finite() && self.lambda > 0.0) {
            return Some(("lambda", self.lambda, "must be finite and strictly positive"));
        }
        if !(self.sigma2.is_finite() && self.sigma2 > 0.0) {
            return Some(("sigma2", self.sigma2, "must be finite and strictly positive"));
        }
        if !self.z.is_finite() {
            return Some(("z", self.z, "must be finite"));
        }
        if self.mask_value.is_nan() {
            return Some((
                "mask_value",
                self.mask_value,
                "NaN cannot be compared against scores",
            ));
        }
        None
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.invalid_parameter() {
            Some((field, value, reason)) => Err(ConfigError::InvalidValue {
                name: Self::env_name(field),
                value: value.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn env_name(field: &'static str) -> &'static str {
        match field {
            "lambda" => Self::ENV_LAMBDA,
            "sigma2" => Self::ENV_SIGMA2,
            "z" => Self::ENV_Z,
            other => other,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let lambda = parse_optional_from_env::<f64>(Self::ENV_LAMBDA)?.unwrap_or(defaults.lambda);
        let sigma2 = parse_optional_from_env::<f64>(Self::ENV_SIGMA2)?.unwrap_or(defaults.sigma2);
        let z = parse_optional_from_env::<f64>(Self::ENV_Z)?.unwrap_or(defaults.z);

        let config = Self {
            lambda,
            sigma2,
            z,
            mask_value: defaults.mask_value,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
    env::var(var_name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_optional_from_env<T>(var_name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                name: var_name,
                value: value.clone(),
                reason: e.to_string(),
            }),
        _ => Ok(None),
    }
}
