// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`Config`] struct loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `DATA_DIR` | Directory holding the document database | `./data` |
//! | `JWT_SECRET` | HMAC secret for signing bearer tokens | Required |
//! | `EXPIRES_IN` | Token lifetime (`3600`, `30m`, `12h`, `1d`, `2w`), at most ten years | `1d` |
//! | `CLOUD_NAME` | Media host cloud name | Optional |
//! | `API_KEY` | Media host API key | Optional |
//! | `API_SECRET` | Media host API secret | Optional |
//! | `CLOUDINARY_BASE_URL` | Media host API base URL | `https://api.cloudinary.com` |
//! | `UPLOAD_FOLDER` | Folder uploaded images land in | `weblearn` |
//! | `CORS_ORIGINS` | Comma-separated allowed origins | Permissive |
//! | `TLS_CERT_PATH` | PEM certificate chain for HTTPS | Optional |
//! | `TLS_KEY_PATH` | PEM private key for HTTPS | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! Upload is disabled unless all three media credentials are present.
//!
//! A unitless `EXPIRES_IN` is a number of seconds, not milliseconds; use a
//! unit suffix when migrating a value written in milliseconds.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::providers::cloudinary::CloudinaryConfig;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory path.
///
/// # Default
/// `./data`
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token signing secret.
///
/// There is no default: the server refuses to start without it.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const EXPIRES_IN_ENV: &str = "EXPIRES_IN";

pub const CLOUD_NAME_ENV: &str = "CLOUD_NAME";
pub const API_KEY_ENV: &str = "API_KEY";
pub const API_SECRET_ENV: &str = "API_SECRET";
pub const CLOUDINARY_BASE_URL_ENV: &str = "CLOUDINARY_BASE_URL";
pub const UPLOAD_FOLDER_ENV: &str = "UPLOAD_FOLDER";

pub const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_EXPIRES_IN: &str = "1d";

/// Longest accepted token lifetime (ten years).
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);
pub const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com";
pub const DEFAULT_UPLOAD_FOLDER: &str = "weblearn";

/// Default `RUST_LOG` filter when the variable is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{0} and {1} must be set together")]
    Incomplete(&'static str, &'static str),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// PEM files for serving HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Fully resolved server configuration.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub media: Option<CloudinaryConfig>,
    /// Empty means any origin is allowed.
    pub cors_origins: Vec<String>,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("media", &self.media)
            .field("cors_origins", &self.cors_origins)
            .field("tls", &self.tls)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let data_dir = PathBuf::from(get(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));

        let jwt_secret = get(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let expires_in = get(EXPIRES_IN_ENV).unwrap_or_else(|| DEFAULT_EXPIRES_IN.to_string());
        let token_ttl = parse_duration(&expires_in).ok_or(ConfigError::Invalid {
            name: EXPIRES_IN_ENV,
            value: expires_in.clone(),
        })?;

        let media = match (get(CLOUD_NAME_ENV), get(API_KEY_ENV), get(API_SECRET_ENV)) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => {
                let base_url = get(CLOUDINARY_BASE_URL_ENV)
                    .unwrap_or_else(|| DEFAULT_CLOUDINARY_BASE_URL.to_string());
                if Url::parse(&base_url).is_err() {
                    return Err(ConfigError::Invalid {
                        name: CLOUDINARY_BASE_URL_ENV,
                        value: base_url,
                    });
                }
                Some(CloudinaryConfig {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    cloud_name,
                    api_key,
                    api_secret,
                    folder: get(UPLOAD_FOLDER_ENV)
                        .unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.to_string()),
                })
            }
            _ => None,
        };

        let cors_origins = get(CORS_ORIGINS_ENV)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::Incomplete(TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV)),
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            data_dir,
            jwt_secret,
            token_ttl,
            media,
            cors_origins,
            tls,
            log_format,
        })
    }

    /// `host:port` string for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a token lifetime such as `3600`, `45s`, `30m`, `12h`, `1d` or `2w`.
///
/// A bare number is read as seconds. Returns `None` for anything else,
/// including a zero lifetime or one longer than [`MAX_TOKEN_TTL`].
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit_secs) = match raw.char_indices().last()? {
        (i, 's') => (&raw[..i], 1),
        (i, 'm') => (&raw[..i], 60),
        (i, 'h') => (&raw[..i], 60 * 60),
        (i, 'd') => (&raw[..i], 24 * 60 * 60),
        (i, 'w') => (&raw[..i], 7 * 24 * 60 * 60),
        _ => (raw, 1),
    };

    let count: u64 = digits.parse().ok()?;
    let secs = count.checked_mul(unit_secs)?;
    let ttl = Duration::from_secs(secs);
    (secs > 0 && ttl <= MAX_TOKEN_TTL).then_some(ttl)
}
