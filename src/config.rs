// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup (a `.env` file
//! is honoured in development) and then passed around as an immutable
//! [`Config`]. Nothing in the service reads the environment after startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `APP_ENV` | `development` or `production` (controls `Secure` cookies) | `production` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `ENCRYPTION_SECRET_KEY` | Secret the cookie key is derived from | Required |
//! | `ENCRYPTION_IV` | Secret the cookie binding value is derived from | Required |
//! | `TOKEN_VALIDATION_URL` | Bearer token validation endpoint | Required |
//! | `TOKEN_PHONE_FIELD` | JSON field holding the phone number | `phoneNumber` |
//! | `GET_ACCOUNTS_URL` / `_USER` / `_PASS` | Account lookup (Basic auth) | Optional |
//! | `CARD_LIST_URL` | Card list endpoint | Optional |
//! | `CARD_LIST_API_KEY` | `ApiKey` header for card APIs | Optional |
//! | `CARD_LIST_ID_MSG` | `header.idmsg` for card APIs | Optional |
//! | `CARD_LIST_INSTITUTION` | Institution filter for card list | Optional |
//! | `GET_TRANSACTIONS_URL` | Transaction history endpoint | Optional |
//! | `CARD_LIMITS_URL` | Card limits endpoint | Optional |
//! | `LIMIT_UPDATE_URL` | Limit update endpoint | Optional |
//! | `PIN_CHANGE_URL` | PIN change endpoint | Optional |
//! | `BANK_CODE` | Bank code sent with limit calls | Optional |
//! | `REQUEST_TIMEOUT_SECS` | Timeout for every outbound call | `10` |
//! | `CARDS_POINTER` / `TRANSACTIONS_POINTER` / `LIMITS_POINTER` | Comma-separated JSON pointers overriding the response contract | Built-in |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; enables HTTPS when both set | Unset |
//!
//! Optional banking variables are checked when the corresponding call is
//! made; a missing one surfaces as a configuration error in the view-model
//! instead of failing startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::banking::ResponseContract;

/// Default timeout applied to every outbound HTTP call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default JSON field of the validation response holding the phone number.
pub const DEFAULT_PHONE_FIELD: &str = "phoneNumber";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("{name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// The two secrets the session cipher is derived from.
#[derive(Clone)]
pub struct SessionSecrets {
    pub secret_key: String,
    pub iv_secret: String,
}

impl std::fmt::Debug for SessionSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSecrets")
            .field("secret_key", &"<redacted>")
            .field("iv_secret", &"<redacted>")
            .finish()
    }
}

/// External token validation endpoint.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub url: Url,
    pub phone_field: String,
}

/// Basic-auth credentials for the accounts endpoint.
#[derive(Clone)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Downstream banking endpoints and their shared request parameters.
#[derive(Debug, Clone, Default)]
pub struct BankingConfig {
    pub accounts_url: Option<Url>,
    pub accounts_credentials: Option<BasicCredentials>,
    pub card_list_url: Option<Url>,
    pub api_key: Option<String>,
    pub id_msg: Option<String>,
    pub institution: Option<String>,
    pub transactions_url: Option<Url>,
    pub limits_url: Option<Url>,
    pub limit_update_url: Option<Url>,
    pub pin_change_url: Option<Url>,
    pub bank_code: Option<String>,
    pub contract: ResponseContract,
}

/// PEM certificate and key for HTTPS.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Immutable service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub session: SessionSecrets,
    pub validator: ValidatorConfig,
    pub banking: BankingConfig,
    pub request_timeout: Duration,
    pub tls: Option<TlsConfig>,
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let port = match env.optional("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw,
            })?,
            None => 8080,
        };

        let environment = match env.optional("APP_ENV").as_deref() {
            None => Environment::Production,
            Some(v) if v.eq_ignore_ascii_case("development") || v.eq_ignore_ascii_case("dev") => {
                Environment::Development
            }
            Some(v) if v.eq_ignore_ascii_case("production") || v.eq_ignore_ascii_case("prod") => {
                Environment::Production
            }
            Some(v) => {
                return Err(ConfigError::InvalidValue {
                    name: "APP_ENV",
                    value: v.to_string(),
                })
            }
        };

        let log_format = match env.optional("LOG_FORMAT").as_deref() {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let request_timeout = match env.optional("REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "REQUEST_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let session = SessionSecrets {
            secret_key: env.required("ENCRYPTION_SECRET_KEY")?,
            iv_secret: env.required("ENCRYPTION_IV")?,
        };

        let validator = ValidatorConfig {
            url: env.required_url("TOKEN_VALIDATION_URL")?,
            phone_field: env
                .optional("TOKEN_PHONE_FIELD")
                .unwrap_or_else(|| DEFAULT_PHONE_FIELD.to_string()),
        };

        let accounts_credentials = match (
            env.optional("GET_ACCOUNTS_USER"),
            env.optional("GET_ACCOUNTS_PASS"),
        ) {
            (Some(username), Some(password)) => Some(BasicCredentials { username, password }),
            _ => None,
        };

        let mut contract = ResponseContract::default();
        if let Some(pointers) = env.optional("CARDS_POINTER") {
            contract = contract.with_cards(split_pointers(&pointers));
        }
        if let Some(pointers) = env.optional("TRANSACTIONS_POINTER") {
            contract = contract.with_transactions(split_pointers(&pointers));
        }
        if let Some(pointers) = env.optional("LIMITS_POINTER") {
            contract = contract.with_limits(split_pointers(&pointers));
        }

        let banking = BankingConfig {
            accounts_url: env.optional_url("GET_ACCOUNTS_URL")?,
            accounts_credentials,
            card_list_url: env.optional_url("CARD_LIST_URL")?,
            api_key: env.optional("CARD_LIST_API_KEY"),
            id_msg: env.optional("CARD_LIST_ID_MSG"),
            institution: env.optional("CARD_LIST_INSTITUTION"),
            transactions_url: env.optional_url("GET_TRANSACTIONS_URL")?,
            limits_url: env.optional_url("CARD_LIMITS_URL")?,
            limit_update_url: env.optional_url("LIMIT_UPDATE_URL")?,
            pin_change_url: env.optional_url("PIN_CHANGE_URL")?,
            bank_code: env.optional("BANK_CODE"),
            contract,
        };

        let tls = match (env.optional("TLS_CERT_PATH"), env.optional("TLS_KEY_PATH")) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            _ => None,
        };

        Ok(Self {
            host: env
                .optional("HOST")
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            environment,
            log_format,
            session,
            validator,
            banking,
            request_timeout,
            tls,
        })
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidValue {
            name: "HOST",
            value: raw,
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn required_url(&self, name: &'static str) -> Result<Url, ConfigError> {
        let raw = self.required(name)?;
        parse_url(name, &raw)
    }

    fn optional_url(&self, name: &'static str) -> Result<Option<Url>, ConfigError> {
        self.optional(name)
            .map(|raw| parse_url(name, &raw))
            .transpose()
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

fn split_pointers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("ENCRYPTION_SECRET_KEY", "key-secret"),
        ("ENCRYPTION_IV", "iv-secret"),
        ("TOKEN_VALIDATION_URL", "http://validator.local/api/Authenticate/Validate"),
    ];

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_lookup(lookup(MINIMAL)).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.validator.phone_field, "phoneNumber");
        assert!(config.banking.card_list_url.is_none());
        assert!(config.tls.is_none());
    }

    #[test]
    fn missing_secret_is_reported() {
        let err = Config::from_lookup(lookup(&[(
            "TOKEN_VALIDATION_URL",
            "http://validator.local/validate",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ENCRYPTION_SECRET_KEY")));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut vars = MINIMAL.to_vec();
        vars[1] = ("ENCRYPTION_IV", "   ");
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ENCRYPTION_IV")));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("CARD_LIST_URL", "ftp://cards.local/list"));
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                name: "CARD_LIST_URL",
                ..
            }
        ));
    }

    #[test]
    fn development_environment_and_overrides() {
        let mut vars = MINIMAL.to_vec();
        vars.extend([
            ("APP_ENV", "development"),
            ("PORT", "9090"),
            ("LOG_FORMAT", "JSON"),
            ("REQUEST_TIMEOUT_SECS", "3"),
            ("GET_ACCOUNTS_USER", "svc"),
            ("GET_ACCOUNTS_PASS", "pw"),
            ("CARDS_POINTER", "/data/cards, /cards"),
            ("LIMITS_POINTER", "/data/limits"),
        ]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert!(config.environment.is_development());
        assert_eq!(config.port, 9090);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(
            config.banking.accounts_credentials.unwrap().username,
            "svc"
        );
        assert_eq!(
            config.banking.contract,
            ResponseContract::default()
                .with_cards(vec!["/data/cards".to_string(), "/cards".to_string()])
                .with_limits(vec!["/data/limits".to_string()])
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("REQUEST_TIMEOUT_SECS", "0"));
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let config = Config::from_lookup(lookup(MINIMAL)).unwrap();
        let rendered = format!("{:?}", config.session);
        assert!(!rendered.contains("key-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
