use std::net::IpAddr;
use std::time::Duration;

use crate::gate::{DEFAULT_REDIRECT_TO, GateOptions};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub gate: GateOptions,
    pub session_cookie: String,
    /// Sessions idle for longer than this are dropped.
    pub session_ttl: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from any variable source; unset keys take defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let host: IpAddr = env_or("LOGIN_GATE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid LOGIN_GATE_HOST: {e}"))?;

        let port: u16 = env_or("LOGIN_GATE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid LOGIN_GATE_PORT: {e}"))?;

        let redirect_to = env_or("LOGIN_GATE_REDIRECT_TO", DEFAULT_REDIRECT_TO);
        let set_return_to = parse_bool(
            "LOGIN_GATE_SET_RETURN_TO",
            &env_or("LOGIN_GATE_SET_RETURN_TO", "true"),
        )?;

        let session_cookie = env_or("LOGIN_GATE_SESSION_COOKIE", "sid");
        if session_cookie.is_empty() {
            return Err("LOGIN_GATE_SESSION_COOKIE must not be empty".to_string());
        }

        let session_ttl: u64 = env_or("LOGIN_GATE_SESSION_TTL_SECS", "86400")
            .parse()
            .map_err(|e| format!("Invalid LOGIN_GATE_SESSION_TTL_SECS: {e}"))?;

        let log_level = env_or("LOGIN_GATE_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            gate: GateOptions::default()
                .with_redirect_to(redirect_to)
                .with_set_return_to(set_return_to),
            session_cookie,
            session_ttl: Duration::from_secs(session_ttl),
            log_level,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(format!("Invalid {key}: expected true or false, got '{other}'")),
    }
}
