use std::path::PathBuf;

use anyhow::Context;
use axum::http::HeaderValue;

/// How signup stores passwords and what login hands back as a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Plaintext passwords and `ignisshield::<email>::<ts>` tokens.
    Legacy,
    /// Argon2 password hashes and signed JWTs.
    Secure,
}

impl std::str::FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(AuthMode::Legacy),
            "secure" => Ok(AuthMode::Secure),
            other => anyhow::bail!("unknown AUTH_MODE {other:?}, expected legacy or secure"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub frontend_origin: HeaderValue,
    pub auth_mode: AuthMode,
    pub jwt: Option<JwtConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = std::env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse::<u16>()
            .context("APP_PORT")?;
        let frontend_origin = std::env::var("FRONTEND_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .parse::<HeaderValue>()
            .context("FRONTEND_ORIGIN")?;
        let auth_mode = std::env::var("AUTH_MODE")
            .unwrap_or_else(|_| "legacy".into())
            .parse::<AuthMode>()?;

        let jwt = match auth_mode {
            AuthMode::Legacy => None,
            AuthMode::Secure => Some(JwtConfig {
                secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required in secure mode")?,
                issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "ignisshield".into()),
                audience: std::env::var("JWT_AUDIENCE")
                    .unwrap_or_else(|_| "ignisshield-users".into()),
            }),
        };

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            frontend_origin,
            auth_mode,
            jwt,
        })
    }
}
