use crate::vault::{MAX_COST, MIN_COST};
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_DATABASE_PATH: &str = "./database.json";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "./public";
const DEFAULT_MAX_CONCURRENCY: usize = 512;

#[derive(Debug, Parser)]
#[command(name = "chirpy", version, about = "Chirpy social post service")]
pub struct Args {
    /// Start from an empty database, overwriting the snapshot file
    #[arg(long)]
    pub debug: bool,

    /// Snapshot file to load and persist to (overrides DATABASE_PATH)
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub polka_key: Option<String>,
    pub database_path: PathBuf,
    pub port: u16,
    pub bcrypt_cost: u32,
    pub static_dir: PathBuf,
    pub max_concurrency: usize,
}

impl Config {
    /// Reads configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let bcrypt_cost = parse(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            jwt_secret,
            polka_key: lookup("POLKA_KEY").filter(|s| !s.is_empty()),
            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            port: parse(&lookup, "PORT", DEFAULT_PORT)?,
            bcrypt_cost,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            max_concurrency: parse(&lookup, "MAX_CONCURRENCY", DEFAULT_MAX_CONCURRENCY)?,
        })
    }

    /// Command-line flags win over the environment.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(path) = &args.database {
            self.database_path = path.clone();
        }
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
