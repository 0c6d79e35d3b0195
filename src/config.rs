use crate::domain::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// The credit-marketplace program this crate reads.
pub const CREDIX_PROGRAM_ID: &str = "CRDx2YkdtYtGZXGHZ59wNv1EwKHQndnRc1gT4p8i2vPX";

/// Seed string of the fintech pool.
pub const MARKET_SEED_FINTECH: &str = "credix-marketplace";

/// Seed string of the receivables-factoring pool.
pub const MARKET_SEED_RECEIVABLES: &str = "receivables-factoring";

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub program_id: Pubkey,
    pub market_seeds: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let rpc_url = env_map
            .get("RPC_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("RPC_URL".to_string()))?;

        let program_id = env_map
            .get("PROGRAM_ID")
            .map(|s| s.as_str())
            .unwrap_or(CREDIX_PROGRAM_ID);
        let program_id = Pubkey::from_str(program_id).map_err(|e| {
            ConfigError::InvalidValue("PROGRAM_ID".to_string(), e.to_string())
        })?;

        let market_seeds = parse_market_seeds_from_map(&env_map)?;

        Ok(Config {
            rpc_url,
            program_id,
            market_seeds,
        })
    }
}

fn parse_market_seeds_from_map(
    env_map: &HashMap<String, String>,
) -> Result<Vec<String>, ConfigError> {
    let seeds: Vec<String> = match env_map.get("MARKET_SEEDS") {
        Some(seeds_str) => seeds_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => vec![
            MARKET_SEED_FINTECH.to_string(),
            MARKET_SEED_RECEIVABLES.to_string(),
        ],
    };
    if seeds.is_empty() {
        return Err(ConfigError::InvalidValue(
            "MARKET_SEEDS".to_string(),
            "must name at least one market".to_string(),
        ));
    }
    Ok(seeds)
}
