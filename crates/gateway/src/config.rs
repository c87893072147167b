//! Gateway configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CHAIN_RPC_URL` - JSON-RPC endpoint of the chain node
//! - `STOREFRONT_CONTRACT_ADDRESS` - Address of the deployed storefront contract
//! - `SIGNER_PRIVATE_KEY` - Hex-encoded private key of the gateway account
//!
//! ## Optional
//! - `GATEWAY_HOST` - Bind address (default: 127.0.0.1)
//! - `GATEWAY_PORT` - Listen port (default: 3000)
//! - `CHAIN_ID` - Chain identifier used when signing (default: 97)
//! - `CONTRACT_INTERFACE_VERSION` - Contract call interface (default: 1)
//! - `GAS_LIMIT_POLICY` - `fixed` or `estimate` (default: fixed)
//! - `GAS_LIMIT` - Fixed gas limit (default: 200000)
//! - `GAS_ESTIMATE_BUFFER_PERCENT` - Head-room added to estimates (default: 20)
//! - `GAS_ESTIMATE_FALLBACK` - Limit used when estimation fails (default: unset, errors propagate)
//! - `GAS_PRICE_POLICY` - `fixed` or `network` (default: fixed)
//! - `GAS_PRICE_GWEI` - Fixed gas price in gwei (default: 5)
//! - `GAS_PRICE_PREMIUM_PERCENT` - Premium over the network price (default: 0)
//! - `RECEIPT_POLL_INTERVAL_MS` - First receipt poll delay (default: 1000)
//! - `RECEIPT_POLL_MAX_INTERVAL_MS` - Backoff cap (default: 8000)
//! - `RECEIPT_TIMEOUT_SECS` - Confirmation wait budget (default: 120)
//! - `RECEIPT_MAX_ATTEMPTS` - Confirmation attempt budget (default: 60)
//! - `RECEIPT_MAX_TRANSIENT_ERRORS` - Transport errors tolerated while polling (default: 3)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use storechain_core::TokenAmount;

use crate::chain::{
    ConfirmationPolicy, GasLimitPolicy, GasPolicy, GasPricePolicy, InterfaceVersion,
    PipelineOptions,
};

const PRIVATE_KEY_HEX_LENGTH: usize = 64;
const MIN_KEY_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Chain connection settings.
///
/// Implements `Debug` manually since RPC URLs often embed API keys.
#[derive(Clone)]
pub struct ChainConfig {
    pub rpc_url: Url,
    pub chain_id: u64,
    pub contract_address: Address,
    pub interface_version: InterfaceVersion,
}

impl std::fmt::Debug for ChainConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainConfig")
            .field("rpc_host", &self.rpc_url.host_str())
            .field("chain_id", &self.chain_id)
            .field("contract_address", &self.contract_address)
            .field("interface_version", &self.interface_version)
            .finish()
    }
}

/// Gateway application configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    pub chain: ChainConfig,
    /// Private key of the signing account
    pub signer_key: SecretString,
    pub gas: GasPolicy,
    pub confirmation: ConfirmationPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the signing key fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// As [`GatewayConfig::from_env`].
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars: &Lookup<'_> = &lookup;

        let host = get_parsed(vars, "GATEWAY_HOST", "127.0.0.1")?;
        let port = get_parsed(vars, "GATEWAY_PORT", "3000")?;

        let chain = ChainConfig::from_vars(vars)?;
        let signer_key = get_signer_key(vars, "SIGNER_PRIVATE_KEY")?;
        let gas = gas_policy(vars)?;
        let confirmation = confirmation_policy(vars)?;

        Ok(Self {
            host,
            port,
            chain,
            signer_key,
            gas,
            confirmation,
            sentry_dsn: get_optional_env(vars, "SENTRY_DSN"),
            sentry_environment: get_optional_env(vars, "SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_parsed(vars, "SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: get_parsed(vars, "SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Settings for the write pipeline.
    #[must_use]
    pub const fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            chain_id: self.chain.chain_id,
            contract: self.chain.contract_address,
            interface_version: self.chain.interface_version,
            gas: self.gas,
            confirmation: self.confirmation,
        }
    }
}

/// The subset of gateway settings needed to act as the signing account
/// without serving HTTP. Used by tooling that runs before a contract exists.
#[derive(Clone)]
pub struct AccountConfig {
    pub rpc_url: Url,
    pub chain_id: u64,
    pub signer_key: SecretString,
    pub gas: GasPolicy,
    pub confirmation: ConfirmationPolicy,
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("rpc_host", &self.rpc_url.host_str())
            .field("chain_id", &self.chain_id)
            .field("gas", &self.gas)
            .finish_non_exhaustive()
    }
}

impl AccountConfig {
    /// Load from the same environment variables as [`GatewayConfig`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// # Errors
    ///
    /// As [`AccountConfig::from_env`].
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars: &Lookup<'_> = &lookup;
        Ok(Self {
            rpc_url: get_required_parsed(vars, "CHAIN_RPC_URL")?,
            chain_id: get_parsed(vars, "CHAIN_ID", "97")?,
            signer_key: get_signer_key(vars, "SIGNER_PRIVATE_KEY")?,
            gas: gas_policy(vars)?,
            confirmation: confirmation_policy(vars)?,
        })
    }

    /// Pipeline settings targeting `contract`.
    #[must_use]
    pub const fn pipeline_options(&self, contract: Address) -> PipelineOptions {
        PipelineOptions {
            chain_id: self.chain_id,
            contract,
            interface_version: InterfaceVersion::V1,
            gas: self.gas,
            confirmation: self.confirmation,
        }
    }
}

impl ChainConfig {
    fn from_vars(vars: &Lookup<'_>) -> Result<Self, ConfigError> {
        let version: u32 = get_parsed(vars, "CONTRACT_INTERFACE_VERSION", "1")?;
        let interface_version = InterfaceVersion::from_number(version).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "CONTRACT_INTERFACE_VERSION".to_string(),
                format!("unsupported interface version {version}"),
            )
        })?;

        Ok(Self {
            rpc_url: get_required_parsed(vars, "CHAIN_RPC_URL")?,
            chain_id: get_parsed(vars, "CHAIN_ID", "97")?,
            contract_address: get_required_parsed(vars, "STOREFRONT_CONTRACT_ADDRESS")?,
            interface_version,
        })
    }
}

fn gas_policy(vars: &Lookup<'_>) -> Result<GasPolicy, ConfigError> {
    let limit = match get_env_or_default(vars, "GAS_LIMIT_POLICY", "fixed").as_str() {
        "fixed" => GasLimitPolicy::Fixed(get_parsed(vars, "GAS_LIMIT", "200000")?),
        "estimate" => GasLimitPolicy::Estimate {
            buffer_percent: get_parsed(vars, "GAS_ESTIMATE_BUFFER_PERCENT", "20")?,
            fallback: get_optional_parsed(vars, "GAS_ESTIMATE_FALLBACK")?,
        },
        other => {
            return Err(ConfigError::InvalidEnvVar(
                "GAS_LIMIT_POLICY".to_string(),
                format!("expected `fixed` or `estimate`, got `{other}`"),
            ));
        }
    };

    let price = match get_env_or_default(vars, "GAS_PRICE_POLICY", "fixed").as_str() {
        "fixed" => {
            let gwei = get_env_or_default(vars, "GAS_PRICE_GWEI", "5");
            let wei = TokenAmount::from_gwei_str(&gwei).map_err(|e| {
                ConfigError::InvalidEnvVar("GAS_PRICE_GWEI".to_string(), e.to_string())
            })?;
            GasPricePolicy::Fixed(wei)
        }
        "network" => GasPricePolicy::Network {
            premium_percent: get_parsed(vars, "GAS_PRICE_PREMIUM_PERCENT", "0")?,
        },
        other => {
            return Err(ConfigError::InvalidEnvVar(
                "GAS_PRICE_POLICY".to_string(),
                format!("expected `fixed` or `network`, got `{other}`"),
            ));
        }
    };

    Ok(GasPolicy { limit, price })
}

fn confirmation_policy(vars: &Lookup<'_>) -> Result<ConfirmationPolicy, ConfigError> {
    let policy = ConfirmationPolicy {
        initial_interval: Duration::from_millis(get_parsed(
            vars,
            "RECEIPT_POLL_INTERVAL_MS",
            "1000",
        )?),
        max_interval: Duration::from_millis(get_parsed(
            vars,
            "RECEIPT_POLL_MAX_INTERVAL_MS",
            "8000",
        )?),
        backoff_multiplier: 2,
        timeout: Duration::from_secs(get_parsed(vars, "RECEIPT_TIMEOUT_SECS", "120")?),
        max_attempts: get_parsed(vars, "RECEIPT_MAX_ATTEMPTS", "60")?,
        max_transient_errors: get_parsed(vars, "RECEIPT_MAX_TRANSIENT_ERRORS", "3")?,
    };

    if policy.initial_interval.is_zero() || policy.max_interval < policy.initial_interval {
        return Err(ConfigError::InvalidEnvVar(
            "RECEIPT_POLL_MAX_INTERVAL_MS".to_string(),
            "must be at least RECEIPT_POLL_INTERVAL_MS, which must be non-zero".to_string(),
        ));
    }
    if policy.max_attempts == 0 || policy.timeout.is_zero() {
        return Err(ConfigError::InvalidEnvVar(
            "RECEIPT_MAX_ATTEMPTS".to_string(),
            "receipt wait budget must be non-zero".to_string(),
        ));
    }
    Ok(policy)
}

// =============================================================================
// Helper Functions
// =============================================================================

type Lookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Get a required environment variable.
fn get_required_env(vars: &Lookup<'_>, key: &str) -> Result<String, ConfigError> {
    get_optional_env(vars, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(vars: &Lookup<'_>, key: &str) -> Option<String> {
    vars(key).filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(vars: &Lookup<'_>, key: &str, default: &str) -> String {
    get_optional_env(vars, key).unwrap_or_else(|| default.to_string())
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn get_parsed<T>(vars: &Lookup<'_>, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_value(key, &get_env_or_default(vars, key, default))
}

fn get_required_parsed<T>(vars: &Lookup<'_>, key: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_value(key, &get_required_env(vars, key)?)
}

fn get_optional_parsed<T>(vars: &Lookup<'_>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    get_optional_env(vars, key)
        .map(|value| parse_value(key, &value))
        .transpose()
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a private key is well-formed hex and not an obvious placeholder.
fn validate_private_key(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret().trim();
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if hex.len() != PRIVATE_KEY_HEX_LENGTH || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be {PRIVATE_KEY_HEX_LENGTH} hex characters"),
        ));
    }

    // Random keys sit close to 4 bits/char; repeated patterns do not.
    let entropy = shannon_entropy(&hex.to_ascii_lowercase());
    if entropy < MIN_KEY_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_KEY_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated key."
            ),
        ));
    }

    Ok(())
}

/// Load and validate the signing key.
fn get_signer_key(vars: &Lookup<'_>, key: &str) -> Result<SecretString, ConfigError> {
    let value = SecretString::from(get_required_env(vars, key)?);
    validate_private_key(&value, key)?;
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn base_vars() -> HashMap<&'static str, String> {
        HashMap::from([
            ("CHAIN_RPC_URL", "https://rpc.example.org/key-123".to_string()),
            (
                "STOREFRONT_CONTRACT_ADDRESS",
                "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            ),
            ("SIGNER_PRIVATE_KEY", DEV_KEY.to_string()),
        ])
    }

    fn load(vars: &HashMap<&'static str, String>) -> Result<GatewayConfig, ConfigError> {
        GatewayConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&base_vars()).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.chain.chain_id, 97);
        assert_eq!(config.chain.interface_version, InterfaceVersion::V1);
        assert_eq!(config.gas, GasPolicy::default());
        assert_eq!(config.confirmation, ConfirmationPolicy::default());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_rpc_url() {
        let mut vars = base_vars();
        vars.remove("CHAIN_RPC_URL");
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "CHAIN_RPC_URL"));
    }

    #[test]
    fn test_invalid_contract_address() {
        let mut vars = base_vars();
        vars.insert("STOREFRONT_CONTRACT_ADDRESS", "0x1234".to_string());
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_CONTRACT_ADDRESS"));
    }

    #[test]
    fn test_unknown_interface_version() {
        let mut vars = base_vars();
        vars.insert("CONTRACT_INTERFACE_VERSION", "2".to_string());
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InvalidEnvVar(_, _)
        ));
    }

    #[test]
    fn test_estimate_policy_with_fallback() {
        let mut vars = base_vars();
        vars.insert("GAS_LIMIT_POLICY", "estimate".to_string());
        vars.insert("GAS_ESTIMATE_BUFFER_PERCENT", "25".to_string());
        vars.insert("GAS_ESTIMATE_FALLBACK", "300000".to_string());
        vars.insert("GAS_PRICE_POLICY", "network".to_string());
        vars.insert("GAS_PRICE_PREMIUM_PERCENT", "10".to_string());
        let config = load(&vars).unwrap();
        assert_eq!(
            config.gas,
            GasPolicy {
                limit: GasLimitPolicy::Estimate {
                    buffer_percent: 25,
                    fallback: Some(300_000),
                },
                price: GasPricePolicy::Network { premium_percent: 10 },
            }
        );
    }

    #[test]
    fn test_fractional_gwei_price() {
        let mut vars = base_vars();
        vars.insert("GAS_PRICE_GWEI", "1.5".to_string());
        let config = load(&vars).unwrap();
        assert_eq!(
            config.gas.price,
            GasPricePolicy::Fixed(TokenAmount::new(1_500_000_000))
        );
    }

    #[test]
    fn test_unknown_gas_policy() {
        let mut vars = base_vars();
        vars.insert("GAS_LIMIT_POLICY", "guess".to_string());
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_poll_bounds_are_checked() {
        let mut vars = base_vars();
        vars.insert("RECEIPT_POLL_INTERVAL_MS", "5000".to_string());
        vars.insert("RECEIPT_POLL_MAX_INTERVAL_MS", "1000".to_string());
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_malformed_key_is_rejected() {
        let mut vars = base_vars();
        vars.insert("SIGNER_PRIVATE_KEY", "0x1234".to_string());
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_low_entropy_key_is_rejected() {
        let mut vars = base_vars();
        vars.insert("SIGNER_PRIVATE_KEY", "ab".repeat(32));
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&base_vars()).unwrap();
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("rpc.example.org"));
        assert!(!debug_output.contains("key-123"));
        assert!(!debug_output.contains("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"));
    }

    #[test]
    fn test_account_config_needs_no_contract() {
        let mut vars = base_vars();
        vars.remove("STOREFRONT_CONTRACT_ADDRESS");
        let config = AccountConfig::from_vars(|key| vars.get(key).cloned()).unwrap();
        let options = config.pipeline_options(Address::ZERO);
        assert_eq!(options.chain_id, 97);
        assert_eq!(options.contract, Address::ZERO);
        assert!(!format!("{config:?}").contains("key-123"));
    }
}
