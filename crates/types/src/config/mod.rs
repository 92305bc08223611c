// Path: crates/types/src/config/mod.rs

//! Shared configuration structures for the admission pipeline.
use crate::app::validate_denom;
use crate::error::ConfigError;
use crate::keys::FEE_COLLECTOR_NAME;
use serde::{Deserialize, Serialize};

/// Parameters consulted by the ante decorator chain.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AnteParams {
    /// Maximum number of characters permitted in a memo.
    #[serde(default = "default_max_memo_characters")]
    pub max_memo_characters: u64,
    /// Maximum number of signatures per tx, counting multisig constituents.
    #[serde(default = "default_tx_sig_limit")]
    pub tx_sig_limit: u64,
    /// Gas charged per byte of the raw transaction.
    #[serde(default = "default_tx_size_cost_per_byte")]
    pub tx_size_cost_per_byte: u64,
    /// Gas charged per ed25519 signature verification.
    #[serde(default = "default_sig_verify_cost_ed25519")]
    pub sig_verify_cost_ed25519: u64,
    /// Maximum gas a single transaction may request. Zero means unlimited.
    #[serde(default)]
    pub max_block_gas: u64,
}

fn default_max_memo_characters() -> u64 {
    256
}
fn default_tx_sig_limit() -> u64 {
    7
}
fn default_tx_size_cost_per_byte() -> u64 {
    10
}
fn default_sig_verify_cost_ed25519() -> u64 {
    590
}

impl Default for AnteParams {
    fn default() -> Self {
        Self {
            max_memo_characters: default_max_memo_characters(),
            tx_sig_limit: default_tx_sig_limit(),
            tx_size_cost_per_byte: default_tx_size_cost_per_byte(),
            sig_verify_cost_ed25519: default_sig_verify_cost_ed25519(),
            max_block_gas: 0,
        }
    }
}

/// Hard bounds applied by the wire decoder before any message is resolved.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum raw transaction size in bytes.
    #[serde(default = "default_max_tx_bytes")]
    pub max_tx_bytes: usize,
    /// Maximum number of top-level messages.
    #[serde(default = "default_max_msgs")]
    pub max_msgs: usize,
    /// Maximum size of a single message payload in bytes.
    #[serde(default = "default_max_msg_bytes")]
    pub max_msg_bytes: usize,
    /// Maximum nesting depth of wrapper messages and multisig keys.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
    /// Maximum number of signer infos and signatures.
    #[serde(default = "default_max_signatures")]
    pub max_signatures: usize,
}

fn default_max_tx_bytes() -> usize {
    1024 * 1024
}
fn default_max_msgs() -> usize {
    64
}
fn default_max_msg_bytes() -> usize {
    256 * 1024
}
fn default_max_nesting_depth() -> usize {
    4
}
fn default_max_signatures() -> usize {
    16
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_tx_bytes: default_max_tx_bytes(),
            max_msgs: default_max_msgs(),
            max_msg_bytes: default_max_msg_bytes(),
            max_nesting_depth: default_max_nesting_depth(),
            max_signatures: default_max_signatures(),
        }
    }
}

/// A minimum gas price expressed as a rational: `amount` of `denom` per
/// `gas_units` gas.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MinGasPrice {
    /// The fee denomination.
    pub denom: String,
    /// The numerator of the price.
    pub amount: u64,
    /// The denominator of the price, in gas units.
    #[serde(default = "default_gas_units")]
    pub gas_units: u64,
}

fn default_gas_units() -> u64 {
    1
}

impl MinGasPrice {
    /// The minimum fee in this denomination for `gas_limit`, rounded up.
    pub fn required_fee(&self, gas_limit: u64) -> u128 {
        let num = u128::from(gas_limit) * u128::from(self.amount);
        let den = u128::from(self.gas_units.max(1));
        num.div_ceil(den)
    }
}

/// Top-level configuration for an admission node.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// The chain identifier committed to by every sign doc.
    pub chain_id: String,
    /// Capacity, in entries, of the shared read-through cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Minimum gas prices enforced in check mode. Empty disables the check.
    #[serde(default)]
    pub min_gas_prices: Vec<MinGasPrice>,
    /// Name of the module account receiving fees.
    #[serde(default = "default_fee_collector")]
    pub fee_collector: String,
    /// Number of worker threads for batch admission. Zero uses the rayon default.
    #[serde(default)]
    pub workers: usize,
    /// Ante chain parameters.
    #[serde(default)]
    pub ante: AnteParams,
    /// Decoder bounds.
    #[serde(default)]
    pub decode: DecodeLimits,
}

fn default_cache_capacity() -> usize {
    4096
}
fn default_fee_collector() -> String {
    FEE_COLLECTOR_NAME.to_string()
}

impl NodeConfig {
    /// Returns a config with defaults for everything but the chain id.
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            cache_capacity: default_cache_capacity(),
            min_gas_prices: Vec::new(),
            fee_collector: default_fee_collector(),
            workers: 0,
            ante: AnteParams::default(),
            decode: DecodeLimits::default(),
        }
    }

    /// Rejects values that would make the pipeline unusable or unsafe.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            }
        }
        if self.chain_id.trim().is_empty() {
            return Err(invalid("chain_id", "must not be empty"));
        }
        if self.cache_capacity == 0 {
            return Err(invalid("cache_capacity", "must be positive"));
        }
        if self.fee_collector.is_empty() {
            return Err(invalid("fee_collector", "must not be empty"));
        }
        if self.ante.tx_sig_limit == 0 {
            return Err(invalid("ante.tx_sig_limit", "must be positive"));
        }
        let d = &self.decode;
        if d.max_tx_bytes == 0 || d.max_msgs == 0 || d.max_msg_bytes == 0 {
            return Err(invalid("decode", "size and count bounds must be positive"));
        }
        if d.max_nesting_depth == 0 {
            return Err(invalid("decode.max_nesting_depth", "must be at least 1"));
        }
        if d.max_signatures == 0 {
            return Err(invalid("decode.max_signatures", "must be positive"));
        }
        for price in &self.min_gas_prices {
            validate_denom(&price.denom)
                .map_err(|e| invalid("min_gas_prices", &e.to_string()))?;
            if price.gas_units == 0 {
                return Err(invalid("min_gas_prices", "gas_units must be positive"));
            }
        }
        Ok(())
    }
}
