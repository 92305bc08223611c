// Path: crates/types/src/app/coin.rs

use crate::error::TxError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single denomination and amount.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coin {
    /// The denomination, e.g. `"stake"`.
    pub denom: String,
    /// The amount, serialized as a decimal string in JSON.
    #[serde(with = "amount_string")]
    pub amount: u128,
}

impl Coin {
    /// Creates a coin without validating the denomination.
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Checks the denomination against the permitted character set.
    pub fn validate(&self) -> Result<(), TxError> {
        validate_denom(&self.denom)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = TxError;

    /// Parses `"<amount><denom>"`, e.g. `"250stake"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| TxError::InvalidCoins(format!("missing denom in '{s}'")))?;
        let (amount, denom) = s.split_at(split);
        let amount = amount
            .parse::<u128>()
            .map_err(|e| TxError::InvalidCoins(format!("invalid amount in '{s}': {e}")))?;
        let coin = Coin::new(denom, amount);
        coin.validate()?;
        Ok(coin)
    }
}

/// Validates a denomination: 3 to 128 characters, starting with a letter,
/// followed by alphanumerics or one of `/:._-`.
pub fn validate_denom(denom: &str) -> Result<(), TxError> {
    let len = denom.len();
    let mut chars = denom.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));
    if !(3..=128).contains(&len) || !starts_alpha || !rest_ok {
        return Err(TxError::InvalidCoins(format!("invalid denom: '{denom}'")));
    }
    Ok(())
}

/// A sorted set of coins with unique denominations and non-zero amounts.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq, Default, Hash)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Returns an empty set.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Builds a set from arbitrary coins, dropping zero amounts and rejecting
    /// invalid or duplicate denominations.
    pub fn new(coins: Vec<Coin>) -> Result<Self, TxError> {
        let mut map = BTreeMap::new();
        for coin in coins {
            coin.validate()?;
            if coin.amount == 0 {
                continue;
            }
            if map.insert(coin.denom.clone(), coin.amount).is_some() {
                return Err(TxError::InvalidCoins(format!(
                    "duplicate denomination {}",
                    coin.denom
                )));
            }
        }
        Ok(Self::from_map(map))
    }

    /// Checks the invariants of a set that arrived without going through [`Coins::new`].
    pub fn validate(&self) -> Result<(), TxError> {
        let mut prev: Option<&str> = None;
        for coin in &self.0 {
            coin.validate()?;
            if coin.amount == 0 {
                return Err(TxError::InvalidCoins(format!("zero amount for {}", coin.denom)));
            }
            if prev.is_some_and(|p| p >= coin.denom.as_str()) {
                return Err(TxError::InvalidCoins("coins are not sorted or unique".into()));
            }
            prev = Some(&coin.denom);
        }
        Ok(())
    }

    fn from_map(map: BTreeMap<String, u128>) -> Self {
        Self(
            map.into_iter()
                .filter(|(_, amount)| *amount > 0)
                .map(|(denom, amount)| Coin { denom, amount })
                .collect(),
        )
    }

    fn to_map(&self) -> BTreeMap<String, u128> {
        self.0.iter().map(|c| (c.denom.clone(), c.amount)).collect()
    }

    /// Returns true if the set holds no coins.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the coins in denomination order.
    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    /// Returns the amount held of `denom`, or zero.
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map_or(0, |c| c.amount)
    }

    /// Adds two sets, failing on overflow.
    pub fn checked_add(&self, other: &Coins) -> Result<Coins, TxError> {
        let mut map = self.to_map();
        for coin in &other.0 {
            let entry = map.entry(coin.denom.clone()).or_insert(0);
            *entry = entry
                .checked_add(coin.amount)
                .ok_or_else(|| TxError::InvalidCoins(format!("overflow adding {coin}")))?;
        }
        Ok(Self::from_map(map))
    }

    /// Subtracts `other`, failing with `InsufficientFunds` if any denomination
    /// would go negative.
    pub fn checked_sub(&self, other: &Coins) -> Result<Coins, TxError> {
        let mut map = self.to_map();
        for coin in &other.0 {
            let held = map.get(&coin.denom).copied().unwrap_or(0);
            let left = held.checked_sub(coin.amount).ok_or_else(|| {
                TxError::InsufficientFunds(format!("{held}{} is smaller than {coin}", coin.denom))
            })?;
            map.insert(coin.denom.clone(), left);
        }
        Ok(Self::from_map(map))
    }

    /// Returns true if, for every denomination in `other`, `self` holds at least as much.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other.0.iter().all(|c| self.amount_of(&c.denom) >= c.amount)
    }

    /// Returns true if every denomination in `self` appears in `allowed`.
    pub fn denoms_subset_of(&self, allowed: &Coins) -> bool {
        self.0.iter().all(|c| allowed.amount_of(&c.denom) > 0)
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        let mut map = BTreeMap::new();
        map.insert(coin.denom, coin.amount);
        Self::from_map(map)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Coin::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

impl FromStr for Coins {
    type Err = TxError;

    /// Parses a comma-separated list such as `"10atom,250stake"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Coins::empty());
        }
        let coins = s
            .split(',')
            .map(Coin::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Coins::new(coins)
    }
}

mod amount_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
