use crate::core::{SwapError, SwapResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// On-chain identity of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetId {
    /// Soroban token contract (`C...` strkey).
    Contract(String),
    /// Classic Stellar asset identified by code and issuing account.
    Classic { code: String, issuer: String },
    /// Native lumens.
    Native,
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetId::Contract(address) => write!(f, "{}", address),
            AssetId::Classic { code, issuer } => write!(f, "{}:{}", code, issuer),
            AssetId::Native => write!(f, "native"),
        }
    }
}

/// Token metadata. Equality and hashing only consider the identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

impl Asset {
    pub fn new(id: AssetId, symbol: impl Into<String>, name: impl Into<String>, decimals: u8) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            name: name.into(),
            decimals,
        }
    }
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Asset {}

impl Hash for Asset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairAddress(pub String);

impl PairAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A two-asset liquidity pool. `token_0` and `token_1` are always distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PairFields")]
pub struct Pair {
    token_0: Asset,
    token_1: Asset,
    address: PairAddress,
}

// Deserialized shape of `Pair`, checked by `Pair::new`
#[derive(Deserialize)]
struct PairFields {
    token_0: Asset,
    token_1: Asset,
    address: PairAddress,
}

impl TryFrom<PairFields> for Pair {
    type Error = SwapError;

    fn try_from(fields: PairFields) -> SwapResult<Self> {
        Pair::new(fields.token_0, fields.token_1, fields.address)
    }
}

impl Pair {
    pub fn new(token_0: Asset, token_1: Asset, address: PairAddress) -> SwapResult<Self> {
        if token_0 == token_1 {
            return Err(SwapError::InvalidPair(format!(
                "pair {} uses {} on both sides",
                address, token_0.id
            )));
        }

        Ok(Self {
            token_0,
            token_1,
            address,
        })
    }

    pub fn token_0(&self) -> &Asset {
        &self.token_0
    }

    pub fn token_1(&self) -> &Asset {
        &self.token_1
    }

    pub fn address(&self) -> &PairAddress {
        &self.address
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.token_0.id == *id || self.token_1.id == *id
    }

    /// Order-independent match against two asset identifiers.
    pub fn matches(&self, a: &AssetId, b: &AssetId) -> bool {
        (self.token_0.id == *a && self.token_1.id == *b)
            || (self.token_0.id == *b && self.token_1.id == *a)
    }
}

/// Pool balances at a point in time, in the pair's `token_0`/`token_1` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve_0: u128,
    pub reserve_1: u128,
    pub fetched_at: DateTime<Utc>,
    /// Monotonic counter assigned by the repository on every stored fetch.
    pub version: u64,
}

impl Reserves {
    pub fn new(reserve_0: u128, reserve_1: u128, version: u64) -> Self {
        Self {
            reserve_0,
            reserve_1,
            fetched_at: Utc::now(),
            version,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reserve_0 == 0 && self.reserve_1 == 0
    }

    /// Both sides funded. A pool with exactly one side at zero is unusable.
    pub fn is_usable(&self) -> bool {
        self.reserve_0 > 0 && self.reserve_1 > 0
    }

    /// Returns `(reserve_in, reserve_out)` for a trade selling `input`.
    pub fn oriented(&self, pair: &Pair, input: &AssetId) -> Option<(u128, u128)> {
        if pair.token_0().id == *input {
            Some((self.reserve_0, self.reserve_1))
        } else if pair.token_1().id == *input {
            Some((self.reserve_1, self.reserve_0))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Field {
    #[default]
    Input,
    Output,
}

impl Field {
    pub fn opposite(self) -> Self {
        match self {
            Field::Input => Field::Output,
            Field::Output => Field::Input,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Input => write!(f, "INPUT"),
            Field::Output => write!(f, "OUTPUT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

impl From<Field> for TradeType {
    fn from(field: Field) -> Self {
        match field {
            Field::Input => TradeType::ExactInput,
            Field::Output => TradeType::ExactOutput,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeState {
    Invalid,
    NoRouteFound,
    Loading,
    Syncing,
    Valid,
}

impl fmt::Display for TradeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeState::Invalid => write!(f, "INVALID"),
            TradeState::NoRouteFound => write!(f, "NO_ROUTE_FOUND"),
            TradeState::Loading => write!(f, "LOADING"),
            TradeState::Syncing => write!(f, "SYNCING"),
            TradeState::Valid => write!(f, "VALID"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub asset: Asset,
    pub amount: u128,
}

impl CurrencyAmount {
    pub fn new(asset: Asset, amount: u128) -> Self {
        Self { asset, amount }
    }
}

/// A fully priced single-pair trade. Replaced wholesale on every derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub input: CurrencyAmount,
    pub output: CurrencyAmount,
    pub trade_type: TradeType,
    /// Output units per input unit, adjusted for both assets' decimals.
    pub execution_price: Decimal,
    /// Fraction in `[0, 1)`.
    pub price_impact: Decimal,
    pub fee_bps: u32,
    pub route: Vec<PairAddress>,
}

impl Trade {
    /// Amount on the side the user did not type.
    pub fn expected_amount(&self) -> &CurrencyAmount {
        match self.trade_type {
            TradeType::ExactInput => &self.output,
            TradeType::ExactOutput => &self.input,
        }
    }

    pub fn minimum_received(&self, slippage_bps: u16) -> u128 {
        match self.trade_type {
            TradeType::ExactInput => crate::quotes::minimum_received(self.output.amount, slippage_bps),
            TradeType::ExactOutput => self.output.amount,
        }
    }

    pub fn maximum_sent(&self, slippage_bps: u16) -> u128 {
        match self.trade_type {
            TradeType::ExactInput => self.input.amount,
            TradeType::ExactOutput => crate::quotes::maximum_sent(self.input.amount, slippage_bps),
        }
    }

    /// Liquidity-provider fee taken from the input side.
    pub fn fee_amount(&self) -> u128 {
        crate::quotes::mul_div_floor(self.input.amount, u128::from(self.fee_bps), u128::from(crate::core::BPS_DENOMINATOR))
            .unwrap_or(0)
    }

    /// Price impact as a display percentage.
    pub fn price_impact_percent(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        (self.price_impact * Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitMode {
    /// Dry-run against the network without broadcasting.
    Simulate,
    Broadcast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub hash: String,
    pub ledger: Option<u32>,
    pub amount_in: u128,
    pub amount_out: u128,
    pub timestamp: i64,
    pub simulated: bool,
}
