// Network names
pub const MAINNET: &str = "mainnet";
pub const TESTNET: &str = "testnet";

// Network passphrases, hashed into contract ids
pub const MAINNET_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

// Token list sources
pub const MAINNET_TOKEN_LIST_URL: &str =
    "https://raw.githubusercontent.com/soroswap/token-list/main/tokenList.json";
pub const DEFAULT_API_URL: &str = "https://api.soroswap.finance";
pub const TOKENS_API_PATH: &str = "/api/tokens";

// Basis-point denominator (10_000 = 100%)
pub const BPS_DENOMINATOR: u32 = 10_000;

// Pool fee
pub const DEFAULT_FEE_BPS: u32 = 30; // 0.3%

// Slippage
pub const DEFAULT_SLIPPAGE_BPS: u16 = 50; // 0.5%
pub const MAX_SLIPPAGE_BPS: u16 = 5_000; // 50%

// Reserve cache TTL and polling, in seconds
pub const RESERVES_CACHE_TTL: u64 = 10;
pub const RESERVES_POLL_INTERVAL: u64 = 5;

// HTTP
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

// Decimals used for display when a trade carries no asset metadata
pub const DEFAULT_DECIMALS: u8 = 7;
