pub mod cli;
pub mod core;
pub mod discovery;
pub mod quotes;
pub mod services;
pub mod session;
pub mod transaction;
pub mod utils;

// Re-export commonly used types
pub use core::{Asset, AssetId, Config, Pair, PairAddress, Reserves, SwapError, SwapResult, Trade};
pub use discovery::{PairDiscovery, ReserveLookup, ReserveRepository};
pub use quotes::QuoteEngine;
pub use session::{QuoteService, SwapAction, SwapSession, SwapState};
pub use transaction::{TradeLifecycleController, TradePhase};
