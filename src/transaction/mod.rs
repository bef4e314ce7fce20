pub mod lifecycle;

pub use lifecycle::{TradeLifecycleController, TradePhase};
