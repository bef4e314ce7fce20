use clap::{Parser, Subcommand};

pub mod commands;
pub mod display;

#[derive(Parser)]
#[command(name = "soroswap")]
#[command(about = "Constant-product swap quoting for Soroswap pairs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Quote a swap against given pair reserves
    Quote(QuoteArgs),

    /// List the tokens available on a network
    Tokens(TokensArgs),
}

#[derive(Parser)]
pub struct QuoteArgs {
    /// Amount typed by the user, in token units (e.g. 12.5)
    pub amount: String,

    /// Reserve of the input token, in base units
    #[arg(long)]
    pub reserve_in: u128,

    /// Reserve of the output token, in base units
    #[arg(long)]
    pub reserve_out: u128,

    /// Treat the amount as the exact output wanted
    #[arg(long)]
    pub exact_out: bool,

    #[arg(long, default_value = "IN")]
    pub symbol_in: String,

    #[arg(long, default_value = "OUT")]
    pub symbol_out: String,

    #[arg(long, default_value = "7")]
    pub decimals_in: u8,

    #[arg(long, default_value = "7")]
    pub decimals_out: u8,

    /// Slippage tolerance in basis points (defaults to DEFAULT_SLIPPAGE_BPS)
    #[arg(short, long)]
    pub slippage: Option<u16>,

    /// Pool fee in basis points (defaults to FEE_BPS)
    #[arg(long)]
    pub fee: Option<u32>,
}

#[derive(Parser)]
pub struct TokensArgs {
    /// Network to list (defaults to SOROSWAP_NETWORK)
    #[arg(short, long, env = "SOROSWAP_NETWORK")]
    pub network: Option<String>,

    /// Show only the token matching this symbol or identifier
    pub query: Option<String>,
}
