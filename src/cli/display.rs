use crate::core::{Asset, Reserves, Trade, TradeState, TradeType};
use crate::quotes::format_units;
use crate::session::DerivedSwapInfo;
use colored::*;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Display helper for quotes and token lists
pub struct SwapDisplay;

impl SwapDisplay {
    /// Display a derived quote, or why there is none
    pub fn display_derived(info: &DerivedSwapInfo) {
        match (&info.trade_state, &info.trade) {
            (TradeState::Valid, Some(trade)) => Self::display_trade(trade, info.allowed_slippage_bps),
            (TradeState::NoRouteFound, _) => {
                println!("{}", "❌ No liquidity for this pair".red().bold());
            }
            (TradeState::Loading | TradeState::Syncing, _) => {
                println!("{}", "⏳ Reserves not available yet".yellow());
            }
            _ => {
                let reason = info
                    .input_error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "invalid input".to_string());
                println!("{} {}", "❌".red(), reason.red().bold());
            }
        }
    }

    /// Display a single priced trade
    pub fn display_trade(trade: &Trade, slippage_bps: u16) {
        let input = &trade.input.asset;
        let output = &trade.output.asset;

        println!(
            "{} {} {} → {} {}",
            style("►").cyan(),
            format_amount(trade.input.amount, input).bold(),
            input.symbol,
            format_amount(trade.output.amount, output).bold(),
            output.symbol
        );

        println!(
            "  Rate: 1 {} = {} {}",
            input.symbol,
            trade.execution_price.normalize(),
            output.symbol
        );

        println!(
            "  Price Impact: {} | Fee: {} {} ({:.2}%)",
            format_impact(trade.price_impact_percent()),
            format_amount(trade.fee_amount(), input),
            input.symbol,
            f64::from(trade.fee_bps) / 100.0
        );

        match trade.trade_type {
            TradeType::ExactInput => println!(
                "  Min Received: {} {} ({:.2}% slippage)",
                format_amount(trade.minimum_received(slippage_bps), output),
                output.symbol,
                f64::from(slippage_bps) / 100.0
            ),
            TradeType::ExactOutput => println!(
                "  Max Sent: {} {} ({:.2}% slippage)",
                format_amount(trade.maximum_sent(slippage_bps), input),
                input.symbol,
                f64::from(slippage_bps) / 100.0
            ),
        }

        for address in &trade.route {
            println!("  Pair: {}", style(address.to_string()).dim());
        }
        println!();
    }

    pub fn display_reserves(reserves: &Reserves, token_0: &Asset, token_1: &Asset) {
        println!(
            "Reserves: {} {} / {} {}",
            format_amount(reserves.reserve_0, token_0),
            token_0.symbol,
            format_amount(reserves.reserve_1, token_1),
            token_1.symbol
        );
    }

    /// Display token list
    pub fn display_token_list(tokens: &[Asset], network: &str) {
        println!(
            "\n{}",
            style(format!("🪙 Tokens on {}", network)).bold().underlined()
        );

        for (i, token) in tokens.iter().enumerate() {
            println!(
                "{}. {} {} ({} decimals)",
                i + 1,
                token.symbol.bold(),
                style(&token.name).dim(),
                token.decimals
            );
            println!("   {}", style(token.id.to_string()).dim());
        }
    }

    /// Create a progress bar for operations
    pub fn create_progress_bar(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let spinner = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");
        pb.set_style(spinner);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }
}

/// Format token amount with decimals
fn format_amount(amount: u128, asset: &Asset) -> String {
    format_units(amount, asset.decimals)
}

/// Format price impact with color
fn format_impact(impact: f64) -> ColoredString {
    let impact_str = format!("{:.3}%", impact);
    if impact < 1.0 {
        impact_str.green()
    } else if impact < 5.0 {
        impact_str.yellow()
    } else {
        impact_str.red()
    }
}
