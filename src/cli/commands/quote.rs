use crate::cli::{display::SwapDisplay, QuoteArgs};
use crate::core::{Asset, AssetId, Config, Field, Pair, PairAddress, Reserves, SwapError, SwapResult};
use crate::discovery::ReserveLookup;
use crate::quotes::QuoteEngine;
use crate::session::{derive_swap_info, SwapSession, SwapState};
use colored::*;
use console::style;
use log::info;

const LOCAL_PAIR: &str = "local";

pub async fn execute(args: QuoteArgs) -> SwapResult<()> {
    println!("{}", "🚀 Soroswap Quote Tool".bold().cyan());

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    let slippage_bps = args.slippage.unwrap_or(config.default_slippage_bps);
    if slippage_bps > config.max_slippage_bps {
        return Err(SwapError::InvalidSlippage(format!(
            "{} bps exceeds the {} bps maximum",
            slippage_bps, config.max_slippage_bps
        )));
    }
    let engine = QuoteEngine::new(args.fee.unwrap_or(config.fee_bps))?;

    let input = local_asset(&args.symbol_in, args.decimals_in);
    let output = local_asset(&args.symbol_out, args.decimals_out);
    if input == output {
        println!("{}", "❌ Cannot swap token to itself".red().bold());
        return Ok(());
    }

    let pair = Pair::new(input.clone(), output.clone(), PairAddress::new(LOCAL_PAIR))?;
    let reserves = Reserves::new(args.reserve_in, args.reserve_out, 1);

    let state = SwapState {
        independent_field: if args.exact_out { Field::Output } else { Field::Input },
        typed_value: args.amount.clone(),
        input_currency: Some(input.clone()),
        output_currency: Some(output.clone()),
        recipient: None,
    };

    info!(
        "Quoting {} {} ({}) against reserves {}/{} at {} bps fee, {} bps slippage",
        args.amount,
        if args.exact_out { &output.symbol } else { &input.symbol },
        state.independent_field,
        args.reserve_in,
        args.reserve_out,
        engine.fee_bps(),
        slippage_bps
    );

    let mut session = SwapSession::new(state, slippage_bps);
    let ticket = session.begin_derivation();
    let derived = derive_swap_info(
        &ticket.state,
        Some(&pair),
        &ReserveLookup::Available(reserves.clone()),
        &engine,
        slippage_bps,
    );
    session.complete_derivation(ticket, derived);

    SwapDisplay::display_reserves(&reserves, pair.token_0(), pair.token_1());
    println!();
    SwapDisplay::display_derived(&session.derived());

    println!(
        "{}",
        style("💡 Tip: Use --exact-out to quote the amount you want to receive").dim()
    );

    Ok(())
}

fn local_asset(symbol: &str, decimals: u8) -> Asset {
    Asset::new(
        AssetId::Contract(symbol.to_uppercase()),
        symbol.to_uppercase(),
        symbol,
        decimals,
    )
}
