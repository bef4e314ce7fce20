use crate::cli::{display::SwapDisplay, TokensArgs};
use crate::core::{network_passphrase, Config, SwapResult};
use crate::services::{HttpTokenListService, TokenListService};
use crate::utils::find_asset;
use colored::*;
use log::info;

pub async fn execute(args: TokensArgs) -> SwapResult<()> {
    let config = Config::from_env()?;
    config.validate()?;

    let network = args.network.unwrap_or_else(|| config.network.clone());
    let service = HttpTokenListService::new(&config)?;

    let pb = SwapDisplay::create_progress_bar(&format!("Fetching {} token list...", network));
    let tokens = service.fetch_tokens(&network).await;
    pb.finish_and_clear();

    info!("{} tokens available on {}", tokens.len(), network);

    if tokens.is_empty() {
        println!("{}", "❌ No tokens available (token list unreachable?)".red().bold());
        return Ok(());
    }

    match args.query {
        Some(query) => match find_asset(&tokens, &query, network_passphrase(&network)) {
            Some(token) => SwapDisplay::display_token_list(std::slice::from_ref(token), &network),
            None => println!("{}", format!("❌ No token matches '{}'", query).red().bold()),
        },
        None => SwapDisplay::display_token_list(&tokens, &network),
    }

    Ok(())
}
