//! Shows how the heuristic selector reads an auction and what it would bid.
use anyhow::{anyhow, Result};
use bridge_core::auction::Auction;
use bridge_core::board::Position;
use bridge_core::io::hand_parser::parse_hand;
use bridge_engine::HeuristicSelector;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Hand in C.D.H.S order (e.g. "AK5.QJ3.T92.8743")
    hand: String,

    /// Calls so far, space separated (e.g. "1H P")
    #[arg(default_value = "")]
    history: String,

    /// Dealer seat
    #[arg(short, long, default_value = "N")]
    dealer: char,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose > 0 { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    let dealer = Position::from_char(args.dealer.to_ascii_uppercase())
        .ok_or_else(|| anyhow!("unknown dealer {}", args.dealer))?;
    let hand =
        parse_hand(&args.hand).ok_or_else(|| anyhow!("cannot parse hand {}", args.hand))?;
    let auction = Auction::parse(dealer, &args.history).map_err(|e| anyhow!(e))?;
    let selector = HeuristicSelector::natural()?;

    println!("Hand: {} ({} HCP)", args.hand, hand.hcp());
    println!("Auction: {}", auction.render());
    println!("To act: {}", auction.current_player());
    println!();

    for interpretation in selector.interpretations(&auction) {
        println!(
            "{:<6}{:<28}{}",
            interpretation.call.render(),
            interpretation.rule_name,
            interpretation.description
        );
    }
    println!();

    match selector.choose_call(&hand, &auction) {
        Some(decision) => match decision.variant {
            Some(variant) => println!("Chosen: {} ({})", decision.call, variant.name),
            None => println!("Chosen: {}", decision.call),
        },
        None => println!("No rule matched; the engine would simulate"),
    }
    Ok(())
}
