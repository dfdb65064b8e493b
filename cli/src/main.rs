//! Storage Auction Simulator - headless driver
//!
//! Runs scripted storage-unit auctions from the terminal. A simple player
//! strategy stands in for the human, so the engine can be exercised end to
//! end (balance tuning, seed hunting, regression checks) without a game
//! client.
//!
//! ```text
//! auction-sim --location downtown_vault --strategy tactician --auctions 5
//! RUST_LOG=debug auction-sim --seed 7 --json
//! ```

use std::error::Error;
use std::path::PathBuf;

use auction_engine_core_rs::{
    AuctionHouse, AuctionHouseConfig, AuctionPhase, Collaborators, HistoryRecord, Item,
    ItemGenerator, Leader, PlayerWallet, Rarity, StaticLocationCatalog, StorageInventory, Tactic,
    TemplateItemGenerator, Wallet,
};
use clap::{Parser, ValueEnum};

/// Scripted player behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Never bids
    Passive,
    /// Outbids whenever it is not leading, up to the bid cap
    Steady,
    /// Only bids once the auctioneer starts calling "going"
    Sniper,
    /// Steady bidding plus intimidate/bluff whenever allowed
    Tactician,
}

/// Storage Auction Simulator - scripted auctions against NPC rivals
#[derive(Parser, Debug)]
#[command(name = "auction-sim")]
#[command(about = "Runs scripted storage-unit auctions against NPC rivals")]
#[command(version)]
struct Args {
    /// RNG seed (overrides the config file)
    #[arg(long, env = "AUCTION_SEED")]
    seed: Option<u64>,

    /// Location to hold the auctions at
    #[arg(long, env = "AUCTION_LOCATION", default_value = "suburban_units")]
    location: String,

    /// Starting wallet balance
    #[arg(long, env = "AUCTION_WALLET", default_value_t = 5_000)]
    wallet: i64,

    /// Highest bid the scripted player will make (defaults to the balance)
    #[arg(long, env = "AUCTION_MAX_BID")]
    max_bid: Option<i64>,

    /// House configuration as JSON
    #[arg(long, env = "AUCTION_CONFIG")]
    config: Option<PathBuf>,

    /// Player strategy
    #[arg(long, value_enum, default_value_t = Strategy::Steady)]
    strategy: Strategy,

    /// Number of auctions to run back to back
    #[arg(long, default_value_t = 1)]
    auctions: usize,

    /// Items per lot
    #[arg(long, default_value_t = 4)]
    lot_size: usize,

    /// Luck modifier in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    luck: f64,

    /// Inventory capacity
    #[arg(long, default_value_t = 50)]
    inventory: usize,

    /// Safety cap on ticks per auction
    #[arg(long, default_value_t = 2_000)]
    max_ticks: usize,

    /// Print the history as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<AuctionHouseConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str::<AuctionHouseConfig>(&raw)?
        }
        None => AuctionHouseConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    Ok(config)
}

/// Build a lot by cycling rarities; the engine only prices what it is given.
fn build_lot(generator: &mut TemplateItemGenerator, lot_size: usize, round: usize) -> Vec<Item> {
    (0..lot_size.max(1))
        .map(|n| {
            let rarity = Rarity::ALL[(n + round) % 3];
            generator.create(rarity, 1.0 + (n % 3) as f64 * 0.5)
        })
        .collect()
}

/// One scripted decision between ticks
fn play_turn(house: &mut AuctionHouse, strategy: Strategy, wallet: &PlayerWallet, cap: i64) {
    let Some(view) = house.snapshot() else {
        return;
    };
    if view.leader.is_player() {
        if strategy == Strategy::Tactician {
            for tactic in [Tactic::Intimidate, Tactic::Bluff] {
                if let Ok(record) = house.use_tactic(tactic, wallet) {
                    log::info!(
                        "{:?}: {} countered, {} dropped",
                        tactic,
                        record.countered(),
                        record.dropped()
                    );
                    break;
                }
            }
        }
        return;
    }

    let affordable = view.min_next_bid <= cap.min(wallet.balance());
    match strategy {
        Strategy::Passive => {}
        Strategy::Steady | Strategy::Tactician => {
            if affordable {
                let _ = house.place_bid(view.min_next_bid, wallet);
            }
        }
        Strategy::Sniper => {
            let calling = view.phase != AuctionPhase::Bidding;
            let opening = view.leader == Leader::Nobody && view.rounds_elapsed == 0;
            if !affordable || !(calling || opening) {
                return;
            }
            if matches!(view.leader, Leader::Npc(_)) && house.use_tactic(Tactic::SniperBid, wallet).is_ok() {
                return;
            }
            let _ = house.place_bid(view.min_next_bid, wallet);
        }
    }
}

fn print_table(history: &[HistoryRecord], wallet: &PlayerWallet) {
    println!(
        "{:<38} {:<16} {:<6} {:>8} {:>7} {:>6} {:>9} {:>9}",
        "auction", "location", "status", "bid", "rounds", "items", "value", "hidden"
    );
    for record in history {
        println!(
            "{:<38} {:<16} {:<6} {:>8} {:>7} {:>6} {:>9} {:>9}",
            record.auction_id,
            record.location_id,
            format!("{:?}", record.status).to_lowercase(),
            record.winning_bid,
            record.rounds,
            record.items_won,
            record.items_value,
            record.hidden_value
        );
    }
    println!(
        "wallet: {} (spent {}, credited {})",
        wallet.balance(),
        wallet.total_debited(),
        wallet.total_credited()
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let mut house = AuctionHouse::new(config, StaticLocationCatalog::with_default_locations())?;

    let mut wallet = PlayerWallet::new(args.wallet);
    let mut inventory = StorageInventory::new(args.inventory);
    let mut found_items = TemplateItemGenerator::default();
    let mut lot_items = TemplateItemGenerator::new(150);

    for round in 0..args.auctions {
        let lot = build_lot(&mut lot_items, args.lot_size, round);
        let auction_id = house.list_auction(&args.location, lot, args.luck)?;

        {
            let mut collab = Collaborators::new(&mut wallet, &mut inventory, &mut found_items);
            if let Err(err) = house.start_auction(&auction_id, &mut collab) {
                log::warn!("could not start {}: {}", auction_id, err);
                break;
            }
        }

        for _ in 0..args.max_ticks {
            let cap = args.max_bid.unwrap_or(i64::MAX);
            play_turn(&mut house, args.strategy, &wallet, cap);

            let mut collab = Collaborators::new(&mut wallet, &mut inventory, &mut found_items);
            if house.tick(&mut collab).closed.is_some() {
                break;
            }
        }

        if house.active_auction().is_some() {
            let mut collab = Collaborators::new(&mut wallet, &mut inventory, &mut found_items);
            house.leave_auction(&mut collab)?;
            log::warn!("{} hit the tick cap; walked away", auction_id);
        }
    }

    let history: Vec<HistoryRecord> = house.history().iter().cloned().collect();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else {
        print_table(&history, &wallet);
    }
    Ok(())
}
