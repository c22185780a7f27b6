//! Headless simulation runner.
//!
//! Runs a seeded game for a number of days and prints a summary.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                           # one year in the forest
//!   cargo run --bin simulate -- --days 3650 --seed 7   # a decade, reproducible
//!   RUST_LOG=ascension=debug cargo run --bin simulate  # follow the log

use std::error::Error;
use std::path::PathBuf;

use ascension::character::Location;
use ascension::farm::Crop;
use ascension::followers::FollowerJob;
use ascension::{Game, GameConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Run the cultivation simulation without a UI")]
struct Args {
    /// Days to simulate
    #[arg(long, default_value_t = 365)]
    days: u64,

    /// Random seed for reproducibility (overrides the config file)
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the character spends their days
    #[arg(long, default_value = "forest")]
    location: Location,

    /// Hunters to hire before starting
    #[arg(long, default_value_t = 1)]
    hunters: u32,

    /// Print the final save as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ascension=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    config.seed = Some(args.seed);
    config.starting_money = config.starting_money.max(args.hunters as f64 * 10.0);

    let mut game = Game::new(config)?;
    game.world.travel(args.location);
    game.world.plow(Crop::Rice);
    for _ in 0..args.hunters {
        game.world.hire(FollowerJob::Hunter);
    }

    game.run_days(args.days);

    if args.json {
        println!("{}", game.save_json()?);
        return Ok(());
    }

    let world = &game.world;
    let character = &world.character;
    println!("Ascension simulation");
    println!("====================");
    println!("Seed:        {}", args.seed);
    println!("Days run:    {}", game.clock.elapsed_days);
    println!("Ticks run:   {}", game.clock.elapsed_ticks);
    if game.is_paused() {
        println!("Stopped:     auto-paused");
    }
    println!();
    println!("Lives:       {}", character.lives);
    println!("Age:         {:.1} years", character.age as f64 / 365.0);
    println!("Health:      {:.0} / {:.0}", character.status.health.value, character.status.health.max);
    println!("Money:       {:.0}", character.money);
    println!("Hell money:  {:.0}", character.hell_money);
    println!("Home:        {}", world.home.current().name);
    println!("Followers:   {}", world.followers.len());
    println!("Kills:       {}", world.battle.total_kills);
    println!("Times fled:  {}", world.battle.times_fled);
    println!("Techniques:  {}", world.battle.techniques.len());
    println!();
    println!("Recent log:");
    for entry in world.log.recent(10) {
        println!("  [{}] {}", entry.topic.name(), entry.message);
    }

    Ok(())
}
