use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use pirate_vault_core::*;
use time::OffsetDateTime;

mod logger;
mod play;
mod store;
mod watch;

#[derive(Parser, Debug)]
#[command(version, about = "Earn and spend Pirate Coins from the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Directory holding counters.json and ledger.json
    #[arg(long, default_value = ".pirate-vault")]
    data_dir: PathBuf,

    /// TOML file overriding the reward settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Whose coins to move
    #[arg(short, long)]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play minesweeper, wins pay out up to the daily limit
    Play {
        #[arg(short, long, default_value_t = Difficulty::Easy)]
        difficulty: Difficulty,

        /// Force a seed instead of random
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Watch a video and earn coins every interval
    Watch {
        #[arg(long, default_value = "featured")]
        video: String,

        #[arg(long, default_value_t = 3)]
        minutes: u64,

        /// Wait for the wall clock instead of simulating the ticks
        #[arg(long)]
        realtime: bool,
    },
    /// Show the balance and the latest transactions
    Balance {
        #[arg(long, default_value_t = 10)]
        last: usize,
    },
    /// Spend coins on a catalog entry
    Unlock {
        game: String,

        #[arg(long)]
        price: u64,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RewardConfig> {
    let Some(path) = path else {
        return Ok(RewardConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Could not parse config {}", path.display()))
}

fn random_seed() -> u64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as u64
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(level) = args.verbose.log_level() {
        logger::init(level.to_level_filter()).context("Error initializing logger")?;
    }

    let user = args.user.trim();
    anyhow::ensure!(!user.is_empty(), "user name must not be empty");

    let config = load_config(args.config.as_deref())?;
    log::debug!("{:?}", config);
    let data = store::DataDir::open(&args.data_dir)?;
    let mut ledger = data.ledger()?;
    let clock = SystemClock::new();

    match args.command {
        Command::Play { difficulty, seed } => {
            let seed = seed.unwrap_or_else(random_seed);
            log::debug!("seed: {}", seed);
            let mut rewards = GameRewards::new(data.counter_store()?, &config);
            let plays_left = rewards.plays_left(user, clock.today())?;
            println!(
                "{} board, {} rewarded games left today. r ROW COL reveals, f ROW COL flags",
                difficulty, plays_left
            );

            let mut round = Round::new(difficulty, seed, &clock)?;
            let mut ctx = play::PlayContext {
                user,
                rewards: &mut rewards,
                grant: &mut ledger,
            };
            play::play(&mut ctx, &mut round, random_seed, io::stdin().lock(), io::stdout())?;
        }
        Command::Watch {
            video,
            minutes,
            realtime,
        } => {
            let mut scheduler = RewardScheduler::new(config.watch);
            let plan = watch::WatchPlan {
                video: VideoRef::new(video.clone(), video),
                seconds: minutes * 60,
                realtime,
            };
            watch::watch(&mut scheduler, &mut ledger, &clock, user, plan, io::stdout())?;
        }
        Command::Balance { last } => {
            let ledger = ledger.ledger();
            println!("{}: {} Pirate Coins", user, ledger.balance(user));
            let transactions: Vec<_> = ledger.transactions(user).collect();
            for tx in transactions.iter().rev().take(last) {
                let sign = match tx.kind {
                    TransactionKind::Earn => '+',
                    TransactionKind::Spend => '-',
                };
                println!("#{:<5} {}{:<6} {}", tx.id, sign, tx.amount, tx.description);
            }
        }
        Command::Unlock { game, price } => {
            let balance = ledger.spend(user, price, &format!("Unlocked {game}"))?;
            println!("Unlocked {}, {} Pirate Coins left", game, balance);
        }
    }

    Ok(())
}
