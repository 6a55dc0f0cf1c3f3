use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use cellwars::{
    visualize_grid, ActionRegistry, GameConfig, GameResult, Phase, Player, TurnCoordinator,
    TurnOutcome,
};
use cellwars_net::{PeerLink, Recorder};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Path to a game config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host a game and wait for another peer to join
    #[arg(long, conflicts_with = "join")]
    host: bool,

    /// Join a game hosted at this address
    #[arg(long)]
    join: Option<String>,

    /// Port to host on or connect to, overriding the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Record each game's turns as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

/// Plays every local turn with a random action on a random cell.
fn play_random_move(coordinator: &mut TurnCoordinator, rng: &mut StdRng) {
    let action = rng.gen_range(0..coordinator.actions().len());
    let x = rng.gen_range(0..coordinator.grid().width()) as i32;
    let y = rng.gen_range(0..coordinator.grid().height()) as i32;
    debug!(action, x, y, "Choosing move");
    coordinator.select_action(action);
    coordinator.pick_cell(x, y);
}

fn play_game(
    coordinator: &mut TurnCoordinator,
    rng: &mut StdRng,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<GameResult> {
    let start = Instant::now();
    loop {
        if coordinator.phase() == &Phase::AwaitingSelection && coordinator.is_local_turn() {
            play_random_move(coordinator, rng);
        }

        let now_ms = start.elapsed().as_millis() as u64;
        if let Some(resolved) = coordinator.tick(now_ms) {
            println!(
                "Turn {}, {} played {}:\n{}",
                resolved.turn,
                resolved.player,
                resolved.result.action_name,
                visualize_grid(coordinator.grid())
            );
            if let Some(recorder) = recorder {
                recorder.store_turn(&resolved);
            }
            if let TurnOutcome::GameEnded(result) = resolved.outcome {
                return Ok(result);
            }
        }

        // Once the link is down, everything the peer sent is already queued
        // and the tick above would have taken it.
        if coordinator.is_networked()
            && !coordinator.is_peer_connected()
            && coordinator.phase() == &Phase::AwaitingSelection
            && !coordinator.is_local_turn()
        {
            anyhow::bail!("Lost the connection to the other player");
        }

        thread::sleep(Duration::from_millis(1));
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(port) = args.port {
        config.port = port;
    }

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let automaton_rng = StdRng::seed_from_u64(rng.gen());

    let mut recorder = if let Some(dir_path) = args.record_games_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let link = if args.host {
        Some(PeerLink::host(config.port)?)
    } else if let Some(address) = &args.join {
        Some(PeerLink::join(address, config.port)?)
    } else {
        None
    };
    let mut coordinator = match link {
        Some(link) => {
            let local_player = link.role().local_player();
            info!(peer = %link.peer_addr(), %local_player, "Starting networked game");
            TurnCoordinator::networked(
                &config,
                ActionRegistry::default(),
                automaton_rng,
                Box::new(link),
                local_player,
            )
        }
        None => TurnCoordinator::new(&config, ActionRegistry::default(), automaton_rng),
    };

    let result = play_game(&mut coordinator, &mut rng, &mut recorder);
    coordinator.disconnect();
    let result = result?;

    eprintln!(
        "End result:\n- {} cells conquered by {}\n- {} cells conquered by {}\n- {}",
        coordinator.conquered(Player::One),
        Player::One,
        coordinator.conquered(Player::Two),
        Player::Two,
        match result {
            GameResult::WonByPlayer { player } => format!("{} wins", player),
            GameResult::Tie => String::from("Tie"),
        }
    );

    if let Some(recorder) = &mut recorder {
        let path = recorder.write_game_recording(Some(result))?;
        info!(path = %path.display(), "Wrote game recording");
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
