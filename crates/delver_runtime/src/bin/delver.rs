//! Delver CLI entry point.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use delver_engine::{Game, GameConfig};
use delver_runtime::{AnsiDisplay, DEMO_ADVENTURE, FileSaveStore, Repl};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    adventure: Option<PathBuf>,
    saves: Option<PathBuf>,
    seed: Option<u64>,
    fast: bool,
    verbose: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-v" | "--verbose" => config.verbose = true,
            "--fast" => config.fast = true,
            "-s" | "--seed" => {
                i += 1;
                if i >= args.len() {
                    return Err("--seed requires a value".into());
                }
                config.seed = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("invalid --seed value: {}", args[i]))?,
                );
            }
            "--saves" => {
                i += 1;
                if i >= args.len() {
                    return Err("--saves requires a directory".into());
                }
                config.saves = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => {
                if config.adventure.is_some() {
                    return Err(format!("only one adventure can be played at a time: {path}").into());
                }
                config.adventure = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("delver=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("delver=warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("delver {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging(config.verbose);

    let json = match &config.adventure {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("failed to read adventure '{}': {e}", path.display()))?,
        None => DEMO_ADVENTURE.to_string(),
    };

    let mut game_config = GameConfig::interactive();
    if config.fast {
        game_config = game_config.with_delay_time(Duration::ZERO);
    }
    if let Some(seed) = config.seed {
        game_config = game_config.with_seed(seed);
    }

    let mut game = Game::from_json(&json, game_config)?.with_display(AnsiDisplay::stdout());
    if let Some(dir) = &config.saves {
        game = game.with_save_store(FileSaveStore::open(dir)?);
    }
    info!(adventure = %game.info.name, "adventure ready");

    Repl::new(game)?.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mDelver\x1b[0m - Turn-based text adventures

\x1b[1mUSAGE:\x1b[0m
    delver [OPTIONS] [ADVENTURE.json]

\x1b[1mARGUMENTS:\x1b[0m
    [ADVENTURE.json]    Adventure to play (default: the built-in demo)

\x1b[1mOPTIONS:\x1b[0m
    -h, --help          Print help information
    -V, --version       Print version information
    -s, --seed N        Seed the dice for a repeatable game
    --saves DIR         Keep saved games in DIR (default: in memory)
    --fast              Skip pauses between combat messages
    -v, --verbose       Log debug output to stderr

\x1b[1mEXAMPLES:\x1b[0m
    delver                         Play the demo adventure
    delver castle.json             Play castle.json
    delver --saves ~/.delver       Keep saved games between sessions
    RUST_LOG=delver_engine=trace delver -s 7
                                   Watch every dice roll

\x1b[1mIN GAME:\x1b[0m
    Tab                 Complete a command
    Enter               Continue after a page of text
    Ctrl+D              Leave the game
    Ctrl+C twice        Leave the game

For more information, visit https://github.com/ndouglas/delver"
    );
}
