mod commands;
mod config;
mod render;

use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser;
use tictactoe_engine::config::{ConfigManager, FileConfigSource, Validate};
use tictactoe_engine::{GameBroadcaster, TicTacToeSession, log, logger};
use tokio::sync::mpsc;

use commands::{ClientCommand, CommandParseError, HELP_TEXT, parse_command};
use config::{Config, get_config_manager};
use render::{TerminalBroadcaster, render_state};

#[derive(Parser)]
#[command(name = "tictactoe_terminal")]
struct Args {
    /// Config file to use instead of the one next to the executable
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides game.ai_move_delay_ms from the config file
    #[arg(long)]
    ai_delay_ms: Option<u64>,
    #[arg(long)]
    no_cell_hints: bool,
    #[arg(long)]
    use_log_prefix: bool,
}

fn load_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let manager: ConfigManager<FileConfigSource, Config> = match args.config {
        Some(ref path) => ConfigManager::from_yaml_file(path),
        None => get_config_manager(),
    };
    let mut config = manager.get_config()?;

    if let Some(delay) = args.ai_delay_ms {
        config.game.ai_move_delay_ms = delay;
    }
    if args.no_cell_hints {
        config.show_cell_hints = false;
    }
    config.validate()?;
    Ok(config)
}

/// Reads stdin on a plain thread; a blocking read would otherwise hold up
/// runtime shutdown.
fn spawn_stdin_reader(command_tx: mpsc::UnboundedSender<Result<ClientCommand, CommandParseError>>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let command = parse_command(&line);
            if command == Err(CommandParseError::Empty) {
                continue;
            }
            if command_tx.send(command).is_err() {
                break;
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let prefix = match config.game.log_prefix {
        Some(ref prefix) => Some(prefix.clone()),
        None if args.use_log_prefix => Some("TicTacToe".to_string()),
        None => None,
    };
    logger::init_logger(prefix, config.game.log_level);

    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
    let broadcaster = TerminalBroadcaster::new(frame_tx, config.show_cell_hints);
    let session = TicTacToeSession::from_config("local", &config.game, broadcaster.clone());

    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(command_tx);

    log!(
        "Starting tic-tac-toe (AI delay {} ms)",
        config.game.ai_move_delay_ms
    );
    println!("{}\n", HELP_TEXT);
    broadcaster.broadcast_state(session.get_state().await).await;

    loop {
        tokio::select! {
            Some(frame) = frame_rx.recv() => {
                println!("\n{}", frame);
            }
            command = command_rx.recv() => {
                let Some(command) = command else {
                    break;
                };
                match command {
                    Ok(ClientCommand::PlaceMark(index)) => {
                        if !session.submit_move(index).await {
                            println!("Cell {} is not available right now", index);
                        }
                    }
                    Ok(ClientCommand::Reset) => session.reset().await,
                    Ok(ClientCommand::ShowState) => {
                        let state = session.get_state().await;
                        println!("\n{}", render_state(&state, config.show_cell_hints));
                    }
                    Ok(ClientCommand::Help) => println!("{}", HELP_TEXT),
                    Ok(ClientCommand::Quit) => break,
                    Err(e) => println!("{}", e),
                }
            }
        }
    }

    session.shutdown().await;
    let tally = session.get_state().await.tally;
    log!(
        "Leaving after {} games ({})",
        tally.games_played(),
        render::render_tally(&tally)
    );
    Ok(())
}
