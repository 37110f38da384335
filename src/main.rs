#[cfg(not(feature = "service"))]
fn main() {}

#[cfg(feature = "service")]
use clap::{Parser, Subcommand};
#[cfg(feature = "service")]
use hexfleet::{init_logging, service, EngineConfig, GameApi, GameEngine, Ruleset};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "service")]
enum Commands {
    /// Feed a file of JSON moves (one per line) through a fresh engine.
    Replay {
        /// File holding one JSON move per line; blank lines are skipped.
        moves: std::path::PathBuf,
        #[arg(long, help = "JSON engine config with players and ruleset")]
        config: Option<std::path::PathBuf>,
        #[arg(long, help = "Ruleset name, overrides the config file")]
        ruleset: Option<String>,
    },
    /// Print the move table of a ruleset.
    Rules {
        #[arg(long, default_value = hexfleet::DEFAULT_RULESET)]
        ruleset: String,
    },
}

#[cfg(feature = "service")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            moves,
            config,
            ruleset,
        } => {
            let mut engine_config = match config {
                Some(path) => EngineConfig::from_json(&tokio::fs::read_to_string(path).await?)?,
                None => EngineConfig::default(),
            };
            if ruleset.is_some() {
                engine_config.ruleset = ruleset;
            }
            let engine = GameEngine::from_config(&engine_config)?;
            let (mut handle, server) = service::spawn(engine);

            let raw = tokio::fs::read_to_string(moves).await?;
            for (line_no, line) in raw.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let result = handle.input_move_json(line).await?;
                println!(
                    "#{:<3} valid={:<5} processed={:<5} {}",
                    line_no + 1,
                    result.valid,
                    result.processed,
                    result.error.as_deref().unwrap_or("")
                );
            }

            let state = handle.game_state().await?;
            drop(handle);
            server.await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Commands::Rules { ruleset } => {
            let rules = Ruleset::by_name(&ruleset)?;
            println!(
                "{}: {}x{} board, ships {:?}",
                rules.name(),
                rules.rows(),
                rules.columns(),
                rules.ship_list()
            );
            for rule in rules.rules() {
                let fields: Vec<&str> = rule.requires.iter().map(|f| f.key()).collect();
                println!(
                    "  {:<13} states={:?} target={:?} requires=[{}]",
                    rule.move_type.name(),
                    rule.valid_states,
                    rule.valid_target,
                    fields.join(", ")
                );
            }
        }
    }
    Ok(())
}
