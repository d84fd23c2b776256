use anyhow::Result;
use clap::{Parser, Subcommand};
use odk_config::DEFAULT_LOG_FILTER;

mod commands;

#[derive(Parser)]
#[command(name = "odk")]
#[command(about = "OrderDesk quantity-entry CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> local...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Replay a scripted session against a basket and print every commit
    Replay {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Line items (YAML or JSON list)
        #[arg(long)]
        basket: String,

        /// Session steps (YAML or JSON list)
        #[arg(long)]
        script: String,

        /// Append applied changes to this JSONL journal
        #[arg(long)]
        journal: Option<String>,

        /// Fail instead of warn when the config has keys nothing reads
        #[arg(long, default_value_t = false)]
        strict_config: bool,
    },

    /// Change journal utilities
    Journal {
        #[command(subcommand)]
        cmd: JournalCmd,
    },
}

#[derive(Subcommand)]
enum JournalCmd {
    /// Verify the hash chain of a journal file
    Verify {
        /// Path to the JSONL journal
        path: String,
    },
}

fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            init_tracing(DEFAULT_LOG_FILTER);
            let loaded = commands::load_config(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Replay {
            config_paths,
            basket,
            script,
            journal,
            strict_config,
        } => {
            let loaded = commands::load_config(&config_paths)?;
            init_tracing(&loaded.log_filter()?);

            let args = commands::replay::ReplayArgs {
                basket,
                script,
                journal,
                strict_config,
            };
            let mut stdout = std::io::stdout().lock();
            commands::replay::run(&args, &loaded, &mut stdout)?;
        }

        Commands::Journal { cmd } => match cmd {
            JournalCmd::Verify { path } => {
                init_tracing(DEFAULT_LOG_FILTER);
                commands::journal::verify(&path)?;
            }
        },
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise the configured filter. Logs go to stderr so
/// stdout stays machine-readable.
fn init_tracing(fallback: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}
