//! Envelope CLI
//!
//! Inspect, build and check typed envelopes from the command line.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use typed_envelope::{Codec, DynamicMessage, Envelope, EnvelopeConfig, EnvelopeError, OutputFormat};

#[derive(Parser)]
#[command(name = "envelope")]
#[command(about = "Inspect, build and check typed envelopes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the type and payload of an envelope
    Inspect {
        /// Envelope file ("-" for stdin)
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Print the parsed envelope as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build an envelope from a type and JSON payload
    Wrap {
        /// Discriminator for the envelope
        #[arg(short = 't', long = "type")]
        message_type: String,

        /// JSON payload (defaults to an empty object)
        #[arg(short, long)]
        data: Option<String>,

        /// Pretty-print the envelope
        #[arg(long)]
        pretty: bool,
    },

    /// Decode envelopes against the configured known types
    Check {
        /// Envelope files ("-" for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// View and manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path
        #[arg(short, long, default_value = "envelope.toml")]
        output: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Inspect { input, json } => {
            let bytes = read_input(&input)?;
            let envelope = Envelope::from_slice(&bytes)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            } else {
                println!("📨 Type: {}", envelope.message_type);
                match &envelope.data {
                    Some(data) => {
                        println!("   Data:");
                        println!("{}", serde_json::to_string_pretty(data)?);
                    }
                    None => println!("   Data: (absent)"),
                }
            }
            Ok(())
        }

        Commands::Wrap {
            message_type,
            data,
            pretty,
        } => {
            let data: Value = match data {
                Some(raw) => serde_json::from_str(&raw).context("--data is not valid JSON")?,
                None => Value::Object(serde_json::Map::new()),
            };
            let format = if pretty {
                OutputFormat::Pretty
            } else {
                OutputFormat::Compact
            };

            // Nothing is registered here; force_decode skips the registry.
            let codec = Codec::with_format(format);
            let bytes = codec.force_decode(&DynamicMessage::new(message_type, data))?;
            println!("{}", String::from_utf8(bytes)?);
            Ok(())
        }

        Commands::Check { files, config } => {
            let cfg = EnvelopeConfig::load_from(config.as_deref())?;
            let codec = cfg.build_codec();
            if codec.is_empty() {
                warn!("no known types configured; every envelope will be rejected");
            }

            println!("🔍 Checking {} envelope(s) against {} known type(s)", files.len(), codec.len());
            println!();

            let mut failures = 0;
            for file in &files {
                let bytes = read_input(file)?;
                match codec.encode(&bytes) {
                    Ok(message) => {
                        println!("  ✅ {} - {}", file.display(), message.discriminator());
                    }
                    Err(err) => {
                        failures += 1;
                        println!("  ❌ {} - {}", file.display(), err);
                        if let EnvelopeError::UnregisteredType { message_type } = &err {
                            let suggestions = codec.suggest(message_type, cfg.registry.suggestion_limit);
                            if !suggestions.is_empty() {
                                println!("     └─ did you mean: {}", suggestions.join(", "));
                            }
                        }
                    }
                }
            }

            println!();
            if failures > 0 {
                println!("❌ {} of {} envelope(s) failed", failures, files.len());
                std::process::exit(1);
            }
            println!("✅ All envelopes decoded");
            Ok(())
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show { config, json } => {
                let cfg = EnvelopeConfig::load_from(config.as_deref())?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&cfg)?);
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
                Ok(())
            }

            ConfigCommands::Init { output } => {
                if Path::new(&output).exists() {
                    anyhow::bail!("{} already exists", output);
                }
                EnvelopeConfig::default()
                    .save(&output)
                    .with_context(|| format!("failed to write {}", output))?;
                println!("✅ Created {}", output);
                Ok(())
            }
        },
    }
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}
