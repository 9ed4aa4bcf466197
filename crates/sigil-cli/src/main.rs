//! Sigil CLI - operator tool for Sigil agents.

use clap::{Parser, Subcommand};
use sigil_github::{ReadmeClientConfig, DEFAULT_API_BASE};
use sigil_identity::DEFAULT_KEY_PATH;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Sigil - agent identity and README summaries
#[derive(Parser, Debug)]
#[command(name = "sigil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the agent identity
    Identity {
        #[command(subcommand)]
        command: IdentityCommands,
    },

    /// Decode a did:key
    Did {
        /// The DID to inspect
        did: String,
    },

    /// Compute a SHA-256 code fingerprint
    Fingerprint {
        /// File to hash (default: this executable)
        path: Option<PathBuf>,
    },

    /// Issue an attestation for a code artifact
    Attest {
        /// Artifact to fingerprint
        artifact: PathBuf,
        /// Key file
        #[arg(short, long, env = "SIGIL_KEY_PATH", default_value = DEFAULT_KEY_PATH)]
        key_path: PathBuf,
    },

    /// Verify an attestation document
    Verify {
        /// Path to the attestation JSON
        attestation: PathBuf,
    },

    /// Fetch and summarize a repository README
    Readme {
        /// Repository URL or owner/name
        url: String,
        /// GitHub API base URL
        #[arg(long, env = "SIGIL_GITHUB_API", default_value = DEFAULT_API_BASE)]
        github_api: String,
        /// GitHub token
        #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
        github_token: Option<String>,
        /// Summary length in characters
        #[arg(long, default_value_t = 600)]
        max_chars: usize,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
enum IdentityCommands {
    /// Create the identity if it does not exist
    Init {
        /// Key file
        #[arg(short, long, env = "SIGIL_KEY_PATH", default_value = DEFAULT_KEY_PATH)]
        key_path: PathBuf,
    },

    /// Show the current identity
    Show {
        /// Key file
        #[arg(short, long, env = "SIGIL_KEY_PATH", default_value = DEFAULT_KEY_PATH)]
        key_path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("sigil={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut out = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Identity { command } => match command {
            IdentityCommands::Init { key_path } => commands::identity_init(&mut out, &key_path),
            IdentityCommands::Show { key_path } => commands::identity_show(&mut out, &key_path),
        },
        Commands::Did { did } => commands::did_inspect(&mut out, &did),
        Commands::Fingerprint { path } => commands::fingerprint(&mut out, path.as_deref()),
        Commands::Attest { artifact, key_path } => {
            commands::attest(&mut out, &key_path, &artifact)
        }
        Commands::Verify { attestation } => commands::verify(&mut out, &attestation),
        Commands::Readme {
            url,
            github_api,
            github_token,
            max_chars,
        } => {
            let config = ReadmeClientConfig {
                api_base: github_api,
                token: github_token.filter(|t| !t.is_empty()),
                ..ReadmeClientConfig::default()
            };
            commands::readme(&mut out, &url, config, max_chars)
        }
        Commands::Version => {
            println!("sigil {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
