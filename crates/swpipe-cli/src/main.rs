//! swpipe: SEAL + Walrus encrypt/upload/download/decrypt walk-through
//!
//! Commands:
//!   run --file <path>          - run the full pipeline on one file
//!   config show                - display the merged configuration
//!   document-id <allowlist-id> - print the DocumentId for an allowlist id
//!
//! Environment: MODE, OUTPUT_DIR, ALLOWLIST_ID, WALRUS_NODE_URL, SUI_RPC_URL,
//! ALLOWLIST_PACKAGE, ADMIN_PRIVATE_KEY, USER_PRIVATE_KEY.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use swpipe_core::config::SwConfig;
use swpipe_core::{Keyspace, Mode, SwError};
use swpipe_pipeline::{select_backend, Pipeline, PipelineRequest, RunSummary};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "swpipe",
    version,
    about = "SEAL + Walrus encryption pipeline",
    long_about = "swpipe: encrypt a file, upload it, download it back, decrypt and verify"
)]
struct Cli {
    /// Path to swpipe.toml configuration file
    #[arg(long, short = 'c', env = "SWPIPE_CONFIG", default_value = "swpipe.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "SWPIPE_LOG")]
    log: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, env = "SWPIPE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt, upload, download, decrypt and verify one file
    Run {
        /// Path to the file to encrypt
        #[arg(long)]
        file: PathBuf,
        /// Output base directory (overrides OUTPUT_DIR and config)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Blob store keyspace
        #[arg(long)]
        walrus_key: Option<String>,
        /// Backend mode (overrides MODE and config)
        #[arg(long)]
        mode: Option<String>,
        /// Allowlist identifier (overrides ALLOWLIST_ID and config)
        #[arg(long)]
        allowlist_id: Option<String>,
        /// Remove the envelope and decrypted output when done
        #[arg(long)]
        cleanup: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print the DocumentId derived from an allowlist identifier
    #[command(name = "document-id")]
    DocumentId {
        allowlist_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (defaults + config file + environment)
    Show,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (mut config, found) = load_config(&cli.config).await?;
    config
        .apply_env(|k| std::env::var(k).ok())
        .context("reading environment")?;

    let level = cli.log.clone().unwrap_or_else(|| config.logging.level.clone());
    let format = match cli.log_format.clone() {
        Some(f) => f,
        None => parse_log_format(&config.logging.format)?,
    };
    init_logging(&level, &format);

    if !found {
        warn!("config file not found: {}  (using defaults)", cli.config.display());
    }

    match cli.command {
        Commands::Run {
            file,
            out,
            walrus_key,
            mode,
            allowlist_id,
            cleanup,
        } => {
            apply_run_flags(&mut config, out, walrus_key, mode, allowlist_id, cleanup)?;
            cmd_run(&config, &file).await
        }
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &cli.config),
        Commands::DocumentId { allowlist_id } => {
            println!("{}", swpipe_crypto::document_id_for_allowlist(&allowlist_id));
            Ok(())
        }
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

async fn load_config(path: &Path) -> Result<(SwConfig, bool)> {
    if path.exists() {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config: {}", path.display()))?;
        Ok((config, true))
    } else {
        Ok((SwConfig::default(), false))
    }
}

/// Command-line flags take precedence over environment and file.
fn apply_run_flags(
    config: &mut SwConfig,
    out: Option<PathBuf>,
    walrus_key: Option<String>,
    mode: Option<String>,
    allowlist_id: Option<String>,
    cleanup: bool,
) -> Result<()> {
    if let Some(out) = out {
        config.pipeline.output_dir = out;
    }
    if let Some(key) = walrus_key {
        config.pipeline.keyspace = Keyspace::new(&key).context("--walrus-key")?;
    }
    if let Some(mode) = mode {
        config.pipeline.mode = mode.parse::<Mode>().context("--mode")?;
    }
    if let Some(id) = allowlist_id {
        config.pipeline.allowlist_id = Some(id);
    }
    if cleanup {
        config.pipeline.cleanup = true;
    }
    Ok(())
}

fn parse_log_format(s: &str) -> Result<LogFormat> {
    LogFormat::from_str(s, true)
        .map_err(|_| anyhow::anyhow!("unknown log format '{s}' (expected json or text)"))
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}

// ── `swpipe run` ──────────────────────────────────────────────────────────────

async fn cmd_run(config: &SwConfig, file: &Path) -> Result<()> {
    let allowlist_id = config.require_allowlist_id()?.to_string();

    let backend = select_backend(config, |k| std::env::var(k).ok())
        .context("selecting backend")?;

    let request = PipelineRequest {
        input: std::path::absolute(file)
            .with_context(|| format!("resolving input path: {}", file.display()))?,
        allowlist_id,
        keyspace: config.pipeline.keyspace.clone(),
        output_dir: config.pipeline.output_dir.clone(),
    };

    let mut pipeline = Pipeline::new(backend, request);
    let result = pipeline.run().await;

    if config.pipeline.cleanup {
        pipeline.cleanup().await;
    }

    match result {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            // the failing step has already been logged
            println!("{}", failure_line(&e));
            Err(anyhow::Error::new(e).context(format!(
                "pipeline failed (mode {})",
                config.pipeline.mode
            )))
        }
    }
}

/// Status line for a failed run. Only a plaintext mismatch is a failed
/// verification; any other error stopped the pipeline before it got there.
fn failure_line(e: &SwError) -> String {
    match e {
        SwError::Verification(_) => "verification: FAIL".to_string(),
        other => format!("pipeline failed: {}", other.kind()),
    }
}

fn print_summary(summary: &RunSummary) {
    info!(document_id = %summary.document_id, blob_id = %summary.blob_id, "done");
    println!();
    println!("=== Done ===");
    println!("documentId:   {}", summary.document_id);
    println!("allowlist tx: {}", summary.allowlist_tx);
    println!("encrypted:    {} ({} bytes)", summary.encrypted_path.display(), summary.envelope_len);
    println!("blobId:       {}", summary.blob_id);
    println!("downloaded:   {} bytes", summary.downloaded_len);
    println!("decrypted:    {} ({} bytes)", summary.decrypted_path.display(), summary.plaintext_len);
    println!("verification: PASS");
    println!("mode:         {}", summary.mode);
}

// ── `swpipe config show` ──────────────────────────────────────────────────────

fn cmd_config_show(config: &SwConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}
