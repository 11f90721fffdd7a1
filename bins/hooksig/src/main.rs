//! hooksig - verify captured webhook deliveries
//!
//! Reads a raw body plus its delivery headers and checks them against the
//! shared signing secret, exiting non-zero with a per-cause status on failure.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hooksig_cli::output::{format_size, Status};
use hooksig_core::config::{Config, VerifierConfig};
use hooksig_core::timestamp::now_unix;
use hooksig_core::{exit_codes, ConfigError, DeliveryHeaders, HeaderField, Verifier};
use hooksig_crypto::WebhookSecret;
use hooksig_telemetry::TelemetryConfig;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hooksig")]
#[command(about = "Verify signed webhook deliveries")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a hooksig.toml configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a delivery body against its headers
    Verify {
        /// Raw request body file, or `-` for stdin
        #[arg(short, long)]
        payload: PathBuf,

        /// Delivery header as `name: value` (repeatable)
        #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// JSON object of delivery headers
        #[arg(long)]
        headers_file: Option<PathBuf>,

        /// Signing secret (`whsec_` prefix optional)
        #[arg(long, env = "HOOKSIG_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// Timestamp tolerance in seconds
        #[arg(long)]
        tolerance: Option<u64>,

        /// Check against this Unix time instead of the system clock
        #[arg(long)]
        at: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that a secret decodes
    CheckSecret {
        /// Signing secret (`whsec_` prefix optional)
        #[arg(long, env = "HOOKSIG_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            Status::error(&e.to_string());
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.schema.logging.level.clone()
    };
    hooksig_telemetry::init_with_config(TelemetryConfig::with_level(level))?;
    tracing::debug!(path = ?config.path, "Configuration loaded");

    let result = match cli.command {
        Commands::Verify {
            payload,
            headers,
            headers_file,
            secret,
            tolerance,
            at,
            json,
        } => {
            let mut settings = config.schema.verifier.clone();
            if secret.is_some() {
                settings.secret = secret;
            }
            if let Some(tolerance) = tolerance {
                settings.tolerance_secs = tolerance;
            }
            let request = Delivery {
                payload: read_payload(&payload)?,
                headers: collect_headers(headers_file.as_deref(), headers)?,
            };
            run_verify(&settings, &request, at, json)?
        }
        Commands::CheckSecret { secret } => {
            run_check_secret(secret.or(config.schema.verifier.secret))
        }
    };

    std::process::exit(result);
}

/// Body and headers of one captured delivery
struct Delivery {
    payload: Vec<u8>,
    headers: DeliveryHeaders,
}

fn run_verify(settings: &VerifierConfig, delivery: &Delivery, at: Option<i64>, json: bool) -> Result<i32> {
    let verifier = match Verifier::from_config(settings) {
        Ok(verifier) => verifier,
        Err(ConfigError::Verifier(e)) => {
            Status::rejected(&e);
            return Ok(exit_codes::for_code(e.code()));
        }
        Err(e) => {
            Status::error(&format!("{e} (use --secret, HOOKSIG_SECRET or [verifier] secret)"));
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let now = at.unwrap_or_else(now_unix);
    tracing::debug!(
        id = delivery.headers.field(HeaderField::Id).unwrap_or("<missing>"),
        now,
        tolerance_secs = verifier.tolerance().as_secs(),
        "Verifying delivery"
    );

    match verifier.verify_at(&delivery.payload, &delivery.headers, now) {
        Ok(payload) => {
            if json {
                let out = serde_json::json!({ "verified": true, "payload": payload });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                Status::success("Delivery verified");
                if let Some(id) = delivery.headers.field(HeaderField::Id) {
                    Status::field("id", id);
                }
                Status::field("size", &format_size(delivery.payload.len()));
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            tracing::warn!(code = %e.code(), category = e.code().category(), "Delivery rejected");
            if json {
                let out = serde_json::json!({ "verified": false, "error": e.to_report() });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                Status::rejected(&e);
            }
            Ok(exit_codes::for_code(e.code()))
        }
    }
}

fn run_check_secret(secret: Option<String>) -> i32 {
    let Some(secret) = secret else {
        Status::error("No webhook secret configured (use --secret, HOOKSIG_SECRET or [verifier] secret)");
        return exit_codes::CONFIG_ERROR;
    };

    match WebhookSecret::decode(&secret) {
        Ok(decoded) => {
            if decoded.len() < 16 {
                Status::warning(&format!("Secret is only {} bytes", decoded.len()));
            }
            Status::success(&format!("Secret decodes to {} bytes", decoded.len()));
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&format!("Invalid secret: {e}"));
            exit_codes::INVALID_SECRET
        }
    }
}

fn read_payload(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read payload from stdin")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("Failed to read payload {}", path.display()))
}

/// Headers from `--headers-file`, then `-H` flags on top
fn collect_headers(file: Option<&Path>, flags: Vec<(String, String)>) -> Result<DeliveryHeaders> {
    let mut headers = match file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read headers file {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Headers file {} is not a JSON object of strings", path.display()))?
        }
        None => DeliveryHeaders::new(),
    };
    for (name, value) in flags {
        headers.insert(name, value);
    }
    Ok(headers)
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `name: value`, got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {raw:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
