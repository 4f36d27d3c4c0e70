//! `leadline` CLI: drive the lead submission pipeline from a terminal.
//!
//! Useful for verifying store credentials before a launch, previewing how a
//! contact number will be normalized, and pushing a lead through the exact
//! pipeline the landing page uses.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use leadline_core::classify::probe_failed;
use leadline_core::fingerprint::{fingerprint, identity_hash};
use leadline_core::validation::{format_contact_number, sanitize_text, validate_contact_number};
use leadline_core::{
    ConnectionStatus, DEFAULT_NETWORK_IDENTIFIER, MISSING_STORE_CONFIGURATION, PipelineConfig,
    SubmissionInput, SubmissionOutcome, SubmissionPipeline,
};
use leadline_store::{MemoryStore, PostgrestStore, StoreConfig, StoreError, SubmissionStore};

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ── CLI structure ────────────────────────────────────────────────────

/// leadline: lead capture submission pipeline.
#[derive(Parser)]
#[command(
    name = "leadline",
    version,
    about = "leadline CLI: check the lead store, preview normalization, submit leads",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         LEADLINE_STORE_URL   Store base URL (fallback: SUPABASE_URL)\n  \
         LEADLINE_STORE_KEY   Store API key (fallback: SUPABASE_ANON_KEY)\n  \
         LEADLINE_TABLE       Submissions table (default: use_case_submissions)\n  \
         LEADLINE_LOG         Log filter (default: warn)\n\n\
         {DIM}Examples:{RESET}\n  \
         leadline check\n  \
         leadline normalize --contact-number 9876543210\n  \
         leadline submit --contact-number 9876543210 --domain 'Beauty & Cosmetics' \\\n    \
         --platform Instagram --pain-point 'Answering price questions all day' --consent"
    ),
)]
struct Cli {
    /// Store base URL. Falls back to `SUPABASE_URL` when unset.
    #[arg(long, global = true, env = "LEADLINE_STORE_URL")]
    store_url: Option<String>,

    /// Store API key. Falls back to `SUPABASE_ANON_KEY` when unset.
    #[arg(long, global = true, env = "LEADLINE_STORE_KEY", hide_env_values = true)]
    store_key: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the store is reachable and the API key is accepted.
    Check,
    /// Show how a submission would be normalized, without sending it.
    Normalize {
        /// Contact number as a user would type it.
        #[arg(long)]
        contact_number: String,
        /// Business domain (needed for the fingerprint).
        #[arg(long)]
        domain: Option<String>,
        /// Pain point text (needed for the fingerprint).
        #[arg(long)]
        pain_point: Option<String>,
    },
    /// Validate and submit one lead through the full pipeline.
    Submit(SubmitArgs),
}

#[derive(Args)]
struct SubmitArgs {
    /// Contact number as a user would type it.
    #[arg(long)]
    contact_number: String,
    /// Business domain.
    #[arg(long)]
    domain: String,
    /// Platform label; repeat for several.
    #[arg(long = "platform")]
    platforms: Vec<String>,
    /// Biggest challenge, 20–300 characters.
    #[arg(long)]
    pain_point: String,
    /// Record marketing consent (required).
    #[arg(long, default_value = "false")]
    consent: bool,
    /// Network origin used for rate limiting.
    #[arg(long, default_value = DEFAULT_NETWORK_IDENTIFIER)]
    network_identifier: String,
    /// Run against an in-memory store instead of the remote one.
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

impl From<&SubmitArgs> for SubmissionInput {
    fn from(args: &SubmitArgs) -> Self {
        Self {
            contact_number: args.contact_number.clone(),
            domain: args.domain.clone(),
            platforms: args.platforms.clone(),
            pain_point: args.pain_point.clone(),
            marketing_consent: args.consent,
        }
    }
}

// ── Output helpers ───────────────────────────────────────────────────

fn header(title: &str) {
    println!("{BOLD}{CYAN}{title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<20}{RESET} {WHITE}{value}{RESET}");
}

fn print_outcome(outcome: &SubmissionOutcome) -> Result<ExitCode> {
    if let Some(cause) = outcome.error.as_ref().and_then(|e| e.cause.as_deref()) {
        debug!(cause = %cause, "submission failure cause");
    }
    let json = serde_json::to_string_pretty(outcome).context("failed to encode outcome")?;
    println!("{json}");
    Ok(if outcome.accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

// ── Setup ────────────────────────────────────────────────────────────

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env("LEADLINE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn store_config(cli: &Cli) -> StoreConfig {
    let mut cfg = StoreConfig::from_env();
    if let Some(url) = &cli.store_url {
        cfg.url.clone_from(url);
    }
    if let Some(key) = &cli.store_key {
        cfg.api_key.clone_from(key);
    }
    cfg
}

// ── Commands ─────────────────────────────────────────────────────────

async fn cmd_check(cli: &Cli) -> ExitCode {
    header("leadline check");

    let status = match PostgrestStore::new(store_config(cli)) {
        Ok(store) => {
            SubmissionPipeline::new(Arc::new(store), PipelineConfig::from_env())
                .test_connection()
                .await
        }
        Err(StoreError::Config(reason)) => {
            debug!(reason = %reason, "store not configured");
            ConnectionStatus::failed(MISSING_STORE_CONFIGURATION)
        }
        Err(err) => ConnectionStatus::failed(err.to_string()),
    };

    if status.success {
        println!("  {GREEN}{BOLD}✓{RESET} store reachable, credentials accepted");
        ExitCode::SUCCESS
    } else {
        let reason = status.error.as_deref().unwrap_or("unknown error");
        println!("  {RED}{BOLD}✗{RESET} {reason}");
        ExitCode::FAILURE
    }
}

fn cmd_normalize(contact_number: &str, domain: Option<&str>, pain_point: Option<&str>) -> ExitCode {
    header("leadline normalize");

    let valid = validate_contact_number(contact_number);
    let formatted = format_contact_number(&sanitize_text(contact_number));

    kv_line("contact number", if valid { "valid" } else { "invalid" });
    kv_line("formatted", &formatted);

    if let (Some(domain), Some(pain_point)) = (domain, pain_point) {
        let hash = fingerprint(&formatted, &sanitize_text(domain), &sanitize_text(pain_point));
        kv_line("fingerprint", &hash);
    }

    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn cmd_submit(cli: &Cli, args: &SubmitArgs) -> Result<ExitCode> {
    let input = SubmissionInput::from(args);

    // Reject bad input before any store is configured.
    if let Err(err) = input.validate() {
        return print_outcome(&SubmissionOutcome::invalid(&err));
    }

    let store: Arc<dyn SubmissionStore> = if args.dry_run {
        Arc::new(MemoryStore::new())
    } else {
        match PostgrestStore::new(store_config(cli)) {
            Ok(store) => Arc::new(store),
            // Same outcome the connection test gives an unconfigured store.
            Err(StoreError::Config(reason)) => {
                debug!(reason = %reason, "store not configured");
                let error = probe_failed(Some(MISSING_STORE_CONFIGURATION.to_owned()));
                return print_outcome(&SubmissionOutcome::failed(error, true));
            }
            Err(err) => return Err(err).context("failed to configure store"),
        }
    };

    debug!(
        identity = %identity_hash(&args.network_identifier),
        dry_run = args.dry_run,
        "submitting lead"
    );

    let pipeline = SubmissionPipeline::new(store, PipelineConfig::from_env());
    let outcome = pipeline
        .submit_form_data(&input, &args.network_identifier)
        .await;
    print_outcome(&outcome)
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Check => Ok(cmd_check(cli).await),
        Commands::Normalize {
            contact_number,
            domain,
            pain_point,
        } => Ok(cmd_normalize(
            contact_number,
            domain.as_deref(),
            pain_point.as_deref(),
        )),
        Commands::Submit(args) => cmd_submit(cli, args).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            ExitCode::FAILURE
        }
    }
}
