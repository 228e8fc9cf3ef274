//! JiraFlow CLI
//!
//! Runs a JIRA ticket through the staged analysis workflow: environment
//! setup, repository access, AI analysis, test-plan generation, human
//! review, implementation, and quality validation.

mod output;
mod review;

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::style;
use jiraflow_assistant::CliBackend;
use jiraflow_core::models::{StageId, StageStatus, TeamConfig};
use jiraflow_core::storage::{init_data_dir, TeamConfigStorage, WorkflowStorage};
use jiraflow_engine::{EventManager, Pipeline, PipelineOptions, PipelineSummary};
use jiraflow_jira::auth::JiraAuth;
use jiraflow_jira::{export, JiraClient};
use review::InteractiveGate;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "jiraflow")]
#[command(about = "JIRA ticket analysis workflow", long_about = None)]
struct Args {
    /// Ticket key to analyze (e.g. ACM-1234)
    ticket: String,

    /// Stop after the review gate; skip implementation and quality
    #[arg(long)]
    test_plan_only: bool,

    /// Team configuration file (defaults to the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the planned stages and exit without running anything
    #[arg(long)]
    dry_run: bool,

    /// Discard previous run state for this ticket and start over
    #[arg(long)]
    force: bool,

    /// Analyze a local JIRA export snapshot instead of calling the API
    #[arg(long)]
    from_export: Option<PathBuf>,

    /// JIRA username for API access (API token comes from the keyring)
    #[arg(long)]
    user: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("{} {:#}", output::error_prefix(), e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    jiraflow_core::models::ticket::validate_key(&args.ticket)?;

    let config_storage = match &args.config {
        Some(path) => TeamConfigStorage::new(path.clone()),
        None => TeamConfigStorage::default_location()?,
    };
    let config = config_storage
        .load()
        .with_context(|| format!("loading team config from {}", config_storage.path().display()))?;

    if args.dry_run {
        print_plan(&args, &config);
        return Ok(());
    }

    let data_dir = init_data_dir()?;
    init_tracing(&data_dir, args.verbose)?;

    let ticket = resolve_ticket(&args, &config).await?;
    if ticket.key != args.ticket {
        bail!(
            "Export is for '{}' but '{}' was requested",
            ticket.key,
            args.ticket
        );
    }

    let event_manager = Arc::new(EventManager::new());
    let mut events = event_manager.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!("{}", output::render_event(&event));
        }
    });

    let pipeline = Pipeline::new(
        ticket,
        config.clone(),
        Arc::new(CliBackend::new(&config.assistant)),
        Arc::new(InteractiveGate),
        event_manager,
        PipelineOptions {
            data_dir: data_dir.clone(),
            test_plan_only: args.test_plan_only,
            force: args.force,
            retry: Default::default(),
        },
    )?;

    let run = pipeline.run();
    tokio::pin!(run);

    let summary = tokio::select! {
        result = &mut run => result?,
        _ = tokio::signal::ctrl_c() => {
            mark_interrupted(&data_dir, &args.ticket);
            bail!("interrupted");
        }
    };

    printer.abort();
    print_summary(&summary);

    Ok(())
}

/// Fetch the ticket from the configured JIRA instance, or load a local
/// export snapshot when one was given.
async fn resolve_ticket(
    args: &Args,
    config: &TeamConfig,
) -> Result<jiraflow_core::models::Ticket> {
    if let Some(ref path) = args.from_export {
        return Ok(export::ticket_from_export(path)?);
    }

    let base_url = config.jira_base_url.clone().context(
        "no jira_base_url in the team config; set one or pass --from-export <FILE>",
    )?;
    let user = args
        .user
        .clone()
        .context("no JIRA user; pass --user <NAME> (token is read from the keyring)")?;

    let auth = JiraAuth::from_keyring(user)?;
    let client = JiraClient::new(base_url, auth)?;
    Ok(client.fetch_ticket(&args.ticket).await?)
}

fn print_plan(args: &Args, config: &TeamConfig) {
    println!(
        "{}",
        style(format!("Planned run for {}", args.ticket)).bold()
    );
    println!(
        "  ticket source: {}",
        match &args.from_export {
            Some(path) => format!("export {}", path.display()),
            None => config
                .jira_base_url
                .clone()
                .unwrap_or_else(|| "(no JIRA configured)".to_string()),
        }
    );
    println!(
        "  assistant: {} {}",
        config.assistant.command,
        config.assistant.args.join(" ")
    );

    for stage in StageId::all() {
        let marker = if args.test_plan_only && stage > StageId::Review {
            style("skip").yellow().to_string()
        } else {
            style("run ").green().to_string()
        };
        println!(
            "  {} [{}/{}] {}",
            marker,
            stage.position() + 1,
            StageId::all().len(),
            stage.display_name()
        );
    }
}

fn print_summary(summary: &PipelineSummary) {
    println!();
    println!(
        "{}",
        style(format!("Run complete for {}", summary.ticket_key))
            .green()
            .bold()
    );
    println!("  stages completed: {}", summary.completed.len());
    if !summary.skipped.is_empty() {
        let names: Vec<&str> = summary.skipped.iter().map(|s| s.display_name()).collect();
        println!("  stages skipped: {}", names.join(", "));
    }
    if !summary.reports.is_empty() {
        println!("  reports:");
        for path in &summary.reports {
            println!("    {}", path.display());
        }
    }
    for warning in &summary.warnings {
        println!("{} {}", output::warning_prefix(), warning);
    }
}

/// Best-effort: record an interrupted run in the state file
fn mark_interrupted(data_dir: &Path, ticket_key: &str) {
    let storage = WorkflowStorage::new(data_dir.to_path_buf());
    if let Ok(Some(mut state)) = storage.load(ticket_key) {
        for stage in StageId::all() {
            if state.status(stage) == StageStatus::InProgress {
                let _ = state.fail_stage(stage, "interrupted".to_string());
            }
        }
        let _ = storage.save(&state);
    }
}

fn init_tracing(data_dir: &Path, verbose: bool) -> Result<()> {
    let log_file_path = data_dir.join("jiraflow.log");
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let stdout_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let stdout_writer = std::io::stdout.with_max_level(stdout_level);
    let file_writer = log_file.with_max_level(tracing::Level::DEBUG);

    tracing_subscriber::fmt()
        .with_writer(stdout_writer.and(file_writer))
        .with_env_filter(if verbose { "debug" } else { "info" })
        .with_ansi(false) // No color codes in log file
        .init();

    tracing::debug!("log file: {}", log_file_path.display());
    Ok(())
}
