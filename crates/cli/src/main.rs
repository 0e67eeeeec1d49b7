use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::{
    BatchOutcome, BatchSummary, ChannelNotifier, EngineConfig, EngineEvent, Notification,
    NotificationLevel, ProcessOutcome, RemoteScorer, ScreeningOrchestrator,
};
use pipeline::{CandidateFilterEngine, Category, CompletionAdvisor, FilterCriteria, RosterSummary};
use roster::{Candidate, CandidateId, JobId, JsonRosterStore, RosterStore};
use scoring_client::{EnvCredentials, ScoringConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tracing::warn;

/// Screener - batch candidate screening against a job posting
#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "Score, filter and star the candidates of a job posting", long_about = None)]
struct Cli {
    /// Path to the roster JSON file (job plus candidates)
    #[arg(short, long, env = "SCREENER_ROSTER")]
    roster: PathBuf,

    /// Address of the scoring service
    #[arg(long, env = "SCORING_ADDR", default_value = "http://localhost:50051")]
    scoring_addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every candidate that has not been scored yet
    Process {
        /// Scoring calls in flight at once (1 keeps roster order)
        #[arg(long, env = "SCREENER_CONCURRENCY", default_value = "1")]
        concurrency: usize,
    },

    /// Score a single candidate
    ProcessOne {
        /// Candidate ID to score
        #[arg(long)]
        candidate: CandidateId,
    },

    /// List candidates, best overall score first
    List {
        /// Case-insensitive text to find in name, strengths or weaknesses
        #[arg(long, default_value = "")]
        search: String,

        /// One of: all, starred, processed, unprocessed
        #[arg(long, default_value = "all")]
        category: Category,

        /// Show only this candidate, with full details
        #[arg(long)]
        focus: Option<CandidateId>,
    },

    /// Star (or unstar) a candidate
    Star {
        /// Candidate ID to update
        #[arg(long)]
        candidate: CandidateId,

        /// Remove the star instead
        #[arg(long)]
        unstar: bool,
    },

    /// Show processing counts for the job
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading roster from {}...", cli.roster.display());
    let start = Instant::now();
    let store = Arc::new(
        JsonRosterStore::open(&cli.roster)
            .await
            .context("Failed to load roster")?,
    );
    let job_id = store.job_id().await;
    println!("{} Loaded job {} in {:?}", "✓".green(), job_id, start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Process { concurrency } => {
            handle_process(store, job_id, &cli.scoring_addr, concurrency).await?
        }
        Commands::ProcessOne { candidate } => {
            handle_process_one(store, job_id, &cli.scoring_addr, candidate).await?
        }
        Commands::List {
            search,
            category,
            focus,
        } => handle_list(store, job_id, search, category, focus).await?,
        Commands::Star { candidate, unstar } => {
            handle_star(store, job_id, candidate, !unstar).await?
        }
        Commands::Status => handle_status(store, job_id).await?,
    }

    Ok(())
}

/// Connect to the scoring service and build an orchestrator whose
/// notifications arrive on the returned channel.
async fn connect_orchestrator(
    store: Arc<JsonRosterStore>,
    scoring_addr: &str,
    config: EngineConfig,
) -> Result<(ScreeningOrchestrator, mpsc::UnboundedReceiver<Notification>)> {
    let scoring = ScoringConfig::new(scoring_addr).with_credentials(&EnvCredentials::default());
    if scoring.api_key.is_none() {
        warn!(
            "{} is not set, calling the scoring service without credentials",
            EnvCredentials::DEFAULT_VAR
        );
    }

    let scorer = RemoteScorer::connect(scoring, store.clone())
        .await
        .with_context(|| format!("Failed to connect to scoring service at {}", scoring_addr))?;
    let (notifier, notifications) = ChannelNotifier::new();

    let orchestrator =
        ScreeningOrchestrator::new(store, Arc::new(scorer), Arc::new(notifier), config);
    Ok((orchestrator, notifications))
}

#[derive(Debug, PartialEq, Eq)]
enum Interrupt {
    CancelBatch,
    Exit,
}

/// What the `n`th Ctrl-C (counting from 1) during a batch does.
fn on_interrupt(n: usize) -> Interrupt {
    if n > 1 {
        Interrupt::Exit
    } else {
        Interrupt::CancelBatch
    }
}

/// Handle the 'process' command
async fn handle_process(
    store: Arc<JsonRosterStore>,
    job_id: JobId,
    scoring_addr: &str,
    concurrency: usize,
) -> Result<()> {
    let config = EngineConfig::default().with_concurrency(concurrency);
    let (orchestrator, notifications) = connect_orchestrator(store, scoring_addr, config).await?;
    let orchestrator = Arc::new(orchestrator);

    let reporter = tokio::spawn(report_progress(orchestrator.subscribe(), notifications));

    // First Ctrl-C lets the in-flight candidate finish, then stops the batch;
    // a second one exits right away
    let interrupt = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            let mut interrupts = 0;
            while tokio::signal::ctrl_c().await.is_ok() {
                interrupts += 1;
                match on_interrupt(interrupts) {
                    Interrupt::CancelBatch => {
                        println!(
                            "{} Stopping after the candidate in flight (Ctrl-C again to quit)...",
                            "!".yellow()
                        );
                        orchestrator.cancel_batch();
                    }
                    Interrupt::Exit => {
                        eprintln!("{} Interrupted again, exiting", "✗".red());
                        std::process::exit(130);
                    }
                }
            }
        })
    };

    let start = Instant::now();
    let outcome = orchestrator.process_all(&job_id).await?;
    interrupt.abort();

    match outcome {
        BatchOutcome::Finished(summary) => {
            let _ = reporter.await;
            print_batch_summary(&summary, start.elapsed());
        }
        BatchOutcome::Rejected(reason) => {
            reporter.abort();
            println!("{} Nothing to do: {}", "!".yellow(), reason);
        }
    }

    let refresh = orchestrator.refresh(&job_id).await?;
    if refresh.show_completion_cta {
        println!(
            "{} {} candidates still unprocessed, run `screener process` again to retry",
            "!".yellow(),
            refresh.summary.unprocessed
        );
    }
    Ok(())
}

/// Print notifications and batch progress until the batch finishes.
async fn report_progress(
    mut events: broadcast::Receiver<EngineEvent>,
    mut notifications: mpsc::UnboundedReceiver<Notification>,
) {
    loop {
        tokio::select! {
            Some(notification) = notifications.recv() => print_notification(&notification),
            event = events.recv() => match event {
                Ok(EngineEvent::BatchStarted { total, .. }) => {
                    println!("{}", format!("Scoring {} candidates:", total).bold().blue());
                }
                Ok(EngineEvent::BatchProgress { run, progress_percent, .. }) => {
                    println!(
                        "  [{:>3}%] {}/{} attempted, {} failed",
                        progress_percent, run.completed, run.total, run.failed
                    );
                }
                Ok(EngineEvent::BatchFinished { .. }) | Err(RecvError::Closed) => break,
                Ok(EngineEvent::RosterRefreshed { .. }) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Progress display fell behind, {} updates skipped", skipped);
                }
            },
        }
    }

    while let Ok(notification) = notifications.try_recv() {
        print_notification(&notification);
    }
}

/// Handle the 'process-one' command
async fn handle_process_one(
    store: Arc<JsonRosterStore>,
    job_id: JobId,
    scoring_addr: &str,
    candidate_id: CandidateId,
) -> Result<()> {
    // Check the candidate exists before calling out
    let roster = store.roster(&job_id).await?;
    roster
        .get(&candidate_id)
        .ok_or_else(|| anyhow!("Candidate {} not found", candidate_id))?;

    let (orchestrator, mut notifications) =
        connect_orchestrator(store.clone(), scoring_addr, EngineConfig::default()).await?;

    let outcome = orchestrator.process_one(Some(&job_id), &candidate_id).await;
    while let Ok(notification) = notifications.try_recv() {
        print_notification(&notification);
    }

    match outcome {
        ProcessOutcome::Processed => {
            let roster = store.roster(&job_id).await?;
            if let Some(candidate) = roster.get(&candidate_id) {
                print_candidate_detail(candidate);
            }
            Ok(())
        }
        ProcessOutcome::Failed(failure) => Err(anyhow!(
            "Failed to process candidate {}: {}",
            candidate_id,
            failure
        )),
        ProcessOutcome::Rejected(reason) => {
            println!("{} Nothing to do: {}", "!".yellow(), reason);
            Ok(())
        }
    }
}

/// Handle the 'list' command
async fn handle_list(
    store: Arc<JsonRosterStore>,
    job_id: JobId,
    search: String,
    category: Category,
    focus: Option<CandidateId>,
) -> Result<()> {
    let roster = store.roster(&job_id).await?;
    let criteria = FilterCriteria::new(search, category);
    let visible = CandidateFilterEngine::new().filter(&roster.candidates, &criteria, focus.as_deref());

    if let Some(focused) = &focus {
        match visible.first() {
            Some(candidate) => print_candidate_detail(candidate),
            None => println!("Candidate {} not found", focused),
        }
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{} ({}): {} of {} candidates",
            roster.job.title,
            category,
            visible.len(),
            roster.candidates.len()
        )
        .bold()
        .blue()
    );
    for (rank, candidate) in visible.iter().enumerate() {
        let star = if candidate.is_starred { "★".yellow() } else { " ".normal() };
        let score = if candidate.is_processed() {
            format!("{:.2}", candidate.overall_score)
        } else {
            "unprocessed".dimmed().to_string()
        };
        println!(
            "{:>3}. {} {} ({}) - Score: {}",
            (rank + 1).to_string().green(),
            star,
            candidate.name,
            candidate.id,
            score
        );
    }
    Ok(())
}

/// Handle the 'star' command
async fn handle_star(
    store: Arc<JsonRosterStore>,
    job_id: JobId,
    candidate_id: CandidateId,
    starred: bool,
) -> Result<()> {
    store
        .set_starred(&job_id, &candidate_id, starred)
        .await
        .with_context(|| format!("Failed to update candidate {}", candidate_id))?;

    println!(
        "{} Candidate {} {}",
        "✓".green(),
        candidate_id,
        if starred { "starred" } else { "unstarred" }
    );
    Ok(())
}

/// Handle the 'status' command
async fn handle_status(store: Arc<JsonRosterStore>, job_id: JobId) -> Result<()> {
    let roster = store.roster(&job_id).await?;
    let summary = RosterSummary::of(&roster.candidates);

    println!(
        "{}",
        format!("{} ({})", roster.job.title, roster.job.id).bold().blue()
    );
    for requirement in &roster.job.requirements {
        println!("{}{} (weight {:.1})", "• ".cyan(), requirement.name, requirement.weight);
    }
    print_roster_summary(&summary);

    if CompletionAdvisor::should_show_completion_cta(&roster.candidates) {
        println!(
            "{} Processing is incomplete: run `screener process` to score the remaining {}",
            "!".yellow(),
            summary.unprocessed
        );
    } else if summary.total > 0 && summary.unprocessed == 0 {
        println!("{} Every candidate has been processed", "✓".green());
    }
    Ok(())
}

fn print_notification(notification: &Notification) {
    let candidate = notification.candidate_id.as_deref().unwrap_or("-");
    match notification.level {
        NotificationLevel::Success => {
            println!("  {} {} ({})", "✓".green(), notification.message, candidate)
        }
        NotificationLevel::Failure => println!(
            "  {} {} ({}): {}",
            "✗".red(),
            notification.message,
            candidate,
            notification.detail.as_deref().unwrap_or("unknown error")
        ),
        NotificationLevel::Info => println!("  {} {}", "•".cyan(), notification.message),
    }
}

fn print_batch_summary(summary: &BatchSummary, elapsed: std::time::Duration) {
    let headline = if summary.cancelled {
        "Batch cancelled".yellow().bold()
    } else {
        "Batch complete".green().bold()
    };
    println!("{} in {:?}", headline, elapsed);
    println!("{}Succeeded: {}", "• ".green(), summary.succeeded());
    println!("{}Failed: {}", "• ".red(), summary.failed);
    if summary.skipped > 0 {
        println!("{}Skipped (already in flight): {}", "• ".cyan(), summary.skipped);
    }
    if summary.completed < summary.total {
        println!(
            "{}Not attempted: {}",
            "• ".cyan(),
            summary.total - summary.completed
        );
    }
}

fn print_roster_summary(summary: &RosterSummary) {
    println!("{}Candidates: {}", "• ".green(), summary.total);
    println!("{}Processed: {}", "• ".green(), summary.processed);
    println!("{}Unprocessed: {}", "• ".green(), summary.unprocessed);
    println!("{}Starred: {}", "• ".green(), summary.starred);
}

fn print_candidate_detail(candidate: &Candidate) {
    let star = if candidate.is_starred { " ★" } else { "" };
    println!(
        "{}",
        format!("{} ({}){}", candidate.name, candidate.id, star).bold().blue()
    );
    if !candidate.is_processed() {
        println!("  Not processed yet");
        return;
    }

    println!("  Overall score: {:.2}", candidate.overall_score);
    for score in &candidate.scores {
        println!("  {}{}: {:.1}", "• ".cyan(), score.requirement, score.score);
    }
    if !candidate.strengths.is_empty() {
        println!("  Strengths: {}", candidate.strengths.join(", "));
    }
    if !candidate.weaknesses.is_empty() {
        println!("  Weaknesses: {}", candidate.weaknesses.join(", "));
    }
    if let Some(summary) = &candidate.summary {
        println!("  Summary: {}", summary);
    }
}
