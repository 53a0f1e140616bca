//! VIGIL Proctored-Session Integrity Runtime demo CLI
//!
//! Runs scripted end-to-end sessions against an in-memory remote authority,
//! showing gate classification, live sensor handling, lockdown overlay
//! transitions, best-effort sync, and the sealed audit trail.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- clean-run
//!   cargo run -p demo -- interrupted-run
//!   cargo run -p demo -- blocked-browser
//!   cargo run -p demo -- flaky-backend

mod authority;
mod questions;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vigil_contracts::error::VigilResult;
use vigil_monitor::{ClipboardAction, SensorSignal, SignalOutcome};
use vigil_session::{SessionConfig, SessionController};
use vigil_store::SessionStore;
use vigil_sync::SyncEngine;

use authority::DemoAuthority;

const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const EDGE_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91";

// ── CLI definition ────────────────────────────────────────────────────────────

/// VIGIL proctored-session integrity runtime demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "VIGIL proctored-session integrity demo",
    long_about = "Runs scripted assessment sessions showing environment gating,\n\
                  tamper sensing, best-effort sync, and the sealed audit trail."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,
    /// A trusted environment with no incidents, submitted cleanly.
    CleanRun,
    /// Fullscreen exits, tab switches, and clipboard attempts mid-session.
    InterruptedRun,
    /// An untrusted browser is blocked, then a retry succeeds.
    BlockedBrowser,
    /// The submission endpoint fails once, then the retry seals the trail.
    FlakyBackend,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::CleanRun => clean_run(),
        Command::InterruptedRun => interrupted_run(),
        Command::BlockedBrowser => blocked_browser(),
        Command::FlakyBackend => flaky_backend(),
    };

    match result {
        Ok(()) => println!("All selected scenarios completed successfully."),
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> VigilResult<()> {
    clean_run()?;
    interrupted_run()?;
    blocked_browser()?;
    flaky_backend()?;
    Ok(())
}

// ── Session wiring ────────────────────────────────────────────────────────────

fn make_session() -> (SessionController, Arc<DemoAuthority>) {
    let authority = Arc::new(DemoAuthority::new());
    let sync = Arc::new(SyncEngine::new(authority.clone()));

    // Default config selects in-memory storage; set `storage_path` in a
    // config file to persist the blob across runs.
    let config = SessionConfig::default();
    let store = Arc::new(SessionStore::open(config.storage_backend(), sync.clone()));

    // Live status badge: print every sync-state transition.
    sync.subscribe(|state| println!("  [sync] {:?}", state));

    (
        SessionController::new(config, store, sync),
        authority,
    )
}

fn demo_answers() -> serde_json::Value {
    let mut answers = serde_json::Map::new();
    for question in questions::question_bank() {
        let value = match question.correct_index {
            Some(index) => serde_json::json!(index),
            None => serde_json::json!("sample free-text answer"),
        };
        answers.insert(question.id, value);
    }
    serde_json::Value::Object(answers)
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

fn clean_run() -> VigilResult<()> {
    println!("\n=== Scenario: clean run ===");
    info!(scenario = "clean-run", "scenario starting");
    let (mut session, authority) = make_session();

    let profile = session.detect(CHROME_UA)?;
    println!("  gate: {} {} trusted={}", profile.name, profile.version, profile.trusted);

    session.confirm_start()?;
    session.handle_signal(SensorSignal::Fullscreen(true))?;

    for _ in 0..3 {
        let status = session.tick()?;
        if let Some(monitor) = session.monitor() {
            println!("  timer: {} urgent={}", monitor.timer().display(), status.urgent);
        }
    }

    session.submit(demo_answers())?;
    println!("  submissions received by authority: {}", authority.submission_count());
    println!("  snapshots mirrored so far: {}", authority.snapshot_count());

    print_trail(&session);
    Ok(())
}

fn interrupted_run() -> VigilResult<()> {
    println!("\n=== Scenario: interrupted run ===");
    info!(scenario = "interrupted-run", "scenario starting");
    let (mut session, _authority) = make_session();

    session.detect(CHROME_UA)?;
    session.confirm_start()?;
    session.handle_signal(SensorSignal::Fullscreen(true))?;

    // The candidate leaves fullscreen and switches windows.
    session.handle_signal(SensorSignal::Fullscreen(false))?;
    session.handle_signal(SensorSignal::Visibility(false))?;
    print_overlay(&session);

    // Fullscreen restored, but the window-switch warning is still live.
    session.handle_signal(SensorSignal::Fullscreen(true))?;
    print_overlay(&session);

    session.handle_signal(SensorSignal::Visibility(true))?;
    print_overlay(&session);

    // Clipboard is hard-blocked.
    for action in [ClipboardAction::Copy, ClipboardAction::Paste, ClipboardAction::Cut] {
        if let SignalOutcome::Suppressed { notice, .. } =
            session.handle_signal(SensorSignal::Clipboard(action))?
        {
            println!("  blocked: {}", notice);
        }
    }

    session.submit(demo_answers())?;
    print_trail(&session);
    Ok(())
}

fn blocked_browser() -> VigilResult<()> {
    println!("\n=== Scenario: blocked browser ===");
    info!(scenario = "blocked-browser", "scenario starting");
    let (mut session, _authority) = make_session();

    let profile = session.detect(EDGE_UA)?;
    println!(
        "  gate: {} trusted={} -> phase {}",
        profile.name,
        profile.trusted,
        session.phase()
    );

    // The candidate switches to the approved browser and retries.
    let retried = session.retry_detection(CHROME_UA)?;
    println!(
        "  retry: {} trusted={} -> phase {}",
        retried.name,
        retried.trusted,
        session.phase()
    );

    session.confirm_start()?;
    session.handle_signal(SensorSignal::Fullscreen(true))?;
    session.submit(demo_answers())?;
    print_trail(&session);
    Ok(())
}

fn flaky_backend() -> VigilResult<()> {
    println!("\n=== Scenario: flaky backend ===");
    info!(scenario = "flaky-backend", "scenario starting");
    let (mut session, authority) = make_session();

    session.detect(CHROME_UA)?;
    session.confirm_start()?;
    session.handle_signal(SensorSignal::Fullscreen(true))?;

    authority.reject_next_submissions(1);
    match session.submit(demo_answers()) {
        Err(e) => println!("  first submission failed as scripted: {}", e),
        Ok(()) => println!("  unexpected: first submission succeeded"),
    }

    // The candidate retries; the session never left the testing phase.
    session.submit(demo_answers())?;
    println!("  retry sealed the attempt: sealed={}", session.store().is_sealed());

    print_trail(&session);
    Ok(())
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn print_overlay(session: &SessionController) {
    if let Some(monitor) = session.monitor() {
        match monitor.overlay_message() {
            Some(message) if monitor.overlay_visible() => {
                println!("  overlay: VISIBLE: {}", message)
            }
            _ => println!("  overlay: hidden"),
        }
    }
}

fn print_trail(session: &SessionController) {
    let store = session.store();
    println!("\n  Audit trail for attempt {}", store.attempt_id());
    println!("  digest: {}", store.digest());
    println!("  {:<14} {:<18} DETAIL", "TIME", "EVENT");
    for event in store.read_all() {
        println!(
            "  {:<14} {:<18} {}",
            event.timestamp.format("%H:%M:%S%.3f"),
            event.kind.as_str(),
            event.display_detail()
        );
    }
    println!();
}

fn print_banner() {
    println!();
    println!("VIGIL Proctored-Session Integrity Runtime");
    println!("===========================================");
    println!();
    println!("Per-session enforcement pipeline:");
    println!("  [1] Capability gate classifies the host environment");
    println!("  [2] Explicit consent starts the monitored assessment");
    println!("  [3] Sensors log every trust event to the durable trail");
    println!("  [4] Trail mirrors best-effort to the remote authority");
    println!("  [5] Final submission seals the trail immutably");
    println!();
}
