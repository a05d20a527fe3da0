// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Initialize logging (diagnostics only; user output stays on stdout)
// 3. Build the scan controller with the real HTTP client and flag store
// 4. Dispatch to the one-shot check or the interactive session
// 5. Exit with proper code (0 = safe, 1 = phishing found, 2 = error)
//
// This file is also the presentation layer: TermSink renders everything
// the scan core reports. The core itself never prints.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod api; // src/api/ - PhishShield service client + report link
mod cli; // src/cli.rs - command-line parsing
mod error; // src/error.rs - the check error taxonomy
mod flags; // src/flags.rs - persisted one-time UI flags
mod scan; // src/scan/ - the scan orchestration core
mod validate; // src/validate.rs - URL input validation

use std::io::Write as _;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use api::{HttpApi, ServiceStats};
use cli::{Cli, Commands};
use flags::{FlagStore, JsonFileStore};
use scan::{NoticeKind, ScanController, ScanOutcome, ScanRecord, Statistics, UiSink};

// The #[tokio::main] attribute transforms our async main into a real main
// function. It creates a tokio runtime and runs our async code inside it.
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    // The handle must stay alive for the duration of the program, or
    // logging silently stops
    let _logger = init_logging(cli.verbose)?;

    let base = Url::parse(&cli.api).context("invalid --api base URL")?;

    match cli.command {
        Commands::Check { url, json } => handle_check(base, &url, json).await,
        Commands::Interactive => handle_interactive(base).await,
    }
}

fn init_logging(verbose: bool) -> Result<flexi_logger::LoggerHandle> {
    let spec = if verbose { "debug" } else { "warn" };
    flexi_logger::Logger::try_with_env_or_str(spec)
        .context("building logger")?
        .start()
        .context("starting logger")
}

fn build_controller(base: Url, sink: Arc<dyn UiSink>) -> Result<ScanController> {
    let api = HttpApi::new(base)?;
    let store = JsonFileStore::at_default_path()?;
    Ok(ScanController::new(
        Box::new(api),
        FlagStore::new(Box::new(store)),
        sink,
    ))
}

// Handles the 'check' subcommand: one lifecycle, then exit.
//
// Exit codes mirror the verdict so the command slots into scripts and CI:
//   0 = checked and safe, 1 = phishing detected, 2 = could not check
async fn handle_check(base: Url, raw_url: &str, json: bool) -> Result<i32> {
    let sink = Arc::new(TermSink::new(json));
    let controller = build_controller(base, Arc::clone(&sink) as Arc<dyn UiSink>)?;

    let outcome = controller.check_url(raw_url).await;

    if json {
        match &outcome {
            Some(outcome) => println!("{}", serde_json::to_string_pretty(outcome)?),
            None => {
                let message = sink
                    .last_error()
                    .unwrap_or_else(|| "check failed".to_string());
                println!("{}", serde_json::json!({ "error": message }));
            }
        }
    }

    match outcome {
        Some(outcome) if outcome.record.is_phishing => Ok(1),
        Some(_) => Ok(0),
        None => Ok(2),
    }
}

// Handles the 'interactive' subcommand: the terminal stand-in for the web
// page. Each typed line is one user event.
async fn handle_interactive(base: Url) -> Result<i32> {
    let sink = Arc::new(TermSink::new(false));
    let controller = build_controller(base, Arc::clone(&sink) as Arc<dyn UiSink>)?;

    println!("🛡️  PhishShield - phishing URL scanner");

    // Load history, the service baseline and the banner flag concurrently
    controller.init().await;

    println!("Type a URL to check it, or a command: history, stats, clear, report, dismiss, quit");
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        match input {
            "" => {}
            "quit" | "exit" => break,
            "history" => print_history(&controller.history()),
            "stats" => controller.reveal_stats().await,
            "clear" => controller.clear_history().await,
            "dismiss" => controller.dismiss_announcement().await,
            _ if input == "report" || input.starts_with("report ") => {
                handle_report(&controller, &sink, input)
            }
            url => {
                controller.check_url(url).await;
            }
        }

        prompt()?;
    }

    // Closing summary, same shape as after a one-shot check
    let stats = controller.statistics();
    if stats.total_scans > 0 {
        println!("📊 Summary:");
        println!("   ✅ Safe: {}", stats.safe_urls);
        println!("   🚨 Phishing: {}", stats.phishing_urls);
        println!("   📋 Total: {}", stats.total_scans);
    }

    println!("👋 Bye!");
    Ok(0)
}

// Prints the report-page link for a URL ("report <url>"), defaulting to
// the most recently checked URL when none is given.
fn handle_report(controller: &ScanController, sink: &TermSink, input: &str) {
    let target = input.trim_start_matches("report").trim();

    let url = if target.is_empty() {
        match sink.last_checked_url() {
            Some(url) => url,
            None => {
                println!("⚠️  Nothing checked yet - use: report <url>");
                return;
            }
        }
    } else {
        target.to_string()
    };

    let link = controller.report_page(&url);
    println!("🚩 Report this URL here: {}", link);
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

// Prints the recent-activity table: newest first, URLs truncated to keep
// the columns readable.
fn print_history(records: &[ScanRecord]) {
    if records.is_empty() {
        println!("📭 No scans yet - check a URL to get started.");
        return;
    }

    println!("{:<50} {:<12} {:<25}", "URL", "VERDICT", "WHEN");
    println!("{}", "=".repeat(88));

    for record in records {
        let verdict = if record.is_phishing {
            "🚨 PHISHING"
        } else {
            "✅ SAFE"
        };
        println!(
            "{:<50} {:<12} {:<25}",
            validate::display_url(&record.url, 47),
            verdict,
            record.timestamp
        );
    }
}

// The terminal renderer for everything the scan core reports.
//
// In JSON mode all decorative printing is suppressed; the outcome (or the
// error message) is emitted once by handle_check instead.
struct TermSink {
    json: bool,
    last_outcome: Mutex<Option<ScanOutcome>>,
    last_error: Mutex<Option<String>>,
}

impl TermSink {
    fn new(json: bool) -> Self {
        Self {
            json,
            last_outcome: Mutex::new(None),
            last_error: Mutex::new(None),
        }
    }

    fn last_checked_url(&self) -> Option<String> {
        self.last_outcome
            .lock()
            .unwrap()
            .as_ref()
            .map(|o| o.record.url.clone())
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}

impl UiSink for TermSink {
    fn controls_locked(&self, locked: bool) {
        // A terminal has no input field to disable; the lifecycle already
        // serializes input handling. Only worth a diagnostic.
        log::debug!("controls locked: {}", locked);
    }

    fn scan_started(&self, url: &str) {
        if !self.json {
            println!("🔎 Checking {} ...", url);
        }
    }

    fn verdict_rendered(&self, outcome: &ScanOutcome) {
        *self.last_outcome.lock().unwrap() = Some(outcome.clone());

        if self.json {
            return;
        }

        if outcome.record.is_phishing {
            println!("🚨 Phishing detected: {}", outcome.record.url);
        } else {
            println!("✅ Looks safe: {}", outcome.record.url);
        }
        if let Some(message) = &outcome.message {
            println!("   {}", message);
        }
        println!("   ⏱️  {} ms", outcome.elapsed_ms);
    }

    fn history_refreshed(&self, records: &[ScanRecord]) {
        // The history table only prints on demand; log the refresh
        log::debug!("history refreshed ({} entries)", records.len());
    }

    fn stats_updated(&self, stats: &Statistics) {
        if !self.json {
            println!(
                "📊 Session: {} scanned, {} safe, {} phishing",
                stats.total_scans, stats.safe_urls, stats.phishing_urls
            );
        }
    }

    fn service_stats_loaded(&self, stats: &ServiceStats) {
        if !self.json {
            println!(
                "🌐 Service today: {} URLs scanned, {} threats blocked (avg {:.0} ms)",
                stats.urls_scanned_today, stats.threats_blocked_today, stats.avg_response_time
            );
        }
    }

    fn stats_revealed(&self, stats: &Statistics, first_view: bool) {
        if self.json {
            return;
        }
        if first_view {
            println!("✨ Session statistics");
        } else {
            println!("📊 Session statistics");
        }
        println!("   Total scans:    {}", stats.total_scans);
        println!("   Safe URLs:      {}", stats.safe_urls);
        println!("   Phishing URLs:  {}", stats.phishing_urls);
    }

    fn notice_shown(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Error => {
                *self.last_error.lock().unwrap() = Some(message.to_string());
                if !self.json {
                    println!("❌ {}", message);
                }
            }
            NoticeKind::Success => {
                if !self.json {
                    println!("✅ {}", message);
                }
            }
        }
    }

    fn notice_cleared(&self) {
        // Printed lines can't be un-printed; the dismissal only matters
        // for stateful renderers
        log::debug!("notice cleared");
    }

    fn announcement_visible(&self, visible: bool) {
        if visible && !self.json {
            println!("📢 PhishShield now also ships as a browser extension - type 'dismiss' to hide this note.");
        }
    }
}
