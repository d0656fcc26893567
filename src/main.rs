use anyhow::{anyhow, Result};
use chrono::Local;

use receivables::export::summary_to_csv;
use receivables::load_table;
use receivables::session::{Session, SessionEvent};
use receivables::SUPPORTED_EXTENSIONS;

use std::env;
use std::io::{stdout, Write};
use std::path::Path;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let path = parse_args();
    validate_input_file(&path);
    run_report(&path).await
}

fn parse_args() -> String {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => "report.xlsx".to_string(),
        2 => args[1].clone(),
        _ => {
            eprintln!("Usage: {} [report_file]", args[0]);
            eprintln!("  report_file: Path to a CSV/Excel report (default: report.xlsx)");
            std::process::exit(1);
        }
    }
}

fn validate_input_file(path: &str) {
    if !Path::new(path).exists() {
        eprintln!("Error: File '{}' does not exist", path);
        std::process::exit(1);
    }

    let supported = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false);
    if !supported {
        eprintln!("Error: File '{}' is not a supported report format", path);
        std::process::exit(1);
    }
}

async fn run_report(path: &str) -> Result<()> {
    println!("Processing report from: {}", path);
    let table = load_table(path)?;

    // Stand-in for the UI event loop: interactions arrive serialized on a
    // channel and a single session task owns the state.
    let (events, mut rx) = mpsc::channel::<SessionEvent>(16);

    let session_task = tokio::spawn(async move {
        let mut session = Session::new();

        while let Some(event) = rx.recv().await {
            session.apply_event(event);
        }

        session.view(Local::now().date_naive())
    });

    events
        .send(SessionEvent::Upload(table))
        .await
        .map_err(|_| anyhow!("session task stopped"))?;
    drop(events);

    match session_task.await? {
        Some(view) => {
            for (label, value) in view.metrics() {
                println!("{}: {}", label, value);
            }
            println!("{}", view.summary_title());
            stdout().write_all(&summary_to_csv(&view.summary)?)?;
        }
        None => println!("กรุณาอัปโหลดไฟล์ Excel เพื่อเริ่มต้น"),
    }

    Ok(())
}
