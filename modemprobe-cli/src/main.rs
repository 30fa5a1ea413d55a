use anyhow::{Context, Result};
use modemprobe_core::commands::PROBE_COMMANDS;
use modemprobe_core::probe::{write_report, ProbeConfig, ProbeSession};

const SEPARATOR: &str = "--------------------------------------------";

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout is the operator-facing report.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let config = ProbeConfig::default();
    let bridge_command = config.bridge_command.clone();
    let report_path = config.report_path.clone();

    eprintln!("[modemprobe] starting bridge: {}", bridge_command);
    let mut session = ProbeSession::start(config)
        .await
        .context("ProbeSession::start failed")?;

    println!("Testing the BlackBerry modem by sending AT commands through the bridge.");

    // Whatever the bridge prints while coming up.
    let banner = session.read_response().await?;
    print!(
        "Starting {}: {}",
        bridge_command,
        String::from_utf8_lossy(&banner)
    );
    println!("{}", SEPARATOR);

    let mut records = Vec::with_capacity(PROBE_COMMANDS.len());
    for command in PROBE_COMMANDS.iter().copied() {
        let record = session.probe(command).await?;
        print!("Command: {}\nResult: {}", record.command, record.response);
        println!("{}", SEPARATOR);
        records.push(record);
    }

    if session.stream_closed() {
        eprintln!("[modemprobe] bridge stream closed before the run finished");
    }

    write_report(&records, &report_path)?;
    tracing::info!(records = records.len(), report = %report_path.display(), "probe run complete");

    session.finish().await.context("Bridge shutdown failed")?;
    Ok(())
}
