use crate::bridge::{BridgeError, ModemBridge};
use crate::trace::TraceLog;
use crate::ProbeRecord;

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

pub const DEFAULT_TRACE_PATH: &str = "/tmp/modemtest.log";
pub const DEFAULT_REPORT_PATH: &str = "/tmp/modemtest-report.json";

const DEFAULT_BRIDGE: &str = "pppob";
const BRIDGE_ENV: &str = "MODEMPROBE_PPPOB";

/// Knobs for a probe run. The defaults are the tool's hard-coded behavior;
/// only the bridge command line is overridable from outside, through the
/// `MODEMPROBE_PPPOB` environment variable.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Whitespace-separated bridge command line.
    pub bridge_command: String,
    /// Raw traffic log destination.
    pub trace_path: PathBuf,
    /// Machine-readable session report destination.
    pub report_path: PathBuf,
    /// How long to let the bridge come up before the first read.
    pub settle: Duration,
    /// One idle poll: how long to wait for the next chunk.
    pub poll_interval: Duration,
    /// A read gives up after this many consecutive empty polls.
    pub max_idle_polls: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            bridge_command: default_bridge_command(),
            trace_path: PathBuf::from(DEFAULT_TRACE_PATH),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            settle: Duration::from_secs(2),
            poll_interval: Duration::from_millis(500),
            max_idle_polls: 2,
        }
    }
}

fn default_bridge_command() -> String {
    std::env::var(BRIDGE_ENV).unwrap_or_else(|_| DEFAULT_BRIDGE.to_string())
}

/// One probe run against one bridge process.
///
/// Sequential and single-consumer: each command is written, then the
/// response is accumulated until the link goes idle or the stream closes.
/// The closed state is sticky: once the bridge's stdout is gone, every
/// later read reports no data without waiting.
#[derive(Debug)]
pub struct ProbeSession {
    bridge: ModemBridge,
    rx: mpsc::Receiver<Vec<u8>>,
    trace: TraceLog,
    config: ProbeConfig,
    closed: bool,
    sent: usize,
}

impl ProbeSession {
    /// Spawn the bridge, start its reader, open the trace log, and wait
    /// the settle delay.
    pub async fn start(config: ProbeConfig) -> Result<Self> {
        let mut bridge = ModemBridge::spawn(&config.bridge_command)
            .with_context(|| format!("Failed to spawn bridge: {}", config.bridge_command))?;
        let rx = bridge
            .start_reader()
            .context("Failed to start bridge reader")?;

        let mut trace = TraceLog::create(&config.trace_path)?;
        trace.note(&format!("bridge: {}", config.bridge_command))?;
        tracing::info!(bridge = %config.bridge_command, "bridge started");

        tokio::time::sleep(config.settle).await;

        Ok(Self {
            bridge,
            rx,
            trace,
            config,
            closed: false,
            sent: 0,
        })
    }

    /// Accumulate response bytes until the link goes idle for
    /// `max_idle_polls` consecutive polls, or the stream closes.
    pub async fn read_response(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        if self.closed {
            return Ok(buffer);
        }

        let mut idle = 0u32;
        while idle < self.config.max_idle_polls {
            match timeout(self.config.poll_interval, self.rx.recv()).await {
                Ok(Some(chunk)) => {
                    idle = 0;
                    self.trace.received(&chunk)?;
                    buffer.extend_from_slice(&chunk);
                }
                Ok(None) => {
                    self.closed = true;
                    self.trace.note("bridge stream closed")?;
                    tracing::warn!("bridge stream closed");
                    break;
                }
                Err(_) => idle += 1,
            }
        }

        Ok(buffer)
    }

    /// Write one command at the bridge. Write failures are reported and
    /// swallowed; the run continues to the next command regardless.
    pub async fn send(&mut self, command: &str) -> Result<()> {
        match self.bridge.write_command(command).await {
            Ok(wire) => self.trace.sent(&wire)?,
            Err(BridgeError::StreamClosed) => {
                self.trace
                    .note(&format!("write failed, stream closed: {}", command))?;
                tracing::warn!(command, "bridge stream closed on write");
            }
            Err(e) => {
                self.trace.note(&format!("write failed: {}: {}", command, e))?;
                if self.bridge.child_is_alive() {
                    tracing::warn!(command, error = %e, "bridge write failed");
                } else {
                    tracing::warn!(command, "bridge process has exited");
                }
            }
        }
        Ok(())
    }

    /// One full command/response exchange.
    pub async fn probe(&mut self, command: &str) -> Result<ProbeRecord> {
        self.send(command).await?;
        let response = self.read_response().await?;

        let record = ProbeRecord {
            index: self.sent,
            command: command.to_string(),
            response: String::from_utf8_lossy(&response).into_owned(),
            closed: self.closed,
            timestamp: Utc::now().timestamp(),
        };
        self.sent += 1;
        Ok(record)
    }

    /// Probe every command in order, collecting the records.
    pub async fn run(&mut self, commands: &[&str]) -> Result<Vec<ProbeRecord>> {
        let mut records = Vec::with_capacity(commands.len());
        for command in commands {
            records.push(self.probe(command).await?);
        }
        Ok(records)
    }

    pub fn stream_closed(&self) -> bool {
        self.closed
    }

    /// Final trace note, then close the bridge's stdin and reap it.
    pub async fn finish(mut self) -> Result<()> {
        self.trace.note("probe run complete")?;
        self.bridge
            .shutdown()
            .await
            .context("Failed to shut the bridge down")?;
        Ok(())
    }
}

/// Persist the run's records as pretty JSON.
pub fn write_report(records: &[ProbeRecord], path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(records).context("Failed to serialize probe report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    Ok(())
}
