use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Raw traffic log for a probe run. Every byte sent to or received from
/// the bridge lands here as a timestamped hex dump, so a failed run can be
/// diagnosed offline without re-plugging the device.
pub struct TraceLog {
    out: BufWriter<File>,
}

impl std::fmt::Debug for TraceLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceLog").finish()
    }
}

impl TraceLog {
    /// Create (or truncate) the trace file and write the session header.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create trace log {}", path.display()))?;
        let mut log = Self {
            out: BufWriter::new(file),
        };
        log.note(&format!("modemprobe trace: {}", path.display()))?;
        Ok(log)
    }

    /// Free-form timestamped marker (session start/end, stream closed...).
    pub fn note(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "[{}] {}", stamp(), text).context("Failed to write trace note")?;
        self.out.flush().context("Failed to flush trace log")
    }

    /// Bytes written to the bridge, exactly as they went over the pipe.
    pub fn sent(&mut self, bytes: &[u8]) -> Result<()> {
        self.record("sent", bytes)
    }

    /// Bytes read back from the bridge.
    pub fn received(&mut self, bytes: &[u8]) -> Result<()> {
        self.record("recv", bytes)
    }

    fn record(&mut self, direction: &str, bytes: &[u8]) -> Result<()> {
        writeln!(
            self.out,
            "[{}] {} ({} bytes)\n{}",
            stamp(),
            direction,
            bytes.len(),
            hexdump(bytes)
        )
        .context("Failed to write trace record")?;
        // Flush per record, so a crashed run still leaves a usable trace.
        self.out.flush().context("Failed to flush trace log")
    }
}

fn stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Classic offset/hex/ASCII dump, 16 bytes per line:
///
/// ```text
///     00000000: 41 54 5a 0d                                      ATZ.
/// ```
pub fn hexdump(data: &[u8]) -> String {
    let mut out = String::new();
    for (line_no, chunk) in data.chunks(16).enumerate() {
        out.push_str("    ");
        out.push_str(&format!("{:08x}: ", line_no * 16));
        for i in 0..16 {
            match chunk.get(i) {
                Some(b) => out.push_str(&format!("{:02x} ", b)),
                None => out.push_str("   "),
            }
        }
        out.push(' ');
        for &b in chunk {
            out.push(if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            });
        }
        out.push('\n');
    }
    out
}
