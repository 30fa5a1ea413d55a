use crate::filter::PppFilter;
use std::io::ErrorKind;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("bridge command line is empty")]
    EmptyCommand,

    /// The pipe to the bridge process is gone. The only failure the
    /// dispatcher treats specially: it reports no data and moves on.
    #[error("bridge stream closed")]
    StreamClosed,

    #[error("bridge reader already started")]
    ReaderTaken,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The spawned modem bridge process (pppob or stand-in).
///
/// Spawned once and reused for the whole run. Commands go down stdin with
/// a CR terminator; the device side streams back through stdout. stderr is
/// left alone so the bridge's own debug output stays visible.
pub struct ModemBridge {
    child: Child,
    stdin: ChildStdin,
    filter: PppFilter,
}

impl std::fmt::Debug for ModemBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModemBridge")
            .field("child", &"Child")
            .finish()
    }
}

impl ModemBridge {
    /// Spawn the bridge from a whitespace-separated command line,
    /// e.g. `pppob -p 3009efe3`.
    pub fn spawn(command_line: &str) -> Result<Self, BridgeError> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next().ok_or(BridgeError::EmptyCommand)?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        // Both handles exist because we asked for pipes above.
        let stdin = child.stdin.take().ok_or(BridgeError::StreamClosed)?;

        Ok(Self {
            child,
            stdin,
            filter: PppFilter::new(),
        })
    }

    /// Start pumping the bridge's stdout into a channel. The channel
    /// closing is the read side's "stream closed" signal.
    pub fn start_reader(&mut self) -> Result<mpsc::Receiver<Vec<u8>>, BridgeError> {
        let mut stdout = self.child.stdout.take().ok_or(BridgeError::ReaderTaken)?;

        let (tx, rx) = mpsc::channel(256);

        tokio::spawn(async move {
            let mut buf = [0u8; 4096];
            loop {
                match stdout.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).await.is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            tracing::debug!("bridge reader finished");
        });

        Ok(rx)
    }

    /// Write one AT command, CR-terminated. Returns the bytes that
    /// actually went over the pipe (post-filter) so the caller can trace
    /// them.
    pub async fn write_command(&mut self, line: &str) -> Result<Vec<u8>, BridgeError> {
        // Prevent double terminators if callers already include CR/LF.
        let cmd = line.trim_end_matches(&['\r', '\n'][..]);

        let mut data = Vec::with_capacity(cmd.len() + 1);
        data.extend_from_slice(cmd.as_bytes());
        data.push(b'\r');

        self.write_raw(&data).await
    }

    /// Raw write through the PPP filter (no terminator added).
    pub async fn write_raw(&mut self, data: &[u8]) -> Result<Vec<u8>, BridgeError> {
        let wire = self.filter.write(data).into_owned();

        map_closed(self.stdin.write_all(&wire).await)?;
        map_closed(self.stdin.flush().await)?;

        Ok(wire)
    }

    pub fn child_is_alive(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(_)) => false,
            Err(_) => true,
        }
    }

    /// Close stdin and reap the child. pppob exits on stdin EOF, so this
    /// is the natural end of a run.
    pub async fn shutdown(self) -> Result<(), BridgeError> {
        let Self {
            stdin, mut child, ..
        } = self;
        drop(stdin);
        child.wait().await?;
        Ok(())
    }
}

fn map_closed(res: std::io::Result<()>) -> Result<(), BridgeError> {
    match res {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Err(BridgeError::StreamClosed),
        Err(e) => Err(e.into()),
    }
}
