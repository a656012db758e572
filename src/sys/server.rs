use crate::events::AppEvent;
use async_channel::Sender;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/rondel.sock";

/// Parses one line of the control protocol: `open`, `open 2/0`, `close`.
/// Unknown or malformed lines resolve to `None` and are dropped.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let mut words = line.trim().split_whitespace();
    match words.next()? {
        "open" => match words.next() {
            Some(path) => parse_level_path(path).map(|p| AppEvent::Open(Some(p))),
            None => Some(AppEvent::Open(None)),
        },
        "close" => Some(AppEvent::Close),
        _ => None,
    }
}

fn parse_level_path(s: &str) -> Option<Vec<usize>> {
    s.split('/').map(|seg| seg.parse().ok()).collect()
}

/// One-shot client used by the CLI subcommands.
pub fn send_command(line: &str) -> std::io::Result<()> {
    let mut stream = std::os::unix::net::UnixStream::connect(SOCKET_PATH)?;
    stream.write_all(line.as_bytes())?;
    stream.write_all(b"\n")
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match parse_command(&line) {
                            Some(event) => {
                                let _ = tx.send(event).await;
                            }
                            None => log::warn!("Ignoring control command: {:?}", line),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
