//! Control-Plane Requester
//!
//! One-shot request/response exchanges with peer control listeners. Every
//! attempt uses a fresh ephemeral socket connected to the target, so stray
//! datagrams from other peers can never be mistaken for the reply.

use std::time::Duration;

use anyhow::{Result, anyhow};
use tokio::net::UdpSocket;

/// Reply wait per attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_millis(500);

/// Attempts per exchange before the error is surfaced to the caller.
const REQUEST_ATTEMPTS: usize = 3;

const RECV_BUFFER_SIZE: usize = 65536;

#[derive(Debug, Clone)]
pub struct ControlClient {
    timeout: Duration,
    attempts: usize,
}

impl ControlClient {
    pub fn new() -> Self {
        Self {
            timeout: REQUEST_TIMEOUT,
            attempts: REQUEST_ATTEMPTS,
        }
    }

    /// Client with a custom timeout and attempt count. Tests shorten both.
    pub fn with_policy(timeout: Duration, attempts: usize) -> Self {
        Self {
            timeout,
            attempts: attempts.max(1),
        }
    }

    /// Sends `frame` to `target` and returns the trimmed reply text.
    /// Attempts back off exponentially with jitter; the last error is
    /// returned once every attempt has failed.
    pub async fn exchange(&self, target: &str, frame: &str) -> Result<String> {
        let mut delay_ms: u64 = 150;

        for attempt in 0..self.attempts {
            match self.attempt(target, frame).await {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    if attempt + 1 == self.attempts {
                        return Err(e);
                    }
                    tracing::debug!(
                        "Control exchange with {} failed (attempt {}): {}",
                        target,
                        attempt + 1,
                        e
                    );
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(anyhow!("retry attempts exhausted for {}", target))
    }

    async fn attempt(&self, target: &str, frame: &str) -> Result<String> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(target).await?;
        socket.send(frame.as_bytes()).await?;

        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let len = match tokio::time::timeout(self.timeout, socket.recv(&mut buf)).await {
            Ok(received) => received?,
            Err(_) => return Err(anyhow!("no reply from {} within {:?}", target, self.timeout)),
        };

        Ok(String::from_utf8_lossy(&buf[..len]).trim().to_string())
    }
}
