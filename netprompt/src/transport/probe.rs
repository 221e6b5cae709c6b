//! TCP reachability probe.

use std::time::Duration;

use log::debug;
use tokio::net::TcpStream;
use tokio::time::Instant;

/// Check that `host:port` accepts TCP connections within `timeout`.
///
/// The connection attempt is awaited against a deadline rather than polled,
/// so a refused connection returns at once and a silent host returns after
/// `timeout`. The socket is dropped either way. Never errors: any failure
/// is `false`.
pub async fn probe(host: &str, port: u16, timeout: Duration) -> bool {
    let start = Instant::now();

    match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(_stream)) => {
            debug!("probe {}:{} connected in {:?}", host, port, start.elapsed());
            true
        }
        Ok(Err(e)) => {
            debug!("probe {}:{} failed: {}", host, port, e);
            false
        }
        Err(_) => {
            debug!("probe {}:{} timed out after {:?}", host, port, timeout);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_probe_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(probe("127.0.0.1", port, Duration::from_secs(2)).await);
    }

    #[tokio::test]
    async fn test_probe_refused_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let start = Instant::now();
        assert!(!probe("127.0.0.1", port, Duration::from_secs(2)).await);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_probe_unreachable_is_bounded() {
        // Non-routable address: either unreachable at once or silent until the deadline.
        let start = Instant::now();
        assert!(!probe("10.255.255.1", 22, Duration::from_secs(2)).await);
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
