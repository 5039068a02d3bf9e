//! HTTP endpoint probe logic.
//!
//! Issues one GET against one target endpoint with a hard timeout.
//! All failure modes are absorbed into the returned `ProbeOutcome`;
//! retries and scheduling belong to the polling session, not here.

use std::time::{Duration, Instant};

use http_body_util::{BodyExt, Empty};
use tracing::debug;

use vigil_core::{
    ConfigError, ProbeError, ProbeOutcome, ProbeTarget, BODY_SNIPPET_MAX,
};

/// Validated base URL that target paths are resolved against.
///
/// Parsed once at session construction so malformed URLs fail fast,
/// before any polling begins. Only plain `http` is supported; probes
/// run against the service's internal listen address, not its public
/// TLS edge.
#[derive(Debug, Clone)]
pub struct ProbeUrl {
    /// host:port used for the TCP connect and the Host header.
    authority: String,
    /// Path prefix from the base URL, without a trailing slash.
    base_path: String,
}

impl ProbeUrl {
    /// Parse and validate a base URL.
    pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let uri: http::Uri = base_url
            .parse()
            .map_err(|e: http::uri::InvalidUri| invalid(e.to_string()))?;

        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => {
                return Err(invalid(format!("unsupported scheme {other:?}, expected http")))
            }
            None => return Err(invalid("missing scheme".to_string())),
        }
        if uri.query().is_some() {
            return Err(invalid("query string not allowed in base url".to_string()));
        }

        let host = uri
            .host()
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let port = uri.port_u16().unwrap_or(80);

        Ok(Self {
            authority: format!("{host}:{port}"),
            base_path: uri.path().trim_end_matches('/').to_string(),
        })
    }

    /// host:port for the TCP connect and the Host header.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Origin-form request path for one target.
    pub fn path_for(&self, target_path: &str) -> String {
        if target_path.starts_with('/') {
            format!("{}{}", self.base_path, target_path)
        } else {
            format!("{}/{}", self.base_path, target_path)
        }
    }

    /// Check that a target's joined path forms a legal request path.
    pub fn validate_target(&self, target: &ProbeTarget) -> Result<(), ConfigError> {
        let path = self.path_for(&target.path);
        path.parse::<http::uri::PathAndQuery>()
            .map_err(|e| ConfigError::InvalidTargetPath {
                path: target.path.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// Probe one target endpoint.
///
/// Returns within `timeout`: a request still in flight at the deadline
/// is dropped and recorded as `ProbeError::Timeout`. Connect, handshake,
/// and mid-body failures are recorded as `ProbeError::ConnectionFailed`.
/// A completed exchange is recorded with its status and a bounded body
/// snippet regardless of the status value; 4xx/5xx judgment belongs to
/// the classifier.
pub async fn probe(base: &ProbeUrl, target: &ProbeTarget, timeout: Duration) -> ProbeOutcome {
    let started = Instant::now();
    let path = base.path_for(&target.path);

    match tokio::time::timeout(timeout, send_probe(base, &path, started)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            debug!(%path, authority = base.authority(), "probe timed out");
            ProbeOutcome::failure(ProbeError::Timeout, elapsed_ms(started))
        }
    }
}

/// The un-timed probe body: connect, handshake, send, collect.
async fn send_probe(base: &ProbeUrl, path: &str, started: Instant) -> ProbeOutcome {
    let stream = match tokio::net::TcpStream::connect(base.authority()).await {
        Ok(s) => s,
        Err(e) => {
            debug!(error = %e, %path, "probe connection failed");
            return ProbeOutcome::failure(ProbeError::ConnectionFailed, elapsed_ms(started));
        }
    };

    let io = hyper_util::rt::TokioIo::new(stream);
    let (mut sender, conn) = match hyper::client::conn::http1::handshake(io).await {
        Ok(pair) => pair,
        Err(e) => {
            debug!(error = %e, %path, "probe handshake failed");
            return ProbeOutcome::failure(ProbeError::ConnectionFailed, elapsed_ms(started));
        }
    };

    // Drive the connection in the background.
    tokio::spawn(async move {
        let _ = conn.await;
    });

    let req = match http::Request::builder()
        .method("GET")
        .uri(path)
        .header("host", base.authority())
        .header("user-agent", "vigil-probe/0.1")
        .body(Empty::<bytes::Bytes>::new())
    {
        Ok(req) => req,
        Err(e) => {
            debug!(error = %e, %path, "failed to build probe request");
            return ProbeOutcome::failure(ProbeError::ConnectionFailed, elapsed_ms(started));
        }
    };

    let resp = match sender.send_request(req).await {
        Ok(resp) => resp,
        Err(e) => {
            debug!(error = %e, %path, "probe request failed");
            return ProbeOutcome::failure(ProbeError::ConnectionFailed, elapsed_ms(started));
        }
    };

    let status = resp.status().as_u16();
    match resp.into_body().collect().await {
        Ok(collected) => {
            let body = collected.to_bytes();
            ProbeOutcome::response(status, snippet(&body), elapsed_ms(started))
        }
        Err(e) => {
            debug!(error = %e, %path, status, "probe body read failed");
            ProbeOutcome::failure(ProbeError::ConnectionFailed, elapsed_ms(started))
        }
    }
}

/// Bounded-length prefix of the response body, lossily decoded.
fn snippet(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(BODY_SNIPPET_MAX)
        .collect()
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Loopback server answering every request with a canned response.
    async fn spawn_server(status_line: &'static str, body: &'static str) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = stream.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                });
            }
        });
        addr
    }

    fn base_for(addr: SocketAddr) -> ProbeUrl {
        ProbeUrl::parse(&format!("http://{addr}")).unwrap()
    }

    #[test]
    fn parse_defaults_port_80() {
        let base = ProbeUrl::parse("http://deploy.internal").unwrap();
        assert_eq!(base.authority(), "deploy.internal:80");
        assert_eq!(base.path_for("/healthz"), "/healthz");
    }

    #[test]
    fn parse_joins_base_path() {
        let base = ProbeUrl::parse("http://deploy.internal:3000/app/").unwrap();
        assert_eq!(base.authority(), "deploy.internal:3000");
        assert_eq!(base.path_for("/status"), "/app/status");
        assert_eq!(base.path_for("status"), "/app/status");
    }

    #[test]
    fn parse_rejects_non_http() {
        assert!(matches!(
            ProbeUrl::parse("https://deploy.internal"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ProbeUrl::parse("deploy.internal:3000"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ProbeUrl::parse("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn parse_rejects_query_string() {
        assert!(matches!(
            ProbeUrl::parse("http://deploy.internal/?x=1"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn validate_target_rejects_illegal_path() {
        let base = ProbeUrl::parse("http://deploy.internal").unwrap();
        let target = ProbeTarget::bare("/status with spaces");
        assert!(matches!(
            base.validate_target(&target),
            Err(ConfigError::InvalidTargetPath { .. })
        ));
        base.validate_target(&ProbeTarget::bare("/healthz")).unwrap();
    }

    #[tokio::test]
    async fn probe_to_closed_port_is_connection_failed() {
        // Port 1 won't be listening.
        let base = ProbeUrl::parse("http://127.0.0.1:1").unwrap();
        let outcome = probe(
            &base,
            &ProbeTarget::bare("/healthz"),
            Duration::from_millis(500),
        )
        .await;
        assert_eq!(outcome.error, ProbeError::ConnectionFailed);
        assert_eq!(outcome.status, 0);
    }

    #[tokio::test]
    async fn probe_records_status_and_body() {
        let addr = spawn_server("200 OK", "build v3.0 ready").await;
        let outcome = probe(
            &base_for(addr),
            &ProbeTarget::bare("/"),
            Duration::from_secs(2),
        )
        .await;
        assert_eq!(outcome.error, ProbeError::None);
        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.body_snippet, "build v3.0 ready");
    }

    #[tokio::test]
    async fn probe_does_not_judge_error_statuses() {
        let addr = spawn_server("503 Service Unavailable", "upstream down").await;
        let outcome = probe(
            &base_for(addr),
            &ProbeTarget::bare("/"),
            Duration::from_secs(2),
        )
        .await;
        // 5xx is still a completed exchange at this layer.
        assert_eq!(outcome.error, ProbeError::None);
        assert_eq!(outcome.status, 503);
        assert_eq!(outcome.body_snippet, "upstream down");
    }

    #[tokio::test]
    async fn probe_truncates_long_bodies() {
        let body: &'static str = Box::leak("deploy".repeat(100).into_boxed_str());
        let addr = spawn_server("200 OK", body).await;
        let outcome = probe(
            &base_for(addr),
            &ProbeTarget::bare("/"),
            Duration::from_secs(2),
        )
        .await;
        assert_eq!(outcome.error, ProbeError::None);
        assert_eq!(outcome.body_snippet.chars().count(), BODY_SNIPPET_MAX);
    }

    #[tokio::test]
    async fn probe_times_out_on_silent_server() {
        // Accepts connections but never responds.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    drop(stream);
                });
            }
        });

        let outcome = probe(
            &base_for(addr),
            &ProbeTarget::bare("/healthz"),
            Duration::from_millis(200),
        )
        .await;
        assert_eq!(outcome.error, ProbeError::Timeout);
        assert_eq!(outcome.status, 0);
        assert!(outcome.elapsed_ms >= 200);
    }
}
