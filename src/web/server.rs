use std::io::Read;
use std::sync::Arc;
use std::thread;

use tiny_http::{Header, Request, Response, Server, StatusCode};
use tracing::{debug, error, info, warn};

use crate::app::AppContext;
use crate::error::{OracleError, Result};
use crate::web::routes::{handle, Reply};

/// Largest request body accepted; larger bodies get 413.
const MAX_BODY_BYTES: usize = 64 * 1024;

fn content_type(value: &str) -> Option<Header> {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes()).ok()
}

fn respond(request: Request, reply: Reply) {
    let mut response = Response::from_string(reply.body).with_status_code(StatusCode(reply.status));
    if let Some(header) = content_type(reply.content_type) {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        warn!(error = %e, "failed to send response");
    }
}

fn error_reply(status: u16, msg: &str) -> Reply {
    Reply {
        status,
        content_type: "application/json",
        body: serde_json::json!({ "error": msg }).to_string(),
    }
}

/// Read the whole body, refusing anything over `MAX_BODY_BYTES`.
///
/// `declared` is the Content-Length, if any; chunked bodies are measured
/// while reading.
fn read_body<R: Read>(reader: R, declared: Option<usize>) -> std::result::Result<String, Reply> {
    if declared.map_or(false, |len| len > MAX_BODY_BYTES) {
        return Err(error_reply(413, "Payload Too Large"));
    }

    let mut body = String::new();
    if let Err(e) = reader.take(MAX_BODY_BYTES as u64 + 1).read_to_string(&mut body) {
        warn!(error = %e, "unreadable request body");
        return Err(error_reply(400, "Failed to read request body"));
    }
    if body.len() > MAX_BODY_BYTES {
        return Err(error_reply(413, "Payload Too Large"));
    }
    Ok(body)
}

fn serve_one(ctx: &AppContext, mut request: Request) {
    let declared = request.body_length();
    let body = match read_body(request.as_reader(), declared) {
        Ok(body) => body,
        Err(reply) => {
            warn!(status = reply.status, declared = ?declared, "rejected request body");
            respond(request, reply);
            return;
        }
    };

    let method = request.method().clone();
    let url = request.url().to_string();
    let reply = handle(ctx, &method, &url, &body);
    debug!(%method, %url, status = reply.status, "handled request");
    respond(request, reply);
}

fn worker_loop(id: usize, server: Arc<Server>, ctx: Arc<AppContext>) {
    loop {
        match server.recv() {
            Ok(request) => serve_one(&ctx, request),
            Err(e) => {
                error!(worker = id, error = %e, "listener failed, worker exiting");
                break;
            }
        }
    }
}

/// Bind the configured address and serve until the listener fails.
///
/// Each worker thread takes requests off the shared listener and handles
/// them to completion.
pub fn run_server(ctx: Arc<AppContext>) -> Result<()> {
    let config = ctx.config();
    let server = Server::http(config.bind.as_str())
        .map_err(|e| OracleError::ConfigError(format!("failed to bind {}: {}", config.bind, e)))?;
    let server = Arc::new(server);

    info!(addr = %config.bind, workers = config.workers, "oracle listening on http://{}", config.bind);

    let handles: Vec<_> = (0..config.workers)
        .map(|id| {
            let server = Arc::clone(&server);
            let ctx = Arc::clone(&ctx);
            thread::Builder::new()
                .name(format!("oracle-worker-{}", id))
                .spawn(move || worker_loop(id, server, ctx))
        })
        .collect::<std::io::Result<_>>()?;

    for handle in handles {
        if handle.join().is_err() {
            error!("worker thread panicked");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_body_within_limit() {
        let body = read_body(Cursor::new("text=the+king&action=predict"), Some(28)).unwrap();
        assert_eq!(body, "text=the+king&action=predict");
    }

    #[test]
    fn test_declared_oversize_body_is_rejected() {
        let reply = read_body(Cursor::new(""), Some(MAX_BODY_BYTES + 1)).unwrap_err();
        assert_eq!(reply.status, 413);
    }

    #[test]
    fn test_chunked_oversize_body_is_rejected() {
        let big = "a".repeat(MAX_BODY_BYTES + 10);
        let reply = read_body(Cursor::new(big), None).unwrap_err();
        assert_eq!(reply.status, 413);

        let exact = "a".repeat(MAX_BODY_BYTES);
        assert_eq!(read_body(Cursor::new(exact), None).unwrap().len(), MAX_BODY_BYTES);
    }

    #[test]
    fn test_invalid_utf8_body_is_bad_request() {
        let reply = read_body(Cursor::new(vec![0xff, 0xfe]), None).unwrap_err();
        assert_eq!(reply.status, 400);
    }
}
