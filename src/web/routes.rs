//! Request routing, independent of the HTTP transport.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tiny_http::Method;
use tracing::{error, warn};

use crate::app::{AppContext, Verdict};
use crate::predictor::Candidate;
use crate::web::page::{render_page, Banner, CONFUSED_MESSAGE, EMPTY_INPUT_MESSAGE, FAILURE_MESSAGE};
use crate::window::TokenWindow;

/// Response produced by [`handle`].
#[derive(Clone, Debug)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn html(status: u16, body: String) -> Self {
        Reply { status, content_type: "text/html; charset=utf-8", body }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
        Reply { status, content_type: "application/json", body }
    }

    fn error_json(status: u16, msg: &str) -> Self {
        Reply::json(status, &serde_json::json!({ "error": msg }))
    }
}

#[derive(Deserialize)]
struct ApiRequest {
    #[serde(default)]
    text: String,
    top_k: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Predicted,
    EmptyInput,
    Confused,
}

#[derive(Serialize)]
struct ApiResponse {
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    window: Option<TokenWindow>,
    candidates: Vec<Candidate>,
}

/// Decode one `application/x-www-form-urlencoded` component.
///
/// `+` becomes a space and `%XX` a byte; malformed escapes are kept verbatim.
pub fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                i = push_escape(bytes, i, &mut out);
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Push the byte for the escape at `bytes[i]` and return the next position.
fn push_escape(bytes: &[u8], i: usize, out: &mut Vec<u8>) -> usize {
    let hex = |b: u8| (b as char).to_digit(16);
    if i + 2 < bytes.len() {
        if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
            out.push((hi * 16 + lo) as u8);
            return i + 3;
        }
    }
    out.push(b'%');
    i + 1
}

/// Parse a form body into field → value. Later duplicates win.
pub fn parse_form(body: &str) -> HashMap<String, String> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_component(key), decode_component(value)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

fn form_page(ctx: &AppContext, body: &str) -> Reply {
    let form = parse_form(body);
    let config = ctx.config();

    if let Some(example) = form.get("example") {
        return Reply::html(200, render_page(config, example, None));
    }

    let text = form.get("text").map(String::as_str).unwrap_or("");
    if form.get("action").map(String::as_str) != Some("predict") {
        return Reply::html(200, render_page(config, text, None));
    }

    let (status, banner) = match ctx.consult(text, config.top_k) {
        Ok(Verdict::EmptyInput) => (200, Banner::Warning(EMPTY_INPUT_MESSAGE.to_string())),
        Ok(Verdict::Predicted { word, report }) => (200, Banner::Success { word, candidates: report.candidates }),
        Ok(Verdict::Confused { .. }) => (200, Banner::Error(CONFUSED_MESSAGE.to_string())),
        Err(err) => {
            error!(error = %err, "prediction failed");
            (500, Banner::Error(FAILURE_MESSAGE.to_string()))
        }
    };

    Reply::html(status, render_page(config, text, Some(&banner)))
}

fn api_predict(ctx: &AppContext, body: &str) -> Reply {
    let request: ApiRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return Reply::error_json(400, &e.to_string()),
    };
    let top_k = request.top_k.unwrap_or(ctx.config().top_k);

    let response = match ctx.consult(&request.text, top_k) {
        Ok(Verdict::EmptyInput) => {
            ApiResponse { outcome: Outcome::EmptyInput, word: None, window: None, candidates: Vec::new() }
        }
        Ok(Verdict::Predicted { word, report }) => ApiResponse {
            outcome: Outcome::Predicted,
            word: Some(word),
            window: Some(report.window),
            candidates: report.candidates,
        },
        Ok(Verdict::Confused { report }) => ApiResponse {
            outcome: Outcome::Confused,
            word: None,
            window: Some(report.window),
            candidates: report.candidates,
        },
        Err(err) => {
            error!(error = %err, "prediction failed");
            return Reply::error_json(500, "prediction failed");
        }
    };

    Reply::json(200, &response)
}

fn health(ctx: &AppContext) -> Reply {
    Reply::json(
        200,
        &serde_json::json!({
            "status": "ok",
            "model": ctx.metadata().map(|m| m.model_name.as_str()),
            "window_len": ctx.model().window_len(),
            "vocab_size": ctx.vocab().len(),
        }),
    )
}

/// Route one request. `url` may carry a query string, which is ignored.
pub fn handle(ctx: &AppContext, method: &Method, url: &str, body: &str) -> Reply {
    let path = url.split('?').next().unwrap_or("/");

    match (method, path) {
        (Method::Get, "/") => Reply::html(200, render_page(ctx.config(), "", None)),
        (Method::Post, "/") => form_page(ctx, body),
        (Method::Post, "/api/predict") => api_predict(ctx, body),
        (Method::Get, "/health") => health(ctx),
        (_, "/") | (_, "/api/predict") | (_, "/health") => {
            warn!(%method, path, "method not allowed");
            Reply::error_json(405, "Method Not Allowed")
        }
        _ => Reply::error_json(404, "Not Found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_component() {
        assert_eq!(decode_component("To+be+or+not+to"), "To be or not to");
        assert_eq!(decode_component("that%27s%20dead"), "that's dead");
        assert_eq!(decode_component("caf%C3%A9"), "caf\u{e9}");
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz%4"), "%zz%4");
    }

    #[test]
    fn test_parse_form_fields() {
        let form = parse_form("text=the+king&action=predict&flag&text=is");
        assert_eq!(form.get("text").map(String::as_str), Some("is"));
        assert_eq!(form.get("action").map(String::as_str), Some("predict"));
        assert_eq!(form.get("flag").map(String::as_str), Some(""));
        assert!(parse_form("").is_empty());
    }
}
