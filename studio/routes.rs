use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::state::SharedState;
use crate::handlers;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Builds a header, dropping it if the value is not valid header text.
fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn body_response(
    status: u16,
    content_type: &str,
    extra: Vec<Option<Header>>,
    body: Vec<u8>,
) -> Response<Cursor<Vec<u8>>> {
    let len = body.len();
    let headers = std::iter::once(header("Content-Type", content_type))
        .chain(extra)
        .flatten()
        .collect();
    Response::new(StatusCode(status), headers, Cursor::new(body), Some(len), None)
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    body_response(200, "text/html; charset=utf-8", vec![], body.into_bytes())
}

pub fn redirect(location: &str) -> Response<Cursor<Vec<u8>>> {
    Response::new(
        StatusCode(303),
        [header("Location", location), header("Content-Length", "0")]
            .into_iter()
            .flatten()
            .collect(),
        Cursor::new(Vec::new()),
        Some(0),
        None,
    )
}

fn attachment(filename: &str) -> Option<Header> {
    header("Content-Disposition", &format!("attachment; filename=\"{}\"", filename))
}

pub fn json_download_response(body: String, filename: &str) -> Response<Cursor<Vec<u8>>> {
    body_response(200, "application/json", vec![attachment(filename)], body.into_bytes())
}

pub fn csv_download_response(body: String, filename: &str) -> Response<Cursor<Vec<u8>>> {
    body_response(200, "text/csv; charset=utf-8", vec![attachment(filename)], body.into_bytes())
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    body_response(404, "text/plain", vec![], b"404 Not Found".to_vec())
}

pub fn server_error(msg: &str) -> Response<Cursor<Vec<u8>>> {
    body_response(500, "text/plain", vec![], msg.as_bytes().to_vec())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// Handlers receive a `&mut Request` so that the dispatcher retains ownership
/// and can call `request.respond(response)` at the end.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();

    let (path, query) = if let Some(pos) = url.find('?') {
        (url[..pos].to_owned(), url[pos + 1..].to_owned())
    } else {
        (url.clone(), String::new())
    };

    log::debug!("{} {}", method, path);

    // Model download: dynamic path segment.
    if method == Method::Get && path.starts_with("/models/") && path.ends_with("/download") {
        let name = path
            .trim_start_matches("/models/")
            .trim_end_matches("/download")
            .to_owned();
        let resp = handlers::models::handle_download(&name, state);
        let _ = request.respond(resp);
        return;
    }

    let response = match (method, path.as_str()) {
        // ── Root redirect ─────────────────────────────────────────────────
        (Method::Get, "/") => redirect("/predict"),

        // ── Predict ──────────────────────────────────────────────────────
        (Method::Get,  "/predict") => handlers::predict::handle_get(query, state),
        (Method::Post, "/predict") => handlers::predict::handle_post(&mut request, state),

        // ── Batch ────────────────────────────────────────────────────────
        (Method::Get,  "/batch")          => handlers::batch::handle_get(query, state),
        (Method::Post, "/batch/upload")   => handlers::batch::handle_upload(&mut request, state),
        (Method::Get,  "/batch/download") => handlers::batch::handle_download(state),

        // ── Static downloads ─────────────────────────────────────────────
        (Method::Get, "/template.csv") => handlers::models::handle_template(),

        // ── 404 ──────────────────────────────────────────────────────────
        _ => not_found(),
    };

    let _ = request.respond(response);
}
