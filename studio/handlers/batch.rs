use std::io::{Cursor, Read};
use tiny_http::{Request, Response};

use ferrite_lr::data::template_dataset;
use ferrite_lr::format::rupiah;
use ferrite_lr::PredictionTable;

use crate::handlers::{build_model_options, error_html, list_models, load_model};
use crate::render::{html_escape, render_page, Page};
use crate::state::{BatchResult, FlashMessage, SharedState};
use crate::util::form::{form_get, parse_form};
use crate::util::multipart::{extract_boundary, extract_text_field, multipart_extract_file};

const MAX_CSV_BYTES: usize = 10 * 1024 * 1024;
/// Rows shown in the preview table; the download always has all of them.
const PREVIEW_ROWS: usize = 100;
const RESULT_FILE_NAME: &str = "salary_predictions.csv";

// ---------------------------------------------------------------------------
// GET /batch
// ---------------------------------------------------------------------------

pub fn handle_get(query: String, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let q_pairs  = parse_form(&query);
    let selected = form_get(&q_pairs, "model").unwrap_or("manual_model").to_owned();
    crate::routes::html_response(build_batch_page(&state, &selected, ""))
}

// ---------------------------------------------------------------------------
// POST /batch/upload
// ---------------------------------------------------------------------------

pub fn handle_upload(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    let boundary = match extract_boundary(&content_type) {
        Some(b) => b,
        None    => return show_error(&state, "", "Invalid multipart request."),
    };

    let body = match read_limited(request.as_reader(), MAX_CSV_BYTES) {
        Some(b) => b,
        None    => return show_error(&state, "", "File exceeds the 10 MB limit."),
    };

    let model = extract_text_field(&body, &boundary, "model")
        .unwrap_or_default()
        .trim()
        .to_owned();

    let csv_bytes = match multipart_extract_file(&body, &boundary) {
        Some(b) if !b.is_empty() => b,
        _ => return show_error(&state, &model, "No CSV file was uploaded."),
    };

    let dir = state.lock().unwrap().models_dir.clone();
    let result = match run_batch(&dir, &model, &csv_bytes) {
        Ok(r)    => r,
        Err(msg) => return show_error(&state, &model, &msg),
    };

    let n = result.rows.len();
    log::info!("batch prediction: {} rows with {}", n, model);

    let mut st = state.lock().unwrap();
    st.last_batch = Some(result);
    st.flash = Some(FlashMessage::success(format!("Predicted {} rows with {}.", n, model)));
    drop(st);

    crate::routes::redirect(&format!("/batch?model={}", model))
}

/// Reads at most `limit` bytes; `None` if the source holds more.
fn read_limited<R: Read>(reader: R, limit: usize) -> Option<Vec<u8>> {
    // One byte past the limit is enough to tell an oversized body apart.
    let mut body: Vec<u8> = Vec::new();
    let _ = reader.take(limit as u64 + 1).read_to_end(&mut body);
    if body.len() > limit { None } else { Some(body) }
}

fn run_batch(dir: &std::path::Path, model: &str, csv_bytes: &[u8]) -> Result<BatchResult, String> {
    let artifact = load_model(dir, model)?;
    let table = PredictionTable::from_reader(csv_bytes).map_err(|e| e.to_string())?;
    let predictions = artifact.predict(&table.features);
    let csv = table.to_csv_with_predictions(&predictions).map_err(|e| e.to_string())?;

    let points = table.features.iter()
        .zip(&predictions)
        .map(|(f, &p)| (f.experience, p))
        .collect();

    let mut headers = table.headers;
    headers.push(ferrite_lr::data::dataset::PREDICTED_SALARY.to_owned());
    let rows = table.rows.into_iter()
        .zip(&predictions)
        .map(|(mut row, &p)| {
            row.push(rupiah(p));
            row
        })
        .collect();

    Ok(BatchResult { model: model.to_owned(), headers, rows, points, csv })
}

// ---------------------------------------------------------------------------
// GET /batch/download
// ---------------------------------------------------------------------------

pub fn handle_download(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = state.lock().unwrap();
    let csv = st.last_batch.as_ref().map(|b| b.csv.clone());
    match csv {
        Some(csv) => {
            drop(st);
            crate::routes::csv_download_response(csv, RESULT_FILE_NAME)
        }
        None => {
            st.flash = Some(FlashMessage::error("Run a batch prediction before downloading."));
            drop(st);
            crate::routes::redirect("/batch")
        }
    }
}

// ---------------------------------------------------------------------------
// Page builder
// ---------------------------------------------------------------------------

fn show_error(state: &SharedState, model: &str, msg: &str) -> Response<Cursor<Vec<u8>>> {
    crate::routes::html_response(build_batch_page(state, model, &error_html(msg)))
}

fn build_batch_page(state: &SharedState, selected: &str, error: &str) -> String {
    let mut st = state.lock().unwrap();
    let flash  = st.take_flash();
    let dir    = st.models_dir.clone();
    let batch  = st.last_batch.clone();
    drop(st);

    let models        = list_models(&dir);
    let model_options = build_model_options(&models, selected, &dir);

    let result_html = match &batch {
        Some(b) => format!(
            r#"<div class="result-card">
  <h2>Predictions ({rows} rows, model {model})</h2>
  {svg}
  {table}
  <div class="mt"><a class="btn btn-primary" href="/batch/download">Download CSV</a></div>
</div>"#,
            rows  = b.rows.len(),
            model = html_escape(&b.model),
            svg   = build_svg_scatter(&b.points),
            table = build_result_table(b),
        ),
        None => String::new(),
    };

    render_page(Page::Batch, flash.as_ref(), |tmpl| {
        tmpl
            .replace("{{BATCH_MODEL_OPTIONS}}", &model_options)
            .replace("{{BATCH_ERROR}}", error)
            .replace("{{BATCH_RESULT}}", &result_html)
            .replace("{{TEMPLATE_PREVIEW}}", &build_template_preview())
    })
}

/// The sample rows offered by `/template.csv`, shown next to the download link.
fn build_template_preview() -> String {
    let body: String = template_dataset().records.iter()
        .map(|r| format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            r.features.experience,
            html_escape(&r.features.education.to_string()),
            rupiah(r.salary),
        ))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<table class="summary-table"><thead><tr><th>experience</th><th>education</th><th>salary</th></tr></thead><tbody>{}</tbody></table>"#,
        body
    )
}

fn build_result_table(batch: &BatchResult) -> String {
    let head: String = batch.headers.iter()
        .map(|h| format!("<th>{}</th>", html_escape(h)))
        .collect();
    let body: String = batch.rows.iter().take(PREVIEW_ROWS)
        .map(|row| {
            let cells: String = row.iter()
                .map(|c| format!("<td>{}</td>", html_escape(c)))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect::<Vec<_>>()
        .join("\n");
    let more = if batch.rows.len() > PREVIEW_ROWS {
        format!(
            r#"<p class="hint">Showing the first {} of {} rows.</p>"#,
            PREVIEW_ROWS,
            batch.rows.len()
        )
    } else {
        String::new()
    };
    format!(
        r#"<table class="summary-table"><thead><tr>{}</tr></thead><tbody>{}</tbody></table>{}"#,
        head, body, more
    )
}

// ---------------------------------------------------------------------------
// SVG scatter: experience vs predicted salary
// ---------------------------------------------------------------------------

fn build_svg_scatter(points: &[(f64, f64)]) -> String {
    if points.is_empty() {
        return "<p class=\"hint\">No points to plot.</p>".into();
    }

    let w = 760.0f64;
    let h = 260.0f64;
    let pad_l = 110.0f64;
    let pad_r = 16.0f64;
    let pad_t = 16.0f64;
    let pad_b = 34.0f64;

    let max_x = points.iter().map(|p| p.0).fold(0.0f64, f64::max).max(1.0) * 1.05;
    let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min).min(0.0);
    let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max).max(min_y + 1.0) * 1.05;

    let px = |x: f64, y: f64| -> (f64, f64) {
        let sx = pad_l + x / max_x * (w - pad_l - pad_r);
        let sy = pad_t + (max_y - y) / (max_y - min_y + 1e-12) * (h - pad_t - pad_b);
        (sx, sy)
    };

    let grey_grid = "#f0f2f5";
    let grey_text = "#999";
    let blue_dark = "#1e40af";

    let y_labels: String = (0..=4).map(|g| {
        let frac = g as f64 / 4.0;
        let val  = min_y + (max_y - min_y) * frac;
        let y    = pad_t + (1.0 - frac) * (h - pad_t - pad_b);
        format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"10\">{}</text>\n\
             <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>",
            pad_l - 4.0, y + 4.0, grey_text, rupiah(val),
            pad_l, y, w - pad_r, y, grey_grid
        )
    }).collect::<Vec<_>>().join("\n");

    let x_labels: String = (0..=4).map(|g| {
        let val = max_x * g as f64 / 4.0;
        let (x, _) = px(val, min_y);
        format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"10\">{:.1}</text>",
            x, h - 18.0, grey_text, val
        )
    }).collect::<Vec<_>>().join("\n");

    let dots: String = points.iter().map(|&(x, y)| {
        let (sx, sy) = px(x, y);
        format!("<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3.5\" fill=\"{}\" fill-opacity=\"0.7\"/>", sx, sy, blue_dark)
    }).collect::<Vec<_>>().join("\n");

    format!(
        "<svg class=\"scatter-svg\" width=\"{w}\" height=\"{h}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         {y_labels}\n{x_labels}\n{dots}\n\
         <text x=\"{cx:.1}\" y=\"{by:.1}\" text-anchor=\"middle\" fill=\"{grey_text}\" font-size=\"11\">experience (years)</text>\n\
         </svg>",
        cx = pad_l + (w - pad_l - pad_r) / 2.0,
        by = h - 3.0,
    )
}
