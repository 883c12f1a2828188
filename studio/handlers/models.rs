use std::io::Cursor;
use tiny_http::Response;

use ferrite_lr::data::{template_csv, template::TEMPLATE_FILE_NAME};

use crate::handlers::is_safe_model_name;
use crate::state::SharedState;

/// `GET /models/{name}/download`
///
/// Serves the JSON file for the named model as a downloadable attachment.
pub fn handle_download(name: &str, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    if !is_safe_model_name(name) {
        return crate::routes::not_found();
    }

    let dir  = state.lock().unwrap().models_dir.clone();
    let path = dir.join(format!("{}.json", name));
    match std::fs::read_to_string(&path) {
        Ok(json) => {
            let filename = format!("{}.json", name);
            crate::routes::json_download_response(json, &filename)
        }
        Err(_) => crate::routes::not_found(),
    }
}

/// `GET /template.csv`
///
/// Sample input file with the expected column layout.
pub fn handle_template() -> Response<Cursor<Vec<u8>>> {
    match template_csv() {
        Ok(csv) => crate::routes::csv_download_response(csv, TEMPLATE_FILE_NAME),
        Err(e)  => {
            log::error!("could not render template CSV: {e}");
            crate::routes::server_error("Could not render the template CSV.")
        }
    }
}
