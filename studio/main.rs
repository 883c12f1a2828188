/// ferrite-lr Studio
///
/// A small browser front end for the salary models produced by
/// `ferrite-lr train`. Served by a synchronous tiny_http server; no
/// JavaScript frameworks required.
///
/// Run with:
///   cargo run --bin studio --release
/// Then open http://127.0.0.1:7878
///
/// Environment:
///   STUDIO_ADDR  listen address (default 127.0.0.1:7878)
///   MODELS_DIR   directory holding model artifacts (default models)
///
/// Tabs:
///   1. Predict: one estimate from experience and education
///   2. Batch  : upload a CSV, view and download predictions

mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tiny_http::Server;

use state::StudioState;

const DEFAULT_ADDR: &str = "127.0.0.1:7878";
const DEFAULT_MODELS_DIR: &str = "models";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let addr = std::env::var("STUDIO_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());
    let models_dir = PathBuf::from(
        std::env::var("MODELS_DIR").unwrap_or_else(|_| DEFAULT_MODELS_DIR.to_owned()),
    );

    let server = match Server::http(addr.as_str()) {
        Ok(s)  => s,
        Err(e) => {
            log::error!("failed to bind HTTP server on {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(&models_dir) {
        log::warn!("could not create {}: {e}", models_dir.display());
    }

    let shared_state = Arc::new(Mutex::new(StudioState::new(models_dir.clone())));

    println!("╔══════════════════════════════════════════════╗");
    println!("║          ferrite-lr Studio                   ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Open in your browser:                       ║");
    println!("║  http://{:<37}║", addr);
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Tabs: Predict > Batch                       ║");
    println!("╚══════════════════════════════════════════════╝");
    log::info!("serving models from {}", models_dir.display());

    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}
