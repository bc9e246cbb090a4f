#![allow(non_snake_case)]

mod client;

use dioxus::LaunchBuilder;
use dioxus_logger::tracing::{self, Level};

use linkshield::{
    backend::BackendClient, config::Config, nav::Page, service::session::SessionManager,
};

use crate::client::app::AppContext;

fn main() {
    dotenvy::dotenv().ok();
    if let Err(e) = dioxus_logger::init(Level::INFO) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = Config::from_env();
    config.log_summary();

    let backend = BackendClient::new(&config);
    let session = SessionManager::new(backend, &config);

    // `linkshield '#diagnostic'` opens the diagnostic page directly
    let initial_page = std::env::args()
        .nth(1)
        .map(|fragment| Page::from_fragment(&fragment))
        .unwrap_or_default();

    tracing::info!(page = %initial_page, "Starting WebLink Shield");

    LaunchBuilder::desktop()
        .with_context(AppContext {
            config,
            session,
            initial_page,
        })
        .launch(client::App);
}
