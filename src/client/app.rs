use dioxus::prelude::*;
use dioxus_logger::tracing;

use linkshield::{
    config::Config,
    nav::Page,
    service::{
        diagnostic::Diagnostics,
        session::{SessionManager, SessionState},
    },
};

use crate::client::{
    components::{Footer, Navbar},
    routes::{Account, Auth, Diagnostic, Home},
};

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Shared state handed to the app at launch.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub session: SessionManager,
    pub initial_page: Page,
}

#[component]
pub fn App() -> Element {
    let context = use_context::<AppContext>();
    let page = use_context_provider(|| Signal::new(context.initial_page));
    let mut session_state = use_context_provider(|| Signal::new(SessionState::Initializing));

    let config = context.config.clone();
    use_future(move || {
        let config = config.clone();
        async move {
            Diagnostics::new(&config).check_connection().await;
        }
    });

    let session = context.session.clone();
    use_future(move || {
        let session = session.clone();
        async move {
            session.init().await;

            let mut changes = session.subscribe();
            loop {
                let state = changes.borrow_and_update().clone();
                tracing::debug!(authenticated = state.is_authenticated(), "Session state changed");
                session_state.set(state);

                if changes.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    use_effect(move || {
        let fragment = page().fragment();
        document::eval(&format!("window.location.hash = '{}';", fragment));
    });

    let current = match session_state.read().is_loading() {
        true => page(),
        false => page().resolve(session_state.read().is_authenticated()),
    };

    rsx! {
        document::Stylesheet { href: MAIN_CSS }
        document::Script { src: "https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" }
        document::Title { "WebLink Shield | {current}" }

        div { class: "min-h-screen bg-base-100",
            if current.shows_chrome() {
                Navbar {}
            }
            main {
                match current {
                    Page::Home => rsx!(Home {}),
                    Page::Auth => rsx!(Auth {}),
                    Page::Account => rsx!(Account {}),
                    Page::Diagnostic => rsx!(Diagnostic {}),
                }
            }
            if current.shows_chrome() {
                Footer {}
            }
        }
    }
}
