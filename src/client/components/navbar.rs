use dioxus::prelude::*;
use dioxus_logger::tracing;

use linkshield::{
    nav::{Page, Section},
    service::session::SessionState,
};

use crate::client::{app::AppContext, components::ShieldTitleButton};

#[component]
pub fn Navbar() -> Element {
    let context = use_context::<AppContext>();
    let mut page = use_context::<Signal<Page>>();
    let session_state = use_context::<Signal<SessionState>>();

    let display_name = session_state
        .read()
        .profile()
        .map(|profile| profile.display_name());

    let sign_out = move |_| {
        let session = context.session.clone();
        spawn(async move {
            if let Err(e) = session.sign_out().await {
                tracing::error!(error = %e, "Sign out failed");
            }
            page.set(Page::Home);
        });
    };

    rsx! {
        div {
            class: "navbar bg-base-200 sticky top-0 z-50",
            div {
                class: "navbar-start",
                ShieldTitleButton {}
            }
            div {
                class: "navbar-center hidden md:flex",
                ul { class: "menu menu-horizontal gap-2",
                    for section in Section::ALL {
                        li {
                            a {
                                href: "#{section.anchor()}",
                                onclick: move |_| page.set(Page::Home),
                                "{section.label()}"
                            }
                        }
                    }
                }
            }
            div {
                class: "navbar-end",
                if let Some(name) = display_name {
                    div { class: "flex items-center gap-2",
                        p { class: "text-sm font-medium",
                            "{name}"
                        }
                        button {
                            class: "btn btn-secondary btn-sm",
                            onclick: move |_| page.set(Page::Account),
                            "Account"
                        }
                        button {
                            class: "btn btn-ghost btn-sm",
                            onclick: sign_out,
                            "Sign Out"
                        }
                    }
                } else {
                    button {
                        class: "btn btn-primary btn-sm",
                        onclick: move |_| page.set(Page::Auth),
                        "Sign In"
                    }
                }
            }
        }
    }
}
