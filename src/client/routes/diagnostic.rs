use std::sync::Arc;

use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{
    FaArrowLeft, FaCircleCheck, FaCircleInfo, FaCircleXmark,
};
use dioxus_free_icons::Icon;

use linkshield::{
    nav::Page,
    service::diagnostic::{DiagnosticResult, DiagnosticStatus, Diagnostics},
};

use crate::client::{app::AppContext, components::Page as PageLayout};

#[component]
fn ResultRow(result: DiagnosticResult) -> Element {
    let (class, icon) = match result.status {
        DiagnosticStatus::Success => ("text-success", rsx!(Icon { width: 16, height: 16, icon: FaCircleCheck })),
        DiagnosticStatus::Error => ("text-error", rsx!(Icon { width: 16, height: 16, icon: FaCircleXmark })),
        DiagnosticStatus::Info => ("text-info", rsx!(Icon { width: 16, height: 16, icon: FaCircleInfo })),
    };
    let details = result
        .details
        .as_ref()
        .and_then(|details| serde_json::to_string_pretty(details).ok());
    let time = result.timestamp.format("%H:%M:%S").to_string();

    rsx!(
        li { class: "card bg-base-200",
            div { class: "card-body py-3 gap-1",
                div { class: "flex items-center gap-2",
                    span { class: "{class}", {icon} }
                    span { class: "font-medium", "{result.test}" }
                    span { class: "ml-auto text-xs opacity-60", "{time}" }
                }
                p { class: "text-sm", "{result.message}" }
                if let Some(details) = details {
                    pre { class: "text-xs bg-base-300 rounded p-2 overflow-x-auto", "{details}" }
                }
            }
        }
    )
}

#[component]
pub fn Diagnostic() -> Element {
    let context = use_context::<AppContext>();
    let mut page = use_context::<Signal<Page>>();

    let diagnostics = use_hook(|| Arc::new(Diagnostics::new(&context.config)));
    let mut results = use_signal(Vec::<DiagnosticResult>::new);
    let mut running = use_signal(|| false);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    let checks = diagnostics.clone();
    let run_checks = move |_| {
        let diagnostics = checks.clone();
        running.set(true);
        spawn(async move {
            results.set(diagnostics.run().await);
            running.set(false);
        });
    };

    let sign_in = diagnostics.clone();
    let test_sign_in = move |event: FormEvent| {
        event.prevent_default();
        let diagnostics = sign_in.clone();
        let (email, password) = (email(), password());
        if email.trim().is_empty() || password.is_empty() {
            return;
        }

        running.set(true);
        spawn(async move {
            let result = diagnostics.test_sign_in(email.trim(), &password).await;
            results.write().push(result);
            running.set(false);
        });
    };

    rsx!(
        PageLayout { class: "bg-base-100",
            div { class: "max-w-3xl mx-auto flex flex-col gap-6 py-6",
                button {
                    class: "btn btn-ghost btn-sm self-start flex gap-2",
                    onclick: move |_| page.set(Page::Home),
                    Icon { width: 14, height: 14, icon: FaArrowLeft }
                    "Back to Home"
                }
                h1 { class: "text-2xl font-bold", "Connection Diagnostics" }
                p { class: "text-sm opacity-70",
                    "Backend: {context.config.backend_url}"
                }
                div { class: "flex gap-2",
                    button {
                        class: "btn btn-primary",
                        disabled: running(),
                        onclick: run_checks,
                        if running() { "Running..." } else { "Run Checks" }
                    }
                    button {
                        class: "btn btn-ghost",
                        disabled: running() || results.read().is_empty(),
                        onclick: move |_| results.set(Vec::new()),
                        "Clear"
                    }
                }
                form { class: "card bg-base-200", onsubmit: test_sign_in,
                    div { class: "card-body gap-2",
                        h3 { class: "card-title text-base", "Test Sign In" }
                        input {
                            class: "input input-bordered w-full",
                            r#type: "email",
                            placeholder: "Email",
                            value: "{email}",
                            oninput: move |event| email.set(event.value()),
                        }
                        input {
                            class: "input input-bordered w-full",
                            r#type: "password",
                            placeholder: "Password",
                            value: "{password}",
                            oninput: move |event| password.set(event.value()),
                        }
                        button { class: "btn btn-secondary", r#type: "submit", disabled: running(), "Test Credentials" }
                    }
                }
                ul { class: "flex flex-col gap-2",
                    for (index, result) in results.read().iter().cloned().enumerate() {
                        ResultRow { key: "{index}", result }
                    }
                }
            }
        }
    )
}
