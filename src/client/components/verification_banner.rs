use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::FaTriangleExclamation;
use dioxus_free_icons::Icon;

use linkshield::{model::auth::Identity, service::session::SessionState};

use crate::client::app::AppContext;

/// Shown to signed-in users whose email is not confirmed yet.
#[component]
pub fn EmailVerificationBanner() -> Element {
    let context = use_context::<AppContext>();
    let session_state = use_context::<Signal<SessionState>>();
    let mut sending = use_signal(|| false);
    let mut message = use_signal(|| None::<Result<String, String>>);

    let verified = session_state
        .read()
        .identity()
        .map(Identity::is_email_verified)
        .unwrap_or(true);
    if verified {
        return rsx!();
    }

    let send = move |_| {
        let session = context.session.clone();
        spawn(async move {
            sending.set(true);
            message.set(None);

            let result = match session.send_email_verification().await {
                Ok(()) => Ok("Verification email sent! Please check your inbox.".to_string()),
                Err(e) => Err(format!("Failed to send verification email: {}", e.user_message())),
            };

            message.set(Some(result));
            sending.set(false);
        });
    };

    rsx!(
        div { class: "alert alert-warning mb-6 items-start",
            Icon {
                width: 20,
                height: 20,
                icon: FaTriangleExclamation
            }
            div { class: "flex flex-col gap-2",
                h3 { class: "font-medium",
                    "Email Verification Required"
                }
                p { class: "text-sm",
                    "Please verify your email address to access all features including security scanning."
                }
                div {
                    button {
                        class: "btn btn-sm",
                        disabled: sending(),
                        onclick: send,
                        if sending() { "Sending..." } else { "Send Verification Email" }
                    }
                }
                match message() {
                    Some(Ok(text)) => rsx!(p { class: "text-sm text-success", "{text}" }),
                    Some(Err(text)) => rsx!(p { class: "text-sm text-error", "{text}" }),
                    None => rsx!(),
                }
            }
        }
    )
}
