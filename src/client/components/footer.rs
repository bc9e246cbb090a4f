use chrono::{Datelike, Utc};
use dioxus::prelude::*;

use crate::client::components::ShieldTitleButton;

#[component]
pub fn Footer() -> Element {
    let year = Utc::now().year();

    rsx!(
        footer { class: "footer footer-center bg-base-200 p-10 gap-4",
            ShieldTitleButton {}
            nav { class: "flex gap-6",
                a { class: "link link-hover", href: "#privacy", "Privacy Policy" }
                a { class: "link link-hover", href: "#terms", "Terms of Service" }
                a { class: "link link-hover", href: "#contact", "Contact" }
            }
            div {
                p { class: "text-sm opacity-70",
                    "© {year} WebLink Shield. All rights reserved."
                }
                p { class: "text-xs opacity-50",
                    "Security Analysis Platform"
                }
            }
        }
    )
}
