use dioxus::prelude::*;

use linkshield::{
    content::{MILESTONES, SHOWCASE_FEATURES},
    nav::Section,
};

use crate::client::components::PageSection;

#[component]
pub fn Showcase() -> Element {
    rsx!(
        PageSection { id: Section::Features.anchor(),
            div { class: "text-center mb-16",
                h2 { class: "text-4xl font-bold mb-4",
                    "Powerful Features for Complete Protection"
                }
                p { class: "text-xl opacity-70",
                    "Everything you need to stay safe from malicious links, in one app."
                }
            }
            div { class: "grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6 mb-16",
                for feature in SHOWCASE_FEATURES.iter() {
                    div { class: "card bg-base-200",
                        div { class: "card-body",
                            h3 { class: "card-title", "{feature.title}" }
                            p { class: "text-sm opacity-70", "{feature.description}" }
                        }
                    }
                }
            }
            div { class: "grid grid-cols-2 md:grid-cols-4 gap-6",
                for milestone in MILESTONES.iter() {
                    div { class: "text-center",
                        p { class: "text-3xl font-bold text-primary", "{milestone.number}" }
                        h3 { class: "text-lg font-semibold", "{milestone.title}" }
                        p { class: "text-sm opacity-70", "{milestone.description}" }
                    }
                }
            }
        }
    )
}
