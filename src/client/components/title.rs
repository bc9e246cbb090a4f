use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::FaShieldHalved;
use dioxus_free_icons::Icon;

use linkshield::nav::Page;

#[component]
pub fn ShieldTitleButton() -> Element {
    let mut page = use_context::<Signal<Page>>();

    rsx!(
        button {
            class: "flex items-center gap-3",
            onclick: move |_| page.set(Page::Home),
            div { class: "w-10 h-10 rounded-lg bg-primary text-primary-content flex items-center justify-center",
                Icon {
                    width: 24,
                    height: 24,
                    icon: FaShieldHalved
                }
            }
            div { class: "text-left",
                p { class: "text-xl font-bold",
                    "WebLink Shield"
                }
                p { class: "text-xs opacity-60",
                    "Security Analysis Platform"
                }
            }
        }
    )
}
