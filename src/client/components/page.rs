use dioxus::prelude::*;

#[component]
pub fn PageSection(id: Option<&'static str>, class: Option<&'static str>, children: Element) -> Element {
    let class: &str = if let Some(class) = class { class } else { "" };
    let id: &str = id.unwrap_or_default();

    rsx!(
        section {
            id: "{id}",
            class: "py-20 px-4 {class}",
            div { class: "max-w-6xl mx-auto",
                {children}
            }
        }
    )
}

#[component]
pub fn Page(class: Option<&'static str>, children: Element) -> Element {
    let class: &str = if let Some(class) = class { class } else { "" };

    rsx!(
        div {
            class: "min-h-screen p-4 {class}",
            {children}
        }
    )
}
