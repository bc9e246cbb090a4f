use dioxus::document::Meta;
use dioxus::prelude::*;

use crate::client::components::sections::{Hero, Pricing, Showcase, Testimonials};

#[component]
pub fn Home() -> Element {
    rsx!(
        Meta {
            name: "description",
            content: "Mobile security app that protects you from malicious links, phishing attacks, and online threats."
        }
        Hero {}
        Showcase {}
        Testimonials {}
        Pricing {}
    )
}
