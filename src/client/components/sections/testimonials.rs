use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::FaStar;
use dioxus_free_icons::Icon;

use linkshield::{
    content::{REVIEW_STATS, TESTIMONIALS},
    nav::Section,
};

use crate::client::components::PageSection;

#[component]
fn Rating(stars: u8) -> Element {
    rsx!(
        div { class: "flex gap-1",
            for index in 0..5u8 {
                span { class: if index < stars { "text-warning" } else { "opacity-30" },
                    Icon { width: 14, height: 14, icon: FaStar }
                }
            }
        }
    )
}

#[component]
pub fn Testimonials() -> Element {
    rsx!(
        PageSection { id: Section::Reviews.anchor(), class: "bg-base-200",
            div { class: "text-center mb-16",
                h2 { class: "text-4xl font-bold mb-4",
                    "Trusted by Millions Worldwide"
                }
                p { class: "text-xl opacity-70",
                    "See what our users say about staying safe with WebLink Shield."
                }
            }
            div { class: "grid grid-cols-1 md:grid-cols-3 gap-6 mb-16",
                for stat in REVIEW_STATS.iter() {
                    div { class: "text-center",
                        p { class: "text-3xl font-bold", "{stat.number}" }
                        p { class: "text-lg font-semibold", "{stat.label}" }
                        p { class: "text-sm opacity-60", "{stat.description}" }
                    }
                }
            }
            div { class: "grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6",
                for testimonial in TESTIMONIALS.iter() {
                    div { class: "card bg-base-100",
                        div { class: "card-body gap-4",
                            div { class: "flex items-center gap-3",
                                div { class: "avatar placeholder",
                                    div { class: "bg-primary text-primary-content w-12 rounded-full",
                                        span { "{testimonial.avatar}" }
                                    }
                                }
                                div {
                                    p { class: "font-semibold", "{testimonial.name}" }
                                    Rating { stars: testimonial.rating }
                                }
                            }
                            p { class: "opacity-80", "{testimonial.text}" }
                        }
                    }
                }
            }
        }
    )
}
