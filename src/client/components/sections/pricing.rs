use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{FaCheck, FaStar, FaXmark};
use dioxus_free_icons::Icon;

use linkshield::{
    content::{PricingPlan, FAQS, PLAN_FEATURES, PRICING_PLANS},
    nav::{Page, Section},
};

use crate::client::components::PageSection;

#[component]
fn PlanCard(index: usize) -> Element {
    let mut page = use_context::<Signal<Page>>();
    let plan: &PricingPlan = &PRICING_PLANS[index];

    let card_class = if plan.popular {
        "card bg-base-100 border-2 border-primary shadow-xl"
    } else {
        "card bg-base-100 border border-base-300"
    };
    let button_class = if plan.popular {
        "btn btn-primary w-full"
    } else {
        "btn w-full"
    };

    rsx!(
        div { class: "{card_class}",
            div { class: "card-body gap-6",
                if plan.popular {
                    div { class: "badge badge-primary gap-1 self-center",
                        Icon { width: 12, height: 12, icon: FaStar }
                        "Most Popular"
                    }
                }
                div { class: "text-center",
                    h3 { class: "text-2xl font-bold", "{plan.name}" }
                    p { class: "opacity-70", "{plan.description}" }
                    p { class: "mt-4",
                        span { class: "text-4xl font-bold", "{plan.price}" }
                        span { class: "opacity-60 ml-2", "{plan.period}" }
                    }
                }
                ul { class: "flex flex-col gap-3",
                    for feature in plan.features.iter() {
                        li { class: "flex items-center gap-3 text-success",
                            Icon { width: 16, height: 16, icon: FaCheck }
                            span { "{feature}" }
                        }
                    }
                    for limitation in plan.limitations.iter() {
                        li { class: "flex items-center gap-3 opacity-50",
                            Icon { width: 16, height: 16, icon: FaXmark }
                            span { "{limitation}" }
                        }
                    }
                }
                button {
                    class: "{button_class}",
                    onclick: move |_| page.set(Page::Auth),
                    "{plan.button_text}"
                }
            }
        }
    )
}

#[component]
pub fn Pricing() -> Element {
    rsx!(
        PageSection { id: Section::Pricing.anchor(),
            div { class: "text-center mb-16",
                h2 { class: "text-4xl font-bold mb-4",
                    "Choose Your Security Plan"
                }
                p { class: "text-xl opacity-70",
                    "Select the perfect plan for your security needs. All plans include our core protection features."
                }
            }
            div { class: "grid grid-cols-1 md:grid-cols-2 gap-8 mb-16 max-w-4xl mx-auto",
                for index in 0..PRICING_PLANS.len() {
                    PlanCard { index }
                }
            }
            div { class: "bg-base-200 rounded-2xl p-10 mb-16",
                h3 { class: "text-2xl font-bold text-center mb-8",
                    "Why Choose WebLink Shield?"
                }
                div { class: "grid grid-cols-1 md:grid-cols-3 gap-8",
                    for feature in PLAN_FEATURES.iter() {
                        div { class: "text-center",
                            h4 { class: "text-lg font-semibold", "{feature.title}" }
                            p { class: "opacity-70", "{feature.description}" }
                        }
                    }
                }
            }
            h3 { class: "text-2xl font-bold text-center mb-8",
                "Frequently Asked Questions"
            }
            div { class: "grid grid-cols-1 md:grid-cols-2 gap-6",
                for faq in FAQS.iter() {
                    div { class: "card bg-base-200",
                        div { class: "card-body",
                            h4 { class: "font-semibold", "{faq.question}" }
                            p { class: "text-sm opacity-70", "{faq.answer}" }
                        }
                    }
                }
            }
        }
    )
}
