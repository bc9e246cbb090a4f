use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_brands_icons::{FaApple, FaGooglePlay};
use dioxus_free_icons::icons::fa_solid_icons::{FaCheck, FaShieldHalved};
use dioxus_free_icons::Icon;

use linkshield::{content::HERO_HIGHLIGHTS, nav::Section};

use crate::client::components::PageSection;

#[component]
pub fn Hero() -> Element {
    rsx!(
        PageSection { id: Section::Download.anchor(), class: "bg-base-200",
            div { class: "grid grid-cols-1 lg:grid-cols-2 gap-12 items-center",
                div { class: "flex flex-col gap-6",
                    h1 { class: "text-5xl font-bold",
                        "Secure Your Digital Life with "
                        span { class: "text-primary", "WebLink Shield" }
                    }
                    p { class: "text-xl opacity-70",
                        "The ultimate mobile security app that protects you from malicious links, phishing attacks, and online threats. Download now and browse with confidence."
                    }
                    ul { class: "flex flex-col gap-3",
                        for highlight in HERO_HIGHLIGHTS {
                            li { class: "flex items-center gap-3",
                                Icon { width: 18, height: 18, icon: FaCheck }
                                span { "{highlight}" }
                            }
                        }
                    }
                    div { class: "flex flex-wrap gap-4",
                        button { class: "btn btn-primary btn-lg flex gap-2",
                            Icon { width: 20, height: 20, icon: FaApple }
                            "App Store"
                        }
                        button { class: "btn btn-outline btn-lg flex gap-2",
                            Icon { width: 20, height: 20, icon: FaGooglePlay }
                            "Google Play"
                        }
                    }
                }
                div { class: "flex justify-center",
                    div { class: "mockup-phone",
                        div { class: "display",
                            div { class: "artboard phone-1 flex flex-col items-center justify-center gap-4 bg-base-100",
                                Icon { width: 48, height: 48, icon: FaShieldHalved }
                                p { class: "text-lg font-bold", "WebLink Shield" }
                                p { class: "text-sm opacity-60", "Scan & Secure" }
                                button { class: "btn btn-primary btn-sm", "Scan Link" }
                            }
                        }
                    }
                }
            }
        }
    )
}
