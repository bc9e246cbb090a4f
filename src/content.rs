//! Static marketing copy rendered by the landing page sections.

pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub struct Milestone {
    pub number: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub struct Testimonial {
    pub name: &'static str,
    /// Initials shown in place of a photo.
    pub avatar: &'static str,
    pub rating: u8,
    pub text: &'static str,
}

pub struct Stat {
    pub number: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub struct PricingPlan {
    pub name: &'static str,
    pub price: &'static str,
    pub period: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub limitations: &'static [&'static str],
    pub popular: bool,
    pub button_text: &'static str,
}

pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const HERO_HIGHLIGHTS: [&str; 3] = [
    "Real-time link scanning",
    "QR code and camera scanning",
    "AI-powered threat detection",
];

pub const SHOWCASE_FEATURES: [Feature; 6] = [
    Feature {
        title: "Real-time Link Scanning",
        description: "Instantly analyze any URL for threats, malware, and phishing attempts with our advanced security engine.",
    },
    Feature {
        title: "QR Code & Camera Scanner",
        description: "Scan QR codes and capture links from images using your device camera for comprehensive protection.",
    },
    Feature {
        title: "AI-Powered Detection",
        description: "Machine learning algorithms continuously improve threat detection and adapt to new attack patterns.",
    },
    Feature {
        title: "Lightning Fast Results",
        description: "Get security analysis results in under 2 seconds with our optimized scanning infrastructure.",
    },
    Feature {
        title: "Global Threat Database",
        description: "Access to the world's largest database of known malicious URLs and threat intelligence.",
    },
    Feature {
        title: "Privacy First",
        description: "Your data stays private. We never store personal information or browsing history.",
    },
];

pub const MILESTONES: [Milestone; 4] = [
    Milestone {
        number: "1M+",
        title: "Downloads",
        description: "Trusted by over 1 million users worldwide",
    },
    Milestone {
        number: "99%",
        title: "Accuracy",
        description: "Industry-leading threat detection accuracy",
    },
    Milestone {
        number: "24/7",
        title: "Protection",
        description: "Continuous monitoring and real-time updates",
    },
    Milestone {
        number: "50+",
        title: "Languages",
        description: "Available in over 50 languages globally",
    },
];

pub const TESTIMONIALS: [Testimonial; 6] = [
    Testimonial {
        name: "Sarah Johnson",
        avatar: "SJ",
        rating: 5,
        text: "WebLink Shield has saved me from multiple phishing attempts. The real-time scanning is incredibly fast and accurate. I feel much safer browsing on my phone now.",
    },
    Testimonial {
        name: "Michael Chen",
        avatar: "MC",
        rating: 5,
        text: "As someone who works in tech, I appreciate the technical depth of the security analysis. The AI detection is impressive and the app is beautifully designed.",
    },
    Testimonial {
        name: "Emily Rodriguez",
        avatar: "ER",
        rating: 5,
        text: "I was skeptical at first, but this app has prevented me from clicking on several malicious links. The QR scanner feature is especially useful for my business.",
    },
    Testimonial {
        name: "David Thompson",
        avatar: "DT",
        rating: 4,
        text: "Great app for staying safe online. The interface is intuitive and the scanning is super quick. Would definitely recommend to friends and family.",
    },
    Testimonial {
        name: "Lisa Wang",
        avatar: "LW",
        rating: 5,
        text: "The privacy-first approach really sold me on this app. I love that it doesn't store my browsing data while still providing excellent protection.",
    },
    Testimonial {
        name: "James Wilson",
        avatar: "JW",
        rating: 5,
        text: "At my age, I'm not always sure about online safety. WebLink Shield gives me confidence to browse and shop online without worry. Simple and effective!",
    },
];

pub const REVIEW_STATS: [Stat; 3] = [
    Stat {
        number: "4.9",
        label: "App Store Rating",
        description: "Based on 50,000+ reviews",
    },
    Stat {
        number: "98%",
        label: "User Satisfaction",
        description: "Would recommend to others",
    },
    Stat {
        number: "2M+",
        label: "Threats Blocked",
        description: "Protected users daily",
    },
];

pub const PRICING_PLANS: [PricingPlan; 2] = [
    PricingPlan {
        name: "Free",
        price: "$0",
        period: "/month",
        description: "Perfect for casual users",
        features: &[
            "Basic link scanning",
            "Up to 50 scans per day",
            "Standard threat detection",
            "Community support",
            "Basic security reports",
        ],
        limitations: &[
            "No QR code scanning",
            "No advanced AI detection",
            "No priority support",
            "Limited scan history",
        ],
        popular: false,
        button_text: "Get Started Free",
    },
    PricingPlan {
        name: "Pro",
        price: "$4.99",
        period: "/month",
        description: "Best for regular users",
        features: &[
            "Unlimited link scanning",
            "QR code & camera scanning",
            "Advanced AI threat detection",
            "Priority customer support",
            "Detailed security reports",
            "Scan history & favorites",
            "Real-time threat updates",
            "Ad-free experience",
        ],
        limitations: &[],
        popular: true,
        button_text: "Start Pro Trial",
    },
];

pub const PLAN_FEATURES: [Feature; 3] = [
    Feature {
        title: "Cross-Platform",
        description: "Available on iOS, Android, and Web",
    },
    Feature {
        title: "Global Coverage",
        description: "Protection worldwide with local servers",
    },
    Feature {
        title: "Privacy First",
        description: "Your data never leaves your device",
    },
];

pub const FAQS: [Faq; 4] = [
    Faq {
        question: "Can I change plans anytime?",
        answer: "Yes! You can upgrade or downgrade your plan at any time. Changes take effect immediately.",
    },
    Faq {
        question: "Is there a free trial?",
        answer: "Pro plan comes with a 7-day free trial. No credit card required to start.",
    },
    Faq {
        question: "What payment methods do you accept?",
        answer: "We accept all major credit cards, PayPal, and Apple/Google Pay for mobile subscriptions.",
    },
    Faq {
        question: "Can I cancel anytime?",
        answer: "Absolutely. Cancel your subscription anytime with no cancellation fees or penalties.",
    },
];
