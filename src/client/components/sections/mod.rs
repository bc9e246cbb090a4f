pub mod hero;
pub mod pricing;
pub mod showcase;
pub mod testimonials;

pub use hero::Hero;
pub use pricing::Pricing;
pub use showcase::Showcase;
pub use testimonials::Testimonials;
