pub mod footer;
pub mod navbar;
pub mod page;
pub mod sections;
pub mod title;
pub mod verification_banner;

pub use footer::Footer;
pub use navbar::Navbar;
pub use page::{Page, PageSection};
pub use title::ShieldTitleButton;
pub use verification_banner::EmailVerificationBanner;
