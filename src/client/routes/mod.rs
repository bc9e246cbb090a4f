pub mod account;
pub mod auth;
pub mod diagnostic;
pub mod home;

pub use account::Account;
pub use auth::Auth;
pub use diagnostic::Diagnostic;
pub use home::Home;
