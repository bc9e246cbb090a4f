pub mod app;
pub mod components;
pub mod routes;

pub use app::App;
