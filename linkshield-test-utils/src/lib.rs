//! Shared test setup for the account shell.
//!
//! [`TestSetup`] owns a mockito server standing in for the hosted backend. Fixture
//! helpers create mock auth and REST endpoints on it, and [`fixtures::factory`] builds
//! the JSON rows those endpoints return.

pub mod constant;
pub mod error;
pub mod fixtures;
pub mod setup;

pub use error::TestError;
pub use setup::TestSetup;

pub mod prelude {
    pub use crate::{constant::*, fixtures::factory, TestError, TestSetup};
}
