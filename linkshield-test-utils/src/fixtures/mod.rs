//! Mock endpoint fixtures and row factories.
//!
//! - `auth` - password auth endpoints (`/auth/v1`)
//! - `rest` - table endpoints (`/rest/v1/{table}`)
//! - `factory` - JSON rows returned by those endpoints

pub mod auth;
pub mod factory;
pub mod rest;

use crate::TestSetup;

impl TestSetup {
    pub fn auth(&mut self) -> auth::AuthFixtures<'_> {
        auth::AuthFixtures { setup: self }
    }

    pub fn rest(&mut self) -> rest::RestFixtures<'_> {
        rest::RestFixtures { setup: self }
    }
}
