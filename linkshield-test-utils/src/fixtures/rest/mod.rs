//! REST table endpoint fixtures.

pub mod mockito;

use crate::TestSetup;

pub struct RestFixtures<'a> {
    pub(crate) setup: &'a mut TestSetup,
}
