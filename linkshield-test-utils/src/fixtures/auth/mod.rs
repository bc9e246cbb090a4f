//! Auth service endpoint fixtures.
//!
//! Each method creates one mock on the test server and returns it; callers decide
//! whether to track it for [`TestSetup::assert_mocks`](crate::TestSetup::assert_mocks).

pub mod mockito;

use crate::TestSetup;

pub struct AuthFixtures<'a> {
    pub(crate) setup: &'a mut TestSetup,
}
