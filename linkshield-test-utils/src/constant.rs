//! Fixed values shared by fixtures and tests.
//!
//! None of these are real credentials.

/// Public API key sent by the client under test.
pub static TEST_ANON_KEY: &str = "test-anon-key";

/// Access token issued by the mock sign-in endpoint.
pub static TEST_ACCESS_TOKEN: &str = "test-access-token";

/// Auth service id of the default test identity.
pub static TEST_AUTH_USER_ID: &str = "8f14e45f-ceea-467f-a0e6-1d2c3b4a5f60";

pub static TEST_EMAIL: &str = "alice@example.com";

pub static TEST_PASSWORD: &str = "secret1";

/// Profile row id of the default test user.
pub const TEST_USER_ID: i32 = 7;

pub const FREE_ROLE_ID: i32 = 1;

pub const FREE_PLAN_ID: i32 = 1;

/// Daily scan allowance of the Free plan.
pub const FREE_DAILY_LIMIT: i32 = 50;
