use mockito::{Matcher, Mock};
use serde_json::{json, Value};

use crate::{constant::TEST_ANON_KEY, fixtures::auth::AuthFixtures, fixtures::factory};

impl<'a> AuthFixtures<'a> {
    /// Create a password sign-in endpoint answering with a session for `identity`.
    ///
    /// # Arguments
    /// - `identity` - Identity JSON, see [`factory::identity`]
    /// - `expected_requests` - Number of calls the mock expects
    pub fn create_sign_in_endpoint(&mut self, identity: Value, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::UrlEncoded(
                "grant_type".to_string(),
                "password".to_string(),
            ))
            .match_header("apikey", TEST_ANON_KEY)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(factory::session(identity).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a sign-in endpoint rejecting credentials with `message`.
    pub fn create_sign_in_rejected_endpoint(&mut self, message: &str) -> Mock {
        self.setup
            .server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::UrlEncoded(
                "grant_type".to_string(),
                "password".to_string(),
            ))
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "code": 400, "error_code": "invalid_credentials", "msg": message })
                    .to_string(),
            )
            .create()
    }

    /// Create a sign-up endpoint that requires email confirmation, answering with the bare
    /// identity and no session.
    pub fn create_sign_up_endpoint(&mut self, identity: Value) -> Mock {
        self.setup
            .server
            .mock("POST", "/auth/v1/signup")
            .match_header("apikey", TEST_ANON_KEY)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(identity.to_string())
            .create()
    }

    /// Create a sign-up endpoint failing with `status` and `message`.
    pub fn create_sign_up_rejected_endpoint(&mut self, status: usize, message: &str) -> Mock {
        self.setup
            .server
            .mock("POST", "/auth/v1/signup")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "code": status, "msg": message }).to_string())
            .create()
    }

    pub fn create_logout_endpoint(&mut self) -> Mock {
        self.setup
            .server
            .mock("POST", "/auth/v1/logout")
            .with_status(204)
            .create()
    }

    pub fn create_recover_endpoint(&mut self, email: &str) -> Mock {
        self.setup
            .server
            .mock("POST", "/auth/v1/recover")
            .match_body(Matcher::PartialJson(json!({ "email": email })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create()
    }

    pub fn create_resend_endpoint(&mut self, email: &str) -> Mock {
        self.setup
            .server
            .mock("POST", "/auth/v1/resend")
            .match_body(Matcher::PartialJson(
                json!({ "type": "signup", "email": email }),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create()
    }

    /// Create the auth health endpoint answering with `status`.
    pub fn create_health_endpoint(&mut self, status: usize) -> Mock {
        self.setup
            .server
            .mock("GET", "/auth/v1/health")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "version": "test", "name": "auth" }).to_string())
            .create()
    }
}
