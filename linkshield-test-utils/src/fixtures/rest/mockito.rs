use mockito::{Matcher, Mock};
use serde_json::{json, Value};

use crate::{
    constant::{FREE_PLAN_ID, FREE_ROLE_ID, TEST_ANON_KEY},
    fixtures::{factory, rest::RestFixtures},
};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

fn table_path(table: &str) -> String {
    format!("/rest/v1/{}", table)
}

fn eq(column: &str, value: &str) -> Matcher {
    Matcher::UrlEncoded(column.to_string(), format!("eq.{}", value))
}

impl<'a> RestFixtures<'a> {
    /// Create a single-row read on `table` filtered by `column = value`.
    ///
    /// Answers with `row`, or with the "no rows" error when `row` is `None`.
    ///
    /// # Arguments
    /// - `table` - Table or view name
    /// - `column` / `value` - Equality filter the request must carry
    /// - `row` - The row to return, if any
    /// - `expected_requests` - Number of calls the mock expects
    pub fn create_single_endpoint(
        &mut self,
        table: &str,
        column: &str,
        value: &str,
        row: Option<Value>,
        expected_requests: usize,
    ) -> Mock {
        let mock = self
            .setup
            .server
            .mock("GET", table_path(table).as_str())
            .match_query(eq(column, value))
            .match_header("accept", SINGLE_OBJECT)
            .match_header("apikey", TEST_ANON_KEY)
            .with_header("content-type", "application/json")
            .expect(expected_requests);

        let mock = match row {
            Some(row) => mock.with_status(200).with_body(row.to_string()),
            None => mock
                .with_status(406)
                .with_body(factory::no_rows_error().to_string()),
        };

        mock.create()
    }

    /// Create a multi-row read on `table` filtered by `column = value`.
    pub fn create_rows_endpoint(
        &mut self,
        table: &str,
        column: &str,
        value: &str,
        rows: Vec<Value>,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", table_path(table).as_str())
            .match_query(eq(column, value))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(Value::Array(rows).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create an insert on `table` whose body contains `expected_body`, answering with
    /// `row` as stored.
    pub fn create_insert_endpoint(
        &mut self,
        table: &str,
        expected_body: Value,
        row: Value,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("POST", table_path(table).as_str())
            .match_header("prefer", "return=representation")
            .match_body(Matcher::PartialJson(expected_body))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(row.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create an insert on `table` rejected with `status`, e.g. a row-level-security
    /// denial.
    pub fn create_insert_rejected_endpoint(
        &mut self,
        table: &str,
        status: usize,
        message: &str,
    ) -> Mock {
        self.setup
            .server
            .mock("POST", table_path(table).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "code": "42501", "message": message, "details": null, "hint": null })
                    .to_string(),
            )
            .create()
    }

    /// Create an update on `table` filtered by `column = value` whose body contains
    /// `expected_body`, answering with `rows`.
    pub fn create_update_endpoint(
        &mut self,
        table: &str,
        column: &str,
        value: &str,
        expected_body: Value,
        rows: Vec<Value>,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("PATCH", table_path(table).as_str())
            .match_query(eq(column, value))
            .match_header("prefer", "return=representation")
            .match_body(Matcher::PartialJson(expected_body))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(Value::Array(rows).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a delete on `table` filtered by `column = value`.
    pub fn create_delete_endpoint(
        &mut self,
        table: &str,
        column: &str,
        value: &str,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("DELETE", table_path(table).as_str())
            .match_query(eq(column, value))
            .with_status(204)
            .expect(expected_requests)
            .create()
    }

    /// Create the reads and inserts a first-time profile bootstrap performs.
    ///
    /// Covers the Free role and plan lookups, the profile insert and the subscription
    /// insert, each expected exactly `expected_requests` times.
    ///
    /// # Returns
    /// - `Vec<Mock>` - Role lookup, profile insert, plan lookup, subscription insert
    pub fn create_bootstrap_endpoints(
        &mut self,
        user_row: Value,
        expected_requests: usize,
    ) -> Vec<Mock> {
        let user_id = user_row["user_id"].as_i64().unwrap_or_default() as i32;
        let auth_user_id = user_row["auth_user_id"].clone();

        let role = self.create_single_endpoint(
            "role",
            "name",
            "Free",
            Some(factory::role(FREE_ROLE_ID, "Free")),
            expected_requests,
        );
        let profile = self.create_insert_endpoint(
            "users",
            json!({ "auth_user_id": auth_user_id, "role_id": FREE_ROLE_ID, "status": "active" }),
            user_row,
            expected_requests,
        );
        let plan = self.create_single_endpoint(
            "plan",
            "name",
            "Free",
            Some(factory::plan(FREE_PLAN_ID, "Free", 0.0)),
            expected_requests,
        );
        let subscription = self.create_insert_endpoint(
            "subscription",
            json!({ "user_id": user_id, "plan_id": FREE_PLAN_ID, "status": "active", "auto_renew": false }),
            factory::subscription(1, user_id, FREE_PLAN_ID),
            expected_requests,
        );

        vec![role, profile, plan, subscription]
    }
}
