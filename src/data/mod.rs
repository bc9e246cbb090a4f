//! Data access layer repositories.
//!
//! Repositories wrap the REST surface of the hosted backend, one per table, and return
//! typed rows. Row-level security on the backend restricts every query to the signed-in
//! user's rows; the explicit `user_id` filters keep queries correct for the anon role.

pub mod history;
pub mod reference;
pub mod scan;
pub mod subscription;
pub mod usage;
pub mod user;
