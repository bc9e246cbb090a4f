//! Small shared utilities.

pub mod deadline;


pub use deadline::{with_deadline, Deadline};
