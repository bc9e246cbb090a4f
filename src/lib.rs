//! Account shell for WebLink Shield.
//!
//! This crate contains everything behind the landing page that is not markup: the typed
//! client for the hosted auth/database/realtime backend, the repositories that read and
//! write its tables, and the services (session, usage, scans, history, diagnostics) the
//! Dioxus front end consumes. The scanning engine itself lives elsewhere; this crate only
//! submits scan rows and observes them.

pub mod backend;
pub mod config;
pub mod content;
pub mod data;
pub mod error;
pub mod model;
pub mod nav;
pub mod service;
pub mod util;
