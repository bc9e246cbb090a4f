mod diagnostic;
mod history;
mod scan;
mod session;
mod usage;
