// The binary in main.rs drives the terminal; everything it needs lives here so
// integration tests and benchmarks can reach the same types.

pub mod app;
pub mod bank;
pub mod config;
pub mod engine;
pub mod event;
pub mod identity;
pub mod logging;
pub mod router;
pub mod session;
pub mod store;
pub mod ui;
