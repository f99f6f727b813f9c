// Library surface for headless/integration tests and reuse.
// The binary only adds the CLI, terminal setup and the event loop.
pub mod app_dirs;
pub mod config;
pub mod field;
pub mod game;
pub mod hud;
pub mod runtime;
pub mod schedule;
pub mod session;
pub mod ui;
