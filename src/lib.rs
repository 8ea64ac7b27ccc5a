pub mod cases;
pub mod config;
pub mod harness;
pub mod internal;
pub mod scene;
pub mod tui;
