// Public library interface for treemap-view.
// The viewer binary and the debug-layout tool both build on these modules.

pub mod app;
pub mod config;
pub mod data;
pub mod layout;
pub mod render;
pub mod ui;
