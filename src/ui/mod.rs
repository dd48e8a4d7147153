pub mod input;
pub mod node;
pub mod tooltip;
