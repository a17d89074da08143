pub mod component;
pub mod graph;
pub mod artifacts;
pub mod generation_input;
pub mod notice;
pub mod session;
