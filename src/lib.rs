//! Turn a free-text description or a drawn component layout into
//! HTML/CSS/JavaScript through a generative text service, then assemble
//! the result into one previewable document.

pub mod engine;
pub mod model;
pub mod ui;
