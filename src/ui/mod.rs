pub mod app;
pub mod canvas;
pub mod code_panel;
pub mod inspector;
pub mod settings;
pub mod settings_io;
