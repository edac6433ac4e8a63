pub mod app;
pub mod atom;
pub mod platform;
pub mod renderer;
pub mod ui;
