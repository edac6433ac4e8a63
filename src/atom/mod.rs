pub mod catalog;
pub mod model;
pub mod rotation;
pub mod shell;
