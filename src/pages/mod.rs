pub mod editor;
pub mod settings;
pub mod start;
