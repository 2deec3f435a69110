pub mod annotation;
pub mod app;
pub mod canvas;
pub mod codec;
pub mod error;
pub mod label_input;
pub mod loader;
pub mod mapper;
pub mod panel;
pub mod render;
pub mod settings;
pub mod state;
pub mod store;
pub mod theme;
pub mod toolbar;
pub mod ui_controls;
