pub mod app;
pub mod components;
pub mod keys;
pub mod tabs;
pub mod theme;
