pub mod commands;
pub mod errors;
pub mod models;
pub mod remote;
pub mod settings;
