pub mod remote;
pub mod settings;
