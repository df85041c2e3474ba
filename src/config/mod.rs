pub mod client;
pub mod loader;
pub mod settings;
