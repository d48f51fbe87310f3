pub mod config;
pub mod provider;
pub mod types;

pub use config::ResendConfig;
pub use provider::ResendProvider;
