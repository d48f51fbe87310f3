pub mod config;
pub mod provider;
pub mod types;

pub use config::SendGridConfig;
pub use provider::SendGridProvider;
