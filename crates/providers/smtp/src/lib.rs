pub mod config;
pub mod error;
pub mod provider;

pub use config::SmtpConfig;
pub use error::SmtpError;
pub use provider::SmtpProvider;
