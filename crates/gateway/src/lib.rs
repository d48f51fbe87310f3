pub mod config;
pub mod mailer;

pub use config::{MailerConfig, ProviderKind, DEFAULT_FROM};
pub use mailer::{Mailer, NEWSLETTER_TAG};
