pub mod provider;

pub use provider::ConsoleProvider;
