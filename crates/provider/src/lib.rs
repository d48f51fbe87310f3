pub mod pacing;
pub mod provider;

pub use pacing::Pacing;
pub use provider::{DynProvider, Provider};
