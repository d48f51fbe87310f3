pub mod error;
pub mod store;
pub mod testing;

pub use error::SubscriberError;
pub use store::SubscriberStore;
