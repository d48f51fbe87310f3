pub mod store;

pub use store::MemorySubscriberStore;
