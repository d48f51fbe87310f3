pub mod newsletter;
pub mod provider;
pub mod send;
pub mod subscribers;
pub mod verify;
