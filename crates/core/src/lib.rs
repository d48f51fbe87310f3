pub mod email;
pub mod outcome;

pub use email::Email;
pub use outcome::{BulkReport, SendOutcome};
