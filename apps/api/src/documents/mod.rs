pub mod handlers;
pub mod import;
pub mod store;

pub use store::{DocumentError, DocumentStore};
