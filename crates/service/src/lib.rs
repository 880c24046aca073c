pub mod address;
pub mod context;
pub mod enrich;
pub mod error;
pub mod ops;
pub mod parser;

pub use context::{Backend, Context};
pub use error::ServiceError;
