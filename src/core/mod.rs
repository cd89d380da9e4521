pub mod error;
pub mod types;

pub use error::{PersistError, Result};
pub use types::TypeDescriptor;
