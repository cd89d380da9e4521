//! Items needed by code that loads list mappings and drives tracked collections.

pub use crate::collection::{ListWrapper, PersistentCollection, PersistentList};
pub use crate::core::{PersistError, Result};
pub use crate::mapping::{CollectionType, GenericListType, ListMapping, ListTypeRegistry};
pub use crate::session::PersistSession;
