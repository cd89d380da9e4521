// ============================================================================
// Persistent generic lists
// ============================================================================

pub mod collection;
pub mod core;
pub mod mapping;
pub mod prelude;
pub mod session;

// Re-export main types for convenience
pub use crate::collection::{ListSemantics, ListWrapper, PersistentCollection, PersistentList};
pub use crate::core::{PersistError, Result, TypeDescriptor};
pub use crate::mapping::{
    CollectionKind, CollectionType, GenericListType, ListMapping, ListSpecialization,
    ListTypeRegistry,
};
pub use crate::session::{PersistSession, SessionId};
