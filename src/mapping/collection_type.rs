use crate::collection::PersistentCollection;
use crate::core::{PersistError, Result, TypeDescriptor};
use crate::session::PersistSession;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Kind of collection a mapping declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    List,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::List => write!(f, "list"),
        }
    }
}

/// Mapping type of a collection-valued property.
///
/// The type system dispatches to implementors by declared collection kind and
/// asks them for tracked instances whenever an entity's collection has to
/// become persistence-aware.
pub trait CollectionType: Send + Sync {
    /// Returns the role of the mapped collection.
    fn role(&self) -> &str;

    /// Returns the owner property used as the collection key, if not the identifier.
    fn property_ref(&self) -> Option<&str>;

    fn kind(&self) -> CollectionKind;

    /// Returns the type application code declares the property with.
    fn returned_class(&self) -> TypeDescriptor;

    /// Creates a new, empty tracked collection bound to `session`.
    fn instantiate(&self, session: &PersistSession) -> Result<Box<dyn PersistentCollection>>;

    /// Creates a tracked collection bound to `session` around an application collection.
    fn wrap(
        &self,
        session: &PersistSession,
        collection: Box<dyn Any + Send>,
    ) -> Result<Box<dyn PersistentCollection>>;

    /// Checks that a property declared as `declared` can hold what this mapping produces.
    fn validate_property_type(&self, declared: TypeDescriptor) -> Result<()> {
        let expected = self.returned_class();
        if declared == expected {
            Ok(())
        } else {
            Err(PersistError::ConfigurationError(format!(
                "Property for {} '{}' is declared as {}, expected {}",
                self.kind(),
                self.role(),
                declared,
                expected
            )))
        }
    }
}
