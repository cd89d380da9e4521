use crate::core::{Result, TypeDescriptor};
use crate::session::{PersistSession, SessionId};
use std::any::Any;

mod list_semantics;
mod persistent_list;

pub use list_semantics::ListSemantics;
pub use persistent_list::PersistentList;

/// A collection instrumented so that a session can detect and flush its mutations.
///
/// Instances are produced by collection types (see
/// [`GenericListType`](crate::mapping::GenericListType)) and owned afterwards
/// by the entity and the session that tracks it.
pub trait PersistentCollection: Send + Sync + 'static {
    /// Returns the session this collection is currently bound to.
    fn session_id(&self) -> Option<SessionId>;

    /// Checks whether the collection is bound to `session`.
    fn is_bound_to(&self, session: &PersistSession) -> bool {
        self.session_id() == Some(session.id())
    }

    /// Associates the collection with `session`.
    ///
    /// Returns `Ok(false)` if it was already bound to that session and
    /// fails if another session still owns it.
    fn bind_session(&mut self, session: &PersistSession) -> Result<bool>;

    /// Detaches the collection from `session`. Does nothing when bound elsewhere.
    fn unbind_session(&mut self, session: &PersistSession) -> bool;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if the collection has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the collection was mutated since it was created or last flushed.
    fn is_dirty(&self) -> bool;

    /// Marks the current state as flushed.
    fn clear_dirty(&mut self);

    /// Returns `true` if the collection was built around an application list.
    fn was_wrapped(&self) -> bool;

    /// Returns the type of the elements held by the collection.
    fn element_type(&self) -> TypeDescriptor;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl dyn PersistentCollection {
    /// Returns `true` if the concrete collection type is `T`.
    pub fn is<T: PersistentCollection>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: PersistentCollection>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: PersistentCollection>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Converts the boxed collection into its concrete type, handing it back
    /// unchanged when the type does not match.
    pub fn downcast<T: PersistentCollection>(
        self: Box<Self>,
    ) -> std::result::Result<Box<T>, Box<dyn PersistentCollection>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.into_any().downcast::<T>() {
            Ok(collection) => Ok(collection),
            // `is::<T>()` above already matched, so `Any::downcast` cannot fail here.
            Err(_) => unreachable!("collection type checked before downcast"),
        }
    }
}

/// Construction contract of a tracked list type for element type `E`.
///
/// The mapping layer only ever builds wrapper instances through these two
/// constructors, so a type registered as a list wrapper must provide both.
pub trait ListWrapper<E>: PersistentCollection + Sized {
    /// Creates an empty collection bound to `session`.
    fn new_empty(session: &PersistSession) -> Result<Self>;

    /// Creates a collection bound to `session` around an application list.
    ///
    /// The wrapper decides whether to share or copy; the default list type
    /// takes ownership of `list` without copying elements.
    fn new_wrapping(session: &PersistSession, list: Vec<E>) -> Result<Self>;
}
