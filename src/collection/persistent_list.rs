use super::{ListWrapper, PersistentCollection};
use crate::core::{PersistError, Result, TypeDescriptor};
use crate::session::{PersistSession, SessionId};
use std::any::Any;
use std::fmt;
use std::ops::Deref;

/// Tracked list used as the default wrapper for every element type.
///
/// Reads go straight to the backing `Vec`; every mutation marks the list
/// dirty so the owning session knows to reconcile it on flush.
pub struct PersistentList<E> {
    items: Vec<E>,
    session: Option<PersistSession>,
    dirty: bool,
    wrapped: bool,
}

impl<E> PersistentList<E> {
    fn bound(session: &PersistSession, items: Vec<E>, wrapped: bool) -> Self {
        Self {
            items,
            session: Some(session.clone()),
            dirty: false,
            wrapped,
        }
    }

    /// Returns the session handle this list is bound to.
    pub fn session(&self) -> Option<&PersistSession> {
        self.session.as_ref()
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    /// Appends an element to the end of the list.
    pub fn push(&mut self, element: E) {
        self.items.push(element);
        self.dirty = true;
    }

    /// Inserts an element at `index`, shifting later elements right.
    ///
    /// Fails instead of panicking when `index > len`.
    pub fn insert(&mut self, index: usize, element: E) -> Result<()> {
        if index > self.items.len() {
            return Err(PersistError::IndexOutOfBounds(index, self.items.len()));
        }
        self.items.insert(index, element);
        self.dirty = true;
        Ok(())
    }

    /// Replaces the element at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, element: E) -> Option<E> {
        let slot = self.items.get_mut(index)?;
        self.dirty = true;
        Some(std::mem::replace(slot, element))
    }

    /// Removes and returns the element at `index`.
    pub fn remove(&mut self, index: usize) -> Option<E> {
        if index >= self.items.len() {
            return None;
        }
        self.dirty = true;
        Some(self.items.remove(index))
    }

    pub fn pop(&mut self) -> Option<E> {
        let element = self.items.pop()?;
        self.dirty = true;
        Some(element)
    }

    /// Removes every element. An already empty list stays clean.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.dirty = true;
        }
    }

    pub fn extend<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = E>,
    {
        let before = self.items.len();
        self.items.extend(elements);
        if self.items.len() != before {
            self.dirty = true;
        }
    }

    /// Consumes the wrapper and hands the elements back to application code.
    pub fn into_inner(self) -> Vec<E> {
        self.items
    }
}

impl<E> Deref for PersistentList<E> {
    type Target = [E];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<'a, E> IntoIterator for &'a PersistentList<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<E: fmt::Debug> fmt::Debug for PersistentList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentList")
            .field("items", &self.items)
            .field("session", &self.session.as_ref().map(PersistSession::id))
            .field("dirty", &self.dirty)
            .field("wrapped", &self.wrapped)
            .finish()
    }
}

impl<E> PersistentCollection for PersistentList<E>
where
    E: Send + Sync + 'static,
{
    fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(PersistSession::id)
    }

    fn bind_session(&mut self, session: &PersistSession) -> Result<bool> {
        match &self.session {
            Some(current) if current.same_session(session) => Ok(false),
            Some(current) => Err(PersistError::SessionError(format!(
                "Illegal attempt to associate a collection with two open sessions ({} and {})",
                current.id(),
                session.id()
            ))),
            None => {
                self.session = Some(session.clone());
                Ok(true)
            }
        }
    }

    fn unbind_session(&mut self, session: &PersistSession) -> bool {
        if self.is_bound_to(session) {
            self.session = None;
            true
        } else {
            false
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn was_wrapped(&self) -> bool {
        self.wrapped
    }

    fn element_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<E>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl<E> ListWrapper<E> for PersistentList<E>
where
    E: Send + Sync + 'static,
{
    fn new_empty(session: &PersistSession) -> Result<Self> {
        Ok(Self::bound(session, Vec::new(), false))
    }

    fn new_wrapping(session: &PersistSession, list: Vec<E>) -> Result<Self> {
        Ok(Self::bound(session, list, true))
    }
}
