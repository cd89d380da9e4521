use super::collection_type::{CollectionKind, CollectionType};
use super::config::ListMapping;
use super::registry::{
    self, EmptyConstructor, ListSpecialization, ListTypeRegistry, WrappingConstructor,
};
use crate::collection::{ListSemantics, PersistentCollection};
use crate::core::{PersistError, Result, TypeDescriptor};
use crate::session::PersistSession;
use std::any::Any;
use std::fmt;
use tracing::{Level, event};

/// Maps a `Vec<E>` property to the database using list semantics.
///
/// The element type is named by the mapping and resolved once, when the
/// mapping is loaded. The resulting wrapper type and its two constructors are
/// cached here and reused for every collection of this role, so a broken
/// mapping fails at load time instead of at first use.
///
/// The type is immutable after construction and can be shared freely between
/// sessions and threads.
///
/// # Examples
///
/// ```
/// use persist_list::{GenericListType, ListTypeRegistry, PersistSession, PersistentList};
///
/// # fn main() -> persist_list::Result<()> {
/// let registry = ListTypeRegistry::with_builtin_types();
/// let items = GenericListType::new("Order.items", None, "i64", &registry)?;
///
/// let session = PersistSession::new("checkout");
/// let tracked = items.wrap_list(&session, vec![3_i64, 5, 8])?;
/// let list = tracked.downcast_ref::<PersistentList<i64>>().unwrap();
/// assert_eq!(list.as_slice(), &[3, 5, 8]);
/// # Ok(())
/// # }
/// ```
pub struct GenericListType {
    role: String,
    property_ref: Option<String>,
    element_type: TypeDescriptor,
    wrapper_type: TypeDescriptor,
    returned_class: TypeDescriptor,
    empty_constructor: EmptyConstructor,
    wrapping_constructor: WrappingConstructor,
    semantics: ListSemantics,
}

impl GenericListType {
    /// Builds the list type for `role`, resolving `element_type` in `registry`.
    pub fn new(
        role: impl Into<String>,
        property_ref: Option<String>,
        element_type: &str,
        registry: &ListTypeRegistry,
    ) -> Result<Self> {
        let specialization = registry.resolve(element_type)?;
        Self::from_specialization(role, property_ref, specialization, ListSemantics::default())
    }

    /// Builds the list type described by a mapping declaration.
    pub fn from_mapping(mapping: &ListMapping, registry: &ListTypeRegistry) -> Result<Self> {
        mapping.validate()?;
        let specialization = registry.resolve(&mapping.element_type)?;
        Self::from_specialization(
            mapping.role.clone(),
            mapping.property_ref.clone(),
            specialization,
            mapping.semantics(),
        )
    }

    /// Builds the list type described by a mapping declaration against the
    /// process-wide registry.
    pub fn from_shared_mapping(mapping: &ListMapping) -> Result<Self> {
        mapping.validate()?;
        let specialization = registry::resolve_shared(&mapping.element_type)?;
        Self::from_specialization(
            mapping.role.clone(),
            mapping.property_ref.clone(),
            specialization,
            mapping.semantics(),
        )
    }

    /// Builds the list type from an already resolved specialization.
    ///
    /// Fails if the wrapper type lacks either constructor.
    pub fn from_specialization(
        role: impl Into<String>,
        property_ref: Option<String>,
        specialization: ListSpecialization,
        semantics: ListSemantics,
    ) -> Result<Self> {
        let role = role.into();

        let empty_constructor = specialization.empty_constructor().cloned().ok_or_else(|| {
            PersistError::ConfigurationError(format!(
                "Wrapper type {} for list '{}' has no constructor taking a session",
                specialization.wrapper_type(),
                role
            ))
        })?;
        let wrapping_constructor =
            specialization.wrapping_constructor().cloned().ok_or_else(|| {
                PersistError::ConfigurationError(format!(
                    "Wrapper type {} for list '{}' has no constructor taking a session and a {}",
                    specialization.wrapper_type(),
                    role,
                    specialization.interface_type()
                ))
            })?;

        event!(
            Level::DEBUG,
            role = %role,
            element_type = %specialization.element_type(),
            wrapper_type = %specialization.wrapper_type(),
            "list type resolved"
        );

        Ok(Self {
            role,
            property_ref,
            element_type: specialization.element_type(),
            wrapper_type: specialization.wrapper_type(),
            returned_class: specialization.interface_type(),
            empty_constructor,
            wrapping_constructor,
            semantics,
        })
    }

    /// Returns the concrete tracked collection type produced by this mapping.
    pub fn wrapper_type(&self) -> TypeDescriptor {
        self.wrapper_type
    }

    pub fn element_type(&self) -> TypeDescriptor {
        self.element_type
    }

    /// Returns the index semantics shared with every list mapping.
    pub fn semantics(&self) -> &ListSemantics {
        &self.semantics
    }

    fn check_wrapper_type(
        &self,
        collection: Box<dyn PersistentCollection>,
    ) -> Result<Box<dyn PersistentCollection>> {
        if self.wrapper_type.matches(collection.as_any()) {
            Ok(collection)
        } else {
            Err(PersistError::ConfigurationError(format!(
                "Constructor for list '{}' did not produce its wrapper type {}",
                self.role, self.wrapper_type
            )))
        }
    }

    /// Typed form of [`CollectionType::wrap`].
    pub fn wrap_list<E>(
        &self,
        session: &PersistSession,
        list: Vec<E>,
    ) -> Result<Box<dyn PersistentCollection>>
    where
        E: Send + 'static,
    {
        self.wrap(session, Box::new(list))
    }
}

impl CollectionType for GenericListType {
    fn role(&self) -> &str {
        &self.role
    }

    fn property_ref(&self) -> Option<&str> {
        self.property_ref.as_deref()
    }

    fn kind(&self) -> CollectionKind {
        CollectionKind::List
    }

    fn returned_class(&self) -> TypeDescriptor {
        self.returned_class
    }

    fn instantiate(&self, session: &PersistSession) -> Result<Box<dyn PersistentCollection>> {
        let collection = (self.empty_constructor)(session)?;
        self.check_wrapper_type(collection)
    }

    fn wrap(
        &self,
        session: &PersistSession,
        collection: Box<dyn Any + Send>,
    ) -> Result<Box<dyn PersistentCollection>> {
        if !self.returned_class.matches(&*collection) {
            return Err(PersistError::TypeMismatch(format!(
                "List '{}' can only wrap a {}",
                self.role, self.returned_class
            )));
        }
        let collection = (self.wrapping_constructor)(session, collection)?;
        self.check_wrapper_type(collection)
    }
}

impl fmt::Debug for GenericListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericListType")
            .field("role", &self.role)
            .field("property_ref", &self.property_ref)
            .field("element_type", &self.element_type)
            .field("wrapper_type", &self.wrapper_type)
            .field("semantics", &self.semantics)
            .finish()
    }
}
