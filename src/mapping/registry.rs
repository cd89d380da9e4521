use crate::collection::{ListWrapper, PersistentCollection, PersistentList};
use crate::core::{PersistError, Result, TypeDescriptor};
use crate::session::PersistSession;
use lazy_static::lazy_static;
use log::warn;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

pub type EmptyConstructor =
    Arc<dyn Fn(&PersistSession) -> Result<Box<dyn PersistentCollection>> + Send + Sync>;
pub type WrappingConstructor = Arc<
    dyn Fn(&PersistSession, Box<dyn Any + Send>) -> Result<Box<dyn PersistentCollection>>
        + Send
        + Sync,
>;

/// The tracked list template specialized for a single element type.
///
/// Holds the wrapper and interface types together with the two constructors
/// a list mapping needs. Cloning is cheap; constructors are shared.
#[derive(Clone)]
pub struct ListSpecialization {
    element_type: TypeDescriptor,
    wrapper_type: TypeDescriptor,
    interface_type: TypeDescriptor,
    empty: Option<EmptyConstructor>,
    wrapping: Option<WrappingConstructor>,
}

impl ListSpecialization {
    /// Specializes wrapper `W` for element type `E` with both constructors.
    pub fn of<E, W>() -> Self
    where
        E: Send + 'static,
        W: ListWrapper<E>,
    {
        Self::partial::<E, W>()
            .with_empty_constructor(Arc::new(
                |session: &PersistSession| -> Result<Box<dyn PersistentCollection>> {
                    let collection = W::new_empty(session)?;
                    Ok(Box::new(collection))
                },
            ))
            .with_wrapping_constructor(Arc::new(
                |session: &PersistSession,
                 collection: Box<dyn Any + Send>|
                 -> Result<Box<dyn PersistentCollection>> {
                    let list = collection.downcast::<Vec<E>>().map_err(|_| {
                        PersistError::TypeMismatch(format!(
                            "{} expects a {}",
                            std::any::type_name::<W>(),
                            std::any::type_name::<Vec<E>>()
                        ))
                    })?;
                    let collection = W::new_wrapping(session, *list)?;
                    Ok(Box::new(collection))
                },
            ))
    }

    /// Describes wrapper `W` for element type `E` without any constructor.
    ///
    /// Constructors are supplied afterwards, e.g. by generated factory tables.
    pub fn partial<E, W>() -> Self
    where
        E: 'static,
        W: PersistentCollection,
    {
        Self {
            element_type: TypeDescriptor::of::<E>(),
            wrapper_type: TypeDescriptor::of::<W>(),
            interface_type: TypeDescriptor::of::<Vec<E>>(),
            empty: None,
            wrapping: None,
        }
    }

    /// Sets the constructor for fresh collections.
    ///
    /// The closure must return the wrapper type this specialization was
    /// declared with; list types reject any other collection at call time.
    pub fn with_empty_constructor(mut self, constructor: EmptyConstructor) -> Self {
        self.empty = Some(constructor);
        self
    }

    /// Sets the constructor wrapping an application `Vec<E>`.
    ///
    /// Like [`with_empty_constructor`](Self::with_empty_constructor), the
    /// closure must return the declared wrapper type.
    pub fn with_wrapping_constructor(mut self, constructor: WrappingConstructor) -> Self {
        self.wrapping = Some(constructor);
        self
    }

    pub fn element_type(&self) -> TypeDescriptor {
        self.element_type
    }

    pub fn wrapper_type(&self) -> TypeDescriptor {
        self.wrapper_type
    }

    /// The application-facing list type, `Vec<E>`.
    pub fn interface_type(&self) -> TypeDescriptor {
        self.interface_type
    }

    pub fn empty_constructor(&self) -> Option<&EmptyConstructor> {
        self.empty.as_ref()
    }

    pub fn wrapping_constructor(&self) -> Option<&WrappingConstructor> {
        self.wrapping.as_ref()
    }
}

impl fmt::Debug for ListSpecialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSpecialization")
            .field("element_type", &self.element_type)
            .field("wrapper_type", &self.wrapper_type)
            .field("interface_type", &self.interface_type)
            .field("empty", &self.empty.is_some())
            .field("wrapping", &self.wrapping.is_some())
            .finish()
    }
}

/// Factory table resolving element type names from mapping metadata to
/// list specializations.
#[derive(Debug, Clone, Default)]
pub struct ListTypeRegistry {
    specializations: HashMap<String, ListSpecialization>,
}

impl ListTypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry that already knows the primitive element types.
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::new();
        registry.register::<i32>("i32");
        registry.register::<i64>("i64");
        registry.register::<u32>("u32");
        registry.register::<u64>("u64");
        registry.register::<f64>("f64");
        registry.register::<bool>("bool");
        registry.register::<char>("char");
        registry.register::<String>("String");
        registry.register::<uuid::Uuid>("Uuid");
        registry
    }

    /// Registers element type `E` under `name` using [`PersistentList`] as wrapper.
    pub fn register<E>(&mut self, name: impl Into<String>)
    where
        E: Send + Sync + 'static,
    {
        self.register_wrapper::<E, PersistentList<E>>(name);
    }

    /// Registers element type `E` under `name` with a custom wrapper type.
    pub fn register_wrapper<E, W>(&mut self, name: impl Into<String>)
    where
        E: Send + 'static,
        W: ListWrapper<E>,
    {
        self.register_specialization(name, ListSpecialization::of::<E, W>());
    }

    /// Registers a prepared specialization under `name`, replacing any previous one.
    pub fn register_specialization(
        &mut self,
        name: impl Into<String>,
        specialization: ListSpecialization,
    ) {
        let name = name.into();
        if let Some(previous) = self.specializations.get(&name) {
            warn!(
                "Element type '{}' re-registered: {} replaces {}",
                name, specialization.wrapper_type, previous.wrapper_type
            );
        }
        self.specializations.insert(name, specialization);
    }

    /// Looks up the specialization registered for element type `name`.
    pub fn resolve(&self, name: &str) -> Result<ListSpecialization> {
        self.specializations.get(name).cloned().ok_or_else(|| {
            PersistError::ConfigurationError(format!(
                "No list specialization registered for element type '{}'",
                name
            ))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specializations.contains_key(name)
    }

    /// Returns the registered element type names, sorted.
    pub fn registered_types(&self) -> Vec<String> {
        let mut names = self.specializations.keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.specializations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specializations.is_empty()
    }
}

lazy_static! {
    static ref SHARED_REGISTRY: RwLock<ListTypeRegistry> =
        RwLock::new(ListTypeRegistry::with_builtin_types());
}

/// Registers element type `E` in the process-wide registry.
pub fn register_shared<E>(name: impl Into<String>) -> Result<()>
where
    E: Send + Sync + 'static,
{
    SHARED_REGISTRY.write()?.register::<E>(name);
    Ok(())
}

/// Registers a prepared specialization in the process-wide registry.
pub fn register_shared_specialization(
    name: impl Into<String>,
    specialization: ListSpecialization,
) -> Result<()> {
    SHARED_REGISTRY
        .write()?
        .register_specialization(name, specialization);
    Ok(())
}

/// Resolves element type `name` against the process-wide registry.
pub fn resolve_shared(name: &str) -> Result<ListSpecialization> {
    SHARED_REGISTRY.read()?.resolve(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_types_resolve() {
        let registry = ListTypeRegistry::with_builtin_types();
        for name in registry.registered_types() {
            let specialization = registry.resolve(&name).unwrap();
            assert!(specialization.empty_constructor().is_some());
            assert!(specialization.wrapping_constructor().is_some());
        }

        let strings = registry.resolve("String").unwrap();
        assert!(strings.interface_type().is::<Vec<String>>());
        assert!(strings.wrapper_type().is::<PersistentList<String>>());
        assert!(strings.element_type().is::<String>());
    }

    #[test]
    fn test_unknown_type_is_configuration_error() {
        let registry = ListTypeRegistry::new();
        assert!(registry.is_empty());
        let err = registry.resolve("LineItem").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("LineItem"));
    }

    #[test]
    fn test_wrapping_constructor_rejects_wrong_collection() {
        let session = PersistSession::new("test");
        let specialization = ListSpecialization::of::<i64, PersistentList<i64>>();
        let wrap = specialization.wrapping_constructor().unwrap();

        let err = match wrap(&session, Box::new(vec!["a".to_string()])) {
            Err(err) => err,
            Ok(_) => panic!("expected a type mismatch"),
        };
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn test_partial_specialization_has_no_constructors() {
        let specialization = ListSpecialization::partial::<i64, PersistentList<i64>>();
        assert!(specialization.empty_constructor().is_none());
        assert!(specialization.wrapping_constructor().is_none());
    }

    #[test]
    fn test_shared_registry() {
        struct SharedElement;

        register_shared::<SharedElement>("SharedElement").unwrap();
        let specialization = resolve_shared("SharedElement").unwrap();
        assert!(specialization.element_type().is::<SharedElement>());
        assert!(resolve_shared("i64").is_ok());

        register_shared_specialization(
            "PartialElement",
            ListSpecialization::partial::<SharedElement, PersistentList<SharedElement>>(),
        )
        .unwrap();
        let partial = resolve_shared("PartialElement").unwrap();
        assert!(partial.empty_constructor().is_none());
    }
}
