mod collection_type;
mod config;
mod generic_list_type;
mod registry;

pub use collection_type::{CollectionKind, CollectionType};
pub use config::ListMapping;
pub use generic_list_type::GenericListType;
pub use registry::{
    EmptyConstructor, ListSpecialization, ListTypeRegistry, WrappingConstructor, register_shared,
    register_shared_specialization, resolve_shared,
};
