//! Registry of loaded libraries and constructor bindings.

use crate::error::{LoadError, LookupError};
use crate::library::Library;
use crate::view::{ClassView, InterfaceView, IntrinsicType, intrinsic};
use rustc_hash::FxHashMap;
use std::any::TypeId;
use tracing::debug;
use tsr_host::IntrinsicKind;
use tsr_reflect::{DEFAULT_LIBRARY, MetadataTable, SlotId};

/// Identity of a Rust type bound to a class record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstructorId {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl ConstructorId {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl std::fmt::Display for ConstructorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}

/// Split `package#Name`.
pub fn split_qualified_name(qualified: &str) -> Result<(&str, &str), LookupError> {
    match qualified.split_once('#') {
        Some((package, name)) if !package.is_empty() && !name.is_empty() && !name.contains('#') => {
            Ok((package, name))
        }
        _ => Err(LookupError::MalformedName(qualified.to_string())),
    }
}

/// Loaded reflection libraries. Lookups without a library name use
/// [`DEFAULT_LIBRARY`].
#[derive(Debug, Default)]
pub struct Reflection {
    libraries: FxHashMap<String, Library>,
    by_constructor: FxHashMap<TypeId, (String, SlotId)>,
}

impl Reflection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table, replacing any library of the same name.
    pub fn load(&mut self, table: MetadataTable) -> Result<&Library, LoadError> {
        let library = Library::load(table)?;
        let name = library.name().to_string();
        if self.libraries.contains_key(&name) {
            debug!(library = %name, "replacing loaded library");
            self.by_constructor.retain(|_, (bound, _)| *bound != name);
        }
        self.libraries.insert(name.clone(), library);
        Ok(&self.libraries[&name])
    }

    pub fn load_json(&mut self, text: &str) -> Result<&Library, LoadError> {
        self.load(MetadataTable::from_json(text)?)
    }

    pub fn library(&self, name: &str) -> Result<&Library, LookupError> {
        self.libraries
            .get(name)
            .ok_or_else(|| LookupError::LibraryNotFound(name.to_string()))
    }

    fn default_library(&self) -> Result<&Library, LookupError> {
        self.library(DEFAULT_LIBRARY)
    }

    pub fn intrinsic(&self, kind: IntrinsicKind) -> &'static IntrinsicType {
        intrinsic(kind)
    }

    pub fn class_for_name(&self, qualified: &str) -> Result<ClassView<'_>, LookupError> {
        let (package, name) = split_qualified_name(qualified)?;
        self.class_for_name_in(package, name)
    }

    pub fn class_for_name_in(&self, package: &str, name: &str) -> Result<ClassView<'_>, LookupError> {
        self.default_library()?.class_for_name_in(package, name)
    }

    pub fn interface_for_name(&self, qualified: &str) -> Result<InterfaceView<'_>, LookupError> {
        let (package, name) = split_qualified_name(qualified)?;
        self.interface_for_name_in(package, name)
    }

    pub fn interface_for_name_in(
        &self,
        package: &str,
        name: &str,
    ) -> Result<InterfaceView<'_>, LookupError> {
        self.default_library()?.interface_for_name_in(package, name)
    }

    /// Bind `T` to the class registered as `qualified` in the default library.
    pub fn register_class<T: 'static>(&mut self, qualified: &str) -> Result<(), LookupError> {
        self.register_class_in::<T>(DEFAULT_LIBRARY, qualified)
    }

    /// Bind `T` to a class of a named library. A type bound twice keeps the
    /// latest binding.
    pub fn register_class_in<T: 'static>(
        &mut self,
        library: &str,
        qualified: &str,
    ) -> Result<(), LookupError> {
        let (package, name) = split_qualified_name(qualified)?;
        let slot = self
            .library(library)?
            .class_for_name_in(package, name)?
            .slot();
        let constructor = ConstructorId::of::<T>();
        if let Some((previous_library, previous_slot)) = self
            .by_constructor
            .insert(constructor.type_id, (library.to_string(), slot))
        {
            if let Some(previous) = self.libraries.get_mut(&previous_library) {
                previous.unbind(previous_slot);
            }
        }
        if let Some(displaced) = self
            .libraries
            .get_mut(library)
            .and_then(|lib| lib.bind(slot, constructor))
        {
            // The class now belongs to `T`; its old type no longer resolves.
            self.by_constructor.remove(&displaced.type_id);
        }
        debug!(constructor = %constructor, class = %qualified, "registered class");
        Ok(())
    }

    /// Class record `T` was registered with.
    pub fn class_for_constructor<T: 'static>(&self) -> Result<ClassView<'_>, LookupError> {
        let constructor = ConstructorId::of::<T>();
        let (library, slot) = self
            .by_constructor
            .get(&constructor.type_id)
            .ok_or(LookupError::ConstructorNotRegistered(constructor.type_name))?;
        let view = self
            .library(library)?
            .type_at(*slot)
            .ok_or(LookupError::ConstructorNotRegistered(constructor.type_name))?;
        Ok(ClassView::new(view))
    }
}
