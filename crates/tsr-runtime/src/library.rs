//! One loaded metadata table.

use crate::error::{LoadError, LookupError};
use crate::reflection::ConstructorId;
use crate::view::{ClassView, InterfaceView, TypeView};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;
use tsr_common::limits;
use tsr_reflect::{MetadataTable, PackageTable, SlotId, TypeNode, TypeNodeKind};

#[derive(Debug)]
pub struct Library {
    name: String,
    /// Indexed by slot; every slot is populated once loading succeeds.
    slots: Vec<TypeNode>,
    packages: IndexMap<String, PackageTable>,
    constructors: FxHashMap<SlotId, ConstructorId>,
}

impl Library {
    /// Hydrate a table: allocate every slot, then populate.
    ///
    /// Populations may reference slots populated after them; references and
    /// package entries are checked against the allocated range only.
    pub fn load(table: MetadataTable) -> Result<Self, LoadError> {
        let count = table.slot_count;
        if count > limits::MAX_SLOTS {
            return Err(LoadError::TooManySlots { count });
        }

        // Pass 1: every slot exists before any is populated.
        let mut slots: Vec<Option<TypeNode>> = vec![None; count as usize];

        // Pass 2: populate in table order.
        for node in table.populations {
            let slot = node.slot;
            let Some(entry) = slots.get_mut(slot.index()) else {
                return Err(LoadError::SlotOutOfRange {
                    slot: slot.0,
                    count,
                });
            };
            if entry.is_some() {
                return Err(LoadError::DuplicatePopulation { slot: slot.0 });
            }
            if let Some(target) = node.slot_refs().into_iter().find(|t| t.0 >= count) {
                return Err(LoadError::DanglingReference {
                    slot: slot.0,
                    target: target.0,
                    count,
                });
            }
            *entry = Some(node);
        }

        let slots = slots
            .into_iter()
            .enumerate()
            .map(|(index, node)| node.ok_or(LoadError::Unpopulated { slot: index as u32 }))
            .collect::<Result<Vec<_>, _>>()?;

        for (package, types) in &table.packages {
            for (name, slot) in types {
                if slot.0 >= count {
                    return Err(LoadError::DanglingName {
                        package: package.clone(),
                        name: name.clone(),
                        slot: slot.0,
                    });
                }
            }
        }

        debug!(
            library = %table.library,
            slots = count,
            packages = table.packages.len(),
            "loaded reflection library"
        );
        Ok(Self {
            name: table.library,
            slots,
            packages: table.packages,
            constructors: FxHashMap::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn type_at(&self, slot: SlotId) -> Option<TypeView<'_>> {
        self.slots
            .get(slot.index())
            .map(|node| TypeView::new(self, node))
    }

    pub(crate) fn node(&self, slot: SlotId) -> &TypeNode {
        // Every reference was range-checked by `load`.
        &self.slots[slot.index()]
    }

    /// Any named type in `package`.
    pub fn lookup(&self, package: &str, name: &str) -> Result<TypeView<'_>, LookupError> {
        let types = self
            .packages
            .get(package)
            .ok_or_else(|| LookupError::PackageNotFound(package.to_string()))?;
        let slot = types.get(name).ok_or_else(|| LookupError::TypeNotFound {
            package: package.to_string(),
            name: name.to_string(),
        })?;
        Ok(TypeView::new(self, self.node(*slot)))
    }

    pub fn class_for_name_in(&self, package: &str, name: &str) -> Result<ClassView<'_>, LookupError> {
        let view = self.lookup(package, name)?;
        match view.kind() {
            TypeNodeKind::Class { .. } => Ok(ClassView::new(view)),
            other => Err(kind_mismatch(package, name, "a class", other)),
        }
    }

    pub fn interface_for_name_in(
        &self,
        package: &str,
        name: &str,
    ) -> Result<InterfaceView<'_>, LookupError> {
        let view = self.lookup(package, name)?;
        match view.kind() {
            TypeNodeKind::Interface { .. } => Ok(InterfaceView::new(view)),
            other => Err(kind_mismatch(package, name, "an interface", other)),
        }
    }

    pub(crate) fn bind(&mut self, slot: SlotId, constructor: ConstructorId) -> Option<ConstructorId> {
        self.constructors.insert(slot, constructor)
    }

    pub(crate) fn unbind(&mut self, slot: SlotId) {
        self.constructors.remove(&slot);
    }

    pub(crate) fn constructor_of(&self, slot: SlotId) -> Option<ConstructorId> {
        self.constructors.get(&slot).copied()
    }
}

fn kind_mismatch(
    package: &str,
    name: &str,
    expected: &'static str,
    actual: &TypeNodeKind,
) -> LookupError {
    let actual = match actual {
        TypeNodeKind::Class { .. } => "a class",
        TypeNodeKind::Interface { .. } => "an interface",
        other => other.tag(),
    };
    LookupError::KindMismatch {
        package: package.to_string(),
        name: name.to_string(),
        expected,
        actual,
    }
}

#[cfg(test)]
#[path = "../tests/library_tests.rs"]
mod library_tests;
