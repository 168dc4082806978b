use tsr_common::limits;

/// A failed run-time lookup. Other lookups are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("malformed type name '{0}', expected 'package#Name'")]
    MalformedName(String),
    #[error("reflection library '{0}' is not loaded")]
    LibraryNotFound(String),
    #[error("package '{0}' not found")]
    PackageNotFound(String),
    #[error("type '{name}' not found in package '{package}'")]
    TypeNotFound { package: String, name: String },
    #[error("'{package}#{name}' is {actual}, not {expected}")]
    KindMismatch {
        package: String,
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("no class is registered for constructor '{0}'")]
    ConstructorNotRegistered(&'static str),
}

/// A metadata table that cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("table declares {count} slots, more than the limit of {}", limits::MAX_SLOTS)]
    TooManySlots { count: u32 },
    #[error("population for slot {slot} is outside the table of {count} slots")]
    SlotOutOfRange { slot: u32, count: u32 },
    #[error("slot {slot} is populated twice")]
    DuplicatePopulation { slot: u32 },
    #[error("slot {slot} refers to slot {target}, outside the table of {count} slots")]
    DanglingReference { slot: u32, target: u32, count: u32 },
    #[error("slot {slot} is never populated")]
    Unpopulated { slot: u32 },
    #[error("'{package}#{name}' refers to slot {slot}, outside the table")]
    DanglingName {
        package: String,
        name: String,
        slot: u32,
    },
    #[error("invalid metadata table: {0}")]
    Json(#[from] serde_json::Error),
}
