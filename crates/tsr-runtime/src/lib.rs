//! Run-time side of tsr reflection.
//!
//! A [`Reflection`] holds loaded metadata tables keyed by library name and
//! answers lookups such as `class_for_name("models.user#User")`. Rust types
//! can be bound to class records with [`Reflection::register_class`] and
//! looked up again by type with [`Reflection::class_for_constructor`].

mod error;
mod library;
mod reflection;
mod view;

pub use error::{LoadError, LookupError};
pub use library::Library;
pub use reflection::{ConstructorId, Reflection, split_qualified_name};
pub use view::{
    ClassView, IntrinsicType, InterfaceView, MemberView, ResolvedType, TypeView, intrinsic,
};
