//! Checker capability contract for the tsr reflection pass.
//!
//! The reflection pass never looks at source text. It consumes already
//! checked types through the [`TypeHost`] trait:
//!
//! - `resolve_type`: type of a declaration
//! - `members_of` / `statics_of`: ordered member lists
//! - `signatures_of`: call, construct and index signatures
//! - `heritage_of`: `extends` / `implements` clauses
//!
//! plus the declaration tree ([`SourceFile`] / [`Statement`]) the package
//! builder walks.
//!
//! [`Program`] is an in-memory, serde-loadable implementation of the contract.
//! It backs the CLI and the test suites; a real compiler integration
//! implements [`TypeHost`] over its own checker instead.

pub mod builder;
pub mod host;
pub mod program;
pub mod syntax;
pub mod types;

pub use builder::{ProgramBuilder, Scope};
pub use host::TypeHost;
pub use program::{ObjectTypeData, Program, ProgramError, TypeData};
pub use syntax::{DeclarationKind, SourceFile, Statement};
pub use types::{
    DeclId, HeritageKind, IntrinsicKind, LiteralValue, MemberInfo, MemberKind, ParameterInfo,
    SignatureInfo, SignatureKind, TypeHandle, TypeKind,
};
