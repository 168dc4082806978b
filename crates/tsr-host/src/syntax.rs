//! Declaration tree the package builder walks.
//!
//! Only the statements reflection cares about are modelled; everything else
//! collapses to [`Statement::Other`].

use crate::types::DeclId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub file_name: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
    /// Ambient declaration files (`.d.ts`) contribute no packages.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_declaration_file: bool,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let is_declaration_file = file_name.ends_with(".d.ts");
        Self {
            file_name,
            statements: Vec::new(),
            is_declaration_file,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Statement {
    Namespace {
        name: String,
        #[serde(default)]
        statements: Vec<Statement>,
    },
    Class {
        decl: DeclId,
        #[serde(default)]
        name: Option<String>,
    },
    Interface {
        decl: DeclId,
        #[serde(default)]
        name: Option<String>,
    },
    TypeAlias {
        decl: DeclId,
        name: String,
    },
    Other,
}

/// Declaration kinds that take part in the package name table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Class,
    Interface,
}

impl DeclarationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
        }
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
