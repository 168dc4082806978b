//! In-memory program: a type arena plus a declaration tree.
//!
//! Handles `0..TypeHandle::FIRST_USER` are the intrinsics, in
//! [`IntrinsicKind::ALL`] order. The serialized form lists only the
//! remaining types, so `types[i]` in JSON is handle `10 + i`.

use crate::host::{TypeHost, is_standard_array};
use crate::syntax::{SourceFile, Statement};
use crate::types::{
    DeclId, HeritageKind, IntrinsicKind, LiteralValue, MemberInfo, SignatureInfo, SignatureKind,
    TypeHandle, TypeKind,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    #[error("type #{handle} refers to unknown type #{target}")]
    DanglingType { handle: u32, target: u32 },
    #[error("declaration #{decl} refers to unknown type #{target}")]
    DanglingDeclaration { decl: u32, target: u32 },
    #[error("statement in '{file}' refers to unknown declaration #{decl}")]
    UnknownDeclaration { file: String, decl: u32 },
    #[error("invalid program: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shape shared by classes, interfaces and object type literals.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTypeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeHandle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statics: Vec<MemberInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call: Vec<SignatureInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub construct: Vec<SignatureInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index: Vec<SignatureInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<TypeHandle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<TypeHandle>,
    /// Overrides name-based array detection for references to this type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_like: Option<bool>,
}

impl ObjectTypeData {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    fn signatures(&self, kind: SignatureKind) -> &[SignatureInfo] {
        match kind {
            SignatureKind::Call => &self.call,
            SignatureKind::Construct => &self.construct,
            SignatureKind::Index => &self.index,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TypeData {
    Intrinsic {
        intrinsic: IntrinsicKind,
    },
    Literal {
        value: LiteralValue,
    },
    Class(ObjectTypeData),
    Interface(ObjectTypeData),
    TypeLiteral(ObjectTypeData),
    ObjectLiteral(ObjectTypeData),
    Reference {
        target: TypeHandle,
        #[serde(default)]
        type_arguments: Vec<TypeHandle>,
    },
    Union {
        types: Vec<TypeHandle>,
    },
    Intersection {
        types: Vec<TypeHandle>,
    },
    Tuple {
        elements: Vec<TypeHandle>,
    },
    Function {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        signatures: Vec<SignatureInfo>,
    },
    ClassExpression {
        #[serde(default)]
        name: Option<String>,
        instance: TypeHandle,
    },
    TypeParameter {
        name: String,
        #[serde(default)]
        constraint: Option<TypeHandle>,
    },
    /// Anything the reflection pass has no representation for.
    Opaque {
        description: String,
    },
}

impl TypeData {
    pub(crate) const fn object(&self) -> Option<&ObjectTypeData> {
        match self {
            Self::Class(data)
            | Self::Interface(data)
            | Self::TypeLiteral(data)
            | Self::ObjectLiteral(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) const fn object_mut(&mut self) -> Option<&mut ObjectTypeData> {
        match self {
            Self::Class(data)
            | Self::Interface(data)
            | Self::TypeLiteral(data)
            | Self::ObjectLiteral(data) => Some(data),
            _ => None,
        }
    }

    /// Every handle this type refers to, for validation.
    fn for_each_handle(&self, f: &mut impl FnMut(TypeHandle)) {
        fn signature(sig: &SignatureInfo, f: &mut impl FnMut(TypeHandle)) {
            sig.parameters.iter().for_each(|p| f(p.ty));
            f(sig.returns);
            sig.type_parameters.iter().copied().for_each(&mut *f);
        }
        match self {
            Self::Intrinsic { .. } | Self::Literal { .. } | Self::Opaque { .. } => {}
            Self::Class(data)
            | Self::Interface(data)
            | Self::TypeLiteral(data)
            | Self::ObjectLiteral(data) => {
                data.type_parameters.iter().copied().for_each(&mut *f);
                for member in data.members.iter().chain(&data.statics) {
                    f(member.value_type);
                }
                for sig in data.call.iter().chain(&data.construct).chain(&data.index) {
                    signature(sig, f);
                }
                data.extends.iter().copied().for_each(&mut *f);
                data.implements.iter().copied().for_each(&mut *f);
            }
            Self::Reference {
                target,
                type_arguments,
            } => {
                f(*target);
                type_arguments.iter().copied().for_each(&mut *f);
            }
            Self::Union { types } | Self::Intersection { types } => {
                types.iter().copied().for_each(&mut *f);
            }
            Self::Tuple { elements } => elements.iter().copied().for_each(&mut *f),
            Self::Function { signatures, .. } => {
                for sig in signatures {
                    signature(sig, f);
                }
            }
            Self::ClassExpression { instance, .. } => f(*instance),
            Self::TypeParameter { constraint, .. } => {
                if let Some(constraint) = constraint {
                    f(*constraint);
                }
            }
        }
    }
}

/// Serialized shape of a [`Program`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgramData {
    #[serde(default)]
    types: Vec<TypeData>,
    #[serde(default)]
    declarations: Vec<TypeHandle>,
    #[serde(default)]
    files: Vec<SourceFile>,
}

/// A checked program held entirely in memory.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "ProgramData", into = "ProgramData")]
pub struct Program {
    types: Vec<TypeData>,
    declarations: Vec<TypeHandle>,
    files: Vec<SourceFile>,
    canonical: Vec<TypeHandle>,
}

impl TryFrom<ProgramData> for Program {
    type Error = ProgramError;

    fn try_from(data: ProgramData) -> Result<Self, Self::Error> {
        let mut types = intrinsic_types();
        types.extend(data.types);
        Self::from_parts(types, data.declarations, data.files)
    }
}

impl From<Program> for ProgramData {
    fn from(program: Program) -> Self {
        let mut types = program.types;
        types.drain(..TypeHandle::FIRST_USER as usize);
        Self {
            types,
            declarations: program.declarations,
            files: program.files,
        }
    }
}

pub(crate) fn intrinsic_types() -> Vec<TypeData> {
    IntrinsicKind::ALL
        .into_iter()
        .map(|intrinsic| TypeData::Intrinsic { intrinsic })
        .collect()
}

impl Program {
    /// Build a program from a full type arena (intrinsics included).
    pub fn from_parts(
        types: Vec<TypeData>,
        declarations: Vec<TypeHandle>,
        files: Vec<SourceFile>,
    ) -> Result<Self, ProgramError> {
        validate(&types, &declarations, &files)?;
        let canonical = Canonicalizer::new(&types).run();
        debug!(
            types = types.len(),
            declarations = declarations.len(),
            files = files.len(),
            "program loaded"
        );
        Ok(Self {
            types,
            declarations,
            files,
            canonical,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, ProgramError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ProgramError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn type_data(&self, ty: TypeHandle) -> Option<&TypeData> {
        self.types.get(ty.index())
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    fn object(&self, ty: TypeHandle) -> Option<&ObjectTypeData> {
        self.type_data(ty).and_then(TypeData::object)
    }
}

fn validate(
    types: &[TypeData],
    declarations: &[TypeHandle],
    files: &[SourceFile],
) -> Result<(), ProgramError> {
    let len = types.len() as u32;
    for (index, data) in types.iter().enumerate() {
        let mut dangling = None;
        data.for_each_handle(&mut |target| {
            if target.0 >= len && dangling.is_none() {
                dangling = Some(target);
            }
        });
        if let Some(target) = dangling {
            return Err(ProgramError::DanglingType {
                handle: index as u32,
                target: target.0,
            });
        }
    }
    for (decl, target) in declarations.iter().enumerate() {
        if target.0 >= len {
            return Err(ProgramError::DanglingDeclaration {
                decl: decl as u32,
                target: target.0,
            });
        }
    }
    for file in files {
        check_statements(&file.file_name, &file.statements, declarations.len())?;
    }
    Ok(())
}

fn check_statements(
    file: &str,
    statements: &[Statement],
    declarations: usize,
) -> Result<(), ProgramError> {
    for statement in statements {
        let decl = match statement {
            Statement::Namespace { statements, .. } => {
                check_statements(file, statements, declarations)?;
                continue;
            }
            Statement::Class { decl, .. }
            | Statement::Interface { decl, .. }
            | Statement::TypeAlias { decl, .. } => *decl,
            Statement::Other => continue,
        };
        if decl.0 as usize >= declarations {
            return Err(ProgramError::UnknownDeclaration {
                file: file.to_string(),
                decl: decl.0,
            });
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum StructuralKey {
    Reference(TypeHandle, SmallVec<[TypeHandle; 4]>),
    Union(SmallVec<[TypeHandle; 4]>),
    Intersection(SmallVec<[TypeHandle; 4]>),
    Tuple(SmallVec<[TypeHandle; 4]>),
}

/// Interns structurally equal references, unions, intersections and tuples.
///
/// Classes and interfaces are nominal and are their own representative.
struct Canonicalizer<'a> {
    types: &'a [TypeData],
    memo: Vec<Option<TypeHandle>>,
    in_progress: FxHashSet<TypeHandle>,
    interned: FxHashMap<StructuralKey, TypeHandle>,
}

impl<'a> Canonicalizer<'a> {
    fn new(types: &'a [TypeData]) -> Self {
        Self {
            types,
            memo: vec![None; types.len()],
            in_progress: FxHashSet::default(),
            interned: FxHashMap::default(),
        }
    }

    fn run(mut self) -> Vec<TypeHandle> {
        for index in 0..self.types.len() {
            self.resolve(TypeHandle(index as u32));
        }
        self.memo
            .into_iter()
            .enumerate()
            .map(|(index, canonical)| canonical.unwrap_or(TypeHandle(index as u32)))
            .collect()
    }

    fn resolve(&mut self, ty: TypeHandle) -> TypeHandle {
        if let Some(canonical) = self.memo[ty.index()] {
            return canonical;
        }
        // A structural type containing itself has no smaller representative.
        if !self.in_progress.insert(ty) {
            return ty;
        }
        let types = self.types;
        let canonical = match &types[ty.index()] {
            TypeData::Intrinsic { intrinsic } => intrinsic.handle(),
            TypeData::Reference {
                target,
                type_arguments,
            } => {
                let target = self.resolve(*target);
                let key = StructuralKey::Reference(target, self.resolve_all(type_arguments));
                self.intern(key, ty)
            }
            TypeData::Union { types } => {
                let key = StructuralKey::Union(self.resolve_all(types));
                self.intern(key, ty)
            }
            TypeData::Intersection { types } => {
                let key = StructuralKey::Intersection(self.resolve_all(types));
                self.intern(key, ty)
            }
            TypeData::Tuple { elements } => {
                let key = StructuralKey::Tuple(self.resolve_all(elements));
                self.intern(key, ty)
            }
            _ => ty,
        };
        self.in_progress.remove(&ty);
        self.memo[ty.index()] = Some(canonical);
        canonical
    }

    fn resolve_all(&mut self, handles: &[TypeHandle]) -> SmallVec<[TypeHandle; 4]> {
        handles.iter().map(|&handle| self.resolve(handle)).collect()
    }

    fn intern(&mut self, key: StructuralKey, ty: TypeHandle) -> TypeHandle {
        *self.interned.entry(key).or_insert(ty)
    }
}

impl TypeHost for Program {
    fn resolve_type(&self, decl: DeclId) -> TypeHandle {
        self.declarations
            .get(decl.0 as usize)
            .copied()
            .unwrap_or(TypeHandle::ANY)
    }

    fn kind_of(&self, ty: TypeHandle) -> TypeKind {
        let Some(data) = self.type_data(ty) else {
            return TypeKind::Unknown {
                description: format!("<missing #{}>", ty.0),
            };
        };
        match data {
            TypeData::Intrinsic { intrinsic } => TypeKind::Intrinsic(*intrinsic),
            TypeData::Literal { value } => TypeKind::Literal(value.clone()),
            TypeData::Class(data) => TypeKind::Class {
                name: data.name.clone(),
            },
            TypeData::Interface(data) => TypeKind::Interface {
                name: data.name.clone(),
            },
            TypeData::TypeLiteral(data) => TypeKind::TypeLiteral {
                name: data.name.clone(),
            },
            TypeData::ObjectLiteral(_) => TypeKind::ObjectLiteral,
            TypeData::Reference {
                target,
                type_arguments,
            } => TypeKind::Reference {
                target: *target,
                type_arguments: type_arguments.clone(),
            },
            TypeData::Union { types } => TypeKind::Union(types.clone()),
            TypeData::Intersection { types } => TypeKind::Intersection(types.clone()),
            TypeData::Tuple { elements } => TypeKind::Tuple(elements.clone()),
            TypeData::Function { name, .. } => TypeKind::Function { name: name.clone() },
            TypeData::ClassExpression { name, instance } => TypeKind::ClassExpression {
                name: name.clone(),
                instance: *instance,
            },
            TypeData::TypeParameter { name, constraint } => TypeKind::TypeParameter {
                name: name.clone(),
                constraint: *constraint,
            },
            TypeData::Opaque { description } => TypeKind::Unknown {
                description: description.clone(),
            },
        }
    }

    fn members_of(&self, ty: TypeHandle) -> Vec<MemberInfo> {
        self.object(ty)
            .map(|data| data.members.clone())
            .unwrap_or_default()
    }

    fn statics_of(&self, ty: TypeHandle) -> Vec<MemberInfo> {
        match self.type_data(ty) {
            Some(TypeData::Class(data)) => data.statics.clone(),
            _ => Vec::new(),
        }
    }

    fn signatures_of(&self, ty: TypeHandle, kind: SignatureKind) -> Vec<SignatureInfo> {
        match self.type_data(ty) {
            Some(TypeData::Function { signatures, .. }) if kind == SignatureKind::Call => {
                signatures.clone()
            }
            Some(data) => data
                .object()
                .map(|data| data.signatures(kind).to_vec())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    fn heritage_of(&self, ty: TypeHandle, kind: HeritageKind) -> Vec<TypeHandle> {
        self.object(ty)
            .map(|data| match kind {
                HeritageKind::Extends => data.extends.clone(),
                HeritageKind::Implements => data.implements.clone(),
            })
            .unwrap_or_default()
    }

    fn type_parameters_of(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        self.object(ty)
            .map(|data| data.type_parameters.clone())
            .unwrap_or_default()
    }

    fn canonical(&self, ty: TypeHandle) -> TypeHandle {
        self.canonical.get(ty.index()).copied().unwrap_or(ty)
    }

    fn is_array_like(&self, target: TypeHandle) -> bool {
        match self.object(target).and_then(|data| data.array_like) {
            Some(tagged) => tagged,
            None => is_standard_array(self, target),
        }
    }
}

#[cfg(test)]
#[path = "../tests/program_tests.rs"]
mod program_tests;
