//! Programmatic construction of in-memory programs.
//!
//! ```ignore
//! let mut b = ProgramBuilder::new();
//! let node = b.interface("Node");
//! b.property(node, "next", node);
//! let file = b.file("src/node.ts");
//! b.declare(&file, node);
//! let program = b.build()?;
//! ```

use crate::program::{ObjectTypeData, Program, ProgramError, TypeData, intrinsic_types};
use crate::syntax::{SourceFile, Statement};
use crate::types::{DeclId, LiteralValue, MemberInfo, SignatureInfo, TypeHandle};
use tracing::warn;

/// Where a declaration statement is appended: a file, or a namespace inside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    file: usize,
    /// Statement indices of the enclosing namespaces, outermost first.
    path: Vec<usize>,
}

pub struct ProgramBuilder {
    types: Vec<TypeData>,
    declarations: Vec<TypeHandle>,
    files: Vec<SourceFile>,
    array: Option<TypeHandle>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self {
            types: intrinsic_types(),
            declarations: Vec::new(),
            files: Vec::new(),
            array: None,
        }
    }

    pub fn build(self) -> Result<Program, ProgramError> {
        Program::from_parts(self.types, self.declarations, self.files)
    }

    fn push(&mut self, data: TypeData) -> TypeHandle {
        let handle = TypeHandle(self.types.len() as u32);
        self.types.push(data);
        handle
    }

    // =========================================================================
    // Types
    // =========================================================================

    pub fn class(&mut self, name: &str) -> TypeHandle {
        self.push(TypeData::Class(ObjectTypeData::named(name)))
    }

    pub fn interface(&mut self, name: &str) -> TypeHandle {
        self.push(TypeData::Interface(ObjectTypeData::named(name)))
    }

    pub fn type_literal(&mut self, name: Option<&str>) -> TypeHandle {
        self.push(TypeData::TypeLiteral(ObjectTypeData {
            name: name.map(str::to_string),
            ..ObjectTypeData::default()
        }))
    }

    pub fn object_literal(&mut self) -> TypeHandle {
        self.push(TypeData::ObjectLiteral(ObjectTypeData::default()))
    }

    pub fn reference(&mut self, target: TypeHandle, type_arguments: &[TypeHandle]) -> TypeHandle {
        self.push(TypeData::Reference {
            target,
            type_arguments: type_arguments.to_vec(),
        })
    }

    /// The global `Array<T>` interface, created on first use.
    pub fn array_interface(&mut self) -> TypeHandle {
        if let Some(array) = self.array {
            return array;
        }
        let element = self.type_parameter("T", None);
        let array = self.interface("Array");
        self.type_parameters(array, &[element]);
        self.property(array, "length", TypeHandle::NUMBER);
        self.array = Some(array);
        array
    }

    /// `element[]`, as a fresh reference to `Array<T>`.
    pub fn array_of(&mut self, element: TypeHandle) -> TypeHandle {
        let array = self.array_interface();
        self.reference(array, &[element])
    }

    pub fn union(&mut self, types: &[TypeHandle]) -> TypeHandle {
        self.push(TypeData::Union {
            types: types.to_vec(),
        })
    }

    pub fn intersection(&mut self, types: &[TypeHandle]) -> TypeHandle {
        self.push(TypeData::Intersection {
            types: types.to_vec(),
        })
    }

    pub fn tuple(&mut self, elements: &[TypeHandle]) -> TypeHandle {
        self.push(TypeData::Tuple {
            elements: elements.to_vec(),
        })
    }

    pub fn function(&mut self, name: Option<&str>, signatures: Vec<SignatureInfo>) -> TypeHandle {
        self.push(TypeData::Function {
            name: name.map(str::to_string),
            signatures,
        })
    }

    pub fn type_parameter(&mut self, name: &str, constraint: Option<TypeHandle>) -> TypeHandle {
        self.push(TypeData::TypeParameter {
            name: name.to_string(),
            constraint,
        })
    }

    pub fn class_expression(&mut self, name: Option<&str>, instance: TypeHandle) -> TypeHandle {
        self.push(TypeData::ClassExpression {
            name: name.map(str::to_string),
            instance,
        })
    }

    pub fn literal(&mut self, value: LiteralValue) -> TypeHandle {
        self.push(TypeData::Literal { value })
    }

    pub fn opaque(&mut self, description: &str) -> TypeHandle {
        self.push(TypeData::Opaque {
            description: description.to_string(),
        })
    }

    // =========================================================================
    // Object shapes
    // =========================================================================

    fn shape(&mut self, owner: TypeHandle) -> Option<&mut ObjectTypeData> {
        let shape = self
            .types
            .get_mut(owner.index())
            .and_then(TypeData::object_mut);
        if shape.is_none() {
            warn!(owner = owner.0, "not an object type; edit ignored");
        }
        shape
    }

    pub fn member(&mut self, owner: TypeHandle, member: MemberInfo) -> &mut Self {
        if let Some(shape) = self.shape(owner) {
            shape.members.push(member);
        }
        self
    }

    pub fn property(&mut self, owner: TypeHandle, name: &str, ty: TypeHandle) -> &mut Self {
        self.member(owner, MemberInfo::property(name, ty))
    }

    pub fn optional_property(&mut self, owner: TypeHandle, name: &str, ty: TypeHandle) -> &mut Self {
        self.member(owner, MemberInfo::property(name, ty).optional())
    }

    /// Add a method; returns the function type created for it.
    pub fn method(
        &mut self,
        owner: TypeHandle,
        name: &str,
        signatures: Vec<SignatureInfo>,
    ) -> TypeHandle {
        let function = self.function(Some(name), signatures);
        self.member(owner, MemberInfo::method(name, function));
        function
    }

    pub fn static_property(&mut self, owner: TypeHandle, name: &str, ty: TypeHandle) -> &mut Self {
        if let Some(shape) = self.shape(owner) {
            shape.statics.push(MemberInfo::property(name, ty));
        }
        self
    }

    pub fn call_signature(&mut self, owner: TypeHandle, signature: SignatureInfo) -> &mut Self {
        if let Some(shape) = self.shape(owner) {
            shape.call.push(signature);
        }
        self
    }

    pub fn construct_signature(&mut self, owner: TypeHandle, signature: SignatureInfo) -> &mut Self {
        if let Some(shape) = self.shape(owner) {
            shape.construct.push(signature);
        }
        self
    }

    pub fn index_signature(&mut self, owner: TypeHandle, signature: SignatureInfo) -> &mut Self {
        if let Some(shape) = self.shape(owner) {
            shape.index.push(signature);
        }
        self
    }

    pub fn extends(&mut self, owner: TypeHandle, base: TypeHandle) -> &mut Self {
        if let Some(shape) = self.shape(owner) {
            shape.extends.push(base);
        }
        self
    }

    pub fn implements(&mut self, owner: TypeHandle, interface: TypeHandle) -> &mut Self {
        if let Some(shape) = self.shape(owner) {
            shape.implements.push(interface);
        }
        self
    }

    pub fn type_parameters(&mut self, owner: TypeHandle, parameters: &[TypeHandle]) -> &mut Self {
        if let Some(shape) = self.shape(owner) {
            shape.type_parameters.extend_from_slice(parameters);
        }
        self
    }

    pub fn array_like(&mut self, owner: TypeHandle, array_like: bool) -> &mut Self {
        if let Some(shape) = self.shape(owner) {
            shape.array_like = Some(array_like);
        }
        self
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn file(&mut self, file_name: &str) -> Scope {
        self.files.push(SourceFile::new(file_name));
        Scope {
            file: self.files.len() - 1,
            path: Vec::new(),
        }
    }

    /// Open `namespace name { }` inside `parent`.
    pub fn namespace(&mut self, parent: &Scope, name: &str) -> Scope {
        let statements = self.statements_mut(parent);
        statements.push(Statement::Namespace {
            name: name.to_string(),
            statements: Vec::new(),
        });
        let index = statements.len() - 1;
        let mut path = parent.path.clone();
        path.push(index);
        Scope {
            file: parent.file,
            path,
        }
    }

    /// Declare a class, interface or type literal in `scope` under its own name.
    pub fn declare(&mut self, scope: &Scope, ty: TypeHandle) -> DeclId {
        let decl = self.new_decl(ty);
        let statement = match self.types.get(ty.index()) {
            Some(TypeData::Class(data)) => Statement::Class {
                decl,
                name: data.name.clone(),
            },
            Some(TypeData::Interface(data)) => Statement::Interface {
                decl,
                name: data.name.clone(),
            },
            Some(TypeData::TypeLiteral(data)) => Statement::TypeAlias {
                decl,
                name: data.name.clone().unwrap_or_default(),
            },
            _ => Statement::Other,
        };
        self.statements_mut(scope).push(statement);
        decl
    }

    /// `export default class { }`: a class declaration without a name.
    pub fn declare_unnamed_class(&mut self, scope: &Scope, ty: TypeHandle) -> DeclId {
        let decl = self.new_decl(ty);
        self.statements_mut(scope)
            .push(Statement::Class { decl, name: None });
        decl
    }

    pub fn declare_alias(&mut self, scope: &Scope, name: &str, ty: TypeHandle) -> DeclId {
        let decl = self.new_decl(ty);
        self.statements_mut(scope).push(Statement::TypeAlias {
            decl,
            name: name.to_string(),
        });
        decl
    }

    /// A statement reflection ignores (variable, function body, import...).
    pub fn other(&mut self, scope: &Scope) {
        self.statements_mut(scope).push(Statement::Other);
    }

    fn new_decl(&mut self, ty: TypeHandle) -> DeclId {
        self.declarations.push(ty);
        DeclId(self.declarations.len() as u32 - 1)
    }

    fn statements_mut(&mut self, scope: &Scope) -> &mut Vec<Statement> {
        let mut statements = &mut self.files[scope.file].statements;
        for &index in &scope.path {
            statements = match &mut statements[index] {
                Statement::Namespace { statements, .. } => statements,
                _ => unreachable!("scope paths only index namespace statements"),
            };
        }
        statements
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}
