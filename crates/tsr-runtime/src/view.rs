//! Borrowed views over loaded type records.

use crate::library::Library;
use crate::reflection::ConstructorId;
use std::ops::Deref;
use tsr_host::IntrinsicKind;
use tsr_reflect::{Member, Signature, SlotId, TypeNode, TypeNodeKind, TypeRef};

/// Shared singleton for a primitive kind.
#[derive(Debug, PartialEq, Eq)]
pub struct IntrinsicType {
    kind: IntrinsicKind,
}

impl IntrinsicType {
    pub const fn kind(&self) -> IntrinsicKind {
        self.kind
    }

    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }
}

static INTRINSICS: [IntrinsicType; 10] = [
    IntrinsicType { kind: IntrinsicKind::Any },
    IntrinsicType { kind: IntrinsicKind::String },
    IntrinsicType { kind: IntrinsicKind::Number },
    IntrinsicType { kind: IntrinsicKind::Boolean },
    IntrinsicType { kind: IntrinsicKind::Symbol },
    IntrinsicType { kind: IntrinsicKind::Void },
    IntrinsicType { kind: IntrinsicKind::Undefined },
    IntrinsicType { kind: IntrinsicKind::Null },
    IntrinsicType { kind: IntrinsicKind::Never },
    IntrinsicType { kind: IntrinsicKind::This },
];

/// The process-wide singleton for `kind`.
pub fn intrinsic(kind: IntrinsicKind) -> &'static IntrinsicType {
    &INTRINSICS[kind as usize]
}

/// Target of a [`TypeRef`].
#[derive(Copy, Clone, Debug)]
pub enum ResolvedType<'r> {
    Intrinsic(&'static IntrinsicType),
    Type(TypeView<'r>),
}

impl<'r> ResolvedType<'r> {
    pub fn name(&self) -> Option<&'r str> {
        match self {
            Self::Intrinsic(intrinsic) => Some(intrinsic.name()),
            Self::Type(view) => view.name(),
        }
    }

    pub const fn as_type(&self) -> Option<TypeView<'r>> {
        match self {
            Self::Type(view) => Some(*view),
            Self::Intrinsic(_) => None,
        }
    }

    pub fn slot(&self) -> Option<SlotId> {
        self.as_type().map(|view| view.slot())
    }
}

#[derive(Copy, Clone)]
pub struct TypeView<'r> {
    library: &'r Library,
    node: &'r TypeNode,
}

impl std::fmt::Debug for TypeView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeView")
            .field("library", &self.library.name())
            .field("node", self.node)
            .finish()
    }
}

impl<'r> TypeView<'r> {
    pub(crate) const fn new(library: &'r Library, node: &'r TypeNode) -> Self {
        Self { library, node }
    }

    pub const fn node(&self) -> &'r TypeNode {
        self.node
    }

    pub const fn slot(&self) -> SlotId {
        self.node.slot
    }

    pub fn name(&self) -> Option<&'r str> {
        self.node.name.as_deref()
    }

    pub const fn kind(&self) -> &'r TypeNodeKind {
        &self.node.kind
    }

    pub fn resolve(&self, r: TypeRef) -> ResolvedType<'r> {
        match r {
            TypeRef::Intrinsic(kind) => ResolvedType::Intrinsic(intrinsic(kind)),
            TypeRef::Slot(slot) => {
                ResolvedType::Type(TypeView::new(self.library, self.library.node(slot)))
            }
        }
    }

    pub fn members(&self) -> impl Iterator<Item = MemberView<'r>> + 'r {
        let owner = *self;
        self.node
            .kind
            .body()
            .map(|body| body.members.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |member| MemberView { owner, member })
    }

    pub fn member(&self, name: &str) -> Option<MemberView<'r>> {
        self.members().find(|member| member.name() == name)
    }

    pub fn construct_signatures(&self) -> &'r [Signature] {
        self.node
            .kind
            .body()
            .map(|body| body.construct.as_slice())
            .unwrap_or_default()
    }

    pub fn call_signatures(&self) -> &'r [Signature] {
        match &self.node.kind {
            TypeNodeKind::Function { signatures } => signatures.as_slice(),
            kind => kind
                .body()
                .map(|body| body.call.as_slice())
                .unwrap_or_default(),
        }
    }

    pub fn index_signatures(&self) -> &'r [Signature] {
        self.node
            .kind
            .body()
            .map(|body| body.index.as_slice())
            .unwrap_or_default()
    }

    pub fn type_parameters(&self) -> Vec<ResolvedType<'r>> {
        self.node
            .kind
            .body()
            .map(|body| body.type_parameters.iter().map(|&r| self.resolve(r)).collect())
            .unwrap_or_default()
    }

    pub fn as_class(&self) -> Option<ClassView<'r>> {
        matches!(self.node.kind, TypeNodeKind::Class { .. }).then(|| ClassView::new(*self))
    }

    pub fn as_interface(&self) -> Option<InterfaceView<'r>> {
        matches!(self.node.kind, TypeNodeKind::Interface { .. }).then(|| InterfaceView::new(*self))
    }
}

#[derive(Copy, Clone, Debug)]
pub struct MemberView<'r> {
    owner: TypeView<'r>,
    member: &'r Member,
}

impl<'r> MemberView<'r> {
    pub fn name(&self) -> &'r str {
        &self.member.name
    }

    pub const fn optional(&self) -> bool {
        self.member.optional
    }

    pub fn ty(&self) -> ResolvedType<'r> {
        self.owner.resolve(self.member.ty)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct ClassView<'r> {
    view: TypeView<'r>,
}

impl<'r> ClassView<'r> {
    pub(crate) const fn new(view: TypeView<'r>) -> Self {
        Self { view }
    }

    pub fn extends(&self) -> Option<ResolvedType<'r>> {
        match self.view.kind() {
            TypeNodeKind::Class { extends, .. } => extends.map(|r| self.view.resolve(r)),
            _ => None,
        }
    }

    pub fn implements(&self) -> Vec<ResolvedType<'r>> {
        match self.view.kind() {
            TypeNodeKind::Class { implements, .. } => {
                implements.iter().map(|&r| self.view.resolve(r)).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn statics(&self) -> impl Iterator<Item = MemberView<'r>> + 'r {
        let owner = self.view;
        let statics: &'r [Member] = match owner.kind() {
            TypeNodeKind::Class { statics, .. } => statics.as_slice(),
            _ => &[],
        };
        statics.iter().map(move |member| MemberView { owner, member })
    }

    /// Rust type bound with [`crate::Reflection::register_class`].
    pub fn constructor(&self) -> Option<ConstructorId> {
        self.view.library.constructor_of(self.view.slot())
    }
}

impl<'r> Deref for ClassView<'r> {
    type Target = TypeView<'r>;

    fn deref(&self) -> &Self::Target {
        &self.view
    }
}

#[derive(Copy, Clone, Debug)]
pub struct InterfaceView<'r> {
    view: TypeView<'r>,
}

impl<'r> InterfaceView<'r> {
    pub(crate) const fn new(view: TypeView<'r>) -> Self {
        Self { view }
    }

    pub fn extends(&self) -> Vec<ResolvedType<'r>> {
        match self.view.kind() {
            TypeNodeKind::Interface { extends, .. } => {
                extends.iter().map(|&r| self.view.resolve(r)).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl<'r> Deref for InterfaceView<'r> {
    type Target = TypeView<'r>;

    fn deref(&self) -> &Self::Target {
        &self.view
    }
}
