//! Serialized type records.
//!
//! A [`TypeNode`] is the populated content of one slot. Child types are never
//! inlined: every edge is a [`TypeRef`], either a slot index or an intrinsic
//! singleton, so cyclic graphs serialize as plain data.

use serde::{Deserialize, Serialize};
use tsr_host::IntrinsicKind;

/// Stable identity of one discovered type within a metadata table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub u32);

impl SlotId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Edge to another type: `{"slot": n}` or `{"intrinsic": "number"}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeRef {
    Intrinsic(IntrinsicKind),
    Slot(SlotId),
}

impl TypeRef {
    pub const ANY: Self = Self::Intrinsic(IntrinsicKind::Any);

    pub const fn slot(self) -> Option<SlotId> {
        match self {
            Self::Slot(slot) => Some(slot),
            Self::Intrinsic(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// Parameters before a trailing rest parameter.
    pub length: u32,
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub rest: bool,
    pub returns: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeRef>,
}

/// Fields shared by classes, interfaces and type literals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectBody {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub construct: Vec<Signature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call: Vec<Signature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index: Vec<Signature>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TypeNodeKind {
    Class {
        #[serde(flatten)]
        body: ObjectBody,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        statics: Vec<Member>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extends: Option<TypeRef>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        implements: Vec<TypeRef>,
    },
    Interface {
        #[serde(flatten)]
        body: ObjectBody,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        extends: Vec<TypeRef>,
    },
    Array {
        element_type: TypeRef,
    },
    Reference {
        #[serde(rename = "type")]
        target: TypeRef,
        type_arguments: Vec<TypeRef>,
    },
    Union {
        types: Vec<TypeRef>,
    },
    Intersection {
        types: Vec<TypeRef>,
    },
    Tuple {
        elements: Vec<TypeRef>,
    },
    Function {
        signatures: Vec<Signature>,
    },
    TypeLiteral {
        #[serde(flatten)]
        body: ObjectBody,
    },
    TypeParameter {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        constraint: Option<TypeRef>,
    },
    /// Class expression wrapper; `type` is the class record.
    Expression {
        #[serde(rename = "type")]
        target: TypeRef,
    },
}

impl TypeNodeKind {
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Class { .. } => "class",
            Self::Interface { .. } => "interface",
            Self::Array { .. } => "array",
            Self::Reference { .. } => "reference",
            Self::Union { .. } => "union",
            Self::Intersection { .. } => "intersection",
            Self::Tuple { .. } => "tuple",
            Self::Function { .. } => "function",
            Self::TypeLiteral { .. } => "typeLiteral",
            Self::TypeParameter { .. } => "typeParameter",
            Self::Expression { .. } => "expression",
        }
    }

    pub const fn body(&self) -> Option<&ObjectBody> {
        match self {
            Self::Class { body, .. } | Self::Interface { body, .. } | Self::TypeLiteral { body } => {
                Some(body)
            }
            _ => None,
        }
    }
}

/// Populated content of one slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNode {
    pub slot: SlotId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: TypeNodeKind,
}

impl TypeNode {
    /// Visit every outgoing edge in field order.
    pub fn for_each_ref(&self, mut f: impl FnMut(TypeRef)) {
        fn body(body: &ObjectBody, f: &mut impl FnMut(TypeRef)) {
            body.type_parameters.iter().copied().for_each(&mut *f);
            members(&body.members, f);
            for sig in body.construct.iter().chain(&body.call).chain(&body.index) {
                signature(sig, f);
            }
        }
        fn members(members: &[Member], f: &mut impl FnMut(TypeRef)) {
            members.iter().for_each(|m| f(m.ty));
        }
        fn signature(sig: &Signature, f: &mut impl FnMut(TypeRef)) {
            sig.parameters.iter().for_each(|p| f(p.ty));
            f(sig.returns);
            sig.type_parameters.iter().copied().for_each(&mut *f);
        }

        let f = &mut f;
        match &self.kind {
            TypeNodeKind::Class {
                body: object,
                statics,
                extends,
                implements,
            } => {
                body(object, f);
                members(statics, f);
                extends.iter().copied().for_each(&mut *f);
                implements.iter().copied().for_each(&mut *f);
            }
            TypeNodeKind::Interface {
                body: object,
                extends,
            } => {
                body(object, f);
                extends.iter().copied().for_each(&mut *f);
            }
            TypeNodeKind::TypeLiteral { body: object } => body(object, f),
            TypeNodeKind::Array { element_type } => f(*element_type),
            TypeNodeKind::Reference {
                target,
                type_arguments,
            } => {
                f(*target);
                type_arguments.iter().copied().for_each(&mut *f);
            }
            TypeNodeKind::Union { types } | TypeNodeKind::Intersection { types } => {
                types.iter().copied().for_each(&mut *f);
            }
            TypeNodeKind::Tuple { elements } => elements.iter().copied().for_each(&mut *f),
            TypeNodeKind::Function { signatures } => {
                signatures.iter().for_each(|sig| signature(sig, f));
            }
            TypeNodeKind::TypeParameter { constraint } => {
                constraint.iter().copied().for_each(&mut *f);
            }
            TypeNodeKind::Expression { target } => f(*target),
        }
    }

    /// Slot edges only.
    pub fn slot_refs(&self) -> Vec<SlotId> {
        let mut slots = Vec::new();
        self.for_each_ref(|r| slots.extend(r.slot()));
        slots
    }
}
