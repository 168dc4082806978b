//! Handles and descriptors exchanged across the host boundary.

use serde::{Deserialize, Serialize};

/// Opaque handle to a checked type owned by the host.
///
/// Two handles may denote the same semantic type; [`crate::TypeHost::canonical`]
/// maps each to a single representative.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeHandle(pub u32);

impl TypeHandle {
    // Intrinsic handles are reserved at the start of every in-memory program.
    pub const ANY: Self = Self(0);
    pub const STRING: Self = Self(1);
    pub const NUMBER: Self = Self(2);
    pub const BOOLEAN: Self = Self(3);
    pub const SYMBOL: Self = Self(4);
    pub const VOID: Self = Self(5);
    pub const UNDEFINED: Self = Self(6);
    pub const NULL: Self = Self(7);
    pub const NEVER: Self = Self(8);
    pub const THIS: Self = Self(9);

    /// First handle available for non-intrinsic types.
    pub const FIRST_USER: u32 = 10;

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a class or interface declaration node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(pub u32);

/// Primitive kinds shared as global singletons by the emitted table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntrinsicKind {
    Any,
    String,
    Number,
    Boolean,
    Symbol,
    Void,
    Undefined,
    Null,
    Never,
    This,
}

impl IntrinsicKind {
    /// Emission order of the intrinsic singletons.
    pub const ALL: [Self; 10] = [
        Self::Any,
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Symbol,
        Self::Void,
        Self::Undefined,
        Self::Null,
        Self::Never,
        Self::This,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Symbol => "symbol",
            Self::Void => "void",
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Never => "never",
            Self::This => "this",
        }
    }

    /// The reserved in-memory handle for this intrinsic.
    pub const fn handle(self) -> TypeHandle {
        TypeHandle(self as u32)
    }
}

impl std::fmt::Display for IntrinsicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of a literal type (`"a"`, `1`, `true`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(value) => write!(f, "\"{value}\""),
            Self::Number(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
        }
    }
}

/// Host classification of a type.
///
/// This is the closed set the reflection pass dispatches on. Hosts map
/// anything they cannot express here to [`TypeKind::Unknown`].
#[derive(Clone, Debug, PartialEq)]
pub enum TypeKind {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    Class {
        name: Option<String>,
    },
    Interface {
        name: Option<String>,
    },
    /// Instantiation of a generic class or interface.
    Reference {
        target: TypeHandle,
        type_arguments: Vec<TypeHandle>,
    },
    Union(Vec<TypeHandle>),
    Intersection(Vec<TypeHandle>),
    Tuple(Vec<TypeHandle>),
    Function {
        name: Option<String>,
    },
    /// Object type written as a type literal, usually behind an alias.
    TypeLiteral {
        name: Option<String>,
    },
    /// Anonymous object type inferred from an object literal expression.
    ObjectLiteral,
    /// Static side of a class produced by a class expression.
    ClassExpression {
        name: Option<String>,
        instance: TypeHandle,
    },
    TypeParameter {
        name: String,
        constraint: Option<TypeHandle>,
    },
    Unknown {
        description: String,
    },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    #[default]
    Property,
    Method,
    GetAccessor,
    SetAccessor,
    Constructor,
    TypeParameter,
}

impl MemberKind {
    /// Whether members of this declaration kind are part of an object's shape.
    pub const fn is_reflected(self) -> bool {
        matches!(
            self,
            Self::Property | Self::Method | Self::GetAccessor | Self::SetAccessor
        )
    }
}

/// One member as the host declares it, in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub name: String,
    #[serde(default)]
    pub kind: MemberKind,
    #[serde(rename = "type")]
    pub value_type: TypeHandle,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl MemberInfo {
    pub fn property(name: impl Into<String>, value_type: TypeHandle) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
            value_type,
            optional: false,
        }
    }

    pub fn method(name: impl Into<String>, function: TypeHandle) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method,
            value_type: function,
            optional: false,
        }
    }

    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    Call,
    Construct,
    Index,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HeritageKind {
    Extends,
    Implements,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeHandle,
    /// `...name` parameter.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub rest: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

/// A signature before reflection: parameters carry their variadic flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    pub returns: TypeHandle,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeHandle>,
}

impl SignatureInfo {
    pub const fn new(returns: TypeHandle) -> Self {
        Self {
            parameters: Vec::new(),
            returns,
            type_parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: TypeHandle) -> Self {
        self.parameters.push(ParameterInfo {
            name: name.into(),
            ty,
            rest: false,
            optional: false,
        });
        self
    }

    #[must_use]
    pub fn optional_param(mut self, name: impl Into<String>, ty: TypeHandle) -> Self {
        self.parameters.push(ParameterInfo {
            name: name.into(),
            ty,
            rest: false,
            optional: true,
        });
        self
    }

    #[must_use]
    pub fn rest_param(mut self, name: impl Into<String>, ty: TypeHandle) -> Self {
        self.parameters.push(ParameterInfo {
            name: name.into(),
            ty,
            rest: true,
            optional: false,
        });
        self
    }

    #[must_use]
    pub fn type_parameter(mut self, ty: TypeHandle) -> Self {
        self.type_parameters.push(ty);
        self
    }

    /// Whether the last parameter is variadic.
    pub fn has_rest(&self) -> bool {
        self.parameters.last().is_some_and(|p| p.rest)
    }
}
