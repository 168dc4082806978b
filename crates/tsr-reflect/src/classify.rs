//! Maps host type kinds onto what reflection can emit.

use crate::identity::ShapeKind;
use tsr_host::{IntrinsicKind, LiteralValue, TypeHandle, TypeHost, TypeKind};

/// Placeholder names for anonymous named-kind types.
pub const ANONYMOUS_CLASS: &str = "__class";
pub const ANONYMOUS_INTERFACE: &str = "__interface";
pub const ANONYMOUS_FUNCTION: &str = "__function";
pub const ANONYMOUS_TYPE: &str = "__type";

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Classified {
    Intrinsic(IntrinsicKind),
    Shape {
        /// Canonical handle identity is decided on.
        handle: TypeHandle,
        name: Option<String>,
        shape: ShapeKind,
    },
    Unsupported(Unsupported),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Unsupported {
    Literal(LiteralValue),
    ObjectLiteral,
    AnonymousClassExpression,
    Unknown(String),
}

impl Unsupported {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Literal(value) => format!("literal type '{value}'"),
            Self::ObjectLiteral => "an object literal type".to_string(),
            Self::AnonymousClassExpression => "an anonymous class expression".to_string(),
            Self::Unknown(description) => format!("unknown type kind '{description}'"),
        }
    }
}

pub(crate) fn classify<H: TypeHost + ?Sized>(host: &H, ty: TypeHandle) -> Classified {
    let handle = host.canonical(ty);
    let (name, shape) = match host.kind_of(handle) {
        TypeKind::Intrinsic(kind) => return Classified::Intrinsic(kind),
        TypeKind::Literal(value) => return Classified::Unsupported(Unsupported::Literal(value)),
        TypeKind::ObjectLiteral => return Classified::Unsupported(Unsupported::ObjectLiteral),
        TypeKind::Unknown { description } => {
            return Classified::Unsupported(Unsupported::Unknown(description));
        }
        TypeKind::ClassExpression { name: None, .. } => {
            return Classified::Unsupported(Unsupported::AnonymousClassExpression);
        }
        TypeKind::ClassExpression {
            name: Some(name),
            instance,
        } => (Some(name), ShapeKind::Expression { class: instance }),
        TypeKind::Class { name } => (
            Some(name.unwrap_or_else(|| ANONYMOUS_CLASS.to_string())),
            ShapeKind::Class,
        ),
        TypeKind::Interface { name } => (
            Some(name.unwrap_or_else(|| ANONYMOUS_INTERFACE.to_string())),
            ShapeKind::Interface,
        ),
        TypeKind::Function { name } => (
            Some(name.unwrap_or_else(|| ANONYMOUS_FUNCTION.to_string())),
            ShapeKind::Function,
        ),
        TypeKind::TypeLiteral { name } => (
            Some(name.unwrap_or_else(|| ANONYMOUS_TYPE.to_string())),
            ShapeKind::TypeLiteral,
        ),
        TypeKind::TypeParameter { name, constraint } => {
            (Some(name), ShapeKind::TypeParameter { constraint })
        }
        TypeKind::Reference {
            target,
            type_arguments,
        } => match type_arguments.as_slice() {
            [element] if host.is_array_like(target) => {
                (None, ShapeKind::Array { element: *element })
            }
            _ => (
                None,
                ShapeKind::Reference {
                    target,
                    type_arguments,
                },
            ),
        },
        TypeKind::Union(types) => (None, ShapeKind::Union(types)),
        TypeKind::Intersection(types) => (None, ShapeKind::Intersection(types)),
        TypeKind::Tuple(elements) => (None, ShapeKind::Tuple(elements)),
    };
    Classified::Shape {
        handle,
        name,
        shape,
    }
}
