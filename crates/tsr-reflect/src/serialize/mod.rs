//! Type-kind serializers.
//!
//! A [`TypeSerializer`] populates exactly one pre-allocated slot. Children go
//! through the identity registry and come out as [`TypeRef`]s; the ones seen
//! for the first time are handed back to the pass in
//! [`Serialized::discovered`].

mod signature;

use crate::classify::{Classified, Unsupported, classify};
use crate::identity::{IdentityRegistry, ShapeKind};
use crate::node::{ObjectBody, SlotId, TypeNode, TypeNodeKind, TypeRef};
use smallvec::SmallVec;
use tracing::{trace, warn};
use tsr_common::Diagnostic;
use tsr_common::diagnostics::diagnostic_messages;
use tsr_host::{HeritageKind, SignatureKind, TypeHandle, TypeHost};

pub(crate) type Discovered = SmallVec<[(TypeHandle, SlotId); 8]>;

pub(crate) struct Serialized {
    pub node: TypeNode,
    pub discovered: Discovered,
}

pub(crate) struct TypeSerializer<'p, H: TypeHost + ?Sized> {
    host: &'p H,
    registry: &'p mut IdentityRegistry,
    diagnostics: &'p mut Vec<Diagnostic>,
    discovered: Discovered,
    /// Display name of the type being serialized, for diagnostic subjects.
    subject: String,
}

impl<'p, H: TypeHost + ?Sized> TypeSerializer<'p, H> {
    pub(crate) fn new(
        host: &'p H,
        registry: &'p mut IdentityRegistry,
        diagnostics: &'p mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            host,
            registry,
            diagnostics,
            discovered: SmallVec::new(),
            subject: String::new(),
        }
    }

    /// Serialize the type allocated at `slot`. `None` if the slot was never
    /// allocated.
    pub(crate) fn serialize(mut self, slot: SlotId) -> Option<Serialized> {
        let info = self.registry.info(slot)?.clone();
        let handle = info.handle;
        self.subject = info
            .name
            .clone()
            .unwrap_or_else(|| self.host.display_name(handle));
        trace!(slot = slot.0, subject = %self.subject, "serializing");

        let kind = match info.shape {
            ShapeKind::Class => self.class(handle),
            ShapeKind::Interface => TypeNodeKind::Interface {
                body: self.object_body(handle),
                extends: self.heritage(handle, HeritageKind::Extends, "extends"),
            },
            ShapeKind::TypeLiteral => TypeNodeKind::TypeLiteral {
                body: self.object_body(handle),
            },
            ShapeKind::Function => TypeNodeKind::Function {
                signatures: self.signatures(handle, SignatureKind::Call, "signatures"),
            },
            ShapeKind::Array { element } => TypeNodeKind::Array {
                element_type: self.required(element, "elementType"),
            },
            ShapeKind::Reference {
                target,
                type_arguments,
            } => TypeNodeKind::Reference {
                target: self.required(target, "type"),
                type_arguments: self.references(&type_arguments, "typeArguments"),
            },
            ShapeKind::Union(types) => TypeNodeKind::Union {
                types: self.references(&types, "types"),
            },
            ShapeKind::Intersection(types) => TypeNodeKind::Intersection {
                types: self.references(&types, "types"),
            },
            ShapeKind::Tuple(elements) => TypeNodeKind::Tuple {
                elements: self.references(&elements, "elements"),
            },
            ShapeKind::TypeParameter { constraint } => TypeNodeKind::TypeParameter {
                constraint: constraint.and_then(|c| self.reference(c, "constraint")),
            },
            ShapeKind::Expression { class } => TypeNodeKind::Expression {
                target: self.required(class, "type"),
            },
        };

        Some(Serialized {
            node: TypeNode {
                slot,
                name: info.name,
                kind,
            },
            discovered: self.discovered,
        })
    }

    fn class(&mut self, handle: TypeHandle) -> TypeNodeKind {
        let body = self.object_body(handle);
        let statics = self.host.statics_of(handle);
        let statics = self.members(statics);
        // A class extends at most one base.
        let extends = self
            .host
            .heritage_of(handle, HeritageKind::Extends)
            .first()
            .and_then(|&base| self.reference(base, "extends"));
        let implements = self.heritage(handle, HeritageKind::Implements, "implements");
        TypeNodeKind::Class {
            body,
            statics,
            extends,
            implements,
        }
    }

    fn object_body(&mut self, handle: TypeHandle) -> ObjectBody {
        let type_parameters = self.host.type_parameters_of(handle);
        let members = self.host.members_of(handle);
        ObjectBody {
            type_parameters: self.references(&type_parameters, "typeParameters"),
            members: self.members(members),
            construct: self.signatures(handle, SignatureKind::Construct, "construct"),
            call: self.signatures(handle, SignatureKind::Call, "call"),
            index: self.signatures(handle, SignatureKind::Index, "index"),
        }
    }

    fn heritage(&mut self, handle: TypeHandle, kind: HeritageKind, position: &str) -> Vec<TypeRef> {
        let targets = self.host.heritage_of(handle, kind);
        self.references(&targets, position)
    }

    /// Reference a child type, allocating its slot on first sight.
    ///
    /// Unsupported children produce a warning and `None`; the caller drops
    /// the position.
    pub(crate) fn reference(&mut self, ty: TypeHandle, position: &str) -> Option<TypeRef> {
        match classify(self.host, ty) {
            Classified::Intrinsic(kind) => Some(TypeRef::Intrinsic(kind)),
            Classified::Shape {
                handle,
                name,
                shape,
            } => {
                let allocation = self.registry.identity_of(handle, || (name, shape));
                if allocation.fresh {
                    self.discovered.push((handle, allocation.slot));
                }
                Some(TypeRef::Slot(allocation.slot))
            }
            Classified::Unsupported(reason) => {
                self.report(ty, &reason, position);
                None
            }
        }
    }

    /// Like [`Self::reference`] for positions that cannot be left empty;
    /// unsupported children degrade to `any`.
    pub(crate) fn required(&mut self, ty: TypeHandle, position: &str) -> TypeRef {
        self.reference(ty, position).unwrap_or(TypeRef::ANY)
    }

    pub(crate) fn references(&mut self, types: &[TypeHandle], position: &str) -> Vec<TypeRef> {
        types
            .iter()
            .filter_map(|&ty| self.reference(ty, position))
            .collect()
    }

    fn report(&mut self, ty: TypeHandle, reason: &Unsupported, position: &str) {
        let subject = format!("{}.{}", self.subject, position);
        let diagnostic = match reason {
            Unsupported::Literal(value) => Diagnostic::from_message(
                &diagnostic_messages::LITERAL_TYPE_NOT_SUPPORTED,
                &subject,
                &[&value.to_string(), &subject],
            ),
            Unsupported::ObjectLiteral => Diagnostic::from_message(
                &diagnostic_messages::OBJECT_LITERAL_TYPE_NOT_SUPPORTED,
                &subject,
                &[&subject],
            ),
            Unsupported::AnonymousClassExpression => Diagnostic::from_message(
                &diagnostic_messages::ANONYMOUS_CLASS_EXPRESSION_NOT_SUPPORTED,
                &subject,
                &[&subject],
            ),
            Unsupported::Unknown(description) => Diagnostic::from_message(
                &diagnostic_messages::UNKNOWN_TYPE_KIND,
                &subject,
                &[description, &subject],
            ),
        };
        warn!(
            code = diagnostic.code,
            handle = ty.0,
            subject = %subject,
            "{}",
            diagnostic.message_text
        );
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
#[path = "../../tests/serialize_tests.rs"]
mod serialize_tests;
