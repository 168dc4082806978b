use crate::types::{
    DeclId, HeritageKind, MemberInfo, SignatureInfo, SignatureKind, TypeHandle, TypeKind,
};

/// Capabilities the reflection pass needs from a type checker.
///
/// Every query is answered for an already-checked program; the pass never
/// mutates the host. Lists come back in declaration order and the pass keeps
/// that order in its output.
pub trait TypeHost {
    /// Declared type of a class, interface or alias declaration.
    fn resolve_type(&self, decl: DeclId) -> TypeHandle;

    fn kind_of(&self, ty: TypeHandle) -> TypeKind;

    /// Instance-side members of an object type.
    fn members_of(&self, ty: TypeHandle) -> Vec<MemberInfo>;

    /// Static members of a class. Empty for every other kind.
    fn statics_of(&self, _ty: TypeHandle) -> Vec<MemberInfo> {
        Vec::new()
    }

    fn signatures_of(&self, ty: TypeHandle, kind: SignatureKind) -> Vec<SignatureInfo>;

    /// Heritage clause targets, merged across every declaration of the type.
    fn heritage_of(&self, ty: TypeHandle, kind: HeritageKind) -> Vec<TypeHandle>;

    /// Declared type parameters of a class, interface or alias.
    fn type_parameters_of(&self, ty: TypeHandle) -> Vec<TypeHandle>;

    /// Representative handle for `ty`.
    ///
    /// Hosts that hand out several handles for one semantic type (for
    /// example two structurally equal instantiations) must map them to the
    /// same representative here, or the type is emitted twice.
    fn canonical(&self, ty: TypeHandle) -> TypeHandle {
        ty
    }

    /// Whether references to `target` are arrays.
    ///
    /// The default recognises the standard library's `Array<T>` and
    /// `ReadonlyArray<T>` by shape.
    fn is_array_like(&self, target: TypeHandle) -> bool {
        is_standard_array(self, target)
    }

    /// Human readable name for diagnostics.
    fn display_name(&self, ty: TypeHandle) -> String {
        match self.kind_of(ty) {
            TypeKind::Intrinsic(kind) => kind.name().to_string(),
            TypeKind::Literal(value) => value.to_string(),
            TypeKind::Class { name }
            | TypeKind::Interface { name }
            | TypeKind::Function { name }
            | TypeKind::TypeLiteral { name }
            | TypeKind::ClassExpression { name, .. } => {
                name.unwrap_or_else(|| format!("<anonymous #{}>", ty.0))
            }
            TypeKind::TypeParameter { name, .. } => name,
            TypeKind::Reference { target, .. } => self.display_name(target),
            TypeKind::Union(_) => "union".to_string(),
            TypeKind::Intersection(_) => "intersection".to_string(),
            TypeKind::Tuple(_) => "tuple".to_string(),
            TypeKind::ObjectLiteral => "{...}".to_string(),
            TypeKind::Unknown { description } => description,
        }
    }
}

/// `Array<T>` or `ReadonlyArray<T>`: a one-parameter generic with a standard name.
pub fn is_standard_array<H: TypeHost + ?Sized>(host: &H, target: TypeHandle) -> bool {
    let name = match host.kind_of(target) {
        TypeKind::Interface { name } | TypeKind::Class { name } => name,
        _ => return false,
    };
    matches!(name.as_deref(), Some("Array" | "ReadonlyArray"))
        && host.type_parameters_of(target).len() == 1
}
