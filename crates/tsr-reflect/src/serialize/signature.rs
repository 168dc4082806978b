//! Members and signatures, shared by every object-like kind.

use super::TypeSerializer;
use crate::node::{Member, Parameter, Signature, TypeRef};
use tsr_host::{MemberInfo, SignatureInfo, SignatureKind, TypeHandle, TypeHost};

impl<H: TypeHost + ?Sized> TypeSerializer<'_, H> {
    /// Members in declaration order. Methods reference a `Function` slot;
    /// members whose type cannot be reflected are dropped.
    pub(super) fn members(&mut self, members: Vec<MemberInfo>) -> Vec<Member> {
        members
            .into_iter()
            .filter(|member| member.kind.is_reflected())
            .filter_map(|member| {
                let ty = self.reference(member.value_type, &member.name)?;
                Some(Member {
                    name: member.name,
                    ty,
                    optional: member.optional,
                })
            })
            .collect()
    }

    pub(super) fn signatures(
        &mut self,
        handle: TypeHandle,
        kind: SignatureKind,
        position: &str,
    ) -> Vec<Signature> {
        self.host
            .signatures_of(handle, kind)
            .iter()
            .map(|signature| self.signature(signature, position))
            .collect()
    }

    fn signature(&mut self, signature: &SignatureInfo, position: &str) -> Signature {
        let rest = signature.has_rest();
        let parameters: Vec<Parameter> = signature
            .parameters
            .iter()
            .map(|parameter| Parameter {
                name: parameter.name.clone(),
                ty: self.required(parameter.ty, &format!("{position}({})", parameter.name)),
            })
            .collect();
        let length = parameters.len() - usize::from(rest);
        let returns = self.required(signature.returns, &format!("{position}:returns"));
        let type_parameters: Vec<TypeRef> =
            self.references(&signature.type_parameters, "typeParameters");
        Signature {
            length: length as u32,
            parameters,
            rest,
            returns,
            type_parameters,
        }
    }
}
