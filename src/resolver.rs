//! Recursive resolution of raw type descriptors against the registry.

use crate::error::{BindError, Result};
use crate::registry::TypeRegistry;
use crate::spec::{FuncSpec, TemplateArity, TypeKind, TypeSpec};
use crate::types::{Arg, Func, Template, Type};

/// Resolves one descriptor into a [`Type`].
///
/// The order of the qualifier checks is significant and determines the
/// nesting of the wrappers: each step strips exactly one matched flag and
/// recurses on a copy with that flag cleared, so a descriptor with
/// reference, pointer and const all set resolves to
/// `Ref(Pointer(Const(leaf)))`.
pub(crate) fn resolve(registry: &TypeRegistry, spec: &TypeSpec) -> Result<Type> {
    if let TypeKind::Function(sig) = &spec.kind {
        return Ok(Type::Func(Box::new(resolve_func(registry, sig)?)));
    }

    if spec.is_reference {
        let inner = TypeSpec {
            is_reference: false,
            ..spec.clone()
        };
        return Ok(Type::Ref(Box::new(resolve(registry, &inner)?)));
    }
    if spec.is_rvalue_reference {
        let inner = TypeSpec {
            is_rvalue_reference: false,
            ..spec.clone()
        };
        return Ok(Type::RRef(Box::new(resolve(registry, &inner)?)));
    }
    if spec.is_pointer {
        let inner = TypeSpec {
            is_pointer: false,
            ..spec.clone()
        };
        return Ok(Type::Pointer(Box::new(resolve(registry, &inner)?)));
    }
    if spec.is_const {
        let inner = TypeSpec {
            is_const: false,
            ..spec.clone()
        };
        return Ok(Type::Const(Box::new(resolve(registry, &inner)?)));
    }

    match &spec.kind {
        TypeKind::Name { segments } => {
            let name = unqualify(segments);
            registry
                .lookup(&name)
                .cloned()
                .ok_or(BindError::UnknownType(name))
        }
        TypeKind::Instance {
            segments,
            arguments,
        } => {
            let name = unqualify(segments);
            match registry.template_arity(&name) {
                None => Err(BindError::UnknownTemplate(name)),
                Some(TemplateArity::Fixed(expected)) if expected != arguments.len() => {
                    Err(BindError::TemplateArityMismatch {
                        name,
                        expected,
                        actual: arguments.len(),
                    })
                }
                Some(_) => {
                    let args = arguments
                        .iter()
                        .map(|arg| resolve(registry, arg))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(Type::Template(Template { name, args }))
                }
            }
        }
        TypeKind::Function(_) => unreachable!("function descriptors are resolved above"),
    }
}

/// Resolves a raw function signature into a [`Func`].
pub(crate) fn resolve_func(registry: &TypeRegistry, sig: &FuncSpec) -> Result<Func> {
    Ok(Func {
        ret: resolve(registry, &sig.ret)?,
        args: sig
            .arguments
            .iter()
            .map(|arg| {
                Ok(Arg {
                    name: arg.name.clone(),
                    ty: resolve(registry, &arg.ty)?,
                })
            })
            .collect::<Result<Vec<_>>>()?,
        is_const: sig.is_const,
        noexcept: sig.is_noexcept,
    })
}

fn unqualify(segments: &[String]) -> String {
    segments.join("::")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ArgSpec;
    use pretty_assertions::assert_eq;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new([
            ("vector".to_owned(), TemplateArity::Fixed(1)),
            ("pair".to_owned(), TemplateArity::Fixed(2)),
            ("tuple".to_owned(), TemplateArity::Variadic),
        ]);
        registry
            .register("int32", Type::Primitive("int32".into()))
            .unwrap();
        registry
            .register("void", Type::Primitive("void".into()))
            .unwrap();
        registry
            .register(
                "util::Status",
                Type::Primitive("util::Status".into()),
            )
            .unwrap();
        registry
    }

    fn int32() -> Type {
        Type::Primitive("int32".into())
    }

    #[test]
    fn plain_name_resolves_to_registered_type() {
        let resolved = resolve(&registry(), &TypeSpec::named("int32")).unwrap();
        assert_eq!(resolved, int32());
    }

    #[test]
    fn qualified_name_joins_segments() {
        let spec = TypeSpec {
            kind: TypeKind::Name {
                segments: vec!["util".into(), "Status".into()],
            },
            ..TypeSpec::named("ignored")
        };
        let resolved = resolve(&registry(), &spec).unwrap();
        assert_eq!(resolved, Type::Primitive("util::Status".into()));
    }

    #[test]
    fn unknown_name_is_reported() {
        let err = resolve(&registry(), &TypeSpec::named("missing")).unwrap_err();
        assert!(matches!(err, BindError::UnknownType(name) if name == "missing"));
    }

    #[test]
    fn all_flags_nest_reference_outermost_const_innermost() {
        let spec = TypeSpec {
            is_const: true,
            is_reference: true,
            is_pointer: true,
            ..TypeSpec::named("int32")
        };
        let resolved = resolve(&registry(), &spec).unwrap();
        assert_eq!(
            resolved,
            Type::Ref(Box::new(Type::Pointer(Box::new(Type::Const(Box::new(
                int32()
            ))))))
        );
    }

    #[test]
    fn rvalue_reference_wraps_before_const() {
        let spec = TypeSpec {
            is_const: true,
            is_rvalue_reference: true,
            ..TypeSpec::named("int32")
        };
        let resolved = resolve(&registry(), &spec).unwrap();
        assert_eq!(
            resolved,
            Type::RRef(Box::new(Type::Const(Box::new(int32()))))
        );
    }

    #[test]
    fn template_with_matching_arity_resolves() {
        let spec = TypeSpec::instance("pair", vec![TypeSpec::named("int32"), TypeSpec::named("void")]);
        let resolved = resolve(&registry(), &spec).unwrap();
        assert_eq!(
            resolved,
            Type::Template(Template {
                name: "pair".into(),
                args: vec![int32(), Type::Primitive("void".into())],
            })
        );
    }

    #[test]
    fn template_arity_mismatch_is_reported() {
        let spec = TypeSpec::instance(
            "pair",
            vec![
                TypeSpec::named("int32"),
                TypeSpec::named("int32"),
                TypeSpec::named("int32"),
            ],
        );
        let err = resolve(&registry(), &spec).unwrap_err();
        assert!(matches!(
            err,
            BindError::TemplateArityMismatch {
                name,
                expected: 2,
                actual: 3,
            } if name == "pair"
        ));
    }

    #[test]
    fn variadic_template_accepts_any_count() {
        for count in [0, 3] {
            let spec = TypeSpec::instance("tuple", vec![TypeSpec::named("int32"); count]);
            let resolved = resolve(&registry(), &spec).unwrap();
            assert_eq!(
                resolved,
                Type::Template(Template {
                    name: "tuple".into(),
                    args: vec![int32(); count],
                })
            );
        }
    }

    #[test]
    fn unknown_template_is_reported() {
        let spec = TypeSpec::instance("map", vec![]);
        let err = resolve(&registry(), &spec).unwrap_err();
        assert!(matches!(err, BindError::UnknownTemplate(name) if name == "map"));
    }

    #[test]
    fn function_descriptor_resolves_return_and_arguments() {
        let spec = TypeSpec::function(FuncSpec {
            ret: Box::new(TypeSpec::named("void")),
            arguments: vec![ArgSpec {
                name: "count".into(),
                ty: TypeSpec {
                    is_const: true,
                    is_reference: true,
                    ..TypeSpec::named("int32")
                },
            }],
            is_const: true,
            is_noexcept: true,
        });

        let resolved = resolve(&registry(), &spec).unwrap();
        assert_eq!(
            resolved,
            Type::Func(Box::new(Func {
                ret: Type::Primitive("void".into()),
                args: vec![Arg {
                    name: "count".into(),
                    ty: Type::Ref(Box::new(Type::Const(Box::new(int32())))),
                }],
                is_const: true,
                noexcept: true,
            }))
        );
    }
}
