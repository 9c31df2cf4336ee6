//! The binding pass: turns one raw [`Spec`] into one [`BoundSpec`].
//!
//! A single synchronous pass with no shared state across invocations.
//! Registration happens first so that every name is known, then bodies are
//! bound against the registry, then the class hierarchy is checked and
//! linearized, and finally the variant ("mixed") info is projected.

use std::collections::HashMap;

use crate::class::{Class, Method, MethodKind};
use crate::components::{BoundTypeTable, ComponentTable, Ref, TypeTable};
use crate::enumeration::{Enum, Enumerator, Opaque};
use crate::error::{BindError, Result};
use crate::record::{Field, Struct};
use crate::registry::TypeRegistry;
use crate::resolver::{resolve, resolve_func};
use crate::spec::{ConstructorSpec, MethodSpec, PropertySpec, Spec, TypeSpec};
use crate::types::{Func, Template, Type, OPTIONAL_TEMPLATE, SHARED_PTR_TEMPLATE};

/// The fully resolved, cross-referenced output of one binder invocation.
/// Immutable once returned; `Ref`s resolve against `components`.
#[derive(Debug)]
pub struct BoundSpec {
    /// Base classes are guaranteed to be at an earlier index than their
    /// subclasses, to simplify consumption by the emission stage.
    pub classes: Vec<Ref<Class>>,
    pub records: Vec<Ref<Struct>>,
    pub enums: Vec<Ref<Enum>>,
    pub opaque_types: Vec<Ref<Opaque>>,
    pub mixed_info: MixedInfo,
    /// Snapshot of the registry. All aliases are fully resolved; no trace
    /// of them is left beyond their entry here.
    pub types: HashMap<String, Type>,
    /// The arena every component reference of this model points into.
    pub components: BoundTypeTable,
}

/// Accessor table and constructor-eligible types of the dynamic "any
/// value" wrapper.
#[derive(Debug)]
pub struct MixedInfo {
    pub getters: Vec<MixedGetter>,
    /// Discriminant tags with no generated accessor, passed through
    /// unmodified for the emission stage to special-case.
    pub unused_data_types: Vec<String>,
    /// Explicit extra constructible types followed by every getter's value
    /// type.
    pub ctors: Vec<Type>,
}

#[derive(Debug)]
pub struct MixedGetter {
    pub data_type: String,
    pub getter: String,
    pub ty: Type,
}

/// Binds `spec` into a [`BoundSpec`], failing fast on the first violated
/// invariant.
pub fn bind_model(spec: &Spec) -> Result<BoundSpec> {
    Binder::new(spec).run()
}

struct Binder<'a> {
    spec: &'a Spec,
    registry: TypeRegistry,
    components: TypeTable,
    root_classes: Vec<Ref<Class>>,
    records: Vec<Ref<Struct>>,
    enums: Vec<Ref<Enum>>,
    opaque_types: Vec<Ref<Opaque>>,
}

impl<'a> Binder<'a> {
    fn new(spec: &'a Spec) -> Self {
        let templates = spec
            .templates
            .iter()
            .map(|template| (template.name.clone(), template.arity));
        Self {
            spec,
            registry: TypeRegistry::new(templates),
            components: TypeTable::new(),
            root_classes: Vec::new(),
            records: Vec::new(),
            enums: Vec::new(),
            opaque_types: Vec::new(),
        }
    }

    fn run(mut self) -> Result<BoundSpec> {
        self.register_primitives()?;
        self.register_classes()?;
        self.register_enums()?;
        self.register_records()?;
        self.register_opaque_types()?;
        self.register_aliases()?;

        self.bind_record_fields()?;
        self.bind_class_bodies()?;

        self.check_hierarchy()?;
        let classes = self.linearize();
        let mixed_info = self.project_mixed_info()?;

        Ok(BoundSpec {
            classes,
            records: self.records,
            enums: self.enums,
            opaque_types: self.opaque_types,
            mixed_info,
            types: self.registry.into_types(),
            components: self.components.freeze(),
        })
    }

    fn resolve(&self, spec: &TypeSpec) -> Result<Type> {
        resolve(&self.registry, spec)
    }

    fn register_primitives(&mut self) -> Result<()> {
        for name in &self.spec.primitives {
            self.registry
                .register(name, Type::Primitive(name.clone()))?;
        }
        Ok(())
    }

    fn register_classes(&mut self) -> Result<()> {
        let spec = self.spec;
        for class in &spec.classes {
            self.register_class(&class.name, class.shared_ptr_wrapped.as_deref(), false)?;
        }
        for interface in &spec.interfaces {
            self.register_class(
                &interface.name,
                interface.shared_ptr_wrapped.as_deref(),
                true,
            )?;
        }
        Ok(())
    }

    fn register_class(
        &mut self,
        name: &str,
        shared_alias: Option<&str>,
        is_interface: bool,
    ) -> Result<()> {
        check_type_name(name)?;
        let mut class = Class::new(name, is_interface);
        if shared_alias.is_some() {
            class.shared_ptr_wrapped = true;
        }
        let ref_ = self.components.create(class);
        self.registry.register(name, Type::Class(ref_))?;
        if let Some(alias) = shared_alias {
            self.registry
                .register_shared_alias(alias, Type::Class(ref_))?;
        }
        Ok(())
    }

    fn register_enums(&mut self) -> Result<()> {
        let spec = self.spec;
        for enum_ in &spec.enums {
            check_type_name(&enum_.name)?;
            let ref_ = self.components.create(Enum {
                name: enum_.name.clone(),
                target_name: enum_
                    .target_name
                    .clone()
                    .unwrap_or_else(|| enum_.name.clone()),
                enumerators: enum_
                    .values
                    .iter()
                    .map(|value| Enumerator {
                        name: value.name.clone(),
                        value: value.value,
                    })
                    .collect(),
            });
            self.registry.register(&enum_.name, Type::Enum(ref_))?;
            self.enums.push(ref_);
        }
        Ok(())
    }

    fn register_records(&mut self) -> Result<()> {
        let spec = self.spec;
        for record in &spec.records {
            check_type_name(&record.name)?;
            // Fields are bound later, once every name is registered.
            let ref_ = self.components.create(Struct {
                name: record.name.clone(),
                target_name: String::new(),
                fields: Vec::new(),
            });
            self.registry.register(&record.name, Type::Struct(ref_))?;
            self.records.push(ref_);
        }
        Ok(())
    }

    fn register_opaque_types(&mut self) -> Result<()> {
        let spec = self.spec;
        for name in &spec.opaque_types {
            check_type_name(name)?;
            let ref_ = self.components.create(Opaque { name: name.clone() });
            self.registry.register(name, Type::Opaque(ref_))?;
            self.opaque_types.push(ref_);
        }
        Ok(())
    }

    fn register_aliases(&mut self) -> Result<()> {
        let spec = self.spec;
        for alias in &spec.type_aliases {
            let resolved = self.resolve(&alias.ty)?;
            self.registry.register(&alias.name, resolved)?;
        }
        Ok(())
    }

    fn bind_record_fields(&mut self) -> Result<()> {
        let spec = self.spec;
        let record_refs = self.records.clone();
        for (record, &ref_) in spec.records.iter().zip(&record_refs) {
            let fields = record
                .fields
                .iter()
                .map(|field| {
                    let ty = self.resolve(&field.ty)?;
                    // Optional fields are never required.
                    let required = field.default.is_none()
                        && !matches!(&ty, Type::Template(t) if t.name == OPTIONAL_TEMPLATE);
                    Ok(Field {
                        name: field.name.clone(),
                        ty,
                        required,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let struct_ = self.components.get_mut(ref_);
            struct_.target_name = record
                .target_name
                .clone()
                .unwrap_or_else(|| record.name.clone());
            struct_.fields = fields;
        }
        Ok(())
    }

    fn bind_class_bodies(&mut self) -> Result<()> {
        let spec = self.spec;
        for class in &spec.classes {
            let ref_ = self.class_ref(&class.name);
            self.components.get_mut(ref_).target_name = class
                .target_name
                .clone()
                .unwrap_or_else(|| class.name.clone());

            self.bind_method_group(ref_, &class.methods, MethodKind::Instance)?;
            self.bind_method_group(ref_, &class.static_methods, MethodKind::Static)?;
            self.link_base(ref_, &class.name, class.base.as_deref())?;

            let iterable = class
                .iterable
                .as_ref()
                .map(|ty| self.resolve(ty))
                .transpose()?;
            let bound = self.components.get_mut(ref_);
            bound.needs_deref = class.needs_deref;
            bound.is_abstract = class.is_abstract;
            bound.iterable = iterable;

            self.bind_constructors(ref_, &class.constructors)?;
            self.bind_properties(ref_, &class.properties)?;
        }

        for interface in &spec.interfaces {
            let ref_ = self.class_ref(&interface.name);
            self.components.get_mut(ref_).target_name = interface
                .target_name
                .clone()
                .unwrap_or_else(|| interface.name.clone());

            self.bind_method_group(ref_, &interface.methods, MethodKind::Instance)?;
            self.bind_method_group(ref_, &interface.static_methods, MethodKind::Static)?;
            self.link_base(ref_, &interface.name, interface.base.as_deref())?;
        }
        Ok(())
    }

    /// Looks up a class registered by [`register_classes`](Self::register_classes).
    fn class_ref(&self, name: &str) -> Ref<Class> {
        match self.registry.lookup(name) {
            Some(Type::Class(ref_)) => *ref_,
            _ => unreachable!("class {name} was registered before bodies are bound"),
        }
    }

    fn bind_method_group(
        &mut self,
        on: Ref<Class>,
        methods: &[MethodSpec],
        kind: MethodKind,
    ) -> Result<()> {
        for method in methods {
            for overload in &method.overloads {
                let sig = resolve_func(&self.registry, &overload.sig)?;
                let unique_name = match &overload.suffix {
                    Some(suffix) => format!("{}_{}", method.name, suffix),
                    None => method.name.clone(),
                };
                let target_name = overload
                    .target_name
                    .clone()
                    .unwrap_or_else(|| method.name.clone());
                self.components.get_mut(on).methods.push(Method {
                    on,
                    name: method.name.clone(),
                    unique_name,
                    target_name,
                    sig,
                    kind,
                });
            }
        }
        Ok(())
    }

    fn link_base(&mut self, ref_: Ref<Class>, name: &str, base: Option<&str>) -> Result<()> {
        let Some(base_name) = base else {
            self.root_classes.push(ref_);
            return Ok(());
        };

        let base_ref = match self.registry.lookup(base_name) {
            Some(Type::Class(base_ref)) => *base_ref,
            Some(other) => {
                return Err(BindError::InvalidBase {
                    class: name.to_owned(),
                    base: base_name.to_owned(),
                    reason: format!("expected a class, found a {}", other.kind_name()),
                })
            }
            None => {
                return Err(BindError::InvalidBase {
                    class: name.to_owned(),
                    base: base_name.to_owned(),
                    reason: "no such type".to_owned(),
                })
            }
        };

        self.components.get_mut(ref_).base = Some(base_ref);
        self.components.get_mut(base_ref).subclasses.push(ref_);
        Ok(())
    }

    fn bind_constructors(&mut self, on: Ref<Class>, ctors: &[ConstructorSpec]) -> Result<()> {
        for ctor in ctors {
            let mut sig = resolve_func(&self.registry, &ctor.sig)?;
            if !matches!(&sig.ret, Type::Primitive(name) if name == "void") {
                return Err(BindError::MalformedConstructorSignature {
                    class: self.components.get(on).name.clone(),
                    name: ctor.name.clone(),
                });
            }

            // Constructors implicitly return the type of the class.
            sig.ret = if self.components.get(on).shared_ptr_wrapped {
                Type::Template(Template {
                    name: SHARED_PTR_TEMPLATE.to_owned(),
                    args: vec![Type::Class(on)],
                })
            } else {
                Type::Class(on)
            };

            self.components.get_mut(on).methods.push(Method {
                on,
                name: String::new(),
                unique_name: ctor.name.clone(),
                target_name: String::new(),
                sig,
                kind: MethodKind::Constructor,
            });
        }
        Ok(())
    }

    fn bind_properties(&mut self, on: Ref<Class>, properties: &[PropertySpec]) -> Result<()> {
        for property in properties {
            let ty = self.resolve(&property.ty)?;
            let sig = Func {
                ret: ty,
                args: Vec::new(),
                is_const: true,
                noexcept: false,
            };
            self.components.get_mut(on).methods.push(Method {
                on,
                name: property.name.clone(),
                unique_name: property.name.clone(),
                target_name: property.name.clone(),
                sig,
                kind: MethodKind::Property,
            });
        }
        Ok(())
    }

    /// Rejects hierarchies in which a class is its own ancestor.
    ///
    /// Walks every class's base chain; the walk is bounded by the class
    /// count so chains that run into a cycle not containing the start
    /// class terminate (the cycle's own members report the error when
    /// their turn comes). This also catches cycles that are unreachable
    /// from any root class and would otherwise silently drop out of the
    /// linearized list.
    fn check_hierarchy(&self) -> Result<()> {
        let limit = self.components.count::<Class>();
        for start in self.components.refs::<Class>() {
            let mut cursor = self.components.get(start).base;
            let mut steps = 0usize;
            while let Some(base) = cursor {
                if base == start {
                    return Err(BindError::CyclicHierarchy(
                        self.components.get(start).name.clone(),
                    ));
                }
                steps += 1;
                if steps > limit {
                    break;
                }
                cursor = self.components.get(base).base;
            }
        }
        Ok(())
    }

    /// Emits every root class followed depth-first by its descendants, in
    /// declaration order, so each base precedes all of its subclasses.
    fn linearize(&self) -> Vec<Ref<Class>> {
        let mut out = Vec::with_capacity(self.components.count::<Class>());
        for &root in &self.root_classes {
            self.push_with_descendants(root, &mut out);
        }
        out
    }

    fn push_with_descendants(&self, ref_: Ref<Class>, out: &mut Vec<Ref<Class>>) {
        out.push(ref_);
        for &subclass in &self.components.get(ref_).subclasses {
            self.push_with_descendants(subclass, out);
        }
    }

    fn project_mixed_info(&self) -> Result<MixedInfo> {
        let mixed = &self.spec.mixed_info;
        let lookup = |name: &str| -> Result<Type> {
            self.registry
                .lookup(name)
                .cloned()
                .ok_or_else(|| BindError::UnknownType(name.to_owned()))
        };

        let getters = mixed
            .data_types
            .iter()
            .map(|data_type| {
                Ok(MixedGetter {
                    data_type: data_type.tag.clone(),
                    getter: data_type.getter.clone(),
                    ty: lookup(&data_type.ty)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut ctors = mixed
            .extra_ctors
            .iter()
            .map(|name| lookup(name))
            .collect::<Result<Vec<_>>>()?;
        ctors.extend(getters.iter().map(|getter| getter.ty.clone()));

        Ok(MixedInfo {
            getters,
            unused_data_types: mixed.unused_data_types.clone(),
            ctors,
        })
    }
}

fn check_type_name(name: &str) -> Result<()> {
    // '_' is the separator of synthetic identifiers like `<class>_<method>`.
    if name.contains('_') {
        Err(BindError::IllegalTypeName(name.to_owned()))
    } else {
        Ok(())
    }
}
