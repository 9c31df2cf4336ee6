//! The raw, not-yet-resolved specification records handed over by the
//! parsing front end.
//!
//! These are plain data; no name has been checked against anything yet.
//! All name-keyed tables are ordered sequences of named records, since
//! declaration order is significant for the bound output (subclass lists,
//! linearization, enumerator order, ...).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Declared argument count of a generic template.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TemplateArity {
    Fixed(usize),
    /// Accepts any number of arguments, including zero.
    Variadic,
}

/// A raw type descriptor: a flat record that may carry several qualifier
/// flags at once on top of a name, a template instantiation, or a function
/// signature. The resolver decides the nesting order of the qualifiers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeSpec {
    pub is_const: bool,
    pub is_reference: bool,
    pub is_rvalue_reference: bool,
    pub is_pointer: bool,
    pub kind: TypeKind,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeKind {
    /// A possibly namespace-qualified name; segments are joined with `::`.
    Name { segments: Vec<String> },
    /// A template instantiation with ordered type arguments.
    Instance {
        segments: Vec<String>,
        arguments: Vec<TypeSpec>,
    },
    /// A callable signature.
    Function(FuncSpec),
}

/// A raw function signature. Method overloads and constructors carry this
/// directly, so a non-function signature in those positions is impossible
/// by construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FuncSpec {
    pub ret: Box<TypeSpec>,
    pub arguments: Vec<ArgSpec>,
    pub is_const: bool,
    pub is_noexcept: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArgSpec {
    pub name: String,
    pub ty: TypeSpec,
}

impl TypeSpec {
    fn unqualified(kind: TypeKind) -> Self {
        Self {
            is_const: false,
            is_reference: false,
            is_rvalue_reference: false,
            is_pointer: false,
            kind,
        }
    }

    /// An unqualified single-segment name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::unqualified(TypeKind::Name {
            segments: vec![name.into()],
        })
    }

    /// An unqualified template instantiation.
    pub fn instance(name: impl Into<String>, arguments: Vec<TypeSpec>) -> Self {
        Self::unqualified(TypeKind::Instance {
            segments: vec![name.into()],
            arguments,
        })
    }

    /// A function descriptor.
    pub fn function(sig: FuncSpec) -> Self {
        Self::unqualified(TypeKind::Function(sig))
    }
}

impl FuncSpec {
    /// A non-const, throwing signature with no arguments.
    pub fn returning(ret: TypeSpec) -> Self {
        Self {
            ret: Box::new(ret),
            arguments: Vec::new(),
            is_const: false,
            is_noexcept: false,
        }
    }
}

/// The whole input specification, as produced by the parsing collaborator.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spec {
    pub primitives: Vec<String>,
    pub templates: Vec<TemplateSpec>,
    pub classes: Vec<ClassSpec>,
    pub interfaces: Vec<InterfaceSpec>,
    pub records: Vec<RecordSpec>,
    pub enums: Vec<EnumSpec>,
    pub opaque_types: Vec<String>,
    pub type_aliases: Vec<TypeAliasSpec>,
    pub mixed_info: MixedSpec,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TemplateSpec {
    pub name: String,
    pub arity: TemplateArity,
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassSpec {
    pub name: String,
    /// Target-language name; defaults to the spec name.
    pub target_name: Option<String>,
    /// When present, instances are shared-owned and the contained alias
    /// name is registered as `shared_ptr<this class>`.
    pub shared_ptr_wrapped: Option<String>,
    pub base: Option<String>,
    pub is_abstract: bool,
    pub needs_deref: bool,
    /// Element type if the class exposes iteration.
    pub iterable: Option<TypeSpec>,
    pub constructors: Vec<ConstructorSpec>,
    pub methods: Vec<MethodSpec>,
    pub static_methods: Vec<MethodSpec>,
    pub properties: Vec<PropertySpec>,
}

/// An interface is a class that is always shared-owned and always needs
/// dereferencing; it declares no constructors, properties, or iteration.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterfaceSpec {
    pub name: String,
    pub target_name: Option<String>,
    pub shared_ptr_wrapped: Option<String>,
    pub base: Option<String>,
    pub methods: Vec<MethodSpec>,
    pub static_methods: Vec<MethodSpec>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstructorSpec {
    pub name: String,
    /// Declared with a `void` return by convention; the binder rewrites it.
    pub sig: FuncSpec,
}

/// One method name with its ordered overloads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodSpec {
    pub name: String,
    pub overloads: Vec<OverloadSpec>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OverloadSpec {
    /// Disambiguating suffix; the per-class unique name becomes
    /// `<name>_<suffix>` when present.
    pub suffix: Option<String>,
    pub target_name: Option<String>,
    pub sig: FuncSpec,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PropertySpec {
    pub name: String,
    pub ty: TypeSpec,
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordSpec {
    pub name: String,
    pub target_name: Option<String>,
    pub fields: Vec<FieldSpec>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeSpec,
    /// Declared default value, verbatim; fields with one are not required.
    pub default: Option<String>,
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumSpec {
    pub name: String,
    pub target_name: Option<String>,
    pub values: Vec<EnumValueSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumValueSpec {
    pub name: String,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeAliasSpec {
    pub name: String,
    pub ty: TypeSpec,
}

/// Description of the dynamic "any value" wrapper type.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MixedSpec {
    pub data_types: Vec<MixedDataTypeSpec>,
    /// Discriminant tags with no generated accessor, passed through for
    /// the emission stage to special-case.
    pub unused_data_types: Vec<String>,
    /// Additional type names eligible to construct the wrapper, on top of
    /// every data type's value type.
    pub extra_ctors: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MixedDataTypeSpec {
    /// Discriminant tag.
    pub tag: String,
    /// Accessor name.
    pub getter: String,
    /// Name of the value type, resolved via the registry.
    pub ty: String,
}
