//! The resolved type algebra of the bound model.

use std::fmt::Write;

use crate::class::Class;
use crate::components::{ComponentTable, Ref};
use crate::enumeration::{Enum, Opaque};
use crate::record::Struct;

/// Template wrapping instances of shared-owned classes.
pub const SHARED_PTR_TEMPLATE: &str = "std::shared_ptr";

/// Template whose instantiations mark struct fields as not required.
pub const OPTIONAL_TEMPLATE: &str = "util::Optional";

/// A fully resolved type.
///
/// Named entities (classes, structs, enums, opaque types) are held as
/// arena references, so every occurrence of a registered name shares one
/// component. The four qualifier variants each wrap exactly one inner
/// type; their nesting is decided by the resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Const(Box<Type>),
    Pointer(Box<Type>),
    Ref(Box<Type>),
    RRef(Box<Type>),
    Func(Box<Func>),
    Template(Template),
    Primitive(String),
    Class(Ref<Class>),
    Struct(Ref<Struct>),
    Enum(Ref<Enum>),
    Opaque(Ref<Opaque>),
}

/// A callable signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Func {
    pub ret: Type,
    pub args: Vec<Arg>,
    pub is_const: bool,
    pub noexcept: bool,
}

/// One named function argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arg {
    pub name: String,
    pub ty: Type,
}

/// A generic instantiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub args: Vec<Type>,
}

impl Type {
    /// What kind of type this is, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Type::Const(_) => "const-qualified type",
            Type::Pointer(_) => "pointer",
            Type::Ref(_) => "reference",
            Type::RRef(_) => "rvalue reference",
            Type::Func(_) => "function",
            Type::Template(_) => "template instance",
            Type::Primitive(_) => "primitive",
            Type::Class(_) => "class",
            Type::Struct(_) => "struct",
            Type::Enum(_) => "enum",
            Type::Opaque(_) => "opaque type",
        }
    }

    /// Human-readable rendering, dereferencing component refs via `table`.
    pub fn describe(&self, table: &impl ComponentTable) -> String {
        match self {
            Type::Const(inner) => format!("{} const", inner.describe(table)),
            Type::Pointer(inner) => format!("{}*", inner.describe(table)),
            Type::Ref(inner) => format!("{}&", inner.describe(table)),
            Type::RRef(inner) => format!("{}&&", inner.describe(table)),
            Type::Func(func) => func.describe(table),
            Type::Template(template) => {
                let mut out = String::new();
                write!(out, "{}<", template.name).unwrap();
                for (i, arg) in template.args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&arg.describe(table));
                }
                out.push('>');
                out
            }
            Type::Primitive(name) => name.clone(),
            Type::Class(class) => {
                let class = class.get(table);
                if class.is_interface {
                    format!("interface {}", class.name)
                } else {
                    format!("class {}", class.name)
                }
            }
            Type::Struct(record) => format!("struct {}", record.get(table).name),
            Type::Enum(enum_) => format!("enum {}", enum_.get(table).name),
            Type::Opaque(opaque) => opaque.get(table).name.clone(),
        }
    }
}

impl Func {
    /// Renders as `(arg: type, ...) [const] [noexcept] -> ret`.
    pub fn describe(&self, table: &impl ComponentTable) -> String {
        let args = self
            .args
            .iter()
            .map(|arg| format!("{}: {}", arg.name, arg.ty.describe(table)))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "({}){}{} -> {}",
            args,
            if self.is_const { " const" } else { "" },
            if self.noexcept { " noexcept" } else { "" },
            self.ret.describe(table),
        )
    }
}
