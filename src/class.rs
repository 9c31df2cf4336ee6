//! Bound classes, interfaces, and their methods.

use crate::components::{Component, ComponentTable, Ref};
use crate::types::{Func, Type};

/// A bound class or interface.
///
/// `base` and `subclasses` are non-owning arena references; the table owns
/// every class. The subclass list is filled while class bodies are bound
/// and keeps declaration order, which the linearizer relies on.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    /// Target-language name; defaults to `name`.
    pub target_name: String,
    pub is_abstract: bool,
    pub base: Option<Ref<Class>>,
    pub subclasses: Vec<Ref<Class>>,
    pub is_interface: bool,
    pub shared_ptr_wrapped: bool,
    pub needs_deref: bool,
    pub methods: Vec<Method>,
    /// Element type if the class exposes iteration.
    pub iterable: Option<Type>,
}

impl Component for Class {
    const DISPLAY_NAME: &'static str = "class";
}

impl Class {
    /// A freshly registered class with an empty body. Interfaces are always
    /// shared-owned and always need dereferencing.
    pub(crate) fn new(name: impl Into<String>, is_interface: bool) -> Self {
        Self {
            name: name.into(),
            target_name: String::new(),
            is_abstract: false,
            base: None,
            subclasses: Vec::new(),
            is_interface,
            shared_ptr_wrapped: is_interface,
            needs_deref: is_interface,
            methods: Vec::new(),
            iterable: None,
        }
    }
}

/// Discriminates the method flavors of the bound model.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MethodKind {
    Instance,
    Static,
    /// A static method that constructs the owning class; its signature's
    /// return type has already been rewritten to the class itself.
    Constructor,
    /// An instance method synthesized from a property declaration, with a
    /// zero-argument const accessor signature.
    Property,
}

/// One bound method, constructor, or property accessor.
#[derive(Debug)]
pub struct Method {
    /// The owning class.
    pub on: Ref<Class>,
    /// Display name; empty for constructors.
    pub name: String,
    /// Unique within the owning class: `<name>_<suffix>` for suffixed
    /// overloads, the plain name otherwise.
    pub unique_name: String,
    /// Target-language member name; empty for constructors.
    pub target_name: String,
    pub sig: Func,
    pub kind: MethodKind,
}

impl Method {
    pub fn is_static(&self) -> bool {
        matches!(self.kind, MethodKind::Static | MethodKind::Constructor)
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    /// A valid identifier for this method that is unique across all
    /// classes.
    pub fn id(&self, table: &impl ComponentTable) -> String {
        format!("{}_{}", self.on.get(table).name, self.unique_name)
    }

    /// Renders the target-language expression invoking this method.
    /// `self_expr` is ignored for statics and constructors.
    pub fn call_expr(&self, table: &impl ComponentTable, self_expr: &str, args: &[&str]) -> String {
        let args = args.join(", ");
        let class = self.on.get(table);
        match self.kind {
            MethodKind::Instance | MethodKind::Property => {
                format!("{}.{}({})", self_expr, self.target_name, args)
            }
            MethodKind::Static => format!("{}::{}({})", class.target_name, self.target_name, args),
            MethodKind::Constructor => {
                if class.shared_ptr_wrapped {
                    format!("std::make_shared<{}>({})", class.target_name, args)
                } else {
                    format!("{}({})", class.target_name, args)
                }
            }
        }
    }

    /// Value type of a property accessor (its signature's return type).
    pub fn property_type(&self) -> &Type {
        &self.sig.ret
    }
}
