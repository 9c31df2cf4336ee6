//! The symbol table populated while the binder runs.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{BindError, Result};
use crate::spec::TemplateArity;
use crate::types::{Template, Type, SHARED_PTR_TEMPLATE};

/// Single-assignment mapping from type name to resolved [`Type`], plus the
/// declared template arities.
///
/// The registry is the sole place where identity for a name is
/// established: every later reference to a registered name yields a clone
/// of the same `Type` value, and for arena-backed variants that clone is
/// the same component reference. Each binder invocation owns its own
/// registry; nothing is shared across invocations.
pub struct TypeRegistry {
    types: HashMap<String, Type>,
    templates: HashMap<String, TemplateArity>,
}

impl TypeRegistry {
    pub(crate) fn new(templates: impl IntoIterator<Item = (String, TemplateArity)>) -> Self {
        Self {
            types: HashMap::new(),
            templates: templates.into_iter().collect(),
        }
    }

    /// Registers `ty` under `name`. Fails if the name is taken; the
    /// existing entry is left untouched in that case.
    pub(crate) fn register(&mut self, name: &str, ty: Type) -> Result<()> {
        match self.types.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(BindError::DuplicateTypeName(name.to_owned())),
            Entry::Vacant(entry) => {
                entry.insert(ty);
                Ok(())
            }
        }
    }

    /// Registers `shared_ptr<inner>` under `name`, with the same
    /// uniqueness rules as [`register`](Self::register).
    pub(crate) fn register_shared_alias(&mut self, name: &str, inner: Type) -> Result<()> {
        self.register(
            name,
            Type::Template(Template {
                name: SHARED_PTR_TEMPLATE.to_owned(),
                args: vec![inner],
            }),
        )
    }

    /// Lookup by exact name. Absence is reported by the resolver, not
    /// here.
    pub(crate) fn lookup(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub(crate) fn template_arity(&self, name: &str) -> Option<TemplateArity> {
        self.templates.get(name).copied()
    }

    /// Consumes the registry into the snapshot carried by the bound model.
    pub(crate) fn into_types(self) -> HashMap<String, Type> {
        self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_registration_fails_and_keeps_first_entry() {
        let mut registry = TypeRegistry::new([]);
        registry
            .register("int32", Type::Primitive("int32".into()))
            .unwrap();

        let err = registry
            .register("int32", Type::Primitive("other".into()))
            .unwrap_err();
        assert!(matches!(err, BindError::DuplicateTypeName(name) if name == "int32"));

        assert_eq!(
            registry.lookup("int32"),
            Some(&Type::Primitive("int32".into()))
        );
    }

    #[test]
    fn shared_alias_registers_shared_ptr_template() {
        let mut registry = TypeRegistry::new([]);
        registry
            .register("Realm", Type::Primitive("Realm".into()))
            .unwrap();
        registry
            .register_shared_alias("SharedRealm", Type::Primitive("Realm".into()))
            .unwrap();

        assert_eq!(
            registry.lookup("SharedRealm"),
            Some(&Type::Template(Template {
                name: SHARED_PTR_TEMPLATE.into(),
                args: vec![Type::Primitive("Realm".into())],
            }))
        );
    }

    #[test]
    fn lookup_of_absent_name_is_none() {
        let registry = TypeRegistry::new([]);
        assert_eq!(registry.lookup("missing"), None);
    }
}
