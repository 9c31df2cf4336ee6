use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::num::{NonZeroU32, NonZeroUsize};

use crate::class::Class;
use crate::enumeration::{Enum, Opaque};
use crate::record::Struct;

/// Trait implemented by all named entities stored in a type table.
pub trait Component {
    const DISPLAY_NAME: &'static str;
}

/// Type on which internal component traits are implemented.
///
/// This type is used to prevent leaking internal functions into the
/// [`Component`] trait.
pub struct ComponentTraits;

/// A component referencable via [`Ref`]. Intended for internal use.
pub trait HasArenaContainer<C: Component>: Sized {
    fn get_container_from_type_table(table: &TypeTable) -> &[C];
    fn get_container_from_type_table_mut(table: &mut TypeTable) -> &mut Vec<C>;
    fn get_container_from_bound_table(table: &BoundTypeTable) -> &[C];
}

/// A reference to a [`Component`] stored in a [`ComponentTable`].
///
/// Back-references (base class ↔ subclasses, a method's owning class) are
/// held as `Ref`s, so the ownership graph stays acyclic: all components are
/// owned by the table, references are plain indices.
pub struct Ref<C>(NonZeroU32, PhantomData<C>)
where
    C: Component,
    ComponentTraits: HasArenaContainer<C>;

impl<C> Ref<C>
where
    C: Component,
    ComponentTraits: HasArenaContainer<C>,
{
    const fn from_inner(inner: NonZeroU32) -> Self {
        Self(inner, PhantomData)
    }

    fn index(self) -> usize {
        let size: NonZeroUsize = self
            .0
            .try_into()
            .expect("Could not convert component reference to usize index");
        usize::from(size) - 1
    }

    pub fn get(self, table: &impl ComponentTable) -> &C {
        table.get(self)
    }
}

// derive(...) does not work if C itself does not derive the trait, even
// though it is only "used" in the PhantomData; hence we have to manually
// implement the required traits for the Ref type.

impl<C> Copy for Ref<C>
where
    C: Component,
    ComponentTraits: HasArenaContainer<C>,
{
}

impl<C> Clone for Ref<C>
where
    C: Component,
    ComponentTraits: HasArenaContainer<C>,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> fmt::Debug for Ref<C>
where
    C: Component,
    ComponentTraits: HasArenaContainer<C>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{} #{}>", C::DISPLAY_NAME, self.0)
    }
}

impl<C> PartialEq for Ref<C>
where
    C: Component,
    ComponentTraits: HasArenaContainer<C>,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<C> Eq for Ref<C>
where
    C: Component,
    ComponentTraits: HasArenaContainer<C>,
{
}

impl<C> Hash for Ref<C>
where
    C: Component,
    ComponentTraits: HasArenaContainer<C>,
{
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// An arena-like container for the bound [`Component`]s.
pub trait ComponentTable {
    /// Retrieves a component's value by reference from this table.
    /// Panics if the reference is out of bounds, which cannot happen for
    /// references produced by the table the component was created in.
    fn get<C>(&self, ref_: Ref<C>) -> &C
    where
        C: Component,
        ComponentTraits: HasArenaContainer<C>;
}

/// The [component table](ComponentTable) used while the binder is running.
///
/// Entities are created fully-formed and then mutated in place while their
/// forward references are being filled in (a class's method list grows
/// after the class itself is registered).
#[derive(Debug, Default)]
pub struct TypeTable {
    classes: Vec<Class>,
    structs: Vec<Struct>,
    enums: Vec<Enum>,
    opaques: Vec<Opaque>,
}

impl ComponentTable for TypeTable {
    fn get<C>(&self, ref_: Ref<C>) -> &C
    where
        C: Component,
        ComponentTraits: HasArenaContainer<C>,
    {
        let container = ComponentTraits::get_container_from_type_table(self);
        container
            .get(ref_.index())
            .expect("Invalid component reference (out-of-bounds)")
    }
}

impl TypeTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` and returns a [`Ref`] to it.
    pub(crate) fn create<C>(&mut self, value: C) -> Ref<C>
    where
        C: Component,
        ComponentTraits: HasArenaContainer<C>,
    {
        let container = ComponentTraits::get_container_from_type_table_mut(self);
        container.push(value);

        // We use the size for the ref's ID, which is non-zero after the push
        let size = NonZeroUsize::new(container.len()).unwrap();
        let id: NonZeroU32 = size.try_into().expect("ID did not fit into 32-bit integer");

        Ref::from_inner(id)
    }

    pub(crate) fn get_mut<C>(&mut self, ref_: Ref<C>) -> &mut C
    where
        C: Component,
        ComponentTraits: HasArenaContainer<C>,
    {
        let container = ComponentTraits::get_container_from_type_table_mut(self);
        container
            .get_mut(ref_.index())
            .expect("Invalid component reference (out-of-bounds)")
    }

    /// Iterates over the references of every component of one kind, in
    /// creation order.
    pub(crate) fn refs<C>(&self) -> impl Iterator<Item = Ref<C>>
    where
        C: Component,
        ComponentTraits: HasArenaContainer<C>,
    {
        let len = ComponentTraits::get_container_from_type_table(self).len() as u32;
        (1..=len).map(|id| Ref::from_inner(NonZeroU32::new(id).unwrap()))
    }

    pub(crate) fn count<C>(&self) -> usize
    where
        C: Component,
        ComponentTraits: HasArenaContainer<C>,
    {
        ComponentTraits::get_container_from_type_table(self).len()
    }

    /// Converts this table into the read-only [`BoundTypeTable`] handed out
    /// with the bound model.
    pub(crate) fn freeze(self) -> BoundTypeTable {
        BoundTypeTable {
            classes: self.classes.into_boxed_slice(),
            structs: self.structs.into_boxed_slice(),
            enums: self.enums.into_boxed_slice(),
            opaques: self.opaques.into_boxed_slice(),
        }
    }
}

/// The [component table](ComponentTable) travelling with the final bound
/// model.
///
/// Since this table is read-only, the components are stored in boxed
/// slices. Every `Ref` created during the binder invocation that produced
/// this table resolves against it.
#[derive(Debug)]
pub struct BoundTypeTable {
    classes: Box<[Class]>,
    structs: Box<[Struct]>,
    enums: Box<[Enum]>,
    opaques: Box<[Opaque]>,
}

impl ComponentTable for BoundTypeTable {
    fn get<C>(&self, ref_: Ref<C>) -> &C
    where
        C: Component,
        ComponentTraits: HasArenaContainer<C>,
    {
        let container = ComponentTraits::get_container_from_bound_table(self);
        container
            .get(ref_.index())
            .expect("Invalid component reference (out-of-bounds)")
    }
}

macro_rules! has_arena_container_impl {
    ($type_name:ty, $field_name:ident) => {
        impl HasArenaContainer<$type_name> for ComponentTraits {
            fn get_container_from_type_table(table: &TypeTable) -> &[$type_name] {
                &table.$field_name
            }

            fn get_container_from_type_table_mut(table: &mut TypeTable) -> &mut Vec<$type_name> {
                &mut table.$field_name
            }

            fn get_container_from_bound_table(table: &BoundTypeTable) -> &[$type_name] {
                &table.$field_name
            }
        }
    };
}

has_arena_container_impl!(Class, classes);
has_arena_container_impl!(Struct, structs);
has_arena_container_impl!(Enum, enums);
has_arena_container_impl!(Opaque, opaques);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn created_components_are_retrievable() {
        let mut table = TypeTable::new();
        let a = table.create(Opaque {
            name: "TokenA".into(),
        });
        let b = table.create(Opaque {
            name: "TokenB".into(),
        });

        assert_ne!(a, b);
        assert_eq!(a.get(&table).name, "TokenA");
        assert_eq!(b.get(&table).name, "TokenB");
    }

    #[test]
    fn refs_survive_freezing() {
        let mut table = TypeTable::new();
        let r = table.create(Opaque {
            name: "Token".into(),
        });

        let frozen = table.freeze();
        assert_eq!(r.get(&frozen).name, "Token");
    }

    #[test]
    fn refs_debug_with_display_name() {
        let mut table = TypeTable::new();
        let r = table.create(Opaque {
            name: "Token".into(),
        });

        assert_eq!(format!("{r:?}"), "<opaque type #1>");
    }
}
