//! Semantic binder for a cross-language binding generator.
//!
//! This crate consumes the loosely typed interface specification produced
//! by the parsing front end ([`spec::Spec`]) and produces the fully
//! resolved, cross-referenced type graph ([`BoundSpec`]) that the code
//! emission backend renders into target-language glue.
//!
//! Binding is a single synchronous pass per invocation: names are
//! registered into a per-invocation registry, descriptors are resolved
//! against it, the class hierarchy is linked, checked for cycles and
//! linearized base-first, and the dynamic "mixed" value description is
//! projected. Any violated invariant aborts the invocation with a
//! [`BindError`]; there is no partial bound model.

pub mod binder;
pub mod class;
pub mod components;
pub mod enumeration;
pub mod error;
pub mod record;
pub mod spec;
pub mod types;

mod registry;
mod resolver;

pub use binder::{bind_model, BoundSpec, MixedGetter, MixedInfo};
pub use class::{Class, Method, MethodKind};
pub use components::{BoundTypeTable, Component, ComponentTable, Ref};
pub use enumeration::{Enum, Enumerator, Opaque};
pub use error::BindError;
pub use record::{Field, Struct};
pub use spec::Spec;
pub use types::{Arg, Func, Template, Type};
