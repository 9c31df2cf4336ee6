//! Bound enums and opaque handle types.

use crate::components::Component;

#[derive(Debug)]
pub struct Enum {
    pub name: String,
    /// Target-language name; defaults to `name`.
    pub target_name: String,
    pub enumerators: Vec<Enumerator>,
}

impl Component for Enum {
    const DISPLAY_NAME: &'static str = "enum";
}

#[derive(Debug, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    pub value: i64,
}

/// An opaque handle type with no visible structure.
#[derive(Debug)]
pub struct Opaque {
    pub name: String,
}

impl Component for Opaque {
    const DISPLAY_NAME: &'static str = "opaque type";
}
