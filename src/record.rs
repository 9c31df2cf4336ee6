//! Bound structs (records) and their fields.

use crate::components::Component;
use crate::types::Type;

#[derive(Debug)]
pub struct Struct {
    pub name: String,
    /// Target-language name; defaults to `name`.
    pub target_name: String,
    pub fields: Vec<Field>,
}

impl Component for Struct {
    const DISPLAY_NAME: &'static str = "struct";
}

/// One struct field. A field is required unless it declares a default
/// value or its resolved type is an optional-template instantiation.
#[derive(Debug)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub required: bool,
}
