use thiserror::Error;

/// Errors raised while binding a specification.
///
/// Every failure aborts the whole binder invocation; there is no partial
/// bound model. Messages name the offending construct so the invoking
/// driver can present them as-is.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("duplicate type name '{0}'")]
    DuplicateTypeName(String),

    #[error("illegal type name '{0}': '_' is reserved for synthetic identifiers")]
    IllegalTypeName(String),

    #[error("no such type: {0}")]
    UnknownType(String),

    #[error("no such template: {0}")]
    UnknownTemplate(String),

    #[error("template {name} takes {expected} arguments, but {actual} were supplied")]
    TemplateArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("class {class} has invalid base '{base}': {reason}")]
    InvalidBase {
        class: String,
        base: String,
        reason: String,
    },

    #[error("base class loop detected on {0}")]
    CyclicHierarchy(String),

    #[error("constructor {name} of class {class} must be declared with a void return type")]
    MalformedConstructorSignature { class: String, name: String },
}

pub type Result<T> = std::result::Result<T, BindError>;
