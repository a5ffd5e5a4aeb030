// Core library for reading, checking and writing rustdoc implementor indexes

pub mod crate_name;
pub mod doc_dir;
pub mod error;
pub mod implementor;
pub mod script;
pub mod table;
pub mod validate;

// Re-export commonly used types
pub use crate_name::CrateName;
pub use doc_dir::{Change, DocDir, DocIndex, Suggestion, TraitFile, TypeImpl};
pub use error::ScriptError;
pub use implementor::{ImplTarget, Implementor};
pub use script::{FragmentMeta, ImplementorsScript};
pub use table::{CrateImplementors, ImplementorsTable};
pub use validate::{Diagnostic, Severity, Validator};
