//! Compiles documented entity attributes (free-text type descriptors, dotted
//! and bracketed paths) into OpenAPI 3.1 component schemas.
pub mod builder;
pub mod check;
pub mod cli;
pub mod compile;
pub mod config;
pub mod dedup;
pub mod error;
pub mod inference;
pub mod inherit;
pub mod ir;
pub mod jq_exec;
pub mod lower;
pub mod naming;
pub mod nullability;
pub mod path;
pub mod path_de;
pub mod record;
pub mod sort;

pub use compile::{CompiledDocument, CompiledSchemas, Compiler};
pub use config::CompilerConfig;
pub use record::{AttributeRecord, DocumentationSet, EntityRecord, MethodRecord, ParameterRecord};
