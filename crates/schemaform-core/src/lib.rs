pub mod assembler;
pub mod cache;
pub mod catalogs;
pub mod check;
pub mod classify;
pub mod compiler;
pub mod editability;
pub mod error;
pub mod field;
pub mod fieldset;
pub mod linker;
pub mod metadata;
pub mod naming;
pub mod nested;
pub mod registry;
pub mod schema;
pub mod types;
pub mod unwrap;

pub use assembler::{assemble, save_model_id};
pub use cache::ConfigCache;
pub use catalogs::{COMPILER_VERSION, CONFIG_VERSION};
pub use check::check;
pub use compiler::Compiler;
pub use error::{CompileError, CompileResult};
pub use metadata::MetadataBag;
pub use registry::{parse_document, InMemoryRegistry, SchemaRegistry};
pub use schema::{ObjectFields, SchemaDocument, SchemaNode, Shape};
pub use types::*;
