//! Synthetic table generation for synthlab.
//!
//! Two paths produce tables: rule-based generation from a declared
//! [`SchemaDefinition`](synthlab_spec::SchemaDefinition), and a data-driven
//! pipeline that infers a schema, fits a [`TabularModel`] and conforms the
//! sample. Both end in the constraint post-processor.

pub mod engine;
pub mod errors;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod postprocess;
pub mod schema_mode;

pub use engine::{GenerationEngine, GenerationResult, REPORT_JSON, SYNTHETIC_CSV};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationMode, GenerationReport};
pub use output::csv::{table_to_csv_bytes, write_table_csv};
pub use pipeline::{
    DataDrivenPipeline, FittedMarginals, FittedModel, MarginalSampler, PipelineOutput,
    TabularModel,
};
pub use postprocess::apply_constraints;
pub use schema_mode::generate_from_schema;
