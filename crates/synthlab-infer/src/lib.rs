//! Schema inference from tabular data.

mod infer;
mod mapper;
pub mod options;
mod profile;

pub use infer::{infer_schema, infer_schema_with_options, infer_schema_with_threshold};
pub use options::InferOptions;

pub use synthlab_core::Schema;
