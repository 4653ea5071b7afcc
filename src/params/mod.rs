//! Request parameter sources
//!
//! Whether a value came from the path, the query string or the body is a
//! routing concern. Each source is kept as its own raw mapping; callers either
//! validate one group per schema or merge all sources into one raw input
//! before the same `validate` call.

mod decode;
mod source;

pub use decode::decode_text_params;
pub use source::{ParamSource, RequestParams};
