//! Prompt construction and model output handling

pub mod model_json;
pub mod prompt;

pub use model_json::{parse_model_json, strip_code_fences};
pub use prompt::PromptBuilder;
