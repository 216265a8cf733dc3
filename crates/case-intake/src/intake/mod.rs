//! Request decoding: case id resolution, uploads and case context

pub mod multipart;
pub mod request;

pub use multipart::{read_multipart, MultipartBody};
pub use request::{
    blob_path, context_from_json, query_case_id, resolve_case_id, sanitize_upload_name, CaseRequest,
};
