//! Multipart form decoding for case requests

use axum::extract::multipart::{Multipart, MultipartError};
use uuid::Uuid;

use crate::types::{Attachment, CaseContext};

/// Form field carrying uploaded files
pub const FILES_FIELD: &str = "files";

/// Contents of a multipart case request
#[derive(Debug, Default)]
pub struct MultipartBody {
    /// `case_id` text field
    pub case_id: Option<String>,
    /// Every `files` part, in form order
    pub uploads: Vec<Attachment>,
    /// `case_context` text field parsed as JSON
    pub context: Option<CaseContext>,
}

/// Read every field of a multipart form into memory.
///
/// A form that cannot be parsed yields an empty body; nothing read before
/// the failure is kept.
pub async fn read_multipart(multipart: Multipart) -> MultipartBody {
    match read_fields(multipart).await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Ignoring unreadable multipart form: {}", e);
            MultipartBody::default()
        }
    }
}

async fn read_fields(mut multipart: Multipart) -> Result<MultipartBody, MultipartError> {
    let mut body = MultipartBody::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            FILES_FIELD => {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("file_{}.bin", Uuid::new_v4()));

                let data = field.bytes().await?;

                tracing::debug!("Received upload: {} ({} bytes)", file_name, data.len());
                body.uploads.push(Attachment::new(file_name, data));
            }
            "case_id" => {
                let value = field.text().await?;
                if !value.is_empty() {
                    body.case_id = Some(value);
                }
            }
            "case_context" => {
                let data = field.bytes().await?;
                match serde_json::from_slice::<CaseContext>(&data) {
                    Ok(context) => body.context = Some(context),
                    Err(e) => tracing::warn!("Ignoring malformed case_context: {}", e),
                }
            }
            other => {
                tracing::debug!("Skipping unknown form field: {:?}", other);
            }
        }
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{header, Request};

    const BOUNDARY: &str = "X-CASE-BOUNDARY";

    fn form(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            match file_name {
                Some(f) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    name, f
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));

        Request::builder()
            .method("POST")
            .uri("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn decode(request: Request<Body>) -> MultipartBody {
        let multipart = Multipart::from_request(request, &()).await.unwrap();
        read_multipart(multipart).await
    }

    #[tokio::test]
    async fn test_files_and_case_id() {
        let body = decode(form(&[
            ("case_id", None, "CASE-21"),
            ("files", Some("loan.pdf"), "%PDF-1.4"),
            ("files", Some("id.png"), "PNG"),
            ("notes", None, "ignored"),
        ]))
        .await;

        assert_eq!(body.case_id.as_deref(), Some("CASE-21"));
        let names: Vec<_> = body.uploads.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["loan.pdf", "id.png"]);
        assert_eq!(&body.uploads[0].bytes[..], b"%PDF-1.4");
        assert!(body.context.is_none());
    }

    #[tokio::test]
    async fn test_unnamed_file_gets_generated_name() {
        let body = decode(form(&[("files", Some(""), "data")])).await;
        assert_eq!(body.uploads.len(), 1);
        assert!(body.uploads[0].file_name.starts_with("file_"));
        assert!(body.uploads[0].file_name.ends_with(".bin"));
    }

    #[tokio::test]
    async fn test_case_context_field() {
        let body = decode(form(&[
            ("case_context", None, r#"{"priority": "Medium"}"#),
            ("files", Some("a.pdf"), "x"),
        ]))
        .await;
        assert_eq!(body.context.unwrap().priority, "Medium");

        let body = decode(form(&[("case_context", None, "not json")])).await;
        assert!(body.context.is_none());
        assert!(body.case_id.is_none());
    }

    #[tokio::test]
    async fn test_truncated_form_is_discarded() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"case_id\"\r\n\r\nCASE-3\r\n--{b}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"a.pdf\"\r\n\r\npartial",
            b = BOUNDARY
        );
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let body = decode(request).await;
        assert!(body.case_id.is_none());
        assert!(body.uploads.is_empty());
    }
}
