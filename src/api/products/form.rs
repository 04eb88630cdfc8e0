//! Multipart form decoding for product create/update
//!
//! The wire contract: text fields carry either plain strings or
//! JSON-encoded values (`colors`, `sizes`, `existingMediaIds`); file fields
//! are `mediaFiles` (up to 5), `imageFile`, `pdf`, `video`. JSON-carrying
//! fields are decoded by one shared decoder with one failure policy:
//! malformed JSON rejects the request, on create and update alike.

use std::collections::HashMap;

use axum::extract::Multipart;
use serde::de::DeserializeOwned;

use crate::utils::{AppError, AppResult};

/// Maximum number of generic media attachments per request
pub const MAX_MEDIA_FILES: usize = 5;

/// An uploaded file as it arrived, before it is persisted
#[derive(Debug)]
pub struct RawUpload {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Collected multipart body of a product mutation request
#[derive(Debug, Default)]
pub struct ProductForm {
    fields: HashMap<String, String>,
    pub media_files: Vec<RawUpload>,
    pub image_file: Option<RawUpload>,
    pub pdf: Option<RawUpload>,
    pub video: Option<RawUpload>,
}

impl ProductForm {
    /// Drain a multipart stream into text fields and raw uploads
    pub async fn from_multipart(multipart: &mut Multipart) -> AppResult<Self> {
        let mut form = ProductForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(|s| s.to_string()) else {
                continue;
            };

            if field.file_name().is_some() {
                let upload = RawUpload {
                    original_name: field
                        .file_name()
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    content_type: field.content_type().map(|s| s.to_string()),
                    bytes: field.bytes().await?.to_vec(),
                };
                // Empty file parts (no selection in the client form) are skipped
                if upload.bytes.is_empty() {
                    continue;
                }

                match name.as_str() {
                    "mediaFiles" => {
                        if form.media_files.len() >= MAX_MEDIA_FILES {
                            return Err(AppError::validation(format!(
                                "At most {} media files are allowed",
                                MAX_MEDIA_FILES
                            )));
                        }
                        form.media_files.push(upload);
                    }
                    "imageFile" => form.image_file = Some(upload),
                    "pdf" => form.pdf = Some(upload),
                    "video" => form.video = Some(upload),
                    other => {
                        return Err(AppError::validation(format!(
                            "Unexpected file field '{}'",
                            other
                        )));
                    }
                }
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Raw text field, if present
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    /// Required non-empty text field
    pub fn require_text(&self, name: &str) -> AppResult<&str> {
        match self.text(name) {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(AppError::validation(format!("{} is required", name))),
        }
    }

    /// Shared decoder for JSON-encoded string fields
    ///
    /// Absent or empty fields decode to `None`; malformed JSON is a
    /// validation failure.
    pub fn json_field<T: DeserializeOwned>(&self, name: &str) -> AppResult<Option<T>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| AppError::validation(format!("Invalid JSON in field '{}': {}", name, e))),
        }
    }

    /// Numeric text field; absent or empty is `None`, unparseable rejects
    pub fn f64_field(&self, name: &str) -> AppResult<Option<f64>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| AppError::validation(format!("{} must be a number", name))),
        }
    }

    /// Integer text field; absent or empty is `None`, unparseable rejects
    pub fn i64_field(&self, name: &str) -> AppResult<Option<i64>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| AppError::validation(format!("{} must be an integer", name))),
        }
    }

    #[cfg(test)]
    pub fn with_fields(fields: &[(&str, &str)]) -> Self {
        ProductForm {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{ColorOption, SizeOption};

    #[test]
    fn json_fields_decode_with_one_policy() {
        let form = ProductForm::with_fields(&[
            ("colors", r##"[{"name":"Red","value":"#f00"}]"##),
            ("sizes", r#"[{"name":"M","price":"19.9"}]"#),
            ("existingMediaIds", ""),
            ("broken", "{not json"),
        ]);

        let colors: Vec<ColorOption> = form.json_field("colors").unwrap().unwrap();
        assert_eq!(colors[0].value, "#f00");

        let sizes: Vec<SizeOption> = form.json_field("sizes").unwrap().unwrap();
        assert_eq!(sizes[0].price, 19.9);

        // empty and absent fields decode to None
        assert!(form.json_field::<Vec<String>>("existingMediaIds").unwrap().is_none());
        assert!(form.json_field::<Vec<String>>("missing").unwrap().is_none());

        // malformed JSON rejects, it never silently empties
        assert!(form.json_field::<Vec<String>>("broken").is_err());
    }

    #[test]
    fn numeric_fields_reject_garbage() {
        let form = ProductForm::with_fields(&[("price", "12.5"), ("quantity", "three")]);
        assert_eq!(form.f64_field("price").unwrap(), Some(12.5));
        assert!(form.i64_field("quantity").is_err());
        assert_eq!(form.i64_field("sold").unwrap(), None);
    }

    #[test]
    fn required_text_must_be_non_empty() {
        let form = ProductForm::with_fields(&[("title", "  ")]);
        assert!(form.require_text("title").is_err());
        assert!(form.require_text("missing").is_err());
    }
}
