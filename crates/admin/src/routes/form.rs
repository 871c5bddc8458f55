//! Multipart parsing for the menu item form.

use axum::extract::Multipart;
use axum::extract::multipart::Field;
use flavors_core::{MenuItemInput, ValidationErrors};

use crate::error::Result;
use crate::images::{ImageError, is_image_content_type};

/// An image file picked in the form.
#[derive(Debug)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Everything submitted by the create/edit form.
#[derive(Debug, Default)]
pub struct MenuForm {
    pub input: MenuItemInput,
    /// `None` when no file was chosen.
    pub image: Option<ImageUpload>,
    /// Set when a file was chosen but cannot be accepted.
    pub image_error: Option<String>,
}

impl MenuForm {
    /// Read every part of the form.
    ///
    /// Checkboxes count as checked when present. An oversized or non-image
    /// file is reported in `image_error` instead of failing the request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Multipart` if the body is not valid multipart.
    pub async fn read(multipart: &mut Multipart, max_image_bytes: usize) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => match read_image(field, max_image_bytes).await? {
                    Ok(image) => form.image = image,
                    Err(e) => form.image_error = Some(image_error_message(&e)),
                },
                "name" => form.input.name = field.text().await?,
                "description" => form.input.description = field.text().await?,
                "category" => form.input.category = field.text().await?,
                "full_price" => form.input.full_price = field.text().await?,
                "half_price" => form.input.half_price = field.text().await?,
                "has_half_quantity" => form.input.has_half_quantity = true,
                "is_available" => form.input.is_available = true,
                "is_featured" => form.input.is_featured = true,
                _ => tracing::debug!(field = %name, "ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    /// Whether anything in the form needs fixing before a write.
    #[must_use]
    pub const fn has_image_error(&self) -> bool {
        self.image_error.is_some()
    }
}

/// Stream one file part, stopping as soon as it exceeds the cap.
async fn read_image(
    mut field: Field<'_>,
    max_bytes: usize,
) -> Result<std::result::Result<Option<ImageUpload>, ImageError>> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if bytes.len() + chunk.len() > max_bytes {
            return Ok(Err(ImageError::TooLarge { max_bytes }));
        }
        bytes.extend_from_slice(&chunk);
    }

    // An empty file input still sends a part
    if bytes.is_empty() && filename.is_empty() {
        return Ok(Ok(None));
    }
    if bytes.is_empty() {
        return Ok(Err(ImageError::Empty));
    }
    if !is_image_content_type(&content_type) {
        return Ok(Err(ImageError::UnsupportedType(content_type)));
    }

    Ok(Ok(Some(ImageUpload { filename, bytes })))
}

fn image_error_message(err: &ImageError) -> String {
    match err {
        ImageError::TooLarge { max_bytes } => {
            format!("Image must be at most {} KB.", max_bytes / 1024)
        }
        ImageError::UnsupportedType(_) => "Please choose an image file.".to_string(),
        ImageError::Empty => "The chosen image is empty.".to_string(),
        ImageError::Io(_) => "The image could not be read.".to_string(),
    }
}

/// Per-field messages for the form template.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    pub name: Option<&'static str>,
    pub description: Option<&'static str>,
    pub category: Option<&'static str>,
    pub full_price: Option<&'static str>,
    pub half_price: Option<&'static str>,
    pub image: Option<String>,
}

impl FormErrors {
    #[must_use]
    pub fn new(validation: Option<&ValidationErrors>, image: Option<String>) -> Self {
        use flavors_core::Field as F;

        let get = |field| validation.and_then(|errors| errors.get(field));
        Self {
            name: get(F::Name),
            description: get(F::Description),
            category: get(F::Category),
            full_price: get(F::FullPrice),
            half_price: get(F::HalfPrice),
            image,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.full_price.is_none()
            && self.half_price.is_none()
            && self.image.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_errors_from_validation() {
        let input = MenuItemInput {
            name: "A".to_string(),
            description: "Tasty and hot.".to_string(),
            category: "Mains".to_string(),
            full_price: "0".to_string(),
            ..Default::default()
        };
        let errors = input.validate().unwrap_err();
        let view = FormErrors::new(Some(&errors), None);

        assert_eq!(view.name, Some("Name must be at least 2 characters."));
        assert_eq!(view.full_price, Some("Price must be a positive number."));
        assert!(view.description.is_none());
        assert!(!view.is_empty());
        assert!(FormErrors::new(None, None).is_empty());
    }

    #[test]
    fn test_image_error_message() {
        assert_eq!(
            image_error_message(&ImageError::TooLarge { max_bytes: 5 * 1024 * 1024 }),
            "Image must be at most 5120 KB."
        );
    }
}
