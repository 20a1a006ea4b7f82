//! Multipart form decoding for `POST /`.

use axum::extract::Multipart;
use axum::extract::multipart::Field;

use crate::domain::{Action, DegreeSpec, PlotLabels, SampleSet};
use crate::error::AppError;
use crate::io::{parse_manual, read_samples};

/// An uploaded sample file as declared by the browser.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw form fields. Unknown fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct FitForm {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub method: Option<String>,
    pub x_values: Option<String>,
    pub y_values: Option<String>,
    pub degree: Option<String>,
    pub action: Option<String>,
    pub file: Option<UploadedFile>,
}

impl FitForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FitForm::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => form.file = read_file(field).await?,
                "title" => form.title = Some(read_text(field).await?),
                "x_label" => form.x_label = Some(read_text(field).await?),
                "y_label" => form.y_label = Some(read_text(field).await?),
                "method" => form.method = Some(read_text(field).await?),
                "x_values" => form.x_values = Some(read_text(field).await?),
                "y_values" => form.y_values = Some(read_text(field).await?),
                "degree" => form.degree = Some(read_text(field).await?),
                "action" => form.action = Some(read_text(field).await?),
                _ => {}
            }
        }

        Ok(form)
    }

    pub fn action(&self) -> Action {
        Action::from_form(self.action.as_deref())
    }

    /// Blank labels fall back to the defaults.
    pub fn labels(&self) -> PlotLabels {
        let defaults = PlotLabels::default();
        PlotLabels {
            title: non_blank(self.title.as_deref()).unwrap_or(defaults.title),
            x_label: non_blank(self.x_label.as_deref()).unwrap_or(defaults.x_label),
            y_label: non_blank(self.y_label.as_deref()).unwrap_or(defaults.y_label),
        }
    }

    /// A missing or blank degree means `auto`.
    pub fn degree(&self) -> Result<DegreeSpec, AppError> {
        match non_blank(self.degree.as_deref()) {
            Some(d) => d.parse(),
            None => Ok(DegreeSpec::Auto),
        }
    }

    pub fn samples(&self) -> Result<SampleSet, AppError> {
        let method = self.method.as_deref().map(str::trim).unwrap_or("manual");
        if method.eq_ignore_ascii_case("file") {
            let file = self
                .file
                .as_ref()
                .ok_or_else(|| AppError::invalid("No file was uploaded."))?;
            return read_samples(&file.content_type, &file.bytes);
        }

        parse_manual(
            self.x_values.as_deref().unwrap_or_default(),
            self.y_values.as_deref().unwrap_or_default(),
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn malformed(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::invalid(format!("Could not read form data: {}", err.body_text()))
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(malformed)
}

/// Browsers send an empty, unnamed part when no file was chosen.
async fn read_file(field: Field<'_>) -> Result<Option<UploadedFile>, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field.bytes().await.map_err(malformed)?;

    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadedFile {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}
