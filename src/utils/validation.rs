use crate::utils::error::{Result, TeamError};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const SUPPORTED_FORMATS: [&str; 2] = ["json", "csv"];

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TeamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TeamError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TeamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(TeamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TeamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Formats must be known and listed at most once.
pub fn validate_formats(field_name: &str, formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Err(TeamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for format in formats {
        if !SUPPORTED_FORMATS.contains(&format.as_str()) {
            return Err(TeamError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    SUPPORTED_FORMATS.join(", ")
                ),
            });
        }
        if !seen.insert(format.as_str()) {
            return Err(TeamError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: "Format listed more than once".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| TeamError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TeamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TeamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Checks a registrant source: endpoints must be http(s) URLs, files must be
/// non-empty paths.
pub fn validate_source(source: &crate::adapters::RegistrantSource) -> Result<()> {
    use crate::adapters::RegistrantSource;

    match source {
        RegistrantSource::Api {
            endpoint,
            timeout_seconds,
            ..
        } => {
            validate_url("source.endpoint", endpoint)?;
            if let Some(seconds) = timeout_seconds {
                validate_range("source.timeout_seconds", *seconds, 1, 600)?;
            }
            Ok(())
        }
        RegistrantSource::Json { path } | RegistrantSource::Csv { path } => {
            validate_path("source.path", path)
        }
    }
}
