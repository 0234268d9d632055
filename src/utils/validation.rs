use crate::utils::error::{Result, TrackerError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> TrackerError {
    TrackerError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 只接受 http / https
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(invalid(field_name, url_str, "URL is required"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("not a valid URL ({})", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            url_str,
            format!("scheme `{}` is not supported, use http or https", url.scheme()),
        ));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    match value.trim() {
        "" => Err(invalid(field_name, value, "must not be blank")),
        _ => Ok(()),
    }
}

pub fn validate_range<T>(field_name: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            field_name,
            value,
            format!("expected {}..={}", min, max),
        ))
    }
}
