use voting_errors::AppError;

const MAX_URL_LENGTH: usize = 2048;
pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

pub struct InputSanitizer;

impl InputSanitizer {
    /// Trims and checks a required text field. Length is counted in characters.
    pub fn required_text(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
        let value = value.trim();

        if value.is_empty() {
            return Err(AppError::validation(format!("{field} is required")));
        }

        if value.chars().count() > max_len {
            return Err(AppError::validation(format!(
                "{field} must be at most {max_len} characters"
            )));
        }

        Ok(value.to_string())
    }

    pub fn title(value: &str) -> Result<String, AppError> {
        Self::required_text("Title", value, MAX_TITLE_LENGTH)
    }

    pub fn description(value: &str) -> Result<String, AppError> {
        Self::required_text("Description", value, MAX_DESCRIPTION_LENGTH)
    }

    /// Absolute http(s) URL with a host.
    pub fn validate_url(field: &str, url: &str) -> Result<String, AppError> {
        let url = url.trim();

        if url.is_empty() {
            return Err(AppError::validation(format!("{field} is required")));
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(AppError::validation(format!("{field} is too long")));
        }

        let parsed = url::Url::parse(url)
            .map_err(|_| AppError::validation(format!("{field} is not a valid URL")))?;

        let scheme = parsed.scheme().to_lowercase();
        if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
            return Err(AppError::validation(format!(
                "{field} must use http or https"
            )));
        }

        if parsed.host_str().is_none() {
            return Err(AppError::validation(format!("{field} must have a host")));
        }

        Ok(parsed.to_string())
    }

    /// Thumbnails may also point at an asset served by this site.
    pub fn thumbnail_url(url: &str) -> Result<String, AppError> {
        let trimmed = url.trim();
        if trimmed.starts_with('/') && !trimmed.starts_with("//") {
            if trimmed.len() > MAX_URL_LENGTH {
                return Err(AppError::validation("Thumbnail URL is too long"));
            }
            return Ok(trimmed.to_string());
        }
        Self::validate_url("Thumbnail URL", trimmed)
    }

    /// Blank means "no URL".
    pub fn published_url(url: Option<&str>) -> Result<Option<String>, AppError> {
        match url.map(str::trim) {
            None | Some("") => Ok(None),
            Some(url) => Self::validate_url("Published URL", url).map(Some),
        }
    }
}
