use crate::config::TimelineConfig;
use crate::error::{ServiceError, ServiceResult};

/// Check user-supplied content against the configured length limit.
///
/// Length is counted in Unicode scalar values, so an emoji counts once. With
/// validation switched off every content passes.
pub fn validate_content(config: &TimelineConfig, content: &str) -> ServiceResult<()> {
    if !config.content_validation {
        return Ok(());
    }
    let length = content.chars().count();
    if length > config.max_content_chars {
        return Err(ServiceError::InvalidPayload {
            length,
            max: config.max_content_chars,
        });
    }
    Ok(())
}
