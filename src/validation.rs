//! URL classification and field validation
//!
//! Shared by the schema builders (fail-fast) and by snapshot resolution,
//! which downgrades failures to logged diagnostics.

use tracing::warn;
use url::Url;

use crate::error::SeoError;
use crate::vocab::MIN_OG_IMAGE_EDGE;

/// Classification of a URL-ish string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlKind {
    /// Empty string
    Empty,
    /// "http://..." or "https://..."
    Web,
    /// Any other scheme-qualified URL: "mailto:", "urn:", ...
    OtherScheme,
    /// Path or fragment without a scheme: "/page", "page", "#top"
    Relative,
}

/// Classify a URL string without fully parsing it
pub fn classify_url(url: &str) -> UrlKind {
    if url.is_empty() {
        UrlKind::Empty
    } else if url.starts_with("http://") || url.starts_with("https://") {
        UrlKind::Web
    } else if Url::parse(url).is_ok() {
        UrlKind::OtherScheme
    } else {
        UrlKind::Relative
    }
}

/// Check whether a string parses as an absolute URL
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Fail if a present (non-empty) value is not a valid URL
pub fn validate_url(url: Option<&str>, field: &str) -> Result<(), SeoError> {
    match url {
        Some(u) if !u.is_empty() && !is_valid_url(u) => Err(SeoError::InvalidUrl {
            field: field.to_string(),
            url: u.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Fail if a required string field is empty
pub fn validate_required(value: &str, field: &str) -> Result<(), SeoError> {
    if value.is_empty() {
        return Err(SeoError::MissingField(field.to_string()));
    }
    Ok(())
}

/// Validate a canonical URL
///
/// Canonical URLs must be absolute web URLs. Relative paths are rejected
/// instead of being passed through, so they never reach `og:url` either.
/// Returns `Ok(None)` for an empty value.
pub fn validate_canonical_url(url: &str) -> Result<Option<String>, SeoError> {
    match classify_url(url) {
        UrlKind::Empty => Ok(None),
        UrlKind::Web => match Url::parse(url) {
            Ok(_) => Ok(Some(url.to_string())),
            Err(_) => Err(SeoError::InvalidCanonical(url.to_string())),
        },
        UrlKind::OtherScheme | UrlKind::Relative => {
            Err(SeoError::RelativeCanonical(url.to_string()))
        }
    }
}

/// Resolve a possibly relative URL against a base
///
/// Absolute web URLs are returned as-is. Without a usable base the input
/// is returned unchanged.
pub fn ensure_absolute_url(url: &str, base_url: Option<&str>) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    if classify_url(url) == UrlKind::Web {
        return Some(url.to_string());
    }
    let joined = base_url
        .and_then(|base| Url::parse(base).ok())
        .and_then(|base| base.join(url).ok());
    match joined {
        Some(u) => Some(u.to_string()),
        None => Some(url.to_string()),
    }
}

/// Outcome of checking Open Graph image dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageDimensions {
    /// Width or height not given; nothing to check
    Unspecified,
    /// At least one dimension is not a number
    Invalid,
    /// Both dimensions parsed
    Valid { width: i64, height: i64 },
}

/// Check Open Graph image dimensions, warning about unusable values
///
/// Dimensions are parsed from their leading digits, so "1200px" reads as
/// 1200. Images below 200x200 are accepted with a warning.
pub fn validate_image_dimensions(width: Option<&str>, height: Option<&str>) -> ImageDimensions {
    let (width, height) = match (width, height) {
        (Some(w), Some(h)) if !w.is_empty() && !h.is_empty() => (w, h),
        _ => return ImageDimensions::Unspecified,
    };

    let (w, h) = match (parse_leading_int(width), parse_leading_int(height)) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            warn!(width, height, "Image dimensions must be valid numbers");
            return ImageDimensions::Invalid;
        }
    };

    if w < MIN_OG_IMAGE_EDGE || h < MIN_OG_IMAGE_EDGE {
        warn!(
            width = w,
            height = h,
            "Open Graph images should be at least 200x200px. Recommended: 1200x630px"
        );
    }

    ImageDimensions::Valid {
        width: w,
        height: h,
    }
}

/// Leading integer of `value`, with an optional sign ("-5", "+300px")
fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_url() {
        assert_eq!(classify_url(""), UrlKind::Empty);
        assert_eq!(classify_url("https://example.com"), UrlKind::Web);
        assert_eq!(classify_url("http://example.com/a"), UrlKind::Web);
        assert_eq!(classify_url("mailto:hi@example.com"), UrlKind::OtherScheme);
        assert_eq!(classify_url("/relative/path"), UrlKind::Relative);
        assert_eq!(classify_url("page.html"), UrlKind::Relative);
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url(Some("https://example.com"), "url").is_ok());
        assert!(validate_url(None, "url").is_ok());
        assert!(validate_url(Some(""), "url").is_ok());

        let err = validate_url(Some("not-a-valid-url"), "url").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid url: \"not-a-valid-url\". Must be a valid URL."
        );
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("x", "name").is_ok());
        let err = validate_required("", "name").unwrap_err();
        assert_eq!(err.to_string(), "Required field \"name\" is missing.");
    }

    #[test]
    fn test_validate_canonical_url() {
        assert_eq!(
            validate_canonical_url("https://example.com/page").unwrap(),
            Some("https://example.com/page".to_string())
        );
        assert_eq!(validate_canonical_url("").unwrap(), None);

        let err = validate_canonical_url("/relative/path").unwrap_err();
        assert!(matches!(err, SeoError::RelativeCanonical(_)));
        assert!(err.to_string().contains("must be absolute"));

        assert!(matches!(
            validate_canonical_url("https://"),
            Err(SeoError::InvalidCanonical(_))
        ));
    }

    #[test]
    fn test_ensure_absolute_url() {
        assert_eq!(
            ensure_absolute_url("https://a.com/x", None),
            Some("https://a.com/x".to_string())
        );
        assert_eq!(
            ensure_absolute_url("/x", Some("https://a.com/blog/")),
            Some("https://a.com/x".to_string())
        );
        assert_eq!(ensure_absolute_url("x", None), Some("x".to_string()));
        assert_eq!(ensure_absolute_url("", Some("https://a.com")), None);
    }

    #[test]
    fn test_validate_image_dimensions() {
        assert_eq!(
            validate_image_dimensions(None, Some("630")),
            ImageDimensions::Unspecified
        );
        assert_eq!(
            validate_image_dimensions(Some("1200"), Some("630")),
            ImageDimensions::Valid {
                width: 1200,
                height: 630
            }
        );
        assert_eq!(
            validate_image_dimensions(Some("1200px"), Some("100")),
            ImageDimensions::Valid {
                width: 1200,
                height: 100
            }
        );
        assert_eq!(
            validate_image_dimensions(Some("wide"), Some("630")),
            ImageDimensions::Invalid
        );
    }

    #[test]
    fn test_signed_image_dimensions() {
        assert_eq!(
            validate_image_dimensions(Some("-5"), Some("+300")),
            ImageDimensions::Valid {
                width: -5,
                height: 300
            }
        );
        assert_eq!(parse_leading_int(" -12px"), Some(-12));
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("+x"), None);
    }
}
