//! Share link for opening the page on a phone.
//!
//! The page shows a QR code for its own URL. The image itself comes from a
//! third-party chart service; this module only builds the image URL.

use reqwest::Url;
use serde::Serialize;
use thiserror::Error;

/// Chart service that renders QR codes.
pub const QR_CHART_URL: &str = "https://chart.googleapis.com/chart";

/// Edge length of the QR image in pixels.
pub const DEFAULT_QR_SIZE: u32 = 180;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareError {
    #[error("invalid chart service URL: {0}")]
    InvalidChartUrl(String),

    #[error("page URL must not be empty")]
    EmptyPageUrl,
}

/// A page URL together with the QR image URL that encodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub url: String,
    pub qr_code_url: String,
    pub size: u32,
}

impl ShareLink {
    /// Build a share link for `page_url` using the default chart service and size.
    pub fn new(page_url: &str) -> Result<Self, ShareError> {
        Self::with_chart(QR_CHART_URL, page_url, DEFAULT_QR_SIZE)
    }

    pub fn with_chart(chart_url: &str, page_url: &str, size: u32) -> Result<Self, ShareError> {
        let qr = qr_code_url(chart_url, page_url, size)?;
        Ok(Self {
            url: page_url.to_string(),
            qr_code_url: qr.into(),
            size,
        })
    }
}

/// QR image URL for `value`, `size` x `size` pixels. The value is
/// percent-encoded into the `chl` parameter.
pub fn qr_code_url(chart_url: &str, value: &str, size: u32) -> Result<Url, ShareError> {
    if value.trim().is_empty() {
        return Err(ShareError::EmptyPageUrl);
    }

    let dimensions = format!("{}x{}", size, size);
    Url::parse_with_params(
        chart_url,
        &[("cht", "qr"), ("chs", dimensions.as_str()), ("chl", value)],
    )
    .map_err(|e| ShareError::InvalidChartUrl(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_code_url_encodes_value() {
        let url = qr_code_url(QR_CHART_URL, "https://mood.example.com/?a=1&b=2", 180).unwrap();

        assert_eq!(url.host_str(), Some("chart.googleapis.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("cht".to_string(), "qr".to_string()),
                ("chs".to_string(), "180x180".to_string()),
                ("chl".to_string(), "https://mood.example.com/?a=1&b=2".to_string()),
            ]
        );
        // The raw query must not leak the page URL's own separators.
        assert!(!url.as_str().contains("a=1&b=2"));
    }

    #[test]
    fn test_share_link_defaults() {
        let link = ShareLink::new("http://localhost:8080/").unwrap();
        assert_eq!(link.url, "http://localhost:8080/");
        assert_eq!(link.size, DEFAULT_QR_SIZE);
        assert!(link.qr_code_url.starts_with(QR_CHART_URL));
    }

    #[test]
    fn test_share_link_errors() {
        assert_eq!(ShareLink::new("  ").unwrap_err(), ShareError::EmptyPageUrl);
        assert!(matches!(
            ShareLink::with_chart("not a url", "http://x/", 100),
            Err(ShareError::InvalidChartUrl(_))
        ));
    }
}
