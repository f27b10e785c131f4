use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::error::{Result, ScrapeError};
use crate::parser::Document;

/// Single blocking GET with client defaults. Anything but 200 is a failure.
pub fn fetch(url: &str) -> Result<Document> {
    let request_err = |source| ScrapeError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .build()
        .map_err(request_err)?;

    info!("Fetching {}", url);
    let response = client.get(url).send().map_err(request_err)?;

    let status = response.status();
    if status != StatusCode::OK {
        warn!("{} answered {}", url, status);
        return Err(ScrapeError::Status {
            code: status.as_u16(),
            url: url.to_string(),
        });
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.bytes().map_err(request_err)?;
    let document = Document::new(final_url, body.to_vec()).with_content_type(content_type);
    info!(
        "Fetched {} bytes from {} ({})",
        document.bytes().len(),
        document.url(),
        document.encoding().name()
    );

    Ok(document)
}

// ── Tests ──
