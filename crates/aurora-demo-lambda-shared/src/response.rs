//! Outbound response for load balancer and API Gateway proxy integrations.

use std::collections::BTreeMap;

use http::StatusCode;
use serde::{Deserialize, Serialize};

use aurora_demo_lib::{Page, CONTENT_TYPE_HTML, PAGE_STATUS};

/// HTML page in the proxy integration response shape.
///
/// Every dispatcher outcome, failures included, is returned with status 200;
/// the error text lives in the body.
///
/// # Example
///
/// ```
/// use aurora_demo_lambda_shared::HtmlResponse;
///
/// let response = HtmlResponse::html("<html><body>Hi!</body></html>\n");
/// assert_eq!(response.status_code, 200);
/// assert_eq!(response.headers["Content-Type"], "text/html; charset=utf-8");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlResponse {
    pub status_code: u16,

    /// Required by ALB targets, ignored by API Gateway.
    pub status_description: String,

    pub headers: BTreeMap<String, String>,

    pub body: String,

    pub is_base64_encoded: bool,
}

impl HtmlResponse {
    /// A 200 response carrying `body` as HTML.
    pub fn html(body: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(PAGE_STATUS).unwrap_or(StatusCode::OK);
        Self {
            status_code: status.as_u16(),
            status_description: format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            ),
            headers: BTreeMap::from([("Content-Type".to_string(), CONTENT_TYPE_HTML.to_string())]),
            body: body.into(),
            is_base64_encoded: false,
        }
    }
}

impl From<Page> for HtmlResponse {
    fn from(page: Page) -> Self {
        Self::html(page.body)
    }
}
