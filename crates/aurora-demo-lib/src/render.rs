//! HTML pages returned for every action.
//!
//! Every page is served with status 200 and [`CONTENT_TYPE_HTML`]; failures
//! are reported in the body, not through the status code.

use std::fmt;

use serde::Serialize;

use crate::action::Action;
use crate::client::ClusterStatus;
use crate::error::Result;

/// Content type of every rendered page.
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

/// Status code of every rendered page, errors included.
pub const PAGE_STATUS: u16 = 200;

/// A rendered HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub body: String,
}

impl Page {
    fn new(body: String) -> Self {
        Self { body }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

pub fn greeting(path: &str) -> Page {
    Page::new(format!(
        "<html><body>Hi! This is path {} </body></html>\n",
        escape(path)
    ))
}

pub fn status(path: &str, status: &ClusterStatus) -> Page {
    Page::new(format!(
        "<html><body>Hi! This is path {} STATUS: {} Capacity: {} </body></html>\n",
        escape(path),
        status.state(),
        status.capacity
    ))
}

/// Which noun introduces the JSON payload.
#[derive(Debug, Clone, Copy)]
pub enum Payload {
    Data,
    Response,
}

impl Payload {
    fn label(self) -> &'static str {
        match self {
            Payload::Data => "data",
            Payload::Response => "response",
        }
    }
}

/// Render a service result as pretty-printed JSON.
pub fn result<T: Serialize>(
    action: &Action,
    path: &str,
    payload: Payload,
    value: &T,
) -> Result<Page> {
    let json = serde_json::to_string_pretty(value)?;
    Ok(Page::new(format!(
        "<html><body>ACTION {} This is path {} here is your {} {}</body></html>\n",
        escape(action.name()),
        escape(path),
        payload.label(),
        escape(&json)
    )))
}

/// Render a warm-up that never got past link failures.
pub fn warmup_exhausted(path: &str, attempts: u32, last_error: &dyn fmt::Display) -> Page {
    Page::new(format!(
        "<html><body>ACTION warmup This is path {} cluster still unreachable after {} attempts: {}</body></html>\n",
        escape(path),
        attempts,
        escape(&last_error.to_string())
    ))
}

pub fn exception(path: &str, error: &dyn fmt::Display) -> Page {
    Page::new(format!(
        "<html><body>Exception {} You've hit {} </body></html>\n",
        escape(&error.to_string()),
        escape(path)
    ))
}

pub fn unknown_action(name: &str, path: &str) -> Page {
    Page::new(format!(
        "<html><body>Unknown action '{}' at path {}. Supported actions: {}</body></html>\n",
        escape(name),
        escape(path),
        Action::SUPPORTED.join(", ")
    ))
}

/// Escape text placed between HTML tags.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::ExecuteResult;

    #[test]
    fn greeting_echoes_path() {
        assert_eq!(
            greeting("/demo").body,
            "<html><body>Hi! This is path /demo </body></html>\n"
        );
    }

    #[test]
    fn status_page_shows_state_and_capacity() {
        let page = status("/", &ClusterStatus { capacity: 5 });
        assert!(page.contains("STATUS: UP"));
        assert!(page.contains("Capacity: 5"));
    }

    #[test]
    fn result_page_embeds_pretty_json() {
        let page = result(
            &Action::Select,
            "/",
            Payload::Data,
            &ExecuteResult::default(),
        )
        .unwrap();
        assert!(page.contains("ACTION select"));
        assert!(page.contains("here is your data {\n  \"numberOfRecordsUpdated\": 0\n}"));
    }

    #[test]
    fn echoed_text_is_escaped() {
        let page = unknown_action("<script>", "/a&b");
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("/a&amp;b"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn unknown_page_lists_actions() {
        let page = unknown_action("drop", "/");
        assert!(page.contains("Unknown action 'drop'"));
        assert!(page.contains("test, warmup, hi, init, select, batch, transaction"));
    }

    #[test]
    fn exception_page_mentions_path() {
        let page = exception("/x", &"boom");
        assert_eq!(
            page.body,
            "<html><body>Exception boom You've hit /x </body></html>\n"
        );
    }
}
