//! Inbound event for the dispatcher Lambda.
//!
//! Accepts the proxy event shape shared by Application Load Balancer targets
//! and API Gateway REST integrations. Only the path and the `action` query
//! parameter are read; every other field is ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use aurora_demo_lib::{Action, ActionRequest};

/// Query parameter selecting the action.
pub const ACTION_PARAMETER: &str = "action";

/// HTTP-shaped invocation event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    /// Request path, echoed back in the page.
    #[serde(default)]
    pub path: String,

    /// Single-value query parameters (`null` when the URL has none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<HashMap<String, String>>,

    /// Multi-value query parameters, sent by ALB targets with multi-value headers enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_query_string_parameters: Option<HashMap<String, Vec<String>>>,
}

impl DispatchRequest {
    /// Build an event for `path` with an optional action.
    pub fn new(path: impl Into<String>, action: Option<&str>) -> Self {
        Self {
            path: path.into(),
            query_string_parameters: action.map(|action| {
                HashMap::from([(ACTION_PARAMETER.to_string(), action.to_string())])
            }),
            multi_value_query_string_parameters: None,
        }
    }

    /// The raw `action` parameter; the last value wins for multi-value events.
    pub fn action_name(&self) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(ACTION_PARAMETER))
            .map(String::as_str)
            .or_else(|| {
                self.multi_value_query_string_parameters
                    .as_ref()
                    .and_then(|params| params.get(ACTION_PARAMETER))
                    .and_then(|values| values.last())
                    .map(String::as_str)
            })
    }

    pub fn action(&self) -> Action {
        Action::parse(self.action_name())
    }

    pub fn to_action_request(&self) -> ActionRequest {
        ActionRequest::new(self.action(), self.path.clone())
    }
}
