use std::fmt;

/// An action requested through the `action` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Report whether the cluster is running and its capacity.
    Probe,
    /// Resume a paused cluster with `select 1`, retrying while it wakes up.
    Warmup,
    /// Fixed greeting; never touches the database.
    Greet,
    /// Create the demo database and table and insert a first row.
    Init,
    /// Read every row of the demo table.
    Select,
    /// Insert two rows with one batch call.
    Batch,
    /// Insert two dependent rows inside one transaction.
    Transaction,
    /// Anything else; rendered as an explicit fallback page.
    Unknown(String),
}

impl Action {
    /// Every action the dispatcher serves, by primary wire name.
    pub const SUPPORTED: [&'static str; 7] = [
        "test",
        "warmup",
        "hi",
        "init",
        "select",
        "batch",
        "transaction",
    ];

    /// Parse the `action` query parameter. A missing action means [`Action::Greet`].
    pub fn parse(name: Option<&str>) -> Self {
        match name {
            None => Action::Greet,
            Some("test") | Some("probe") => Action::Probe,
            Some("warmup") => Action::Warmup,
            Some("hi") | Some("greet") => Action::Greet,
            Some("init") => Action::Init,
            Some("select") => Action::Select,
            Some("batch") => Action::Batch,
            Some("transaction") => Action::Transaction,
            Some(other) => Action::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Action::Probe => "test",
            Action::Warmup => "warmup",
            Action::Greet => "hi",
            Action::Init => "init",
            Action::Select => "select",
            Action::Batch => "batch",
            Action::Transaction => "transaction",
            Action::Unknown(name) => name,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One dispatch: the action plus the request path echoed back in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: Action,
    pub path: String,
}

impl ActionRequest {
    pub fn new(action: Action, path: impl Into<String>) -> Self {
        Self {
            action,
            path: path.into(),
        }
    }
}
