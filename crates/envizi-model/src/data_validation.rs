use serde::{Deserialize, Serialize};

/// Error alert shown when a user types a value the rule rejects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorAlert {
    pub title: String,
    pub message: String,
}

/// A list-constrained data validation rule (an in-cell dropdown).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListValidation {
    /// Allowed values, in display order.
    pub options: Vec<String>,
    #[serde(default = "default_true")]
    pub in_cell_dropdown: bool,
    #[serde(default)]
    pub allow_blank: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_alert: Option<ValidationErrorAlert>,
}

fn default_true() -> bool {
    true
}

impl ListValidation {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            in_cell_dropdown: true,
            allow_blank: true,
            error_alert: None,
        }
    }

    pub fn with_error_alert(mut self, title: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_alert = Some(ValidationErrorAlert {
            title: title.into(),
            message: message.into(),
        });
        self
    }

    /// The list source in the form Excel stores it (`a,b,c`).
    pub fn source(&self) -> String {
        self.options.join(",")
    }

    /// Returns true if `candidate` is accepted by the rule.
    ///
    /// Matching is case-insensitive, as in Excel.
    pub fn accepts(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return self.allow_blank;
        }
        self.options
            .iter()
            .any(|opt| opt.to_lowercase() == candidate.to_lowercase())
    }
}
