use alloc::string::String;
use alloc::vec::Vec;

use crate::operation::Operation;

/// A named history: the initial contents of the pending queue.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Short lookup key, e.g. `serial`.
    pub key: String,
    /// Optional human readable title.
    pub title: Option<String>,
    pub operations: Vec<Operation>,
}

impl Scenario {
    pub fn new(key: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            key: key.into(),
            title: None,
            operations,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The title if present, otherwise the key.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_key() {
        let scenario = Scenario::new("serial", vec![Operation::commit(1)]);
        assert_eq!(scenario.display_name(), "serial");
        let titled = scenario.with_title("Simple serial execution");
        assert_eq!(titled.display_name(), "Simple serial execution");
    }
}
