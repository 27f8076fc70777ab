use crate::commands::Out;
use crate::Config;
use serde::Serialize;

/// The structured output of the `classify` command.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Classification {
    pub description: String,
    pub category: String,
    /// False when no keyword matched and the fallback category was used.
    pub matched: bool,
}

/// Shows which category a transaction description is assigned by the configured keywords.
pub fn classify(config: &Config, description: &str) -> Out<Classification> {
    let classifier = config.rules().classifier();
    let found = classifier.matched(description);
    let matched = found.is_some();
    let category = found.unwrap_or(classifier.fallback()).to_string();
    let message = if matched {
        format!("'{description}' is {category}")
    } else {
        format!("'{description}' is {category}, no keyword matched")
    };
    Out::new(
        message,
        Classification {
            description: description.to_string(),
            category,
            matched,
        },
    )
}
