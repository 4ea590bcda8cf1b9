use console::style;
use custmap_core::models::{FormErrors, FormField};
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Unknown customer ID
pub fn customer_not_found(id: &str) -> CliError {
    CliError::new(format!("Customer '{}' not found", id))
        .with_suggestion("List customers and their IDs: custmap customers --layout list")
}

/// `--set` argument that is not `field=value` or names no form field
pub fn invalid_field_assignment(assignment: &str, reason: impl fmt::Display) -> CliError {
    let fields: Vec<&str> = FormField::ALL.iter().map(FormField::as_str).collect();
    CliError::new(format!("Invalid field assignment '{}'", assignment))
        .with_context(reason.to_string())
        .with_suggestion(format!("Use FIELD=VALUE with one of: {}", fields.join(", ")))
        .with_help("Run: custmap edit --help")
}

/// Form failed validation; one line per field
pub fn validation_failed(errors: &FormErrors) -> CliError {
    let context = errors
        .iter()
        .map(|(field, message)| format!("  {}: {}", field.label(), message))
        .collect::<Vec<_>>()
        .join("\n");

    CliError::new("Customer form has errors")
        .with_context(context)
        .with_suggestion("Fill the fields with --set FIELD=VALUE or pick an address with --pick")
}

/// Reverse geocode failed outright
pub fn geocoder_failed() -> CliError {
    CliError::new("Geocoding service did not answer")
        .with_suggestion("Check network access to the configured geocoder: custmap config")
        .with_suggestion("Or use the built-in gazetteer: --offline")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_context_lists_fields() {
        let mut errors = FormErrors::new();
        errors.insert(FormField::Name, "Name is required");
        errors.insert(FormField::City, "City is required");

        let error = validation_failed(&errors);
        let context = error.context.unwrap();
        assert!(context.contains("Name is required"));
        assert_eq!(context.lines().count(), 2);
    }

    #[test]
    fn test_invalid_field_lists_choices() {
        let error = invalid_field_assignment("zip=1", "unknown field");
        assert!(error.suggestions[0].contains("postalCode"));
    }
}
