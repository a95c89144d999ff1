//! Declarative form validation
//!
//! A [`FormSchema`] is an ordered list of [`FieldRule`]s, each naming a
//! field and the constraints its raw text value must satisfy. Forms expose
//! their values by field name through the [`Form`] trait, so checking never
//! depends on how the values were collected (CLI flags, prompts, tests).
//!
//! Only the first failing constraint of each field is reported.

pub mod forms;

use std::fmt;

use crate::models::dates::parse_flexible;
use crate::models::Money;

pub use forms::{
    AccountForm, AddFundsForm, BudgetForm, GoalForm, ProfileForm, TransactionForm, TransferForm,
};

/// A single check applied to a field's raw value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Value must be present and non-blank
    Required { message: &'static str },
    /// At least this many characters after trimming
    MinChars(usize),
    /// A money amount greater than zero
    Positive,
    /// A money amount of any sign
    Numeric,
    Email,
    /// One of a fixed set of values (case-insensitive)
    OneOf(&'static [&'static str]),
    /// A calendar date (`YYYY-MM-DD`)
    Date,
    /// Must differ from another field's value
    DifferentFrom {
        field: &'static str,
        message: &'static str,
    },
    /// A date not earlier than another date field
    NotBefore {
        field: &'static str,
        message: &'static str,
    },
}

/// Constraints for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub label: &'static str,
    pub optional: bool,
    pub constraints: Vec<Constraint>,
}

impl FieldRule {
    pub fn new(field: &'static str, label: &'static str) -> Self {
        Self {
            field,
            label,
            optional: false,
            constraints: Vec::new(),
        }
    }

    /// Skip every constraint when the value is blank
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn required(self, message: &'static str) -> Self {
        self.with(Constraint::Required { message })
    }

    pub fn min_chars(self, n: usize) -> Self {
        self.with(Constraint::MinChars(n))
    }

    pub fn positive(self) -> Self {
        self.with(Constraint::Positive)
    }

    pub fn numeric(self) -> Self {
        self.with(Constraint::Numeric)
    }

    pub fn email(self) -> Self {
        self.with(Constraint::Email)
    }

    pub fn one_of(self, allowed: &'static [&'static str]) -> Self {
        self.with(Constraint::OneOf(allowed))
    }

    pub fn date(self) -> Self {
        self.with(Constraint::Date)
    }

    pub fn different_from(self, field: &'static str, message: &'static str) -> Self {
        self.with(Constraint::DifferentFrom { field, message })
    }

    pub fn not_before(self, field: &'static str, message: &'static str) -> Self {
        self.with(Constraint::NotBefore { field, message })
    }

    fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn check<F: Form + ?Sized>(&self, form: &F) -> Option<String> {
        let raw = form.field(self.field);
        let value = raw.as_deref().map(str::trim).unwrap_or("");

        if value.is_empty() && self.optional {
            return None;
        }

        self.constraints
            .iter()
            .find_map(|constraint| self.violation(constraint, value, form))
    }

    fn violation<F: Form + ?Sized>(
        &self,
        constraint: &Constraint,
        value: &str,
        form: &F,
    ) -> Option<String> {
        let label = self.label;
        match constraint {
            Constraint::Required { message } => value.is_empty().then(|| message.to_string()),
            Constraint::MinChars(n) => (value.chars().count() < *n)
                .then(|| format!("{label} must be at least {n} characters.")),
            Constraint::Positive => match Money::parse(value) {
                Ok(amount) if amount.is_positive() => None,
                Ok(_) => Some(format!("{label} must be positive.")),
                Err(_) if value.is_empty() => Some(format!("{label} must be positive.")),
                Err(_) => Some(format!("{label} must be a number.")),
            },
            Constraint::Numeric => (!value.is_empty() && Money::parse(value).is_err())
                .then(|| format!("{label} must be a number.")),
            Constraint::Email => {
                (!is_email(value)).then(|| "Please enter a valid email.".to_string())
            }
            Constraint::OneOf(allowed) => {
                let ok = allowed.iter().any(|a| a.eq_ignore_ascii_case(value));
                (!ok).then(|| format!("{label} must be one of: {}.", allowed.join(", ")))
            }
            Constraint::Date => parse_flexible(value)
                .is_none()
                .then(|| format!("{label} must be a date (YYYY-MM-DD).")),
            Constraint::DifferentFrom { field, message } => {
                let other = form.field(field).unwrap_or_default();
                let other = other.trim();
                (!value.is_empty() && !other.is_empty() && value.eq_ignore_ascii_case(other))
                    .then(|| message.to_string())
            }
            Constraint::NotBefore { field, message } => {
                let other = form.field(field).and_then(|v| parse_flexible(&v));
                match (parse_flexible(value), other) {
                    (Some(this), Some(other)) if this < other => Some(message.to_string()),
                    _ => None,
                }
            }
        }
    }
}

/// Minimal structural email check: `local@domain.tld`, no whitespace
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Ordered field rules for one form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSchema {
    rules: Vec<FieldRule>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Check every rule; all failures are collected
    pub fn check<F: Form + ?Sized>(&self, form: &F) -> Result<(), ValidationErrors> {
        let errors: Vec<FieldError> = self
            .rules
            .iter()
            .filter_map(|rule| {
                rule.check(form).map(|message| FieldError {
                    field: rule.field,
                    message,
                })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

/// A form whose raw values can be looked up by field name
pub trait Form {
    fn schema() -> FormSchema
    where
        Self: Sized;

    /// Raw value of a field; `None` when unset
    fn field(&self, name: &str) -> Option<String>;

    fn validate(&self) -> Result<(), ValidationErrors>
    where
        Self: Sized,
    {
        Self::schema().check(self)
    }
}

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All rejected fields of a form, in schema order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// A single-field error raised after the form itself passed
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field,
                message: message.into(),
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for a field, if it failed
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapForm(HashMap<&'static str, &'static str>);

    impl Form for MapForm {
        fn schema() -> FormSchema {
            FormSchema::new()
                .field(FieldRule::new("name", "Name").min_chars(2))
                .field(FieldRule::new("amount", "Amount").positive())
                .field(FieldRule::new("kind", "Kind").one_of(&["a", "b"]))
                .field(FieldRule::new("email", "Email").optional().email())
                .field(FieldRule::new("start", "Start date").date())
                .field(
                    FieldRule::new("end", "End date")
                        .date()
                        .not_before("start", "End date must be on or after the start date."),
                )
        }

        fn field(&self, name: &str) -> Option<String> {
            self.0.get(name).map(|v| v.to_string())
        }
    }

    fn form(pairs: &[(&'static str, &'static str)]) -> MapForm {
        MapForm(pairs.iter().copied().collect())
    }

    fn valid() -> Vec<(&'static str, &'static str)> {
        vec![
            ("name", "Rent"),
            ("amount", "12.50"),
            ("kind", "A"),
            ("start", "2025-01-01"),
            ("end", "2025-01-31"),
        ]
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(form(&valid()).validate().is_ok());
    }

    #[test]
    fn test_collects_every_failing_field() {
        let errors = form(&[("name", "R"), ("amount", "0"), ("kind", "c")])
            .validate()
            .unwrap_err();
        assert_eq!(errors.get("name"), Some("Name must be at least 2 characters."));
        assert_eq!(errors.get("amount"), Some("Amount must be positive."));
        assert_eq!(errors.get("kind"), Some("Kind must be one of: a, b."));
        assert!(errors.get("start").is_some());
        assert!(errors.get("email").is_none());
    }

    #[test]
    fn test_non_numeric_amount() {
        let mut pairs = valid();
        pairs[1] = ("amount", "ten");
        let errors = form(&pairs).validate().unwrap_err();
        assert_eq!(errors.get("amount"), Some("Amount must be a number."));
    }

    #[test]
    fn test_optional_field_checked_when_present() {
        let mut pairs = valid();
        pairs.push(("email", "not-an-email"));
        let errors = form(&pairs).validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Please enter a valid email."));
    }

    #[test]
    fn test_not_before() {
        let mut pairs = valid();
        pairs[4] = ("end", "2024-12-31");
        let errors = form(&pairs).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("end"),
            Some("End date must be on or after the start date.")
        );
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_email("dana@example.com"));
        assert!(!is_email("dana@example"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("dana @example.com"));
        assert!(!is_email("dana@@example.com"));
    }

    #[test]
    fn test_display_lists_fields() {
        let errors = ValidationErrors::single("to_account", "Pick another account");
        assert_eq!(errors.to_string(), "to_account: Pick another account");
    }
}
