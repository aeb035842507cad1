//! Personal data form: field rules and in-place updates.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::form::errors::{FieldErrors, FormField, FormValidation};
use crate::form::messages;
use crate::models::resume::PersonalData;

/// Upper bound enforced by the summary textarea.
pub const SUMMARY_MAX_CHARS: usize = 500;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,11}$").expect("valid phone regex"));

static LINKEDIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?linkedin\.com/.+$").expect("valid linkedin regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalField {
    Name,
    Email,
    Phone,
    Linkedin,
    Summary,
}

impl PersonalField {
    pub const ALL: [PersonalField; 5] = [
        PersonalField::Name,
        PersonalField::Email,
        PersonalField::Phone,
        PersonalField::Linkedin,
        PersonalField::Summary,
    ];

    fn value_of(self, data: &PersonalData) -> &str {
        match self {
            PersonalField::Name => &data.name,
            PersonalField::Email => &data.email,
            PersonalField::Phone => &data.phone,
            PersonalField::Linkedin => &data.linkedin,
            PersonalField::Summary => &data.summary,
        }
    }

    fn slot(self, data: &mut PersonalData) -> &mut String {
        match self {
            PersonalField::Name => &mut data.name,
            PersonalField::Email => &mut data.email,
            PersonalField::Phone => &mut data.phone,
            PersonalField::Linkedin => &mut data.linkedin,
            PersonalField::Summary => &mut data.summary,
        }
    }
}

impl FormField for PersonalField {
    fn name(&self) -> &'static str {
        match self {
            PersonalField::Name => "name",
            PersonalField::Email => "email",
            PersonalField::Phone => "phone",
            PersonalField::Linkedin => "linkedin",
            PersonalField::Summary => "summary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonalUpdate {
    pub field: PersonalField,
    pub value: String,
}

/// Validates one field. Personal rules are single-field, but the full record
/// is taken so every form shares the same contract.
pub fn validate_field(field: PersonalField, data: &PersonalData) -> Option<String> {
    let value = field.value_of(data);
    match field {
        PersonalField::Name => messages::required_min_chars(value),
        PersonalField::Email => {
            required_matching(value, &EMAIL_RE, messages::REQUIRED, messages::INVALID_EMAIL)
        }
        PersonalField::Phone => {
            required_matching(value, &PHONE_RE, messages::REQUIRED, messages::INVALID_PHONE)
        }
        PersonalField::Linkedin => required_matching(
            value,
            &LINKEDIN_RE,
            messages::LINKEDIN_REQUIRED,
            messages::INVALID_URL,
        ),
        PersonalField::Summary => {
            if value.is_empty() {
                Some(messages::SUMMARY_REQUIRED.to_string())
            } else if value.chars().count() > SUMMARY_MAX_CHARS {
                Some(messages::SUMMARY_TOO_LONG.to_string())
            } else {
                None
            }
        }
    }
}

fn required_matching(
    value: &str,
    pattern: &Regex,
    missing: &str,
    mismatch: &str,
) -> Option<String> {
    if value.is_empty() {
        Some(missing.to_string())
    } else if !pattern.is_match(value) {
        Some(mismatch.to_string())
    } else {
        None
    }
}

pub fn validate_form(data: &PersonalData) -> FormValidation<PersonalField> {
    let errors = PersonalField::ALL
        .into_iter()
        .filter_map(|field| validate_field(field, data).map(|msg| (field, msg)))
        .collect();
    FormValidation::from_errors(errors)
}

/// Error state of the personal form. The data itself lives in the résumé and
/// is passed in by reference.
#[derive(Debug, Clone, Default)]
pub struct PersonalForm {
    errors: FieldErrors<PersonalField>,
}

impl PersonalForm {
    pub fn errors(&self) -> &FieldErrors<PersonalField> {
        &self.errors
    }

    /// Writes the new value (always, even when it fails) and re-validates that
    /// field against the updated record.
    pub fn apply(&mut self, data: &mut PersonalData, update: PersonalUpdate) -> Option<&str> {
        let field = update.field;
        *field.slot(data) = update.value;
        self.errors.record(field, validate_field(field, data));
        self.errors.get(field)
    }

    /// Full validation, run when the form is first shown.
    pub fn validate_all(&mut self, data: &PersonalData) -> &FieldErrors<PersonalField> {
        self.errors = validate_form(data).errors;
        &self.errors
    }
}
