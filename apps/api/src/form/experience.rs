//! Experience form: field rules, draft updates and commit.
//!
//! Every update is validated against the *prospective* record (the draft with
//! the update and its side effects applied), so cross-field rules never see a
//! stale end date or current-job flag.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::form::errors::{FieldErrors, FormField, FormValidation};
use crate::form::messages;
use crate::models::resume::{Experience, ExperienceRecord};

// ────────────────────────────────────────────────────────────────────────────
// Fields and updates
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceField {
    Company,
    Role,
    StartDate,
    EndDate,
    CurrentJob,
    Description,
}

impl ExperienceField {
    pub const ALL: [ExperienceField; 6] = [
        ExperienceField::Company,
        ExperienceField::Role,
        ExperienceField::StartDate,
        ExperienceField::EndDate,
        ExperienceField::CurrentJob,
        ExperienceField::Description,
    ];
}

impl FormField for ExperienceField {
    fn name(&self) -> &'static str {
        match self {
            ExperienceField::Company => "company",
            ExperienceField::Role => "role",
            ExperienceField::StartDate => "start_date",
            ExperienceField::EndDate => "end_date",
            ExperienceField::CurrentJob => "current_job",
            ExperienceField::Description => "description",
        }
    }
}

/// A single field change, as sent on every keystroke or toggle.
///
/// JSON: `{"field": "end_date", "value": "2023-01-01"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ExperienceUpdate {
    Company(String),
    Role(String),
    StartDate(String),
    EndDate(String),
    CurrentJob(bool),
    Description(String),
}

impl ExperienceUpdate {
    pub fn field(&self) -> ExperienceField {
        match self {
            ExperienceUpdate::Company(_) => ExperienceField::Company,
            ExperienceUpdate::Role(_) => ExperienceField::Role,
            ExperienceUpdate::StartDate(_) => ExperienceField::StartDate,
            ExperienceUpdate::EndDate(_) => ExperienceField::EndDate,
            ExperienceUpdate::CurrentJob(_) => ExperienceField::CurrentJob,
            ExperienceUpdate::Description(_) => ExperienceField::Description,
        }
    }

    /// Builds the next record. Checking "current job" drops the end date and a
    /// non-empty end date unchecks "current job", in the same update.
    pub fn apply_to(self, current: &Experience) -> Experience {
        let mut next = current.clone();
        match self {
            ExperienceUpdate::Company(value) => next.company = value,
            ExperienceUpdate::Role(value) => next.role = value,
            ExperienceUpdate::StartDate(value) => next.start_date = value,
            ExperienceUpdate::EndDate(value) => next.set_end_date(value),
            ExperienceUpdate::CurrentJob(value) => next.set_current_job(value),
            ExperienceUpdate::Description(value) => next.description = value,
        }
        next
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

/// Borrowed view over either representation of an experience.
struct Fields<'a> {
    company: &'a str,
    role: &'a str,
    start_date: &'a str,
    end_date: &'a str,
    current_job: bool,
}

impl<'a> From<&'a Experience> for Fields<'a> {
    fn from(experience: &'a Experience) -> Self {
        Fields {
            company: &experience.company,
            role: &experience.role,
            start_date: &experience.start_date,
            end_date: experience.end_date(),
            current_job: experience.current_job(),
        }
    }
}

impl<'a> From<&'a ExperienceRecord> for Fields<'a> {
    fn from(record: &'a ExperienceRecord) -> Self {
        Fields {
            company: &record.company,
            role: &record.role,
            start_date: &record.start_date,
            end_date: &record.end_date,
            current_job: record.current_job,
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn check_field(field: ExperienceField, fields: &Fields<'_>) -> Option<String> {
    match field {
        ExperienceField::Company => messages::required_min_chars(fields.company),
        ExperienceField::Role => messages::required_min_chars(fields.role),

        ExperienceField::StartDate => {
            if fields.start_date.is_empty() {
                return Some(messages::START_DATE_REQUIRED.to_string());
            }
            let Some(start) = parse_date(fields.start_date) else {
                return Some(messages::INVALID_DATE.to_string());
            };
            match parse_date(fields.end_date) {
                Some(end) if start > end => Some(messages::START_AFTER_END.to_string()),
                _ => None,
            }
        }

        ExperienceField::EndDate => {
            if fields.end_date.is_empty() {
                return None;
            }
            let Some(end) = parse_date(fields.end_date) else {
                return Some(messages::INVALID_DATE.to_string());
            };
            if matches!(parse_date(fields.start_date), Some(start) if end < start) {
                return Some(messages::END_BEFORE_START.to_string());
            }
            if fields.current_job {
                return Some(messages::END_DATE_WITH_CURRENT_JOB.to_string());
            }
            None
        }

        ExperienceField::CurrentJob => {
            if fields.current_job && !fields.end_date.is_empty() {
                Some(messages::CLEAR_END_DATE_FIRST.to_string())
            } else {
                None
            }
        }

        ExperienceField::Description => None,
    }
}

fn check_all(fields: &Fields<'_>) -> FormValidation<ExperienceField> {
    let errors = ExperienceField::ALL
        .into_iter()
        .filter_map(|field| check_field(field, fields).map(|msg| (field, msg)))
        .collect();
    FormValidation::from_errors(errors)
}

/// Validates one field of a full record. `None` means the field passes.
pub fn validate_field(field: ExperienceField, experience: &Experience) -> Option<String> {
    check_field(field, &Fields::from(experience))
}

/// Validates every field of a record.
pub fn validate_form(experience: &Experience) -> FormValidation<ExperienceField> {
    check_all(&Fields::from(experience))
}

/// Validates an untrusted flat record, where the end date and the current-job
/// flag may both be set.
pub fn validate_record(record: &ExperienceRecord) -> FormValidation<ExperienceField> {
    check_all(&Fields::from(record))
}

// ────────────────────────────────────────────────────────────────────────────
// Draft
// ────────────────────────────────────────────────────────────────────────────

/// The in-progress experience bound to the form, plus its current errors.
#[derive(Debug, Clone, Default)]
pub struct ExperienceDraft {
    record: Experience,
    errors: FieldErrors<ExperienceField>,
}

impl ExperienceDraft {
    pub fn record(&self) -> &Experience {
        &self.record
    }

    pub fn errors(&self) -> &FieldErrors<ExperienceField> {
        &self.errors
    }

    /// Applies one field change and re-validates only that field, against the
    /// prospective record. Returns the field's error, if any.
    pub fn apply(&mut self, update: ExperienceUpdate) -> Option<&str> {
        let field = update.field();
        let next = update.apply_to(&self.record);
        let outcome = validate_field(field, &next);

        self.record = next;
        self.errors.record(field, outcome);
        self.errors.get(field)
    }

    /// Whether the whole draft currently passes (enables the "add" action).
    pub fn can_commit(&self) -> bool {
        validate_form(&self.record).is_valid
    }

    /// Re-validates every field and, if all pass, appends the draft to
    /// `experiences` and resets the draft. On failure the list is untouched and
    /// the full error map is kept on the draft and returned.
    pub fn commit(
        &mut self,
        experiences: &mut Vec<Experience>,
    ) -> Result<usize, FieldErrors<ExperienceField>> {
        let validation = validate_form(&self.record);
        if !validation.is_valid {
            self.errors = validation.errors.clone();
            return Err(validation.errors);
        }

        experiences.push(std::mem::take(&mut self.record));
        self.errors.clear();
        Ok(experiences.len() - 1)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Tenure;

    fn acme_current() -> Experience {
        Experience {
            company: "Acme".to_string(),
            role: "Dev".to_string(),
            start_date: "2023-01-01".to_string(),
            tenure: Tenure::Ongoing,
            description: String::new(),
        }
    }

    fn fill(draft: &mut ExperienceDraft, updates: Vec<ExperienceUpdate>) {
        for update in updates {
            draft.apply(update);
        }
    }

    // ── single-field rules ──────────────────────────────────────────────────

    #[test]
    fn test_company_required_and_min_length() {
        let mut experience = acme_current();
        experience.company = String::new();
        assert_eq!(
            validate_field(ExperienceField::Company, &experience).as_deref(),
            Some(messages::REQUIRED)
        );
        experience.company = "A".to_string();
        assert_eq!(
            validate_field(ExperienceField::Company, &experience).as_deref(),
            Some(messages::MIN_TWO_CHARS)
        );
        experience.company = "AB".to_string();
        assert!(validate_field(ExperienceField::Company, &experience).is_none());
    }

    #[test]
    fn test_min_length_counts_characters_not_bytes() {
        let mut experience = acme_current();
        experience.role = "É".to_string();
        assert_eq!(
            validate_field(ExperienceField::Role, &experience).as_deref(),
            Some(messages::MIN_TWO_CHARS)
        );
    }

    #[test]
    fn test_start_date_required() {
        let mut experience = acme_current();
        experience.start_date = String::new();
        assert_eq!(
            validate_field(ExperienceField::StartDate, &experience).as_deref(),
            Some(messages::START_DATE_REQUIRED)
        );
    }

    #[test]
    fn test_malformed_date_reported_on_its_own_field() {
        let mut experience = acme_current();
        experience.start_date = "01/02/2023".to_string();
        experience.tenure = Tenure::EndedOn("2024-01-01".to_string());
        assert_eq!(
            validate_field(ExperienceField::StartDate, &experience).as_deref(),
            Some(messages::INVALID_DATE)
        );
        assert!(validate_field(ExperienceField::EndDate, &experience).is_none());
    }

    #[test]
    fn test_end_date_optional() {
        let mut experience = acme_current();
        experience.tenure = Tenure::Unspecified;
        assert!(validate_form(&experience).is_valid);
    }

    #[test]
    fn test_same_start_and_end_is_valid() {
        let mut experience = acme_current();
        experience.tenure = Tenure::EndedOn("2023-01-01".to_string());
        assert!(validate_form(&experience).is_valid);
    }

    #[test]
    fn test_reversed_dates_fail_whole_form() {
        let mut experience = acme_current();
        experience.start_date = "2024-01-01".to_string();
        experience.tenure = Tenure::EndedOn("2023-01-01".to_string());

        let validation = validate_form(&experience);
        assert!(!validation.is_valid);
        assert_eq!(
            validation.errors.get(ExperienceField::StartDate),
            Some(messages::START_AFTER_END)
        );
        assert_eq!(
            validation.errors.get(ExperienceField::EndDate),
            Some(messages::END_BEFORE_START)
        );
    }

    #[test]
    fn test_untrusted_record_with_end_date_and_current_job() {
        let record = ExperienceRecord {
            company: "Acme".to_string(),
            role: "Dev".to_string(),
            start_date: "2023-01-01".to_string(),
            end_date: "2023-12-31".to_string(),
            current_job: true,
            description: String::new(),
        };
        let validation = validate_record(&record);
        assert!(!validation.is_valid);
        assert_eq!(
            validation.errors.get(ExperienceField::CurrentJob),
            Some(messages::CLEAR_END_DATE_FIRST)
        );
        assert_eq!(
            validation.errors.get(ExperienceField::EndDate),
            Some(messages::END_DATE_WITH_CURRENT_JOB)
        );
    }

    // ── draft updates ───────────────────────────────────────────────────────

    #[test]
    fn test_update_deserializes_from_field_value_pair() {
        let update: ExperienceUpdate =
            serde_json::from_str(r#"{"field": "current_job", "value": true}"#).unwrap();
        assert_eq!(update, ExperienceUpdate::CurrentJob(true));

        let update: ExperienceUpdate =
            serde_json::from_str(r#"{"field": "start_date", "value": "2023-01-01"}"#).unwrap();
        assert_eq!(update.field(), ExperienceField::StartDate);
    }

    #[test]
    fn test_current_job_and_end_date_never_coexist() {
        let mut draft = ExperienceDraft::default();
        let sequence = vec![
            ExperienceUpdate::EndDate("2023-05-01".to_string()),
            ExperienceUpdate::CurrentJob(true),
            ExperienceUpdate::EndDate("2023-06-01".to_string()),
            ExperienceUpdate::CurrentJob(false),
            ExperienceUpdate::CurrentJob(true),
            ExperienceUpdate::EndDate(String::new()),
            ExperienceUpdate::EndDate("2024-01-01".to_string()),
        ];
        for update in sequence {
            draft.apply(update);
            let record = draft.record();
            assert!(!(record.current_job() && !record.end_date().is_empty()));
        }
    }

    #[test]
    fn test_end_date_always_unchecks_current_job() {
        for start_current in [false, true] {
            let mut draft = ExperienceDraft::default();
            draft.apply(ExperienceUpdate::CurrentJob(start_current));
            draft.apply(ExperienceUpdate::EndDate("2023-01-01".to_string()));
            assert!(!draft.record().current_job());
        }
    }

    #[test]
    fn test_field_validated_against_prospective_record() {
        let mut draft = ExperienceDraft::default();
        draft.apply(ExperienceUpdate::StartDate("2023-03-01".to_string()));
        let err = draft.apply(ExperienceUpdate::EndDate("2023-01-01".to_string()));
        assert_eq!(err, Some(messages::END_BEFORE_START));

        // Checking "current job" clears the end date, so the flag itself passes.
        assert_eq!(draft.apply(ExperienceUpdate::CurrentJob(true)), None);
        assert_eq!(draft.record().end_date(), "");
    }

    #[test]
    fn test_only_changed_field_is_revalidated() {
        let mut draft = ExperienceDraft::default();
        draft.apply(ExperienceUpdate::Company("A".to_string()));
        assert!(draft.errors().contains(ExperienceField::Company));
        assert!(!draft.errors().contains(ExperienceField::Role));

        draft.apply(ExperienceUpdate::Company("Acme".to_string()));
        assert!(draft.errors().is_empty());
    }

    // ── commit ──────────────────────────────────────────────────────────────

    #[test]
    fn test_commit_valid_draft_appends_and_resets() {
        let mut draft = ExperienceDraft::default();
        fill(
            &mut draft,
            vec![
                ExperienceUpdate::Company("Acme".to_string()),
                ExperienceUpdate::Role("Dev".to_string()),
                ExperienceUpdate::StartDate("2023-01-01".to_string()),
                ExperienceUpdate::EndDate(String::new()),
                ExperienceUpdate::CurrentJob(true),
            ],
        );
        assert!(draft.can_commit());

        let mut experiences = Vec::new();
        assert_eq!(draft.commit(&mut experiences), Ok(0));
        assert_eq!(experiences, vec![acme_current()]);
        assert_eq!(draft.record(), &Experience::default());
        assert!(draft.errors().is_empty());
    }

    #[test]
    fn test_commit_invalid_draft_is_blocked() {
        let mut draft = ExperienceDraft::default();
        fill(
            &mut draft,
            vec![
                ExperienceUpdate::Company("A".to_string()),
                ExperienceUpdate::Role(String::new()),
                ExperienceUpdate::StartDate("2023-01-01".to_string()),
            ],
        );
        assert!(!draft.can_commit());

        let mut experiences = vec![acme_current()];
        let errors = draft.commit(&mut experiences).unwrap_err();
        assert!(errors.contains(ExperienceField::Company));
        assert!(errors.contains(ExperienceField::Role));
        assert_eq!(experiences.len(), 1);
        assert_eq!(draft.record().company, "A");
        assert_eq!(draft.errors(), &errors);
    }

    #[test]
    fn test_commit_of_untouched_draft_reports_required_fields() {
        let mut draft = ExperienceDraft::default();
        let errors = draft.commit(&mut Vec::new()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(ExperienceField::StartDate));
    }
}
