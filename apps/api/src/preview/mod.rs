//! Read-only preview of the résumé, derived from the aggregate plus the
//! experience draft that is still being typed.

pub mod handlers;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::form::skills::{badge_color, BadgeColor};
use crate::models::resume::{Experience, PersonalData, Resume};

const MONTHS_PT_BR: [&str; 12] = [
    "jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];

const CURRENT_JOB_LABEL: &str = "Atual";
const MISSING_PART: &str = "-";
const ROLE_PLACEHOLDER: &str = "Cargo não informado";
const COMPANY_PLACEHOLDER: &str = "Empresa não informada";
const START_HINT: &str = "Comece preenchendo o formulário ao lado para ver o preview em tempo real";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: &'static str,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalPreview {
    #[serde(flatten)]
    pub data: PersonalData,
    /// Profile link; bare handles are expanded to a full LinkedIn URL.
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillBadge {
    pub name: String,
    pub level: &'static str,
    pub color: BadgeColor,
    pub css_classes: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperienceCard {
    pub role: String,
    pub company: String,
    pub period: String,
    pub description: Option<String>,
    /// True for the draft that has not been committed yet ("Em edição").
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumePreview {
    pub personal: PersonalPreview,
    pub skills: Vec<SkillBadge>,
    pub experiences: Vec<ExperienceCard>,
    pub draft: Option<ExperienceCard>,
    pub skills_empty: Option<EmptyState>,
    pub experiences_empty: Option<EmptyState>,
}

/// `2023-01-15` → `jan. de 2023`. Empty or malformed dates render as "".
pub fn format_month_year(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => format!("{} de {}", MONTHS_PT_BR[d.month0() as usize], d.year()),
        Err(_) => String::new(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn linkedin_url(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else if value.starts_with("http://") || value.starts_with("https://") {
        Some(value.to_string())
    } else {
        Some(format!("https://www.linkedin.com/in/{value}"))
    }
}

fn committed_card(experience: &Experience) -> ExperienceCard {
    let end = if experience.current_job() {
        CURRENT_JOB_LABEL.to_string()
    } else {
        format_month_year(experience.end_date())
    };
    let period = format!("{} - {}", format_month_year(&experience.start_date), end);

    ExperienceCard {
        role: experience.role.clone(),
        company: experience.company.clone(),
        period: period.trim().to_string(),
        description: non_empty(&experience.description),
        editing: false,
    }
}

/// The draft card is only shown once a company or role has been typed.
fn draft_card(draft: &Experience) -> Option<ExperienceCard> {
    if draft.company.is_empty() && draft.role.is_empty() {
        return None;
    }

    let or_missing = |date: &str| {
        non_empty(&format_month_year(date)).unwrap_or_else(|| MISSING_PART.to_string())
    };
    let end = if draft.current_job() {
        CURRENT_JOB_LABEL.to_string()
    } else {
        or_missing(draft.end_date())
    };

    Some(ExperienceCard {
        role: non_empty(&draft.role).unwrap_or_else(|| ROLE_PLACEHOLDER.to_string()),
        company: non_empty(&draft.company).unwrap_or_else(|| COMPANY_PLACEHOLDER.to_string()),
        period: format!("{} - {}", or_missing(&draft.start_date), end),
        description: non_empty(&draft.description),
        editing: true,
    })
}

pub fn build_preview(resume: &Resume, draft: &Experience) -> ResumePreview {
    let draft = draft_card(draft);
    let has_draft = draft.is_some();

    let skills: Vec<SkillBadge> = resume
        .skills
        .iter()
        .map(|skill| {
            let color = badge_color(skill.level.label());
            SkillBadge {
                name: skill.name.clone(),
                level: skill.level.label(),
                color,
                css_classes: color.css_classes(),
            }
        })
        .collect();

    let experiences: Vec<ExperienceCard> = resume.experiences.iter().map(committed_card).collect();

    let empty = |is_empty: bool, title: &'static str| {
        (is_empty && !has_draft).then_some(EmptyState {
            title,
            hint: START_HINT,
        })
    };

    ResumePreview {
        personal: PersonalPreview {
            data: resume.personal.clone(),
            linkedin_url: linkedin_url(&resume.personal.linkedin),
        },
        skills_empty: empty(skills.is_empty(), "Nenhuma habilidade adicionada ainda"),
        experiences_empty: empty(experiences.is_empty(), "Nenhuma experiência adicionada ainda"),
        skills,
        experiences,
        draft,
    }
}
