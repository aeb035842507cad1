use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Personal data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// How a job ends. Replaces the `current_job` flag + `end_date` pair so the two
/// can never be set at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Tenure {
    /// No end date yet and not marked as the current job.
    #[default]
    Unspecified,
    /// Current job.
    Ongoing,
    /// Ended on the given `YYYY-MM-DD` date. Never empty.
    EndedOn(String),
}

impl Tenure {
    pub fn end_date(&self) -> Option<&str> {
        match self {
            Tenure::EndedOn(date) => Some(date),
            _ => None,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        matches!(self, Tenure::Ongoing)
    }
}

/// A single work experience entry.
///
/// On the wire it is flattened to [`ExperienceRecord`], the shape the form uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ExperienceRecord", try_from = "ExperienceRecord")]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub tenure: Tenure,
    pub description: String,
}

impl Experience {
    /// The end date as the form shows it (empty when absent).
    pub fn end_date(&self) -> &str {
        self.tenure.end_date().unwrap_or("")
    }

    pub fn current_job(&self) -> bool {
        self.tenure.is_ongoing()
    }

    /// A non-empty end date ends the job and clears the current-job flag.
    /// Clearing the end date leaves an ongoing job ongoing.
    pub fn set_end_date(&mut self, end_date: String) {
        if !end_date.is_empty() {
            self.tenure = Tenure::EndedOn(end_date);
        } else if matches!(self.tenure, Tenure::EndedOn(_)) {
            self.tenure = Tenure::Unspecified;
        }
    }

    /// Marking the job as current drops any end date.
    pub fn set_current_job(&mut self, current: bool) {
        if current {
            self.tenure = Tenure::Ongoing;
        } else if self.tenure.is_ongoing() {
            self.tenure = Tenure::Unspecified;
        }
    }
}

/// Flat form representation of an [`Experience`].
///
/// Untrusted input arrives in this shape, so `end_date` and `current_job` may
/// both be set here; converting to [`Experience`] rejects that combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceRecord {
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub current_job: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("an experience cannot be the current job and have an end date ({end_date})")]
pub struct TenureConflict {
    pub end_date: String,
}

impl From<Experience> for ExperienceRecord {
    fn from(experience: Experience) -> Self {
        let current_job = experience.current_job();
        let end_date = experience.end_date().to_string();
        ExperienceRecord {
            company: experience.company,
            role: experience.role,
            start_date: experience.start_date,
            end_date,
            current_job,
            description: experience.description,
        }
    }
}

impl TryFrom<ExperienceRecord> for Experience {
    type Error = TenureConflict;

    fn try_from(record: ExperienceRecord) -> Result<Self, Self::Error> {
        let tenure = match (record.current_job, record.end_date.is_empty()) {
            (true, false) => {
                return Err(TenureConflict {
                    end_date: record.end_date,
                })
            }
            (true, true) => Tenure::Ongoing,
            (false, true) => Tenure::Unspecified,
            (false, false) => Tenure::EndedOn(record.end_date),
        };

        Ok(Experience {
            company: record.company,
            role: record.role,
            start_date: record.start_date,
            tenure,
            description: record.description,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    #[default]
    #[serde(rename = "Básico")]
    Basico,
    #[serde(rename = "Intermediário")]
    Intermediario,
    #[serde(rename = "Avançado")]
    Avancado,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [
        SkillLevel::Basico,
        SkillLevel::Intermediario,
        SkillLevel::Avancado,
    ];

    /// The label shown in the level selector and on the preview badge.
    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Basico => "Básico",
            SkillLevel::Intermediario => "Intermediário",
            SkillLevel::Avancado => "Avançado",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: SkillLevel,
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregate
// ────────────────────────────────────────────────────────────────────────────

/// The whole résumé. Insertion order of skills and experiences is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    pub personal: PersonalData,
    pub skills: Vec<Skill>,
    pub experiences: Vec<Experience>,
}
