// The single editing session the service holds: the résumé aggregate plus
// the form state bound to it. Lives behind `AppState::workspace`.

use crate::form::experience::{ExperienceDraft, ExperienceField, ExperienceUpdate};
use crate::form::errors::FieldErrors;
use crate::form::personal::{PersonalField, PersonalForm, PersonalUpdate};
use crate::form::remove_at;
use crate::form::skills::{add_skill, SkillError};
use crate::models::resume::{Experience, Resume, Skill, SkillLevel};

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub resume: Resume,
    pub personal_form: PersonalForm,
    pub experience_draft: ExperienceDraft,
}

impl Workspace {
    /// Applies one personal-data change; the value is stored even if invalid.
    pub fn update_personal(&mut self, update: PersonalUpdate) -> &FieldErrors<PersonalField> {
        self.personal_form.apply(&mut self.resume.personal, update);
        self.personal_form.errors()
    }

    /// Runs every personal rule, as when the form is first opened.
    pub fn validate_personal(&mut self) -> &FieldErrors<PersonalField> {
        self.personal_form.validate_all(&self.resume.personal)
    }

    pub fn update_draft(&mut self, update: ExperienceUpdate) -> &FieldErrors<ExperienceField> {
        self.experience_draft.apply(update);
        self.experience_draft.errors()
    }

    /// Moves the draft into the experience list if it validates.
    pub fn commit_draft(&mut self) -> Result<usize, FieldErrors<ExperienceField>> {
        self.experience_draft.commit(&mut self.resume.experiences)
    }

    pub fn remove_experience(&mut self, index: usize) -> Option<Experience> {
        remove_at(&mut self.resume.experiences, index)
    }

    pub fn add_skill(&mut self, name: String, level: SkillLevel) -> Result<(), SkillError> {
        add_skill(&mut self.resume.skills, name, level)
    }

    pub fn remove_skill(&mut self, index: usize) -> Option<Skill> {
        remove_at(&mut self.resume.skills, index)
    }
}
