use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::{Skill, SkillLevel};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillError {
    #[error("Informe o nome da habilidade")]
    BlankName,
}

/// Appends a skill. The only rule is a non-blank name; the name is stored as
/// typed.
pub fn add_skill(
    skills: &mut Vec<Skill>,
    name: String,
    level: SkillLevel,
) -> Result<(), SkillError> {
    if name.trim().is_empty() {
        return Err(SkillError::BlankName);
    }
    skills.push(Skill { name, level });
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Level badges
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeColor {
    Gray,
    Green,
    Blue,
}

impl BadgeColor {
    /// Background/text class pair used by the preview.
    pub fn css_classes(&self) -> &'static str {
        match self {
            BadgeColor::Gray => "bg-gray-200 text-gray-700",
            BadgeColor::Green => "bg-green-200 text-green-700",
            BadgeColor::Blue => "bg-blue-200 text-blue-700",
        }
    }
}

/// Badge colour for a level label. Unknown labels fall back to gray.
pub fn badge_color(label: &str) -> BadgeColor {
    match SkillLevel::from_label(label) {
        Some(SkillLevel::Intermediario) => BadgeColor::Green,
        Some(SkillLevel::Avancado) => BadgeColor::Blue,
        Some(SkillLevel::Basico) | None => BadgeColor::Gray,
    }
}
