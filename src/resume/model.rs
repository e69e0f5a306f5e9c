//! Résumé data as collected by the builder form.
//!
//! Field names serialize in camelCase so documents saved by the builder load
//! unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visual template a résumé is rendered with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Modern,
    Classic,
    Minimal,
}

impl TemplateKind {
    /// All templates in display order
    pub fn all() -> [TemplateKind; 3] {
        [TemplateKind::Modern, TemplateKind::Classic, TemplateKind::Minimal]
    }

    /// Lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            TemplateKind::Modern => "modern",
            TemplateKind::Classic => "classic",
            TemplateKind::Minimal => "minimal",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "modern" => Ok(TemplateKind::Modern),
            "classic" => Ok(TemplateKind::Classic),
            "minimal" => Ok(TemplateKind::Minimal),
            other => Err(format!(
                "Unknown template '{}'. Use: modern, classic, or minimal",
                other
            )),
        }
    }
}

/// Contact details and summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub summary: String,
}

impl PersonalInfo {
    /// Non-empty contact fields in display order
    pub fn contact_items(&self) -> Vec<&str> {
        [&self.email, &self.phone, &self.location, &self.website]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// A position held
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

/// A degree or course of study
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

/// Proficiency of a skill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Position on a 1-4 scale
    pub fn rank(&self) -> u32 {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
            SkillLevel::Expert => 4,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        };
        f.write_str(name)
    }
}

/// A named skill
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
}

/// Everything the builder collects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub selected_template: TemplateKind,
    pub personal_info: PersonalInfo,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub languages: String,
    pub interests: String,
}

impl ResumeData {
    /// File name for exports: the person's name, or `fallback`
    pub fn export_filename(&self, fallback: &str) -> String {
        let name = self.personal_info.name.trim();
        if name.is_empty() {
            fallback.to_string()
        } else {
            name.to_string()
        }
    }

    /// Whether nothing has been filled in
    pub fn is_blank(&self) -> bool {
        let ResumeData {
            selected_template: _,
            personal_info,
            experiences,
            education,
            skills,
            languages,
            interests,
        } = self;
        *personal_info == PersonalInfo::default()
            && experiences.is_empty()
            && education.is_empty()
            && skills.is_empty()
            && languages.trim().is_empty()
            && interests.trim().is_empty()
    }
}
