//! The CV document model.
//!
//! A `CvDocument` is always a complete value. Every writer (chat pipeline, manual
//! editor, photo upload) publishes a full replacement; nothing patches a section
//! in place. Serde field names follow the camelCase wire format shared with the
//! model prompt and the frontend.
//!
//! Deserialization is strict: every key is required, unknown keys are refused and
//! `null` is not a string. Model replies are untrusted input, so a missing or
//! extra field is a rejection, never a silent default or a silent drop.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PRIMARY_COLOR: &str = "#4f46e5";
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PersonalInfo {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    /// URL or `data:` URI.
    pub photo: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Theme {
    /// `#rgb` or `#rrggbb`.
    pub primary_color: String,
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CvDocument {
    pub personal_info: PersonalInfo,
    /// Display order only; duplicates allowed.
    pub skills: Vec<String>,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("{section} entry has a blank id")]
    BlankId { section: &'static str },

    #[error("{section} id '{id}' is used more than once")]
    DuplicateId { section: &'static str, id: String },

    #[error("{section} id '{id}' was removed earlier and cannot be reused")]
    RetiredId { section: &'static str, id: String },

    #[error("'{0}' is not a hex color (expected #rgb or #rrggbb)")]
    InvalidColor(String),
}

impl CvDocument {
    /// The demo CV a new workspace starts from.
    pub fn sample() -> Self {
        Self {
            personal_info: PersonalInfo {
                full_name: "Alexandre Dupont".to_string(),
                title: "Product Designer Senior".to_string(),
                email: "alex.dupont@email.com".to_string(),
                phone: "06 12 34 56 78".to_string(),
                location: "Paris, France".to_string(),
                photo: "https://picsum.photos/seed/alex/400/400".to_string(),
                summary: "Designer passionné par la création d'interfaces intuitives et esthétiques. \
                    Plus de 8 ans d'expérience dans la conception de produits SaaS innovants."
                    .to_string(),
            },
            skills: [
                "UI/UX Design",
                "React.js",
                "Figma",
                "Tailwind CSS",
                "Product Strategy",
                "User Research",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            experiences: vec![
                Experience {
                    id: "1".to_string(),
                    company: "TechFlow Solutions".to_string(),
                    position: "Senior UI Designer".to_string(),
                    period: "2021 - Présent".to_string(),
                    description: "Direction artistique de la plateforme principale. \
                        Amélioration du taux de conversion de 25% grâce à une refonte complète de l'onboarding."
                        .to_string(),
                },
                Experience {
                    id: "2".to_string(),
                    company: "Creative Studio".to_string(),
                    position: "Product Designer".to_string(),
                    period: "2018 - 2021".to_string(),
                    description: "Conception d'applications mobiles pour des clients Fortune 500. \
                        Collaboration étroite avec les équipes engineering."
                        .to_string(),
                },
            ],
            education: vec![Education {
                id: "1".to_string(),
                school: "École de Design Nantes Atlantique".to_string(),
                degree: "Master en Design d'Interaction".to_string(),
                year: "2018".to_string(),
            }],
            theme: Theme::default(),
        }
    }

    /// Checks the invariants every published document must hold.
    pub fn validate(&self) -> Result<(), DocumentError> {
        check_ids("experience", self.experiences.iter().map(|e| e.id.as_str()))?;
        check_ids("education", self.education.iter().map(|e| e.id.as_str()))?;
        if !is_hex_color(&self.theme.primary_color) {
            return Err(DocumentError::InvalidColor(
                self.theme.primary_color.clone(),
            ));
        }
        Ok(())
    }

    /// `validate`, plus: any record id not present in `previous` must not be a
    /// retired id.
    pub fn validate_reply(
        &self,
        previous: &CvDocument,
        retired: &HashSet<String>,
    ) -> Result<(), DocumentError> {
        self.validate()?;

        let known = previous.record_ids();
        let introduced = self
            .experiences
            .iter()
            .map(|e| ("experience", e.id.as_str()))
            .chain(self.education.iter().map(|e| ("education", e.id.as_str())))
            .filter(|(_, id)| !known.contains(*id));

        for (section, id) in introduced {
            if retired.contains(id) {
                return Err(DocumentError::RetiredId {
                    section,
                    id: id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Every experience and education id in this document.
    pub fn record_ids(&self) -> HashSet<String> {
        self.experiences
            .iter()
            .map(|e| e.id.clone())
            .chain(self.education.iter().map(|e| e.id.clone()))
            .collect()
    }
}

fn check_ids<'a>(
    section: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), DocumentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(DocumentError::BlankId { section });
        }
        if !seen.insert(id) {
            return Err(DocumentError::DuplicateId {
                section,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
