//! Manual form operations.
//!
//! Each function takes the current document and returns the full replacement.
//! Callers publish the result through `DocumentStore::update`.

use thiserror::Error;

use crate::ids::new_record_id;
use crate::models::document::is_hex_color;
use crate::models::{CvDocument, Education, Experience};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("No {section} entry with id '{id}'")]
    RecordNotFound { section: &'static str, id: String },

    #[error("'{0}' is not a hex color (expected #rgb or #rrggbb)")]
    InvalidColor(String),
}

pub fn set_personal_field(doc: &CvDocument, field: &str, value: &str) -> Result<CvDocument, EditError> {
    let mut next = doc.clone();
    let info = &mut next.personal_info;
    let slot = match field {
        "fullName" => &mut info.full_name,
        "title" => &mut info.title,
        "email" => &mut info.email,
        "phone" => &mut info.phone,
        "location" => &mut info.location,
        "photo" => &mut info.photo,
        "summary" => &mut info.summary,
        other => return Err(EditError::UnknownField(other.to_string())),
    };
    *slot = value.to_string();
    Ok(next)
}

/// New experiences go to the top of the list.
pub fn add_experience(doc: &CvDocument) -> (CvDocument, String) {
    let id = new_record_id();
    let mut next = doc.clone();
    next.experiences.insert(
        0,
        Experience {
            id: id.clone(),
            ..Experience::default()
        },
    );
    (next, id)
}

pub fn update_experience(
    doc: &CvDocument,
    id: &str,
    field: &str,
    value: &str,
) -> Result<CvDocument, EditError> {
    let mut next = doc.clone();
    let exp = next
        .experiences
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| not_found("experience", id))?;
    let slot = match field {
        "company" => &mut exp.company,
        "position" => &mut exp.position,
        "period" => &mut exp.period,
        "description" => &mut exp.description,
        other => return Err(EditError::UnknownField(other.to_string())),
    };
    *slot = value.to_string();
    Ok(next)
}

pub fn remove_experience(doc: &CvDocument, id: &str) -> Result<CvDocument, EditError> {
    let mut next = doc.clone();
    let before = next.experiences.len();
    next.experiences.retain(|e| e.id != id);
    if next.experiences.len() == before {
        return Err(not_found("experience", id));
    }
    Ok(next)
}

/// New education entries go to the bottom of the list.
pub fn add_education(doc: &CvDocument) -> (CvDocument, String) {
    let id = new_record_id();
    let mut next = doc.clone();
    next.education.push(Education {
        id: id.clone(),
        ..Education::default()
    });
    (next, id)
}

pub fn update_education(
    doc: &CvDocument,
    id: &str,
    field: &str,
    value: &str,
) -> Result<CvDocument, EditError> {
    let mut next = doc.clone();
    let edu = next
        .education
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| not_found("education", id))?;
    let slot = match field {
        "school" => &mut edu.school,
        "degree" => &mut edu.degree,
        "year" => &mut edu.year,
        other => return Err(EditError::UnknownField(other.to_string())),
    };
    *slot = value.to_string();
    Ok(next)
}

pub fn remove_education(doc: &CvDocument, id: &str) -> Result<CvDocument, EditError> {
    let mut next = doc.clone();
    let before = next.education.len();
    next.education.retain(|e| e.id != id);
    if next.education.len() == before {
        return Err(not_found("education", id));
    }
    Ok(next)
}

/// "Figma, , React ,Rust" -> ["Figma", "React", "Rust"]
pub fn set_skills_from_csv(doc: &CvDocument, text: &str) -> CvDocument {
    let mut next = doc.clone();
    next.skills = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    next
}

pub fn set_theme(
    doc: &CvDocument,
    primary_color: &str,
    font_family: &str,
) -> Result<CvDocument, EditError> {
    if !is_hex_color(primary_color) {
        return Err(EditError::InvalidColor(primary_color.to_string()));
    }
    let mut next = doc.clone();
    next.theme.primary_color = primary_color.to_string();
    next.theme.font_family = font_family.to_string();
    Ok(next)
}

fn not_found(section: &'static str, id: &str) -> EditError {
    EditError::RecordNotFound {
        section,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_personal_field() {
        let doc = CvDocument::sample();
        let next = set_personal_field(&doc, "email", "alex@lumina.fr").unwrap();
        assert_eq!(next.personal_info.email, "alex@lumina.fr");
        assert_eq!(next.personal_info.full_name, doc.personal_info.full_name);
        // input untouched
        assert_eq!(doc.personal_info.email, "alex.dupont@email.com");
    }

    #[test]
    fn test_set_unknown_personal_field() {
        let err = set_personal_field(&CvDocument::sample(), "age", "33").unwrap_err();
        assert_eq!(err, EditError::UnknownField("age".to_string()));
    }

    #[test]
    fn test_add_experience_prepends_blank_record_with_fresh_id() {
        let doc = CvDocument::sample();
        let (next, id) = add_experience(&doc);
        assert_eq!(next.experiences.len(), 3);
        assert_eq!(next.experiences[0].id, id);
        assert_eq!(next.experiences[0].company, "");
        assert!(next.validate().is_ok());
    }

    #[test]
    fn test_add_education_appends() {
        let (next, id) = add_education(&CvDocument::sample());
        assert_eq!(next.education.last().map(|e| e.id.as_str()), Some(id.as_str()));
    }

    #[test]
    fn test_update_experience_field() {
        let next = update_experience(&CvDocument::sample(), "2", "position", "Lead Designer").unwrap();
        assert_eq!(next.experiences[1].position, "Lead Designer");
        assert_eq!(next.experiences[1].id, "2");
    }

    #[test]
    fn test_update_experience_unknown_id() {
        let err = update_experience(&CvDocument::sample(), "99", "company", "X").unwrap_err();
        assert!(matches!(err, EditError::RecordNotFound { section: "experience", .. }));
    }

    #[test]
    fn test_update_education_unknown_field() {
        let err = update_education(&CvDocument::sample(), "1", "gpa", "4.0").unwrap_err();
        assert_eq!(err, EditError::UnknownField("gpa".to_string()));
    }

    #[test]
    fn test_remove_experience() {
        let next = remove_experience(&CvDocument::sample(), "1").unwrap();
        assert_eq!(next.experiences.len(), 1);
        assert_eq!(next.experiences[0].id, "2");
        assert!(remove_experience(&next, "1").is_err());
    }

    #[test]
    fn test_remove_education() {
        let next = remove_education(&CvDocument::sample(), "1").unwrap();
        assert!(next.education.is_empty());
    }

    #[test]
    fn test_skills_csv_trims_and_drops_empties() {
        let next = set_skills_from_csv(&CvDocument::sample(), "Figma, , React ,Rust,Figma");
        assert_eq!(next.skills, vec!["Figma", "React", "Rust", "Figma"]);
    }

    #[test]
    fn test_set_theme_validates_color() {
        let doc = CvDocument::sample();
        assert!(set_theme(&doc, "navy", "Inter").is_err());
        let next = set_theme(&doc, "#0a1a3f", "Playfair Display").unwrap();
        assert_eq!(next.theme.primary_color, "#0a1a3f");
        assert_eq!(next.theme.font_family, "Playfair Display");
    }
}
