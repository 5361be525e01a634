//! The normalization boundary.
//!
//! [`normalize`] converts an arbitrary stored JSON value into the canonical
//! [`Document`]. It is total (any input produces a document), pure, and
//! idempotent. Un-normalized JSON must never cross this boundary into
//! rendering or business logic.

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::document::{
    CertificationItem, Document, EducationItem, ExperienceItem, PaperItem, ProjectItem, SkillItem,
};

/// Repair an arbitrary JSON value into the canonical document shape.
///
/// Object sections fall back to their empty canonical form when absent or
/// malformed. Array sections coerce non-arrays to `[]`, repair each element
/// independently, and assign a fresh `id` to any item that lacks one.
#[must_use]
pub fn normalize(raw: &Value) -> Document {
    let mut doc = Document {
        hero: object_section(raw, "hero"),
        about: object_section(raw, "about"),
        cv: object_section(raw, "cv"),
        education: item_section::<EducationItem>(raw, "education"),
        experience: item_section::<ExperienceItem>(raw, "experience"),
        skills: crate::document::Skills {
            languages: skill_list(raw, "languages"),
            frameworks: skill_list(raw, "frameworks"),
            databases: skill_list(raw, "databases"),
            tools: skill_list(raw, "tools"),
        },
        papers: item_section::<PaperItem>(raw, "papers"),
        projects: item_section::<ProjectItem>(raw, "projects"),
        certifications: item_section::<CertificationItem>(raw, "certifications"),
        contact: object_section(raw, "contact"),
    };

    assign_ids(&mut doc);
    doc
}

/// Generate an id for a new item.
#[must_use]
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

fn object_section<T: DeserializeOwned + Default>(raw: &Value, key: &str) -> T {
    raw.get(key)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
        .unwrap_or_default()
}

fn item_section<T: DeserializeOwned + Default>(raw: &Value, key: &str) -> Vec<T> {
    let Some(Value::Array(items)) = raw.get(key) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| serde_json::from_value(item.clone()).unwrap_or_default())
        .collect()
}

fn skill_list(raw: &Value, category: &str) -> Vec<SkillItem> {
    let Some(skills) = raw.get("skills") else {
        return Vec::new();
    };
    item_section(skills, category)
}

fn assign_ids(doc: &mut Document) {
    fn ensure(id: &mut String) {
        if id.is_empty() {
            *id = fresh_id();
        }
    }

    for item in &mut doc.education {
        ensure(&mut item.id);
    }
    for item in &mut doc.experience {
        ensure(&mut item.id);
    }
    for item in &mut doc.papers {
        ensure(&mut item.id);
    }
    for item in &mut doc.projects {
        ensure(&mut item.id);
    }
    for item in &mut doc.certifications {
        ensure(&mut item.id);
    }
    for list in [
        &mut doc.skills.languages,
        &mut doc.skills.frameworks,
        &mut doc.skills.databases,
        &mut doc.skills.tools,
    ] {
        for item in list {
            ensure(&mut item.id);
        }
    }
}
