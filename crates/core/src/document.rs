use serde::{Deserialize, Serialize};

use crate::localized::LocalizedText;

/// The canonical portfolio document.
///
/// Every localized field is a complete `{english, japanese}` pair, every
/// array field is a real array, and every array item carries a stable `id`.
/// Raw stored rows are only guaranteed to hold this shape after passing
/// through [`crate::normalize::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub hero: Hero,
    pub about: About,
    pub cv: Cv,
    pub education: Vec<EducationItem>,
    pub experience: Vec<ExperienceItem>,
    pub skills: Skills,
    pub papers: Vec<PaperItem>,
    pub projects: Vec<ProjectItem>,
    pub certifications: Vec<CertificationItem>,
    pub contact: Contact,
}

/// Landing banner: name, tagline, portrait.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hero {
    pub name: LocalizedText,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub image: String,
    pub image_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct About {
    pub body: LocalizedText,
    /// Current availability, e.g. "Looking for opportunities".
    pub status: LocalizedText,
    pub location: LocalizedText,
}

/// Downloadable CV attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cv {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationItem {
    pub id: String,
    pub institution: LocalizedText,
    pub degree: LocalizedText,
    pub period: String,
    pub description: LocalizedText,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceItem {
    pub id: String,
    pub company: LocalizedText,
    pub role: LocalizedText,
    pub period: String,
    pub description: LocalizedText,
}

/// Skill lists grouped by category. The categories are fixed; each list is
/// an ordinary item array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skills {
    pub languages: Vec<SkillItem>,
    pub frameworks: Vec<SkillItem>,
    pub databases: Vec<SkillItem>,
    pub tools: Vec<SkillItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillItem {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaperItem {
    pub id: String,
    pub title: LocalizedText,
    pub venue: LocalizedText,
    pub year: String,
    pub url: String,
    pub pdf: String,
    pub pdf_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectItem {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub tech: Vec<String>,
    pub url: String,
    pub image: String,
    pub image_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationItem {
    pub id: String,
    pub name: LocalizedText,
    pub issuer: LocalizedText,
    pub date: String,
    pub image: String,
    pub image_key: String,
    pub pdf: String,
    pub pdf_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub message: LocalizedText,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn default_document_serializes_with_all_sections() {
        let value = serde_json::to_value(Document::default()).unwrap();
        let map = value.as_object().unwrap();
        for key in [
            "hero",
            "about",
            "cv",
            "education",
            "experience",
            "skills",
            "papers",
            "projects",
            "certifications",
            "contact",
        ] {
            assert!(map.contains_key(key), "missing section {key}");
        }
    }

    #[test]
    fn item_keys_are_camel_case() {
        let item = CertificationItem {
            id: "c1".into(),
            pdf_key: "certs/c1.pdf".into(),
            ..CertificationItem::default()
        };
        let value = serde_json::to_value(item).unwrap();
        assert_eq!(value["pdfKey"], json!("certs/c1.pdf"));
        assert!(value.get("pdf_key").is_none());
    }

    #[test]
    fn unknown_keys_are_ignored_on_deserialize() {
        let doc: Document = serde_json::from_value(json!({
            "hero": {"name": "Aki", "stray": true},
            "legacyField": 1,
        }))
        .unwrap();
        assert_eq!(doc.hero.name, LocalizedText::broadcast("Aki"));
    }
}
