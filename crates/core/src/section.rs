use serde::{Deserialize, Serialize};

/// The top-level sections of the portfolio document.
///
/// Section names arrive from clients as plain strings; parsing them into
/// this enum is what keeps unknown keys out of the stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Hero,
    About,
    Cv,
    Education,
    Experience,
    Skills,
    Papers,
    Projects,
    Certifications,
    Contact,
}

impl SectionKind {
    /// All sections, in document order.
    pub const ALL: [Self; 10] = [
        Self::Hero,
        Self::About,
        Self::Cv,
        Self::Education,
        Self::Experience,
        Self::Skills,
        Self::Papers,
        Self::Projects,
        Self::Certifications,
        Self::Contact,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Cv => "cv",
            Self::Education => "education",
            Self::Experience => "experience",
            Self::Skills => "skills",
            Self::Papers => "papers",
            Self::Projects => "projects",
            Self::Certifications => "certifications",
            Self::Contact => "contact",
        }
    }

    /// Parse a client-supplied section name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// `true` for sections whose canonical value is an array of items.
    #[must_use]
    pub fn is_array(self) -> bool {
        matches!(
            self,
            Self::Education | Self::Experience | Self::Papers | Self::Projects | Self::Certifications
        )
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_every_section() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(SectionKind::parse("blog"), None);
        assert_eq!(SectionKind::parse("Hero"), None);
        assert_eq!(SectionKind::parse(""), None);
    }

    #[test]
    fn array_sections_are_flagged() {
        assert!(SectionKind::Projects.is_array());
        assert!(!SectionKind::About.is_array());
        assert!(!SectionKind::Skills.is_array());
    }
}
