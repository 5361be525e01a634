//! Core types for the folio portfolio document.
//!
//! This crate holds the pure heart of the system: the canonical bilingual
//! document schema, the normalization boundary that repairs legacy JSON
//! shapes, and the merge operations the document service applies. Nothing
//! here performs I/O.

pub mod attachment;
pub mod document;
pub mod localized;
pub mod merge;
pub mod normalize;
pub mod section;

pub use document::{
    About, CertificationItem, Contact, Cv, Document, EducationItem, ExperienceItem, Hero,
    PaperItem, ProjectItem, SkillItem, Skills,
};
pub use localized::LocalizedText;
pub use merge::MergeError;
pub use normalize::normalize;
pub use section::SectionKind;
