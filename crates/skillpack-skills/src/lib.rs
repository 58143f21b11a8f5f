//! `SkillPack` Skills Library
//!
//! Loads skill packs: a `SKILL.md` manifest plus the reference documents it
//! lists. An agent reads the manifest once and fetches references on demand.
//!
//! ## Features
//!
//! - YAML frontmatter for skill metadata (name, description)
//! - Workflow sections and trigger text exposed verbatim
//! - Ordered reference index with one-line summaries
//! - Referential integrity checked at load time
//! - Skills from directories or embedded at compile time
//!
//! ## Example
//!
//! ```
//! use skillpack_skills::{bundled, SkillBundle};
//!
//! let bundle = SkillBundle::from_embedded(&bundled::SWIFTUI_EXPERT)?;
//! let text = bundle.read_reference("state-management")?;
//! assert!(!text.is_empty());
//! # Ok::<(), skillpack_skills::SkillError>(())
//! ```

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod bundle;
pub mod bundled;
pub mod error;
pub mod index;
pub mod manifest;
pub mod registry;

pub use bundle::{EmbeddedSkill, SkillBundle};
pub use error::{Result, SkillError};
pub use index::{ReferenceDocument, ReferenceIndex};
pub use manifest::{ReferenceEntry, SkillManifest, WorkflowSection};
pub use registry::SkillsRegistry;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ReferenceDocument, ReferenceIndex, SkillBundle, SkillError, SkillManifest, SkillsRegistry,
    };
}
