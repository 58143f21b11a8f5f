//! Skill bundle: a manifest together with its verified reference index

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::index::{ReferenceDocument, ReferenceIndex};
use crate::manifest::SkillManifest;

/// Manifest file name inside a skill directory
pub const MANIFEST_FILE: &str = "SKILL.md";

/// A skill with its content provided as static string slices.
///
/// Meant for `include_str!` so a skill ships inside the binary.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSkill {
    /// Raw `SKILL.md` content
    pub skill_md: &'static str,
    /// Reference files as `(relative_path, content)` pairs
    pub references: &'static [(&'static str, &'static str)],
}

/// A loaded skill: manifest plus reference documents
#[derive(Debug, Clone)]
pub struct SkillBundle {
    manifest: SkillManifest,
    references: ReferenceIndex,
    path: Option<PathBuf>,
}

impl SkillBundle {
    /// Load a skill directory containing `SKILL.md`
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let manifest = SkillManifest::from_file(&dir.join(MANIFEST_FILE))?;
        let references = ReferenceIndex::from_dir(&manifest, dir)?;

        Ok(Self {
            manifest,
            references,
            path: Some(dir.to_path_buf()),
        })
    }

    /// Load a skill compiled into the binary
    pub fn from_embedded(embedded: &EmbeddedSkill) -> Result<Self> {
        let manifest = SkillManifest::parse(embedded.skill_md)?;
        let references = ReferenceIndex::from_sources(&manifest, embedded.references)?;

        Ok(Self {
            manifest,
            references,
            path: None,
        })
    }

    /// Skill name
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Skill description
    pub fn description(&self) -> &str {
        &self.manifest.description
    }

    /// Parsed manifest
    pub fn manifest(&self) -> &SkillManifest {
        &self.manifest
    }

    /// Reference index
    pub fn references(&self) -> &ReferenceIndex {
        &self.references
    }

    /// Directory the skill was loaded from; `None` for embedded skills
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a reference document by identifier
    pub fn get(&self, identifier: &str) -> Result<&ReferenceDocument> {
        self.references.get(identifier)
    }

    /// Full text of a reference document
    pub fn read_reference(&self, identifier: &str) -> Result<&str> {
        self.get(identifier).map(|doc| doc.body.as_str())
    }

    /// Generate a concise summary for LLM system prompt
    pub fn to_summary(&self) -> String {
        self.manifest.to_summary()
    }

    /// Render the agent-facing context: description, overview, triggers,
    /// workflow sections and the reference index
    pub fn render_context(&self) -> String {
        let manifest = &self.manifest;
        let mut out = format!("# {}\n\n{}\n", manifest.name, manifest.description);

        if !manifest.overview.is_empty() {
            out.push('\n');
            out.push_str(&manifest.overview);
            out.push('\n');
        }

        if manifest.trigger_conditions != manifest.description {
            out.push_str("\n## When to Use\n\n");
            out.push_str(&manifest.trigger_conditions);
            out.push('\n');
        }

        for section in &manifest.workflow_sections {
            if section.heading.to_lowercase().contains("when to use") {
                continue;
            }
            out.push_str(&format!("\n## {}\n\n{}\n", section.heading, section.body));
        }

        if !self.references.is_empty() {
            out.push_str("\n## References\n\n");
            out.push_str(&self.references.render_index());
        }

        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::SkillError;

    static SKILL: EmbeddedSkill = EmbeddedSkill {
        skill_md: "---
name: test-skill
description: A test skill.
---
# Test Skill

Keep changes small.

## When to Use

When testing.

## Steps

Do the thing.

## References

- `references/guide.md` - The guide
",
        references: &[("references/guide.md", "# Guide\n\nSome reference material.\n")],
    };

    #[test]
    fn test_from_embedded() {
        let bundle = SkillBundle::from_embedded(&SKILL).unwrap();
        assert_eq!(bundle.name(), "test-skill");
        assert!(bundle.path().is_none());
        assert_eq!(
            bundle.read_reference("guide").unwrap(),
            "# Guide\n\nSome reference material.\n"
        );
    }

    #[test]
    fn test_read_unknown_reference() {
        let bundle = SkillBundle::from_embedded(&SKILL).unwrap();
        assert!(matches!(
            bundle.read_reference("missing"),
            Err(SkillError::UnknownReference { .. })
        ));
    }

    #[test]
    fn test_render_context() {
        let context = SkillBundle::from_embedded(&SKILL).unwrap().render_context();
        assert!(context.starts_with("# test-skill\n\nA test skill.\n\nKeep changes small.\n"));
        assert!(context.contains("## When to Use\n\nWhen testing.\n"));
        assert!(context.contains("## Steps\n\nDo the thing.\n"));
        assert!(context.ends_with("## References\n\n- guide: The guide\n"));
        assert_eq!(context.matches("When to Use").count(), 1);
    }
}
