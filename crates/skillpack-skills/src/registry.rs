//! Skills registry for managing multiple skill bundles
//!
//! Sources are registered up front, then `discover()` loads every bundle:
//! - embedded skills compiled into the library
//! - skill directories (`<dir>/<skill>/SKILL.md`) scanned one level deep

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::bundle::{EmbeddedSkill, SkillBundle, MANIFEST_FILE};
use crate::bundled;
use crate::error::{Result, SkillError};

/// Skills registry managing all available skills
#[derive(Debug, Default)]
pub struct SkillsRegistry {
    /// Loaded skills by name
    skills: HashMap<String, SkillBundle>,
    /// Embedded skills to load
    embedded: Vec<&'static EmbeddedSkill>,
    /// Skills directories to scan
    directories: Vec<PathBuf>,
}

impl SkillsRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a skills directory to scan
    pub fn add_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.push(dir.into());
        self
    }

    /// Add an embedded skill
    pub fn add_embedded(mut self, skill: &'static EmbeddedSkill) -> Self {
        self.embedded.push(skill);
        self
    }

    /// Add every skill bundled with this library
    pub fn with_bundled(mut self) -> Self {
        self.embedded.extend(bundled::all().iter().copied());
        self
    }

    /// Add personal skills directory: ~/.skillpack/skills/
    pub fn with_personal_skills(self) -> Self {
        if let Some(home) = dirs::home_dir() {
            self.add_directory(home.join(".skillpack").join("skills"))
        } else {
            warn!("Could not find home directory for personal skills");
            self
        }
    }

    /// Add project skills directory: ./.skillpack/skills/
    pub fn with_project_skills(self) -> Self {
        self.add_directory(PathBuf::from(".skillpack/skills"))
    }

    /// Load every registered source
    ///
    /// Embedded skills load first, then directories in registration order;
    /// a later skill with the same name replaces an earlier one. Skills that
    /// fail to load are skipped.
    pub fn discover(&mut self) -> Result<()> {
        info!(
            "Starting skills discovery ({} embedded, {} directories)",
            self.embedded.len(),
            self.directories.len()
        );

        let embedded = self.embedded.clone();
        for skill in embedded {
            match SkillBundle::from_embedded(skill) {
                Ok(bundle) => self.insert(bundle),
                Err(e) => warn!("Skipping embedded skill: {}", e),
            }
        }

        let directories = self.directories.clone();
        for dir in &directories {
            if !dir.exists() {
                debug!("Skills directory does not exist: {:?}", dir);
                continue;
            }

            if !dir.is_dir() {
                warn!("Skills path is not a directory: {:?}", dir);
                continue;
            }

            self.scan_directory(dir)?;
        }

        info!("Discovered {} skills", self.skills.len());
        Ok(())
    }

    /// Scan a single directory for skills
    fn scan_directory(&mut self, dir: &Path) -> Result<()> {
        let entries = std::fs::read_dir(dir).map_err(|source| SkillError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        // Sorted so replacement between same-named skills is deterministic
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir() && path.join(MANIFEST_FILE).is_file())
            .collect();
        paths.sort();

        for path in paths {
            match SkillBundle::from_dir(&path) {
                Ok(bundle) => {
                    debug!("Discovered skill: {} at {:?}", bundle.name(), path);
                    self.insert(bundle);
                }
                Err(e) => {
                    warn!("Skipping {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    fn insert(&mut self, bundle: SkillBundle) {
        let name = bundle.name().to_string();
        if self.skills.insert(name.clone(), bundle).is_some() {
            debug!("Skill '{}' replaced by a later source", name);
        }
    }

    /// Get a skill by name
    pub fn get(&self, name: &str) -> Option<&SkillBundle> {
        self.skills.get(name)
    }

    /// Get all skill names, sorted
    pub fn skill_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.skills.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get number of skills
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    fn sorted(&self) -> Vec<&SkillBundle> {
        let mut sorted: Vec<_> = self.skills.values().collect();
        sorted.sort_by_key(|s| s.name());
        sorted
    }

    /// Generate skills list for LLM system prompt
    /// Format:
    /// Available skills (read a skill's references on demand):
    /// - skill-name: Description of what this skill does and when to use it
    pub fn generate_system_prompt(&self) -> String {
        if self.skills.is_empty() {
            return String::new();
        }

        let mut prompt =
            String::from("\n\nAvailable skills (read a skill's references on demand):\n");

        for skill in self.sorted() {
            prompt.push_str(&skill.to_summary());
            prompt.push('\n');
        }

        prompt
    }

    /// Generate a concise skills list for embedding in tool descriptions
    pub fn generate_skills_list(&self) -> String {
        if self.skills.is_empty() {
            return "No skills available".to_string();
        }

        self.sorted()
            .iter()
            .map(|skill| format!("{}: {}", skill.name(), skill.description()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_new() {
        let registry = SkillsRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_generate_system_prompt_empty() {
        let registry = SkillsRegistry::new();
        assert!(registry.generate_system_prompt().is_empty());
    }

    #[test]
    fn test_generate_skills_list_empty() {
        let registry = SkillsRegistry::new();
        assert_eq!(registry.generate_skills_list(), "No skills available");
    }

    #[test]
    fn test_bundled_discovery() {
        let mut registry = SkillsRegistry::new().with_bundled();
        registry.discover().unwrap();
        assert_eq!(registry.skill_names(), ["swiftui-expert"]);
        assert!(registry
            .generate_system_prompt()
            .contains("- swiftui-expert: "));
    }

    #[test]
    fn test_missing_directory_is_skipped() {
        let mut registry = SkillsRegistry::new().add_directory("/nonexistent/skillpack/skills");
        registry.discover().unwrap();
        assert!(registry.is_empty());
    }
}
