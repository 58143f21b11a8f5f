use crate::args::SkillCommand;
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use skillpack_skills::{SkillBundle, SkillsRegistry};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Skill service - answers commands from a discovered registry
pub struct SkillService {
    registry: SkillsRegistry,
}

impl SkillService {
    /// Build the registry from config plus extra command-line directories
    pub fn from_config(config: &Config, extra_dirs: &[PathBuf]) -> Result<Self> {
        let skills = &config.skills;
        let mut registry = SkillsRegistry::new();

        if skills.include_bundled {
            registry = registry.with_bundled();
        }
        if skills.include_personal {
            registry = registry.with_personal_skills();
        }
        if skills.include_project {
            registry = registry.with_project_skills();
        }
        for dir in skills.directories.iter().chain(extra_dirs) {
            registry = registry.add_directory(dir.clone());
        }

        registry.discover().context("Skills discovery failed")?;
        info!("Skill service ready with {} skills", registry.len());

        Ok(Self::new(registry))
    }

    /// Wrap an already discovered registry
    pub fn new(registry: SkillsRegistry) -> Self {
        Self { registry }
    }

    fn skill(&self, name: &str) -> Result<&SkillBundle> {
        self.registry.get(name).ok_or_else(|| {
            anyhow!(
                "Skill '{}' not found. Available: {}",
                name,
                self.registry.skill_names().join(", ")
            )
        })
    }

    /// Dispatch a skill command
    pub fn run(&self, command: SkillCommand, out: &mut impl Write) -> Result<()> {
        match command {
            SkillCommand::List => self.list(out),
            SkillCommand::Show { skill, json } => self.show(&skill, json, out),
            SkillCommand::Refs { skill } => self.refs(&skill, out),
            SkillCommand::Read { skill, reference } => self.read(&skill, &reference, out),
            SkillCommand::Context { skill } => self.context(&skill, out),
        }
    }

    /// `list`: one `name: description` line per skill
    pub fn list(&self, out: &mut impl Write) -> Result<()> {
        if self.registry.is_empty() {
            writeln!(out, "No skills available")?;
            return Ok(());
        }

        for name in self.registry.skill_names() {
            let skill = self.skill(name)?;
            writeln!(out, "{}: {}", skill.name(), skill.description())?;
        }
        Ok(())
    }

    /// `show`: manifest fields, as text or JSON
    pub fn show(&self, name: &str, json: bool, out: &mut impl Write) -> Result<()> {
        let skill = self.skill(name)?;
        let manifest = skill.manifest();

        if json {
            serde_json::to_writer_pretty(&mut *out, manifest)?;
            writeln!(out)?;
            return Ok(());
        }

        writeln!(out, "name: {}", manifest.name)?;
        if let Some(title) = &manifest.title {
            writeln!(out, "title: {title}")?;
        }
        if let Some(path) = skill.path() {
            writeln!(out, "path: {}", path.display())?;
        }
        writeln!(out, "description: {}", manifest.description)?;
        if !manifest.overview.is_empty() {
            writeln!(out, "\noverview:\n{}", manifest.overview)?;
        }
        writeln!(out, "\ntriggers:\n{}", manifest.trigger_conditions)?;

        writeln!(out, "\nsections:")?;
        for section in &manifest.workflow_sections {
            writeln!(out, "  {}", section.heading)?;
        }

        writeln!(out, "\nreferences:")?;
        for entry in &manifest.reference_index {
            writeln!(out, "  {} ({}): {}", entry.identifier, entry.filename, entry.summary)?;
        }
        Ok(())
    }

    /// `refs`: identifier and summary per reference, in manifest order
    pub fn refs(&self, name: &str, out: &mut impl Write) -> Result<()> {
        let references = self.skill(name)?.references();
        let width = references.list().map(str::len).max().unwrap_or(0);

        for entry in references.entries() {
            writeln!(out, "{:width$}  {}", entry.identifier, entry.summary)?;
        }
        Ok(())
    }

    /// `read`: the reference body exactly as stored
    pub fn read(&self, name: &str, reference: &str, out: &mut impl Write) -> Result<()> {
        let text = self
            .skill(name)?
            .read_reference(reference)
            .with_context(|| format!("Skill '{name}' has no such reference"))?;
        out.write_all(text.as_bytes())?;
        Ok(())
    }

    /// `context`: manifest text and reference index for an agent prompt
    pub fn context(&self, name: &str, out: &mut impl Write) -> Result<()> {
        out.write_all(self.skill(name)?.render_context().as_bytes())?;
        Ok(())
    }
}

/// `check`: load a skill directory and verify every declared reference
pub fn check(dir: &Path, out: &mut impl Write) -> Result<()> {
    let bundle = SkillBundle::from_dir(dir)
        .with_context(|| format!("Skill at {} is invalid", dir.display()))?;

    writeln!(
        out,
        "{}: ok ({} references verified)",
        bundle.name(),
        bundle.references().len()
    )?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;

    fn service() -> SkillService {
        let mut registry = SkillsRegistry::new().with_bundled();
        registry.discover().unwrap();
        SkillService::new(registry)
    }

    fn run(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list() {
        let output = run(|out| service().list(out));
        assert!(output.starts_with("swiftui-expert: "));
    }

    #[test]
    fn test_list_empty() {
        let output = run(|out| SkillService::new(SkillsRegistry::new()).list(out));
        assert_eq!(output, "No skills available\n");
    }

    #[test]
    fn test_refs_in_declared_order() {
        let output = run(|out| service().refs("swiftui-expert", out));
        let ids: Vec<_> = output
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(
            ids,
            [
                "state-management",
                "view-composition",
                "performance",
                "animations",
                "liquid-glass"
            ]
        );
    }

    #[test]
    fn test_read_is_verbatim() {
        let service = service();
        let expected = service
            .registry
            .get("swiftui-expert")
            .unwrap()
            .read_reference("animations")
            .unwrap()
            .to_string();
        let output = run(|out| service.read("swiftui-expert", "animations", out));
        assert_eq!(output, expected);
    }

    #[test]
    fn test_read_unknown_reference_fails() {
        let mut out = Vec::new();
        let err = service()
            .read("swiftui-expert", "nonexistent", &mut out)
            .unwrap_err();
        assert!(format!("{err:#}").contains("Unknown reference 'nonexistent'"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_skill_lists_available() {
        let mut out = Vec::new();
        let err = service().refs("uikit", &mut out).unwrap_err();
        assert!(err.to_string().contains("Available: swiftui-expert"));
    }

    #[test]
    fn test_show_json() {
        let output = run(|out| service().show("swiftui-expert", true, out));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["name"], "swiftui-expert");
        assert_eq!(value["reference_index"][0]["identifier"], "state-management");
    }

    #[test]
    fn test_show_text() {
        let output = run(|out| service().show("swiftui-expert", false, out));
        assert!(output.contains("title: SwiftUI Expert"));
        assert!(output.contains("  Workflow Decision Tree"));
        assert!(output.contains("overview:\nGuidance for writing correct"));
        assert!(!output.contains("path:"));
    }

    #[test]
    fn test_run_dispatches_read() {
        let output = run(|out| {
            service().run(
                SkillCommand::Read {
                    skill: "swiftui-expert".into(),
                    reference: "liquid-glass".into(),
                },
                out,
            )
        });
        assert!(output.starts_with("# Liquid Glass\n"));
    }

    #[test]
    fn test_context_includes_reference_index() {
        let output = run(|out| service().context("swiftui-expert", out));
        assert!(output.contains("- liquid-glass: "));
    }

    #[test]
    fn test_check() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("references")).unwrap();
        fs::write(
            tmp.path().join("SKILL.md"),
            "---\nname: tiny\ndescription: Tiny.\n---\n## References\n- `references/a.md` - A\n",
        )
        .unwrap();

        let mut out = Vec::new();
        assert!(check(tmp.path(), &mut out).is_err());

        fs::write(tmp.path().join("references/a.md"), "# A\n").unwrap();
        let output = run(|out| check(tmp.path(), out));
        assert_eq!(output, "tiny: ok (1 references verified)\n");
    }

    #[test]
    fn test_from_config_bundled_only() {
        let mut config = Config::default();
        config.skills.include_personal = false;
        config.skills.include_project = false;

        let service = SkillService::from_config(&config, &[]).unwrap();
        assert_eq!(service.registry.skill_names(), ["swiftui-expert"]);
    }
}
