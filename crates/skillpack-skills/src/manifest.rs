//! Manifest definition and parsing
//!
//! A manifest is a `SKILL.md` file: YAML frontmatter (`name`, `description`)
//! followed by a markdown body. Text before the first level-2 heading is the
//! overview; level-2 headings split the rest into sections. One section lists
//! the reference files with one-line summaries (see `find_reference_section`).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use tracing::warn;

use crate::error::{Result, SkillError};

/// Maximum recommended name length
const MAX_NAME_LENGTH: usize = 64;
/// Maximum recommended description length
const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Headings that name the reference list outright
const REFERENCE_HEADINGS: &[&str] = &[
    "references",
    "reference",
    "reference files",
    "reference documents",
];

/// A list item naming a markdown file: link, code span or bare path,
/// followed by an optional separator and summary
const REFERENCE_ITEM_PATTERN: &str = r"^\s*[-*+]\s+(?:\[[^\]]*\]\(\s*([^)\s]+\.md)\s*\)|`([^`]+\.md)`|([^\s`\[\]]+\.md))\s*(?:[-:–—]+\s*)?(.*)$";

/// Raw frontmatter as written in the file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    name: Option<String>,
    description: Option<String>,
}

/// A `## ` section of the manifest body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowSection {
    /// Heading text without the leading `## `
    pub heading: String,
    /// Section text, trimmed
    pub body: String,
}

/// One line of the manifest's reference list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    /// File stem of `filename`, used for lookup
    pub identifier: String,
    /// Path as declared, relative to the skill directory
    pub filename: String,
    /// One-line summary (may be empty)
    pub summary: String,
}

/// Parsed `SKILL.md`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillManifest {
    /// Skill name (lowercase letters, numbers and hyphens)
    pub name: String,
    /// What the skill does and when to use it
    pub description: String,
    /// First `# ` heading of the body, if any
    pub title: Option<String>,
    /// Text before the first `## ` section, without the title line
    pub overview: String,
    /// Text of the "When to Use" section, or the description when absent
    pub trigger_conditions: String,
    /// Every `## ` section except the reference list, in document order
    pub workflow_sections: Vec<WorkflowSection>,
    /// Declared reference files, in document order
    pub reference_index: Vec<ReferenceEntry>,
}

impl SkillManifest {
    /// Parse manifest text
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.replace("\r\n", "\n");
        let (frontmatter, body) = split_frontmatter(&content)?;

        let name = required(frontmatter.name, "name")?;
        let description = required(frontmatter.description, "description")?;
        validate_metadata(&name, &description)?;

        let parsed = parse_body(body);
        let item_re = Regex::new(REFERENCE_ITEM_PATTERN)?;
        let reference_position = find_reference_section(&parsed.sections, &item_re);

        let mut workflow_sections = Vec::new();
        let mut reference_index = Vec::new();

        for (position, section) in parsed.sections.iter().enumerate() {
            if Some(position) == reference_position {
                reference_index = parse_reference_list(&section.lines, &item_re)?;
                continue;
            }
            workflow_sections.push(WorkflowSection {
                heading: section.heading.to_string(),
                body: section.lines.join("\n").trim().to_string(),
            });
        }

        let trigger_conditions = workflow_sections
            .iter()
            .find(|s| s.heading.to_lowercase().contains("when to use"))
            .map(|s| s.body.clone())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| description.clone());

        Ok(Self {
            name,
            description,
            title: parsed.title.map(str::to_string),
            overview: parsed.preamble.join("\n").trim().to_string(),
            trigger_conditions,
            workflow_sections,
            reference_index,
        })
    }

    /// Read and parse a manifest file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SkillError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Look up a reference entry by identifier
    pub fn reference(&self, identifier: &str) -> Option<&ReferenceEntry> {
        self.reference_index
            .iter()
            .find(|e| e.identifier == identifier)
    }

    /// Look up a workflow section by exact heading
    pub fn section(&self, heading: &str) -> Option<&WorkflowSection> {
        self.workflow_sections.iter().find(|s| s.heading == heading)
    }

    /// Generate a concise summary for an LLM system prompt
    /// Format: "- {name}: {description}"
    pub fn to_summary(&self) -> String {
        format!("- {}: {}", self.name, self.description)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(SkillError::malformed(format!(
            "required field `{field}` is empty"
        ))),
        None => Err(SkillError::malformed(format!(
            "missing required field `{field}`"
        ))),
    }
}

/// Split `---` fenced YAML frontmatter from the body
fn split_frontmatter(content: &str) -> Result<(Frontmatter, &str)> {
    let frontmatter_re = Regex::new(r"\A---[ \t]*\n((?s:.*?))\n---[ \t]*(?:\n|\z)")?;

    let captures = frontmatter_re
        .captures(content)
        .ok_or_else(|| SkillError::malformed("no valid YAML frontmatter found"))?;

    let (yaml_str, body_start) = match (captures.get(1), captures.get(0)) {
        (Some(yaml), Some(whole)) => (yaml.as_str(), whole.end()),
        _ => return Err(SkillError::malformed("failed to extract frontmatter")),
    };

    let frontmatter: Frontmatter = if yaml_str.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_str)
            .map_err(|e| SkillError::malformed(format!("invalid YAML frontmatter: {e}")))?
    };

    Ok((frontmatter, &content[body_start..]))
}

/// Validate name and description
fn validate_metadata(name: &str, description: &str) -> Result<()> {
    if name.len() > MAX_NAME_LENGTH {
        warn!(
            "Skill name '{}' exceeds {} characters (was {}), may be truncated",
            name,
            MAX_NAME_LENGTH,
            name.len()
        );
    }

    // Name should be lowercase letters, numbers, and hyphens only
    let name_re = Regex::new(r"^[a-z0-9-]+$")?;
    if !name_re.is_match(name) {
        return Err(SkillError::malformed(format!(
            "skill name '{name}' must contain only lowercase letters, numbers, and hyphens"
        )));
    }

    if description.len() > MAX_DESCRIPTION_LENGTH {
        warn!(
            "Skill '{}' description exceeds {} characters (was {}), may be truncated",
            name,
            MAX_DESCRIPTION_LENGTH,
            description.len()
        );
    }

    Ok(())
}

struct RawSection<'a> {
    heading: &'a str,
    lines: Vec<&'a str>,
}

pub(crate) struct ParsedBody<'a> {
    pub(crate) title: Option<&'a str>,
    preamble: Vec<&'a str>,
    sections: Vec<RawSection<'a>>,
}

/// Split the body on `## ` headings, ignoring headings inside code fences
pub(crate) fn parse_body(body: &str) -> ParsedBody<'_> {
    let mut title = None;
    let mut preamble = Vec::new();
    let mut sections: Vec<RawSection<'_>> = Vec::new();
    let mut fence: Option<&str> = None;

    for line in body.lines() {
        let trimmed = line.trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
        } else if trimmed.starts_with("```") {
            fence = Some("```");
        } else if trimmed.starts_with("~~~") {
            fence = Some("~~~");
        } else if let Some(heading) = line.strip_prefix("## ") {
            sections.push(RawSection {
                heading: heading.trim(),
                lines: Vec::new(),
            });
            continue;
        } else if let Some(heading) = line.strip_prefix("# ") {
            if title.is_none() {
                title = Some(heading.trim());
                if sections.is_empty() {
                    continue;
                }
            }
        }

        match sections.last_mut() {
            Some(current) => current.lines.push(line),
            None => preamble.push(line),
        }
    }

    ParsedBody {
        title,
        preamble,
        sections,
    }
}

/// Pick the section holding the reference list
///
/// A heading such as `References` or `Reference Files` wins. Otherwise the
/// first section with file items, preferring headings that mention
/// "reference" so cheat-sheet sections like `Quick Reference` are skipped.
fn find_reference_section(sections: &[RawSection<'_>], item_re: &Regex) -> Option<usize> {
    let has_items = |section: &RawSection<'_>| {
        section.lines.iter().any(|line| item_re.is_match(line))
    };

    sections
        .iter()
        .position(|s| REFERENCE_HEADINGS.contains(&s.heading.to_lowercase().as_str()))
        .or_else(|| {
            sections
                .iter()
                .position(|s| s.heading.to_lowercase().contains("reference") && has_items(s))
        })
        .or_else(|| sections.iter().position(has_items))
}

/// Parse list items of the reference section into entries
fn parse_reference_list(lines: &[&str], item_re: &Regex) -> Result<Vec<ReferenceEntry>> {
    let mut entries: Vec<ReferenceEntry> = Vec::new();

    for line in lines {
        let Some(captures) = item_re.captures(line) else {
            continue;
        };

        let Some(filename) = captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3))
            .map(|m| m.as_str().trim())
        else {
            continue;
        };

        let identifier = identifier_for(filename)?;
        if entries.iter().any(|e| e.identifier == identifier) {
            return Err(SkillError::malformed(format!(
                "reference '{identifier}' is declared more than once"
            )));
        }

        let summary = captures
            .get(4)
            .map(|m| m.as_str().trim())
            .unwrap_or_default();

        entries.push(ReferenceEntry {
            identifier,
            filename: filename.to_string(),
            summary: summary.to_string(),
        });
    }

    Ok(entries)
}

/// Derive the lookup identifier from a declared filename
pub(crate) fn identifier_for(filename: &str) -> Result<String> {
    let path = Path::new(filename);

    if path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(SkillError::malformed(format!(
            "reference path '{filename}' must stay inside the skill directory"
        )));
    }

    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SkillError::malformed(format!("invalid reference filename '{filename}'")))
}
