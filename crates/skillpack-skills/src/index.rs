//! Reference index: identifier -> full document text
//!
//! Built once from a manifest and a source of documents (a skill directory or
//! embedded strings). Construction checks that every declared reference
//! resolves, so lookups on declared identifiers cannot fail afterwards.

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, SkillError};
use crate::manifest::{identifier_for, parse_body, ReferenceEntry, SkillManifest};

/// Subdirectory searched for bare reference filenames
const REFERENCES_DIR: &str = "references";

/// A single reference document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceDocument {
    /// Lookup key, the file stem of the declared filename
    pub identifier: String,
    /// First `# ` heading, or the identifier
    pub title: String,
    /// Full text as read, unmodified
    pub body: String,
}

impl ReferenceDocument {
    /// Create a document, deriving the title from the body
    pub fn new(identifier: impl Into<String>, body: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let body = body.into();
        let title = parse_body(&body)
            .title
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| identifier.clone());

        Self {
            identifier,
            title,
            body,
        }
    }
}

/// Ordered, immutable mapping from identifier to document
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    entries: Vec<ReferenceEntry>,
    documents: Vec<ReferenceDocument>,
    positions: HashMap<String, usize>,
}

impl ReferenceIndex {
    /// Build the index by reading every declared reference from `skill_dir`
    ///
    /// A declared filename is resolved relative to `skill_dir`; a bare
    /// filename not found there is also looked up under `references/`.
    pub fn from_dir(manifest: &SkillManifest, skill_dir: &Path) -> Result<Self> {
        let mut builder = Builder::default();

        for entry in &manifest.reference_index {
            let declared = skill_dir.join(&entry.filename);
            let is_bare = Path::new(&entry.filename).components().count() == 1;
            let path = if declared.is_file() {
                declared
            } else {
                let nested = skill_dir.join(REFERENCES_DIR).join(&entry.filename);
                if !is_bare || !nested.is_file() {
                    return Err(SkillError::DanglingReference {
                        identifier: entry.identifier.clone(),
                        path: declared,
                    });
                }
                nested
            };

            let body = fs::read_to_string(&path).map_err(|source| SkillError::Io {
                path: path.clone(),
                source,
            })?;

            debug!("Loaded reference '{}' from {:?}", entry.identifier, path);
            builder.push(entry, body);
        }

        Ok(builder.finish())
    }

    /// Build the index from in-memory `(relative path, content)` pairs
    ///
    /// A pair matches an entry when its path equals the declared filename or
    /// its file stem equals the entry's identifier.
    pub fn from_sources(manifest: &SkillManifest, sources: &[(&str, &str)]) -> Result<Self> {
        let mut builder = Builder::default();

        for entry in &manifest.reference_index {
            let exact = sources.iter().find(|(path, _)| *path == entry.filename);
            let found = match exact {
                Some(source) => Some(source),
                None => sources.iter().find(|(path, _)| {
                    identifier_for(path).is_ok_and(|id| id == entry.identifier)
                }),
            };

            let Some((_, content)) = found else {
                return Err(SkillError::DanglingReference {
                    identifier: entry.identifier.clone(),
                    path: entry.filename.clone().into(),
                });
            };

            builder.push(entry, (*content).to_string());
        }

        Ok(builder.finish())
    }

    /// Get a document by identifier
    pub fn get(&self, identifier: &str) -> Result<&ReferenceDocument> {
        self.positions
            .get(identifier)
            .and_then(|&i| self.documents.get(i))
            .ok_or_else(|| SkillError::unknown(identifier))
    }

    /// Identifiers in manifest order
    pub fn list(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.identifier.as_str())
    }

    /// Index entries (identifier, filename, summary) in manifest order
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// Documents in manifest order
    pub fn documents(&self) -> impl ExactSizeIterator<Item = &ReferenceDocument> + '_ {
        self.documents.iter()
    }

    /// One-line summary declared for `identifier`
    pub fn summary(&self, identifier: &str) -> Result<&str> {
        self.positions
            .get(identifier)
            .and_then(|&i| self.entries.get(i))
            .map(|e| e.summary.as_str())
            .ok_or_else(|| SkillError::unknown(identifier))
    }

    /// Check whether `identifier` is indexed
    pub fn contains(&self, identifier: &str) -> bool {
        self.positions.contains_key(identifier)
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Render the index for an agent prompt
    /// Format:
    /// - identifier: summary
    pub fn render_index(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str("- ");
            out.push_str(&entry.identifier);
            if !entry.summary.is_empty() {
                out.push_str(": ");
                out.push_str(&entry.summary);
            }
            out.push('\n');
        }
        out
    }
}

#[derive(Default)]
struct Builder {
    index: ReferenceIndex,
}

impl Builder {
    fn push(&mut self, entry: &ReferenceEntry, body: String) {
        let position = self.index.documents.len();
        self.index
            .positions
            .insert(entry.identifier.clone(), position);
        self.index.entries.push(entry.clone());
        self.index
            .documents
            .push(ReferenceDocument::new(entry.identifier.clone(), body));
    }

    fn finish(self) -> ReferenceIndex {
        self.index
    }
}
