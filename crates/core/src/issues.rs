//! Skin issue vocabulary: URL-safe slugs, display names and synonym stems.

use serde::Serialize;

use crate::domain::query::{label_key, normalize_label};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IssueEntry {
    pub display_name: String,
    /// First slug is canonical.
    pub slugs: Vec<String>,
    /// Lower-case fragments; any catalog issue containing one of them is
    /// treated as the same issue during alias relaxation.
    pub stems: Vec<String>,
}

impl IssueEntry {
    pub fn new(display_name: &str, slugs: &[&str], stems: &[&str]) -> Self {
        Self {
            display_name: display_name.to_string(),
            slugs: slugs.iter().map(|slug| slug.to_string()).collect(),
            stems: stems.iter().map(|stem| stem.to_string()).collect(),
        }
    }

    pub fn canonical_slug(&self) -> &str {
        self.slugs.first().map(String::as_str).unwrap_or(self.display_name.as_str())
    }

    pub fn is_synonym_group(&self) -> bool {
        !self.stems.is_empty()
    }

    /// True when `issue` names any member of this synonym group.
    pub fn covers(&self, issue: &str) -> bool {
        let key = label_key(issue);
        self.stems.iter().any(|stem| key.contains(stem.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IssueDirectory {
    entries: Vec<IssueEntry>,
}

impl Default for IssueDirectory {
    fn default() -> Self {
        Self::new(vec![
            IssueEntry::new(
                "Black/White Heads",
                &["blackheads", "whiteheads"],
                &["blackhead", "whitehead", "black/white head"],
            ),
            IssueEntry::new("Pimples", &["pimples"], &[]),
            IssueEntry::new("Dark Circles", &["darkspots"], &[]),
        ])
    }
}

impl IssueDirectory {
    pub fn new(entries: Vec<IssueEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[IssueEntry] {
        &self.entries
    }

    /// Finds the entry named by a slug or a display name.
    pub fn lookup(&self, issue: &str) -> Option<&IssueEntry> {
        let key = label_key(issue);
        self.entries.iter().find(|entry| {
            label_key(&entry.display_name) == key
                || entry.slugs.iter().any(|slug| label_key(slug) == key)
        })
    }

    /// Display name for a slug or display name; unknown issues are
    /// normalized and passed through.
    pub fn resolve(&self, issue: &str) -> String {
        self.lookup(issue)
            .map(|entry| entry.display_name.clone())
            .unwrap_or_else(|| normalize_label(issue))
    }

    pub fn slug_for(&self, issue: &str) -> Option<&str> {
        self.lookup(issue).map(IssueEntry::canonical_slug)
    }

    /// The synonym group covering `issue`, if any.
    pub fn synonym_group(&self, issue: &str) -> Option<&IssueEntry> {
        self.entries.iter().find(|entry| entry.is_synonym_group() && entry.covers(issue))
    }
}
