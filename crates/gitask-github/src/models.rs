use serde::{Deserialize, Serialize};

/// The signed-in account. `login` is the implicit owner for every repository
/// lookup made on the user's behalf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

impl Identity {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            name: None,
            avatar_url: None,
            html_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositorySummary {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryDetails {
    pub name: String,
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl RepositoryDetails {
    /// Repositories that report no (or a blank) default branch are assumed to
    /// use `main`.
    pub fn default_branch_or_main(&self) -> &str {
        self.default_branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or("main")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Tree {
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    /// Set by GitHub when the recursive listing exceeded its size limit.
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeEntry {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TreeEntry {
    pub fn is_blob(&self) -> bool {
        self.kind == "blob"
    }
}

impl Tree {
    pub fn blob_count(&self) -> usize {
        self.tree.iter().filter(|entry| entry.is_blob()).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ContentEntry {
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

/// Response of the contents endpoint: a single descriptor for files, symlinks
/// and submodules, or a listing when the path is a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Entry(ContentEntry),
    Listing(Vec<ContentEntry>),
}

impl Contents {
    pub fn as_file(&self) -> Option<&ContentEntry> {
        match self {
            Contents::Entry(entry) if entry.is_file() => Some(entry),
            _ => None,
        }
    }
}
