use colored::Colorize;

/// Change of a working file that has not been staged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkspaceChangeType {
    Modified,
    Deleted,
}

impl From<&WorkspaceChangeType> for &str {
    fn from(change: &WorkspaceChangeType) -> Self {
        match change {
            WorkspaceChangeType::Modified => "(modified)",
            WorkspaceChangeType::Deleted => "(deleted)",
        }
    }
}

impl std::fmt::Display for WorkspaceChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label: &str = self.into();
        write!(f, "{}", label.red())
    }
}

/// Pending change recorded in the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StageChangeType {
    Added,
    Removed,
}

impl StageChangeType {
    /// Render a staged file name in this change's color
    pub fn paint(&self, name: &str) -> String {
        match self {
            StageChangeType::Added => name.green().to_string(),
            StageChangeType::Removed => name.red().to_string(),
        }
    }
}
