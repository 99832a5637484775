pub mod analysis;
pub mod change;
pub mod docs;
pub mod findings;
pub mod general;
pub mod git;
pub mod project;

pub use analysis::*;
pub use change::{FileChange, FileType};
pub use docs::{DocCategory, DocumentEntry, DocumentationCorpus};
pub use findings::*;
pub use general::{CommandOutput, Level};
pub use git::{DiffFileStat, DiffRange, GitStatusSnapshot};
pub use project::Project;
