use super::{ModuleInfo, Track};

const MODULES: &[ModuleInfo] = &[
    ModuleInfo {
        key: "basics",
        title: "Git Basics: The First Steps",
        topic: "the absolute basics of Git, covering init, add, commit, status, and log",
    },
    ModuleInfo {
        key: "branching",
        title: "Mastering Git Branching",
        topic: "Git branching, covering create, switch, merge, and delete branches",
    },
    ModuleInfo {
        key: "remotes",
        title: "Working with Remote Repositories",
        topic: "working with remote Git repositories, covering clone, push, pull, and fetch",
    },
    ModuleInfo {
        key: "history",
        title: "Inspecting and Rewriting History",
        topic: "inspecting and rewriting Git history, covering rebase, amend, and reset",
    },
];

const TAGS: &[(&str, &str)] = &[
    ("branch", "Branch names"),
    ("file", "Filenames and paths"),
    ("commit", "Commit hashes"),
];

/// Version control with Git.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitTrack;

impl Track for GitTrack {
    fn key(&self) -> &'static str {
        "git"
    }

    fn name(&self) -> &'static str {
        "Git"
    }

    fn modules(&self) -> &'static [ModuleInfo] {
        MODULES
    }

    fn tags(&self) -> &'static [(&'static str, &'static str)] {
        TAGS
    }

    fn persona(&self) -> &'static str {
        "an expert Git tutor"
    }

    fn initial_lesson_count(&self) -> usize {
        30
    }

    fn more_lesson_count(&self) -> usize {
        15
    }
}
