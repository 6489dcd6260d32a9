use super::{ModuleInfo, Track};

const MODULES: &[ModuleInfo] = &[
    ModuleInfo {
        key: "files",
        title: "Linux Files & Directories",
        topic: "basic file system navigation and manipulation, covering ls, cd, pwd, cp, mv, rm, and mkdir",
    },
    ModuleInfo {
        key: "permissions",
        title: "Understanding Permissions",
        topic: "managing file permissions and ownership, covering chmod, chown, and the meaning of rwx",
    },
    ModuleInfo {
        key: "processes",
        title: "Process Management",
        topic: "managing system processes, covering ps, top, kill, and nice",
    },
    ModuleInfo {
        key: "text",
        title: "Text Processing & Pipes",
        topic: "processing text and using pipes, covering cat, grep, wc, head, tail, and the | operator",
    },
];

const TAGS: &[(&str, &str)] = &[
    ("path", "Filenames and directory paths"),
    ("user", "User or group names"),
    ("pid", "Process IDs (PIDs)"),
];

/// Operating system fundamentals on the Linux command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxTrack;

impl Track for LinuxTrack {
    fn key(&self) -> &'static str {
        "linux"
    }

    fn name(&self) -> &'static str {
        "Linux"
    }

    fn modules(&self) -> &'static [ModuleInfo] {
        MODULES
    }

    fn tags(&self) -> &'static [(&'static str, &'static str)] {
        TAGS
    }

    fn persona(&self) -> &'static str {
        "an expert Linux System Administrator tutor"
    }

    fn initial_lesson_count(&self) -> usize {
        20
    }

    fn more_lesson_count(&self) -> usize {
        10
    }
}
