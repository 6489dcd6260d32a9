use super::{ModuleInfo, Track};

const MODULES: &[ModuleInfo] = &[
    ModuleInfo {
        key: "basics",
        title: "Docker Basics: First Containers",
        topic: "the absolute basics of Docker, covering running containers, `ps`, `logs`, and `stop`",
    },
    ModuleInfo {
        key: "images",
        title: "Building and Managing Images",
        topic: "building and managing Docker images, covering `build`, `tag`, `push`, `pull`, and `rmi`",
    },
    ModuleInfo {
        key: "volumes",
        title: "Persistent Data with Volumes",
        topic: "managing persistent data with Docker volumes, covering `volume create`, `ls`, `inspect`, and bind mounts",
    },
    ModuleInfo {
        key: "networking",
        title: "Container Networking",
        topic: "Docker container networking, covering bridge networks, port mapping, and `network create`",
    },
];

const TAGS: &[(&str, &str)] = &[
    ("image", "Image names"),
    ("container", "Container names and IDs"),
    ("volume", "Volume and network names"),
];

/// Containers with Docker.
#[derive(Debug, Clone, Copy, Default)]
pub struct DockerTrack;

impl Track for DockerTrack {
    fn key(&self) -> &'static str {
        "docker"
    }

    fn name(&self) -> &'static str {
        "Docker"
    }

    fn modules(&self) -> &'static [ModuleInfo] {
        MODULES
    }

    fn tags(&self) -> &'static [(&'static str, &'static str)] {
        TAGS
    }

    fn persona(&self) -> &'static str {
        "an expert Docker tutor"
    }

    fn initial_lesson_count(&self) -> usize {
        20
    }

    fn more_lesson_count(&self) -> usize {
        10
    }
}
