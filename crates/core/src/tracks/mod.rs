//! Learning tracks
//!
//! A track is one technology (Git, Docker, Linux). It owns a module catalog,
//! the tag vocabulary used to mark up example output, and the prompts sent to
//! the content generator. Adding a technology means adding a `Track`
//! implementation and registering it; the session never matches on track keys.

mod docker;
mod git;
mod linux;

pub use docker::DockerTrack;
pub use git::GitTrack;
pub use linux::LinuxTrack;

use crate::lesson::Lesson;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// One entry of a track's module catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Identifier typed by the learner, e.g. `basics`.
    pub key: &'static str,
    /// Display name, e.g. `Git Basics: The First Steps`.
    pub title: &'static str,
    /// What the module covers, phrased for the generator.
    pub topic: &'static str,
}

/// A technology the tutor can teach.
///
/// Implementors supply the catalog and wording; the prompt builders have
/// defaults shared by all built-in tracks.
pub trait Track: Send + Sync {
    /// Lowercase registry key, e.g. `git`.
    fn key(&self) -> &'static str;

    /// Display name, e.g. `Git`.
    fn name(&self) -> &'static str;

    fn modules(&self) -> &'static [ModuleInfo];

    /// Tag names the generator may use inside `example_output`, with the
    /// description given to the generator for each.
    fn tags(&self) -> &'static [(&'static str, &'static str)];

    /// Tutor persona for free-text questions, e.g. `an expert Git tutor`.
    fn persona(&self) -> &'static str;

    fn initial_lesson_count(&self) -> usize;

    fn more_lesson_count(&self) -> usize;

    fn module(&self, key: &str) -> Option<&'static ModuleInfo> {
        self.modules()
            .iter()
            .find(|m| m.key.eq_ignore_ascii_case(key))
    }

    fn tag_names(&self) -> Vec<&'static str> {
        self.tags().iter().map(|(name, _)| *name).collect()
    }

    fn initial_module_prompt(&self, module: &ModuleInfo) -> String {
        let body = format!(
            "You are a curriculum generation bot. Your only function is to output a single, valid JSON object.\n\
             Generate a curriculum for a developer learning about '{topic}'.\n\
             The root object must have a key \"moduleName\" (string) and a key \"lessons\" (array).\n\
             The \"lessons\" array must contain exactly {count} lesson objects.\n\
             {fields}\n\
             {tags}\n\
             Output only the raw JSON.",
            topic = module.topic,
            count = self.initial_lesson_count(),
            fields = LESSON_FIELDS,
            tags = tag_instructions(self.tags()),
        );
        chatml(JSON_SYSTEM_MESSAGE, &body)
    }

    fn more_lessons_prompt(&self, module: &ModuleInfo, existing: &[Lesson]) -> String {
        let body = format!(
            "You are a curriculum generation bot outputting a single, valid JSON object.\n\
             Generate a new curriculum with {count} more lessons for a developer learning about '{topic}'.\n\
             CRITICAL: The user has already learned these commands: {taught}. You MUST NOT create lessons for these commands.\n\
             Introduce NEW, more advanced, or related commands and concepts.\n\
             The root object must have a key \"moduleName\" (string) and a key \"lessons\" (array) of exactly {count} lesson objects.\n\
             {fields}\n\
             {tags}\n\
             Output only the raw JSON.",
            count = self.more_lesson_count(),
            topic = module.topic,
            taught = taught_commands(existing),
            fields = LESSON_FIELDS,
            tags = tag_instructions(self.tags()),
        );
        chatml(JSON_SYSTEM_MESSAGE, &body)
    }

    fn question_prompt(&self, question: &str) -> String {
        let body = format!(
            "You are {persona}. Provide a clear, concise explanation for the following user question.\n\
             Use markdown for code blocks and emphasis.\n\
             Question: \"{question}\"",
            persona = self.persona(),
        );
        chatml(TEXT_SYSTEM_MESSAGE, &body)
    }

    fn summary_prompt(&self, module_name: &str, lessons: &[Lesson]) -> String {
        let titles = lessons
            .iter()
            .map(|l| l.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let body = format!(
            "You are a helpful assistant who creates concise study guides.\n\
             Generate a markdown-formatted summary for a learning module named \"{module_name}\".\n\
             The module covered these topics: {titles}.\n\
             Organize the summary with clear headings for the key concepts. \
             Do not summarize each lesson individually; synthesize the core ideas."
        );
        chatml(TEXT_SYSTEM_MESSAGE, &body)
    }
}

const JSON_SYSTEM_MESSAGE: &str = "You are a helpful assistant that only outputs valid JSON.";
const TEXT_SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

const LESSON_FIELDS: &str = "Each lesson object MUST contain \"title\", \"concept\", \"command\", \"example_output\", \"practiceCommand\", and \"hint\".\n\
- \"practiceCommand\": the *exact*, simple command the user should type to practice. For conceptual lessons, use an empty string \"\".\n\
- \"hint\": a short, helpful tip about the command's syntax. For conceptual lessons, use an empty string \"\".";

/// Wraps a prompt in the ChatML turn markers expected by instruction-tuned models.
fn chatml(system: &str, user: &str) -> String {
    format!(
        "<|im_start|>system\n{system}<|im_end|>\n<|im_start|>user\n{user}<|im_end|>\n<|im_start|>assistant\n"
    )
}

fn tag_instructions(tags: &[(&str, &str)]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let mut out = String::from("Inside \"example_output\", you MUST use these XML tags for colorization:");
    for (name, description) in tags {
        out.push_str(&format!("\n- {description}: <{name}>...</{name}>"));
    }
    out
}

fn taught_commands(lessons: &[Lesson]) -> String {
    lessons
        .iter()
        .filter(|l| !l.command.trim().is_empty())
        .map(|l| format!("`{}`", l.command))
        .collect::<Vec<_>>()
        .join(", ")
}

/// All tracks known to the tutor, in registration order.
pub struct TrackRegistry {
    tracks: Vec<Box<dyn Track>>,
}

impl TrackRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// Git, Docker and Linux.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(GitTrack);
        registry.register(DockerTrack);
        registry.register(LinuxTrack);
        registry
    }

    /// Adds a track, replacing any existing track with the same key.
    pub fn register(&mut self, track: impl Track + 'static) {
        self.tracks.retain(|t| t.key() != track.key());
        self.tracks.push(Box::new(track));
    }

    /// Looks a track up by key, ignoring case.
    pub fn get(&self, key: &str) -> Option<&dyn Track> {
        self.tracks
            .iter()
            .find(|t| t.key().eq_ignore_ascii_case(key))
            .map(|t| t.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Track> {
        self.tracks.iter().map(|t| t.as_ref())
    }

    /// The track key closest to a mistyped one.
    pub fn suggest_track(&self, input: &str) -> Option<&'static str> {
        best_match(input, self.tracks.iter().map(|t| t.key()))
    }

    /// The module key of `track` closest to a mistyped one.
    pub fn suggest_module(&self, track: &dyn Track, input: &str) -> Option<&'static str> {
        best_match(input, track.modules().iter().map(|m| m.key))
    }
}

impl Default for TrackRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn best_match(
    input: &str,
    candidates: impl Iterator<Item = &'static str>,
) -> Option<&'static str> {
    let input = input.to_lowercase();
    if input.is_empty() {
        return None;
    }
    let matcher = SkimMatcherV2::default();
    candidates
        .filter_map(|candidate| {
            // The input may be a shortened ("branch") or a padded ("gitt") key.
            let forward = matcher.fuzzy_match(candidate, &input);
            let backward = matcher.fuzzy_match(&input, candidate);
            forward.max(backward).map(|score| (score, candidate))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, candidate)| candidate)
}
