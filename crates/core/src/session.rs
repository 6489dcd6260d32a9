//! Tutoring Session State Machine
//!
//! `TutorSession` owns the active lesson set, the learner's progress and the
//! pending practice exercise, and is the only place those change. Every
//! operation runs to completion before the next one starts.
//!
//! ```text
//! NoSession --start--> OnLesson <--> OnPractice
//!                         |              |
//!                         +--next/skip---+--> Complete --more--> OnLesson
//! ```

use crate::error::SessionError;
use crate::generator::{
    ContentGenerator, INITIAL_MODULE_BUDGET, MORE_LESSONS_BUDGET, QUESTION_BUDGET,
    SUMMARY_BUDGET,
};
use crate::lesson::{Lesson, LessonSet};
use crate::progress::{Progress, ProgressStore};
use crate::tracks::{Track, TrackRegistry};
use std::collections::HashSet;
use std::fmt;
use tracing::{info, warn};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    OnLesson,
    OnPractice,
    Complete,
}

/// A practice exercise the learner has to answer (or skip) before moving on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeState {
    lesson_index: usize,
    expected_answer: String,
}

impl PracticeState {
    pub fn lesson_index(&self) -> usize {
        self.lesson_index
    }

    pub fn expected_answer(&self) -> &str {
        &self.expected_answer
    }
}

/// Result of submitting a practice answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer matched; the cursor has moved to the next lesson.
    Correct,
    /// The answer did not match; nothing changed.
    Incorrect,
}

/// Snapshot of the learner's position, displayed by `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    InProgress {
        technology: String,
        module_key: String,
        lesson: usize,
        total: usize,
    },
    Complete {
        technology: String,
        module_key: String,
        total: usize,
    },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(
                f,
                "No tutorial in progress. Use 'start <technology> <module>' to begin."
            ),
            Status::InProgress {
                technology,
                module_key,
                lesson,
                total,
            } => write!(
                f,
                "Technology: {technology} | Module: '{module_key}' | Lesson {lesson} of {total}."
            ),
            Status::Complete {
                technology,
                module_key,
                total,
            } => write!(
                f,
                "You have completed all {total} lessons of the '{module_key}' module for {technology}!"
            ),
        }
    }
}

/// The loaded module: its lessons and the cursor into them.
#[derive(Debug, Clone)]
struct ActiveModule {
    lessons: LessonSet,
    progress: Progress,
}

impl ActiveModule {
    fn is_complete(&self) -> bool {
        self.progress.lesson_index >= self.lessons.len()
    }
}

/// A single learner's tutoring session.
pub struct TutorSession {
    registry: TrackRegistry,
    generator: Box<dyn ContentGenerator>,
    store: Box<dyn ProgressStore>,
    module: Option<ActiveModule>,
    /// Key of the last track used, kept even when no module is loaded.
    technology: Option<&'static str>,
    practice: Option<PracticeState>,
    /// Lessons whose exercise was passed or skipped since the module was loaded.
    cleared: HashSet<usize>,
}

impl TutorSession {
    pub fn new(
        registry: TrackRegistry,
        generator: impl ContentGenerator + 'static,
        store: impl ProgressStore + 'static,
    ) -> Self {
        Self {
            registry,
            generator: Box::new(generator),
            store: Box::new(store),
            module: None,
            technology: None,
            practice: None,
            cleared: HashSet::new(),
        }
    }

    pub fn tracks(&self) -> &TrackRegistry {
        &self.registry
    }

    /// Restores the previous run's module from the progress store.
    ///
    /// The lessons are regenerated; only the cursor is persisted, and it is
    /// clamped to the regenerated length. Returns `Ok(None)` when there is
    /// nothing (valid) to resume.
    pub fn resume(&mut self) -> Result<Option<Progress>, SessionError> {
        let Some(saved) = self.store.load() else {
            return Ok(None);
        };
        let Some(track) = self.registry.get(&saved.technology) else {
            warn!(technology = %saved.technology, "Saved progress names an unknown technology");
            return Ok(None);
        };
        let key = track.key();
        self.technology = Some(key);
        let Some(module) = track.module(&saved.module_key) else {
            warn!(technology = key, module = %saved.module_key, "Saved progress names an unknown module");
            return Ok(None);
        };

        info!(technology = key, module = module.key, lesson = saved.lesson_index + 1, "Resuming previous session");
        let prompt = track.initial_module_prompt(module);
        let lessons = self.generator.generate_module(&prompt, INITIAL_MODULE_BUDGET)?;
        let progress = Progress::new(key, module.key).at(saved.lesson_index);
        self.install(key, lessons, progress);
        Ok(self.progress().cloned())
    }

    /// Generates a fresh module and puts the cursor on its first lesson.
    ///
    /// On any error the previous module, cursor and exercise are kept.
    pub fn start_module(&mut self, technology: &str, module_key: &str) -> Result<(), SessionError> {
        let track = self
            .registry
            .get(technology)
            .ok_or_else(|| SessionError::UnknownTechnology {
                technology: technology.to_string(),
                suggestion: self.registry.suggest_track(technology),
            })?;
        let module = track
            .module(module_key)
            .ok_or_else(|| SessionError::UnknownModule {
                technology: track.name().to_string(),
                module: module_key.to_string(),
                suggestion: self.registry.suggest_module(track, module_key),
            })?;

        let key = track.key();
        info!(technology = key, module = module.key, "Generating module");
        let prompt = track.initial_module_prompt(module);
        let lessons = self.generator.generate_module(&prompt, INITIAL_MODULE_BUDGET)?;
        info!(module = %lessons.module_name, lessons = lessons.len(), "Module started");
        self.install(key, lessons, Progress::new(key, module.key));
        Ok(())
    }

    /// The lesson under the cursor, or `None` when no module is loaded or the
    /// module is complete.
    pub fn current_lesson(&self) -> Option<&Lesson> {
        let module = self.module.as_ref()?;
        module.lessons.get(module.progress.lesson_index)
    }

    /// Advances the cursor. Refused while a practice exercise is pending.
    ///
    /// Once the module is complete the cursor stays on the boundary, so
    /// repeated calls keep returning `None`.
    pub fn next_lesson(&mut self) -> Result<Option<&Lesson>, SessionError> {
        if self.practice.is_some() {
            return Err(SessionError::PracticeInProgress);
        }
        let Some(index) = self.module.as_ref().map(|m| m.progress.lesson_index) else {
            return Ok(None);
        };
        self.move_cursor(index + 1);
        Ok(self.current_lesson())
    }

    /// Steps back one lesson, discarding a pending exercise. `None` on the first lesson.
    pub fn previous_lesson(&mut self) -> Option<&Lesson> {
        let index = self.module.as_ref()?.progress.lesson_index;
        if index == 0 {
            return None;
        }
        self.practice = None;
        self.move_cursor(index - 1);
        self.current_lesson()
    }

    /// Jumps to lesson `number` (1-based), discarding a pending exercise.
    /// Out-of-range numbers change nothing and return `None`.
    pub fn go_to_lesson(&mut self, number: usize) -> Option<&Lesson> {
        let total = self.module.as_ref()?.lessons.len();
        if number == 0 || number > total {
            return None;
        }
        self.practice = None;
        self.move_cursor(number - 1);
        self.current_lesson()
    }

    pub fn is_module_complete(&self) -> bool {
        self.module.as_ref().is_some_and(ActiveModule::is_complete)
    }

    /// All lessons of the loaded module, in teaching order.
    pub fn lessons(&self) -> &[Lesson] {
        self.module
            .as_ref()
            .map(|m| m.lessons.lessons.as_slice())
            .unwrap_or_default()
    }

    pub fn lesson_set(&self) -> Option<&LessonSet> {
        self.module.as_ref().map(|m| &m.lessons)
    }

    pub fn progress(&self) -> Option<&Progress> {
        self.module.as_ref().map(|m| &m.progress)
    }

    /// The track of the loaded module, or of the last one used.
    pub fn active_track(&self) -> Option<&dyn Track> {
        self.technology.and_then(|key| self.registry.get(key))
    }

    /// Generates more lessons for a completed module and appends them.
    ///
    /// The cursor already sits on the old boundary, so it lands on the first
    /// new lesson. Returns how many lessons were added.
    pub fn append_more_lessons(&mut self) -> Result<usize, SessionError> {
        let module = match &self.module {
            Some(module) if module.is_complete() => module,
            _ => return Err(SessionError::ModuleNotComplete),
        };
        let track = self
            .registry
            .get(&module.progress.technology)
            .ok_or(SessionError::NoActiveTechnology)?;
        let info = track
            .module(&module.progress.module_key)
            .ok_or_else(|| SessionError::UnknownModule {
                technology: track.name().to_string(),
                module: module.progress.module_key.clone(),
                suggestion: None,
            })?;

        let prompt = track.more_lessons_prompt(info, &module.lessons.lessons);
        let more = self.generator.generate_module(&prompt, MORE_LESSONS_BUDGET)?;
        let added = more.len();
        let extended = ActiveModule {
            lessons: module.lessons.extended(more.lessons),
            progress: module.progress.clone(),
        };
        info!(added, total = extended.lessons.len(), "Appended lessons to module");

        self.module = Some(extended);
        self.persist();
        self.arm_practice();
        Ok(added)
    }

    /// Asks the generator a free-text question about the current technology.
    pub fn answer_question(&self, question: &str) -> Result<String, SessionError> {
        let track = self.active_track().ok_or(SessionError::NoActiveTechnology)?;
        let prompt = track.question_prompt(question);
        Ok(self.generator.answer_question(&prompt, QUESTION_BUDGET)?)
    }

    /// Generates a study summary of a completed module.
    pub fn generate_summary(&self) -> Result<String, SessionError> {
        let module = match &self.module {
            Some(module) if module.is_complete() => module,
            _ => return Err(SessionError::ModuleNotComplete),
        };
        let track = self
            .registry
            .get(&module.progress.technology)
            .ok_or(SessionError::NoActiveTechnology)?;
        let prompt = track.summary_prompt(&module.lessons.module_name, &module.lessons.lessons);
        Ok(self.generator.answer_question(&prompt, SUMMARY_BUDGET)?)
    }

    pub fn status(&self) -> Status {
        let Some(module) = &self.module else {
            return Status::Idle;
        };
        let technology = self
            .registry
            .get(&module.progress.technology)
            .map(|t| t.name().to_string())
            .unwrap_or_else(|| module.progress.technology.clone());
        let module_key = module.progress.module_key.clone();
        let total = module.lessons.len();

        if module.is_complete() {
            Status::Complete {
                technology,
                module_key,
                total,
            }
        } else {
            Status::InProgress {
                technology,
                module_key,
                lesson: module.progress.lesson_index + 1,
                total,
            }
        }
    }

    pub fn state(&self) -> SessionState {
        match &self.module {
            None => SessionState::NoSession,
            Some(module) if module.is_complete() => SessionState::Complete,
            Some(_) if self.practice.is_some() => SessionState::OnPractice,
            Some(_) => SessionState::OnLesson,
        }
    }

    pub fn practice(&self) -> Option<&PracticeState> {
        self.practice.as_ref()
    }

    /// Checks `answer` against the pending exercise, byte for byte.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, SessionError> {
        let practice = self
            .practice
            .as_ref()
            .ok_or(SessionError::NoPracticePending)?;
        if answer != practice.expected_answer {
            return Ok(AnswerOutcome::Incorrect);
        }
        self.clear_practice();
        self.next_lesson().map(|_| AnswerOutcome::Correct)
    }

    /// The pending exercise's hint; `Ok(None)` if the lesson has none.
    pub fn request_hint(&self) -> Result<Option<&str>, SessionError> {
        let practice = self
            .practice
            .as_ref()
            .ok_or(SessionError::NoPracticePending)?;
        Ok(self
            .module
            .as_ref()
            .and_then(|m| m.lessons.get(practice.lesson_index))
            .and_then(Lesson::hint))
    }

    /// Abandons a pending exercise (if any) and advances the cursor.
    pub fn skip(&mut self) -> Result<Option<&Lesson>, SessionError> {
        self.clear_practice();
        self.next_lesson()
    }

    fn install(&mut self, technology: &'static str, lessons: LessonSet, progress: Progress) {
        let index = progress.lesson_index.min(lessons.len());
        self.technology = Some(technology);
        self.cleared.clear();
        self.module = Some(ActiveModule {
            progress: progress.at(index),
            lessons,
        });
        self.persist();
        self.arm_practice();
    }

    fn move_cursor(&mut self, index: usize) {
        let Some(module) = self.module.as_mut() else {
            return;
        };
        let index = index.min(module.lessons.len());
        module.progress = module.progress.at(index);
        self.persist();
        self.arm_practice();
    }

    fn persist(&self) {
        let Some(module) = &self.module else {
            return;
        };
        if let Err(e) = self.store.save(&module.progress) {
            warn!(error = %e, "Could not save progress; continuing with in-memory state");
        }
    }

    fn arm_practice(&mut self) {
        self.practice = self.module.as_ref().and_then(|m| {
            let index = m.progress.lesson_index;
            if self.cleared.contains(&index) {
                return None;
            }
            let expected = m.lessons.get(index)?.practice()?;
            Some(PracticeState {
                lesson_index: index,
                expected_answer: expected.to_string(),
            })
        });
    }

    fn clear_practice(&mut self) {
        if let Some(practice) = self.practice.take() {
            self.cleared.insert(practice.lesson_index);
        }
    }
}
