pub mod error;
pub mod generator;
pub mod highlight;
pub mod lesson;
pub mod progress;
pub mod session;
pub mod tracks;

pub use error::SessionError;
pub use generator::{ChatCompletionsGenerator, ContentGenerator, GenerationError, GeneratorConfig};
pub use lesson::{Lesson, LessonSet};
pub use progress::{FileProgressStore, InMemoryProgressStore, Progress, ProgressStore};
pub use session::{AnswerOutcome, PracticeState, SessionState, Status, TutorSession};
pub use tracks::{ModuleInfo, Track, TrackRegistry};
