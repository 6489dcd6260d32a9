//! Errors reported by session operations.
//!
//! None of these end the session; the caller reports them and keeps going.

use crate::generator::GenerationError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("Unknown technology '{technology}'.{}", DidYouMean(.suggestion))]
    UnknownTechnology {
        technology: String,
        suggestion: Option<&'static str>,
    },
    #[error("Unknown module key '{module}' for {technology}.{}", DidYouMean(.suggestion))]
    UnknownModule {
        technology: String,
        module: String,
        suggestion: Option<&'static str>,
    },
    #[error("Could not generate content: {0}")]
    GenerationFailed(#[from] GenerationError),
    #[error("You must finish the current set of lessons first.")]
    ModuleNotComplete,
    #[error("Finish the practice exercise first, or type 'skip' to move on.")]
    PracticeInProgress,
    #[error("Cannot answer without context. Start a module first (e.g. 'start git basics').")]
    NoActiveTechnology,
    #[error("There is no active practice exercise.")]
    NoPracticePending,
}

struct DidYouMean<'a>(&'a Option<&'static str>);

impl fmt::Display for DidYouMean<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(s) => write!(f, " Did you mean '{s}'?"),
            None => Ok(()),
        }
    }
}
