//! The interactive shell: one parsed command per line, dispatched to the
//! tutoring session, with results rendered to the terminal.

use crate::command::{self, Command};
use crate::render;
use std::io::{self, Write};
use termtutor_core::{AnswerOutcome, TutorSession};
use tracing::debug;

pub const PROMPT: &str = "termtutor > ";

/// What the read loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<W: Write> {
    session: TutorSession,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(session: TutorSession, out: W) -> Self {
        Self { session, out }
    }

    pub fn session(&self) -> &TutorSession {
        &self.session
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn welcome(&mut self) -> io::Result<()> {
        render::success(&mut self.out, "Welcome to termtutor!")?;
        render::info(
            &mut self.out,
            "Type 'list' to see what you can learn, or 'help' for all commands.",
        )
    }

    /// Restores the saved module, if any, and shows where the learner left off.
    pub fn resume(&mut self) -> io::Result<()> {
        match self.session.resume() {
            Ok(Some(_)) => {
                let status = self.session.status().to_string();
                render::info(&mut self.out, &format!("Resuming your previous session. {status}"))?;
                self.show_current()
            }
            Ok(None) => Ok(()),
            Err(e) => render::error(
                &mut self.out,
                &format!("Could not resume your previous session. {e}"),
            ),
        }
    }

    /// Parses and executes one input line.
    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let flow = match command::parse(line) {
            Ok(Some(command)) => {
                debug!(?command, "Executing command");
                self.execute(command)?
            }
            Ok(None) => Flow::Continue,
            Err(e) => {
                render::error(&mut self.out, &e.to_string())?;
                Flow::Continue
            }
        };
        self.out.flush()?;
        Ok(flow)
    }

    fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::List => render::track_list(&mut self.out, self.session.tracks())?,
            Command::Start { technology, module } => {
                render::info(
                    &mut self.out,
                    "Please wait, generating your personalized lesson plan...",
                )?;
                self.out.flush()?;
                match self.session.start_module(&technology, &module) {
                    Ok(()) => self.show_current()?,
                    Err(e) => render::error(&mut self.out, &e.to_string())?,
                }
            }
            Command::Next => match self.session.next_lesson().map(|_| ()) {
                Ok(()) => self.show_current()?,
                Err(e) => render::error(&mut self.out, &e.to_string())?,
            },
            Command::Prev => {
                if self.session.previous_lesson().is_some() {
                    self.show_current()?;
                } else if self.session.lesson_set().is_none() {
                    self.no_module()?;
                } else {
                    render::info(&mut self.out, "You are already on the first lesson.")?;
                }
            }
            Command::Goto(number) => {
                if self.session.go_to_lesson(number).is_some() {
                    self.show_current()?;
                } else if self.session.lesson_set().is_none() {
                    self.no_module()?;
                } else {
                    render::error(
                        &mut self.out,
                        "Invalid lesson number. Use 'toc' to see the list.",
                    )?;
                }
            }
            Command::Toc => {
                if self.session.lesson_set().is_none() {
                    self.no_module()?;
                } else {
                    let current = self.session.progress().map(|p| p.lesson_index);
                    render::table_of_contents(&mut self.out, self.session.lessons(), current)?;
                }
            }
            Command::Practice(answer) => match self.session.submit_answer(&answer) {
                Ok(AnswerOutcome::Correct) => {
                    render::success(&mut self.out, "\nCorrect! Well done.")?;
                    self.show_current()?;
                }
                Ok(AnswerOutcome::Incorrect) => render::error(
                    &mut self.out,
                    "Not quite. Please try again. Type 'hint' if you're stuck.",
                )?,
                Err(e) => render::info(&mut self.out, &e.to_string())?,
            },
            Command::Hint => match self.session.request_hint() {
                Ok(Some(hint)) => render::info(&mut self.out, &format!("Hint: {hint}"))?,
                Ok(None) => render::info(
                    &mut self.out,
                    "Sorry, no hint is available for this lesson.",
                )?,
                Err(e) => render::info(&mut self.out, &e.to_string())?,
            },
            Command::Skip => {
                if self.session.practice().is_some() {
                    render::info(&mut self.out, "Skipping exercise...")?;
                }
                match self.session.skip().map(|_| ()) {
                    Ok(()) => self.show_current()?,
                    Err(e) => render::error(&mut self.out, &e.to_string())?,
                }
            }
            Command::More => {
                if self.session.is_module_complete() {
                    render::info(
                        &mut self.out,
                        "Generating more advanced lessons... this may take a moment.",
                    )?;
                    self.out.flush()?;
                }
                match self.session.append_more_lessons() {
                    Ok(added) => {
                        render::success(
                            &mut self.out,
                            &format!("\n{added} new lessons have been added!"),
                        )?;
                        self.show_current()?;
                    }
                    Err(e) => render::error(&mut self.out, &e.to_string())?,
                }
            }
            Command::Ask(question) => {
                if self.session.active_track().is_some() {
                    render::info(&mut self.out, "Asking the tutor for help...")?;
                    self.out.flush()?;
                }
                match self.session.answer_question(&question) {
                    Ok(answer) => {
                        render::generated_text(&mut self.out, "TUTOR'S RESPONSE:", &answer)?
                    }
                    Err(e) => render::error(&mut self.out, &e.to_string())?,
                }
            }
            Command::Status => {
                render::status(&mut self.out, &self.session.status().to_string())?
            }
            Command::Summary => match self.session.generate_summary() {
                Ok(summary) => {
                    render::generated_text(&mut self.out, "MODULE SUMMARY:", &summary)?
                }
                Err(e) => render::error(&mut self.out, &e.to_string())?,
            },
            Command::Help => render::help(&mut self.out)?,
            Command::Version => writeln!(
                self.out,
                "termtutor version {}",
                env!("CARGO_PKG_VERSION")
            )?,
            Command::Exit => {
                render::info(&mut self.out, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn show_current(&mut self) -> io::Result<()> {
        match self.session.current_lesson() {
            Some(lesson) => {
                let vocabulary = self
                    .session
                    .active_track()
                    .map(|track| track.tag_names())
                    .unwrap_or_default();
                let practice = self.session.practice().map(|p| p.expected_answer());
                render::lesson(&mut self.out, lesson, &vocabulary, practice)
            }
            None if self.session.is_module_complete() => render::module_complete(&mut self.out),
            None => self.no_module(),
        }
    }

    fn no_module(&mut self) -> io::Result<()> {
        render::info(
            &mut self.out,
            "No active module. Use 'start <technology> <module>' to begin.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use termtutor_core::{
        ContentGenerator, GenerationError, InMemoryProgressStore, Lesson, LessonSet, Progress,
        ProgressStore, TrackRegistry,
    };

    /// Answers every module request with the next scripted lesson set.
    struct ScriptedGenerator {
        modules: RefCell<Vec<Result<LessonSet, GenerationError>>>,
    }

    impl ScriptedGenerator {
        fn new(modules: Vec<Result<LessonSet, GenerationError>>) -> Self {
            Self {
                modules: RefCell::new(modules),
            }
        }
    }

    impl ContentGenerator for ScriptedGenerator {
        fn generate_module(&self, _: &str, _: u32) -> Result<LessonSet, GenerationError> {
            let mut modules = self.modules.borrow_mut();
            if modules.is_empty() {
                return Err(GenerationError::EmptyResponse);
            }
            modules.remove(0)
        }

        fn answer_question(&self, _: &str, _: u32) -> Result<String, GenerationError> {
            Ok("Use `git log --oneline`.".to_string())
        }
    }

    fn git_lessons() -> LessonSet {
        LessonSet::new(
            "Git Basics: The First Steps",
            vec![
                Lesson {
                    title: "What is Git?".into(),
                    concept: "A distributed version control system.".into(),
                    ..Default::default()
                },
                Lesson {
                    title: "Checking Status".into(),
                    concept: "See what changed.".into(),
                    command: "git status".into(),
                    example_output: "On branch <branch>main</branch>".into(),
                    practice_command: "git status".into(),
                    hint: "Two words.".into(),
                },
            ],
        )
    }

    fn shell_with(
        modules: Vec<Result<LessonSet, GenerationError>>,
        store: InMemoryProgressStore,
    ) -> Shell<Vec<u8>> {
        colored::control::set_override(false);
        let session =
            TutorSession::new(TrackRegistry::builtin(), ScriptedGenerator::new(modules), store);
        Shell::new(session, Vec::new())
    }

    fn shell() -> Shell<Vec<u8>> {
        shell_with(vec![Ok(git_lessons())], InMemoryProgressStore::new())
    }

    /// Runs `line` and returns only the output it produced.
    fn run(shell: &mut Shell<Vec<u8>>, line: &str) -> String {
        let before = shell.output().len();
        assert_eq!(shell.handle_line(line).unwrap(), Flow::Continue);
        String::from_utf8_lossy(&shell.output()[before..]).into_owned()
    }

    #[test]
    fn test_start_shows_first_lesson() {
        let mut shell = shell();
        let out = run(&mut shell, "start git basics");

        assert!(out.contains("generating your personalized lesson plan"));
        assert!(out.contains("Lesson: What is Git?"));
        assert!(out.contains("Type 'next' to continue"));
    }

    #[test]
    fn test_start_unknown_technology_suggests() {
        let mut shell = shell();
        let out = run(&mut shell, "start dock basics");
        assert!(out.contains("Unknown technology 'dock'. Did you mean 'docker'?"));
    }

    #[test]
    fn test_generation_failure_is_reported_and_loop_continues() {
        let mut shell = shell_with(
            vec![Err(GenerationError::NoJsonObject)],
            InMemoryProgressStore::new(),
        );
        let out = run(&mut shell, "start git basics");
        assert!(out.contains("Could not generate content"));
        assert!(run(&mut shell, "status").contains("No tutorial in progress."));
    }

    #[test]
    fn test_practice_flow_through_the_shell() {
        let mut shell = shell();
        run(&mut shell, "start git basics");

        let out = run(&mut shell, "next");
        assert!(out.contains("Lesson: Checking Status"));
        assert!(out.contains("On branch main"));
        assert!(out.contains("p 'git status'"));

        assert!(run(&mut shell, "next").contains("Finish the practice exercise first"));
        assert!(run(&mut shell, "hint").contains("Hint: Two words."));
        assert!(run(&mut shell, "p 'git stat'").contains("Not quite."));

        let out = run(&mut shell, "p 'git status'");
        assert!(out.contains("Correct! Well done."));
        assert!(out.contains("Congratulations, you have completed the module!"));
        assert!(run(&mut shell, "status").contains(
            "You have completed all 2 lessons of the 'basics' module for Git!"
        ));
    }

    #[test]
    fn test_navigation_messages() {
        let mut shell = shell();
        assert!(run(&mut shell, "prev").contains("No active module."));
        assert!(run(&mut shell, "toc").contains("No active module."));

        run(&mut shell, "start git basics");
        assert!(run(&mut shell, "prev").contains("already on the first lesson"));
        assert!(run(&mut shell, "goto 9").contains("Invalid lesson number."));

        let toc = run(&mut shell, "toc");
        assert!(toc.contains("> [1] What is Git?"));
        assert!(toc.contains("  [2] Checking Status"));

        assert!(run(&mut shell, "goto 2").contains("Lesson: Checking Status"));
        assert!(run(&mut shell, "status").contains("Lesson 2 of 2."));
    }

    #[test]
    fn test_toc_of_an_empty_module_is_an_empty_table() {
        let mut shell = shell_with(
            vec![Ok(LessonSet::new("Nothing yet", Vec::new()))],
            InMemoryProgressStore::new(),
        );
        run(&mut shell, "start git basics");
        assert!(shell.session().lesson_set().is_some());

        let toc = run(&mut shell, "toc");
        assert!(toc.contains("Table of Contents:"));
        assert!(!toc.contains("No active module."));
        assert!(!toc.contains("[1]"));
    }

    #[test]
    fn test_more_appends_and_shows_first_new_lesson() {
        let extra = LessonSet::new(
            "more",
            vec![Lesson {
                title: "Viewing History".into(),
                command: "git log".into(),
                ..Default::default()
            }],
        );
        let mut shell = shell_with(
            vec![Ok(git_lessons()), Ok(extra)],
            InMemoryProgressStore::new(),
        );
        run(&mut shell, "start git basics");
        assert!(run(&mut shell, "more").contains("You must finish the current set of lessons first."));

        run(&mut shell, "next");
        run(&mut shell, "skip");
        let out = run(&mut shell, "more");

        assert!(out.contains("1 new lessons have been added!"));
        assert!(out.contains("Lesson: Viewing History"));
        assert!(run(&mut shell, "status").contains("Lesson 3 of 3."));
    }

    #[test]
    fn test_ask_requires_context() {
        let mut shell = shell();
        assert!(run(&mut shell, "ask how do I see history?").contains("Cannot answer without context."));

        run(&mut shell, "start git basics");
        let out = run(&mut shell, "ask how do I see history?");
        assert!(out.contains("TUTOR'S RESPONSE:"));
        assert!(out.contains("Use `git log --oneline`."));
    }

    #[test]
    fn test_resume_shows_saved_lesson() {
        let store = InMemoryProgressStore::with_progress(Progress::new("git", "basics").at(1));
        let mut shell = shell_with(vec![Ok(git_lessons())], store.clone());

        shell.resume().unwrap();
        let out = String::from_utf8_lossy(shell.output()).into_owned();

        assert!(out.contains("Resuming your previous session."));
        assert!(out.contains("Lesson 2 of 2."));
        assert!(out.contains("Lesson: Checking Status"));
        assert_eq!(store.load().unwrap().lesson_index, 1);
    }

    #[test]
    fn test_parse_errors_and_exit() {
        let mut shell = shell();
        assert!(run(&mut shell, "fly").contains("Unknown command 'fly'"));
        assert!(run(&mut shell, "goto x").contains("Usage: goto <lesson number>"));
        assert!(run(&mut shell, "version").contains("termtutor version"));
        assert_eq!(shell.handle_line("   ").unwrap(), Flow::Continue);
        assert_eq!(shell.handle_line("quit").unwrap(), Flow::Exit);
        assert!(shell.session().lesson_set().is_none());
    }
}
