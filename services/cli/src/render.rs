//! Terminal output.
//!
//! Every function writes to any `io::Write`, so the shell can be driven
//! against a buffer in tests. Colour is applied with `colored` and follows its
//! global override (`NO_COLOR`, `CLICOLOR`, or `set_override`).

use crate::command::COMMANDS;
use colored::{ColoredString, Colorize};
use std::io::{self, Write};
use termtutor_core::highlight::{Segment, segments};
use termtutor_core::{Lesson, TrackRegistry};

const SEPARATOR_WIDTH: usize = 60;

fn separator() -> String {
    "─".repeat(SEPARATOR_WIDTH)
}

/// Colour for a tagged run of example output.
fn tag_style(tag: &str, text: &str) -> ColoredString {
    match tag {
        "branch" => text.magenta().bold(),
        "file" | "image" | "path" => text.bright_cyan(),
        "commit" | "volume" | "pid" => text.yellow(),
        "container" | "user" => text.green(),
        _ => text.blue(),
    }
}

fn example_output(text: &str, vocabulary: &[&str]) -> String {
    segments(text, vocabulary)
        .into_iter()
        .map(|segment| match segment {
            Segment::Plain(s) => s.blue().to_string(),
            Segment::Tagged { tag, text } => tag_style(tag, text).to_string(),
        })
        .collect()
}

pub fn lesson(
    out: &mut impl Write,
    lesson: &Lesson,
    vocabulary: &[&str],
    practice: Option<&str>,
) -> io::Result<()> {
    let rule = separator();
    writeln!(out)?;
    writeln!(out, "{}", rule.yellow().bold())?;
    writeln!(out, "{}", format!("Lesson: {}", lesson.title).magenta().bold())?;
    writeln!(out, "{}", rule.yellow().bold())?;
    writeln!(out)?;
    writeln!(out, "{} {}", "[CONCEPT]:".bright_cyan(), lesson.concept.cyan().italic())?;
    writeln!(out)?;
    if !lesson.command.trim().is_empty() {
        writeln!(out, "{}", "[COMMAND]:".bright_cyan())?;
        writeln!(out, "  {}", lesson.command.bright_green())?;
        writeln!(out)?;
    }
    if !lesson.example_output.trim().is_empty() {
        writeln!(out, "{}", "[EXAMPLE OUTPUT]:".bright_cyan())?;
        writeln!(out, "{}", example_output(&lesson.example_output, vocabulary))?;
    }
    writeln!(out, "{}", rule.yellow().bold())?;

    match practice {
        Some(answer) => writeln!(
            out,
            "\n{} {}{}",
            "▶".green(),
            "PRACTICE: Type the command with 'p'. E.g., ".yellow().italic(),
            format!("p '{answer}'").bright_green()
        ),
        None => writeln!(
            out,
            "\n{}",
            "Type 'next' to continue or 'ask <question>' for help.".yellow().italic()
        ),
    }
}

pub fn module_complete(out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "\n{}",
        "Congratulations, you have completed the module!".bright_green().bold()
    )?;
    writeln!(
        out,
        "{}",
        "Type 'more' to generate more lessons or 'summary' for a review."
            .yellow()
            .italic()
    )
}

pub fn track_list(out: &mut impl Write, registry: &TrackRegistry) -> io::Result<()> {
    writeln!(out, "\n{}", "Available Learning Tracks:".yellow().bold())?;
    writeln!(out, "{}", "─".repeat(40))?;
    for track in registry.iter() {
        writeln!(out, "\n{}", format!("{} Modules:", track.name()).bright_cyan())?;
        for module in track.modules() {
            writeln!(
                out,
                "  - {} | {}",
                format!("{:<12}", module.key).bright_yellow(),
                module.title
            )?;
        }
    }
    writeln!(
        out,
        "\n{}",
        "Type 'start <technology> <module>' to begin (e.g., 'start git basics')."
            .yellow()
            .italic()
    )
}

/// Numbered lesson titles; the lesson at `current` (0-based) is marked.
pub fn table_of_contents(
    out: &mut impl Write,
    lessons: &[Lesson],
    current: Option<usize>,
) -> io::Result<()> {
    writeln!(out, "\n{}", "Table of Contents:".yellow().bold())?;
    writeln!(out, "{}", "─".repeat(40))?;
    for (i, lesson) in lessons.iter().enumerate() {
        let line = format!("[{}] {}", i + 1, lesson.title);
        if Some(i) == current {
            writeln!(out, "{} {}", ">".bright_green(), line.bold())?;
        } else {
            writeln!(out, "  {line}")?;
        }
    }
    writeln!(out, "{}", "─".repeat(40))
}

/// A generated free-text response under a heading.
pub fn generated_text(out: &mut impl Write, heading: &str, text: &str) -> io::Result<()> {
    let rule = separator();
    writeln!(out, "\n{rule}")?;
    writeln!(out, "{}", heading.yellow().bold())?;
    writeln!(out, "{rule}\n")?;
    writeln!(out, "{}", text.cyan().italic())?;
    writeln!(out, "\n{rule}")
}

pub fn help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n{}", "Commands:".yellow().bold())?;
    for (usage, description) in COMMANDS {
        writeln!(out, "  {} {description}", format!("{usage:<34}").bright_yellow())?;
    }
    Ok(())
}

pub fn info(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.yellow().italic())
}

pub fn success(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.bright_green().bold())
}

pub fn error(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.bright_red())
}

pub fn status(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.bright_cyan())
}
