//! Splits generated example output into plain and tagged runs.
//!
//! The generator marks interesting substrings with `<tag>...</tag>` using the
//! active track's vocabulary. Rendering decides what each tag looks like.

use regex::Regex;

/// A run of example output, either plain or marked with a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Tagged { tag: &'a str, text: &'a str },
}

/// Matches an opening tag for any name in `vocabulary`.
fn opening_tag(vocabulary: &[&str]) -> Option<Regex> {
    if vocabulary.is_empty() {
        return None;
    }
    let names: Vec<String> = vocabulary.iter().map(|tag| regex::escape(tag)).collect();
    Regex::new(&format!("<({})>", names.join("|"))).ok()
}

/// Splits `text` on tag pairs whose name is in `vocabulary`.
///
/// A pair is an opening tag followed, on the same line, by the closing tag of
/// the same name. Tags outside the vocabulary and opening tags without a
/// matching close stay in place as plain text; scanning resumes right after
/// such an opening tag, so a valid pair behind it is still found.
pub fn segments<'a>(text: &'a str, vocabulary: &[&str]) -> Vec<Segment<'a>> {
    let mut out = Vec::new();
    let mut plain_start = 0;

    if let Some(open_tag) = opening_tag(vocabulary) {
        let mut search_from = 0;
        while let Some(caps) = open_tag.captures_at(text, search_from) {
            let (Some(open), Some(name)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            let rest = &text[open.end()..];
            let line = &rest[..rest.find('\n').unwrap_or(rest.len())];
            let close = format!("</{}>", name.as_str());

            let Some(body_len) = line.find(&close) else {
                search_from = open.end();
                continue;
            };
            if open.start() > plain_start {
                out.push(Segment::Plain(&text[plain_start..open.start()]));
            }
            out.push(Segment::Tagged {
                tag: name.as_str(),
                text: &rest[..body_len],
            });
            plain_start = open.end() + body_len + close.len();
            search_from = plain_start;
        }
    }

    if plain_start < text.len() {
        out.push(Segment::Plain(&text[plain_start..]));
    }
    out
}
