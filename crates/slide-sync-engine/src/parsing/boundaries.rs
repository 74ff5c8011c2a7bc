use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::models::Slide;

pub const SECTION_OPEN: &str = "{{% section %}}";
pub const SECTION_CLOSE: &str = "{{% /section %}}";

/// One alternation so that at most one marker kind matches at any position.
///
/// Rules need a blank line on either side: the match starts on the blank line
/// before the rule and `$` must hold on the line after it. Fences match any
/// line starting with three or more backticks; group 2 is the backtick run.
const MARKER_PATTERN: &str = r"(?mR)^(\r?\n-{3,}\r?\n|\r?\n\*{3,}\r?\n|\r?\n_{3,}\r?\n|(`{3,}).*|\{\{% /?section %\}\})$";

fn marker_regex() -> &'static Regex {
    static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    MARKER_REGEX.get_or_init(|| Regex::new(MARKER_PATTERN).expect("Invalid slide marker regex"))
}

/// A line-level token that can start a slide or change scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker<'t> {
    /// A fence line. `run` is the backtick run, `line` the whole line including any info string.
    Fence { run: &'t str, line: &'t str },
    SectionOpen,
    SectionClose,
    /// A `---`, `***` or `___` thematic break.
    Rule,
}

impl<'t> Marker<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        let line = caps.get(1).map_or("", |m| m.as_str());
        if let Some(run) = caps.get(2) {
            Marker::Fence {
                run: run.as_str(),
                line,
            }
        } else if line == SECTION_OPEN {
            Marker::SectionOpen
        } else if line == SECTION_CLOSE {
            Marker::SectionClose
        } else {
            Marker::Rule
        }
    }
}

/// Whether the scanner is inside a fenced code block, and which fence opened it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceState<'t> {
    Normal,
    InFence(&'t str),
}

#[derive(Debug)]
struct Scanner<'t> {
    fence: FenceState<'t>,
    in_vertical: bool,
    horizontal: usize,
    vertical: usize,
    slides: Vec<Slide>,
}

impl<'t> Scanner<'t> {
    fn new() -> Self {
        Self {
            fence: FenceState::Normal,
            in_vertical: false,
            horizontal: 0,
            vertical: 0,
            slides: vec![Slide::FIRST],
        }
    }

    /// Feed one marker; `end` is the character offset just past the matched text.
    fn step(&mut self, marker: Marker<'t>, end: usize) {
        match (self.fence, marker) {
            (FenceState::Normal, Marker::Fence { run, .. }) => {
                self.fence = FenceState::InFence(run);
            }
            (FenceState::InFence(open), Marker::Fence { line, .. }) => {
                // Only a bare fence of exactly the same run closes; anything else is fence content.
                if open == line {
                    self.fence = FenceState::Normal;
                }
            }
            (FenceState::InFence(_), _) => {}
            (FenceState::Normal, Marker::SectionOpen) => {
                self.in_vertical = true;
            }
            (FenceState::Normal, Marker::SectionClose) => {
                self.in_vertical = false;
                self.vertical = 0;
            }
            (FenceState::Normal, Marker::Rule) => {
                if self.in_vertical {
                    self.vertical += 1;
                } else {
                    self.horizontal += 1;
                }
                self.slides
                    .push(Slide::new(self.horizontal, self.vertical, end));
            }
        }
    }
}

/// Scan a document's text for slide boundaries.
///
/// The result always starts with [`Slide::FIRST`] and is ordered by offset.
/// Offsets count characters, not bytes. Text after an unterminated code
/// fence contributes no boundaries.
pub fn scan_slides(text: &str) -> Vec<Slide> {
    let mut scanner = Scanner::new();
    let mut counted_bytes = 0;
    let mut counted_chars = 0;
    for caps in marker_regex().captures_iter(text) {
        let end = caps.get(0).map_or(counted_bytes, |m| m.end());
        counted_chars += text[counted_bytes..end].chars().count();
        counted_bytes = end;
        scanner.step(Marker::from_captures(&caps), counted_chars);
    }
    scanner.slides
}
