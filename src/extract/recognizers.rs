//! Structural recognizers
//!
//! Each recognizer finds repeated content blocks by one structural cue and
//! returns the raw (still tagged) text of every block. They are plain
//! functions run in a fixed order; the extractor keeps the results of all of
//! them, since a single page can mix conventions.

use regex::Regex;
use std::sync::LazyLock;

/// A recognizer maps markup to the raw blocks it found
pub type Recognizer = fn(&str) -> Vec<&str>;

/// All recognizers, in the order their blocks are collected
pub const RECOGNIZERS: [(&str, Recognizer); 3] = [
    ("anchor", anchor_blocks),
    ("speech", speech_blocks),
    ("act", act_sections),
];

#[allow(clippy::expect_used)]
static ANCHOR_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<a name=\d+></a>").expect("anchor regex is valid"));

#[allow(clippy::expect_used)]
static ANCHOR_STOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<a name=|</blockquote>|<br clear=all>").expect("anchor stop regex is valid")
});

#[allow(clippy::expect_used)]
static SPEECH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a name="speech\d+"><b>.*?</b></a>\s*<br>\s*(.*?)\s*<br>"#)
        .expect("speech regex is valid")
});

#[allow(clippy::expect_used)]
static ACT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h3>ACT.*?</h3>").expect("act regex is valid"));

#[allow(clippy::expect_used)]
static ACT_STOP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h3>").expect("act stop regex is valid"));

/// Text following a numbered anchor (`<a name=12></a>`), up to the next
/// anchor, `</blockquote>`, `<br clear=all>` or the end of input
pub fn anchor_blocks(markup: &str) -> Vec<&str> {
    delimited_blocks(markup, &ANCHOR_START, &ANCHOR_STOP)
}

/// The line following a speaker marker
/// (`<a name="speech3"><b>HAMLET</b></a><br>`), up to the next `<br>`
pub fn speech_blocks(markup: &str) -> Vec<&str> {
    SPEECH
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Everything after an `<h3>ACT ...</h3>` heading, up to the next `<h3>` or
/// the end of input
pub fn act_sections(markup: &str) -> Vec<&str> {
    delimited_blocks(markup, &ACT_START, &ACT_STOP)
}

/// Collects the text between each `start` match and the next `stop` match
///
/// The stop marker is not consumed, so it may also open the next block.
/// Blocks never overlap.
fn delimited_blocks<'a>(text: &'a str, start: &Regex, stop: &Regex) -> Vec<&'a str> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(open) = start.find_at(text, pos) {
        let body_start = open.end();
        let body_end = stop
            .find_at(text, body_start)
            .map_or(text.len(), |m| m.start());

        blocks.push(&text[body_start..body_end]);
        pos = body_end;
    }

    blocks
}
