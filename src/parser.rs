use crate::{
    classify::{clean_name, Classifier},
    entry::{Entry, EntryKind},
    utils::normalize_relative,
};
use std::path::{Path, PathBuf};

/// Splits a line into its decorative prefix and its trimmed content.
///
/// The prefix is any run of whitespace, box-drawing glyphs, bullets, `|`, `+`, `-`,
/// backticks and list numbers such as `12. ` in any order. Nothing about the tree
/// dialect is assumed beyond that.
pub fn split_prefix(line: &str) -> (&str, &str) {
    lazy_static::lazy_static! {
        static ref PREFIX_REGEX: regex::Regex = regex::Regex::new(
            r"(?x)        # Enable extended mode
            ^(?:
                # whitespace, box drawing, bullets and ascii tree connectors
                [\s│├└─┬┴┼┤┌┐┘╭╮╯╰┃┣┗┏┠┖━║╟╚╠═|+*•·`\-]
                |
                # numbered list markers: 1. or 1)
                \d+[.)]\s
            )*"
        ).expect("a valid regex pattern");
    }

    let end = PREFIX_REGEX.find(line).map(|m| m.end()).unwrap_or(0);
    let (prefix, rest) = line.split_at(end);

    (prefix, rest.trim())
}

/// Markdown code fence lines (```` ``` ````, ```` ```text ````, `~~~`) wrap
/// pasted trees and carry no entry.
fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();

    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// One open folder: its full relative path and the indentation it was opened at.
#[derive(Debug)]
struct Frame {
    path: PathBuf,
    indent: usize,
}

/// Folders currently open while walking the lines of one parse.
///
/// An empty stack stands in for the sentinel that sits below every real
/// indentation, so top-level lines always close everything.
#[derive(Debug, Default)]
struct IndentStack {
    frames: Vec<Frame>,
}
impl IndentStack {
    /// Closes every folder opened at the same or a deeper indentation.
    fn close_to(&mut self, indent: usize) {
        while self.frames.last().is_some_and(|top| indent <= top.indent) {
            self.frames.pop();
        }
    }

    fn depth(&self) -> usize {
        self.frames.len()
    }

    fn path_for(&self, segment: &Path) -> PathBuf {
        match self.frames.last() {
            Some(parent) => parent.path.join(segment),
            None => segment.to_path_buf(),
        }
    }

    fn open(&mut self, path: PathBuf, indent: usize) {
        self.frames.push(Frame { path, indent });
    }
}

/// Turns loosely indented tree text into an ordered list of [`Entry`] values.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    classifier: Classifier,
}
impl Parser {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Parses `text`. Never fails: blank and unusable lines are skipped.
    ///
    /// Indentation is the raw character length of each line's prefix, so tabs,
    /// spaces and tree glyphs of any width can be mixed as long as deeper lines
    /// have longer prefixes.
    pub fn parse(&self, text: &str) -> Vec<Entry> {
        let mut stack = IndentStack::default();
        let mut entries = Vec::new();

        for raw_line in text.split('\n') {
            let line = raw_line.replace('\r', "");
            if line.trim().is_empty() || is_fence(&line) {
                continue;
            }

            let (prefix, content) = split_prefix(&line);
            if content.is_empty() {
                continue;
            }

            let Some(segment) = normalize_relative(Path::new(clean_name(content))) else {
                log::debug!("skipping line without a usable name: {:?}", line);
                continue;
            };

            let indent = prefix.chars().count();

            stack.close_to(indent);

            let kind = self.classifier.classify(content);
            let path = stack.path_for(&segment);
            let level = stack.depth();

            log::debug!(
                "parsed: {} (level: {}, kind: {}, path: {})",
                content,
                level,
                kind,
                path.display()
            );

            if kind == EntryKind::Folder {
                stack.open(path.clone(), indent);
            }

            entries.push(Entry {
                name: content.to_string(),
                path,
                kind,
                level,
            });
        }

        entries
    }
}

/// Parses `text` with the default extension table and no overrides.
pub fn parse(text: &str) -> Vec<Entry> {
    Parser::default().parse(text)
}
