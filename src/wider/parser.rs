//! Line-oriented state machine over WIDER Face annotation files.
//!
//! A WIDER annotation file is a flat sequence of blocks:
//!
//! ```text
//! 0--Parade/0_Parade_marchingband_1_849.jpg
//! 1
//! 449 330 122 149 0 0 0 0 0 0
//! ```
//!
//! An image line, a line holding the number of boxes, then that many box
//! lines. The parser walks the lines once and yields one
//! [`AnnotationRecord`] per block. Problems are never fatal: each one is
//! logged, kept as a [`ParseIssue`], and scanning continues.

use std::fmt;
use std::iter::Fuse;

use serde::Serialize;

use super::model::{AnnotationRecord, BoundingBox};

const IMAGE_SUFFIXES: [&str; 2] = [".jpg", ".jpeg"];

/// Stable codes for recoverable parse problems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ParseIssueCode {
    /// A non-blank line at a record boundary that is not an image path.
    UnexpectedLine,
    /// The line after an image path is not a non-negative integer.
    InvalidBoxCount,
    /// Input ended right after an image path.
    MissingBoxCount,
    /// A box line with fewer than four tokens.
    IncompleteBox,
    /// A box line whose first four tokens are not all integers.
    InvalidBoxValue,
    /// Input ended before the declared number of box lines.
    TruncatedBoxList,
}

/// A recoverable problem found while parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    /// 1-based line number the issue refers to.
    pub line: usize,
    pub code: ParseIssueCode,
    pub message: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: [{:?}] {}", self.line, self.code, self.message)
    }
}

#[derive(Debug)]
enum ParserState {
    ExpectBoundary,
    ExpectCount {
        image_path: String,
        line_number: usize,
    },
    ExpectBox {
        record: AnnotationRecord,
        remaining: usize,
    },
}

/// Lazy iterator of [`AnnotationRecord`]s over the lines of a WIDER file.
///
/// The parser consumes its input exactly once. To parse again, build a new
/// parser from the start of the input.
///
/// ```
/// use widerlabel::wider::AnnotationParser;
///
/// let input = "a/b.jpg\n2\n1 2 3 4\n5 6 7\n";
/// let mut parser = AnnotationParser::new(input.lines());
/// let record = parser.next().expect("one record");
/// assert_eq!(record.box_count, 2);
/// assert_eq!(record.boxes.len(), 1);
/// assert!(parser.next().is_none());
/// assert_eq!(parser.issues().len(), 1);
/// ```
pub struct AnnotationParser<I: Iterator> {
    lines: Fuse<I>,
    line_number: usize,
    state: ParserState,
    issues: Vec<ParseIssue>,
}

impl<I, S> AnnotationParser<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines: lines.fuse(),
            line_number: 0,
            state: ParserState::ExpectBoundary,
            issues: Vec::new(),
        }
    }

    /// Issues recorded so far.
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Consumes the parser, returning every issue it recorded.
    pub fn into_issues(self) -> Vec<ParseIssue> {
        self.issues
    }

    fn report(&mut self, line: usize, code: ParseIssueCode, message: String) {
        tracing::warn!(line, code = ?code, "{}", message);
        self.issues.push(ParseIssue {
            line,
            code,
            message,
        });
    }

    /// Advances the state machine by one line, returning a record when one
    /// is complete.
    fn step(&mut self, state: ParserState, line: &str) -> Option<AnnotationRecord> {
        let line_number = self.line_number;

        match state {
            ParserState::ExpectBoundary => {
                if is_image_line(line) {
                    tracing::debug!(line = line_number, image = line, "found image");
                    self.state = ParserState::ExpectCount {
                        image_path: line.to_string(),
                        line_number,
                    };
                } else if !line.is_empty() {
                    self.report(
                        line_number,
                        ParseIssueCode::UnexpectedLine,
                        format!("Unexpected line: {line}"),
                    );
                }
                None
            }
            ParserState::ExpectCount {
                image_path,
                line_number: image_line,
            } => match line.parse::<usize>() {
                Ok(count) => {
                    tracing::debug!(image = %image_path, count, "box count");
                    let record =
                        AnnotationRecord::new(image_path, image_line, line.to_string(), count);
                    self.expect_boxes(record, count)
                }
                Err(_) => {
                    // Only the count line is skipped. Any box lines that
                    // follow are rescanned as record boundaries.
                    self.report(
                        line_number,
                        ParseIssueCode::InvalidBoxCount,
                        format!(
                            "Expected number of bounding boxes after image {image_path}, but got: {line}"
                        ),
                    );
                    None
                }
            },
            ParserState::ExpectBox {
                mut record,
                remaining,
            } => {
                record.source_lines.push(line.to_string());
                match parse_box_line(line) {
                    Ok(bbox) => record.boxes.push(bbox),
                    Err((code, reason)) => self.report(
                        line_number,
                        code,
                        format!("{reason}: {line} for image {}", record.image_path),
                    ),
                }
                self.expect_boxes(record, remaining - 1)
            }
        }
    }

    fn expect_boxes(
        &mut self,
        record: AnnotationRecord,
        remaining: usize,
    ) -> Option<AnnotationRecord> {
        if remaining == 0 {
            Some(record)
        } else {
            self.state = ParserState::ExpectBox { record, remaining };
            None
        }
    }

    /// Handles end of input in whatever state the machine was left in.
    fn finish(&mut self, state: ParserState) -> Option<AnnotationRecord> {
        match state {
            ParserState::ExpectBoundary => None,
            ParserState::ExpectCount {
                image_path,
                line_number,
            } => {
                self.report(
                    line_number,
                    ParseIssueCode::MissingBoxCount,
                    format!("No bounding boxes found for image {image_path}."),
                );
                None
            }
            ParserState::ExpectBox { record, .. } => {
                self.report(
                    self.line_number,
                    ParseIssueCode::TruncatedBoxList,
                    format!(
                        "Not enough bounding box lines for image {}. Expected {}, but found {}.",
                        record.image_path,
                        record.box_count,
                        record.consumed_box_lines()
                    ),
                );
                Some(record)
            }
        }
    }
}

impl<I, S> Iterator for AnnotationParser<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = AnnotationRecord;

    fn next(&mut self) -> Option<AnnotationRecord> {
        loop {
            let state = std::mem::replace(&mut self.state, ParserState::ExpectBoundary);

            let Some(raw) = self.lines.next() else {
                return self.finish(state);
            };
            self.line_number += 1;

            if let Some(record) = self.step(state, raw.as_ref().trim()) {
                return Some(record);
            }
        }
    }
}

/// Parse a whole annotation document held in memory.
///
/// Returns every record along with the issues met on the way.
pub fn parse_wider_str(input: &str) -> (Vec<AnnotationRecord>, Vec<ParseIssue>) {
    let mut parser = AnnotationParser::new(input.lines());
    let records: Vec<AnnotationRecord> = parser.by_ref().collect();
    (records, parser.into_issues())
}

/// Fuzz-only entrypoint for whole-document parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_wider_str(input: &str) {
    let (records, _) = parse_wider_str(input);
    for record in &records {
        assert!(record.consumed_box_lines() <= record.box_count);
        assert!(record.boxes.len() <= record.consumed_box_lines());
    }
}

fn is_image_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    IMAGE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

fn parse_box_line(line: &str) -> Result<BoundingBox, (ParseIssueCode, &'static str)> {
    let tokens: Vec<&str> = line.split_whitespace().take(4).collect();
    let [x, y, w, h] = tokens[..] else {
        return Err((
            ParseIssueCode::IncompleteBox,
            "Incomplete bounding box data",
        ));
    };

    let parse = |raw: &str| {
        raw.parse::<i32>()
            .map_err(|_| (ParseIssueCode::InvalidBoxValue, "Invalid bounding box values"))
    };

    Ok(BoundingBox::new(parse(x)?, parse(y)?, parse(w)?, parse(h)?))
}
