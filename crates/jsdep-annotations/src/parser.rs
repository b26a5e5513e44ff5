//! Streaming parser for the leading annotation block
//!
//! Lines are read one at a time until the first line that is neither blank
//! nor part of a comment. Directives found after that point are not honored.

use std::io::BufRead;
use std::ops::Range;
use std::path::PathBuf;

use tracing::trace;

use crate::annotation::{Annotation, AnnotationError, AnnotationKind};

/// Everything the leading block of one file declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAnnotations {
    pub annotations: Vec<Annotation>,
    pub errors: Vec<AnnotationError>,
}

impl ParsedAnnotations {
    /// Whether the file carries `@root`.
    pub fn is_root(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| a.kind == AnnotationKind::Root)
    }

    /// Directives naming another file, in declaration order.
    pub fn dependencies(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(|a| a.kind.takes_path())
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse the leading annotation block read from `reader`.
pub fn parse_annotations<R: BufRead>(reader: R, path: impl Into<PathBuf>) -> ParsedAnnotations {
    AnnotationParser::new(reader, path).parse()
}

enum Line<'a> {
    Blank,
    Comment(&'a str),
    /// A comment closes and code follows on the same line.
    CommentThenCode(&'a str),
    Code,
}

pub struct AnnotationParser<R> {
    reader: R,
    path: PathBuf,
    line: usize,
    offset: usize,
    /// Line and span where the open block comment started.
    open_block: Option<(usize, Range<usize>)>,
}

impl<R: BufRead> AnnotationParser<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            path: path.into(),
            line: 0,
            offset: 0,
            open_block: None,
        }
    }

    /// Consume the reader up to the end of the annotation block.
    pub fn parse(mut self) -> ParsedAnnotations {
        let mut parsed = ParsedAnnotations::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    let at = self.offset;
                    parsed.errors.push(self.error(
                        self.line + 1,
                        at..at,
                        format!("cannot read file: {e}"),
                    ));
                    return parsed;
                }
            };

            self.line += 1;
            let start = self.offset;
            self.offset += read;

            let mut end = buf.len();
            while end > 0 && matches!(buf[end - 1], b'\n' | b'\r') {
                end -= 1;
            }
            let span = start..start + end;
            let text = String::from_utf8_lossy(&buf[..end]);

            match self.classify(&text, &span) {
                Line::Blank => {}
                Line::Comment(content) => self.parse_directive(content, span, &mut parsed),
                Line::CommentThenCode(content) => {
                    self.parse_directive(content, span, &mut parsed);
                    break;
                }
                Line::Code => {
                    trace!(path = %self.path.display(), line = self.line, "annotation block ends");
                    break;
                }
            }
        }

        if let Some((line, span)) = self.open_block.take() {
            parsed
                .errors
                .push(self.error(line, span, "unterminated block comment"));
        }

        parsed
    }

    fn classify<'a>(&mut self, text: &'a str, span: &Range<usize>) -> Line<'a> {
        let text = match text.strip_prefix('\u{feff}') {
            Some(rest) if self.line == 1 => rest,
            _ => text,
        };
        let trimmed = text.trim();

        if self.open_block.is_some() {
            return self.block_line(trimmed, span);
        }
        if trimmed.is_empty() || (self.line == 1 && trimmed.starts_with("#!")) {
            return Line::Blank;
        }
        if let Some(rest) = trimmed.strip_prefix("//") {
            return Line::Comment(rest.trim_start_matches('/').trim());
        }
        if let Some(rest) = trimmed.strip_prefix("/*") {
            self.open_block = Some((self.line, span.clone()));
            return self.block_line(rest, span);
        }
        Line::Code
    }

    /// A line inside a block comment, possibly the one closing it.
    fn block_line<'a>(&mut self, text: &'a str, span: &Range<usize>) -> Line<'a> {
        let Some(end) = text.find("*/") else {
            return Line::Comment(strip_star(text));
        };

        self.open_block = None;
        let content = strip_star(&text[..end]);
        let rest = text[end + 2..].trim();

        if rest.is_empty() || rest.starts_with("//") {
            Line::Comment(content)
        } else if let Some(next) = rest.strip_prefix("/*") {
            if !next.contains("*/") {
                self.open_block = Some((self.line, span.clone()));
            }
            Line::Comment(content)
        } else {
            Line::CommentThenCode(content)
        }
    }

    fn parse_directive(&self, content: &str, span: Range<usize>, parsed: &mut ParsedAnnotations) {
        let mut words = content.split_whitespace();
        let Some(keyword) = words.next().and_then(|w| w.strip_prefix('@')) else {
            return;
        };
        let Some(kind) = AnnotationKind::from_keyword(keyword) else {
            trace!(keyword, "ignoring unknown tag");
            return;
        };

        let args: Vec<&str> = words.collect();
        let result = match (kind, args.as_slice()) {
            (AnnotationKind::Root, []) => Ok((kind, None)),
            (AnnotationKind::Root, [arg, ..]) => Err(format!("unexpected '{arg}' after {kind}")),
            (AnnotationKind::Require, [target, flag])
                if *flag == "@nocompile" && !target.starts_with('@') =>
            {
                Ok((AnnotationKind::NoCompile, Some(target.to_string())))
            }
            (_, [target]) if !target.starts_with('@') => Ok((kind, Some(target.to_string()))),
            (_, []) | (_, [_]) => Err(format!("{kind} expects a path")),
            (_, [_, extra, ..]) => Err(format!("unexpected '{extra}' after {kind} path")),
        };

        match result {
            Ok((kind, target)) => {
                let annotation = Annotation::new(kind, target, self.line, span);
                trace!(path = %self.path.display(), %annotation, "annotation");
                parsed.annotations.push(annotation);
            }
            Err(message) => parsed.errors.push(self.error(self.line, span, message)),
        }
    }

    fn error(&self, line: usize, span: Range<usize>, message: impl Into<String>) -> AnnotationError {
        AnnotationError::new(self.path.clone(), line, span, message)
    }
}

/// Strip the decoration of a block comment line (` * text`).
fn strip_star(text: &str) -> &str {
    text.trim().trim_start_matches('*').trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> ParsedAnnotations {
        parse_annotations(source.as_bytes(), "test.js")
    }

    fn summary(parsed: &ParsedAnnotations) -> Vec<(AnnotationKind, Option<&str>, usize)> {
        parsed
            .annotations
            .iter()
            .map(|a| (a.kind, a.target.as_deref(), a.line))
            .collect()
    }

    #[test]
    fn test_line_comments() {
        let parsed = parse(
            "// @root\n\
             // @require lib/util.js\n\
             // @require theme.css\n\
             \n\
             var x = 1;\n",
        );
        assert!(parsed.is_root());
        assert!(!parsed.has_errors());
        assert_eq!(
            summary(&parsed),
            vec![
                (AnnotationKind::Root, None, 1),
                (AnnotationKind::Require, Some("lib/util.js"), 2),
                (AnnotationKind::Require, Some("theme.css"), 3),
            ]
        );
    }

    #[test]
    fn test_block_comment() {
        let parsed = parse(
            "/**\n\
             \x20* Widget.\n\
             \x20*\n\
             \x20* @require a.js\n\
             \x20* @remote jquery.js\n\
             \x20*/\n\
             function widget() {}\n",
        );
        assert_eq!(
            summary(&parsed),
            vec![
                (AnnotationKind::Require, Some("a.js"), 4),
                (AnnotationKind::Remote, Some("jquery.js"), 5),
            ]
        );
    }

    #[test]
    fn test_single_line_block() {
        let parsed = parse("/* @root */\n/** @require a.js */\ncode();\n");
        assert_eq!(
            summary(&parsed),
            vec![
                (AnnotationKind::Root, None, 1),
                (AnnotationKind::Require, Some("a.js"), 2),
            ]
        );
    }

    #[test]
    fn test_nocompile_forms() {
        let parsed = parse("// @require legacy.js @nocompile\n// @nocompile other.js\n");
        assert_eq!(
            summary(&parsed),
            vec![
                (AnnotationKind::NoCompile, Some("legacy.js"), 1),
                (AnnotationKind::NoCompile, Some("other.js"), 2),
            ]
        );
    }

    #[test]
    fn test_stops_at_first_code_line() {
        let parsed = parse("// @require a.js\n'use strict';\n// @require b.js\n");
        assert_eq!(summary(&parsed), vec![(AnnotationKind::Require, Some("a.js"), 1)]);
    }

    #[test]
    fn test_comment_then_code_on_same_line() {
        let parsed = parse("/* @require a.js */ var x;\n// @require b.js\n");
        assert_eq!(summary(&parsed), vec![(AnnotationKind::Require, Some("a.js"), 1)]);
    }

    #[test]
    fn test_unknown_tags_are_plain_comments() {
        let parsed = parse("// @license MIT\n// @author someone\n// plain text\n// @require a.js\n");
        assert!(!parsed.has_errors());
        assert_eq!(summary(&parsed), vec![(AnnotationKind::Require, Some("a.js"), 4)]);
    }

    #[test]
    fn test_malformed_directives_keep_parsing() {
        let parsed = parse(
            "// @require\n\
             // @root now\n\
             // @remote a.js b.js\n\
             // @require ok.js\n",
        );
        assert_eq!(summary(&parsed), vec![(AnnotationKind::Require, Some("ok.js"), 4)]);

        let messages: Vec<_> = parsed.errors.iter().map(|e| (e.line, e.message.as_str())).collect();
        assert_eq!(
            messages,
            vec![
                (1, "@require expects a path"),
                (2, "unexpected 'now' after @root"),
                (3, "unexpected 'b.js' after @remote path"),
            ]
        );
        assert_eq!(parsed.errors[0].to_string(), "test.js:1: @require expects a path");
    }

    #[test]
    fn test_unterminated_block() {
        let parsed = parse("/*\n * @root\n");
        assert!(parsed.is_root());
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 1);
        assert_eq!(parsed.errors[0].message, "unterminated block comment");
    }

    #[test]
    fn test_reopened_block_error_points_at_its_line() {
        let parsed = parse("// @root\n/* a */ /* b\n * @require x.js\n");
        assert_eq!(summary(&parsed)[1], (AnnotationKind::Require, Some("x.js"), 3));
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 2);
        assert_eq!(parsed.errors[0].span, 9..21);
    }

    #[test]
    fn test_spans_and_crlf() {
        let parsed = parse("// @root\r\n// @require a.js\r\nx();\r\n");
        assert_eq!(parsed.annotations[0].span, 0..8);
        assert_eq!(parsed.annotations[1].span, 10..26);
    }

    #[test]
    fn test_shebang_and_empty_input() {
        let parsed = parse("#!/usr/bin/env node\n// @require a.js\n");
        assert_eq!(summary(&parsed), vec![(AnnotationKind::Require, Some("a.js"), 2)]);

        assert_eq!(parse(""), ParsedAnnotations::default());
    }

    #[test]
    fn test_byte_order_mark_on_first_line() {
        let parsed = parse("\u{feff}// @require a.js\nmain();\n");
        assert!(!parsed.has_errors());
        assert_eq!(summary(&parsed), vec![(AnnotationKind::Require, Some("a.js"), 1)]);

        let parsed = parse("\u{feff}#!/usr/bin/env node\n// @root\n");
        assert!(parsed.is_root());
    }

    #[test]
    fn test_read_error_is_reported() {
        struct Failing;
        impl std::io::Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk on fire"))
            }
        }

        let parsed = parse_annotations(std::io::BufReader::new(Failing), "broken.js");
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].message.contains("disk on fire"));
    }
}
