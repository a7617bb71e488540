//! Parsed view of a source file: identifiers, literal and comment regions,
//! and module specifiers, all located in UTF-16 offsets.

use crate::specifiers::ModuleSpecifier;
use crate::{Language, OffsetSpan};
use std::fmt;
use std::ops::Range;
use swc_core::common::comments::SingleThreadedComments;
use swc_core::common::{BytePos, Span, Spanned};
use swc_core::ecma::ast::{
    BigInt, CallExpr, Callee, EsVersion, ExportAll, Expr, Ident, IdentName, ImportDecl, JSXText,
    Lit, NamedExport, Number, Regex, Str, TplElement, TsExternalModuleRef, TsImportType,
};
use swc_core::ecma::parser::{lexer::Lexer, Parser, StringInput};
use swc_core::ecma::visit::{Visit, VisitWith};

/// Position of the first byte handed to the parser. `BytePos(0)` is reserved
/// for dummy spans.
const START: u32 = 1;

const KEYWORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RegionKind {
    Number,
    String,
    /// One quasi of a template literal
    Template,
    Regex,
    JsxText,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    kind: RegionKind,
    span: OffsetSpan,
    bytes: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Identifier {
    span: OffsetSpan,
    bytes: Range<usize>,
}

/// What sits under an offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target<'a> {
    Identifier(&'a str),
    Region(RegionKind),
    Keyword(&'a str),
    Nothing,
}

/// A file the parser could not recover from
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseFailure {
    pub message: String,
    pub span: OffsetSpan,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.span.start)
    }
}

/// Maps byte offsets to UTF-16 offsets and back
#[derive(Debug, Clone)]
struct Utf16Offsets {
    /// For every non-ASCII char: its end in bytes, its end in UTF-16 units,
    /// and the bytes saved by UTF-16 up to that point
    marks: Vec<(usize, usize, usize)>,
}

impl Utf16Offsets {
    fn new(source: &str) -> Self {
        let mut marks = Vec::new();
        let mut saved = 0;
        for (idx, ch) in source.char_indices() {
            if !ch.is_ascii() {
                let end = idx + ch.len_utf8();
                saved += ch.len_utf8() - ch.len_utf16();
                marks.push((end, end - saved, saved));
            }
        }
        Self { marks }
    }

    fn to_utf16(&self, byte: usize) -> usize {
        let idx = self.marks.partition_point(|&(end, _, _)| end <= byte);
        let saved = idx.checked_sub(1).map_or(0, |i| self.marks[i].2);
        byte - saved
    }

    fn to_byte(&self, utf16: usize) -> usize {
        let idx = self.marks.partition_point(|&(_, end, _)| end <= utf16);
        let saved = idx.checked_sub(1).map_or(0, |i| self.marks[i].2);
        utf16 + saved
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedSource<'a> {
    source: &'a str,
    offsets: Utf16Offsets,
    identifiers: Vec<Identifier>,
    regions: Vec<Region>,
    specifiers: Vec<ModuleSpecifier>,
}

/// Parse `source` in the given dialect.
///
/// Errors the parser recovers from are logged and otherwise ignored.
pub(crate) fn parse_source(
    language: Language,
    source: &str,
) -> Result<ParsedSource<'_>, ParseFailure> {
    let offsets = Utf16Offsets::new(source);
    let end = u32::try_from(source.len())
        .ok()
        .and_then(|len| len.checked_add(START))
        .ok_or_else(|| ParseFailure {
            message: "file is too large to parse".to_string(),
            span: OffsetSpan::new(0, 0),
        })?;

    let comments = SingleThreadedComments::default();
    let input = StringInput::new(source, BytePos(START), BytePos(end));
    let lexer = Lexer::new(language.syntax(), EsVersion::latest(), input, Some(&comments));
    let mut parser = Parser::new_from(lexer);

    let program = parser.parse_program().map_err(|error| {
        let bytes = byte_range(error.span(), source.len()).unwrap_or(0..0);
        ParseFailure {
            message: error.kind().msg().to_string(),
            span: OffsetSpan::new(offsets.to_utf16(bytes.start), offsets.to_utf16(bytes.end)),
        }
    })?;

    for error in parser.take_errors() {
        tracing::debug!(error = %error.kind().msg(), "Recovered from syntax error");
    }

    let mut collector = Collector {
        source,
        offsets: &offsets,
        identifiers: Vec::new(),
        regions: Vec::new(),
        specifiers: Vec::new(),
    };
    program.visit_with(&mut collector);

    let (leading, trailing) = comments.borrow_all();
    for comment in leading.values().chain(trailing.values()).flatten() {
        collector.region(RegionKind::Comment, comment.span);
    }

    let Collector {
        mut identifiers,
        mut regions,
        mut specifiers,
        ..
    } = collector;

    identifiers.sort_by_key(|ident| ident.span);
    identifiers.dedup();
    regions.sort_by_key(|region| region.span);
    regions.dedup();
    specifiers.sort_by_key(|specifier| specifier.span);
    specifiers.dedup();

    Ok(ParsedSource {
        source,
        offsets,
        identifiers,
        regions,
        specifiers,
    })
}

fn byte_range(span: Span, len: usize) -> Option<Range<usize>> {
    if span.is_dummy() || span.lo.0 < START {
        return None;
    }
    let start = (span.lo.0 - START) as usize;
    let end = (span.hi.0.checked_sub(START)?) as usize;
    (start <= end && end <= len).then_some(start..end)
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '\u{200c}' || ch == '\u{200d}'
}

impl<'a> ParsedSource<'a> {
    /// Classify the offset. An identifier that ends exactly at `offset` counts
    /// when nothing else contains it, so a cursor right after a name finds it.
    pub(crate) fn target_at(&self, offset: usize) -> Target<'a> {
        let source = self.source;
        let contains = |span: &OffsetSpan| span.start <= offset && offset < span.end;

        if let Some(ident) = self.identifiers.iter().find(|ident| contains(&ident.span)) {
            return Target::Identifier(&source[ident.bytes.clone()]);
        }
        if let Some(region) = self.regions.iter().find(|region| contains(&region.span)) {
            return Target::Region(region.kind);
        }
        if let Some(ident) = self.identifiers.iter().find(|ident| ident.span.end == offset) {
            return Target::Identifier(&source[ident.bytes.clone()]);
        }

        match self.word_at(offset) {
            Some(word) if KEYWORDS.contains(&word) => Target::Keyword(word),
            _ => Target::Nothing,
        }
    }

    fn word_at(&self, offset: usize) -> Option<&'a str> {
        let source = self.source;
        let byte = self.offsets.to_byte(offset);
        if byte >= source.len() || !source.is_char_boundary(byte) {
            return None;
        }

        let start = source[..byte]
            .char_indices()
            .rev()
            .take_while(|&(_, ch)| is_word_char(ch))
            .last()
            .map_or(byte, |(idx, _)| idx);
        let end = source[byte..]
            .char_indices()
            .find(|&(_, ch)| !is_word_char(ch))
            .map_or(source.len(), |(idx, _)| byte + idx);

        (start < end).then(|| &source[start..end])
    }

    /// Identifiers named `name`, plus whole-word matches inside strings and
    /// comments when asked for, in ascending offset order
    pub(crate) fn occurrences(
        &self,
        name: &str,
        include_strings: bool,
        include_comments: bool,
    ) -> Vec<OffsetSpan> {
        let mut spans: Vec<OffsetSpan> = self
            .identifiers
            .iter()
            .filter(|ident| &self.source[ident.bytes.clone()] == name)
            .map(|ident| ident.span)
            .collect();

        if name.is_empty() {
            return spans;
        }

        for region in &self.regions {
            let searched = match region.kind {
                RegionKind::String | RegionKind::Template => include_strings,
                RegionKind::Comment => include_comments,
                RegionKind::Number | RegionKind::Regex | RegionKind::JsxText => false,
            };
            if !searched {
                continue;
            }

            let text = &self.source[region.bytes.clone()];
            for (idx, _) in text.match_indices(name) {
                let before = text[..idx].chars().next_back();
                let after = text[idx + name.len()..].chars().next();
                if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
                    continue;
                }
                let start = region.bytes.start + idx;
                spans.push(OffsetSpan::new(
                    self.offsets.to_utf16(start),
                    self.offsets.to_utf16(start + name.len()),
                ));
            }
        }

        spans.sort();
        spans.dedup();
        spans
    }

    /// String literals that name modules, in source order
    pub(crate) fn specifiers(&self) -> &[ModuleSpecifier] {
        &self.specifiers
    }
}

struct Collector<'a> {
    source: &'a str,
    offsets: &'a Utf16Offsets,
    identifiers: Vec<Identifier>,
    regions: Vec<Region>,
    specifiers: Vec<ModuleSpecifier>,
}

impl Collector<'_> {
    fn utf16(&self, bytes: &Range<usize>) -> OffsetSpan {
        OffsetSpan::new(
            self.offsets.to_utf16(bytes.start),
            self.offsets.to_utf16(bytes.end),
        )
    }

    /// Record the name at the start of `span`. Names written with escapes are
    /// skipped, as their source text differs from `name`.
    fn identifier(&mut self, span: Span, name: &str) {
        let Some(bytes) = byte_range(span, self.source.len()) else {
            return;
        };
        if name.is_empty() || !self.source[bytes.start..].starts_with(name) {
            return;
        }
        let bytes = bytes.start..bytes.start + name.len();
        self.identifiers.push(Identifier {
            span: self.utf16(&bytes),
            bytes,
        });
    }

    fn region(&mut self, kind: RegionKind, span: Span) {
        let Some(bytes) = byte_range(span, self.source.len()) else {
            return;
        };
        self.regions.push(Region {
            kind,
            span: self.utf16(&bytes),
            bytes,
        });
    }

    fn specifier(&mut self, literal: &Str) {
        let Some(bytes) = byte_range(literal.span, self.source.len()) else {
            return;
        };
        if bytes.len() < 2 {
            return;
        }
        let inner = bytes.start + 1..bytes.end - 1;
        self.specifiers.push(ModuleSpecifier {
            text: self.source[inner.clone()].to_string(),
            span: self.utf16(&inner),
        });
    }
}

impl Visit for Collector<'_> {
    fn visit_ident(&mut self, node: &Ident) {
        self.identifier(node.span, &node.sym);
    }

    fn visit_ident_name(&mut self, node: &IdentName) {
        self.identifier(node.span, &node.sym);
    }

    fn visit_str(&mut self, node: &Str) {
        self.region(RegionKind::String, node.span);
    }

    fn visit_number(&mut self, node: &Number) {
        self.region(RegionKind::Number, node.span);
    }

    fn visit_big_int(&mut self, node: &BigInt) {
        self.region(RegionKind::Number, node.span);
    }

    fn visit_regex(&mut self, node: &Regex) {
        self.region(RegionKind::Regex, node.span);
    }

    fn visit_tpl_element(&mut self, node: &TplElement) {
        self.region(RegionKind::Template, node.span);
    }

    fn visit_jsx_text(&mut self, node: &JSXText) {
        self.region(RegionKind::JsxText, node.span);
    }

    fn visit_import_decl(&mut self, node: &ImportDecl) {
        self.specifier(&node.src);
        node.visit_children_with(self);
    }

    fn visit_export_all(&mut self, node: &ExportAll) {
        self.specifier(&node.src);
        node.visit_children_with(self);
    }

    fn visit_named_export(&mut self, node: &NamedExport) {
        if let Some(src) = &node.src {
            self.specifier(src);
        }
        node.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        let loads_module = match &node.callee {
            Callee::Import(_) => true,
            Callee::Expr(callee) => {
                matches!(&**callee, Expr::Ident(ident) if &*ident.sym == "require")
            }
            Callee::Super(_) => false,
        };

        if loads_module {
            if let Some(first) = node.args.first().filter(|arg| arg.spread.is_none()) {
                if let Expr::Lit(Lit::Str(literal)) = &*first.expr {
                    self.specifier(literal);
                }
            }
        }
        node.visit_children_with(self);
    }

    fn visit_ts_external_module_ref(&mut self, node: &TsExternalModuleRef) {
        self.specifier(&node.expr);
        node.visit_children_with(self);
    }

    fn visit_ts_import_type(&mut self, node: &TsImportType) {
        self.specifier(&node.arg);
        node.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(language: Language, source: &str) -> ParsedSource<'_> {
        parse_source(language, source).unwrap()
    }

    fn specifier_texts(language: Language, source: &str) -> Vec<String> {
        parse(language, source)
            .specifiers()
            .iter()
            .map(|specifier| specifier.text.clone())
            .collect()
    }

    #[test]
    fn test_import_forms() {
        let source = r#"
import React from 'react';
import { a } from "./a";
import './side-effect';
export * from '../barrel';
export { b } from './b';
const c = require('./c');
const d = import('./d');
const notAnImport = foo('./e');
// import x from './commented';
"#;
        assert_eq!(
            specifier_texts(Language::JavaScript, source),
            vec!["react", "./a", "./side-effect", "../barrel", "./b", "./c", "./d"]
        );
    }

    #[test]
    fn test_typescript_import_forms() {
        let source = r#"
import type { Props } from './props';
import fs = require('./fs-shim');
export type { Theme } from './theme';
let lazy: typeof import('./lazy');
"#;
        assert_eq!(
            specifier_texts(Language::TypeScript, source),
            vec!["./props", "./fs-shim", "./theme", "./lazy"]
        );
    }

    #[test]
    fn test_specifier_span_excludes_quotes() {
        let source = "import x from './foo';";
        let parsed = parse(Language::TypeScript, source);
        assert_eq!(parsed.specifiers()[0].span, OffsetSpan::new(15, 20));
    }

    #[test]
    fn test_apostrophe_in_jsx_text_is_not_a_string() {
        let source = "const foo = () => 1;\nexport const View = () => <p>Don't {foo()}</p>;\n";
        let parsed = parse(Language::Tsx, source);

        assert_eq!(parsed.occurrences("foo", true, true).len(), 2);
        let jsx_offset = source.find("Don").unwrap();
        assert_eq!(
            parsed.target_at(jsx_offset),
            Target::Region(RegionKind::JsxText)
        );
    }

    #[test]
    fn test_quote_inside_regex_is_not_a_string() {
        let source = "const foo = 1;\nfunction f(s: string) {\n  if (s) /'/.test(s);\n  return foo;\n}\nexport { foo };\n";
        let parsed = parse(Language::TypeScript, source);

        assert_eq!(parsed.occurrences("foo", false, false).len(), 3);
    }

    #[test]
    fn test_word_matches_in_strings_and_comments() {
        let source = "const foo = 1;\n// foo and foobar\nconst s = `x ${foo} foo`;\n";
        let parsed = parse(Language::TypeScript, source);

        assert_eq!(parsed.occurrences("foo", false, false).len(), 2);
        assert_eq!(parsed.occurrences("foo", false, true).len(), 3);
        assert_eq!(parsed.occurrences("foo", true, true).len(), 4);
    }

    #[test]
    fn test_targets() {
        let source = "const answer = 42; // note\n";
        let parsed = parse(Language::TypeScript, source);

        assert_eq!(parsed.target_at(1), Target::Keyword("const"));
        assert_eq!(parsed.target_at(6), Target::Identifier("answer"));
        assert_eq!(parsed.target_at(12), Target::Identifier("answer"));
        assert_eq!(parsed.target_at(15), Target::Region(RegionKind::Number));
        assert_eq!(parsed.target_at(22), Target::Region(RegionKind::Comment));
        assert_eq!(parsed.target_at(13), Target::Nothing);
    }

    #[test]
    fn test_offsets_count_utf16_units() {
        let source = "const s = '😀é'; const foo = s;\n";
        let parsed = parse(Language::TypeScript, source);

        let spans = parsed.occurrences("foo", false, false);
        // The emoji takes two units and the accent one
        assert_eq!(spans, vec![OffsetSpan::new(23, 26)]);
        assert_eq!(parsed.target_at(24), Target::Identifier("foo"));
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let failure = parse_source(Language::TypeScript, "const = ;\n").unwrap_err();
        assert!(!failure.message.is_empty());
    }

    #[test]
    fn test_type_assertion_parses_outside_tsx() {
        let source = "const value = <number>input;\n";
        assert!(parse_source(Language::TypeScript, source).is_ok());
    }
}
