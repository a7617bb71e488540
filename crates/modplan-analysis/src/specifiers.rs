//! Module specifiers: resolving relative ones to files, and rendering them
//! again after a relocation.

use crate::paths::{normalize_path, relative_path, to_slash};
use crate::OffsetSpan;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A module specifier string literal in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpecifier {
    /// The specifier as written, without quotes
    pub text: String,
    /// Span of the text inside the quotes
    pub span: OffsetSpan,
}

/// How a relative specifier reached the file it resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierStyle {
    /// Names the file including its extension
    Exact,
    /// Names the file without its extension
    ExtensionOmitted,
    /// Names a directory and resolves to its `index` file
    DirectoryIndex,
    /// Names the compiled output of a source file, as in `./util.js` for
    /// `util.ts`. Holds the extension as written.
    EmittedExtension(&'static str),
}

/// Source extensions a compiled extension may stand for
const EMITTED_SOURCES: &[(&str, &[&str])] = &[
    ("js", &["ts", "tsx"]),
    ("jsx", &["tsx"]),
    ("mjs", &["mts"]),
    ("cjs", &["cts"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub style: SpecifierStyle,
}

/// Whether a specifier is resolved relative to the importing file
#[must_use]
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Resolve a relative specifier written in `importer` to an existing file.
///
/// Tries the exact path, then a TypeScript source for a compiled extension
/// (`./a.js` finds `a.ts`), then each extension appended, then `index` plus
/// each extension inside the named directory.
pub fn resolve_specifier(
    importer: &Path,
    specifier: &str,
    extensions: &[&str],
    is_file: impl Fn(&Path) -> bool,
) -> Option<Resolution> {
    if !is_relative_specifier(specifier) {
        return None;
    }

    let importer_dir = importer.parent()?;
    let base = normalize_path(&importer_dir.join(specifier));
    let names_directory = specifier.ends_with('/') || specifier.ends_with('.');

    if !names_directory && is_file(&base) {
        return Some(Resolution {
            path: base,
            style: SpecifierStyle::Exact,
        });
    }

    if !names_directory {
        if let Some(resolution) = resolve_emitted(&base, &is_file) {
            return Some(resolution);
        }

        for extension in extensions {
            let mut candidate: OsString = base.clone().into_os_string();
            candidate.push(extension);
            let candidate = PathBuf::from(candidate);
            if is_file(&candidate) {
                return Some(Resolution {
                    path: candidate,
                    style: SpecifierStyle::ExtensionOmitted,
                });
            }
        }
    }

    for extension in extensions {
        let candidate = base.join(format!("index{extension}"));
        if is_file(&candidate) {
            return Some(Resolution {
                path: candidate,
                style: SpecifierStyle::DirectoryIndex,
            });
        }
    }

    None
}

fn resolve_emitted(base: &Path, is_file: impl Fn(&Path) -> bool) -> Option<Resolution> {
    let written = base.extension()?.to_str()?;
    let (emitted, sources) = EMITTED_SOURCES
        .iter()
        .find(|(emitted, _)| *emitted == written)?;

    sources.iter().find_map(|source| {
        let candidate = base.with_extension(source);
        is_file(&candidate).then(|| Resolution {
            path: candidate,
            style: SpecifierStyle::EmittedExtension(*emitted),
        })
    })
}

/// Render the specifier that reaches `target` from a file in `from_dir`,
/// keeping the style the original specifier was written in
#[must_use]
pub fn render_specifier(from_dir: &Path, target: &Path, style: SpecifierStyle) -> String {
    let named = match style {
        SpecifierStyle::Exact => target.to_path_buf(),
        SpecifierStyle::ExtensionOmitted => target.with_extension(""),
        SpecifierStyle::EmittedExtension(extension) => target.with_extension(extension),
        SpecifierStyle::DirectoryIndex => {
            let is_index = target.file_stem().is_some_and(|stem| stem == "index");
            match target.parent() {
                Some(parent) if is_index => parent.to_path_buf(),
                _ => target.with_extension(""),
            }
        }
    };

    let relative = to_slash(&relative_path(from_dir, &named));
    if relative.is_empty() {
        ".".to_string()
    } else if relative == ".." || relative.starts_with("../") {
        relative
    } else {
        format!("./{relative}")
    }
}
