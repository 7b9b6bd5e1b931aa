// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean?" suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
///
/// Variants that can be traced to a file carry the file text and a span so
/// miette can underline the offending key.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no configuration struct declares.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(herald::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// Dotted path of the key, e.g. `messages.lock_retry`.
        key: String,
        /// Closest known key in the same table, if one is similar enough.
        suggestion: Option<String>,
        /// Comma-separated keys accepted by the enclosing table.
        valid_keys: String,
        /// Byte range of the key in its file.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// The TOML file the key was read from.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not deserialize into the declared type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(herald::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path of the key.
        key: String,
        /// Figment's description of what was found.
        detail: String,
        /// The type the field accepts.
        expected: String,
    },

    /// A field without a default that no source provided.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(herald::config::missing_key),
        help("add `{key} = <value>` to your herald.toml")
    )]
    MissingKey {
        /// Dotted path of the key.
        key: String,
    },

    /// A value that parsed but fails a semantic check.
    #[error("validation error: {message}")]
    #[diagnostic(code(herald::config::validation))]
    Validation {
        /// Which setting is wrong and why.
        message: String,
    },

    /// Any other figment failure.
    #[error("configuration error: {0}")]
    #[diagnostic(code(herald::config::other))]
    Other(String),
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? known keys here: {valid_keys}"),
        None => format!("known keys here: {valid_keys}"),
    }
}

/// Convert every error inside a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` holds `(path, content)` pairs used to point at the
/// offending key in the file it came from.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &figment::Error, toml_sources: &[(String, String)]) -> ConfigError {
    use figment::error::Kind;

    let table: Vec<String> = error.path.iter().map(ToString::to_string).collect();
    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let (span, src) = locate(error, &table, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, expected),
                valid_keys: expected.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: dotted(&table, field),
        },
        Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
            key: table.join("."),
            detail: format!("found {actual}, expected {expected}"),
            expected: expected.clone(),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

fn dotted(table: &[String], field: &str) -> String {
    if table.is_empty() {
        field.to_string()
    } else {
        format!("{}.{field}", table.join("."))
    }
}

/// Find the file an error came from and the key's position inside it.
fn locate(
    error: &figment::Error,
    table: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // Inline strings carry no file source; fall back to the only source given.
    let source = match (file, toml_sources) {
        (Some(file), _) => toml_sources.iter().find(|(path, _)| *path == file),
        (None, [only]) => Some(only),
        (None, _) => None,
    };

    source
        .and_then(|(path, content)| {
            let offset = find_key_offset(content, table, field)?;
            Some((
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(path, content.clone())),
            ))
        })
        .unwrap_or((None, None))
}

/// Byte offset of `field` as a key of the `[table[0]]` table, or of the
/// top level when `table` is empty.
pub fn find_key_offset(content: &str, table: &[String], field: &str) -> Option<usize> {
    let wanted = table.first().map(String::as_str);
    let mut current: Option<&str> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header.split(']').next().map(str::trim);
        } else if current == wanted {
            let is_key = trimmed
                .strip_prefix(field)
                .is_some_and(|rest| rest.starts_with([' ', '=', '\t']));
            if is_key {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len();
    }

    None
}

/// Closest key by Jaro-Winkler similarity, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render errors to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{report}"),
            Err(_) => eprintln!("herald: {error}"),
        }
    }
    if errors.len() > 1 {
        eprintln!("herald: {} configuration errors", errors.len());
    }
}
