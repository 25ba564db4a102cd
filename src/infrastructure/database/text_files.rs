//! Parsers for the line-oriented database files
//!
//! `globs2`, `aliases`, `subclasses` and `generic-icons`. Blank lines and
//! `#` comments are skipped everywhere; any other malformed line fails the
//! whole file.

use crate::domain::entities::{GlobRule, MimeType};
use crate::error::{DatabaseError, Result};
use std::path::Path;

const CASE_SENSITIVE_FLAG: &str = "cs";

/// Iterates over meaningful lines with their 1-based line numbers
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'))
}

fn mime_field(path: &Path, line: usize, field: &str) -> Result<MimeType> {
    match field.split_once('/') {
        Some((media, sub)) if !media.is_empty() && !sub.is_empty() => Ok(MimeType::new(field)),
        _ => Err(DatabaseError::parse(
            path,
            line,
            format!("invalid MIME type {field:?}"),
        )),
    }
}

/// Parses a `globs2` file: `weight:type:glob[:flags]`
///
/// Each rule is returned with its line number.
pub fn parse_globs(path: &Path, text: &str) -> Result<Vec<(usize, GlobRule)>> {
    let mut rules = Vec::new();
    for (line_no, line) in lines(text) {
        let mut fields = line.splitn(4, ':');
        let (Some(weight), Some(mime), Some(pattern)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(DatabaseError::parse(path, line_no, "expected weight:type:glob"));
        };
        let weight: u32 = weight.parse().map_err(|_| {
            DatabaseError::parse(path, line_no, format!("invalid weight {weight:?}"))
        })?;
        if weight > 100 {
            return Err(DatabaseError::parse(
                path,
                line_no,
                format!("weight {weight} exceeds 100"),
            ));
        }
        if pattern.is_empty() {
            return Err(DatabaseError::parse(path, line_no, "empty glob"));
        }
        let mime = mime_field(path, line_no, mime)?;
        let case_sensitive = fields
            .next()
            .and_then(|rest| rest.split(':').next())
            .is_some_and(|flags| flags.split(',').any(|flag| flag == CASE_SENSITIVE_FLAG));

        rules.push((
            line_no,
            GlobRule::new(weight, mime, pattern).case_sensitive(case_sensitive),
        ));
    }
    Ok(rules)
}

/// Parses a two-column, space-separated file of MIME types
fn parse_pairs(path: &Path, text: &str) -> Result<Vec<(MimeType, MimeType)>> {
    lines(text)
        .map(|(line_no, line)| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [first, second] => Ok((
                    mime_field(path, line_no, first)?,
                    mime_field(path, line_no, second)?,
                )),
                _ => Err(DatabaseError::parse(path, line_no, "expected two MIME types")),
            }
        })
        .collect()
}

/// Parses an `aliases` file: `alias canonical`
pub fn parse_aliases(path: &Path, text: &str) -> Result<Vec<(MimeType, MimeType)>> {
    parse_pairs(path, text)
}

/// Parses a `subclasses` file: `type parent`
pub fn parse_subclasses(path: &Path, text: &str) -> Result<Vec<(MimeType, MimeType)>> {
    parse_pairs(path, text)
}

/// Parses a `generic-icons` file: `type:icon-name`
pub fn parse_generic_icons(path: &Path, text: &str) -> Result<Vec<(MimeType, String)>> {
    lines(text)
        .map(|(line_no, line)| match line.split_once(':') {
            Some((mime, icon)) if !icon.is_empty() => {
                Ok((mime_field(path, line_no, mime)?, icon.to_string()))
            }
            _ => Err(DatabaseError::parse(path, line_no, "expected type:icon")),
        })
        .collect()
}
