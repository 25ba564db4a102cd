//! Shared helpers for building on-disk MIME databases

#![allow(dead_code)]

use sharedmime::infrastructure::database::MAGIC_HEADER;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Encodes one magic clause line
pub fn clause(indent: usize, offset: usize, value: &[u8], suffix: &[u8]) -> Vec<u8> {
    let mut line = Vec::new();
    if indent > 0 {
        line.extend_from_slice(indent.to_string().as_bytes());
    }
    line.push(b'>');
    line.extend_from_slice(offset.to_string().as_bytes());
    line.push(b'=');
    line.extend_from_slice(&(value.len() as u16).to_be_bytes());
    line.extend_from_slice(value);
    line.extend_from_slice(suffix);
    line.push(b'\n');
    line
}

/// Encodes a magic database from `(priority, type, clause lines)` sections
pub fn magic_db(sections: &[(u8, &str, Vec<Vec<u8>>)]) -> Vec<u8> {
    let mut data = MAGIC_HEADER.to_vec();
    for (priority, mime, lines) in sections {
        data.extend_from_slice(format!("[{priority}:{mime}]\n").as_bytes());
        for line in lines {
            data.extend_from_slice(line);
        }
    }
    data
}

pub const GLOBS: &str = "\
# This file was automatically generated
50:text/plain:*.txt
60:video/x-matroska:*.mkv
50:application/gzip:*.gz
50:application/x-compressed-tar:*.tar.gz
50:text/x-makefile:Makefile
50:text/x-makefile:Make*.in
50:text/x-python:*.py
50:application/xml:*.xml
50:image/png:*.png
50:text/x-readme:README*
";

pub const ALIASES: &str = "\
text/xml application/xml
application/x-javascript application/javascript
text/javascript application/javascript
";

pub const SUBCLASSES: &str = "\
text/x-python application/x-executable
text/x-python text/plain
application/xml text/plain
text/plain application/octet-stream
";

pub const GENERIC_ICONS: &str = "\
application/x-shellscript:text-x-script
text/x-python:text-x-script
";

pub fn magic_bytes() -> Vec<u8> {
    magic_db(&[
        (50, "image/png", vec![clause(0, 0, b"\x89PNG\r\n\x1a\n", b"")]),
        (
            80,
            "application/x-matroska-ish",
            vec![clause(0, 0, b"\x1a\x45\xdf\xa3", b""), clause(1, 4, b"matroska", b"+32")],
        ),
        (10, "text/x-weak", vec![clause(0, 0, b"#", b"")]),
        (
            90,
            "application/pdf",
            vec![clause(0, 0, b"%PDF-", b"+1024")],
        ),
    ])
}

/// Writes a complete database into a fresh temporary directory
pub fn database_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "globs2", GLOBS.as_bytes());
    write(dir.path(), "aliases", ALIASES.as_bytes());
    write(dir.path(), "subclasses", SUBCLASSES.as_bytes());
    write(dir.path(), "generic-icons", GENERIC_ICONS.as_bytes());
    write(dir.path(), "magic", &magic_bytes());
    dir
}

pub fn write(dir: &Path, name: &str, contents: &[u8]) {
    fs::write(dir.join(name), contents).unwrap();
}
