use crate::Error;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Numbered source lines around a target line.
#[derive(Debug, PartialEq)]
pub(crate) struct Excerpt {
    target: usize,
    first: usize,
    lines: Vec<String>,
}

impl Excerpt {
    /// Read the lines `[max(1, line - context), min(line count, line + context)]` of `path`.
    ///
    /// Only the lines up to the end of the window are read. Invalid UTF-8 is replaced.
    pub(crate) fn read(path: &Path, line: usize, context: usize) -> Result<Self, Error> {
        let read_error = |source| Error::ReadSource {
            path: path.to_owned(),
            source,
        };
        let file = File::open(path).map_err(read_error)?;
        let first = line.saturating_sub(context).max(1);
        let last = line.saturating_add(context);

        let mut lines = Vec::new();
        for (index, raw) in BufReader::new(file).split(b'\n').enumerate() {
            let number = index + 1;
            if number > last {
                break;
            }
            let raw = raw.map_err(read_error)?;
            if number >= first {
                lines.push(String::from_utf8_lossy(&raw).trim_end().to_owned());
            }
        }

        Ok(Excerpt {
            target: line,
            first,
            lines,
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One row per line: marker, right-aligned line number, separator, text.
    pub(crate) fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().enumerate().map(move |(offset, text)| {
            let number = self.first + offset;
            let marker = if number == self.target { "> " } else { "  " };
            format!("{}{:>4} | {}", marker, number, text)
        })
    }
}
