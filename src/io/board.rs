//! Minimal kanban board files: markdown with one `## ` heading per column
//! and one `- ` line per card. Only appending cards is supported here.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::util::unicode;

const DEFAULT_COLUMN: &str = "## Todo";

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("could not read board {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write board {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where an appended card landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPosition {
    pub column: usize,
    pub card: usize,
}

/// Display name for a board path, e.g. `boards/work.md` → `work`
pub fn board_name(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
}

/// Append `title` as the last card of the board's first column. A missing
/// board file is created with a single column.
pub fn append_card(path: &Path, title: &str) -> Result<CardPosition, BoardError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(BoardError::ReadError {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let heading = match lines.iter().position(|l| l.starts_with("## ")) {
        Some(i) => i,
        None => {
            lines.insert(0, DEFAULT_COLUMN.to_string());
            0
        }
    };
    let end = lines[heading + 1..]
        .iter()
        .position(|l| l.starts_with("## "))
        .map_or(lines.len(), |p| heading + 1 + p);
    let cards: Vec<usize> = (heading + 1..end)
        .filter(|&i| lines[i].trim_start().starts_with("- "))
        .collect();
    let insert_at = cards.last().map_or(heading + 1, |&i| i + 1);

    // Cards are single-line
    let title = unicode::single_line(title);
    lines.insert(insert_at, format!("- {}", title));

    let mut out = lines.join("\n");
    out.push('\n');
    fs::write(path, out).map_err(|source| BoardError::WriteError {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(CardPosition {
        column: 0,
        card: cards.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_after_last_card_of_first_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("work.md");
        fs::write(
            &path,
            "# Work\n\n## Todo\n\n- one\n- two\n\n## Doing\n\n- three\n",
        )
        .unwrap();

        let pos = append_card(&path, "new card").unwrap();
        assert_eq!(pos, CardPosition { column: 0, card: 2 });
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# Work\n\n## Todo\n\n- one\n- two\n- new card\n\n## Doing\n\n- three\n"
        );
    }

    #[test]
    fn missing_board_is_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.md");
        let pos = append_card(&path, "first").unwrap();
        assert_eq!(pos, CardPosition { column: 0, card: 0 });
        assert_eq!(fs::read_to_string(&path).unwrap(), "## Todo\n- first\n");
    }

    #[test]
    fn multiline_titles_are_flattened() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("b.md");
        append_card(&path, "two\nlines").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "## Todo\n- two lines\n");
    }

    #[test]
    fn board_name_is_file_stem() {
        assert_eq!(board_name("boards/work.md"), "work");
        assert_eq!(board_name("home"), "home");
    }
}
