use std::fmt;
use thiserror::Error;

/// The one failure the lexer can surface: no lexical rule matched the
/// current input position. Non-recoverable; the scan halts immediately.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("illegal character '{ch}' at line {line}, column {column}")]
    IllegalCharacter { ch: char, line: usize, column: usize },
}

#[derive(Debug, Clone)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub line_content: String,
}

impl SourceLocation {
    pub fn new(file: &str, line: usize, column: usize, line_content: &str) -> Self {
        SourceLocation {
            file: file.to_string(),
            line,
            column,
            line_content: line_content.to_string(),
        }
    }
}

/// A diagnostic ready for terminal display: message, optional source
/// location with the offending line, optional hint.
#[derive(Debug, Clone)]
pub struct CompileError {
    pub message: String,
    pub location: Option<SourceLocation>,
    pub hint: Option<String>,
}

impl CompileError {
    pub fn new(message: &str) -> Self {
        CompileError {
            message: message.to_string(),
            location: None,
            hint: None,
        }
    }

    pub fn with_location(mut self, loc: SourceLocation) -> Self {
        self.location = Some(loc);
        self
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ANSI color codes
        const RED: &str = "\x1b[1;31m";
        const BLUE: &str = "\x1b[1;34m";
        const CYAN: &str = "\x1b[1;36m";
        const RESET: &str = "\x1b[0m";
        const BOLD: &str = "\x1b[1m";

        write!(f, "{}error{}: {}{}\n", RED, RESET, BOLD, self.message)?;
        write!(f, "{}", RESET)?;

        if let Some(ref loc) = self.location {
            write!(f, "  {}-->{} {}:{}:{}\n", BLUE, RESET, loc.file, loc.line, loc.column)?;

            let line_num_width = loc.line.to_string().len();

            write!(f, "  {:width$} {}{}\n", "", BLUE, "|", width = line_num_width)?;
            write!(
                f,
                "  {}{}{} {} {}{}\n",
                BLUE,
                loc.line,
                RESET,
                format!("{}|{}", BLUE, RESET),
                loc.line_content.trim_end(),
                RESET
            )?;

            let pointer_offset = if loc.column > 0 { loc.column - 1 } else { 0 };
            let spaces = " ".repeat(pointer_offset);
            write!(
                f,
                "  {:width$} {}{} {}{}^--- here{}\n",
                "", BLUE, "|", spaces, RED, RESET,
                width = line_num_width
            )?;
        }

        if let Some(ref hint) = self.hint {
            write!(f, "\n  {}hint{}: {}\n", CYAN, RESET, hint)?;
        }

        Ok(())
    }
}

pub struct SourceFile {
    pub filename: String,
    lines: Vec<String>,
}

impl SourceFile {
    pub fn new(filename: &str, content: &str) -> Self {
        let lines: Vec<String> = content.lines().map(|s| s.to_string()).collect();
        SourceFile {
            filename: filename.to_string(),
            lines,
        }
    }

    pub fn get_line(&self, line_num: usize) -> Option<&str> {
        if line_num > 0 && line_num <= self.lines.len() {
            Some(&self.lines[line_num - 1])
        } else {
            None
        }
    }

    pub fn make_location(&self, line: usize, column: usize) -> SourceLocation {
        let line_content = self.get_line(line).unwrap_or("").to_string();
        SourceLocation::new(&self.filename, line, column, &line_content)
    }

    /// Attach this file's context to a lexing failure for display.
    pub fn render_lex_error(&self, err: &LexError) -> CompileError {
        match err {
            LexError::IllegalCharacter { ch, line, column } => {
                CompileError::new(&format!("illegal character '{}'", ch))
                    .with_location(self.make_location(*line, *column))
                    .with_hint("this character is not part of any Ivy lexeme")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_display() {
        let err = LexError::IllegalCharacter { ch: '`', line: 3, column: 7 };
        assert_eq!(
            err.to_string(),
            "illegal character '`' at line 3, column 7"
        );
    }

    #[test]
    fn test_render_includes_source_line() {
        let src = SourceFile::new("demo.ivy", "x = 1\ny = `\n");
        let err = LexError::IllegalCharacter { ch: '`', line: 2, column: 5 };
        let rendered = src.render_lex_error(&err).to_string();
        assert!(rendered.contains("demo.ivy:2:5"));
        assert!(rendered.contains("y = `"));
        assert!(rendered.contains("^--- here"));
    }

    #[test]
    fn test_location_out_of_range() {
        let src = SourceFile::new("demo.ivy", "only line\n");
        assert_eq!(src.get_line(2), None);
        assert_eq!(src.get_line(0), None);
        assert_eq!(src.make_location(9, 1).line_content, "");
    }
}
