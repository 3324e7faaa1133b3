pub mod token;


use std::collections::VecDeque;
use std::iter::Peekable;
use std::str::Chars;

use crate::errors::LexError;
use self::token::{is_operator_char, Token, TokenInfo};

/// The Ivy tokenizer. One instance scans one source unit: the indentation
/// stack and pending queue belong to the instance, so independent scans
/// cannot interfere.
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    /// Open indentation depths, bottom sentinel 0, strictly increasing.
    indent_stack: Vec<usize>,
    /// Structural tokens emitted in bulk, awaiting individual delivery.
    pending: VecDeque<TokenInfo>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
            line: 1,
            column: 1,
            indent_stack: vec![0],
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Dispatch entrypoint for the parser: returns exactly one token per
    /// call. Queued structural tokens from a prior line transition are
    /// delivered, in order, before scanning resumes.
    pub fn next_token(&mut self) -> Result<TokenInfo, LexError> {
        if let Some(tok) = self.pending.pop_front() {
            return Ok(tok);
        }
        self.scan_token()
    }

    /// Drive the scan to completion, collecting the whole stream up to and
    /// including the trailing EOF marker.
    pub fn tokenize(&mut self) -> Result<Vec<TokenInfo>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let info = self.next_token()?;
            let done = info.token == Token::Eof;
            tokens.push(info);
            if done {
                return Ok(tokens);
            }
        }
    }

    // === Character navigation ===

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.next();
        if let Some(c) = ch {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        ch
    }

    fn peek(&mut self) -> Option<&char> {
        self.input.peek()
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.input.clone();
        ahead.next();
        ahead.next()
    }

    // === Core scan routine ===

    fn scan_token(&mut self) -> Result<TokenInfo, LexError> {
        loop {
            self.skip_inline_whitespace();
            let line = self.line;
            let column = self.column;

            let ch = match self.peek() {
                Some(&c) => c,
                None => return Ok(self.end_of_input(line, column)),
            };

            match ch {
                '\n' => {
                    if let Some(tok) = self.line_transition() {
                        return Ok(tok);
                    }
                    // Absorbed into a comment or ran out of input; rescan.
                }
                '#' => self.skip_line_comment(),
                '/' if self.peek_second() == Some('*') => {
                    self.advance();
                    self.advance();
                    self.skip_block_comment();
                }
                _ => return self.scan_lexeme(ch, line, column),
            }
        }
    }

    /// Ordered, first-match-wins lexical rules for one content lexeme.
    /// Newlines and comments have already been filtered out by the caller.
    fn scan_lexeme(&mut self, ch: char, line: usize, column: usize) -> Result<TokenInfo, LexError> {
        let token = match ch {
            '=' => self.one_or_two('=', Token::Eq, Token::Assign),
            '<' => self.one_or_two('=', Token::Le, Token::Lt),
            '>' => self.one_or_two('=', Token::Ge, Token::Gt),
            '!' => {
                if self.peek_second() == Some('=') {
                    self.advance();
                    self.advance();
                    Token::NotEq
                } else {
                    Token::CustomOp(self.read_operator_run())
                }
            }
            '+' => { self.advance(); Token::Plus }
            '-' => { self.advance(); Token::Minus }
            '*' => { self.advance(); Token::Star }
            '/' => { self.advance(); Token::Slash }
            '(' => { self.advance(); Token::LParen }
            ')' => { self.advance(); Token::RParen }
            '[' => { self.advance(); Token::LBracket }
            ']' => { self.advance(); Token::RBracket }
            ':' => { self.advance(); Token::Colon }
            ',' => { self.advance(); Token::Comma }
            '.' => {
                if self.peek_second().map_or(false, |c| c.is_ascii_digit()) {
                    self.read_fraction()
                } else {
                    self.advance();
                    Token::Period
                }
            }
            '_' => {
                if self.peek_second().map_or(false, is_operator_char) {
                    self.advance();
                    Token::CustomOpMethod(self.read_operator_run())
                } else {
                    self.advance();
                    Token::Underscore
                }
            }
            '0'..='9' => self.read_number(),
            '\'' => self.read_char_literal(line, column)?,
            '"' => self.read_string_literal(line, column)?,
            'A'..='Z' => self.read_capitalized(),
            'a'..='z' => self.read_word(),
            c if is_operator_char(c) => Token::CustomOp(self.read_operator_run()),
            c => return Err(LexError::IllegalCharacter { ch: c, line, column }),
        };

        Ok(TokenInfo { token, line, column })
    }

    /// Two-character lexeme if its second character follows, otherwise the
    /// one-character lexeme. Longer matches come first.
    fn one_or_two(&mut self, second: char, two: Token, one: Token) -> Token {
        self.advance();
        if self.peek() == Some(&second) {
            self.advance();
            two
        } else {
            one
        }
    }

    /// End-of-input rule: enqueue the EOF marker and return one final
    /// NEWLINE, so the stream always ends NEWLINE then EOF even when the
    /// source lacked a trailing newline. Later calls keep returning EOF.
    fn end_of_input(&mut self, line: usize, column: usize) -> TokenInfo {
        if self.finished {
            return TokenInfo { token: Token::Eof, line, column };
        }
        self.finished = true;
        self.pending.push_back(TokenInfo { token: Token::Eof, line, column });
        TokenInfo { token: Token::Newline, line, column }
    }

    // === Whitespace and comments ===

    /// Mid-line whitespace only; line-leading runs are consumed by
    /// `line_transition` so they can be measured.
    fn skip_inline_whitespace(&mut self) {
        while let Some(&ch) = self.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(&ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Inside-comment state: consume until the first close delimiter.
    /// Opens do not nest. An unclosed comment runs to end of input.
    fn skip_block_comment(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '*' {
                if let Some(&'/') = self.peek() {
                    self.advance();
                    return;
                }
            }
        }
    }

    // === Line transitions ===

    /// Consume a newline plus any blank or comment-only lines that follow,
    /// then run the indentation algorithm against the first content line.
    /// Returns the transition's NEWLINE token with INDENT/DEDENT queued
    /// behind it, or None when no content line follows: at end of input
    /// (the end-of-input rule takes over), or when a block comment opens
    /// the line and absorbs the transition entirely.
    fn line_transition(&mut self) -> Option<TokenInfo> {
        let (run_len, first_tab) = loop {
            self.advance(); // the '\n'
            let run = self.read_indentation_run();
            match self.peek().copied() {
                None => return None,
                Some('\n') => {}
                Some('#') => {
                    self.skip_line_comment();
                    if self.peek().is_none() {
                        return None;
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    self.advance();
                    self.advance();
                    self.skip_block_comment();
                    return None;
                }
                Some(_) => break run,
            }
        };

        // Depth counts from the first tab; an all-space run is depth 0.
        let depth = match first_tab {
            Some(idx) => run_len - idx,
            None => 0,
        };

        let line = self.line;
        let column = self.column;
        let top = self.indent_stack.last().copied().unwrap_or(0);

        if depth > top {
            // One INDENT per unit of increase; every intermediate depth is
            // recorded so a later dedent pops one DEDENT per unit as well.
            for level in top + 1..=depth {
                self.indent_stack.push(level);
                self.pending.push_back(TokenInfo { token: Token::Indent, line, column });
            }
        } else {
            while self.indent_stack.last().copied().unwrap_or(0) > depth {
                self.indent_stack.pop();
                self.pending.push_back(TokenInfo { token: Token::Dedent, line, column });
            }
        }

        Some(TokenInfo { token: Token::Newline, line, column })
    }

    /// Consume the leading whitespace run of a line, reporting its length
    /// and the index of its first tab. Carriage returns are dropped
    /// without counting.
    fn read_indentation_run(&mut self) -> (usize, Option<usize>) {
        let mut len = 0;
        let mut first_tab = None;
        while let Some(&ch) = self.peek() {
            match ch {
                '\t' => {
                    if first_tab.is_none() {
                        first_tab = Some(len);
                    }
                    len += 1;
                    self.advance();
                }
                ' ' => {
                    len += 1;
                    self.advance();
                }
                '\r' => {
                    self.advance();
                }
                _ => break,
            }
        }
        (len, first_tab)
    }

    // === Literals, identifiers, operators ===

    fn read_number(&mut self) -> Token {
        let mut digits = String::new();
        while let Some(&ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match self.peek().copied() {
            Some('L') => {
                self.advance();
                Token::LongLit(digits.parse().unwrap_or(0))
            }
            Some('.') if self.peek_second().map_or(false, |c| c.is_ascii_digit()) => {
                digits.push('.');
                self.advance();
                while let Some(&ch) = self.peek() {
                    if ch.is_ascii_digit() {
                        digits.push(ch);
                        self.advance();
                    } else {
                        break;
                    }
                }
                Token::FloatLit(digits)
            }
            _ => Token::IntLit(digits.parse().unwrap_or(0)),
        }
    }

    /// A fractional part alone, `.5` style. The caller has checked that a
    /// digit follows the dot.
    fn read_fraction(&mut self) -> Token {
        let mut text = String::from('.');
        self.advance();
        while let Some(&ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::FloatLit(text)
    }

    /// Exactly one printable-ASCII character between single quotes.
    /// Anything else leaves the quote unmatched by every rule, so the scan
    /// fails on it.
    fn read_char_literal(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        let mut ahead = self.input.clone();
        ahead.next(); // opening quote
        let body = ahead.next();
        let close = ahead.next();

        match (body, close) {
            (Some(c), Some('\'')) if (' '..='~').contains(&c) => {
                self.advance();
                self.advance();
                self.advance();
                Ok(Token::CharLit(c))
            }
            _ => Err(LexError::IllegalCharacter { ch: '\'', line, column }),
        }
    }

    /// Double-quoted string. The body forbids raw quotes and line breaks
    /// except behind a backslash; a string that never closes fails the
    /// rule, leaving the quote to the illegal-character rule.
    fn read_string_literal(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        if !self.string_is_well_formed() {
            return Err(LexError::IllegalCharacter { ch: '"', line, column });
        }

        self.advance(); // opening quote
        let mut body = String::new();
        while let Some(ch) = self.advance() {
            match ch {
                '"' => break,
                '\\' => {
                    body.push('\\');
                    if let Some(escaped) = self.advance() {
                        body.push(escaped);
                    }
                }
                _ => body.push(ch),
            }
        }

        Ok(Token::StrLit(collapse_backslash_runs(&body)))
    }

    fn string_is_well_formed(&self) -> bool {
        let mut ahead = self.input.clone();
        ahead.next(); // opening quote
        while let Some(ch) = ahead.next() {
            match ch {
                '"' => return true,
                '\n' => return false,
                '\\' => {
                    if ahead.next().is_none() {
                        return false;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// Uppercase-led letter run: the NULL literal or a class name.
    fn read_capitalized(&mut self) -> Token {
        let mut name = String::new();
        while let Some(&ch) = self.peek() {
            if ch.is_ascii_alphabetic() {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        if name == "NULL" {
            Token::Null
        } else {
            Token::ClassName(name)
        }
    }

    /// Lowercase-led word: reserved word or identifier.
    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(&ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        match Token::reserved_word(&word) {
            Some(keyword) => keyword,
            None => Token::Identifier(word),
        }
    }

    /// Maximal run of operator-set characters.
    fn read_operator_run(&mut self) -> String {
        let mut run = String::new();
        while let Some(&ch) = self.peek() {
            if is_operator_char(ch) {
                run.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        run
    }
}

/// Collapse every maximal run of N backslashes to floor(N/2). This is the
/// whole of string de-escaping: a textual normalization, not a table of
/// named escape meanings.
fn collapse_backslash_runs(body: &str) -> String {
    let mut out = String::new();
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            let mut run = 1;
            while chars.peek() == Some(&'\\') {
                chars.next();
                run += 1;
            }
            for _ in 0..run / 2 {
                out.push('\\');
            }
        } else {
            out.push(ch);
        }
    }
    out
}
