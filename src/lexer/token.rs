/// A single lexical unit of Ivy source, tagged by kind with an optional
/// payload. Structural tokens (Newline/Indent/Dedent/Eof) never appear
/// literally in the input; they are synthesized by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Class, Def, If, Elif, Else, While, For, In, Return, New, Pass,
    SelfKw, And, Or, Not,

    // Literals
    IntLit(i32),
    LongLit(i64),
    /// Raw float text, unconverted; numeric parsing is deferred downstream.
    FloatLit(String),
    BoolLit(bool),
    CharLit(char),
    StrLit(String),
    Null,

    // Identifiers
    Identifier(String),
    /// Capitalized identifier naming a user-defined type. Lexically distinct
    /// so the grammar can tell type references from value identifiers
    /// without lookahead.
    ClassName(String),

    // Punctuation
    LParen, RParen, LBracket, RBracket, Colon, Period, Comma, Underscore,

    // Fixed operators
    Plus, Minus, Star, Slash, Assign, Eq, NotEq, Lt, Gt, Le, Ge,

    // User-defined symbolic operators
    CustomOp(String),
    /// An operator declared as a class method: `_` followed by the run.
    CustomOpMethod(String),

    // Structural
    Newline, Indent, Dedent, Eof,
}

impl Token {
    /// Look up a lowercase spelling in the reserved-word table.
    /// Returns None for spellings that lex as plain identifiers.
    pub fn reserved_word(s: &str) -> Option<Token> {
        match s {
            "class" => Some(Token::Class),
            "def" => Some(Token::Def),
            "if" => Some(Token::If),
            "elif" => Some(Token::Elif),
            "else" => Some(Token::Else),
            "while" => Some(Token::While),
            "for" => Some(Token::For),
            "in" => Some(Token::In),
            "return" => Some(Token::Return),
            "new" => Some(Token::New),
            "pass" => Some(Token::Pass),
            "self" => Some(Token::SelfKw),
            "and" => Some(Token::And),
            "or" => Some(Token::Or),
            "not" => Some(Token::Not),
            "true" => Some(Token::BoolLit(true)),
            "false" => Some(Token::BoolLit(false)),
            _ => None,
        }
    }
}

/// A token plus the source position where its lexeme began.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

/// Characters that may appear in a user-defined symbolic operator run.
pub const OPERATOR_CHARS: &str = "%&$@!#^*/~?><:=+-";

pub fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(c)
}

/// Ordered replacement table for punctuation inside custom operator runs.
/// Downstream stages build symbolic identifiers out of these spellings and
/// cannot embed raw punctuation.
pub const SYMBOL_SUBSTITUTIONS: &[(char, &str)] = &[
    ('%', "pct"),
    ('&', "amp"),
    ('$', "dol"),
    ('@', "at"),
    ('!', "bng"),
    ('#', "hsh"),
    ('^', "crt"),
    ('*', "ast"),
    ('/', "sol"),
    ('~', "tld"),
    ('?', "qst"),
    ('>', "gt"),
    ('<', "lt"),
    (':', "cln"),
    ('=', "eq"),
    ('+', "pls"),
    ('-', "mns"),
];

/// Replace each punctuation character of a custom operator spelling with its
/// safe textual word, in table order. Characters outside the table pass
/// through unchanged.
pub fn sanitize_operator(op: &str) -> String {
    let mut out = String::new();
    for ch in op.chars() {
        match SYMBOL_SUBSTITUTIONS.iter().find(|(sym, _)| *sym == ch) {
            Some((_, word)) => out.push_str(word),
            None => out.push(ch),
        }
    }
    out
}
