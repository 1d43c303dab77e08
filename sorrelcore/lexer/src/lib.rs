//! Tokenizer for Sorrel — keywords, operators, literals, one NEWLINE per
//! end-of-line, COMMENT for `'` comments, terminal EOF.

use sorrel_common::{Result, SorrelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Print, Input, Let, If, Then, Else, End, While, Wend,
    Repeat, Until, For, To, Step, Next, Continue, Exit,
    And, Or, Not, Len, Val, IsNan, Array,
    // Operators
    EqEq, BangEq, Lt, LtEq, Gt, GtEq,
    Plus, Minus, Star, Slash, Percent, Caret, Assign,
    // Punctuation
    LParen, RParen, LBracket, RBracket, Comma,
    // Literals / identifiers
    Number, Str, Ident,
    // Structural
    Newline, Comment, Eof,
}

impl TokenKind {
    /// Display name used in parse-fault messages.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Print => "PRINT",
            TokenKind::Input => "INPUT",
            TokenKind::Let => "LET",
            TokenKind::If => "IF",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::End => "END",
            TokenKind::While => "WHILE",
            TokenKind::Wend => "WEND",
            TokenKind::Repeat => "REPEAT",
            TokenKind::Until => "UNTIL",
            TokenKind::For => "FOR",
            TokenKind::To => "TO",
            TokenKind::Step => "STEP",
            TokenKind::Next => "NEXT",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Exit => "EXIT",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Len => "LEN",
            TokenKind::Val => "VAL",
            TokenKind::IsNan => "ISNAN",
            TokenKind::Array => "ARRAY",
            TokenKind::EqEq => "'=='",
            TokenKind::BangEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Caret => "'^'",
            TokenKind::Assign => "'='",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::Ident => "identifier",
            TokenKind::Newline => "end of line",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of input",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
}

pub struct Lexer<'a> {
    src: &'a str,
    chars: std::str::Chars<'a>,
    cur: Option<char>,
    pos: usize,
    start: usize,
    line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut l = Self { src, chars: src.chars(), cur: None, pos: 0, start: 0, line: 1 };
        l.advance();
        l
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut out = Vec::new();
        loop {
            let t = self.next_token()?;
            let eof = t.kind == TokenKind::Eof;
            out.push(t);
            if eof { break; }
        }
        Ok(out)
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_blanks();
        self.start = self.pos;
        let ch = match self.cur { Some(c) => c, None => return Ok(self.make(TokenKind::Eof)) };
        match ch {
            '\n' => {
                self.advance();
                let t = self.make(TokenKind::Newline);
                self.line += 1;
                Ok(t)
            }
            '\'' => self.comment(),
            '(' => { self.advance(); Ok(self.make(TokenKind::LParen)) }
            ')' => { self.advance(); Ok(self.make(TokenKind::RParen)) }
            '[' => { self.advance(); Ok(self.make(TokenKind::LBracket)) }
            ']' => { self.advance(); Ok(self.make(TokenKind::RBracket)) }
            ',' => { self.advance(); Ok(self.make(TokenKind::Comma)) }
            '+' => { self.advance(); Ok(self.make(TokenKind::Plus)) }
            '-' => { self.advance(); Ok(self.make(TokenKind::Minus)) }
            '*' => { self.advance(); Ok(self.make(TokenKind::Star)) }
            '/' => { self.advance(); Ok(self.make(TokenKind::Slash)) }
            '%' => { self.advance(); Ok(self.make(TokenKind::Percent)) }
            '^' => { self.advance(); Ok(self.make(TokenKind::Caret)) }
            '=' => { self.advance(); if self.match_char('=') { Ok(self.make(TokenKind::EqEq)) } else { Ok(self.make(TokenKind::Assign)) } }
            '!' => {
                self.advance();
                if self.match_char('=') { Ok(self.make(TokenKind::BangEq)) }
                else { Err(self.unknown('!')) }
            }
            '<' => { self.advance(); if self.match_char('=') { Ok(self.make(TokenKind::LtEq)) } else { Ok(self.make(TokenKind::Lt)) } }
            '>' => { self.advance(); if self.match_char('=') { Ok(self.make(TokenKind::GtEq)) } else { Ok(self.make(TokenKind::Gt)) } }
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_ident_start(c) => self.ident_or_kw(),
            c => Err(self.unknown(c)),
        }
    }

    // Strings are double-quoted with no escapes; the closing quote must
    // arrive before the end of the line.
    fn string(&mut self) -> Result<Token> {
        self.advance();
        let mut s = String::new();
        loop {
            match self.cur {
                Some('"') => { self.advance(); break; }
                Some('\n') | None => {
                    return Err(SorrelError::Tokenize { line: self.line, msg: "unterminated string literal".into() });
                }
                Some(c) => { s.push(c); self.advance(); }
            }
        }
        let mut tok = self.make(TokenKind::Str);
        tok.text = s;
        Ok(tok)
    }

    fn number(&mut self) -> Result<Token> {
        while self.cur.map_or(false, |c| c.is_ascii_digit()) { self.advance(); }
        if self.cur == Some('.') && self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
            while self.cur.map_or(false, |c| c.is_ascii_digit()) { self.advance(); }
        }
        Ok(self.make(TokenKind::Number))
    }

    fn ident_or_kw(&mut self) -> Result<Token> {
        while self.cur.map_or(false, |c| is_ident_continue(c)) { self.advance(); }
        let lex = &self.src[self.start..self.pos];
        let kind = match &*lex.to_ascii_uppercase() {
            "PRINT" => TokenKind::Print,
            "INPUT" => TokenKind::Input,
            "LET" => TokenKind::Let,
            "IF" => TokenKind::If,
            "THEN" => TokenKind::Then,
            "ELSE" => TokenKind::Else,
            "END" => TokenKind::End,
            "WHILE" => TokenKind::While,
            "WEND" => TokenKind::Wend,
            "REPEAT" => TokenKind::Repeat,
            "UNTIL" => TokenKind::Until,
            "FOR" => TokenKind::For,
            "TO" => TokenKind::To,
            "STEP" => TokenKind::Step,
            "NEXT" => TokenKind::Next,
            "CONTINUE" => TokenKind::Continue,
            "EXIT" => TokenKind::Exit,
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "NOT" => TokenKind::Not,
            "LEN" => TokenKind::Len,
            "VAL" => TokenKind::Val,
            "ISNAN" => TokenKind::IsNan,
            "ARRAY" => TokenKind::Array,
            _ => TokenKind::Ident,
        };
        let mut tok = self.make(kind);
        if kind == TokenKind::Ident {
            // identifiers are case-insensitive: lower-case once here
            tok.text = tok.text.to_ascii_lowercase();
        }
        Ok(tok)
    }

    fn comment(&mut self) -> Result<Token> {
        self.advance();
        let text_start = self.pos;
        while let Some(c) = self.cur {
            if c == '\n' { break; }
            self.advance();
        }
        let mut tok = self.make(TokenKind::Comment);
        tok.text = self.src[text_start..self.pos].to_string();
        Ok(tok)
    }

    // Whitespace except '\n', which is a token of its own.
    fn skip_blanks(&mut self) {
        while let Some(c) = self.cur {
            if c == '\n' || !c.is_whitespace() { break; }
            self.advance();
        }
    }

    fn make(&self, kind: TokenKind) -> Token {
        Token { kind, text: self.src[self.start..self.pos].to_string(), line: self.line }
    }

    fn unknown(&self, c: char) -> SorrelError {
        SorrelError::Tokenize { line: self.line, msg: format!("unknown character '{}'", c) }
    }

    fn advance(&mut self) {
        self.cur = self.chars.next();
        if let Some(c) = self.cur { self.pos += c.len_utf8(); } else { self.pos = self.src.len(); }
    }

    fn match_char(&mut self, want: char) -> bool {
        if self.cur == Some(want) { self.advance(); true } else { false }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }
}

fn is_ident_start(c: char) -> bool { c.is_ascii_alphabetic() || c == '_' }
fn is_ident_continue(c: char) -> bool { c.is_ascii_alphanumeric() || c == '_' }
