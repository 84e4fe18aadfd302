//! Lexer for the outer syntax, built on `logos`.
//!
//! Characters the outer syntax does not know lex as
//! [`TokenKind::Unknown`] instead of failing: attribute arguments such as
//! `klabel(_+_)` or `format(%1 + %2)` are captured as raw text, so the
//! parser only rejects unknown tokens outside of such regions.

use logos::Logos;

#[derive(Logos, Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // === Comments ===
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // === Keywords ===
    #[token("module")]
    Module,
    #[token("endmodule")]
    EndModule,
    #[token("imports")]
    Imports,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("require")]
    Require,
    #[token("requires")]
    Requires,
    #[token("syntax")]
    Syntax,
    #[token("rule")]
    Rule,
    #[token("context")]
    Context,
    #[token("alias")]
    Alias,
    #[token("ensures")]
    Ensures,

    // === Symbols ===
    #[token("::=")]
    ColonColonEq,
    #[token("=>")]
    FatArrow,
    #[token("~>")]
    KSeq,
    #[token("=")]
    Eq,
    #[token("|")]
    Pipe,
    #[token(">")]
    Gt,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    // === Literals ===
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    #[regex(r"[0-9]+")]
    Int,
    /// `.K`, `.KList`, `.Map`
    #[regex(r"\.[A-Za-z][A-Za-z0-9]*")]
    DotIdent,
    /// Backquoted label: `` `_+_` ``
    #[regex(r"`[^`]+`")]
    Label,
    #[regex(r"[a-zA-Z_#][a-zA-Z0-9_#'\-]*")]
    Ident,

    Unknown,
    Eof,
}

impl TokenKind {
    /// Keywords double as attribute keys (`[alias]`, `[private]`).
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Module
                | TokenKind::EndModule
                | TokenKind::Imports
                | TokenKind::Public
                | TokenKind::Private
                | TokenKind::Require
                | TokenKind::Requires
                | TokenKind::Syntax
                | TokenKind::Rule
                | TokenKind::Context
                | TokenKind::Alias
                | TokenKind::Ensures
        )
    }

    fn is_trivia(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// A token and its byte range in the lexed text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub start: u32,
    pub end: u32,
}

impl Token {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start as usize..self.end as usize)
            .unwrap_or_default()
    }
}

fn offset(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Lex `text` into tokens, dropping comments. The list always ends with
/// an [`TokenKind::Eof`] token.
pub fn lex(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(text);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let kind = result.unwrap_or(TokenKind::Unknown);
        if kind.is_trivia() {
            continue;
        }
        tokens.push(Token {
            kind,
            start: offset(span.start),
            end: offset(span.end),
        });
    }

    let end = offset(text.len());
    tokens.push(Token {
        kind: TokenKind::Eof,
        start: end,
        end,
    });
    tokens
}
