//! Recursive descent parser for definition files.
//!
//! ```text
//! definition := (require | module)*
//! require    := ("require" | "requires") STRING
//! module     := "module" NAME attrs? sentence* "endmodule"
//! sentence   := "imports" ["public" | "private"] NAME
//!             | "syntax" SORT attrs?
//!             | "syntax" SORT "=" SORT attrs?
//!             | "syntax" SORT "::=" prod (("|" | ">") prod)*
//!             | "rule" term ["requires" term] ["ensures" term] attrs?
//!             | "context" ["alias"] term ["requires" term] attrs?
//! ```
//!
//! Every node records the source and location it was read from.

use kdef_diagnostic::span_utils::LineOffsetTable;
use kdef_ir::{
    Att, Context, ContextAlias, DefinitionItem, KLabel, Location, NonTerminal, ProductionItem,
    RawImport, RawModule, RawProduction, RawSentence, Require, Rule, Sort, SortSynonym, Source,
    SyntaxSort, K,
};
use kdef_stack::ensure_sufficient_stack;

use crate::lexer::{lex, Token, TokenKind};
use crate::ParseError;

type ParseResult<T> = Result<T, ParseError>;

/// Parse the requires and modules of one definition text.
#[tracing::instrument(level = "debug", skip_all, fields(source = %source.as_str()))]
pub fn parse_definition(source: &Source, text: &str) -> ParseResult<Vec<DefinitionItem>> {
    Parser::new(source, text).definition()
}

/// Parse a single term, as written in a rule body.
pub fn parse_term(source: &Source, text: &str) -> ParseResult<K> {
    let mut parser = Parser::new(source, text);
    let term = parser.term()?;
    parser.expect(TokenKind::Eof, "end of input")?;
    Ok(term)
}

struct Parser<'a> {
    source: &'a Source,
    text: &'a str,
    tokens: Vec<Token>,
    lines: LineOffsetTable,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a Source, text: &'a str) -> Self {
        Parser {
            source,
            text,
            tokens: lex(text),
            lines: LineOffsetTable::build(text),
            pos: 0,
        }
    }

    // ===== Token access =====

    fn current(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn peek(&self, offset: usize) -> TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        self.tokens[idx].kind
    }

    fn at_end(&self) -> bool {
        self.kind() == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(expected))
        }
    }

    fn slice(&self, token: Token) -> &'a str {
        token.slice(self.text)
    }

    fn prev_end(&self) -> u32 {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |t| t.end)
    }

    fn location(&self, start: u32, end: u32) -> Location {
        self.lines.location(self.text, start, end)
    }

    /// Attach the source and the range `start..` (up to the last consumed
    /// token) to `att`.
    fn located(&self, att: Att, start: u32) -> Att {
        att.with_source(self.source.clone())
            .with_location(self.location(start, self.prev_end()))
    }

    fn error(&self, expected: &str) -> ParseError {
        let token = self.current();
        let origin = self.source.clone();
        let location = self.location(token.start, token.end);
        match token.kind {
            TokenKind::Eof => ParseError::UnexpectedEof {
                expected: expected.to_string(),
                origin,
                location,
            },
            TokenKind::Unknown => ParseError::InvalidToken {
                text: self.slice(token).to_string(),
                origin,
                location,
            },
            _ => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.slice(token).to_string(),
                origin,
                location,
            },
        }
    }

    fn name(&mut self, expected: &str) -> ParseResult<String> {
        let token = self.expect(TokenKind::Ident, expected)?;
        Ok(self.slice(token).to_string())
    }

    fn sort(&mut self) -> ParseResult<Sort> {
        self.name("sort").map(Sort::new)
    }

    fn string(&mut self, expected: &str) -> ParseResult<String> {
        let token = self.expect(TokenKind::String, expected)?;
        Ok(unquote(self.slice(token)))
    }

    // ===== Definition items =====

    fn definition(mut self) -> ParseResult<Vec<DefinitionItem>> {
        let mut items = Vec::new();
        while !self.at_end() {
            let item = match self.kind() {
                TokenKind::Require | TokenKind::Requires => DefinitionItem::Require(self.require()?),
                TokenKind::Module => DefinitionItem::Module(self.module()?),
                _ => return Err(self.error("`module` or `require`")),
            };
            items.push(item);
        }
        tracing::trace!(items = items.len(), "parsed definition");
        Ok(items)
    }

    fn require(&mut self) -> ParseResult<Require> {
        let start = self.advance().start;
        let path = self.string("file name")?;
        Ok(Require {
            path,
            att: self.located(Att::empty(), start),
        })
    }

    fn module(&mut self) -> ParseResult<RawModule> {
        let start = self.advance().start;
        let name = self.name("module name")?;
        let att = self.attributes()?;
        let mut sentences = Vec::new();
        while !self.eat(TokenKind::EndModule) {
            sentences.push(self.sentence()?);
        }
        Ok(RawModule {
            name,
            sentences,
            att: self.located(att, start),
        })
    }

    fn sentence(&mut self) -> ParseResult<RawSentence> {
        match self.kind() {
            TokenKind::Imports => self.import(),
            TokenKind::Syntax => self.syntax(),
            TokenKind::Rule => self.rule(),
            TokenKind::Context => self.context(),
            _ => Err(self.error("sentence or `endmodule`")),
        }
    }

    fn import(&mut self) -> ParseResult<RawSentence> {
        let start = self.advance().start;
        let mut att = Att::empty();
        if self.eat(TokenKind::Public) {
            att = att.add_flag("public");
        } else if self.eat(TokenKind::Private) {
            att = att.add_flag("private");
        }
        let name = self.name("module name")?;
        Ok(RawSentence::Import(RawImport {
            name,
            att: self.located(att, start),
        }))
    }

    fn syntax(&mut self) -> ParseResult<RawSentence> {
        let start = self.advance().start;
        let sort = self.sort()?;

        if self.eat(TokenKind::ColonColonEq) {
            let mut productions = vec![self.production()?];
            while self.eat(TokenKind::Pipe) || self.eat(TokenKind::Gt) {
                productions.push(self.production()?);
            }
            return Ok(RawSentence::Syntax {
                sort,
                productions,
                att: self.located(Att::empty(), start),
            });
        }

        if self.eat(TokenKind::Eq) {
            let old_sort = self.sort()?;
            let att = self.attributes()?;
            return Ok(RawSentence::SortSynonym(SortSynonym {
                new_sort: sort,
                old_sort,
                att: self.located(att, start),
            }));
        }

        let att = self.attributes()?;
        Ok(RawSentence::SyntaxSort(SyntaxSort {
            sort,
            att: self.located(att, start),
        }))
    }

    fn production(&mut self) -> ParseResult<RawProduction> {
        let start = self.current().start;

        let is_list = self.check(TokenKind::Ident)
            && self.slice(self.current()) == "List"
            && self.peek(1) == TokenKind::LBrace;
        if is_list {
            self.advance();
            self.advance();
            let element = self.sort()?;
            self.expect(TokenKind::Comma, "`,`")?;
            let separator = self.string("list separator")?;
            self.expect(TokenKind::RBrace, "`}`")?;
            let att = self.attributes()?;
            return Ok(RawProduction::List {
                element,
                separator,
                att: self.located(att, start),
            });
        }

        let is_prefix = matches!(self.kind(), TokenKind::Ident | TokenKind::Label)
            && self.peek(1) == TokenKind::LParen;
        if is_prefix {
            let head = self.advance();
            let name = label_name(self.slice(head)).to_string();
            self.advance();
            let mut params = Vec::new();
            if !self.check(TokenKind::RParen) {
                params.push(self.param()?);
                while self.eat(TokenKind::Comma) {
                    params.push(self.param()?);
                }
            }
            self.expect(TokenKind::RParen, "`,` or `)`")?;
            let att = self.attributes()?;
            return Ok(RawProduction::Prefix {
                name,
                params,
                att: self.located(att, start),
            });
        }

        let mut items = Vec::new();
        loop {
            match self.kind() {
                TokenKind::String => {
                    let terminal = self.string("terminal")?;
                    items.push(ProductionItem::Terminal(terminal));
                }
                TokenKind::Ident => {
                    let sort = self.sort()?;
                    items.push(ProductionItem::NonTerminal(NonTerminal::new(sort)));
                }
                _ => break,
            }
        }
        if items.is_empty() {
            return Err(self.error("production"));
        }
        let att = self.attributes()?;
        Ok(RawProduction::Items {
            items,
            att: self.located(att, start),
        })
    }

    fn param(&mut self) -> ParseResult<NonTerminal> {
        if self.check(TokenKind::Ident) && self.peek(1) == TokenKind::Colon {
            let name = self.name("parameter name")?;
            self.advance();
            Ok(NonTerminal::named(name, self.sort()?))
        } else {
            Ok(NonTerminal::new(self.sort()?))
        }
    }

    fn rule(&mut self) -> ParseResult<RawSentence> {
        let start = self.advance().start;
        let body = self.term()?;
        let requires = self.condition(TokenKind::Requires)?;
        let ensures = self.condition(TokenKind::Ensures)?;
        let att = self.attributes()?;
        Ok(RawSentence::Rule(Rule {
            body,
            requires,
            ensures,
            att: self.located(att, start),
        }))
    }

    fn context(&mut self) -> ParseResult<RawSentence> {
        let start = self.advance().start;
        let alias = self.eat(TokenKind::Alias);
        let body = self.term()?;
        let requires = self.condition(TokenKind::Requires)?;
        let att = self.attributes()?;
        let att = self.located(att, start);
        Ok(if alias {
            RawSentence::ContextAlias(ContextAlias {
                body,
                requires,
                att,
            })
        } else {
            RawSentence::Context(Context {
                body,
                requires,
                att,
            })
        })
    }

    fn condition(&mut self, keyword: TokenKind) -> ParseResult<K> {
        if self.eat(keyword) {
            self.term()
        } else {
            Ok(K::bool_true())
        }
    }

    // ===== Attributes =====

    fn attributes(&mut self) -> ParseResult<Att> {
        let mut att = Att::empty();
        if !self.eat(TokenKind::LBracket) {
            return Ok(att);
        }
        loop {
            let key = self.attribute_key()?;
            let value = if self.check(TokenKind::LParen) {
                self.raw_parenthesized()?
            } else {
                String::new()
            };
            att = att.add(key, value);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "`,` or `]`")?;
        Ok(att)
    }

    fn attribute_key(&mut self) -> ParseResult<String> {
        let token = self.current();
        if token.kind == TokenKind::Ident || token.kind.is_keyword() {
            self.advance();
            Ok(self.slice(token).to_string())
        } else {
            Err(self.error("attribute name"))
        }
    }

    /// Source text between balanced parentheses; the current token is `(`.
    fn raw_parenthesized(&mut self) -> ParseResult<String> {
        let open = self.advance();
        let mut depth = 1usize;
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Eof => return Err(self.error("`)`")),
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        let raw = self
                            .text
                            .get(open.end as usize..token.start as usize)
                            .unwrap_or_default();
                        return Ok(raw.trim().to_string());
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ===== Terms =====

    fn term(&mut self) -> ParseResult<K> {
        ensure_sufficient_stack(|| {
            let start = self.current().start;
            let left = self.sequence()?;
            if !self.eat(TokenKind::FatArrow) {
                return Ok(left);
            }
            let right = self.sequence()?;
            Ok(K::Rewrite {
                left: Box::new(left),
                right: Box::new(right),
                att: self.located(Att::empty(), start),
            })
        })
    }

    fn sequence(&mut self) -> ParseResult<K> {
        let start = self.current().start;
        let first = self.atom()?;
        if !self.check(TokenKind::KSeq) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(TokenKind::KSeq) {
            items.push(self.atom()?);
        }
        Ok(K::Sequence {
            items,
            att: self.located(Att::empty(), start),
        })
    }

    fn atom(&mut self) -> ParseResult<K> {
        let token = self.current();
        let start = token.start;
        let text = self.slice(token);
        match token.kind {
            TokenKind::LParen => {
                self.advance();
                let inner = self.term()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::Int => {
                self.advance();
                Ok(K::token(text, Sort::new("Int")).with_att(self.located(Att::empty(), start)))
            }
            TokenKind::String => {
                self.advance();
                Ok(K::token(unquote(text), Sort::new("String"))
                    .with_att(self.located(Att::empty(), start)))
            }
            TokenKind::DotIdent => {
                self.advance();
                let att = self.located(Att::empty(), start);
                Ok(if text == ".K" {
                    K::empty_sequence().with_att(att)
                } else {
                    K::apply(KLabel::symbol(text), Vec::new()).with_att(att)
                })
            }
            TokenKind::Label => {
                self.advance();
                let label = KLabel::symbol(label_name(text));
                let args = if self.check(TokenKind::LParen) {
                    self.arguments()?
                } else {
                    Vec::new()
                };
                Ok(K::apply(label, args).with_att(self.located(Att::empty(), start)))
            }
            TokenKind::Ident => self.identifier_term(),
            _ => Err(self.error("term")),
        }
    }

    fn identifier_term(&mut self) -> ParseResult<K> {
        let token = self.advance();
        let start = token.start;
        let name = self.slice(token);

        if name == "#klabel" && self.check(TokenKind::LParen) {
            self.advance();
            let inner = self.current();
            let label = match inner.kind {
                TokenKind::Label => KLabel::symbol(label_name(self.slice(inner))),
                TokenKind::Ident => label_for(self.slice(inner)),
                _ => return Err(self.error("klabel")),
            };
            self.advance();
            self.expect(TokenKind::RParen, "`)`")?;
            return Ok(K::InjectedLabel {
                label,
                att: self.located(Att::empty(), start),
            });
        }

        if self.check(TokenKind::LParen) {
            let args = self.arguments()?;
            return Ok(K::apply(label_for(name), args).with_att(self.located(Att::empty(), start)));
        }

        if name == "true" || name == "false" {
            return Ok(K::token(name, Sort::bool()).with_att(self.located(Att::empty(), start)));
        }

        if is_variable_name(name) {
            let mut att = Att::empty();
            if self.check(TokenKind::Colon) && self.peek(1) == TokenKind::Ident {
                self.advance();
                let sort = self.sort()?;
                att = att.add("sort", sort.name());
            }
            return Ok(K::variable(name).with_att(self.located(att, start)));
        }

        Ok(K::apply(KLabel::symbol(name), Vec::new()).with_att(self.located(Att::empty(), start)))
    }

    fn arguments(&mut self) -> ParseResult<Vec<K>> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut args = Vec::new();
        let empty_list = self.check(TokenKind::DotIdent)
            && self.slice(self.current()) == ".KList"
            && self.peek(1) == TokenKind::RParen;
        if empty_list {
            self.advance();
        } else if !self.check(TokenKind::RParen) {
            args.push(self.term()?);
            while self.eat(TokenKind::Comma) {
                args.push(self.term()?);
            }
        }
        self.expect(TokenKind::RParen, "`,` or `)`")?;
        Ok(args)
    }
}

/// Variables start with an uppercase letter or `_`.
fn is_variable_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase() || c == '_')
}

/// A label in head position: variable-like names match any symbol.
fn label_for(name: &str) -> KLabel {
    if is_variable_name(name) {
        KLabel::Variable(name.to_string())
    } else {
        KLabel::symbol(name)
    }
}

fn label_name(text: &str) -> &str {
    text.strip_prefix('`')
        .and_then(|t| t.strip_suffix('`'))
        .unwrap_or(text)
}

fn unquote(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
