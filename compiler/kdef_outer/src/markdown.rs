//! Literate definitions: extract fenced code blocks from markdown.
//!
//! A block is kept when the tags of its info string satisfy the selector
//! (`k` by default). Everything else is blanked line by line, so line
//! numbers in the extracted text match the markdown file.
//!
//! ````text
//! ```k                 -> tags {k}
//! ```{.k .rule}        -> tags {k, rule}
//! ~~~ k exec           -> tags {k, exec}
//! ````

use std::fmt;
use std::str::FromStr;

/// Boolean expression over block tags: `k & !exclude | (a & b)`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum MdSelector {
    Tag(String),
    Not(Box<MdSelector>),
    And(Box<MdSelector>, Box<MdSelector>),
    Or(Box<MdSelector>, Box<MdSelector>),
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("empty markdown selector")]
    Empty,
    #[error("unexpected `{found}` at position {position} in markdown selector")]
    Unexpected { found: char, position: usize },
    #[error("unbalanced parentheses in markdown selector")]
    Unbalanced,
}

impl Default for MdSelector {
    fn default() -> Self {
        MdSelector::Tag("k".to_string())
    }
}

impl MdSelector {
    pub fn matches(&self, tags: &[&str]) -> bool {
        match self {
            MdSelector::Tag(tag) => tags.iter().any(|t| *t == tag.as_str()),
            MdSelector::Not(inner) => !inner.matches(tags),
            MdSelector::And(a, b) => a.matches(tags) && b.matches(tags),
            MdSelector::Or(a, b) => a.matches(tags) || b.matches(tags),
        }
    }
}

impl FromStr for MdSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = SelectorParser {
            chars: s.char_indices().collect(),
            pos: 0,
        };
        if parser.peek().is_none() {
            return Err(SelectorError::Empty);
        }
        let selector = parser.or()?;
        match parser.peek() {
            None => Ok(selector),
            Some((_, ')')) => Err(SelectorError::Unbalanced),
            Some((position, found)) => Err(SelectorError::Unexpected { found, position }),
        }
    }
}

impl fmt::Display for MdSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MdSelector::Tag(tag) => f.write_str(tag),
            MdSelector::Not(inner) => write!(f, "!{inner}"),
            MdSelector::And(a, b) => write!(f, "({a} & {b})"),
            MdSelector::Or(a, b) => write!(f, "({a} | {b})"),
        }
    }
}

/// Precedence, tightest first: `!`, `&`, `|`.
struct SelectorParser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl SelectorParser {
    fn peek(&mut self) -> Option<(usize, char)> {
        while let Some(&(_, c)) = self.chars.get(self.pos) {
            if !c.is_whitespace() {
                break;
            }
            self.pos += 1;
        }
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if matches!(self.peek(), Some((_, c)) if c == expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<MdSelector, SelectorError> {
        let mut left = self.and()?;
        while self.eat('|') {
            left = MdSelector::Or(Box::new(left), Box::new(self.and()?));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<MdSelector, SelectorError> {
        let mut left = self.unary()?;
        while self.eat('&') {
            left = MdSelector::And(Box::new(left), Box::new(self.unary()?));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<MdSelector, SelectorError> {
        if self.eat('!') {
            return Ok(MdSelector::Not(Box::new(self.unary()?)));
        }
        if self.eat('(') {
            let inner = self.or()?;
            if !self.eat(')') {
                return Err(SelectorError::Unbalanced);
            }
            return Ok(inner);
        }
        let mut tag = String::new();
        while let Some((_, c)) = self.chars.get(self.pos).copied() {
            if !is_tag_char(c) {
                break;
            }
            tag.push(c);
            self.pos += 1;
        }
        if !tag.is_empty() {
            return Ok(MdSelector::Tag(tag));
        }
        match self.peek() {
            Some((position, found)) => Err(SelectorError::Unexpected { found, position }),
            None => Err(SelectorError::Unbalanced),
        }
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Opening or closing fence: up to three spaces of indentation, then at
/// least three backticks or tildes.
fn fence(line: &str) -> Option<(char, usize, &str)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let marker = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = rest.len() - rest.trim_start_matches(marker).len();
    (len >= 3).then(|| (marker, len, &rest[len..]))
}

fn info_tags(info: &str) -> Vec<&str> {
    info.split(|c: char| c.is_whitespace() || matches!(c, '{' | '}' | ','))
        .map(|tag| tag.strip_prefix('.').unwrap_or(tag))
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Keep the contents of selected fenced blocks; blank every other line.
///
/// The result has exactly as many lines as `text`.
#[tracing::instrument(level = "trace", skip_all, fields(selector = %selector))]
pub fn extract_markdown(text: &str, selector: &MdSelector) -> String {
    let mut out = String::with_capacity(text.len());
    // (marker, fence length, selected) of the open block
    let mut open: Option<(char, usize, bool)> = None;

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match (open, fence(line)) {
            (None, Some((marker, len, info))) => {
                open = Some((marker, len, selector.matches(&info_tags(info))));
            }
            (Some((marker, len, _)), Some((m, l, info)))
                if m == marker && l >= len && info.trim().is_empty() =>
            {
                open = None;
            }
            (Some((_, _, true)), _) => out.push_str(line),
            _ => {}
        }
    }
    out
}
