//! Selector parsing and matching for the in-memory document.
//!
//! Supports compound selectors and selector lists:
//!
//! ```text
//! button.filter[data-filter=".a"], #reset, *
//! ```
//!
//! Combinators (descendant, `>`, `+`, `~`) and attribute operators other than
//! `=` are rejected.

use crate::error::SelectorError;

/// What a selector needs to know about an element.
pub trait Matchable {
    fn tag(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<String>;
    fn has_class(&self, class: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatch {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

impl Compound {
    fn matches<E: Matchable + ?Sized>(&self, el: &E) -> bool {
        if let Some(ref tag) = self.tag {
            if !el.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(ref id) = self.id {
            if el.attribute("id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| el.has_class(class)) {
            return false;
        }
        self.attributes.iter().all(|attr| match attr.value {
            None => el.attribute(&attr.name).is_some(),
            Some(ref value) => el.attribute(&attr.name).as_deref() == Some(value.as_str()),
        })
    }
}

/// A parsed selector list. Matches when any alternative matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut parser = Parser { src: input, pos: 0 };
        let mut alternatives = Vec::new();

        loop {
            parser.skip_whitespace();
            alternatives.push(parser.compound()?);

            let before = parser.pos;
            parser.skip_whitespace();
            match parser.peek() {
                None => break,
                Some(',') => {
                    parser.bump();
                }
                Some('>' | '+' | '~') => {
                    return Err(parser.unsupported("combinators are not supported"));
                }
                Some(_) if parser.pos > before => {
                    return Err(parser.unsupported("descendant combinators are not supported"));
                }
                Some(_) => return Err(parser.malformed()),
            }
        }

        Ok(Self { alternatives })
    }

    pub fn matches<E: Matchable + ?Sized>(&self, el: &E) -> bool {
        self.alternatives.iter().any(|compound| compound.matches(el))
    }
}

// =============================================================================
// Parser
// =============================================================================

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn malformed(&self) -> SelectorError {
        SelectorError::Malformed {
            selector: self.src.to_string(),
            position: self.pos,
        }
    }

    fn unsupported(&self, reason: &'static str) -> SelectorError {
        SelectorError::Unsupported {
            selector: self.src.to_string(),
            reason,
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_char(c)) {
            self.bump();
        }
        if self.pos == start {
            return Err(self.malformed());
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let mut compound = Compound::default();

        loop {
            match self.peek() {
                Some('*') if self.pos == start => {
                    self.bump();
                }
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.bump();
                    compound.attributes.push(self.attribute()?);
                }
                Some(c) if self.pos == start && is_ident_char(c) => {
                    compound.tag = Some(self.ident()?.to_ascii_lowercase());
                }
                _ => break,
            }
        }

        if self.pos == start {
            return Err(self.malformed());
        }
        Ok(compound)
    }

    /// Parses the inside of `[...]`; the opening bracket is already consumed.
    fn attribute(&mut self) -> Result<AttributeMatch, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.bump();
                self.skip_whitespace();
                let value = match self.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        self.bump();
                        let start = self.pos;
                        loop {
                            match self.bump() {
                                Some(c) if c == quote => break,
                                Some(_) => {}
                                None => return Err(self.malformed()),
                            }
                        }
                        self.src[start..self.pos - 1].to_string()
                    }
                    _ => self.ident()?,
                };
                self.skip_whitespace();
                Some(value)
            }
            Some('~' | '|' | '^' | '$' | '*') => {
                return Err(self.unsupported("only `=` attribute matching is supported"));
            }
            _ => return Err(self.malformed()),
        };

        match self.bump() {
            Some(']') => Ok(AttributeMatch { name, value }),
            _ => Err(self.malformed()),
        }
    }
}
