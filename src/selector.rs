use super::*;

/// A comma-separated selector list.
///
/// The accepted grammar is the part of CSS the validator needs:
/// type selectors and `*`, `#id`, `.class`, `[attr]`, `[attr=value]`
/// (value bare or quoted), `:not(<list>)`, and the descendant (whitespace)
/// and child (`>`) combinators. Anything else is
/// [`Error::UnsupportedSelector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorList {
    pub(crate) alternatives: Vec<ComplexSelector>,
}

/// One alternative of a list, stored right to left: `subject` is the element
/// being tested and `context` walks outward from it, nearest compound first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ComplexSelector {
    pub(crate) subject: Compound,
    pub(crate) context: Vec<(Relation, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relation {
    Parent,
    Ancestor,
}

/// Conditions on a single element. `tag: None` matches any element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) filters: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Filter {
    Id(String),
    Class(String),
    HasAttr(String),
    AttrEquals(String, String),
    Not(SelectorList),
}

impl SelectorList {
    pub(crate) fn parse(source: &str) -> Result<Self> {
        let mut parser = SelectorParser::new(source);
        let list = parser.list()?;
        parser.skip_ws();
        if parser.peek().is_some() {
            return Err(parser.reject());
        }
        Ok(list)
    }

    /// The id of a selector that is exactly `#id`, which the id index answers.
    pub(crate) fn lone_id(&self) -> Option<&str> {
        let [only] = self.alternatives.as_slice() else {
            return None;
        };
        if !only.context.is_empty() || only.subject.tag.is_some() {
            return None;
        }
        match only.subject.filters.as_slice() {
            [Filter::Id(id)] => Some(id),
            _ => None,
        }
    }
}

struct SelectorParser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn reject(&self) -> Error {
        Error::UnsupportedSelector(self.source.to_string())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.reject())
        }
    }

    /// Returns whether any whitespace was skipped.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn list(&mut self) -> Result<SelectorList> {
        let mut alternatives = vec![self.complex()?];
        loop {
            self.skip_ws();
            if !self.eat(',') {
                break;
            }
            alternatives.push(self.complex()?);
        }
        Ok(SelectorList { alternatives })
    }

    fn complex(&mut self) -> Result<ComplexSelector> {
        self.skip_ws();
        let mut compounds = vec![self.compound()?];
        let mut relations = Vec::new();
        loop {
            let spaced = self.skip_ws();
            let relation = if self.eat('>') {
                self.skip_ws();
                Relation::Parent
            } else if spaced && self.at_compound_start() {
                Relation::Ancestor
            } else {
                break;
            };
            relations.push(relation);
            compounds.push(self.compound()?);
        }

        let subject = compounds.pop().ok_or_else(|| self.reject())?;
        let context = relations
            .into_iter()
            .rev()
            .zip(compounds.into_iter().rev())
            .collect();
        Ok(ComplexSelector { subject, context })
    }

    fn at_compound_start(&self) -> bool {
        self.peek()
            .is_some_and(|ch| matches!(ch, '*' | '#' | '.' | '[' | ':') || is_ident_char(ch))
    }

    fn compound(&mut self) -> Result<Compound> {
        let start = self.pos;
        let mut compound = Compound::default();
        if !self.eat('*') {
            compound.tag = self.ident().map(|tag| tag.to_ascii_lowercase());
        }
        loop {
            let filter = match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    Filter::Id(self.required_ident()?)
                }
                Some('.') => {
                    self.pos += 1;
                    Filter::Class(self.required_ident()?)
                }
                Some('[') => {
                    self.pos += 1;
                    self.attribute()?
                }
                Some(':') => {
                    self.pos += 1;
                    self.negation()?
                }
                _ => break,
            };
            compound.filters.push(filter);
        }
        if self.pos == start {
            return Err(self.reject());
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<Filter> {
        self.skip_ws();
        let name = self.required_ident()?.to_ascii_lowercase();
        self.skip_ws();
        if self.eat(']') {
            return Ok(Filter::HasAttr(name));
        }
        self.expect('=')?;
        self.skip_ws();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.quoted(quote)?
            }
            _ => self.required_ident()?,
        };
        self.skip_ws();
        self.expect(']')?;
        Ok(Filter::AttrEquals(name, value))
    }

    fn negation(&mut self) -> Result<Filter> {
        let name = self.required_ident()?;
        if !name.eq_ignore_ascii_case("not") {
            return Err(self.reject());
        }
        self.expect('(')?;
        let inner = self.list()?;
        self.skip_ws();
        self.expect(')')?;
        Ok(Filter::Not(inner))
    }

    fn ident(&mut self) -> Option<String> {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                out.extend(self.chars.get(self.pos + 1));
                self.pos = (self.pos + 2).min(self.chars.len());
            } else if is_ident_char(ch) {
                out.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }
        (!out.is_empty()).then_some(out)
    }

    fn required_ident(&mut self) -> Result<String> {
        self.ident().ok_or_else(|| self.reject())
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(self.reject()),
                Some(ch) if ch == quote => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some('\\') => {
                    out.extend(self.chars.get(self.pos + 1));
                    self.pos = (self.pos + 2).min(self.chars.len());
                }
                Some(ch) => {
                    out.push(ch);
                    self.pos += 1;
                }
            }
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii()
}

/// Quotes a value for use inside `[attr="..."]`.
pub(crate) fn quote_attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
