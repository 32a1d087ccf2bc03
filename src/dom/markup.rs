use thiserror::Error;

use super::{Dom, NodeId, Tag};

/// Errors from [`parse`]. The markup dialect is deliberately small: known
/// tags, double-quoted attributes, the named entities below, and implicit
/// closing of void tags.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    #[error("unknown tag <{0}>")]
    UnknownTag(String),
    #[error("mismatched closing tag </{found}>, expected </{expected}>")]
    MismatchedTag { expected: String, found: String },
    #[error("closing tag </{0}> without an open element")]
    UnmatchedClose(String),
    #[error("unexpected end of input inside <{0}>")]
    UnexpectedEof(String),
    #[error("unknown entity &{0};")]
    UnknownEntity(String),
    #[error("malformed tag at byte {0}")]
    MalformedTag(usize),
}

/// Build a [`Dom`] from markup. The parsed content hangs under the implicit
/// `body` root, so `parse("<p>hi</p>")` yields body > p > "hi".
pub fn parse(input: &str) -> Result<Dom, MarkupError> {
    let mut dom = Dom::new();
    let root = dom.root();
    let mut parser = Parser {
        input: input.as_bytes(),
        pos: 0,
    };
    parser.children(&mut dom, root, None)?;
    Ok(dom)
}

/// Serialize the content under the root, without the implicit `body`
/// wrapper, so that `to_markup(&parse(s)?)` round-trips `s`.
pub fn to_markup(dom: &Dom) -> String {
    let mut out = String::new();
    for child in dom.children(dom.root()) {
        write_node(dom, *child, &mut out);
    }
    out
}

/// Serialize a single subtree.
pub fn node_markup(dom: &Dom, node: NodeId) -> String {
    let mut out = String::new();
    write_node(dom, node, &mut out);
    out
}

fn write_node(dom: &Dom, node: NodeId, out: &mut String) {
    if let Some(text) = dom.text(node) {
        for ch in text.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                _ => out.push(ch),
            }
        }
        return;
    }
    let Some(tag) = dom.tag(node) else {
        return;
    };
    out.push('<');
    out.push_str(tag.name());
    for (name, value) in dom.attrs(node) {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        for ch in value.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '"' => out.push_str("&quot;"),
                _ => out.push(ch),
            }
        }
        out.push('"');
    }
    if dom.is_hidden(node) {
        out.push_str(" hidden");
    }
    out.push('>');
    if dom.is_void(node) {
        return;
    }
    for child in dom.children(node) {
        write_node(dom, *child, out);
    }
    out.push_str("</");
    out.push_str(tag.name());
    out.push('>');
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'-') {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Parse child content into `parent` until the matching close tag (or
    /// end of input at the top level).
    fn children(
        &mut self,
        dom: &mut Dom,
        parent: NodeId,
        open: Option<Tag>,
    ) -> Result<(), MarkupError> {
        loop {
            match self.peek() {
                None => {
                    return match open {
                        Some(tag) => Err(MarkupError::UnexpectedEof(tag.name().to_string())),
                        None => Ok(()),
                    };
                }
                Some(b'<') => {
                    if self.input[self.pos..].starts_with(b"</") {
                        self.pos += 2;
                        let name = self.read_name();
                        if !self.eat(b'>') {
                            return Err(MarkupError::MalformedTag(self.pos));
                        }
                        return match open {
                            Some(tag) if tag.name() == name => Ok(()),
                            Some(tag) => Err(MarkupError::MismatchedTag {
                                expected: tag.name().to_string(),
                                found: name,
                            }),
                            None => Err(MarkupError::UnmatchedClose(name)),
                        };
                    }
                    self.element(dom, parent)?;
                }
                Some(_) => {
                    let text = self.text_run()?;
                    let node = dom.create_text(&text);
                    dom.append_child(parent, node);
                }
            }
        }
    }

    fn element(&mut self, dom: &mut Dom, parent: NodeId) -> Result<(), MarkupError> {
        let open_at = self.pos;
        self.pos += 1; // consume '<'
        let name = self.read_name();
        if name.is_empty() {
            return Err(MarkupError::MalformedTag(open_at));
        }
        let Some(tag) = Tag::from_name(&name) else {
            return Err(MarkupError::UnknownTag(name));
        };
        let node = dom.create_element(tag);
        dom.append_child(parent, node);

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    self.pos += 1;
                    if !self.eat(b'>') {
                        return Err(MarkupError::MalformedTag(self.pos));
                    }
                    // explicit self-close: no content to parse
                    return Ok(());
                }
                Some(_) => {
                    let attr = self.read_name();
                    if attr.is_empty() {
                        return Err(MarkupError::MalformedTag(self.pos));
                    }
                    let value = if self.eat(b'=') {
                        if !self.eat(b'"') {
                            return Err(MarkupError::MalformedTag(self.pos));
                        }
                        self.attr_value()?
                    } else {
                        String::new()
                    };
                    if attr == "hidden" {
                        dom.set_hidden(node, true);
                    } else {
                        dom.set_attr(node, &attr, &value);
                    }
                }
                None => {
                    return Err(MarkupError::UnexpectedEof(name));
                }
            }
        }

        if dom.is_void(node) {
            return Ok(());
        }
        self.children(dom, node, Some(tag))
    }

    /// Double-quoted attribute value body, decoding entities the same way
    /// as text content. Consumes the closing quote.
    fn attr_value(&mut self) -> Result<String, MarkupError> {
        let opened_at = self.pos;
        let mut out = String::new();
        loop {
            let start = self.pos;
            while matches!(self.peek(), Some(b) if b != b'"' && b != b'&') {
                self.pos += 1;
            }
            out.push_str(&String::from_utf8_lossy(&self.input[start..self.pos]));
            if self.eat(b'"') {
                return Ok(out);
            }
            if self.eat(b'&') {
                out.push(self.entity()?);
            } else {
                return Err(MarkupError::MalformedTag(opened_at));
            }
        }
    }

    fn text_run(&mut self) -> Result<String, MarkupError> {
        let mut out = String::new();
        while let Some(byte) = self.peek() {
            match byte {
                b'<' => break,
                b'&' => {
                    self.pos += 1;
                    out.push(self.entity()?);
                }
                _ => {
                    // consume one UTF-8 scalar worth of bytes
                    let rest = &self.input[self.pos..];
                    let text = std::str::from_utf8(rest).unwrap_or_default();
                    if let Some(ch) = text.chars().next() {
                        out.push(ch);
                        self.pos += ch.len_utf8();
                    } else {
                        self.pos += 1;
                    }
                }
            }
        }
        Ok(out)
    }

    /// A named entity body after its `&`, through the closing `;`.
    fn entity(&mut self) -> Result<char, MarkupError> {
        let name = self.read_name();
        if !self.eat(b';') {
            return Err(MarkupError::UnknownEntity(name));
        }
        match name.as_str() {
            "amp" => Ok('&'),
            "lt" => Ok('<'),
            "gt" => Ok('>'),
            "quot" => Ok('"'),
            "nbsp" => Ok('\u{a0}'),
            _ => Err(MarkupError::UnknownEntity(name)),
        }
    }
}

#[cfg(test)]
#[path = "markup_tests.rs"]
mod markup_tests;
