use super::*;

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

// Bodies are kept verbatim up to the matching end tag.
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "title"];

pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut tokens = Tokenizer::new(html);
    let mut tree = TreeBuilder::new();

    while let Some(token) = tokens.next_token()? {
        match token {
            Token::Text(text) => tree.append_text(text),
            Token::EndTag(name) => tree.close(&name),
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                let raw_text = !self_closing && RAW_TEXT_TAGS.contains(&name.as_str());
                let node = tree.open(&name, attrs, self_closing || raw_text);
                if raw_text {
                    let body = tokens.raw_text(&name)?;
                    let body = if name == "textarea" {
                        decode_character_references(body.strip_prefix('\n').unwrap_or(body))
                    } else {
                        body.to_string()
                    };
                    if !body.is_empty() {
                        tree.dom.create_text(node, body);
                    }
                }
            }
        }
    }

    let mut dom = tree.dom;
    dom.initialize_form_control_values()?;
    Ok(dom)
}

#[derive(Debug)]
enum Token {
    StartTag {
        name: String,
        attrs: HashMap<String, String>,
        self_closing: bool,
    },
    EndTag(String),
    Text(String),
}

struct TreeBuilder {
    dom: Dom,
    // Open elements below the document root, innermost last.
    open: Vec<NodeId>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            dom: Dom::new(),
            open: Vec::new(),
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(self.dom.root)
    }

    fn append_text(&mut self, text: String) {
        if !text.is_empty() {
            let parent = self.current();
            self.dom.create_text(parent, text);
        }
    }

    /// Creates the element under the current node; `leaf` elements take no children.
    fn open(&mut self, name: &str, attrs: HashMap<String, String>, leaf: bool) -> NodeId {
        if matches!(name, "option" | "optgroup") {
            self.close_open_option();
        }
        let parent = self.current();
        let node = self.dom.create_element(parent, name.to_string(), attrs);
        if !leaf && !VOID_TAGS.contains(&name) {
            self.open.push(node);
        }
        node
    }

    /// Closes the innermost open element named `name` and everything inside it.
    /// End tags with no open counterpart are ignored.
    fn close(&mut self, name: &str) {
        if let Some(index) = self
            .open
            .iter()
            .rposition(|node| self.dom.tag_name(*node) == Some(name))
        {
            self.open.truncate(index);
        }
    }

    // An `<option>` ends at the next `<option>` or `<optgroup>` of the same list.
    fn close_open_option(&mut self) {
        let boundary = self.open.iter().rposition(|node| {
            matches!(
                self.dom.tag_name(*node),
                Some("option" | "optgroup" | "select" | "datalist")
            )
        });
        if let Some(index) = boundary {
            if self.dom.tag_name(self.open[index]) == Some("option") {
                self.open.truncate(index);
            }
        }
    }
}

struct Tokenizer<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(html: &'a str) -> Self {
        Self { html, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        self.html.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|ch: char| !keep(ch)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_ws(&mut self) {
        self.take_while(|ch| ch.is_ascii_whitespace());
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Ok(None);
            }
            if let Some(body) = rest.strip_prefix("<!--") {
                let end = body
                    .find("-->")
                    .ok_or_else(|| Error::HtmlParse("unclosed HTML comment".into()))?;
                self.pos += "<!--".len() + end + "-->".len();
                continue;
            }
            if rest.starts_with("</") {
                return self.end_tag().map(|name| Some(Token::EndTag(name)));
            }
            if rest.starts_with("<!") {
                self.skip_declaration()?;
                continue;
            }
            if rest.starts_with('<') {
                return self.start_tag().map(Some);
            }
            let text = self.take_while(|ch| ch != '<');
            return Ok(Some(Token::Text(decode_character_references(text))));
        }
    }

    fn start_tag(&mut self) -> Result<Token> {
        let at = self.pos;
        self.pos += 1;
        let name = self.take_while(is_tag_char).to_ascii_lowercase();
        if name.is_empty() {
            return Err(Error::HtmlParse(format!("empty tag name at byte {at}")));
        }

        let mut attrs = HashMap::new();
        loop {
            self.skip_ws();
            let rest = self.rest();
            let self_closing = if rest.starts_with('>') {
                Some(false)
            } else if rest.starts_with("/>") {
                Some(true)
            } else {
                None
            };
            if let Some(self_closing) = self_closing {
                self.pos += if self_closing { 2 } else { 1 };
                return Ok(Token::StartTag {
                    name,
                    attrs,
                    self_closing,
                });
            }
            let Some(first) = self.peek() else {
                return Err(Error::HtmlParse(format!("unclosed <{name}> start tag")));
            };

            let attr_name = self.take_while(is_attr_name_char).to_ascii_lowercase();
            if attr_name.is_empty() {
                // Junk between attributes, such as a lone `/`.
                self.pos += first.len_utf8();
                continue;
            }
            self.skip_ws();
            let value = if self.peek() == Some('=') {
                self.pos += 1;
                self.skip_ws();
                self.attr_value()?
            } else {
                String::new()
            };
            // First occurrence wins, as in the HTML tokenizer.
            attrs.entry(attr_name).or_insert(value);
        }
    }

    fn attr_value(&mut self) -> Result<String> {
        match self.peek() {
            None => Err(Error::HtmlParse("missing attribute value".into())),
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let rest = self.rest();
                let end = rest
                    .find(quote)
                    .ok_or_else(|| Error::HtmlParse("unclosed quoted attribute value".into()))?;
                self.pos += end + 1;
                Ok(decode_character_references(&rest[..end]))
            }
            Some(_) => {
                let rest = self.rest();
                let end = rest
                    .char_indices()
                    .find(|(idx, ch)| {
                        ch.is_ascii_whitespace() || *ch == '>' || rest[*idx..].starts_with("/>")
                    })
                    .map_or(rest.len(), |(idx, _)| idx);
                self.pos += end;
                Ok(decode_character_references(&rest[..end]))
            }
        }
    }

    fn end_tag(&mut self) -> Result<String> {
        self.pos += "</".len();
        self.skip_ws();
        let name = self.take_while(is_tag_char).to_ascii_lowercase();
        let close = self
            .rest()
            .find('>')
            .ok_or_else(|| Error::HtmlParse(format!("unclosed </{name}> end tag")))?;
        self.pos += close + 1;
        Ok(name)
    }

    /// Skips `<!DOCTYPE ...>` and similar, honoring quoted sections.
    fn skip_declaration(&mut self) -> Result<()> {
        let body = self.rest().get("<!".len()..).unwrap_or_default();
        let mut quote = None;
        for (idx, ch) in body.char_indices() {
            match quote {
                Some(open) if ch == open => quote = None,
                Some(_) => {}
                None if ch == '"' || ch == '\'' => quote = Some(ch),
                None if ch == '>' => {
                    self.pos += "<!".len() + idx + 1;
                    return Ok(());
                }
                None => {}
            }
        }
        Err(Error::HtmlParse("unclosed declaration tag".into()))
    }

    /// Returns the body of a raw-text element and consumes its end tag,
    /// which is matched case-insensitively.
    fn raw_text(&mut self, name: &str) -> Result<&'a str> {
        let rest = self.rest();
        let mut from = 0;
        while let Some(offset) = rest[from..].find("</") {
            let open = from + offset;
            let after = rest[open + 2..].trim_start_matches(|ch: char| ch.is_ascii_whitespace());
            let closes = after
                .get(..name.len())
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
                && !after[name.len()..].starts_with(|ch: char| ch.is_ascii_alphanumeric());
            if closes {
                self.pos += open;
                self.end_tag()?;
                return Ok(&rest[..open]);
            }
            from = open + 2;
        }
        Err(Error::HtmlParse(format!("unclosed <{name}>")))
    }
}

fn is_tag_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn is_attr_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':' | '.')
}

fn decode_character_references(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match character_reference(rest) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes the `&...;` reference that `src` starts with, returning the
/// character and the number of bytes it spans.
fn character_reference(src: &str) -> Option<(char, usize)> {
    let semi = src.find(';')?;
    let body = &src[1..semi];
    if body.is_empty() || !body.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '#') {
        return None;
    }
    let ch = match body.strip_prefix('#') {
        Some(numeric) => {
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse().ok()?,
            };
            char::from_u32(code)?
        }
        None => match body {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{00A0}',
            "copy" => '©',
            "hellip" => '…',
            "middot" => '·',
            _ => return None,
        },
    };
    Some((ch, semi + 1))
}
