//! Text cleaner
//!
//! Turns HTML fragments from the project page into markdown-ish lines:
//!
//! 1. [`html_to_markdown`] renders the small tag vocabulary task bodies use
//!    (paragraphs, headings, lists, emphasis, inline code, links, `<pre>`)
//! 2. [`normalize_markdown`] replaces tabs with two spaces, collapses blank
//!    line runs and glues code fences onto their neighbouring lines
//! 3. the result is split on `\n`
//!
//! [`clean_lines`] runs only steps 2 and 3, and is a fixed point on its own
//! output.

use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("valid regex"));

static HREF_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).expect("valid regex")
});

// `<pre>` blocks are fenced as console sessions
const OPEN_FENCE: &str = "```console";
const FENCE: &str = "```";

/// Clean one HTML fragment into lines
#[must_use]
pub fn clean(fragment: &str) -> Vec<String> {
    split_lines(&normalize_markdown(&html_to_markdown(fragment)))
}

/// Clean every fragment and concatenate the lines, in order
#[must_use]
pub fn clean_all<S: AsRef<str>>(fragments: &[S]) -> Vec<String> {
    fragments.iter().flat_map(|f| clean(f.as_ref())).collect()
}

/// Re-clean lines that are already markdown
#[must_use]
pub fn clean_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let joined = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("\n");
    split_lines(&normalize_markdown(&joined))
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(ToString::to_string).collect()
}

/// Line-level markdown normalization
///
/// Repeats until nothing changes: gluing a fence can expose a new blank run
/// or a new fence boundary.
#[must_use]
pub fn normalize_markdown(text: &str) -> String {
    let mut current = text.replace('\t', "  ");
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn normalize_pass(text: &str) -> String {
    let collapsed = BLANK_RUNS.replace_all(text, "\n");
    let opened = collapsed.replace(&format!("\n{OPEN_FENCE}"), OPEN_FENCE);
    opened.replace(&format!("{FENCE}\n"), FENCE)
}

/// Decode HTML character references
///
/// Named references use the full HTML5 table. The legacy names (`&amp`,
/// `&copy`, ...) and numeric references are also accepted without the
/// closing `;`, and numeric references in the C1 range map through
/// windows-1252 the way browsers do. Anything unrecognised is left as
/// written.
#[must_use]
pub fn unescape_html(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp + 1..];

        let consumed = if rest.starts_with('#') {
            decode_numeric(rest, &mut out)
        } else {
            decode_named(rest, &mut out)
        };
        match consumed {
            Some(len) => rest = &rest[len..],
            None => out.push('&'),
        }
    }
    out.push_str(rest);
    out
}

/// Numeric reference after the `&`; returns the bytes consumed
fn decode_numeric(text: &str, out: &mut String) -> Option<usize> {
    let body = &text[1..];
    let (digits, radix, prefix) = match body.strip_prefix(['x', 'X']) {
        Some(hex) => (hex, 16, 2),
        None => (body, 10, 1),
    };
    let len = digits
        .bytes()
        .take_while(|b| if radix == 16 { b.is_ascii_hexdigit() } else { b.is_ascii_digit() })
        .count();
    if len == 0 {
        return None;
    }

    let code = digits[..len].chars().fold(0u32, |acc, c| {
        acc.saturating_mul(radix).saturating_add(c.to_digit(radix).unwrap_or(0))
    });
    if let Some(ch) = numeric_char(code) {
        out.push(ch);
    }

    let semi = usize::from(digits[len..].starts_with(';'));
    Some(prefix + len + semi)
}

/// Character for a numeric reference; `None` drops a noncharacter or control
fn numeric_char(code: u32) -> Option<char> {
    if let Some(ch) = windows_1252(code) {
        return Some(ch);
    }
    if (0xD800..=0xDFFF).contains(&code) || code > 0x10_FFFF {
        return Some(char::REPLACEMENT_CHARACTER);
    }
    let dropped = matches!(code, 0x1..=0x8 | 0xB | 0xE..=0x1F | 0x7F..=0x9F | 0xFDD0..=0xFDEF)
        || code & 0xFFFE == 0xFFFE;
    if dropped {
        return None;
    }
    char::from_u32(code)
}

fn windows_1252(code: u32) -> Option<char> {
    let ch = match code {
        0x00 => char::REPLACEMENT_CHARACTER,
        0x0D => '\r',
        0x80 => '€',
        0x82 => '‚',
        0x83 => 'ƒ',
        0x84 => '„',
        0x85 => '…',
        0x86 => '†',
        0x87 => '‡',
        0x88 => 'ˆ',
        0x89 => '‰',
        0x8A => 'Š',
        0x8B => '‹',
        0x8C => 'Œ',
        0x8E => 'Ž',
        0x91 => '‘',
        0x92 => '’',
        0x93 => '“',
        0x94 => '”',
        0x95 => '•',
        0x96 => '–',
        0x97 => '—',
        0x98 => '˜',
        0x99 => '™',
        0x9A => 'š',
        0x9B => '›',
        0x9C => 'œ',
        0x9E => 'ž',
        0x9F => 'Ÿ',
        0x81 | 0x8D | 0x8F | 0x90 | 0x9D => char::from_u32(code)?,
        _ => return None,
    };
    Some(ch)
}

/// Named reference after the `&`; returns the bytes consumed
fn decode_named(text: &str, out: &mut String) -> Option<usize> {
    let name_len: usize = text
        .chars()
        .take_while(|&c| !matches!(c, '\t' | '\n' | '\x0c' | ' ' | '<' | '&' | '#' | ';'))
        .take(32)
        .map(char::len_utf8)
        .sum();
    if name_len == 0 {
        return None;
    }
    let name = &text[..name_len];
    let terminated = text[name_len..].starts_with(';');

    if terminated {
        if let Some(decoded) = html5_entity(name) {
            out.push_str(&decoded);
            return Some(name_len + 1);
        }
    } else if LEGACY_ENTITIES.contains(&name) {
        out.push_str(&html5_entity(name)?);
        return Some(name_len);
    }

    // `&notit;` decodes its longest legacy prefix and keeps the tail
    let prefix = name
        .char_indices()
        .map(|(i, _)| i)
        .filter(|&i| i >= 2)
        .rev()
        .find(|&i| LEGACY_ENTITIES.contains(&&name[..i]))?;
    out.push_str(&html5_entity(&name[..prefix])?);
    Some(prefix)
}

fn html5_entity(name: &str) -> Option<String> {
    let reference = format!("&{name};");
    let decoded = html_escape::decode_html_entities(&reference);
    (decoded != reference).then(|| decoded.into_owned())
}

/// Names HTML5 still recognises without a terminating `;`
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Open { name: String, attrs: &'a str },
    Close(String),
}

/// Split markup into text runs and tags; comments and doctypes are dropped
fn tokenize(html: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let bytes = html.as_bytes();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        let rest = &html[i..];
        let next = bytes.get(i + 1).copied().unwrap_or(b' ');
        let is_markup = next.is_ascii_alphabetic() || next == b'/' || next == b'!';
        if !is_markup {
            i += 1;
            continue;
        }

        if i > text_start {
            tokens.push(Token::Text(&html[text_start..i]));
        }

        let end = if rest.starts_with("<!--") {
            rest.find("-->").map_or(html.len(), |e| i + e + 3)
        } else {
            tag_end(rest).map_or(html.len(), |e| i + e + 1)
        };

        if let Some(token) = parse_tag(&html[i..end]) {
            tokens.push(token);
        }
        i = end;
        text_start = end;
    }

    if text_start < html.len() {
        tokens.push(Token::Text(&html[text_start..]));
    }
    tokens
}

/// Offset of the `>` closing a tag, skipping quoted attribute values
fn tag_end(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in tag.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some(idx),
            _ => {}
        }
    }
    None
}

fn parse_tag(raw: &str) -> Option<Token<'_>> {
    let inner = raw.strip_prefix('<')?;
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    if inner.starts_with('!') || inner.starts_with('?') {
        return None;
    }

    if let Some(closing) = inner.strip_prefix('/') {
        let name = closing.trim().to_ascii_lowercase();
        return Some(Token::Close(name));
    }

    let name_len = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = inner[..name_len].to_ascii_lowercase();
    let attrs = inner[name_len..].trim_end_matches('/');
    Some(Token::Open { name, attrs })
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div" | "section" | "article" | "blockquote" | "table" | "tr" | "header" | "footer"
    )
}

fn heading_level(name: &str) -> Option<usize> {
    match name.as_bytes() {
        [b'h', d @ b'1'..=b'6'] => Some(usize::from(d - b'0')),
        _ => None,
    }
}

struct ListFrame {
    ordered: bool,
    counter: usize,
}

struct LinkFrame {
    start: usize,
    href: Option<String>,
}

#[derive(Default)]
struct Renderer {
    out: String,
    pre_depth: usize,
    skip_depth: usize,
    lists: Vec<ListFrame>,
    links: Vec<LinkFrame>,
}

impl Renderer {
    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn trim_trailing_spaces(&mut self) {
        let kept = self.out.trim_end_matches(' ').len();
        self.out.truncate(kept);
    }

    fn newline(&mut self) {
        self.trim_trailing_spaces();
        self.out.push('\n');
    }

    fn ensure_line_start(&mut self) {
        if !self.at_line_start() {
            self.newline();
        }
    }

    fn blank_line(&mut self) {
        self.trim_trailing_spaces();
        self.out.push_str("\n\n");
    }

    fn text(&mut self, raw: &str) {
        if self.skip_depth > 0 {
            return;
        }

        let decoded = unescape_html(raw);
        if self.pre_depth > 0 {
            self.out.push_str(&decoded);
            return;
        }

        for ch in decoded.chars() {
            if ch.is_whitespace() {
                if !(self.at_line_start() || self.out.ends_with(' ')) {
                    self.out.push(' ');
                }
            } else {
                self.out.push(ch);
            }
        }
    }

    fn open(&mut self, name: &str, attrs: &str) {
        if matches!(name, "script" | "style") {
            self.skip_depth += 1;
            return;
        }
        if self.pre_depth > 0 {
            if name == "pre" {
                self.pre_depth += 1;
            }
            return;
        }

        match name {
            "br" => self.newline(),
            "hr" => {
                self.blank_line();
                self.out.push_str("---");
                self.blank_line();
            }
            "pre" => {
                self.newline();
                self.out.push_str(OPEN_FENCE);
                self.out.push('\n');
                self.pre_depth += 1;
            }
            "strong" | "b" => self.out.push_str("**"),
            "em" | "i" => self.out.push('*'),
            "code" => self.out.push('`'),
            "a" => self.links.push(LinkFrame {
                start: self.out.len(),
                href: href(attrs),
            }),
            "ul" | "ol" => {
                self.ensure_line_start();
                self.lists.push(ListFrame {
                    ordered: name == "ol",
                    counter: 0,
                });
            }
            "li" => self.list_item(),
            _ => {
                if let Some(level) = heading_level(name) {
                    self.blank_line();
                    self.out.push_str(&"#".repeat(level));
                    self.out.push(' ');
                } else if is_block(name) {
                    self.blank_line();
                }
            }
        }
    }

    fn list_item(&mut self) {
        self.ensure_line_start();
        let depth = self.lists.len().saturating_sub(1);
        self.out.push_str(&"  ".repeat(depth));
        match self.lists.last_mut() {
            Some(frame) if frame.ordered => {
                frame.counter += 1;
                let marker = format!("{}. ", frame.counter);
                self.out.push_str(&marker);
            }
            _ => self.out.push_str("* "),
        }
    }

    fn close(&mut self, name: &str) {
        if matches!(name, "script" | "style") {
            self.skip_depth = self.skip_depth.saturating_sub(1);
            return;
        }
        if self.pre_depth > 0 {
            if name == "pre" {
                self.pre_depth -= 1;
                if self.pre_depth == 0 {
                    self.out.push('\n');
                    self.out.push_str(FENCE);
                    self.out.push('\n');
                }
            }
            return;
        }

        match name {
            "strong" | "b" => self.out.push_str("**"),
            "em" | "i" => self.out.push('*'),
            "code" => self.out.push('`'),
            "a" => self.close_link(),
            "ul" | "ol" => {
                self.lists.pop();
                self.ensure_line_start();
            }
            "li" => self.ensure_line_start(),
            _ => {
                if heading_level(name).is_some() || is_block(name) {
                    self.blank_line();
                }
            }
        }
    }

    fn close_link(&mut self) {
        let Some(frame) = self.links.pop() else {
            return;
        };
        let Some(href) = frame.href.filter(|h| !h.is_empty()) else {
            return;
        };

        let label = self.out[frame.start..].trim().to_string();
        if label.is_empty() || label == href {
            return;
        }
        self.out.truncate(frame.start);
        self.out.push_str(&format!("[{label}]({href})"));
    }

    fn finish(mut self) -> String {
        self.trim_trailing_spaces();
        self.out
    }
}

fn href(attrs: &str) -> Option<String> {
    let caps = HREF_ATTR.captures(attrs)?;
    let value = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    Some(unescape_html(value.as_str()))
}

/// Render an HTML fragment as markdown
///
/// `<pre>` content is emitted verbatim inside a `console` fenced block;
/// everywhere else whitespace runs collapse to one space.
#[must_use]
pub fn html_to_markdown(html: &str) -> String {
    let mut renderer = Renderer::default();
    for token in tokenize(html) {
        match token {
            Token::Text(text) => renderer.text(text),
            Token::Open { name, attrs } => renderer.open(&name, attrs),
            Token::Close(name) => renderer.close(&name),
        }
    }
    renderer.finish()
}

/// Strip tags and decode entities, keeping line structure
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    for token in tokenize(html) {
        if let Token::Text(text) = token {
            out.push_str(&unescape_html(text));
        }
    }
    out
}
