use logos::{Lexer, Logos};
use std::fmt;

/// Markup tokens. Start tags are lexed whole and split into a name and
/// attributes by [`AttrToken`]; raw text elements are read by the tree
/// builder straight from the lexer remainder.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    /// Comment body, without the delimiters.
    #[token("<!--", lex_comment)]
    Comment(&'src str),

    #[regex(r"<![dD][oO][cC][tT][yY][pP][eE][^>]*>")]
    Doctype,

    /// Everything between `<` and the closing `>`.
    #[regex(r"<[a-zA-Z]", lex_start_tag)]
    StartTag(&'src str),

    /// Tag name of an end tag as written.
    #[regex(r"</[a-zA-Z][^>]*>", |lex| end_tag_name(lex.slice()))]
    EndTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    /// A `<` that does not open any construct.
    #[token("<")]
    Lt,
}

fn lex_comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> &'src str {
    let rest = lex.remainder();
    match rest.find("-->") {
        Some(end) => {
            lex.bump(end + 3);
            &rest[..end]
        }
        None => {
            lex.bump(rest.len());
            rest
        }
    }
}

/// Extend a `<x` match to the closing `>`, skipping over quoted values.
fn lex_start_tag<'src>(lex: &mut Lexer<'src, Token<'src>>) -> &'src str {
    let rest = lex.remainder();
    let mut quote = None;
    let mut end = rest.len();
    let mut consumed = rest.len();

    for (index, c) in rest.char_indices() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => {
                end = index;
                consumed = index + 1;
                break;
            }
            _ => {}
        }
    }

    lex.bump(consumed);
    // The match so far is `<` plus the first letter of the name.
    let start = lex.span().start + 1;
    &lex.source()[start..start + 1 + end]
}

fn end_tag_name(slice: &str) -> &str {
    let inner = &slice[2..slice.len() - 1];
    let end = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(inner.len());
    &inner[..end]
}

/// Tokens inside a start tag.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\x0C]+")]
pub enum AttrToken<'src> {
    #[regex(r#"[^ \t\n\r\x0C"'>/=]+"#, |lex| lex.slice())]
    Name(&'src str),

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| unquote(lex.slice()))]
    #[regex(r"'[^']*'", |lex| unquote(lex.slice()))]
    Quoted(&'src str),

    #[token("/")]
    Slash,

    /// Quote left open until the end of the tag.
    #[regex(r#"["'][^"']*"#, |lex| &lex.slice()[1..])]
    Unterminated(&'src str),
}

fn unquote(slice: &str) -> &str {
    &slice[1..slice.len() - 1]
}

/// A start tag split into its parts. Names are lowercased; values are raw
/// (entities not yet decoded).
#[derive(Debug, Clone, PartialEq)]
pub struct StartTag<'src> {
    pub name: String,
    pub attributes: Vec<(String, &'src str)>,
    pub self_closing: bool,
}

/// Split the inside of a start tag into name, attributes and the trailing
/// `/` marker. Duplicate attributes keep the first occurrence.
pub fn parse_start_tag(source: &str) -> StartTag<'_> {
    let mut lexer = AttrToken::lexer(source);
    let mut tag = StartTag {
        name: String::new(),
        attributes: Vec::new(),
        self_closing: false,
    };
    let mut pending: Option<String> = None;

    while let Some(token) = lexer.next() {
        let Ok(token) = token else {
            continue;
        };

        match token {
            AttrToken::Name(name) if tag.name.is_empty() => {
                tag.name = name.to_ascii_lowercase();
            }
            AttrToken::Name(name) => {
                flush_attribute(&mut tag, pending.take(), "");
                pending = Some(name.to_ascii_lowercase());
                tag.self_closing = false;
            }
            AttrToken::Equals => {
                let Some(name) = pending.take() else {
                    continue;
                };
                let value = read_attribute_value(&mut lexer);
                flush_attribute(&mut tag, Some(name), value);
            }
            AttrToken::Slash => {
                flush_attribute(&mut tag, pending.take(), "");
                tag.self_closing = true;
            }
            AttrToken::Quoted(_) | AttrToken::Unterminated(_) => {
                tag.self_closing = false;
            }
        }
    }

    flush_attribute(&mut tag, pending, "");
    tag
}

/// Read the value after `=`. Unquoted values run to the next whitespace and
/// may contain `/` and `=`, so they are taken from the remainder directly.
fn read_attribute_value<'src>(lexer: &mut Lexer<'src, AttrToken<'src>>) -> &'src str {
    let rest = lexer.remainder();
    let trimmed = rest.trim_start_matches([' ', '\t', '\n', '\r', '\x0C']);
    let skipped = rest.len() - trimmed.len();

    match trimmed.chars().next() {
        Some('"') | Some('\'') => match lexer.next() {
            Some(Ok(AttrToken::Quoted(value))) | Some(Ok(AttrToken::Unterminated(value))) => value,
            _ => "",
        },
        Some(_) => {
            let end = trimmed
                .find([' ', '\t', '\n', '\r', '\x0C'])
                .unwrap_or(trimmed.len());
            lexer.bump(skipped + end);
            &trimmed[..end]
        }
        None => "",
    }
}

fn flush_attribute<'src>(tag: &mut StartTag<'src>, name: Option<String>, value: &'src str) {
    let Some(name) = name else {
        return;
    };
    if tag.attributes.iter().any(|(existing, _)| *existing == name) {
        return;
    }
    tag.attributes.push((name, value));
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Comment(body) => write!(f, "<!--{}-->", body),
            Token::Doctype => write!(f, "doctype"),
            Token::StartTag(tag) => write!(f, "<{}>", tag),
            Token::EndTag(name) => write!(f, "</{}>", name),
            Token::Text(text) => write!(f, "text {:?}", text),
            Token::Lt => write!(f, "<"),
        }
    }
}
