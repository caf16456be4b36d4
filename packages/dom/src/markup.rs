//! Stack-based tree construction over the markup tokens.
//!
//! This is not a full HTML5 tree builder. It handles what rich text markup
//! contains: nested inline elements, void elements, comments, raw text
//! `script`/`style` bodies and character references. Mismatched end tags are
//! recovered by closing up to the nearest open element of the same name, or
//! ignored when none is open.

use crate::entities::decode_entities;
use crate::host::HostTree;
use crate::memory::{is_void_element, MemoryDom, NodeId, RAW_TEXT_ELEMENTS};
use crate::tokenizer::{parse_start_tag, Token};
use logos::{Lexer, Logos};
use tracing::trace;

/// Parse `html` and append the resulting nodes to `parent` without logging.
pub(crate) fn parse_into(dom: &mut MemoryDom, parent: NodeId, html: &str) {
    let mut stack: Vec<NodeId> = vec![parent];
    let mut lexer = Token::lexer(html);

    while let Some(result) = lexer.next() {
        let Ok(token) = result else {
            continue;
        };
        let top = stack.last().copied().unwrap_or(parent);

        match token {
            Token::Text(text) => dom.attach_text(top, &decode_entities(text)),
            Token::Lt => dom.attach_text(top, "<"),
            Token::Comment(body) => {
                let comment = dom.create_comment(body);
                dom.attach(top, comment);
            }
            Token::Doctype => {}
            Token::StartTag(source) => {
                let tag = parse_start_tag(source);
                if tag.name.is_empty() {
                    continue;
                }

                let element = dom.create_element(&tag.name);
                for (name, value) in &tag.attributes {
                    dom.set_attribute(element, name, &decode_entities(value));
                }
                dom.attach(top, element);

                if is_void_element(&tag.name) {
                    continue;
                }
                if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
                    read_raw_text(dom, element, &tag.name, &mut lexer);
                    continue;
                }
                stack.push(element);
            }
            Token::EndTag(name) => {
                let name = name.to_ascii_lowercase();
                // The container itself (index 0) is never closed.
                let open = stack
                    .iter()
                    .rposition(|node| *node != parent && dom.tag_name(*node) == Some(name.as_str()));
                match open {
                    Some(index) => stack.truncate(index),
                    None => trace!(tag = %name, "Ignoring end tag without an open element"),
                }
            }
        }
    }
}

/// Take everything up to `</name` as the single text child of `element` and
/// skip past the end tag.
fn read_raw_text<'src>(
    dom: &mut MemoryDom,
    element: NodeId,
    name: &str,
    lexer: &mut Lexer<'src, Token<'src>>,
) {
    let rest = lexer.remainder();
    let needle = format!("</{}", name);
    let (content, consumed) = match rest.to_ascii_lowercase().find(&needle) {
        Some(end) => {
            let close = rest[end..]
                .find('>')
                .map(|offset| end + offset + 1)
                .unwrap_or(rest.len());
            (&rest[..end], close)
        }
        None => (rest, rest.len()),
    };

    if !content.is_empty() {
        let text = dom.create_text(content);
        dom.attach(element, text);
    }
    lexer.bump(consumed);
}
