use std::borrow::Cow;

const NAMED: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
];

/// Decode character references in text or an attribute value.
///
/// Numeric references and a small set of named ones are decoded. Anything
/// else, including references without a closing `;`, is kept as written.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut decoded = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];

        match decode_reference(&rest[1..]) {
            Some((c, consumed)) => {
                decoded.push(c);
                rest = &rest[1 + consumed..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }

    decoded.push_str(rest);
    Cow::Owned(decoded)
}

/// Decode the reference after an `&`. Returns the character and the number
/// of bytes consumed, `;` included.
fn decode_reference(after_amp: &str) -> Option<(char, usize)> {
    let semicolon = after_amp.find(';')?;
    let body = &after_amp[..semicolon];

    let c = if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        char::from_u32(code).filter(|c| *c != '\0').unwrap_or('\u{FFFD}')
    } else {
        NAMED
            .iter()
            .find(|(name, _)| *name == body)
            .map(|(_, c)| *c)?
    };

    Some((c, semicolon + 1))
}
