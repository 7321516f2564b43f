use std::borrow::Cow;

/// Splits a comma-separated line, keeping commas inside single or double
/// quotes. Tokens are trimmed; quotes are left in place.
pub fn split_csv_preserving_quotes(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', Some(_)) => {
                current.push(c);
                escaped = true;
            }
            ('\'' | '"', None) => {
                quote = Some(c);
                current.push(c);
            }
            (q, Some(open)) if q == open => {
                quote = None;
                current.push(c);
            }
            (',', None) => {
                tokens.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    tokens.push(current.trim().to_string());
    tokens
}

/// Removes one pair of matching surrounding quotes, if present.
pub fn strip_surrounding_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'\'' || first == b'"') && first == last {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Removes surrounding quotes and resolves backslash escapes inside them.
/// Unquoted input is returned unchanged.
pub fn unquote(s: &str) -> Cow<'_, str> {
    let inner = strip_surrounding_quotes(s);
    if inner.len() == s.len() || !inner.contains('\\') {
        return Cow::Borrowed(inner);
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.extend(chars.next());
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Index of the quote closing the quoted token that opens `s`, honouring
/// backslash escapes.
pub fn closing_quote_index(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    let (_, open) = chars.next().filter(|(_, c)| *c == '\'' || *c == '"')?;
    let mut escaped = false;
    for (i, c) in chars {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == open => return Some(i),
            _ => {}
        }
    }
    None
}

/// Wraps a token in single quotes when it would not survive an ARFF line as
/// is: empty, `?`, or holding whitespace, separators, quotes, braces or `%`.
pub fn quote_if_needed(token: &str) -> Cow<'_, str> {
    let needs_quotes = token.is_empty()
        || token == "?"
        || token
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '\'' | '"' | '{' | '}' | '%' | '\\'));
    if !needs_quotes {
        return Cow::Borrowed(token);
    }
    let mut out = String::with_capacity(token.len() + 2);
    out.push('\'');
    for c in token.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    Cow::Owned(out)
}
