//! Delimiter detection and quote-aware line splitting.

/// `;` unless the header has strictly more `,` than `;`.
pub fn detect_delimiter(header_line: &str) -> char {
    let semis = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if commas > semis {
        ','
    } else {
        ';'
    }
}

/// Split one line into fields.
///
/// Double quotes open/close a quoted field; `""` inside a quoted field is a
/// literal quote. Delimiters inside quotes are kept. Fields are not trimmed.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    cur.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cur.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut cur));
        } else {
            cur.push(c);
        }
    }
    fields.push(cur);
    fields
}
