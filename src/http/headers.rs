//! Case-insensitive header collection with an incremental line parser.

use crate::http::error::ParseError;

const CRLF: &[u8] = b"\r\n";

/// HTTP header fields keyed by lower-cased name.
///
/// Setting a name that is already present appends the new value with a
/// comma (`"a,b"`). Iteration follows first-insertion order, so a response
/// serialises its headers in the order they were set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a header value by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Adds a header, merging with an existing value as `old,new`.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.as_ref();

        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(value);
            }
            None => self.entries.push((name, value.to_string())),
        }
    }

    /// Overwrites any existing value for `name`.
    pub fn replace(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Removes a header, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        let idx = self.entries.iter().position(|(k, _)| *k == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses as many complete header lines from `data` as are available.
    ///
    /// Returns the number of bytes consumed and whether the blank line that
    /// ends the header section was reached. A buffer without a complete line
    /// yields `(0, false)`; the caller should supply more bytes and retry
    /// with the unconsumed remainder.
    ///
    /// On error nothing is reported as consumed, but lines merged before the
    /// failing one stay in the map. The caller abandons the request anyway.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let mut read = 0;

        loop {
            let Some(idx) = find_crlf(&data[read..]) else {
                return Ok((read, false));
            };

            if idx == 0 {
                return Ok((read + CRLF.len(), true));
            }

            let (name, value) = parse_field_line(&data[read..read + idx])?;
            self.set(name, value);
            read += idx + CRLF.len();
        }
    }
}

/// Returns true if every byte of `name` is an RFC 7230 `tchar`.
///
/// An empty name is not a token.
pub fn is_token(name: &[u8]) -> bool {
    !name.is_empty() && name.iter().all(|&c| is_tchar(c))
}

fn is_tchar(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}

pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == CRLF)
}

fn parse_field_line(line: &[u8]) -> Result<(&str, String), ParseError> {
    let colon = line
        .iter()
        .position(|&c| c == b':')
        .ok_or(ParseError::MalformedHeaderLine)?;

    // No whitespace allowed between field name and colon.
    if colon > 0 && matches!(line[colon - 1], b' ' | b'\t') {
        return Err(ParseError::MalformedHeaderLine);
    }

    let name = trim(&line[..colon]);
    let value = trim(&line[colon + 1..]);

    if name.is_empty() {
        return Err(ParseError::MalformedHeaderLine);
    }
    if !is_token(name) {
        return Err(ParseError::MalformedHeaderName);
    }

    // tchar bytes are ASCII, so this cannot fail after the check above.
    let name = std::str::from_utf8(name).map_err(|_| ParseError::MalformedHeaderName)?;
    let value = String::from_utf8_lossy(value).into_owned();

    Ok((name, value))
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&c| c != b' ' && c != b'\t')
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|&c| c != b' ' && c != b'\t')
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_leading_and_trailing_blanks() {
        assert_eq!(trim(b"  a b \t"), b"a b");
        assert_eq!(trim(b"   "), b"");
        assert_eq!(trim(b""), b"");
    }

    #[test]
    fn finds_first_crlf() {
        assert_eq!(find_crlf(b"ab\r\ncd\r\n"), Some(2));
        assert_eq!(find_crlf(b"ab\r"), None);
    }
}
