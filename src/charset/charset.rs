use std::char::{decode_utf16, REPLACEMENT_CHARACTER};
use std::collections::HashMap;
use std::fmt;
use std::str::{self, FromStr};

use lazy_static::lazy_static;

use crate::error::UnsupportedEncodingError;

/// Encoding used when none is given explicitly.
pub const DEFAULT_CHARSET: &str = "ISO-8859-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Latin1,
    Ascii,
    Utf8,
    Utf16Be,
    Utf16Le,
    /// Byte order taken from a leading BOM, big endian without one.
    Utf16,
}

lazy_static! {
    static ref LABELS: HashMap<&'static str, Charset> = {
        use Charset::*;

        let mut labels = HashMap::new();
        for label in &[
            "iso-8859-1",
            "iso8859-1",
            "iso_8859-1",
            "iso_8859_1",
            "8859_1",
            "latin1",
            "l1",
            "iso-ir-100",
            "cp819",
            "ibm819",
        ] {
            labels.insert(*label, Latin1);
        }
        for label in &["us-ascii", "ascii", "iso646-us", "ascii7", "646", "cp367"] {
            labels.insert(*label, Ascii);
        }
        for label in &["utf-8", "utf8", "unicode-1-1-utf-8"] {
            labels.insert(*label, Utf8);
        }
        for label in &["utf-16be", "utf_16be", "x-utf-16be", "unicodebigunmarked"] {
            labels.insert(*label, Utf16Be);
        }
        for label in &["utf-16le", "utf_16le", "x-utf-16le", "unicodelittleunmarked"] {
            labels.insert(*label, Utf16Le);
        }
        for label in &["utf-16", "utf_16", "utf16", "unicode"] {
            labels.insert(*label, Utf16);
        }
        labels
    };
}

impl Charset {
    /// Resolves an encoding label, ignoring case and surrounding whitespace.
    pub fn for_label(label: &str) -> Result<Self, UnsupportedEncodingError> {
        LABELS
            .get(label.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| UnsupportedEncodingError::new(label))
    }

    pub fn name(&self) -> &'static str {
        use Charset::*;
        match self {
            Latin1 => "ISO-8859-1",
            Ascii => "US-ASCII",
            Utf8 => "UTF-8",
            Utf16Be => "UTF-16BE",
            Utf16Le => "UTF-16LE",
            Utf16 => "UTF-16",
        }
    }

    pub fn decoder(&self) -> CharDecoder {
        CharDecoder {
            charset: *self,
            big_endian: match self {
                Charset::Utf16Be => Some(true),
                Charset::Utf16Le => Some(false),
                _ => None,
            },
        }
    }
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Latin1
    }
}

impl FromStr for Charset {
    type Err = UnsupportedEncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_label(s)
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Incremental bytes-to-chars conversion for one stream.
///
/// Malformed input decodes to U+FFFD.
#[derive(Debug, Clone)]
pub struct CharDecoder {
    charset: Charset,
    big_endian: Option<bool>,
}

impl CharDecoder {
    #[inline]
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Decodes the complete characters found in `input` into `out` and returns
    /// the number of bytes used. Bytes of a trailing incomplete sequence are
    /// left unused unless `end_of_input` is set, in which case they decode to
    /// a replacement character.
    pub fn decode(&mut self, input: &[u8], out: &mut Vec<char>, end_of_input: bool) -> usize {
        match self.charset {
            Charset::Latin1 => {
                out.extend(input.iter().map(|&b| char::from(b)));
                input.len()
            }
            Charset::Ascii => {
                out.extend(input.iter().map(|&b| {
                    if b.is_ascii() {
                        char::from(b)
                    } else {
                        REPLACEMENT_CHARACTER
                    }
                }));
                input.len()
            }
            Charset::Utf8 => decode_utf8(input, out, end_of_input),
            Charset::Utf16Be | Charset::Utf16Le | Charset::Utf16 => {
                self.decode_utf16(input, out, end_of_input)
            }
        }
    }

    fn decode_utf16(&mut self, input: &[u8], out: &mut Vec<char>, end_of_input: bool) -> usize {
        let mut bom = 0;
        let big_endian = match self.big_endian {
            Some(big_endian) => big_endian,
            None if input.len() < 2 => {
                if end_of_input && !input.is_empty() {
                    out.push(REPLACEMENT_CHARACTER);
                    return input.len();
                }
                return 0;
            }
            None => {
                let big_endian = match (input[0], input[1]) {
                    (0xFE, 0xFF) => {
                        bom = 2;
                        true
                    }
                    (0xFF, 0xFE) => {
                        bom = 2;
                        false
                    }
                    _ => true,
                };
                self.big_endian = Some(big_endian);
                big_endian
            }
        };

        let input = &input[bom..];
        let unit = |i: usize| {
            let pair = [input[2 * i], input[2 * i + 1]];
            if big_endian {
                u16::from_be_bytes(pair)
            } else {
                u16::from_le_bytes(pair)
            }
        };

        let mut units = input.len() / 2;
        if !end_of_input && units > 0 && (0xD800..0xDC00).contains(&unit(units - 1)) {
            // High surrogate waiting for its pair.
            units -= 1;
        }

        out.extend(decode_utf16((0..units).map(unit)).map(|c| c.unwrap_or(REPLACEMENT_CHARACTER)));

        let mut used = 2 * units;
        if end_of_input && used < input.len() {
            out.push(REPLACEMENT_CHARACTER);
            used = input.len();
        }
        bom + used
    }
}

fn decode_utf8(input: &[u8], out: &mut Vec<char>, end_of_input: bool) -> usize {
    let mut pos = 0;
    while pos < input.len() {
        match str::from_utf8(&input[pos..]) {
            Ok(s) => {
                out.extend(s.chars());
                pos = input.len();
            }
            Err(err) => {
                let valid = err.valid_up_to();
                if let Ok(s) = str::from_utf8(&input[pos..pos + valid]) {
                    out.extend(s.chars());
                }
                match err.error_len() {
                    Some(len) => {
                        out.push(REPLACEMENT_CHARACTER);
                        pos += valid + len;
                    }
                    None if end_of_input => {
                        out.push(REPLACEMENT_CHARACTER);
                        pos = input.len();
                    }
                    None => return pos + valid,
                }
            }
        }
    }
    pos
}
