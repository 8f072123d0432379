//! URI encoding globals and the legacy `escape`/`unescape` pair

use indexmap::IndexMap;

use super::define;
use crate::value::{arg, Value};

const URI_MALFORMED: &str = "URI malformed";

/// Characters `encodeURIComponent` leaves alone besides ASCII alphanumerics.
const COMPONENT_UNRESERVED: &str = "-_.!~*'()";

/// Extra characters `encodeURI` leaves alone.
const URI_RESERVED: &str = ";,/?:@&=+$#";

/// Characters `escape` leaves alone besides ASCII alphanumerics.
const ESCAPE_SAFE: &str = "@*_+-./";

pub(super) fn install(globals: &mut IndexMap<String, Value>) {
    define(globals, "encodeURIComponent", 1, |_, a| {
        Ok(Value::string(encode(&a_str(a), false)))
    });
    define(globals, "encodeURI", 1, |_, a| Ok(Value::string(encode(&a_str(a), true))));
    define(globals, "decodeURIComponent", 1, |_, a| {
        decode(&a_str(a), false).map(Value::string)
    });
    define(globals, "decodeURI", 1, |_, a| decode(&a_str(a), true).map(Value::string));
    define(globals, "escape", 1, |_, a| Ok(Value::string(escape(&a_str(a)))));
    define(globals, "unescape", 1, |_, a| Ok(Value::string(unescape(&a_str(a)))));
}

fn a_str(args: &[Value]) -> String {
    arg(args, 0).to_js_string()
}

fn encode(input: &str, keep_reserved: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        let keep = c.is_ascii_alphanumeric()
            || COMPONENT_UNRESERVED.contains(c)
            || (keep_reserved && URI_RESERVED.contains(c));
        if keep {
            out.push(c);
            continue;
        }
        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).bytes() {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn hex_byte(bytes: &[u8], at: usize) -> Option<u8> {
    let hi = (*bytes.get(at)? as char).to_digit(16)?;
    let lo = (*bytes.get(at + 1)? as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

fn decode(input: &str, keep_reserved: bool) -> Result<String, String> {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let lead = hex_byte(bytes, i + 1).ok_or_else(|| URI_MALFORMED.to_string())?;
        if lead < 0x80 {
            // decodeURI keeps escapes of reserved characters as written
            if keep_reserved && (URI_RESERVED.contains(lead as char)) {
                out.extend_from_slice(&bytes[i..i + 3]);
            } else {
                out.push(lead);
            }
            i += 3;
            continue;
        }

        let width = match lead {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(URI_MALFORMED.to_string()),
        };
        let mut seq = vec![lead];
        for k in 1..width {
            let at = i + 3 * k;
            if bytes.get(at) != Some(&b'%') {
                return Err(URI_MALFORMED.to_string());
            }
            let next = hex_byte(bytes, at + 1).ok_or_else(|| URI_MALFORMED.to_string())?;
            if next & 0xC0 != 0x80 {
                return Err(URI_MALFORMED.to_string());
            }
            seq.push(next);
        }
        std::str::from_utf8(&seq).map_err(|_| URI_MALFORMED.to_string())?;
        out.extend_from_slice(&seq);
        i += 3 * width;
    }
    String::from_utf8(out).map_err(|_| URI_MALFORMED.to_string())
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for unit in input.encode_utf16() {
        match char::from_u32(unit as u32) {
            Some(c) if c.is_ascii_alphanumeric() || ESCAPE_SAFE.contains(c) => out.push(c),
            _ if unit < 256 => out.push_str(&format!("%{:02X}", unit)),
            _ => out.push_str(&format!("%u{:04X}", unit)),
        }
    }
    out
}

fn unescape(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut units: Vec<u16> = Vec::with_capacity(chars.len());
    let mut i = 0;
    let hex = |slice: &[char]| -> Option<u16> {
        let text: String = slice.iter().collect();
        u16::from_str_radix(&text, 16).ok()
    };
    while i < chars.len() {
        let c = chars[i];
        if c == '%' {
            if chars.get(i + 1) == Some(&'u') && i + 6 <= chars.len() {
                if let Some(unit) = hex(&chars[i + 2..i + 6]) {
                    units.push(unit);
                    i += 6;
                    continue;
                }
            }
            if i + 3 <= chars.len() {
                if let Some(unit) = hex(&chars[i + 1..i + 3]) {
                    units.push(unit);
                    i += 3;
                    continue;
                }
            }
        }
        let mut buf = [0u16; 2];
        units.extend_from_slice(c.encode_utf16(&mut buf));
        i += 1;
    }
    String::from_utf16_lossy(&units)
}
