use crate::runtime::ErrorKind;

// Names of the runtime helpers every compiled chunk expects in its environment
pub const OPS_TABLE: &str = "__op";
pub const CALL: &str = "__call";
pub const CALLABLE: &str = "__callable";
pub const TRUTHY: &str = "__truthy";
pub const TCO: &str = "__tco";
pub const ENTER: &str = "__enter";
pub const LEAVE: &str = "__leave";
pub const RAISE: &str = "__raise";
pub const IMPORT: &str = "__import";
pub const COMPOUND: &str = "__compound";
pub const DESTRUCTURE_MAP: &str = "__destructure_map";
pub const DESTRUCTURE_SEQUENCE: &str = "__destructure_sequence";

// Hidden locals used inside generated closures
pub(super) const HIDDEN_VALUE: &str = "__v";
pub(super) const HIDDEN_MODULE: &str = "__m";
pub(super) const HIDDEN_SOURCE: &str = "__s";
pub(super) const HIDDEN_FUNCTION: &str = "__f";

/// Characters after which a `;` unit terminator is dropped.
pub const TERMINATOR_EXCLUSIONS: [char; 5] = [')', ',', ';', ']', '}'];

const MANGLE_PREFIX: char = 'V';

/// Lua-safe spelling of a Chip identifier: `V` prefix, `_` doubled, every other
/// non-alphanumeric byte written as `_hh`.
pub fn mangle(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    out.push(MANGLE_PREFIX);
    for byte in name.bytes() {
        match byte {
            b'_' => out.push_str("__"),
            b if b.is_ascii_alphanumeric() => out.push(b as char),
            b => out.push_str(&format!("_{b:02x}")),
        }
    }
    out
}

/// Inverse of [`mangle`]. Names that were never mangled come back unchanged.
pub fn demangle(mangled: &str) -> String {
    let Some(body) = mangled.strip_prefix(MANGLE_PREFIX) else {
        return mangled.to_string();
    };
    let bytes = body.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'_' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        if bytes.get(i + 1) == Some(&b'_') {
            out.push(b'_');
            i += 2;
            continue;
        }
        let decoded = body
            .get(i + 1..i + 3)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match decoded {
            Some(byte) => {
                out.push(byte);
                i += 3;
            }
            None => {
                out.push(b'_');
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

pub fn lua_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\{:03}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Numbers are always written as floats so Lua never infers its integer subtype.
pub fn lua_number(n: f64) -> String {
    if n.is_nan() {
        "(0.0/0.0)".to_string()
    } else if n == f64::INFINITY {
        "(1.0/0.0)".to_string()
    } else if n == f64::NEG_INFINITY {
        "(-1.0/0.0)".to_string()
    } else if n.is_sign_negative() {
        format!("({n:?})")
    } else {
        format!("{n:?}")
    }
}

pub fn raise(kind: ErrorKind, message: &str) -> String {
    format!(
        "{RAISE}({}, {})",
        lua_string(kind.as_str()),
        lua_string(message)
    )
}

/// Drops every `;` immediately followed by one of [`TERMINATOR_EXCLUSIONS`], leaving
/// string literals untouched.
pub fn strip_terminators(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut in_string = false;
    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ';' if chars
                .peek()
                .is_some_and(|next| TERMINATOR_EXCLUSIONS.contains(next)) => {}
            _ => out.push(c),
        }
    }
    out
}
