//! Entity reference translation.
//!
//! Only the five predefined XML entities and numeric character references are
//! understood. DTD-declared entities are never resolved.

use phf::phf_map;

static NAMED: phf::Map<&'static str, char> = phf_map! {
    "amp" => '&',
    "lt" => '<',
    "gt" => '>',
    "quot" => '"',
    "apos" => '\'',
};

/// Translate the body of an entity reference (the part between `&` and `;`)
/// into the character it stands for.
///
/// Accepts `amp`, `lt`, `gt`, `quot`, `apos`, decimal `#NNN` and hexadecimal
/// `#xHH` references. Returns `None` for anything else, including numeric
/// references to zero, surrogates or values above `U+10FFFF`.
pub fn translate(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => parse_digits(hex, 16)?,
            None => parse_digits(numeric, 10)?,
        };
        return match code {
            0 => None,
            _ => char::from_u32(code),
        };
    }
    NAMED.get(name).copied()
}

fn parse_digits(digits: &str, radix: u32) -> Option<u32> {
    // from_str_radix would also take a leading '+'
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}
