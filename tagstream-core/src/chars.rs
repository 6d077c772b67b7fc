//! Code point classification.
//!
//! ASCII is answered directly; anything above falls through to the Unicode
//! identifier tables from `unicode-xid`, so element names like `café` or
//! `名前` are accepted the same way an ASCII name is.

use unicode_xid::UnicodeXID;

/// Letters that may start a tag or attribute name.
#[inline]
pub fn is_alpha(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphabetic()
    } else {
        UnicodeXID::is_xid_start(c)
    }
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

/// The four whitespace characters the tokenizer knows how to skip.
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Characters allowed after the first one in tag and attribute names.
///
/// Besides letters and digits this admits `_`, `-`, `.` and `:` so that
/// prefixed names (`dc:creator`) and dotted names pass through untouched;
/// namespaces are not interpreted.
#[inline]
pub fn is_identifier(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
    } else {
        UnicodeXID::is_xid_continue(c)
    }
}
