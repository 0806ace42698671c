/// Builds a `[bool; 256]` lookup table from one or more byte string literals,
/// usable in `const` and `static` position.
macro_rules! character_set {
    () => {{
        [false; 256]
    }};

    ($value:literal $(,$rest:literal)*) => {{
        const A: &[u8] = $value;
        let mut a = character_set!($($rest),*);
        let mut i = 0;
        while i < A.len() {
            a[A[i] as usize] = true;
            i += 1;
        }
        a
    }}
}

/// Bytes that may make up a tag name: ASCII letters, digits, `-` and `_`.
pub(crate) static TAG_NAME: [bool; 256] = character_set!(
    b"abcdefghijklmnopqrstuvwxyz",
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    b"0123456789-_"
);

/// Bytes that end an attribute name.
pub(crate) static ATTRIBUTE_NAME_END: [bool; 256] = character_set!(b"=/> \t\n\x0b\x0c\r");

/// ASCII whitespace, vertical tab included.
pub(crate) static SPACE: [bool; 256] = character_set!(b" \t\n\x0b\x0c\r");

#[inline]
pub(crate) fn is_tag_name_byte(b: u8) -> bool {
    TAG_NAME[b as usize]
}

#[inline]
pub(crate) fn is_space(b: u8) -> bool {
    SPACE[b as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables() {
        assert!(b"aZ09-_".iter().all(|&b| is_tag_name_byte(b)));
        assert!(!b" >/:".iter().any(|&b| is_tag_name_byte(b)));
        assert!(b"\x0b\x0c \t\r\n".iter().all(|&b| is_space(b)));
        assert!(!is_space(b'a'));
        assert!(ATTRIBUTE_NAME_END[b'=' as usize] && !ATTRIBUTE_NAME_END[b'-' as usize]);
    }
}
