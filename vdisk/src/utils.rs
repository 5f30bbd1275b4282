/// Copies `value` into a fixed width field, truncating and zero padding as needed.
pub fn write_fixed_str(field: &mut [u8], value: &str) {
    let bytes = value.as_bytes();
    let len = core::cmp::min(bytes.len(), field.len());

    field[..len].copy_from_slice(&bytes[..len]);

    for byte in field[len..].iter_mut() {
        *byte = 0;
    }
}

/// Reads a fixed width field, dropping the zero padding.
pub fn read_fixed_str(field: &[u8]) -> String {
    return String::from_utf8_lossy(trim_padding(field)).into_owned();
}

pub fn trim_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| *b != 0)
        .map(|i| i + 1)
        .unwrap_or(0);

    return &bytes[..end];
}

/// Checks that a name is non-empty and fits in a `width` byte field.
pub fn fits_field(name: &str, width: usize) -> bool {
    return !name.is_empty() && name.len() <= width;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_write_fixed_pads() {
        let mut field = [0xffu8; 6];
        write_fixed_str(&mut field, "abc");
        assert_eq!(field, [b'a', b'b', b'c', 0, 0, 0]);
    }

    #[test]
    pub fn test_write_fixed_truncates() {
        let mut field = [0u8; 4];
        write_fixed_str(&mut field, "partition");
        assert_eq!(&field, b"part");
    }

    #[test]
    pub fn test_read_fixed() {
        assert_eq!(read_fixed_str(&[b'h', b'i', 0, 0]), "hi");
        assert_eq!(read_fixed_str(&[0, 0]), "");
    }

    #[test]
    pub fn test_fits_field() {
        assert!(fits_field("users.txt", 12));
        assert!(!fits_field("", 12));
        assert!(!fits_field("a_very_long_name", 12));
    }
}
