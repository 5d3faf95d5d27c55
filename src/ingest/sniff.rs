use anyhow::{Result, bail};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

#[derive(Debug)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
}

// BOM first, then strict UTF-8, then windows-1252.
pub fn decode_bytes(raw: &[u8]) -> Result<DecodedText> {
    let (encoding, body) = match Encoding::for_bom(raw) {
        Some((encoding, bom_len)) => (encoding, &raw[bom_len..]),
        None if std::str::from_utf8(raw).is_ok() => (UTF_8, raw),
        None => (WINDOWS_1252, raw),
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        bail!("input is not valid {}", encoding.name());
    }

    Ok(DecodedText {
        text: text.into_owned(),
        encoding,
    })
}

pub fn detect_delimiter(text: &str) -> u8 {
    let first_line = text.split('\n').next().unwrap_or("");
    if first_line.contains('\t') {
        b'\t'
    } else if first_line.contains(';') {
        b';'
    } else {
        b','
    }
}

pub fn delimiter_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tab",
        b';' => "semicolon",
        _ => "comma",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_bytes_strips_utf8_bom() {
        let decoded = decode_bytes(b"\xEF\xBB\xBFNombre,Correo\n").unwrap();
        assert_eq!(decoded.encoding, UTF_8);
        assert_eq!(decoded.text, "Nombre,Correo\n");
    }

    #[test]
    fn decode_bytes_falls_back_to_windows_1252() {
        let decoded = decode_bytes(b"Tel\xE9fono;Pa\xEDs\n").unwrap();
        assert_eq!(decoded.encoding, WINDOWS_1252);
        assert_eq!(decoded.text, "Teléfono;País\n");
    }

    #[test]
    fn decode_bytes_reads_utf16_with_bom() {
        let decoded = decode_bytes(b"\xFF\xFEa\x00,\x00b\x00").unwrap();
        assert_eq!(decoded.encoding.name(), "UTF-16LE");
        assert_eq!(decoded.text, "a,b");
    }

    #[test]
    fn detect_delimiter_uses_first_line_only() {
        assert_eq!(detect_delimiter("a\tb;c\n1,2"), b'\t');
        assert_eq!(detect_delimiter("a;b\n1\t2"), b';');
        assert_eq!(detect_delimiter("a,b\n1;2"), b',');
        assert_eq!(detect_delimiter(""), b',');
    }
}
