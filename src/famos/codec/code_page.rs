//! Code page resolution.
//!
//! FAMOS files declare a Windows code page for all text they contain. This
//! module maps those numbers onto `encoding_rs` encodings and performs the
//! byte/text conversions with strict error reporting.

use std::borrow::Cow;
use std::fmt;

use encoding_rs::Encoding;
use log::trace;

use crate::famos::types::error::{FamosError, Result};

/// A Windows code page identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodePage(pub u32);

impl CodePage {
    /// Western European, the code page imc software writes by default.
    pub const WINDOWS_1252: CodePage = CodePage(1252);
    pub const UTF_8: CodePage = CodePage(65001);
}

impl Default for CodePage {
    fn default() -> Self {
        Self::WINDOWS_1252
    }
}

impl fmt::Display for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves a code page to its text encoding.
///
/// UTF-16 code pages are rejected: the key syntax itself is ASCII and
/// cannot be interleaved with two byte code units.
pub fn resolve(code_page: CodePage) -> Result<&'static Encoding> {
    let encoding = match code_page.0 {
        866 => encoding_rs::IBM866,
        874 => encoding_rs::WINDOWS_874,
        932 => encoding_rs::SHIFT_JIS,
        936 => encoding_rs::GBK,
        949 => encoding_rs::EUC_KR,
        950 => encoding_rs::BIG5,
        1250 => encoding_rs::WINDOWS_1250,
        1251 => encoding_rs::WINDOWS_1251,
        1252 => encoding_rs::WINDOWS_1252,
        1253 => encoding_rs::WINDOWS_1253,
        1254 => encoding_rs::WINDOWS_1254,
        1255 => encoding_rs::WINDOWS_1255,
        1256 => encoding_rs::WINDOWS_1256,
        1257 => encoding_rs::WINDOWS_1257,
        1258 => encoding_rs::WINDOWS_1258,
        10000 => encoding_rs::MACINTOSH,
        20866 => encoding_rs::KOI8_R,
        20932 => encoding_rs::EUC_JP,
        21866 => encoding_rs::KOI8_U,
        // ISO-8859-1 is decoded as its windows-1252 superset.
        28591 => encoding_rs::WINDOWS_1252,
        28592 => encoding_rs::ISO_8859_2,
        28593 => encoding_rs::ISO_8859_3,
        28594 => encoding_rs::ISO_8859_4,
        28595 => encoding_rs::ISO_8859_5,
        28596 => encoding_rs::ISO_8859_6,
        28597 => encoding_rs::ISO_8859_7,
        28598 => encoding_rs::ISO_8859_8,
        28603 => encoding_rs::ISO_8859_13,
        28605 => encoding_rs::ISO_8859_15,
        54936 => encoding_rs::GB18030,
        65001 => encoding_rs::UTF_8,
        other => return Err(FamosError::UnknownCodePage(other)),
    };
    trace!("Code page {} resolved to {}", code_page, encoding.name());
    Ok(encoding)
}

/// Text conversion bound to one code page.
#[derive(Debug, Clone, Copy)]
pub struct TextCodec {
    code_page: CodePage,
    encoding: &'static Encoding,
}

impl TextCodec {
    pub fn new(code_page: CodePage) -> Result<Self> {
        Ok(Self {
            code_page,
            encoding: resolve(code_page)?,
        })
    }

    pub fn code_page(&self) -> CodePage {
        self.code_page
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Decodes raw bytes. Malformed sequences become U+FFFD.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        self.encoding.decode_without_bom_handling(bytes).0
    }

    /// Encodes text, failing on characters the code page cannot represent.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>> {
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(FamosError::Unencodable {
                text: text.to_string(),
                code_page: self.code_page.0,
            });
        }
        Ok(bytes)
    }
}
