//! Named properties and the property info key (`Np`).
//!
//! # Property Layout
//! ```text
//! "name" "value" type flags
//! ```
//! Name and value are double-quoted, a `"` inside them is written as `""`.
//! Type and flags are integer codes. Several properties in one `Np` key are
//! separated by commas.

use jiff::civil::DateTime;

use crate::famos::codec::code_page::TextCodec;
use crate::famos::codec::number;
use crate::famos::codec::reader::PayloadReader;
use crate::famos::codec::writer::PayloadWriter;
use crate::famos::codec::Key;
use crate::famos::types::enums::{PropertyFlags, PropertyType};
use crate::famos::types::error::{FamosError, Result};
use crate::famos::types::key_type::KeyType;

/// A named value of a declared type.
///
/// The value is kept as text. Every constructor checks that it parses under
/// the declared type; an empty value is always accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    value: String,
    property_type: PropertyType,
    flags: PropertyFlags,
}

impl Property {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        property_type: PropertyType,
        flags: PropertyFlags,
    ) -> Result<Self> {
        let property = Self {
            name: name.into(),
            value: value.into(),
            property_type,
            flags,
        };
        property.validate()?;
        Ok(property)
    }

    pub fn from_int(name: impl Into<String>, value: i32, flags: PropertyFlags) -> Result<Self> {
        Self::new(name, value.to_string(), PropertyType::Integer, flags)
    }

    pub fn from_real(name: impl Into<String>, value: f64, flags: PropertyFlags) -> Result<Self> {
        let text = number::format_real(value).ok_or_else(|| FamosError::InvalidPropertyValue {
            value: value.to_string(),
            expected: "a real number",
        })?;
        Self::new(name, text, PropertyType::Real, flags)
    }

    pub fn from_bool(name: impl Into<String>, value: bool, flags: PropertyFlags) -> Result<Self> {
        let text = if value { "1" } else { "0" };
        Self::new(name, text, PropertyType::Boolean, flags)
    }

    pub fn from_string(name: impl Into<String>, value: impl Into<String>, flags: PropertyFlags) -> Result<Self> {
        Self::new(name, value, PropertyType::String, flags)
    }

    /// Stores the time as seconds since 1980-01-01 00:00:00.
    pub fn from_timestamp(name: impl Into<String>, value: DateTime, flags: PropertyFlags) -> Result<Self> {
        let epoch = DateTime::constant(1980, 1, 1, 0, 0, 0, 0);
        let seconds = value.duration_since(epoch).as_secs_f64();
        let text = number::format_real(seconds).ok_or_else(|| FamosError::InvalidPropertyValue {
            value: seconds.to_string(),
            expected: "a time stamp in correct format (seconds since 01.01.1980)",
        })?;
        Self::new(name, text, PropertyType::TimeStampInDMFormat, flags)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    fn validate(&self) -> Result<()> {
        if self.value.is_empty() {
            return Ok(());
        }

        let expected = match self.property_type {
            PropertyType::String | PropertyType::Enumeration => return Ok(()),
            PropertyType::Integer if number::parse_integer(&self.value).is_some() => return Ok(()),
            PropertyType::Real if number::parse_real(&self.value).is_some() => return Ok(()),
            PropertyType::TimeStampInDMFormat if number::parse_real(&self.value).is_some() => return Ok(()),
            PropertyType::Boolean if self.value == "0" || self.value == "1" => return Ok(()),
            PropertyType::Integer => "an integer number",
            PropertyType::Real => "a real number",
            PropertyType::TimeStampInDMFormat => "a time stamp in correct format (seconds since 01.01.1980)",
            PropertyType::Boolean => "a boolean value ('0' for false or '1' for true)",
        };

        Err(FamosError::InvalidPropertyValue {
            value: self.value.clone(),
            expected,
        })
    }

    /// Parses one property at the payload cursor, including the comma that
    /// separates it from the next one.
    fn decode(payload: &mut PayloadReader<'_>) -> Result<Self> {
        let text = payload.text_codec();

        let name = payload.read_quoted("property name")?;
        payload.expect_byte(b' ', "property")?;
        let value = payload.read_quoted("property value")?;
        payload.expect_byte(b' ', "property")?;
        let type_code = parse_code(payload.read_until(b' ', "property type")?, "property type")?;
        let flags = parse_code(payload.read_until(b',', "property flags")?, "property flags")?;

        let property_type = i32::try_from(type_code)
            .map_err(|_| FamosError::InvalidFormat(format!("Invalid property type. Got type '{}'.", type_code)))
            .and_then(PropertyType::try_from)?;

        Self::new(
            text.decode(&name),
            text.decode(&value),
            property_type,
            PropertyFlags::from_bits_retain(flags),
        )
    }

    fn render(&self, text: TextCodec) -> Result<Vec<u8>> {
        let mut rendered = Vec::new();
        push_quoted(&mut rendered, &text.encode(&self.name)?);
        rendered.push(b' ');
        push_quoted(&mut rendered, &text.encode(&self.value)?);
        rendered.extend_from_slice(
            format!(" {} {}", self.property_type.code(), self.flags.bits()).as_bytes(),
        );
        Ok(rendered)
    }
}

fn parse_code(token: &[u8], field: &'static str) -> Result<u32> {
    let token = String::from_utf8_lossy(token);
    token.trim().parse::<u32>().map_err(|_| FamosError::InvalidNumber {
        kind: field,
        token: token.into_owned(),
    })
}

/// Inverse of [`PayloadReader::read_quoted`].
fn push_quoted(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(b'"');
    for &byte in bytes {
        if byte == b'"' {
            out.push(b'"');
        }
        out.push(byte);
    }
    out.push(b'"');
}

/// An ordered list of properties stored as one key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyInfo {
    pub properties: Vec<Property>,
}

impl PropertyInfo {
    pub fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    pub fn push(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }
}

impl Key for PropertyInfo {
    const KEY_TYPE: KeyType = KeyType::Np;
    const VERSIONS: &'static [u32] = &[1];
    const WRITE_VERSION: u32 = 1;

    fn decode(_version: u32, payload: &mut PayloadReader<'_>) -> Result<Self> {
        let mut properties = Vec::new();
        // Property count is not stored: read until the declared length is used up.
        while !payload.is_empty() {
            properties.push(Property::decode(payload)?);
        }
        Ok(Self { properties })
    }

    fn encode(&self, payload: &mut PayloadWriter) -> Result<()> {
        let text = payload.text_codec();
        for property in &self.properties {
            payload.write_raw(&property.render(text)?);
        }
        Ok(())
    }
}
