//! Component keys and the keys that trail them.

use std::io::{Read, Seek, Write};

use log::{debug, warn};

use super::Dispatch;
use crate::famos::codec::reader::KeyReader;
use crate::famos::codec::writer::KeyWriter;
use crate::famos::keys::calibration::Calibration;
use crate::famos::keys::component::Component;
use crate::famos::keys::property::PropertyInfo;
use crate::famos::keys::raw::RawKey;
use crate::famos::types::error::Result;
use crate::famos::types::key_type::KeyType;

/// A key that belongs to the most recent component.
#[derive(Debug)]
pub enum ComponentKey {
    Calibration(Calibration),
    Properties(PropertyInfo),
    Raw(RawKey),
}

/// Offers the next key to the component level.
pub fn next_component_key<R: Read + Seek>(reader: &mut KeyReader<R>) -> Result<Dispatch<ComponentKey>> {
    let Some(key_type) = reader.read_tag()? else {
        return Ok(Dispatch::EndOfStream);
    };

    let key = match key_type {
        KeyType::CR => ComponentKey::Calibration(reader.read_key()?),
        KeyType::Np => ComponentKey::Properties(reader.read_key()?),
        KeyType::CP | KeyType::Cb | KeyType::ND => ComponentKey::Raw(reader.read_raw()?),
        KeyType::Unknown(_) => {
            let header = reader.skip_key()?;
            warn!("Skipped unknown key '{}' ({} bytes)", header.key_type, header.length);
            return Ok(Dispatch::Skipped(header));
        }
        KeyType::CF
        | KeyType::CK
        | KeyType::NO
        | KeyType::NL
        | KeyType::CB
        | KeyType::CT
        | KeyType::CI
        | KeyType::CN
        | KeyType::CG
        | KeyType::CD
        | KeyType::CZ
        | KeyType::NT
        | KeyType::CC
        | KeyType::CS => {
            reader.push_back(key_type)?;
            return Ok(Dispatch::NotMine(key_type));
        }
    };

    Ok(Dispatch::Consumed(key))
}

/// Reads a component whose `CC` tag has just been consumed, together with
/// its calibration, properties and pack/buffer/display keys.
///
/// Scalings and trigger time are not part of the component's own keys;
/// the field dispatcher attaches them.
pub fn read_component<R: Read + Seek>(reader: &mut KeyReader<R>) -> Result<Component> {
    let mut component: Component = reader.read_key()?;

    loop {
        match next_component_key(reader)? {
            Dispatch::Consumed(ComponentKey::Calibration(calibration)) => {
                if component.calibration.is_some() {
                    warn!("Component {} has more than one calibration; keeping the last", component.index);
                }
                component.calibration = Some(calibration);
            }
            Dispatch::Consumed(ComponentKey::Properties(properties)) => {
                component.property_info = Some(properties);
            }
            Dispatch::Consumed(ComponentKey::Raw(raw)) => component.raw_keys.push(raw),
            Dispatch::Skipped(_) => {}
            Dispatch::NotMine(_) | Dispatch::EndOfStream => break,
        }
    }

    debug!(
        "Component {} read: calibration={}, properties={}, raw keys={}",
        component.index,
        component.calibration.is_some(),
        component.property_info.is_some(),
        component.raw_keys.len()
    );
    Ok(component)
}

/// Writes the component's own keys: `CC`, the verbatim keys, `CR`, `Np`.
pub fn write_component<W: Write>(writer: &mut KeyWriter<W>, component: &Component) -> Result<()> {
    writer.write_key(component)?;
    for raw in &component.raw_keys {
        writer.write_raw(raw)?;
    }
    if let Some(calibration) = &component.calibration {
        writer.write_key(calibration)?;
    }
    if let Some(properties) = &component.property_info {
        writer.write_key(properties)?;
    }
    Ok(())
}
