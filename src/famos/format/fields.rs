//! Data field assembly.
//!
//! Scalings and trigger times are context keys: once read, each one applies
//! to every following component until a key of the same type replaces it.
//! Components read under the same context key share a single handle, so
//! the sharing survives a read/write round trip.

use std::io::{Read, Seek, Write};
use std::rc::Rc;

use log::{debug, info, warn};

use super::component::{read_component, write_component};
use super::Dispatch;
use crate::famos::codec::reader::KeyReader;
use crate::famos::codec::writer::KeyWriter;
use crate::famos::codec::Key;
use crate::famos::keys::component::Component;
use crate::famos::keys::data_field::{DataField, DataFieldHeader};
use crate::famos::keys::scaling::{XAxisScaling, ZAxisScaling};
use crate::famos::keys::trigger_time::TriggerTime;
use crate::famos::types::error::Result;
use crate::famos::types::key_type::KeyType;
use crate::famos::types::{shared, Shared};

/// A key that belongs to the data field being assembled.
#[derive(Debug)]
pub enum FieldKey {
    XAxis(XAxisScaling),
    ZAxis(ZAxisScaling),
    Trigger(TriggerTime),
    Component(Component),
}

/// The most recent context keys, last seen wins.
#[derive(Debug, Default)]
struct Context {
    x_axis: Option<Shared<XAxisScaling>>,
    z_axis: Option<Shared<ZAxisScaling>>,
    trigger: Option<Shared<TriggerTime>>,
}

impl Context {
    fn attach(&self, component: &mut Component) {
        component.x_axis_scaling = self.x_axis.clone();
        component.z_axis_scaling = self.z_axis.clone();
        component.trigger_time = self.trigger.clone();
    }
}

/// Offers the next key to the data field level.
///
/// A `CC` key is read together with its trailing keys, so the returned
/// component is complete apart from its context.
pub fn next_field_key<R: Read + Seek>(reader: &mut KeyReader<R>) -> Result<Dispatch<FieldKey>> {
    let Some(key_type) = reader.read_tag()? else {
        return Ok(Dispatch::EndOfStream);
    };

    let key = match key_type {
        KeyType::CD => FieldKey::XAxis(reader.read_key()?),
        KeyType::CZ => FieldKey::ZAxis(reader.read_key()?),
        KeyType::NT => FieldKey::Trigger(reader.read_key()?),
        KeyType::CC => FieldKey::Component(read_component(reader)?),
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
        | KeyType::CP
        | KeyType::Cb
        | KeyType::CR
        | KeyType::ND
        | KeyType::CS
        | KeyType::Np => {
            reader.push_back(key_type)?;
            return Ok(Dispatch::NotMine(key_type));
        }
    };

    Ok(Dispatch::Consumed(key))
}

/// Reads a data field whose `CG` tag has just been consumed, then every
/// context and component key up to the first key of another level.
pub fn read_data_field<R: Read + Seek>(reader: &mut KeyReader<R>) -> Result<DataField> {
    let header: DataFieldHeader = reader.read_key()?;
    let mut field = header.into_field();
    let mut context = Context::default();

    loop {
        match next_field_key(reader)? {
            Dispatch::Consumed(FieldKey::XAxis(scaling)) => context.x_axis = Some(shared(scaling)),
            Dispatch::Consumed(FieldKey::ZAxis(scaling)) => context.z_axis = Some(shared(scaling)),
            Dispatch::Consumed(FieldKey::Trigger(trigger)) => context.trigger = Some(shared(trigger)),
            Dispatch::Consumed(FieldKey::Component(mut component)) => {
                context.attach(&mut component);
                field.components.push(component);
            }
            Dispatch::Skipped(_) => {}
            Dispatch::NotMine(_) | Dispatch::EndOfStream => break,
        }
    }

    if usize::try_from(header.component_count).ok() != Some(field.components.len()) {
        warn!(
            "Data field announced {} component(s) but {} were read",
            header.component_count,
            field.components.len()
        );
    }
    field.validate()?;
    debug!(
        "Data field read: type={:?}, {} component(s)",
        field.field_type,
        field.components.len()
    );
    Ok(field)
}

/// Reads every data field up to the first key that is neither `CG` nor
/// unknown. That key is left in the stream.
pub fn read_data_fields<R: Read + Seek>(reader: &mut KeyReader<R>) -> Result<Vec<DataField>> {
    let mut fields = Vec::new();

    while let Some(key_type) = reader.read_tag()? {
        match key_type {
            KeyType::CG => fields.push(read_data_field(reader)?),
            KeyType::Unknown(_) => {
                let header = reader.skip_key()?;
                warn!("Skipped unknown key '{}' ({} bytes)", header.key_type, header.length);
            }
            _ => {
                reader.push_back(key_type)?;
                break;
            }
        }
    }

    info!("Read {} data field(s)", fields.len());
    Ok(fields)
}

/// Context handles already present in the output stream.
#[derive(Debug, Default)]
struct Emitted {
    x_axis: Option<Shared<XAxisScaling>>,
    z_axis: Option<Shared<ZAxisScaling>>,
    trigger: Option<Shared<TriggerTime>>,
}

/// Writes `current` unless the same handle was written last.
///
/// A component without a context that follows one with a context cannot
/// be expressed: a reader would hand it the earlier one.
fn emit_context<K: Key, W: Write>(
    writer: &mut KeyWriter<W>,
    emitted: &mut Option<Shared<K>>,
    current: &Option<Shared<K>>,
    component_index: i32,
) -> Result<()> {
    match current {
        Some(handle) => {
            let already_written = emitted.as_ref().is_some_and(|last| Rc::ptr_eq(last, handle));
            if !already_written {
                writer.write_key(&*handle.borrow())?;
                *emitted = Some(Rc::clone(handle));
            }
        }
        None if emitted.is_some() => {
            warn!(
                "Component {} has no '{}' key and will inherit the preceding one when read back",
                component_index,
                K::KEY_TYPE
            );
        }
        None => {}
    }
    Ok(())
}

/// Writes a data field: `CG`, then for each component any context key that
/// changed since the previous component, followed by the component keys.
pub fn write_data_field<W: Write>(writer: &mut KeyWriter<W>, field: &DataField) -> Result<()> {
    field.validate()?;
    writer.write_key(&field.header())?;

    let mut emitted = Emitted::default();
    for component in &field.components {
        emit_context(writer, &mut emitted.x_axis, &component.x_axis_scaling, component.index)?;
        emit_context(writer, &mut emitted.z_axis, &component.z_axis_scaling, component.index)?;
        emit_context(writer, &mut emitted.trigger, &component.trigger_time, component.index)?;
        write_component(writer, component)?;
    }
    Ok(())
}

pub fn write_data_fields<W: Write>(writer: &mut KeyWriter<W>, fields: &[DataField]) -> Result<()> {
    for field in fields {
        write_data_field(writer, field)?;
    }
    info!("Wrote {} data field(s)", fields.len());
    Ok(())
}
