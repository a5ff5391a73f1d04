//! Group section: groups (`CB`) with their properties (`Np`), and the
//! texts, single values and channel infos that refer to groups by index.

use std::collections::HashSet;
use std::io::{Read, Seek, Write};

use log::{debug, info, warn};

use super::Dispatch;
use crate::famos::codec::reader::KeyReader;
use crate::famos::codec::writer::KeyWriter;
use crate::famos::codec::Key;
use crate::famos::keys::group::Group;
use crate::famos::keys::grouped::{ChannelInfo, GroupMember, Grouped, SingleValue, Text};
use crate::famos::keys::property::PropertyInfo;
use crate::famos::types::error::{FamosError, Result};
use crate::famos::types::key_type::KeyType;

/// All groups of a file plus the items that belong to no group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupSection {
    pub groups: Vec<Group>,
    pub texts: Vec<Text>,
    pub single_values: Vec<SingleValue>,
    pub channel_infos: Vec<ChannelInfo>,
}

impl GroupSection {
    pub fn group(&self, index: i32) -> Option<&Group> {
        self.groups.iter().find(|g| g.index() == index)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
            && self.texts.is_empty()
            && self.single_values.is_empty()
            && self.channel_infos.is_empty()
    }
}

/// A key of the group section, as read from disk.
#[derive(Debug)]
pub enum GroupKey {
    Group(Group),
    Properties(PropertyInfo),
    Text(Grouped<Text>),
    SingleValue(Grouped<SingleValue>),
    ChannelInfo(Grouped<ChannelInfo>),
}

/// Offers the next key to the group section.
///
/// `Np` only belongs here when a group has been read before it; otherwise
/// it is left to the caller.
pub fn next_group_key<R: Read + Seek>(reader: &mut KeyReader<R>, after_group: bool) -> Result<Dispatch<GroupKey>> {
    let Some(key_type) = reader.read_tag()? else {
        return Ok(Dispatch::EndOfStream);
    };

    let key = match key_type {
        KeyType::CB => GroupKey::Group(reader.read_key()?),
        KeyType::Np if after_group => GroupKey::Properties(reader.read_key()?),
        KeyType::CT => GroupKey::Text(reader.read_key()?),
        KeyType::CI => GroupKey::SingleValue(reader.read_key()?),
        KeyType::CN => GroupKey::ChannelInfo(reader.read_key()?),
        KeyType::Unknown(_) => {
            let header = reader.skip_key()?;
            warn!("Skipped unknown key '{}' ({} bytes)", header.key_type, header.length);
            return Ok(Dispatch::Skipped(header));
        }
        KeyType::CF
        | KeyType::CK
        | KeyType::NO
        | KeyType::NL
        | KeyType::CG
        | KeyType::CD
        | KeyType::CZ
        | KeyType::NT
        | KeyType::CC
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

fn group_mut(groups: &mut [Group], key_type: KeyType, index: i32) -> Result<&mut Group> {
    groups
        .iter_mut()
        .find(|g| g.index() == index)
        .ok_or(FamosError::MissingGroup { key_type, index })
}

/// Places each item into its group, or into `ungrouped` for index `0`.
fn link<T: GroupMember>(
    groups: &mut [Group],
    items: Vec<Grouped<T>>,
    ungrouped: &mut Vec<T>,
    select: fn(&mut Group) -> &mut Vec<T>,
) -> Result<()> {
    for Grouped { group_index, item } in items {
        if group_index == 0 {
            ungrouped.push(item);
        } else {
            select(group_mut(groups, T::KEY_TYPE, group_index)?).push(item);
        }
    }
    Ok(())
}

/// Reads the group section up to the first key it does not own.
///
/// Grouped items may precede the group they refer to, so they are linked
/// only after the whole section has been read.
pub fn read_groups<R: Read + Seek>(reader: &mut KeyReader<R>) -> Result<GroupSection> {
    let mut section = GroupSection::default();
    let mut texts = Vec::new();
    let mut single_values = Vec::new();
    let mut channel_infos = Vec::new();

    loop {
        match next_group_key(reader, !section.groups.is_empty())? {
            Dispatch::Consumed(GroupKey::Group(group)) => {
                if section.group(group.index()).is_some() {
                    return Err(FamosError::DuplicateGroupIndex(group.index()));
                }
                debug!("Group {} '{}'", group.index(), group.name);
                section.groups.push(group);
            }
            Dispatch::Consumed(GroupKey::Properties(properties)) => {
                if let Some(group) = section.groups.last_mut() {
                    if group.property_info.is_some() {
                        warn!("Group {} has more than one property key; keeping the last", group.index());
                    }
                    group.property_info = Some(properties);
                }
            }
            Dispatch::Consumed(GroupKey::Text(text)) => texts.push(text),
            Dispatch::Consumed(GroupKey::SingleValue(value)) => single_values.push(value),
            Dispatch::Consumed(GroupKey::ChannelInfo(channel)) => channel_infos.push(channel),
            Dispatch::Skipped(_) => {}
            Dispatch::NotMine(_) | Dispatch::EndOfStream => break,
        }
    }

    link(&mut section.groups, texts, &mut section.texts, |g| &mut g.texts)?;
    link(&mut section.groups, single_values, &mut section.single_values, |g| &mut g.single_values)?;
    link(&mut section.groups, channel_infos, &mut section.channel_infos, |g| &mut g.channel_infos)?;

    info!("Read {} group(s)", section.groups.len());
    Ok(section)
}

fn write_members<T, W>(writer: &mut KeyWriter<W>, group_index: i32, items: &[T]) -> Result<()>
where
    T: GroupMember + Clone,
    W: Write,
    Grouped<T>: Key,
{
    for item in items {
        writer.write_key(&Grouped {
            group_index,
            item: item.clone(),
        })?;
    }
    Ok(())
}

/// Writes every group with its properties, then the grouped items group by
/// group, then the ungrouped items.
pub fn write_groups<W: Write>(writer: &mut KeyWriter<W>, section: &GroupSection) -> Result<()> {
    let mut seen = HashSet::new();
    for group in &section.groups {
        if !seen.insert(group.index()) {
            return Err(FamosError::DuplicateGroupIndex(group.index()));
        }
    }

    for group in &section.groups {
        writer.write_key(group)?;
        if let Some(properties) = &group.property_info {
            writer.write_key(properties)?;
        }
    }

    for group in &section.groups {
        write_members(writer, group.index(), &group.texts)?;
        write_members(writer, group.index(), &group.single_values)?;
        write_members(writer, group.index(), &group.channel_infos)?;
    }

    write_members(writer, 0, &section.texts)?;
    write_members(writer, 0, &section.single_values)?;
    write_members(writer, 0, &section.channel_infos)?;

    info!("Wrote {} group(s)", section.groups.len());
    Ok(())
}
