use std::io::Cursor;
use std::rc::Rc;

use famos_file::famos::format::fields::next_field_key;
use famos_file::famos::keys::grouped::Grouped;
use famos_file::famos::{detach, shared};
use famos_file::{
    read_data_field, read_data_fields, read_groups, write_data_field, write_data_fields, write_groups,
    AnalogDigital, Calibration, ChannelInfo, CodePage, Component, DataField, DataFieldHeader, DataFieldType,
    Dispatch, FamosError, Group, KeyReader, KeyType, KeyWriter, Property, PropertyFlags, PropertyInfo, RawKey,
    SingleValue, Text, TriggerTime, XAxisScaling, ZAxisScaling,
};
use jiff::civil::date;
use rust_decimal::Decimal;

fn writer() -> KeyWriter<Vec<u8>> {
    KeyWriter::new(Vec::new(), CodePage::default()).unwrap()
}

fn reader(bytes: Vec<u8>) -> KeyReader<Cursor<Vec<u8>>> {
    KeyReader::new(Cursor::new(bytes), CodePage::default()).unwrap()
}

fn header(field_type: DataFieldType, component_count: i32) -> DataFieldHeader {
    DataFieldHeader {
        component_count,
        field_type,
    }
}

fn equidistant(component_count: i32) -> DataFieldHeader {
    header(DataFieldType::MultipleYToSingleEquidistantTime, component_count)
}

fn analog(index: i32) -> Component {
    Component::new(index, AnalogDigital::Analog).unwrap()
}

/// Tags of all keys in `bytes`, in stream order.
fn tags(bytes: Vec<u8>) -> Vec<KeyType> {
    let mut reader = reader(bytes);
    let mut tags = Vec::new();
    while let Some(key_type) = reader.read_tag().unwrap() {
        reader.skip_key().unwrap();
        tags.push(key_type);
    }
    tags
}

/// Reads one data field from a stream that starts with `CG`.
fn read_field(bytes: Vec<u8>) -> DataField {
    let mut reader = reader(bytes);
    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CG));
    read_data_field(&mut reader).unwrap()
}

fn write_field(field: &DataField) -> Vec<u8> {
    let mut writer = writer();
    write_data_field(&mut writer, field).unwrap();
    writer.into_inner()
}

#[test]
fn components_share_the_last_seen_context() {
    let mut w = writer();
    w.write_key(&equidistant(3)).unwrap();
    w.write_key(&XAxisScaling::new(0.001, "s")).unwrap();
    w.write_key(&analog(1)).unwrap();
    w.write_key(&analog(1)).unwrap();
    w.write_key(&ZAxisScaling::default()).unwrap();
    w.write_key(&analog(1)).unwrap();

    let field = read_field(w.into_inner());
    assert_eq!(field.components.len(), 3);

    let x: Vec<_> = field
        .components
        .iter()
        .map(|c| c.x_axis_scaling.clone().unwrap())
        .collect();
    assert!(Rc::ptr_eq(&x[0], &x[1]));
    assert!(Rc::ptr_eq(&x[1], &x[2]));

    assert!(field.components[0].z_axis_scaling.is_none());
    assert!(field.components[1].z_axis_scaling.is_none());
    assert!(field.components[2].z_axis_scaling.is_some());
    assert!(field.components.iter().all(|c| c.trigger_time.is_none()));

    // Mutation through one handle is seen by every component.
    x[0].borrow_mut().delta_x = 2.0;
    assert_eq!(x[2].borrow().delta_x, 2.0);

    let detached = detach(&x[0]);
    detached.borrow_mut().delta_x = 3.0;
    assert_eq!(x[1].borrow().delta_x, 2.0);
}

#[test]
fn shared_context_is_written_once() {
    let mut w = writer();
    w.write_key(&equidistant(3)).unwrap();
    w.write_key(&XAxisScaling::new(0.001, "s")).unwrap();
    w.write_key(&analog(1)).unwrap();
    w.write_key(&analog(1)).unwrap();
    w.write_key(&ZAxisScaling::default()).unwrap();
    w.write_key(&analog(1)).unwrap();
    let original = w.into_inner();

    let field = read_field(original);
    let written = write_field(&field);

    assert_eq!(
        tags(written.clone()),
        vec![KeyType::CG, KeyType::CD, KeyType::CC, KeyType::CC, KeyType::CZ, KeyType::CC]
    );
    assert_eq!(read_field(written), field);
}

#[test]
fn replaced_context_gets_its_own_handle() {
    let mut w = writer();
    w.write_key(&equidistant(2)).unwrap();
    w.write_key(&XAxisScaling::new(0.001, "s")).unwrap();
    w.write_key(&analog(1)).unwrap();
    w.write_key(&XAxisScaling::new(0.002, "s")).unwrap();
    w.write_key(&analog(1)).unwrap();

    let field = read_field(w.into_inner());
    let first = field.components[0].x_axis_scaling.clone().unwrap();
    let second = field.components[1].x_axis_scaling.clone().unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(first.borrow().delta_x, 0.001);
    assert_eq!(second.borrow().delta_x, 0.002);

    assert_eq!(
        tags(write_field(&field)),
        vec![KeyType::CG, KeyType::CD, KeyType::CC, KeyType::CD, KeyType::CC]
    );
}

#[test]
fn context_written_before_first_component() {
    let scaling = shared(XAxisScaling::new(0.5, "s"));
    let trigger = shared(TriggerTime::new(date(2021, 3, 15).at(9, 0, 0, 0), Default::default()));

    let mut field = DataField::new(DataFieldType::MultipleYToSingleMonotonousTime);
    for index in 1..=2 {
        let mut component = analog(index);
        component.x_axis_scaling = Some(Rc::clone(&scaling));
        component.trigger_time = Some(Rc::clone(&trigger));
        field.components.push(component);
    }

    let bytes = write_field(&field);
    assert_eq!(
        tags(bytes.clone()),
        vec![KeyType::CG, KeyType::CD, KeyType::NT, KeyType::CC, KeyType::CC]
    );

    let read = read_field(bytes);
    assert_eq!(read, field);
    let [a, b] = [&read.components[0], &read.components[1]];
    assert!(Rc::ptr_eq(
        a.trigger_time.as_ref().unwrap(),
        b.trigger_time.as_ref().unwrap()
    ));
}

#[test]
fn unknown_key_inside_field_is_skipped() {
    let mut w = writer();
    w.write_key(&equidistant(2)).unwrap();
    w.write_key(&analog(1)).unwrap();
    w.write_raw(&RawKey {
        key_type: KeyType::from_tag(*b"ZZ"),
        version: 1,
        payload: b"a;b|c".to_vec(),
    })
    .unwrap();
    w.write_key(&analog(2)).unwrap();

    let field = read_field(w.into_inner());
    assert_eq!(field.components.len(), 2);
    assert_eq!(field.components[1].index, 2);
}

#[test]
fn next_field_key_reports_each_outcome() {
    let mut w = writer();
    w.write_key(&XAxisScaling::default()).unwrap();
    w.write_raw(&RawKey {
        key_type: KeyType::from_tag(*b"ZZ"),
        version: 1,
        payload: b"abc".to_vec(),
    })
    .unwrap();
    w.write_key(&Group::new(1, "g", "").unwrap()).unwrap();

    let mut reader = reader(w.into_inner());
    assert!(matches!(
        next_field_key(&mut reader).unwrap(),
        Dispatch::Consumed(_)
    ));
    match next_field_key(&mut reader).unwrap() {
        Dispatch::Skipped(header) => {
            assert_eq!(header.length, 3);
            assert_eq!(reader.position().unwrap(), header.end_offset());
        }
        other => panic!("expected a skipped key, got {:?}", other),
    }
    assert!(matches!(
        next_field_key(&mut reader).unwrap(),
        Dispatch::NotMine(KeyType::CB)
    ));
    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CB));
    reader.skip_key().unwrap();
    assert!(matches!(
        next_field_key(&mut reader).unwrap(),
        Dispatch::EndOfStream
    ));
}

#[test]
fn next_data_field_is_left_in_the_stream() {
    let mut first = writer();
    first.write_key(&equidistant(1)).unwrap();
    first.write_key(&analog(1)).unwrap();
    let first = first.into_inner();

    let mut second = writer();
    second.write_key(&equidistant(1)).unwrap();
    second.write_key(&analog(1)).unwrap();
    let second = second.into_inner();

    let boundary = first.len() as u64;
    let mut reader = reader([first, second].concat());

    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CG));
    let field = read_data_field(&mut reader).unwrap();
    assert_eq!(field.components.len(), 1);
    assert_eq!(reader.position().unwrap(), boundary);

    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CG));
    let field = read_data_field(&mut reader).unwrap();
    assert_eq!(field.components.len(), 1);
    assert!(reader.is_at_end().unwrap());
}

#[test]
fn component_trailer_keys_are_attached() {
    let mut properties = PropertyInfo::default();
    properties.push(Property::from_real("Gain", 1.5, PropertyFlags::empty()).unwrap());

    let pack = RawKey {
        key_type: KeyType::CP,
        version: 1,
        payload: b"1,4,8,1,8,0,0,0,0,0".to_vec(),
    };
    let display = RawKey {
        key_type: KeyType::ND,
        version: 1,
        payload: b"0,0,0,1,1".to_vec(),
    };

    let mut w = writer();
    w.write_key(&equidistant(1)).unwrap();
    w.write_key(&analog(1)).unwrap();
    w.write_key(&properties).unwrap();
    w.write_raw(&pack).unwrap();
    w.write_key(&Calibration::new(true, Decimal::TWO, Decimal::new(5, 1), true, "V")).unwrap();
    w.write_raw(&display).unwrap();

    let field = read_field(w.into_inner());
    let component = &field.components[0];
    assert_eq!(component.calibration.as_ref().unwrap().unit, "V");
    assert_eq!(component.property_info, Some(properties));
    assert_eq!(component.raw_keys, vec![pack, display]);

    let written = write_field(&field);
    assert_eq!(
        tags(written.clone()),
        vec![KeyType::CG, KeyType::CC, KeyType::CP, KeyType::ND, KeyType::CR, KeyType::Np]
    );
    assert_eq!(read_field(written), field);
}

#[test]
fn assembled_field_is_validated() {
    let mut w = writer();
    w.write_key(&equidistant(0)).unwrap();
    w.write_key(&Group::new(1, "g", "").unwrap()).unwrap();
    let mut r = reader(w.into_inner());
    r.read_tag().unwrap();
    assert!(matches!(
        read_data_field(&mut r),
        Err(FamosError::TooFewComponents { expected: 1, actual: 0 })
    ));

    let mut w = writer();
    w.write_key(&header(DataFieldType::MultipleYToSingleXOrViceVersa, 1)).unwrap();
    w.write_key(&analog(1)).unwrap();
    let mut r = reader(w.into_inner());
    r.read_tag().unwrap();
    assert!(matches!(
        read_data_field(&mut r),
        Err(FamosError::TooFewComponents { expected: 2, actual: 1 })
    ));
}

#[test]
fn invalid_field_is_not_written() {
    let field = DataField::new(DataFieldType::ComplexRealImaginary);
    let mut writer = writer();
    assert!(write_data_field(&mut writer, &field).is_err());
    assert!(writer.into_inner().is_empty());
}

#[test]
fn data_field_section_stops_at_foreign_key() {
    let mut first = DataField::new(DataFieldType::MultipleYToSingleEquidistantTime);
    first.components.push(analog(1));
    let mut second = DataField::new(DataFieldType::MultipleYToSingleMonotonousTime);
    second.components.push(analog(1));
    second.components.push(analog(2));
    let fields = vec![first, second];

    let mut w = writer();
    write_data_fields(&mut w, &fields).unwrap();
    w.write_raw(&RawKey {
        key_type: KeyType::CS,
        version: 1,
        payload: b"1,data".to_vec(),
    })
    .unwrap();

    let mut reader = reader(w.into_inner());
    let read = read_data_fields(&mut reader).unwrap();
    assert_eq!(read, fields);
    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CS));
}

fn text(name: &str) -> Text {
    Text {
        name: name.to_string(),
        text: "content".to_string(),
        comment: String::new(),
    }
}

#[test]
fn grouped_items_link_to_their_groups() {
    let mut properties = PropertyInfo::default();
    properties.push(Property::from_int("Count", 3, PropertyFlags::READ_ONLY).unwrap());

    let mut w = writer();
    // Refers to group 2 before it is defined.
    w.write_key(&Grouped { group_index: 2, item: text("early") }).unwrap();
    w.write_key(&Group::new(1, "first", "").unwrap()).unwrap();
    w.write_key(&properties).unwrap();
    w.write_key(&Group::new(2, "second", "comment").unwrap()).unwrap();
    w.write_key(&Grouped {
        group_index: 1,
        item: SingleValue {
            name: "Temp".to_string(),
            value: 21.5,
            unit: "K".to_string(),
            ..SingleValue::default()
        },
    })
    .unwrap();
    w.write_key(&Grouped {
        group_index: 0,
        item: ChannelInfo {
            bit_index: 0,
            name: "loose".to_string(),
            comment: String::new(),
        },
    })
    .unwrap();
    w.write_key(&equidistant(1)).unwrap();

    let mut reader = reader(w.into_inner());
    let section = read_groups(&mut reader).unwrap();

    assert_eq!(section.groups.len(), 2);
    let first = section.group(1).unwrap();
    assert_eq!(first.property_info, Some(properties));
    assert_eq!(first.single_values.len(), 1);
    assert_eq!(first.single_values[0].name, "Temp");

    let second = section.group(2).unwrap();
    assert_eq!(second.comment, "comment");
    assert!(second.property_info.is_none());
    assert_eq!(second.texts, vec![text("early")]);

    assert_eq!(section.channel_infos.len(), 1);
    assert_eq!(section.channel_infos[0].name, "loose");
    assert!(section.texts.is_empty());

    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CG));
}

#[test]
fn group_section_round_trips() {
    let mut w = writer();
    w.write_key(&Group::new(1, "first", "").unwrap()).unwrap();
    w.write_key(&Grouped { group_index: 0, item: text("loose") }).unwrap();
    w.write_key(&Grouped { group_index: 1, item: text("owned") }).unwrap();
    let section = read_groups(&mut reader(w.into_inner())).unwrap();

    let mut w = writer();
    write_groups(&mut w, &section).unwrap();
    let bytes = w.into_inner();

    assert_eq!(tags(bytes.clone()), vec![KeyType::CB, KeyType::CT, KeyType::CT]);
    assert_eq!(read_groups(&mut reader(bytes)).unwrap(), section);
}

#[test]
fn grouped_item_without_group_fails() {
    let mut w = writer();
    w.write_key(&Group::new(1, "first", "").unwrap()).unwrap();
    w.write_key(&Grouped { group_index: 5, item: text("orphan") }).unwrap();

    assert!(matches!(
        read_groups(&mut reader(w.into_inner())),
        Err(FamosError::MissingGroup { key_type: KeyType::CT, index: 5 })
    ));
}

#[test]
fn duplicate_group_index_fails() {
    let mut w = writer();
    w.write_key(&Group::new(1, "a", "").unwrap()).unwrap();
    w.write_key(&Group::new(1, "b", "").unwrap()).unwrap();

    assert!(matches!(
        read_groups(&mut reader(w.into_inner())),
        Err(FamosError::DuplicateGroupIndex(1))
    ));
}

#[test]
fn properties_before_any_group_end_the_section() {
    let mut w = writer();
    w.write_key(&PropertyInfo::default()).unwrap();

    let mut reader = reader(w.into_inner());
    let section = read_groups(&mut reader).unwrap();
    assert!(section.is_empty());
    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::Np));
}
