//! IBDF framing and stream tests.

use std::collections::BTreeSet;
use std::io::Cursor;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use taxon_core::errors::IbdfError;
use taxon_core::models::{Characteristic, Status, VersionPayload};
use taxon_core::Nid;
use taxon_ibdf::codec::{decode, decode_from_slice, encode, encode_to_vec};
use taxon_ibdf::{
    ExternalChronology, ExternalCommitRecord, ExternalKind, ExternalStamp, ExternalStampAlias,
    ExternalStampComment, ExternalVersion, IbdfFrame, IbdfObject, IbdfObjectType, IbdfReader,
    IbdfWriter,
};

fn stamp(time: i64) -> ExternalStamp {
    ExternalStamp {
        status: Status::Active,
        time,
        author: Uuid::from_u128(1),
        module: Uuid::from_u128(2),
        path: Uuid::from_u128(3),
    }
}

fn concept(uuid: u128) -> IbdfObject {
    IbdfObject::Concept(ExternalChronology {
        kind: ExternalKind::Concept,
        primordial_uuid: Uuid::from_u128(uuid),
        additional_uuids: BTreeSet::new(),
        versions: vec![ExternalVersion {
            stamp: stamp(100),
            payload: VersionPayload::Concept,
        }],
    })
}

fn relationship(uuid: u128) -> IbdfObject {
    IbdfObject::Semantic(ExternalChronology {
        kind: ExternalKind::Semantic {
            assemblage: Uuid::from_u128(50),
            referenced_component: Uuid::from_u128(10),
        },
        primordial_uuid: Uuid::from_u128(uuid),
        additional_uuids: BTreeSet::from([Uuid::from_u128(uuid + 1)]),
        versions: vec![
            ExternalVersion {
                stamp: stamp(100),
                payload: VersionPayload::Relationship {
                    destination: Nid(2),
                    relationship_type: Nid(9),
                    group: 0,
                    characteristic: Characteristic::Stated,
                },
            },
            ExternalVersion {
                stamp: ExternalStamp {
                    status: Status::Inactive,
                    ..stamp(200)
                },
                payload: VersionPayload::Relationship {
                    destination: Nid(2),
                    relationship_type: Nid(9),
                    group: 0,
                    characteristic: Characteristic::Stated,
                },
            },
        ],
    })
}

fn write_stream(objects: &[IbdfObject]) -> Vec<u8> {
    let mut writer = IbdfWriter::new(Vec::new());
    writer.write_all(objects).unwrap();
    writer.finish().unwrap()
}

#[test]
fn tags_are_stable() {
    let tags: Vec<u8> = IbdfObjectType::ALL.iter().map(|t| t.tag()).collect();
    assert_eq!(tags, vec![1, 2, 3, 4, 5]);
    for t in IbdfObjectType::ALL {
        assert_eq!(IbdfObjectType::from_tag(t.tag()).unwrap(), t);
    }
    assert!(matches!(
        IbdfObjectType::from_tag(0),
        Err(IbdfError::UnsupportedObjectType { tag: 0 })
    ));
}

#[test]
fn header_layout_is_tag_version_big_endian_length() {
    let bytes = encode_to_vec(&concept(7)).unwrap();
    assert_eq!(bytes[0], IbdfObjectType::Concept.tag());
    assert_eq!(bytes[1], taxon_core::constants::IBDF_DATA_FORMAT_VERSION);
    let len = i32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
    assert_eq!(len as usize, bytes.len() - 6);
}

#[test]
fn every_object_type_survives_a_stream() {
    let objects = vec![
        concept(1),
        relationship(20),
        IbdfObject::CommitRecord(ExternalCommitRecord {
            commit_time: Utc.timestamp_millis_opt(1_000).unwrap(),
            stamps: vec![stamp(100)],
            aliases: vec![],
            components: BTreeSet::from([Uuid::from_u128(1)]),
            comment: "initial load".into(),
        }),
        IbdfObject::StampAlias(ExternalStampAlias {
            alias: stamp(101),
            primordial: stamp(100),
        }),
        IbdfObject::StampComment(ExternalStampComment {
            stamp: stamp(100),
            comment: "reviewed".into(),
        }),
    ];
    let bytes = write_stream(&objects);
    let (read, skipped) = IbdfReader::new(Cursor::new(bytes))
        .read_all_skipping_unsupported()
        .unwrap();
    assert_eq!(read, objects);
    assert_eq!(skipped, 0);
}

#[test]
fn empty_stream_yields_nothing() {
    let mut reader = IbdfReader::new(Cursor::new(Vec::<u8>::new()));
    assert!(reader.read_object().unwrap().is_none());
    assert!(reader.next().is_none());
}

#[test]
fn unknown_tag_is_skipped_and_stream_continues() {
    let mut bytes = encode_to_vec(&concept(1)).unwrap();
    // A well-formed frame with an unregistered tag.
    bytes.extend_from_slice(&[42, 1, 0, 0, 0, 3, 0xAA, 0xBB, 0xCC]);
    bytes.extend_from_slice(&encode_to_vec(&concept(2)).unwrap());

    let mut reader = IbdfReader::new(Cursor::new(bytes.clone()));
    assert!(matches!(reader.next(), Some(Ok(IbdfObject::Concept(_)))));
    assert!(matches!(
        reader.next(),
        Some(Err(IbdfError::UnsupportedObjectType { tag: 42 }))
    ));
    assert!(matches!(reader.next(), Some(Ok(IbdfObject::Concept(_)))));
    assert!(reader.next().is_none());
    assert_eq!(reader.records_read(), 3);

    let (objects, skipped) = IbdfReader::new(Cursor::new(bytes))
        .read_all_skipping_unsupported()
        .unwrap();
    assert_eq!(objects.len(), 2);
    assert_eq!(skipped, 1);
}

#[test]
fn truncated_payload_is_an_error_and_ends_iteration() {
    let mut bytes = encode_to_vec(&concept(1)).unwrap();
    let second = encode_to_vec(&concept(2)).unwrap();
    bytes.extend_from_slice(&second[..second.len() - 3]);

    let mut reader = IbdfReader::new(Cursor::new(bytes));
    assert!(matches!(reader.next(), Some(Ok(_))));
    assert!(matches!(reader.next(), Some(Err(IbdfError::Truncated { .. }))));
    assert!(reader.next().is_none());
}

#[test]
fn truncated_header_is_an_error() {
    let err = decode_from_slice(&[1, 1, 0]).unwrap_err();
    assert!(matches!(err, IbdfError::Truncated { read: 3, expected: 6 }));
}

#[test]
fn negative_length_is_rejected() {
    let bytes = [1u8, 1, 0xFF, 0xFF, 0xFF, 0xFF];
    let mut reader = IbdfReader::new(Cursor::new(bytes.to_vec()));
    assert!(matches!(
        reader.next(),
        Some(Err(IbdfError::InvalidLength { length: -1 }))
    ));
}

#[test]
fn unknown_format_version_is_rejected() {
    let mut frame = encode(&concept(1)).unwrap();
    frame.format_version = 99;
    assert!(matches!(
        decode(&frame),
        Err(IbdfError::UnsupportedDataFormat { tag: 1, version: 99 })
    ));
}

#[test]
fn concept_tag_with_semantic_body_is_rejected() {
    let semantic = encode(&relationship(5)).unwrap();
    let mislabeled = IbdfFrame {
        tag: IbdfObjectType::Concept.tag(),
        ..semantic
    };
    assert!(matches!(decode(&mislabeled), Err(IbdfError::Decode { tag: 1, .. })));
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.ibdf");
    let objects = vec![concept(1), concept(2), relationship(30)];

    let mut writer = IbdfWriter::create(&path).unwrap();
    writer.write_all(&objects).unwrap();
    assert_eq!(writer.written(), 3);
    writer.finish().unwrap();

    let read: Vec<IbdfObject> = IbdfReader::open(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(read, objects);
}

#[test]
fn chronology_accessors() {
    let obj = relationship(1);
    assert_eq!(obj.object_type(), IbdfObjectType::Semantic);
    assert_eq!(obj.as_chronology().unwrap().versions.len(), 2);
    let chronology = obj.into_chronology().unwrap();
    assert_eq!(
        IbdfObject::from_chronology(chronology).object_type(),
        IbdfObjectType::Semantic
    );
    assert!(IbdfObject::StampComment(ExternalStampComment {
        stamp: stamp(1),
        comment: String::new(),
    })
    .into_chronology()
    .is_none());
}
