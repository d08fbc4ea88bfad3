use std::io::{Cursor, Write};

use swf_reader::{Compression, DoAbcTag, Header, Parser, Rect, Swf, SwfError, Tag};

/// Uncompressed header: FWS, version 11, declared length 11605652,
/// 16-bit rect {0, 25600, 0, 20480}, 50 fps, 1 frame.
const HEADER_BYTES: &[u8] = &[
    0x46, 0x57, 0x53, // 'F' 'W' 'S'
    0x0b, // version 11
    0x94, 0x16, 0xb1, 0x00, // file length
    0x80, 0x00, 0x03, 0x20, 0x00, 0x00, 0x02, 0x80, 0x00, // frame rect
    0x00, 0x32, // frame rate 50.0
    0x01, 0x00, // frame count 1
];

const RECT_BYTES: &[u8] = &[0x80, 0x00, 0x03, 0x20, 0x00, 0x00, 0x02, 0x80, 0x00];

/// End tag: code 0, length 0.
const END_TAG: &[u8] = &[0x00, 0x00];

fn parser(bytes: &[u8]) -> Parser<Cursor<Vec<u8>>> {
    Parser::new(Cursor::new(bytes.to_vec()))
}

fn expected_header(compression: Compression, file_length: u32) -> Header {
    Header {
        compression,
        version: 11,
        file_length,
        frame_size: Rect {
            n_bits: 16,
            x_min: 0,
            x_max: 25600,
            y_min: 0,
            y_max: 20480,
        },
        frame_rate: 50.0,
        frame_count: 1,
    }
}

/// Tag header word for a short-form tag.
fn tag_word(code: u16, length: u16) -> [u8; 2] {
    ((code << 6) | length).to_le_bytes()
}

fn zlib_compress(bytes: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn parse_header_uncompressed() {
    let mut p = parser(HEADER_BYTES);
    let header = p.parse_header().unwrap();
    assert_eq!(header, expected_header(Compression::None, 11_605_652));
}

#[test]
fn parse_rect_fixture() {
    let mut p = parser(RECT_BYTES);
    let rect = p.parse_rect().unwrap();
    assert_eq!(
        rect,
        Rect {
            n_bits: 16,
            x_min: 0,
            x_max: 25600,
            y_min: 0,
            y_max: 20480,
        }
    );
}

#[test]
fn parse_rect_zero_width_degenerates() {
    let mut p = parser(&[0x00]);
    let rect = p.parse_rect().unwrap();
    assert_eq!(rect, Rect::default());
}

#[test]
fn rect_truncated_inside_a_bound_is_never_clean() {
    for cut in [1, 3, 5, 7] {
        let mut p = parser(&RECT_BYTES[..cut]);
        assert!(
            matches!(p.parse_rect(), Err(SwfError::UnexpectedEof)),
            "cut at byte {cut}"
        );
    }
}

#[test]
fn parse_minimal_file() {
    let mut bytes = HEADER_BYTES.to_vec();
    bytes.extend_from_slice(END_TAG);

    let parsed = Swf::parse(Cursor::new(bytes)).unwrap();
    assert_eq!(parsed.header, expected_header(Compression::None, 11_605_652));
    assert_eq!(parsed.tags, vec![Tag::End { length: 0 }]);
}

#[test]
fn bytes_after_the_end_tag_are_not_parsed() {
    let mut bytes = HEADER_BYTES.to_vec();
    bytes.extend_from_slice(END_TAG);
    // Garbage that would be rejected as a tag if it were ever read
    bytes.extend_from_slice(&[0xff, 0xff, 0xff]);

    let parsed = Swf::parse(Cursor::new(bytes)).unwrap();
    assert_eq!(parsed.tags.len(), 1);
    assert_eq!(parsed.tags[0].code(), 0);
}

#[test]
fn unknown_tags_are_skipped_without_a_value() {
    let mut bytes = HEADER_BYTES.to_vec();
    bytes.extend_from_slice(&tag_word(1, 3));
    bytes.extend_from_slice(&[0xaa, 0xbb, 0xcc]);
    bytes.extend_from_slice(END_TAG);

    // The End tag is found exactly 3 payload bytes later, so the skip
    // advanced by the declared length and produced nothing.
    let parsed = Swf::parse(Cursor::new(bytes)).unwrap();
    assert_eq!(parsed.tags, vec![Tag::End { length: 0 }]);
}

#[test]
fn unknown_tag_with_missing_payload_is_truncated() {
    let mut bytes = HEADER_BYTES.to_vec();
    bytes.extend_from_slice(&tag_word(1, 5));
    bytes.extend_from_slice(&[0xaa, 0xbb, 0xcc]);

    let result = Swf::parse(Cursor::new(bytes));
    assert!(matches!(result, Err(SwfError::UnexpectedEof)));
}

#[test]
fn stream_without_an_end_tag_is_truncated() {
    let mut bytes = HEADER_BYTES.to_vec();
    bytes.extend_from_slice(&tag_word(1, 3));
    bytes.extend_from_slice(&[0xaa, 0xbb, 0xcc]);

    let result = Swf::parse(Cursor::new(bytes));
    assert!(matches!(result, Err(SwfError::UnexpectedEof)));
}

#[test]
fn do_abc_tag_is_decoded() {
    let mut bytes = HEADER_BYTES.to_vec();
    // flags(4) + "frame1\0"(7) + data(4) = 15 bytes of payload
    bytes.extend_from_slice(&tag_word(82, 15));
    bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(b"frame1\0");
    bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    bytes.extend_from_slice(END_TAG);

    let parsed = Swf::parse(Cursor::new(bytes)).unwrap();
    assert_eq!(parsed.tags.len(), 2);
    assert_eq!(
        parsed.tags[0],
        Tag::DoAbc(DoAbcTag {
            length: 15,
            flags: 1,
            name: "frame1".to_string(),
            data: vec![0xde, 0xad, 0xbe, 0xef],
        })
    );
    assert_eq!(parsed.tags[0].code(), 82);
    assert_eq!(parsed.tags[0].length(), 15);
    assert_eq!(parsed.tags[1], Tag::End { length: 0 });
}

#[test]
fn do_abc_tag_with_long_length() {
    let data = vec![0x42u8; 80];
    let length = (4 + 7 + data.len()) as u32;

    let mut bytes = HEADER_BYTES.to_vec();
    bytes.extend_from_slice(&tag_word(82, 0x3f)); // long-length escape
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes.extend_from_slice(&[0x02, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(b"frame1\0");
    bytes.extend_from_slice(&data);
    bytes.extend_from_slice(END_TAG);

    let parsed = Swf::parse(Cursor::new(bytes)).unwrap();
    let Tag::DoAbc(do_abc) = &parsed.tags[0] else {
        panic!("expected a DoABC tag, got {:?}", parsed.tags[0]);
    };
    assert_eq!(do_abc.length, length);
    assert_eq!(do_abc.flags, 2);
    assert_eq!(do_abc.name, "frame1");
    assert_eq!(do_abc.data, data);
}

#[test]
fn do_abc_length_shorter_than_its_fields_is_truncated() {
    let mut bytes = HEADER_BYTES.to_vec();
    // Declared length 2 cannot cover the 4-byte flags word
    bytes.extend_from_slice(&tag_word(82, 2));
    bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x00]);

    let result = Swf::parse(Cursor::new(bytes));
    assert!(matches!(result, Err(SwfError::UnexpectedEof)));
}

#[test]
fn do_abc_with_missing_bytecode_is_truncated() {
    let mut bytes = HEADER_BYTES.to_vec();
    bytes.extend_from_slice(&tag_word(82, 15));
    bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(b"frame1\0");
    bytes.extend_from_slice(&[0xde, 0xad]); // 2 of 4 declared bytes

    let result = Swf::parse(Cursor::new(bytes));
    assert!(matches!(result, Err(SwfError::UnexpectedEof)));
}

#[test]
fn zlib_compressed_container_round_trips() {
    // Everything past the 8-byte prefix, compressed
    let mut body = HEADER_BYTES[8..].to_vec();
    body.extend_from_slice(&tag_word(82, 15));
    body.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);
    body.extend_from_slice(b"frame1\0");
    body.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    body.extend_from_slice(END_TAG);

    let compressed = zlib_compress(&body);
    let file_length = (8 + body.len()) as u32;
    let mut bytes = vec![0x43, 0x57, 0x53, 0x0b]; // 'C' 'W' 'S', version 11
    bytes.extend_from_slice(&file_length.to_le_bytes());
    bytes.extend_from_slice(&compressed);

    let parsed = Swf::parse(Cursor::new(bytes)).unwrap();
    assert_eq!(parsed.header, expected_header(Compression::Zlib, file_length));
    assert_eq!(parsed.tags.len(), 2);
    assert_eq!(parsed.tags[0].code(), 82);
    assert_eq!(parsed.tags[1].code(), 0);
}

#[test]
fn corrupt_zlib_body_surfaces_the_io_error() {
    let mut bytes = vec![0x43, 0x57, 0x53, 0x0b];
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(&[0x00, 0x01, 0x02, 0x03]); // not a zlib stream

    let result = Swf::parse(Cursor::new(bytes));
    assert!(matches!(result, Err(SwfError::Io(_))));
}

#[test]
fn malformed_signatures_are_rejected() {
    let result = Swf::parse(Cursor::new(b"XWS".to_vec()));
    assert!(matches!(
        result,
        Err(SwfError::MalformedSignature { found: b'X' })
    ));

    let result = Swf::parse(Cursor::new(b"FXS".to_vec()));
    assert!(matches!(
        result,
        Err(SwfError::MalformedSignature { found: b'X' })
    ));

    let result = Swf::parse(Cursor::new(b"FWX".to_vec()));
    assert!(matches!(
        result,
        Err(SwfError::MalformedSignature { found: b'X' })
    ));
}

#[test]
fn lzma_signature_is_unsupported_not_malformed() {
    let result = Swf::parse(Cursor::new(b"ZWS".to_vec()));
    assert!(matches!(
        result,
        Err(SwfError::UnsupportedCompression(Compression::Lzma))
    ));
}

#[test]
fn truncated_headers_are_never_clean() {
    for cut in 0..HEADER_BYTES.len() {
        let result = Swf::parse(Cursor::new(HEADER_BYTES[..cut].to_vec()));
        assert!(
            matches!(result, Err(SwfError::UnexpectedEof)),
            "cut at byte {cut}: {result:?}"
        );
    }
}
