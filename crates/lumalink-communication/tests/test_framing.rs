use lumalink_communication::codec::checksum_of;
use lumalink_communication::framing::{ENCODING_BINARY, ENCODING_TEXT};
use lumalink_communication::{decode, FrameAssembler, Framer, Payload, WireCommand};
use lumalink_core::{ColorMode, FrameError, Rgb};
use lumalink_devicedb::classify;

fn envelope(seq: u8, encoding: u8, payload: &[u8]) -> Vec<u8> {
    let len = payload.len() as u16;
    let [len_hi, len_lo] = len.to_be_bytes();
    let mut frame = vec![0x00, seq, encoding, 0x00, len_hi, len_lo, len as u8 + 1, 0x0B];
    frame.extend_from_slice(payload);
    frame
}

fn state_frame() -> Vec<u8> {
    let mut frame = vec![
        0x81, 0x03, 0x23, 0x61, 0xF0, 0x10, 0x20, 0x40, 0x60, 0x00, 0x05, 0x00, 0x00,
    ];
    frame.push(checksum_of(&frame));
    frame
}

fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

#[test]
fn test_structured_record_marked_binary() {
    // Firmware declares binary encoding but sends a structured record
    let record = format!(r#"{{"code":0,"payload":"{}"}}"#, hex_upper(&state_frame()));
    let notification = envelope(4, ENCODING_BINARY, record.as_bytes());

    let mut assembler = FrameAssembler::new();
    let payload = assembler.push(&notification).unwrap().unwrap();
    assert_eq!(
        payload,
        Payload::Structured {
            code: Some(0),
            payload: state_frame()
        }
    );

    let snapshot = decode(&classify(0x0003, None), payload.frame().unwrap()).unwrap();
    assert_eq!(snapshot.mode, ColorMode::StaticColor);
    assert_eq!(snapshot.rgb, Rgb::new(0x20, 0x40, 0x60));
}

#[test]
fn test_binary_marked_text() {
    let notification = envelope(5, ENCODING_TEXT, &state_frame());
    let mut assembler = FrameAssembler::new();
    assert_eq!(
        assembler.push(&notification).unwrap(),
        Some(Payload::Binary(state_frame()))
    );
}

#[test]
fn test_info_record_without_payload() {
    let notification = envelope(6, ENCODING_TEXT, br#"{"code":0,"model":"LX-01","ver":11}"#);
    let mut assembler = FrameAssembler::new();
    let payload = assembler.push(&notification).unwrap().unwrap();
    match &payload {
        Payload::Info(record) => assert_eq!(record["ver"], 11),
        other => panic!("expected info record, got {:?}", other),
    }
    assert!(payload.frame().is_none());
}

#[test]
fn test_bare_structured_record() {
    let record = format!(r#"{{"payload":"{}"}}"#, hex_upper(&state_frame()).to_lowercase());
    let mut assembler = FrameAssembler::new();
    assert_eq!(
        assembler.push(record.as_bytes()).unwrap(),
        Some(Payload::Structured {
            code: None,
            payload: state_frame()
        })
    );
}

#[test]
fn test_payload_not_a_string() {
    let notification = envelope(7, ENCODING_TEXT, br#"{"payload":42}"#);
    let mut assembler = FrameAssembler::new();
    assert!(matches!(
        assembler.push(&notification),
        Err(FrameError::MalformedRecord { .. })
    ));
}

#[test]
fn test_framer_output_reassembles() {
    let command = WireCommand::new(
        vec![0x3B, 0xA1, 0x00, 0x64, 0x64, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xA3],
        false,
    );
    let mut framer = Framer::new(20);
    let writes = framer.wrap(&command).unwrap();
    assert_eq!(writes.len(), 2);

    let mut assembler = FrameAssembler::new();
    assert_eq!(assembler.push(&writes[0]).unwrap(), None);
    assert_eq!(
        assembler.push(&writes[1]).unwrap(),
        Some(Payload::Binary(command.into_bytes()))
    );
}

#[test]
fn test_interleaved_sequences() {
    let mut assembler = FrameAssembler::new();
    let mut first_a = envelope(1, ENCODING_BINARY, &[1, 2, 3, 4]);
    first_a.truncate(10);
    let mut first_b = envelope(2, ENCODING_BINARY, &[9, 8, 7]);
    first_b.truncate(9);

    assert_eq!(assembler.push(&first_a).unwrap(), None);
    assert_eq!(assembler.push(&first_b).unwrap(), None);
    assert_eq!(assembler.pending(), 2);
    assert_eq!(
        assembler.push(&[0x41, 2, 8, 7]).unwrap(),
        Some(Payload::Binary(vec![9, 8, 7]))
    );
    assert_eq!(
        assembler.push(&[0x41, 1, 3, 4]).unwrap(),
        Some(Payload::Binary(vec![1, 2, 3, 4]))
    );
    assert_eq!(assembler.pending(), 0);
}

#[test]
fn test_bare_frame_not_mistaken_for_fragment() {
    // 0x63 and 0x66 overlap the continuation marker range
    let mut led = vec![0x63, 0x00, 0x96, 0x01, 0x01, 0x02, 0x00];
    led.push(checksum_of(&led));
    let mut assembler = FrameAssembler::new();
    assert_eq!(
        assembler.push(&led).unwrap(),
        Some(Payload::Binary(led.clone()))
    );
}

#[test]
fn test_empty_notification() {
    let mut assembler = FrameAssembler::new();
    assert_eq!(assembler.push(&[]), Err(FrameError::TooShort { len: 0 }));
}
