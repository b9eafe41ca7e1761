use lumalink_communication::codec::layout::{Integrity, StateLayout};
use lumalink_communication::codec::checksum_of;
use lumalink_communication::{decode, decode_frame, encode, DecodedFrame};
use lumalink_core::units::level_to_percent;
use lumalink_core::{ColorMode, DecodeError, DeviceProfile, Intent, PowerState, Rgb};
use lumalink_devicedb::classify;

fn profile(code: u16) -> DeviceProfile {
    classify(code, None)
}

fn with_checksum(mut frame: Vec<u8>) -> Vec<u8> {
    frame.push(checksum_of(&frame));
    frame
}

fn classic(sub: u8, body: [u8; 8]) -> Vec<u8> {
    // 81 model power mode sub speed R G B W ver C reserved
    let [speed, r, g, b, w, ver, c, reserved] = body;
    with_checksum(vec![0x81, 0x03, 0x23, 0x61, sub, speed, r, g, b, w, ver, c, reserved])
}

#[test]
fn test_classic_static_rgb() {
    let frame = classic(0xF0, [0x10, 0xFF, 0x80, 0x00, 0x00, 0x05, 0x00, 0x7A]);
    let snapshot = decode(&profile(0x0003), &frame).unwrap();
    assert_eq!(snapshot.power, PowerState::On);
    assert_eq!(snapshot.mode, ColorMode::StaticColor);
    assert_eq!(snapshot.rgb, Rgb::new(0xFF, 0x80, 0x00));
    assert_eq!(snapshot.brightness, 0xFF);
    assert_eq!(snapshot.opaque, Some(0x7A));
    assert_eq!(snapshot.model, Some(0x03));
    assert_eq!(snapshot.firmware_version, Some(0x05));
    assert!(snapshot.effect.is_none());
}

#[test]
fn test_classic_static_white() {
    let frame = classic(0x0F, [0x00, 0x00, 0x00, 0x00, 0x40, 0x05, 0x90, 0x00]);
    let snapshot = decode(&profile(0x0007), &frame).unwrap();
    assert_eq!(snapshot.mode, ColorMode::StaticWhite);
    assert_eq!(snapshot.warm, 0x40);
    assert_eq!(snapshot.cool, 0x90);
    assert_eq!(snapshot.brightness, 0x90);
}

#[test]
fn test_original_frame() {
    let frame = [0x66, 0x01, 0x24, 0x41, 0xF0, 0x10, 0x10, 0x20, 0x30, 0x00, 0x99];
    let snapshot = decode(&profile(0x0001), &frame).unwrap();
    assert_eq!(snapshot.power, PowerState::Off);
    assert_eq!(snapshot.rgb, Rgb::new(0x10, 0x20, 0x30));
    assert_eq!(snapshot.brightness, 0x30);
    assert!(snapshot.opaque.is_none());
    assert!(snapshot.firmware_version.is_none());
}

#[test]
fn test_integrity_failures() {
    let mut frame = classic(0xF0, [0; 8]);
    let good = frame[13];
    frame[13] = good.wrapping_add(1);
    assert_eq!(
        decode(&profile(0x0003), &frame),
        Err(DecodeError::CorruptFrame {
            expected: good,
            actual: good.wrapping_add(1)
        })
    );

    let frame = [0x66, 0x01, 0x23, 0x41, 0xF0, 0x10, 0x10, 0x20, 0x30, 0x00, 0x98];
    assert_eq!(
        decode(&profile(0x0001), &frame),
        Err(DecodeError::CorruptFrame {
            expected: 0x99,
            actual: 0x98
        })
    );
}

#[test]
fn test_structural_failures() {
    let direct = profile(0x0003);
    let frame = classic(0xF0, [0; 8]);

    assert_eq!(
        decode(&direct, &frame[..13]),
        Err(DecodeError::Truncated {
            expected: 14,
            actual: 13
        })
    );
    assert_eq!(decode(&direct, &[]), Err(DecodeError::Empty));
    assert_eq!(
        decode(&direct, &[0x66, 0x00]),
        Err(DecodeError::UnexpectedHeader(0x66))
    );

    let mut bad_power = frame.clone();
    bad_power[2] = 0x00;
    let bad_power = with_checksum(bad_power[..13].to_vec());
    assert_eq!(
        decode(&direct, &bad_power),
        Err(DecodeError::UnknownPowerState(0x00))
    );

    let unknown_mode = classic(0x77, [0; 8]);
    assert_eq!(decode(&direct, &unknown_mode), Err(DecodeError::UnknownMode(0x77)));

    // Direct families report temperature as white levels, never as B1
    let cct = classic(0xB1, [0; 8]);
    assert_eq!(decode(&direct, &cct), Err(DecodeError::UnknownMode(0xB1)));
}

#[test]
fn test_hsv_color_temperature() {
    let frame = classic(0xB1, [0x00, 40, 100, 0x00, 0x00, 0x05, 0x00, 0x00]);
    let snapshot = decode(&profile(0x0035), &frame).unwrap();
    assert_eq!(snapshot.mode, ColorMode::ColorTemperature);
    assert_eq!(snapshot.color_temperature, Some(40));
    assert_eq!(snapshot.brightness, 255);
    assert_eq!(snapshot.cool, 102);
    assert_eq!(snapshot.warm, 153);
}

#[test]
fn test_symphony_opaque_byte() {
    let symphony = profile(0x00A9);
    let effect = classic(0x25, [0x00, 0x07, 0x5A, 0x64, 0x01, 0x05, 0x00, 0x00]);
    let snapshot = decode(&symphony, &effect).unwrap();
    assert_eq!(snapshot.opaque, Some(0x5A));
    assert_eq!(snapshot.effect.map(|e| (e.id, e.speed)), Some((0x07, 100)));

    let static_rgb = classic(0xF0, [0x00, 0x10, 0x5A, 0x00, 0x00, 0x05, 0x00, 0x00]);
    let snapshot = decode(&symphony, &static_rgb).unwrap();
    assert_eq!(snapshot.opaque, None);
    assert_eq!(snapshot.rgb.g, 0x5A);
}

/// Build the state frame a device of this profile would report for a
/// running effect
fn effect_report(profile: &DeviceProfile, id: u16, raw_speed: u8, brightness: u8) -> Vec<u8> {
    let layout = StateLayout::for_family(profile.family());
    let mut frame = vec![0u8; layout.len];
    frame[0] = layout.header;
    frame[layout.power] = 0x23;
    frame[layout.sub_mode] = 0x25;
    let [hi, lo] = id.to_be_bytes();
    frame[layout.effect_id] = lo;
    if let Some(offset) = layout.effect_id_hi {
        frame[offset] = hi;
    }
    frame[layout.effect_speed] = raw_speed;
    if let Some(offset) = layout.effect_brightness {
        frame[offset] = brightness;
    }
    let last = layout.integrity_offset();
    frame[last] = match layout.integrity {
        Integrity::Footer(footer) => footer,
        Integrity::Checksum => checksum_of(&frame[..last]),
    };
    frame
}

#[test]
fn test_effect_round_trip_per_family() {
    // One representative per codec family
    let cases = [
        (0x0001, 0x25),
        (0x0003, 0x26),
        (0x0035, 0x30),
        (0x00A3, 0x0125),
        (0x00A9, 0x07),
    ];
    let mut brightness_checked = 0;
    for (code, id) in cases {
        let profile = profile(code);
        let format = profile.effect_variant().format();
        let layout = StateLayout::for_family(profile.family());
        let reports_brightness = format.carries_brightness && layout.effect_brightness.is_some();
        if reports_brightness {
            brightness_checked += 1;
        }
        for speed in [0u8, 33, 50, 100] {
            for brightness in [1u8, 37, 60, 100] {
                let intent = Intent::SetEffect {
                    id,
                    speed,
                    brightness,
                };
                let command = encode(&profile, &intent).unwrap();
                let speed_offset = if format.wide_id { 3 } else { 2 };
                let raw_speed = command.as_bytes()[speed_offset];
                let raw_brightness = command.as_bytes()[speed_offset + 1];

                let report = effect_report(&profile, id, raw_speed, raw_brightness);
                let snapshot = decode(&profile, &report).unwrap();
                let effect = snapshot.effect.unwrap();
                assert_eq!(snapshot.mode, ColorMode::Effect);
                assert_eq!(effect.id, id, "{}", profile);
                assert!(
                    effect.speed.abs_diff(speed) <= 2,
                    "{}: speed {} came back as {}",
                    profile,
                    speed,
                    effect.speed
                );
                if reports_brightness {
                    assert_eq!(
                        level_to_percent(snapshot.brightness),
                        brightness,
                        "{}: brightness",
                        profile
                    );
                } else {
                    assert_eq!(snapshot.brightness, 255, "{}", profile);
                }
            }
        }
    }
    assert_eq!(brightness_checked, 3);
}

#[test]
fn test_effect_brightness_normalized() {
    let profile = profile(0x0035);
    let report = effect_report(&profile, 0x30, 50, 100);
    assert_eq!(decode(&profile, &report).unwrap().brightness, 255);
    let report = effect_report(&profile, 0x30, 50, 50);
    assert_eq!(decode(&profile, &report).unwrap().brightness, 128);
}

#[test]
fn test_led_config_frame() {
    let frame = with_checksum(vec![0x63, 0x01, 0x2C, 0x04, 0x02, 0x01, 0x00]);
    let addressable = profile(0x00A1);
    match decode_frame(&addressable, &frame).unwrap() {
        DecodedFrame::LedConfig(config) => {
            assert_eq!(config.pixels, 300);
            assert_eq!(config.segments, 4);
            assert_eq!(config.ic_type, 2);
        }
        other => panic!("expected LED config, got {:?}", other),
    }
    assert_eq!(
        decode(&addressable, &frame),
        Err(DecodeError::UnexpectedFrame("LED configuration"))
    );
}
