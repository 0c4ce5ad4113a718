use loracodec_layout::get_num;
use loracodec_payload::{
    decode, decode_value, encode, encode_value, CommandKind, DatarateAdr, DeviceCommand,
    Downlink, GpsSettings, ResetCause, Settings, SpectrumScan, SystemFunctions, Uplink,
};
use serde_json::json;

fn settings_fixture() -> Settings {
    Settings {
        system_status_interval: 7200,
        system_functions: SystemFunctions {
            accelerometer_enabled: true,
            light_enabled: true,
            humidity_enabled: true,
            ..SystemFunctions::default()
        },
        lorawan_datarate_adr: DatarateAdr {
            datarate: 5,
            confirmed_uplink: true,
            adr: false,
        },
        gps_periodic_interval: 65535,
        gps_triggered_interval: 120,
        gps_triggered_threshold: 255,
        gps_triggered_duration: 0,
        gps_cold_fix_timeout: 300,
        gps_hot_fix_timeout: 45,
        gps_min_fix_time: 5,
        gps_min_ehpe: 20,
        gps_hot_fix_retry: 4,
        gps_cold_fix_retry: 1,
        gps_fail_retry: 9,
        gps_settings: GpsSettings {
            fail_backoff: true,
            fully_resolved: true,
            ..GpsSettings::default()
        },
        system_voltage_interval: 60,
        gps_charge_min: 2500,
        system_charge_min: 3550,
        system_charge_max: 5050,
        system_input_charge_min: 4200,
    }
}

fn status_frame(lat: [u8; 3], lon: [u8; 3]) -> Vec<u8> {
    let mut bytes = vec![0u8; 18];
    bytes[0] = (4 << 3) | 3; // watchdog, timeout 4
    bytes[1] = 120; // 3700 mV
    bytes[2] = 51; // 0.0 C
    bytes[4..7].copy_from_slice(&lat);
    bytes[7..10].copy_from_slice(&lon);
    bytes[10] = 2;
    bytes[11] = 0;
    bytes[12] = 255;
    bytes[13] = 128;
    bytes[14..16].copy_from_slice(&3300u16.to_le_bytes());
    bytes[16..18].copy_from_slice(&900u16.to_le_bytes());
    bytes
}

#[test]
fn settings_round_trip() {
    let settings = settings_fixture();
    let bytes = encode(3, &Downlink::Settings(settings.clone())).unwrap();
    assert_eq!(bytes.len(), 26);

    match decode(3, &bytes).unwrap() {
        Uplink::Settings(decoded) => assert_eq!(decoded, settings),
        other => panic!("expected settings, got {other:?}"),
    }
}

#[test]
fn settings_round_trip_through_json() {
    let value = serde_json::to_value(settings_fixture()).unwrap();
    let bytes = encode_value(3, &value).unwrap();
    assert_eq!(decode_value(3, &bytes).unwrap(), value);
}

#[test]
fn settings_missing_nested_record_fails() {
    let mut value = serde_json::to_value(settings_fixture()).unwrap();
    value.as_object_mut().unwrap().remove("lorawan_datarate_adr");
    assert!(encode_value(3, &value).is_err());
}

#[test]
fn settings_missing_datarate_fails() {
    let mut value = serde_json::to_value(settings_fixture()).unwrap();
    value["lorawan_datarate_adr"]
        .as_object_mut()
        .unwrap()
        .remove("datarate");
    assert!(encode_value(3, &value).is_err());
}

#[test]
fn settings_integers_wrap_instead_of_failing() {
    let mut value = serde_json::to_value(settings_fixture()).unwrap();
    value["system_status_interval"] = json!(-1);
    let bytes = encode_value(3, &value).unwrap();
    assert_eq!(&bytes[0..2], &[0xFF, 0xFF]);

    value["system_status_interval"] = json!(5_000_000_001u64);
    let bytes = encode_value(3, &value).unwrap();
    assert_eq!(&bytes[0..2], &[0x01, 0xF2]);
}

#[test]
fn settings_flags_decode_as_integers() {
    let bytes = encode(3, &Downlink::Settings(settings_fixture())).unwrap();
    let value = decode_value(3, &bytes).unwrap();
    assert_eq!(value["lorawan_datarate_adr"]["confirmed_uplink"], json!(1));
    assert_eq!(value["lorawan_datarate_adr"]["adr"], json!(0));
    assert_eq!(value["gps_settings"]["fail_backoff"], json!(1));
    assert_eq!(value["system_functions"]["gps_periodic"], json!(0));
}

#[test]
fn scan_integers_wrap_instead_of_failing() {
    let value = json!({
        "freq_start": 5_000_000_001u64,
        "freq_stop": -1,
        "samples": 0,
        "power": -10,
        "time": 0,
        "type": 0
    });
    let bytes = encode_value(30, &value).unwrap();
    assert_eq!(&bytes[0..4], &[0x01, 0xF2, 0x05, 0x2A]);
    assert_eq!(&bytes[4..8], &[0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn scan_encoding_is_deterministic() {
    let scan = SpectrumScan {
        freq_start: 868_100_000,
        freq_stop: 868_500_000,
        samples: 64,
        power: 10,
        time: 5,
        scan_type: 1,
    };
    let first = encode(30, &Downlink::SpectrumScan(scan)).unwrap();
    let second = encode(30, &Downlink::SpectrumScan(scan)).unwrap();
    assert_eq!(first.len(), 18);
    assert_eq!(first, second);
}

#[test]
fn scan_port_has_no_decoder() {
    assert!(decode(30, &[0u8; 18]).unwrap().is_empty());
}

#[test]
fn command_sentinels() {
    let cases = [
        (CommandKind::Reset, 0xABu8),
        (CommandKind::LoraRejoin, 0xDE),
        (CommandKind::SendSettings, 0xAA),
    ];
    for (kind, byte) in cases {
        let bytes = encode(99, &Downlink::Command(DeviceCommand::new(kind))).unwrap();
        assert_eq!(bytes.as_ref(), &[byte]);
    }
    let none = encode(99, &Downlink::Command(DeviceCommand::default())).unwrap();
    assert!(none.is_empty());
}

#[test]
fn status_report_fields() {
    let frame = status_frame([0x80, 0x00, 0x00], [0x80, 0x00, 0x00]);
    let Uplink::Status(report) = decode(12, &frame).unwrap() else {
        panic!("expected status");
    };
    assert_eq!(report.reset_cause, ResetCause::Watchdog);
    assert_eq!(report.system_state_timeout, 4);
    assert_eq!(report.battery, 3700);
    assert_eq!(report.temperature, 0.0);
    assert_eq!(report.gps_resend, 2);
    assert_eq!(report.accelx, -2000.0);
    assert_eq!(report.accely, 2000.0);
    assert_eq!(report.accelz, 7.8);
    assert_eq!(report.battery_low, 3300);
    assert_eq!(report.gps_on_time_total, 900);
    assert!(report.has_fix());
}

#[test]
fn status_json_shape() {
    let frame = status_frame([0, 0, 0], [0, 0, 0]);
    let value = decode_value(12, &frame).unwrap();
    assert_eq!(value["resetCause"], json!("WATCHDOG"));
    assert_eq!(value["lat"], json!(0.0));
    assert_eq!(value["lon"], json!(0.0));
    assert_eq!(value["system_functions_errors"]["charging_status"], json!(0));
    assert_eq!(value["system_functions_errors"]["gps_fix_error"], json!(0));
    assert_eq!(value["system_functions_errors"]["light_error"], json!(0));
}

#[test]
fn reset_cause_seven_is_unknown() {
    let mut frame = status_frame([0, 0, 0], [0, 0, 0]);
    frame[0] = 0x07;
    let Uplink::Status(report) = decode(12, &frame).unwrap() else {
        panic!("expected status");
    };
    assert_eq!(report.reset_cause, ResetCause::Unknown);
}

#[test]
fn no_fix_sentinel_is_preserved() {
    let mut frame = vec![0u8; 18];
    frame[14..18].copy_from_slice(&1_700_000_000u32.to_le_bytes());
    let Uplink::Position(fix) = decode(1, &frame).unwrap() else {
        panic!("expected position");
    };
    assert_eq!((fix.lat, fix.lon), (0.0, 0.0));
}

#[test]
fn latitude_bounds() {
    let mut frame = vec![0u8; 18];
    frame[0..3].copy_from_slice(&[0xFF, 0xFF, 0xFF]);
    frame[3..6].copy_from_slice(&[0x40, 0x00, 0x00]);
    let Uplink::Position(fix) = decode(1, &frame).unwrap() else {
        panic!("expected position");
    };
    assert_eq!(fix.lat, 90.0);

    frame[0..3].copy_from_slice(&[0, 0, 0]);
    let Uplink::Position(fix) = decode(1, &frame).unwrap() else {
        panic!("expected position");
    };
    assert_eq!(fix.lat, -90.0);
    assert_eq!(fix.lon, -89.99999);
}

#[test]
fn scaled_value_bounds() {
    assert_eq!(get_num(0.0, -20.0, 80.0, 8, 1), -20.0);
    assert!((get_num(255.0, -20.0, 80.0, 8, 1) - 80.0).abs() < 0.05);
}

#[test]
fn location_history_sixty_bytes() {
    let mut frame = Vec::new();
    for i in 0..6u32 {
        frame.extend_from_slice(&[0x80, 0x00, 0x00, 0x80, 0x00, 0x00]);
        frame.extend_from_slice(&(1_700_000_000 + i * 60).to_le_bytes());
    }
    assert_eq!(frame.len(), 60);

    let Uplink::LocationHistory(history) = decode(11, &frame).unwrap() else {
        panic!("expected history");
    };
    assert_eq!(history.locations.len(), 5);
    assert_eq!(history.locations[0].time_decoded, "11/14/2023, 10:13:20 PM");
    assert_eq!(history.locations[1].time_decoded, "11/14/2023, 10:14:20 PM");

    let value = decode_value(11, &frame).unwrap();
    assert!(value["locations"].is_string());
}

#[test]
fn truncated_history_fails() {
    assert!(decode(11, &[0u8; 49]).is_err());
}
