//! Device settings, port 3.
//!
//! The backend sends this record as a downlink to reconfigure the tracker and
//! the tracker echoes its current settings back on the same port.

use bytes::Bytes;
use loracodec_layout::{Field, FieldKind, Layout, LayoutReader, LayoutWriter, SETTINGS};
use serde::{Deserialize, Serialize};

use crate::{flag, wrapping};

const STATUS_INTERVAL: Field = Field::new("system_status_interval", 0, FieldKind::U16Le);
const GPS_PERIODIC: Field = Field::flag("gps_periodic", 2, 0);
const GPS_TRIGGERED: Field = Field::flag("gps_triggered", 2, 1);
const GPS_HOT_FIX_ENABLED: Field = Field::flag("gps_hot_fix", 2, 2);
const ACCELEROMETER_ENABLED: Field = Field::flag("accelerometer_enabled", 2, 3);
const LIGHT_ENABLED: Field = Field::flag("light_enabled", 2, 4);
const TEMPERATURE_ENABLED: Field = Field::flag("temperature_enabled", 2, 5);
const HUMIDITY_ENABLED: Field = Field::flag("humidity_enabled", 2, 6);
const CHARGING_ENABLED: Field = Field::flag("charging_enabled", 2, 7);
const DATARATE: Field = Field::bits("datarate", 3, 0, 0x0F);
const CONFIRMED_UPLINK: Field = Field::flag("confirmed_uplink", 3, 6);
const ADR: Field = Field::flag("adr", 3, 7);
const GPS_PERIODIC_INTERVAL: Field = Field::new("gps_periodic_interval", 4, FieldKind::U16Le);
const GPS_TRIGGERED_INTERVAL: Field = Field::new("gps_triggered_interval", 6, FieldKind::U16Le);
const GPS_TRIGGERED_THRESHOLD: Field = Field::new("gps_triggered_threshold", 8, FieldKind::U8);
const GPS_TRIGGERED_DURATION: Field = Field::new("gps_triggered_duration", 9, FieldKind::U8);
const GPS_COLD_FIX_TIMEOUT: Field = Field::new("gps_cold_fix_timeout", 10, FieldKind::U16Le);
const GPS_HOT_FIX_TIMEOUT: Field = Field::new("gps_hot_fix_timeout", 12, FieldKind::U16Le);
const GPS_MIN_FIX_TIME: Field = Field::new("gps_min_fix_time", 14, FieldKind::U8);
const GPS_MIN_EHPE: Field = Field::new("gps_min_ehpe", 15, FieldKind::U8);
const GPS_HOT_FIX_RETRY: Field = Field::new("gps_hot_fix_retry", 16, FieldKind::U8);
const GPS_COLD_FIX_RETRY: Field = Field::new("gps_cold_fix_retry", 17, FieldKind::U8);
const GPS_FAIL_RETRY: Field = Field::new("gps_fail_retry", 18, FieldKind::U8);
const D3_FIX: Field = Field::flag("d3_fix", 19, 0);
const FAIL_BACKOFF: Field = Field::flag("fail_backoff", 19, 1);
const HOT_FIX: Field = Field::flag("hot_fix", 19, 2);
const FULLY_RESOLVED: Field = Field::flag("fully_resolved", 19, 3);
const VOLTAGE_INTERVAL: Field = Field::new("system_voltage_interval", 20, FieldKind::U8);
const GPS_CHARGE_MIN: Field = Field::new("gps_charge_min", 21, FieldKind::Millivolts);
const SYSTEM_CHARGE_MIN: Field = Field::new("system_charge_min", 22, FieldKind::Millivolts);
const SYSTEM_CHARGE_MAX: Field = Field::new("system_charge_max", 23, FieldKind::Millivolts);
const INPUT_CHARGE_MIN: Field = Field::new("system_input_charge_min", 24, FieldKind::U16Le);

/// Wire layout of the settings record.
pub const LAYOUT: Layout = Layout::new(
    SETTINGS,
    "SETTINGS",
    26,
    &[
        STATUS_INTERVAL,
        GPS_PERIODIC,
        GPS_TRIGGERED,
        GPS_HOT_FIX_ENABLED,
        ACCELEROMETER_ENABLED,
        LIGHT_ENABLED,
        TEMPERATURE_ENABLED,
        HUMIDITY_ENABLED,
        CHARGING_ENABLED,
        DATARATE,
        CONFIRMED_UPLINK,
        ADR,
        GPS_PERIODIC_INTERVAL,
        GPS_TRIGGERED_INTERVAL,
        GPS_TRIGGERED_THRESHOLD,
        GPS_TRIGGERED_DURATION,
        GPS_COLD_FIX_TIMEOUT,
        GPS_HOT_FIX_TIMEOUT,
        GPS_MIN_FIX_TIME,
        GPS_MIN_EHPE,
        GPS_HOT_FIX_RETRY,
        GPS_COLD_FIX_RETRY,
        GPS_FAIL_RETRY,
        D3_FIX,
        FAIL_BACKOFF,
        HOT_FIX,
        FULLY_RESOLVED,
        VOLTAGE_INTERVAL,
        GPS_CHARGE_MIN,
        SYSTEM_CHARGE_MIN,
        SYSTEM_CHARGE_MAX,
        INPUT_CHARGE_MIN,
    ],
);

/// Enabled subsystems.
///
/// Bits 0-2 (`gps_periodic`, `gps_triggered`, `gps_hot_fix`) are reported by
/// the device; the encoder only writes bits 3-7.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemFunctions {
    #[serde(default, with = "flag")]
    pub gps_periodic: bool,
    #[serde(default, with = "flag")]
    pub gps_triggered: bool,
    #[serde(default, with = "flag")]
    pub gps_hot_fix: bool,
    #[serde(default, with = "flag")]
    pub accelerometer_enabled: bool,
    #[serde(default, with = "flag")]
    pub light_enabled: bool,
    #[serde(default, with = "flag")]
    pub temperature_enabled: bool,
    #[serde(default, with = "flag")]
    pub humidity_enabled: bool,
    #[serde(default, with = "flag")]
    pub charging_enabled: bool,
}

/// LoRaWAN datarate and link flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatarateAdr {
    /// 4-bit datarate index.
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub datarate: u32,
    #[serde(default, with = "flag")]
    pub confirmed_uplink: bool,
    #[serde(default, with = "flag")]
    pub adr: bool,
}

/// GPS behavior flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpsSettings {
    #[serde(default, with = "flag")]
    pub d3_fix: bool,
    #[serde(default, with = "flag")]
    pub fail_backoff: bool,
    #[serde(default, with = "flag")]
    pub hot_fix: bool,
    #[serde(default, with = "flag")]
    pub fully_resolved: bool,
}

/// Device operating configuration.
///
/// Integer fields are masked to their wire width on encode. Charge thresholds
/// are millivolts on a 10 mV grid starting at 2500 mV; off-grid values are
/// truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub system_status_interval: u32,
    pub system_functions: SystemFunctions,
    pub lorawan_datarate_adr: DatarateAdr,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_periodic_interval: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_triggered_interval: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_triggered_threshold: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_triggered_duration: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_cold_fix_timeout: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_hot_fix_timeout: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_min_fix_time: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_min_ehpe: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_hot_fix_retry: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_cold_fix_retry: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_fail_retry: u32,
    pub gps_settings: GpsSettings,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub system_voltage_interval: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub gps_charge_min: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub system_charge_min: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub system_charge_max: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub system_input_charge_min: u32,
}

impl Settings {
    /// Pack the record into its 26-byte downlink.
    pub fn encode(&self) -> Bytes {
        let functions = &self.system_functions;
        let link = &self.lorawan_datarate_adr;
        let gps = &self.gps_settings;

        let mut writer = LayoutWriter::new(&LAYOUT);
        writer
            .put(&STATUS_INTERVAL, self.system_status_interval.into())
            .put_flag(&ACCELEROMETER_ENABLED, functions.accelerometer_enabled)
            .put_flag(&LIGHT_ENABLED, functions.light_enabled)
            .put_flag(&TEMPERATURE_ENABLED, functions.temperature_enabled)
            .put_flag(&HUMIDITY_ENABLED, functions.humidity_enabled)
            .put_flag(&CHARGING_ENABLED, functions.charging_enabled)
            .put(&DATARATE, link.datarate.into())
            .put_flag(&CONFIRMED_UPLINK, link.confirmed_uplink)
            .put_flag(&ADR, link.adr)
            .put(&GPS_PERIODIC_INTERVAL, self.gps_periodic_interval.into())
            .put(&GPS_TRIGGERED_INTERVAL, self.gps_triggered_interval.into())
            .put(&GPS_TRIGGERED_THRESHOLD, self.gps_triggered_threshold.into())
            .put(&GPS_TRIGGERED_DURATION, self.gps_triggered_duration.into())
            .put(&GPS_COLD_FIX_TIMEOUT, self.gps_cold_fix_timeout.into())
            .put(&GPS_HOT_FIX_TIMEOUT, self.gps_hot_fix_timeout.into())
            .put(&GPS_MIN_FIX_TIME, self.gps_min_fix_time.into())
            .put(&GPS_MIN_EHPE, self.gps_min_ehpe.into())
            .put(&GPS_HOT_FIX_RETRY, self.gps_hot_fix_retry.into())
            .put(&GPS_COLD_FIX_RETRY, self.gps_cold_fix_retry.into())
            .put(&GPS_FAIL_RETRY, self.gps_fail_retry.into())
            .put_flag(&D3_FIX, gps.d3_fix)
            .put_flag(&FAIL_BACKOFF, gps.fail_backoff)
            .put_flag(&HOT_FIX, gps.hot_fix)
            .put_flag(&FULLY_RESOLVED, gps.fully_resolved)
            .put(&VOLTAGE_INTERVAL, self.system_voltage_interval.into())
            .put(&GPS_CHARGE_MIN, self.gps_charge_min.into())
            .put(&SYSTEM_CHARGE_MIN, self.system_charge_min.into())
            .put(&SYSTEM_CHARGE_MAX, self.system_charge_max.into())
            .put(&INPUT_CHARGE_MIN, self.system_input_charge_min.into());
        writer.finish()
    }

    pub(crate) fn read(reader: &LayoutReader<'_>) -> Self {
        let get = |field: &Field| reader.get(field) as u32;

        Self {
            system_status_interval: get(&STATUS_INTERVAL),
            system_functions: SystemFunctions {
                gps_periodic: reader.flag(&GPS_PERIODIC),
                gps_triggered: reader.flag(&GPS_TRIGGERED),
                gps_hot_fix: reader.flag(&GPS_HOT_FIX_ENABLED),
                accelerometer_enabled: reader.flag(&ACCELEROMETER_ENABLED),
                light_enabled: reader.flag(&LIGHT_ENABLED),
                temperature_enabled: reader.flag(&TEMPERATURE_ENABLED),
                humidity_enabled: reader.flag(&HUMIDITY_ENABLED),
                charging_enabled: reader.flag(&CHARGING_ENABLED),
            },
            lorawan_datarate_adr: DatarateAdr {
                datarate: get(&DATARATE),
                confirmed_uplink: reader.flag(&CONFIRMED_UPLINK),
                adr: reader.flag(&ADR),
            },
            gps_periodic_interval: get(&GPS_PERIODIC_INTERVAL),
            gps_triggered_interval: get(&GPS_TRIGGERED_INTERVAL),
            gps_triggered_threshold: get(&GPS_TRIGGERED_THRESHOLD),
            gps_triggered_duration: get(&GPS_TRIGGERED_DURATION),
            gps_cold_fix_timeout: get(&GPS_COLD_FIX_TIMEOUT),
            gps_hot_fix_timeout: get(&GPS_HOT_FIX_TIMEOUT),
            gps_min_fix_time: get(&GPS_MIN_FIX_TIME),
            gps_min_ehpe: get(&GPS_MIN_EHPE),
            gps_hot_fix_retry: get(&GPS_HOT_FIX_RETRY),
            gps_cold_fix_retry: get(&GPS_COLD_FIX_RETRY),
            gps_fail_retry: get(&GPS_FAIL_RETRY),
            gps_settings: GpsSettings {
                d3_fix: reader.flag(&D3_FIX),
                fail_backoff: reader.flag(&FAIL_BACKOFF),
                hot_fix: reader.flag(&HOT_FIX),
                fully_resolved: reader.flag(&FULLY_RESOLVED),
            },
            system_voltage_interval: get(&VOLTAGE_INTERVAL),
            gps_charge_min: get(&GPS_CHARGE_MIN),
            system_charge_min: get(&SYSTEM_CHARGE_MIN),
            system_charge_max: get(&SYSTEM_CHARGE_MAX),
            system_input_charge_min: get(&INPUT_CHARGE_MIN),
        }
    }
}
