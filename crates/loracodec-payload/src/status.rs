//! Periodic status telemetry, port 12 (uplink only).

use loracodec_layout::{get_num, Coordinates, Field, FieldKind, Layout, LayoutReader, STATUS};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::flag;

const RESET_CAUSE: Field = Field::bits("resetCause", 0, 0, 0x07);
const STATE_TIMEOUT: Field = Field::bits("system_state_timeout", 0, 3, 0x1F);
const BATTERY: Field = Field::new("battery", 1, FieldKind::Millivolts);
const TEMPERATURE: Field = Field::new("temperature", 2, FieldKind::U8);
const GPS_PERIODIC_ERROR: Field = Field::flag("gps_periodic_error", 3, 0);
const GPS_TRIGGERED_ERROR: Field = Field::flag("gps_triggered_error", 3, 1);
const GPS_FIX_ERROR: Field = Field::flag("gps_fix_error", 3, 2);
const ACCELEROMETER_ERROR: Field = Field::flag("accelerometer_error", 3, 3);
const LIGHT_ERROR: Field = Field::flag("light_error", 3, 4);
const CHARGING_STATUS: Field = Field::bits("charging_status", 3, 5, 0x07);
const LAT: Field = Field::new("lat", 4, FieldKind::U24Be);
const LON: Field = Field::new("lon", 7, FieldKind::U24Be);
const GPS_RESEND: Field = Field::new("gps_resend", 10, FieldKind::U8);
const ACCEL_X: Field = Field::new("accelx", 11, FieldKind::U8);
const ACCEL_Y: Field = Field::new("accely", 12, FieldKind::U8);
const ACCEL_Z: Field = Field::new("accelz", 13, FieldKind::U8);
const BATTERY_LOW: Field = Field::new("battery_low", 14, FieldKind::U16Le);
const GPS_ON_TIME_TOTAL: Field = Field::new("gps_on_time_total", 16, FieldKind::U16Le);

/// Wire layout of the status record.
pub const LAYOUT: Layout = Layout::new(
    STATUS,
    "STATUS",
    18,
    &[
        RESET_CAUSE,
        STATE_TIMEOUT,
        BATTERY,
        TEMPERATURE,
        GPS_PERIODIC_ERROR,
        GPS_TRIGGERED_ERROR,
        GPS_FIX_ERROR,
        ACCELEROMETER_ERROR,
        LIGHT_ERROR,
        CHARGING_STATUS,
        LAT,
        LON,
        GPS_RESEND,
        ACCEL_X,
        ACCEL_Y,
        ACCEL_Z,
        BATTERY_LOW,
        GPS_ON_TIME_TOTAL,
    ],
);

const TEMPERATURE_RANGE: (f64, f64) = (-20.0, 80.0);
const ACCEL_RANGE: (f64, f64) = (-2000.0, 2000.0);

/// Why the device last restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetCause {
    #[serde(rename = "POWERON")]
    PowerOn,
    #[serde(rename = "EXTERNAL")]
    External,
    #[serde(rename = "SOFTWARE")]
    Software,
    #[serde(rename = "WATCHDOG")]
    Watchdog,
    #[serde(rename = "FIREWALL")]
    Firewall,
    #[serde(rename = "OTHER")]
    Other,
    #[serde(rename = "STANDBY")]
    Standby,
    /// Any code without a defined cause.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl ResetCause {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ResetCause::PowerOn,
            1 => ResetCause::External,
            2 => ResetCause::Software,
            3 => ResetCause::Watchdog,
            4 => ResetCause::Firewall,
            5 => ResetCause::Other,
            6 => ResetCause::Standby,
            code => {
                warn!(code, "unknown reset cause");
                ResetCause::Unknown
            }
        }
    }
}

/// Subsystem error flags and the charger state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionErrors {
    #[serde(with = "flag")]
    pub gps_periodic_error: bool,
    #[serde(with = "flag")]
    pub gps_triggered_error: bool,
    #[serde(with = "flag")]
    pub gps_fix_error: bool,
    #[serde(with = "flag")]
    pub accelerometer_error: bool,
    #[serde(with = "flag")]
    pub light_error: bool,
    /// 3-bit charger state code.
    pub charging_status: u8,
}

/// Periodic health report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(rename = "resetCause")]
    pub reset_cause: ResetCause,
    pub system_state_timeout: u8,
    /// Battery voltage in mV.
    pub battery: u32,
    /// Degrees Celsius, 0.1 resolution.
    pub temperature: f64,
    pub system_functions_errors: FunctionErrors,
    pub lat: f64,
    pub lon: f64,
    pub gps_resend: u8,
    pub accelx: f64,
    pub accely: f64,
    pub accelz: f64,
    /// Low-battery voltage reading in mV.
    pub battery_low: u16,
    pub gps_on_time_total: u16,
}

impl StatusReport {
    pub(crate) fn read(reader: &LayoutReader<'_>) -> Self {
        let byte = |field: &Field| reader.get(field) as u8;
        let scaled = |field: &Field, (min, max): (f64, f64)| {
            get_num(reader.get(field) as f64, min, max, 8, 1)
        };
        let coords = Coordinates::from_raw(reader.get(&LAT) as u32, reader.get(&LON) as u32);

        Self {
            reset_cause: ResetCause::from_code(byte(&RESET_CAUSE)),
            system_state_timeout: byte(&STATE_TIMEOUT),
            battery: reader.get(&BATTERY) as u32,
            temperature: scaled(&TEMPERATURE, TEMPERATURE_RANGE),
            system_functions_errors: FunctionErrors {
                gps_periodic_error: reader.flag(&GPS_PERIODIC_ERROR),
                gps_triggered_error: reader.flag(&GPS_TRIGGERED_ERROR),
                gps_fix_error: reader.flag(&GPS_FIX_ERROR),
                accelerometer_error: reader.flag(&ACCELEROMETER_ERROR),
                light_error: reader.flag(&LIGHT_ERROR),
                charging_status: byte(&CHARGING_STATUS),
            },
            lat: coords.lat,
            lon: coords.lon,
            gps_resend: byte(&GPS_RESEND),
            accelx: scaled(&ACCEL_X, ACCEL_RANGE),
            accely: scaled(&ACCEL_Y, ACCEL_RANGE),
            accelz: scaled(&ACCEL_Z, ACCEL_RANGE),
            battery_low: reader.get(&BATTERY_LOW) as u16,
            gps_on_time_total: reader.get(&GPS_ON_TIME_TOTAL) as u16,
        }
    }

    /// Whether the report carries a GPS fix.
    pub fn has_fix(&self) -> bool {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
        .is_fix()
    }
}
