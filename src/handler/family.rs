// src/handler/family.rs

//! Device families with a built-in property map.
//!
//! Both maps describe components of one inertial sensor: `SensorV1` covers
//! device-level identity and settings, `ImuV1` the inertial unit. They
//! share the same stream-control commands.

use super::map::{Access, PropertyEntry, PropertyMap, StreamPolicy};
use crate::common::{
    cache::CacheField,
    codec::Encoding,
    hal_traits::RegisterAddress,
    property::PropertyType,
};

/// The closed set of supported device families, picked once when a handler is built.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DeviceFamily {
    SensorV1,
    ImuV1,
}

impl DeviceFamily {
    pub fn map(&self) -> &'static PropertyMap {
        match self {
            DeviceFamily::SensorV1 => &SENSOR_V1,
            DeviceFamily::ImuV1 => &IMU_V1,
        }
    }
}

// --- Shared command registers ---
const GOTO_COMMAND_MODE: u16 = 0x0006;
const GOTO_STREAM_MODE: u16 = 0x0007;

/// Property ids of [`DeviceFamily::SensorV1`].
pub mod sensor {
    use crate::common::property::PropertyId;

    pub const DEVICE_NAME: PropertyId = PropertyId::new(1000);
    pub const FIRMWARE_INFO: PropertyId = PropertyId::new(1001);
    pub const FIRMWARE_VERSION: PropertyId = PropertyId::new(1002);
    pub const SERIAL_NUMBER: PropertyId = PropertyId::new(1003);
    pub const RESTORE_FACTORY_SETTINGS: PropertyId = PropertyId::new(1004);
    pub const STORE_SETTINGS_IN_FLASH: PropertyId = PropertyId::new(1005);
    pub const BAUD_RATE: PropertyId = PropertyId::new(1006);
    pub const SUPPORTED_BAUD_RATES: PropertyId = PropertyId::new(1007);
    pub const TIME_OFFSET: PropertyId = PropertyId::new(1008);
    pub const UPTIME: PropertyId = PropertyId::new(1009);
}

/// Property ids of [`DeviceFamily::ImuV1`].
pub mod imu {
    use crate::common::property::PropertyId;

    pub const SAMPLING_RATE: PropertyId = PropertyId::new(1100);
    pub const SUPPORTED_SAMPLING_RATES: PropertyId = PropertyId::new(1101);
    pub const FILTER_MODE: PropertyId = PropertyId::new(1102);
    pub const ACC_RANGE: PropertyId = PropertyId::new(1103);
    pub const ACC_SUPPORTED_RANGES: PropertyId = PropertyId::new(1104);
    pub const GYR_RANGE: PropertyId = PropertyId::new(1105);
    pub const GYR_SUPPORTED_RANGES: PropertyId = PropertyId::new(1106);
    pub const MAG_RANGE: PropertyId = PropertyId::new(1107);
    pub const MAG_SUPPORTED_RANGES: PropertyId = PropertyId::new(1108);
    pub const GYR_USE_AUTO_CALIBRATION: PropertyId = PropertyId::new(1109);
    pub const GYR_USE_THRESHOLD: PropertyId = PropertyId::new(1110);
    pub const DEG_RAD_OUTPUT: PropertyId = PropertyId::new(1111);
    pub const OUTPUT_LOW_PRECISION: PropertyId = PropertyId::new(1112);
    pub const CENTRIC_COMPENSATION_RATE: PropertyId = PropertyId::new(1113);
    pub const LINEAR_COMPENSATION_RATE: PropertyId = PropertyId::new(1114);
    pub const CALIBRATE_GYRO: PropertyId = PropertyId::new(1115);
    pub const RESET_ORIENTATION_OFFSET: PropertyId = PropertyId::new(1116);
    pub const ACC_ALIGNMENT: PropertyId = PropertyId::new(1117);
    pub const ACC_BIAS: PropertyId = PropertyId::new(1118);

    // output channel selection, one bit each
    pub const OUTPUT_RAW_ACC: PropertyId = PropertyId::new(1120);
    pub const OUTPUT_ACC_CALIBRATED: PropertyId = PropertyId::new(1121);
    pub const OUTPUT_RAW_GYR: PropertyId = PropertyId::new(1122);
    pub const OUTPUT_GYR_CALIBRATED: PropertyId = PropertyId::new(1123);
    pub const OUTPUT_RAW_MAG: PropertyId = PropertyId::new(1124);
    pub const OUTPUT_MAG_CALIBRATED: PropertyId = PropertyId::new(1125);
    pub const OUTPUT_ANGULAR_VEL: PropertyId = PropertyId::new(1126);
    pub const OUTPUT_QUAT: PropertyId = PropertyId::new(1127);
    pub const OUTPUT_EULER: PropertyId = PropertyId::new(1128);
    pub const OUTPUT_LIN_ACC: PropertyId = PropertyId::new(1129);
    pub const OUTPUT_PRESSURE: PropertyId = PropertyId::new(1130);
    pub const OUTPUT_ALTITUDE: PropertyId = PropertyId::new(1131);
    pub const OUTPUT_TEMPERATURE: PropertyId = PropertyId::new(1132);
}

// --- SensorV1 ---

static SUPPORTED_BAUD_RATES: [i32; 6] = [9600, 19200, 57600, 115200, 230400, 921600];

static SENSOR_V1: PropertyMap = PropertyMap {
    entries: &[
        PropertyEntry::register_array(sensor::DEVICE_NAME, PropertyType::Byte, 0x0010, 16, Access::ReadOnly, StreamPolicy::Free),
        PropertyEntry::register_array(sensor::FIRMWARE_INFO, PropertyType::Byte, 0x0020, 16, Access::ReadOnly, StreamPolicy::Free),
        PropertyEntry::register_array(sensor::FIRMWARE_VERSION, PropertyType::Int32, 0x0030, 12, Access::ReadOnly, StreamPolicy::Free),
        PropertyEntry::register_array(sensor::SERIAL_NUMBER, PropertyType::Byte, 0x0040, 24, Access::ReadOnly, StreamPolicy::Free),
        PropertyEntry::command(sensor::RESTORE_FACTORY_SETTINGS, 0x0002, StreamPolicy::Reject),
        PropertyEntry::command(sensor::STORE_SETTINGS_IN_FLASH, 0x0001, StreamPolicy::Pause),
        PropertyEntry::register(sensor::BAUD_RATE, 0x0058, Encoding::Int32, Access::ReadWrite, StreamPolicy::Reject),
        PropertyEntry::static_array(sensor::SUPPORTED_BAUD_RATES, &SUPPORTED_BAUD_RATES),
        PropertyEntry::register(sensor::TIME_OFFSET, 0x005c, Encoding::Int32, Access::WriteOnly, StreamPolicy::Free),
        PropertyEntry::register(sensor::UPTIME, 0x0060, Encoding::UInt64, Access::ReadOnly, StreamPolicy::Free),
    ],
    stream_pause: Some(RegisterAddress(GOTO_COMMAND_MODE)),
    stream_resume: Some(RegisterAddress(GOTO_STREAM_MODE)),
    output_bitset: None,
};

// --- ImuV1 ---

static SUPPORTED_SAMPLING_RATES: [i32; 7] = [5, 10, 25, 50, 100, 200, 400];
static ACC_SUPPORTED_RANGES: [i32; 4] = [2, 4, 8, 16];
static GYR_SUPPORTED_RANGES: [i32; 5] = [125, 250, 500, 1000, 2000];
static MAG_SUPPORTED_RANGES: [i32; 2] = [2, 8];

const OUTPUT_DATA_BITSET: u16 = 0x0120;

static IMU_V1: PropertyMap = PropertyMap {
    entries: &[
        PropertyEntry::register(imu::SAMPLING_RATE, 0x0100, Encoding::Int32, Access::ReadWrite, StreamPolicy::Pause),
        PropertyEntry::static_array(imu::SUPPORTED_SAMPLING_RATES, &SUPPORTED_SAMPLING_RATES),
        PropertyEntry::register(imu::FILTER_MODE, 0x0104, Encoding::Int32, Access::ReadWrite, StreamPolicy::Pause),
        PropertyEntry::register(imu::ACC_RANGE, 0x0108, Encoding::Int32, Access::ReadWrite, StreamPolicy::Pause),
        PropertyEntry::static_array(imu::ACC_SUPPORTED_RANGES, &ACC_SUPPORTED_RANGES),
        PropertyEntry::register(imu::GYR_RANGE, 0x010c, Encoding::Int32, Access::ReadWrite, StreamPolicy::Pause),
        PropertyEntry::static_array(imu::GYR_SUPPORTED_RANGES, &GYR_SUPPORTED_RANGES),
        PropertyEntry::register(imu::MAG_RANGE, 0x0110, Encoding::Int32, Access::ReadWrite, StreamPolicy::Pause),
        PropertyEntry::static_array(imu::MAG_SUPPORTED_RANGES, &MAG_SUPPORTED_RANGES),
        PropertyEntry::register(imu::GYR_USE_AUTO_CALIBRATION, 0x0114, Encoding::BoolWord, Access::ReadWrite, StreamPolicy::Pause),
        PropertyEntry::register(imu::GYR_USE_THRESHOLD, 0x0118, Encoding::BoolWord, Access::ReadWrite, StreamPolicy::Pause),
        PropertyEntry::cached(imu::DEG_RAD_OUTPUT, CacheField::RadOutput, 0x011c, StreamPolicy::Pause),
        PropertyEntry::cached(imu::OUTPUT_LOW_PRECISION, CacheField::LowPrecisionMode, 0x0124, StreamPolicy::Pause),
        PropertyEntry::register(imu::CENTRIC_COMPENSATION_RATE, 0x0128, Encoding::Float32, Access::ReadWrite, StreamPolicy::Pause),
        PropertyEntry::register(imu::LINEAR_COMPENSATION_RATE, 0x012c, Encoding::Float32, Access::ReadWrite, StreamPolicy::Pause),
        PropertyEntry::command(imu::CALIBRATE_GYRO, 0x0003, StreamPolicy::Pause),
        PropertyEntry::command(imu::RESET_ORIENTATION_OFFSET, 0x0004, StreamPolicy::Free),
        PropertyEntry::register_array(imu::ACC_ALIGNMENT, PropertyType::Float, 0x0140, 36, Access::ReadWrite, StreamPolicy::Pause),
        PropertyEntry::register_array(imu::ACC_BIAS, PropertyType::Float, 0x0164, 12, Access::ReadWrite, StreamPolicy::Pause),
        PropertyEntry::output_bit(imu::OUTPUT_RAW_ACC, 0),
        PropertyEntry::output_bit(imu::OUTPUT_ACC_CALIBRATED, 1),
        PropertyEntry::output_bit(imu::OUTPUT_RAW_GYR, 2),
        PropertyEntry::output_bit(imu::OUTPUT_GYR_CALIBRATED, 3),
        PropertyEntry::output_bit(imu::OUTPUT_RAW_MAG, 4),
        PropertyEntry::output_bit(imu::OUTPUT_MAG_CALIBRATED, 5),
        PropertyEntry::output_bit(imu::OUTPUT_ANGULAR_VEL, 6),
        PropertyEntry::output_bit(imu::OUTPUT_QUAT, 7),
        PropertyEntry::output_bit(imu::OUTPUT_EULER, 8),
        PropertyEntry::output_bit(imu::OUTPUT_LIN_ACC, 9),
        PropertyEntry::output_bit(imu::OUTPUT_PRESSURE, 10),
        PropertyEntry::output_bit(imu::OUTPUT_ALTITUDE, 11),
        PropertyEntry::output_bit(imu::OUTPUT_TEMPERATURE, 12),
    ],
    stream_pause: Some(RegisterAddress(GOTO_COMMAND_MODE)),
    stream_resume: Some(RegisterAddress(GOTO_STREAM_MODE)),
    output_bitset: Some(RegisterAddress(OUTPUT_DATA_BITSET)),
};

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn families() -> [DeviceFamily; 2] {
        [DeviceFamily::SensorV1, DeviceFamily::ImuV1]
    }

    #[test]
    fn test_ids_are_unique_within_a_family() {
        for family in families() {
            let entries = family.map().entries;
            for (i, a) in entries.iter().enumerate() {
                for b in &entries[i + 1..] {
                    assert_ne!(a.id, b.id, "{:?} lists {} twice", family, a.id);
                }
            }
        }
    }

    #[test]
    fn test_families_do_not_share_ids() {
        for entry in DeviceFamily::SensorV1.map().entries {
            assert!(DeviceFamily::ImuV1.map().lookup(entry.id).is_none());
        }
    }

    #[test]
    fn test_executable_and_constant_are_exclusive() {
        for family in families() {
            for entry in family.map().entries {
                let d = entry.descriptor();
                assert!(!(d.is_executable && d.is_constant), "{}", entry.id);
                assert_eq!(d.is_executable, d.ty == PropertyType::Unknown);
            }
        }
    }

    #[test]
    fn test_constants_are_never_stream_gated() {
        for family in families() {
            for entry in family.map().entries {
                if entry.descriptor().is_constant {
                    assert_eq!(entry.stream, StreamPolicy::Free, "{}", entry.id);
                }
            }
        }
    }

    #[test]
    fn test_array_lengths_are_whole_elements() {
        for family in families() {
            for entry in family.map().entries {
                if let Some(len) = entry.array_len() {
                    assert_eq!(len % entry.ty.element_size(), 0, "{}", entry.id);
                }
            }
        }
    }

    #[test]
    fn test_id_constants_resolve() {
        let sensor_map = DeviceFamily::SensorV1.map();
        assert!(sensor_map.lookup(sensor::DEVICE_NAME).is_some());
        assert!(sensor_map.lookup(sensor::UPTIME).is_some());
        let imu_map = DeviceFamily::ImuV1.map();
        assert!(imu_map.lookup(imu::SAMPLING_RATE).is_some());
        assert!(imu_map.lookup(imu::OUTPUT_TEMPERATURE).is_some());
        assert!(imu_map.output_bitset.is_some());
        assert!(sensor_map.output_bitset.is_none());
    }
}
