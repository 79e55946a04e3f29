/// Forecast type identifiers, indexed by lead-time bucket.
///
/// Index 5 is the first live bucket (leads up to +5 h); later indices advance
/// one bucket per [`BUCKET_HOURS`] across the 96-hour forecast horizon.
/// Indices 0..=4 are look-back slots addressable only by raw index. The ids
/// mirror the rows seeded into the `forecast_types` table.
pub const FORECAST_TYPE_IDS: [i64; 21] = [
    4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
];

/// Bucket index assigned to every lead at or below the first cadence boundary.
pub const FIRST_LIVE_BUCKET_INDEX: i64 = 5;

/// Width of one lead-time bucket in hours.
pub const BUCKET_HOURS: i64 = 6;

/// Number of frequency channels in an atmosphere profile (1..=50 GHz).
pub const FREQUENCY_CHANNELS: usize = 50;

/// Expected column count of an atmosphere file line:
/// MJD + opacity, tsys and tatm per channel.
pub const ATMOSPHERE_COLUMNS: usize = 1 + 3 * FREQUENCY_CHANNELS;

/// Wind speed conversion from file units (mph) to stored m/s.
/// Folds the site calibration into a single linear factor.
pub const WIND_MPH_TO_MPS: f64 = 0.461055;

/// File and directory naming
pub const RUN_DIR_PREFIX: &str = "Forecasts_";
pub const WIND_FILE_PREFIX: &str = "time_";
pub const ATMOSPHERE_FILE_PREFIX: &str = "time_avrg_";
pub const FORECAST_FILE_EXTENSION: &str = "txt";

/// Timestamp layout shared by run directories and forecast file names.
pub const RUN_STAMP_FORMAT: &str = "%y_%m_%d_%Hh%Mm%Ss";

/// Defaults
pub const DEFAULT_STATION: &str = "HotSprings";
pub const DEFAULT_LOOKBACK_HOURS: i64 = 24;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://cleo-weather.sqlite";

/// Read buffer size for forecast files
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
