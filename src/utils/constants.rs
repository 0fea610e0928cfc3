/// Master and split CSV column names
pub const COL_STATE: &str = "State";
pub const COL_DISTRICT: &str = "District";
pub const COL_BLOCK: &str = "Block";
pub const COL_DATE: &str = "Date";
pub const COL_RAINFALL: &str = "Rainfall";
pub const COL_MAX_TEMPERATURE: &str = "Max_Temperature";
pub const COL_MIN_TEMPERATURE: &str = "Min_Temperature";

pub const MASTER_COLUMNS: [&str; 7] = [
    COL_STATE,
    COL_DISTRICT,
    COL_BLOCK,
    COL_DATE,
    COL_RAINFALL,
    COL_MAX_TEMPERATURE,
    COL_MIN_TEMPERATURE,
];

pub const RAINFALL_COLUMNS: [&str; 5] =
    [COL_STATE, COL_DISTRICT, COL_BLOCK, COL_DATE, COL_RAINFALL];

pub const TEMPERATURE_COLUMNS: [&str; 6] = [
    COL_STATE,
    COL_DISTRICT,
    COL_BLOCK,
    COL_DATE,
    COL_MAX_TEMPERATURE,
    COL_MIN_TEMPERATURE,
];

/// Variable tokens written by the splitter
pub const RAINFALL_TOKEN: &str = "Rainfall";
pub const TEMPERATURE_TOKEN: &str = "Temperature";

/// Filename grammar
pub const TOKEN_SEPARATOR: char = '_';
pub const MIN_FILENAME_TOKENS: usize = 4;
pub const SINCE_PREFIX: &str = "since";
pub const TEMP_ABBREVIATION: &str = "Temp";
pub const TEMP_FULL: &str = "Temperature";

/// File extensions
pub const CSV_EXTENSIONS: [&str; 1] = ["csv"];
pub const IMAGE_EXTENSIONS: [&str; 2] = ["png", "jpg"];

/// Directory names
pub const MET_DIR: &str = "Met";
pub const MET_VARIABLES_DIR: &str = "Meteorological Variables";
pub const MARKET_DIR: &str = "Market";
pub const QUALITY_DIR: &str = "Quality";

/// Sidecar manifest
pub const MANIFEST_FILE: &str = "index.json";
pub const MANIFEST_VERSION: u32 = 1;

/// Config
pub const CONFIG_FILE: &str = "basmati-atlas.toml";
pub const ENV_PREFIX: &str = "BASMATI";
