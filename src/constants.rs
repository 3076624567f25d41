pub const DEFAULT_API_ROOT: &str = "https://api.getpostman.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const CONFIG_DIR_NAME: &str = "postmanctl";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const CONFIG_PATH_ENV: &str = "POSTMANCTL_CONFIG";
pub const API_KEY_ENV: &str = "POSTMANCTL_API_KEY";

pub const API_KEY_HEADER: &str = "X-Api-Key";
