pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Rows per bulk insert during imports
pub const DEFAULT_BATCH_SIZE: usize = 50;

pub const DEFAULT_COUNTRY: &str = "Россия";

/// 20 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_LOGS_DIR: &str = "./logs";
