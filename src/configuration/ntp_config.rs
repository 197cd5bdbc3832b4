use serde::Deserialize;

/// NTP shared memory refclock settings
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct NtpConfig {
    /// ntpd `server 127.127.28.UNIT`
    #[serde(default)]
    pub unit: i32,
    /// Clock precision as a power of two seconds
    #[serde(default = "default_precision")]
    pub precision: i32,
    #[serde(default = "default_mode")]
    pub mode: i32,
}

fn default_precision() -> i32 {
    -7
}

fn default_mode() -> i32 {
    1
}

impl Default for NtpConfig {
    fn default() -> Self {
        NtpConfig {
            unit: 0,
            precision: default_precision(),
            mode: default_mode(),
        }
    }
}
