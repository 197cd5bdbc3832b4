use serde::Deserialize;

pub const DEFAULT_HTTP_PORT: u16 = 24601;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct HttpConfig {
    pub bind_address: String,
}

impl HttpConfig {
    pub fn localhost(port: u16) -> Self {
        HttpConfig {
            bind_address: format!("127.0.0.1:{}", port),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig::localhost(DEFAULT_HTTP_PORT)
    }
}
