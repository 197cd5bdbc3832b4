use crate::configuration::ConfigurationError;
use crate::nmea::DEFAULT_MAX_LINE_LENGTH;

use serde::Deserialize;

use std::convert::TryFrom;
use std::time::Duration;

use tokio_serial::DataBits;
use tokio_serial::FlowControl;
use tokio_serial::Parity;
use tokio_serial::SerialPortBuilder;
use tokio_serial::StopBits;

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_INACTIVITY_TIMEOUT: u64 = 10;

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct GpsdoConfig {
    pub device: Option<String>,
    pub baud_rate: Option<u32>,
    pub framing: Option<String>,
    pub flow_control: Option<String>,
    /// Seconds without a line before the GPSDO is considered silent
    pub inactivity_timeout: Option<u64>,
    pub max_line_length: Option<usize>,
}

impl GpsdoConfig {
    pub fn device(&self) -> Result<&str, ConfigurationError> {
        self.device
            .as_deref()
            .ok_or(ConfigurationError::MissingDevice)
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(
            self.inactivity_timeout
                .unwrap_or(DEFAULT_INACTIVITY_TIMEOUT),
        )
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length.unwrap_or(DEFAULT_MAX_LINE_LENGTH)
    }
}

fn framing(f: &str) -> Result<(DataBits, Parity, StopBits), ConfigurationError> {
    let chars: Vec<char> = f.chars().collect();

    if chars.len() != 3 {
        return Err(ConfigurationError::InvalidFraming(f.to_string()));
    }

    let data_bits = match chars[0] {
        '8' => DataBits::Eight,
        '7' => DataBits::Seven,
        '6' => DataBits::Six,
        '5' => DataBits::Five,
        c => return Err(ConfigurationError::InvalidDataBits(c)),
    };

    let parity = match chars[1] {
        'N' => Parity::None,
        'O' => Parity::Odd,
        'E' => Parity::Even,
        c => return Err(ConfigurationError::InvalidParity(c)),
    };

    let stop_bits = match chars[2] {
        '1' => StopBits::One,
        '2' => StopBits::Two,
        c => return Err(ConfigurationError::InvalidStopBits(c)),
    };

    Ok((data_bits, parity, stop_bits))
}

fn flow_control(f: &str) -> Result<FlowControl, ConfigurationError> {
    match f {
        "H" => Ok(FlowControl::Hardware),
        "S" => Ok(FlowControl::Software),
        "N" => Ok(FlowControl::None),
        _ => Err(ConfigurationError::InvalidFlowControl(f.to_string())),
    }
}

impl TryFrom<&GpsdoConfig> for SerialPortBuilder {
    type Error = ConfigurationError;

    fn try_from(config: &GpsdoConfig) -> Result<SerialPortBuilder, ConfigurationError> {
        let device = config.device()?;
        let baud_rate = config.baud_rate.unwrap_or(DEFAULT_BAUD_RATE);

        let (data_bits, parity, stop_bits) = match &config.framing {
            Some(f) => framing(f)?,
            None => (DataBits::Eight, Parity::None, StopBits::One),
        };

        let flow_control = match &config.flow_control {
            Some(f) => flow_control(f)?,
            None => FlowControl::None,
        };

        Ok(tokio_serial::new(device, baud_rate)
            .data_bits(data_bits)
            .flow_control(flow_control)
            .parity(parity)
            .stop_bits(stop_bits)
            .timeout(Duration::from_millis(1)))
    }
}
