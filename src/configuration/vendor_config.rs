use crate::configuration::ConfigurationError;
use crate::gpsdo::Alarms;
use crate::nmea::SentenceRecord;

use serde::Deserialize;

use std::collections::BTreeMap;

fn default_active() -> String {
    "1".to_string()
}

/// A field that raises a flag when it equals `active`
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct FlagField {
    pub field: usize,
    #[serde(default = "default_active")]
    pub active: String,
}

impl FlagField {
    /// `None` when the field is missing or empty
    pub fn is_active(&self, record: &SentenceRecord) -> Option<bool> {
        record.field(self.field).map(|v| v == self.active)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct AlarmField {
    pub flag: Alarms,
    pub field: usize,
    #[serde(default = "default_active")]
    pub active: String,
}

impl AlarmField {
    pub fn is_active(&self, record: &SentenceRecord) -> Option<bool> {
        record.field(self.field).map(|v| v == self.active)
    }
}

/// Where the status values live in a device specific sentence.
///
/// Field indexes count the address as field 0.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct VendorConfig {
    pub address: String,
    /// Field count including the address
    pub fields: usize,
    pub locked: Option<FlagField>,
    pub holdover: Option<usize>,
    pub leap: Option<usize>,
    #[serde(default)]
    pub alarms: Vec<AlarmField>,
    #[serde(default)]
    pub extra: BTreeMap<String, usize>,
}

impl VendorConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let indexes = self
            .locked
            .iter()
            .map(|l| l.field)
            .chain(self.holdover)
            .chain(self.leap)
            .chain(self.alarms.iter().map(|a| a.field))
            .chain(self.extra.values().copied());

        for field in indexes {
            if field == 0 || field >= self.fields {
                return Err(ConfigurationError::InvalidVendorField {
                    address: self.address.clone(),
                    field,
                    fields: self.fields,
                });
            }
        }

        Ok(())
    }
}
