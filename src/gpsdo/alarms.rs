use serde::de;
use serde::ser::SerializeSeq;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use std::str::FromStr;

bitflags! {
    /// Alarm conditions reported by the GPSDO
    #[derive(Default)]
    pub struct Alarms: u8 {
        /// 10 MHz oscillator not disciplined
        const OSCILLATOR = 0x01;
        /// 1PPS output missing or out of tolerance
        const PPS = 0x02;
        /// antenna open or shorted
        const ANTENNA = 0x04;
        const HOLDOVER = 0x08;
        /// position survey in progress
        const SURVEY = 0x10;
    }
}

const NAMES: [(Alarms, &str); 5] = [
    (Alarms::OSCILLATOR, "oscillator"),
    (Alarms::PPS, "pps"),
    (Alarms::ANTENNA, "antenna"),
    (Alarms::HOLDOVER, "holdover"),
    (Alarms::SURVEY, "survey"),
];

impl Alarms {
    /// Lowercase names of the raised flags
    pub fn names(&self) -> Vec<&'static str> {
        NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl FromStr for Alarms {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(flag, _)| *flag)
            .ok_or_else(|| format!("unknown alarm {:?}", name))
    }
}

impl Serialize for Alarms {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let names = self.names();

        let mut seq = serializer.serialize_seq(Some(names.len()))?;

        for name in names {
            seq.serialize_element(name)?;
        }

        seq.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Names {
    One(String),
    Many(Vec<String>),
}

/// Reads one name, as in `[[vendor]]` alarm fields, or a list of names as serialized
impl<'de> Deserialize<'de> for Alarms {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = match Names::deserialize(deserializer)? {
            Names::One(name) => vec![name],
            Names::Many(names) => names,
        };

        names.iter().try_fold(Alarms::empty(), |alarms, name| {
            name.parse::<Alarms>()
                .map(|flag| alarms | flag)
                .map_err(de::Error::custom)
        })
    }
}
