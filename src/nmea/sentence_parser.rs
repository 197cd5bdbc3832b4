use crate::nmea::Line;
use crate::nmea::ParseError;

use nom::bytes::complete::take_till;
use nom::bytes::complete::take_while_m_n;
use nom::character::complete::char;
use nom::combinator::all_consuming;
use nom::combinator::map_res;
use nom::sequence::preceded;
use nom::sequence::separated_pair;
use nom::IResult;

use serde::Serialize;

use std::time::Duration;

use tracing::trace;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Talker {
    BeiDou,
    Combination,
    GLONASS,
    GPS,
    Galileo,
    /// Manufacturer code of a `P` sentence
    Proprietary(String),
    Unknown(String),
}

impl Talker {
    fn from_code(code: &str) -> Self {
        match code {
            "BD" | "GB" => Talker::BeiDou,
            "GA" => Talker::Galileo,
            "GL" => Talker::GLONASS,
            "GN" => Talker::Combination,
            "GP" => Talker::GPS,
            _ => Talker::Unknown(code.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Talker::BeiDou => "GB",
            Talker::Combination => "GN",
            Talker::GLONASS => "GL",
            Talker::GPS => "GP",
            Talker::Galileo => "GA",
            Talker::Proprietary(c) => c,
            Talker::Unknown(c) => c,
        }
    }
}

/// One checksum-validated line from the device.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SentenceRecord {
    pub talker: Talker,
    pub sentence_type: String,
    /// Comma separated fields, starting with the address
    pub fields: Vec<String>,
    /// The line exactly as received, without terminator
    pub raw: String,
    pub checksum_valid: bool,
    pub received: Duration,
}

impl SentenceRecord {
    /// The address field, such as `GPZDA` or `PTPSTS`
    pub fn address(&self) -> &str {
        &self.fields[0]
    }

    /// Field `index`, or `None` if it is missing or empty
    pub fn field(&self, index: usize) -> Option<&str> {
        match self.fields.get(index) {
            Some(f) if !f.is_empty() => Some(f.as_str()),
            _ => None,
        }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_proprietary(&self) -> bool {
        matches!(self.talker, Talker::Proprietary(_))
    }
}

type NomError<'a> = nom::error::Error<&'a str>;

fn checksum(input: &str) -> IResult<&str, u8, NomError<'_>> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()), |h| {
        u8::from_str_radix(h, 16)
    })(input)
}

fn sentence(input: &str) -> IResult<&str, (&str, u8), NomError<'_>> {
    all_consuming(preceded(
        char('$'),
        separated_pair(take_till(|c| c == '*'), char('*'), checksum),
    ))(input)
}

fn classify(address: &str) -> Option<(Talker, String)> {
    if address.len() < 3 || !address.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    if let Some(rest) = address.strip_prefix('P') {
        let split = rest.len().min(3);
        let (manufacturer, sentence_type) = rest.split_at(split);

        return Some((
            Talker::Proprietary(manufacturer.to_string()),
            sentence_type.to_string(),
        ));
    }

    let (talker, sentence_type) = address.split_at(2);

    Some((Talker::from_code(talker), sentence_type.to_string()))
}

/// Validate and split one line.
///
/// The checksum is the XOR of every byte between `$` and `*` and must match the two hex digits
/// after `*`.
pub fn parse_line(line: &Line) -> Result<SentenceRecord, ParseError> {
    let raw = line.text.as_str();

    let (payload, given) = match sentence(raw) {
        Ok((_, parsed)) => parsed,
        Err(_) => return Err(ParseError::Malformed(raw.to_string())),
    };

    let calculated = payload.bytes().fold(0, |c, b| c ^ b);

    if given != calculated {
        trace!(
            "invalid checksum for \"{}\" ({:02X} != {:02X})",
            payload,
            given,
            calculated
        );

        return Err(ParseError::Checksum {
            message: payload.to_string(),
            given,
            calculated,
        });
    }

    let fields: Vec<String> = payload.split(',').map(String::from).collect();

    let (talker, sentence_type) = match classify(&fields[0]) {
        Some(c) => c,
        None => return Err(ParseError::Malformed(raw.to_string())),
    };

    trace!("parsed \"{}\" (checksum OK)", payload);

    Ok(SentenceRecord {
        talker,
        sentence_type,
        fields,
        raw: raw.to_string(),
        checksum_valid: true,
        received: line.received,
    })
}
