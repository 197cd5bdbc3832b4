mod codec;
mod error;
pub(crate) mod parser_util;
mod sentence;
mod sentence_parser;
pub mod ser;

pub use codec::Frame;
pub use codec::Line;
pub use codec::LineCodec;
pub use codec::State;
pub use codec::DEFAULT_MAX_LINE_LENGTH;
pub use error::FieldError;
pub use error::ParseError;
pub use parser_util::LatLon;
pub use sentence::GgaData;
pub use sentence::GsvData;
pub use sentence::ModeIndicator;
pub use sentence::RmcData;
pub use sentence::RmcStatus;
pub use sentence::SatelliteView;
pub use sentence::Sentence;
pub use sentence::VendorData;
pub use sentence::ZdaData;
pub use sentence_parser::parse_line;
pub use sentence_parser::SentenceRecord;
pub use sentence_parser::Talker;

#[cfg(test)]
mod test_codec;

#[cfg(test)]
mod test_parser_util;

#[cfg(test)]
mod test_sentence;

#[cfg(test)]
mod test_sentence_parser;

#[cfg(test)]
mod test_ser;
