use serde::ser;
use serde::ser::Serialize;

use std::fmt;
use std::fmt::Display;

pub type NResult<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Message(String),
    Unsupported(&'static str),
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(msg) => formatter.write_str(msg),
            Error::Unsupported(kind) => write!(formatter, "cannot write {} as NMEA", kind),
        }
    }
}

impl std::error::Error for Error {}

/// Writes a struct as an NMEA sentence body.
///
/// The struct name is the address and each field follows a comma.  `None` fields are empty.
pub struct ToNMEA {
    output: String,
}

pub fn to_string<T>(value: &T) -> NResult<String>
where
    T: Serialize,
{
    let mut serializer = ToNMEA {
        output: String::new(),
    };

    value.serialize(&mut serializer)?;
    Ok(serializer.output)
}

/// Serialize `value` as a complete line: `$`, body, `*`, checksum, CR LF.
pub fn to_sentence<T>(value: &T) -> NResult<String>
where
    T: Serialize,
{
    let message = to_string(value)?;

    Ok(frame(&message))
}

pub fn frame(message: &str) -> String {
    let checksum = message.bytes().fold(0, |c, b| c ^ b);

    format!("${}*{:02X}\r\n", message, checksum)
}

impl<'a> ser::Serializer for &'a mut ToNMEA {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = ser::Impossible<(), Error>;
    type SerializeTuple = ser::Impossible<(), Error>;
    type SerializeTupleStruct = ser::Impossible<(), Error>;
    type SerializeTupleVariant = ser::Impossible<(), Error>;
    type SerializeMap = ser::Impossible<(), Error>;
    type SerializeStruct = Self;
    type SerializeStructVariant = ser::Impossible<(), Error>;

    fn serialize_bool(self, v: bool) -> NResult<()> {
        self.output += if v { "1" } else { "0" };

        Ok(())
    }

    fn serialize_i8(self, v: i8) -> NResult<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> NResult<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> NResult<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> NResult<()> {
        self.output += &v.to_string();

        Ok(())
    }

    fn serialize_u8(self, v: u8) -> NResult<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> NResult<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> NResult<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> NResult<()> {
        self.output += &v.to_string();

        Ok(())
    }

    fn serialize_f32(self, v: f32) -> NResult<()> {
        self.output += &v.to_string();

        Ok(())
    }

    fn serialize_f64(self, v: f64) -> NResult<()> {
        self.output += &v.to_string();

        Ok(())
    }

    fn serialize_char(self, v: char) -> NResult<()> {
        self.output.push(v);

        Ok(())
    }

    fn serialize_str(self, v: &str) -> NResult<()> {
        self.output += v;

        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> NResult<()> {
        Err(Error::Unsupported("bytes"))
    }

    fn serialize_none(self) -> NResult<()> {
        Ok(())
    }

    fn serialize_some<T>(self, v: &T) -> NResult<()>
    where
        T: ?Sized + Serialize,
    {
        v.serialize(self)
    }

    fn serialize_unit(self) -> NResult<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> NResult<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> NResult<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, v: &T) -> NResult<()>
    where
        T: ?Sized + Serialize,
    {
        v.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _v: &T,
    ) -> NResult<()>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::Unsupported("newtype variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> NResult<Self::SerializeSeq> {
        Err(Error::Unsupported("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> NResult<Self::SerializeTuple> {
        Err(Error::Unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> NResult<Self::SerializeTupleStruct> {
        Err(Error::Unsupported("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> NResult<Self::SerializeTupleVariant> {
        Err(Error::Unsupported("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> NResult<Self::SerializeMap> {
        Err(Error::Unsupported("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> NResult<Self::SerializeStruct> {
        self.output += name;

        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> NResult<Self::SerializeStructVariant> {
        Err(Error::Unsupported("struct variant"))
    }
}

impl<'a> ser::SerializeStruct for &'a mut ToNMEA {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, _k: &'static str, v: &T) -> NResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.output += ",";

        v.serialize(&mut **self)
    }

    fn end(self) -> NResult<()> {
        Ok(())
    }
}
