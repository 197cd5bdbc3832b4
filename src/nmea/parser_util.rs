use chrono::naive::NaiveDate;
use chrono::naive::NaiveTime;

use nom::bytes::complete::take_while1;
use nom::bytes::complete::take_while_m_n;
use nom::character::complete::char;
use nom::character::complete::one_of;
use nom::combinator::all_consuming;
use nom::combinator::map;
use nom::combinator::map_opt;
use nom::combinator::map_res;
use nom::combinator::opt;
use nom::combinator::recognize;
use nom::error::FromExternalError;
use nom::error::ParseError;
use nom::number::complete::recognize_float;
use nom::sequence::preceded;
use nom::sequence::tuple;
use nom::IResult;

use std::num::ParseFloatError;
use std::num::ParseIntError;

#[derive(Clone, Debug, PartialEq)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NorthSouth {
    North,
    South,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EastWest {
    East,
    West,
}

/// Run `parser` over an entire field, `None` when the field is empty or does not parse.
pub(crate) fn field<'a, O, P>(input: Option<&'a str>, parser: P) -> Option<O>
where
    P: FnMut(&'a str) -> IResult<&'a str, O, nom::error::Error<&'a str>>,
{
    let input = input?;

    all_consuming(parser)(input).ok().map(|(_, o)| o)
}

pub(crate) fn is_digit(chr: char) -> bool {
    chr.is_ascii_digit()
}

pub(crate) fn two_digit<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, u32, E> {
    map_res(take_while_m_n(2, 2, is_digit), |i: &str| i.parse())(input)
}

pub(crate) fn three_digit<
    'a,
    E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>,
>(
    input: &'a str,
) -> IResult<&'a str, u32, E> {
    map_res(take_while_m_n(3, 3, is_digit), |i: &str| i.parse())(input)
}

pub(crate) fn four_digit_i<
    'a,
    E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>,
>(
    input: &'a str,
) -> IResult<&'a str, i32, E> {
    map_res(take_while_m_n(4, 4, is_digit), |i: &str| i.parse())(input)
}

pub(crate) fn uint32<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, u32, E> {
    map_res(take_while1(is_digit), |s: &str| s.parse())(input)
}

pub(crate) fn int32<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, i32, E> {
    map_res(
        recognize(preceded(opt(one_of("+-")), take_while1(is_digit))),
        |s: &str| s.parse(),
    )(input)
}

pub(crate) fn flt64<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseFloatError>>(
    input: &'a str,
) -> IResult<&'a str, f64, E> {
    map_res(recognize_float, |s: &str| s.parse())(input)
}

// Sub-second digits are scaled to nanoseconds, digits past the ninth are dropped
fn nanoseconds(digits: &str) -> u32 {
    let mut nanos = 0;

    for (i, d) in digits.bytes().take(9).enumerate() {
        nanos += u32::from(d - b'0') * 10u32.pow(8 - i as u32);
    }

    nanos
}

// Parses times without subseconds: 181813
//
// with centiseconds: 181813.00
//
// or any other number of fractional digits: 181813.123456
//
// A leap second, 235960, becomes second 59 plus a second of nanoseconds
pub(crate) fn time<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, NaiveTime, E> {
    map_opt(
        tuple((
            two_digit,
            two_digit,
            two_digit,
            opt(preceded(char('.'), take_while1(is_digit))),
        )),
        |(hour, minute, second, subsec): (u32, u32, u32, Option<&str>)| {
            let nano = subsec.map(nanoseconds).unwrap_or(0);

            let (second, nano) = match second {
                60 => (59, nano + 1_000_000_000),
                s => (s, nano),
            };

            NaiveTime::from_hms_nano_opt(hour, minute, second, nano)
        },
    )(input)
}

// RMC dates carry a two digit year, 80 through 99 are the 1900s
pub(crate) fn date<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, NaiveDate, E> {
    map_opt(tuple((two_digit, two_digit, two_digit)), |(day, month, year)| {
        let year = if year >= 80 { 1900 + year } else { 2000 + year };

        NaiveDate::from_ymd_opt(year as i32, month, day)
    })(input)
}

pub(crate) fn north_south<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, NorthSouth, E> {
    map(one_of("NS"), |ns| match ns {
        'N' => NorthSouth::North,
        _ => NorthSouth::South,
    })(input)
}

pub(crate) fn east_west<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, EastWest, E> {
    map(one_of("EW"), |ew| match ew {
        'E' => EastWest::East,
        _ => EastWest::West,
    })(input)
}

pub(crate) fn lat<
    'a,
    E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError> + FromExternalError<&'a str, ParseFloatError>,
>(
    input: &'a str,
) -> IResult<&'a str, f64, E> {
    map(tuple((two_digit, flt64)), |(d, m)| f64::from(d) + m / 60.0)(input)
}

pub(crate) fn lon<
    'a,
    E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError> + FromExternalError<&'a str, ParseFloatError>,
>(
    input: &'a str,
) -> IResult<&'a str, f64, E> {
    map(tuple((three_digit, flt64)), |(d, m)| f64::from(d) + m / 60.0)(input)
}

/// Combine the four latitude/longitude fields, `None` unless all four are usable.
pub(crate) fn lat_lon(
    lat_field: Option<&str>,
    ns_field: Option<&str>,
    lon_field: Option<&str>,
    ew_field: Option<&str>,
) -> Option<LatLon> {
    let latitude = field(lat_field, lat)?;
    let ns = field(ns_field, north_south)?;
    let longitude = field(lon_field, lon)?;
    let ew = field(ew_field, east_west)?;

    let latitude = if ns == NorthSouth::North {
        latitude
    } else {
        -latitude
    };

    let longitude = if ew == EastWest::East {
        longitude
    } else {
        -longitude
    };

    Some(LatLon {
        latitude,
        longitude,
    })
}
