use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, space0},
    combinator::{map, opt},
    sequence::preceded,
};

use super::parse::{IResult, ParseError, Span};
use crate::error::{Error, Result};

/// Parses a byte count such as `512`, `64k`, `8KiB` or `2 MB`.
/// `unlimited` and `-1` both give `-1`.
///
/// - Decimal units: `k`/`K`/`KB`, `M`/`MB`, `G`/`GB`.
/// - Binary units: `KiB`, `MiB`, `GiB`.
pub fn parse_byte_size(s: &str) -> Result<i64> {
    match byte_size(Span::new(s.trim())) {
        Ok((rest, n)) if rest.fragment().is_empty() => Ok(n),
        Ok((rest, _)) => Err(Error::from(format!(
            "unexpected '{}' in byte size '{}'",
            rest.fragment(),
            s
        ))),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::from(format!(
            "invalid byte size '{}' at offset {}: {}",
            s,
            e.offset(),
            e.message()
        ))),
        Err(nom::Err::Incomplete(_)) => Err(Error::from(format!("incomplete byte size '{}'", s))),
    }
}

fn byte_size(input: Span) -> IResult<i64> {
    alt((unlimited, sized))(input)
}

fn unlimited(input: Span) -> IResult<i64> {
    map(alt((tag("unlimited"), tag("-1"))), |_| -1)(input)
}

fn sized(input: Span) -> IResult<i64> {
    let (rest, digits) = digit1(input)?;

    let (rest, unit) = opt(preceded(
        space0,
        alt((
            tag("KiB"),
            tag("MiB"),
            tag("GiB"),
            tag("KB"),
            tag("MB"),
            tag("GB"),
            tag("k"),
            tag("K"),
            tag("M"),
            tag("G"),
            tag("B"),
        )),
    ))(rest)?;

    let multiplier: i64 = match unit.map(|u| *u.fragment()) {
        None | Some("B") => 1,
        Some("k") | Some("K") | Some("KB") => 1_000,
        Some("M") | Some("MB") => 1_000_000,
        Some("G") | Some("GB") => 1_000_000_000,
        Some("KiB") => 1 << 10,
        Some("MiB") => 1 << 20,
        Some("GiB") => 1 << 30,
        Some(other) => {
            return Err(nom::Err::Failure(ParseError::new(
                format!("unknown unit '{}'", other),
                input,
            )))
        }
    };

    let too_large = || {
        nom::Err::Failure(ParseError::new(
            "byte size is too large".to_owned(),
            input,
        ))
    };

    let n = digits.fragment().parse::<i64>().map_err(|_| too_large())?;
    let n = n.checked_mul(multiplier).ok_or_else(too_large)?;
    Ok((rest, n))
}
