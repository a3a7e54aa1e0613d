use generic_array::typenum::U4;
use generic_array::GenericArray;
use nom::bytes::complete::tag;
use nom::character::complete::line_ending;
use nom::character::complete::not_line_ending;
use nom::character::complete::space0;
use nom::character::complete::space1;
use nom::multi::separated_list1;
use nom::number::complete::double;
use nom::sequence::delimited;
use nom::sequence::preceded;
use nom::sequence::terminated;
use nom::IResult;
use nom::Parser;

use bgmotif::err::InvalidData;

/// Parse a `>name version` header line.
pub fn header(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, line) = terminated(preceded(tag(">"), not_line_ending), line_ending).parse(input)?;
    let line = line.trim();
    let (name, version) = match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim()),
        None => (line, ""),
    };
    Ok((input, (name, version)))
}

/// Parse a line of whitespace-separated weights.
pub fn weights(input: &str) -> IResult<&str, Vec<f64>> {
    delimited(
        space0,
        separated_list1(space1, double),
        terminated(space0, line_ending),
    )
    .parse(input)
}

/// Parse a header followed by the weights of `A`, `C`, `G` and `T`.
pub fn record(input: &str) -> IResult<&str, ((&str, &str), GenericArray<Vec<f64>, U4>)> {
    let (input, header) = header(input)?;
    let (input, a) = weights(input)?;
    let (input, c) = weights(input)?;
    let (input, g) = weights(input)?;
    let (input, t) = weights(input)?;
    Ok((input, (header, GenericArray::from([a, c, g, t]))))
}

/// Transpose per-symbol weights into per-position columns.
pub fn build_columns(rows: GenericArray<Vec<f64>, U4>) -> Result<Vec<[f32; 4]>, InvalidData> {
    let length = rows[0].len();
    if rows.iter().any(|row| row.len() != length) {
        return Err(InvalidData);
    }
    let mut columns = vec![[0.0; 4]; length];
    for (j, row) in rows.iter().enumerate() {
        for (column, &w) in columns.iter_mut().zip(row) {
            column[j] = w as f32;
        }
    }
    Ok(columns)
}
