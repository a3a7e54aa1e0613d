use nom::bytes::complete::take_while1;
use nom::character::complete::space0;
use nom::character::complete::space1;
use nom::combinator::eof;
use nom::combinator::opt;
use nom::number::complete::double;
use nom::sequence::terminated;
use nom::IResult;
use nom::Parser;

/// Parse a row index followed by at least one space.
pub fn index(input: &str) -> IResult<&str, u64> {
    terminated(nom::character::complete::u64, space1).parse(input)
}

/// Parse a k-mer made of ASCII letters.
///
/// Symbols are checked by the model, so that an invalid k-mer is reported
/// as such rather than as a syntax error.
pub fn kmer(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphabetic()).parse(input)
}

/// Parse a complete entry, without its comment.
pub fn entry(input: &str) -> IResult<&str, (Option<u64>, &str, f64)> {
    let (input, _) = space0(input)?;
    let (input, index) = opt(index).parse(input)?;
    let (input, kmer) = kmer(input)?;
    let (input, _) = space1(input)?;
    let (input, value) = double(input)?;
    let (input, _) = terminated(space0, eof).parse(input)?;
    Ok((input, (index, kmer, value)))
}

#[cfg(test)]
mod test {

    #[test]
    fn test_entry() {
        let (rest, entry) = super::entry("ACG 0.125").unwrap();
        assert_eq!(rest, "");
        assert_eq!(entry, (None, "ACG", 0.125));
    }

    #[test]
    fn test_entry_indexed() {
        let (_, entry) = super::entry("  12\tAC\t1e-3  ").unwrap();
        assert_eq!(entry, (Some(12), "AC", 0.001));
    }

    #[test]
    fn test_entry_trailing() {
        assert!(super::entry("AC 0.5 0.25").is_err());
        assert!(super::entry("AC").is_err());
        assert!(super::entry("0.5").is_err());
    }
}
