//! Fixed-field decoding of ENSDF record lines
//!
//! ENSDF data are partially populated more often than not. Every decoder here
//! falls back to zero or an empty string for blank, malformed, or missing
//! fields rather than failing the caller.

// ensdf modules
use ensdf_utils::ColumnExt;

// external crates
use log::trace;

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, digit0, digit1, one_of, space0};
use nom::combinator::{opt, recognize};
use nom::number::complete::double;
use nom::sequence::{pair, preceded, tuple};
use nom::IResult;

/// Reduced Planck constant (eV s) for converting level widths to half-lives
const HBAR: f64 = 6.582119569e-16;

/// Seconds in a year, using 365.25 days
const YEAR: f64 = 365.25 * 86400.0;

/// Column at which free text and continuation data begin
pub(crate) const BODY_START: usize = 10;

/// Field access over the lines of a single record
///
/// The first line is the primary record, anything after it is a continuation
/// record of the same type.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a> {
    lines: &'a [String],
}

impl<'a> Fields<'a> {
    pub(crate) fn new(lines: &'a [String]) -> Self {
        Self { lines }
    }

    /// The primary record line, empty if there are no lines at all
    fn primary(&self) -> &'a str {
        self.lines.first().map(|s| s.as_str()).unwrap_or("")
    }

    /// Numeric value from columns of the primary line
    pub(crate) fn number(&self, start: usize, end: usize) -> f64 {
        parse_number(self.primary().column(start, end))
    }

    /// Trimmed text from columns of the primary line
    pub(crate) fn text(&self, start: usize, end: usize) -> String {
        self.primary().column(start, end).trim().to_string()
    }

    /// Uncertainty on the value in one column range given by another
    pub(crate) fn uncertainty(&self, value: (usize, usize), unc: (usize, usize)) -> f64 {
        let line = self.primary();
        parse_uncertainty(line.column(value.0, value.1), line.column(unc.0, unc.1))
    }

    /// Half-life in seconds from columns of the primary line
    pub(crate) fn half_life(&self, start: usize, end: usize) -> f64 {
        parse_half_life(self.primary().column(start, end))
    }

    /// Value following `label` on any line, up to the `stop` marker
    ///
    /// The label must begin a token, so `KC=` is never found inside `NKC=`.
    /// Returns zero if the label is not present anywhere.
    pub(crate) fn tagged(&self, label: &str, stop: &str) -> f64 {
        self.lines
            .iter()
            .find_map(|line| tagged_value(line.columns_from(BODY_START), label, stop))
            .unwrap_or(0.0)
    }

    /// Whether `label` starts a token anywhere in the record
    pub(crate) fn has_tag(&self, label: &str) -> bool {
        self.lines
            .iter()
            .any(|line| find_token(line.columns_from(BODY_START), label).is_some())
    }
}

/// Parse a numeric field, zero for anything blank or malformed
///
/// Surrounding whitespace and parentheses are ignored and only the leading
/// number is read, so `0+X` is zero and `(1.2)` is 1.2.
///
/// ```rust
/// # use ensdf_decay::decoder::parse_number;
/// assert_eq!(parse_number("  1332.508 "), 1332.508);
/// assert_eq!(parse_number("1.2E-4"), 1.2e-4);
/// assert_eq!(parse_number("0+X"), 0.0);
/// assert_eq!(parse_number(""), 0.0);
/// assert_eq!(parse_number("LT"), 0.0);
/// ```
pub fn parse_number(field: &str) -> f64 {
    let field = strip_field(field);
    match leading_number(field) {
        Ok((_, value)) if value.is_finite() => value,
        _ => {
            if !field.is_empty() {
                trace!("Could not read a number from \"{field}\", using 0");
            }
            0.0
        }
    }
}

/// Parse a half-life field into seconds
///
/// The value is followed by a unit code. Level widths (`EV`, `KEV`, `MEV`)
/// are converted using T = ħ ln2 / Γ. A `STABLE` field is infinite, and
/// anything unrecognised is zero.
///
/// ```rust
/// # use ensdf_decay::decoder::parse_half_life;
/// assert_eq!(parse_half_life("10 M"), 600.0);
/// assert!((parse_half_life("2.5 MS") - 2.5e-3).abs() < 1e-15);
/// assert_eq!(parse_half_life("STABLE"), f64::INFINITY);
/// assert_eq!(parse_half_life("1.0 FORTNIGHTS"), 0.0);
/// ```
pub fn parse_half_life(field: &str) -> f64 {
    let field = strip_field(field).to_uppercase();

    if field.starts_with("STABLE") {
        return f64::INFINITY;
    }

    let (value, unit) = match value_with_unit(&field) {
        Ok((_, parsed)) => parsed,
        Err(_) => return 0.0,
    };

    let seconds = match unit {
        "Y" => value * YEAR,
        "D" => value * 86400.0,
        "H" => value * 3600.0,
        "M" => value * 60.0,
        "S" => value,
        "MS" => value * 1e-3,
        "US" => value * 1e-6,
        "NS" => value * 1e-9,
        "PS" => value * 1e-12,
        "FS" => value * 1e-15,
        "AS" => value * 1e-18,
        "EV" => width_to_half_life(value),
        "KEV" => width_to_half_life(value * 1e3),
        "MEV" => width_to_half_life(value * 1e6),
        _ => {
            trace!("Unknown half-life unit \"{unit}\" in \"{field}\"");
            0.0
        }
    };

    if seconds.is_finite() {
        seconds
    } else {
        0.0
    }
}

/// Parse an uncertainty given in units of the last digits of the value
///
/// For example, `97.474` with an uncertainty of `5` is 97.474 +/- 0.005.
/// Asymmetric uncertainties (`+5-3`) use the larger of the two. Limits and
/// other non-numeric codes (`LT`, `AP`, `SY`, ...) are zero.
///
/// ```rust
/// # use ensdf_decay::decoder::parse_uncertainty;
/// assert!((parse_uncertainty("97.474", "5") - 0.005).abs() < 1e-15);
/// assert!((parse_uncertainty("1.2E-4", "3") - 0.3e-4).abs() < 1e-18);
/// assert!((parse_uncertainty("1332", "12") - 12.0).abs() < 1e-12);
/// assert!((parse_uncertainty("0.57", "+5-8") - 0.08).abs() < 1e-15);
/// assert_eq!(parse_uncertainty("0.57", "LT"), 0.0);
/// ```
pub fn parse_uncertainty(value: &str, uncertainty: &str) -> f64 {
    let (decimals, exponent) = match mantissa_digits(strip_field(value)) {
        Ok((_, parsed)) => parsed,
        Err(_) => return 0.0,
    };

    let digits = match uncertainty_digits(strip_field(uncertainty)) {
        Ok((_, digits)) => digits,
        Err(_) => return 0.0,
    };

    digits * 10f64.powi(exponent - decimals)
}

/// Value of a `label` token in free text, read up to the `stop` marker
fn tagged_value(text: &str, label: &str, stop: &str) -> Option<f64> {
    let idx = find_token(text, label)?;
    let rest = &text[idx + label.len()..];
    let value = match (stop.is_empty(), rest.find(stop)) {
        (false, Some(end)) => &rest[..end],
        _ => rest,
    };
    Some(parse_number(value))
}

/// Byte index of `label` where it begins a token
fn find_token(text: &str, label: &str) -> Option<usize> {
    text.match_indices(label)
        .map(|(idx, _)| idx)
        .find(|&idx| {
            text[..idx]
                .chars()
                .next_back()
                .map_or(true, |c| c == ' ' || c == '$')
        })
}

/// Strip whitespace and enclosing parentheses from a field
fn strip_field(field: &str) -> &str {
    field
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim()
}

/// T1/2 = hbar * ln2 / width
fn width_to_half_life(width_ev: f64) -> f64 {
    if width_ev > 0.0 {
        HBAR * std::f64::consts::LN_2 / width_ev
    } else {
        0.0
    }
}

/// Leading floating point value, ignoring preceding whitespace
fn leading_number(i: &str) -> IResult<&str, f64> {
    preceded(space0, double)(i)
}

/// Value followed by an alphabetic unit code
fn value_with_unit(i: &str) -> IResult<&str, (f64, &str)> {
    let (i, value) = leading_number(i)?;
    let (i, _) = space0(i)?;
    let (i, unit) = alpha1(i)?;
    Ok((i, (value, unit)))
}

/// Number of decimal places and the exponent of a numeric value
fn mantissa_digits(i: &str) -> IResult<&str, (i32, i32)> {
    let (i, _) = opt(one_of("+-"))(i)?;
    let (i, _) = digit0(i)?;
    let (i, fraction) = opt(preceded(tag("."), digit0))(i)?;
    let (i, exponent) = opt(preceded(
        one_of("eE"),
        recognize(pair(opt(one_of("+-")), digit1)),
    ))(i)?;

    let decimals = fraction.map_or(0, |f| f.len() as i32);
    let exponent = exponent.and_then(|e| e.parse().ok()).unwrap_or(0);
    Ok((i, (decimals, exponent)))
}

/// Uncertainty digits, taking the larger side of an asymmetric pair
fn uncertainty_digits(i: &str) -> IResult<&str, f64> {
    alt((asymmetric_digits, unsigned_digits))(i)
}

fn unsigned_digits(i: &str) -> IResult<&str, f64> {
    let (i, digits) = digit1(i)?;
    Ok((i, digits.parse().unwrap_or(0.0)))
}

fn asymmetric_digits(i: &str) -> IResult<&str, f64> {
    let (i, (_, upper, _, lower)) = tuple((tag("+"), digit1, tag("-"), digit1))(i)?;
    let upper: f64 = upper.parse().unwrap_or(0.0);
    let lower: f64 = lower.parse().unwrap_or(0.0);
    Ok((i, upper.max(lower)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::card;
    use rstest::rstest;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case("  1332.508 ", 1332.508)]
    #[case("(1.5)", 1.5)]
    #[case(".57", 0.57)]
    #[case("100", 100.0)]
    #[case("-0.25", -0.25)]
    #[case("2.0E+3", 2000.0)]
    #[case("0+X", 0.0)]
    #[case("", 0.0)]
    #[case("   ", 0.0)]
    #[case("AP", 0.0)]
    #[case("NAN", 0.0)]
    #[case("INF", 0.0)]
    fn numbers(#[case] field: &str, #[case] expected: f64) {
        assert_eq!(parse_number(field), expected);
    }

    #[rstest]
    #[case("5.2714 Y", 5.2714 * YEAR)]
    #[case("70.86 D", 70.86 * 86400.0)]
    #[case("1.5 H", 5400.0)]
    #[case("10 S", 10.0)]
    #[case("3 US", 3e-6)]
    #[case("0.9 PS ", 0.9e-12)]
    #[case("12 FS", 12e-15)]
    #[case("", 0.0)]
    #[case("1.0", 0.0)]
    fn half_lives(#[case] field: &str, #[case] expected: f64) {
        let value = parse_half_life(field);
        assert!((value - expected).abs() <= expected.abs() * 1e-12);
    }

    #[test]
    fn widths_to_half_lives() {
        let t = parse_half_life("1.0 EV");
        assert!((t - HBAR * std::f64::consts::LN_2).abs() < 1e-25);

        let t = parse_half_life("1.0 KEV");
        assert!((t - HBAR * std::f64::consts::LN_2 * 1e-3).abs() < 1e-28);

        assert_eq!(parse_half_life("0 EV"), 0.0);
    }

    #[rstest]
    #[case("97.474", "5", 0.005)]
    #[case("18.7", "9", 0.9)]
    #[case("100", "2", 2.0)]
    #[case("0.0001682", "24", 0.0000024)]
    #[case("1.2E-4", "3", 0.3e-4)]
    #[case("5.0E2", "1", 10.0)]
    #[case("0.57", "+5-8", 0.08)]
    #[case("0.57", "", 0.0)]
    #[case("0.57", "SY", 0.0)]
    #[case("", "5", 5.0)]
    fn uncertainties(#[case] value: &str, #[case] unc: &str, #[case] expected: f64) {
        assert!((parse_uncertainty(value, unc) - expected).abs() < 1e-12);
    }

    #[test]
    fn tagged_values() {
        let record = lines(&[
            " 60NI  G 1173.228  3 99.85   3 E2(+M3)  -0.0025 22 1.68E-4 ",
            " 60NI2 G KC=1.506E-4 21$LC=1.51E-5 3$MC=2.06E-6 3",
            " 60NI3 G IPC=5.0E-6$NKC=9",
        ]);
        let fields = Fields::new(&record);

        assert_eq!(fields.tagged("KC=", "$"), 1.506e-4);
        assert_eq!(fields.tagged("LC=", "$"), 1.51e-5);
        assert_eq!(fields.tagged("MC=", "$"), 2.06e-6);
        assert_eq!(fields.tagged("IPC=", "$"), 5.0e-6);
        assert_eq!(fields.tagged("L1C=", "$"), 0.0);
        assert!(fields.has_tag("MC="));
        assert!(!fields.has_tag("CC="));
    }

    #[test]
    fn token_must_start_a_word() {
        assert_eq!(tagged_value("NKC=9", "KC=", "$"), None);
        assert_eq!(tagged_value("X$KC=9", "KC=", "$"), Some(9.0));
        assert_eq!(tagged_value("KC=9 1$LC=2", "KC=", "$"), Some(9.0));
        assert_eq!(tagged_value("KC=9 1$LC=2", "KC=", ""), Some(9.0));
    }

    #[test]
    fn primary_fields() {
        let record = vec![card(&[
            (1, " 60CO"),
            (8, "P"),
            (10, "0.0"),
            (22, "5+"),
            (40, "5.2714 Y"),
            (50, "5"),
            (65, "2822.81"),
            (75, "21"),
        ])];
        let fields = Fields::new(&record);

        assert_eq!(fields.number(10, 19), 0.0);
        assert_eq!(fields.text(22, 39), "5+");
        assert!((fields.half_life(40, 49) - 5.2714 * YEAR).abs() < 1.0);
        assert_eq!(fields.number(65, 74), 2822.81);
        assert!((fields.uncertainty((65, 74), (75, 76)) - 0.21).abs() < 1e-12);
    }

    #[test]
    fn no_lines_at_all() {
        let record: Vec<String> = Vec::new();
        let fields = Fields::new(&record);

        assert_eq!(fields.number(10, 19), 0.0);
        assert_eq!(fields.text(10, 19), "");
        assert_eq!(fields.tagged("KC=", "$"), 0.0);
    }
}
