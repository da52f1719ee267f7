/// Extends string types with fixed-column access
///
/// Fixed-format records describe fields by 1-based, inclusive column ranges.
/// Real files are frequently truncated where trailing fields are blank, so
/// every method here clamps to the available text rather than failing.
pub trait ColumnExt {
    /// Text between 1-based inclusive columns `start` and `end`
    ///
    /// Anything beyond the end of the line is treated as blank, and an empty
    /// slice is returned for ranges that are entirely out of bounds.
    ///
    /// ```rust
    /// # use ensdf_utils::ColumnExt;
    /// let line = " 60NI  L 1332.508  4";
    /// assert_eq!(line.column(1, 5), " 60NI");
    /// assert_eq!(line.column(10, 19), "1332.508  ");
    ///
    /// // Truncated lines are not a problem
    /// assert_eq!(line.column(18, 30), "  4");
    /// assert_eq!(line.column(40, 49), "");
    /// ```
    fn column(&self, start: usize, end: usize) -> &str;

    /// Character at a 1-based column, or a space if the line is too short
    ///
    /// ```rust
    /// # use ensdf_utils::ColumnExt;
    /// let line = " 60NI  L 1332.508";
    /// assert_eq!(line.column_char(8), 'L');
    /// assert_eq!(line.column_char(80), ' ');
    /// ```
    fn column_char(&self, col: usize) -> char;

    /// Everything from a 1-based column to the end of the line
    ///
    /// ```rust
    /// # use ensdf_utils::ColumnExt;
    /// let line = "221FR T        97.474";
    /// assert_eq!(line.columns_from(10), "      97.474");
    /// ```
    fn columns_from(&self, start: usize) -> &str;
}

impl<T: AsRef<str>> ColumnExt for T {
    fn column(&self, start: usize, end: usize) -> &str {
        let s = self.as_ref();
        let start = start.max(1) - 1;
        let end = end.min(s.len());
        if start >= end {
            return "";
        }
        s.get(start..end).unwrap_or("")
    }

    fn column_char(&self, col: usize) -> char {
        self.column(col, col).chars().next().unwrap_or(' ')
    }

    fn columns_from(&self, start: usize) -> &str {
        let s = self.as_ref();
        s.get(start.max(1) - 1..).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 3, "abc")]
    #[case(3, 3, "c")]
    #[case(4, 10, "de")]
    #[case(6, 10, "")]
    #[case(0, 2, "ab")]
    #[case(3, 2, "")]
    fn column_ranges(#[case] start: usize, #[case] end: usize, #[case] expected: &str) {
        assert_eq!("abcde".column(start, end), expected);
    }

    #[test]
    fn column_chars() {
        assert_eq!("abcde".column_char(1), 'a');
        assert_eq!("abcde".column_char(5), 'e');
        assert_eq!("abcde".column_char(6), ' ');
        assert_eq!(String::new().column_char(1), ' ');
    }

    #[test]
    fn columns_from_past_end() {
        assert_eq!("abc".columns_from(2), "bc");
        assert_eq!("abc".columns_from(4), "");
        assert_eq!("abc".columns_from(9), "");
    }
}
