use crate::f;

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// Display the contained value, or a dash for `None`
    ///
    /// Generic over anything that implements `Display`. Useful for optional
    /// links between records, such as a gamma transition that could not be
    /// matched to a final level.
    ///
    /// ```rust
    /// # use ensdf_utils::OptionExt;
    /// let x: Option<u32> = Some(2);
    /// assert_eq!(x.display(), "2");
    ///
    /// let x: Option<u32> = None;
    /// assert_eq!(x.display(), "-");
    /// ```
    fn display(&self) -> String;

    /// Display the contained value, or the fallback text provided
    ///
    /// ```rust
    /// # use ensdf_utils::OptionExt;
    /// let x: Option<f64> = None;
    /// assert_eq!(x.display_or("unresolved"), "unresolved");
    /// ```
    fn display_or(&self, fallback: &str) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display(&self) -> String {
        self.display_or("-")
    }

    fn display_or(&self, fallback: &str) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => fallback.to_string(),
        }
    }
}
