/// Extends string types with useful functions
pub trait StringExt {
    /// Capitalises the first letter and lowercases the rest
    ///
    /// Element symbols in ENSDF NUCIDs are upper case (`NI`, `CO`), whereas
    /// display names use the usual chemical notation.
    ///
    /// ```rust
    /// # use ensdf_utils::StringExt;
    /// assert_eq!("NI".capitalise(), "Ni".to_string());
    /// assert_eq!("co".capitalise(), "Co".to_string());
    /// assert_eq!("".capitalise(), "".to_string());
    /// ```
    fn capitalise(&self) -> String;
}

impl<T: AsRef<str>> StringExt for T {
    fn capitalise(&self) -> String {
        let mut c = self.as_ref().chars();
        match c.next() {
            Some(f) => f.to_uppercase().collect::<String>() + &c.as_str().to_lowercase(),
            None => String::new(),
        }
    }
}
