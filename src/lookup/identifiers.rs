use std::collections::{BTreeSet, HashSet};

/// Trait for types that can be used as the identifier list of a batch lookup.
///
/// The list keeps the caller's order (it is reported back in `NotFound`);
/// matching only tests membership.
pub trait IntoIdentifiers {
    fn into_identifiers(self) -> Vec<String>;
}

// Slice of &str
impl<'a> IntoIdentifiers for &[&'a str] {
    fn into_identifiers(self) -> Vec<String> {
        self.iter().map(|id| id.to_string()).collect()
    }
}

// Slice of String
impl IntoIdentifiers for &[String] {
    fn into_identifiers(self) -> Vec<String> {
        self.to_vec()
    }
}

// Fixed-size arrays
impl<'a, const N: usize> IntoIdentifiers for [&'a str; N] {
    fn into_identifiers(self) -> Vec<String> {
        self.as_slice().into_identifiers()
    }
}

// Fixed-size arrays by reference
impl<'a, const N: usize> IntoIdentifiers for &[&'a str; N] {
    fn into_identifiers(self) -> Vec<String> {
        self.as_slice().into_identifiers()
    }
}

// Vec of &str
impl<'a> IntoIdentifiers for Vec<&'a str> {
    fn into_identifiers(self) -> Vec<String> {
        self.as_slice().into_identifiers()
    }
}

// Vec of &str by reference
impl<'a> IntoIdentifiers for &Vec<&'a str> {
    fn into_identifiers(self) -> Vec<String> {
        self.as_slice().into_identifiers()
    }
}

impl IntoIdentifiers for Vec<String> {
    fn into_identifiers(self) -> Vec<String> {
        self
    }
}

impl IntoIdentifiers for &Vec<String> {
    fn into_identifiers(self) -> Vec<String> {
        self.clone()
    }
}

impl IntoIdentifiers for HashSet<String> {
    fn into_identifiers(self) -> Vec<String> {
        self.into_iter().collect()
    }
}

impl IntoIdentifiers for &HashSet<String> {
    fn into_identifiers(self) -> Vec<String> {
        self.iter().cloned().collect()
    }
}

impl IntoIdentifiers for BTreeSet<String> {
    fn into_identifiers(self) -> Vec<String> {
        self.into_iter().collect()
    }
}

impl IntoIdentifiers for &BTreeSet<String> {
    fn into_identifiers(self) -> Vec<String> {
        self.iter().cloned().collect()
    }
}
