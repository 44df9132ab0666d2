use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps personal data (recipient names, street lines) so it never reaches a
/// log line verbatim. Serialization is transparent.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Masked<T>(pub T);

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_hides_value_in_formatting() {
        let name = Masked::new("Jane Receiver".to_string());
        assert_eq!(format!("{}", name), "********");
        assert_eq!(format!("{:?}", name), "********");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Jane Receiver\"");
        assert_eq!(name.into_inner(), "Jane Receiver");
    }
}
