use serde::{Deserialize, Serialize};
use std::fmt;

/// Postal address printed on a shipping label. Only `state` is optional.
/// Absent keys read as blank so they surface through `missing_fields`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PostalAddress {
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Name,
    Address,
    City,
    PostalCode,
    Country,
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AddressField::Name => "name",
            AddressField::Address => "address",
            AddressField::City => "city",
            AddressField::PostalCode => "postalCode",
            AddressField::Country => "country",
        };
        f.write_str(s)
    }
}

impl PostalAddress {
    /// Mandatory fields that are empty or whitespace, in declaration order.
    pub fn missing_fields(&self) -> Vec<AddressField> {
        [
            (AddressField::Name, &self.name),
            (AddressField::Address, &self.address),
            (AddressField::City, &self.city),
            (AddressField::PostalCode, &self.postal_code),
            (AddressField::Country, &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> PostalAddress {
        PostalAddress {
            name: "Jane Receiver".to_string(),
            address: "1 Dock Road".to_string(),
            city: "Leeds".to_string(),
            state: None,
            postal_code: "LS1 1AA".to_string(),
            country: "GB".to_string(),
        }
    }

    #[test]
    fn test_state_is_optional() {
        assert!(complete().is_complete());
    }

    #[test]
    fn test_blank_fields_are_missing() {
        let mut address = complete();
        address.city = "   ".to_string();
        address.country = String::new();
        assert_eq!(address.missing_fields(), vec![AddressField::City, AddressField::Country]);
    }

    #[test]
    fn test_absent_keys_read_as_missing() {
        let address: PostalAddress = serde_json::from_value(serde_json::json!({
            "address": "1 Dock Road",
            "city": "Leeds",
            "country": "GB"
        }))
        .unwrap();
        assert_eq!(address.missing_fields(), vec![AddressField::Name, AddressField::PostalCode]);
    }
}
