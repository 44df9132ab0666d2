use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::PostalAddress;

/// Warehouse master-data record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Warehouse {
    /// Ship-from address derived from this record. Missing parts stay blank so
    /// label validation still reports them.
    pub fn shipping_origin(&self) -> PostalAddress {
        PostalAddress {
            name: self.name.clone(),
            address: self.address.clone().unwrap_or_default(),
            city: self.city.clone().unwrap_or_default(),
            state: self.state.clone().filter(|s| !s.trim().is_empty()),
            postal_code: self.postal_code.clone().unwrap_or_default(),
            country: self.country.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressField;

    #[test]
    fn test_shipping_origin_keeps_gaps_visible() {
        let warehouse = Warehouse {
            id: Uuid::new_v4(),
            code: "WH-N".to_string(),
            name: "North DC".to_string(),
            is_default: true,
            address: Some("5 Quay St".to_string()),
            city: Some("Hull".to_string()),
            state: Some("".to_string()),
            postal_code: None,
            country: Some("GB".to_string()),
        };

        let origin = warehouse.shipping_origin();
        assert_eq!(origin.name, "North DC");
        assert_eq!(origin.state, None);
        assert_eq!(origin.missing_fields(), vec![AddressField::PostalCode]);
    }
}
