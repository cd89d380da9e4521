use crate::collection::ListSemantics;
use crate::core::{PersistError, Result};
use serde::{Deserialize, Serialize};

/// Declaration of one mapped list property
///
/// Mirrors the `<list>` element of a mapping document once it has been parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMapping {
    /// Stable name of the collection property, e.g. `Order.items`
    pub role: String,

    /// Owner property used as the collection key (owner identifier when absent)
    #[serde(default)]
    pub property_ref: Option<String>,

    /// Registered name of the element type
    pub element_type: String,

    /// Column holding each element's position
    #[serde(default)]
    pub index_column: Option<String>,

    /// Value stored for the first element
    #[serde(default)]
    pub index_base: i64,
}

impl ListMapping {
    /// Create a new list mapping declaration
    pub fn new(role: &str, element_type: &str) -> Self {
        Self {
            role: role.to_string(),
            property_ref: None,
            element_type: element_type.to_string(),
            index_column: None,
            index_base: 0,
        }
    }

    /// Set the property reference
    pub fn property_ref(mut self, property_ref: &str) -> Self {
        self.property_ref = Some(property_ref.to_string());
        self
    }

    /// Set the index column
    pub fn index_column(mut self, column: &str) -> Self {
        self.index_column = Some(column.to_string());
        self
    }

    /// Set the index base
    pub fn index_base(mut self, base: i64) -> Self {
        self.index_base = base;
        self
    }

    /// Parse a declaration from JSON
    ///
    /// # Examples
    ///
    /// ```
    /// # use persist_list::ListMapping;
    /// let mapping = ListMapping::from_json(
    ///     r#"{ "role": "Order.items", "element_type": "LineItem" }"#
    /// ).unwrap();
    /// assert_eq!(mapping.index_base, 0);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let mapping: Self = serde_json::from_str(json).map_err(|e| {
            PersistError::ConfigurationError(format!("Invalid list mapping: {}", e))
        })?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// Check that the declaration names a role and an element type
    pub fn validate(&self) -> Result<()> {
        if self.role.trim().is_empty() {
            return Err(PersistError::ConfigurationError(
                "List mapping must declare a role".to_string(),
            ));
        }
        if self.element_type.trim().is_empty() {
            return Err(PersistError::ConfigurationError(format!(
                "List mapping '{}' must declare an element type",
                self.role
            )));
        }
        Ok(())
    }

    /// Index semantics described by this declaration
    pub fn semantics(&self) -> ListSemantics {
        ListSemantics::new(self.index_column.clone(), self.index_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let mapping = ListMapping::new("Order.items", "LineItem")
            .property_ref("order_number")
            .index_column("position")
            .index_base(1);

        assert_eq!(mapping.property_ref.as_deref(), Some("order_number"));
        assert_eq!(mapping.semantics().index_column.as_deref(), Some("position"));
        assert_eq!(mapping.semantics().index_base, 1);
    }

    #[test]
    fn test_from_json_defaults() {
        let mapping =
            ListMapping::from_json(r#"{ "role": "Order.items", "element_type": "i64" }"#).unwrap();

        assert_eq!(mapping, ListMapping::new("Order.items", "i64"));
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        let missing = ListMapping::from_json(r#"{ "role": "Order.items" }"#).unwrap_err();
        assert!(missing.is_configuration());

        let blank = ListMapping::from_json(r#"{ "role": " ", "element_type": "i64" }"#).unwrap_err();
        assert!(blank.is_configuration());
    }
}
