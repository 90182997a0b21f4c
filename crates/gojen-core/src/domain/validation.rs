use std::collections::BTreeSet;

use crate::domain::{declaration::Declaration, error::DomainError};

/// Centralized domain validation.
///
/// Entity-level checks live on the entities; this adds the cross-element
/// rules applied before a declaration enters the store.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_declaration(decl: &Declaration) -> Result<(), DomainError> {
        decl.validate()?;

        let mut seen = BTreeSet::new();
        for element in &decl.elements {
            if !seen.insert(element.name.as_str()) {
                return Err(DomainError::InvalidElement {
                    declaration: decl.name.clone(),
                    element: element.name.clone(),
                    reason: "duplicate element name".into(),
                });
            }
        }
        Ok(())
    }
}
