use serde::{Deserialize, Serialize};

use crate::{ClientId, ModelError};

/// Government sphere of a purchasing entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sphere {
    Municipal,
    State,
    Federal,
}

/// Purchasing entity. `tax_id` holds exactly 14 digits, unique across clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub tax_id: String,
    pub city: String,
    pub sphere: Sphere,
}

impl Client {
    /// Build a client, normalising `tax_id` to its digits.
    ///
    /// Punctuated input ("12.345.678/0001-90") is accepted.
    pub fn new(
        name: impl Into<String>,
        tax_id: &str,
        city: impl Into<String>,
        sphere: Sphere,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyField("name"));
        }
        Ok(Self {
            id: ClientId::generate(),
            name,
            tax_id: normalize_tax_id(tax_id)?,
            city: city.into(),
            sphere,
        })
    }
}

/// Strip punctuation and require exactly 14 digits.
pub fn normalize_tax_id(raw: &str) -> Result<String, ModelError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 14 {
        return Err(ModelError::InvalidTaxId {
            raw: raw.to_string(),
        });
    }
    Ok(digits)
}
