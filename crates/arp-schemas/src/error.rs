/// Invariant violations raised by model constructors and validators.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// `CatalogItem.total` must be finite and > 0.
    NonPositiveTotal { total: f64 },
    /// Unit/monthly price failed the supply-type rule.
    InvalidPrice { price: f64, strictly_positive: bool },
    /// Monthly pricing on a one-off lot, or the reverse.
    PricingMismatch { supply_type: &'static str },
    /// Tax id must have exactly 14 digits.
    InvalidTaxId { raw: String },
    /// Opportunity line quantity must be >= 1.
    QuantityBelowMinimum { quantity: f64 },
    /// A required text field was empty after trim.
    EmptyField(&'static str),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveTotal { total } => {
                write!(f, "model invariant: total must be > 0, got {total}")
            }
            Self::InvalidPrice {
                price,
                strictly_positive,
            } => {
                let rule = if *strictly_positive { "> 0" } else { ">= 0" };
                write!(f, "model invariant: price must be {rule}, got {price}")
            }
            Self::PricingMismatch { supply_type } => write!(
                f,
                "model invariant: pricing variant does not match lot supply type {supply_type}"
            ),
            Self::InvalidTaxId { raw } => {
                write!(f, "model invariant: tax id must have 14 digits, got '{raw}'")
            }
            Self::QuantityBelowMinimum { quantity } => {
                write!(f, "model invariant: quantity must be >= 1, got {quantity}")
            }
            Self::EmptyField(name) => write!(f, "model invariant: {name} must not be empty"),
        }
    }
}

impl std::error::Error for ModelError {}
