use serde::{Deserialize, Serialize};

use crate::{round2, ItemId, LotId, ModelError, SupplyType};

/// Sub-kind of a monthly-priced item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonthlyKind {
    Product,
    Service,
}

impl MonthlyKind {
    /// Default sub-kind for items created on a monthly lot.
    pub fn default_for(supply_type: SupplyType) -> Self {
        match supply_type {
            SupplyType::Loan => MonthlyKind::Product,
            _ => MonthlyKind::Service,
        }
    }
}

/// Equipment record owned by a monthly-priced item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    pub quantity: f64,
    pub unit_cost: f64,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
}

impl Equipment {
    pub fn value(&self) -> f64 {
        round2(self.quantity * self.unit_cost)
    }
}

/// Pricing variant of a catalog item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pricing", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Pricing {
    OneOff {
        unit_price: f64,
    },
    Monthly {
        monthly_price: f64,
        sub_kind: MonthlyKind,
        #[serde(default)]
        equipment: Vec<Equipment>,
    },
}

impl Pricing {
    /// Build the pricing shape a lot of `supply_type` expects, with no equipment.
    pub fn for_supply_type(supply_type: SupplyType, price: f64) -> Self {
        if supply_type.is_monthly() {
            Pricing::Monthly {
                monthly_price: price,
                sub_kind: MonthlyKind::default_for(supply_type),
                equipment: Vec::new(),
            }
        } else {
            Pricing::OneOff { unit_price: price }
        }
    }

    /// The single price field of whichever variant this is.
    pub fn price(&self) -> f64 {
        match self {
            Pricing::OneOff { unit_price } => *unit_price,
            Pricing::Monthly { monthly_price, .. } => *monthly_price,
        }
    }

    /// Overwrite the price, keeping the variant and any equipment.
    pub fn set_price(&mut self, price: f64) {
        match self {
            Pricing::OneOff { unit_price } => *unit_price = price,
            Pricing::Monthly { monthly_price, .. } => *monthly_price = price,
        }
    }

    pub fn is_monthly(&self) -> bool {
        matches!(self, Pricing::Monthly { .. })
    }

    pub fn equipment(&self) -> &[Equipment] {
        match self {
            Pricing::OneOff { .. } => &[],
            Pricing::Monthly { equipment, .. } => equipment,
        }
    }
}

/// Catalog item inside a lot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub lot_id: LotId,
    /// Dotted numeric item number ("1", "1.2", "1.10").
    pub number: String,
    /// Commercial name.
    pub name: String,
    /// Internal description.
    pub description: String,
    /// Official (contract text) description.
    pub official_description: String,
    pub unit: String,
    /// Registered ceiling quantity.
    pub total: f64,
    #[serde(flatten)]
    pub pricing: Pricing,
}

impl CatalogItem {
    pub fn new(
        lot_id: LotId,
        number: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        total: f64,
        pricing: Pricing,
    ) -> Self {
        Self {
            id: ItemId::generate(),
            lot_id,
            number: number.into(),
            name: name.into(),
            description: String::new(),
            official_description: String::new(),
            unit: unit.into(),
            total,
            pricing,
        }
    }

    /// One-off: `total × unit_price`. Monthly: `total × monthly_price` (per month).
    pub fn line_value(&self) -> f64 {
        round2(self.total * self.pricing.price())
    }

    /// Sum of owned equipment values (zero for one-off items).
    pub fn equipment_cost(&self) -> f64 {
        round2(self.pricing.equipment().iter().map(Equipment::value).sum())
    }

    /// Check the item against the invariants of the lot it belongs to.
    pub fn validate(&self, supply_type: SupplyType) -> Result<(), ModelError> {
        if self.number.trim().is_empty() {
            return Err(ModelError::EmptyField("number"));
        }
        if !self.total.is_finite() || self.total <= 0.0 {
            return Err(ModelError::NonPositiveTotal { total: self.total });
        }
        if self.pricing.is_monthly() != supply_type.is_monthly() {
            return Err(ModelError::PricingMismatch {
                supply_type: supply_type.as_str(),
            });
        }
        let price = self.pricing.price();
        let strictly_positive = supply_type.requires_positive_price();
        let ok = price.is_finite() && if strictly_positive { price > 0.0 } else { price >= 0.0 };
        if !ok {
            return Err(ModelError::InvalidPrice {
                price,
                strictly_positive,
            });
        }
        Ok(())
    }
}
