use serde::{Deserialize, Serialize};

use crate::{ClientId, ContractId, ItemId, KitId, LotId, ModelError, OpportunityId};

/// Lifecycle status of an opportunity. Only `Won` consumes balance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityStatus {
    Open,
    Won,
    Lost,
}

impl OpportunityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityStatus::Open => "OPEN",
            OpportunityStatus::Won => "WON",
            OpportunityStatus::Lost => "LOST",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" | "ABERTA" => Some(OpportunityStatus::Open),
            "WON" | "GANHA" => Some(OpportunityStatus::Won),
            "LOST" | "PERDIDA" => Some(OpportunityStatus::Lost),
            _ => None,
        }
    }
}

/// One requested quantity of a catalog item.
///
/// Direct lines carry `kit_id = None`; lines expanded from a kit carry the
/// originating kit. Both shapes aggregate identically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpportunityLine {
    pub lot_id: LotId,
    pub item_id: ItemId,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kit_id: Option<KitId>,
}

impl OpportunityLine {
    pub fn direct(lot_id: LotId, item_id: ItemId, quantity: f64) -> Self {
        Self {
            lot_id,
            item_id,
            quantity,
            kit_id: None,
        }
    }

    pub fn from_kit(kit_id: KitId, lot_id: LotId, item_id: ItemId, quantity: f64) -> Self {
        Self {
            lot_id,
            item_id,
            quantity,
            kit_id: Some(kit_id),
        }
    }

    pub fn is_kit_line(&self) -> bool {
        self.kit_id.is_some()
    }

    pub fn matches(&self, lot_id: LotId, item_id: ItemId) -> bool {
        self.lot_id == lot_id && self.item_id == item_id
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.quantity.is_finite() || self.quantity < 1.0 {
            return Err(ModelError::QuantityBelowMinimum {
                quantity: self.quantity,
            });
        }
        Ok(())
    }
}

/// Candidate deal against a contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: OpportunityId,
    /// Sequential display code (1, 2, 3, ...), assigned by the store.
    pub code: u64,
    pub contract_id: ContractId,
    pub client_id: ClientId,
    pub status: OpportunityStatus,
    #[serde(default)]
    pub lines: Vec<OpportunityLine>,
}

impl Opportunity {
    pub fn new(code: u64, contract_id: ContractId, client_id: ClientId) -> Self {
        Self {
            id: OpportunityId::generate(),
            code,
            contract_id,
            client_id,
            status: OpportunityStatus::Open,
            lines: Vec::new(),
        }
    }

    pub fn is_won(&self) -> bool {
        self.status == OpportunityStatus::Won
    }

    pub fn direct_lines(&self) -> impl Iterator<Item = &OpportunityLine> {
        self.lines.iter().filter(|l| !l.is_kit_line())
    }

    pub fn kit_lines(&self) -> impl Iterator<Item = &OpportunityLine> {
        self.lines.iter().filter(|l| l.is_kit_line())
    }

    /// Summed quantity of this opportunity's lines for one (lot, item).
    pub fn quantity_for(&self, lot_id: LotId, item_id: ItemId) -> f64 {
        self.lines
            .iter()
            .filter(|l| l.matches(lot_id, item_id))
            .map(|l| l.quantity)
            .sum()
    }
}

/// Template line of a kit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KitItem {
    pub lot_id: LotId,
    pub item_id: ItemId,
    pub quantity: f64,
}

/// Named reusable bundle over one contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kit {
    pub id: KitId,
    pub contract_id: ContractId,
    pub name: String,
    #[serde(default)]
    pub items: Vec<KitItem>,
}

impl Kit {
    pub fn new(contract_id: ContractId, name: impl Into<String>) -> Self {
        Self {
            id: KitId::generate(),
            contract_id,
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Expanded lines tagged with this kit.
    pub fn expand(&self) -> Vec<OpportunityLine> {
        self.items
            .iter()
            .map(|ki| OpportunityLine::from_kit(self.id, ki.lot_id, ki.item_id, ki.quantity))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_for_sums_direct_and_kit_lines() {
        let lot = LotId::generate();
        let item = ItemId::generate();
        let mut opp = Opportunity::new(1, ContractId::generate(), ClientId::generate());
        opp.lines.push(OpportunityLine::direct(lot, item, 3.0));
        opp.lines
            .push(OpportunityLine::from_kit(KitId::generate(), lot, item, 2.0));
        opp.lines
            .push(OpportunityLine::direct(lot, ItemId::generate(), 100.0));
        assert_eq!(opp.quantity_for(lot, item), 5.0);
        assert_eq!(opp.direct_lines().count(), 2);
        assert_eq!(opp.kit_lines().count(), 1);
    }

    #[test]
    fn line_quantity_below_one_rejected() {
        let l = OpportunityLine::direct(LotId::generate(), ItemId::generate(), 0.5);
        assert!(l.validate().is_err());
        let l = OpportunityLine::direct(LotId::generate(), ItemId::generate(), 1.0);
        assert!(l.validate().is_ok());
    }

    #[test]
    fn kit_expand_tags_every_line() {
        let mut kit = Kit::new(ContractId::generate(), "Kit escola");
        kit.items.push(KitItem {
            lot_id: LotId::generate(),
            item_id: ItemId::generate(),
            quantity: 4.0,
        });
        let lines = kit.expand();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kit_id, Some(kit.id));
    }
}
