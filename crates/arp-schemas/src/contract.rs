use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CatalogItem, ClientId, ContractId, ItemId, LotId};

/// Supply-type tag of a lot. Decides the pricing shape of its items.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplyType {
    Supply,
    Installation,
    Maintenance,
    Loan,
}

impl SupplyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplyType::Supply => "SUPPLY",
            SupplyType::Installation => "INSTALLATION",
            SupplyType::Maintenance => "MAINTENANCE",
            SupplyType::Loan => "LOAN",
        }
    }

    /// MAINTENANCE and LOAN lots are priced per month.
    pub fn is_monthly(&self) -> bool {
        matches!(self, SupplyType::Maintenance | SupplyType::Loan)
    }

    /// MAINTENANCE requires a strictly positive price; everything else allows zero.
    pub fn requires_positive_price(&self) -> bool {
        matches!(self, SupplyType::Maintenance)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUPPLY" | "FORNECIMENTO" => Some(SupplyType::Supply),
            "INSTALLATION" | "INSTALACAO" => Some(SupplyType::Installation),
            "MAINTENANCE" | "MANUTENCAO" => Some(SupplyType::Maintenance),
            "LOAN" | "COMODATO" => Some(SupplyType::Loan),
            _ => None,
        }
    }
}

/// A contract subdivision grouping catalog items of one supply type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub id: LotId,
    pub contract_id: ContractId,
    pub name: String,
    pub supply_type: SupplyType,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

impl Lot {
    pub fn new(contract_id: ContractId, name: impl Into<String>, supply_type: SupplyType) -> Self {
        Self {
            id: LotId::generate(),
            contract_id,
            name: name.into(),
            supply_type,
            items: Vec::new(),
        }
    }

    pub fn item(&self, item_id: ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.id == item_id)
    }
}

/// Derived contract status. Never stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContractStatus {
    /// Active: today <= expiry, or no expiry at all.
    Vigente,
    /// Expired.
    Encerrada,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Vigente => "VIGENTE",
            ContractStatus::Encerrada => "ENCERRADA",
        }
    }
}

/// Price-registration agreement (ARP).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub title: String,
    pub owner_client_id: ClientId,
    #[serde(default)]
    pub consortium: bool,
    #[serde(default)]
    pub signed_on: Option<NaiveDate>,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
    #[serde(default)]
    pub lots: Vec<Lot>,
    #[serde(default)]
    pub participants: BTreeSet<ClientId>,
}

impl Contract {
    pub fn new(title: impl Into<String>, owner_client_id: ClientId) -> Self {
        Self {
            id: ContractId::generate(),
            title: title.into(),
            owner_client_id,
            consortium: false,
            signed_on: None,
            expires_on: None,
            lots: Vec::new(),
            participants: BTreeSet::new(),
        }
    }

    pub fn status(&self, today: NaiveDate) -> ContractStatus {
        match self.expires_on {
            Some(exp) if today > exp => ContractStatus::Encerrada,
            _ => ContractStatus::Vigente,
        }
    }

    pub fn is_participant(&self, client_id: ClientId) -> bool {
        self.participants.contains(&client_id)
    }

    pub fn lot(&self, lot_id: LotId) -> Option<&Lot> {
        self.lots.iter().find(|l| l.id == lot_id)
    }

    pub fn lot_mut(&mut self, lot_id: LotId) -> Option<&mut Lot> {
        self.lots.iter_mut().find(|l| l.id == lot_id)
    }

    /// Find an item anywhere in the contract, with its owning lot.
    pub fn find_item(&self, item_id: ItemId) -> Option<(&Lot, &CatalogItem)> {
        self.lots
            .iter()
            .find_map(|l| l.item(item_id).map(|i| (l, i)))
    }
}
