use arp_schemas::{
    Client, ClientId, Contract, ContractId, Kit, KitId, Opportunity, OpportunityId,
};
use serde::{Deserialize, Serialize};

/// Everything the ledger persists. Balances are never stored; they are
/// recomputed from `opportunities` on every read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub opportunities: Vec<Opportunity>,
    #[serde(default)]
    pub kits: Vec<Kit>,
}

impl Snapshot {
    pub fn contract(&self, id: ContractId) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.id == id)
    }

    pub fn contract_mut(&mut self, id: ContractId) -> Option<&mut Contract> {
        self.contracts.iter_mut().find(|c| c.id == id)
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn opportunity(&self, id: OpportunityId) -> Option<&Opportunity> {
        self.opportunities.iter().find(|o| o.id == id)
    }

    pub fn kit(&self, id: KitId) -> Option<&Kit> {
        self.kits.iter().find(|k| k.id == id)
    }

    /// Opportunities of one contract, in stored order.
    pub fn opportunities_for(&self, contract_id: ContractId) -> Vec<Opportunity> {
        self.opportunities
            .iter()
            .filter(|o| o.contract_id == contract_id)
            .cloned()
            .collect()
    }
}
