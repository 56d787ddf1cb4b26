use std::fmt;

use arp_balance::BalanceError;
use arp_schemas::{ClientId, ContractId, ItemId, KitId, LotId, ModelError, OpportunityId};

/// Why a store operation was refused. The input snapshot is never modified.
#[derive(Clone, Debug, PartialEq)]
pub enum IntegrityError {
    UnknownClient(ClientId),
    UnknownContract(ContractId),
    UnknownLot { contract_id: ContractId, lot_id: LotId },
    UnknownItem(ItemId),
    UnknownOpportunity(OpportunityId),
    UnknownKit(KitId),
    /// Another client already holds this tax id.
    DuplicateTaxId { tax_id: String },
    /// Deleting the client would orphan contracts or opportunities.
    ClientReferenced {
        client_id: ClientId,
        contracts: usize,
        opportunities: usize,
    },
    /// Deleting the contract would orphan opportunities or kits.
    ContractReferenced {
        contract_id: ContractId,
        opportunities: usize,
        kits: usize,
    },
    /// A record points into a different contract than its parent.
    CrossContract { what: &'static str },
    Invalid(ModelError),
    Balance(BalanceError),
    /// Marking the opportunity WON would overdraw at least one balance.
    CommitBlocked { code: u64, violations: usize },
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownClient(id) => write!(f, "unknown client {id}"),
            Self::UnknownContract(id) => write!(f, "unknown contract {id}"),
            Self::UnknownLot {
                contract_id,
                lot_id,
            } => write!(f, "lot {lot_id} not found in contract {contract_id}"),
            Self::UnknownItem(id) => write!(f, "unknown catalog item {id}"),
            Self::UnknownOpportunity(id) => write!(f, "unknown opportunity {id}"),
            Self::UnknownKit(id) => write!(f, "unknown kit {id}"),
            Self::DuplicateTaxId { tax_id } => {
                write!(f, "tax id {tax_id} is already registered")
            }
            Self::ClientReferenced {
                client_id,
                contracts,
                opportunities,
            } => write!(
                f,
                "client {client_id} is referenced by {contracts} contract(s) and {opportunities} opportunity(ies)"
            ),
            Self::ContractReferenced {
                contract_id,
                opportunities,
                kits,
            } => write!(
                f,
                "contract {contract_id} is referenced by {opportunities} opportunity(ies) and {kits} kit(s)"
            ),
            Self::CrossContract { what } => {
                write!(f, "{what} belongs to a different contract")
            }
            Self::Invalid(e) => write!(f, "{e}"),
            Self::Balance(e) => write!(f, "{e}"),
            Self::CommitBlocked { code, violations } => write!(
                f,
                "opportunity #{code} cannot be won: {violations} line(s) exceed the available balance"
            ),
        }
    }
}

impl std::error::Error for IntegrityError {}

impl From<ModelError> for IntegrityError {
    fn from(e: ModelError) -> Self {
        IntegrityError::Invalid(e)
    }
}

impl From<BalanceError> for IntegrityError {
    fn from(e: BalanceError) -> Self {
        IntegrityError::Balance(e)
    }
}
