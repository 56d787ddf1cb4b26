//! Pure snapshot operations.
//!
//! Each operation borrows the current snapshot and returns the next one, or
//! an [`IntegrityError`] with the input untouched. Callers persist the
//! result through a [`crate::SnapshotStore`].

use std::collections::BTreeSet;

use arp_balance::check_opportunity;
use arp_schemas::{
    normalize_tax_id, CatalogItem, Client, ClientId, Contract, ContractId, ItemId, Kit, KitId,
    LotId, ModelError, Opportunity, OpportunityId, OpportunityLine, OpportunityStatus,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{IntegrityError, Snapshot};

type OpResult<T = Snapshot> = Result<T, IntegrityError>;

pub fn add_client(snap: &Snapshot, client: Client) -> OpResult {
    let tax_id = normalize_tax_id(&client.tax_id)?;
    if snap.clients.iter().any(|c| c.tax_id == tax_id) {
        return Err(IntegrityError::DuplicateTaxId { tax_id });
    }
    let mut next = snap.clone();
    next.clients.push(Client { tax_id, ..client });
    Ok(next)
}

fn validate_contract(snap: &Snapshot, contract: &Contract) -> OpResult<()> {
    if contract.title.trim().is_empty() {
        return Err(ModelError::EmptyField("title").into());
    }
    if snap.client(contract.owner_client_id).is_none() {
        return Err(IntegrityError::UnknownClient(contract.owner_client_id));
    }
    if let Some(missing) = contract
        .participants
        .iter()
        .find(|id| snap.client(**id).is_none())
    {
        return Err(IntegrityError::UnknownClient(*missing));
    }
    for lot in &contract.lots {
        if lot.contract_id != contract.id {
            return Err(IntegrityError::CrossContract { what: "lot" });
        }
        for item in &lot.items {
            if item.lot_id != lot.id {
                return Err(IntegrityError::CrossContract { what: "catalog item" });
            }
            item.validate(lot.supply_type)?;
        }
    }
    Ok(())
}

pub fn add_contract(snap: &Snapshot, contract: Contract) -> OpResult {
    validate_contract(snap, &contract)?;
    let mut next = snap.clone();
    next.contracts.push(contract);
    Ok(next)
}

pub fn add_kit(snap: &Snapshot, kit: Kit) -> OpResult {
    let contract = snap
        .contract(kit.contract_id)
        .ok_or(IntegrityError::UnknownContract(kit.contract_id))?;
    for ki in &kit.items {
        resolve_line(contract, ki.lot_id, ki.item_id)?;
        OpportunityLine::direct(ki.lot_id, ki.item_id, ki.quantity).validate()?;
    }
    let mut next = snap.clone();
    next.kits.push(kit);
    Ok(next)
}

fn resolve_line(contract: &Contract, lot_id: LotId, item_id: ItemId) -> OpResult<()> {
    let lot = contract.lot(lot_id).ok_or(IntegrityError::UnknownLot {
        contract_id: contract.id,
        lot_id,
    })?;
    lot.item(item_id).ok_or(IntegrityError::UnknownItem(item_id))?;
    Ok(())
}

/// Display code for the next opportunity: one past the highest in use.
pub fn next_opportunity_code(snap: &Snapshot) -> u64 {
    snap.opportunities.iter().map(|o| o.code).max().unwrap_or(0) + 1
}

/// Register a new OPEN opportunity. Balance is not consulted until the
/// opportunity is marked WON.
pub fn add_opportunity(
    snap: &Snapshot,
    contract_id: ContractId,
    client_id: ClientId,
    lines: Vec<OpportunityLine>,
) -> OpResult<(Snapshot, OpportunityId)> {
    let contract = snap
        .contract(contract_id)
        .ok_or(IntegrityError::UnknownContract(contract_id))?;
    if snap.client(client_id).is_none() {
        return Err(IntegrityError::UnknownClient(client_id));
    }
    for line in &lines {
        resolve_line(contract, line.lot_id, line.item_id)?;
        line.validate()?;
    }

    let mut opp = Opportunity::new(next_opportunity_code(snap), contract_id, client_id);
    opp.lines = lines;
    let id = opp.id;

    let mut next = snap.clone();
    next.opportunities.push(opp);
    Ok((next, id))
}

/// Change an opportunity's status. Moving to WON runs the commit gate
/// against every other opportunity of the contract.
pub fn set_opportunity_status(
    snap: &Snapshot,
    opportunity_id: OpportunityId,
    status: OpportunityStatus,
) -> OpResult {
    let opp = snap
        .opportunity(opportunity_id)
        .ok_or(IntegrityError::UnknownOpportunity(opportunity_id))?;

    if status == OpportunityStatus::Won && !opp.is_won() {
        let contract = snap
            .contract(opp.contract_id)
            .ok_or(IntegrityError::UnknownContract(opp.contract_id))?;
        let gate = check_opportunity(contract, opp, &snap.opportunities)?;
        if !gate.is_permitted() {
            return Err(IntegrityError::CommitBlocked {
                code: opp.code,
                violations: gate.violations().count(),
            });
        }
    }

    let mut next = snap.clone();
    if let Some(o) = next.opportunities.iter_mut().find(|o| o.id == opportunity_id) {
        o.status = status;
    }
    Ok(next)
}

/// Field-wise patch of a catalog item. `None` leaves a field as is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub number: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub official_description: Option<String>,
    pub unit: Option<String>,
    pub total: Option<f64>,
    pub price: Option<f64>,
}

/// Patch an item in place. Identity, lot and equipment are preserved; the
/// patched item must still satisfy its lot's invariants.
pub fn patch_catalog_item(snap: &Snapshot, item_id: ItemId, patch: ItemPatch) -> OpResult {
    let mut next = snap.clone();
    let (supply_type, item) = next
        .contracts
        .iter_mut()
        .flat_map(|c| c.lots.iter_mut())
        .find_map(|lot| {
            let supply_type = lot.supply_type;
            lot.items
                .iter_mut()
                .find(|i| i.id == item_id)
                .map(|i| (supply_type, i))
        })
        .ok_or(IntegrityError::UnknownItem(item_id))?;

    if let Some(v) = patch.number {
        item.number = v;
    }
    if let Some(v) = patch.name {
        item.name = v;
    }
    if let Some(v) = patch.description {
        item.description = v;
    }
    if let Some(v) = patch.official_description {
        item.official_description = v;
    }
    if let Some(v) = patch.unit {
        item.unit = v;
    }
    if let Some(v) = patch.total {
        item.total = v;
    }
    if let Some(v) = patch.price {
        item.pricing.set_price(v);
    }
    item.validate(supply_type)?;
    Ok(next)
}

/// Where an item is used.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ItemReferences {
    pub opportunities: Vec<OpportunityId>,
    pub kits: Vec<KitId>,
}

impl ItemReferences {
    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty() && self.kits.is_empty()
    }
}

pub fn references_to_item(snap: &Snapshot, item_id: ItemId) -> ItemReferences {
    ItemReferences {
        opportunities: snap
            .opportunities
            .iter()
            .filter(|o| o.lines.iter().any(|l| l.item_id == item_id))
            .map(|o| o.id)
            .collect(),
        kits: snap
            .kits
            .iter()
            .filter(|k| k.items.iter().any(|ki| ki.item_id == item_id))
            .map(|k| k.id)
            .collect(),
    }
}

/// Remove opportunity lines and kit items pointing at `removed`.
fn cascade_item_removal(snap: &mut Snapshot, removed: &BTreeSet<ItemId>) {
    if removed.is_empty() {
        return;
    }
    let mut lines = 0usize;
    for o in &mut snap.opportunities {
        let before = o.lines.len();
        o.lines.retain(|l| !removed.contains(&l.item_id));
        lines += before - o.lines.len();
    }
    let mut kit_items = 0usize;
    for k in &mut snap.kits {
        let before = k.items.len();
        k.items.retain(|ki| !removed.contains(&ki.item_id));
        kit_items += before - k.items.len();
    }
    debug!(
        items = removed.len(),
        opportunity_lines = lines,
        kit_items,
        "catalog item removal cascaded"
    );
}

/// Replace a lot's whole item list (the persistence step of an import).
/// Items that disappear are cascaded out of opportunities and kits.
pub fn replace_lot_items(
    snap: &Snapshot,
    contract_id: ContractId,
    lot_id: LotId,
    items: Vec<CatalogItem>,
) -> OpResult {
    let mut next = snap.clone();
    let contract = next
        .contract_mut(contract_id)
        .ok_or(IntegrityError::UnknownContract(contract_id))?;
    let lot = contract.lot_mut(lot_id).ok_or(IntegrityError::UnknownLot {
        contract_id,
        lot_id,
    })?;

    for item in &items {
        if item.lot_id != lot_id {
            return Err(IntegrityError::CrossContract { what: "catalog item" });
        }
        item.validate(lot.supply_type)?;
    }

    let kept: BTreeSet<ItemId> = items.iter().map(|i| i.id).collect();
    let removed: BTreeSet<ItemId> = lot
        .items
        .iter()
        .map(|i| i.id)
        .filter(|id| !kept.contains(id))
        .collect();
    let count = items.len();
    lot.items = items;

    cascade_item_removal(&mut next, &removed);
    info!(
        lot_id = %lot_id,
        items = count,
        removed = removed.len(),
        "lot items replaced"
    );
    Ok(next)
}

pub fn delete_catalog_item(snap: &Snapshot, item_id: ItemId) -> OpResult {
    let mut next = snap.clone();
    let lot = next
        .contracts
        .iter_mut()
        .flat_map(|c| c.lots.iter_mut())
        .find(|l| l.item(item_id).is_some())
        .ok_or(IntegrityError::UnknownItem(item_id))?;
    lot.items.retain(|i| i.id != item_id);

    cascade_item_removal(&mut next, &BTreeSet::from([item_id]));
    Ok(next)
}

/// Refused while any contract (as owner or participant) or opportunity
/// still names the client.
pub fn delete_client(snap: &Snapshot, client_id: ClientId) -> OpResult {
    if snap.client(client_id).is_none() {
        return Err(IntegrityError::UnknownClient(client_id));
    }
    let contracts = snap
        .contracts
        .iter()
        .filter(|c| c.owner_client_id == client_id || c.is_participant(client_id))
        .count();
    let opportunities = snap
        .opportunities
        .iter()
        .filter(|o| o.client_id == client_id)
        .count();
    if contracts > 0 || opportunities > 0 {
        return Err(IntegrityError::ClientReferenced {
            client_id,
            contracts,
            opportunities,
        });
    }

    let mut next = snap.clone();
    next.clients.retain(|c| c.id != client_id);
    Ok(next)
}

/// Refused while opportunities or kits still point at the contract.
pub fn delete_contract(snap: &Snapshot, contract_id: ContractId) -> OpResult {
    if snap.contract(contract_id).is_none() {
        return Err(IntegrityError::UnknownContract(contract_id));
    }
    let opportunities = snap
        .opportunities
        .iter()
        .filter(|o| o.contract_id == contract_id)
        .count();
    let kits = snap
        .kits
        .iter()
        .filter(|k| k.contract_id == contract_id)
        .count();
    if opportunities > 0 || kits > 0 {
        return Err(IntegrityError::ContractReferenced {
            contract_id,
            opportunities,
            kits,
        });
    }

    let mut next = snap.clone();
    next.contracts.retain(|c| c.id != contract_id);
    Ok(next)
}

/// Copy a kit's items into an opportunity as kit-tagged lines. Lines from an
/// earlier application of the same kit are replaced, not duplicated. On a WON
/// opportunity the result must pass the commit gate.
pub fn apply_kit(snap: &Snapshot, opportunity_id: OpportunityId, kit_id: KitId) -> OpResult {
    let kit = snap.kit(kit_id).ok_or(IntegrityError::UnknownKit(kit_id))?;
    let opp = snap
        .opportunity(opportunity_id)
        .ok_or(IntegrityError::UnknownOpportunity(opportunity_id))?;
    if kit.contract_id != opp.contract_id {
        return Err(IntegrityError::CrossContract { what: "kit" });
    }

    let mut updated = opp.clone();
    updated.lines.retain(|l| l.kit_id != Some(kit_id));
    updated.lines.extend(kit.expand());

    // A WON opportunity already consumes balance, so new lines pass the gate.
    if updated.is_won() {
        let contract = snap
            .contract(updated.contract_id)
            .ok_or(IntegrityError::UnknownContract(updated.contract_id))?;
        let gate = check_opportunity(contract, &updated, &snap.opportunities)?;
        if !gate.is_permitted() {
            warn!(code = updated.code, kit = %kit_id, "kit refused on won opportunity");
            return Err(IntegrityError::CommitBlocked {
                code: updated.code,
                violations: gate.violations().count(),
            });
        }
    }

    let mut next = snap.clone();
    if let Some(o) = next.opportunities.iter_mut().find(|o| o.id == opportunity_id) {
        *o = updated;
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arp_schemas::Sphere;

    fn client(name: &str, tax: &str) -> Client {
        Client::new(name, tax, "Natal", Sphere::Municipal).unwrap()
    }

    #[test]
    fn duplicate_tax_id_is_refused_after_normalisation() {
        let snap = add_client(&Snapshot::default(), client("A", "11222333000144")).unwrap();
        let err = add_client(&snap, client("B", "11.222.333/0001-44")).unwrap_err();
        assert_eq!(
            err,
            IntegrityError::DuplicateTaxId {
                tax_id: "11222333000144".to_string()
            }
        );
    }

    #[test]
    fn opportunity_codes_are_sequential() {
        let owner = client("Owner", "11222333000144");
        let owner_id = owner.id;
        let snap = add_client(&Snapshot::default(), owner).unwrap();
        let contract = Contract::new("ARP 1", owner_id);
        let contract_id = contract.id;
        let snap = add_contract(&snap, contract).unwrap();

        assert_eq!(next_opportunity_code(&snap), 1);
        let (snap, _) = add_opportunity(&snap, contract_id, owner_id, Vec::new()).unwrap();
        let (snap, id) = add_opportunity(&snap, contract_id, owner_id, Vec::new()).unwrap();
        assert_eq!(snap.opportunity(id).unwrap().code, 2);
        assert_eq!(next_opportunity_code(&snap), 3);
    }

    #[test]
    fn contract_with_unknown_owner_is_refused() {
        let stranger = ClientId::generate();
        let err = add_contract(&Snapshot::default(), Contract::new("ARP", stranger)).unwrap_err();
        assert_eq!(err, IntegrityError::UnknownClient(stranger));
    }
}
