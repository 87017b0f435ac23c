//! Dirty tracking: turning a snapshot into a [`ChangeSet`] and folding a
//! successful push back into statuses.

use crate::{AttributeRecord, Change, ChangeSet, ProductRecord};
use prodcfg_model::Parameter;
use prodcfg_store::Snapshot;
use prodcfg_types::{ChangeStatus, EntityKey};

/// Collects every dirty live entity and every tombstone.
///
/// Deletes come first (parameters, then attributes, then products), followed
/// by creates and updates in display order with each parent ahead of its
/// children.
pub fn collect_changes(snapshot: &Snapshot) -> ChangeSet {
    let mut changes = Vec::new();

    let deletes = |rank: u8| {
        snapshot
            .tombstones()
            .iter()
            .filter(move |t| key_rank(&t.key) == rank)
            .map(|t| delete_change(t.key))
    };
    changes.extend(deletes(2));
    changes.extend(deletes(1));
    changes.extend(deletes(0));

    for product in snapshot.products() {
        let pid = product.product_id;
        match product.status {
            ChangeStatus::New => changes.push(Change::CreateProduct(product.into())),
            ChangeStatus::Updated => changes.push(Change::UpdateProduct(product.into())),
            ChangeStatus::Synced | ChangeStatus::Deleted => {}
        }

        for attr in &product.attributes {
            let record = AttributeRecord::from(attr);
            match attr.status {
                ChangeStatus::New => changes.push(Change::CreateAttribute {
                    product_id: pid,
                    record,
                }),
                ChangeStatus::Updated => changes.push(Change::UpdateAttribute {
                    product_id: pid,
                    record,
                }),
                ChangeStatus::Synced | ChangeStatus::Deleted => {}
            }

            for param in snapshot.params(pid, attr.attribute_id) {
                let (product_id, attribute_id, param) = (pid, attr.attribute_id, param.clone());
                match param.status {
                    ChangeStatus::New => changes.push(Change::CreateParameter {
                        product_id,
                        attribute_id,
                        param,
                    }),
                    ChangeStatus::Updated => changes.push(Change::UpdateParameter {
                        product_id,
                        attribute_id,
                        param,
                    }),
                    ChangeStatus::Synced | ChangeStatus::Deleted => {}
                }
            }
        }
    }

    ChangeSet::new(changes)
}

/// Applies a successful push to `current`, which may have moved on since
/// the change set was collected.
///
/// - An entity whose record is unchanged since collection becomes `synced`.
/// - An entity edited in the meantime becomes (or stays) `updated`, since the
///   remote side now holds an older copy of it.
/// - Acknowledged tombstones are purged.
/// - A created entity that was removed locally in the meantime now exists
///   remotely, so it is tombstoned unless an ancestor already is.
pub fn acknowledge(current: &Snapshot, changes: &ChangeSet) -> Snapshot {
    let mut next = current.clone();

    for change in changes {
        let key = change.key();
        if change.is_delete() {
            next.purge_tombstone(&key);
            continue;
        }

        match live_match(&next, change) {
            Some(true) => {
                next.set_status(&key, ChangeStatus::Synced);
            }
            Some(false) => {
                next.set_status(&key, ChangeStatus::Updated);
            }
            None if change.is_create() => next.record_tombstone(key),
            None => {}
        }
    }

    next
}

/// `Some(unchanged)` if the targeted entity is live, `None` otherwise.
fn live_match(snapshot: &Snapshot, change: &Change) -> Option<bool> {
    match change {
        Change::CreateProduct(record) | Change::UpdateProduct(record) => snapshot
            .product(record.product_id)
            .map(|p| ProductRecord::from(p) == *record),
        Change::CreateAttribute { product_id, record }
        | Change::UpdateAttribute { product_id, record } => snapshot
            .attribute(*product_id, record.attribute_id)
            .map(|a| AttributeRecord::from(a) == *record),
        Change::CreateParameter {
            product_id,
            attribute_id,
            param,
        }
        | Change::UpdateParameter {
            product_id,
            attribute_id,
            param,
        } => snapshot
            .param(*product_id, *attribute_id, param.param_id)
            .map(|p| same_content(p, param)),
        Change::DeleteProduct(_) | Change::DeleteAttribute { .. } | Change::DeleteParameter { .. } => {
            None
        }
    }
}

fn same_content(a: &Parameter, b: &Parameter) -> bool {
    a.sort_order == b.sort_order && a.payload == b.payload
}

fn key_rank(key: &EntityKey) -> u8 {
    match key {
        EntityKey::Product { .. } => 0,
        EntityKey::Attribute { .. } => 1,
        EntityKey::Parameter { .. } => 2,
    }
}

fn delete_change(key: EntityKey) -> Change {
    match key {
        EntityKey::Product { product_id } => Change::DeleteProduct(product_id),
        EntityKey::Attribute {
            product_id,
            attribute_id,
        } => Change::DeleteAttribute {
            product_id,
            attribute_id,
        },
        EntityKey::Parameter {
            product_id,
            attribute_id,
            param_id,
        } => Change::DeleteParameter {
            product_id,
            attribute_id,
            param_id,
        },
    }
}
