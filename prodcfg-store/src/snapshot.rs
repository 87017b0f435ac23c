//! The entity store: one immutable view of the whole hierarchy.

use crate::{StoreError, StoreResult, Tombstone};
use prodcfg_model::{Attribute, Parameter, ParameterGroup, Product};
use prodcfg_types::{AttributeId, ChangeStatus, EntityKey, GroupKey, ParamId, ProductId};
use std::collections::{HashMap, HashSet};

/// Highest-ever-issued identifiers, so removed ids are never handed out again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Watermarks {
    next_product: i64,
    next_attribute: HashMap<ProductId, i64>,
    next_param: i64,
}

impl Watermarks {
    fn derive(products: &[Product], groups: &HashMap<GroupKey, ParameterGroup>) -> Self {
        let next_product = products
            .iter()
            .filter_map(|p| p.product_id.checked_next())
            .map(|id| id.get())
            .max()
            .unwrap_or(0);
        let next_attribute = products
            .iter()
            .filter_map(|p| {
                let next = p.max_attribute_id()?.checked_next()?;
                Some((p.product_id, next.get()))
            })
            .collect();
        let next_param = groups
            .values()
            .flat_map(|g| g.param.iter())
            .filter_map(|p| p.param_id.checked_next())
            .map(|id| id.get())
            .max()
            .unwrap_or(0);
        Self {
            next_product,
            next_attribute,
            next_param,
        }
    }
}

/// The id to issue given the largest live id and the watermark, paired with
/// the watermark after it. `None` once the identifier space is used up.
fn issue(max_live: Option<i64>, mark: i64) -> Option<(i64, i64)> {
    let floor = match max_live {
        Some(max) => max.checked_add(1)?,
        None => 0,
    };
    let id = floor.max(mark);
    Some((id, id.checked_add(1)?))
}

fn out_of_range(what: &str, id: impl std::fmt::Display) -> StoreError {
    StoreError::MalformedImport(format!("identifier out of range: {what} {id}"))
}

/// Products in display order, their parameter groups, unacknowledged
/// tombstones and id watermarks.
///
/// Every engine operation works on a clone and hands back a new value; a
/// `Snapshot` that has been shared is never modified in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    products: Vec<Product>,
    groups: HashMap<GroupKey, ParameterGroup>,
    tombstones: Vec<Tombstone>,
    watermarks: Watermarks,
}

impl Snapshot {
    /// Builds a snapshot from trusted records.
    ///
    /// Siblings are stably sorted by `sortOrder` and empty groups are
    /// dropped. No validation is performed; see [`Snapshot::from_parts`].
    pub fn new(mut products: Vec<Product>, groups: Vec<ParameterGroup>) -> Self {
        products.sort_by_key(|p| p.sort_order);
        for product in &mut products {
            product.attributes.sort_by_key(|a| a.sort_order);
        }
        let groups: HashMap<GroupKey, ParameterGroup> = groups
            .into_iter()
            .filter(|g| !g.is_empty())
            .map(|mut g| {
                g.param.sort_by_key(|p| p.sort_order);
                (g.key(), g)
            })
            .collect();
        let watermarks = Watermarks::derive(&products, &groups);
        Self {
            products,
            groups,
            tombstones: Vec::new(),
            watermarks,
        }
    }

    /// Validating constructor used for imported data.
    ///
    /// Rejects duplicate product ids, duplicate attribute ids within a
    /// product, duplicate group keys, duplicate parameter ids within a group,
    /// groups whose attribute does not exist, groups that mix variants, and
    /// identifiers equal to `i64::MAX`.
    /// Records carrying the `deleted` status are moved out of the live tree
    /// into tombstones.
    pub fn from_parts(products: Vec<Product>, groups: Vec<ParameterGroup>) -> StoreResult<Self> {
        let mut product_ids = HashSet::new();
        for product in &products {
            if product.product_id.checked_next().is_none() {
                return Err(out_of_range("product", product.product_id));
            }
            if !product_ids.insert(product.product_id) {
                return Err(StoreError::MalformedImport(format!(
                    "duplicate product id {}",
                    product.product_id
                )));
            }
            let mut attribute_ids = HashSet::new();
            for attr in &product.attributes {
                if attr.attribute_id.checked_next().is_none() {
                    return Err(out_of_range("attribute", attr.attribute_id));
                }
                if !attribute_ids.insert(attr.attribute_id) {
                    return Err(StoreError::MalformedImport(format!(
                        "duplicate attribute id {} in product {}",
                        attr.attribute_id, product.product_id
                    )));
                }
            }
        }

        let mut keys = HashSet::new();
        for group in &groups {
            let (pid, aid) = group.key();
            if !keys.insert(group.key()) {
                return Err(StoreError::MalformedImport(format!(
                    "duplicate parameter group {pid}/{aid}"
                )));
            }
            let owner = products.iter().find(|p| p.product_id == pid);
            if owner.and_then(|p| p.attribute(aid)).is_none() {
                return Err(StoreError::MalformedImport(format!(
                    "parameter group {pid}/{aid} has no matching attribute"
                )));
            }
            let mut param_ids = HashSet::new();
            for param in &group.param {
                if param.param_id.checked_next().is_none() {
                    return Err(out_of_range("parameter", param.param_id));
                }
                if !param_ids.insert(param.param_id) {
                    return Err(StoreError::MalformedImport(format!(
                        "duplicate parameter id {} in group {pid}/{aid}",
                        param.param_id
                    )));
                }
            }
            group.variant()?;
        }

        let mut snapshot = Self::new(products, groups);
        snapshot.extract_deleted();
        Ok(snapshot)
    }

    fn extract_deleted(&mut self) {
        let mut removed = Vec::new();
        for product in &self.products {
            if product.status == ChangeStatus::Deleted {
                removed.push(EntityKey::Product {
                    product_id: product.product_id,
                });
                continue;
            }
            for attr in &product.attributes {
                if attr.status == ChangeStatus::Deleted {
                    removed.push(EntityKey::Attribute {
                        product_id: product.product_id,
                        attribute_id: attr.attribute_id,
                    });
                }
            }
        }
        for group in self.groups.values() {
            for param in &group.param {
                if param.status == ChangeStatus::Deleted {
                    removed.push(EntityKey::Parameter {
                        product_id: group.product_id,
                        attribute_id: group.attribute_id,
                        param_id: param.param_id,
                    });
                }
            }
        }
        for key in removed {
            if self.is_tombstoned(&key) {
                continue;
            }
            self.remove_entity(&key);
            self.record_tombstone(key);
        }
    }

    /// Removes an entity and everything below it from the live tree.
    ///
    /// Returns false if nothing with that key was live.
    pub fn remove_entity(&mut self, key: &EntityKey) -> bool {
        match *key {
            EntityKey::Product { product_id } => {
                let before = self.products.len();
                self.products.retain(|p| p.product_id != product_id);
                self.groups.retain(|(pid, _), _| *pid != product_id);
                before != self.products.len()
            }
            EntityKey::Attribute {
                product_id,
                attribute_id,
            } => {
                let Some(product) = self.product_mut(product_id) else {
                    return false;
                };
                let before = product.attributes.len();
                product.attributes.retain(|a| a.attribute_id != attribute_id);
                let removed = before != product.attributes.len();
                self.groups.remove(&(product_id, attribute_id));
                removed
            }
            EntityKey::Parameter {
                product_id,
                attribute_id,
                param_id,
            } => {
                let key = (product_id, attribute_id);
                let Some(group) = self.groups.get_mut(&key) else {
                    return false;
                };
                let before = group.param.len();
                group.param.retain(|p| p.param_id != param_id);
                let removed = before != group.param.len();
                if group.is_empty() {
                    self.groups.remove(&key);
                }
                removed
            }
        }
    }

    // ── Lookups ──────────────────────────────────────────────────

    /// Live products in display order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.product_id == product_id)
    }

    pub fn product_index(&self, product_id: ProductId) -> Option<usize> {
        self.products.iter().position(|p| p.product_id == product_id)
    }

    pub fn attribute(&self, product_id: ProductId, attribute_id: AttributeId) -> Option<&Attribute> {
        self.product(product_id)?.attribute(attribute_id)
    }

    /// The parameter group of an attribute, absent when it has no parameters.
    pub fn group(&self, product_id: ProductId, attribute_id: AttributeId) -> Option<&ParameterGroup> {
        self.groups.get(&(product_id, attribute_id))
    }

    /// Parameters of an attribute in display order; empty if it has none.
    pub fn params(&self, product_id: ProductId, attribute_id: AttributeId) -> &[Parameter] {
        self.group(product_id, attribute_id)
            .map_or(&[], |g| g.param.as_slice())
    }

    pub fn param(
        &self,
        product_id: ProductId,
        attribute_id: AttributeId,
        param_id: ParamId,
    ) -> Option<&Parameter> {
        self.group(product_id, attribute_id)?.get(param_id)
    }

    /// Derived `paramHas`: true iff the attribute's parameter list is
    /// non-empty.
    pub fn param_has(&self, product_id: ProductId, attribute_id: AttributeId) -> bool {
        !self.params(product_id, attribute_id).is_empty()
    }

    /// All parameter groups ordered by key.
    pub fn groups(&self) -> Vec<&ParameterGroup> {
        let mut groups: Vec<&ParameterGroup> = self.groups.values().collect();
        groups.sort_by_key(|g| g.key());
        groups
    }

    /// Removed entities awaiting acknowledgement, oldest first.
    pub fn tombstones(&self) -> &[Tombstone] {
        &self.tombstones
    }

    /// True if `key` or one of its ancestors has been tombstoned.
    pub fn is_tombstoned(&self, key: &EntityKey) -> bool {
        self.tombstones.iter().any(|t| t.covers(key))
    }

    /// Status of a live entity, or `Deleted` for a tombstoned one.
    pub fn status_of(&self, key: &EntityKey) -> Option<ChangeStatus> {
        let live = match *key {
            EntityKey::Product { product_id } => self.product(product_id).map(|p| p.status),
            EntityKey::Attribute {
                product_id,
                attribute_id,
            } => self.attribute(product_id, attribute_id).map(|a| a.status),
            EntityKey::Parameter {
                product_id,
                attribute_id,
                param_id,
            } => self.param(product_id, attribute_id, param_id).map(|p| p.status),
        };
        live.or_else(|| {
            self.tombstones
                .iter()
                .any(|t| t.key == *key)
                .then_some(ChangeStatus::Deleted)
        })
    }

    // ── Dirty queries ────────────────────────────────────────────

    /// True if anything in the snapshot still has to be synced.
    pub fn is_dirty(&self) -> bool {
        !self.tombstones.is_empty()
            || self.products.iter().any(|p| {
                p.status.is_dirty() || p.attributes.iter().any(|a| a.status.is_dirty())
            })
            || self
                .groups
                .values()
                .any(|g| g.param.iter().any(|p| p.status.is_dirty()))
    }

    /// True if the product, any descendant, or any tombstone under it is
    /// dirty.
    pub fn is_product_dirty(&self, product_id: ProductId) -> bool {
        let own = self.product(product_id).is_some_and(|p| {
            p.status.is_dirty() || p.attributes.iter().any(|a| a.status.is_dirty())
        });
        own || self
            .groups
            .values()
            .filter(|g| g.product_id == product_id)
            .any(|g| g.param.iter().any(|p| p.status.is_dirty()))
            || self
                .tombstones
                .iter()
                .any(|t| t.key.product_id() == product_id)
    }

    /// True if any parameter of the attribute is dirty or was deleted and not
    /// yet acknowledged.
    pub fn are_params_dirty(&self, product_id: ProductId, attribute_id: AttributeId) -> bool {
        self.params(product_id, attribute_id)
            .iter()
            .any(|p| p.status.is_dirty())
            || self.tombstones.iter().any(|t| {
                matches!(t.key, EntityKey::Parameter { .. })
                    && t.key.group_key() == Some((product_id, attribute_id))
            })
    }

    /// A copy with every live status reset to `synced` and no tombstones.
    #[must_use]
    pub fn with_all_synced(&self) -> Self {
        let mut next = self.clone();
        for product in &mut next.products {
            product.status = ChangeStatus::Synced;
            for attr in &mut product.attributes {
                attr.status = ChangeStatus::Synced;
            }
        }
        for group in next.groups.values_mut() {
            for param in &mut group.param {
                param.status = ChangeStatus::Synced;
            }
        }
        next.tombstones.clear();
        next
    }

    // ── Low-level mutation (used by the engine and the sync tracker) ──

    /// Mutable access to the product list. Callers keep `sortOrder`
    /// consistent themselves.
    pub fn products_mut(&mut self) -> &mut Vec<Product> {
        &mut self.products
    }

    pub fn product_mut(&mut self, product_id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.product_id == product_id)
    }

    pub fn attribute_mut(
        &mut self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> Option<&mut Attribute> {
        self.product_mut(product_id)?
            .attributes
            .iter_mut()
            .find(|a| a.attribute_id == attribute_id)
    }

    pub fn group_mut(
        &mut self,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> Option<&mut ParameterGroup> {
        self.groups.get_mut(&(product_id, attribute_id))
    }

    pub fn param_mut(
        &mut self,
        product_id: ProductId,
        attribute_id: AttributeId,
        param_id: ParamId,
    ) -> Option<&mut Parameter> {
        self.group_mut(product_id, attribute_id)?
            .param
            .iter_mut()
            .find(|p| p.param_id == param_id)
    }

    /// Stores a group under its key; an empty group removes the key instead.
    pub fn put_group(&mut self, group: ParameterGroup) {
        if group.is_empty() {
            self.groups.remove(&group.key());
        } else {
            self.groups.insert(group.key(), group);
        }
    }

    /// Sets the status of a live entity. Returns false if it is not live.
    pub fn set_status(&mut self, key: &EntityKey, status: ChangeStatus) -> bool {
        let slot = match *key {
            EntityKey::Product { product_id } => self.product_mut(product_id).map(|p| &mut p.status),
            EntityKey::Attribute {
                product_id,
                attribute_id,
            } => self
                .attribute_mut(product_id, attribute_id)
                .map(|a| &mut a.status),
            EntityKey::Parameter {
                product_id,
                attribute_id,
                param_id,
            } => self
                .param_mut(product_id, attribute_id, param_id)
                .map(|p| &mut p.status),
        };
        match slot {
            Some(s) => {
                *s = status;
                true
            }
            None => false,
        }
    }

    /// Records that `key` was deleted. Tombstones underneath it are folded
    /// into the new one; nothing is recorded if an ancestor is already
    /// tombstoned.
    pub fn record_tombstone(&mut self, key: EntityKey) {
        if self.is_tombstoned(&key) {
            return;
        }
        self.tombstones.retain(|t| !t.key.is_within(&key));
        self.tombstones.push(Tombstone::new(key));
    }

    /// Drops tombstones underneath `key` without recording one for it.
    pub fn discard_tombstones_within(&mut self, key: &EntityKey) {
        self.tombstones.retain(|t| !t.key.is_within(key));
    }

    /// Purges an acknowledged tombstone. Returns false if it was not present.
    pub fn purge_tombstone(&mut self, key: &EntityKey) -> bool {
        let before = self.tombstones.len();
        self.tombstones.retain(|t| t.key != *key);
        before != self.tombstones.len()
    }

    // ── Identity allocation ──────────────────────────────────────

    /// Issues a product id that has never been used in this snapshot's
    /// lineage.
    ///
    /// # Errors
    ///
    /// [`StoreError::IdsExhausted`] once the id space is used up.
    pub fn allocate_product_id(&mut self) -> StoreResult<ProductId> {
        let max_live = self.products.iter().map(|p| p.product_id.get()).max();
        let (id, next) = issue(max_live, self.watermarks.next_product)
            .ok_or(StoreError::IdsExhausted("product"))?;
        self.watermarks.next_product = next;
        Ok(ProductId::new(id))
    }

    /// Issues an attribute id unique within `product_id`: the larger of the
    /// current maximum plus one and the product's watermark, `0` for the
    /// first attribute ever.
    pub fn allocate_attribute_id(&mut self, product_id: ProductId) -> StoreResult<AttributeId> {
        let max_live = self
            .product(product_id)
            .and_then(Product::max_attribute_id)
            .map(|a| a.get());
        let mark = self
            .watermarks
            .next_attribute
            .get(&product_id)
            .copied()
            .unwrap_or(0);
        let (id, next) = issue(max_live, mark).ok_or(StoreError::IdsExhausted("attribute"))?;
        self.watermarks.next_attribute.insert(product_id, next);
        Ok(AttributeId::new(id))
    }

    /// Issues a parameter id unique across the snapshot.
    pub fn allocate_param_id(&mut self) -> StoreResult<ParamId> {
        let max_live = self
            .groups
            .values()
            .flat_map(|g| g.param.iter())
            .map(|p| p.param_id.get())
            .max();
        let (id, next) = issue(max_live, self.watermarks.next_param)
            .ok_or(StoreError::IdsExhausted("parameter"))?;
        self.watermarks.next_param = next;
        Ok(ParamId::new(id))
    }
}
