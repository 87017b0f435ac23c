//! Snapshot-in, snapshot-out operations on the configuration tree.
//!
//! Every operation borrows the current [`Snapshot`] and returns an
//! [`Applied`] carrying the next one. The input is never modified; on error
//! the caller simply keeps it.
//!
//! Structural no-ops (unknown ids, moves at a boundary) return
//! [`Outcome::Unchanged`] with a snapshot equal to the input. Missing anchors
//! fall back to a fixed position instead of failing.

use crate::order::{renumber, shift};
use crate::{Direction, EngineConfig, EngineError, EngineResult};
use prodcfg_model::{
    Attribute, AttributeField, FieldValue, ParamField, ParamVariant, Parameter, ParameterGroup,
    Product, ProductField,
};
use prodcfg_store::Snapshot;
use prodcfg_types::{AttributeId, ChangeStatus, EntityKey, ParamId, ProductId};
use serde::{Deserialize, Serialize};

/// What an operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "key", rename_all = "snake_case")]
pub enum Outcome {
    /// The tree changed.
    Changed,
    /// A new entity was inserted.
    Created(EntityKey),
    /// Nothing applied; the snapshot equals the input.
    Unchanged,
}

/// Result of a successful operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub snapshot: Snapshot,
    pub outcome: Outcome,
}

impl Applied {
    fn changed(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            outcome: Outcome::Changed,
        }
    }

    fn created(snapshot: Snapshot, key: EntityKey) -> Self {
        Self {
            snapshot,
            outcome: Outcome::Created(key),
        }
    }

    fn unchanged(snapshot: &Snapshot) -> Self {
        Self {
            snapshot: snapshot.clone(),
            outcome: Outcome::Unchanged,
        }
    }

    /// Key of the created entity, if any.
    pub fn created_key(&self) -> Option<EntityKey> {
        match self.outcome {
            Outcome::Created(key) => Some(key),
            _ => None,
        }
    }
}

/// Applies structural and field edits to snapshots.
#[derive(Debug, Clone, Default)]
pub struct MutationEngine {
    config: EngineConfig,
}

impl MutationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Products ─────────────────────────────────────────────────

    /// Inserts a new product right after `after`, or at the end when `after`
    /// is `None` or unknown.
    pub fn add_product(&self, snapshot: &Snapshot, after: Option<ProductId>) -> EngineResult<Applied> {
        let mut next = snapshot.clone();
        let product_id = next.allocate_product_id()?;
        let product = Product::new(
            product_id,
            format!("{}{}", self.config.new_product_prefix, product_id),
        );
        let index = after
            .and_then(|a| next.product_index(a))
            .map_or(next.products().len(), |i| i + 1);

        let products = next.products_mut();
        products.insert(index, product);
        renumber(products);
        Ok(Applied::created(next, EntityKey::Product { product_id }))
    }

    /// Removes a product with its attributes and parameter groups.
    ///
    /// # Errors
    ///
    /// [`EngineError::Precondition`] if it is the only product left.
    pub fn delete_product(&self, snapshot: &Snapshot, product_id: ProductId) -> EngineResult<Applied> {
        let Some(product) = snapshot.product(product_id) else {
            return Ok(Applied::unchanged(snapshot));
        };
        if snapshot.products().len() <= 1 {
            return Err(EngineError::Precondition(format!(
                "product {product_id} is the last product and cannot be deleted"
            )));
        }

        let status = product.status;
        let key = EntityKey::Product { product_id };
        let mut next = snapshot.clone();
        next.remove_entity(&key);
        bury(&mut next, key, status);
        renumber(next.products_mut());
        Ok(Applied::changed(next))
    }

    /// Replaces one product cell.
    pub fn update_product_field(
        &self,
        snapshot: &Snapshot,
        product_id: ProductId,
        field: ProductField,
        value: FieldValue,
    ) -> EngineResult<Applied> {
        let Some(current) = snapshot.product(product_id) else {
            return Ok(Applied::unchanged(snapshot));
        };
        if current.field(field) == value {
            return Ok(Applied::unchanged(snapshot));
        }

        let mut next = snapshot.clone();
        let Some(product) = next.product_mut(product_id) else {
            return Ok(Applied::unchanged(snapshot));
        };
        product.set_field(field, value)?;
        product.status = product.status.touched();
        Ok(Applied::changed(next))
    }

    // ── Attributes ───────────────────────────────────────────────

    /// Inserts a new attribute into a product.
    ///
    /// With no anchor (or an empty product) it goes first; after an unknown
    /// anchor it is appended.
    pub fn add_attribute(
        &self,
        snapshot: &Snapshot,
        product_id: ProductId,
        after: Option<AttributeId>,
    ) -> EngineResult<Applied> {
        if snapshot.product(product_id).is_none() {
            return Ok(Applied::unchanged(snapshot));
        }

        let mut next = snapshot.clone();
        let attribute_id = next.allocate_attribute_id(product_id)?;
        let attribute = Attribute::new(
            attribute_id,
            format!("{} {}", self.config.new_attribute_label, attribute_id),
            self.config.default_attribute_type.clone(),
        );
        let Some(product) = next.product_mut(product_id) else {
            return Ok(Applied::unchanged(snapshot));
        };
        let index = match after {
            None => 0,
            Some(anchor) => product
                .attribute_index(anchor)
                .map_or(product.attributes.len(), |i| i + 1),
        };
        product.attributes.insert(index, attribute);
        renumber(&mut product.attributes);

        Ok(Applied::created(
            next,
            EntityKey::Attribute {
                product_id,
                attribute_id,
            },
        ))
    }

    /// Removes an attribute and its parameter group.
    pub fn delete_attribute(
        &self,
        snapshot: &Snapshot,
        product_id: ProductId,
        attribute_id: AttributeId,
    ) -> EngineResult<Applied> {
        let Some(attribute) = snapshot.attribute(product_id, attribute_id) else {
            return Ok(Applied::unchanged(snapshot));
        };

        let status = attribute.status;
        let key = EntityKey::Attribute {
            product_id,
            attribute_id,
        };
        let mut next = snapshot.clone();
        next.remove_entity(&key);
        bury(&mut next, key, status);
        if let Some(product) = next.product_mut(product_id) {
            renumber(&mut product.attributes);
        }
        Ok(Applied::changed(next))
    }

    /// Swaps an attribute with its neighbour; no-op at the boundary.
    pub fn move_attribute(
        &self,
        snapshot: &Snapshot,
        product_id: ProductId,
        attribute_id: AttributeId,
        direction: Direction,
    ) -> EngineResult<Applied> {
        let Some(index) = snapshot
            .product(product_id)
            .and_then(|p| p.attribute_index(attribute_id))
        else {
            return Ok(Applied::unchanged(snapshot));
        };

        let mut next = snapshot.clone();
        let moved = next
            .product_mut(product_id)
            .is_some_and(|p| shift(&mut p.attributes, index, direction));
        if !moved {
            return Ok(Applied::unchanged(snapshot));
        }
        Ok(Applied::changed(next))
    }

    /// Replaces one attribute cell. The parameter list is never touched.
    pub fn update_attribute_field(
        &self,
        snapshot: &Snapshot,
        product_id: ProductId,
        attribute_id: AttributeId,
        field: AttributeField,
        value: FieldValue,
    ) -> EngineResult<Applied> {
        let Some(current) = snapshot.attribute(product_id, attribute_id) else {
            return Ok(Applied::unchanged(snapshot));
        };
        if current.field(field) == value {
            return Ok(Applied::unchanged(snapshot));
        }

        let mut next = snapshot.clone();
        let Some(attribute) = next.attribute_mut(product_id, attribute_id) else {
            return Ok(Applied::unchanged(snapshot));
        };
        attribute.set_field(field, value)?;
        attribute.status = attribute.status.touched();
        Ok(Applied::changed(next))
    }

    // ── Parameters ───────────────────────────────────────────────

    /// Adds a parameter to an attribute.
    ///
    /// The first parameter of an empty group takes the variant named by the
    /// attribute's `contract` (default `type1`); later ones take the group's
    /// own variant. The new element goes right after `after`, or last when
    /// the anchor is absent or unknown.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownVariant`] if the existing group mixes variants.
    pub fn add_parameter(
        &self,
        snapshot: &Snapshot,
        product_id: ProductId,
        attribute_id: AttributeId,
        after: Option<ParamId>,
    ) -> EngineResult<Applied> {
        let Some(attribute) = snapshot.attribute(product_id, attribute_id) else {
            return Ok(Applied::unchanged(snapshot));
        };
        let mut group = snapshot
            .group(product_id, attribute_id)
            .cloned()
            .unwrap_or_else(|| ParameterGroup::new(product_id, attribute_id));
        let variant = group
            .variant()?
            .unwrap_or_else(|| ParamVariant::from_contract(&attribute.contract));

        let mut next = snapshot.clone();
        let param_id = next.allocate_param_id()?;
        let index = after
            .and_then(|a| group.index_of(a))
            .map_or(group.len(), |i| i + 1);
        group.param.insert(index, Parameter::new(param_id, variant));
        renumber(&mut group.param);
        next.put_group(group);

        Ok(Applied::created(
            next,
            EntityKey::Parameter {
                product_id,
                attribute_id,
                param_id,
            },
        ))
    }

    /// Removes a parameter. Removing the last one drops the group, so the
    /// attribute's `paramHas` derives to false.
    pub fn delete_parameter(
        &self,
        snapshot: &Snapshot,
        product_id: ProductId,
        attribute_id: AttributeId,
        param_id: ParamId,
    ) -> EngineResult<Applied> {
        let Some(param) = snapshot.param(product_id, attribute_id, param_id) else {
            return Ok(Applied::unchanged(snapshot));
        };

        let status = param.status;
        let key = EntityKey::Parameter {
            product_id,
            attribute_id,
            param_id,
        };
        let mut next = snapshot.clone();
        next.remove_entity(&key);
        bury(&mut next, key, status);
        if let Some(group) = next.group_mut(product_id, attribute_id) {
            renumber(&mut group.param);
        }
        Ok(Applied::changed(next))
    }

    /// Swaps a parameter with its neighbour; no-op at the boundary.
    pub fn move_parameter(
        &self,
        snapshot: &Snapshot,
        product_id: ProductId,
        attribute_id: AttributeId,
        param_id: ParamId,
        direction: Direction,
    ) -> EngineResult<Applied> {
        let Some(index) = snapshot
            .group(product_id, attribute_id)
            .and_then(|g| g.index_of(param_id))
        else {
            return Ok(Applied::unchanged(snapshot));
        };

        let mut next = snapshot.clone();
        let moved = next
            .group_mut(product_id, attribute_id)
            .is_some_and(|g| shift(&mut g.param, index, direction));
        if !moved {
            return Ok(Applied::unchanged(snapshot));
        }
        Ok(Applied::changed(next))
    }

    /// Replaces one payload cell of a parameter.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownVariant`] if the field belongs to another
    /// variant or the group mixes variants; [`EngineError::FieldKind`] if
    /// the value has the wrong kind.
    pub fn update_parameter_field(
        &self,
        snapshot: &Snapshot,
        product_id: ProductId,
        attribute_id: AttributeId,
        param_id: ParamId,
        field: ParamField,
        value: FieldValue,
    ) -> EngineResult<Applied> {
        let Some(group) = snapshot.group(product_id, attribute_id) else {
            return Ok(Applied::unchanged(snapshot));
        };
        group.variant()?;
        let Some(current) = group.get(param_id) else {
            return Ok(Applied::unchanged(snapshot));
        };
        if current.field(field).as_ref() == Some(&value) {
            return Ok(Applied::unchanged(snapshot));
        }

        let mut next = snapshot.clone();
        let Some(param) = next.param_mut(product_id, attribute_id, param_id) else {
            return Ok(Applied::unchanged(snapshot));
        };
        param.set_field(field, value)?;
        param.status = param.status.touched();
        Ok(Applied::changed(next))
    }
}

/// Records a tombstone for an entity the remote side knows about. An entity
/// that was never synced vanishes, along with any stale tombstones under it.
fn bury(snapshot: &mut Snapshot, key: EntityKey, status: ChangeStatus) {
    if status.is_new() {
        snapshot.discard_tombstones_within(&key);
    } else {
        snapshot.record_tombstone(key);
    }
}
