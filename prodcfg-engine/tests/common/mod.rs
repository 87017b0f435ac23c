#![allow(dead_code)]

use prodcfg_engine::{Applied, EngineConfig, MutationEngine};
use prodcfg_model::{Attribute, ParamVariant, Parameter, ParameterGroup, Product};
use prodcfg_store::Snapshot;
use prodcfg_types::{AttributeId, ChangeStatus, EntityKey, ParamId, ProductId, sort_order_at};

pub fn pid(v: i64) -> ProductId {
    ProductId::new(v)
}

pub fn aid(v: i64) -> AttributeId {
    AttributeId::new(v)
}

pub fn prm(v: i64) -> ParamId {
    ParamId::new(v)
}

pub fn engine() -> MutationEngine {
    MutationEngine::new(EngineConfig::default())
}

/// Synced products, each with synced attributes `0..attrs`.
pub fn synced(shape: &[usize]) -> Snapshot {
    let products = shape
        .iter()
        .enumerate()
        .map(|(p, attrs)| {
            let mut product = Product::new(pid(p as i64), format!("P{p}"));
            product.status = ChangeStatus::Synced;
            product.sort_order = sort_order_at(p);
            product.attributes = (0..*attrs)
                .map(|a| {
                    let mut attr = Attribute::new(aid(a as i64), format!("attr{a}"), "string");
                    attr.status = ChangeStatus::Synced;
                    attr.sort_order = sort_order_at(a);
                    attr
                })
                .collect();
            product
        })
        .collect();
    Snapshot::new(products, Vec::new())
}

/// `synced` plus a synced group of `count` parameters on `(product, attribute)`.
pub fn with_params(
    snapshot: Snapshot,
    product: i64,
    attribute: i64,
    variant: ParamVariant,
    ids: &[i64],
) -> Snapshot {
    let mut group = ParameterGroup::new(pid(product), aid(attribute));
    group.param = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let mut param = Parameter::new(prm(*id), variant);
            param.status = ChangeStatus::Synced;
            param.sort_order = sort_order_at(i);
            param
        })
        .collect();
    let mut groups: Vec<ParameterGroup> = snapshot.groups().into_iter().cloned().collect();
    groups.push(group);
    Snapshot::new(snapshot.products().to_vec(), groups)
}

pub fn param_key(product: i64, attribute: i64, param: i64) -> EntityKey {
    EntityKey::Parameter {
        product_id: pid(product),
        attribute_id: aid(attribute),
        param_id: prm(param),
    }
}

pub fn created_param(applied: &Applied) -> ParamId {
    match applied.created_key() {
        Some(EntityKey::Parameter { param_id, .. }) => param_id,
        other => panic!("expected a created parameter, got {other:?}"),
    }
}

pub fn sort_orders<T, F: Fn(&T) -> i64>(items: &[T], f: F) -> Vec<i64> {
    items.iter().map(f).collect()
}

pub fn stride(len: usize) -> Vec<i64> {
    (0..len).map(sort_order_at).collect()
}
