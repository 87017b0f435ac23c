#![allow(dead_code)]

use prodcfg_model::{Attribute, ParamVariant, Parameter, ParameterGroup, Product};
use prodcfg_types::{AttributeId, ChangeStatus, ParamId, ProductId, sort_order_at};

pub fn pid(v: i64) -> ProductId {
    ProductId::new(v)
}

pub fn aid(v: i64) -> AttributeId {
    AttributeId::new(v)
}

pub fn prm(v: i64) -> ParamId {
    ParamId::new(v)
}

pub fn synced_product(id: i64, attribute_ids: &[i64]) -> Product {
    let mut product = Product::new(pid(id), format!("P{id}"));
    product.status = ChangeStatus::Synced;
    product.sort_order = sort_order_at(id as usize);
    product.attributes = attribute_ids
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let mut attr = Attribute::new(aid(*a), format!("attr{a}"), "string");
            attr.status = ChangeStatus::Synced;
            attr.sort_order = sort_order_at(i);
            attr
        })
        .collect();
    product
}

pub fn synced_group(product: i64, attribute: i64, param_ids: &[i64]) -> ParameterGroup {
    let mut group = ParameterGroup::new(pid(product), aid(attribute));
    group.param = param_ids
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut param = Parameter::new(prm(*p), ParamVariant::Type1);
            param.status = ChangeStatus::Synced;
            param.sort_order = sort_order_at(i);
            param
        })
        .collect();
    group
}
