mod common;

use common::*;
use pretty_assertions::assert_eq;
use prodcfg_engine::{Direction, EngineConfig, EngineError, MutationEngine, Outcome};
use prodcfg_model::{AttributeField, FieldKind, FieldValue, ParamField, ParamPayload, ParamVariant, ProductField};
use prodcfg_types::{ChangeStatus, EntityKey};

// ── Products ─────────────────────────────────────────────────────

#[test]
fn add_product_appends_with_prefix_and_new_status() {
    let snap = synced(&[1, 1]);
    let applied = engine().add_product(&snap, None).unwrap();
    let products = applied.snapshot.products();

    assert_eq!(applied.outcome, Outcome::Created(EntityKey::Product { product_id: pid(2) }));
    assert_eq!(products.len(), 3);
    assert_eq!(products[2].prefix, "NEW_P2");
    assert_eq!(products[2].status, ChangeStatus::New);
    assert!(products[2].attributes.is_empty());
    assert_eq!(sort_orders(products, |p| p.sort_order), stride(3));
}

#[test]
fn add_product_after_anchor_renumbers_and_touches_followers() {
    let snap = synced(&[0, 0, 0]);
    let applied = engine().add_product(&snap, Some(pid(0))).unwrap();
    let products = applied.snapshot.products();

    let ids: Vec<i64> = products.iter().map(|p| p.product_id.get()).collect();
    assert_eq!(ids, vec![0, 3, 1, 2]);
    assert_eq!(sort_orders(products, |p| p.sort_order), stride(4));
    assert_eq!(products[0].status, ChangeStatus::Synced);
    assert_eq!(products[2].status, ChangeStatus::Updated);
    assert_eq!(products[3].status, ChangeStatus::Updated);
}

#[test]
fn add_product_after_unknown_anchor_appends() {
    let snap = synced(&[0]);
    let applied = engine().add_product(&snap, Some(pid(42))).unwrap();
    assert_eq!(applied.snapshot.products()[1].product_id, pid(1));
}

#[test]
fn custom_prefix_from_config() {
    let config = EngineConfig::from_json(r#"{"new_product_prefix": "DRAFT-"}"#).unwrap();
    assert_eq!(config.new_attribute_label, "New Attr");
    let applied = MutationEngine::new(config).add_product(&synced(&[0]), None).unwrap();
    assert_eq!(applied.snapshot.products()[1].prefix, "DRAFT-1");
}

#[test]
fn deleting_last_product_is_a_precondition_error() {
    let snap = synced(&[2]);
    let err = engine().delete_product(&snap, pid(0)).unwrap_err();
    assert!(matches!(err, EngineError::Precondition(_)));
    assert_eq!(snap, synced(&[2]));
}

#[test]
fn delete_synced_product_leaves_one_tombstone() {
    let snap = with_params(synced(&[2, 1]), 0, 1, ParamVariant::Type1, &[0, 1]);
    let applied = engine().delete_product(&snap, pid(0)).unwrap();
    let next = applied.snapshot;

    assert_eq!(applied.outcome, Outcome::Changed);
    assert!(next.product(pid(0)).is_none());
    assert!(next.group(pid(0), aid(1)).is_none());
    assert_eq!(next.tombstones().len(), 1);
    assert_eq!(next.tombstones()[0].key, EntityKey::Product { product_id: pid(0) });
    assert_eq!(next.products()[0].sort_order, 0);
    assert_eq!(next.products()[0].status, ChangeStatus::Updated);
}

#[test]
fn delete_new_product_leaves_no_trace() {
    let snap = synced(&[0]);
    let added = engine().add_product(&snap, None).unwrap().snapshot;
    let next = engine().delete_product(&added, pid(1)).unwrap().snapshot;
    assert!(next.tombstones().is_empty());
    assert!(!next.is_dirty());
}

#[test]
fn delete_unknown_product_is_unchanged() {
    let snap = synced(&[0, 0]);
    let applied = engine().delete_product(&snap, pid(9)).unwrap();
    assert_eq!(applied.outcome, Outcome::Unchanged);
    assert_eq!(applied.snapshot, snap);
}

#[test]
fn update_product_field_touches_status() {
    let snap = synced(&[0]);
    let applied = engine()
        .update_product_field(&snap, pid(0), ProductField::CfgType, "premium".into())
        .unwrap();
    let product = applied.snapshot.product(pid(0)).unwrap();
    assert_eq!(product.cfg_type, "premium");
    assert_eq!(product.status, ChangeStatus::Updated);
}

#[test]
fn update_product_field_with_same_value_is_unchanged() {
    let snap = synced(&[0]);
    let applied = engine()
        .update_product_field(&snap, pid(0), ProductField::Prefix, "P0".into())
        .unwrap();
    assert_eq!(applied.outcome, Outcome::Unchanged);
}

#[test]
fn product_ids_are_not_reused_after_delete() {
    let e = engine();
    let snap = synced(&[0]);
    let a = e.add_product(&snap, None).unwrap().snapshot;
    let b = e.delete_product(&a, pid(1)).unwrap().snapshot;
    let c = e.add_product(&b, None).unwrap();
    assert_eq!(c.created_key(), Some(EntityKey::Product { product_id: pid(2) }));
}

#[test]
fn exhausted_product_ids_are_an_error() {
    let mut product = prodcfg_model::Product::new(pid(i64::MAX), "MAX");
    product.status = ChangeStatus::Synced;
    let snap = prodcfg_store::Snapshot::new(vec![product], Vec::new());
    let err = engine().add_product(&snap, None).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Store(prodcfg_store::StoreError::IdsExhausted("product"))
    ));
}

// ── Attributes ───────────────────────────────────────────────────

#[test]
fn add_attribute_without_anchor_goes_first() {
    let snap = synced(&[2]);
    let applied = engine().add_attribute(&snap, pid(0), None).unwrap();
    let attrs = &applied.snapshot.product(pid(0)).unwrap().attributes;

    assert_eq!(attrs[0].attribute_id, aid(2));
    assert_eq!(attrs[0].attribute, "New Attr 2");
    assert_eq!(attrs[0].attribute_type, "string");
    assert_eq!(attrs[0].status, ChangeStatus::New);
    assert_eq!(sort_orders(attrs, |a| a.sort_order), stride(3));
    assert_eq!(attrs[1].status, ChangeStatus::Updated);
}

#[test]
fn first_attribute_of_empty_product_has_id_zero() {
    let snap = synced(&[0]);
    let applied = engine().add_attribute(&snap, pid(0), Some(aid(5))).unwrap();
    let attrs = &applied.snapshot.product(pid(0)).unwrap().attributes;
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs[0].attribute_id, aid(0));
    assert_eq!(attrs[0].attribute, "New Attr 0");
}

#[test]
fn add_attribute_after_anchor_and_unknown_anchor() {
    let e = engine();
    let snap = synced(&[3]);
    let after = e.add_attribute(&snap, pid(0), Some(aid(0))).unwrap().snapshot;
    let ids: Vec<i64> = after.product(pid(0)).unwrap().attributes.iter().map(|a| a.attribute_id.get()).collect();
    assert_eq!(ids, vec![0, 3, 1, 2]);

    let appended = e.add_attribute(&snap, pid(0), Some(aid(77))).unwrap().snapshot;
    let last = appended.product(pid(0)).unwrap().attributes.last().unwrap().attribute_id;
    assert_eq!(last, aid(3));
}

#[test]
fn add_attribute_to_unknown_product_is_unchanged() {
    let snap = synced(&[1]);
    let applied = engine().add_attribute(&snap, pid(4), None).unwrap();
    assert_eq!(applied.outcome, Outcome::Unchanged);
}

#[test]
fn delete_attribute_drops_group_and_folds_param_tombstones() {
    let e = engine();
    let snap = with_params(synced(&[2]), 0, 0, ParamVariant::Type1, &[0, 1]);
    let one = e.delete_parameter(&snap, pid(0), aid(0), prm(0)).unwrap().snapshot;
    assert_eq!(one.tombstones().len(), 1);

    let next = e.delete_attribute(&one, pid(0), aid(0)).unwrap().snapshot;
    assert!(next.attribute(pid(0), aid(0)).is_none());
    assert!(next.group(pid(0), aid(0)).is_none());
    assert_eq!(
        next.tombstones()[0].key,
        EntityKey::Attribute { product_id: pid(0), attribute_id: aid(0) }
    );
    assert_eq!(next.tombstones().len(), 1);
    assert_eq!(next.product(pid(0)).unwrap().attributes[0].sort_order, 0);
}

#[test]
fn move_attribute_swaps_and_renumbers() {
    let snap = synced(&[3]);
    let next = engine().move_attribute(&snap, pid(0), aid(2), Direction::Up).unwrap().snapshot;
    let attrs = &next.product(pid(0)).unwrap().attributes;
    let ids: Vec<i64> = attrs.iter().map(|a| a.attribute_id.get()).collect();
    assert_eq!(ids, vec![0, 2, 1]);
    assert_eq!(sort_orders(attrs, |a| a.sort_order), stride(3));
    assert_eq!(attrs[0].status, ChangeStatus::Synced);
    assert_eq!(attrs[1].status, ChangeStatus::Updated);
}

#[test]
fn move_attribute_at_boundary_is_unchanged() {
    let snap = synced(&[3]);
    let e = engine();
    let up = e.move_attribute(&snap, pid(0), aid(0), Direction::Up).unwrap();
    let down = e.move_attribute(&snap, pid(0), aid(2), Direction::Down).unwrap();
    assert_eq!(up.outcome, Outcome::Unchanged);
    assert_eq!(up.snapshot, snap);
    assert_eq!(down.snapshot, snap);
}

#[test]
fn update_attribute_field_keeps_parameters() {
    let snap = with_params(synced(&[1]), 0, 0, ParamVariant::Type2, &[0]);
    let next = engine()
        .update_attribute_field(&snap, pid(0), aid(0), AttributeField::Public, true.into())
        .unwrap()
        .snapshot;
    let attr = next.attribute(pid(0), aid(0)).unwrap();
    assert!(attr.public);
    assert_eq!(attr.status, ChangeStatus::Updated);
    assert_eq!(next.params(pid(0), aid(0)), snap.params(pid(0), aid(0)));
}

#[test]
fn update_attribute_field_rejects_wrong_kind() {
    let snap = synced(&[1]);
    let err = engine()
        .update_attribute_field(&snap, pid(0), aid(0), AttributeField::Masking, "yes".into())
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::FieldKind { field: "masking", expected: FieldKind::Bool, found: FieldKind::Text }
    ));
}

#[test]
fn new_attribute_stays_new_after_edit() {
    let e = engine();
    let snap = e.add_attribute(&synced(&[0]), pid(0), None).unwrap().snapshot;
    let next = e
        .update_attribute_field(&snap, pid(0), aid(0), AttributeField::Contract, "type2".into())
        .unwrap()
        .snapshot;
    assert_eq!(next.attribute(pid(0), aid(0)).unwrap().status, ChangeStatus::New);
}

// ── Parameters ───────────────────────────────────────────────────

#[test]
fn worked_example() {
    let e = engine();
    let start = synced(&[1]);
    assert!(!start.param_has(pid(0), aid(0)));

    let first = e.add_parameter(&start, pid(0), aid(0), None).unwrap();
    let p1 = created_param(&first);
    let snap = first.snapshot;
    let params = snap.params(pid(0), aid(0));
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].variant(), ParamVariant::Type1);
    assert_eq!(params[0].sort_order, 0);
    assert!(snap.param_has(pid(0), aid(0)));

    let second = e.add_parameter(&snap, pid(0), aid(0), Some(p1)).unwrap();
    let p2 = created_param(&second);
    let snap = second.snapshot;
    assert_ne!(p1, p2);
    assert_eq!(sort_orders(snap.params(pid(0), aid(0)), |p| p.sort_order), vec![0, 10]);

    let snap = e.move_parameter(&snap, pid(0), aid(0), p2, Direction::Up).unwrap().snapshot;
    let params = snap.params(pid(0), aid(0));
    assert_eq!(params[0].param_id, p2);
    assert_eq!(params[1].param_id, p1);
    assert_eq!(sort_orders(params, |p| p.sort_order), vec![0, 10]);

    let snap = e.delete_parameter(&snap, pid(0), aid(0), p1).unwrap().snapshot;
    let snap = e.delete_parameter(&snap, pid(0), aid(0), p2).unwrap().snapshot;
    assert!(snap.params(pid(0), aid(0)).is_empty());
    assert!(!snap.param_has(pid(0), aid(0)));
    assert!(snap.tombstones().is_empty());
}

#[test]
fn first_parameter_follows_contract() {
    let e = engine();
    let snap = e
        .update_attribute_field(&synced(&[1]), pid(0), aid(0), AttributeField::Contract, "type2".into())
        .unwrap()
        .snapshot;
    let next = e.add_parameter(&snap, pid(0), aid(0), None).unwrap().snapshot;
    assert_eq!(
        next.params(pid(0), aid(0))[0].payload,
        ParamPayload::Type2 { min: 0.0, increment: 0.0 }
    );
}

#[test]
fn later_parameters_follow_the_group_not_the_contract() {
    let e = engine();
    let snap = with_params(synced(&[1]), 0, 0, ParamVariant::Type3, &[4]);
    let snap = e
        .update_attribute_field(&snap, pid(0), aid(0), AttributeField::Contract, "type2".into())
        .unwrap()
        .snapshot;
    let next = e.add_parameter(&snap, pid(0), aid(0), Some(prm(99))).unwrap();
    let params = next.snapshot.params(pid(0), aid(0));
    assert_eq!(params.len(), 2);
    assert_eq!(params[1].variant(), ParamVariant::Type3);
    assert_eq!(params[1].param_id, prm(5));
}

#[test]
fn add_parameter_to_missing_attribute_is_unchanged() {
    let snap = synced(&[1]);
    let applied = engine().add_parameter(&snap, pid(0), aid(3), None).unwrap();
    assert_eq!(applied.outcome, Outcome::Unchanged);
    assert_eq!(applied.snapshot, snap);
}

#[test]
fn add_parameter_to_mixed_group_is_unknown_variant() {
    let snap = with_params(synced(&[1]), 0, 0, ParamVariant::Type1, &[0]);
    let mut groups: Vec<_> = snap.groups().into_iter().cloned().collect();
    groups[0].param.push(prodcfg_model::Parameter::new(prm(1), ParamVariant::Type2));
    let mixed = prodcfg_store::Snapshot::new(snap.products().to_vec(), groups);

    let err = engine().add_parameter(&mixed, pid(0), aid(0), None).unwrap_err();
    assert!(matches!(err, EngineError::UnknownVariant(_)));
}

#[test]
fn delete_synced_parameter_records_tombstone_and_renumbers() {
    let snap = with_params(synced(&[1]), 0, 0, ParamVariant::Type1, &[0, 1, 2]);
    let next = engine().delete_parameter(&snap, pid(0), aid(0), prm(0)).unwrap().snapshot;
    let params = next.params(pid(0), aid(0));
    assert_eq!(sort_orders(params, |p| p.sort_order), stride(2));
    assert_eq!(params[0].status, ChangeStatus::Updated);
    assert_eq!(next.tombstones()[0].key, param_key(0, 0, 0));
    assert_eq!(next.status_of(&param_key(0, 0, 0)), Some(ChangeStatus::Deleted));
}

#[test]
fn delete_sole_parameter_flips_param_has() {
    let snap = with_params(synced(&[1]), 0, 0, ParamVariant::Type1, &[7]);
    assert!(snap.param_has(pid(0), aid(0)));
    let next = engine().delete_parameter(&snap, pid(0), aid(0), prm(7)).unwrap().snapshot;
    assert!(!next.param_has(pid(0), aid(0)));
    assert!(next.group(pid(0), aid(0)).is_none());
}

#[test]
fn update_parameter_field_in_variant() {
    let snap = with_params(synced(&[1]), 0, 0, ParamVariant::Type2, &[0]);
    let next = engine()
        .update_parameter_field(&snap, pid(0), aid(0), prm(0), ParamField::Increment, 2.5.into())
        .unwrap()
        .snapshot;
    let param = next.param(pid(0), aid(0), prm(0)).unwrap();
    assert_eq!(param.field(ParamField::Increment), Some(FieldValue::Number(2.5)));
    assert_eq!(param.status, ChangeStatus::Updated);
}

#[test]
fn update_parameter_field_outside_variant_is_rejected() {
    let snap = with_params(synced(&[1]), 0, 0, ParamVariant::Type1, &[0]);
    let before = snap.clone();
    let err = engine()
        .update_parameter_field(&snap, pid(0), aid(0), prm(0), ParamField::Min, 1.0.into())
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownVariant(_)));
    assert_eq!(snap, before);
}

#[test]
fn update_parameter_field_wrong_kind() {
    let snap = with_params(synced(&[1]), 0, 0, ParamVariant::Type3, &[0]);
    let err = engine()
        .update_parameter_field(&snap, pid(0), aid(0), prm(0), ParamField::Code, 3.0.into())
        .unwrap_err();
    assert!(matches!(err, EngineError::FieldKind { field: "code", .. }));
}

#[test]
fn move_parameter_at_boundaries_is_unchanged() {
    let snap = with_params(synced(&[1]), 0, 0, ParamVariant::Type1, &[0, 1]);
    let e = engine();
    let up = e.move_parameter(&snap, pid(0), aid(0), prm(0), Direction::Up).unwrap();
    let down = e.move_parameter(&snap, pid(0), aid(0), prm(1), Direction::Down).unwrap();
    assert_eq!(up.outcome, Outcome::Unchanged);
    assert_eq!(up.snapshot, snap);
    assert_eq!(down.outcome, Outcome::Unchanged);
    assert_eq!(down.snapshot, snap);
}
