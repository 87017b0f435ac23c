mod common;

use common::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use prodcfg_engine::grid::{attribute_row_span, base_layout, detail_layout};
use prodcfg_engine::{DetailFilter, GridRow};
use prodcfg_model::ParamVariant;

fn fixture() -> prodcfg_store::Snapshot {
    // product 0: attr 0 (3 params), attr 1 (none); product 1: attr 0 (1 param); product 2: empty
    let snap = synced(&[2, 1, 0]);
    let snap = with_params(snap, 0, 0, ParamVariant::Type1, &[0, 1, 2]);
    with_params(snap, 1, 0, ParamVariant::Type2, &[3])
}

// ── Row spans ────────────────────────────────────────────────────

#[test]
fn attribute_span_is_at_least_one() {
    let snap = fixture();
    assert_eq!(attribute_row_span(&snap, pid(0), aid(0)), 3);
    assert_eq!(attribute_row_span(&snap, pid(0), aid(1)), 1);
    assert_eq!(attribute_row_span(&snap, pid(9), aid(9)), 1);
}

// ── Detail layout ────────────────────────────────────────────────

#[test]
fn detail_layout_all_rows() {
    let layout = detail_layout(&fixture(), DetailFilter::All);

    // 3 + 1 for product 0, 1 for product 1, 1 placeholder for product 2
    assert_eq!(layout.row_count(), 6);
    assert_eq!(
        layout.rows[0],
        GridRow {
            product_id: pid(0),
            attribute_id: Some(aid(0)),
            param_id: Some(prm(0)),
            is_first_of_product: true,
            is_first_of_attribute: true,
            product_row_span: 4,
            attribute_row_span: 3,
        }
    );
    assert!(!layout.rows[1].is_first_of_attribute);
    assert!(!layout.rows[1].is_first_of_product);

    let placeholder = layout.rows[3];
    assert_eq!(placeholder.attribute_id, Some(aid(1)));
    assert_eq!(placeholder.param_id, None);
    assert!(placeholder.is_first_of_attribute);
    assert!(!placeholder.is_first_of_product);

    let empty = layout.rows[5];
    assert_eq!(empty.product_id, pid(2));
    assert_eq!(empty.attribute_id, None);
    assert_eq!(empty.product_row_span, 1);
}

#[test]
fn detail_layout_span_summaries() {
    let layout = detail_layout(&fixture(), DetailFilter::All);
    let p0 = layout.product_span(pid(0)).unwrap();
    assert_eq!((p0.first_row, p0.row_count), (0, 4));
    let p1 = layout.product_span(pid(1)).unwrap();
    assert_eq!((p1.first_row, p1.row_count), (4, 1));
    let a = layout.attribute_span(pid(0), aid(1)).unwrap();
    assert_eq!((a.first_row, a.row_count), (3, 1));
    assert!(layout.attribute_span(pid(2), aid(0)).is_none());
}

#[test]
fn detail_layout_with_parameters_only() {
    let layout = detail_layout(&fixture(), DetailFilter::WithParameters);

    assert_eq!(layout.row_count(), 4);
    assert!(layout.rows.iter().all(|r| r.param_id.is_some()));
    assert_eq!(layout.rows[0].product_row_span, 3);
    assert!(layout.product_span(pid(2)).is_none());
    assert!(layout.attribute_span(pid(0), aid(1)).is_none());
}

#[test]
fn layout_follows_mutations() {
    let e = engine();
    let snap = fixture();
    let before = detail_layout(&snap, DetailFilter::All).row_count();
    let next = e.add_parameter(&snap, pid(0), aid(1), None).unwrap().snapshot;
    // attr 1 already had a placeholder row, so the count is unchanged
    assert_eq!(detail_layout(&next, DetailFilter::All).row_count(), before);
    let next = e.add_parameter(&next, pid(0), aid(1), None).unwrap().snapshot;
    assert_eq!(detail_layout(&next, DetailFilter::All).row_count(), before + 1);
}

// ── Base layout ──────────────────────────────────────────────────

#[test]
fn base_layout_one_row_per_attribute() {
    let layout = base_layout(&fixture());
    assert_eq!(layout.row_count(), 4);
    assert_eq!(layout.rows[0].product_row_span, 2);
    assert!(layout.rows[0].is_first_of_product);
    assert!(!layout.rows[1].is_first_of_product);
    assert_eq!(layout.rows[3].attribute_id, None);
    assert!(layout.rows.iter().all(|r| r.param_id.is_none()));
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn rows_equal_sum_of_spans(counts in prop::collection::vec(0usize..5, 1..5)) {
        let mut snap = synced(&[counts.len()]);
        let mut next_id = 0i64;
        for (a, count) in counts.iter().enumerate() {
            if *count > 0 {
                let ids: Vec<i64> = (next_id..next_id + *count as i64).collect();
                next_id += *count as i64;
                snap = with_params(snap, 0, a as i64, ParamVariant::Type1, &ids);
            }
        }

        let layout = detail_layout(&snap, DetailFilter::All);
        let expected: usize = counts.iter().map(|c| (*c).max(1)).sum();
        prop_assert_eq!(layout.row_count(), expected);
        for (a, count) in counts.iter().enumerate() {
            prop_assert_eq!(attribute_row_span(&snap, pid(0), aid(a as i64)), (*count).max(1));
        }
        prop_assert!(layout.rows.iter().all(|r| r.product_row_span == expected));
    }
}
