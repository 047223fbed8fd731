use ventura_billing::core::pricing::{
    apply_markup, price_base, price_line, price_lines, round2, NegativePolicy,
};
use ventura_billing::core::LineItem;
use ventura_billing::BillingError;

#[test]
fn test_scenario_single_item_1000_units() {
    // 1000 × 2.15: subtotal 2150.00, fee 172.00, total 2814.55, taxes 492.55
    let result = price_lines(&[LineItem::new(1000, 2.15)], NegativePolicy::Reject).unwrap();
    assert_eq!(result.subtotal, 2150.00);
    assert_eq!(result.fee, 172.00);
    assert_eq!(result.total, 2814.55);
    assert_eq!(result.taxes, 492.55);
}

#[test]
fn test_scenario_single_base_value() {
    // base 500.00: fee 40.00, total 654.55, taxes 114.55
    let markup = price_base(500.0, NegativePolicy::Reject).unwrap();
    assert_eq!(markup.fee, 40.00);
    assert_eq!(markup.total, 654.55);
    assert_eq!(markup.taxes, 114.55);
}

#[test]
fn test_scenario_empty_item_list() {
    let result = price_lines(&[], NegativePolicy::Reject).unwrap();
    assert_eq!(result.subtotal, 0.00);
    assert_eq!(result.fee, 0.00);
    assert_eq!(result.taxes, 0.00);
    assert_eq!(result.total, 0.00);
}

#[test]
fn test_scenario_two_items() {
    let items = [LineItem::new(2, 10.00), LineItem::new(3, 5.00)];

    let line1 = price_line(2, 10.00, NegativePolicy::Reject).unwrap();
    assert_eq!(line1.subtotal, 20.00);
    assert_eq!(line1.fee, 1.60);
    assert_eq!(line1.total, 26.18);

    let line2 = price_line(3, 5.00, NegativePolicy::Reject).unwrap();
    assert_eq!(line2.subtotal, 15.00);
    assert_eq!(line2.fee, 1.20);
    assert_eq!(line2.total, 19.64);

    let result = price_lines(&items, NegativePolicy::Reject).unwrap();
    assert_eq!(result.subtotal, 35.00);
    assert_eq!(result.fee, 2.80);
    assert_eq!(result.total, 45.82);
    assert_eq!(result.taxes, 8.02);
}

#[test]
fn test_rounding_happens_per_line_not_at_the_end() {
    // Per-line rounding, then summing, is load-bearing for parity with
    // historical records: 3 × (7 × 1.111) rounds each 7.78 line before adding.
    let items = vec![LineItem::new(7, 1.111); 3];
    let result = price_lines(&items, NegativePolicy::Reject).unwrap();

    let one_line = price_line(7, 1.111, NegativePolicy::Reject).unwrap();
    assert_eq!(one_line.subtotal, 7.78);
    assert_eq!(result.subtotal, round2(one_line.subtotal * 3.0));
}

#[test]
fn test_both_entry_points_share_the_markup_formula() {
    // A single line with quantity 1 and a bare base value must price identically.
    let line = price_line(1, 812.50, NegativePolicy::Reject).unwrap();
    let base = price_base(812.50, NegativePolicy::Reject).unwrap();
    assert_eq!(line.fee, base.fee);
    assert_eq!(line.total, base.total);

    let direct = apply_markup(812.50);
    assert_eq!(base.fee, direct.fee);
    assert_eq!(base.total, direct.total);
    assert_eq!(base.taxes, direct.taxes);
}

#[test]
fn test_invariant_total_is_subtotal_plus_fee_plus_taxes() {
    let cases: Vec<Vec<LineItem>> = vec![
        vec![LineItem::new(1000, 2.15)],
        vec![LineItem::new(2, 10.00), LineItem::new(3, 5.00)],
        vec![
            LineItem::new(11, 0.37),
            LineItem::new(150, 12.90),
            LineItem::new(1, 2.675),
        ],
    ];

    for items in cases {
        let r = price_lines(&items, NegativePolicy::Reject).unwrap();
        assert_eq!(round2(r.subtotal + r.fee + r.taxes), r.total, "{:?}", items);
    }
}

#[test]
fn test_negative_inputs_fail_with_invalid_input() {
    let err = price_lines(&[LineItem::new(-5, 2.15)], NegativePolicy::Reject).unwrap_err();
    assert!(matches!(err, BillingError::InvalidInput { .. }));

    let err = price_base(-100.0, NegativePolicy::Reject).unwrap_err();
    assert!(matches!(err, BillingError::InvalidInput { .. }));
}

#[test]
fn test_negative_inputs_zeroed_under_zero_policy() {
    let result = price_lines(
        &[LineItem::new(-5, 2.15), LineItem::new(3, 5.00)],
        NegativePolicy::Zero,
    )
    .unwrap();
    // Only the valid line contributes
    assert_eq!(result.subtotal, 15.00);
    assert_eq!(result.total, 19.64);
}
