// Property-based tests for invoice aggregation
//
// Totals are plain sums of the line amounts, so they must not depend on
// line order and the grand total must equal taxable value plus all tax.

use proptest::prelude::*;
use rust_decimal::Decimal;

use pharmabill::invoices::{CatalogLine, ComputedLine, InvoiceAggregator, InvoiceTotals};
use pharmabill::core::{AppError, LineRejection};
use pharmabill::taxes::{GstRate, SupplyType, TaxCalculator};

fn compute(
    product_id: i64,
    price_paise: i64,
    quantity: i32,
    discount: Decimal,
    rate: GstRate,
    supply: SupplyType,
) -> ComputedLine {
    let line = CatalogLine {
        product_id,
        name: format!("Item {}", product_id),
        batch: "B1".to_string(),
        expiry: None,
        hsn: "3004".to_string(),
        unit_price: Decimal::new(price_paise, 2),
        quantity,
        discount_percent: discount,
        tax_rate_percent: rate.as_decimal(),
    };
    TaxCalculator::new().compute_line(&line, supply).unwrap()
}

/// Any discount from 0 to 100 percent in steps of 0.01
fn any_discount() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

fn lines_strategy() -> impl Strategy<Value = (Vec<ComputedLine>, SupplyType)> {
    let supply = prop_oneof![Just(SupplyType::Intra), Just(SupplyType::Inter)];
    let row = (
        0i64..5_000_000i64,
        1i32..500i32,
        any_discount(),
        prop::sample::select(GstRate::ALL.to_vec()),
    );

    (supply, prop::collection::vec(row, 1..12)).prop_map(|(supply, rows)| {
        let lines = rows
            .into_iter()
            .enumerate()
            .map(|(i, (price, qty, discount, rate))| {
                compute(i as i64 + 1, price, qty, discount, rate, supply)
            })
            .collect();
        (lines, supply)
    })
}

proptest! {
    #[test]
    fn test_totals_do_not_depend_on_line_order(
        (lines, _) in lines_strategy(),
        seed in any::<u64>(),
    ) {
        let forward = InvoiceAggregator::aggregate(&lines).unwrap();

        let mut reversed = lines.clone();
        reversed.reverse();
        prop_assert_eq!(&forward, &InvoiceAggregator::aggregate(&reversed).unwrap());

        let mut rotated = lines.clone();
        let shift = (seed as usize) % rotated.len();
        rotated.rotate_left(shift);
        prop_assert_eq!(&forward, &InvoiceAggregator::aggregate(&rotated).unwrap());
    }

    #[test]
    fn test_grand_total_is_taxable_plus_tax((lines, _) in lines_strategy()) {
        let totals = InvoiceAggregator::aggregate(&lines).unwrap();

        prop_assert_eq!(
            totals.grand_total,
            totals.total_taxable + totals.total_cgst + totals.total_sgst + totals.total_igst
        );

        let line_sum: Decimal = lines.iter().map(|l| l.line_total).sum();
        prop_assert_eq!(totals.grand_total, line_sum);
    }

    #[test]
    fn test_totals_follow_supply_type((lines, supply) in lines_strategy()) {
        let totals = InvoiceAggregator::aggregate(&lines).unwrap();

        match supply {
            SupplyType::Intra => {
                prop_assert_eq!(totals.total_igst, Decimal::ZERO);
                prop_assert_eq!(totals.total_cgst, totals.total_sgst);
            }
            SupplyType::Inter => {
                prop_assert_eq!(totals.total_cgst, Decimal::ZERO);
                prop_assert_eq!(totals.total_sgst, Decimal::ZERO);
            }
        }
    }
}

#[test]
fn test_empty_invoice_totals_are_zero() {
    let totals = InvoiceAggregator::aggregate(&[]).unwrap();

    assert_eq!(totals, InvoiceTotals::default());
    assert_eq!(totals.grand_total, Decimal::ZERO);
    assert_eq!(totals.total_tax(), Decimal::ZERO);
}

#[test]
fn test_single_line_totals_mirror_the_line() {
    let line = compute(1, 10_000, 2, Decimal::ZERO, GstRate::Twelve, SupplyType::Intra);
    let totals = InvoiceAggregator::aggregate(std::slice::from_ref(&line)).unwrap();

    assert_eq!(totals.total_taxable, line.taxable_value);
    assert_eq!(totals.total_cgst, line.cgst_amount);
    assert_eq!(totals.total_sgst, line.sgst_amount);
    assert_eq!(totals.grand_total, line.line_total);
}

#[test]
fn test_lines_too_large_to_sum_are_rejected() {
    // Each line fits on its own; their sum does not
    let huge = |product_id| CatalogLine {
        product_id,
        name: format!("Item {}", product_id),
        batch: "B1".to_string(),
        expiry: None,
        hsn: "3004".to_string(),
        unit_price: Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0),
        quantity: 1,
        discount_percent: Decimal::ZERO,
        tax_rate_percent: GstRate::Zero.as_decimal(),
    };
    let calc = TaxCalculator::new();
    let lines = vec![
        calc.compute_line(&huge(1), SupplyType::Intra).unwrap(),
        calc.compute_line(&huge(2), SupplyType::Intra).unwrap(),
    ];

    let err = InvoiceAggregator::aggregate(&lines).unwrap_err();
    assert!(matches!(
        err,
        AppError::LineRejected(LineRejection::AmountOverflow)
    ));
}

#[test]
fn test_fractional_discount_is_kept_exact() {
    let line = compute(1, 12_345, 3, Decimal::new(3333, 2), GstRate::Eighteen, SupplyType::Intra);
    let totals = InvoiceAggregator::aggregate(std::slice::from_ref(&line)).unwrap();

    // 370.35 less 33.33% is 246.912345
    assert_eq!(line.taxable_value, Decimal::new(246_912_345, 6));
    assert_eq!(totals.total_cgst, totals.total_sgst);
    assert_eq!(totals.grand_total, line.line_total);
}
