use pretty_assertions::assert_eq;
use projection_core::calculators::sip::{compute_sip, SipInput};
use projection_core::calculators::step_up::{compute_step_up_sip, StepUpSipInput};
use projection_core::calculators::swp::{compute_swp, SwpInput, MAX_SWP_MONTHS};
use projection_core::ProjectionError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// SIP
// ===========================================================================

fn sip_input(monthly: Decimal, rate: Decimal, years: u32) -> SipInput {
    SipInput {
        monthly_investment: monthly,
        annual_return_rate_pct: rate,
        years,
    }
}

#[test]
fn test_zero_rate_sip() {
    let out = compute_sip(&sip_input(dec!(1000), Decimal::ZERO, 5))
        .unwrap()
        .result;
    assert_eq!(out.invested_amount, dec!(60000));
    assert_eq!(out.total_value, dec!(60000));
    assert_eq!(out.estimated_returns, Decimal::ZERO);
}

#[test]
fn test_sip_value_increases_with_rate() {
    let rates = [dec!(-4), Decimal::ZERO, dec!(4), dec!(8), dec!(12), dec!(18)];
    let values: Vec<Decimal> = rates
        .iter()
        .map(|r| {
            compute_sip(&sip_input(dec!(2500), *r, 15))
                .unwrap()
                .result
                .total_value
        })
        .collect();

    for pair in values.windows(2) {
        assert!(pair[1] > pair[0], "expected {} > {}", pair[1], pair[0]);
    }
}

#[test]
fn test_sip_zero_investment_fallback() {
    let out = compute_sip(&sip_input(Decimal::ZERO, dec!(12), 10))
        .unwrap()
        .result;
    assert_eq!(out.cagr_pct, Decimal::ZERO);
    assert_eq!(out.total_value, Decimal::ZERO);
}

#[test]
fn test_sip_totals_identity() {
    for years in [1, 7, 25, 40] {
        let out = compute_sip(&sip_input(dec!(3333.33), dec!(9.5), years))
            .unwrap()
            .result;
        assert_eq!(out.total_value, out.invested_amount + out.estimated_returns);
    }
}

#[test]
fn test_sip_is_idempotent() {
    let input = sip_input(dec!(5000), dec!(12), 10);
    let first = compute_sip(&input).unwrap();
    let second = compute_sip(&input).unwrap();
    assert_eq!(first.result, second.result);
    assert_eq!(first.warnings, second.warnings);
    assert_eq!(first.assumptions, second.assumptions);
}

// ===========================================================================
// SWP
// ===========================================================================

fn swp_input(initial: Decimal, withdrawal: Decimal, rate: Decimal) -> SwpInput {
    SwpInput {
        initial_investment: initial,
        monthly_withdrawal: withdrawal,
        annual_return_rate_pct: rate,
    }
}

#[test]
fn test_swp_depletes_within_three_months() {
    let out = compute_swp(&swp_input(dec!(100000), dec!(50000), Decimal::ZERO))
        .unwrap()
        .result;
    assert!(!out.is_sustainable);
    assert!(out.months_lasted >= 2 && out.months_lasted <= 3);
    assert_eq!(out.remaining_value, Decimal::ZERO);
}

#[test]
fn test_swp_sustainable_for_fifty_years() {
    let out = compute_swp(&swp_input(dec!(10000000), dec!(1000), dec!(10)))
        .unwrap()
        .result;
    assert!(out.is_sustainable);
    assert_eq!(out.months_lasted, 600);
}

#[test]
fn test_swp_boundary_at_cap() {
    let survives = compute_swp(&swp_input(dec!(600000.01), dec!(1000), Decimal::ZERO))
        .unwrap()
        .result;
    assert!(survives.is_sustainable);
    assert_eq!(survives.months_lasted, MAX_SWP_MONTHS);

    let depletes = compute_swp(&swp_input(dec!(600000), dec!(1000), Decimal::ZERO))
        .unwrap()
        .result;
    assert!(!depletes.is_sustainable);
    assert_eq!(depletes.months_lasted, MAX_SWP_MONTHS);
}

#[test]
fn test_swp_months_never_exceed_cap() {
    for rate in [dec!(0), dec!(6), dec!(15), dec!(30)] {
        let out = compute_swp(&swp_input(dec!(5000000), dec!(100), rate))
            .unwrap()
            .result;
        assert!(out.months_lasted <= MAX_SWP_MONTHS);
    }
}

#[test]
fn test_swp_yearly_withdrawals_sum_to_total() {
    for (initial, withdrawal, rate) in [
        (dec!(1000000), dec!(15000), dec!(8)),
        (dec!(777777.77), dec!(3333.33), dec!(7.3)),
        (dec!(250000), dec!(1234.567), dec!(-2.5)),
    ] {
        let out = compute_swp(&swp_input(initial, withdrawal, rate))
            .unwrap()
            .result;
        let summed: Decimal = out.year_by_year.iter().map(|r| r.withdrawals).sum();
        assert_eq!(summed, out.total_withdrawals);
    }
}

#[test]
fn test_swp_is_idempotent() {
    let input = swp_input(dec!(1000000), dec!(15000), dec!(8));
    let first = compute_swp(&input).unwrap();
    let second = compute_swp(&input).unwrap();
    assert_eq!(first.result, second.result);
}

// ===========================================================================
// Step-up SIP
// ===========================================================================

fn step_up_input(step_up: Decimal) -> StepUpSipInput {
    StepUpSipInput {
        initial_monthly_investment: dec!(10000),
        annual_step_up_pct: step_up,
        annual_return_rate_pct: dec!(11),
        years: 20,
    }
}

#[test]
fn test_step_up_zero_equals_regular_sip() {
    let out = compute_step_up_sip(&step_up_input(Decimal::ZERO))
        .unwrap()
        .result;
    assert!((out.maturity_value - out.regular_sip_comparison_value).abs() <= dec!(0.01));
    assert!(out.additional_gain.abs() <= dec!(0.01));
}

#[test]
fn test_step_up_regular_comparison_matches_sip() {
    let step = compute_step_up_sip(&step_up_input(dec!(7))).unwrap().result;
    let sip = compute_sip(&SipInput {
        monthly_investment: dec!(10000),
        annual_return_rate_pct: dec!(11),
        years: 20,
    })
    .unwrap()
    .result;
    assert_eq!(step.regular_sip_comparison_value, sip.total_value);
    assert_eq!(step.regular_sip_investment, sip.invested_amount);
}

#[test]
fn test_step_up_beats_regular_sip() {
    let out = compute_step_up_sip(&step_up_input(dec!(5))).unwrap().result;
    assert!(out.additional_gain > Decimal::ZERO);
    assert!(out.total_investment > out.regular_sip_investment);
}

#[test]
fn test_step_up_is_idempotent() {
    let input = step_up_input(dec!(10));
    let first = compute_step_up_sip(&input).unwrap();
    let second = compute_step_up_sip(&input).unwrap();
    assert_eq!(first.result, second.result);
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn test_invalid_inputs_are_typed_errors() {
    let err = compute_sip(&sip_input(dec!(-1), dec!(10), 5)).unwrap_err();
    assert!(matches!(err, ProjectionError::InvalidInput { ref field, .. } if field == "monthly_investment"));

    let err = compute_swp(&swp_input(dec!(1000), dec!(10), dec!(-150))).unwrap_err();
    assert!(matches!(err, ProjectionError::InvalidInput { .. }));

    let mut input = step_up_input(dec!(10));
    input.years = 500;
    let err = compute_step_up_sip(&input).unwrap_err();
    assert!(matches!(err, ProjectionError::InvalidInput { ref field, .. } if field == "years"));
}

// ===========================================================================
// Overflow
// ===========================================================================

fn big(value: &str) -> Decimal {
    Decimal::from_scientific(value).unwrap()
}

fn is_overflow<T>(result: Result<T, ProjectionError>) -> bool {
    matches!(result, Err(ProjectionError::NumericOverflow { .. }))
}

#[test]
fn test_sip_overflow_is_an_error() {
    assert!(is_overflow(compute_sip(&sip_input(big("1e27"), dec!(-50), 100))));
}

#[test]
fn test_swp_withdrawal_rate_overflow_is_an_error() {
    assert!(is_overflow(compute_swp(&swp_input(
        Decimal::ONE,
        big("7e27"),
        dec!(10)
    ))));
}

#[test]
fn test_swp_total_withdrawals_overflow_is_an_error() {
    assert!(is_overflow(compute_swp(&swp_input(
        big("5e28"),
        big("1e27"),
        dec!(24)
    ))));
}

#[test]
fn test_step_up_overflow_is_an_error() {
    let input = StepUpSipInput {
        initial_monthly_investment: big("1e27"),
        annual_step_up_pct: Decimal::ZERO,
        annual_return_rate_pct: dec!(-50),
        years: 100,
    };
    assert!(is_overflow(compute_step_up_sip(&input)));
}

#[test]
fn test_output_serialises_with_string_decimals() {
    let output = compute_sip(&sip_input(dec!(1000), Decimal::ZERO, 5)).unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["result"]["total_value"], "60000");
    assert_eq!(json["result"]["year_by_year"].as_array().unwrap().len(), 5);
    assert!(json["metadata"]["precision"].is_string());
}
