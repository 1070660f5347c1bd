use proptest::prelude::*;

use tablescope::expr::evaluate_arithmetic;

#[test]
fn calculator_handles_nested_expressions() {
    assert_eq!(evaluate_arithmetic("((2 + 3) * 4 - 6) / 7").unwrap(), 2.0);
    assert_eq!(evaluate_arithmetic("100 * 0.15").unwrap(), 15.0);
}

#[test]
fn calculator_rejects_code_like_input() {
    for input in [
        "__import__('os')",
        "open(\"/etc/passwd\")",
        "system『rm』",
        "1; 2",
        "a && b",
        "2 ** 8",
    ] {
        assert!(
            evaluate_arithmetic(input).is_err(),
            "input should be rejected: {input}"
        );
    }
}

proptest! {
    #[test]
    fn addition_of_random_operands_matches_native_arithmetic(
        a in -1_000_000i64..=1_000_000,
        b in -1_000_000i64..=1_000_000,
    ) {
        let expr = format!("{a} + ({b})");
        let result = evaluate_arithmetic(&expr).expect("valid arithmetic");
        prop_assert_eq!(result, (a + b) as f64);
    }

    #[test]
    fn arbitrary_text_never_evaluates_to_identifiers(
        text in "[a-zA-Z_][a-zA-Z0-9_]{0,16}"
    ) {
        prop_assert!(evaluate_arithmetic(&text).is_err());
    }
}
