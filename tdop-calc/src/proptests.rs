//! Property-based tests for literals, exact arithmetic and flattening.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::rational::{Exact, Rational};
    use crate::value::{Negation, Value};
    use crate::{evaluate, parse_symbolic};

    fn gcd(a: i64, b: i64) -> i64 {
        if b == 0 { a.abs() } else { gcd(b, a % b) }
    }

    // Strategy for generating small integers
    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    // Strategy for generating non-zero integers
    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn integer_literal_round_trip(n in i64::MIN..=i64::MAX) {
            prop_assert_eq!(evaluate(&n.to_string()).unwrap(), Value::Integer(n));
        }

        #[test]
        fn rational_is_reduced(n in small_int(), d in non_zero_int()) {
            let r = Rational::new(n, d).unwrap();
            prop_assert!(r.denom() > 0);
            prop_assert_eq!(gcd(r.numer(), r.denom()), 1);
            prop_assert_eq!(r.numer() as i128 * d as i128, n as i128 * r.denom() as i128);
        }

        #[test]
        fn whole_rationals_collapse(n in small_int(), k in non_zero_int()) {
            prop_assert_eq!(Rational::make(n * k, k).unwrap(), Exact::Integer(n));
        }

        #[test]
        fn parsed_sum_matches_exact_sum(
            a in small_int(), b in non_zero_int(), c in small_int(), d in non_zero_int()
        ) {
            let input = format!("{}/{} + {}/{}", a, b, c, d);
            let expected = Rational::make(a, b).unwrap().add(Rational::make(c, d).unwrap()).unwrap();
            prop_assert_eq!(evaluate(&input).unwrap(), Value::from(expected));
        }

        #[test]
        fn negation_is_an_involution(n in -i64::MAX..=i64::MAX) {
            let once = Negation::make(Value::Integer(n)).unwrap();
            prop_assert_eq!(Negation::make(once).unwrap(), Value::Integer(n));
        }

        #[test]
        fn repeated_addition_flattens(n in 2usize..12) {
            let input = vec!["x"; n].join(" + ");
            let Value::Expression(e) = parse_symbolic(&input).unwrap() else {
                panic!("expected expression")
            };
            prop_assert_eq!(e.len(), n);
            prop_assert_eq!(e.symbol(), "+");
        }
    }
}
