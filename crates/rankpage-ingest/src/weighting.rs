//! Weight derivation for the weighted model.
//!
//! Weights are computed per `(row, column)`. Without an explicit value order a
//! row scores `1.0` on the values it holds and `0.0` elsewhere. With an order
//! list, values near the ones the row holds keep partial credit:
//! `1 - distance / len(order)`, distance being the index gap to the nearest
//! held value.

use anyhow::{bail, Result};

use crate::cells::Scalar;

/// `1.0` for each domain value the row holds, `0.0` otherwise.
pub fn binary_weights(row: &[Scalar], domain: &[Scalar]) -> Vec<(Scalar, f64)> {
    domain
        .iter()
        .map(|value| {
            let weight = if row.contains(value) { 1.0 } else { 0.0 };
            (value.clone(), weight)
        })
        .collect()
}

/// Distance-decayed weights over an ordered value list.
///
/// Every value the row holds must appear in `order`.
pub fn ordered_weights(row: &[Scalar], order: &[Scalar]) -> Result<Vec<(Scalar, f64)>> {
    if row.is_empty() {
        bail!("row holds no value to weigh against the order list");
    }
    let mut held = Vec::with_capacity(row.len());
    for value in row {
        match order.iter().position(|o| o == value) {
            Some(index) => held.push(index),
            None => bail!("value '{value}' is not in the order list"),
        }
    }

    let len = order.len() as f64;
    Ok(order
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let weight = if row.contains(value) {
                1.0
            } else {
                let distance = held.iter().map(|h| h.abs_diff(index)).min().unwrap_or(0);
                1.0 - distance as f64 / len
            };
            (value.clone(), weight)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn texts(values: &[&str]) -> Vec<Scalar> {
        values.iter().map(|v| Scalar::from(*v)).collect()
    }

    #[test]
    fn binary_rule_marks_held_values() {
        let weights = binary_weights(&texts(&["red"]), &texts(&["blue", "red"]));
        assert_eq!(weights, vec![(Scalar::from("blue"), 0.0), (Scalar::from("red"), 1.0)]);
    }

    #[test]
    fn order_rule_decays_with_distance() {
        let order = texts(&["tiny", "small", "medium", "large"]);
        let weights = ordered_weights(&texts(&["small"]), &order).unwrap();
        let by_value: Vec<f64> = weights.iter().map(|(_, w)| *w).collect();
        assert_relative_eq!(by_value[0], 0.75);
        assert_relative_eq!(by_value[1], 1.0);
        assert_relative_eq!(by_value[2], 0.75);
        assert_relative_eq!(by_value[3], 0.5);
    }

    #[test]
    fn order_rule_uses_nearest_held_value() {
        let order: Vec<Scalar> = (1..=5).map(Scalar::Int).collect();
        let row = vec![Scalar::Int(1), Scalar::Int(5)];
        let weights = ordered_weights(&row, &order).unwrap();
        assert_relative_eq!(weights[2].1, 1.0 - 2.0 / 5.0);
        assert_relative_eq!(weights[3].1, 1.0 - 1.0 / 5.0);
        assert_relative_eq!(weights[4].1, 1.0);
    }

    #[test]
    fn value_outside_order_is_an_error() {
        let order = texts(&["a", "b"]);
        let err = ordered_weights(&texts(&["c"]), &order).unwrap_err();
        assert!(err.to_string().contains("'c'"));
    }
}
