//! Structural comparison over [`Value`] graphs.
//!
//! The cross-kind ordering is a fixed convention, not a derivable law:
//! numeric scalars order below byte strings, which order below
//! block-shaped values (records and wide integers). Within a kind the
//! comparison is the natural one — numeric, lexicographic over bytes, or
//! tag-then-fieldwise for records. Deviating from this order would change
//! the meaning of every sorted collection built on it.

use std::cmp::Ordering;

use crate::value::{Value, TAG_INT64};

/// Kind rank used when the two sides have different shapes.
fn kind_rank(v: &Value) -> u8 {
    match v {
        Value::Int(_) | Value::Double(_) => 0,
        Value::Bytes(_) => 1,
        Value::Block(_) | Value::Int64(_) => 2,
        Value::Forward(_) => unreachable!("forwards are unwrapped before ranking"),
    }
}

/// Compares two values.
///
/// With `total = true` the result is always `Some`: NaN compares equal to
/// NaN and below every other double, which keeps the order total. With
/// `total = false`, any numeric comparison involving NaN is `None`
/// (unordered).
pub fn compare(a: &Value, b: &Value, total: bool) -> Option<Ordering> {
    let a = a.unwrap_forward();
    let b = b.unwrap_forward();
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Int(x), Value::Double(y)) => compare_f64(*x as f64, *y, total),
        (Value::Double(x), Value::Int(y)) => compare_f64(*x, *y as f64, total),
        (Value::Double(x), Value::Double(y)) => compare_f64(*x, *y, total),
        (Value::Bytes(x), Value::Bytes(y)) => Some(x.as_slice().cmp(y.as_slice())),
        (Value::Int64(x), Value::Int64(y)) => Some(x.cmp(y)),
        (Value::Block(x), Value::Block(y)) => {
            if x.tag != y.tag {
                return Some(x.tag.cmp(&y.tag));
            }
            // Fields first, arity as the tiebreak after the common prefix.
            for (fx, fy) in x.fields.iter().zip(y.fields.iter()) {
                match compare(fx, fy, total) {
                    Some(Ordering::Equal) => continue,
                    other => return other,
                }
            }
            Some(x.fields.len().cmp(&y.fields.len()))
        }
        // A wide integer is a block-shaped value with tag 255; against a
        // record it orders by tag, and below a record carrying the same
        // tag.
        (Value::Int64(_), Value::Block(y)) => {
            Some(TAG_INT64.cmp(&(y.tag as u16)).then(Ordering::Less))
        }
        (Value::Block(x), Value::Int64(_)) => {
            Some((x.tag as u16).cmp(&TAG_INT64).then(Ordering::Greater))
        }
        _ => Some(kind_rank(a).cmp(&kind_rank(b))),
    }
}

/// Total-order comparison; NaN is comparable (equal to itself, below
/// every other double).
pub fn total_compare(a: &Value, b: &Value) -> Ordering {
    compare(a, b, true).expect("total comparison is always ordered")
}

fn compare_f64(x: f64, y: f64, total: bool) -> Option<Ordering> {
    match x.partial_cmp(&y) {
        Some(ord) => Some(ord),
        None if !total => None,
        // total: NaN == NaN, NaN below every number
        None if x.is_nan() && y.is_nan() => Some(Ordering::Equal),
        None if x.is_nan() => Some(Ordering::Less),
        None => Some(Ordering::Greater),
    }
}
