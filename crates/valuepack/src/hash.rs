//! Bounded structural hashing over [`Value`] graphs.
//!
//! The traversal carries two budgets: `limit` bounds recursion depth and
//! `count` bounds the number of scalar visits, so arbitrarily large or
//! deep structures hash in bounded time. The accumulator is 32-bit
//! wrapping and the result is masked to 30 bits.

use crate::value::Value;

/// Multiplier for wide combines (integers, wide integers).
const MULT_WIDE: i32 = 65599;
/// Multiplier for small combines (tags, bytes).
const MULT_SMALL: i32 = 19;

/// Hashes a value with the given work (`count`) and depth (`limit`)
/// budgets. Traversal stops silently once either budget is exhausted;
/// the hash of a truncated traversal is still deterministic for a given
/// budget pair.
pub fn hash(count: i32, limit: i32, v: &Value) -> u32 {
    let mut hasher = Hasher {
        count,
        limit,
        accu: 0,
    };
    hasher.visit(v);
    (hasher.accu & 0x3fff_ffff) as u32
}

struct Hasher {
    count: i32,
    limit: i32,
    accu: i32,
}

impl Hasher {
    fn combine_wide(&mut self, n: i32) {
        self.accu = self.accu.wrapping_mul(MULT_WIDE).wrapping_add(n);
    }

    fn combine_small(&mut self, n: i32) {
        self.accu = self.accu.wrapping_mul(MULT_SMALL).wrapping_add(n);
    }

    fn visit(&mut self, v: &Value) {
        self.limit -= 1;
        if self.count < 0 || self.limit < 0 {
            return;
        }
        match v {
            Value::Int(i) => {
                self.count -= 1;
                self.combine_wide(*i);
            }
            Value::Int64(x) => {
                self.count -= 1;
                // Low 48 bits folded into one 32-bit wrapping combine.
                let folded = x.lo().wrapping_add(x.mid().wrapping_shl(24)) as i32;
                self.combine_wide(folded);
            }
            Value::Double(d) => {
                self.count -= 1;
                // Canonicalize NaN so equal-comparing doubles hash equal.
                let d = if d.is_nan() { f64::NAN } else { *d };
                for byte in d.to_le_bytes() {
                    self.combine_small(byte as i32);
                }
            }
            Value::Bytes(b) => {
                self.count -= 1;
                for &byte in b.iter() {
                    self.combine_small(byte as i32);
                }
            }
            Value::Block(b) => {
                self.count -= 1;
                self.combine_small(b.tag as i32);
                for field in b.fields.iter().rev() {
                    self.visit(field);
                }
            }
            // Transparent: does not consume the depth budget.
            Value::Forward(inner) => {
                self.limit += 1;
                self.visit(inner);
            }
        }
    }
}
