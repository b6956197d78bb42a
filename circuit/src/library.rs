use crate::node::{eq_bit, one_minus, CircuitNode};

/// `eq(x, y)` over `2n` inputs laid out as `[x_0..x_{n-1}, y_0..y_{n-1}]`:
/// `1` iff `x == y` as bitstrings, `0` on every other boolean point.
pub fn eq_2n_vars(n: usize) -> CircuitNode {
    (0..n)
        .map(|i| eq_bit(&CircuitNode::input(i), &CircuitNode::input(n + i)))
        .fold(CircuitNode::constant(sv_field::Fp::ONE), |acc, factor| {
            acc * factor
        })
}

/// Indicator of the all-ones point on a half (`x` if `half == 0`, `y` if
/// `half == 1`) of the `2n`-input layout: `1` iff that half's `n` bits are
/// all `1`.
fn all_ones_indicator(n: usize, half: usize) -> CircuitNode {
    let offset = half * n;
    (0..n).fold(CircuitNode::constant(sv_field::Fp::ONE), |acc, i| {
        acc * CircuitNode::input(offset + i)
    })
}

/// Indicator of the point whose `y`-half equals the all-ones bitstring
/// except for its least-significant bit, which is forced to `0` (i.e. the
/// row immediately before the last one, `2^n - 2`).
fn second_to_last_indicator(n: usize) -> CircuitNode {
    assert!(n >= 1, "second_to_last_indicator is undefined for n = 0");
    let offset = n; // y-half
    let mut factors = vec![one_minus(&CircuitNode::input(offset))];
    for i in 1..n {
        factors.push(CircuitNode::input(offset + i));
    }
    CircuitNode::product(factors)
}

/// The row-successor indicator: `next(n).evaluate` restricted to
/// `{0,1}^{2n}` is `1` iff `y = x + 1` (as `n`-bit integers, no wraparound).
///
/// Built as a carry-chain: for each bit position `k` counting from the
/// least significant (`flip_pos = n - 1 - k`), the term fixes every bit
/// above `flip_pos` equal between `x` and `y`, requires `x`'s bit at
/// `flip_pos` to be `0` and `y`'s to be `1` (the carry out of this
/// position), and requires every bit below `flip_pos` to go from `1` in
/// `x` to `0` in `y` (the carry propagating in).
pub fn next(n: usize) -> CircuitNode {
    if n == 0 {
        return CircuitNode::constant(sv_field::Fp::ZERO);
    }
    let mut terms = Vec::with_capacity(n);
    for flip_pos in 0..n {
        let mut factors = Vec::new();
        for i in (flip_pos + 1)..n {
            factors.push(eq_bit(&CircuitNode::input(i), &CircuitNode::input(n + i)));
        }
        factors.push(one_minus(&CircuitNode::input(flip_pos)));
        factors.push(CircuitNode::input(n + flip_pos));
        for l in 0..flip_pos {
            factors.push(CircuitNode::input(l) * one_minus(&CircuitNode::input(n + l)));
        }
        terms.push(CircuitNode::product(factors));
    }
    CircuitNode::sum(terms)
}

/// The AIR "matrix down" row-shift polynomial: `1` on boolean `(x, y)` iff
/// `y = x + 1`, or `x = y` = the last row (self-loop at the boundary).
pub fn matrix_down_lde(n: usize) -> CircuitNode {
    if n == 0 {
        return CircuitNode::constant(sv_field::Fp::ONE);
    }
    next(n) + (all_ones_indicator(n, 0) * all_ones_indicator(n, 1))
}

/// The AIR "matrix up" row-shift polynomial: `1` on boolean `(x, y)` iff
/// `x = y`, except that the last row (`x = 2^n - 1`) is redirected to the
/// second-to-last row (`y = 2^n - 2`) instead of looping on itself — this
/// mirrors `column_up`'s `up[-1] = up[-2]` boundary rule rather than a
/// literal self-loop.
pub fn matrix_up_lde(n: usize) -> CircuitNode {
    if n == 0 {
        return CircuitNode::constant(sv_field::Fp::ONE);
    }
    let correction = second_to_last_indicator(n) - all_ones_indicator(n, 1);
    eq_2n_vars(n) + (all_ones_indicator(n, 0) * correction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_field::{Ef, Fp};

    fn bits(v: usize, n: usize) -> Vec<Ef> {
        (0..n)
            .map(|i| Ef::from_base(Fp::new(((v >> i) & 1) as u64)))
            .collect()
    }

    fn point(x: usize, y: usize, n: usize) -> Vec<Ef> {
        let mut p = bits(x, n);
        p.extend(bits(y, n));
        p
    }

    fn is_one(circuit: &CircuitNode, x: usize, y: usize, n: usize) -> bool {
        circuit.evaluate(&point(x, y, n)) == Ef::ONE
    }

    #[test]
    fn eq_2n_vars_is_the_boolean_equality_indicator() {
        let n = 3;
        let circuit = eq_2n_vars(n);
        for x in 0..(1 << n) {
            for y in 0..(1 << n) {
                assert_eq!(is_one(&circuit, x, y, n), x == y, "x={x} y={y}");
            }
        }
    }

    #[test]
    fn next_is_the_successor_indicator_with_no_wraparound() {
        let n = 3;
        let circuit = next(n);
        let max = 1usize << n;
        for x in 0..max {
            for y in 0..max {
                let expect = y == x + 1;
                assert_eq!(is_one(&circuit, x, y, n), expect, "x={x} y={y}");
            }
        }
    }

    #[test]
    fn matrix_down_lde_wraps_the_last_row_to_itself() {
        let n = 3;
        let circuit = matrix_down_lde(n);
        let max = 1usize << n;
        for x in 0..max {
            for y in 0..max {
                let expect = y == x + 1 || (x == max - 1 && y == max - 1);
                assert_eq!(is_one(&circuit, x, y, n), expect, "x={x} y={y}");
            }
        }
    }

    #[test]
    fn matrix_up_lde_redirects_the_last_row_to_the_second_to_last() {
        let n = 3;
        let circuit = matrix_up_lde(n);
        let max = 1usize << n;
        for x in 0..max {
            for y in 0..max {
                let expect = if x == max - 1 {
                    y == max - 2
                } else {
                    y == x
                };
                assert_eq!(is_one(&circuit, x, y, n), expect, "x={x} y={y}");
            }
        }
    }

    #[test]
    fn matrix_up_lde_at_n_zero_is_the_constant_one() {
        assert_eq!(matrix_up_lde(0).evaluate(&[]), Ef::ONE);
    }
}
