//! Square-free extraction for the radical part of exact numbers.

use rug::Integer;

/// Trial division stops at this divisor.
const TRIAL_LIMIT: u32 = 1 << 16;

/// Splits a positive integer `n` into `(outside, inside)` such that `n = outside^2 * inside`, and
/// `inside` is square-free.
///
/// Factoring is done by trial division up to [`TRIAL_LIMIT`]. A cofactor left over after that
/// has only prime factors above the limit, so if it is below the cube of the limit, it is either
/// a prime, a product of two distinct primes, or the square of a prime. Larger cofactors cannot
/// be proven square-free cheaply, and [`None`] is returned.
pub(crate) fn split_square(n: &Integer) -> Option<(Integer, Integer)> {
    let mut rest = n.clone();
    let mut outside = Integer::from(1);
    let mut inside = Integer::from(1);

    let mut d: u32 = 2;
    while d < TRIAL_LIMIT {
        let square = u64::from(d) * u64::from(d);
        if rest < square {
            break;
        }

        if rest.is_divisible_u(d) {
            let mut count = 0;
            while rest.is_divisible_u(d) {
                rest.div_exact_u_mut(d);
                count += 1;
            }

            outside *= Integer::from(Integer::u_pow_u(d, count / 2));
            if count % 2 == 1 {
                inside *= d;
            }
        }

        d += if d == 2 { 1 } else { 2 };
    }

    if rest == 1 {
        return Some((outside, inside));
    }

    // `rest` is prime
    let square = u64::from(d) * u64::from(d);
    if rest < square {
        inside *= rest;
        return Some((outside, inside));
    }

    if rest.is_perfect_square() {
        outside *= rest.sqrt();
        return Some((outside, inside));
    }

    if rest < Integer::from(TRIAL_LIMIT).pow(3) {
        inside *= rest;
        return Some((outside, inside));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn split(n: u64) -> Option<(Integer, Integer)> {
        split_square(&Integer::from(n))
    }

    #[test]
    fn small() {
        assert_eq!(split(1), Some((Integer::from(1), Integer::from(1))));
        assert_eq!(split(12), Some((Integer::from(2), Integer::from(3))));
        assert_eq!(split(72), Some((Integer::from(6), Integer::from(2))));
        assert_eq!(split(30), Some((Integer::from(1), Integer::from(30))));
        assert_eq!(split(49), Some((Integer::from(7), Integer::from(1))));
    }

    #[test]
    fn large_prime() {
        assert_eq!(split(1_000_003), Some((Integer::from(1), Integer::from(1_000_003))));
    }

    #[test]
    fn beyond_trial_limit() {
        // 65537 and 65539 are both prime
        assert_eq!(
            split(65_537 * 65_537),
            Some((Integer::from(65_537), Integer::from(1))),
        );
        assert_eq!(
            split(65_537 * 65_539),
            Some((Integer::from(1), Integer::from(65_537u64 * 65_539))),
        );
        assert_eq!(
            split(4 * 65_537 * 65_539),
            Some((Integer::from(2), Integer::from(65_537u64 * 65_539))),
        );
    }

    #[test]
    fn unprovable() {
        assert_eq!(split(65_537 * 65_537 * 65_537), None);
    }
}
