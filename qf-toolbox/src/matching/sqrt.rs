use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Floor of the square root of `n`, computed exactly with Newton's method.
///
/// The first guess `2^ceil(bits / 2)` is never below the true root, so the
/// sequence decreases monotonically and stops as soon as it would grow again.
pub fn isqrt(n: &BigUint) -> BigUint {
    if n.is_zero() {
        return BigUint::zero();
    }

    let mut x = BigUint::one() << ((n.bits() + 1) / 2);
    loop {
        let y = (&x + n / &x) >> 1u32;
        if y >= x {
            return x;
        }
        x = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec;
    use test_strategy::proptest;

    fn assert_is_floor_root(n: &BigUint) {
        let r = isqrt(n);
        let next = &r + 1u32;
        assert!(&(&r * &r) <= n, "{}^2 > {}", r, n);
        assert!(&(&next * &next) > n, "{}^2 <= {}", next, n);
    }

    #[test]
    fn small_values() {
        let expected = [0u32, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3];
        for (n, root) in expected.iter().enumerate() {
            assert_eq!(isqrt(&BigUint::from(n)), BigUint::from(*root), "isqrt({})", n);
        }
    }

    #[test]
    fn perfect_square_boundaries() {
        for root in [2u64, 3, 10, 1_000, 4_294_967_295, 123_456_789_012] {
            let root = BigUint::from(root);
            let square = &root * &root;
            assert_eq!(isqrt(&square), root);
            assert_eq!(isqrt(&(&square - 1u32)), &root - 1u32);
            assert_eq!(isqrt(&(&square + 1u32)), root);
        }
    }

    #[test]
    fn beyond_native_integers() {
        let n = BigUint::one() << 200u32;
        assert_eq!(isqrt(&n), BigUint::one() << 100u32);
        assert_eq!(isqrt(&(&n - 1u32)), (BigUint::one() << 100u32) - 1u32);

        let n = BigUint::parse_bytes(b"99999999999999999999999999999999999999999", 10).unwrap();
        assert_is_floor_root(&n);
    }

    #[proptest]
    fn floor_root_of_u128(n: u128) {
        assert_is_floor_root(&BigUint::from(n));
    }

    #[proptest]
    fn floor_root_of_big_values(#[strategy(vec(proptest::num::u32::ANY, 1..12))] limbs: Vec<u32>) {
        assert_is_floor_root(&BigUint::new(limbs));
    }
}
