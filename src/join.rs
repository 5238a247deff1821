//! Joins of sequences of `KeyVal` that are ordered by key.

use itertools::{EitherOrBoth, Itertools};

#[derive(Debug, Clone, PartialEq)]
pub struct KeyVal<K, V> {
    pub key: K,
    pub val: V,
}

/// Only keys present in both sequences are preserved.
pub fn keyval_inner_join_2<K: Ord, V1, V2>(
    a: impl IntoIterator<Item = KeyVal<K, V1>>,
    b: impl IntoIterator<Item = KeyVal<K, V2>>,
) -> impl Iterator<Item = KeyVal<K, (V1, V2)>> {
    a.into_iter()
        .merge_join_by(b, |a, b| a.key.cmp(&b.key))
        .filter_map(|eob| match eob {
            EitherOrBoth::Both(a, b) => Some(KeyVal {
                key: a.key,
                val: (a.val, b.val),
            }),
            EitherOrBoth::Left(_) => None,
            EitherOrBoth::Right(_) => None,
        })
}

/// All keys from either sequence, with the value of the side that
/// misses a key set to None.
pub fn keyval_outer_join_2<K: Ord, V1, V2>(
    a: impl IntoIterator<Item = KeyVal<K, V1>>,
    b: impl IntoIterator<Item = KeyVal<K, V2>>,
) -> impl Iterator<Item = KeyVal<K, (Option<V1>, Option<V2>)>> {
    a.into_iter()
        .merge_join_by(b, |a, b| a.key.cmp(&b.key))
        .map(|eob| match eob {
            EitherOrBoth::Both(a, b) => KeyVal {
                key: a.key,
                val: (Some(a.val), Some(b.val)),
            },
            EitherOrBoth::Left(a) => KeyVal {
                key: a.key,
                val: (Some(a.val), None),
            },
            EitherOrBoth::Right(b) => KeyVal {
                key: b.key,
                val: (None, Some(b.val)),
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k<K, V>(k: K, v: V) -> KeyVal<K, V> {
        KeyVal { key: k, val: v }
    }

    #[test]
    fn t_inner() {
        let a = vec![k(0, "put"), k(1, "get"), k(3, "seek")];
        let b = vec![k(1, 2.0), k(2, 3.0), k(3, 4.0)];
        assert_eq!(
            keyval_inner_join_2(a, b).collect::<Vec<_>>(),
            vec![k(1, ("get", 2.0)), k(3, ("seek", 4.0))]
        );
    }

    #[test]
    fn t_outer() {
        let a = vec![k("a", 1), k("c", 3)];
        let b = vec![k("b", 20), k("c", 30)];
        assert_eq!(
            keyval_outer_join_2(a, b).collect::<Vec<_>>(),
            vec![
                k("a", (Some(1), None)),
                k("b", (None, Some(20))),
                k("c", (Some(3), Some(30)))
            ]
        );
    }
}
