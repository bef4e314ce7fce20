use crate::core::{Asset, Pair, PairAddress};
use log::debug;

/// Find the direct pair between two selected assets.
///
/// Order-independent: `(token_0 = a, token_1 = b)` is tried before the swapped
/// orientation. Linear scan; known pair sets are small.
pub fn find_pair<'a>(
    a: Option<&Asset>,
    b: Option<&Asset>,
    known_pairs: &'a [Pair],
) -> Option<&'a Pair> {
    let (a, b) = (a?, b?);

    let found = known_pairs
        .iter()
        .find(|p| p.token_0().id == a.id && p.token_1().id == b.id)
        .or_else(|| {
            known_pairs
                .iter()
                .find(|p| p.token_0().id == b.id && p.token_1().id == a.id)
        });

    debug!(
        "Pair lookup {}/{}: {}",
        a.symbol,
        b.symbol,
        found
            .map(|p| p.address().to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    found
}

/// Address-only form of [`find_pair`].
pub fn find_pair_address(
    a: Option<&Asset>,
    b: Option<&Asset>,
    known_pairs: &[Pair],
) -> Option<PairAddress> {
    find_pair(a, b, known_pairs).map(|p| p.address().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AssetId;

    fn asset(code: &str) -> Asset {
        Asset::new(AssetId::Contract(format!("C{}", code)), code, code, 7)
    }

    fn known_pairs() -> Vec<Pair> {
        vec![
            Pair::new(asset("AAA"), asset("BBB"), PairAddress::new("CPAIR_AB")).unwrap(),
            Pair::new(asset("CCC"), asset("AAA"), PairAddress::new("CPAIR_CA")).unwrap(),
        ]
    }

    #[test]
    fn test_find_pair_in_stored_order() {
        let pairs = known_pairs();
        assert_eq!(
            find_pair_address(Some(&asset("AAA")), Some(&asset("BBB")), &pairs),
            Some(PairAddress::new("CPAIR_AB"))
        );
    }

    #[test]
    fn test_find_pair_in_reverse_order() {
        let pairs = known_pairs();
        assert_eq!(
            find_pair_address(Some(&asset("BBB")), Some(&asset("AAA")), &pairs),
            Some(PairAddress::new("CPAIR_AB"))
        );
        assert_eq!(
            find_pair_address(Some(&asset("AAA")), Some(&asset("CCC")), &pairs),
            Some(PairAddress::new("CPAIR_CA"))
        );
    }

    #[test]
    fn test_missing_selection_or_pair() {
        let pairs = known_pairs();
        assert_eq!(find_pair_address(None, Some(&asset("BBB")), &pairs), None);
        assert_eq!(find_pair_address(Some(&asset("AAA")), None, &pairs), None);
        assert_eq!(
            find_pair_address(Some(&asset("BBB")), Some(&asset("CCC")), &pairs),
            None
        );
        assert_eq!(
            find_pair_address(Some(&asset("AAA")), Some(&asset("BBB")), &[]),
            None
        );
    }
}
