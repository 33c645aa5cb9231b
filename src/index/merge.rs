//! Order-preserving merge of banner indexes

use super::BannerIndex;

/// Merge indexes in input order into a single version-1 index
///
/// `None` entries are skipped. For every banner, URLs keep the order in which
/// they were first seen across the inputs and appear at most once.
pub fn merge<'a, I>(documents: I) -> BannerIndex
where
    I: IntoIterator<Item = Option<&'a BannerIndex>>,
{
    let mut merged = BannerIndex::new();

    for document in documents.into_iter().flatten() {
        for (banner, urls) in &document.linux {
            merged.insert_urls(banner, urls);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::INDEX_VERSION;

    fn index(entries: &[(&str, &[&str])]) -> BannerIndex {
        let mut index = BannerIndex::new();
        for (banner, urls) in entries {
            let urls: Vec<String> = urls.iter().map(|u| u.to_string()).collect();
            index.insert_urls(banner, &urls);
        }
        index
    }

    #[test]
    fn merges_overlapping_banner() {
        let a = index(&[("K", &["u1", "u2"])]);
        let b = index(&[("K", &["u2", "u3"])]);

        let merged = merge([Some(&a), Some(&b)]);

        assert_eq!(merged.version, INDEX_VERSION);
        assert_eq!(merged.urls("K").unwrap(), ["u1", "u2", "u3"]);
    }

    #[test]
    fn keeps_disjoint_banners() {
        let a = index(&[("K1", &["u1"])]);
        let b = index(&[("K2", &["u2"])]);

        let merged = merge([Some(&a), Some(&b)]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.urls("K1").unwrap(), ["u1"]);
        assert_eq!(merged.urls("K2").unwrap(), ["u2"]);
    }

    #[test]
    fn skips_missing_documents() {
        let a = index(&[("K", &["u1"])]);

        let merged = merge([None, Some(&a), None]);

        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_index() {
        let merged = merge(std::iter::empty());
        assert!(merged.is_empty());
        assert_eq!(merged.version, INDEX_VERSION);
    }

    #[test]
    fn input_order_decides_url_order() {
        let a = index(&[("K", &["u2"])]);
        let b = index(&[("K", &["u1", "u2"])]);

        assert_eq!(merge([Some(&a), Some(&b)]).urls("K").unwrap(), ["u2", "u1"]);
        assert_eq!(merge([Some(&b), Some(&a)]).urls("K").unwrap(), ["u1", "u2"]);
    }

    #[test]
    fn nested_merge_matches_flat_merge() {
        let a = index(&[("K", &["u3", "u1"])]);
        let b = index(&[("K", &["u1", "u2"]), ("J", &["j1"])]);
        let c = index(&[("K", &["u4"]), ("J", &["j1", "j2"])]);

        let inner = merge([Some(&b), Some(&c)]);
        let nested = merge([Some(&a), Some(&inner)]);
        let flat = merge([Some(&a), Some(&b), Some(&c)]);

        assert_eq!(nested, flat);
    }

    #[test]
    fn ignores_input_version() {
        let mut a = index(&[("K", &["u1"])]);
        a.version = 7;

        assert_eq!(merge([Some(&a)]).version, INDEX_VERSION);
    }
}
