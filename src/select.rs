use crate::feature::{Feature, FeatureList};
use crate::filter::{parse_filter, FilterClause, FilterError, IdRange, RangeQuery};
use crate::interval::IntervalIndex;
use regex::Regex;

/// A tag pattern with an optional value pattern.
#[derive(Debug, Clone)]
pub struct QualifierPredicate {
    tag: Regex,
    value: Option<Regex>,
}

impl QualifierPredicate {
    pub fn matches(&self, feature: &Feature) -> bool {
        match &self.value {
            None => feature.qualifiers.tags().any(|t| self.tag.is_match(t)),
            Some(value) => feature
                .qualifiers
                .iter()
                .any(|(t, v)| self.tag.is_match(t) && value.is_match(v)),
        }
    }
}

fn alternation(alts: &[String]) -> Result<Regex, FilterError> {
    let pattern = alts.join("|");
    Regex::new(&pattern).map_err(|e| FilterError::InvalidPattern(format!("{}: {}", pattern, e)))
}

/// A compiled filter. Stages run in a fixed order, each narrowing the result
/// of the one before: index, location, key, qualifiers.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    ids: Option<Vec<IdRange>>,
    ranges: Vec<RangeQuery>,
    key: Option<Regex>,
    qualifiers: Vec<QualifierPredicate>,
}

impl Filter {
    /// Compile a filter spec.
    pub fn parse(spec: &str) -> Result<Self, FilterError> {
        Self::from_clauses(&parse_filter(spec)?)
    }

    /// Index clauses union their ids, as do location and key clauses.
    /// Qualifier clauses must all hold.
    pub fn from_clauses(clauses: &[FilterClause]) -> Result<Self, FilterError> {
        let mut filter = Filter::default();
        let mut keys: Vec<String> = Vec::new();
        for clause in clauses {
            match clause {
                FilterClause::Index(ranges) => {
                    filter
                        .ids
                        .get_or_insert_with(Vec::new)
                        .extend_from_slice(ranges);
                }
                FilterClause::Location(queries) => filter.ranges.extend_from_slice(queries),
                FilterClause::Key(alts) => keys.extend(alts.iter().cloned()),
                FilterClause::Qualifier { tag, values } => {
                    filter.qualifiers.push(QualifierPredicate {
                        tag: alternation(tag)?,
                        value: values.as_deref().map(alternation).transpose()?,
                    });
                }
            }
        }
        if !keys.is_empty() {
            filter.key = Some(alternation(&keys)?);
        }
        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_none()
            && self.ranges.is_empty()
            && self.key.is_none()
            && self.qualifiers.is_empty()
    }

    /// Apply the filter, returning the surviving features in their original order.
    pub fn apply(&self, features: &FeatureList) -> FeatureList {
        let mut current = features.clone();

        if let Some(ids) = &self.ids {
            current = current.filtered(|f| ids.iter().any(|r| r.contains(f.id)));
            log::debug!("index stage kept {} of {} features", current.len(), features.len());
        }

        if !self.ranges.is_empty() {
            current = self.select_ranges(features, &current);
            log::debug!("location stage kept {} features", current.len());
        }

        if let Some(key) = &self.key {
            current = current.filtered(|f| key.is_match(&f.key));
            log::debug!("key stage kept {} features", current.len());
        }

        if !self.qualifiers.is_empty() {
            current = current.filtered(|f| self.qualifiers.iter().all(|q| q.matches(f)));
            log::debug!("qualifier stage kept {} features", current.len());
        }

        current
    }

    /// Keep the features of `current` whose joined span overlaps a query.
    /// Open query bounds take the extremes of the full input list.
    fn select_ranges(&self, input: &FeatureList, current: &FeatureList) -> FeatureList {
        let (lo, hi) = match input.extent() {
            Some(e) => e,
            None => return FeatureList::default(),
        };
        let queries: Vec<(i64, i64)> = self
            .ranges
            .iter()
            .map(|q| (q.start.unwrap_or(lo), q.end.unwrap_or(hi)))
            .collect();
        let index = IntervalIndex::new(current.features());
        let mut hit = vec![false; current.len()];
        for positions in index.find_overlaps(&queries) {
            for i in positions {
                hit[i] = true;
            }
        }
        current
            .iter()
            .zip(hit)
            .filter(|(_, keep)| *keep)
            .map(|(f, _)| f.clone())
            .collect()
    }
}

/// Select features from `features` with a filter spec, e.g. `"key=CDS;gene=tnpR"`.
/// An empty spec returns the list unchanged.
pub fn select(features: &FeatureList, spec: &str) -> Result<FeatureList, FilterError> {
    Ok(Filter::parse(spec)?.apply(features))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::feature_fixtures::parse_features;

    const FIVE: &str = "
        1 gene 1..100 gene=abc
        2 CDS join(10..20,30..40) gene=abc;product=alpha
        3 gene complement(200..300) gene=xyz;pseudo
        4 misc_feature 250..260 note=first;note=second
        5 CDS 400..>500 gene=xyz;db_xref=GI:12345
    ";

    #[test]
    fn test_select_by_index() {
        let list = parse_features(FIVE);
        let out = select(&list, "idx=1,3").unwrap();
        assert_eq!(out.ids(), vec![1, 3]);
        let out = select(&list, "idx=4:5;index=1").unwrap();
        assert_eq!(out.ids(), vec![1, 4, 5]);
    }

    #[test]
    fn test_select_by_huge_index_range() {
        let list = parse_features(FIVE);
        let out = select(&list, "idx=2:18446744073709551615").unwrap();
        assert_eq!(out.ids(), vec![2, 3, 4, 5]);
        let out = select(&list, "idx=4000000000:4000000001").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_select_by_location() {
        let list = parse_features(
            "
            1 gene 50..150
            2 gene 200..300
            3 gene join(140..160,190..210)
            ",
        );
        // closed intervals: the feature starting at 200 touches the query end
        let out = select(&list, "loc=100:200").unwrap();
        assert_eq!(out.ids(), vec![1, 2, 3]);
        let out = select(&list, "loc=100:199").unwrap();
        assert_eq!(out.ids(), vec![1, 3]);
        let out = select(&list, "loc=151:189").unwrap();
        assert_eq!(out.ids(), vec![3]);
    }

    #[test]
    fn test_select_location_open_bounds() {
        let list = parse_features(FIVE);
        assert_eq!(select(&list, "loc=:15").unwrap().ids(), vec![1, 2]);
        assert_eq!(select(&list, "location=301:").unwrap().ids(), vec![5]);
        assert_eq!(select(&list, "loc=255").unwrap().ids(), vec![3, 4]);
        assert_eq!(select(&list, "loc=:").unwrap().len(), 5);
    }

    #[test]
    fn test_select_by_key() {
        let list = parse_features(FIVE);
        assert_eq!(select(&list, "key=CDS,gene").unwrap().ids(), vec![1, 2, 3, 5]);
        assert_eq!(select(&list, "key=^gene$").unwrap().ids(), vec![1, 3]);
    }

    #[test]
    fn test_select_by_qualifier() {
        let list = parse_features(FIVE);
        assert_eq!(select(&list, "pseudo").unwrap().ids(), vec![3]);
        assert_eq!(select(&list, "gene=xyz").unwrap().ids(), vec![3, 5]);
        assert_eq!(select(&list, "gene=xyz;pseudo").unwrap().ids(), vec![3]);
        assert_eq!(select(&list, "note=second").unwrap().ids(), vec![4]);
        assert_eq!(select(&list, "product,pseudo").unwrap().ids(), vec![2, 3]);
        assert_eq!(select(&list, "db_xref=GI:").unwrap().ids(), vec![5]);
    }

    #[test]
    fn test_stages_chain() {
        let list = parse_features(FIVE);
        let out = select(&list, "idx=2:5;loc=1:260;key=gene,misc;note").unwrap();
        assert_eq!(out.ids(), vec![4]);
        let out = select(&list, "key=CDS\n;\tgene=abc").unwrap();
        assert_eq!(out.ids(), vec![2]);
    }

    #[test]
    fn test_empty_spec_and_input_untouched() {
        let list = parse_features(FIVE);
        let before = list.clone();
        assert_eq!(select(&list, "").unwrap(), list);
        let _ = select(&list, "idx=1").unwrap();
        assert_eq!(list, before);
        assert!(select(&FeatureList::default(), "loc=1:10").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let list = parse_features(FIVE);
        assert!(matches!(
            select(&list, "key=(CDS"),
            Err(FilterError::InvalidPattern(_))
        ));
        assert!(matches!(
            select(&list, "idx=one"),
            Err(FilterError::InvalidClause(_))
        ));
    }
}
