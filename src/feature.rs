use crate::location::{Location, LocationError};
use crate::position::Positioned;
use linear_map::LinearMap;

/// Qualifiers of a feature: tags in first-seen order, each with all of its
/// values in the order they were added. Tags may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualifiers {
    inner: LinearMap<String, Vec<String>>,
}

impl Qualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value for `tag`. A flag qualifier such as `/pseudo` has an empty value.
    pub fn push(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let tag = tag.into();
        match self.inner.get_mut(&tag) {
            Some(values) => values.push(value.into()),
            None => {
                self.inner.insert(tag, vec![value.into()]);
            }
        }
    }

    /// All values of `tag`, empty when the tag is absent.
    pub fn get(&self, tag: &str) -> &[String] {
        self.inner.get(tag).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.inner.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(|k| k.as_str())
    }

    /// Every (tag, value) pair.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .flat_map(|(tag, values)| values.iter().map(move |v| (tag.as_str(), v.as_str())))
    }

    pub fn len(&self) -> usize {
        self.inner.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<T: Into<String>, V: Into<String>> FromIterator<(T, V)> for Qualifiers {
    fn from_iter<I: IntoIterator<Item = (T, V)>>(iter: I) -> Self {
        let mut q = Qualifiers::new();
        for (tag, value) in iter {
            q.push(tag, value);
        }
        q
    }
}

/// An annotated feature. `id` is assigned once by whoever builds the list
/// and never changes, even when the list is reordered or filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub id: u64,
    pub key: String,
    pub location: Location,
    pub qualifiers: Qualifiers,
}

impl Feature {
    pub fn new(id: u64, key: impl Into<String>, location: Location, qualifiers: Qualifiers) -> Self {
        Feature {
            id,
            key: key.into(),
            location,
            qualifiers,
        }
    }

    /// Values of one qualifier.
    pub fn qualifier(&self, tag: &str) -> &[String] {
        self.qualifiers.get(tag)
    }

    /// Smallest start and largest end over all segments.
    pub fn span(&self) -> (i64, i64) {
        self.location.span()
    }
}

impl Positioned for Feature {
    #[inline]
    fn start(&self) -> i64 {
        self.span().0
    }
    #[inline]
    fn stop(&self) -> i64 {
        self.span().1
    }
}

/// Called after a feature list has been shifted, e.g. to write the new
/// coordinates back to wherever the record came from.
pub trait ShiftHook {
    fn after_shift(&self, before: &FeatureList, after: &FeatureList, delta: i64);
}

/// An ordered list of features. Selection never mutates a list; it returns a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureList {
    features: Vec<Feature>,
}

impl FeatureList {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureList { features }
    }

    /// Build a list from `(key, location, qualifiers)` triples, numbering them from 1.
    pub fn numbered<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (String, Location, Qualifiers)>,
    {
        FeatureList {
            features: items
                .into_iter()
                .enumerate()
                .map(|(i, (key, location, qualifiers))| Feature {
                    id: i as u64 + 1,
                    key,
                    location,
                    qualifiers,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn by_id(&self, id: u64) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn ids(&self) -> Vec<u64> {
        self.features.iter().map(|f| f.id).collect()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.key.as_str()).collect()
    }

    /// Smallest start and largest end over the whole list, `None` when empty.
    pub fn extent(&self) -> Option<(i64, i64)> {
        let lo = self.features.iter().map(|f| f.start()).min()?;
        let hi = self.features.iter().map(|f| f.stop()).max()?;
        Some((lo, hi))
    }

    /// A new list holding the features for which `keep` is true, in order.
    pub fn filtered<F: Fn(&Feature) -> bool>(&self, keep: F) -> FeatureList {
        FeatureList {
            features: self.features.iter().filter(|f| keep(f)).cloned().collect(),
        }
    }

    /// Shift every feature by `delta` and hand both lists to `hook`, if any.
    /// Nothing is shifted, and the hook is not called, if any coordinate
    /// would overflow.
    pub fn shift(
        &self,
        delta: i64,
        hook: Option<&dyn ShiftHook>,
    ) -> Result<FeatureList, LocationError> {
        let shifted = self
            .features
            .iter()
            .map(|f| {
                Ok(Feature {
                    location: f.location.shifted(delta)?,
                    ..f.clone()
                })
            })
            .collect::<Result<FeatureList, LocationError>>()?;
        if let Some(hook) = hook {
            hook.after_shift(self, &shifted, delta);
        }
        Ok(shifted)
    }
}

impl<'a> IntoIterator for &'a FeatureList {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

impl FromIterator<Feature> for FeatureList {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        FeatureList {
            features: iter.into_iter().collect(),
        }
    }
}
