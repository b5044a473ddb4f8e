//! Phenotype data: per-item trait values on declared scales.

use log::warn;
use serde::{Deserialize, Serialize};

use super::Header;
use crate::error::{CoreHunterError, Result};

/// Measurement scale of a phenotypic feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Scale {
    /// Presence/absence trait, compared as an asymmetric binary.
    Binary,
    /// Unordered categories.
    Nominal,
    /// Numeric trait with a value range; missing bounds are inferred from the data.
    Ranged {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
}

/// A phenotypic feature (trait) with its scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub scale: Scale,
}

impl Feature {
    pub fn new(name: impl Into<String>, scale: Scale) -> Self {
        Self {
            name: name.into(),
            scale,
        }
    }
}

/// A single observed phenotype value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhenotypeValue {
    Binary(bool),
    Number(f64),
    Nominal(String),
}

/// Phenotype values for every (item, feature), item-major.
#[derive(Debug, Clone)]
pub struct PhenotypeData {
    headers: Vec<Header>,
    features: Vec<Feature>,
    /// Resolved `(min, max)` for ranged features.
    bounds: Vec<Option<(f64, f64)>>,
    values: Vec<Option<PhenotypeValue>>,
}

impl PhenotypeData {
    /// Build from values indexed as `[item][feature]`.
    ///
    /// Binary features also accept the numbers 0 and 1; nominal features accept
    /// numeric category codes.
    pub fn new(
        headers: Vec<Header>,
        features: Vec<Feature>,
        values: Vec<Vec<Option<PhenotypeValue>>>,
    ) -> Result<Self> {
        if headers.len() != values.len() {
            return Err(CoreHunterError::invalid_data(format!(
                "{} phenotype headers for {} items",
                headers.len(),
                values.len()
            )));
        }
        if features.is_empty() {
            return Err(CoreHunterError::invalid_data("phenotype data has no features"));
        }

        let mut flat = Vec::with_capacity(values.len() * features.len());
        for (id, row) in values.into_iter().enumerate() {
            if row.len() != features.len() {
                return Err(CoreHunterError::invalid_data(format!(
                    "item {} has {} phenotype values, expected {}",
                    id,
                    row.len(),
                    features.len()
                )));
            }
            for (f, value) in row.into_iter().enumerate() {
                let value = match value {
                    Some(v) => Some(normalize_value(&features[f], v).ok_or_else(|| {
                        CoreHunterError::invalid_data(format!(
                            "item {}: value does not fit scale of feature '{}'",
                            id, features[f].name
                        ))
                    })?),
                    None => None,
                };
                flat.push(value);
            }
        }

        let num_features = features.len();
        let mut bounds = Vec::with_capacity(num_features);
        for (f, feature) in features.iter().enumerate() {
            let Scale::Ranged { min, max } = feature.scale else {
                bounds.push(None);
                continue;
            };
            let observed = flat
                .iter()
                .skip(f)
                .step_by(num_features)
                .filter_map(|v| match v {
                    Some(PhenotypeValue::Number(x)) => Some(*x),
                    _ => None,
                });
            let (lo, hi) = observed.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
            if !lo.is_finite() && (min.is_none() || max.is_none()) {
                warn!(
                    "feature '{}' has no values and no declared range; its range is zero",
                    feature.name
                );
            }
            let min = min.unwrap_or(if lo.is_finite() { lo } else { 0.0 });
            let max = max.unwrap_or(if hi.is_finite() { hi } else { min });
            if min > max {
                return Err(CoreHunterError::invalid_data(format!(
                    "feature '{}': min {} > max {}",
                    feature.name, min, max
                )));
            }
            if lo < min || hi > max {
                return Err(CoreHunterError::invalid_data(format!(
                    "feature '{}': values outside declared range [{}, {}]",
                    feature.name, min, max
                )));
            }
            bounds.push(Some((min, max)));
        }

        Ok(Self {
            headers,
            features,
            bounds,
            values: flat,
        })
    }

    /// Number of items.
    #[inline]
    pub fn size(&self) -> usize {
        self.headers.len()
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn header(&self, id: usize) -> &Header {
        &self.headers[id]
    }

    #[inline]
    pub fn value(&self, id: usize, feature: usize) -> Option<&PhenotypeValue> {
        self.values[id * self.features.len() + feature].as_ref()
    }

    /// Resolved `(min, max)` of a ranged feature.
    pub fn bounds(&self, feature: usize) -> Option<(f64, f64)> {
        self.bounds[feature]
    }

    /// Width of a ranged feature's value range.
    pub fn range(&self, feature: usize) -> Option<f64> {
        self.bounds[feature].map(|(min, max)| max - min)
    }
}

fn normalize_value(feature: &Feature, value: PhenotypeValue) -> Option<PhenotypeValue> {
    match (&feature.scale, value) {
        (Scale::Binary, PhenotypeValue::Binary(b)) => Some(PhenotypeValue::Binary(b)),
        (Scale::Binary, PhenotypeValue::Number(x)) if x == 0.0 || x == 1.0 => {
            Some(PhenotypeValue::Binary(x == 1.0))
        }
        (Scale::Nominal, v @ PhenotypeValue::Nominal(_)) => Some(v),
        (Scale::Nominal, PhenotypeValue::Number(x)) if x.is_finite() => {
            Some(PhenotypeValue::Nominal(x.to_string()))
        }
        (Scale::Ranged { .. }, PhenotypeValue::Number(x)) if x.is_finite() => {
            Some(PhenotypeValue::Number(x))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(n: usize) -> Vec<Header> {
        (0..n).map(|i| Header::named(format!("p{}", i))).collect()
    }

    fn features() -> Vec<Feature> {
        vec![
            Feature::new("awned", Scale::Binary),
            Feature::new("colour", Scale::Nominal),
            Feature::new(
                "height",
                Scale::Ranged {
                    min: None,
                    max: None,
                },
            ),
        ]
    }

    #[test]
    fn test_range_inference() {
        let data = PhenotypeData::new(
            headers(3),
            features(),
            vec![
                vec![
                    Some(PhenotypeValue::Binary(true)),
                    Some(PhenotypeValue::Nominal("red".into())),
                    Some(PhenotypeValue::Number(80.0)),
                ],
                vec![
                    Some(PhenotypeValue::Number(0.0)),
                    Some(PhenotypeValue::Number(2.0)),
                    Some(PhenotypeValue::Number(120.0)),
                ],
                vec![None, None, None],
            ],
        )
        .unwrap();

        assert_eq!(data.bounds(2), Some((80.0, 120.0)));
        assert_eq!(data.range(2), Some(40.0));
        assert_eq!(data.range(0), None);
        assert_eq!(data.value(1, 0), Some(&PhenotypeValue::Binary(false)));
        assert_eq!(
            data.value(1, 1),
            Some(&PhenotypeValue::Nominal("2".into()))
        );
        assert_eq!(data.value(2, 2), None);
    }

    #[test]
    fn test_value_outside_declared_range() {
        let result = PhenotypeData::new(
            headers(1),
            vec![Feature::new(
                "height",
                Scale::Ranged {
                    min: Some(0.0),
                    max: Some(10.0),
                },
            )],
            vec![vec![Some(PhenotypeValue::Number(11.0))]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_scale_mismatch() {
        let result = PhenotypeData::new(
            headers(1),
            vec![Feature::new("awned", Scale::Binary)],
            vec![vec![Some(PhenotypeValue::Nominal("yes".into()))]],
        );
        assert!(result.is_err());
    }
}
