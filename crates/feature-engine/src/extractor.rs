//! Feature Extraction Capability

use crate::error::ExtractionError;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Scalar produced by the extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    /// Diagnostic values such as hashes and version strings
    Text(String),
}

impl FeatureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    /// Numbers print as Python's `repr(float)` does: shortest round-trip
    /// digits, always a decimal part (`5.0`), and scientific notation with a
    /// signed two-digit exponent outside `1e-4 <= |v| < 1e16`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(v) if v.is_nan() => f.write_str("nan"),
            FeatureValue::Number(v) if v.is_infinite() => {
                f.write_str(if *v > 0.0 { "inf" } else { "-inf" })
            }
            FeatureValue::Number(v) => write_float(f, *v),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    let sci = format!("{:e}", v);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let fixed = v.to_string();
        if fixed.contains('.') {
            f.write_str(&fixed)
        } else {
            write!(f, "{}.0", fixed)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Number(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Text(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Text(s)
    }
}

/// Feature name to value mapping that keeps the extractor's output order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMap {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a feature; an existing name keeps its position and takes the new value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl IntoIterator for FeatureMap {
    type Item = (String, FeatureValue);
    type IntoIter = std::vec::IntoIter<(String, FeatureValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for FeatureMap
where
    K: Into<String>,
    V: Into<FeatureValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = FeatureMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Computes named features for one region of an image.
///
/// Implementations may hold native backend state, so calls are made one at a
/// time and in label order.
pub trait FeatureExtractor<I: ?Sized> {
    /// Extract features for the voxels where `submask` is 1
    fn extract(&mut self, image: &I, submask: &ArrayD<u8>) -> Result<FeatureMap, ExtractionError>;
}

impl<I: ?Sized, E: FeatureExtractor<I> + ?Sized> FeatureExtractor<I> for Box<E> {
    fn extract(&mut self, image: &I, submask: &ArrayD<u8>) -> Result<FeatureMap, ExtractionError> {
        (**self).extract(image, submask)
    }
}

/// Extractor backed by a closure, see [`from_fn`]
pub struct FnExtractor<I: ?Sized, F> {
    f: F,
    _image: PhantomData<fn(&I)>,
}

/// Build an extractor from a closure
pub fn from_fn<I, F>(f: F) -> FnExtractor<I, F>
where
    I: ?Sized,
    F: FnMut(&I, &ArrayD<u8>) -> Result<FeatureMap, ExtractionError>,
{
    FnExtractor {
        f,
        _image: PhantomData,
    }
}

impl<I, F> FeatureExtractor<I> for FnExtractor<I, F>
where
    I: ?Sized,
    F: FnMut(&I, &ArrayD<u8>) -> Result<FeatureMap, ExtractionError>,
{
    fn extract(&mut self, image: &I, submask: &ArrayD<u8>) -> Result<FeatureMap, ExtractionError> {
        (self.f)(image, submask)
    }
}
