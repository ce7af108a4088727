//! Parameter sets of the models, keyed by closed enumerations.
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

use super::key::Key;
use crate::error::CPGError;

/// A dense set of parameter values, one per key of the enumeration `K`.
///
/// Parameters that are never set default to zero, so a partial configuration is always a complete parameter set.
/// In JSON, a parameter set is an object mapping parameter names to values; unknown names are rejected.
///
/// # Examples
///
/// ```rust
/// use rusty_cpg::core::params::ParameterSet;
/// use rusty_cpg::models::hindmarsh_rose::HindmarshRoseParameter as P;
///
/// let params = ParameterSet::new().with(P::Mu, 0.006).with(P::S, 4.0);
/// assert_eq!(params.get(P::Mu), 0.006);
/// assert_eq!(params.get(P::B), 0.0);
/// ```
#[derive(PartialEq, Clone)]
pub struct ParameterSet<K: Key> {
    values: Vec<f64>,
    phantom: PhantomData<K>,
}

impl<K: Key> ParameterSet<K> {
    /// Create a parameter set with every parameter set to zero.
    pub fn new() -> Self {
        ParameterSet {
            values: vec![0.0; K::count()],
            phantom: PhantomData,
        }
    }

    /// Returns the parameter set with the specified parameter replaced.
    pub fn with(mut self, key: K, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Set the value of a parameter.
    pub fn set(&mut self, key: K, value: f64) {
        self.values[key.index()] = value;
    }

    /// Returns the value of a parameter.
    #[inline]
    pub fn get(&self, key: K) -> f64 {
        self.values[key.index()]
    }

    /// Returns an iterator over the (key, value) pairs, ordered by key index.
    pub fn iter(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        K::ALL.iter().map(move |&key| (key, self.get(key)))
    }

    /// Create a parameter set from named values.
    /// The function returns an error if a name is not a key of the enumeration.
    pub fn from_map(map: &BTreeMap<String, f64>) -> Result<Self, CPGError> {
        let mut params = ParameterSet::new();
        for (name, &value) in map {
            params.set(K::from_name(name)?, value);
        }
        Ok(params)
    }

    /// Returns the named values of the parameter set.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter()
            .map(|(key, value)| (key.name().to_string(), value))
            .collect()
    }

    /// Overwrite the parameters present in another parameter set given by name.
    /// The function returns an error if a name is not a key of the enumeration.
    pub fn merge(mut self, overrides: &BTreeMap<String, f64>) -> Result<Self, CPGError> {
        for (name, &value) in overrides {
            self.set(K::from_name(name)?, value);
        }
        Ok(self)
    }

    /// Save the parameter set to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), CPGError> {
        let file = File::create(path).map_err(|e| CPGError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| CPGError::IOError(e.to_string()))?;
        writer.flush().map_err(|e| CPGError::IOError(e.to_string()))
    }

    /// Overwrite the parameters named in a file, keeping the others.
    pub fn merge_from<P: AsRef<Path>>(self, path: P) -> Result<Self, CPGError> {
        let file = File::open(path).map_err(|e| CPGError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        let map: BTreeMap<String, f64> =
            serde_json::from_reader(reader).map_err(|e| CPGError::IOError(e.to_string()))?;
        self.merge(&map)
    }

    /// Load a parameter set from a file.
    /// Parameters absent from the file default to zero.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, CPGError> {
        Self::new().merge_from(path)
    }
}

impl<K: Key> Default for ParameterSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> fmt::Debug for ParameterSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (key.name(), value)))
            .finish()
    }
}

impl<K: Key> Serialize for ParameterSet<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(K::count()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.name(), &value)?;
        }
        map.end()
    }
}

impl<'de, K: Key> Deserialize<'de> for ParameterSet<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, f64>::deserialize(deserializer)?;
        ParameterSet::from_map(&map).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    crate::keys! {
        enum Toy {
            Gain => "gain",
            Tau => "tau",
        }
    }

    #[test]
    fn test_missing_parameters_default_to_zero() {
        let params = ParameterSet::<Toy>::new().with(Toy::Tau, 5.0);
        assert_eq!(params.get(Toy::Gain), 0.0);
        assert_eq!(params.get(Toy::Tau), 5.0);
    }

    #[test]
    fn test_json_object_format() {
        let params = ParameterSet::<Toy>::new().with(Toy::Gain, 0.5);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"gain":0.5,"tau":0.0}"#);

        let params: ParameterSet<Toy> = serde_json::from_str(r#"{"tau": 2.0}"#).unwrap();
        assert_eq!(params.get(Toy::Gain), 0.0);
        assert_eq!(params.get(Toy::Tau), 2.0);
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let result: Result<ParameterSet<Toy>, _> = serde_json::from_str(r#"{"delay": 1.0}"#);
        assert!(result.is_err());

        let map = BTreeMap::from([("delay".to_string(), 1.0)]);
        assert!(matches!(
            ParameterSet::<Toy>::from_map(&map),
            Err(CPGError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_merge_overrides() {
        let params = ParameterSet::<Toy>::new().with(Toy::Gain, 1.0).with(Toy::Tau, 2.0);
        let overrides = BTreeMap::from([("tau".to_string(), 3.0)]);
        let params = params.merge(&overrides).unwrap();
        assert_eq!(params.get(Toy::Gain), 1.0);
        assert_eq!(params.get(Toy::Tau), 3.0);
    }

    #[test]
    fn test_save_load_file() {
        let params = ParameterSet::<Toy>::new().with(Toy::Gain, -1.25).with(Toy::Tau, 200.0);
        let file = NamedTempFile::new().unwrap();
        params.save_to(file.path()).unwrap();
        assert_eq!(ParameterSet::<Toy>::load_from(file.path()).unwrap(), params);
    }

    #[test]
    fn test_merge_from_file_keeps_other_values() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"tau": 50.0}}"#).unwrap();
        let params = ParameterSet::<Toy>::new()
            .with(Toy::Gain, 2.0)
            .merge_from(file.path())
            .unwrap();
        assert_eq!(params.get(Toy::Gain), 2.0);
        assert_eq!(params.get(Toy::Tau), 50.0);

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"gain": 1.0, "bias": 0.5}}"#).unwrap();
        assert!(matches!(
            ParameterSet::<Toy>::new().merge_from(file.path()),
            Err(CPGError::UnknownKey(_))
        ));
    }
}
