use phf::phf_map;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Electronvolts per Hartree, applied to every energy-valued property.
pub const HARTREE_TO_EV: f64 = 27.2114;

/// Number of scalar properties carried on line 2 of every QM9 record.
pub const PROPERTY_COUNT: usize = 17;

/// Identifies one of the scalar properties of a QM9 record.
///
/// Variants are declared in the canonical order in which the values appear on
/// the property line, so `key as usize` is the token position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKey {
    /// Database tag (always `gdb9` in the published dataset).
    Db,
    /// Molecule index within the database.
    Id,
    /// Rotational constant A (GHz).
    A,
    /// Rotational constant B (GHz).
    B,
    /// Rotational constant C (GHz).
    C,
    /// Dipole moment (Debye).
    Mu,
    /// Isotropic polarizability (Bohr^3).
    Alpha,
    /// Energy of the highest occupied molecular orbital.
    Homo,
    /// Energy of the lowest unoccupied molecular orbital.
    Lumo,
    /// HOMO-LUMO gap.
    Gap,
    /// Electronic spatial extent (Bohr^2).
    R2,
    /// Zero point vibrational energy.
    Zpve,
    /// Internal energy at 0 K.
    U0,
    /// Internal energy at 298.15 K.
    U,
    /// Enthalpy at 298.15 K.
    H,
    /// Free energy at 298.15 K.
    G,
    /// Heat capacity at 298.15 K (cal/mol K).
    Cv,
}

static KEYS_BY_NAME: phf::Map<&'static str, PropertyKey> = phf_map! {
    "db" => PropertyKey::Db,
    "id" => PropertyKey::Id,
    "A" => PropertyKey::A,
    "B" => PropertyKey::B,
    "C" => PropertyKey::C,
    "mu" => PropertyKey::Mu,
    "alpha" => PropertyKey::Alpha,
    "homo" => PropertyKey::Homo,
    "lumo" => PropertyKey::Lumo,
    "gap" => PropertyKey::Gap,
    "r2" => PropertyKey::R2,
    "zpve" => PropertyKey::Zpve,
    "U0" => PropertyKey::U0,
    "U" => PropertyKey::U,
    "H" => PropertyKey::H,
    "G" => PropertyKey::G,
    "Cv" => PropertyKey::Cv,
};

impl PropertyKey {
    /// All keys in canonical (line) order.
    pub const ALL: [PropertyKey; PROPERTY_COUNT] = [
        PropertyKey::Db,
        PropertyKey::Id,
        PropertyKey::A,
        PropertyKey::B,
        PropertyKey::C,
        PropertyKey::Mu,
        PropertyKey::Alpha,
        PropertyKey::Homo,
        PropertyKey::Lumo,
        PropertyKey::Gap,
        PropertyKey::R2,
        PropertyKey::Zpve,
        PropertyKey::U0,
        PropertyKey::U,
        PropertyKey::H,
        PropertyKey::G,
        PropertyKey::Cv,
    ];

    /// The eight keys whose values are converted from Hartree to eV.
    pub const ENERGIES: [PropertyKey; 8] = [
        PropertyKey::Homo,
        PropertyKey::Lumo,
        PropertyKey::Gap,
        PropertyKey::Zpve,
        PropertyKey::U0,
        PropertyKey::U,
        PropertyKey::H,
        PropertyKey::G,
    ];

    /// The name used for this key in QM9 headers and extended XYZ comments.
    pub const fn name(self) -> &'static str {
        match self {
            PropertyKey::Db => "db",
            PropertyKey::Id => "id",
            PropertyKey::A => "A",
            PropertyKey::B => "B",
            PropertyKey::C => "C",
            PropertyKey::Mu => "mu",
            PropertyKey::Alpha => "alpha",
            PropertyKey::Homo => "homo",
            PropertyKey::Lumo => "lumo",
            PropertyKey::Gap => "gap",
            PropertyKey::R2 => "r2",
            PropertyKey::Zpve => "zpve",
            PropertyKey::U0 => "U0",
            PropertyKey::U => "U",
            PropertyKey::H => "H",
            PropertyKey::G => "G",
            PropertyKey::Cv => "Cv",
        }
    }

    /// Returns `true` for the keys stored as eV after parsing.
    pub fn is_energy(self) -> bool {
        Self::ENERGIES.contains(&self)
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for PropertyKey {
    type Err = ();

    /// Looks up a key by its exact, case-sensitive name (`U` and `u` differ).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KEYS_BY_NAME.get(s).copied().ok_or(())
    }
}

/// The value of a single property.
///
/// Energy-valued keys hold a number in eV; every other key keeps the token
/// exactly as it appeared in the source record.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Energy(f64),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Energy(_) => None,
        }
    }

    pub fn as_energy(&self) -> Option<f64> {
        match self {
            PropertyValue::Energy(v) => Some(*v),
            PropertyValue::Text(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Energy(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Text(s) => serializer.serialize_str(s),
            PropertyValue::Energy(v) => serializer.serialize_f64(*v),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PropertyError {
    #[error("Property '{key}' must hold an energy value")]
    ExpectedEnergy { key: PropertyKey },
    #[error("Property '{key}' must hold a text value")]
    ExpectedText { key: PropertyKey },
}

/// The scalar metadata of one molecule.
///
/// Holds exactly one value for each of the [`PROPERTY_COUNT`] canonical keys;
/// there is no way to construct an instance with a key missing or added.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeProperties {
    values: [PropertyValue; PROPERTY_COUNT],
}

impl MoleculeProperties {
    /// Builds the mapping from values given in canonical key order.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if an energy key holds text or any other
    /// key holds an energy.
    pub fn from_canonical(values: [PropertyValue; PROPERTY_COUNT]) -> Result<Self, PropertyError> {
        for (key, value) in PropertyKey::ALL.into_iter().zip(&values) {
            match (key.is_energy(), value) {
                (true, PropertyValue::Text(_)) => {
                    return Err(PropertyError::ExpectedEnergy { key });
                }
                (false, PropertyValue::Energy(_)) => {
                    return Err(PropertyError::ExpectedText { key });
                }
                _ => {}
            }
        }
        Ok(Self { values })
    }

    /// Builds the mapping from values the parser has already typed per key.
    pub(crate) fn from_parsed(values: [PropertyValue; PROPERTY_COUNT]) -> Self {
        debug_assert!(
            PropertyKey::ALL
                .iter()
                .zip(&values)
                .all(|(key, value)| key.is_energy() == value.as_energy().is_some())
        );
        Self { values }
    }

    pub fn get(&self, key: PropertyKey) -> &PropertyValue {
        &self.values[key.index()]
    }

    /// Looks up a value by key name, e.g. `"homo"`.
    pub fn get_by_name(&self, name: &str) -> Option<&PropertyValue> {
        name.parse::<PropertyKey>().ok().map(|key| self.get(key))
    }

    /// Returns the energy stored under `key` in eV, if `key` is energy-valued.
    pub fn energy(&self, key: PropertyKey) -> Option<f64> {
        self.get(key).as_energy()
    }

    /// Interprets the `id` token as an unsigned integer.
    pub fn id(&self) -> Option<u64> {
        self.get(PropertyKey::Id)
            .as_text()
            .and_then(|s| s.trim().parse().ok())
    }

    /// Iterates over `(key, value)` pairs in canonical order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (PropertyKey, &PropertyValue)> {
        PropertyKey::ALL.into_iter().zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        PROPERTY_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Serialize for MoleculeProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PROPERTY_COUNT))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.name(), value)?;
        }
        map.end()
    }
}
