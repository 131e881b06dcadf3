use crate::constants::{CATALOG, CHECKOUT, DETAIL};
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Feature slices enabled in a running application.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct FeatureSet: u32 {
        const CATALOG = 1 << 0;
        const DETAIL = 1 << 1;
        const CHECKOUT = 1 << 2;

        const ALL = Self::CATALOG.bits() | Self::DETAIL.bits() | Self::CHECKOUT.bits();
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<&str> for FeatureSet {
    fn from(s: &str) -> Self {
        match s.trim() {
            CATALOG => Self::CATALOG,
            DETAIL => Self::DETAIL,
            CHECKOUT => Self::CHECKOUT,
            "all" | "*" => Self::ALL,
            _ => Self::empty(),
        }
    }
}

impl From<u32> for FeatureSet {
    fn from(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl FeatureSet {
    /// Parses a comma separated list such as `"catalog,detail"`. Unknown names are ignored.
    #[must_use]
    pub fn parse_list(list: &str) -> Self {
        list.split(',').map(Self::from).fold(Self::empty(), |acc, f| acc | f)
    }
}

impl Serialize for FeatureSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureRepr {
    Bits(u32),
    Names(Vec<String>),
    List(String),
}

/// Accepts raw bits (`7`), a list of names (`["catalog", "detail"]`) or a
/// comma separated string (`"catalog,detail"`, handy for env overrides).
impl<'de> Deserialize<'de> for FeatureSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match FeatureRepr::deserialize(deserializer)? {
            FeatureRepr::Bits(bits) => Self::from_bits_truncate(bits),
            FeatureRepr::Names(names) => {
                names.iter().map(|n| Self::from(n.as_str())).fold(Self::empty(), |acc, f| acc | f)
            },
            FeatureRepr::List(list) => list
                .parse::<u32>()
                .map_or_else(|_| Self::parse_list(&list), Self::from_bits_truncate),
        })
    }
}
