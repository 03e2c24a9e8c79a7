//! Serialization and Deserialization implementation

use ::serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use super::*;

impl Serialize for Ipv4Prefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4Prefix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

impl Serialize for PrefixTrie {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self)
    }
}

impl<'de> Deserialize<'de> for PrefixTrie {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let prefixes: Vec<Ipv4Prefix> = Vec::deserialize(deserializer)?;
        let mut trie = PrefixTrie::new();
        for prefix in prefixes {
            trie.insert(prefix).map_err(D::Error::custom)?;
        }
        Ok(trie)
    }
}
