use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// The named attributes of one schema object. Never contains nulls:
/// an absent property and a null property are the same thing.
pub type PropertyBag = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Text(v) => write!(f, "{v}"),
        }
    }
}

/// A property value: either a scalar or a nested bag of properties.
/// Untagged so persisted snapshots read as plain JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bag(PropertyBag),
    Scalar(Scalar),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(scalar) => scalar.fmt(f),
            Value::Bag(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// Object category. Part of every [`ObjectKey`], so objects with identical
/// local names in different categories never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    Column,
    Constraint,
    Index,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Topic::Column => "Column",
            Topic::Constraint => "Constraint",
            Topic::Index => "Index",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Column" => Ok(Topic::Column),
            "Constraint" => Ok(Topic::Constraint),
            "Index" => Ok(Topic::Index),
            _ => Err(format!(
                "Invalid topic '{s}'. Valid topics: Column, Constraint, Index"
            )),
        }
    }
}

/// Qualified name of one schema object within a snapshot.
///
/// Renders as `Column schema.table.column` for columns and
/// `Index schema.table/name` / `Constraint schema.table/name` for
/// relation-local objects, which is also the serialized form used as a
/// JSON map key in persisted snapshots.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    pub topic: Topic,
    /// Qualified owning relation, `schema.table`.
    pub relation: String,
    /// Column name, index name or constraint name local to the relation.
    pub name: String,
}

impl ObjectKey {
    pub fn column(schema: &str, table: &str, column: &str) -> Self {
        ObjectKey {
            topic: Topic::Column,
            relation: format!("{schema}.{table}"),
            name: column.to_string(),
        }
    }

    pub fn index(schema: &str, table: &str, name: &str) -> Self {
        ObjectKey {
            topic: Topic::Index,
            relation: format!("{schema}.{table}"),
            name: name.to_string(),
        }
    }

    pub fn constraint(schema: &str, table: &str, name: &str) -> Self {
        ObjectKey {
            topic: Topic::Constraint,
            relation: format!("{schema}.{table}"),
            name: name.to_string(),
        }
    }

    /// Schema portion of the owning relation.
    pub fn schema_name(&self) -> &str {
        self.relation.split('.').next().unwrap_or(&self.relation)
    }

    /// Qualified name without the topic prefix, e.g. `public.users.email`
    /// or `public.users/idx_email`.
    pub fn path(&self) -> String {
        match self.topic {
            Topic::Column => format!("{}.{}", self.relation, self.name),
            Topic::Constraint | Topic::Index => format!("{}/{}", self.relation, self.name),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.topic, self.path())
    }
}

impl FromStr for ObjectKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (topic, path) = s
            .split_once(' ')
            .ok_or_else(|| format!("Invalid object key '{s}': missing topic"))?;
        let topic: Topic = topic.parse()?;

        let (relation, name) = match topic {
            Topic::Column => path
                .rsplit_once('.')
                .ok_or_else(|| format!("Invalid column key '{path}'"))?,
            Topic::Constraint | Topic::Index => path
                .split_once('/')
                .ok_or_else(|| format!("Invalid {topic} key '{path}'"))?,
        };
        if !relation.contains('.') {
            return Err(format!("Invalid object key '{s}': unqualified relation"));
        }

        Ok(ObjectKey {
            topic,
            relation: relation.to_string(),
            name: name.to_string(),
        })
    }
}

impl Serialize for ObjectKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Normalized, immutable representation of one side's schema at capture
/// time. Built once per comparison run or loaded from a persisted capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Identity of the side this snapshot was captured from (sanitized
    /// connection URL, or whatever label the capture recorded).
    pub label: String,
    pub objects: BTreeMap<ObjectKey, PropertyBag>,
    /// Qualified relation names excluded as partitions when this snapshot
    /// was captured.
    pub partitions: BTreeSet<String>,
}

impl Snapshot {
    pub fn new(label: impl Into<String>) -> Self {
        Snapshot {
            label: label.into(),
            objects: BTreeMap::new(),
            partitions: BTreeSet::new(),
        }
    }

    /// Content hash over the canonical JSON form. Stable across captures
    /// of the same unchanged database (BTreeMap ordering makes the JSON
    /// canonical).
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let json = serde_json::to_string(self).expect("Snapshot must serialize");
        let hash = Sha256::digest(json.as_bytes());
        hex::encode(hash)
    }

    /// Drops every object whose relation lives outside the given schemas.
    /// Applied before diffing when a saved snapshot was captured with a
    /// broader schema set than the current comparison asks for.
    pub fn retain_schemas(&mut self, schemas: &[String]) {
        self.objects
            .retain(|key, _| schemas.iter().any(|s| key.schema_name() == s));
    }

    /// Drops every object owned by one of the given relations.
    pub fn exclude_relations(&mut self, relations: &BTreeSet<String>) {
        self.objects.retain(|key, _| !relations.contains(&key.relation));
    }
}
