//! Builds a canonical [`Snapshot`] from raw catalog rows.
//!
//! The row types here are the abstract data-source contract: the `pg`
//! module fills them from live catalog queries, tests fill them directly.

use crate::model::{ObjectKey, PropertyBag, Scalar, Snapshot, Topic, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Catalog bookkeeping properties that say nothing about structural
/// identity and would only produce noise in diffs.
pub const IGNORED_COLUMN_PROPERTIES: &[&str] = &[
    "table_catalog",
    "udt_catalog",
    "ordinal_position",
    "dtd_identifier",
];

/// Raw catalog rows for one side, one `Vec` per object category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRows {
    pub columns: Vec<ColumnRow>,
    pub indexes: Vec<DefinitionRow>,
    pub constraints: Vec<DefinitionRow>,
}

/// One `information_schema.columns` row: identifying fields plus the full
/// property bag as fetched, nulls included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub properties: BTreeMap<String, Option<Scalar>>,
}

/// One index or constraint row: the object is represented by its
/// reconstructed DDL definition string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRow {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub definition: String,
}

/// One `pg_inherits` link, both sides as qualified relation names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritanceRow {
    pub parent: String,
    pub child: String,
}

/// Relations to drop from a snapshot: every relation that appears as an
/// inheritance child (i.e. a partition). Name-based heuristic; the parent
/// is kept, only children are excluded. Empty when partition ignoring is
/// disabled.
pub fn resolve_exclusions(
    inheritance: &[InheritanceRow],
    ignore_partitions: bool,
) -> BTreeSet<String> {
    if !ignore_partitions {
        return BTreeSet::new();
    }
    inheritance.iter().map(|row| row.child.clone()).collect()
}

/// Normalizes raw catalog rows into a snapshot keyed by [`ObjectKey`].
///
/// Column bags drop null-valued and ignore-listed properties; index and
/// constraint bags carry the single synthesized `definition` property.
/// Rows owned by an excluded relation are skipped entirely.
pub fn normalize(label: &str, rows: &CatalogRows, exclusions: &BTreeSet<String>) -> Snapshot {
    let mut snapshot = Snapshot::new(label);
    snapshot.partitions = exclusions.clone();

    for row in &rows.columns {
        let relation = format!("{}.{}", row.schema, row.table);
        if exclusions.contains(&relation) {
            continue;
        }
        let mut bag = PropertyBag::new();
        for (property, value) in &row.properties {
            if IGNORED_COLUMN_PROPERTIES.contains(&property.as_str()) {
                continue;
            }
            if let Some(scalar) = value {
                bag.insert(property.clone(), Value::Scalar(scalar.clone()));
            }
        }
        snapshot
            .objects
            .insert(ObjectKey::column(&row.schema, &row.table, &row.column), bag);
    }

    insert_definitions(&mut snapshot, Topic::Index, &rows.indexes, exclusions);
    insert_definitions(&mut snapshot, Topic::Constraint, &rows.constraints, exclusions);

    snapshot
}

fn insert_definitions(
    snapshot: &mut Snapshot,
    topic: Topic,
    rows: &[DefinitionRow],
    exclusions: &BTreeSet<String>,
) {
    for row in rows {
        let relation = format!("{}.{}", row.schema, row.table);
        if exclusions.contains(&relation) {
            continue;
        }
        let mut bag = PropertyBag::new();
        bag.insert(
            "definition".to_string(),
            Value::Scalar(Scalar::Text(row.definition.clone())),
        );
        snapshot.objects.insert(
            ObjectKey {
                topic,
                relation,
                name: row.name.clone(),
            },
            bag,
        );
    }
}
