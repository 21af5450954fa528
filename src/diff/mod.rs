//! Recursive structural comparison of two snapshots.

use crate::model::{PropertyBag, Snapshot, Value};
use std::collections::BTreeSet;

/// Property bags in this domain nest at most one level (object ->
/// property). Anything deeper degrades to a scalar `Changed` record.
const MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Present only in side B.
    Added,
    /// Present only in side A.
    Removed,
    /// Present on both sides with differing values, carried verbatim.
    Changed { value_a: Value, value_b: Value },
}

/// One reported structural difference. `topic` is the category plus any
/// parent path accumulated during recursion (e.g. `Column
/// public.users.email` for a per-property record), `key` the leaf name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub topic: String,
    pub key: String,
    pub owner_a: String,
    pub owner_b: String,
    pub change: Change,
}

/// Computes the ordered structural difference between two snapshots.
///
/// Pure function of its inputs: keys are walked in sorted order at every
/// level, so repeated runs over the same snapshots produce an identical
/// record sequence regardless of catalog row arrival order. Objects
/// present on one side only yield a single `Added`/`Removed` record;
/// objects present on both sides are broken down per property.
pub fn diff(a: &Snapshot, b: &Snapshot) -> Vec<ChangeRecord> {
    let mut ctx = DiffContext {
        owner_a: &a.label,
        owner_b: &b.label,
        records: Vec::new(),
    };

    let keys: BTreeSet<_> = a.objects.keys().chain(b.objects.keys()).collect();
    for key in keys {
        let topic = key.topic.to_string();
        match (a.objects.get(key), b.objects.get(key)) {
            (Some(bag_a), Some(bag_b)) => {
                if bag_a != bag_b {
                    ctx.diff_bags(&key.to_string(), bag_a, bag_b, 0);
                }
            }
            (Some(_), None) => ctx.push(&topic, &key.path(), Change::Removed),
            (None, Some(_)) => ctx.push(&topic, &key.path(), Change::Added),
            (None, None) => unreachable!("key comes from the union of both sides"),
        }
    }

    ctx.records
}

struct DiffContext<'a> {
    owner_a: &'a str,
    owner_b: &'a str,
    records: Vec<ChangeRecord>,
}

impl DiffContext<'_> {
    fn push(&mut self, topic: &str, key: &str, change: Change) {
        self.records.push(ChangeRecord {
            topic: topic.to_string(),
            key: key.to_string(),
            owner_a: self.owner_a.to_string(),
            owner_b: self.owner_b.to_string(),
            change,
        });
    }

    fn diff_bags(&mut self, topic: &str, a: &PropertyBag, b: &PropertyBag, depth: usize) {
        let keys: BTreeSet<_> = a.keys().chain(b.keys()).collect();
        for key in keys {
            match (a.get(key), b.get(key)) {
                (Some(value_a), Some(value_b)) => {
                    self.diff_values(topic, key, value_a, value_b, depth);
                }
                (Some(_), None) => self.push(topic, key, Change::Removed),
                (None, Some(_)) => self.push(topic, key, Change::Added),
                (None, None) => unreachable!("key comes from the union of both bags"),
            }
        }
    }

    fn diff_values(&mut self, topic: &str, key: &str, a: &Value, b: &Value, depth: usize) {
        if a == b {
            return;
        }
        match (a, b) {
            (Value::Bag(bag_a), Value::Bag(bag_b)) if depth < MAX_DEPTH => {
                self.diff_bags(&format!("{topic} {key}"), bag_a, bag_b, depth + 1);
            }
            _ => self.push(
                topic,
                key,
                Change::Changed {
                    value_a: a.clone(),
                    value_b: b.clone(),
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectKey, Scalar};

    fn snapshot(label: &str) -> Snapshot {
        Snapshot::new(label)
    }

    fn text_bag(pairs: &[(&str, &str)]) -> PropertyBag {
        pairs
            .iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    Value::Scalar(Scalar::Text(v.to_string())),
                )
            })
            .collect()
    }

    #[test]
    fn identical_snapshots_produce_no_records() {
        let mut a = snapshot("a");
        a.objects.insert(
            ObjectKey::column("public", "users", "email"),
            text_bag(&[("data_type", "text")]),
        );
        assert!(diff(&a, &a.clone()).is_empty());
    }

    #[test]
    fn object_only_in_b_is_added() {
        let a = snapshot("a");
        let mut b = snapshot("b");
        b.objects.insert(
            ObjectKey::index("public", "users", "idx_email"),
            text_bag(&[("definition", "CREATE INDEX ...")]),
        );

        let records = diff(&a, &b);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "Index");
        assert_eq!(records[0].key, "public.users/idx_email");
        assert_eq!(records[0].change, Change::Added);
    }

    #[test]
    fn object_only_in_a_is_removed() {
        let mut a = snapshot("a");
        a.objects.insert(
            ObjectKey::constraint("public", "orders", "fk_customer"),
            text_bag(&[("definition", "FOREIGN KEY (customer_id) ...")]),
        );
        let b = snapshot("b");

        let records = diff(&a, &b);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "Constraint");
        assert_eq!(records[0].key, "public.orders/fk_customer");
        assert_eq!(records[0].change, Change::Removed);
    }

    #[test]
    fn missing_table_yields_one_removed_record_per_column() {
        let mut a = snapshot("a");
        a.objects.insert(
            ObjectKey::column("public", "users", "email"),
            text_bag(&[("data_type", "text")]),
        );
        a.objects.insert(
            ObjectKey::column("public", "users", "id"),
            text_bag(&[("data_type", "bigint")]),
        );
        let b = snapshot("b");

        let records = diff(&a, &b);
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|r| r.topic == "Column" && r.change == Change::Removed));
    }

    #[test]
    fn changed_object_is_broken_down_per_property() {
        let mut a = snapshot("a");
        a.objects.insert(
            ObjectKey::column("public", "users", "email"),
            text_bag(&[("data_type", "text"), ("is_nullable", "YES")]),
        );
        let mut b = snapshot("b");
        b.objects.insert(
            ObjectKey::column("public", "users", "email"),
            text_bag(&[("data_type", "character varying"), ("is_nullable", "YES")]),
        );

        let records = diff(&a, &b);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "Column public.users.email");
        assert_eq!(records[0].key, "data_type");
        assert_eq!(
            records[0].change,
            Change::Changed {
                value_a: Value::Scalar(Scalar::Text("text".to_string())),
                value_b: Value::Scalar(Scalar::Text("character varying".to_string())),
            }
        );
    }

    #[test]
    fn property_present_on_one_side_only_is_added_or_removed() {
        let mut a = snapshot("a");
        a.objects.insert(
            ObjectKey::column("public", "users", "email"),
            text_bag(&[("data_type", "text")]),
        );
        let mut b = snapshot("b");
        b.objects.insert(
            ObjectKey::column("public", "users", "email"),
            text_bag(&[("data_type", "text"), ("column_default", "''")]),
        );

        let records = diff(&a, &b);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "Column public.users.email");
        assert_eq!(records[0].key, "column_default");
        assert_eq!(records[0].change, Change::Added);
    }

    #[test]
    fn differing_index_definitions_yield_one_changed_record() {
        let mut a = snapshot("a");
        a.objects.insert(
            ObjectKey::index("public", "users", "idx_email"),
            text_bag(&[("definition", "CREATE INDEX idx_email ON users (email)")]),
        );
        let mut b = snapshot("b");
        b.objects.insert(
            ObjectKey::index("public", "users", "idx_email"),
            text_bag(&[("definition", "CREATE INDEX idx_email ON users (lower(email))")]),
        );

        let records = diff(&a, &b);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "Index public.users/idx_email");
        assert_eq!(records[0].key, "definition");
        assert!(matches!(records[0].change, Change::Changed { .. }));
    }

    #[test]
    fn scalar_versus_bag_degrades_to_changed() {
        let mut inner = PropertyBag::new();
        inner.insert(
            "nested".to_string(),
            Value::Scalar(Scalar::Text("x".to_string())),
        );

        let mut a = snapshot("a");
        let mut bag_a = PropertyBag::new();
        bag_a.insert("shape".to_string(), Value::Bag(inner));
        a.objects
            .insert(ObjectKey::column("public", "t", "c"), bag_a);

        let mut b = snapshot("b");
        b.objects.insert(
            ObjectKey::column("public", "t", "c"),
            text_bag(&[("shape", "flat")]),
        );

        let records = diff(&a, &b);
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0].change, Change::Changed { .. }));
    }

    #[test]
    fn categories_with_identical_local_names_never_collide() {
        let mut a = snapshot("a");
        a.objects.insert(
            ObjectKey::index("public", "users", "email"),
            text_bag(&[("definition", "CREATE INDEX ...")]),
        );
        let mut b = snapshot("b");
        b.objects.insert(
            ObjectKey::constraint("public", "users", "email"),
            text_bag(&[("definition", "UNIQUE (email)")]),
        );

        let records = diff(&a, &b);
        assert_eq!(records.len(), 2);
        let added = records.iter().find(|r| r.change == Change::Added).unwrap();
        let removed = records.iter().find(|r| r.change == Change::Removed).unwrap();
        assert_eq!(added.topic, "Constraint");
        assert_eq!(removed.topic, "Index");
    }

    #[test]
    fn swapping_inputs_swaps_added_and_removed() {
        let mut a = snapshot("a");
        a.objects.insert(
            ObjectKey::column("public", "users", "only_in_a"),
            text_bag(&[("data_type", "text")]),
        );
        let mut b = snapshot("b");
        b.objects.insert(
            ObjectKey::column("public", "users", "only_in_b"),
            text_bag(&[("data_type", "text")]),
        );

        let forward = diff(&a, &b);
        let reverse = diff(&b, &a);
        assert_eq!(forward.len(), reverse.len());

        for record in &forward {
            let mirrored = reverse.iter().find(|r| r.key == record.key).unwrap();
            match (&record.change, &mirrored.change) {
                (Change::Added, Change::Removed) | (Change::Removed, Change::Added) => {}
                other => panic!("expected swapped labels, got {other:?}"),
            }
        }
    }

    #[test]
    fn record_order_is_stable_and_sorted() {
        let mut a = snapshot("a");
        let mut b = snapshot("b");
        for column in ["zeta", "alpha", "mid"] {
            a.objects.insert(
                ObjectKey::column("public", "users", column),
                text_bag(&[("data_type", "text")]),
            );
        }
        b.objects.insert(
            ObjectKey::index("public", "users", "idx"),
            text_bag(&[("definition", "CREATE INDEX ...")]),
        );

        let records = diff(&a, &b);
        let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "public.users.alpha",
                "public.users.mid",
                "public.users.zeta",
                "public.users/idx"
            ]
        );
        assert_eq!(records, diff(&a, &b));
    }

    #[test]
    fn overly_deep_nesting_degrades_to_changed() {
        fn nest(depth: usize, leaf: &str) -> Value {
            if depth == 0 {
                return Value::Scalar(Scalar::Text(leaf.to_string()));
            }
            let mut bag = PropertyBag::new();
            bag.insert("inner".to_string(), nest(depth - 1, leaf));
            Value::Bag(bag)
        }

        let mut a = snapshot("a");
        let mut bag_a = PropertyBag::new();
        bag_a.insert("deep".to_string(), nest(12, "left"));
        a.objects
            .insert(ObjectKey::column("public", "t", "c"), bag_a);

        let mut b = snapshot("b");
        let mut bag_b = PropertyBag::new();
        bag_b.insert("deep".to_string(), nest(12, "right"));
        b.objects
            .insert(ObjectKey::column("public", "t", "c"), bag_b);

        let records = diff(&a, &b);
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0].change, Change::Changed { .. }));
    }

    #[test]
    fn records_carry_owner_labels() {
        let mut a = snapshot("postgres://staging/db");
        a.objects.insert(
            ObjectKey::column("public", "users", "email"),
            text_bag(&[("data_type", "text")]),
        );
        let b = snapshot("postgres://prod/db");

        let records = diff(&a, &b);
        assert_eq!(records[0].owner_a, "postgres://staging/db");
        assert_eq!(records[0].owner_b, "postgres://prod/db");
    }
}
