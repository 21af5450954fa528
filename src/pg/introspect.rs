//! Catalog queries that feed the snapshot normalizer.
//!
//! Every fetched field is cast to `text` or `int` in SQL because the
//! `information_schema` views expose domain types sqlx will not decode
//! directly. A missing or ill-typed field fails the whole capture; a
//! silently incomplete snapshot would surface as false added/removed
//! noise downstream.

use crate::model::{Scalar, Snapshot};
use crate::pg::connection::PgConnection;
use crate::snapshot::{
    self, CatalogRows, ColumnRow, DefinitionRow, InheritanceRow,
};
use crate::util::{CompareError, Result};
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::collections::BTreeMap;

const COLUMN_TEXT_PROPERTIES: &[&str] = &[
    "table_catalog",
    "column_default",
    "is_nullable",
    "data_type",
    "interval_type",
    "collation_name",
    "udt_catalog",
    "udt_schema",
    "udt_name",
    "dtd_identifier",
    "is_identity",
    "identity_generation",
    "is_generated",
    "generation_expression",
    "is_updatable",
];

const COLUMN_INT_PROPERTIES: &[&str] = &[
    "character_maximum_length",
    "character_octet_length",
    "numeric_precision",
    "numeric_precision_radix",
    "numeric_scale",
    "datetime_precision",
    "ordinal_position",
];

/// Captures a normalized snapshot of one database side.
///
/// An empty `schemas` slice means all non-system schemas present on this
/// side. Partition children are resolved and excluded up front when
/// `ignore_partitions` is set.
pub async fn capture_snapshot(
    connection: &PgConnection,
    schemas: &[String],
    ignore_partitions: bool,
) -> Result<Snapshot> {
    let schemas = if schemas.is_empty() {
        fetch_schema_names(connection).await?
    } else {
        schemas.to_vec()
    };

    let inheritance = fetch_inheritance(connection).await?;
    let exclusions = snapshot::resolve_exclusions(&inheritance, ignore_partitions);

    let rows = CatalogRows {
        columns: fetch_columns(connection, &schemas).await?,
        indexes: fetch_indexes(connection, &schemas).await?,
        constraints: fetch_constraints(connection, &schemas).await?,
    };

    Ok(snapshot::normalize(connection.label(), &rows, &exclusions))
}

async fn fetch_schema_names(connection: &PgConnection) -> Result<Vec<String>> {
    let rows = sqlx::query("SELECT nspname::text FROM pg_namespace WHERE left(nspname, 3) <> 'pg_'")
        .fetch_all(connection.pool())
        .await
        .map_err(|e| CompareError::Database(format!("Failed to fetch schema names: {e}")))?;

    rows.iter().map(|row| req_text(row, "nspname")).collect()
}

async fn fetch_inheritance(connection: &PgConnection) -> Result<Vec<InheritanceRow>> {
    let rows = sqlx::query(
        r#"
        SELECT pn.nspname || '.' || pc.relname AS parent,
               cn.nspname || '.' || cc.relname AS child
        FROM pg_inherits AS i
            JOIN pg_class AS cc ON (cc.oid = i.inhrelid)
            JOIN pg_namespace AS cn ON (cn.oid = cc.relnamespace)
            JOIN pg_class AS pc ON (pc.oid = i.inhparent)
            JOIN pg_namespace AS pn ON (pn.oid = pc.relnamespace)
        "#,
    )
    .fetch_all(connection.pool())
    .await
    .map_err(|e| CompareError::Database(format!("Failed to fetch inheritance links: {e}")))?;

    rows.iter()
        .map(|row| {
            Ok(InheritanceRow {
                parent: req_text(row, "parent")?,
                child: req_text(row, "child")?,
            })
        })
        .collect()
}

async fn fetch_columns(connection: &PgConnection, schemas: &[String]) -> Result<Vec<ColumnRow>> {
    let rows = sqlx::query(
        r#"
        SELECT
            table_schema::text,
            table_name::text,
            column_name::text,
            table_catalog::text,
            column_default::text,
            is_nullable::text,
            data_type::text,
            interval_type::text,
            collation_name::text,
            udt_catalog::text,
            udt_schema::text,
            udt_name::text,
            dtd_identifier::text,
            is_identity::text,
            identity_generation::text,
            is_generated::text,
            generation_expression::text,
            is_updatable::text,
            character_maximum_length::int,
            character_octet_length::int,
            numeric_precision::int,
            numeric_precision_radix::int,
            numeric_scale::int,
            datetime_precision::int,
            ordinal_position::int
        FROM information_schema.columns
        WHERE table_schema = ANY($1)
        "#,
    )
    .bind(schemas)
    .fetch_all(connection.pool())
    .await
    .map_err(|e| CompareError::Database(format!("Failed to fetch columns: {e}")))?;

    rows.iter()
        .map(|row| {
            let mut properties = BTreeMap::new();
            for property in COLUMN_TEXT_PROPERTIES {
                properties.insert((*property).to_string(), opt_text(row, property)?);
            }
            for property in COLUMN_INT_PROPERTIES {
                properties.insert((*property).to_string(), opt_int(row, property)?);
            }
            Ok(ColumnRow {
                schema: req_text(row, "table_schema")?,
                table: req_text(row, "table_name")?,
                column: req_text(row, "column_name")?,
                properties,
            })
        })
        .collect()
}

async fn fetch_indexes(connection: &PgConnection, schemas: &[String]) -> Result<Vec<DefinitionRow>> {
    let rows = sqlx::query(
        r#"
        SELECT schemaname::text AS schema_name,
               tablename::text AS table_name,
               indexname::text AS object_name,
               indexdef::text AS definition
        FROM pg_indexes
        WHERE schemaname = ANY($1)
        "#,
    )
    .bind(schemas)
    .fetch_all(connection.pool())
    .await
    .map_err(|e| CompareError::Database(format!("Failed to fetch indexes: {e}")))?;

    rows.iter().map(definition_row).collect()
}

async fn fetch_constraints(
    connection: &PgConnection,
    schemas: &[String],
) -> Result<Vec<DefinitionRow>> {
    let rows = sqlx::query(
        r#"
        SELECT n.nspname::text AS schema_name,
               cl.relname::text AS table_name,
               co.conname::text AS object_name,
               pg_get_constraintdef(co.oid, true) AS definition
        FROM pg_constraint AS co
            JOIN pg_namespace AS n ON (co.connamespace = n.oid)
            JOIN pg_class AS cl ON (co.conrelid = cl.oid)
        WHERE n.nspname = ANY($1)
        "#,
    )
    .bind(schemas)
    .fetch_all(connection.pool())
    .await
    .map_err(|e| CompareError::Database(format!("Failed to fetch constraints: {e}")))?;

    rows.iter().map(definition_row).collect()
}

fn definition_row(row: &PgRow) -> Result<DefinitionRow> {
    Ok(DefinitionRow {
        schema: req_text(row, "schema_name")?,
        table: req_text(row, "table_name")?,
        name: req_text(row, "object_name")?,
        definition: req_text(row, "definition")?,
    })
}

fn req_text(row: &PgRow, name: &str) -> Result<String> {
    row.try_get::<String, _>(name)
        .map_err(|e| CompareError::MalformedRow(format!("missing field '{name}': {e}")))
}

fn opt_text(row: &PgRow, name: &str) -> Result<Option<Scalar>> {
    row.try_get::<Option<String>, _>(name)
        .map(|v| v.map(Scalar::Text))
        .map_err(|e| CompareError::MalformedRow(format!("field '{name}': {e}")))
}

fn opt_int(row: &PgRow, name: &str) -> Result<Option<Scalar>> {
    row.try_get::<Option<i32>, _>(name)
        .map(|v| v.map(|n| Scalar::Int(i64::from(n))))
        .map_err(|e| CompareError::MalformedRow(format!("field '{name}': {e}")))
}
