// SPDX-FileCopyrightText: 2026 Zenia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRUD operations for the `memory_records` table.

use std::str::FromStr;

use rusqlite::types::Type;
use tracing::warn;
use zenia_core::types::{blob_to_vec, vec_to_blob};
use zenia_core::{MemoryRecord, RecordKind, ZeniaError};

use crate::database::{Database, map_tr_err};

/// Insert `record`, or replace every field of the row that already has its id.
///
/// The rowid of an existing row is kept, so iteration order is stable across repairs.
pub async fn upsert_record(db: &Database, record: &MemoryRecord) -> Result<(), ZeniaError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO memory_records (id, kind, question, answer, embedding, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                    kind = excluded.kind,
                    question = excluded.question,
                    answer = excluded.answer,
                    embedding = excluded.embedding,
                    created_at = excluded.created_at",
                rusqlite::params![
                    record.id,
                    record.kind.to_string(),
                    record.question,
                    record.answer,
                    record.embedding.as_deref().map(vec_to_blob),
                    record.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All readable records in insertion order.
///
/// A row that cannot be mapped (for example a `kind` this build does not
/// know) is logged and skipped.
pub async fn list_records(db: &Database) -> Result<Vec<MemoryRecord>, ZeniaError> {
    db.connection()
        .call(|conn| -> Result<Vec<MemoryRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, kind, question, answer, embedding, created_at
                 FROM memory_records ORDER BY rowid ASC",
            )?;
            let rows = stmt.query_map([], row_to_record)?;
            let mut records = Vec::new();
            for (index, row) in rows.enumerate() {
                match row {
                    Ok(record) => records.push(record),
                    Err(e) => warn!(row = index, error = %e, "skipping unreadable memory record"),
                }
            }
            Ok(records)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every record.
pub async fn delete_all_records(db: &Database) -> Result<usize, ZeniaError> {
    db.connection()
        .call(|conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM memory_records", [])
        })
        .await
        .map_err(map_tr_err)
}

/// Number of stored records.
pub async fn count_records(db: &Database) -> Result<usize, ZeniaError> {
    db.connection()
        .call(|conn| -> Result<usize, rusqlite::Error> {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM memory_records", [], |row| row.get(0))?;
            Ok(usize::try_from(count).unwrap_or_default())
        })
        .await
        .map_err(map_tr_err)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<MemoryRecord, rusqlite::Error> {
    let kind: String = row.get(1)?;
    let kind = RecordKind::from_str(&kind)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let embedding: Option<Vec<u8>> = row.get(4)?;

    Ok(MemoryRecord {
        id: row.get(0)?,
        kind,
        question: row.get(2)?,
        answer: row.get(3)?,
        embedding: embedding.as_deref().map(blob_to_vec),
        created_at: row.get(5)?,
    })
}
