use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_cards, parse_created_at},
};
use crate::models::ReadingRecord;

const READING_COLUMNS: &str =
    "id, question, interpretation, cards_json, parent_id, created_at";

fn row_to_reading(row: &Row) -> Result<ReadingRecord, rusqlite::Error> {
    let id: String = row.get("id")?;
    let cards_json: String = row.get("cards_json")?;
    let created_at: Option<String> = row.get("created_at")?;

    Ok(ReadingRecord {
        question: row.get("question")?,
        interpretation: row.get("interpretation")?,
        cards: parse_cards(&cards_json, &id),
        parent_id: row.get("parent_id")?,
        created_at: parse_created_at(created_at, &id),
        id,
    })
}

impl Database {
    pub async fn insert_reading(&self, owner_id: &str, reading: &ReadingRecord) -> Result<()> {
        let owner_id = owner_id.to_string();
        let record = reading.clone();
        self.execute(move |conn| {
            let cards_json =
                serde_json::to_string(&record.cards).context("failed to serialize cards")?;
            conn.execute(
                "INSERT INTO readings (id, owner_id, question, interpretation, cards_json, parent_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    owner_id,
                    record.question,
                    record.interpretation,
                    cards_json,
                    record.parent_id,
                    record.created_at.map(|dt| dt.to_rfc3339()),
                ],
            )
            .with_context(|| format!("failed to insert reading {}", record.id))?;
            Ok(())
        })
        .await
    }

    /// All readings of one owner, newest first. Rows with unusable timestamps
    /// come back with `created_at: None` and sort last.
    pub async fn list_readings_for_owner(&self, owner_id: &str) -> Result<Vec<ReadingRecord>> {
        let owner_id = owner_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {READING_COLUMNS}
                 FROM readings
                 WHERE owner_id = ?1
                 ORDER BY created_at IS NULL, created_at DESC, rowid DESC"
            ))?;

            let readings_iter = stmt.query_map(params![owner_id], row_to_reading)?;
            let mut readings = Vec::new();
            for reading_result in readings_iter {
                readings.push(reading_result?);
            }

            Ok(readings)
        })
        .await
    }

    pub async fn get_reading(&self, owner_id: &str, reading_id: &str) -> Result<Option<ReadingRecord>> {
        let owner_id = owner_id.to_string();
        let reading_id = reading_id.to_string();
        self.execute(move |conn| {
            let reading = conn
                .query_row(
                    &format!(
                        "SELECT {READING_COLUMNS}
                         FROM readings
                         WHERE owner_id = ?1 AND id = ?2"
                    ),
                    params![owner_id, reading_id],
                    row_to_reading,
                )
                .optional()?;
            Ok(reading)
        })
        .await
    }

    /// Delete one reading. Follow-ups keep their parent_id and show up as an
    /// orphaned thread.
    pub async fn delete_reading(&self, owner_id: &str, reading_id: &str) -> Result<bool> {
        let owner_id = owner_id.to_string();
        let reading_id = reading_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "DELETE FROM readings WHERE owner_id = ?1 AND id = ?2",
                params![owner_id, reading_id],
            )?;
            Ok(rows_affected > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn open() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("arcana.sqlite3")).unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn lists_owner_readings_newest_first() {
        let (_dir, db) = open();
        let base = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();

        let first = ReadingRecord::new("a", Some("First?"), base).with_cards(["The Fool"]);
        let second = ReadingRecord::new("b", Some("Second?"), base + Duration::hours(1)).with_parent("a");
        let foreign = ReadingRecord::new("c", Some("Someone else"), base);

        db.insert_reading("me", &first).await.unwrap();
        db.insert_reading("me", &second).await.unwrap();
        db.insert_reading("you", &foreign).await.unwrap();

        let readings = db.list_readings_for_owner("me").await.unwrap();
        let ids: Vec<&str> = readings.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(readings[0].parent_id.as_deref(), Some("a"));
        assert_eq!(readings[1].cards, vec!["The Fool".to_string()]);
        assert_eq!(readings[1].created_at, Some(base));
    }

    #[tokio::test]
    async fn bad_timestamps_load_as_none() {
        let (_dir, db) = open();
        db.execute(|conn| {
            conn.execute(
                "INSERT INTO readings (id, owner_id, question, cards_json, created_at)
                 VALUES ('legacy', 'me', 'Old one', 'oops', 'not a date')",
                [],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let reading = db.get_reading("me", "legacy").await.unwrap().unwrap();
        assert_eq!(reading.created_at, None);
        assert!(reading.cards.is_empty());
        assert_eq!(reading.parent_id, None);
    }

    #[tokio::test]
    async fn get_and_delete_are_owner_scoped() {
        let (_dir, db) = open();
        let reading = ReadingRecord::new("a", Some("Mine"), Utc::now());
        db.insert_reading("me", &reading).await.unwrap();

        assert!(db.get_reading("you", "a").await.unwrap().is_none());
        assert!(!db.delete_reading("you", "a").await.unwrap());
        assert!(db.delete_reading("me", "a").await.unwrap());
        assert!(db.get_reading("me", "a").await.unwrap().is_none());
    }
}
