//! SQLite store for CNSC decisions
//!
//! One connection behind a mutex, shared through `Arc`. Case-insensitive substring
//! matching and trigram similarity are registered as scalar SQL functions so that
//! retrieval runs entirely inside the query.

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{DatabaseConfig, DatabaseLocation};
use crate::error::{Error, Result};
use crate::retrieval::trigram::TrigramSet;
use crate::types::{
    ContestType, CpvSource, Decision, DecisionFilter, DecisionStats, FilenameOutcome, Outcome,
    ParsedDecision,
};

/// Result of inserting one parsed decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored under the returned surrogate id
    Inserted(String),
    /// Same filename or (year, bulletin) pair already present
    Duplicate,
}

/// Per-record results of a batch insert
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub inserted: usize,
    pub duplicates: usize,
    /// (filename, error message)
    pub failures: Vec<(String, String)>,
}

/// SQLite-based decision store
pub struct DecisionDb {
    conn: Arc<Mutex<Connection>>,
}

impl DecisionDb {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::Database(format!("Failed to open database: {}", e)))?;

        Self::from_connection(conn, true)
    }

    /// Create an in-memory database
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Database(format!("Failed to open in-memory database: {}", e)))?;

        Self::from_connection(conn, false)
    }

    /// Open whatever the configuration points at
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        match config.location()? {
            DatabaseLocation::Memory => Self::in_memory(),
            DatabaseLocation::File(path) => Self::new(path),
        }
    }

    fn from_connection(conn: Connection, on_disk: bool) -> Result<Self> {
        register_functions(&conn)?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate(on_disk)?;
        Ok(db)
    }

    /// Run database migrations
    fn migrate(&self, on_disk: bool) -> Result<()> {
        let conn = self.conn.lock();

        if on_disk {
            conn.execute_batch(
                r#"
                PRAGMA journal_mode=WAL;
                PRAGMA synchronous=NORMAL;
                PRAGMA temp_store=MEMORY;
                "#,
            )
            .map_err(|e| Error::Database(format!("Failed to set pragmas: {}", e)))?;
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS decisions (
                id TEXT PRIMARY KEY,
                filename TEXT NOT NULL UNIQUE,
                bulletin_year INTEGER NOT NULL,
                bulletin_number INTEGER NOT NULL,
                decision_number INTEGER,
                panel TEXT,
                decision_date TEXT,
                contest_type TEXT NOT NULL,
                criticism_codes TEXT NOT NULL DEFAULT '[]',
                cpv_code TEXT,
                cpv_source TEXT,
                filename_outcome TEXT NOT NULL,
                outcome TEXT,
                rejection_reason TEXT,
                claimant TEXT,
                contracting_authority TEXT,
                full_text TEXT NOT NULL,
                parse_warnings TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                UNIQUE(bulletin_year, bulletin_number)
            );

            CREATE INDEX IF NOT EXISTS idx_decisions_date ON decisions(decision_date);
            CREATE INDEX IF NOT EXISTS idx_decisions_outcome ON decisions(outcome);
            CREATE INDEX IF NOT EXISTS idx_decisions_year ON decisions(bulletin_year);
            "#,
        )
        .map_err(|e| Error::Database(format!("Failed to run migrations: {}", e)))?;

        tracing::debug!("Database migrations complete");
        Ok(())
    }

    // ==================== Writes ====================

    /// Insert a parsed decision unless its filename or (year, bulletin) already exists
    pub fn insert_decision(&self, decision: &ParsedDecision) -> Result<InsertOutcome> {
        let conn = self.conn.lock();
        insert_with(&conn, decision)
    }

    /// Insert a batch inside one transaction; per-record failures do not abort the batch
    pub fn insert_batch(&self, decisions: &[ParsedDecision]) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        if decisions.is_empty() {
            return Ok(outcome);
        }

        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(format!("Failed to begin transaction: {}", e)))?;

        for decision in decisions {
            match insert_with(&tx, decision) {
                Ok(InsertOutcome::Inserted(_)) => outcome.inserted += 1,
                Ok(InsertOutcome::Duplicate) => outcome.duplicates += 1,
                Err(e) => outcome.failures.push((decision.filename.clone(), e.to_string())),
            }
        }

        tx.commit()
            .map_err(|e| Error::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok(outcome)
    }

    // ==================== Reads ====================

    /// Get a decision by surrogate id
    pub fn get(&self, id: &str) -> Result<Option<Decision>> {
        let conn = self.conn.lock();

        conn.query_row(
            "SELECT * FROM decisions WHERE id = ?1",
            params![id],
            row_to_decision,
        )
        .optional()
        .map_err(|e| Error::Database(format!("Failed to get decision: {}", e)))
    }

    /// Check whether a (year, bulletin) pair is stored
    pub fn exists(&self, bulletin_year: i32, bulletin_number: i64) -> Result<bool> {
        let conn = self.conn.lock();

        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM decisions WHERE bulletin_year = ?1 AND bulletin_number = ?2",
                params![bulletin_year, bulletin_number],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| Error::Database(format!("Failed to check decision: {}", e)))?;

        Ok(found.is_some())
    }

    /// One page of decisions, most recent first, plus the total matching the filter
    pub fn list(&self, filter: &DecisionFilter) -> Result<(Vec<Decision>, u64)> {
        let (where_sql, args) = filter_clause(filter);
        let conn = self.conn.lock();

        let total: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM decisions{}", where_sql),
                params_from_iter(args.iter()),
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(format!("Failed to count decisions: {}", e)))?;

        let offset = i64::try_from(filter.offset).unwrap_or(i64::MAX);
        let sql = format!(
            "SELECT * FROM decisions{} {} LIMIT {} OFFSET {}",
            where_sql, RECENT_FIRST, filter.limit, offset
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| Error::Database(format!("Failed to prepare query: {}", e)))?;

        let decisions = stmt
            .query_map(params_from_iter(args.iter()), row_to_decision)
            .map_err(|e| Error::Database(format!("Failed to list decisions: {}", e)))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(format!("Failed to read decision row: {}", e)))?;

        Ok((decisions, total.max(0) as u64))
    }

    /// Total number of stored decisions
    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock();
        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM decisions", [], |row| row.get(0))
            .map_err(|e| Error::Database(format!("Failed to count decisions: {}", e)))?;
        Ok(total.max(0) as u64)
    }

    /// The `limit` most recent decisions
    pub fn recent(&self, limit: usize) -> Result<Vec<Decision>> {
        let sql = format!("SELECT * FROM decisions {} LIMIT ?1", RECENT_FIRST);
        self.query_decisions(&sql, vec![rusqlite::types::Value::Integer(limit as i64)])
    }

    /// Decisions whose text, claimant or contracting authority contains any keyword
    pub fn search_keywords(&self, keywords: &[String], limit: usize) -> Result<Vec<Decision>> {
        self.search_contains(
            &["full_text", "claimant", "contracting_authority"],
            keywords,
            limit,
        )
    }

    /// Decisions whose text contains any of the terms
    pub fn search_text(&self, terms: &[String], limit: usize) -> Result<Vec<Decision>> {
        self.search_contains(&["full_text"], terms, limit)
    }

    fn search_contains(
        &self,
        columns: &[&str],
        terms: &[String],
        limit: usize,
    ) -> Result<Vec<Decision>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut conditions = Vec::with_capacity(terms.len() * columns.len());
        let mut args = Vec::with_capacity(terms.len() + 1);
        for term in terms {
            args.push(rusqlite::types::Value::Text(term.clone()));
            let idx = args.len();
            for column in columns {
                conditions.push(format!("expertap_icontains({}, ?{})", column, idx));
            }
        }
        args.push(rusqlite::types::Value::Integer(limit as i64));

        let sql = format!(
            "SELECT * FROM decisions WHERE {} {} LIMIT ?{}",
            conditions.join(" OR "),
            RECENT_FIRST,
            args.len()
        );

        self.query_decisions(&sql, args)
    }

    /// Decisions whose text covers at least `threshold` of the query's trigrams,
    /// best matches first
    pub fn search_trigram(&self, query: &str, threshold: f32, limit: usize) -> Result<Vec<Decision>> {
        let sql = r#"
            SELECT * FROM (
                SELECT *, rowid AS seq, expertap_trgm_coverage(?1, full_text) AS score
                FROM decisions
            )
            WHERE score >= ?2
            ORDER BY score DESC, decision_date IS NULL, decision_date DESC, seq DESC
            LIMIT ?3
        "#;

        self.query_decisions(
            sql,
            vec![
                rusqlite::types::Value::Text(query.to_string()),
                rusqlite::types::Value::Real(threshold as f64),
                rusqlite::types::Value::Integer(limit as i64),
            ],
        )
    }

    fn query_decisions(
        &self,
        sql: &str,
        args: Vec<rusqlite::types::Value>,
    ) -> Result<Vec<Decision>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| Error::Database(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params_from_iter(args.iter()), row_to_decision)
            .map_err(|e| Error::Database(format!("Failed to search decisions: {}", e)))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(format!("Failed to read decision row: {}", e)))?;

        Ok(rows)
    }

    /// Aggregate counts by outcome, year, criticism code and contest type
    pub fn stats(&self) -> Result<DecisionStats> {
        let conn = self.conn.lock();
        let mut stats = DecisionStats::default();

        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM decisions", [], |row| row.get(0))
            .map_err(|e| Error::Database(format!("Failed to count decisions: {}", e)))?;
        stats.total_decisions = total.max(0) as u64;

        let grouped = |sql: &str| -> Result<Vec<(String, u64)>> {
            let mut stmt = conn
                .prepare(sql)
                .map_err(|e| Error::Database(format!("Failed to prepare stats query: {}", e)))?;
            let rows = stmt
                .query_map([], |row| {
                    let key: String = row.get(0)?;
                    let count: i64 = row.get(1)?;
                    Ok((key, count.max(0) as u64))
                })
                .map_err(|e| Error::Database(format!("Failed to compute stats: {}", e)))?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| Error::Database(format!("Failed to read stats row: {}", e)))?;
            Ok(rows)
        };

        stats.by_ruling = grouped(
            "SELECT COALESCE(outcome, 'UNKNOWN'), COUNT(*) FROM decisions GROUP BY 1",
        )?
        .into_iter()
        .collect();
        stats.by_year = grouped(
            "SELECT CAST(bulletin_year AS TEXT), COUNT(*) FROM decisions GROUP BY bulletin_year",
        )?
        .into_iter()
        .collect();
        stats.by_criticism = grouped(
            "SELECT j.value, COUNT(*) FROM decisions d, json_each(d.criticism_codes) j GROUP BY j.value",
        )?
        .into_iter()
        .collect();
        stats.by_contest_type = grouped(
            "SELECT contest_type, COUNT(*) FROM decisions GROUP BY contest_type",
        )?
        .into_iter()
        .collect();

        let last: Option<String> = conn
            .query_row("SELECT MAX(created_at) FROM decisions", [], |row| row.get(0))
            .map_err(|e| Error::Database(format!("Failed to read last update: {}", e)))?;
        stats.last_updated = last.and_then(|s| parse_timestamp(&s));

        Ok(stats)
    }
}

/// `decision_date` descending with missing dates last, then newest insert first
const RECENT_FIRST: &str = "ORDER BY decision_date IS NULL, decision_date DESC, rowid DESC";

fn filter_clause(filter: &DecisionFilter) -> (String, Vec<rusqlite::types::Value>) {
    let mut conditions = Vec::new();
    let mut args = Vec::new();

    if let Some(outcome) = filter.outcome {
        args.push(rusqlite::types::Value::Text(outcome.as_str().to_string()));
        conditions.push(format!("outcome = ?{}", args.len()));
    }
    if let Some(year) = filter.year {
        args.push(rusqlite::types::Value::Integer(year as i64));
        conditions.push(format!("bulletin_year = ?{}", args.len()));
    }

    if conditions.is_empty() {
        (String::new(), args)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), args)
    }
}

fn insert_with(conn: &Connection, decision: &ParsedDecision) -> Result<InsertOutcome> {
    if !decision.has_identity() {
        return Err(Error::validation(format!(
            "Decision '{}' has no bulletin year/number",
            decision.filename
        )));
    }

    let id = Uuid::new_v4().to_string();
    let codes = serde_json::to_string(&decision.criticism_codes)?;
    let warnings = serde_json::to_string(&decision.parse_warnings)?;

    let changed = conn
        .execute(
            r#"
            INSERT INTO decisions (
                id, filename, bulletin_year, bulletin_number, decision_number, panel,
                decision_date, contest_type, criticism_codes, cpv_code, cpv_source,
                filename_outcome, outcome, rejection_reason, claimant, contracting_authority,
                full_text, parse_warnings, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
            ON CONFLICT DO NOTHING
            "#,
            params![
                id,
                decision.filename,
                decision.bulletin_year,
                decision.bulletin_number,
                decision.decision_number,
                decision.panel,
                decision.decision_date.map(|d| d.format("%Y-%m-%d").to_string()),
                decision.contest_type.as_str(),
                codes,
                decision.cpv_code,
                decision.cpv_source.map(|s| s.as_str()),
                decision.filename_outcome.as_str(),
                decision.outcome.map(|o| o.as_str()),
                decision.rejection_reason,
                decision.claimant,
                decision.contracting_authority,
                decision.full_text,
                warnings,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| {
            Error::Database(format!("Failed to insert decision {}: {}", decision.filename, e))
        })?;

    if changed == 0 {
        Ok(InsertOutcome::Duplicate)
    } else {
        Ok(InsertOutcome::Inserted(id))
    }
}

/// Registers `expertap_icontains(haystack, needle)` and
/// `expertap_trgm_coverage(query, text)`
fn register_functions(conn: &Connection) -> Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("expertap_icontains", 2, flags, |ctx| {
        let haystack: Option<String> = ctx.get(0)?;
        let needle: Option<String> = ctx.get(1)?;
        Ok(match (haystack, needle) {
            (Some(h), Some(n)) => h.to_lowercase().contains(&n.to_lowercase()),
            _ => false,
        })
    })
    .map_err(|e| Error::Database(format!("Failed to register icontains: {}", e)))?;

    conn.create_scalar_function("expertap_trgm_coverage", 2, flags, |ctx| {
        // the query argument is constant per statement; its trigrams are cached
        let query = ctx.get_or_create_aux(0, |value| {
            value.as_str().map(TrigramSet::new)
        })?;
        let text: Option<String> = ctx.get(1)?;
        Ok(text
            .map(|t| query.coverage_in(&TrigramSet::new(&t)) as f64)
            .unwrap_or(0.0))
    })
    .map_err(|e| Error::Database(format!("Failed to register trigram coverage: {}", e)))?;

    Ok(())
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        message.into(),
    )
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

fn row_to_decision(row: &Row) -> rusqlite::Result<Decision> {
    let idx = |name: &str| row.as_ref().column_index(name);

    let contest_type: String = row.get("contest_type")?;
    let filename_outcome: String = row.get("filename_outcome")?;
    let outcome: Option<String> = row.get("outcome")?;
    let cpv_source: Option<String> = row.get("cpv_source")?;
    let decision_date: Option<String> = row.get("decision_date")?;
    let codes: String = row.get("criticism_codes")?;
    let warnings: String = row.get("parse_warnings")?;
    let created_at: String = row.get("created_at")?;

    Ok(Decision {
        id: row.get("id")?,
        filename: row.get("filename")?,
        bulletin_year: row.get("bulletin_year")?,
        bulletin_number: row.get("bulletin_number")?,
        decision_number: row.get("decision_number")?,
        panel: row.get("panel")?,
        decision_date: decision_date
            .map(|s| {
                NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|e| conversion_error(idx("decision_date").unwrap_or(0), e.to_string()))
            })
            .transpose()?,
        contest_type: ContestType::parse(&contest_type).ok_or_else(|| {
            conversion_error(
                idx("contest_type").unwrap_or(0),
                format!("unknown contest type: {}", contest_type),
            )
        })?,
        criticism_codes: serde_json::from_str(&codes)
            .map_err(|e| conversion_error(idx("criticism_codes").unwrap_or(0), e.to_string()))?,
        cpv_code: row.get("cpv_code")?,
        cpv_source: cpv_source.as_deref().and_then(CpvSource::parse),
        filename_outcome: FilenameOutcome::parse(&filename_outcome).unwrap_or_default(),
        outcome: outcome.as_deref().and_then(Outcome::parse),
        rejection_reason: row.get("rejection_reason")?,
        claimant: row.get("claimant")?,
        contracting_authority: row.get("contracting_authority")?,
        full_text: row.get("full_text")?,
        parse_warnings: serde_json::from_str(&warnings).unwrap_or_default(),
        created_at: parse_timestamp(&created_at).unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_decision_text;

    fn decision(filename: &str, text: &str) -> ParsedDecision {
        parse_decision_text(text, Some(filename))
    }

    fn seeded(n: usize) -> DecisionDb {
        let db = DecisionDb::in_memory().unwrap();
        for i in 1..=n {
            let text = format!("Decizia {} din 0{}.01.2024 privind experiență similară.", i, i.min(9));
            db.insert_decision(&decision(&format!("BO2024_{}_D1_A.txt", i), &text))
                .unwrap();
        }
        db
    }

    #[test]
    fn test_insert_and_get() {
        let db = DecisionDb::in_memory().unwrap();
        let parsed = decision("BO2025_3855_R2_CPV_55520000-1_A.txt", "Nr. 3855/C8/4446 din 10.12.2025");

        let InsertOutcome::Inserted(id) = db.insert_decision(&parsed).unwrap() else {
            panic!("expected insert");
        };

        let stored = db.get(&id).unwrap().unwrap();
        assert_eq!(stored.external_id(), "BO2025_3855");
        assert_eq!(stored.panel.as_deref(), Some("C8"));
        assert_eq!(stored.decision_number, Some(4446));
        assert_eq!(stored.decision_date, NaiveDate::from_ymd_opt(2025, 12, 10));
        assert_eq!(stored.criticism_codes, vec!["R2"]);
        assert_eq!(stored.outcome, Some(Outcome::Admis));
        assert!(db.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let db = DecisionDb::in_memory().unwrap();
        let parsed = decision("BO2024_15_D2_A.txt", "text");
        assert!(matches!(db.insert_decision(&parsed).unwrap(), InsertOutcome::Inserted(_)));
        assert_eq!(db.insert_decision(&parsed).unwrap(), InsertOutcome::Duplicate);

        // same (year, bulletin) under another filename
        let renamed = decision("BO2024_15_R2_R.txt", "text");
        assert_eq!(db.insert_decision(&renamed).unwrap(), InsertOutcome::Duplicate);
        assert_eq!(db.count().unwrap(), 1);
        assert!(db.exists(2024, 15).unwrap());
    }

    #[test]
    fn test_identityless_decision_rejected() {
        let db = DecisionDb::in_memory().unwrap();
        let parsed = decision("not-a-decision.txt", "text");
        assert!(matches!(db.insert_decision(&parsed), Err(Error::Validation(_))));
    }

    #[test]
    fn test_batch_insert() {
        let db = DecisionDb::in_memory().unwrap();
        let batch = vec![
            decision("BO2024_1_D1_A.txt", "a"),
            decision("BO2024_2_D1_A.txt", "b"),
            decision("BO2024_1_D1_A.txt", "a"),
            decision("junk.txt", "c"),
        ];
        let outcome = db.insert_batch(&batch).unwrap();
        assert_eq!(outcome.inserted, 2);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "junk.txt");
    }

    #[test]
    fn test_pagination() {
        let db = seeded(7);

        let page = |limit, offset| {
            db.list(&DecisionFilter { limit, offset, ..Default::default() })
                .unwrap()
        };

        let (first, total) = page(5, 0);
        assert_eq!(first.len(), 5);
        assert_eq!(total, 7);

        let (second, _) = page(5, 5);
        assert_eq!(second.len(), 2);

        let (beyond, total) = page(5, u64::MAX);
        assert!(beyond.is_empty());
        assert_eq!(total, 7);
    }

    #[test]
    fn test_list_orders_recent_first_and_filters() {
        let db = seeded(3);
        db.insert_decision(&decision("BO2023_9_R2_R.txt", "fără dată")).unwrap();

        let (all, _) = db.list(&DecisionFilter::default()).unwrap();
        let ids: Vec<String> = all.iter().map(|d| d.external_id()).collect();
        assert_eq!(ids, vec!["BO2024_3", "BO2024_2", "BO2024_1", "BO2023_9"]);

        let (rejected, total) = db
            .list(&DecisionFilter { outcome: Some(Outcome::Respins), ..Default::default() })
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rejected[0].external_id(), "BO2023_9");

        let (by_year, total) = db
            .list(&DecisionFilter { year: Some(2024), ..Default::default() })
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(by_year.len(), 3);
    }

    #[test]
    fn test_keyword_search_is_case_insensitive() {
        let db = DecisionDb::in_memory().unwrap();
        let mut parsed = decision("BO2024_1_D5_A.txt", "Garanția de participare a fost constituită.");
        parsed.claimant = Some("SC ÎNTREPRINDEREA SRL".into());
        db.insert_decision(&parsed).unwrap();
        db.insert_decision(&decision("BO2024_2_R3_R.txt", "Preț neobișnuit de scăzut.")).unwrap();

        let hits = db.search_keywords(&["GARANȚIA".into()], 5).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].external_id(), "BO2024_1");

        let hits = db.search_keywords(&["întreprinderea".into()], 5).unwrap();
        assert_eq!(hits.len(), 1);

        let hits = db.search_text(&["întreprinderea".into()], 5).unwrap();
        assert!(hits.is_empty());

        assert!(db.search_keywords(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn test_trigram_search() {
        let db = DecisionDb::in_memory().unwrap();
        db.insert_decision(&decision(
            "BO2024_1_D5_A.txt",
            "Contestatorul critică forma garanției de participare.",
        ))
        .unwrap();
        db.insert_decision(&decision("BO2024_2_R7_R.txt", "Anularea procedurii.")).unwrap();

        let hits = db.search_trigram("garantie participare", 0.3, 5).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].external_id(), "BO2024_1");

        assert!(db.search_trigram("xylofon", 0.3, 5).unwrap().is_empty());
    }

    #[test]
    fn test_stats() {
        let db = seeded(2);
        db.insert_decision(&decision("BO2023_9_R2_R4_R.txt", "text")).unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.total_decisions, 3);
        assert_eq!(stats.by_ruling.get("ADMIS"), Some(&2));
        assert_eq!(stats.by_ruling.get("RESPINS"), Some(&1));
        assert_eq!(stats.by_year.get("2024"), Some(&2));
        assert_eq!(stats.by_criticism.get("D1"), Some(&2));
        assert_eq!(stats.by_criticism.get("R4"), Some(&1));
        assert_eq!(stats.by_contest_type.get("rezultat"), Some(&1));
        assert!(stats.last_updated.is_some());
    }
}
