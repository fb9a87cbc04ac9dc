use super::ExemplarStore;
use crate::model::{Evaluation, EvaluationExemplar};
use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

#[derive(Clone)]
pub struct SqliteExemplarStore {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRow {
    pub id: i64,
    pub theme: String,
    pub question_text: String,
    pub source_title: Option<String>,
    pub is_manual: bool,
    pub is_excellent: bool,
    pub created_at: String,
}

fn now() -> String {
    // Fixed width so lexical order on created_at is chronological.
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

impl SqliteExemplarStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite db {}", path.display()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        self.conn()
            .execute_batch(super::schema::DDL)
            .context("failed to create exemplar tables")?;
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert_question(
        &self,
        theme: &str,
        question_text: &str,
        source_title: Option<&str>,
        is_manual: bool,
    ) -> anyhow::Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO questions (theme, question_text, source_title, is_manual, is_excellent, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![theme, question_text, source_title, is_manual, now()],
        )
        .context("failed to insert question")?;
        Ok(conn.last_insert_rowid())
    }

    /// Stores an answer, with its evaluation when one succeeded.
    pub fn insert_answer(
        &self,
        question_id: i64,
        answer_text: &str,
        evaluation: Option<&Evaluation>,
    ) -> anyhow::Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO answers (question_id, answer_text, score, commentary, is_excellent, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![
                question_id,
                answer_text,
                evaluation.map(|e| i64::from(e.score)),
                evaluation.map(|e| e.comment.as_str()),
                now()
            ],
        )
        .with_context(|| format!("failed to insert answer for question {}", question_id))?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns false when no question has that id.
    pub fn set_question_excellent(&self, id: i64, excellent: bool) -> anyhow::Result<bool> {
        let n = self
            .conn()
            .execute(
                "UPDATE questions SET is_excellent = ?1 WHERE id = ?2",
                params![excellent, id],
            )
            .context("failed to flag question")?;
        Ok(n > 0)
    }

    /// Returns false when no answer has that id.
    pub fn set_answer_excellent(&self, id: i64, excellent: bool) -> anyhow::Result<bool> {
        let n = self
            .conn()
            .execute(
                "UPDATE answers SET is_excellent = ?1 WHERE id = ?2",
                params![excellent, id],
            )
            .context("failed to flag answer")?;
        Ok(n > 0)
    }

    pub fn get_question(&self, id: i64) -> anyhow::Result<Option<QuestionRow>> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT id, theme, question_text, source_title, is_manual, is_excellent, created_at
                 FROM questions WHERE id = ?1",
                params![id],
                |row| {
                    Ok(QuestionRow {
                        id: row.get(0)?,
                        theme: row.get(1)?,
                        question_text: row.get(2)?,
                        source_title: row.get(3)?,
                        is_manual: row.get(4)?,
                        is_excellent: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                },
            )
            .optional()
            .with_context(|| format!("failed to load question {}", id))?;
        Ok(row)
    }

    pub fn try_top_prompt_exemplars(&self, theme: &str, limit: usize) -> anyhow::Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT question_text FROM questions
             WHERE theme = ?1 AND is_excellent = 1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![theme, sql_limit(limit)], |row| row.get(0))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn try_sample_evaluation_exemplars(
        &self,
        limit: usize,
    ) -> anyhow::Result<Vec<EvaluationExemplar>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT q.question_text, a.answer_text, a.score, COALESCE(a.commentary, '')
             FROM answers a
             JOIN questions q ON a.question_id = q.id
             WHERE a.is_excellent = 1 AND a.score IS NOT NULL
             ORDER BY RANDOM()
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![sql_limit(limit)], |row| {
            Ok(EvaluationExemplar {
                prompt: row.get(0)?,
                answer: row.get(1)?,
                score: row.get(2)?,
                commentary: row.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

impl ExemplarStore for SqliteExemplarStore {
    fn top_prompt_exemplars(&self, theme: &str, limit: usize) -> Vec<String> {
        self.try_top_prompt_exemplars(theme, limit)
            .unwrap_or_else(|e| {
                warn!(theme, error = %format!("{:#}", e), "prompt exemplar lookup failed; continuing zero-shot");
                Vec::new()
            })
    }

    fn sample_evaluation_exemplars(&self, limit: usize) -> Vec<EvaluationExemplar> {
        self.try_sample_evaluation_exemplars(limit)
            .unwrap_or_else(|e| {
                warn!(error = %format!("{:#}", e), "evaluation exemplar lookup failed; continuing zero-shot");
                Vec::new()
            })
    }
}
