pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  theme TEXT NOT NULL,
  question_text TEXT NOT NULL,
  source_title TEXT,
  is_manual INTEGER NOT NULL DEFAULT 0,
  is_excellent INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS answers (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  question_id INTEGER NOT NULL REFERENCES questions(id),
  answer_text TEXT NOT NULL,
  score INTEGER,
  commentary TEXT,
  is_excellent INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_questions_theme_excellent
  ON questions(theme, is_excellent, created_at);

CREATE INDEX IF NOT EXISTS idx_answers_excellent
  ON answers(is_excellent);
"#;
