//! Schema bootstrap. Statements are idempotent and run in dependency order at
//! startup, so a fresh database is usable without an external migration step.

use sqlx::PgPool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email VARCHAR(255) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        role VARCHAR(20) NOT NULL DEFAULT 'parent',
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS children (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name VARCHAR(100) NOT NULL,
        birth_date DATE,
        avatar_url VARCHAR(500),
        preferred_language VARCHAR(5) NOT NULL DEFAULT 'en',
        created_at TIMESTAMP NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS domains (
        id UUID PRIMARY KEY,
        user_id UUID REFERENCES users(id) ON DELETE CASCADE,
        name VARCHAR(100) NOT NULL,
        description TEXT,
        icon VARCHAR(50),
        color VARCHAR(7),
        is_system BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS words (
        id UUID PRIMARY KEY,
        domain_id UUID NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
        difficulty VARCHAR(20) NOT NULL DEFAULT 'beginner',
        image_url VARCHAR(500),
        audio_url VARCHAR(500),
        sort_order INTEGER NOT NULL DEFAULT 0,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMP NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS word_translations (
        id UUID PRIMARY KEY,
        word_id UUID NOT NULL REFERENCES words(id) ON DELETE CASCADE,
        language VARCHAR(5) NOT NULL,
        text VARCHAR(200) NOT NULL,
        phonetic VARCHAR(500),
        example_sentence TEXT,
        created_at TIMESTAMP NOT NULL,
        CONSTRAINT uq_word_language UNIQUE (word_id, language)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS word_prerequisites (
        id UUID PRIMARY KEY,
        word_id UUID NOT NULL REFERENCES words(id) ON DELETE CASCADE,
        prerequisite_id UUID NOT NULL REFERENCES words(id) ON DELETE CASCADE,
        created_at TIMESTAMP NOT NULL,
        CONSTRAINT uq_word_prerequisite UNIQUE (word_id, prerequisite_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS progress (
        id UUID PRIMARY KEY,
        child_id UUID NOT NULL REFERENCES children(id) ON DELETE CASCADE,
        word_id UUID NOT NULL REFERENCES words(id) ON DELETE CASCADE,
        status VARCHAR(20) NOT NULL DEFAULT 'locked',
        attempts INTEGER NOT NULL DEFAULT 0,
        correct_count INTEGER NOT NULL DEFAULT 0,
        streak_count INTEGER NOT NULL DEFAULT 0,
        last_practiced_at TIMESTAMP,
        unlocked_at TIMESTAMP,
        mastered_at TIMESTAMP,
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP NOT NULL,
        CONSTRAINT uq_child_word UNIQUE (child_id, word_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chat_sessions (
        id UUID PRIMARY KEY,
        child_id UUID NOT NULL REFERENCES children(id) ON DELETE CASCADE,
        domain_id UUID REFERENCES domains(id) ON DELETE SET NULL,
        started_at TIMESTAMP NOT NULL,
        ended_at TIMESTAMP,
        message_count INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chat_messages (
        id UUID PRIMARY KEY,
        session_id UUID NOT NULL REFERENCES chat_sessions(id) ON DELETE CASCADE,
        role VARCHAR(20) NOT NULL,
        content TEXT NOT NULL,
        word_id UUID REFERENCES words(id) ON DELETE SET NULL,
        created_at TIMESTAMP NOT NULL
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS idx_words_domain ON words(domain_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_progress_child ON progress(child_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_chat_messages_session ON chat_messages(session_id)"#,
];

pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
