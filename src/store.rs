//! Persistence collaborator
//!
//! The engines consume read-only snapshots through the [`SnapshotStore`]
//! trait; the messaging service persists through [`MessagingStore`]. Both are
//! implemented by [`SqliteStore`], a rusqlite-backed store with WAL mode and
//! schema initialization on open. Engines never talk to SQLite directly, so
//! tests and alternative backends only need the traits.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, StoreError, WellnessError};
use crate::models::{
    ActivityRecord, Conversation, ConversationParticipant, Message, SleepRecord, TemplateFilter,
    UserProfile, WorkoutGoal, WorkoutTemplate,
};

/// Read contracts consumed by the suggestion, sleep, and reminder engines
///
/// Reads are order-independent; the engines only combine finished results.
/// Any fetch failure aborts the request rather than producing a partial
/// suggestion.
pub trait SnapshotStore {
    /// Fetch the user profile; `ProfileNotFound` when the user does not exist
    fn get_user_profile(&self, user_id: Uuid) -> Result<UserProfile>;

    /// First active goal for the user, if any
    fn get_active_goal(&self, user_id: Uuid) -> Result<Option<WorkoutGoal>>;

    /// Most recent sleep record by date
    fn latest_sleep_record(&self, user_id: Uuid) -> Result<Option<SleepRecord>>;

    /// Most recent activity record by date
    fn latest_activity_record(&self, user_id: Uuid) -> Result<Option<ActivityRecord>>;

    /// Sleep records on or after `since`, ascending by date
    fn list_sleep_records(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<SleepRecord>>;

    /// Workout templates matching the filter
    fn list_workout_templates(&self, filter: &TemplateFilter) -> Result<Vec<WorkoutTemplate>>;

    /// All active goals for the user
    fn list_active_goals(&self, user_id: Uuid) -> Result<Vec<WorkoutGoal>>;
}

/// Write/read contracts consumed by the messaging service
pub trait MessagingStore {
    fn insert_conversation(&self, conversation: &Conversation) -> Result<()>;

    fn insert_participant(&self, participant: &ConversationParticipant) -> Result<()>;

    fn find_participant(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ConversationParticipant>>;

    fn count_participants(&self, conversation_id: Uuid) -> Result<u32>;

    fn insert_message(&self, message: &Message) -> Result<()>;

    /// Bump the conversation's last-message timestamp
    fn touch_conversation(&self, conversation_id: Uuid, at: DateTime<Utc>) -> Result<()>;

    /// Advance a participant's read high-water mark
    fn mark_read(&self, conversation_id: Uuid, user_id: Uuid, at: DateTime<Utc>) -> Result<()>;

    /// Conversations the user participates in, newest activity first
    fn conversations_for(
        &self,
        user_id: Uuid,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<(Conversation, ConversationParticipant)>>;

    /// Latest message in a conversation, if any
    fn latest_message(&self, conversation_id: Uuid) -> Result<Option<Message>>;

    /// Messages ascending by creation time
    fn list_messages(&self, conversation_id: Uuid, limit: u32, offset: u32)
        -> Result<Vec<Message>>;

    /// Existing direct conversation between the two users, if any
    fn find_direct_conversation(&self, user_a: Uuid, user_b: Uuid)
        -> Result<Option<Conversation>>;
}

/// SQLite-backed store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create or open a store at the specified path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path).map_err(StoreError::from)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store for tests and ephemeral runs
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .pragma_update(None, "journal_mode", "WAL")
            .map_err(StoreError::from)?;
        self.conn
            .pragma_update(None, "synchronous", "NORMAL")
            .map_err(StoreError::from)?;
        self.conn
            .pragma_update(None, "foreign_keys", "ON")
            .map_err(StoreError::from)?;

        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    first_name TEXT NOT NULL,
                    last_name TEXT,
                    age INTEGER NOT NULL,
                    gender TEXT NOT NULL,
                    weight_kg REAL NOT NULL,
                    height_cm REAL NOT NULL,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
                );

                CREATE TABLE IF NOT EXISTS workout_goals (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL REFERENCES users (id),
                    goal_type TEXT NOT NULL,
                    target_date DATE,
                    target_weight_kg REAL,
                    weekly_workout_days INTEGER NOT NULL DEFAULT 4,
                    status TEXT NOT NULL DEFAULT 'active',
                    notes TEXT,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
                );

                CREATE TABLE IF NOT EXISTS sleep_logs (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL REFERENCES users (id),
                    date DATE NOT NULL,
                    bedtime TIME NOT NULL,
                    waketime TIME NOT NULL,
                    duration_hours REAL NOT NULL,
                    quality TEXT NOT NULL,
                    notes TEXT,
                    UNIQUE (user_id, date)
                );

                CREATE TABLE IF NOT EXISTS daily_logs (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL REFERENCES users (id),
                    date DATE NOT NULL,
                    steps INTEGER,
                    water_intake_liters REAL,
                    UNIQUE (user_id, date)
                );

                CREATE TABLE IF NOT EXISTS workout_templates (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    category TEXT NOT NULL,
                    intensity TEXT NOT NULL,
                    duration_minutes INTEGER,
                    bmi_category TEXT NOT NULL,
                    goal_type TEXT,
                    description TEXT
                );

                CREATE TABLE IF NOT EXISTS conversations (
                    id TEXT PRIMARY KEY,
                    title TEXT,
                    conversation_type TEXT NOT NULL DEFAULT 'direct',
                    last_message_at DATETIME NOT NULL,
                    created_at DATETIME NOT NULL
                );

                CREATE TABLE IF NOT EXISTS conversation_participants (
                    id TEXT PRIMARY KEY,
                    conversation_id TEXT NOT NULL REFERENCES conversations (id),
                    user_id TEXT NOT NULL,
                    role TEXT NOT NULL DEFAULT 'participant',
                    last_read_at DATETIME NOT NULL,
                    UNIQUE (conversation_id, user_id)
                );

                CREATE TABLE IF NOT EXISTS messages (
                    id TEXT PRIMARY KEY,
                    conversation_id TEXT NOT NULL REFERENCES conversations (id),
                    sender_id TEXT NOT NULL,
                    content TEXT NOT NULL,
                    message_type TEXT NOT NULL DEFAULT 'text',
                    attachments TEXT NOT NULL DEFAULT '[]',
                    created_at DATETIME NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sleep_logs_user_date
                    ON sleep_logs (user_id, date);
                CREATE INDEX IF NOT EXISTS idx_daily_logs_user_date
                    ON daily_logs (user_id, date);
                CREATE INDEX IF NOT EXISTS idx_goals_user_status
                    ON workout_goals (user_id, status);
                CREATE INDEX IF NOT EXISTS idx_messages_conversation
                    ON messages (conversation_id, created_at);
                "#,
            )
            .map_err(StoreError::from)?;

        Ok(())
    }

    //
    // Write helpers used by the CRUD layer, seeding, and tests
    //

    pub fn upsert_user(&self, profile: &UserProfile) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO users (id, first_name, last_name, age, gender, weight_kg, height_cm)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT (id) DO UPDATE SET
                    first_name = excluded.first_name,
                    last_name = excluded.last_name,
                    age = excluded.age,
                    gender = excluded.gender,
                    weight_kg = excluded.weight_kg,
                    height_cm = excluded.height_cm,
                    updated_at = CURRENT_TIMESTAMP
                "#,
                params![
                    profile.id.to_string(),
                    profile.first_name,
                    profile.last_name,
                    profile.age,
                    profile.gender.as_str(),
                    profile.weight_kg,
                    profile.height_cm,
                ],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    pub fn insert_goal(&self, goal: &WorkoutGoal) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO workout_goals
                    (id, user_id, goal_type, target_date, target_weight_kg,
                     weekly_workout_days, status, notes)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    goal.id.to_string(),
                    goal.user_id.to_string(),
                    goal.goal_type.as_str(),
                    goal.target_date,
                    goal.target_weight_kg,
                    goal.weekly_workout_days,
                    goal.status.as_str(),
                    goal.notes,
                ],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    pub fn insert_sleep_record(&self, record: &SleepRecord) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO sleep_logs
                    (id, user_id, date, bedtime, waketime, duration_hours, quality, notes)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    record.id.to_string(),
                    record.user_id.to_string(),
                    record.date,
                    record.bedtime,
                    record.waketime,
                    record.duration_hours,
                    record.quality.as_str(),
                    record.notes,
                ],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    pub fn insert_activity_record(&self, record: &ActivityRecord) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO daily_logs (id, user_id, date, steps, water_intake_liters)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    record.id.to_string(),
                    record.user_id.to_string(),
                    record.date,
                    record.steps,
                    record.water_intake_liters,
                ],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    pub fn insert_template(&self, template: &WorkoutTemplate) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO workout_templates
                    (id, name, category, intensity, duration_minutes,
                     bmi_category, goal_type, description)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    template.id.to_string(),
                    template.name,
                    template.category.as_str(),
                    template.intensity.as_str(),
                    template.duration_minutes,
                    template.bmi_category.as_str(),
                    template.goal_type.map(|g| g.as_str()),
                    template.description,
                ],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    //
    // Row mapping
    //

    fn row_to_profile(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
        Ok(UserProfile {
            id: col_uuid(row, 0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            age: row.get(3)?,
            gender: col_enum(row, 4)?,
            weight_kg: row.get(5)?,
            height_cm: row.get(6)?,
        })
    }

    fn row_to_goal(row: &Row<'_>) -> rusqlite::Result<WorkoutGoal> {
        Ok(WorkoutGoal {
            id: col_uuid(row, 0)?,
            user_id: col_uuid(row, 1)?,
            goal_type: col_enum(row, 2)?,
            target_date: row.get(3)?,
            target_weight_kg: row.get(4)?,
            weekly_workout_days: row.get(5)?,
            status: col_enum(row, 6)?,
            notes: row.get(7)?,
        })
    }

    fn row_to_sleep(row: &Row<'_>) -> rusqlite::Result<SleepRecord> {
        Ok(SleepRecord {
            id: col_uuid(row, 0)?,
            user_id: col_uuid(row, 1)?,
            date: row.get(2)?,
            bedtime: row.get(3)?,
            waketime: row.get(4)?,
            duration_hours: row.get(5)?,
            quality: col_enum(row, 6)?,
            notes: row.get(7)?,
        })
    }

    fn row_to_activity(row: &Row<'_>) -> rusqlite::Result<ActivityRecord> {
        Ok(ActivityRecord {
            id: col_uuid(row, 0)?,
            user_id: col_uuid(row, 1)?,
            date: row.get(2)?,
            steps: row.get(3)?,
            water_intake_liters: row.get(4)?,
        })
    }

    fn row_to_template(row: &Row<'_>) -> rusqlite::Result<WorkoutTemplate> {
        let goal_type: Option<String> = row.get(6)?;
        Ok(WorkoutTemplate {
            id: col_uuid(row, 0)?,
            name: row.get(1)?,
            category: col_enum(row, 2)?,
            intensity: col_enum(row, 3)?,
            duration_minutes: row.get(4)?,
            bmi_category: col_enum(row, 5)?,
            goal_type: goal_type.map(|s| parse_text(6, s)).transpose()?,
            description: row.get(7)?,
        })
    }

    fn row_to_conversation(row: &Row<'_>) -> rusqlite::Result<Conversation> {
        Ok(Conversation {
            id: col_uuid(row, 0)?,
            title: row.get(1)?,
            conversation_type: col_enum(row, 2)?,
            last_message_at: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn row_to_participant(row: &Row<'_>) -> rusqlite::Result<ConversationParticipant> {
        Ok(ConversationParticipant {
            id: col_uuid(row, 0)?,
            conversation_id: col_uuid(row, 1)?,
            user_id: col_uuid(row, 2)?,
            role: col_enum(row, 3)?,
            last_read_at: row.get(4)?,
        })
    }

    fn row_to_message(row: &Row<'_>) -> rusqlite::Result<Message> {
        let attachments: String = row.get(5)?;
        Ok(Message {
            id: col_uuid(row, 0)?,
            conversation_id: col_uuid(row, 1)?,
            sender_id: col_uuid(row, 2)?,
            content: row.get(3)?,
            message_type: col_enum(row, 4)?,
            attachments: serde_json::from_str(&attachments).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
            })?,
            created_at: row.get(6)?,
        })
    }
}

/// Read a TEXT column and parse it as a UUID
fn col_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a TEXT column and parse it into a closed domain enum
fn col_enum<T: FromStr<Err = String>>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse_text(idx, raw)
}

fn parse_text<T: FromStr<Err = String>>(idx: usize, raw: String) -> rusqlite::Result<T> {
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

impl SnapshotStore for SqliteStore {
    fn get_user_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        self.conn
            .query_row(
                "SELECT id, first_name, last_name, age, gender, weight_kg, height_cm
                 FROM users WHERE id = ?1",
                params![user_id.to_string()],
                Self::row_to_profile,
            )
            .optional()
            .map_err(StoreError::from)?
            .ok_or(WellnessError::ProfileNotFound { user_id })
    }

    fn get_active_goal(&self, user_id: Uuid) -> Result<Option<WorkoutGoal>> {
        let goal = self
            .conn
            .query_row(
                "SELECT id, user_id, goal_type, target_date, target_weight_kg,
                        weekly_workout_days, status, notes
                 FROM workout_goals
                 WHERE user_id = ?1 AND status = 'active'
                 ORDER BY created_at, rowid
                 LIMIT 1",
                params![user_id.to_string()],
                Self::row_to_goal,
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(goal)
    }

    fn latest_sleep_record(&self, user_id: Uuid) -> Result<Option<SleepRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, user_id, date, bedtime, waketime, duration_hours, quality, notes
                 FROM sleep_logs
                 WHERE user_id = ?1
                 ORDER BY date DESC
                 LIMIT 1",
                params![user_id.to_string()],
                Self::row_to_sleep,
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(record)
    }

    fn latest_activity_record(&self, user_id: Uuid) -> Result<Option<ActivityRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, user_id, date, steps, water_intake_liters
                 FROM daily_logs
                 WHERE user_id = ?1
                 ORDER BY date DESC
                 LIMIT 1",
                params![user_id.to_string()],
                Self::row_to_activity,
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(record)
    }

    fn list_sleep_records(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<SleepRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, date, bedtime, waketime, duration_hours, quality, notes
                 FROM sleep_logs
                 WHERE user_id = ?1 AND date >= ?2
                 ORDER BY date ASC",
            )
            .map_err(StoreError::from)?;

        let records = stmt
            .query_map(params![user_id.to_string(), since], Self::row_to_sleep)
            .map_err(StoreError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::from)?;
        Ok(records)
    }

    fn list_workout_templates(&self, filter: &TemplateFilter) -> Result<Vec<WorkoutTemplate>> {
        let sql_base = "SELECT id, name, category, intensity, duration_minutes,
                               bmi_category, goal_type, description
                        FROM workout_templates
                        WHERE bmi_category = ?1";

        let templates = if let Some(goal_type) = filter.goal_type {
            let mut stmt = self
                .conn
                .prepare(&format!("{} AND goal_type = ?2 ORDER BY name", sql_base))
                .map_err(StoreError::from)?;
            let rows = stmt
                .query_map(
                    params![filter.bmi_category.as_str(), goal_type.as_str()],
                    Self::row_to_template,
                )
                .map_err(StoreError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(StoreError::from)?;
            rows
        } else {
            let mut stmt = self
                .conn
                .prepare(&format!("{} ORDER BY name", sql_base))
                .map_err(StoreError::from)?;
            let rows = stmt
                .query_map(params![filter.bmi_category.as_str()], Self::row_to_template)
                .map_err(StoreError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(StoreError::from)?;
            rows
        };

        Ok(templates)
    }

    fn list_active_goals(&self, user_id: Uuid) -> Result<Vec<WorkoutGoal>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, goal_type, target_date, target_weight_kg,
                        weekly_workout_days, status, notes
                 FROM workout_goals
                 WHERE user_id = ?1 AND status = 'active'
                 ORDER BY created_at, rowid",
            )
            .map_err(StoreError::from)?;

        let goals = stmt
            .query_map(params![user_id.to_string()], Self::row_to_goal)
            .map_err(StoreError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::from)?;
        Ok(goals)
    }
}

impl MessagingStore for SqliteStore {
    fn insert_conversation(&self, conversation: &Conversation) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO conversations
                     (id, title, conversation_type, last_message_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    conversation.id.to_string(),
                    conversation.title,
                    conversation.conversation_type.as_str(),
                    conversation.last_message_at,
                    conversation.created_at,
                ],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    fn insert_participant(&self, participant: &ConversationParticipant) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO conversation_participants
                     (id, conversation_id, user_id, role, last_read_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    participant.id.to_string(),
                    participant.conversation_id.to_string(),
                    participant.user_id.to_string(),
                    participant.role.as_str(),
                    participant.last_read_at,
                ],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    fn find_participant(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ConversationParticipant>> {
        let participant = self
            .conn
            .query_row(
                "SELECT id, conversation_id, user_id, role, last_read_at
                 FROM conversation_participants
                 WHERE conversation_id = ?1 AND user_id = ?2",
                params![conversation_id.to_string(), user_id.to_string()],
                Self::row_to_participant,
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(participant)
    }

    fn count_participants(&self, conversation_id: Uuid) -> Result<u32> {
        let count = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM conversation_participants WHERE conversation_id = ?1",
                params![conversation_id.to_string()],
                |row| row.get(0),
            )
            .map_err(StoreError::from)?;
        Ok(count)
    }

    fn insert_message(&self, message: &Message) -> Result<()> {
        let attachments = serde_json::to_string(&message.attachments)
            .map_err(|e| WellnessError::Internal(e.to_string()))?;
        self.conn
            .execute(
                "INSERT INTO messages
                     (id, conversation_id, sender_id, content, message_type,
                      attachments, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    message.id.to_string(),
                    message.conversation_id.to_string(),
                    message.sender_id.to_string(),
                    message.content,
                    message.message_type.as_str(),
                    attachments,
                    message.created_at,
                ],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    fn touch_conversation(&self, conversation_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        self.conn
            .execute(
                "UPDATE conversations SET last_message_at = ?2 WHERE id = ?1",
                params![conversation_id.to_string(), at],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    fn mark_read(&self, conversation_id: Uuid, user_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        self.conn
            .execute(
                "UPDATE conversation_participants
                 SET last_read_at = ?3
                 WHERE conversation_id = ?1 AND user_id = ?2",
                params![conversation_id.to_string(), user_id.to_string(), at],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    fn conversations_for(
        &self,
        user_id: Uuid,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<(Conversation, ConversationParticipant)>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT c.id, c.title, c.conversation_type, c.last_message_at, c.created_at,
                        p.id, p.conversation_id, p.user_id, p.role, p.last_read_at
                 FROM conversation_participants p
                 JOIN conversations c ON c.id = p.conversation_id
                 WHERE p.user_id = ?1
                 ORDER BY c.last_message_at DESC
                 LIMIT ?2 OFFSET ?3",
            )
            .map_err(StoreError::from)?;

        let rows = stmt
            .query_map(params![user_id.to_string(), limit, offset], |row| {
                let conversation = Conversation {
                    id: col_uuid(row, 0)?,
                    title: row.get(1)?,
                    conversation_type: col_enum(row, 2)?,
                    last_message_at: row.get(3)?,
                    created_at: row.get(4)?,
                };
                let participant = ConversationParticipant {
                    id: col_uuid(row, 5)?,
                    conversation_id: col_uuid(row, 6)?,
                    user_id: col_uuid(row, 7)?,
                    role: col_enum(row, 8)?,
                    last_read_at: row.get(9)?,
                };
                Ok((conversation, participant))
            })
            .map_err(StoreError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::from)?;
        Ok(rows)
    }

    fn latest_message(&self, conversation_id: Uuid) -> Result<Option<Message>> {
        let message = self
            .conn
            .query_row(
                "SELECT id, conversation_id, sender_id, content, message_type,
                        attachments, created_at
                 FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT 1",
                params![conversation_id.to_string()],
                Self::row_to_message,
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(message)
    }

    fn list_messages(
        &self,
        conversation_id: Uuid,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Message>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, conversation_id, sender_id, content, message_type,
                        attachments, created_at
                 FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY created_at ASC, rowid ASC
                 LIMIT ?2 OFFSET ?3",
            )
            .map_err(StoreError::from)?;

        let messages = stmt
            .query_map(
                params![conversation_id.to_string(), limit, offset],
                Self::row_to_message,
            )
            .map_err(StoreError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::from)?;
        Ok(messages)
    }

    fn find_direct_conversation(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<Conversation>> {
        let conversation = self
            .conn
            .query_row(
                "SELECT c.id, c.title, c.conversation_type, c.last_message_at, c.created_at
                 FROM conversations c
                 JOIN conversation_participants pa
                     ON pa.conversation_id = c.id AND pa.user_id = ?1
                 JOIN conversation_participants pb
                     ON pb.conversation_id = c.id AND pb.user_id = ?2
                 WHERE c.conversation_type = 'direct'
                 ORDER BY c.created_at
                 LIMIT 1",
                params![user_a.to_string(), user_b.to_string()],
                Self::row_to_conversation,
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BmiCategory, Gender, GoalStatus, GoalType, Intensity, SleepQuality, WorkoutCategory,
    };
    use chrono::{Duration, NaiveTime};

    fn profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            age: 32,
            gender: Gender::Female,
            weight_kg: 62.0,
            height_cm: 168.0,
        }
    }

    fn goal(user_id: Uuid, status: GoalStatus) -> WorkoutGoal {
        WorkoutGoal {
            id: Uuid::new_v4(),
            user_id,
            goal_type: GoalType::Endurance,
            target_date: NaiveDate::from_ymd_opt(2025, 9, 1),
            target_weight_kg: None,
            weekly_workout_days: 5,
            status,
            notes: None,
        }
    }

    fn sleep(user_id: Uuid, date: NaiveDate) -> SleepRecord {
        SleepRecord {
            id: Uuid::new_v4(),
            user_id,
            date,
            bedtime: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            waketime: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            duration_hours: 8.0,
            quality: SleepQuality::Good,
            notes: None,
        }
    }

    fn template(bmi: BmiCategory, goal_type: Option<GoalType>) -> WorkoutTemplate {
        WorkoutTemplate {
            id: Uuid::new_v4(),
            name: "Brisk Walk".to_string(),
            category: WorkoutCategory::Cardio,
            intensity: Intensity::Low,
            duration_minutes: Some(30),
            bmi_category: bmi,
            goal_type,
            description: None,
        }
    }

    #[test]
    fn test_profile_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let p = profile();
        store.upsert_user(&p).unwrap();
        let loaded = store.get_user_profile(p.id).unwrap();
        assert_eq!(loaded, p);
    }

    #[test]
    fn test_missing_profile_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.get_user_profile(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, WellnessError::ProfileNotFound { .. }));
    }

    #[test]
    fn test_active_goal_filtering() {
        let store = SqliteStore::open_in_memory().unwrap();
        let p = profile();
        store.upsert_user(&p).unwrap();

        store.insert_goal(&goal(p.id, GoalStatus::Completed)).unwrap();
        assert!(store.get_active_goal(p.id).unwrap().is_none());

        let active = goal(p.id, GoalStatus::Active);
        store.insert_goal(&active).unwrap();
        let loaded = store.get_active_goal(p.id).unwrap().unwrap();
        assert_eq!(loaded.id, active.id);

        assert_eq!(store.list_active_goals(p.id).unwrap().len(), 1);
    }

    #[test]
    fn test_sleep_records_window_and_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let p = profile();
        store.upsert_user(&p).unwrap();

        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        for i in 0..10 {
            store
                .insert_sleep_record(&sleep(p.id, start + Duration::days(i)))
                .unwrap();
        }

        let latest = store.latest_sleep_record(p.id).unwrap().unwrap();
        assert_eq!(latest.date, start + Duration::days(9));

        let window = store
            .list_sleep_records(p.id, start + Duration::days(5))
            .unwrap();
        assert_eq!(window.len(), 5);
        assert!(window.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_template_filter() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_template(&template(BmiCategory::Normal, Some(GoalType::Endurance)))
            .unwrap();
        store
            .insert_template(&template(BmiCategory::Normal, None))
            .unwrap();
        store
            .insert_template(&template(BmiCategory::Obesity, Some(GoalType::Endurance)))
            .unwrap();

        let all_normal = store
            .list_workout_templates(&TemplateFilter {
                bmi_category: BmiCategory::Normal,
                goal_type: None,
            })
            .unwrap();
        assert_eq!(all_normal.len(), 2);

        // Goal filtering is strict equality: templates without a goal drop out
        let endurance_normal = store
            .list_workout_templates(&TemplateFilter {
                bmi_category: BmiCategory::Normal,
                goal_type: Some(GoalType::Endurance),
            })
            .unwrap();
        assert_eq!(endurance_normal.len(), 1);
    }

    #[test]
    fn test_latest_activity_record() {
        let store = SqliteStore::open_in_memory().unwrap();
        let p = profile();
        store.upsert_user(&p).unwrap();

        assert!(store.latest_activity_record(p.id).unwrap().is_none());

        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        for (i, steps) in [4000u32, 8000, 12000].iter().enumerate() {
            store
                .insert_activity_record(&ActivityRecord {
                    id: Uuid::new_v4(),
                    user_id: p.id,
                    date: start + Duration::days(i as i64),
                    steps: Some(*steps),
                    water_intake_liters: Some(2.0),
                })
                .unwrap();
        }

        let latest = store.latest_activity_record(p.id).unwrap().unwrap();
        assert_eq!(latest.steps, Some(12000));
    }
}
