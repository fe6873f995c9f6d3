// ABOUTME: Session graph persistence: atomic write of the whole tree and eager reload
// ABOUTME: Reads use one joined query and assemble the tree in memory, never N+1 lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use tracing::{debug, info, warn};

use super::transactions::{retry_transaction, TransactionGuard};
use super::{format_timestamp, parse_timestamp, Database};
use crate::constants::limits::MAX_WRITE_ATTEMPTS;
use crate::errors::{AppError, AppResult};
use crate::ingest::NewSession;
use crate::models::{Intensity, RepsRecord, SessionRecord, SetRecord, WorkoutRecord};

/// Columns of the joined tree read; the ORDER BY keeps siblings in insertion order
const SESSION_TREE_QUERY: &str = r"
    SELECT
        s.id AS session_id, s.user_id, s.started_at AS session_started_at,
        s.finished_at AS session_finished_at, s.notes,
        w.id AS workout_id, w.name AS workout_name,
        w.started_at AS workout_started_at, w.finished_at AS workout_finished_at,
        st.id AS set_id, st.started_at AS set_started_at, st.finished_at AS set_finished_at,
        r.id AS reps_id, r.count AS reps_count, r.intensity AS reps_intensity,
        r.weight AS reps_weight
    FROM sessions s
    LEFT JOIN workouts w ON w.session_id = s.id
    LEFT JOIN sets st ON st.workout_id = w.id
    LEFT JOIN reps r ON r.set_id = st.id
";

const SESSION_TREE_ORDER: &str = "ORDER BY s.started_at, s.id, w.id, st.id";

/// Which sessions a tree read returns
#[derive(Debug, Clone, Copy)]
enum SessionScope {
    Owner(i64),
    Single { session_id: i64, owner_id: i64 },
}

/// Session-level columns of one joined row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionColumns {
    /// Session id
    pub id: i64,
    /// Owner id
    pub user_id: i64,
    /// Session start
    pub started_at: DateTime<Utc>,
    /// Session end
    pub finished_at: DateTime<Utc>,
    /// Stored notes
    pub notes: Option<String>,
}

/// Workout-level columns of one joined row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutColumns {
    /// Workout id
    pub id: i64,
    /// Stored name
    pub name: String,
    /// Workout start
    pub started_at: DateTime<Utc>,
    /// Workout end
    pub finished_at: DateTime<Utc>,
}

/// Set-level columns of one joined row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetColumns {
    /// Set id
    pub id: i64,
    /// Set start
    pub started_at: DateTime<Utc>,
    /// Set end
    pub finished_at: DateTime<Utc>,
}

/// One row of the joined tree read; lower levels are absent past an empty parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRow {
    /// Session level
    pub session: SessionColumns,
    /// Workout level
    pub workout: Option<WorkoutColumns>,
    /// Set level
    pub set: Option<SetColumns>,
    /// Reps level
    pub reps: Option<RepsRecord>,
}

/// Fold ordered joined rows into session trees
///
/// Rows must arrive grouped by session, then workout, then set, as the tree
/// query orders them.
///
/// # Errors
///
/// Returns an internal error for a stored set without its reps record
pub fn assemble_sessions(rows: Vec<JoinedRow>) -> AppResult<Vec<SessionRecord>> {
    let mut sessions: Vec<SessionRecord> = Vec::new();

    for row in rows {
        if sessions.last().map(|s| s.id) != Some(row.session.id) {
            sessions.push(SessionRecord {
                id: row.session.id,
                user_id: row.session.user_id,
                started_at: row.session.started_at,
                finished_at: row.session.finished_at,
                notes: row.session.notes,
                workouts: Vec::new(),
            });
        }
        let Some(session) = sessions.last_mut() else {
            continue;
        };

        let Some(workout) = row.workout else {
            continue;
        };
        if session.workouts.last().map(|w| w.id) != Some(workout.id) {
            session.workouts.push(WorkoutRecord {
                id: workout.id,
                name: workout.name,
                started_at: workout.started_at,
                finished_at: workout.finished_at,
                sets: Vec::new(),
            });
        }
        let Some(current_workout) = session.workouts.last_mut() else {
            continue;
        };

        let Some(set) = row.set else {
            continue;
        };
        let reps = row
            .reps
            .ok_or_else(|| AppError::internal(format!("Stored set {} has no reps", set.id)))?;
        current_workout.sets.push(SetRecord {
            id: set.id,
            started_at: set.started_at,
            finished_at: set.finished_at,
            reps,
        });
    }

    Ok(sessions)
}

impl Database {
    /// Create the session tree tables
    pub(super) async fn migrate_sessions(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                started_at TEXT NOT NULL,
                finished_at TEXT NOT NULL,
                notes TEXT,
                CHECK (finished_at > started_at)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                started_at TEXT NOT NULL,
                finished_at TEXT NOT NULL,
                CHECK (finished_at > started_at)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                started_at TEXT NOT NULL,
                finished_at TEXT NOT NULL,
                CHECK (finished_at > started_at)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS reps (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                set_id INTEGER NOT NULL UNIQUE REFERENCES sets(id) ON DELETE CASCADE,
                count INTEGER NOT NULL CHECK (count BETWEEN 1 AND 1000),
                intensity TEXT NOT NULL CHECK (intensity IN ('low', 'medium', 'high')),
                weight INTEGER CHECK (weight IS NULL OR weight BETWEEN 0 AND 10000)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workouts_session_id ON workouts(session_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sets_workout_id ON sets(workout_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Write a complete session graph atomically and return it reloaded
    ///
    /// The reload runs inside the same transaction, so the returned record is
    /// exactly what was committed. Transient lock errors re-run the whole unit.
    ///
    /// # Errors
    ///
    /// Returns a database error if any write fails; nothing is committed then
    pub async fn persist_session_graph(&self, graph: &NewSession) -> AppResult<SessionRecord> {
        let record =
            retry_transaction(|| self.write_session_graph(graph), MAX_WRITE_ATTEMPTS).await?;

        info!(
            user.id = record.user_id,
            session.id = record.id,
            workouts = record.workouts.len(),
            sets = record.total_sets(),
            "Session graph committed"
        );
        Ok(record)
    }

    async fn write_session_graph(&self, graph: &NewSession) -> AppResult<SessionRecord> {
        let mut guard = TransactionGuard::new(self.pool.begin().await?);

        let written = insert_session_graph(guard.executor()?, graph).await;
        match written {
            Ok(record) => {
                guard.commit().await?;
                Ok(record)
            }
            Err(error) => {
                if let Err(rollback_error) = guard.rollback().await {
                    warn!(error = %rollback_error, "Rollback after failed session write also failed");
                }
                Err(error)
            }
        }
    }
}

/// Insert every row of `graph` and reload it on the same connection
async fn insert_session_graph(
    conn: &mut SqliteConnection,
    graph: &NewSession,
) -> AppResult<SessionRecord> {
    let session_id = sqlx::query(
        "INSERT INTO sessions (user_id, started_at, finished_at, notes) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(graph.user_id)
    .bind(format_timestamp(graph.started_at))
    .bind(format_timestamp(graph.finished_at))
    .bind(graph.notes.as_deref())
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    for workout in &graph.workouts {
        let workout_id = sqlx::query(
            "INSERT INTO workouts (session_id, name, started_at, finished_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(session_id)
        .bind(&workout.name)
        .bind(format_timestamp(workout.started_at))
        .bind(format_timestamp(workout.finished_at))
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

        for set in &workout.sets {
            let set_id = sqlx::query(
                "INSERT INTO sets (workout_id, started_at, finished_at) VALUES (?1, ?2, ?3)",
            )
            .bind(workout_id)
            .bind(format_timestamp(set.started_at))
            .bind(format_timestamp(set.finished_at))
            .execute(&mut *conn)
            .await?
            .last_insert_rowid();

            sqlx::query(
                "INSERT INTO reps (set_id, count, intensity, weight) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(set_id)
            .bind(i64::from(set.reps.count))
            .bind(set.reps.intensity.as_str())
            .bind(set.reps.weight.map(i64::from))
            .execute(&mut *conn)
            .await?;
        }
    }
    debug!(session.id = session_id, "Session graph written, reloading");

    let rows = fetch_session_rows(
        &mut *conn,
        SessionScope::Single {
            session_id,
            owner_id: graph.user_id,
        },
    )
    .await?;
    assemble_sessions(rows)?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::internal("Written session could not be reloaded"))
}

impl Database {
    /// Every session owned by `user_id`, fully populated, ordered by start time
    ///
    /// An identity with no sessions yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns a database error if the read fails
    pub async fn list_sessions_for_user(&self, user_id: i64) -> AppResult<Vec<SessionRecord>> {
        let mut conn = self.pool.acquire().await?;
        let rows = fetch_session_rows(&mut conn, SessionScope::Owner(user_id)).await?;
        assemble_sessions(rows)
    }

    /// One session, only if owned by `owner_id`
    ///
    /// # Errors
    ///
    /// Returns a database error if the read fails
    pub async fn get_session(
        &self,
        session_id: i64,
        owner_id: i64,
    ) -> AppResult<Option<SessionRecord>> {
        let mut conn = self.pool.acquire().await?;
        let rows = fetch_session_rows(
            &mut conn,
            SessionScope::Single {
                session_id,
                owner_id,
            },
        )
        .await?;
        Ok(assemble_sessions(rows)?.into_iter().next())
    }

    /// Delete one owned session and its subtree
    ///
    /// # Errors
    ///
    /// Returns a database error if the statement fails
    pub async fn delete_session(&self, session_id: i64, owner_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?1 AND user_id = ?2")
            .bind(session_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn fetch_session_rows(
    conn: &mut SqliteConnection,
    scope: SessionScope,
) -> AppResult<Vec<JoinedRow>> {
    let rows = match scope {
        SessionScope::Owner(owner_id) => {
            let sql = format!("{SESSION_TREE_QUERY} WHERE s.user_id = ?1 {SESSION_TREE_ORDER}");
            sqlx::query(&sql).bind(owner_id).fetch_all(&mut *conn).await?
        }
        SessionScope::Single {
            session_id,
            owner_id,
        } => {
            let sql = format!(
                "{SESSION_TREE_QUERY} WHERE s.id = ?1 AND s.user_id = ?2 {SESSION_TREE_ORDER}"
            );
            sqlx::query(&sql)
                .bind(session_id)
                .bind(owner_id)
                .fetch_all(&mut *conn)
                .await?
        }
    };

    rows.iter().map(row_to_joined).collect()
}

fn row_to_joined(row: &SqliteRow) -> AppResult<JoinedRow> {
    let session = SessionColumns {
        id: row.try_get("session_id")?,
        user_id: row.try_get("user_id")?,
        started_at: timestamp_column(row, "session_started_at")?,
        finished_at: timestamp_column(row, "session_finished_at")?,
        notes: row.try_get("notes")?,
    };

    let workout = match row.try_get::<Option<i64>, _>("workout_id")? {
        Some(id) => Some(WorkoutColumns {
            id,
            name: row.try_get("workout_name")?,
            started_at: timestamp_column(row, "workout_started_at")?,
            finished_at: timestamp_column(row, "workout_finished_at")?,
        }),
        None => None,
    };

    let set = match row.try_get::<Option<i64>, _>("set_id")? {
        Some(id) => Some(SetColumns {
            id,
            started_at: timestamp_column(row, "set_started_at")?,
            finished_at: timestamp_column(row, "set_finished_at")?,
        }),
        None => None,
    };

    let reps = match row.try_get::<Option<i64>, _>("reps_id")? {
        Some(id) => Some(row_to_reps(row, id)?),
        None => None,
    };

    Ok(JoinedRow {
        session,
        workout,
        set,
        reps,
    })
}

fn row_to_reps(row: &SqliteRow, id: i64) -> AppResult<RepsRecord> {
    let count: i64 = row.try_get("reps_count")?;
    let intensity: String = row.try_get("reps_intensity")?;
    let weight: Option<i64> = row.try_get("reps_weight")?;

    Ok(RepsRecord {
        id,
        count: u32::try_from(count)
            .map_err(|_| AppError::internal(format!("Corrupt stored rep count {count}")))?,
        intensity: Intensity::parse(&intensity)
            .ok_or_else(|| AppError::internal(format!("Corrupt stored intensity '{intensity}'")))?,
        weight: weight
            .map(|w| {
                u32::try_from(w)
                    .map_err(|_| AppError::internal(format!("Corrupt stored weight {w}")))
            })
            .transpose()?,
    })
}

fn timestamp_column(row: &SqliteRow, column: &str) -> AppResult<DateTime<Utc>> {
    let raw: String = row.try_get(column)?;
    parse_timestamp(&raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 9, minute, 0).unwrap()
    }

    fn session(id: i64) -> SessionColumns {
        SessionColumns {
            id,
            user_id: 1,
            started_at: at(0),
            finished_at: at(50),
            notes: None,
        }
    }

    fn workout(id: i64) -> WorkoutColumns {
        WorkoutColumns {
            id,
            name: format!("w{id}"),
            started_at: at(0),
            finished_at: at(30),
        }
    }

    fn set_and_reps(id: i64) -> (Option<SetColumns>, Option<RepsRecord>) {
        (
            Some(SetColumns {
                id,
                started_at: at(1),
                finished_at: at(2),
            }),
            Some(RepsRecord {
                id: id * 10,
                count: 5,
                intensity: Intensity::Low,
                weight: None,
            }),
        )
    }

    fn row(session_id: i64, workout_id: Option<i64>, set_id: Option<i64>) -> JoinedRow {
        let (set, reps) = set_id.map_or((None, None), set_and_reps);
        JoinedRow {
            session: session(session_id),
            workout: workout_id.map(workout),
            set,
            reps,
        }
    }

    #[test]
    fn test_assembles_nested_groups_in_order() {
        let rows = vec![
            row(1, Some(10), Some(100)),
            row(1, Some(10), Some(101)),
            row(1, Some(11), Some(102)),
            row(2, Some(12), Some(103)),
        ];
        let sessions = assemble_sessions(rows).unwrap();

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].workouts.len(), 2);
        assert_eq!(sessions[0].workouts[0].sets.len(), 2);
        assert_eq!(sessions[0].workouts[0].sets[1].id, 101);
        assert_eq!(sessions[0].workouts[1].sets[0].reps.id, 1020);
        assert_eq!(sessions[1].total_sets(), 1);
    }

    #[test]
    fn test_empty_levels_are_kept_empty() {
        let sessions = assemble_sessions(vec![row(1, None, None), row(2, Some(20), None)]).unwrap();
        assert!(sessions[0].workouts.is_empty());
        assert!(sessions[1].workouts[0].sets.is_empty());
        assert!(assemble_sessions(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_set_without_reps_is_an_error() {
        let mut broken = row(1, Some(10), Some(100));
        broken.reps = None;
        assert!(assemble_sessions(vec![broken]).is_err());
    }
}
