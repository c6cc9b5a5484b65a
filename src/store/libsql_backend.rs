//! libSQL backend — async `SessionStore` implementation.
//!
//! Supports local file and in-memory databases. The in-memory variant is
//! used throughout the tests.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::info;

use crate::error::DatabaseError;
use crate::flow::{ChatMessage, ConversationState, FlowNode, Program};
use crate::store::migrations;
use crate::store::traits::SessionStore;

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        migrations::run_migrations(&conn).await?;
        info!(path = %path.display(), "Database opened");

        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        migrations::run_migrations(&conn).await?;

        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Map a row to a `ConversationState`.
///
/// Column order matches `STATE_COLUMNS`:
/// 0:session_id, 1:program, 2:beneficiary_name, 3:beneficiary_age,
/// 4:assistance_request, 5:messages, 6:current_node, 7:webhook_sent
fn row_to_state(row: &libsql::Row) -> Result<ConversationState, DatabaseError> {
    let session_id: String = row
        .get(0)
        .map_err(|e| DatabaseError::Query(format!("Failed to read session_id: {e}")))?;

    let program: Option<Program> = row
        .get::<String>(1)
        .ok()
        .and_then(|s| Program::parse(&s));

    let beneficiary_name: Option<String> = row.get(2).ok();
    let beneficiary_age: Option<u32> = row.get::<i64>(3).ok().and_then(|n| u32::try_from(n).ok());
    let assistance_request: Option<String> = row.get(4).ok();

    let messages_json: String = row
        .get(5)
        .map_err(|e| DatabaseError::Query(format!("Failed to read messages: {e}")))?;
    let messages: Vec<ChatMessage> = serde_json::from_str(&messages_json)
        .map_err(|e| DatabaseError::Serialization(format!("Invalid message history: {e}")))?;

    let current_node = row
        .get::<String>(6)
        .map(|s| FlowNode::parse_or_start(&s))
        .unwrap_or(FlowNode::Start);

    let webhook_sent = row.get::<i64>(7).unwrap_or(0) != 0;

    Ok(ConversationState {
        session_id,
        messages,
        program,
        beneficiary_name,
        beneficiary_age,
        assistance_request,
        current_node,
        webhook_sent,
    })
}

const STATE_COLUMNS: &str = "session_id, program, beneficiary_name, beneficiary_age, \
     assistance_request, messages, current_node, webhook_sent";

#[async_trait]
impl SessionStore for LibSqlBackend {
    async fn load_session(
        &self,
        session_id: &str,
    ) -> Result<Option<ConversationState>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {STATE_COLUMNS} FROM conversations WHERE session_id = ?1"),
                params![session_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to load session: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to read session row: {e}")))?;

        match row {
            Some(row) => Ok(Some(row_to_state(&row)?)),
            None => Ok(None),
        }
    }

    async fn save_session(&self, state: &ConversationState) -> Result<(), DatabaseError> {
        let messages_json = serde_json::to_string(&state.messages)
            .map_err(|e| DatabaseError::Serialization(format!("Message history: {e}")))?;

        self.conn()
            .execute(
                "INSERT INTO conversations
                     (session_id, program, beneficiary_name, beneficiary_age,
                      assistance_request, messages, current_node, webhook_sent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(session_id) DO UPDATE SET
                     program = excluded.program,
                     beneficiary_name = excluded.beneficiary_name,
                     beneficiary_age = excluded.beneficiary_age,
                     assistance_request = excluded.assistance_request,
                     messages = excluded.messages,
                     current_node = excluded.current_node,
                     webhook_sent = excluded.webhook_sent,
                     updated_at = datetime('now')",
                params![
                    state.session_id.as_str(),
                    state.program.map(|p| p.as_str()),
                    state.beneficiary_name.clone(),
                    state.beneficiary_age.map(i64::from),
                    state.assistance_request.clone(),
                    messages_json,
                    state.current_node.as_str(),
                    state.webhook_sent as i64,
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("Failed to save session: {e}")))?;

        Ok(())
    }
}
