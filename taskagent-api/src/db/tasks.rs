//! Task persistence
//!
//! Row mapping is explicit: enum columns decode through the closed types
//! in taskagent-common, so a row that violates the domain invariants is a
//! hard error rather than a silently coerced value.

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use taskagent_common::{Category, Priority, PrioritySource};

use crate::models::{NewTask, TaskView};

const TASK_COLUMNS: &str = "guid, name, due_date, priority, category, confidence_score, \
     priority_source, embedding, created_at, updated_at";

/// Stored task record
#[derive(Debug, Clone)]
pub struct Task {
    pub guid: Uuid,
    pub name: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub category: Category,
    pub confidence_score: u8,
    pub priority_source: PrioritySource,
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        TaskView {
            id: task.guid,
            name: task.name,
            due_date: task.due_date,
            priority: task.priority,
            category: task.category,
            confidence_score: task.confidence_score,
            priority_source: task.priority_source,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Changes to apply to a stored task; `None` leaves a field untouched.
///
/// `due_date` is doubly optional: `Some(None)` clears the date.
#[derive(Debug, Default)]
pub struct TaskChanges {
    pub name: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
}

fn task_from_row(row: &SqliteRow) -> Result<Task> {
    let guid: String = row.try_get("guid")?;
    let priority: String = row.try_get("priority")?;
    let priority_source: String = row.try_get("priority_source")?;
    let category: String = row.try_get("category")?;
    let confidence_score: i64 = row.try_get("confidence_score")?;
    let embedding: Option<String> = row.try_get("embedding")?;

    Ok(Task {
        guid: Uuid::parse_str(&guid).map_err(|e| anyhow!("invalid task guid {guid:?}: {e}"))?,
        name: row.try_get("name")?,
        due_date: row.try_get("due_date")?,
        priority: Priority::parse_known(&priority)
            .ok_or_else(|| anyhow!("invalid priority in row: {priority:?}"))?,
        category: Category::parse_lossy(&category),
        confidence_score: u8::try_from(confidence_score)
            .map_err(|_| anyhow!("confidence_score out of range: {confidence_score}"))?,
        priority_source: PrioritySource::parse(&priority_source)
            .ok_or_else(|| anyhow!("invalid priority_source in row: {priority_source:?}"))?,
        embedding: embedding
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|e| anyhow!("invalid embedding payload: {e}"))?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Insert a finalized task, returning the stored record
pub async fn insert_task(
    pool: &SqlitePool,
    new_task: &NewTask,
    embedding: Option<&[f32]>,
) -> Result<Task> {
    let guid = Uuid::new_v4();
    let now = Utc::now();
    let embedding_json = embedding.map(serde_json::to_string).transpose()?;

    sqlx::query(
        r#"
        INSERT INTO tasks (
            guid, name, due_date, priority, category,
            confidence_score, priority_source, embedding, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(guid.to_string())
    .bind(&new_task.name)
    .bind(new_task.due_date)
    .bind(new_task.priority.as_str())
    .bind(new_task.category.as_str())
    .bind(i64::from(new_task.confidence_score))
    .bind(new_task.priority_source.as_str())
    .bind(embedding_json)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Task {
        guid,
        name: new_task.name.clone(),
        due_date: new_task.due_date,
        priority: new_task.priority,
        category: new_task.category,
        confidence_score: new_task.confidence_score,
        priority_source: new_task.priority_source,
        embedding: embedding.map(<[f32]>::to_vec),
        created_at: now,
        updated_at: now,
    })
}

/// Fetch a task by id
pub async fn get_task(pool: &SqlitePool, guid: Uuid) -> Result<Option<Task>> {
    let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE guid = ?"))
        .bind(guid.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(task_from_row).transpose()
}

/// List all tasks, newest first
pub async fn list_tasks(pool: &SqlitePool) -> Result<Vec<Task>> {
    list_tasks_filtered(pool, None, None).await
}

/// List tasks matching the given filters, newest first
pub async fn list_tasks_filtered(
    pool: &SqlitePool,
    priority: Option<Priority>,
    category: Option<Category>,
) -> Result<Vec<Task>> {
    let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks");
    let mut clauses = Vec::new();
    if priority.is_some() {
        clauses.push("priority = ?");
    }
    if category.is_some() {
        clauses.push("category = ?");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut query = sqlx::query(&sql);
    if let Some(priority) = priority {
        query = query.bind(priority.as_str());
    }
    if let Some(category) = category {
        query = query.bind(category.as_str());
    }

    let rows = query.fetch_all(pool).await?;
    rows.iter().map(task_from_row).collect()
}

/// Apply changes to a task.
///
/// Returns the updated record, or `None` when the task does not exist.
pub async fn update_task(
    pool: &SqlitePool,
    guid: Uuid,
    changes: TaskChanges,
) -> Result<Option<Task>> {
    let Some(mut task) = get_task(pool, guid).await? else {
        return Ok(None);
    };

    if let Some(name) = changes.name {
        task.name = name;
    }
    if let Some(due_date) = changes.due_date {
        task.due_date = due_date;
    }
    if let Some(priority) = changes.priority {
        task.priority = priority;
    }
    if let Some(category) = changes.category {
        task.category = category;
    }
    task.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE tasks
        SET name = ?, due_date = ?, priority = ?, category = ?, updated_at = ?
        WHERE guid = ?
        "#,
    )
    .bind(&task.name)
    .bind(task.due_date)
    .bind(task.priority.as_str())
    .bind(task.category.as_str())
    .bind(task.updated_at)
    .bind(guid.to_string())
    .execute(pool)
    .await?;

    Ok(Some(task))
}

/// Delete a task by id; false when nothing was deleted
pub async fn delete_task(pool: &SqlitePool, guid: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM tasks WHERE guid = ?")
        .bind(guid.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
