use sqlchain::prelude::*;
use sqlchain::FixedClock;
use std::sync::Mutex;

/// Records every call and answers queries with canned rows.
#[derive(Default)]
struct RecordingExecutor {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    rows: Vec<i64>,
    fail: bool,
}

impl RecordingExecutor {
    fn with_rows(rows: Vec<i64>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Executor for RecordingExecutor {
    type Row = i64;

    async fn query(&self, sql: &str, params: &[Value]) -> SqlResult<Vec<i64>> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        if self.fail {
            return Err(SqlError::Other("connection reset".to_string()));
        }
        let limit = if sql.ends_with("LIMIT 1") { 1 } else { usize::MAX };
        Ok(self.rows.iter().copied().take(limit).collect())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> SqlResult<u64> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        if self.fail {
            return Err(SqlError::Other("connection reset".to_string()));
        }
        Ok(3)
    }
}

fn db() -> Db {
    Db::with_config(BuilderConfig::new().with_clock(FixedClock(100)))
}

#[tokio::test]
async fn get_sends_compiled_sql_and_params() {
    let exec = RecordingExecutor::with_rows(vec![1, 2, 3]);
    let q = db().table("user").where_("deleted", "=", 0).unwrap();

    let rows = q.get(&exec).await.unwrap();
    assert_eq!(rows, vec![1, 2, 3]);
    assert_eq!(
        exec.calls(),
        vec![("SELECT * FROM {user} WHERE deleted = ?".to_string(), vec![Value::Int(0)])]
    );
}

#[tokio::test]
async fn first_limits_a_copy() {
    let exec = RecordingExecutor::with_rows(vec![7, 8]);
    let q = db().table("user").order_asc("id");

    let row = q.first(&exec).await.unwrap();
    assert_eq!(row, Some(7));
    assert_eq!(exec.calls()[0].0, "SELECT * FROM {user} ORDER BY id ASC LIMIT 1");

    // The statement itself keeps its shape.
    assert_eq!(q.to_sql(), "SELECT * FROM {user} ORDER BY id ASC");
}

#[tokio::test]
async fn first_returns_none_when_empty() {
    let exec = RecordingExecutor::default();
    let row = db().table("user").first(&exec).await.unwrap();
    assert_eq!(row, None);
}

#[tokio::test]
async fn find_matches_identity_column() {
    let exec = RecordingExecutor::with_rows(vec![42]);
    let q = db().table("user").where_("deleted", "=", 0).unwrap();

    let row = q.find(&exec, 42).await.unwrap();
    assert_eq!(row, Some(42));
    assert_eq!(
        exec.calls()[0],
        (
            "SELECT * FROM {user} WHERE deleted = ? AND id = ? LIMIT 1".to_string(),
            vec![Value::Int(0), Value::Int(42)]
        )
    );
}

#[tokio::test]
async fn find_uses_configured_identity_column() {
    let exec = RecordingExecutor::default();
    let db = Db::with_config(BuilderConfig::postgres().with_identity_column("uuid"));

    let row = db.table("user").find(&exec, "abc").await.unwrap();
    assert_eq!(row, None);
    assert_eq!(exec.calls()[0].0, r#"SELECT * FROM "user" WHERE uuid = $1 LIMIT 1"#);
}

#[tokio::test]
async fn update_executes_with_set_params_first() {
    let exec = RecordingExecutor::default();
    let affected = db()
        .update("user")
        .where_("id", "=", 5)
        .unwrap()
        .update(&exec, [("suspended", 1), ("timemodified", 100)])
        .await
        .unwrap();

    assert_eq!(affected, 3);
    assert_eq!(
        exec.calls()[0],
        (
            "UPDATE {user} SET suspended = ?, timemodified = ? WHERE id = ?".to_string(),
            vec![Value::Int(1), Value::Int(100), Value::Int(5)]
        )
    );
}

#[tokio::test]
async fn update_without_set_is_refused() {
    let exec = RecordingExecutor::default();
    let err = db()
        .update("user")
        .where_("id", "=", 5)
        .unwrap()
        .execute(&exec)
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(exec.calls().is_empty());
}

#[tokio::test]
async fn delete_without_where_is_refused() {
    let exec = RecordingExecutor::default();
    let err = db().delete("sessions").execute(&exec).await.unwrap_err();
    assert!(err.is_validation());
    assert!(exec.calls().is_empty());

    let affected = db()
        .delete("sessions")
        .allow_delete_all(true)
        .execute(&exec)
        .await
        .unwrap();
    assert_eq!(affected, 3);
    assert_eq!(exec.calls()[0].0, "DELETE FROM {sessions}");
}

#[tokio::test]
async fn executor_errors_propagate_unchanged() {
    let exec = RecordingExecutor::failing();
    let err = db().table("user").get(&exec).await.unwrap_err();
    assert_eq!(err.to_string(), "connection reset");
}
