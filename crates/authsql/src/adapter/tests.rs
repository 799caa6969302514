use super::*;
use crate::client::SqlClient;
use crate::sql::Dialect;
use crate::transform::CoerceBool;
use crate::value::{Scalar, Value};
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    All(String, Vec<Scalar>),
    First(String, Vec<Scalar>),
    Run(String, Vec<Scalar>),
}

enum Reply {
    Rows(Vec<Row>),
    Changes(u64),
    Fail(&'static str),
}

/// Records every statement and answers from a script.
struct MockClient {
    dialect: Dialect,
    calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl MockClient {
    fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            dialect: Dialect::Sqlite,
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn postgres(mut self) -> Self {
        self.dialect = Dialect::Postgres;
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Reply {
        self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Rows(Vec::new()))
    }

    fn rows(&self) -> AdapterResult<Vec<Row>> {
        match self.next_reply() {
            Reply::Rows(rows) => Ok(rows),
            Reply::Changes(_) => Ok(Vec::new()),
            Reply::Fail(msg) => Err(AdapterError::backend(msg)),
        }
    }
}

impl SqlClient for MockClient {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn all(&self, sql: &str, params: &[Scalar]) -> AdapterResult<Vec<Row>> {
        self.calls.lock().unwrap().push(Call::All(sql.to_string(), params.to_vec()));
        self.rows()
    }

    async fn first(&self, sql: &str, params: &[Scalar]) -> AdapterResult<Option<Row>> {
        self.calls.lock().unwrap().push(Call::First(sql.to_string(), params.to_vec()));
        Ok(self.rows()?.into_iter().next())
    }

    async fn run(&self, sql: &str, params: &[Scalar]) -> AdapterResult<u64> {
        self.calls.lock().unwrap().push(Call::Run(sql.to_string(), params.to_vec()));
        match self.next_reply() {
            Reply::Changes(n) => Ok(n),
            Reply::Rows(rows) => Ok(rows.len() as u64),
            Reply::Fail(msg) => Err(AdapterError::backend(msg)),
        }
    }
}

fn row(columns: &[(&str, Scalar)]) -> Row {
    columns.iter().cloned().collect()
}

fn text(s: &str) -> Scalar {
    Scalar::Text(s.to_string())
}

fn data(pairs: &[(&str, Value)]) -> Data {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[tokio::test]
async fn create_returns_normalized_row() {
    let client = MockClient::new([Reply::Rows(vec![row(&[
        ("userId", text("u1")),
        ("email", text("a@b.com")),
    ])])]);
    let adapter = Adapter::new(&client);

    let created = adapter
        .create("user", &data(&[("userId", "u1".into()), ("email", "a@b.com".into())]), &[])
        .await
        .unwrap();

    assert_eq!(created.get("id"), Some(&text("u1")));
    assert_eq!(created.get("userId"), Some(&text("u1")));
    assert_eq!(
        client.calls(),
        vec![Call::First(
            "INSERT INTO User (email, userId) VALUES (?, ?) RETURNING *".to_string(),
            vec![text("a@b.com"), text("u1")],
        )]
    );
}

#[tokio::test]
async fn create_without_row_is_not_created() {
    let client = MockClient::new([Reply::Rows(Vec::new())]);
    let adapter = Adapter::new(&client);

    let err = adapter
        .create("user", &data(&[("email", "a@b.com".into())]), &[])
        .await
        .unwrap_err();

    assert!(err.is_not_created());
    assert!(!err.is_backend());
}

#[tokio::test]
async fn find_one_returns_none_without_error() {
    let client = MockClient::empty();
    let adapter = Adapter::new(&client);

    let found = adapter
        .find_one("session", &[Predicate::eq("id", 5)], &[])
        .await
        .unwrap();

    assert!(found.is_none());
    assert_eq!(
        client.calls(),
        vec![Call::First(
            "SELECT * FROM Session WHERE sessionId = ? LIMIT 1".to_string(),
            vec![Scalar::Int(5)],
        )]
    );
}

#[tokio::test]
async fn find_many_normalizes_every_row() {
    let client = MockClient::new([Reply::Rows(vec![
        row(&[("memberId", Scalar::Int(1))]),
        row(&[("memberId", Scalar::Int(2))]),
    ])]);
    let adapter = Adapter::new(&client);

    let rows = adapter
        .find_many("member", &[], 100, Some(&SortBy::asc("id")), Some(10))
        .await
        .unwrap();

    let ids: Vec<_> = rows.iter().map(|r| r.get_i64("id")).collect();
    assert_eq!(ids, vec![Some(1), Some(2)]);
    assert_eq!(
        client.calls(),
        vec![Call::All(
            "SELECT * FROM Member ORDER BY memberId asc LIMIT 100 OFFSET 10".to_string(),
            vec![],
        )]
    );
}

#[tokio::test]
async fn update_binds_set_then_where() {
    let expires = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let client = MockClient::new([Reply::Rows(vec![row(&[("sessionId", text("s1"))])])]);
    let adapter = Adapter::new(&client);

    let updated = adapter
        .update("session", &[Predicate::eq("token", "t")], &data(&[("expiresAt", expires.into())]))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.get("id"), Some(&text("s1")));
    assert_eq!(
        client.calls(),
        vec![Call::First(
            "UPDATE Session SET expiresAt = ? WHERE token = ? RETURNING *".to_string(),
            vec![text("2030-01-01T00:00:00.000Z"), text("t")],
        )]
    );
}

#[tokio::test]
async fn update_many_reports_backend_changes() {
    let client = MockClient::new([Reply::Changes(3)]);
    let adapter = Adapter::new(&client);

    let changed = adapter
        .update_many("user", &[Predicate::eq("banned", true)], &data(&[("banned", false.into())]))
        .await
        .unwrap();

    assert_eq!(changed, 3);
    assert_eq!(
        client.calls(),
        vec![Call::Run(
            "UPDATE User SET banned = ? WHERE banned = ?".to_string(),
            vec![Scalar::Bool(false), Scalar::Bool(true)],
        )]
    );
}

#[tokio::test]
async fn empty_update_never_reaches_backend() {
    let client = MockClient::empty();
    let adapter = Adapter::new(&client);

    let err = adapter.update("user", &[], &Data::new()).await.unwrap_err();

    assert!(matches!(err, AdapterError::Validation(_)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn delete_is_fire_and_forget() {
    let client = MockClient::new([Reply::Changes(9)]);
    let adapter = Adapter::new(&client);

    adapter.delete("verification", &[]).await.unwrap();

    assert_eq!(
        client.calls(),
        vec![Call::Run("DELETE FROM Verification".to_string(), vec![])]
    );
}

#[tokio::test]
async fn delete_many_counts_returned_rows_not_changes() {
    // One organization matched; the backend would report 4 changes with cascades.
    let client = MockClient::new([Reply::Rows(vec![row(&[("organizationId", text("o1"))])])]);
    let adapter = Adapter::new(&client);

    let deleted = adapter
        .delete_many("organization", &[Predicate::eq("id", "o1")])
        .await
        .unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(
        client.calls(),
        vec![Call::All(
            "DELETE FROM Organization WHERE organizationId = ? RETURNING *".to_string(),
            vec![text("o1")],
        )]
    );
}

#[tokio::test]
async fn count_reads_count_column() {
    let client = MockClient::new([Reply::Rows(vec![row(&[("count", Scalar::Int(12))])])]);
    let adapter = Adapter::new(&client);

    let n = adapter.count("invitation", &[]).await.unwrap();

    assert_eq!(n, 12);
    assert_eq!(
        client.calls(),
        vec![Call::First("SELECT COUNT(*) AS count FROM Invitation".to_string(), vec![])]
    );
}

#[tokio::test]
async fn count_without_row_is_count_missing() {
    let client = MockClient::new([Reply::Rows(Vec::new())]);
    let adapter = Adapter::new(&client);

    let err = adapter.count("invitation", &[]).await.unwrap_err();

    assert!(err.is_count_missing());
}

#[tokio::test]
async fn backend_failures_propagate_unchanged() {
    let client = MockClient::new([Reply::Fail("database is locked")]);
    let adapter = Adapter::new(&client);

    let err = adapter.find_one("user", &[], &[]).await.unwrap_err();

    assert!(err.is_backend());
    assert_eq!(err.to_string(), "Backend error: database is locked");
}

#[tokio::test]
async fn invalid_identifiers_fail_before_backend() {
    let client = MockClient::empty();
    let adapter = Adapter::new(&client);

    let err = adapter
        .find_one("user", &[Predicate::eq("email OR 1=1", "x")], &[])
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::InvalidIdentifier(_)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn transforms_run_after_id_mirroring_in_order() {
    let client = MockClient::new([Reply::Rows(vec![row(&[
        ("userId", Scalar::Int(7)),
        ("emailVerified", Scalar::Int(1)),
    ])])]);
    let config = AdapterConfig::new()
        .transform(CoerceBool::new(["emailVerified"]))
        .transform(|_: &ModelName, row: &mut Row| -> AdapterResult<()> {
            // Sees the coerced value and the mirrored id.
            let verified = row.get_bool("emailVerified") == Some(true);
            let has_id = row.contains("id");
            row.insert("checked", Scalar::Bool(verified && has_id));
            Ok(())
        });
    let adapter = Adapter::with_config(&client, config);

    let user = adapter.find_one("user", &[], &[]).await.unwrap().unwrap();

    assert_eq!(user.get_bool("checked"), Some(true));
}

#[tokio::test]
async fn postgres_dialect_renders_numbered_placeholders() {
    let client = MockClient::new([Reply::Changes(1)]).postgres();
    let adapter = Adapter::new(&client);

    adapter
        .update_many(
            "member",
            &[Predicate::eq("organizationId", "o1"), Predicate::eq("id", "m1")],
            &data(&[("role", "admin".into())]),
        )
        .await
        .unwrap();

    assert_eq!(
        client.calls(),
        vec![Call::Run(
            r#"UPDATE "Member" SET "role" = $1 WHERE "organizationId" = $2 and "memberId" = $3"#
                .to_string(),
            vec![text("admin"), text("o1"), text("m1")],
        )]
    );
}
