//! Record store contract for the site's content tables.
//!
//! Windows only need enough of the backend to resolve the resource a route
//! points at, so the contract is a small select/insert/update/delete surface
//! plus change subscriptions. [`MemoryStore`] keeps everything in process.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Posts,
    CommunityChannels,
    CommunityPosts,
    CommunityReplies,
    CommunityLikes,
    Profiles,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Posts,
        Table::CommunityChannels,
        Table::CommunityPosts,
        Table::CommunityReplies,
        Table::CommunityLikes,
        Table::Profiles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Posts => "posts",
            Table::CommunityChannels => "community_channels",
            Table::CommunityPosts => "community_posts",
            Table::CommunityReplies => "community_replies",
            Table::CommunityLikes => "community_likes",
            Table::Profiles => "profiles",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    fn required_fields(self) -> &'static [&'static str] {
        match self {
            Table::Posts => &["title", "slug"],
            Table::CommunityChannels => &["name", "slug"],
            Table::CommunityPosts => &["channel_id", "title"],
            Table::CommunityReplies => &["post_id", "content"],
            Table::CommunityLikes => &["post_id", "user_id"],
            Table::Profiles => &["username"],
        }
    }

    // Column sets that must be unique within the table.
    fn unique_fields(self) -> &'static [&'static str] {
        match self {
            Table::Posts => &["slug"],
            Table::CommunityChannels => &["slug"],
            Table::CommunityLikes => &["post_id", "user_id"],
            Table::Profiles => &["username"],
            Table::CommunityPosts | Table::CommunityReplies => &[],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

pub type Fields = BTreeMap<String, Value>;

/// Build a [`Fields`] map from `(column, value)` pairs.
pub fn fields<I, K, V>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    pub fields: Fields,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        if field == "id" {
            return None;
        }
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_text)
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        if field == "id" {
            return Some(self.id);
        }
        self.get(field).and_then(Value::as_int)
    }

    fn value_of(&self, field: &str) -> Option<Value> {
        if field == "id" {
            Some(Value::Int(self.id))
        } else {
            self.fields.get(field).cloned()
        }
    }
}

/// Equality filter with optional ordering and limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
    order_by: Option<(String, bool)>,
    limit: Option<usize>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn order(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order_by = Some((field.into(), ascending));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| record.value_of(field).as_ref() == Some(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub table: Table,
    pub kind: ChangeKind,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no record {id} in {table}")]
    UnknownRecord { table: Table, id: i64 },
    #[error("{table} requires field `{field}`")]
    MissingField { table: Table, field: &'static str },
    #[error("{table} already has a record with the same {fields}")]
    Duplicate { table: Table, fields: String },
    #[error("field `id` is assigned by the store")]
    ReservedField,
}

pub trait RecordStore {
    fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Record>, StoreError>;
    fn insert(&mut self, table: Table, fields: Fields) -> Result<Record, StoreError>;
    fn update(&mut self, table: Table, id: i64, fields: Fields) -> Result<Record, StoreError>;
    fn delete(&mut self, table: Table, id: i64) -> Result<(), StoreError>;
    /// Receive a [`Change`] for every later mutation of `table`.
    fn subscribe(&mut self, table: Table) -> Receiver<Change>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<Table, BTreeMap<i64, Fields>>,
    next_id: i64,
    subscribers: HashMap<Table, Vec<Sender<Change>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with a handful of demo records.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        let seed: [(Table, Fields); 9] = [
            (
                Table::Profiles,
                fields([("username", "ada"), ("avatar_url", "")]),
            ),
            (
                Table::Profiles,
                fields([("username", "linus"), ("avatar_url", "")]),
            ),
            (
                Table::Posts,
                fields([
                    ("title", "Hello, desktop"),
                    ("slug", "hello-desktop"),
                    ("content", "Windows all the way down."),
                    ("author", "ada"),
                ]),
            ),
            (
                Table::Posts,
                fields([
                    ("title", "Snapping windows"),
                    ("slug", "snapping-windows"),
                    ("content", "Drag a window past the edge to split the screen."),
                    ("author", "linus"),
                ]),
            ),
            (
                Table::CommunityChannels,
                fields([("name", "General"), ("slug", "general")]),
            ),
            (
                Table::CommunityChannels,
                fields([("name", "Rust"), ("slug", "rust")]),
            ),
            (
                Table::CommunityPosts,
                fields([
                    ("title", "How do I restore a maximized window?"),
                    ("content", "Double click the header."),
                    ("post_slug", "general"),
                ]),
            ),
            (
                Table::CommunityPosts,
                fields([
                    ("title", "Borrowing across callbacks"),
                    ("content", "Pass the registry in instead."),
                    ("post_slug", "rust"),
                ]),
            ),
            (
                Table::CommunityReplies,
                fields([("content", "Or press the [+] button.")]),
            ),
        ];
        for (table, mut record) in seed {
            match table {
                Table::CommunityPosts => {
                    let channel = match record.get("post_slug").and_then(Value::as_text) {
                        Some("rust") => 6,
                        _ => 5,
                    };
                    record.insert("channel_id".into(), Value::Int(channel));
                }
                Table::CommunityReplies => {
                    record.insert("post_id".into(), Value::Int(7));
                }
                _ => {}
            }
            if let Err(err) = store.insert(table, record) {
                tracing::warn!(%table, %err, "failed to seed record");
            }
        }
        store
    }

    pub fn len(&self, table: Table) -> usize {
        self.tables.get(&table).map_or(0, BTreeMap::len)
    }

    fn notify(&mut self, table: Table, kind: ChangeKind, id: i64) {
        let Some(senders) = self.subscribers.get_mut(&table) else {
            return;
        };
        senders.retain(|tx| tx.send(Change { table, kind, id }).is_ok());
    }

    fn check_unique(
        &self,
        table: Table,
        id: Option<i64>,
        record: &Fields,
    ) -> Result<(), StoreError> {
        let unique = table.unique_fields();
        if unique.is_empty() {
            return Ok(());
        }
        let clash = self
            .tables
            .get(&table)
            .into_iter()
            .flatten()
            .filter(|(other, _)| Some(**other) != id)
            .any(|(_, existing)| unique.iter().all(|f| existing.get(*f) == record.get(*f)));
        if clash {
            return Err(StoreError::Duplicate {
                table,
                fields: unique.join(", "),
            });
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Record>, StoreError> {
        let mut rows: Vec<Record> = self
            .tables
            .get(&table)
            .into_iter()
            .flatten()
            .map(|(id, fields)| Record {
                id: *id,
                fields: fields.clone(),
            })
            .filter(|record| filter.matches(record))
            .collect();
        if let Some((field, ascending)) = &filter.order_by {
            rows.sort_by(|a, b| {
                let ord = a
                    .value_of(field)
                    .partial_cmp(&b.value_of(field))
                    .unwrap_or(std::cmp::Ordering::Equal);
                if *ascending { ord } else { ord.reverse() }
            });
        }
        if let Some(limit) = filter.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn insert(&mut self, table: Table, fields: Fields) -> Result<Record, StoreError> {
        if fields.contains_key("id") {
            return Err(StoreError::ReservedField);
        }
        for &field in table.required_fields() {
            if !fields.contains_key(field) {
                return Err(StoreError::MissingField { table, field });
            }
        }
        self.check_unique(table, None, &fields)?;
        self.next_id += 1;
        let id = self.next_id;
        self.tables
            .entry(table)
            .or_default()
            .insert(id, fields.clone());
        tracing::debug!(%table, id, "record inserted");
        self.notify(table, ChangeKind::Insert, id);
        Ok(Record { id, fields })
    }

    fn update(&mut self, table: Table, id: i64, fields: Fields) -> Result<Record, StoreError> {
        if fields.contains_key("id") {
            return Err(StoreError::ReservedField);
        }
        let mut merged = self
            .tables
            .get(&table)
            .and_then(|rows| rows.get(&id))
            .cloned()
            .ok_or(StoreError::UnknownRecord { table, id })?;
        merged.extend(fields);
        self.check_unique(table, Some(id), &merged)?;
        self.tables
            .entry(table)
            .or_default()
            .insert(id, merged.clone());
        tracing::debug!(%table, id, "record updated");
        self.notify(table, ChangeKind::Update, id);
        Ok(Record { id, fields: merged })
    }

    fn delete(&mut self, table: Table, id: i64) -> Result<(), StoreError> {
        self.tables
            .get_mut(&table)
            .and_then(|rows| rows.remove(&id))
            .ok_or(StoreError::UnknownRecord { table, id })?;
        tracing::debug!(%table, id, "record deleted");
        self.notify(table, ChangeKind::Delete, id);
        Ok(())
    }

    fn subscribe(&mut self, table: Table) -> Receiver<Change> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.entry(table).or_default().push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_assigns_ids_and_validates_fields() {
        let mut store = MemoryStore::new();
        let a = store
            .insert(Table::Posts, fields([("title", "A"), ("slug", "a")]))
            .expect("insert");
        let b = store
            .insert(Table::Posts, fields([("title", "B"), ("slug", "b")]))
            .expect("insert");
        assert!(b.id > a.id);
        assert_eq!(
            store.insert(Table::Posts, fields([("title", "C")])),
            Err(StoreError::MissingField {
                table: Table::Posts,
                field: "slug"
            })
        );
        assert!(matches!(
            store.insert(Table::Posts, fields([("title", "D"), ("slug", "a")])),
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[test]
    fn select_filters_orders_and_limits() {
        let mut store = MemoryStore::new();
        for (title, slug, channel) in [("x", "x", 1), ("y", "y", 2), ("z", "z", 1)] {
            let mut row = fields([("title", title), ("slug", slug)]);
            row.insert("channel_id".into(), Value::Int(channel));
            store.insert(Table::CommunityPosts, row).expect("insert");
        }
        let rows = store
            .select(
                Table::CommunityPosts,
                &Filter::all().eq("channel_id", 1i64).order("title", false),
            )
            .expect("select");
        let titles: Vec<_> = rows.iter().filter_map(|r| r.text("title")).collect();
        assert_eq!(titles, ["z", "x"]);

        let limited = store
            .select(Table::CommunityPosts, &Filter::all().limit(1))
            .expect("select");
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn update_merges_and_delete_removes() {
        let mut store = MemoryStore::new();
        let rec = store
            .insert(Table::Profiles, fields([("username", "ada")]))
            .expect("insert");
        let updated = store
            .update(Table::Profiles, rec.id, fields([("avatar_url", "a.png")]))
            .expect("update");
        assert_eq!(updated.text("username"), Some("ada"));
        assert_eq!(updated.text("avatar_url"), Some("a.png"));
        store.delete(Table::Profiles, rec.id).expect("delete");
        assert_eq!(
            store.delete(Table::Profiles, rec.id),
            Err(StoreError::UnknownRecord {
                table: Table::Profiles,
                id: rec.id
            })
        );
    }

    #[test]
    fn subscribers_receive_changes_for_their_table() {
        let mut store = MemoryStore::new();
        let rx = store.subscribe(Table::CommunityLikes);
        let like = store
            .insert(
                Table::CommunityLikes,
                fields([("post_id", 1i64), ("user_id", 2i64)]),
            )
            .expect("insert");
        store
            .insert(Table::Profiles, fields([("username", "x")]))
            .expect("insert");
        store.delete(Table::CommunityLikes, like.id).expect("delete");
        let changes: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            changes,
            vec![
                Change {
                    table: Table::CommunityLikes,
                    kind: ChangeKind::Insert,
                    id: like.id
                },
                Change {
                    table: Table::CommunityLikes,
                    kind: ChangeKind::Delete,
                    id: like.id
                },
            ]
        );
    }

    #[test]
    fn seeded_store_links_community_records() {
        let store = MemoryStore::seeded();
        assert_eq!(store.len(Table::Posts), 2);
        let replies = store
            .select(Table::CommunityReplies, &Filter::all())
            .expect("select");
        let post_id = replies[0].int("post_id").expect("post id");
        let post = store
            .select(Table::CommunityPosts, &Filter::all().eq("id", post_id))
            .expect("select");
        assert_eq!(post[0].text("post_slug"), Some("general"));
    }
}
