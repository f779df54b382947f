//! In-memory port implementations for unit and integration tests.
//!
//! Compiled for tests and behind the `test-support` feature. The gateway
//! dispatches by procedure name to registered handlers and records every
//! call; [`RecordTable`] backs the find/insert/update procedures of one record
//! kind with a vector of rows so upsert sequences can be observed end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ports::{CredentialStore, ProcedureGateway, StoreError};
use crate::domain::{
    CredentialDigest, INSERTED_MARKER, Identity, ProcedureCall, RawResult, RecordKind, Row,
    USER_ID_FIELD, WriteStrategy, hash_credential,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handler answering one procedure.
pub type ProcedureHandler =
    Arc<dyn Fn(&[Option<String>]) -> Result<RawResult, StoreError> + Send + Sync>;

/// A call observed by [`InMemoryProcedureGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Procedure name.
    pub procedure: &'static str,
    /// Positional arguments as bound.
    pub args: Vec<Option<String>>,
}

#[derive(Default)]
struct GatewayState {
    handlers: HashMap<&'static str, ProcedureHandler>,
    calls: Vec<RecordedCall>,
}

/// Procedure gateway answering from registered closures.
///
/// Procedures without a handler fail like a missing function would.
///
/// # Examples
/// ```
/// use mineops::domain::RawResult;
/// use mineops::test_support::InMemoryProcedureGateway;
///
/// let gateway = InMemoryProcedureGateway::new()
///     .with_handler("SP_MINES_LOCATION_SHOW", |_| Ok(RawResult::empty()));
/// assert!(gateway.calls().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryProcedureGateway {
    state: Arc<Mutex<GatewayState>>,
}

impl InMemoryProcedureGateway {
    /// Gateway with no procedures registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `procedure` with `handler`, replacing any previous handler.
    pub fn with_handler<F>(self, procedure: &'static str, handler: F) -> Self
    where
        F: Fn(&[Option<String>]) -> Result<RawResult, StoreError> + Send + Sync + 'static,
    {
        lock(&self.state)
            .handlers
            .insert(procedure, Arc::new(handler));
        self
    }

    /// Answer `procedure` with the same rows every time.
    pub fn with_rows(self, procedure: &'static str, rows: Vec<Row>) -> Self {
        self.with_handler(procedure, move |_| Ok(RawResult::SingleRowSet(rows.clone())))
    }

    /// Fail every call to `procedure` with `error`.
    pub fn with_failure(self, procedure: &'static str, error: StoreError) -> Self {
        self.with_handler(procedure, move |_| Err(error.clone()))
    }

    /// Back the write, lookup and listing procedures of `kind` with a table.
    pub fn with_record_table(self, kind: RecordKind) -> (Self, RecordTable) {
        let table = RecordTable::new(kind);
        let spec = kind.spec();
        let gateway = match *spec.strategy() {
            WriteStrategy::Gated {
                lookup,
                insert,
                update,
            } => self
                .with_handler(lookup.name(), table.lookup_handler())
                .with_handler(insert.name(), table.write_handler(WriteMode::Insert))
                .with_handler(update.name(), table.write_handler(WriteMode::Update)),
            WriteStrategy::GatedCombined { lookup, upsert } => self
                .with_handler(lookup.name(), table.lookup_handler())
                .with_handler(upsert.name(), table.write_handler(WriteMode::Upsert)),
            WriteStrategy::Atomic { upsert } => {
                self.with_handler(upsert.name(), table.write_handler(WriteMode::Marked))
            }
        };
        let listing = table.clone();
        let gateway = gateway.with_handler(spec.show().name(), move |_| {
            Ok(RawResult::SingleRowSet(listing.rows()))
        });
        (gateway, table)
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.state).calls.clone()
    }

    /// Names of the procedures called so far, in order.
    pub fn procedures_called(&self) -> Vec<&'static str> {
        lock(&self.state)
            .calls
            .iter()
            .map(|call| call.procedure)
            .collect()
    }
}

#[async_trait]
impl ProcedureGateway for InMemoryProcedureGateway {
    async fn call(&self, call: &ProcedureCall) -> Result<RawResult, StoreError> {
        let handler = {
            let mut state = lock(&self.state);
            state.calls.push(RecordedCall {
                procedure: call.name(),
                args: call.args().to_vec(),
            });
            state.handlers.get(call.name()).cloned()
        };
        match handler {
            Some(handler) => (*handler)(call.args()),
            None => Err(StoreError::query(format!(
                "function {}() does not exist",
                call.name()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum WriteMode {
    Insert,
    Update,
    Upsert,
    Marked,
}

/// Rows of one record kind, keyed by its natural key.
///
/// Values are stored as the text the procedures received.
#[derive(Clone)]
pub struct RecordTable {
    columns: Vec<&'static str>,
    key_len: usize,
    rows: Arc<Mutex<Vec<Row>>>,
}

impl RecordTable {
    fn new(kind: RecordKind) -> Self {
        let spec = kind.spec();
        let columns = spec
            .key()
            .iter()
            .chain(spec.payload())
            .map(|field| field.name())
            .chain(std::iter::once(USER_ID_FIELD))
            .collect();
        Self {
            columns,
            key_len: spec.key().len(),
            rows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of the stored rows.
    pub fn rows(&self) -> Vec<Row> {
        lock(&self.rows).clone()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    /// Whether no row has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_row(&self, args: &[Option<String>]) -> Row {
        self.columns
            .iter()
            .zip(args)
            .map(|(column, value)| {
                let value = value.clone().map_or(Value::Null, Value::String);
                ((*column).to_owned(), value)
            })
            .collect()
    }

    fn key_matches(&self, row: &Row, key: &[Option<String>]) -> bool {
        self.columns
            .iter()
            .take(self.key_len)
            .zip(key)
            .all(|(column, value)| row.get(*column).and_then(Value::as_str) == value.as_deref())
    }

    fn lookup_handler(&self) -> impl Fn(&[Option<String>]) -> Result<RawResult, StoreError> + use<> {
        let table = self.clone();
        move |key| {
            let found = lock(&table.rows)
                .iter()
                .filter(|row| table.key_matches(row, key))
                .cloned()
                .collect();
            Ok(RawResult::SingleRowSet(found))
        }
    }

    fn write_handler(
        &self,
        mode: WriteMode,
    ) -> impl Fn(&[Option<String>]) -> Result<RawResult, StoreError> + use<> {
        let table = self.clone();
        move |args| {
            let incoming = table.to_row(args);
            let key = args.get(..table.key_len).unwrap_or_default();
            let mut rows = lock(&table.rows);
            let position = rows.iter().position(|row| table.key_matches(row, key));
            let inserted = match (mode, position) {
                (WriteMode::Insert, _) | (WriteMode::Upsert | WriteMode::Marked, None) => {
                    rows.push(incoming.clone());
                    true
                }
                (WriteMode::Update, None) => false,
                (WriteMode::Update | WriteMode::Upsert | WriteMode::Marked, Some(index)) => {
                    if let Some(row) = rows.get_mut(index) {
                        *row = incoming.clone();
                    }
                    false
                }
            };
            let mut written = incoming;
            if matches!(mode, WriteMode::Marked) {
                written.insert(INSERTED_MARKER.to_owned(), Value::Bool(inserted));
            }
            Ok(RawResult::SingleRowSet(vec![written]))
        }
    }
}

/// Credential store over a map of identities to stored digests.
///
/// # Examples
/// ```
/// use mineops::test_support::InMemoryCredentialStore;
///
/// let store = InMemoryCredentialStore::new().with_account("10452", "secret");
/// assert_eq!(store.accounts().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    digests: HashMap<String, String>,
    accounts: Vec<Row>,
    failure: Option<StoreError>,
}

impl InMemoryCredentialStore {
    /// Store with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account whose digest is the hash of `password`.
    pub fn with_account(self, identity: &str, password: &str) -> Self {
        let digest = hash_credential(password);
        self.with_stored_digest(identity, digest.as_str())
    }

    /// Add an account with `digest` stored verbatim, in whatever case.
    pub fn with_stored_digest(mut self, identity: &str, digest: &str) -> Self {
        self.digests.insert(identity.to_owned(), digest.to_owned());
        let mut row = Row::new();
        row.insert("userid".to_owned(), Value::String(identity.to_owned()));
        row.insert("password".to_owned(), Value::String(digest.to_owned()));
        self.accounts.push(row);
        self
    }

    /// Fail every call with `error`.
    pub fn failing(mut self, error: StoreError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Account rows as stored, digests included.
    pub fn accounts(&self) -> &[Row] {
        &self.accounts
    }

    fn check(&self) -> Result<(), StoreError> {
        self.failure.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn fetch_stored_digest(
        &self,
        identity: &Identity,
    ) -> Result<Option<CredentialDigest>, StoreError> {
        self.check()?;
        Ok(self
            .digests
            .get(identity.as_str())
            .map(|digest| CredentialDigest::from_stored(digest.clone())))
    }

    async fn list_accounts(&self) -> Result<Vec<Row>, StoreError> {
        self.check()?;
        Ok(self.accounts.clone())
    }
}
