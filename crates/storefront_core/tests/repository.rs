use rusqlite::Connection;
use std::rc::Rc;
use storefront_core::db::catalog::{CURRENCIES, CURRENCIES_IDENTITY, SESSIONS, SESSIONS_IDENTITY};
use storefront_core::db::migrations::latest_version;
use storefront_core::db::open_db_in_memory;
use storefront_core::{
    Currency, CurrencyMapper, Entity, EntityMapper, MappingError, RepoError, Repository, Session,
    SessionId, SessionMapper, TableBinding,
};
use uuid::Uuid;

fn session_repository(conn: &Rc<Connection>) -> Repository<SessionMapper> {
    let mut repo = Repository::new(
        SessionMapper,
        TableBinding::try_new(&SESSIONS, SESSIONS_IDENTITY).unwrap(),
    );
    repo.bind_connection(Rc::clone(conn)).unwrap();
    repo
}

fn currency_repository(conn: &Rc<Connection>) -> Repository<CurrencyMapper> {
    let mut repo = Repository::new(
        CurrencyMapper,
        TableBinding::try_new(&CURRENCIES, CURRENCIES_IDENTITY).unwrap(),
    );
    repo.bind_connection(Rc::clone(conn)).unwrap();
    repo
}

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn save_and_find_roundtrip_preserves_identity_and_fields() {
    let conn = Rc::new(open_db_in_memory().unwrap());
    let repo = session_repository(&conn);

    let session = Session::new("en", "usd").unwrap();
    let id = repo.save(&session).unwrap();
    assert_eq!(&id, session.id());

    let loaded = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(loaded.id(), session.id());
    assert_eq!(loaded.preferred_language(), "en");
    assert_eq!(loaded.preferred_currency(), "usd");
}

#[test]
fn currency_roundtrip_preserves_every_mapped_field() {
    let conn = Rc::new(open_db_in_memory().unwrap());
    let repo = currency_repository(&conn);

    let currency = Currency::new("eur", "Euro", 2).unwrap();
    let id = repo.save(&currency).unwrap();

    let loaded = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(loaded.id(), currency.id());
    assert_eq!(loaded.code(), "eur");
    assert_eq!(loaded.display_name(), "Euro");
    assert_eq!(loaded.minor_units(), 2);
}

#[test]
fn find_on_never_saved_id_returns_none_not_an_error() {
    let conn = Rc::new(open_db_in_memory().unwrap());
    let repo = session_repository(&conn);

    let absent = repo
        .find_by_id(&SessionId::from_uuid(Uuid::new_v4()))
        .unwrap();
    assert!(absent.is_none());
}

#[test]
fn save_is_an_idempotent_upsert() {
    let conn = Rc::new(open_db_in_memory().unwrap());
    let repo = session_repository(&conn);

    let session = Session::new("en", "usd").unwrap();
    let first_id = repo.save(&session).unwrap();
    let second_id = repo.save(&session).unwrap();

    assert_eq!(first_id, second_id);
    assert_eq!(row_count(&conn, "sessions"), 1);
}

#[test]
fn save_on_identity_conflict_overwrites_all_mapped_columns() {
    let conn = Rc::new(open_db_in_memory().unwrap());
    let repo = session_repository(&conn);

    let session = Session::new("en", "usd").unwrap();
    repo.save(&session).unwrap();

    let replacement = session.with_preferences("de", "eur").unwrap();
    repo.save(&replacement).unwrap();

    assert_eq!(row_count(&conn, "sessions"), 1);
    let loaded = repo.find_by_id(session.id()).unwrap().unwrap();
    assert_eq!(loaded.preferred_language(), "de");
    assert_eq!(loaded.preferred_currency(), "eur");
}

#[test]
fn delete_is_idempotent_including_absent_ids() {
    let conn = Rc::new(open_db_in_memory().unwrap());
    let repo = session_repository(&conn);

    let session = Session::new("en", "usd").unwrap();
    let id = repo.save(&session).unwrap();

    repo.delete(&id).unwrap();
    assert!(repo.find_by_id(&id).unwrap().is_none());

    // Second delete, and a delete of a never-saved id, are no-op successes.
    repo.delete(&id).unwrap();
    repo.delete(&SessionId::from_uuid(Uuid::new_v4())).unwrap();
}

#[test]
fn duplicate_currency_code_surfaces_as_db_error() {
    let conn = Rc::new(open_db_in_memory().unwrap());
    let repo = currency_repository(&conn);

    repo.save(&Currency::new("usd", "US Dollar", 2).unwrap())
        .unwrap();

    let clashing = Currency::new("usd", "Dollar Again", 2).unwrap();
    let err = repo.save(&clashing).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(row_count(&conn, "currencies"), 1);
}

#[test]
fn crud_before_binding_fails_with_not_bound() {
    let repo = Repository::new(
        SessionMapper,
        TableBinding::try_new(&SESSIONS, SESSIONS_IDENTITY).unwrap(),
    );

    let err = repo
        .find_by_id(&SessionId::from_uuid(Uuid::new_v4()))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotBound));

    let session = Session::new("en", "usd").unwrap();
    assert!(matches!(repo.save(&session).unwrap_err(), RepoError::NotBound));
    assert!(matches!(
        repo.delete(session.id()).unwrap_err(),
        RepoError::NotBound
    ));
}

#[test]
fn binding_a_connection_twice_is_rejected() {
    let conn = Rc::new(open_db_in_memory().unwrap());
    let mut repo = Repository::new(
        SessionMapper,
        TableBinding::try_new(&SESSIONS, SESSIONS_IDENTITY).unwrap(),
    );

    repo.bind_connection(Rc::clone(&conn)).unwrap();
    let err = repo.bind_connection(conn).unwrap_err();
    assert!(matches!(err, RepoError::AlreadyBound));
}

#[test]
fn binding_construction_rejects_foreign_identity_column() {
    let err = TableBinding::try_new(&SESSIONS, "code").unwrap_err();
    assert!(matches!(
        err,
        RepoError::IdentityColumnNotInTable {
            table: "sessions",
            column: "code",
        }
    ));
}

#[test]
fn bind_rejects_unmigrated_connection() {
    let conn = Rc::new(Connection::open_in_memory().unwrap());
    let mut repo = Repository::new(
        SessionMapper,
        TableBinding::try_new(&SESSIONS, SESSIONS_IDENTITY).unwrap(),
    );

    match repo.bind_connection(conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        other => panic!("unexpected bind result: {other:?}"),
    }
}

#[test]
fn bind_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let mut repo = Repository::new(
        SessionMapper,
        TableBinding::try_new(&SESSIONS, SESSIONS_IDENTITY).unwrap(),
    );
    let err = repo.bind_connection(Rc::new(conn)).unwrap_err();
    assert!(matches!(err, RepoError::MissingRequiredTable("sessions")));
}

#[test]
fn bind_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE sessions (
            session_uuid TEXT PRIMARY KEY NOT NULL,
            preferred_language TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let mut repo = Repository::new(
        SessionMapper,
        TableBinding::try_new(&SESSIONS, SESSIONS_IDENTITY).unwrap(),
    );
    let err = repo.bind_connection(Rc::new(conn)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::MissingRequiredColumn {
            table: "sessions",
            column: "preferred_currency",
        }
    ));
}

#[test]
fn malformed_uuid_in_persisted_row_is_a_mapping_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO currencies (currency_uuid, code, display_name, minor_units)
         VALUES ('not-a-uuid', 'usd', 'US Dollar', 2);",
    )
    .unwrap();

    let err = map_first_currency_row(&conn).unwrap_err();
    assert!(matches!(err, MappingError::Invalid(_)));
}

#[test]
fn out_of_range_minor_units_in_persisted_row_is_a_mapping_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(&format!(
        "INSERT INTO currencies (currency_uuid, code, display_name, minor_units)
         VALUES ('{}', 'xts', 'Test Currency', 42);",
        Uuid::new_v4()
    ))
    .unwrap();

    let err = map_first_currency_row(&conn).unwrap_err();
    assert!(matches!(err, MappingError::Invalid(_)));
}

fn map_first_currency_row(conn: &Connection) -> Result<Currency, MappingError> {
    let mut stmt = conn
        .prepare("SELECT currency_uuid, code, display_name, minor_units FROM currencies;")
        .unwrap();
    let mut rows = stmt.query([]).unwrap();
    let row = rows.next().unwrap().expect("one persisted row");
    CurrencyMapper.to_domain(row)
}
