//! Rendering tests for the builders.

use super::{BuildStatement, Order, delete, insert, select, update};
use crate::error::DbError;
use crate::render::{RenderMode, StatementKind};
use crate::schema::Table;
use crate::value::Value;

mod item {
    crate::table! {
        pub struct Item("item"): IdentityRefCount {
            NAME: Name => "name": String,
            SCORE: Score => "score": i32,
        }
    }
}

mod exhibits {
    crate::table! {
        pub struct Exhibits("exhibits"): Identity {
            NAME: Name => "name": String,
            OPENED: Opened => "opened": Option<chrono::NaiveDate>,
            IS_DELETED: IsDeleted => "is_deleted": bool,
        }
    }
}

mod settings {
    crate::table! {
        pub struct Settings("settings"): Bare {
            KEY: Key => "key": String,
            VALUE: Val => "value": Option<String>,
        }
    }
}

use exhibits::Exhibits;
use item::{Item, Name, Score};
use settings::Settings;

fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn insert_skips_fragment_columns() {
    let q = insert((Name("a".into()), Score(5)));
    assert_eq!(q.to_sql(), "INSERT INTO item (name, score) VALUES ('a', 5)");
}

#[test]
fn table_insert_matches_free_function() {
    let a = Item::insert((Name("a".into()), Score(5))).to_sql();
    let b = insert((Name("a".into()), Score(5))).to_sql();
    assert_eq!(a, b);
}

#[test]
fn insert_numbered_params() {
    let stmt = insert((Name("a".into()), Score(5))).build().unwrap();
    assert_eq!(stmt.sql, "INSERT INTO item (name, score) VALUES ($1, $2)");
    assert_eq!(stmt.params, vec![Value::from("a"), Value::Int(5)]);
    assert_eq!(stmt.kind, StatementKind::Insert);
    assert_eq!(stmt.columns, ["name", "score"]);
    assert!(!stmt.returning);
}

#[test]
fn insert_explicit_ref_count_is_prepended() {
    let q = Item::insert((Name("a".into()), Score(5))).ref_count(3);
    assert_eq!(
        q.to_sql(),
        "INSERT INTO item (ref_count, name, score) VALUES (3, 'a', 5)"
    );
}

#[test]
fn insert_returning_id() {
    let q = Item::insert((Name("a".into()), Score(5))).returning_id();
    assert_eq!(
        q.to_sql(),
        "INSERT INTO item (name, score) VALUES ('a', 5) RETURNING id"
    );
    assert!(q.build().unwrap().returning);
}

#[test]
fn insert_literals() {
    let q = Exhibits::insert((
        exhibits::Name("O'Keeffe".into()),
        exhibits::Opened(Some(date(2021, 3, 9))),
        exhibits::IsDeleted(false),
    ));
    assert_eq!(
        q.to_sql(),
        "INSERT INTO exhibits (name, opened, is_deleted) VALUES ('O''Keeffe', '2021-03-09', false)"
    );

    let q = Exhibits::insert((
        exhibits::Name("x".into()),
        exhibits::Opened(None),
        exhibits::IsDeleted(true),
    ));
    assert_eq!(
        q.to_sql(),
        "INSERT INTO exhibits (name, opened, is_deleted) VALUES ('x', NULL, true)"
    );
    // NULL stays inline in numbered mode.
    let stmt = q.build().unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO exhibits (name, opened, is_deleted) VALUES ($1, NULL, $2)"
    );
    assert_eq!(stmt.params.len(), 2);
}

#[test]
fn bare_table_insert_has_no_identity() {
    let q = Settings::insert((settings::Key("theme".into()), settings::Val(None)));
    assert_eq!(
        q.to_sql(),
        "INSERT INTO settings (key, value) VALUES ('theme', NULL)"
    );
}

#[test]
fn select_projection_and_filter() {
    let q = select((Exhibits::ID, Exhibits::NAME))
        .from(Exhibits)
        .filter(Exhibits::ID.eq(7) & Exhibits::IS_DELETED.eq(false));
    assert_eq!(
        q.to_sql(),
        "SELECT id, name FROM exhibits WHERE (id = 7) AND (is_deleted = false)"
    );
}

#[test]
fn select_without_filter_is_full_scan() {
    let q = select(Item::NAME);
    assert_eq!(q.to_sql(), "SELECT name FROM item");
    assert!(!q.build().unwrap().filtered);
}

#[test]
fn select_all_lists_every_column() {
    assert_eq!(
        Item::select_all().to_sql(),
        "SELECT id, ref_count, name, score FROM item"
    );
}

#[test]
fn select_repeated_filter_is_anded() {
    let q = select(Item::ID)
        .filter(Item::SCORE.gt(1))
        .filter(Item::NAME.ne("b"));
    assert_eq!(q.to_sql(), "SELECT id FROM item WHERE (score > 1) AND (name != 'b')");
}

#[test]
fn select_order_and_limit() {
    let q = select((Item::ID, Item::SCORE))
        .filter(Item::SCORE.ge(10))
        .desc(Item::SCORE)
        .order_by(Item::ID, Order::Asc)
        .limit(5);
    let stmt = q.build_with(RenderMode::Numbered).unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT id, score FROM item WHERE score >= $1 ORDER BY score DESC, id ASC LIMIT 5"
    );
    assert_eq!(stmt.params, vec![Value::Int(10)]);
    assert_eq!(stmt.columns, ["id", "score"]);
}

#[test]
fn select_limit_fits_bigint() {
    let q = select(Item::ID).limit(u64::MAX);
    assert_eq!(q.to_sql(), format!("SELECT id FROM item LIMIT {}", i64::MAX));
}

#[test]
fn select_decode_follows_projection_order() {
    let q = select((Item::SCORE, Item::NAME));
    let row = q.decode(vec![Value::Int(9), Value::from("z")]).unwrap();
    assert_eq!(row, (Score(9), Name("z".into())));
    assert!(q.decode(vec![Value::from("z"), Value::Int(9)]).is_err());
}

#[test]
fn update_without_filter() {
    let q = update(Item).set(Item::SCORE, 10);
    assert_eq!(q.to_sql(), "UPDATE item SET score = 10");
    assert!(q.build().unwrap().is_unfiltered_mutation());
}

#[test]
fn update_set_params_precede_where_params() {
    let q = Item::update()
        .set(Item::NAME, "n")
        .set(Item::REF_COUNT, 2)
        .filter(Item::ID.eq(4));
    let stmt = q.build().unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE item SET name = $1, ref_count = $2 WHERE id = $3"
    );
    assert_eq!(
        stmt.params,
        vec![Value::from("n"), Value::Int(2), Value::Int(4)]
    );
    assert_eq!(stmt.columns, ["name", "ref_count"]);
}

#[test]
fn update_set_null_and_fields() {
    let q = Exhibits::update()
        .set_null(Exhibits::OPENED)
        .filter(Exhibits::NAME.eq("a"));
    assert_eq!(
        q.to_sql(),
        "UPDATE exhibits SET opened = NULL WHERE name = 'a'"
    );

    let q = Item::update()
        .set_fields((Name("b".into()), Score(1)))
        .filter(Item::ID.eq(1));
    assert_eq!(
        q.to_sql(),
        "UPDATE item SET name = 'b', score = 1 WHERE id = 1"
    );
}

#[test]
fn update_reassignment_keeps_position() {
    let q = Item::update()
        .set(Item::SCORE, 1)
        .set(Item::NAME, "a")
        .set(Item::SCORE, 2);
    assert_eq!(q.to_sql(), "UPDATE item SET score = 2, name = 'a'");
}

#[test]
fn update_without_assignments_fails_validation() {
    let err = Item::update().filter(Item::ID.eq(1)).build().unwrap_err();
    assert!(matches!(err, DbError::Validation(_)));
}

#[test]
fn delete_with_and_without_filter() {
    assert_eq!(delete(Item).to_sql(), "DELETE FROM item");
    let q = Item::delete().filter(Item::REF_COUNT.eq(0) & Item::SCORE.lt(0));
    assert_eq!(
        q.to_sql(),
        "DELETE FROM item WHERE (ref_count = 0) AND (score < 0)"
    );
    let stmt = q.build().unwrap();
    assert_eq!(stmt.kind, StatementKind::Delete);
    assert!(stmt.columns.is_empty());
    assert!(!stmt.is_unfiltered_mutation());
}

#[test]
fn builders_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}
    assert_send_sync(&select(Item::ID).filter(Item::ID.eq(1)));
    assert_send_sync(&Item::insert((Name("a".into()), Score(1))));
    assert_send_sync(&Item::update().set(Item::SCORE, 1));
    assert_send_sync(&Item::delete());
}
