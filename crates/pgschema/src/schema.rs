//! Table schemas and the declaration macro.
//!
//! A schema is an ordered, fixed set of columns with one table name. Schemas are declared at
//! compile time with [`table!`](crate::table), optionally composed with a fragment that
//! prepends canonical columns:
//!
//! - [`Bare`]: only the declared columns.
//! - [`Identity`]: an integer `id` column assigned by the database.
//! - [`IdentityRefCount`]: `id` plus an integer `ref_count` column that defaults to zero.
//!
//! Fragment columns are never part of the insert tuple.

use crate::builder::{Delete, Insert, Select, Update};
use crate::codec::FieldSet;
use crate::value::ValueKind;
use std::fmt;

/// What a column is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    /// Database-assigned primary key.
    Identity,
    /// Reference counter maintained by the caller.
    RefCount,
    /// A schema-specific column.
    Data,
}

/// Value the database supplies when an INSERT omits the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnDefault {
    /// Next value of the table's identity sequence.
    Serial,
    Int(i64),
}

/// Runtime description of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ValueKind,
    pub nullable: bool,
    pub role: ColumnRole,
    pub default: Option<ColumnDefault>,
}

impl ColumnDef {
    pub const fn data(name: &'static str, kind: ValueKind, nullable: bool) -> Self {
        Self {
            name,
            kind,
            nullable,
            role: ColumnRole::Data,
            default: None,
        }
    }

    pub const fn identity(name: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::Integer,
            nullable: false,
            role: ColumnRole::Identity,
            default: Some(ColumnDefault::Serial),
        }
    }

    pub const fn ref_count(name: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::Integer,
            nullable: false,
            role: ColumnRole::RefCount,
            default: Some(ColumnDefault::Int(0)),
        }
    }

    /// Whether the column belongs to the insert tuple.
    pub const fn is_writable(&self) -> bool {
        matches!(self.role, ColumnRole::Data)
    }
}

/// Identity column prepended by [`Identity`] and [`IdentityRefCount`].
pub const IDENTITY_COLUMN: ColumnDef = ColumnDef::identity("id");

/// Reference-count column prepended by [`IdentityRefCount`].
pub const REF_COUNT_COLUMN: ColumnDef = ColumnDef::ref_count("ref_count");

/// A canonical column prefix shared by many schemas.
pub trait Fragment: Copy + Default + fmt::Debug + Send + Sync + 'static {
    const PREFIX: &'static [ColumnDef];
}

/// Fragments that carry a database-assigned identity.
pub trait HasIdentity: Fragment {}

/// Fragments that carry a reference count.
pub trait HasRefCount: HasIdentity {}

/// Schema-specific columns only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bare;

/// Prepends `id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Identity;

/// Prepends `id, ref_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IdentityRefCount;

impl Fragment for Bare {
    const PREFIX: &'static [ColumnDef] = &[];
}

impl Fragment for Identity {
    const PREFIX: &'static [ColumnDef] = &[IDENTITY_COLUMN];
}

impl Fragment for IdentityRefCount {
    const PREFIX: &'static [ColumnDef] = &[IDENTITY_COLUMN, REF_COUNT_COLUMN];
}

impl HasIdentity for Identity {}
impl HasIdentity for IdentityRefCount {}
impl HasRefCount for IdentityRefCount {}

/// A declared table.
///
/// Implemented by [`table!`](crate::table); the provided functions are the schema-bound
/// statement entry points.
pub trait Table: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Persisted table name.
    const NAME: &'static str;
    /// Every column, fragment prefix first, in declaration order.
    const COLUMNS: &'static [ColumnDef];

    type Fragment: Fragment;
    /// All fields of a row, in column order.
    type Row: FieldSet<Table = Self>;
    /// The writable fields, in column order.
    type Insert: FieldSet<Table = Self>;

    /// `SELECT <every column> FROM table`
    fn select_all() -> Select<Self::Row> {
        Select::fields()
    }

    /// `INSERT INTO table (<writable columns>) VALUES (...)`
    fn insert(values: Self::Insert) -> Insert<Self> {
        Insert::new(&values)
    }

    /// `UPDATE table SET ...`
    fn update() -> Update<Self> {
        Update::new()
    }

    /// `DELETE FROM table`
    fn delete() -> Delete<Self> {
        Delete::new()
    }

    /// Look up a column by persisted name.
    fn column(name: &str) -> Option<&'static ColumnDef> {
        Self::COLUMNS.iter().find(|c| c.name == name)
    }
}

/// `prefix` followed by `data`, as the fixed column list of a [`table!`](crate::table).
///
/// `N` must be the combined length.
pub const fn with_prefix<const N: usize>(
    prefix: &[ColumnDef],
    data: &[ColumnDef],
) -> [ColumnDef; N] {
    assert!(prefix.len() + data.len() == N, "column count mismatch");
    let mut out = [IDENTITY_COLUMN; N];
    let mut i = 0;
    while i < N {
        out[i] = if i < prefix.len() {
            prefix[i]
        } else {
            data[i - prefix.len()]
        };
        i += 1;
    }
    out
}

/// Compile-time check that no two columns share a persisted name.
pub const fn names_are_unique(columns: &[ColumnDef]) -> bool {
    let mut i = 0;
    while i < columns.len() {
        let mut j = i + 1;
        while j < columns.len() {
            if str_eq(columns[i].name, columns[j].name) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Declares a table schema.
///
/// Generates a unit struct for the table, one newtype per column implementing
/// [`Field`](crate::Field), an associated [`Column`](crate::Column) constant per column and the
/// [`Table`] impl. Declare each table in its own module: fragment columns generate field types
/// named `Id` and `RefCount`.
///
/// ```
/// use pgschema::prelude::*;
///
/// mod item {
///     pgschema::table! {
///         pub struct Item("item"): IdentityRefCount {
///             NAME: Name => "name": String,
///             SCORE: Score => "score": i32,
///         }
///     }
/// }
/// use item::{Item, Name, Score};
///
/// let sql = Item::insert((Name("a".into()), Score(5))).to_sql();
/// assert_eq!(sql, "INSERT INTO item (name, score) VALUES ('a', 5)");
/// ```
///
/// A row holds at most 12 columns, fragment columns included.
///
/// A duplicate persisted name fails to compile:
///
/// ```compile_fail
/// mod item {
///     pgschema::table! {
///         pub struct Item("item"): Bare {
///             NAME: Name => "name": String,
///             LABEL: Label => "name": String,
///         }
///     }
/// }
/// ```
///
/// So does one colliding with a fragment column:
///
/// ```compile_fail
/// mod item {
///     pgschema::table! {
///         pub struct Item("item"): Identity {
///             OTHER_ID: OtherId => "id": i32,
///         }
///     }
/// }
/// ```
#[macro_export]
macro_rules! table {
    (
        @define
        $(#[$meta:meta])*
        $vis:vis $table:ident $name:literal $fragment:ty;
        [$($pk:ident $pf:ident ($pt:ty) $pc:expr),*]
        [$($dk:ident $df:ident ($dt:ty) $dc:literal),+]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $table;

        $(
            $crate::table!(@field $vis $table $pf ($pt) $pc);
        )*
        $(
            $crate::table!(@field $vis $table $df ($dt) $dc);
        )+

        #[allow(dead_code)]
        impl $table {
            $(
                pub const $pk: $crate::Column<$pf> = $crate::Column::new();
            )*
            $(
                pub const $dk: $crate::Column<$df> = $crate::Column::new();
            )+
        }

        impl $crate::Table for $table {
            const NAME: &'static str = $name;
            const COLUMNS: &'static [$crate::ColumnDef] = &$crate::schema::with_prefix::<
                { <$fragment as $crate::Fragment>::PREFIX.len() + [$($dc),+].len() },
            >(
                <$fragment as $crate::Fragment>::PREFIX,
                &[$(
                    $crate::ColumnDef::data(
                        $dc,
                        <$dt as $crate::SqlType>::KIND,
                        <$dt as $crate::SqlType>::NULLABLE,
                    ),
                )+],
            );

            type Fragment = $fragment;
            type Row = ($($pf,)* $($df,)+);
            type Insert = ($($df,)+);
        }

        const _: () = assert!(
            $crate::schema::names_are_unique(<$table as $crate::Table>::COLUMNS),
            concat!("duplicate column name in table `", $name, "`")
        );
    };

    (@field $vis:vis $table:ident $field:ident ($ty:ty) $col:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $field(pub $ty);

        impl $crate::Field for $field {
            type Table = $table;
            type Value = $ty;
            const NAME: &'static str = $col;

            fn new(value: $ty) -> Self {
                Self(value)
            }

            fn value(&self) -> &$ty {
                &self.0
            }

            fn into_value(self) -> $ty {
                self.0
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $table:ident($name:literal): Bare {
            $($konst:ident: $field:ident => $col:literal: $ty:ty),+ $(,)?
        }
    ) => {
        $crate::table!(
            @define $(#[$meta])* $vis $table $name $crate::schema::Bare;
            []
            [$($konst $field ($ty) $col),+]
        );
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $table:ident($name:literal): Identity {
            $($konst:ident: $field:ident => $col:literal: $ty:ty),+ $(,)?
        }
    ) => {
        $crate::table!(
            @define $(#[$meta])* $vis $table $name $crate::schema::Identity;
            [ID Id (i32) $crate::schema::IDENTITY_COLUMN.name]
            [$($konst $field ($ty) $col),+]
        );
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $table:ident($name:literal): IdentityRefCount {
            $($konst:ident: $field:ident => $col:literal: $ty:ty),+ $(,)?
        }
    ) => {
        $crate::table!(
            @define $(#[$meta])* $vis $table $name $crate::schema::IdentityRefCount;
            [
                ID Id (i32) $crate::schema::IDENTITY_COLUMN.name,
                REF_COUNT RefCount (i32) $crate::schema::REF_COUNT_COLUMN.name
            ]
            [$($konst $field ($ty) $col),+]
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    mod questions {
        crate::table! {
            /// Sort questions.
            pub struct SortQuestions("sort_questions"): IdentityRefCount {
                NAME: Name => "name": String,
                QUESTION: Question => "question": String,
            }
        }
    }

    mod tags {
        crate::table! {
            pub struct Tags("tags"): Bare {
                LABEL: Label => "label": String,
                CREATED: Created => "created": Option<chrono::NaiveDate>,
            }
        }
    }

    use questions::SortQuestions;
    use tags::Tags;

    #[test]
    fn fragment_columns_come_first() {
        let names: Vec<_> = SortQuestions::COLUMNS.iter().map(|c| c.name).collect();
        assert_eq!(names, ["id", "ref_count", "name", "question"]);
        assert_eq!(SortQuestions::COLUMNS[0].role, ColumnRole::Identity);
        assert_eq!(SortQuestions::COLUMNS[1].default, Some(ColumnDefault::Int(0)));
        assert!(SortQuestions::COLUMNS[2].is_writable());
    }

    #[test]
    fn bare_table_has_only_declared_columns() {
        let names: Vec<_> = Tags::COLUMNS.iter().map(|c| c.name).collect();
        assert_eq!(names, ["label", "created"]);
        let created = Tags::column("created").unwrap();
        assert!(created.nullable);
        assert_eq!(created.kind, ValueKind::Date);
        assert!(Tags::column("id").is_none());
    }

    #[test]
    fn row_and_insert_tuples_follow_columns() {
        assert_eq!(
            <SortQuestions as Table>::Row::column_names(),
            ["id", "ref_count", "name", "question"]
        );
        assert_eq!(<SortQuestions as Table>::Insert::column_names(), ["name", "question"]);
    }

    #[test]
    fn uniqueness_check() {
        assert!(names_are_unique(&[IDENTITY_COLUMN, REF_COUNT_COLUMN]));
        assert!(!names_are_unique(&[
            ColumnDef::data("a", ValueKind::Text, false),
            ColumnDef::data("b", ValueKind::Text, false),
            ColumnDef::data("a", ValueKind::Integer, true),
        ]));
        assert!(names_are_unique(&[
            ColumnDef::data("ab", ValueKind::Text, false),
            ColumnDef::data("a", ValueKind::Text, false),
        ]));
    }

    #[test]
    fn columns_start_with_fragment_prefix() {
        let prefix = <<SortQuestions as Table>::Fragment as Fragment>::PREFIX;
        assert_eq!(&SortQuestions::COLUMNS[..prefix.len()], prefix);
        assert!(<<Tags as Table>::Fragment as Fragment>::PREFIX.is_empty());
        assert_eq!(SortQuestions::column("id"), Some(&IDENTITY_COLUMN));
        assert_eq!(SortQuestions::ID.name(), IDENTITY_COLUMN.name);
        assert_eq!(SortQuestions::REF_COUNT.name(), REF_COUNT_COLUMN.name);
    }

    #[test]
    fn with_prefix_appends_data_columns() {
        let data = [ColumnDef::data("label", ValueKind::Text, false)];
        let columns = with_prefix::<3>(IdentityRefCount::PREFIX, &data);
        assert_eq!(columns, [IDENTITY_COLUMN, REF_COUNT_COLUMN, data[0]]);
    }

    #[test]
    fn fragment_prefixes() {
        assert!(Bare::PREFIX.is_empty());
        assert_eq!(Identity::PREFIX, &[IDENTITY_COLUMN]);
        assert_eq!(IdentityRefCount::PREFIX, &[IDENTITY_COLUMN, REF_COUNT_COLUMN]);
    }
}
