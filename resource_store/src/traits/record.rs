/// Table metadata for a row type.
///
/// Derive it with `#[derive(Record)]`:
///
/// ```ignore
/// #[derive(Debug, Clone, sqlx::FromRow, Record)]
/// #[record(table = "users")]
/// pub struct User {
///     pub id: i64,
///     pub name: String,
/// }
/// ```
///
/// The primary key defaults to the field named `id`; mark another field with
/// `#[record(primary_key)]` to override it.
pub trait Record {
    /// Table name, already validated as a safe identifier
    const TABLE: &'static str;

    /// Primary key column
    const PRIMARY_KEY: &'static str;

    /// Every column in declaration order; used as the projection and the
    /// RETURNING list
    const COLUMNS: &'static [&'static str];
}
