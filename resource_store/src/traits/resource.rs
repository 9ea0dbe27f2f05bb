use crate::classify::UniqueConstraint;
use crate::query_builder::SortOrder;
use crate::traits::record::Record;
use crate::validation::FilterField;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use std::fmt::Debug;
use validator::Validate;

/// An entity exposed through a [`GenericStore`].
///
/// Implementations only declare data: whitelists, default ordering, unique
/// columns and how to turn inputs into column values. All statement building,
/// execution and error classification is shared.
///
/// [`GenericStore`]: crate::generic_store::GenericStore
pub trait Resource:
    Record + for<'r> FromRow<'r, PgRow> + Serialize + Clone + Debug + Send + Sync + Unpin + 'static
{
    /// Identifier type; bound as a statement argument
    type Id: Clone + Debug + Send + Sync + Into<Value>;

    /// Payload accepted by Create
    type CreateInput: Validate + Debug + Send + Sync;

    /// Payload accepted by Update; every attribute is optional
    type UpdateInput: Validate + Debug + Send + Sync;

    /// Human name used in caller-facing messages, e.g. `"User"`
    const NAME: &'static str;

    /// Sortable fields as `(exposed name, column)` pairs
    const SORTABLE: &'static [(&'static str, &'static str)];

    /// Filterable fields with their declared value kinds
    const FILTERABLE: &'static [FilterField];

    /// Ordering applied when a listing gives no sort; must not be empty
    const DEFAULT_SORT: &'static [(&'static str, SortOrder)];

    /// Unique columns, for attributing conflicts to a field
    const UNIQUE: &'static [UniqueConstraint] = &[];

    /// Column refreshed with `NOW()` on every update
    const TOUCH_COLUMN: Option<&'static str> = Some("updated_at");

    /// Column values for an insert, in insert order
    fn create_values(input: &Self::CreateInput) -> Vec<(&'static str, Value)>;

    /// Column values for the attributes actually present in an update
    fn update_values(input: &Self::UpdateInput) -> Vec<(&'static str, Value)>;

    /// `CREATE TABLE IF NOT EXISTS` statement for the resource table
    fn create_table_sql() -> String;

    fn drop_table_sql() -> String {
        format!("DROP TABLE IF EXISTS \"{}\"", Self::TABLE)
    }
}
