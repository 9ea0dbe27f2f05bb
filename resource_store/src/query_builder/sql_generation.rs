//! Clause rendering shared by the statement builders

use crate::query_builder::filter::Predicate;
use crate::query_builder::ordering::SortField;
use crate::query_builder::Arguments;
use crate::validation::Column;

pub(crate) struct SqlGenerator;

impl SqlGenerator {
    /// Build WHERE clause, appending one argument per predicate
    pub(crate) fn build_where_clause(predicates: &[Predicate], args: &mut Arguments) -> String {
        if predicates.is_empty() {
            return String::new();
        }

        let conditions = predicates
            .iter()
            .map(|predicate| {
                let placeholder = args.push(predicate.value.clone());
                format!(
                    "{} {} {}",
                    predicate.column,
                    predicate.operator.to_sql(),
                    placeholder
                )
            })
            .collect::<Vec<_>>()
            .join(" AND ");

        format!(" WHERE {}", conditions)
    }

    /// Build ORDER BY clause
    pub(crate) fn build_order_clause(order_by: &[SortField]) -> String {
        if order_by.is_empty() {
            return String::new();
        }

        let items = order_by
            .iter()
            .map(|field| format!("{} {}", field.column, field.order.to_sql()))
            .collect::<Vec<_>>()
            .join(", ");

        format!(" ORDER BY {}", items)
    }

    /// Build LIMIT/OFFSET clause with bound values
    pub(crate) fn build_limit_clause(
        limit: Option<i64>,
        offset: Option<i64>,
        args: &mut Arguments,
    ) -> String {
        let mut clause = String::new();

        if let Some(limit) = limit {
            clause.push_str(" LIMIT ");
            clause.push_str(&args.push(limit.into()));
        }

        if let Some(offset) = offset {
            clause.push_str(" OFFSET ");
            clause.push_str(&args.push(offset.into()));
        }

        clause
    }

    pub(crate) fn build_returning_clause(columns: &[Column]) -> String {
        if columns.is_empty() {
            return String::new();
        }
        format!(" RETURNING {}", Self::column_list(columns))
    }

    pub(crate) fn column_list(columns: &[Column]) -> String {
        columns
            .iter()
            .map(Column::quoted)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
