//! Rendering of node constraints into SQL.
//!
//! Every value is bound as a parameter; only column names and operators are
//! written into the statement text.

use sqlx::{QueryBuilder, Sqlite};

use common::query::{Constraint, ConstraintSet, OrderBy};

/// Append ` WHERE a AND b ...` for a non-empty constraint set
pub(super) fn push_where(builder: &mut QueryBuilder<'_, Sqlite>, constraints: &ConstraintSet) {
    for (position, constraint) in constraints.iter().enumerate() {
        builder.push(if position == 0 { " WHERE " } else { " AND " });
        push_constraint(builder, constraint);
    }
}

/// Append ` ORDER BY`, breaking ties by path then identifier
pub(super) fn push_order(builder: &mut QueryBuilder<'_, Sqlite>, order_by: &OrderBy) {
    builder.push(format!(
        " ORDER BY {} {}, path ASC, identifier ASC",
        order_by.field.column(),
        order_by.direction.keyword()
    ));
}

/// Append `column IN (?, ...)`, or an always-false predicate for no values
pub(super) fn push_in<'v>(
    builder: &mut QueryBuilder<'_, Sqlite>,
    column: &str,
    values: impl IntoIterator<Item = &'v str>,
) {
    let values: Vec<String> = values.into_iter().map(str::to_string).collect();
    if values.is_empty() {
        builder.push("0 = 1");
        return;
    }

    builder.push(column).push(" IN (");
    let mut separated = builder.separated(", ");
    for value in values {
        separated.push_bind(value);
    }
    separated.push_unseparated(")");
}

fn push_constraint(builder: &mut QueryBuilder<'_, Sqlite>, constraint: &Constraint) {
    match constraint {
        Constraint::Workspaces(workspaces) => {
            push_in(builder, "workspace", workspaces.iter().map(String::as_str))
        }
        // an empty type set restricts nothing
        Constraint::NodeTypes(types) if types.is_empty() => {
            builder.push("1 = 1");
        }
        Constraint::NodeTypes(types) => push_in(builder, "node_type", types.iter()),
        Constraint::PathPrefix(_) => push_like(builder, "path", constraint),
        Constraint::PropertiesContain(_) => push_like(builder, "properties_search", constraint),
        Constraint::IdentifierPrefix(_) => push_like(builder, "identifier", constraint),
    }
}

fn push_like(builder: &mut QueryBuilder<'_, Sqlite>, column: &str, constraint: &Constraint) {
    match constraint.like_pattern() {
        Some(pattern) => {
            builder
                .push(column)
                .push(" LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\'");
        }
        None => {
            builder.push("1 = 1");
        }
    }
}
