use crate::expr::{
    Between, CompareOp, Comparison, CreateTable, DeleteStatement, Exists, Group, InList,
    InsertValues, Limit, Logical, LogicalOp, Offset, OrderBy, SelectClause, SelectStatement,
    SetAssignments, SqlFragment, TableJoin, UpdateStatement,
};
use crate::render::Renderer;
use crate::schema::{AnyColumn, ColumnType, TableInfo};
use crate::value::Value;

/// SQLite dialect: `?` placeholders, `LIMIT -1` when only an OFFSET is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    pub fn new() -> Self {
        Self
    }

    fn placeholders(count: usize) -> String {
        vec!["?"; count].join(", ")
    }
}

impl Renderer for SqliteDialect {
    fn column_ref(&self, column: &AnyColumn, use_table_alias: bool) -> String {
        if use_table_alias {
            format!("{}.{}", column.table_alias(), column.key())
        } else {
            column.key().to_string()
        }
    }

    fn table_ref(&self, table: &TableInfo, alias: Option<&str>, use_table_alias: bool) -> String {
        if use_table_alias {
            format!("{} {}", table.name(), alias.unwrap_or(table.alias()))
        } else {
            table.name().to_string()
        }
    }

    fn compare_op(&self, op: CompareOp) -> &'static str {
        match op {
            CompareOp::Eq => "=",
            CompareOp::Neq => "<>",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Like => "LIKE",
            CompareOp::ILike => "ILIKE",
            CompareOp::NotLike => "NOT LIKE",
            CompareOp::IsNull => "IS NULL",
            CompareOp::IsNotNull => "IS NOT NULL",
        }
    }

    fn column_type(&self, column_type: ColumnType) -> &'static str {
        match column_type {
            ColumnType::String | ColumnType::DateText => "TEXT",
            ColumnType::Int | ColumnType::Long | ColumnType::Boolean => "INTEGER",
            ColumnType::DateTimestamp => "INTEGER",
            ColumnType::Float | ColumnType::Double => "REAL",
            ColumnType::Decimal => "NUMERIC",
        }
    }

    fn insert(&self, expr: &InsertValues, _use_table_alias: bool) -> SqlFragment {
        let columns = expr
            .assignments
            .iter()
            .map(|a| a.column.key())
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            expr.table.name(),
            columns,
            Self::placeholders(expr.assignments.len())
        );
        let args = expr.assignments.iter().map(|a| a.value.clone()).collect();
        SqlFragment::with_args(sql, args)
    }

    fn select(&self, expr: &SelectStatement, use_table_alias: bool) -> SqlFragment {
        let mut out = expr.clause.render(self, use_table_alias);
        out.push_str(" FROM ")
            .push_str(&self.table_ref(&expr.table, None, use_table_alias));

        for join in &expr.joins {
            out.push_str(" ");
            out.push(join.render(self, use_table_alias));
        }

        if let Some(condition) = &expr.condition {
            out.push_str(" WHERE ");
            out.push(condition.render(self, use_table_alias));
        }

        if !expr.order_by.is_empty() {
            out.push_str(" ORDER BY ");
            out.push(self.order_by(&expr.order_by, use_table_alias));
        }

        match (&expr.limit, &expr.offset) {
            (Some(limit), _) => {
                out.push_str(" ");
                out.push(self.limit(limit));
            }
            // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
            (None, Some(_)) => {
                out.push_str(" LIMIT -1");
            }
            (None, None) => {}
        }

        if let Some(offset) = &expr.offset {
            out.push_str(" ");
            out.push(self.offset(offset));
        }

        if expr.clause == SelectClause::Exists {
            out.push_str(")");
        }
        out
    }

    fn select_clause(&self, expr: &SelectClause, use_table_alias: bool) -> SqlFragment {
        match expr {
            SelectClause::One => SqlFragment::new("SELECT 1"),
            SelectClause::Columns(columns) => {
                let columns = columns
                    .iter()
                    .map(|c| self.column_ref(c, use_table_alias))
                    .collect::<Vec<_>>()
                    .join(", ");
                SqlFragment::new(format!("SELECT {columns}"))
            }
            SelectClause::Count => SqlFragment::new("SELECT COUNT(*)"),
            // Closed by `select` once the whole inner query is rendered.
            SelectClause::Exists => SqlFragment::new("SELECT EXISTS (SELECT 1"),
        }
    }

    fn comparison(&self, expr: &Comparison, use_table_alias: bool) -> SqlFragment {
        let column = self.column_ref(&expr.column, use_table_alias);
        let op = self.compare_op(expr.op);
        match &expr.value {
            Some(value) if !expr.op.is_unary() => {
                SqlFragment::with_args(format!("{column} {op} ?"), vec![value.clone()])
            }
            _ => SqlFragment::new(format!("{column} {op}")),
        }
    }

    fn logical(&self, expr: &Logical, use_table_alias: bool) -> SqlFragment {
        let mut out = SqlFragment::default();
        match expr.op() {
            LogicalOp::Not => {
                out.push_str("NOT (");
                for (i, child) in expr.children().iter().enumerate() {
                    if i > 0 {
                        out.push_str(" AND ");
                    }
                    out.push(child.render(self, use_table_alias));
                }
                out.push_str(")");
            }
            op => {
                let separator = format!(" {} ", op.as_str());
                for (i, child) in expr.children().iter().enumerate() {
                    if i > 0 {
                        out.push_str(&separator);
                    }
                    out.push(child.render(self, use_table_alias));
                }
            }
        }
        out
    }

    fn in_list(&self, expr: &InList, use_table_alias: bool) -> SqlFragment {
        let column = self.column_ref(&expr.column, use_table_alias);
        let op = if expr.negated { "NOT IN" } else { "IN" };
        SqlFragment::with_args(
            format!("{column} {op} ({})", Self::placeholders(expr.values.len())),
            expr.values.clone(),
        )
    }

    fn between(&self, expr: &Between, use_table_alias: bool) -> SqlFragment {
        let column = self.column_ref(&expr.column, use_table_alias);
        SqlFragment::with_args(
            format!("{column} BETWEEN ? AND ?"),
            vec![expr.low.clone(), expr.high.clone()],
        )
    }

    fn exists(&self, expr: &Exists, _use_table_alias: bool) -> SqlFragment {
        let op = if expr.negated { "NOT EXISTS" } else { "EXISTS" };
        SqlFragment::with_args(format!("{op} ({})", expr.subquery), expr.args.clone())
    }

    fn group(&self, expr: &Group, use_table_alias: bool) -> SqlFragment {
        let mut out = SqlFragment::new("(");
        out.push(expr.0.render(self, use_table_alias));
        out.push_str(")");
        out
    }

    fn join(&self, expr: &TableJoin, use_table_alias: bool) -> SqlFragment {
        let table = self.table_ref(&expr.table, expr.alias.as_deref(), use_table_alias);
        let left = self.column_ref(&expr.condition.left, use_table_alias);
        let right = self.column_ref(&expr.condition.right, use_table_alias);
        SqlFragment::new(format!(
            "{} JOIN {table} ON {left} = {right}",
            expr.kind.as_str()
        ))
    }

    fn order_by(&self, expr: &[OrderBy], use_table_alias: bool) -> SqlFragment {
        let sql = expr
            .iter()
            .map(|o| {
                format!(
                    "{} {}",
                    self.column_ref(&o.column, use_table_alias),
                    o.order.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        SqlFragment::new(sql)
    }

    fn limit(&self, expr: &Limit) -> SqlFragment {
        SqlFragment::with_args("LIMIT ?", vec![Value::Long(expr.0)])
    }

    fn offset(&self, expr: &Offset) -> SqlFragment {
        SqlFragment::with_args("OFFSET ?", vec![Value::Long(expr.0)])
    }

    fn update(&self, expr: &UpdateStatement, use_table_alias: bool) -> SqlFragment {
        let mut out = SqlFragment::new("UPDATE ");
        out.push_str(&self.table_ref(&expr.table, None, use_table_alias))
            .push_str(" SET ");
        out.push(expr.set.render(self, use_table_alias));

        if let Some(condition) = &expr.condition {
            out.push_str(" WHERE ");
            out.push(condition.render(self, use_table_alias));
        }
        out
    }

    fn set(&self, expr: &SetAssignments, use_table_alias: bool) -> SqlFragment {
        let sql = expr
            .assignments
            .iter()
            .map(|a| {
                let column = self.column_ref(&a.column, use_table_alias);
                if a.value.is_null() {
                    format!("{column} = COALESCE(?, {column})")
                } else {
                    format!("{column} = ?")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let args = expr.assignments.iter().map(|a| a.value.clone()).collect();
        SqlFragment::with_args(sql, args)
    }

    fn delete(&self, expr: &DeleteStatement, use_table_alias: bool) -> SqlFragment {
        let mut out = SqlFragment::new("DELETE FROM ");
        out.push_str(&self.table_ref(&expr.table, None, use_table_alias));

        if let Some(condition) = &expr.condition {
            out.push_str(" WHERE ");
            out.push(condition.render(self, use_table_alias));
        }
        out
    }

    fn create_table(&self, expr: &CreateTable) -> SqlFragment {
        let columns = expr
            .columns
            .iter()
            .map(|c| {
                let mut def = format!("{} {}", c.key(), self.column_type(c.column_type()));
                if expr.primary_key.as_ref() == Some(c) {
                    def.push_str(" PRIMARY KEY");
                }
                def
            })
            .collect::<Vec<_>>()
            .join(", ");
        SqlFragment::new(format!(
            "CREATE TABLE IF NOT EXISTS {} ({columns})",
            expr.table.name()
        ))
    }
}
