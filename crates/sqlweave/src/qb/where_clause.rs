//! WHERE clause accumulators.
//!
//! [`Where`] is strict: every call adds a predicate, and an empty IN list is an error.
//! [`NullableWhere`] treats `None` as "no filter requested" and adds nothing.
//!
//! Predicates added at the same level are joined with the block operator: AND at
//! the top level, OR inside `or`. Sub-blocks (`and`, `or`, `group`) render
//! parenthesized, `group` reusing the enclosing operator; `not` renders `NOT (...)`.
//!
//! ```ignore
//! let query = qb::delete(&wizards.table)
//!     .delete_where(|w| {
//!         w.and(|w| {
//!             w.lt(&wizards.level, 5);
//!             w.or(|w| {
//!                 w.lt(&wizards.experience_points, 100);
//!                 w.is_null(&wizards.last_login);
//!             });
//!         });
//!         w.not(|w| {
//!             w.eq(&wizards.guild, "Order of Merlin");
//!         });
//!     })?
//!     .sql_args()?;
//! ```

use crate::error::{SqlError, SqlResult};
use crate::expr::{Between, CompareOp, Exists, InList, LogicalOp, Predicate};
use crate::qb::select::Select;
use crate::qb::traits::SqlQb;
use crate::schema::{AsColumn, Column};
use crate::value::{Bind, ColumnValue, Value};

/// Predicates collected at one nesting level plus the first error recorded.
#[derive(Debug, Default)]
struct Conditions {
    predicates: Vec<Predicate>,
    error: Option<SqlError>,
}

impl Conditions {
    fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    fn fail(&mut self, error: SqlError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn compare(&mut self, column: &dyn AsColumn, op: CompareOp, value: Value) {
        self.push(Predicate::compare(column.as_column().clone(), op, value));
    }

    fn in_list(&mut self, column: &dyn AsColumn, values: Vec<Value>, negated: bool) {
        self.push(Predicate::InList(InList {
            column: column.as_column().clone(),
            values,
            negated,
        }));
    }

    fn exists(&mut self, subquery: &Select, negated: bool) {
        match subquery.sql_args() {
            Ok(query) => self.push(Predicate::Exists(Exists {
                subquery: query.sql,
                args: query.args,
                negated,
            })),
            Err(err) => self.fail(err),
        }
    }

    /// Fold a finished sub-block into this level.
    fn absorb(&mut self, child: Conditions, wrap: impl FnOnce(Vec<Predicate>) -> Option<Predicate>) {
        if let Some(err) = child.error {
            self.fail(err);
        }
        if let Some(predicate) = wrap(child.predicates) {
            self.push(predicate);
        }
    }

    fn finish(self, op: LogicalOp) -> SqlResult<Option<Predicate>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Predicate::fold(op, self.predicates)),
        }
    }
}

fn grouped(op: LogicalOp) -> impl FnOnce(Vec<Predicate>) -> Option<Predicate> {
    move |predicates| Predicate::fold(op, predicates).map(Predicate::group)
}

fn negated(op: LogicalOp) -> impl FnOnce(Vec<Predicate>) -> Option<Predicate> {
    move |predicates| Predicate::fold(op, predicates).map(Predicate::not)
}

/// Strict WHERE block.
///
/// Predicates at this level are joined with the block operator: AND at the top
/// level and inside `and`, OR inside `or`. `group` inherits it.
#[derive(Debug)]
pub struct Where {
    conditions: Conditions,
    op: LogicalOp,
}

impl Default for Where {
    fn default() -> Self {
        Self::with_operator(LogicalOp::And)
    }
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_operator(op: LogicalOp) -> Self {
        Self {
            conditions: Conditions::default(),
            op,
        }
    }

    /// Run `block` on a fresh `Where` and fold the result.
    pub fn build(block: impl FnOnce(&mut Where)) -> SqlResult<Option<Predicate>> {
        let mut w = Where::new();
        block(&mut w);
        w.into_predicate()
    }

    /// The combined predicate, or the first error recorded in this block.
    pub fn into_predicate(self) -> SqlResult<Option<Predicate>> {
        self.conditions.finish(self.op)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.predicates.is_empty()
    }

    // ==================== Comparisons ====================

    /// column = value
    pub fn eq<T: ColumnValue>(&mut self, column: &Column<T>, value: impl Bind<T>) -> &mut Self {
        self.conditions.compare(column, CompareOp::Eq, value.bind());
        self
    }

    /// column <> value
    pub fn neq<T: ColumnValue>(&mut self, column: &Column<T>, value: impl Bind<T>) -> &mut Self {
        self.conditions.compare(column, CompareOp::Neq, value.bind());
        self
    }

    /// column < value
    pub fn lt<T: ColumnValue>(&mut self, column: &Column<T>, value: impl Bind<T>) -> &mut Self {
        self.conditions.compare(column, CompareOp::Lt, value.bind());
        self
    }

    /// column <= value
    pub fn lte<T: ColumnValue>(&mut self, column: &Column<T>, value: impl Bind<T>) -> &mut Self {
        self.conditions.compare(column, CompareOp::Lte, value.bind());
        self
    }

    /// column > value
    pub fn gt<T: ColumnValue>(&mut self, column: &Column<T>, value: impl Bind<T>) -> &mut Self {
        self.conditions.compare(column, CompareOp::Gt, value.bind());
        self
    }

    /// column >= value
    pub fn gte<T: ColumnValue>(&mut self, column: &Column<T>, value: impl Bind<T>) -> &mut Self {
        self.conditions.compare(column, CompareOp::Gte, value.bind());
        self
    }

    /// column = value against an untyped column, e.g. a primary key.
    pub fn eq_value(&mut self, column: &dyn AsColumn, value: impl Into<Value>) -> &mut Self {
        self.conditions.compare(column, CompareOp::Eq, value.into());
        self
    }

    /// column <> value against an untyped column.
    pub fn neq_value(&mut self, column: &dyn AsColumn, value: impl Into<Value>) -> &mut Self {
        self.conditions.compare(column, CompareOp::Neq, value.into());
        self
    }

    // ==================== Patterns ====================

    /// column LIKE pattern
    pub fn like(&mut self, column: &Column<String>, pattern: &str) -> &mut Self {
        self.conditions.compare(column, CompareOp::Like, pattern.into());
        self
    }

    /// column LIKE '%text%'
    pub fn like_contains(&mut self, column: &Column<String>, text: &str) -> &mut Self {
        self.like(column, &format!("%{text}%"))
    }

    /// column LIKE 'text%'
    pub fn like_starts(&mut self, column: &Column<String>, text: &str) -> &mut Self {
        self.like(column, &format!("{text}%"))
    }

    /// column LIKE '%text'
    pub fn like_ends(&mut self, column: &Column<String>, text: &str) -> &mut Self {
        self.like(column, &format!("%{text}"))
    }

    /// column ILIKE pattern
    pub fn ilike(&mut self, column: &Column<String>, pattern: &str) -> &mut Self {
        self.conditions.compare(column, CompareOp::ILike, pattern.into());
        self
    }

    /// column NOT LIKE pattern
    pub fn not_like(&mut self, column: &Column<String>, pattern: &str) -> &mut Self {
        self.conditions.compare(column, CompareOp::NotLike, pattern.into());
        self
    }

    // ==================== NULL checks ====================

    /// column IS NULL
    pub fn is_null(&mut self, column: &dyn AsColumn) -> &mut Self {
        self.conditions
            .push(Predicate::is_null(column.as_column().clone()));
        self
    }

    /// column IS NOT NULL
    pub fn is_not_null(&mut self, column: &dyn AsColumn) -> &mut Self {
        self.conditions
            .push(Predicate::is_not_null(column.as_column().clone()));
        self
    }

    // ==================== Lists and ranges ====================

    /// column IN (values...). An empty list is an error.
    pub fn in_list<T, V>(&mut self, column: &Column<T>, values: impl IntoIterator<Item = V>) -> &mut Self
    where
        T: ColumnValue,
        V: Bind<T>,
    {
        self.list(column, values, false)
    }

    /// column NOT IN (values...). An empty list is an error.
    pub fn not_in_list<T, V>(
        &mut self,
        column: &Column<T>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self
    where
        T: ColumnValue,
        V: Bind<T>,
    {
        self.list(column, values, true)
    }

    fn list<T, V>(&mut self, column: &Column<T>, values: impl IntoIterator<Item = V>, negated: bool) -> &mut Self
    where
        T: ColumnValue,
        V: Bind<T>,
    {
        let values: Vec<Value> = values.into_iter().map(|v| Bind::<T>::bind(v)).collect();
        if values.is_empty() {
            self.conditions.fail(SqlError::EmptyInList {
                column: column.key().to_string(),
            });
        } else {
            self.conditions.in_list(column, values, negated);
        }
        self
    }

    /// column BETWEEN low AND high
    pub fn between<T: ColumnValue>(
        &mut self,
        column: &Column<T>,
        low: impl Bind<T>,
        high: impl Bind<T>,
    ) -> &mut Self {
        self.conditions.push(Predicate::Between(Between {
            column: column.as_any().clone(),
            low: low.bind(),
            high: high.bind(),
        }));
        self
    }

    // ==================== Subqueries ====================

    /// EXISTS (subquery)
    pub fn exists(&mut self, subquery: &Select) -> &mut Self {
        self.conditions.exists(subquery, false);
        self
    }

    /// NOT EXISTS (subquery)
    pub fn not_exists(&mut self, subquery: &Select) -> &mut Self {
        self.conditions.exists(subquery, true);
        self
    }

    // ==================== Sub-blocks ====================

    fn nested(
        &mut self,
        op: LogicalOp,
        block: impl FnOnce(&mut Where),
        wrap: impl FnOnce(Vec<Predicate>) -> Option<Predicate>,
    ) -> &mut Self {
        let mut child = Where::with_operator(op);
        block(&mut child);
        self.conditions.absorb(child.conditions, wrap);
        self
    }

    /// (a AND b ...)
    pub fn and(&mut self, block: impl FnOnce(&mut Where)) -> &mut Self {
        self.nested(LogicalOp::And, block, grouped(LogicalOp::And))
    }

    /// (a OR b ...)
    pub fn or(&mut self, block: impl FnOnce(&mut Where)) -> &mut Self {
        self.nested(LogicalOp::Or, block, grouped(LogicalOp::Or))
    }

    /// Parenthesized group joined with this block's operator.
    pub fn group(&mut self, block: impl FnOnce(&mut Where)) -> &mut Self {
        let op = self.op;
        self.nested(op, block, grouped(op))
    }

    /// NOT (a AND b ...)
    pub fn not(&mut self, block: impl FnOnce(&mut Where)) -> &mut Self {
        self.nested(LogicalOp::And, block, negated(LogicalOp::And))
    }

    /// Apply `block` to this level only when `condition` holds.
    pub fn cond(&mut self, condition: bool, block: impl FnOnce(&mut Where)) -> &mut Self {
        if condition {
            block(self);
        }
        self
    }

    /// Switch to optional-filter mode for the predicates in `block`.
    pub fn nullable(&mut self, block: impl FnOnce(&mut NullableWhere)) -> &mut Self {
        let mut child = NullableWhere::with_operator(self.op);
        block(&mut child);
        let Conditions { predicates, error } = child.conditions;
        if let Some(err) = error {
            self.conditions.fail(err);
        }
        self.conditions.predicates.extend(predicates);
        self
    }
}

/// Optional-filter WHERE block: `None` adds no predicate and no argument.
#[derive(Debug)]
pub struct NullableWhere {
    conditions: Conditions,
    op: LogicalOp,
}

impl Default for NullableWhere {
    fn default() -> Self {
        Self::with_operator(LogicalOp::And)
    }
}

impl NullableWhere {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_operator(op: LogicalOp) -> Self {
        Self {
            conditions: Conditions::default(),
            op,
        }
    }

    pub fn into_predicate(self) -> SqlResult<Option<Predicate>> {
        self.conditions.finish(self.op)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.predicates.is_empty()
    }

    fn compare_opt<T: ColumnValue>(&mut self, column: &Column<T>, op: CompareOp, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.conditions.compare(column, op, value.into());
        }
        self
    }

    fn pattern_opt(&mut self, column: &Column<String>, op: CompareOp, pattern: Option<String>) -> &mut Self {
        if let Some(pattern) = pattern {
            self.conditions.compare(column, op, Value::Text(pattern));
        }
        self
    }

    /// column = value, when present
    pub fn eq<T: ColumnValue>(&mut self, column: &Column<T>, value: Option<T>) -> &mut Self {
        self.compare_opt(column, CompareOp::Eq, value)
    }

    /// column <> value, when present
    pub fn neq<T: ColumnValue>(&mut self, column: &Column<T>, value: Option<T>) -> &mut Self {
        self.compare_opt(column, CompareOp::Neq, value)
    }

    /// column < value, when present
    pub fn lt<T: ColumnValue>(&mut self, column: &Column<T>, value: Option<T>) -> &mut Self {
        self.compare_opt(column, CompareOp::Lt, value)
    }

    /// column <= value, when present
    pub fn lte<T: ColumnValue>(&mut self, column: &Column<T>, value: Option<T>) -> &mut Self {
        self.compare_opt(column, CompareOp::Lte, value)
    }

    /// column > value, when present
    pub fn gt<T: ColumnValue>(&mut self, column: &Column<T>, value: Option<T>) -> &mut Self {
        self.compare_opt(column, CompareOp::Gt, value)
    }

    /// column >= value, when present
    pub fn gte<T: ColumnValue>(&mut self, column: &Column<T>, value: Option<T>) -> &mut Self {
        self.compare_opt(column, CompareOp::Gte, value)
    }

    pub fn like(&mut self, column: &Column<String>, pattern: Option<&str>) -> &mut Self {
        self.pattern_opt(column, CompareOp::Like, pattern.map(str::to_string))
    }

    pub fn like_contains(&mut self, column: &Column<String>, text: Option<&str>) -> &mut Self {
        self.pattern_opt(column, CompareOp::Like, text.map(|t| format!("%{t}%")))
    }

    pub fn like_starts(&mut self, column: &Column<String>, text: Option<&str>) -> &mut Self {
        self.pattern_opt(column, CompareOp::Like, text.map(|t| format!("{t}%")))
    }

    pub fn like_ends(&mut self, column: &Column<String>, text: Option<&str>) -> &mut Self {
        self.pattern_opt(column, CompareOp::Like, text.map(|t| format!("%{t}")))
    }

    pub fn ilike(&mut self, column: &Column<String>, pattern: Option<&str>) -> &mut Self {
        self.pattern_opt(column, CompareOp::ILike, pattern.map(str::to_string))
    }

    pub fn not_like(&mut self, column: &Column<String>, pattern: Option<&str>) -> &mut Self {
        self.pattern_opt(column, CompareOp::NotLike, pattern.map(str::to_string))
    }

    /// column IN (values...). `None` or an empty list adds nothing.
    pub fn in_list<T: ColumnValue>(&mut self, column: &Column<T>, values: Option<Vec<T>>) -> &mut Self {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            let values = values.into_iter().map(Into::into).collect();
            self.conditions.in_list(column, values, false);
        }
        self
    }

    /// column NOT IN (values...). `None` or an empty list adds nothing.
    pub fn not_in_list<T: ColumnValue>(&mut self, column: &Column<T>, values: Option<Vec<T>>) -> &mut Self {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            let values = values.into_iter().map(Into::into).collect();
            self.conditions.in_list(column, values, true);
        }
        self
    }

    /// column IS NULL. Explicit null checks always apply.
    pub fn is_null(&mut self, column: &dyn AsColumn) -> &mut Self {
        self.conditions
            .push(Predicate::is_null(column.as_column().clone()));
        self
    }

    /// column IS NOT NULL
    pub fn is_not_null(&mut self, column: &dyn AsColumn) -> &mut Self {
        self.conditions
            .push(Predicate::is_not_null(column.as_column().clone()));
        self
    }

    /// Range filter that degrades to `>=` / `<=` when only one bound is present.
    pub fn between<T: ColumnValue>(&mut self, column: &Column<T>, low: Option<T>, high: Option<T>) -> &mut Self {
        match (low, high) {
            (Some(low), Some(high)) => self.conditions.push(Predicate::Between(Between {
                column: column.as_any().clone(),
                low: low.into(),
                high: high.into(),
            })),
            (Some(low), None) => self.conditions.compare(column, CompareOp::Gte, low.into()),
            (None, Some(high)) => self.conditions.compare(column, CompareOp::Lte, high.into()),
            (None, None) => {}
        }
        self
    }

    fn nested(
        &mut self,
        op: LogicalOp,
        block: impl FnOnce(&mut NullableWhere),
        wrap: impl FnOnce(Vec<Predicate>) -> Option<Predicate>,
    ) -> &mut Self {
        let mut child = NullableWhere::with_operator(op);
        block(&mut child);
        self.conditions.absorb(child.conditions, wrap);
        self
    }

    /// (a AND b ...) over whichever filters were present
    pub fn and(&mut self, block: impl FnOnce(&mut NullableWhere)) -> &mut Self {
        self.nested(LogicalOp::And, block, grouped(LogicalOp::And))
    }

    /// (a OR b ...) over whichever filters were present
    pub fn or(&mut self, block: impl FnOnce(&mut NullableWhere)) -> &mut Self {
        self.nested(LogicalOp::Or, block, grouped(LogicalOp::Or))
    }

    pub fn group(&mut self, block: impl FnOnce(&mut NullableWhere)) -> &mut Self {
        let op = self.op;
        self.nested(op, block, grouped(op))
    }

    pub fn not(&mut self, block: impl FnOnce(&mut NullableWhere)) -> &mut Self {
        let op = self.op;
        self.nested(op, block, negated(op))
    }

    /// Back to strict mode for the predicates in `block`.
    pub fn strict(&mut self, block: impl FnOnce(&mut Where)) -> &mut Self {
        let mut child = Where::with_operator(self.op);
        block(&mut child);
        let Conditions { predicates, error } = child.conditions;
        if let Some(err) = error {
            self.conditions.fail(err);
        }
        self.conditions.predicates.extend(predicates);
        self
    }
}
