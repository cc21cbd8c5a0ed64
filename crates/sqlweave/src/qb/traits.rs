//! Trait definitions for query builders.

use crate::error::SqlResult;
use crate::exec::Executor;
use crate::expr::Statement;
use crate::query::Query;
use crate::schema::Table;

/// Base trait for all query builders.
///
/// Implementors assemble a [`Statement`]; rendering and execution are shared.
pub trait SqlQb {
    /// The table the statement targets. Its dialect renders the statement.
    fn table(&self) -> &Table;

    /// Assemble the expression tree, validating whole-builder preconditions.
    fn statement(&self) -> SqlResult<Statement>;

    /// Whether columns render as `alias.col`. Only SELECT uses aliases.
    fn uses_table_alias(&self) -> bool {
        false
    }

    /// Render to SQL plus ordered arguments.
    ///
    /// Pure with respect to the builder: repeated calls yield equal queries.
    fn sql_args(&self) -> SqlResult<Query> {
        let statement = self.statement()?;
        let fragment = statement.render(self.table().dialect(), self.uses_table_alias());
        tracing::trace!(
            target: "sqlweave::render",
            table = self.table().name(),
            param_count = fragment.args.len(),
            sql = %fragment.sql,
            "rendered statement"
        );
        Ok(Query::from(fragment))
    }

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> SqlResult<String> {
        self.sql_args().map(|query| query.sql)
    }

    /// Render and execute, returning the number of affected rows.
    fn execute(&self, exec: &impl Executor) -> SqlResult<u64> {
        let query = self.sql_args()?;
        exec.execute(&query)
    }
}
