//! Integration tests for the qb module.

use crate::error::SqlError;
use crate::expr::Order;
use crate::qb::{SqlQb, delete, insert, select, update};
use crate::schema::{Column, Table};
use crate::value::Value;

struct Wizards {
    table: Table,
    id: Column<i32>,
    name: Column<String>,
    level: Column<i32>,
    experience_points: Column<i64>,
    last_login: Column<i64>,
    guild: Column<String>,
}

fn wizards() -> Wizards {
    let mut table = Table::new("wizards");
    let id = table.integer("id");
    let name = table.text("name");
    let level = table.integer("level");
    let experience_points = table.long("experience_points");
    let last_login = table.timestamp("last_login");
    let guild = table.text("guild");
    table.set_primary_key(&id).unwrap();
    Wizards {
        table,
        id,
        name,
        level,
        experience_points,
        last_login,
        guild,
    }
}

struct WizardSpells {
    table: Table,
    wizard_id: Column<i32>,
    spell_id: Column<i32>,
}

fn wizard_spells() -> WizardSpells {
    let mut table = Table::new("wizard_spells");
    let wizard_id = table.integer("wizard_id");
    let spell_id = table.integer("spell_id");
    WizardSpells {
        table,
        wizard_id,
        spell_id,
    }
}

struct Spells {
    table: Table,
    id: Column<i32>,
    name: Column<String>,
}

fn spells() -> Spells {
    let mut table = Table::new("spells");
    let id = table.integer("id");
    let name = table.text("name");
    table.set_primary_key(&id).unwrap();
    Spells { table, id, name }
}

// ==================== SELECT ====================

#[test]
fn test_select_default_projection() {
    let w = wizards();
    let query = select(&w.table).sql_args().unwrap();
    assert_eq!(query.sql, "SELECT 1 FROM wizards w");
    assert!(query.args.is_empty());
}

#[test]
fn test_select_all_columns() {
    let w = wizards();
    let sql = select(&w.table).select_all(&[]).unwrap().to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT w.id, w.name, w.level, w.experience_points, w.last_login, w.guild FROM wizards w"
    );
}

#[test]
fn test_select_all_except() {
    let w = wizards();
    let sql = select(&w.table)
        .select_all(&[&w.experience_points, &w.last_login])
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT w.id, w.name, w.level, w.guild FROM wizards w");
}

#[test]
fn test_select_with_conditions() {
    let w = wizards();
    let query = select(&w.table)
        .select(&[&w.name, &w.level])
        .unwrap()
        .where_(|q| {
            q.gte(&w.level, 10);
            q.eq(&w.guild, "Order of Merlin");
        })
        .unwrap()
        .sql_args()
        .unwrap();

    assert_eq!(
        query.sql,
        "SELECT w.name, w.level FROM wizards w WHERE w.level >= ? AND w.guild = ?"
    );
    assert_eq!(
        query.args,
        vec![Value::Int(10), Value::Text("Order of Merlin".into())]
    );
}

#[test]
fn test_select_single_predicate_renders_bare() {
    let w = wizards();
    let sql = select(&w.table)
        .where_(|q| {
            q.lt(&w.level, 5);
        })
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT 1 FROM wizards w WHERE w.level < ?");
}

#[test]
fn test_select_appends_columns() {
    let w = wizards();
    let sql = select(&w.table)
        .select(&[&w.name])
        .unwrap()
        .select(&[&w.level])
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT w.name, w.level FROM wizards w");
}

#[test]
fn test_select_empty_columns_is_error() {
    let w = wizards();
    let err = select(&w.table).select(&[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation error: select columns can not be empty"
    );
}

#[test]
fn test_select_count() {
    let w = wizards();
    let query = select(&w.table)
        .count()
        .where_(|q| {
            q.gt(&w.level, 50);
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(query.sql, "SELECT COUNT(*) FROM wizards w WHERE w.level > ?");
    assert_eq!(query.args, vec![Value::Int(50)]);
}

#[test]
fn test_select_exists() {
    let w = wizards();
    let query = select(&w.table)
        .exists()
        .where_(|q| {
            q.eq(&w.name, "Merlin");
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT EXISTS (SELECT 1 FROM wizards w WHERE w.name = ?)"
    );
    assert_eq!(query.args, vec![Value::Text("Merlin".into())]);
}

#[test]
fn test_select_exists_wraps_order_and_limit() {
    let w = wizards();
    let query = select(&w.table)
        .exists()
        .where_(|q| {
            q.gt(&w.level, 1);
        })
        .unwrap()
        .order_by_desc(&w.level)
        .limit(1)
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT EXISTS (SELECT 1 FROM wizards w WHERE w.level > ? ORDER BY w.level DESC LIMIT ?)"
    );
    assert_eq!(query.args, vec![Value::Int(1), Value::Long(1)]);
}

#[test]
fn test_select_primary() {
    let w = wizards();
    let query = select(&w.table)
        .select_primary(7, &[&w.name])
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(query.sql, "SELECT w.name FROM wizards w WHERE w.id = ?");
    assert_eq!(query.args, vec![Value::Int(7)]);
}

#[test]
fn test_select_primary_without_primary_key() {
    let ws = wizard_spells();
    let err = select(&ws.table).select_primary(1, &[]).unwrap_err();
    assert!(matches!(err, SqlError::MissingPrimaryKey { ref table } if table == "wizard_spells"));
}

#[test]
fn test_select_order_by() {
    let w = wizards();
    let sql = select(&w.table)
        .select(&[&w.name])
        .unwrap()
        .order_by_desc(&w.level)
        .order_by(&w.name, Order::Asc)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT w.name FROM wizards w ORDER BY w.level DESC, w.name ASC"
    );
}

#[test]
fn test_like_helpers() {
    let w = wizards();
    let query = select(&w.table)
        .where_(|q| {
            q.like_contains(&w.name, "erl");
            q.like_starts(&w.guild, "Order");
            q.not_like(&w.name, "%Dark%");
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT 1 FROM wizards w WHERE w.name LIKE ? AND w.guild LIKE ? AND w.name NOT LIKE ?"
    );
    assert_eq!(
        query.args,
        vec![
            Value::Text("%erl%".into()),
            Value::Text("Order%".into()),
            Value::Text("%Dark%".into()),
        ]
    );
}

#[test]
fn test_in_list_and_between() {
    let w = wizards();
    let query = select(&w.table)
        .where_(|q| {
            q.in_list(&w.level, [1, 2, 3]);
            q.between(&w.experience_points, 100, 500);
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT 1 FROM wizards w WHERE w.level IN (?, ?, ?) AND w.experience_points BETWEEN ? AND ?"
    );
    assert_eq!(
        query.args,
        vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
            Value::Long(100),
            Value::Long(500),
        ]
    );
}

#[test]
fn test_empty_in_list_is_error() {
    let w = wizards();
    let err = select(&w.table)
        .where_(|q| {
            q.eq(&w.name, "Merlin");
            q.not_in_list(&w.level, Vec::<i32>::new());
        })
        .unwrap_err();
    assert!(matches!(err, SqlError::EmptyInList { ref column } if column == "level"));
}

#[test]
fn test_is_null_checks() {
    let w = wizards();
    let query = select(&w.table)
        .where_(|q| {
            q.is_null(&w.last_login);
            q.is_not_null(&w.guild);
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT 1 FROM wizards w WHERE w.last_login IS NULL AND w.guild IS NOT NULL"
    );
    assert!(query.args.is_empty());
}

#[test]
fn test_group_uses_enclosing_operator() {
    let w = wizards();
    let top = select(&w.table)
        .where_(|q| {
            q.gt(&w.level, 1);
            q.group(|q| {
                q.eq(&w.name, "Merlin");
                q.eq(&w.guild, "Avalon");
            });
        })
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(
        top,
        "SELECT 1 FROM wizards w WHERE w.level > ? AND (w.name = ? AND w.guild = ?)"
    );

    let query = select(&w.table)
        .where_(|q| {
            q.or(|q| {
                q.group(|q| {
                    q.lt(&w.level, 5);
                    q.gt(&w.level, 90);
                });
                q.eq(&w.guild, "Dropouts");
            });
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT 1 FROM wizards w WHERE ((w.level < ? OR w.level > ?) OR w.guild = ?)"
    );
    assert_eq!(
        query.args,
        vec![Value::Int(5), Value::Int(90), Value::Text("Dropouts".into())]
    );
}

#[test]
fn test_cond_skips_block() {
    let w = wizards();
    let only_active = false;
    let sql = select(&w.table)
        .where_(|q| {
            q.gt(&w.level, 1);
            q.cond(only_active, |q| {
                q.is_not_null(&w.last_login);
            });
        })
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT 1 FROM wizards w WHERE w.level > ?");
}

#[test]
fn test_where_exists_subquery() {
    let w = wizards();
    let ws = wizard_spells();
    let subquery = select(&ws.table)
        .where_(|q| {
            q.eq(&ws.spell_id, 3);
        })
        .unwrap();
    let query = select(&w.table)
        .select(&[&w.name])
        .unwrap()
        .where_(|q| {
            q.gt(&w.level, 10);
            q.exists(&subquery);
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT w.name FROM wizards w WHERE w.level > ? AND EXISTS (SELECT 1 FROM wizard_spells ws WHERE ws.spell_id = ?)"
    );
    assert_eq!(query.args, vec![Value::Int(10), Value::Int(3)]);
}

// ==================== Nullable filters ====================

#[test]
fn test_nullable_skips_none() {
    let w = wizards();
    let name: Option<&str> = None;
    let query = select(&w.table)
        .where_(|q| {
            q.nullable(|n| {
                n.like_contains(&w.name, name);
                n.eq(&w.guild, None);
                n.gte(&w.level, Some(3));
            });
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(query.sql, "SELECT 1 FROM wizards w WHERE w.level >= ?");
    assert_eq!(query.args, vec![Value::Int(3)]);
}

#[test]
fn test_nullable_keeps_explicit_null_checks() {
    let w = wizards();
    let query = select(&w.table)
        .where_(|q| {
            q.nullable(|n| {
                n.eq(&w.name, None);
                n.is_null(&w.last_login);
                n.gte(&w.level, Some(3));
                n.lt(&w.experience_points, None);
                n.is_not_null(&w.guild);
            });
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT 1 FROM wizards w WHERE w.last_login IS NULL AND w.level >= ? AND w.guild IS NOT NULL"
    );
    assert_eq!(query.args, vec![Value::Int(3)]);
}

#[test]
fn test_nullable_group_inside_or() {
    let w = wizards();
    let query = select(&w.table)
        .where_(|q| {
            q.nullable(|n| {
                n.or(|n| {
                    n.group(|n| {
                        n.eq(&w.name, Some("Merlin".to_string()));
                        n.eq(&w.guild, None);
                        n.lt(&w.level, Some(5));
                    });
                    n.is_null(&w.guild);
                });
            });
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT 1 FROM wizards w WHERE ((w.name = ? OR w.level < ?) OR w.guild IS NULL)"
    );
    assert_eq!(query.args, vec![Value::Text("Merlin".into()), Value::Int(5)]);
}

#[test]
fn test_nullable_all_absent_has_no_where() {
    let w = wizards();
    let query = select(&w.table)
        .where_(|q| {
            q.nullable(|n| {
                n.eq(&w.name, None);
                n.in_list(&w.level, Some(Vec::new()));
                n.between(&w.experience_points, None, None);
                n.or(|n| {
                    n.eq(&w.guild, None);
                });
            });
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(query.sql, "SELECT 1 FROM wizards w");
    assert!(query.args.is_empty());
}

#[test]
fn test_nullable_between_degrades() {
    let w = wizards();
    let low_only = select(&w.table)
        .where_(|q| {
            q.nullable(|n| {
                n.between(&w.level, Some(5), None);
            });
        })
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(low_only, "SELECT 1 FROM wizards w WHERE w.level >= ?");

    let high_only = select(&w.table)
        .where_(|q| {
            q.nullable(|n| {
                n.between(&w.level, None, Some(9));
            });
        })
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(high_only, "SELECT 1 FROM wizards w WHERE w.level <= ?");
}

#[test]
fn test_nullable_strict_block_still_errors() {
    let w = wizards();
    let err = select(&w.table)
        .where_(|q| {
            q.nullable(|n| {
                n.strict(|q| {
                    q.in_list(&w.level, Vec::<i32>::new());
                });
            });
        })
        .unwrap_err();
    assert!(matches!(err, SqlError::EmptyInList { .. }));
}

// ==================== JOIN ====================

#[test]
fn test_join_chain() {
    let w = wizards();
    let ws = wizard_spells();
    let s = spells();

    let select = select(&w.table)
        .select(&[&w.name, &s.name])
        .unwrap()
        .join(|j| {
            j.left(&w.id, &ws.wizard_id);
        })
        .unwrap()
        .join(|j| {
            j.inner(&ws.spell_id, &s.id);
        })
        .unwrap();

    assert_eq!(
        select.to_sql().unwrap(),
        "SELECT w.name, s.name FROM wizards w \
         LEFT JOIN wizard_spells ws ON w.id = ws.wizard_id \
         INNER JOIN spells s ON ws.spell_id = s.id"
    );
    let context = select.join_context().unwrap();
    assert_eq!(context.len(), 2);
    assert_eq!(context.table_alias("wizard_spells"), Some("ws"));
    assert_eq!(context.table_alias("spells"), Some("s"));
}

#[test]
fn test_join_home_on_right_side() {
    let w = wizards();
    let ws = wizard_spells();
    let sql = select(&w.table)
        .join(|j| {
            j.right(&ws.wizard_id, &w.id);
        })
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT 1 FROM wizards w RIGHT JOIN wizard_spells ws ON ws.wizard_id = w.id"
    );
}

#[test]
fn test_join_prefers_unregistered_left() {
    let w = wizards();
    let ws = wizard_spells();
    let s = spells();
    // `spells` is not registered yet, `wizard_spells` is: the left side is joined.
    let sql = select(&w.table)
        .join(|j| {
            j.inner(&w.id, &ws.wizard_id);
        })
        .unwrap()
        .join(|j| {
            j.left(&s.id, &ws.spell_id);
        })
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT 1 FROM wizards w \
         INNER JOIN wizard_spells ws ON w.id = ws.wizard_id \
         LEFT JOIN spells s ON s.id = ws.spell_id"
    );
}

#[test]
fn test_join_without_condition() {
    let w = wizards();
    let err = select(&w.table).join(|_| {}).unwrap_err();
    assert!(matches!(err, SqlError::MissingJoinCondition));
}

#[test]
fn test_join_rejects_second_pairing() {
    let w = wizards();
    let ws = wizard_spells();
    let s = spells();
    let err = select(&w.table)
        .join(|j| {
            j.left(&w.id, &ws.wizard_id);
            j.left(&ws.spell_id, &s.id);
        })
        .unwrap_err();
    assert!(matches!(err, SqlError::Validation(_)));
}

// ==================== Pagination ====================

#[test]
fn test_paginate() {
    let w = wizards();
    let query = select(&w.table)
        .select_all(&[])
        .unwrap()
        .paginate(2, 10)
        .unwrap()
        .sql_args()
        .unwrap();
    assert!(query.sql.ends_with(" FROM wizards w LIMIT ? OFFSET ?"));
    assert_eq!(query.args, vec![Value::Long(10), Value::Long(10)]);
}

#[test]
fn test_offset_without_limit() {
    let w = wizards();
    let query = select(&w.table).offset(20).unwrap().sql_args().unwrap();
    assert_eq!(query.sql, "SELECT 1 FROM wizards w LIMIT -1 OFFSET ?");
    assert_eq!(query.args, vec![Value::Long(20)]);
}

#[test]
fn test_limit_and_offset_validation() {
    let w = wizards();
    let err = select(&w.table).limit(0).unwrap_err();
    assert_eq!(err.to_string(), "Validation error: Limit must be greater than 0");

    let err = select(&w.table).offset(-1).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation error: Offset must be greater than or equal to 0"
    );

    assert!(select(&w.table).offset(0).is_ok());
    assert!(select(&w.table).paginate(0, 10).is_err());
    assert!(select(&w.table).paginate(1, 0).is_err());
}

// ==================== INSERT ====================

#[test]
fn test_insert_declaration_order() {
    let w = wizards();
    let query = insert(&w.table)
        .insert(|a| {
            a.set(&w.level, 1);
            a.set(&w.name, "Merlin");
        })
        .sql_args()
        .unwrap();
    assert_eq!(query.sql, "INSERT INTO wizards (name, level) VALUES (?, ?)");
    assert_eq!(query.args, vec![Value::Text("Merlin".into()), Value::Int(1)]);
}

#[test]
fn test_insert_omits_null_assignments() {
    let w = wizards();
    let query = insert(&w.table)
        .insert(|a| {
            a.set(&w.name, "Merlin");
            a.set_opt(&w.guild, None);
            a.set_null(&w.last_login);
        })
        .sql_args()
        .unwrap();
    assert_eq!(query.sql, "INSERT INTO wizards (name) VALUES (?)");
    assert_eq!(query.args, vec![Value::Text("Merlin".into())]);
}

#[test]
fn test_insert_last_assignment_wins() {
    let w = wizards();
    let query = insert(&w.table)
        .insert(|a| {
            a.set(&w.level, 1);
        })
        .insert(|a| {
            a.set(&w.level, 2);
        })
        .sql_args()
        .unwrap();
    assert_eq!(query.sql, "INSERT INTO wizards (level) VALUES (?)");
    assert_eq!(query.args, vec![Value::Int(2)]);
}

#[test]
fn test_insert_only_nulls_is_error() {
    let w = wizards();
    let err = insert(&w.table)
        .insert(|a| {
            a.set_opt(&w.name, None);
        })
        .sql_args()
        .unwrap_err();
    assert!(matches!(err, SqlError::EmptyInsert));
    assert_eq!(err.to_string(), "No columns specified for insert");
}

#[test]
fn test_insert_rejects_column_of_other_table() {
    let w = wizards();
    let s = spells();
    let err = insert(&w.table)
        .insert(|a| {
            a.set(&w.name, "Merlin");
            a.set(&s.name, "Fireball");
        })
        .sql_args()
        .unwrap_err();
    assert!(matches!(err, SqlError::Validation(_)));
    assert_eq!(
        err.to_string(),
        "Validation error: Column 'name' does not belong to table 'wizards'"
    );

    // A null assignment is checked before it is dropped.
    let err = insert(&w.table)
        .insert(|a| {
            a.set(&w.name, "Merlin");
            a.set_opt(&s.name, None);
        })
        .sql_args()
        .unwrap_err();
    assert!(matches!(err, SqlError::Validation(_)));
}

// ==================== UPDATE ====================

#[test]
fn test_update_coalesces_nulls() {
    let w = wizards();
    let query = update(&w.table)
        .update_primary(7, |a| {
            a.set(&w.level, 10);
            a.set_opt(&w.guild, None);
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(
        query.sql,
        "UPDATE wizards SET level = ?, guild = COALESCE(?, guild) WHERE id = ?"
    );
    assert_eq!(query.args, vec![Value::Int(10), Value::Null, Value::Int(7)]);
}

#[test]
fn test_update_call_order() {
    let w = wizards();
    let sql = update(&w.table)
        .update(|a| {
            a.set(&w.guild, "Shadow Council");
            a.set(&w.name, "Morgana");
        })
        .where_(|q| {
            q.eq(&w.name, "Morgan");
        })
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE wizards SET guild = ?, name = ? WHERE name = ?"
    );
}

#[test]
fn test_update_without_assignments_is_error() {
    let w = wizards();
    let err = update(&w.table)
        .where_(|q| {
            q.eq(&w.id, 1);
        })
        .unwrap()
        .sql_args()
        .unwrap_err();
    assert!(matches!(err, SqlError::EmptyUpdate));
}

#[test]
fn test_update_rejects_column_of_other_table() {
    let w = wizards();
    let s = spells();
    let err = update(&w.table)
        .update_primary(7, |a| {
            a.set(&w.level, 2);
            a.set(&s.name, "Fireball");
        })
        .unwrap()
        .sql_args()
        .unwrap_err();
    assert!(matches!(err, SqlError::Validation(_)));
}

// ==================== DELETE ====================

#[test]
fn test_delete_primary() {
    let w = wizards();
    let query = delete(&w.table).delete_primary(1).unwrap().sql_args().unwrap();
    assert_eq!(query.sql, "DELETE FROM wizards WHERE id = ?");
    assert_eq!(query.args, vec![Value::Int(1)]);
}

#[test]
fn test_delete_nested_groups() {
    let w = wizards();
    let query = delete(&w.table)
        .delete_where(|q| {
            q.and(|q| {
                q.lt(&w.level, 5);
                q.or(|q| {
                    q.lt(&w.experience_points, 100);
                    q.is_null(&w.last_login);
                });
            });
            q.not(|q| {
                q.eq(&w.guild, "Order of Merlin");
            });
        })
        .unwrap()
        .sql_args()
        .unwrap();
    assert_eq!(
        query.sql,
        "DELETE FROM wizards WHERE (level < ? AND (experience_points < ? OR last_login IS NULL)) AND NOT (guild = ?)"
    );
    assert_eq!(
        query.args,
        vec![
            Value::Int(5),
            Value::Long(100),
            Value::Text("Order of Merlin".into()),
        ]
    );
}

#[test]
fn test_delete_or_group_then_not() {
    let w = wizards();
    let sql = delete(&w.table)
        .delete_where(|q| {
            q.lt(&w.level, 5);
            q.or(|q| {
                q.lt(&w.experience_points, 100);
                q.is_null(&w.last_login);
            });
            q.not(|q| {
                q.eq(&w.guild, "Order of Merlin");
            });
        })
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "DELETE FROM wizards WHERE level < ? AND (experience_points < ? OR last_login IS NULL) AND NOT (guild = ?)"
    );
}

#[test]
fn test_delete_without_where() {
    let w = wizards();
    assert_eq!(delete(&w.table).to_sql().unwrap(), "DELETE FROM wizards");
}

#[test]
fn test_delete_primary_without_primary_key() {
    let ws = wizard_spells();
    let err = delete(&ws.table).delete_primary(1).unwrap_err();
    assert_eq!(err.to_string(), "Table 'wizard_spells' has no primary key");
}

// ==================== Rendering invariants ====================

#[test]
fn test_sql_args_is_deterministic() {
    let w = wizards();
    let select = select(&w.table)
        .select(&[&w.name])
        .unwrap()
        .where_(|q| {
            q.in_list(&w.level, [3, 4]);
            q.or(|q| {
                q.like(&w.name, "M%");
                q.is_null(&w.guild);
            });
        })
        .unwrap()
        .limit(5)
        .unwrap();
    let first = select.sql_args().unwrap();
    let second = select.sql_args().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_placeholders_match_args() {
    let w = wizards();
    let ws = wizard_spells();
    let queries = vec![
        select(&w.table)
            .join(|j| {
                j.inner(&w.id, &ws.wizard_id);
            })
            .unwrap()
            .where_(|q| {
                q.between(&w.level, 1, 9);
                q.not(|q| {
                    q.in_list(&ws.spell_id, [1, 2]);
                });
            })
            .unwrap()
            .paginate(3, 25)
            .unwrap()
            .sql_args()
            .unwrap(),
        update(&w.table)
            .update(|a| {
                a.set_opt(&w.guild, None);
                a.set(&w.level, 2);
            })
            .sql_args()
            .unwrap(),
        insert(&w.table)
            .insert(|a| {
                a.set(&w.name, "Nimue");
                a.set(&w.experience_points, 12i64);
            })
            .sql_args()
            .unwrap(),
    ];
    for query in queries {
        assert_eq!(query.placeholder_count(), query.args.len(), "{query}");
    }
}

#[test]
fn test_prefixed_columns() {
    let mut table = Table::builder("wizard_spells").prefix_columns(true).build();
    let wizard_id = table.integer("wizard_id");
    let sql = select(&table)
        .select(&[&wizard_id])
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT ws.wizard_spells_wizard_id FROM wizard_spells ws"
    );
}
