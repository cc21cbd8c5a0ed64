//! CRUD against SQLite with pre-write filters and a transaction.
//!
//! Run with:
//!   cargo run --example sqlite_crud -p sqlweave
//!
//! Optional (persist to a file instead of memory):
//!   SQLWEAVE_DB=./wizards.db

use std::env;
use std::time::Duration;

use sqlweave::{
    Column, ExecConfig, Executor, FromRow, Row, SqlError, SqlResult, SqliteClient, Table, qb,
};

#[derive(Debug)]
struct Wizard {
    id: i32,
    name: String,
    level: i32,
}

impl FromRow for Wizard {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            level: row.get("level")?,
        })
    }
}

fn main() -> SqlResult<()> {
    let client = match env::var("SQLWEAVE_DB") {
        Ok(path) => SqliteClient::open(path)?,
        Err(_) => SqliteClient::open_in_memory()?,
    };
    let mut client = client.with_config(
        ExecConfig::new().with_slow_query_threshold(Duration::from_millis(50)),
    );

    let mut wizards = Table::new("wizards");
    let id = wizards.integer("id");
    let name: Column<String> = wizards.text("name");
    let level = wizards.integer("level");
    wizards.set_primary_key(&id)?;
    client.execute(&wizards.create_table())?;

    for (wizard, lvl) in [("Merlin", 90), ("Nimue", 40), ("Morgana", 75)] {
        let key = qb::insert(&wizards)
            .insert(|a| {
                a.set(&name, wizard);
                a.set(&level, lvl);
            })
            .filter(|f| {
                f.unique(&name, wizard);
            })?
            .persist(&client)?;
        println!("inserted {wizard} as #{key}");
    }

    let duplicate = qb::insert(&wizards)
        .insert(|a| {
            a.set(&name, "Merlin");
        })
        .filter(|f| {
            f.unique(&name, "Merlin").message("A wizard with this name already exists");
        })?
        .persist(&client);
    match duplicate {
        Err(err) if err.is_filter_rejection() => println!("rejected: {err}"),
        other => println!("unexpected: {other:?}"),
    }

    let strong: Vec<Wizard> = qb::select(&wizards)
        .select_all(&[])?
        .where_(|q| {
            q.gte(&level, 50);
        })?
        .order_by_desc(&level)
        .fetch_all_as(&client)?;
    for w in &strong {
        println!("#{} {} (level {})", w.id, w.name, w.level);
    }

    let promoted = client.transaction(|tx| {
        let affected = qb::update(&wizards)
            .update(|a| {
                a.set(&level, 50);
            })
            .where_(|q| {
                q.lt(&level, 50);
            })?
            .persist(tx)?;
        if affected > 1 {
            return Err(SqlError::validation("promoted more than one wizard"));
        }
        Ok(affected)
    })?;
    println!("promoted {promoted} wizard(s)");

    let removed = qb::delete(&wizards).delete_primary(3)?.persist(&client)?;
    let remaining = qb::select(&wizards).fetch_count(&client)?;
    println!("removed {removed}, {remaining} remaining");
    Ok(())
}
