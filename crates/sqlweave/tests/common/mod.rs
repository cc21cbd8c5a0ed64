//! Shared fixtures for the SQLite integration tests.

#![allow(dead_code)]

use sqlweave::{Column, Executor, FromRow, Row, SqlResult, SqliteClient, Table, qb};

pub struct Guilds {
    pub table: Table,
    pub id: Column<i32>,
    pub name: Column<String>,
}

pub struct Wizards {
    pub table: Table,
    pub id: Column<i32>,
    pub name: Column<String>,
    pub level: Column<i32>,
    pub experience_points: Column<i64>,
    pub guild_id: Column<i32>,
    pub last_login: Column<i64>,
}

pub struct Schema {
    pub guilds: Guilds,
    pub wizards: Wizards,
}

impl Schema {
    pub fn new() -> SqlResult<Self> {
        let mut table = Table::new("guilds");
        let id = table.integer("id");
        let name = table.text("name");
        table.set_primary_key(&id)?;
        let guilds = Guilds { table, id, name };

        let mut table = Table::new("wizards");
        let id = table.integer("id");
        let name = table.text("name");
        let level = table.integer("level");
        let experience_points = table.long("experience_points");
        let guild_id = table.integer("guild_id");
        let last_login = table.timestamp("last_login");
        table.set_primary_key(&id)?;
        let wizards = Wizards {
            table,
            id,
            name,
            level,
            experience_points,
            guild_id,
            last_login,
        };

        Ok(Self { guilds, wizards })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    pub id: i32,
    pub name: String,
    pub level: i32,
    pub guild_id: Option<i32>,
}

/// Expects `id, name, level, guild_id` in that order.
impl FromRow for Wizard {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            level: row.get(2)?,
            guild_id: row.get(3)?,
        })
    }
}

/// In-memory database with `guilds` and `wizards` created.
pub fn setup() -> SqlResult<(SqliteClient, Schema)> {
    let client = SqliteClient::open_in_memory()?;
    let schema = Schema::new()?;
    client.execute(&schema.guilds.table.create_table())?;
    client.execute(&schema.wizards.table.create_table())?;
    Ok((client, schema))
}

pub fn add_guild(client: &SqliteClient, s: &Schema, name: &str) -> SqlResult<i64> {
    qb::insert(&s.guilds.table)
        .insert(|a| {
            a.set(&s.guilds.name, name);
        })
        .persist(client)
}

pub fn add_wizard(
    client: &SqliteClient,
    s: &Schema,
    name: &str,
    level: i32,
    guild_id: Option<i32>,
) -> SqlResult<i64> {
    let w = &s.wizards;
    qb::insert(&w.table)
        .insert(|a| {
            a.set(&w.name, name);
            a.set(&w.level, level);
            a.set(&w.experience_points, i64::from(level) * 100);
            a.set_opt(&w.guild_id, guild_id);
        })
        .persist(client)
}
