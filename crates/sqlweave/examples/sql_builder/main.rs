//! Example demonstrating sqlweave's builders without a database.
//!
//! Run with:
//!   cargo run --example sql_builder -p sqlweave

use sqlweave::{Column, SqlQb, SqlResult, Table, qb};

struct Wizards {
    table: Table,
    id: Column<i32>,
    name: Column<String>,
    level: Column<i32>,
    guild: Column<String>,
}

struct WizardSpells {
    table: Table,
    wizard_id: Column<i32>,
    spell_id: Column<i32>,
}

struct Spells {
    table: Table,
    id: Column<i32>,
    name: Column<String>,
}

#[derive(Debug, Default)]
struct Filters {
    search: Option<String>,
    min_level: Option<i32>,
    guilds: Option<Vec<String>>,
    page: i64,
    per_page: i64,
}

fn schema() -> SqlResult<(Wizards, WizardSpells, Spells)> {
    let mut table = Table::new("wizards");
    let id = table.integer("id");
    let name = table.text("name");
    let level = table.integer("level");
    let guild = table.text("guild");
    table.set_primary_key(&id)?;
    let wizards = Wizards {
        table,
        id,
        name,
        level,
        guild,
    };

    let mut table = Table::new("wizard_spells");
    let wizard_id = table.integer("wizard_id");
    let spell_id = table.integer("spell_id");
    let wizard_spells = WizardSpells {
        table,
        wizard_id,
        spell_id,
    };

    let mut table = Table::new("spells");
    let id = table.integer("id");
    let name = table.text("name");
    table.set_primary_key(&id)?;
    let spells = Spells { table, id, name };

    Ok((wizards, wizard_spells, spells))
}

fn list_wizards(w: &Wizards, filters: &Filters) -> SqlResult<qb::Select> {
    qb::select(&w.table)
        .select(&[&w.id, &w.name, &w.level])?
        .where_(|q| {
            q.nullable(|n| {
                n.like_contains(&w.name, filters.search.as_deref());
                n.gte(&w.level, filters.min_level);
                n.in_list(&w.guild, filters.guilds.clone());
            });
        })?
        .order_by_desc(&w.level)
        .paginate(filters.page, filters.per_page)
}

fn main() -> SqlResult<()> {
    let (wizards, wizard_spells, spells) = schema()?;

    println!("{}", wizards.table.create_table().sql);

    let filters = Filters {
        search: Some("mer".into()),
        min_level: None,
        guilds: Some(vec!["Order of Merlin".into(), "Avalon".into()]),
        page: 2,
        per_page: 20,
    };
    println!("{}", list_wizards(&wizards, &filters)?.sql_args()?);

    let spellbook = qb::select(&wizards.table)
        .select(&[&wizards.name, &spells.name])?
        .join(|j| {
            j.left(&wizards.id, &wizard_spells.wizard_id);
        })?
        .join(|j| {
            j.inner(&wizard_spells.spell_id, &spells.id);
        })?
        .sql_args()?;
    println!("{spellbook}");

    let insert = qb::insert(&wizards.table).insert(|a| {
        a.set(&wizards.name, "Nimue");
        a.set(&wizards.level, 40);
        a.set_opt(&wizards.guild, None);
    });
    println!("{}", insert.sql_args()?);

    let update = qb::update(&wizards.table).update_primary(7, |a| {
        a.set(&wizards.level, 41);
        a.set_opt(&wizards.guild, None);
    })?;
    println!("{}", update.sql_args()?);

    let delete = qb::delete(&wizards.table).delete_where(|q| {
        q.lt(&wizards.level, 5);
        q.or(|q| {
            q.is_null(&wizards.guild);
            q.eq(&wizards.guild, "Dropouts");
        });
    })?;
    println!("{}", delete.sql_args()?);

    // Builder errors surface at the offending call.
    if let Err(err) = qb::select(&wizards.table).limit(0) {
        println!("rejected: {err}");
    }
    Ok(())
}
