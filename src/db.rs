use std::{fs, path::Path};

use rusqlite::{params_from_iter, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::{
	error::{Error, Result},
	frame::Frame,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
	pub name: String,
	pub kind: String,
	pub rows: usize,
}

fn quote(ident: &str) -> String {
	format!("\"{}\"", ident.replace('"', "\"\""))
}

pub fn reset(path: &Path) -> Result<Connection> {
	if path.exists() {
		info!(path = %path.display(), "removing existing database");
		fs::remove_file(path).map_err(|e| Error::io(path, e))?;
	}

	Ok(Connection::open(path)?)
}

pub fn execute_ddl(conn: &Connection, script: &str) -> Result<()> {
	conn.execute_batch(script)?;
	Ok(())
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
	let found = conn
		.query_row(
			"SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
			[table],
			|_| Ok(()),
		)
		.optional()?;

	Ok(found.is_some())
}

fn create_table(conn: &Connection, table: &str, frame: &Frame) -> Result<()> {
	let columns: Vec<String> = frame
		.columns
		.iter()
		.zip(&frame.types)
		.map(|(name, ty)| format!("{} {}", quote(name), ty.affinity()))
		.collect();

	conn.execute(
		&format!("CREATE TABLE {} ({});", quote(table), columns.join(", ")),
		[],
	)?;

	Ok(())
}

pub fn append(conn: &Connection, table: &str, frame: &Frame) -> Result<usize> {
	if !table_exists(conn, table)? {
		debug!(table, "table missing from DDL, creating from CSV columns");
		create_table(conn, table, frame)?;
	}

	let columns: Vec<String> = frame.columns.iter().map(|c| quote(c)).collect();
	let placeholders = vec!["?"; columns.len()].join(", ");

	let mut stmt = conn.prepare(&format!(
		"INSERT INTO {} ({}) VALUES ({});",
		quote(table),
		columns.join(", "),
		placeholders
	))?;

	for row in &frame.rows {
		stmt.execute(params_from_iter(row.iter()))?;
	}

	Ok(frame.len())
}

pub fn load(conn: &mut Connection, tables: &[(String, Frame)]) -> Result<Vec<(String, usize)>> {
	let tx = conn.transaction()?;
	let mut loaded = Vec::with_capacity(tables.len());

	for (name, frame) in tables {
		let rows = append(&tx, name, frame)?;
		info!(table = %name, rows, "loaded");
		loaded.push((name.clone(), rows));
	}

	tx.commit()?;
	Ok(loaded)
}

pub fn summary(conn: &Connection) -> Result<Vec<TableCount>> {
	let mut stmt = conn.prepare(
		"SELECT name, type FROM sqlite_master
		 WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'
		 ORDER BY type, name;",
	)?;

	let objects = stmt
		.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
		.collect::<rusqlite::Result<Vec<_>>>()?;

	let mut counts = Vec::with_capacity(objects.len());
	for (name, kind) in objects {
		let rows: i64 = conn.query_row(
			&format!("SELECT COUNT(*) FROM {};", quote(&name)),
			[],
			|row| row.get(0),
		)?;
		counts.push(TableCount {
			name,
			kind,
			rows: rows as usize,
		});
	}

	Ok(counts)
}
