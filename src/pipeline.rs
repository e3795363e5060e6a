use tracing::info;

use crate::{config::BuildConfig, db, ddl, error::Result, frame::Frame, transform};

pub fn ddl_script(config: &BuildConfig) -> Result<String> {
	let scripts = ddl::prepare(&config.ddl_dirs, &config.ddl_sequence)?;
	Ok(ddl::join(&scripts))
}

/// Recreates the database from scratch and returns the row count per loaded
/// table. The DDL and CSV are read and checked before the old file is removed.
pub fn build(config: &BuildConfig) -> Result<Vec<(String, usize)>> {
	let script = ddl_script(config)?;
	info!(scripts = config.ddl_sequence.len(), "prepared DDL");

	let frame = Frame::read_csv(&config.csv)?;
	info!(path = %config.csv.display(), rows = frame.len(), "read matches");
	let tables = transform::star_schema(&frame, config)?;

	let mut conn = db::reset(&config.database)?;
	db::execute_ddl(&conn, &script)?;

	let loaded = db::load(&mut conn, &tables)?;

	conn.close().map_err(|(_, e)| e)?;
	Ok(loaded)
}
