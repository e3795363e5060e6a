mod cli;
mod config;
mod db;
mod ddl;
mod error;
mod frame;
mod pipeline;
mod transform;

use std::{
	fs::File,
	io::{self, Write},
	path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::BuildConfig;
use rusqlite::{Connection, OpenFlags};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
	let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	fmt()
		.with_env_filter(env)
		.with_writer(io::stderr)
		.init();

	let cli = Cli::parse();
	let config = BuildConfig::load(cli.config.as_deref())
		.with_context(|| format!("loading config {:?}", cli.config))?;

	let mut out = match cli.output.as_deref() {
		Some(path) => Box::new(
			File::create(path).with_context(|| format!("creating {}", path.display()))?,
		) as Box<dyn Write>,
		None => Box::new(io::stdout()) as Box<dyn Write>,
	};

	match cli.command {
		Commands::Build { database, csv } => {
			let config = with_paths(config, database, csv).resolve(&cli.root);

			info!(database = %config.database.display(), "building");
			let loaded = pipeline::build(&config).context("building database")?;
			out.write_all(loaded_string(&loaded).as_bytes())?;
		}
		Commands::Ddl => {
			let config = config.resolve(&cli.root);
			let script = pipeline::ddl_script(&config).context("preparing DDL")?;
			writeln!(out, "{script}")?;
		}
		Commands::Summary { database } => {
			let config = with_paths(config, database, None).resolve(&cli.root);

			let conn = Connection::open_with_flags(&config.database, OpenFlags::SQLITE_OPEN_READ_ONLY)
				.with_context(|| format!("opening {}", config.database.display()))?;
			out.write_all(summary_string(&conn)?.as_bytes())?;
		}
	}

	Ok(())
}

fn with_paths(
	mut config: BuildConfig,
	database: Option<PathBuf>,
	csv: Option<PathBuf>,
) -> BuildConfig {
	if let Some(database) = database {
		config.database = database;
	}
	if let Some(csv) = csv {
		config.csv = csv;
	}
	config
}

fn loaded_string(loaded: &[(String, usize)]) -> String {
	let mut string = String::from("# Loaded\n```");

	for (table, rows) in loaded {
		string.push_str(&format!("\n{table}: {rows}"));
	}

	string.push_str("\n```\n");
	string
}

fn summary_string(conn: &Connection) -> error::Result<String> {
	let mut string = String::from("# Summary\n```");

	for count in db::summary(conn)? {
		string.push_str(&format!("\n{} {}: {}", count.kind, count.name, count.rows));
	}

	string.push_str("\n```\n");
	Ok(string)
}
