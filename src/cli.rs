use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Builds the NYCFC match history database", long_about = None)]
pub struct Cli {
	#[arg(short, long, value_name = "FILE")]
	pub output: Option<PathBuf>,

	/// Directory that relative paths in the config are resolved against
	#[arg(long, value_name = "DIR", default_value = ".")]
	pub root: PathBuf,

	/// YAML build config; built-in club layout when omitted
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Recreate the database and load the CSV
	Build {
		#[arg(long, value_name = "FILE")]
		database: Option<PathBuf>,
		#[arg(long, value_name = "FILE")]
		csv: Option<PathBuf>,
	},
	/// Print the joined DDL script
	Ddl,
	/// Print row counts of an existing database
	Summary {
		#[arg(long, value_name = "FILE")]
		database: Option<PathBuf>,
	},
}
