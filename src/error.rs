use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	#[error("this SQL file does not end with a semi-colon: {}", .0.display())]
	MissingSemicolon(PathBuf),

	#[error("no .sql file named `{0}` in any DDL directory")]
	UnknownDdl(String),

	#[error("column `{0}` not found in CSV header")]
	MissingColumn(String),

	#[error("CSV line {line} has {fields} fields but the header has {expected}")]
	LongRecord {
		line: u64,
		fields: usize,
		expected: usize,
	},

	#[error("invalid config: {0}")]
	Config(String),

	#[error("{}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Sql(#[from] rusqlite::Error),

	#[error(transparent)]
	Csv(#[from] csv::Error),

	#[error(transparent)]
	Yaml(#[from] serde_yaml::Error),
}

impl Error {
	pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Error::Io {
			path: path.into(),
			source,
		}
	}
}
