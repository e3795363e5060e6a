use std::{
	collections::HashSet,
	fs,
	path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dimension {
	pub table: String,
	pub columns: Vec<String>,
}

impl Dimension {
	fn new(table: &str, columns: &[&str]) -> Self {
		Dimension {
			table: table.to_owned(),
			columns: columns.iter().map(|c| c.to_string()).collect(),
		}
	}

	/// Columns that move out of the fact table into this dimension.
	pub fn absorbed(&self) -> &[String] {
		self.columns.get(1..).unwrap_or(&[])
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
	pub database: PathBuf,
	pub csv: PathBuf,
	pub ddl_dirs: Vec<PathBuf>,
	pub ddl_sequence: Vec<String>,
	pub dimensions: Vec<Dimension>,
	pub fact_table: String,
}

impl Default for BuildConfig {
	fn default() -> Self {
		BuildConfig {
			database: PathBuf::from("nycfc.db"),
			csv: PathBuf::from("match.csv"),
			ddl_dirs: vec![PathBuf::from("_sql_table"), PathBuf::from("_sql_view")],
			ddl_sequence: [
				"dim_competition",
				"dim_opponent",
				"dim_stadium",
				"fact_matches",
				"vw_matches_comp",
				"vw_mls_regular_season",
			]
			.iter()
			.map(|s| s.to_string())
			.collect(),
			dimensions: vec![
				Dimension::new("dim_competition", &["competition", "is_competitive_match"]),
				Dimension::new("dim_opponent", &["opponent", "opponent_nationality"]),
				Dimension::new(
					"dim_stadium",
					&["stadium", "location_city", "location_state", "location_country"],
				),
			],
			fact_table: "fact_matches".to_owned(),
		}
	}
}

impl BuildConfig {
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let config = match path {
			Some(path) => {
				debug!(path = %path.display(), "reading config");
				let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
				serde_yaml::from_str::<BuildConfig>(&text)?
			}
			None => BuildConfig::default(),
		};
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		let mut names = HashSet::new();

		for dim in &self.dimensions {
			if dim.columns.is_empty() {
				return Err(Error::Config(format!("dimension `{}` has no columns", dim.table)));
			}
			if !names.insert(dim.table.as_str()) {
				return Err(Error::Config(format!("table `{}` is defined twice", dim.table)));
			}
		}

		if !names.insert(self.fact_table.as_str()) {
			return Err(Error::Config(format!(
				"fact table `{}` clashes with a dimension",
				self.fact_table
			)));
		}

		Ok(())
	}

	/// Anchors every relative path at `root`.
	pub fn resolve(mut self, root: &Path) -> Self {
		self.database = root.join(&self.database);
		self.csv = root.join(&self.csv);
		self.ddl_dirs = self.ddl_dirs.iter().map(|d| root.join(d)).collect();
		self
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn defaults_describe_the_club_schema() {
		let config = BuildConfig::load(None).unwrap();

		assert_eq!(config.database, PathBuf::from("nycfc.db"));
		assert_eq!(config.ddl_sequence.len(), 6);
		assert_eq!(config.dimensions[2].absorbed().len(), 3);
		assert_eq!(config.fact_table, "fact_matches");
	}

	#[test]
	fn partial_yaml_keeps_defaults() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "database: club.db\ncsv: data/games.csv").unwrap();

		let config = BuildConfig::load(Some(file.path())).unwrap();

		assert_eq!(config.database, PathBuf::from("club.db"));
		assert_eq!(config.csv, PathBuf::from("data/games.csv"));
		assert_eq!(config.dimensions, BuildConfig::default().dimensions);
	}

	#[test]
	fn empty_dimension_is_rejected() {
		let mut config = BuildConfig::default();
		config.dimensions[0].columns.clear();

		assert!(matches!(config.validate(), Err(Error::Config(_))));
	}

	#[test]
	fn fact_table_cannot_shadow_a_dimension() {
		let config = BuildConfig {
			fact_table: "dim_opponent".to_owned(),
			..BuildConfig::default()
		};

		assert!(matches!(config.validate(), Err(Error::Config(_))));
	}

	#[test]
	fn resolve_leaves_absolute_paths_alone() {
		let config = BuildConfig {
			database: PathBuf::from("/tmp/abs.db"),
			..BuildConfig::default()
		}
		.resolve(Path::new("/srv/club"));

		assert_eq!(config.database, PathBuf::from("/tmp/abs.db"));
		assert_eq!(config.csv, PathBuf::from("/srv/club/match.csv"));
		assert_eq!(config.ddl_dirs[1], PathBuf::from("/srv/club/_sql_view"));
	}
}
