use tracing::debug;

use crate::{
	config::{BuildConfig, Dimension},
	error::Result,
	frame::Frame,
};

pub fn dimension(frame: &Frame, dim: &Dimension) -> Result<Frame> {
	let table = frame
		.select(&dim.columns)?
		.drop_duplicates()
		.drop_null_leading();

	debug!(table = %dim.table, rows = table.len(), "derived dimension");
	Ok(table)
}

pub fn fact(frame: &Frame, dims: &[Dimension]) -> Result<Frame> {
	let absorbed: Vec<&String> = dims.iter().flat_map(|d| d.absorbed()).collect();
	frame.drop_columns(&absorbed)
}

pub fn star_schema(frame: &Frame, config: &BuildConfig) -> Result<Vec<(String, Frame)>> {
	let mut tables = Vec::with_capacity(config.dimensions.len() + 1);

	for dim in &config.dimensions {
		tables.push((dim.table.clone(), dimension(frame, dim)?));
	}
	tables.push((config.fact_table.clone(), fact(frame, &config.dimensions)?));

	Ok(tables)
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;
	use crate::frame::Value;

	const MATCHES: &str = "\
date,competition,is_competitive_match,opponent,opponent_nationality,stadium,location_city,location_state,location_country,goals_for
2015-03-08,MLS Regular Season,True,Orlando City SC,USA,Citrus Bowl,Orlando,FL,USA,1
2015-03-15,MLS Regular Season,True,New England Revolution,USA,Yankee Stadium,Bronx,NY,USA,2
2015-08-09,MLS Regular Season,True,Orlando City SC,USA,Yankee Stadium,Bronx,NY,USA,5
2016-07-23,Friendly,False,Manchester City,ENG,,,,,1
";

	fn matches() -> Frame {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("match.csv");
		fs::write(&path, MATCHES).unwrap();
		Frame::read_csv(&path).unwrap()
	}

	#[test]
	fn dimensions_are_distinct_and_keyed() {
		let config = BuildConfig::default();
		let df = matches();

		let competition = dimension(&df, &config.dimensions[0]).unwrap();
		assert_eq!(competition.len(), 2);
		assert_eq!(
			competition.rows[1],
			vec![Value::Text("Friendly".into()), Value::Integer(0)]
		);

		let opponent = dimension(&df, &config.dimensions[1]).unwrap();
		assert_eq!(opponent.len(), 3);

		let stadium = dimension(&df, &config.dimensions[2]).unwrap();
		assert_eq!(stadium.columns[0], "stadium");
		assert_eq!(stadium.len(), 2);
	}

	#[test]
	fn fact_keeps_dimension_keys_only() {
		let config = BuildConfig::default();

		let fact = fact(&matches(), &config.dimensions).unwrap();

		assert_eq!(
			fact.columns,
			vec!["date", "competition", "opponent", "stadium", "goals_for"]
		);
		assert_eq!(fact.len(), 4);
		assert!(fact.rows[3][3].is_null());
	}

	#[test]
	fn star_schema_orders_dimensions_before_fact() {
		let config = BuildConfig::default();

		let tables = star_schema(&matches(), &config).unwrap();
		let names: Vec<_> = tables.iter().map(|(name, _)| name.as_str()).collect();

		assert_eq!(
			names,
			vec!["dim_competition", "dim_opponent", "dim_stadium", "fact_matches"]
		);
	}
}
