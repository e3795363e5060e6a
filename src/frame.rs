use std::{
	collections::HashSet,
	hash::{Hash, Hasher},
	path::Path,
};

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use tracing::debug;

use crate::error::{Error, Result};

// Spellings a dataframe loader reads as missing.
const NULL_LITERALS: &[&str] = &[
	"", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
	"<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone)]
pub enum Value {
	Null,
	Integer(i64),
	Real(f64),
	Text(String),
}

impl Value {
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}
}

// Reals compare by bit pattern so rows can be hashed for de-duplication.
// Both zeros share one pattern.
fn real_bits(r: f64) -> u64 {
	if r == 0.0 {
		0.0f64.to_bits()
	} else {
		r.to_bits()
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Integer(a), Value::Integer(b)) => a == b,
			(Value::Real(a), Value::Real(b)) => real_bits(*a) == real_bits(*b),
			(Value::Text(a), Value::Text(b)) => a == b,
			_ => false,
		}
	}
}

impl Eq for Value {}

impl Hash for Value {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::mem::discriminant(self).hash(state);
		match self {
			Value::Null => {}
			Value::Integer(i) => i.hash(state),
			Value::Real(r) => real_bits(*r).hash(state),
			Value::Text(s) => s.hash(state),
		}
	}
}

impl ToSql for Value {
	fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
		Ok(match self {
			Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
			Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
			Value::Real(r) => ToSqlOutput::Borrowed(ValueRef::Real(*r)),
			Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
	Boolean,
	Integer,
	Real,
	Text,
}

impl ColumnType {
	/// Narrowest type every non-null cell parses as. A column with no values
	/// at all is numeric, like a dataframe's all-NaN float column.
	fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
		let (mut boolean, mut integer, mut real) = (true, true, true);
		let mut seen = false;

		for cell in cells {
			seen = true;
			let cell = cell.trim();
			boolean &= parse_bool(cell).is_some();
			integer &= cell.parse::<i64>().is_ok();
			real &= cell.parse::<f64>().is_ok();
			if !(boolean || integer || real) {
				return ColumnType::Text;
			}
		}

		if !seen {
			ColumnType::Real
		} else if boolean {
			ColumnType::Boolean
		} else if integer {
			ColumnType::Integer
		} else if real {
			ColumnType::Real
		} else {
			ColumnType::Text
		}
	}

	fn convert(self, cell: &str) -> Value {
		if is_null(cell) {
			return Value::Null;
		}

		let trimmed = cell.trim();
		match self {
			ColumnType::Boolean => parse_bool(trimmed).map_or(Value::Null, |b| Value::Integer(b as i64)),
			ColumnType::Integer => trimmed.parse().map_or(Value::Null, Value::Integer),
			ColumnType::Real => trimmed.parse().map_or(Value::Null, Value::Real),
			ColumnType::Text => Value::Text(cell.to_owned()),
		}
	}

	pub fn affinity(self) -> &'static str {
		match self {
			ColumnType::Boolean | ColumnType::Integer => "INTEGER",
			ColumnType::Real => "REAL",
			ColumnType::Text => "TEXT",
		}
	}
}

fn is_null(cell: &str) -> bool {
	NULL_LITERALS.contains(&cell)
}

fn parse_bool(cell: &str) -> Option<bool> {
	match cell {
		"True" | "true" | "TRUE" => Some(true),
		"False" | "false" | "FALSE" => Some(false),
		_ => None,
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
	pub columns: Vec<String>,
	pub types: Vec<ColumnType>,
	pub rows: Vec<Vec<Value>>,
}

impl Frame {
	pub fn read_csv(path: &Path) -> Result<Self> {
		let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
		let columns: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

		let mut records = Vec::new();
		for record in reader.records() {
			let record = record?;
			if record.len() > columns.len() {
				return Err(Error::LongRecord {
					line: record.position().map_or(0, |p| p.line()),
					fields: record.len(),
					expected: columns.len(),
				});
			}
			records.push(record);
		}

		let types: Vec<ColumnType> = (0..columns.len())
			.map(|i| {
				ColumnType::infer(
					records
						.iter()
						.filter_map(|r| r.get(i))
						.filter(|cell| !is_null(cell)),
				)
			})
			.collect();

		// Short records are padded with nulls.
		let rows = records
			.iter()
			.map(|record| {
				types
					.iter()
					.enumerate()
					.map(|(i, ty)| record.get(i).map_or(Value::Null, |cell| ty.convert(cell)))
					.collect()
			})
			.collect();

		debug!(
			path = %path.display(),
			columns = columns.len(),
			rows = records.len(),
			"read CSV"
		);

		Ok(Frame {
			columns,
			types,
			rows,
		})
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	fn position(&self, column: &str) -> Result<usize> {
		self.columns
			.iter()
			.position(|c| c == column)
			.ok_or_else(|| Error::MissingColumn(column.to_owned()))
	}

	fn project(&self, indices: &[usize]) -> Frame {
		Frame {
			columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
			types: indices.iter().map(|&i| self.types[i]).collect(),
			rows: self
				.rows
				.iter()
				.map(|row| indices.iter().map(|&i| row[i].clone()).collect())
				.collect(),
		}
	}

	pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Frame> {
		let indices = columns
			.iter()
			.map(|c| self.position(c.as_ref()))
			.collect::<Result<Vec<_>>>()?;

		Ok(self.project(&indices))
	}

	pub fn drop_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<Frame> {
		let dropped = columns
			.iter()
			.map(|c| self.position(c.as_ref()))
			.collect::<Result<HashSet<_>>>()?;
		let kept: Vec<usize> = (0..self.columns.len())
			.filter(|i| !dropped.contains(i))
			.collect();

		Ok(self.project(&kept))
	}

	pub fn drop_duplicates(mut self) -> Frame {
		let mut seen = HashSet::new();
		self.rows.retain(|row| seen.insert(row.clone()));
		self
	}

	pub fn drop_null_leading(mut self) -> Frame {
		self.rows
			.retain(|row| row.first().is_some_and(|v| !v.is_null()));
		self
	}
}
