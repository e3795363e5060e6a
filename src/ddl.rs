use std::{
	collections::HashMap,
	fs,
	path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{Error, Result};

pub fn lookup(dirs: &[PathBuf]) -> Result<HashMap<String, PathBuf>> {
	let mut scripts = HashMap::new();

	for dir in dirs {
		let mut entries = Vec::new();
		for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
			let entry = entry.map_err(|e| Error::io(dir, e))?;
			let file_name = entry.file_name().to_string_lossy().into_owned();
			if file_name.ends_with(".sql") {
				entries.push((file_name, entry.path()));
			}
		}
		entries.sort();

		for (file_name, path) in entries {
			let name = file_name.split('.').next().unwrap_or_default().to_owned();
			debug!(name = %name, path = %path.display(), "found DDL script");
			scripts.insert(name, path);
		}
	}

	Ok(scripts)
}

pub fn read_script(path: &Path) -> Result<String> {
	let data = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
	let data = data.trim_end();

	if !data.ends_with(';') {
		return Err(Error::MissingSemicolon(path.to_path_buf()));
	}

	Ok(data.to_owned())
}

pub fn prepare(dirs: &[PathBuf], sequence: &[String]) -> Result<Vec<String>> {
	let scripts = lookup(dirs)?;

	sequence
		.iter()
		.map(|name| {
			let path = scripts
				.get(name)
				.ok_or_else(|| Error::UnknownDdl(name.clone()))?;
			read_script(path)
		})
		.collect()
}

pub fn join(scripts: &[String]) -> String {
	scripts.join(" ")
}
