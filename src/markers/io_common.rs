use std::path::{Path, PathBuf};

use crate::markers::*;

pub fn read_json_file(path: &str) -> CliResult<JSValue> {
    info!("Attempting to read file {:?}", path);
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

/// Relative paths are resolved against the directory of the configuration file.
pub fn resolve_path(root: Option<&Path>, path: &str) -> String {
    match root {
        Some(root_p) if Path::new(path).is_relative() => {
            let p: PathBuf = [root_p, Path::new(path)].iter().collect();
            p.as_path().display().to_string()
        }
        _ => path.to_string(),
    }
}

/// Ids (region ids, groups) may be written as JSON strings or numbers.
pub fn read_js_id(x: &JSValue) -> Option<String> {
    match x {
        JSValue::String(s) => Some(s.clone()),
        JSValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
