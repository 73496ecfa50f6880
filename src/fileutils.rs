use std::path::{Path, PathBuf};

use crate::dtype::SnError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Expand positional arguments into input file paths. Each argument is tried
/// as a glob pattern first; an argument that matches nothing is kept as a
/// literal path so plain file names keep working.
pub fn expand_input_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, SnError> {
    let mut input_files = Vec::new();
    for pattern in patterns {
        let mut matched_any = false;
        for entry in glob::glob(pattern)? {
            match entry {
                Ok(path) => {
                    matched_any = true;
                    input_files.push(path);
                }
                Err(e) => {
                    log::warn!("skipping unreadable glob entry: {e}");
                }
            }
        }
        if !matched_any {
            input_files.push(PathBuf::from(pattern));
        }
    }
    Ok(input_files)
}

/// Output path for an input file: same directory, `SN` prepended to the
/// file name.
pub fn output_path_for(input: &Path) -> Result<PathBuf, SnError> {
    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            SnError::Invalid(format!(
                "Cannot derive an output file name for {}",
                input.display()
            ))
        })?;
    Ok(input.with_file_name(format!("SN{file_name}")))
}

/// Write `bytes` to `path` through a temporary sibling file and rename, so a
/// failed conversion never leaves a half-written output behind.
pub fn write_replacing(bytes: &[u8], path: &Path) -> Result<(), SnError> {
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    std::fs::write(&tmp_path, bytes)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_gets_sn_prefix() {
        let output = output_path_for(Path::new("songs/melody.mid")).unwrap();
        assert_eq!(output, PathBuf::from("songs/SNmelody.mid"));
    }

    #[test]
    fn output_name_without_directory() {
        let output = output_path_for(Path::new("melody.mid")).unwrap();
        assert_eq!(output, PathBuf::from("SNmelody.mid"));
    }

    #[test]
    fn non_matching_pattern_is_kept_as_literal_path() {
        let inputs = expand_input_patterns(&["no/such/file.mid".to_string()]).unwrap();
        assert_eq!(inputs, vec![PathBuf::from("no/such/file.mid")]);
    }
}
