use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents errors that can occur during filesystem operations.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// Wrapper for standard IO errors.
    #[error("IO error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    /// Error for empty path input.
    #[error("Path is empty")]
    EmptyPath,
    /// Error when the home directory cannot be determined.
    #[error("Home directory not found")]
    HomeDirNotFound,
    /// Error for unsupported user expansion in paths (e.g., ~user).
    #[error("User expansion (~user) not supported")]
    UserExpansionNotSupported,
}

impl FilesystemError {
    fn io(path: &Path, source: io::Error) -> Self {
        FilesystemError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Options for writing files.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// If true, allows overwriting an existing file.
    pub overwrite: bool,
    /// If true, the file is made executable by its owner (mode 0744 on Unix).
    pub executable: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            executable: false,
        }
    }
}

impl WriteOptions {
    pub fn executable() -> Self {
        Self {
            executable: true,
            ..Self::default()
        }
    }
}

/// Creates a directory (and its parents) if it does not exist.
///
/// # Errors
///
/// Returns `FilesystemError` if the directory cannot be created.
pub fn create_if_not_exists<P: AsRef<Path>>(dir: P) -> Result<(), FilesystemError> {
    let path = dir.as_ref();
    if path.as_os_str().is_empty() {
        return Err(FilesystemError::EmptyPath);
    }
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| FilesystemError::io(path, e))
}

/// Writes content to a file, with options for overwriting and permissions.
///
/// # Errors
///
/// Returns `FilesystemError` if the write fails or overwrite is not allowed.
pub fn write_file<P: AsRef<Path>>(path: P, content: &str, options: WriteOptions) -> Result<(), FilesystemError> {
    let p = path.as_ref();
    if p.exists() && !options.overwrite {
        return Err(FilesystemError::io(
            p,
            io::Error::new(io::ErrorKind::AlreadyExists, "File exists and overwrite is false"),
        ));
    }
    let mut file = fs::File::create(p).map_err(|e| FilesystemError::io(p, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| FilesystemError::io(p, e))?;

    if options.executable {
        set_executable(p)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), FilesystemError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o744)).map_err(|e| FilesystemError::io(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), FilesystemError> {
    Ok(())
}

/// Expands a path that starts with `~` to the user's home directory.
///
/// # Errors
///
/// Fails for empty input, `~user` forms, or when no home directory is known.
pub fn expand_home(path: &str) -> Result<PathBuf, FilesystemError> {
    if path.is_empty() {
        return Err(FilesystemError::EmptyPath);
    }
    if !path.starts_with('~') {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir().ok_or(FilesystemError::HomeDirNotFound)?;
    if path == "~" {
        return Ok(home);
    }
    match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => Ok(home.join(rest)),
        None => Err(FilesystemError::UserExpansionNotSupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_refuses_overwrite_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eula.txt");

        write_file(&path, "eula=true\n", WriteOptions::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "eula=true\n");

        let err = write_file(
            &path,
            "eula=false\n",
            WriteOptions {
                overwrite: false,
                executable: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, FilesystemError::Io { ref source, .. } if source.kind() == io::ErrorKind::AlreadyExists));
        assert_eq!(fs::read_to_string(&path).unwrap(), "eula=true\n");
    }

    #[cfg(unix)]
    #[test]
    fn executable_files_get_mode_744() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boot.sh");
        write_file(&path, "#!/bin/bash\n", WriteOptions::executable()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o744);
    }

    #[test]
    fn creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        create_if_not_exists(&nested).unwrap();
        assert!(nested.is_dir());
        create_if_not_exists(&nested).unwrap();
    }

    #[test]
    fn empty_directory_path_is_rejected() {
        assert!(matches!(create_if_not_exists(""), Err(FilesystemError::EmptyPath)));
    }

    #[test]
    fn expands_home() {
        assert_eq!(expand_home("server").unwrap(), PathBuf::from("server"));
        assert!(matches!(expand_home(""), Err(FilesystemError::EmptyPath)));
        assert!(matches!(expand_home("~alex/server"), Err(FilesystemError::UserExpansionNotSupported)));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~").unwrap(), home);
            assert_eq!(expand_home("~/mc").unwrap(), home.join("mc"));
        }
    }
}
