use anyhow::{Context, Result};
use std::fs;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read the input file as raw lines, each keeping its own terminator
    pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>, ConfigError> {
        let path = path.as_ref();
        if !Self::file_exists(path) {
            return Err(ConfigError::InputNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::InputUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(split_raw_lines(&content))
    }

    /// Check that the output file can be written, without touching existing content
    pub fn ensure_writable<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let unwritable = |reason: String| ConfigError::OutputUnwritable {
            path: path.display().to_string(),
            reason,
        };

        if path.is_dir() {
            return Err(unwritable("path is a directory".to_string()));
        }

        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent).map_err(|e| unwritable(e.to_string()))?;
        }

        let existed = path.exists();
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| unwritable(e.to_string()))?;

        // Leave no empty file behind if the run fails later
        if !existed {
            let _ = fs::remove_file(path);
        }

        Ok(())
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    // @generates: Default output path for a translated file
    // `UI_EN.txt` becomes `UI_KO.txt`; other names get the code appended: `strings.ko.txt`
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, source_code: &str, target_code: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let extension = input_file.extension().map(|ext| ext.to_string_lossy());

        let source_suffix = format!("_{}", source_code.to_uppercase());
        let mut output_filename = match stem.strip_suffix(&source_suffix) {
            Some(base) => format!("{}_{}", base, target_code.to_uppercase()),
            None => format!("{}.{}", stem, target_code),
        };

        if let Some(extension) = extension {
            output_filename.push('.');
            output_filename.push_str(&extension);
        }

        input_file.with_file_name(output_filename)
    }
}

/// Split text into lines, keeping each line's terminator
pub fn split_raw_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(str::to_string).collect()
}
