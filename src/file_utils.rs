use anyhow::{Result, Context, anyhow};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Suffix appended to the stem of a cleaned script
pub const NARRATION_SUFFIX: &str = "narration";

/// Extensions treated as script files when cleaning a directory
pub const SCRIPT_EXTENSIONS: [&str; 2] = ["txt", "md"];

// @struct: Where a command reads its text from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
    Directory(PathBuf),
}

impl InputSource {
    // @resolves: "-" to stdin, otherwise an existing file or directory
    pub fn resolve(input: &str) -> Result<Self> {
        if input == "-" {
            return Ok(InputSource::Stdin);
        }

        let path = PathBuf::from(input);
        if FileManager::dir_exists(&path) {
            Ok(InputSource::Directory(path))
        } else if FileManager::file_exists(&path) {
            Ok(InputSource::File(path))
        } else {
            Err(anyhow!("Input does not exist: {:?}", path))
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }
    
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }
    
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }
    
    // @generates: Output path for a cleaned script, `<stem>.narration.txt`
    // @params: input_file, output_dir (defaults to the input's directory)
    pub fn narration_output_path<P: AsRef<Path>>(input_file: P, output_dir: Option<&Path>) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(NARRATION_SUFFIX);
        output_filename.push_str(".txt");

        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| input_file.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        dir.join(output_filename)
    }

    // @checks: Whether a file is output of a previous clean
    pub fn is_narration_output<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().ends_with(&format!(".{}", NARRATION_SUFFIX)))
            .unwrap_or(false)
    }
    
    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');
        
        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            
            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }
        
        Ok(result)
    }

    /// Find script files in a directory, skipping earlier narration outputs
    pub fn find_script_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        for extension in SCRIPT_EXTENSIONS {
            result.extend(Self::find_files(dir.as_ref(), extension)?);
        }

        result.retain(|path| !Self::is_narration_output(path));
        result.sort();
        Ok(result)
    }
    
    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read all of stdin
    pub fn read_stdin() -> Result<String> {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }
        
        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        
        Ok(())
    }

    /// Write to `path` when given, otherwise print to stdout
    pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
        match path {
            Some(path) => Self::write_to_file(path, content),
            None => {
                println!("{}", content);
                Ok(())
            }
        }
    }
}
