//! `--pick`: choose a dataset CSV from the working directory tree.
//!
//! Files whose name matches the analysis' canonical dataset (`Pricing_data.csv`
//! for price testing, `UW_data.csv` for credit decisions) are listed first, so
//! in a folder laid out like the sample output the right file is option 1.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::domain::Analysis;
use crate::error::AppError;

/// How many directory levels below the working directory are searched.
const SEARCH_DEPTH: usize = 4;

/// Directory names never descended into.
const SKIP_DIRS: [&str; 4] = [".git", "target", "node_modules", ".venv"];

/// What a line typed at the picker prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Choice {
    /// A 1-based entry of the listing.
    Listed(PathBuf),
    /// Anything that is not a number is taken as a path.
    Typed(PathBuf),
    OutOfRange(usize),
    Quit,
    Empty,
}

/// List candidate CSVs for `analysis` and read the user's choice from stdin.
pub fn prompt_for_csv_path(analysis: Analysis) -> Result<PathBuf, AppError> {
    let files = find_csv_files(Path::new("."), SEARCH_DEPTH, analysis);
    if files.is_empty() {
        return Err(AppError::usage(format!(
            "No .csv files found for {}. Pass `--file <file.csv>` or use `--sample`.",
            analysis.display_name()
        )));
    }

    println!("{}: {} candidate CSV file(s)", analysis.display_name(), files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, display_path(path));
    }

    let stdin = io::stdin();
    loop {
        print!("File number (1-{}), a path, or q: ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::usage(format!("Failed to write prompt: {e}")))?;

        let mut line = String::new();
        let read = stdin
            .read_line(&mut line)
            .map_err(|e| AppError::usage(format!("Failed to read input: {e}")))?;
        if read == 0 {
            return Err(AppError::usage("No selection made (stdin closed)."));
        }

        let candidate = match parse_choice(&line, &files) {
            Choice::Quit => return Err(AppError::usage("Canceled.")),
            Choice::Empty => continue,
            Choice::OutOfRange(n) => {
                println!("No entry {n}; the list has {}.", files.len());
                continue;
            }
            Choice::Listed(path) | Choice::Typed(path) => path,
        };

        match validate_csv_path(&candidate) {
            Ok(path) => {
                tracing::debug!(analysis = analysis.display_name(), path = %path.display(), "picked csv");
                return Ok(path);
            }
            Err(err) => println!("{err}"),
        }
    }
}

fn parse_choice(input: &str, files: &[PathBuf]) -> Choice {
    let input = input.trim();
    if input.is_empty() {
        return Choice::Empty;
    }
    if input.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) => match n.checked_sub(1).and_then(|i| files.get(i)) {
            Some(path) => Choice::Listed(path.clone()),
            None => Choice::OutOfRange(n),
        },
        Err(_) => Choice::Typed(PathBuf::from(input)),
    }
}

/// Check that `path` names an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::usage(format!("CSV file not found: {}", path.display())));
    }
    if !path.is_file() {
        return Err(AppError::usage(format!("Not a file: {}", path.display())));
    }
    if !has_csv_extension(path) {
        return Err(AppError::usage(format!(
            "Expected a .csv file (got: {}). Excel workbooks are not supported; export to CSV first.",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Walk `root` (up to `max_depth` levels down) for CSV files.
///
/// The canonical file for `analysis` sorts first, then everything else by path.
fn find_csv_files(root: &Path, max_depth: usize, analysis: Analysis) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![(root.to_path_buf(), 0usize)];

    while let Some((dir, depth)) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let Ok(kind) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            if kind.is_dir() {
                if depth < max_depth && !is_skipped_dir(&path) {
                    pending.push((path, depth + 1));
                }
            } else if kind.is_file() && has_csv_extension(&path) {
                found.push(path);
            }
        }
    }

    let wanted = analysis.sample_file_name();
    found.sort_by_cached_key(|p| (!matches_file_name(p, wanted), display_path(p)));
    found
}

fn matches_file_name(path: &Path, wanted: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.eq_ignore_ascii_case(wanted))
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn is_skipped_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| SKIP_DIRS.contains(&n))
}

fn display_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn dataset_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("data/raw")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("data/UW_data.csv"), "a\n1\n").unwrap();
        fs::write(root.join("data/raw/pricing_data.CSV"), "a\n1\n").unwrap();
        fs::write(root.join("applicants.csv"), "a\n1\n").unwrap();
        fs::write(root.join("target/skip.csv"), "a\n1\n").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();
        dir
    }

    #[test]
    fn canonical_dataset_is_listed_first() {
        let dir = dataset_tree();

        let pricing = find_csv_files(dir.path(), SEARCH_DEPTH, Analysis::Pricing);
        assert_eq!(names(&pricing), vec!["pricing_data.CSV", "applicants.csv", "UW_data.csv"]);

        let uw = find_csv_files(dir.path(), SEARCH_DEPTH, Analysis::Underwriting);
        assert_eq!(names(&uw), vec!["UW_data.csv", "applicants.csv", "pricing_data.CSV"]);
    }

    #[test]
    fn search_depth_limits_the_walk() {
        let dir = dataset_tree();
        let shallow = find_csv_files(dir.path(), 1, Analysis::Pricing);
        assert_eq!(names(&shallow), vec!["applicants.csv", "UW_data.csv"]);
    }

    #[test]
    fn choices_parse_numbers_paths_and_quit() {
        let files = vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")];
        assert_eq!(parse_choice("2\n", &files), Choice::Listed(PathBuf::from("b.csv")));
        assert_eq!(parse_choice("0", &files), Choice::OutOfRange(0));
        assert_eq!(parse_choice("3", &files), Choice::OutOfRange(3));
        assert_eq!(parse_choice(" Q ", &files), Choice::Quit);
        assert_eq!(parse_choice("   \n", &files), Choice::Empty);
        assert_eq!(
            parse_choice("data/UW_data.csv", &files),
            Choice::Typed(PathBuf::from("data/UW_data.csv"))
        );
    }

    #[test]
    fn rejects_non_csv_paths() {
        let dir = tempfile::tempdir().unwrap();
        let xlsx = dir.path().join("book.xlsx");
        fs::write(&xlsx, "x").unwrap();

        let err = validate_csv_path(&xlsx).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
        assert!(validate_csv_path(dir.path()).is_err());
        assert!(validate_csv_path(&dir.path().join("missing.csv")).is_err());
    }
}
