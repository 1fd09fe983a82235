//! Transform command implementation

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use rqcell_config::TransformSettings;
use rqcell_transform::{CellTransformer, CellWrapOptions};
use tracing::debug;
use walkdir::WalkDir;

use crate::cli::TransformArgs;
use crate::commands::utils;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

/// A module picked up for transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Target below `--out-dir`: relative to the walked directory, or to
    /// the working directory for explicit files
    pub relative: PathBuf,
}

/// Execute the transform command.
///
/// Cells are printed to stdout unless `--write`, `--out-dir` or `--check`
/// say otherwise. Files that fail to parse are reported and counted; the
/// rest of the batch still runs.
pub async fn execute(args: TransformArgs, config: Option<&Path>) -> Result<()> {
    let (config, _) = utils::load_config(config)?;
    let settings = &config.transform;

    let files = collect_files(&args.paths, &utils::get_cwd()?, settings)?;
    if files.is_empty() {
        ui::warning("No matching files found");
        return Ok(());
    }
    debug!(count = files.len(), "collected files");
    if args.out_dir.is_some() {
        check_targets(&files)?;
    }

    let mut sources = Vec::with_capacity(files.len());
    for file in &files {
        let source = fs::read_to_string(&file.path).with_path(&file.path)?;
        sources.push((file.path.clone(), source));
    }

    let mut transformer = CellTransformer::new(wrap_options(settings));
    let report = transformer.transform_batch(sources);

    for (file, outcome) in files.iter().zip(&report.outcomes) {
        match &outcome.result {
            Ok(output) if output.modified => emit(&args, file, &output.code)?,
            Ok(_) => {}
            Err(err) => ui::error(&err.to_string()),
        }
    }

    let rewritten = report.rewritten_count();
    let failed = report.failed_count();
    ui::info(&ui::summary(report.outcomes.len(), rewritten, failed));

    if args.check && rewritten > 0 {
        return Err(CliError::CheckFailed { count: rewritten });
    }
    if failed > 0 {
        return Err(CliError::TransformFailed { count: failed });
    }
    if rewritten > 0 && (args.write || args.out_dir.is_some()) {
        ui::success(&format!("Wrapped {rewritten} cell(s)"));
    }
    Ok(())
}

/// Wrapper options from the `transform` section of the configuration
pub fn wrap_options(settings: &TransformSettings) -> CellWrapOptions {
    CellWrapOptions {
        import_source: settings.import_source.clone(),
        wrapper: settings.wrapper.clone(),
        single_quote: settings.single_quote,
    }
}

fn emit(args: &TransformArgs, file: &SourceFile, code: &str) -> Result<()> {
    if args.check {
        ui::warning(&format!("Would rewrite {}", file.path.display()));
    } else if args.write {
        fs::write(&file.path, code).with_path(&file.path)?;
        debug!(path = %file.path.display(), "rewrote in place");
    } else if let Some(out_dir) = &args.out_dir {
        let target = out_dir.join(&file.relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, code).with_path(&target)?;
        debug!(path = %target.display(), "wrote transformed copy");
    } else {
        println!("// {}", file.path.display());
        print!("{code}");
        if !code.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

/// Expand files and directories into the modules the transform handles.
///
/// Explicit files are kept when their extension is configured and keep
/// their path relative to `base`; directories are walked, skipping excluded
/// path segments. Output is sorted per argument for stable reports.
pub fn collect_files(
    paths: &[PathBuf],
    base: &Path,
    settings: &TransformSettings,
) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for root in paths {
        if !root.exists() {
            return Err(CliError::FileNotFound(root.clone()));
        }

        if root.is_file() {
            if handles(root, settings) {
                let relative = relative_to(root, base);
                files.push(SourceFile {
                    path: root.clone(),
                    relative,
                });
            }
            continue;
        }

        let mut found = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry.path(), settings));
        for entry in walker {
            let entry = entry.map_err(|e| CliError::Custom(format!("Failed to walk {}: {e}", root.display())))?;
            if entry.file_type().is_file() && handles(entry.path(), settings) {
                let path = entry.path().to_path_buf();
                let relative = path
                    .strip_prefix(root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| path.clone());
                found.push(SourceFile { path, relative });
            }
        }
        found.sort_by(|a, b| a.path.cmp(&b.path));
        files.extend(found);
    }

    Ok(files)
}

/// Refuse to write two inputs to the same `--out-dir` target
pub fn check_targets(files: &[SourceFile]) -> Result<()> {
    let mut seen: HashMap<&Path, &Path> = HashMap::new();
    for file in files {
        match seen.insert(&file.relative, &file.path) {
            Some(first) if first != file.path.as_path() => {
                return Err(CliError::InvalidArgument(format!(
                    "{} and {} would both be written to {}",
                    first.display(),
                    file.path.display(),
                    file.relative.display()
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

/// `path` below `base`, keeping only normal components so the result
/// always stays inside the output directory
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

fn handles(path: &Path, settings: &TransformSettings) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| settings.handles_extension(ext))
}

fn is_excluded(path: &Path, settings: &TransformSettings) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| settings.exclude.iter().any(|ex| ex == name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export const a = 1\n").unwrap();
    }

    #[test]
    fn test_collect_respects_extensions_and_excludes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "components/PostsCell/PostsCell.js");
        touch(root, "components/PostsCell/PostsCell.css");
        touch(root, "node_modules/pkg/index.js");
        touch(root, "pages/HomePage.tsx");

        let files = collect_files(&[root.to_path_buf()], root, &TransformSettings::default()).unwrap();
        let relative: Vec<_> = files.iter().map(|f| f.relative.clone()).collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("components/PostsCell/PostsCell.js"),
                PathBuf::from("pages/HomePage.tsx"),
            ]
        );
    }

    #[test]
    fn test_collect_explicit_file() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "PostsCell.jsx");
        touch(temp.path(), "notes.md");

        let settings = TransformSettings::default();
        let files = collect_files(
            &[temp.path().join("PostsCell.jsx"), temp.path().join("notes.md")],
            temp.path(),
            &settings,
        )
        .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative, PathBuf::from("PostsCell.jsx"));
    }

    #[test]
    fn test_explicit_files_with_same_name_keep_their_directories() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a/PostsCell/index.js");
        touch(temp.path(), "b/UsersCell/index.js");

        let files = collect_files(
            &[
                temp.path().join("a/PostsCell/index.js"),
                temp.path().join("b/UsersCell/index.js"),
            ],
            temp.path(),
            &TransformSettings::default(),
        )
        .unwrap();
        let relative: Vec<_> = files.iter().map(|f| f.relative.clone()).collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("a/PostsCell/index.js"),
                PathBuf::from("b/UsersCell/index.js"),
            ]
        );
        check_targets(&files).unwrap();
    }

    #[test]
    fn test_explicit_file_outside_base_stays_inside_out_dir() {
        assert_eq!(
            relative_to(Path::new("../shared/PostsCell.js"), Path::new("/work")),
            PathBuf::from("shared/PostsCell.js")
        );
    }

    #[test]
    fn test_colliding_targets_are_rejected() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a/PostsCell/index.js");
        touch(temp.path(), "b/PostsCell/index.js");

        let files = collect_files(
            &[temp.path().join("a"), temp.path().join("b")],
            temp.path(),
            &TransformSettings::default(),
        )
        .unwrap();
        let err = check_targets(&files).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert!(err.to_string().contains("PostsCell/index.js"));
    }

    #[test]
    fn test_collect_missing_path() {
        let err = collect_files(
            &[PathBuf::from("/no/such/dir")],
            Path::new("/"),
            &TransformSettings::default(),
        )
            .unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_wrap_options_follow_settings() {
        let settings = TransformSettings {
            wrapper: "withCell".into(),
            single_quote: false,
            ..TransformSettings::default()
        };
        let options = wrap_options(&settings);
        assert_eq!(options.wrapper, "withCell");
        assert!(!options.single_quote);
        assert_eq!(options.import_source, settings.import_source);
    }
}
