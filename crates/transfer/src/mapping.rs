use std::path::{Path, PathBuf};

use filters::slash_path;

use crate::TargetFolder;

/// Where one selected file goes on the remote host.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetMapping {
    source_path: PathBuf,
    relative_path: String,
    target_path: String,
}

impl TargetMapping {
    /// Maps `source_path`, a file below `source_root`, into `target`.
    ///
    /// With `flatten` the relative path is the file name. Otherwise the
    /// source root is removed as a literal prefix, followed by one leading
    /// separator. The target path joins the target folder and the relative
    /// path with `/` and normalizes the result.
    ///
    /// ```
    /// use std::path::Path;
    /// use transfer::{TargetFolder, TargetMapping};
    ///
    /// let mapping = TargetMapping::new(
    ///     Path::new("/src/css/site.css"),
    ///     Path::new("/src"),
    ///     &TargetFolder::new("/srv/www"),
    ///     false,
    /// );
    /// assert_eq!(mapping.relative_path(), "css/site.css");
    /// assert_eq!(mapping.target_path(), "/srv/www/css/site.css");
    /// ```
    pub fn new(source_path: &Path, source_root: &Path, target: &TargetFolder, flatten: bool) -> Self {
        let relative_path = if flatten {
            source_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            strip_root(source_path, source_root)
        };
        let target_path = slash_path::join(target.as_str(), &relative_path);

        Self {
            source_path: source_path.to_path_buf(),
            relative_path,
            target_path,
        }
    }

    /// Local file.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Path below the target folder, `/`-separated.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Remote destination.
    pub fn target_path(&self) -> &str {
        &self.target_path
    }
}

fn strip_root(source_path: &Path, source_root: &Path) -> String {
    let source = slash_path::to_slash(source_path);
    let root = slash_path::to_slash(source_root);
    let relative = source.strip_prefix(&*root).unwrap_or(&source);
    relative.strip_prefix('/').unwrap_or(relative).to_owned()
}
