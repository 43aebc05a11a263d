//! Loads the `aggregator.yaml` project file. Every field is optional:
//!
//! ```yaml
//! articles_directory: articles   # relative to the project file
//! article_url_prefix: /article/
//! order: file-name               # or `date` (most recent first)
//! on_error: abort                # or `skip`
//! ```

use crate::aggregator::{OnError, Options, Order};
use crate::fragment::DEFAULT_URL_PREFIX;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "aggregator.yaml";

#[derive(Deserialize)]
struct ArticlesDirectory(PathBuf);
impl Default for ArticlesDirectory {
    fn default() -> Self {
        ArticlesDirectory(PathBuf::from("articles"))
    }
}

#[derive(Deserialize)]
struct UrlPrefix(String);
impl Default for UrlPrefix {
    fn default() -> Self {
        UrlPrefix(DEFAULT_URL_PREFIX.to_owned())
    }
}

#[derive(Deserialize, Default)]
struct Project {
    #[serde(default)]
    articles_directory: ArticlesDirectory,

    #[serde(default)]
    article_url_prefix: UrlPrefix,

    #[serde(default)]
    order: Order,

    #[serde(default)]
    on_error: OnError,
}

/// Returns the path of the nearest [`PROJECT_FILE`] in `dir` or its
/// ancestors.
pub fn find_project_file(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|ancestor| ancestor.join(PROJECT_FILE))
        .find(|path| path.is_file())
}

/// Where to find the articles and how to load and link them.
pub struct Config {
    pub articles_directory: PathBuf,
    pub options: Options,
}

impl Config {
    /// Looks for [`PROJECT_FILE`] in `dir` and then in each of its parents,
    /// loading the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        match find_project_file(dir) {
            Some(path) => Config::from_project_file(&path)
                .with_context(|| format!("Loading configuration `{}`", path.display())),
            None => Err(anyhow!(
                "Could not find `{}` in any parent directory",
                PROJECT_FILE
            )),
        }
    }

    /// Loads the project file at `path`. Relative paths inside it resolve
    /// against the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config::from_project(project_root, project)),
        }
    }

    /// The configuration used when there is no project file: articles are
    /// read from `{dir}/articles` with default options.
    pub fn defaults(dir: &Path) -> Config {
        Config::from_project(dir, Project::default())
    }

    fn from_project(project_root: &Path, project: Project) -> Config {
        Config {
            articles_directory: project_root.join(project.articles_directory.0),
            options: Options {
                url_prefix: project.article_url_prefix.0,
                order: project.order,
                on_error: project.on_error,
            },
        }
    }
}
