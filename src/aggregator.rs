//! Defines the [`Aggregator`], which loads every [`Article`] in a content
//! directory, indexes titles against URLs, and renders the listing page
//! fragments.

use crate::article::Article;
use crate::fragment::{self, FragmentTemplate, DEFAULT_URL_PREFIX};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// The order in which articles are stored and rendered.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    /// Sorted by source file name, ascending.
    FileName,

    /// Sorted by date, most recent first. Articles with equal dates keep
    /// their file name order.
    Date,
}

impl Default for Order {
    fn default() -> Self {
        Order::FileName
    }
}

/// What to do when an article file can't be read or decoded.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OnError {
    /// Stop at the first bad file and return its error.
    Abort,

    /// Log the bad file and leave it out of the listing.
    Skip,
}

impl Default for OnError {
    fn default() -> Self {
        OnError::Abort
    }
}

/// Settings for [`Aggregator::aggregate`].
#[derive(Clone, Debug)]
pub struct Options {
    /// Prepended to every article URL in rendered links.
    pub url_prefix: String,

    /// See [`Order`].
    pub order: Order,

    /// See [`OnError`].
    pub on_error: OnError,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            url_prefix: DEFAULT_URL_PREFIX.to_owned(),
            order: Order::default(),
            on_error: OnError::default(),
        }
    }
}

/// The in-memory collection of all articles plus the title/URL indexes. An
/// [`Aggregator`] is built once and never modified afterwards.
pub struct Aggregator {
    articles: Vec<Article>,
    title_to_url: HashMap<String, String>,
    url_to_title: HashMap<String, String>,
    template: FragmentTemplate,
}

impl Aggregator {
    /// Loads every file directly inside `directory` as an [`Article`].
    /// Sub-directories are skipped, not descended into. Failing to list the
    /// directory is always an error; failing to read or decode a file is an
    /// error unless `options.on_error` is [`OnError::Skip`].
    pub fn aggregate(directory: &Path, options: &Options) -> Result<Aggregator> {
        let mut articles = Vec::new();
        for result in WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = result.map_err(|err| Error::ReadDir {
                path: directory.to_owned(),
                err,
            })?;
            if entry.file_type().is_dir() {
                continue;
            }

            match load_article(entry.path()) {
                Ok(article) => {
                    debug!(path = %entry.path().display(), title = %article.title, "loaded article");
                    articles.push(article);
                }
                Err(err) => match options.on_error {
                    OnError::Abort => return Err(err),
                    OnError::Skip => warn!("skipping article: {}", err),
                },
            }
        }

        let aggregator = Aggregator::from_articles(articles, options)?;
        info!(
            directory = %directory.display(),
            articles = aggregator.len(),
            "aggregated articles"
        );
        Ok(aggregator)
    }

    /// Builds an [`Aggregator`] from already-loaded articles. `articles` is
    /// taken to be in file name order; it is re-sorted only for
    /// [`Order::Date`]. Duplicate titles or URLs overwrite earlier index
    /// entries.
    pub fn from_articles(mut articles: Vec<Article>, options: &Options) -> Result<Aggregator> {
        if options.order == Order::Date {
            articles.sort_by(|a, b| b.date.cmp(&a.date));
        }

        let mut title_to_url = HashMap::with_capacity(articles.len());
        let mut url_to_title = HashMap::with_capacity(articles.len());
        for article in &articles {
            title_to_url.insert(article.title.clone(), article.url.clone());
            url_to_title.insert(article.url.clone(), article.title.clone());
        }

        Ok(Aggregator {
            articles,
            title_to_url,
            url_to_title,
            template: FragmentTemplate::new(&options.url_prefix)?,
        })
    }

    /// The stored articles in listing order.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// The number of stored articles, duplicates included.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether the content directory held no articles.
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Maps each title to its article's URL.
    pub fn title_to_url(&self) -> &HashMap<String, String> {
        &self.title_to_url
    }

    /// Maps each URL to its article's title.
    pub fn url_to_title(&self) -> &HashMap<String, String> {
        &self.url_to_title
    }

    /// Looks up the URL indexed for `title`.
    pub fn url_for_title(&self, title: &str) -> Option<&str> {
        self.title_to_url.get(title).map(String::as_str)
    }

    /// Looks up the title indexed for `url`.
    pub fn title_for_url(&self, url: &str) -> Option<&str> {
        self.url_to_title.get(url).map(String::as_str)
    }

    /// Returns the article that owns `url` in the URL index. When several
    /// articles share a URL this is the last one stored, matching the index.
    pub fn article_by_url(&self, url: &str) -> Option<&Article> {
        self.articles.iter().rev().find(|article| article.url == url)
    }

    /// Renders a single article's listing fragment. The link target is
    /// looked up by the article's title, so an article that isn't part of
    /// this aggregator links to the bare URL prefix.
    pub fn display_article(&self, article: &Article) -> Result<String> {
        let url = self.url_for_title(&article.title).unwrap_or_default();
        Ok(self.template.render(article, url)?)
    }

    /// Renders every stored article in listing order and concatenates the
    /// fragments.
    pub fn display_article_all(&self) -> Result<String> {
        let mut listing = String::new();
        for article in &self.articles {
            listing.push_str(&self.display_article(article)?);
        }
        Ok(listing)
    }
}

fn load_article(path: &Path) -> Result<Article> {
    let contents = std::fs::read(path).map_err(|err| Error::ReadFile {
        path: path.to_owned(),
        err,
    })?;
    serde_json::from_slice(&contents).map_err(|err| Error::Decode {
        path: path.to_owned(),
        err,
    })
}

/// The result of a fallible aggregation operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error building or rendering an [`Aggregator`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the content directory can't be listed.
    ReadDir { path: PathBuf, err: walkdir::Error },

    /// Returned when an article file can't be read.
    ReadFile { path: PathBuf, err: std::io::Error },

    /// Returned when an article file isn't a valid article JSON object.
    Decode {
        path: PathBuf,
        err: serde_json::Error,
    },

    /// Returned for errors rendering fragments.
    Render(fragment::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ReadDir { path, err } => {
                write!(f, "Listing article directory '{}': {}", path.display(), err)
            }
            Error::ReadFile { path, err } => {
                write!(f, "Reading article '{}': {}", path.display(), err)
            }
            Error::Decode { path, err } => {
                write!(f, "Decoding article '{}': {}", path.display(), err)
            }
            Error::Render(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadDir { path: _, err } => Some(err),
            Error::ReadFile { path: _, err } => Some(err),
            Error::Decode { path: _, err } => Some(err),
            Error::Render(err) => Some(err),
        }
    }
}

impl From<fragment::Error> for Error {
    /// Converts [`fragment::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator when rendering.
    fn from(err: fragment::Error) -> Error {
        Error::Render(err)
    }
}
