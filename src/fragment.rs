//! Renders [`Article`]s into the HTML fragments shown on the listing page.
//! The markup lives in `fragment.html` and is executed by [`gtmpl`] with the
//! fields described on [`Entry::to_value`].

use crate::article::Article;
use chrono::{DateTime, FixedOffset};
use gtmpl::{Context, Template, Value};
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::string::FromUtf8Error;

/// The markup for a single article on the listing page.
const FRAGMENT_TEMPLATE: &str = include_str!("fragment.html");

/// The default prefix for article links. An article whose URL is `foo` is
/// linked as `/article/foo`.
pub const DEFAULT_URL_PREFIX: &str = "/article/";

/// A parsed fragment template plus the link prefix it renders with.
pub struct FragmentTemplate {
    template: Template,
    url_prefix: String,
}

impl FragmentTemplate {
    /// Parses the built-in fragment template. `url_prefix` is prepended to
    /// every article URL (see [`DEFAULT_URL_PREFIX`]).
    pub fn new(url_prefix: &str) -> Result<FragmentTemplate> {
        let mut template = Template::default();
        template.parse(FRAGMENT_TEMPLATE).map_err(Error::Template)?;
        Ok(FragmentTemplate {
            template,
            url_prefix: url_prefix.to_owned(),
        })
    }

    /// Renders `article` linking to `url`. The URL is passed separately
    /// because it is resolved through the aggregator's title index rather
    /// than read off the article itself; an empty `url` yields a link to the
    /// bare prefix.
    pub fn render(&self, article: &Article, url: &str) -> Result<String> {
        let entry = Entry::new(article, &self.url_prefix, url)?;
        let context = Context::from(entry.to_value()).map_err(Error::Template)?;
        let mut output: Vec<u8> = Vec::new();
        self.template
            .execute(&mut output, &context)
            .map_err(Error::Template)?;
        Ok(String::from_utf8(output)?)
    }
}

/// The escaped, preformatted values an article contributes to the template.
struct Entry<'a> {
    title: String,
    href: String,
    tags: String,
    date: String,
    content: &'a str,
}

impl<'a> Entry<'a> {
    fn new(article: &'a Article, url_prefix: &str, url: &str) -> Result<Entry<'a>> {
        let mut title = String::new();
        escape_html(&mut title, &article.title)?;

        let mut href = String::new();
        escape_html(&mut href, &format!("{}{}", url_prefix, url))?;

        let mut tags = String::new();
        escape_html(&mut tags, &article.tags.join(", "))?;

        Ok(Entry {
            title,
            href,
            tags,
            date: rfc822(&article.date),
            content: &article.limited_content,
        })
    }

    /// Converts an [`Entry`] into a [`Value::Object`] with the fields
    /// `title`, `href`, `tags`, `date`, and `content`.
    fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert("href".to_owned(), Value::String(self.href.clone()));
        m.insert("tags".to_owned(), Value::String(self.tags.clone()));
        m.insert("date".to_owned(), Value::String(self.date.clone()));
        m.insert("content".to_owned(), Value::String(self.content.to_owned()));
        Value::Object(m)
    }
}

/// Formats a date as RFC 822 (`02 Jan 06 15:04 MST`). chrono has no zone
/// abbreviations for fixed offsets, so a zero offset prints as `UTC` and
/// anything else as a numeric offset (e.g., `-0700`).
fn rfc822(date: &DateTime<FixedOffset>) -> String {
    let zone = match date.offset().local_minus_utc() {
        0 => String::from("UTC"),
        _ => date.format("%z").to_string(),
    };
    format!("{} {}", date.format("%d %b %y %H:%M"), zone)
}

/// The result of a fallible render operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering a fragment.
#[derive(Debug)]
pub enum Error {
    /// Returned when the template fails to parse or execute.
    Template(String),

    /// Returned when escaping a value fails.
    Io(io::Error),

    /// Returned when the template produced invalid UTF-8.
    Utf8(FromUtf8Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => write!(f, "Rendering fragment: {}", err),
            Error::Io(err) => err.fmt(f),
            Error::Utf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
            Error::Utf8(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(err: FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn article() -> Article {
        Article {
            title: String::from("Hello"),
            url: String::from("hello"),
            tags: vec![String::from("go"), String::from("web")],
            date: DateTime::parse_from_rfc3339("2016-03-01T10:04:00Z").unwrap(),
            limited_content: String::from("<em>First</em> words"),
        }
    }

    #[test]
    fn test_render() -> Result<()> {
        let template = FragmentTemplate::new(DEFAULT_URL_PREFIX)?;
        let wanted = "<div> <article><h2> <a href=\"/article/hello\">Hello</a> </h4>
\t<div class=\"row\">
\t<div class=\"group1 col-sm-4 col-md-4\">
\t<span class=\"glyphicon glyphicon-bookmark\"></span>go, web</div>
\t<div class=\"group2 col-sm-8 col-md-8\">
\t<span class=\"glyphicon glyphicon-time\"></span>01 Mar 16 10:04 UTC
\t</div>
\t</div>
\t<hr>

\t<br />
\t<p><em>First</em> words</p>
\t<p class=\"text-right\">
\t<a href=\"/article/hello\"class=\"text-right\">
\tcontinue reading...
\t</a>
\t</p>
\t</hr></article> </div>";
        assert_eq!(wanted, template.render(&article(), "hello")?);
        Ok(())
    }

    #[test]
    fn test_render_missing_url() -> Result<()> {
        let template = FragmentTemplate::new(DEFAULT_URL_PREFIX)?;
        let html = template.render(&article(), "")?;
        assert_eq!(2, html.matches("href=\"/article/\"").count());
        Ok(())
    }

    #[test]
    fn test_render_escapes_title_and_tags() -> Result<()> {
        let template = FragmentTemplate::new(DEFAULT_URL_PREFIX)?;
        let mut a = article();
        a.title = String::from("Tom & <Jerry>");
        a.tags = vec![String::from("<script>")];
        let html = template.render(&a, "tom-and-jerry")?;
        assert!(html.contains(">Tom &amp; &lt;Jerry&gt;</a>"));
        assert!(html.contains("&lt;script&gt;</div>"));
        Ok(())
    }

    #[test]
    fn test_render_keeps_url_literal() -> Result<()> {
        let template = FragmentTemplate::new(DEFAULT_URL_PREFIX)?;
        let html = template.render(&article(), "café au lait")?;
        assert_eq!(2, html.matches("href=\"/article/café au lait\"").count());
        Ok(())
    }

    #[test]
    fn test_render_escapes_url_quotes() -> Result<()> {
        let template = FragmentTemplate::new(DEFAULT_URL_PREFIX)?;
        let html = template.render(&article(), "a\"b&c")?;
        assert_eq!(2, html.matches("href=\"/article/a&quot;b&amp;c\"").count());
        Ok(())
    }

    #[test]
    fn test_render_custom_prefix() -> Result<()> {
        let template = FragmentTemplate::new("/posts/")?;
        let html = template.render(&article(), "hello")?;
        assert_eq!(2, html.matches("href=\"/posts/hello\"").count());
        Ok(())
    }

    #[test]
    fn test_template_error_display() {
        let err = Error::Template(String::from("unexpected EOF"));
        assert_eq!("Rendering fragment: unexpected EOF", err.to_string());
    }

    #[test]
    fn test_rfc822_offsets() {
        let utc = DateTime::parse_from_rfc3339("2021-04-16T08:30:00+00:00").unwrap();
        assert_eq!("16 Apr 21 08:30 UTC", rfc822(&utc));

        let mst = DateTime::parse_from_rfc3339("2021-04-16T08:30:00-07:00").unwrap();
        assert_eq!("16 Apr 21 08:30 -0700", rfc822(&mst));
    }
}
