use anyhow::{anyhow, Result};
use article_aggregator::aggregator::Aggregator;
use article_aggregator::config::{find_project_file, Config};
use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = App::new("article-aggregator")
        .version(crate_version!())
        .about("Renders a directory of JSON articles as listing fragments")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .short("p")
                .long("project")
                .takes_value(true)
                .value_name("DIR")
                .help("Directory in which to look for aggregator.yaml (defaults to the current directory)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increases log verbosity (-v for debug, -vv for trace)"),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("Prints the listing fragment for every article, or for one article")
                .arg(
                    Arg::with_name("url")
                        .long("url")
                        .takes_value(true)
                        .value_name("URL")
                        .help("Renders only the article with this URL"),
                ),
        )
        .subcommand(
            SubCommand::with_name("index")
                .about("Prints `title<TAB>url` for every article in listing order"),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    if let Err(e) = run(&matches) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    match matches.value_of("project") {
        Some(dir) => Config::from_directory(&PathBuf::from(dir)),
        None => {
            let cwd = std::env::current_dir()?;
            match find_project_file(&cwd) {
                Some(path) => Config::from_project_file(&path),
                None => {
                    debug!("no project file found; using defaults");
                    Ok(Config::defaults(&cwd))
                }
            }
        }
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let aggregator = Aggregator::aggregate(&config.articles_directory, &config.options)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match matches.subcommand() {
        ("render", Some(render)) => match render.value_of("url") {
            Some(url) => {
                let article = aggregator
                    .article_by_url(url)
                    .ok_or_else(|| anyhow!("No article with URL `{}`", url))?;
                out.write_all(aggregator.display_article(article)?.as_bytes())?;
            }
            None => out.write_all(aggregator.display_article_all()?.as_bytes())?,
        },
        ("index", Some(_)) => {
            for article in aggregator.articles() {
                let url = aggregator.url_for_title(&article.title).unwrap_or_default();
                writeln!(out, "{}\t{}", article.title, url)?;
            }
        }
        (name, _) => return Err(anyhow!("Unknown subcommand `{}`", name)),
    }
    out.flush()?;
    Ok(())
}
