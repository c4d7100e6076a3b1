use std::{io::Read, path::PathBuf};
use clap::{Parser, Subcommand};


#[derive(Parser)]
/// convert between activitystreams and microformats2
struct Args {
	#[clap(subcommand)]
	/// command to run
	command: Mode,

	/// path to config file, leave empty to not use any
	#[arg(short, long)]
	config: Option<PathBuf>,

	#[arg(long, default_value_t=false)]
	/// run with debug level tracing
	debug: bool,
}

#[derive(Clone, Subcommand)]
enum Mode {
	/// print current or default configuration
	Config,

	/// convert an activitystreams object to microformats2 json
	Mf2 {
		/// json file to read, stdin if not given
		input: Option<PathBuf>,

		#[arg(long, default_value_t = false)]
		/// keep empty properties, overrides config value
		untrimmed: bool,
	},

	/// convert microformats2 json to an activitystreams object
	As {
		/// json file to read, stdin if not given
		input: Option<PathBuf>,

		#[arg(long, default_value_t = false)]
		/// prefer plain text content over html, overrides config value
		text: bool,
	},

	/// render an activitystreams object as microformats2 html
	Html {
		/// json file to read, stdin if not given
		input: Option<PathBuf>,

		#[arg(long, default_value_t = false)]
		/// input is microformats2 json rather than activitystreams
		mf2: bool,
	},

	/// render only the content of an activitystreams object as html
	Content {
		/// json file to read, stdin if not given
		input: Option<PathBuf>,
	},

	/// prepare a list of activities for an atom feed
	Feed {
		/// json file with an array of activities, stdin if not given
		input: Option<PathBuf>,

		#[arg(long)]
		/// json file with the actor authoring this feed
		actor: Option<PathBuf>,

		#[arg(long)]
		/// feed title, defaults to a title naming the actor
		title: Option<String>,

		#[arg(long)]
		/// url this feed is served at
		request_url: Option<String>,

		#[arg(long)]
		/// home url of this feed, overrides config value
		host_url: Option<String>,
	},
}

#[derive(Debug, thiserror::Error)]
enum CliError {
	#[error("could not read input: {0}")]
	Io(#[from] std::io::Error),

	#[error("could not convert input: {0}")]
	Convert(#[from] asmf2::Error),

	#[error("could not serialize output: {0}")]
	Json(#[from] serde_json::Error),

	#[error("could not serialize config: {0}")]
	Toml(#[from] toml::ser::Error),
}

fn main() {
	let args = Args::parse();

	tracing_subscriber::fmt()
		.compact()
		.with_writer(std::io::stderr)
		.with_max_level(if args.debug { tracing::Level::DEBUG } else { tracing::Level::INFO })
		.init();

	let config = asmf2::Config::load(args.config.as_ref());

	match run(args.command, config) {
		Ok(out) => println!("{out}"),
		Err(e) => {
			tracing::error!("{e}");
			std::process::exit(1);
		},
	}
}

fn run(command: Mode, config: asmf2::Config) -> Result<String, CliError> {
	match command {
		Mode::Config => Ok(toml::to_string_pretty(&config)?),

		Mode::Mf2 { input, untrimmed } => {
			let obj = asmf2::parse_as(&read_input(input.as_ref())?)?;
			let trim = config.convert.trim_nulls && !untrimmed;
			Ok(serde_json::to_string_pretty(&asmf2::to_mf2(&obj, trim))?)
		},

		Mode::As { input, text } => {
			let obj = asmf2::parse_mf2(&read_input(input.as_ref())?)?;
			let html_content = config.convert.html_content && !text;
			Ok(serde_json::to_string_pretty(&asmf2::to_as(&obj, html_content))?)
		},

		Mode::Html { input, mf2 } => {
			let raw = read_input(input.as_ref())?;
			if mf2 {
				Ok(asmf2::to_html(&asmf2::parse_mf2(&raw)?))
			} else {
				Ok(asmf2::object_to_html(&asmf2::parse_as(&raw)?))
			}
		},

		Mode::Content { input } => {
			let obj = asmf2::parse_as(&read_input(input.as_ref())?)?;
			Ok(asmf2::render_content(&obj))
		},

		Mode::Feed { input, actor, title, request_url, host_url } => {
			let activities = asmf2::parse_as_list(&read_input(input.as_ref())?)?;
			let actor = match actor {
				Some(path) => Some(asmf2::parse_as(&std::fs::read_to_string(path)?)?),
				None => None,
			};
			tracing::debug!("preparing feed with {} activities", activities.len());
			let feed = asmf2::activities_to_feed(
				&activities,
				actor.as_ref(),
				title.as_deref(),
				request_url.as_deref(),
				host_url.as_deref(),
				&config.feed,
			);
			Ok(serde_json::to_string_pretty(&feed)?)
		},
	}
}

fn read_input(path: Option<&PathBuf>) -> std::io::Result<String> {
	match path {
		Some(path) => std::fs::read_to_string(path),
		None => {
			let mut buf = String::new();
			std::io::stdin().read_to_string(&mut buf)?;
			Ok(buf)
		},
	}
}
