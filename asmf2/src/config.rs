#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct Config {
	#[serde(default)]
	pub convert: ConvertConfig,

	#[serde(default)]
	pub feed: FeedConfig,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct ConvertConfig {
	#[serde_inline_default(true)]
	/// drop empty properties from generated mf2 json
	pub trim_nulls: bool,

	#[serde_inline_default(true)]
	/// prefer the html value of mf2 content over its plain text value
	pub html_content: bool,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct FeedConfig {
	#[serde_inline_default("http://127.0.0.1:3000".into())]
	/// home url of generated feeds, used when none is given
	pub host_url: String,

	#[serde_inline_default("User feed for ".into())]
	/// feed title is this followed by the actor name, unless a title is given
	pub title_prefix: String,

	#[serde_inline_default(14)]
	/// max words in generated entry titles
	pub title_words: usize,

	#[serde_inline_default(140)]
	/// max characters in generated entry titles
	pub title_chars: usize,
}

impl Config {
	pub fn load(path: Option<&std::path::PathBuf>) -> Self {
		let Some(cfg_path) = path else { return Config::default() };
		match std::fs::read_to_string(cfg_path) {
			Ok(x) => match toml::from_str(&x) {
				Ok(cfg) => return cfg,
				Err(e) => tracing::error!("failed parsing config file: {e}"),
			},
			Err(e) => tracing::error!("failed reading config file: {e}"),
		}
		Config::default()
	}
}
