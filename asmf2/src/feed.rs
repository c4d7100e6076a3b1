use crate::{config::FeedConfig, content::render_content, Object};

/// Forgiving view over a json tree, meant for templates
///
/// Looking up a missing key, or indexing into something which is not an object, yields an empty
/// view instead of failing. Empty views display as nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lenient<'a>(Option<&'a serde_json::Value>);

impl<'a> Lenient<'a> {
	pub fn new(value: &'a serde_json::Value) -> Self {
		Lenient(Some(value))
	}

	pub fn get(self, key: &str) -> Lenient<'a> {
		Lenient(self.0.and_then(|x| x.get(key)))
	}

	/// the string value, or an empty string for anything else
	pub fn str(self) -> &'a str {
		self.0.and_then(|x| x.as_str()).unwrap_or_default()
	}

	/// true for missing values, nulls, and empty strings, arrays and objects
	pub fn is_empty(self) -> bool {
		match self.0 {
			None | Some(serde_json::Value::Null) => true,
			Some(serde_json::Value::String(x)) => x.is_empty(),
			Some(serde_json::Value::Array(x)) => x.is_empty(),
			Some(serde_json::Value::Object(x)) => x.is_empty(),
			Some(serde_json::Value::Bool(_) | serde_json::Value::Number(_)) => false,
		}
	}
}

impl std::fmt::Display for Lenient<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.0 {
			_ if self.is_empty() => Ok(()),
			Some(serde_json::Value::String(x)) => f.write_str(x),
			Some(x) => write!(f, "{x}"),
			None => Ok(()),
		}
	}
}

/// Activities prepared for an Atom feed, with everything its envelope needs
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Feed {
	pub items: Vec<serde_json::Value>,
	pub actor: serde_json::Value,
	pub title: String,
	pub host_url: String,
	pub request_url: String,
	pub updated: String,
}

impl Feed {
	/// [Feed::updated], if it is a valid rfc3339 datetime
	pub fn updated_at(&self) -> Option<chrono::DateTime<chrono::FixedOffset>> {
		chrono::DateTime::parse_from_rfc3339(&self.updated).ok()
	}
}

/// Prepares ActivityStreams activities to be rendered as an Atom feed
///
/// Every item gets `object.renderedContent`, the html content of its primary object with bare
/// ampersands escaped, and a plain text, xml escaped `title`. Query parameters are stripped from
/// the feed urls so that tokens don't leak into the feed. Input activities are left untouched.
pub fn activities_to_feed(
	activities: &[serde_json::Value],
	actor: Option<&serde_json::Value>,
	title: Option<&str>,
	request_url: Option<&str>,
	host_url: Option<&str>,
	config: &FeedConfig,
) -> Feed {
	let host_url = host_url
		.filter(|x| !x.is_empty())
		.map(remove_query_params)
		.unwrap_or_else(|| config.host_url.clone());
	let request_url = request_url
		.filter(|x| !x.is_empty())
		.map(remove_query_params)
		.unwrap_or_else(|| host_url.clone());

	let items : Vec<serde_json::Value> = activities
		.iter()
		.map(|a| prepare_item(a.clone(), config))
		.collect();

	let actor = actor.cloned().unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
	let title = match title.filter(|x| !x.is_empty()) {
		Some(t) => t.to_string(),
		None => format!("{}{}", config.title_prefix, actor_name(&actor)),
	};
	let updated = items
		.first()
		.map(|x| Lenient::new(x).get("object").get("published").str().to_string())
		.unwrap_or_default();

	Feed { items, actor, title, host_url, request_url, updated }
}

fn prepare_item(mut item: serde_json::Value, config: &FeedConfig) -> serde_json::Value {
	if !item.is_object() {
		tracing::warn!("skipping feed item which is not an object: {item}");
		return item;
	}

	let is_post = matches!(item.object_type(), None | Some("post"));

	let rendered = {
		let primary = if is_post { item.get("object") } else { Some(&item) };
		htmltext::encode_ampersands(&primary.map(render_content).unwrap_or_default())
	};

	let mut title = item.get("title").and_then(|x| x.as_str()).unwrap_or_default().to_string();
	if title.is_empty() {
		let view = Lenient::new(&item);
		let fallback = [
			view.get("displayName"),
			view.get("content"),
			view.get("object").get("title"),
			view.get("object").get("displayName"),
			view.get("object").get("content"),
		]
			.into_iter()
			.map(|x| x.str())
			.find(|x| !x.is_empty())
			.unwrap_or("Untitled");
		title = htmltext::ellipsize(
			&htmltext::encode_ampersands(fallback),
			config.title_words,
			config.title_chars,
		);
	}
	// atom titles are plain text
	let title = htmltext::escape_xml(&htmltext::strip_tags(&title));

	let primary = if is_post { item.get_mut("object") } else { Some(&mut item) };
	if let Some(attachments) = primary.and_then(|x| x.get_mut("attachments")).and_then(|x| x.as_array_mut()) {
		for att in attachments.iter_mut() {
			let Some(image) = att.get_mut("image") else { continue };
			if !image.is_array() && !Lenient::new(image).is_empty() {
				*image = serde_json::Value::Array(vec![image.take()]);
			}
		}
	}

	if let Some(map) = item.as_object_mut() {
		map.insert("title".to_string(), serde_json::Value::String(title));
		let object = map
			.entry("object")
			.or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
		match object.as_object_mut() {
			Some(object) => {
				object.insert("renderedContent".to_string(), serde_json::Value::String(rendered));
			},
			None => tracing::warn!("not rendering content of feed item with non-object 'object' field"),
		}
	}

	item
}

fn actor_name(actor: &serde_json::Value) -> &str {
	[actor.display_name(), actor.username(), actor.id()]
		.into_iter()
		.flatten()
		.find(|x| !x.is_empty())
		.unwrap_or("unknown")
}

fn remove_query_params(url: &str) -> String {
	match url::Url::parse(url) {
		Ok(mut parsed) => {
			parsed.set_query(None);
			parsed.to_string()
		},
		Err(e) => {
			tracing::debug!("could not parse feed url '{url}', stripping query by hand: {e}");
			match url.split_once('?') {
				None => url.to_string(),
				Some((base, rest)) => match rest.split_once('#') {
					Some((_, fragment)) => format!("{base}#{fragment}"),
					None => base.to_string(),
				},
			}
		},
	}
}
