use std::collections::BTreeMap;

use crate::strenum;

strenum! {
	pub enum Mf2Type {
		HEntry => "h-entry",
		HCard => "h-card",
		HAsArticle => "h-as-article",
		HAsNote => "h-as-note",
		HAsLike => "h-as-like",
		HAsRepost => "h-as-repost",
		HAsRsvp => "h-as-rsvp",
		HAsReply => "h-as-reply",
		PComment => "p-comment",
		PLocation => "p-location",
		PInvitee => "p-invitee",
		PAuthor => "p-author",
	};
}

/// Multiply valued microformats2 properties: every value is a list, an empty list means absent
pub type Properties = BTreeMap<String, Vec<PropValue>>;

/// A microformats2 object, as produced by mf2 parsers
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Mf2 {
	#[serde(rename = "type", skip_serializing_if = "Vec::is_empty")]
	pub types: Vec<String>,

	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub properties: Properties,
}

/// `e-content` value pair
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Content {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub html: Option<String>,
}

/// Single value of a microformats2 property
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum PropValue {
	/// plain text, urls and datetimes
	Text(String),
	Content(Content),
	Embedded(Box<Mf2>),
}

impl Default for PropValue {
	fn default() -> Self {
		PropValue::Text(String::new())
	}
}

static EMPTY: PropValue = PropValue::Text(String::new());

impl Mf2 {
	pub fn new(types: Vec<String>) -> Self {
		Mf2 { types, properties: Properties::new() }
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty() && self.properties.is_empty()
	}

	/// primary type, the first one listed
	pub fn primary_type(&self) -> Option<&str> {
		self.types.first().map(|x| x.as_str())
	}

	pub fn has_type(&self, t: Mf2Type) -> bool {
		self.types.iter().any(|x| x == t.as_ref())
	}

	pub fn add_type(&mut self, t: Mf2Type) {
		self.types.push(t.as_ref().to_string());
	}

	/// values of a property, empty if absent
	pub fn prop(&self, name: &str) -> &[PropValue] {
		self.properties.get(name).map(|x| x.as_slice()).unwrap_or_default()
	}

	/// true if the property has at least one value
	pub fn has_prop(&self, name: &str) -> bool {
		!self.prop(name).is_empty()
	}

	pub fn set_prop(&mut self, name: &str, values: Vec<PropValue>) {
		self.properties.insert(name.to_string(), values);
	}

	/// removes empty strings, empty lists and empty objects, recursively
	pub fn trim_nulls(self) -> Self {
		Mf2 {
			types: self.types.into_iter().filter(|x| !x.is_empty()).collect(),
			properties: self.properties
				.into_iter()
				.map(|(k, v)| (k, v.into_iter().filter_map(PropValue::trim_nulls).collect::<Vec<_>>()))
				.filter(|(_, v)| !v.is_empty())
				.collect(),
		}
	}
}

impl PropValue {
	pub fn text(value: Option<&str>) -> Self {
		PropValue::Text(value.unwrap_or_default().to_string())
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			PropValue::Text(x) => Some(x),
			_ => None,
		}
	}

	pub fn as_content(&self) -> Option<&Content> {
		match self {
			PropValue::Content(x) => Some(x),
			_ => None,
		}
	}

	pub fn as_embedded(&self) -> Option<&Mf2> {
		match self {
			PropValue::Embedded(x) => Some(x),
			_ => None,
		}
	}

	pub fn is_null(&self) -> bool {
		match self {
			PropValue::Text(x) => x.is_empty(),
			PropValue::Content(c) => c.is_empty(),
			PropValue::Embedded(x) => x.is_empty(),
		}
	}

	fn trim_nulls(self) -> Option<Self> {
		let trimmed = match self {
			PropValue::Text(x) => PropValue::Text(x),
			PropValue::Content(c) => PropValue::Content(Content {
				value: c.value.filter(|x| !x.is_empty()),
				html: c.html.filter(|x| !x.is_empty()),
			}),
			PropValue::Embedded(x) => PropValue::Embedded(Box::new(x.trim_nulls())),
		};
		if trimmed.is_null() { None } else { Some(trimmed) }
	}
}

impl Content {
	pub fn is_empty(&self) -> bool {
		self.value.as_deref().unwrap_or_default().is_empty()
			&& self.html.as_deref().unwrap_or_default().is_empty()
	}
}

impl From<serde_json::Value> for Mf2 {
	fn from(value: serde_json::Value) -> Self {
		let mut map = match value {
			serde_json::Value::Object(map) => map,
			serde_json::Value::Null => return Mf2::default(),
			x => {
				tracing::warn!("ignoring mf2 value which is not an object: {x}");
				return Mf2::default();
			},
		};

		let types = match map.remove("type") {
			Some(serde_json::Value::String(t)) => vec![t],
			Some(serde_json::Value::Array(arr)) => arr
				.into_iter()
				.filter_map(|x| match x {
					serde_json::Value::String(t) => Some(t),
					_ => None,
				})
				.collect(),
			_ => vec![],
		};

		let properties = match map.remove("properties") {
			Some(serde_json::Value::Object(props)) => props
				.into_iter()
				.map(|(k, v)| {
					let values = match v {
						serde_json::Value::Array(arr) => arr.into_iter().map(PropValue::from).collect(),
						serde_json::Value::Null => vec![],
						x => vec![PropValue::from(x)],
					};
					(k, values)
				})
				.collect(),
			_ => Properties::new(),
		};

		Mf2 { types, properties }
	}
}

impl From<serde_json::Value> for PropValue {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::String(x) => PropValue::Text(x),
			serde_json::Value::Object(map) =>
				if map.contains_key("type") || map.contains_key("properties") {
					PropValue::Embedded(Box::new(Mf2::from(serde_json::Value::Object(map))))
				} else {
					PropValue::Content(Content {
						value: map.get("value").and_then(|x| x.as_str()).map(|x| x.to_string()),
						html: map.get("html").and_then(|x| x.as_str()).map(|x| x.to_string()),
					})
				},
			serde_json::Value::Number(n) => PropValue::Text(n.to_string()),
			serde_json::Value::Bool(b) => PropValue::Text(b.to_string()),
			serde_json::Value::Null | serde_json::Value::Array(_) => PropValue::default(),
		}
	}
}

impl<'de> serde::Deserialize<'de> for Mf2 {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		serde_json::Value::deserialize(deserializer).map(Mf2::from)
	}
}

impl<'de> serde::Deserialize<'de> for PropValue {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		serde_json::Value::deserialize(deserializer).map(PropValue::from)
	}
}

/// Converts a multiply-valued property map to a singly valued one
///
/// Each property maps to its first value, or to an empty string if its list is empty.
pub fn first_props(props: &Properties) -> BTreeMap<&str, &PropValue> {
	props
		.iter()
		.map(|(k, v)| (k.as_str(), v.first().unwrap_or(&EMPTY)))
		.collect()
}

/// Extracts string urls from a list of either string urls or embedded mf2 objects
///
/// Many mf2 properties, `in-reply-to` above all, can hold either. Embedded objects contribute
/// their own `url` values only if they carry an `h-*` type; anything else is skipped.
pub fn get_string_urls(values: &[PropValue]) -> Vec<&str> {
	let mut urls = Vec::new();
	for item in values {
		match item {
			PropValue::Text(url) => urls.push(url.as_str()),
			PropValue::Embedded(obj) => {
				if obj.types.iter().any(|t| t.starts_with("h-")) {
					urls.extend(obj.prop("url").iter().filter_map(|x| x.as_text()));
				}
			},
			PropValue::Content(_) => {},
		}
	}
	urls
}

/// Removes null values, empty strings, empty arrays and empty objects from a json tree,
/// recursively
pub fn trim_nulls(value: serde_json::Value) -> serde_json::Value {
	match value {
		serde_json::Value::Object(map) => serde_json::Value::Object(
			map.into_iter()
				.map(|(k, v)| (k, trim_nulls(v)))
				.filter(|(_, v)| !is_null(v))
				.collect()
		),
		serde_json::Value::Array(arr) => serde_json::Value::Array(
			arr.into_iter()
				.map(trim_nulls)
				.filter(|v| !is_null(v))
				.collect()
		),
		x => x,
	}
}

fn is_null(value: &serde_json::Value) -> bool {
	match value {
		serde_json::Value::Null => true,
		serde_json::Value::String(x) => x.is_empty(),
		serde_json::Value::Array(x) => x.is_empty(),
		serde_json::Value::Object(x) => x.is_empty(),
		serde_json::Value::Bool(_) | serde_json::Value::Number(_) => false,
	}
}
