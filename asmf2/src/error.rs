use crate::mf2::Mf2;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid input json: {0:?}")]
	Json(#[from] serde_json::Error),

	#[error("expected a json object, got {0}")]
	NotAnObject(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parses an ActivityStreams object from json text
pub fn parse_as(text: &str) -> Result<serde_json::Value> {
	let value : serde_json::Value = serde_json::from_str(text)?;
	if !value.is_object() {
		return Err(Error::NotAnObject(json_kind(&value)));
	}
	Ok(value)
}

/// Parses a microformats2 object from json text
pub fn parse_mf2(text: &str) -> Result<Mf2> {
	let value = parse_as(text)?;
	Ok(Mf2::from(value))
}

/// Parses a json array of ActivityStreams objects, a single object is treated as a list of one
pub fn parse_as_list(text: &str) -> Result<Vec<serde_json::Value>> {
	match serde_json::from_str(text)? {
		serde_json::Value::Array(items) => {
			if let Some(bad) = items.iter().find(|x| !x.is_object()) {
				return Err(Error::NotAnObject(json_kind(bad)));
			}
			Ok(items)
		},
		serde_json::Value::Object(map) => Ok(vec![serde_json::Value::Object(map)]),
		x => Err(Error::NotAnObject(json_kind(&x))),
	}
}

fn json_kind(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "a boolean",
		serde_json::Value::Number(_) => "a number",
		serde_json::Value::String(_) => "a string",
		serde_json::Value::Array(_) => "an array",
		serde_json::Value::Object(_) => "an object",
	}
}
