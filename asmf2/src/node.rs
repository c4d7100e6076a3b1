use crate::Object;

/// ActivityStreams field node, representing either nothing, an embedded object, a bare link or
/// multiple things
///
/// Nodes borrow from the json tree they were read from: converting never clones the input
/// until an output tree is being built.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
	Array(Vec<Node<'a>>),
	Object(&'a serde_json::Value),
	Link(&'a str),
	Empty,
}

impl<'a> From<Option<&'a serde_json::Value>> for Node<'a> {
	fn from(value: Option<&'a serde_json::Value>) -> Self {
		let Some(value) = value else { return Node::Empty };
		match value {
			serde_json::Value::String(uri) => Node::Link(uri),
			serde_json::Value::Array(arr) => Node::Array(
				arr.iter()
					.map(|x| Node::from(Some(x)))
					.filter(|x| !x.is_nothing())
					.collect()
			),
			serde_json::Value::Object(map) =>
				if map.is_empty() { Node::Empty } else { Node::Object(value) },
			_ => Node::Empty,
		}
	}
}

impl<'a> Node<'a> {
	/// return reference to embedded object (or first if many are present)
	pub fn get(&self) -> Option<&'a serde_json::Value> {
		match self {
			Node::Empty | Node::Link(_) => None,
			Node::Object(x) => Some(*x),
			Node::Array(v) => v.iter().find_map(|x| x.get()),
		}
	}

	/// true only if Node is empty
	pub fn is_nothing(&self) -> bool {
		matches!(self, Node::Empty)
	}

	/// true only if Node is link
	pub fn is_link(&self) -> bool {
		matches!(self, Node::Link(_))
	}

	/// true only if Node contains one embedded object
	pub fn is_object(&self) -> bool {
		matches!(self, Node::Object(_))
	}

	/// true only if Node contains many things
	pub fn is_array(&self) -> bool {
		matches!(self, Node::Array(_))
	}

	/// true if Node holds no items at all, including empty arrays
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// returns number of contained items (links count as items for len)
	pub fn len(&self) -> usize {
		match self {
			Node::Empty => 0,
			Node::Link(_) => 1,
			Node::Object(_) => 1,
			Node::Array(v) => v.len(),
		}
	}

	/// url of this node: the link itself, or the `url` of the embedded object
	///
	/// for arrays the first item is used
	pub fn url(&self) -> Option<&'a str> {
		match self {
			Node::Empty => None,
			Node::Link(uri) => Some(*uri),
			Node::Object(obj) => Object::url(*obj),
			Node::Array(arr) => arr.first()?.url(),
		}
	}

	/// one url per contained item, `None` for items without one
	pub fn urls(&self) -> Vec<Option<&'a str>> {
		self.clone().flat().iter().map(|x| x.url()).collect()
	}

	/// all embedded objects, skipping links
	pub fn objects(&self) -> Vec<&'a serde_json::Value> {
		match self {
			Node::Empty | Node::Link(_) => vec![],
			Node::Object(x) => vec![*x],
			Node::Array(arr) => arr.iter().filter_map(|x| x.get()).collect(),
		}
	}

	pub fn flat(self) -> Vec<Node<'a>> {
		match self {
			Node::Empty => vec![],
			Node::Link(_) | Node::Object(_) => vec![self],
			// AS disallows array of arrays so no need to make this recursive
			Node::Array(arr) => arr,
		}
	}
}
