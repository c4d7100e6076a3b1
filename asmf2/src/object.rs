use crate::{getter, setter, strenum, Node};

strenum! {
	pub enum ObjectType {
		Activity => "activity",
		Article => "article",
		Comment => "comment",
		Event => "event",
		Hashtag => "hashtag",
		Invite => "invite",
		Like => "like",
		Mention => "mention",
		Note => "note",
		Person => "person",
		Place => "place",
		Post => "post",
		RsvpYes => "rsvp-yes",
		RsvpNo => "rsvp-no",
		RsvpMaybe => "rsvp-maybe",
		Share => "share",
	};
}

impl ObjectType {
	pub fn is_rsvp(&self) -> bool {
		matches!(self, Self::RsvpYes | Self::RsvpNo | Self::RsvpMaybe)
	}
}

/// Read access to a decoded ActivityStreams 1.0 object
///
/// Every getter degrades to `None` or [Node::Empty] when the field is missing or has an
/// unexpected shape.
pub trait Object {
	fn id(&self) -> Option<&str> { None }
	/// raw `objectType` field, see [Object::object_type] for the canonical discriminator
	fn raw_object_type(&self) -> Option<&str> { None }
	fn verb(&self) -> Option<&str> { None }
	fn display_name(&self) -> Option<&str> { None }
	fn title(&self) -> Option<&str> { None }
	fn username(&self) -> Option<&str> { None }
	fn summary(&self) -> Option<&str> { None }
	fn content(&self) -> Option<&str> { None }
	fn url(&self) -> Option<&str> { None }
	fn published(&self) -> Option<&str> { None }
	fn updated(&self) -> Option<&str> { None }
	fn image(&self) -> Node<'_> { Node::Empty }
	fn author(&self) -> Node<'_> { Node::Empty }
	fn location(&self) -> Node<'_> { Node::Empty }
	fn tags(&self) -> Node<'_> { Node::Empty }
	fn attachments(&self) -> Node<'_> { Node::Empty }
	fn in_reply_to(&self) -> Node<'_> { Node::Empty }
	/// items of the `replies` collection
	fn replies(&self) -> Node<'_> { Node::Empty }

	/// the object type, or the verb when this is an activity
	fn object_type(&self) -> Option<&str> {
		match self.raw_object_type() {
			Some("activity") => self.verb(),
			x => x,
		}
	}

	/// [Object::object_type], parsed if it is one of the known types
	fn known_type(&self) -> Option<ObjectType> {
		self.object_type()?.try_into().ok()
	}

	/// `displayName`, falling back to `title`
	fn name(&self) -> Option<&str> {
		self.display_name().or(self.title())
	}
}

/// Activity-only fields
pub trait Activity : Object {
	fn actor(&self) -> Node<'_> { Node::Empty }
	fn object(&self) -> Node<'_> { Node::Empty }
}

/// Fields of tags which refer to a span of their parent's content
pub trait Mention : Object {
	fn start_index(&self) -> Option<u64> { None }
	fn length(&self) -> Option<u64> { None }

	/// `(start, end)` char offsets into the parent content, if both fields are present and the
	/// end is representable
	fn span(&self) -> Option<(usize, usize)> {
		let start = usize::try_from(self.start_index()?).ok()?;
		let length = usize::try_from(self.length()?).ok()?;
		Some((start, start.checked_add(length)?))
	}
}

pub trait ObjectMut {
	fn set_id(self, val: Option<&str>) -> Self;
	fn set_object_type(self, val: Option<&str>) -> Self;
	fn set_verb(self, val: Option<&str>) -> Self;
	fn set_display_name(self, val: Option<&str>) -> Self;
	fn set_summary(self, val: Option<&str>) -> Self;
	fn set_content(self, val: Option<&str>) -> Self;
	fn set_url(self, val: Option<&str>) -> Self;
	fn set_published(self, val: Option<&str>) -> Self;
	fn set_updated(self, val: Option<&str>) -> Self;
	fn set_image(self, val: Option<serde_json::Value>) -> Self;
	fn set_author(self, val: Option<serde_json::Value>) -> Self;
	fn set_actor(self, val: Option<serde_json::Value>) -> Self;
	fn set_location(self, val: Option<serde_json::Value>) -> Self;
	fn set_in_reply_to(self, val: Option<serde_json::Value>) -> Self;
	fn set_replies(self, val: Option<serde_json::Value>) -> Self;
	fn set_object(self, val: Option<serde_json::Value>) -> Self;
}

impl Object for serde_json::Value {
	getter! { id -> &str }
	getter! { raw_object_type::objectType -> &str }
	getter! { verb -> &str }
	getter! { display_name::displayName -> &str }
	getter! { title -> &str }
	getter! { username -> &str }
	getter! { summary -> &str }
	getter! { content -> &str }
	getter! { url -> &str }
	getter! { published -> &str }
	getter! { updated -> &str }
	getter! { image -> node }
	getter! { author -> node }
	getter! { location -> node }
	getter! { tags -> node }
	getter! { attachments -> node }
	getter! { in_reply_to::inReplyTo -> node }

	fn replies(&self) -> Node<'_> {
		match self.get("replies") {
			Some(replies) => Node::from(replies.get("items")),
			None => Node::Empty,
		}
	}
}

impl Activity for serde_json::Value {
	getter! { actor -> node }
	getter! { object -> node }
}

impl Mention for serde_json::Value {
	getter! { start_index::startIndex -> u64 }
	getter! { length -> u64 }
}

impl ObjectMut for serde_json::Value {
	setter! { id -> &str }
	setter! { object_type::objectType -> &str }
	setter! { verb -> &str }
	setter! { display_name::displayName -> &str }
	setter! { summary -> &str }
	setter! { content -> &str }
	setter! { url -> &str }
	setter! { published -> &str }
	setter! { updated -> &str }
	setter! { image -> value }
	setter! { author -> value }
	setter! { actor -> value }
	setter! { location -> value }
	setter! { in_reply_to::inReplyTo -> value }
	setter! { replies -> value }
	setter! { object -> value }
}
