use crate::{mf2::{Mf2Type, Properties}, Object, ObjectType};

/// How the verb of a classified object is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerbRule {
	NoVerb,
	/// `rsvp-` followed by the value of the `rsvp` property
	Rsvp,
	Verb(&'static str),
}

/// mf2 type to ActivityStreams objectType and verb. order is priority, first match wins
const TYPE_RULES: &[(Mf2Type, ObjectType, VerbRule)] = &[
	(Mf2Type::HAsRsvp, ObjectType::Activity, VerbRule::Rsvp),
	(Mf2Type::HAsRepost, ObjectType::Activity, VerbRule::Verb("share")),
	(Mf2Type::HAsLike, ObjectType::Activity, VerbRule::Verb("like")),
	(Mf2Type::PComment, ObjectType::Comment, VerbRule::NoVerb),
	(Mf2Type::HAsReply, ObjectType::Comment, VerbRule::NoVerb),
	(Mf2Type::PLocation, ObjectType::Place, VerbRule::NoVerb),
	(Mf2Type::HCard, ObjectType::Person, VerbRule::NoVerb),
];

/// fallback when none of the types above are present: mf2 property, if it has values, to
/// objectType and verb. order is priority, first match wins
const PROPERTY_RULES: &[(&str, ObjectType, VerbRule)] = &[
	("rsvp", ObjectType::Activity, VerbRule::Rsvp),
	("invitee", ObjectType::Activity, VerbRule::Verb("invite")),
	("repost", ObjectType::Activity, VerbRule::Verb("share")),
	("repost-of", ObjectType::Activity, VerbRule::Verb("share")),
	("like", ObjectType::Activity, VerbRule::Verb("like")),
	("like-of", ObjectType::Activity, VerbRule::Verb("like")),
	("in-reply-to", ObjectType::Comment, VerbRule::NoVerb),
];

/// ActivityStreams objectType and verb inferred for a microformats2 object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
	pub object_type: ObjectType,
	pub verb: Option<String>,
}

/// Maps an ActivityStreams object type (see [Object::object_type]) to microformats2 types
///
/// Unknown and missing types are plain `h-entry`s.
pub fn mf2_types(object_type: Option<&str>) -> Vec<Mf2Type> {
	let Some(known) = object_type.and_then(|x| ObjectType::try_from(x).ok()) else {
		return vec![Mf2Type::HEntry];
	};

	match known {
		ObjectType::Article => vec![Mf2Type::HEntry, Mf2Type::HAsArticle],
		ObjectType::Comment => vec![Mf2Type::HEntry, Mf2Type::PComment],
		ObjectType::Like => vec![Mf2Type::HEntry, Mf2Type::HAsLike],
		ObjectType::Note => vec![Mf2Type::HEntry, Mf2Type::HAsNote],
		ObjectType::Person => vec![Mf2Type::HCard],
		ObjectType::Place => vec![Mf2Type::HCard, Mf2Type::PLocation],
		ObjectType::Share => vec![Mf2Type::HEntry, Mf2Type::HAsRepost],
		ObjectType::RsvpYes | ObjectType::RsvpNo | ObjectType::RsvpMaybe =>
			vec![Mf2Type::HEntry, Mf2Type::HAsRsvp],
		ObjectType::Invite => vec![Mf2Type::HEntry],
		_ => vec![Mf2Type::HEntry],
	}
}

/// [mf2_types] for the canonical type of an ActivityStreams object
pub fn mf2_types_of(obj: &impl Object) -> Vec<Mf2Type> {
	mf2_types(obj.object_type())
}

/// Infers the ActivityStreams objectType and verb of a microformats2 object
///
/// Type tokens are checked first, then property presence, since mf2 producers differ in how
/// strictly they emit types. Anything else is an `article`, or a `note` if typed `h-as-note`.
pub fn classify(types: &[String], props: &Properties) -> Classified {
	let has_type = |t: Mf2Type| types.iter().any(|x| x == t.as_ref());
	let has_prop = |p: &str| props.get(p).is_some_and(|v| !v.is_empty());

	let matched = TYPE_RULES
		.iter()
		.find(|(mf2_type, _, _)| has_type(*mf2_type))
		.map(|(_, as_type, verb)| (*as_type, *verb))
		.or_else(||
			PROPERTY_RULES
				.iter()
				.find(|(prop, _, _)| has_prop(*prop))
				.map(|(_, as_type, verb)| (*as_type, *verb))
		);

	let Some((object_type, verb)) = matched else {
		let object_type = if has_type(Mf2Type::HAsNote) { ObjectType::Note } else { ObjectType::Article };
		tracing::debug!("no classification rule matched types {types:?}, defaulting to {object_type}");
		return Classified { object_type, verb: None };
	};

	let verb = match verb {
		VerbRule::NoVerb => None,
		VerbRule::Verb(v) => Some(v.to_string()),
		VerbRule::Rsvp => props
			.get("rsvp")
			.and_then(|v| v.first())
			.and_then(|x| x.as_text())
			.filter(|x| !x.is_empty())
			.map(|x| format!("rsvp-{x}")),
	};

	Classified { object_type, verb }
}
