use crate::{
	classify::{classify, mf2_types_of},
	content::render_content,
	mf2::{first_props, get_string_urls, trim_nulls, Content, Mf2, Mf2Type, PropValue},
	Activity, Node, Object, ObjectMut, ObjectType,
};

/// Converts an ActivityStreams object to microformats2 json
///
/// Nested objects (author, location, comments, invitees, embedded likes and reposts) are
/// converted recursively without trimming, so the structure of the result does not depend on
/// which fields they carried; trimming, if requested, happens once on the final tree.
pub fn to_mf2(obj: &serde_json::Value, trim_nulls: bool) -> Mf2 {
	if obj.as_object().map_or(true, |x| x.is_empty()) {
		return Mf2::default();
	}

	let obj_type = obj.object_type();
	let types = mf2_types_of(obj);
	let is_rsvp = types.contains(&Mf2Type::HAsRsvp);
	let mut ret = Mf2::new(types.iter().map(|t| t.as_ref().to_string()).collect());

	let author_node = match obj.author() {
		x if x.is_empty() => obj.actor(),
		x => x,
	};
	let mut author = nested_mf2(&author_node);
	if !author.is_empty() {
		author.types = vec![Mf2Type::HCard.as_ref().to_string()];
	}

	let mut location = nested_mf2(&obj.location());
	if !location.is_empty() {
		location.types = vec![Mf2Type::HCard.as_ref().to_string(), Mf2Type::PLocation.as_ref().to_string()];
	}

	let mut in_reply_tos : Vec<Option<&str>> = obj.in_reply_to().urls();
	if is_rsvp {
		in_reply_tos.extend(obj.object().urls());
	}

	let text = |x: Option<&str>| vec![PropValue::text(x)];
	let embedded = |x: Mf2| PropValue::Embedded(Box::new(x));

	ret.set_prop("uid", text(obj.id()));
	ret.set_prop("name", text(obj.name()));
	ret.set_prop("summary", text(obj.summary()));
	ret.set_prop("url", text(obj.url()));
	ret.set_prop("photo", text(obj.image().url()));
	ret.set_prop("published", text(obj.published()));
	ret.set_prop("updated", text(obj.updated()));
	ret.set_prop("content", vec![PropValue::Content(Content {
		value: Some(htmltext::unescape_xml(obj.content().unwrap_or_default())),
		html: Some(render_content(obj)),
	})]);
	ret.set_prop("in-reply-to", in_reply_tos
		.into_iter()
		.flatten()
		.filter(|x| !x.is_empty())
		.map(|x| PropValue::Text(x.to_string()))
		.collect()
	);
	ret.set_prop("author", vec![embedded(author)]);
	ret.set_prop("location", vec![embedded(location)]);
	ret.set_prop("comment", obj.replies()
		.objects()
		.into_iter()
		.map(|c| embedded(to_mf2(c, false)))
		.collect()
	);

	if is_rsvp {
		let rsvp = obj_type.unwrap_or_default().strip_prefix("rsvp-").unwrap_or_default();
		ret.set_prop("rsvp", text(Some(rsvp)));
	} else if obj_type == Some(ObjectType::Invite.as_ref()) {
		let mut invitee = nested_mf2(&obj.object());
		if !invitee.is_empty() {
			invitee.add_type(Mf2Type::PInvitee);
		}
		ret.set_prop("invitee", vec![embedded(invitee)]);
	}

	// an object which is itself a like or share points at its targets with plain urls, any
	// other object carries the likes and shares it received as embedded objects
	for (as_type, prop) in [(ObjectType::Like, "like"), (ObjectType::Share, "repost")] {
		if obj_type == Some(as_type.as_ref()) {
			let targets : Vec<PropValue> = obj.object()
				.urls()
				.into_iter()
				.map(PropValue::text)
				.collect();
			ret.set_prop(&format!("{prop}-of"), targets.clone());
			ret.set_prop(prop, targets);
		} else {
			ret.set_prop(prop, obj.tags()
				.objects()
				.into_iter()
				.filter(|t| t.object_type() == Some(as_type.as_ref()))
				.map(|t| embedded(to_mf2(t, false)))
				.collect()
			);
		}
	}

	if trim_nulls {
		ret.trim_nulls()
	} else {
		ret
	}
}

fn nested_mf2(node: &Node) -> Mf2 {
	match node.get() {
		Some(obj) => to_mf2(obj, false),
		None => {
			if let Node::Link(url) = node {
				tracing::debug!("not embedding bare link '{url}' as nested mf2 object");
			}
			Mf2::default()
		},
	}
}

/// Converts microformats2 json to an ActivityStreams object
///
/// With `html_content` the `content` field prefers the html value of `e-content` over its
/// text value, otherwise the other way around.
pub fn to_as(mf2: &Mf2, html_content: bool) -> serde_json::Value {
	if mf2.is_empty() {
		return serde_json::Value::Object(serde_json::Map::new());
	}

	let props = &mf2.properties;
	let prop = first_props(props);
	let first_text = |name: &str| prop.get(name).and_then(|x| x.as_text());
	let nested = |name: &str| prop
		.get(name)
		.and_then(|x| x.as_embedded())
		.map(|x| to_as(x, html_content))
		.filter(|x| x.as_object().is_some_and(|m| !m.is_empty()));

	let classified = classify(&mf2.types, props);

	let content = match prop.get("content") {
		Some(PropValue::Content(c)) => {
			let text = c.value.as_deref().filter(|x| !x.is_empty());
			let html = c.html.as_deref().filter(|x| !x.is_empty());
			if html_content { html.or(text) } else { text.or(html) }
		},
		Some(PropValue::Text(x)) => Some(x.as_str()),
		_ => None,
	};

	// mf2 parsers resolve relative urls, anything without a host is invalid
	let photo = get_string_urls(mf2.prop("photo"))
		.into_iter()
		.find(|x| has_authority(x));

	let comments : Vec<serde_json::Value> = mf2.prop("comment")
		.iter()
		.filter_map(|c| c.as_embedded())
		.map(|c| to_as(c, html_content))
		.collect();

	let mut obj = serde_json::Value::Object(serde_json::Map::new())
		.set_id(first_text("uid"))
		.set_object_type(Some(classified.object_type.as_ref()))
		.set_verb(classified.verb.as_deref())
		.set_published(first_text("published"))
		.set_updated(first_text("updated"))
		.set_display_name(first_text("name"))
		.set_summary(first_text("summary"))
		.set_content(content)
		.set_url(first_text("url"))
		.set_image(photo.map(|x| serde_json::json!({ "url": x })))
		.set_location(nested("location"))
		.set_replies(Some(serde_json::json!({ "items": comments })));

	if classified.object_type == ObjectType::Activity {
		let mut urls : Vec<&str> = Vec::new();
		for field in ["like", "like-of", "repost", "repost-of", "in-reply-to"] {
			for url in get_string_urls(mf2.prop(field)) {
				if !urls.contains(&url) {
					urls.push(url);
				}
			}
		}
		let mut objects : Vec<serde_json::Value> = urls
			.into_iter()
			.map(|x| serde_json::json!({ "url": x }))
			.collect();
		objects.extend(
			mf2.prop("invitee")
				.iter()
				.filter_map(|x| x.as_embedded())
				.map(|x| to_as(x, html_content))
		);

		let object = if objects.len() == 1 {
			objects.pop()
		} else {
			Some(serde_json::Value::Array(objects))
		};
		obj = obj
			.set_object(object)
			.set_actor(nested("author"));
	} else {
		let in_reply_to : Vec<serde_json::Value> = get_string_urls(mf2.prop("in-reply-to"))
			.into_iter()
			.map(|x| serde_json::json!({ "url": x }))
			.collect();
		obj = obj
			.set_in_reply_to(Some(serde_json::Value::Array(in_reply_to)))
			.set_author(nested("author"));
	}

	trim_nulls(obj)
}

fn has_authority(url: &str) -> bool {
	// protocol relative urls still name a host
	let parsed = if url.starts_with("//") {
		url::Url::parse(&format!("http:{url}"))
	} else {
		url::Url::parse(url)
	};
	parsed
		.ok()
		.is_some_and(|u| u.host_str().is_some_and(|h| !h.is_empty()))
}

#[cfg(test)]
mod test {
	use super::{to_as, to_mf2};
	use crate::mf2::{Mf2, PropValue};

	fn mf2(value: serde_json::Value) -> Mf2 {
		serde_json::from_value(value).expect("invalid mf2 fixture")
	}

	fn json(obj: &Mf2) -> serde_json::Value {
		serde_json::to_value(obj).expect("mf2 is always serializable")
	}

	#[test]
	fn empty_object_converts_to_nothing() {
		assert!(to_mf2(&serde_json::json!({}), true).is_empty());
		assert!(to_mf2(&serde_json::Value::Null, false).is_empty());
		assert_eq!(to_as(&Mf2::default(), true), serde_json::json!({}));
	}

	#[test]
	fn note_projects_to_flat_properties() {
		let obj = serde_json::json!({
			"objectType": "note",
			"id": "tag:example.com,2013:1",
			"displayName": "a note",
			"content": "1 &lt; 2",
			"url": "http://example.com/1",
			"image": { "url": "http://example.com/1.jpg" },
			"published": "2013-01-01T00:00:00+00:00",
			"author": {
				"objectType": "person",
				"displayName": "Alice",
				"url": "http://alice",
				"image": { "url": "http://alice/pic" },
			},
			"location": { "displayName": "Home", "url": "http://home" },
			"inReplyTo": [{ "url": "http://parent" }, { "displayName": "no url" }],
		});

		assert_eq!(json(&to_mf2(&obj, true)), serde_json::json!({
			"type": ["h-entry", "h-as-note"],
			"properties": {
				"uid": ["tag:example.com,2013:1"],
				"name": ["a note"],
				"url": ["http://example.com/1"],
				"photo": ["http://example.com/1.jpg"],
				"published": ["2013-01-01T00:00:00+00:00"],
				"content": [{ "value": "1 < 2", "html": "1 &lt; 2" }],
				"in-reply-to": ["http://parent"],
				"author": [{
					"type": ["h-card"],
					"properties": {
						"name": ["Alice"],
						"url": ["http://alice"],
						"photo": ["http://alice/pic"],
					},
				}],
				"location": [{
					"type": ["h-card", "p-location"],
					"properties": {
						"name": ["Home"],
						"url": ["http://home"],
					},
				}],
			},
		}));
	}

	#[test]
	fn actor_is_used_when_author_is_missing() {
		let obj = serde_json::json!({
			"objectType": "activity",
			"verb": "share",
			"actor": { "displayName": "Bob" },
			"object": { "url": "http://shared" },
		});
		let converted = to_mf2(&obj, true);
		let author = converted.prop("author")[0].as_embedded().expect("author should be embedded");
		assert_eq!(author.types, vec!["h-card"]);
		assert_eq!(author.prop("name")[0].as_text(), Some("Bob"));
		assert_eq!(converted.prop("repost"), &[PropValue::Text("http://shared".into())]);
		assert_eq!(converted.prop("repost-of"), converted.prop("repost"));
	}

	#[test]
	fn like_targets_fill_both_properties() {
		let obj = serde_json::json!({
			"objectType": "like",
			"object": [{ "url": "http://a" }, { "url": "http://b" }],
		});
		let converted = json(&to_mf2(&obj, true));
		let expected = serde_json::json!(["http://a", "http://b"]);
		assert_eq!(converted["properties"]["like"], expected);
		assert_eq!(converted["properties"]["like-of"], expected);
		assert_eq!(converted["type"], serde_json::json!(["h-entry", "h-as-like"]));
	}

	#[test]
	fn likes_and_reposts_received_are_embedded() {
		let obj = serde_json::json!({
			"objectType": "note",
			"content": "liked post",
			"tags": [
				{ "objectType": "activity", "verb": "like", "url": "http://like/1", "author": { "displayName": "fan" } },
				{ "objectType": "activity", "verb": "share", "url": "http://share/1" },
				{ "objectType": "hashtag", "displayName": "tag", "url": "http://tag" },
			],
		});
		let converted = to_mf2(&obj, true);

		let likes = converted.prop("like");
		assert_eq!(likes.len(), 1);
		let like = likes[0].as_embedded().expect("like should be embedded");
		assert_eq!(like.types, vec!["h-entry", "h-as-like"]);
		assert_eq!(like.prop("url")[0].as_text(), Some("http://like/1"));

		let reposts = converted.prop("repost");
		assert_eq!(reposts[0].as_embedded().map(|x| x.types.clone()), Some(vec!["h-entry".to_string(), "h-as-repost".to_string()]));
		assert!(!converted.has_prop("like-of"));
		assert!(!converted.has_prop("repost-of"));
	}

	#[test]
	fn rsvp_round_trip() {
		let obj = serde_json::json!({
			"objectType": "activity",
			"verb": "rsvp-yes",
			"object": { "url": "http://event" },
		});
		let converted = to_mf2(&obj, true);
		assert!(converted.types.iter().any(|x| x == "h-as-rsvp"));
		assert_eq!(converted.prop("rsvp"), &[PropValue::Text("yes".into())]);
		assert!(converted.prop("in-reply-to").contains(&PropValue::Text("http://event".into())));

		let back = to_as(&converted, true);
		assert_eq!(back["objectType"], "activity");
		assert_eq!(back["verb"], "rsvp-yes");
		assert_eq!(back["object"], serde_json::json!({ "url": "http://event" }));
	}

	#[test]
	fn rsvp_does_not_touch_input_replies() {
		let obj = serde_json::json!({
			"objectType": "activity",
			"verb": "rsvp-no",
			"inReplyTo": [{ "url": "http://a" }],
			"object": { "url": "http://event" },
		});
		let before = obj.clone();
		let converted = to_mf2(&obj, true);
		assert_eq!(
			converted.prop("in-reply-to"),
			&[PropValue::Text("http://a".into()), PropValue::Text("http://event".into())],
		);
		assert_eq!(obj, before);
	}

	#[test]
	fn invite_embeds_invitee_card() {
		let obj = serde_json::json!({
			"objectType": "activity",
			"verb": "invite",
			"object": { "objectType": "person", "displayName": "Carol", "url": "http://carol" },
		});
		let converted = to_mf2(&obj, true);
		assert_eq!(converted.types, vec!["h-entry"]);
		let invitee = converted.prop("invitee")[0].as_embedded().expect("invitee should be embedded");
		assert_eq!(invitee.types, vec!["h-card", "p-invitee"]);

		let back = to_as(&converted, true);
		assert_eq!(back["verb"], "invite");
		assert_eq!(back["object"], serde_json::json!({
			"objectType": "person",
			"displayName": "Carol",
			"url": "http://carol",
		}));
	}

	#[test]
	fn comments_are_converted_recursively() {
		let obj = serde_json::json!({
			"objectType": "note",
			"replies": { "items": [{ "objectType": "comment", "content": "nice", "id": "c1" }] },
		});
		let converted = to_mf2(&obj, true);
		let comment = converted.prop("comment")[0].as_embedded().expect("comment should be embedded");
		assert_eq!(comment.types, vec!["h-entry", "p-comment"]);

		let back = to_as(&converted, true);
		assert_eq!(back["replies"]["items"], serde_json::json!([{
			"id": "c1",
			"objectType": "comment",
			"content": "nice",
		}]));
	}

	#[test]
	fn untrimmed_conversion_keeps_placeholders() {
		let converted = to_mf2(&serde_json::json!({ "objectType": "note" }), false);
		assert_eq!(converted.prop("uid"), &[PropValue::Text(String::new())]);
		assert!(converted.properties.contains_key("like"));
		assert!(converted.prop("like").is_empty());
		assert!(converted.prop("author")[0].as_embedded().is_some_and(|x| x.is_empty()));

		let trimmed = converted.trim_nulls();
		assert_eq!(json(&trimmed), serde_json::json!({ "type": ["h-entry", "h-as-note"] }));
	}

	#[test]
	fn photos_without_a_host_are_dropped() {
		let obj = mf2(serde_json::json!({
			"type": ["h-entry"],
			"properties": { "photo": ["relative/path", "http://good.com/p.jpg"] },
		}));
		assert_eq!(to_as(&obj, true)["image"], serde_json::json!({ "url": "http://good.com/p.jpg" }));
	}

	#[test]
	fn protocol_relative_photos_are_kept() {
		let obj = mf2(serde_json::json!({
			"type": ["h-entry"],
			"properties": { "photo": ["mailto:someone", "//cdn.example.com/p.jpg"] },
		}));
		assert_eq!(to_as(&obj, true)["image"], serde_json::json!({ "url": "//cdn.example.com/p.jpg" }));
	}

	#[test]
	fn content_prefers_html_unless_asked_otherwise() {
		let obj = mf2(serde_json::json!({
			"type": ["h-entry"],
			"properties": { "content": [{ "value": "text", "html": "<p>html</p>" }] },
		}));
		assert_eq!(to_as(&obj, true)["content"], "<p>html</p>");
		assert_eq!(to_as(&obj, false)["content"], "text");

		let only_text = mf2(serde_json::json!({
			"type": ["h-entry"],
			"properties": { "content": [{ "value": "text" }] },
		}));
		assert_eq!(to_as(&only_text, true)["content"], "text");
	}

	#[test]
	fn activity_targets_are_collected_in_order() {
		let obj = mf2(serde_json::json!({
			"type": ["h-entry", "h-as-repost"],
			"properties": {
				"author": [{ "type": ["h-card"], "properties": { "name": ["Dan"] } }],
				"repost-of": ["http://b", "http://a"],
				"repost": ["http://a"],
				"in-reply-to": [{ "type": ["h-cite"], "properties": { "url": ["http://c"] } }],
			},
		}));
		let converted = to_as(&obj, true);
		assert_eq!(converted["verb"], "share");
		assert_eq!(converted["actor"], serde_json::json!({ "objectType": "person", "displayName": "Dan" }));
		assert_eq!(converted["object"], serde_json::json!([
			{ "url": "http://a" },
			{ "url": "http://b" },
			{ "url": "http://c" },
		]));
		assert!(converted.get("author").is_none());
		assert!(converted.get("inReplyTo").is_none());
	}

	#[test]
	fn replies_keep_in_reply_to_and_author() {
		let obj = mf2(serde_json::json!({
			"type": ["h-entry"],
			"properties": {
				"in-reply-to": ["http://parent"],
				"author": [{ "type": ["h-card"], "properties": { "name": ["Eve"] } }],
				"name": ["re: parent"],
			},
		}));
		assert_eq!(to_as(&obj, true), serde_json::json!({
			"objectType": "comment",
			"displayName": "re: parent",
			"inReplyTo": [{ "url": "http://parent" }],
			"author": { "objectType": "person", "displayName": "Eve" },
		}));
	}

	#[test]
	fn string_authors_are_ignored() {
		let obj = mf2(serde_json::json!({
			"type": ["h-entry"],
			"properties": { "author": ["http://someone"], "content": ["plain"] },
		}));
		assert_eq!(to_as(&obj, true), serde_json::json!({
			"objectType": "article",
			"content": "plain",
		}));
	}

	#[test]
	fn as_to_mf2_to_as_preserves_core_fields() {
		let obj = serde_json::json!({
			"objectType": "note",
			"id": "tag:x",
			"displayName": "hi",
			"content": "hello",
			"url": "http://x/1",
			"published": "2020-01-01T00:00:00Z",
			"updated": "2020-01-02T00:00:00Z",
			"author": { "objectType": "person", "displayName": "me", "url": "http://me" },
			"location": { "objectType": "place", "displayName": "there" },
		});
		assert_eq!(to_as(&to_mf2(&obj, true), true), obj);
	}
}
