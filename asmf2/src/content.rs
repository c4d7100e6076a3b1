use std::collections::HashSet;

use crate::{Mention, Object};

/// Tags grouped by their [Object::object_type], in order of first appearance
#[derive(Default)]
struct TagBuckets<'a>(Vec<(Option<&'a str>, Vec<&'a serde_json::Value>)>);

impl<'a> TagBuckets<'a> {
	fn push(&mut self, tag: &'a serde_json::Value) {
		let kind = tag.object_type();
		match self.0.iter_mut().find(|(k, _)| *k == kind) {
			Some((_, tags)) => tags.push(tag),
			None => self.0.push((kind, vec![tag])),
		}
	}

	fn take(&mut self, kind: &str) -> Vec<&'a serde_json::Value> {
		match self.0.iter().position(|(k, _)| *k == Some(kind)) {
			Some(idx) => self.0.remove(idx).1,
			None => vec![],
		}
	}

	fn rest(self) -> Vec<&'a serde_json::Value> {
		self.0.into_iter().flat_map(|(_, tags)| tags).collect()
	}
}

/// Renders the content of an ActivityStreams object as html
///
/// Newlines become `<br />`s, tags with a `startIndex` and `length` are linkified inside the
/// content, attachments and `article` tags are appended as link cards, and the remaining tags
/// (except likes and shares, which belong to the surrounding entry) are appended as lists of
/// links.
///
/// Mention spans are char offsets into the content after newline expansion. Overlapping spans
/// are not guarded against: the overlapping text is repeated inside each link.
pub fn render_content(obj: &serde_json::Value) -> String {
	let mut content = expand_newlines(obj.content().unwrap_or_default());

	// preserve order but de-dupe, ie don't include a tag more than once
	let mut seen_ids = HashSet::new();
	let mut mentions = Vec::new();
	let mut tags = TagBuckets::default();
	for tag in obj.tags().objects() {
		if let Some(id) = tag.id().filter(|x| !x.is_empty()) {
			if !seen_ids.insert(id) {
				continue;
			}
		}

		match tag.span() {
			Some(span) => mentions.push((span, tag)),
			None => tags.push(tag),
		}
	}

	if !mentions.is_empty() {
		mentions.sort_by_key(|((start, _), _)| *start);
		let orig = content;
		let offsets = char_offsets(&orig);
		let mut last_end = 0;
		content = String::with_capacity(orig.len());
		for ((start, end), tag) in mentions {
			content.push_str(char_slice(&orig, &offsets, last_end, start));
			content.push_str(&format!(
				"<a href=\"{}\">{}</a>",
				tag.url().unwrap_or_default(),
				char_slice(&orig, &offsets, start, end),
			));
			last_end = end;
		}
		content.push_str(char_slice(&orig, &offsets, last_end, usize::MAX));
	}

	// attachments, e.g. links (aka articles)
	let mut cards = obj.attachments().objects();
	cards.extend(tags.take("article"));
	for tag in cards {
		content.push_str(&render_card(obj, tag));
	}

	// likes and shares are rendered by the html serializer, next to the entry
	tags.take("like");
	tags.take("share");
	let hashtags = tags.take("hashtag");
	let mentioned = tags.take("mention");
	content.push_str(&tags_to_html(&hashtags, "p-category"));
	content.push_str(&tags_to_html(&mentioned, "u-mention"));
	content.push_str(&tags_to_html(&tags.rest(), "tag"));

	content
}

fn render_card(parent: &serde_json::Value, tag: &serde_json::Value) -> String {
	let mut out = String::from("\n<p>");
	let url = tag.url()
		.filter(|x| !x.is_empty())
		.or(parent.url().filter(|x| !x.is_empty()));
	let name = tag.display_name().unwrap_or_default();

	if let Some(url) = url {
		out.push_str(&format!("\n<a class=\"link\" alt=\"{name}\" href=\"{url}\">"));
	}

	let image = match tag.image() {
		x if x.is_empty() => parent.image(),
		x => x,
	};
	if let Some(src) = image.url().filter(|x| !x.is_empty()) {
		out.push_str(&format!("\n<img class=\"thumbnail\" src=\"{src}\" alt=\"{name}\" />"));
	}

	if !name.is_empty() {
		out.push_str(&format!("\n<span class=\"name\">{name}</span>"));
	}
	if url.is_some() {
		out.push_str("\n</a>");
	}

	if let Some(summary) = tag.summary().filter(|x| !x.is_empty() && *x != name) {
		out.push_str(&format!("\n<span class=\"summary\">{summary}</span>"));
	}

	out.push_str("\n</p>");
	out
}

/// Returns an html paragraph with links to the given tag objects, or nothing if there are none
pub fn tags_to_html(tags: &[&serde_json::Value], classname: &str) -> String {
	if tags.is_empty() {
		return String::new();
	}

	let links = tags
		.iter()
		.map(|t| format!(
			"<a href=\"{}\">{}</a>",
			t.url().unwrap_or_default(),
			t.display_name().unwrap_or_default(),
		))
		.collect::<Vec<_>>()
		.join("\n");

	format!("\n<p class=\"{classname}\">{links}</p>")
}

/// Turns newlines into `<br />` line breaks, leaving already broken lines alone
fn expand_newlines(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut lines = text.split('\n').peekable();
	while let Some(line) = lines.next() {
		out.push_str(line);
		if lines.peek().is_some() {
			if !line.ends_with("<br />") {
				out.push_str("<br />");
			}
			out.push('\n');
		}
	}
	out
}

/// byte offset of every char, followed by the text length
fn char_offsets(text: &str) -> Vec<usize> {
	text.char_indices()
		.map(|(b, _)| b)
		.chain(std::iter::once(text.len()))
		.collect()
}

/// substring between two char offsets, clamped to the text bounds
fn char_slice<'a>(text: &'a str, offsets: &[usize], start: usize, end: usize) -> &'a str {
	if start >= end {
		return "";
	}
	let offset = |idx: usize| offsets.get(idx).copied().unwrap_or(text.len());
	&text[offset(start)..offset(end)]
}

#[cfg(test)]
mod test {
	use super::render_content;

	#[test]
	fn single_mention_is_linkified() {
		let obj = serde_json::json!({
			"content": "hello world",
			"tags": [{ "startIndex": 6, "length": 5, "url": "http://x" }],
		});
		assert_eq!(render_content(&obj), "hello <a href=\"http://x\">world</a>");
	}

	#[test]
	fn mentions_are_spliced_in_start_order() {
		let obj = serde_json::json!({
			"content": "foo bar baz",
			"tags": [
				{ "objectType": "person", "startIndex": 8, "length": 3, "url": "http://baz" },
				{ "objectType": "person", "startIndex": 0, "length": 3, "url": "http://foo" },
			],
		});
		assert_eq!(
			render_content(&obj),
			"<a href=\"http://foo\">foo</a> bar <a href=\"http://baz\">baz</a>",
		);
	}

	#[test]
	fn mention_offsets_count_chars_not_bytes() {
		let obj = serde_json::json!({
			"content": "ciao à tutti",
			"tags": [{ "startIndex": 7, "length": 5, "url": "http://x" }],
		});
		assert_eq!(render_content(&obj), "ciao à <a href=\"http://x\">tutti</a>");
	}

	#[test]
	fn newlines_become_line_breaks() {
		let obj = serde_json::json!({ "content": "a\nb" });
		assert_eq!(render_content(&obj), "a<br />\nb");
	}

	#[test]
	fn expanded_line_breaks_are_not_doubled() {
		let obj = serde_json::json!({ "content": "a<br />\nb\nc\n" });
		assert_eq!(render_content(&obj), "a<br />\nb<br />\nc<br />\n");

		let rendered = serde_json::json!({ "content": render_content(&obj) });
		assert_eq!(render_content(&rendered), render_content(&obj));
	}

	#[test]
	fn unrepresentable_span_is_listed_as_tag() {
		let obj = serde_json::json!({
			"content": "hello world",
			"tags": [{ "startIndex": u64::MAX, "length": 1, "url": "http://x" }],
		});
		assert_eq!(
			render_content(&obj),
			"hello world\n<p class=\"tag\"><a href=\"http://x\"></a></p>",
		);
	}

	#[test]
	fn span_past_the_end_is_clamped() {
		let obj = serde_json::json!({
			"content": "hi you",
			"tags": [{ "startIndex": 3, "length": 100, "url": "http://you" }],
		});
		assert_eq!(render_content(&obj), "hi <a href=\"http://you\">you</a>");
	}

	#[test]
	fn missing_content_renders_nothing() {
		assert_eq!(render_content(&serde_json::json!({})), "");
	}

	#[test]
	fn tags_are_listed_by_type_and_deduplicated() {
		let obj = serde_json::json!({
			"content": "x",
			"tags": [
				{ "id": "t1", "objectType": "hashtag", "url": "http://t/1", "displayName": "one" },
				{ "id": "t1", "objectType": "hashtag", "url": "http://t/dup", "displayName": "dup" },
				{ "objectType": "person", "url": "http://p", "displayName": "pal" },
				{ "objectType": "mention", "url": "http://m", "displayName": "@m" },
				{ "objectType": "hashtag", "url": "http://t/2", "displayName": "two" },
				{ "objectType": "like", "url": "http://liked" },
				{ "objectType": "share", "url": "http://shared" },
			],
		});
		assert_eq!(
			render_content(&obj),
			"x\n<p class=\"p-category\"><a href=\"http://t/1\">one</a>\n<a href=\"http://t/2\">two</a></p>\
			\n<p class=\"u-mention\"><a href=\"http://m\">@m</a></p>\
			\n<p class=\"tag\"><a href=\"http://p\">pal</a></p>",
		);
	}

	#[test]
	fn tags_without_id_are_never_deduplicated() {
		let obj = serde_json::json!({
			"tags": [
				{ "objectType": "hashtag", "url": "http://t", "displayName": "a" },
				{ "objectType": "hashtag", "url": "http://t", "displayName": "a" },
			],
		});
		assert_eq!(
			render_content(&obj),
			"\n<p class=\"p-category\"><a href=\"http://t\">a</a>\n<a href=\"http://t\">a</a></p>",
		);
	}

	#[test]
	fn attachments_render_as_cards() {
		let obj = serde_json::json!({
			"content": "look",
			"url": "http://parent",
			"image": { "url": "http://parent/img" },
			"attachments": [{
				"objectType": "article",
				"url": "http://link",
				"displayName": "Link",
				"summary": "about the link",
				"image": [{ "url": "http://link/img" }],
			}],
			"tags": [{ "objectType": "article", "displayName": "Same", "summary": "Same" }],
		});
		assert_eq!(
			render_content(&obj),
			"look\
			\n<p>\
			\n<a class=\"link\" alt=\"Link\" href=\"http://link\">\
			\n<img class=\"thumbnail\" src=\"http://link/img\" alt=\"Link\" />\
			\n<span class=\"name\">Link</span>\
			\n</a>\
			\n<span class=\"summary\">about the link</span>\
			\n</p>\
			\n<p>\
			\n<a class=\"link\" alt=\"Same\" href=\"http://parent\">\
			\n<img class=\"thumbnail\" src=\"http://parent/img\" alt=\"Same\" />\
			\n<span class=\"name\">Same</span>\
			\n</a>\
			\n</p>",
		);
	}

	#[test]
	fn card_without_any_url_or_image() {
		let obj = serde_json::json!({ "attachments": [{ "summary": "only a summary" }] });
		assert_eq!(
			render_content(&obj),
			"\n<p>\n<span class=\"summary\">only a summary</span>\n</p>",
		);
	}

	#[test]
	fn rendering_is_repeatable_and_leaves_input_alone() {
		let obj = serde_json::json!({
			"content": "hi @you",
			"tags": [
				{ "startIndex": 3, "length": 4, "url": "http://you" },
				{ "objectType": "hashtag", "url": "http://t", "displayName": "t" },
			],
		});
		let before = obj.clone();
		let first = render_content(&obj);
		assert_eq!(render_content(&obj), first);
		assert_eq!(obj, before);
	}
}
