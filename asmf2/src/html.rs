use std::collections::BTreeMap;

use crate::{
	json::to_mf2,
	mf2::{first_props, get_string_urls, Mf2, Mf2Type, PropValue, Properties},
};

/// Renders an ActivityStreams object as microformats2 html
///
/// Tags are linkified or listed, attachments become link cards, see
/// [crate::content::render_content] for how the content itself is built.
pub fn object_to_html(obj: &serde_json::Value) -> String {
	to_html(&to_mf2(obj, false))
}

/// Renders a microformats2 object as html
///
/// `h-card`s become a compact card, anything else a full `article` with nested author,
/// location, invitee, like, repost and comment blocks. Empty objects render as nothing.
pub fn to_html(obj: &Mf2) -> String {
	if obj.is_empty() {
		return String::new();
	}

	if obj.primary_type() == Some(Mf2Type::HCard.as_ref()) {
		return hcard_to_html(obj);
	}

	let props = &obj.properties;
	let prop = first_props(props);

	let in_reply_tos = get_string_urls(obj.prop("in-reply-to"))
		.into_iter()
		.map(|url| format!("  <a class=\"u-in-reply-to\" href=\"{url}\"></a>"))
		.collect::<Vec<_>>()
		.join("\n");

	let author = match prop.get("author").and_then(|x| x.as_embedded()) {
		Some(author) if !author.is_empty() => {
			let mut author = author.clone();
			author.add_type(Mf2Type::PAuthor);
			hcard_to_html(&author)
		},
		_ => String::new(),
	};

	let mut content = match prop.get("content") {
		Some(PropValue::Content(c)) => c.html
			.as_deref()
			.filter(|x| !x.is_empty())
			.or(c.value.as_deref())
			.unwrap_or_default()
			.to_string(),
		Some(PropValue::Text(x)) => x.clone(),
		_ => String::new(),
	};

	let mut content_classes = vec!["e-content"];
	if first_text(&prop, "name").is_empty() {
		content_classes.push("p-name");
	}

	let summary = match first_text(&prop, "summary") {
		"" => String::new(),
		summary => format!("<div class=\"p-summary\">{summary}</div>"),
	};

	// if this post is itself a like or repost, link to its targets
	let mut likes_and_reposts = Vec::new();
	for (verb, mf2_type) in [("like", Mf2Type::HAsLike), ("repost", Mf2Type::HAsRepost)] {
		if obj.has_type(mf2_type) {
			if content.is_empty() {
				content = format!("{verb}s this.\n");
			}
			likes_and_reposts.extend(
				obj.prop(verb)
					.iter()
					.filter_map(|x| x.as_text())
					.map(|url| format!("<a class=\"u-{verb} u-{verb}-of\" href=\"{url}\"></a>"))
			);
		}
	}

	let photo = obj.prop("photo")
		.iter()
		.filter_map(|x| x.as_text())
		.filter(|x| !x.is_empty())
		.map(|url| photo_to_html(url, "attachment"))
		.collect::<Vec<_>>()
		.join("\n");

	let comments = obj.prop("comment")
		.iter()
		.filter_map(|x| x.as_embedded())
		.map(to_html)
		.collect::<Vec<_>>()
		.join("\n");

	// likes and reposts of this post, embedded
	for verb in ["like", "repost"] {
		let values = obj.prop(verb);
		if values.first().is_some_and(|x| x.as_embedded().is_some()) {
			likes_and_reposts.extend(
				values
					.iter()
					.filter_map(|x| x.as_embedded())
					.map(to_html)
			);
		}
	}

	let invitees = obj.prop("invitee")
		.iter()
		.filter_map(|x| x.as_embedded())
		.map(hcard_to_html)
		.collect::<Vec<_>>()
		.join("\n");

	let location = prop.get("location")
		.and_then(|x| x.as_embedded())
		.map(hcard_to_html)
		.unwrap_or_default();

	let types = obj.types.join(" ");
	let uid = first_text(&prop, "uid");
	let linked_name = maybe_linked_name(props);
	let published = maybe_datetime(Some(first_text(&prop, "published")), "dt-published");
	let updated = maybe_datetime(Some(first_text(&prop, "updated")), "dt-updated");
	let content_classes = content_classes.join(" ");
	let likes_and_reposts = likes_and_reposts.join("\n");

	format!(
"<article class=\"{types}\">
  <span class=\"u-uid\">{uid}</span>
  {linked_name}
  {summary}
  {published}
  {updated}
{author}
  <div class=\"{content_classes}\">
  {invitees}
  {content}
  </div>
{photo}
{location}
{in_reply_tos}
{likes_and_reposts}
{comments}
</article>
")
}

/// Renders an h-card as html, or nothing if it is empty
pub fn hcard_to_html(hcard: &Mf2) -> String {
	if hcard.is_empty() {
		return String::new();
	}

	let prop = first_props(&hcard.properties);
	let photo = match first_text(&prop, "photo") {
		"" => String::new(),
		url => {
			let alt = match prop.get("name") {
				Some(name) => name.as_text().unwrap_or_default(),
				None => "-",
			};
			photo_to_html(url, alt)
		},
	};

	let types = hcard.types.join(" ");
	let linked_name = maybe_linked_name(&hcard.properties);

	format!(
"  <div class=\"{types}\">
    {linked_name}
    {photo}
  </div>
")
}

fn photo_to_html(url: &str, alt: &str) -> String {
	format!("<img class=\"u-photo\" src=\"{url}\" alt=\"{alt}\" />")
}

/// Human readable name of an h-card: its name, its uid, or `Unknown`
pub fn author_display_name(hcard: &Mf2) -> String {
	let prop = first_props(&hcard.properties);
	match first_text(&prop, "name") {
		"" => match first_text(&prop, "uid") {
			"" => "Unknown".to_string(),
			uid => uid.to_string(),
		},
		name => name.to_string(),
	}
}

/// Html for a `p-name` with an optional `u-url` inside, followed by any extra `u-url`s
pub fn maybe_linked_name(props: &Properties) -> String {
	let prop = first_props(props);
	let name = first_text(&prop, "name");
	let url = prop.get("url").and_then(|x| x.as_text());

	let mut html = maybe_linked(name, url, Some("u-url"));
	if !name.is_empty() {
		html = format!("<div class=\"p-name\">{html}</div>");
	}

	let extra_urls = props.get("url").map(|x| x.as_slice()).unwrap_or_default();
	if extra_urls.len() > 1 {
		let extra = extra_urls[1..]
			.iter()
			.map(|x| maybe_linked("", x.as_text(), Some("u-url")))
			.collect::<Vec<_>>()
			.join("\n");
		html.push('\n');
		html.push_str(&extra);
	}

	html
}

/// Wraps text in an anchor if a non-empty url is given
pub fn maybe_linked(text: &str, url: Option<&str>, classname: Option<&str>) -> String {
	let classname = classname.map(|x| format!("class=\"{x}\"")).unwrap_or_default();
	match url {
		Some(url) if !url.is_empty() => format!("<a {classname} href=\"{url}\">{text}</a>"),
		_ => text.to_string(),
	}
}

/// A `<time>` element for a non-empty datetime string
pub fn maybe_datetime(value: Option<&str>, classname: &str) -> String {
	match value {
		Some(dt) if !dt.is_empty() => format!("<time class=\"{classname}\" datetime=\"{dt}\">{dt}</time>"),
		_ => String::new(),
	}
}

fn first_text<'a>(prop: &BTreeMap<&str, &'a PropValue>, name: &str) -> &'a str {
	prop.get(name).copied().and_then(PropValue::as_text).unwrap_or_default()
}
