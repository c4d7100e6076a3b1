use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{BufferQueue, Token, TokenSink, TokenSinkResult, Tokenizer};

/// Collects only the character data of an html fragment, dropping every tag
#[derive(Debug, Clone, Default)]
struct TextSink(String);

impl TokenSink for TextSink {
	type Handle = ();

	fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
		match token {
			Token::CharacterTokens(txt) => self.0.push_str(txt.as_ref()),
			Token::TagToken(_) => {},
			Token::CommentToken(_) => {},
			Token::DoctypeToken(_) => {},
			Token::NullCharacterToken => {},
			Token::EOFToken => {},
			Token::ParseError(e) => tracing::debug!("error parsing html: {e}"),
		}
		TokenSinkResult::Continue
	}
}

/// Strips all tags from an html fragment, returning its text with entities decoded
pub fn strip_tags(text: &str) -> String {
	let mut input = BufferQueue::default();
	input.push_back(StrTendril::from_slice(text));

	let mut tok = Tokenizer::new(TextSink::default(), Default::default());
	let _ = tok.feed(&mut input);

	if !input.is_empty() {
		tracing::warn!("buffer input not empty after processing html");
	}
	tok.end();

	tok.sink.0
}

/// Escapes `&`, `<` and `>` so text can be embedded in xml
pub fn escape_xml(text: &str) -> String {
	text
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

/// Inverse of [escape_xml]: only `&lt;`, `&gt;` and `&amp;` are decoded
pub fn unescape_xml(text: &str) -> String {
	text
		.replace("&lt;", "<")
		.replace("&gt;", ">")
		.replace("&amp;", "&")
}

fn ampersands() -> &'static regex::Regex {
	static AMPERSANDS: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
	AMPERSANDS.get_or_init(||
		regex::Regex::new(r"&(\w+;|#\d+;)?")
			.expect("error compiling ampersand regex")
	)
}

/// Escapes every `&` which does not already start an entity or character reference
pub fn encode_ampersands(text: &str) -> String {
	ampersands()
		.replace_all(text, |caps: &regex::Captures| {
			if caps.get(1).is_some() {
				caps[0].to_string()
			} else {
				"&amp;".to_string()
			}
		})
		.into_owned()
}

/// Shortens text to at most `words` words and `chars` characters, appending `...` when cut
pub fn ellipsize(text: &str, words: usize, chars: usize) -> String {
	let split : Vec<&str> = text.split_whitespace().collect();
	if split.len() <= words && text.chars().count() <= chars {
		return text.to_string();
	}

	let joined = split[..split.len().min(words)].join(" ");
	let truncated : String = joined.chars().take(chars.saturating_sub(3)).collect();
	format!("{truncated}...")
}
