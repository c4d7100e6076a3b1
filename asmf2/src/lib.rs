//! Conversion between ActivityStreams 1.0 objects and microformats2, both json and html
//!
//! ActivityStreams objects are plain [serde_json::Value]s, read through the [Object],
//! [Activity] and [Mention] accessor traits and built with [ObjectMut]. Microformats2 objects
//! are typed as [Mf2]. Every conversion is a pure function of its input: missing or malformed
//! fields degrade to empty output rather than errors.

mod macros;
pub(crate) use macros::{strenum, getter, setter};
pub use macros::TypeValueError;

mod node;
pub use node::Node;

mod object;
pub use object::{Activity, Mention, Object, ObjectMut, ObjectType};

pub mod mf2;
pub use mf2::{Content, Mf2, Mf2Type, PropValue, Properties};

pub mod classify;
pub use classify::{classify, mf2_types, Classified};

pub mod content;
pub use content::render_content;

pub mod json;
pub use json::{to_as, to_mf2};

pub mod html;
pub use html::{object_to_html, to_html};

pub mod feed;
pub use feed::{activities_to_feed, Feed, Lenient};

pub mod config;
pub use config::Config;

mod error;
pub use error::{parse_as, parse_as_list, parse_mf2, Error, Result};
