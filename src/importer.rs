/// Type definitions for the ChatGPT data export (`conversations.json`).
///
/// The export is a JSON array of conversations. Each conversation stores its
/// messages as a tree flattened into `mapping`, an object keyed by node id:
///
/// ```json
/// {
///   "title": "Trip planning",
///   "create_time": 1700000000.123,
///   "update_time": 1700000500.456,
///   "mapping": {
///     "aaa1": { "message": null, "parent": null, "children": ["aaa2"] },
///     "aaa2": {
///       "message": {
///         "author": { "role": "user" },
///         "create_time": 1700000001.0,
///         "content": { "content_type": "text", "parts": ["Hello"] },
///         "metadata": {}
///       }
///     }
///   }
/// }
/// ```
///
/// The export format is undocumented and drifts between versions, so every
/// field below is optional and a value of the wrong JSON type is read as
/// absent instead of failing the whole document.
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Prefix carried by both asset pointers and on-disk image file names.
pub const FILE_PREFIX: &str = "file-";

// ---------------------------------------------------------------------------
// Lenient field helpers
// ---------------------------------------------------------------------------

/// Deserialize any JSON value, keeping it only if it converts to `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize a raw JSON value, mapping `null` to `None`.
fn raw<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok((!value.is_null()).then_some(value))
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// One conversation of the export.
#[derive(Debug, Default, Deserialize)]
pub struct Conversation {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,

    /// Seconds since the epoch as a float. Kept as raw JSON so it can be
    /// written back exactly as it was read.
    #[serde(default, deserialize_with = "raw")]
    pub create_time: Option<Value>,

    #[serde(default, deserialize_with = "raw")]
    pub update_time: Option<Value>,

    /// Nodes in document order. The export stores them in a JSON object,
    /// which is read entry by entry so the original key order survives.
    #[serde(default, deserialize_with = "ordered_nodes")]
    pub mapping: Vec<(String, Node)>,
}

fn ordered_nodes<'de, D>(deserializer: D) -> Result<Vec<(String, Node)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct NodesVisitor;

    impl<'de> Visitor<'de> for NodesVisitor {
        type Value = Vec<(String, Node)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object mapping node ids to nodes")
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut nodes = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((id, value)) = map.next_entry::<String, Value>()? {
                // A node that is not an object carries nothing we can use.
                let node = serde_json::from_value(value).unwrap_or_default();
                nodes.push((id, node));
            }
            Ok(nodes)
        }
    }

    deserializer.deserialize_any(NodesVisitor)
}

// ---------------------------------------------------------------------------
// Nodes and messages
// ---------------------------------------------------------------------------

/// A node of the conversation tree. Structural nodes (the root, system
/// placeholders) have no message.
#[derive(Debug, Default, Deserialize)]
pub struct Node {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<Message>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Author>,

    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<Content>,

    #[serde(default, deserialize_with = "lenient")]
    pub metadata: Option<Metadata>,

    #[serde(default, deserialize_with = "raw")]
    pub create_time: Option<Value>,
}

impl Message {
    /// Author role, `"unknown"` when the export omits it.
    pub fn role(&self) -> &str {
        self.author
            .as_ref()
            .and_then(|a| a.role.as_deref())
            .unwrap_or("unknown")
    }

    /// The model that produced this message, if recorded.
    pub fn model_slug(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(Metadata::model)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "lenient")]
    pub model_slug: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub default_model_slug: Option<String>,
}

impl Metadata {
    /// `model_slug`, falling back to `default_model_slug`. Empty strings count as unset.
    pub fn model(&self) -> Option<&str> {
        [&self.model_slug, &self.default_model_slug]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .find(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct Content {
    #[serde(default, deserialize_with = "lenient")]
    pub content_type: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub parts: Option<Vec<Part>>,
}

/// A single entry of `content.parts`.
///
/// Plain strings are text. Objects with an `asset_pointer` are attachments
/// (images uploaded by the user or generated by DALL·E). Everything else
/// (audio transcriptions, tool payloads, …) is kept as `Other` and ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    Attachment(AttachmentRef),
    Other,
}

impl<'de> Deserialize<'de> for Part {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;

        match value {
            Value::String(text) => Ok(Self::Text(text)),
            Value::Object(obj) => {
                let Some(pointer) = obj.get("asset_pointer").and_then(Value::as_str) else {
                    return Ok(Self::Other);
                };
                Ok(Self::Attachment(AttachmentRef {
                    asset_pointer: pointer.to_owned(),
                    mime_type: obj
                        .get("mime_type")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                }))
            }
            _ => Ok(Self::Other),
        }
    }
}

/// Reference to an attachment's backing file, e.g.
/// `{"asset_pointer": "file-service://file-AbC123", "mime_type": "image/png"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub asset_pointer: String,
    pub mime_type: Option<String>,
}

impl AttachmentRef {
    /// Last `/`-separated segment of the pointer, used as the file's display name.
    pub fn basename(&self) -> &str {
        self.asset_pointer
            .rsplit('/')
            .next()
            .unwrap_or(&self.asset_pointer)
    }
}
