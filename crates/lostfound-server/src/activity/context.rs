//! Per-request view consumed by the activity logger

use std::borrow::Cow;
use std::net::{IpAddr, SocketAddr};

use axum::extract::ConnectInfo;
use http::{header, request::Parts, HeaderMap, Method};
use serde_json::Value as JsonValue;

use super::models::FieldMap;
use crate::auth::AuthenticatedUser;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Request attributes the logger needs, detached from the request body.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    path: String,
    headers: HeaderMap,
    fields: FieldMap,
    client_ip: Option<IpAddr>,
    identity: Option<AuthenticatedUser>,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            fields: FieldMap::new(),
            client_ip: None,
            identity: None,
        }
    }

    /// Build a context from request parts.
    ///
    /// Query parameters become the initial fields; body fields are merged in
    /// later with [`RequestContext::merge_body_fields`]. The client address is
    /// taken from the first `X-Forwarded-For` hop when `trust_forwarded_for`
    /// is set and that hop parses, otherwise from the peer address.
    pub fn from_parts(parts: &Parts, trust_forwarded_for: bool) -> Self {
        let forwarded = if trust_forwarded_for {
            forwarded_client(&parts.headers)
        } else {
            None
        };
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            headers: parts.headers.clone(),
            fields: query_fields(parts.uri.query()),
            client_ip: forwarded.or(peer),
            identity: parts.extensions.get::<AuthenticatedUser>().copied(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    pub fn with_identity(mut self, user: AuthenticatedUser) -> Self {
        self.identity = Some(user);
        self
    }

    /// Put body fields first, keeping query parameters the body did not name.
    pub fn merge_body_fields(&mut self, body: FieldMap) {
        let query = std::mem::replace(&mut self.fields, body);
        for (name, value) in query {
            if !self.fields.contains_key(&name) {
                self.fields.insert(name, value);
            }
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn client_ip(&self) -> Option<IpAddr> {
        self.client_ip
    }

    pub fn identity(&self) -> Option<AuthenticatedUser> {
        self.identity
    }

    /// `User-Agent` as sent; bytes outside UTF-8 become U+FFFD.
    pub fn user_agent(&self) -> Option<Cow<'_, str>> {
        self.headers
            .get(header::USER_AGENT)
            .map(|value| String::from_utf8_lossy(value.as_bytes()))
    }
}

/// Body encodings whose fields are captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
}

impl BodyKind {
    /// Classify a request by its `Content-Type`; `None` means leave the body alone.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json" || essence.ends_with("+json") {
            Some(Self::Json)
        } else if essence == "application/x-www-form-urlencoded" {
            Some(Self::Form)
        } else {
            None
        }
    }

    /// Extract top-level fields. Bodies that do not decode to an object yield none.
    pub fn parse_fields(self, body: &[u8]) -> FieldMap {
        match self {
            Self::Json => match serde_json::from_slice::<JsonValue>(body) {
                Ok(JsonValue::Object(map)) => map,
                _ => FieldMap::new(),
            },
            Self::Form => form_fields(body),
        }
    }
}

/// Query string parameters, decoded like form bodies
pub fn query_fields(query: Option<&str>) -> FieldMap {
    query.map(|q| form_fields(q.as_bytes())).unwrap_or_default()
}

/// Decode `application/x-www-form-urlencoded` input with bracket nesting.
///
/// `tags[]=a&tags[]=b` gives `{"tags":["a","b"]}` and `item[name]=x` gives
/// `{"item":{"name":"x"}}`. A plain name sent twice keeps its first position
/// and its last value. Names that start with `[` are dropped.
fn form_fields(input: &[u8]) -> FieldMap {
    let mut tree = FormTree::default();
    for (name, value) in url::form_urlencoded::parse(input) {
        if let Some(path) = key_path(&name) {
            tree.insert(&path, value.into_owned());
        }
    }
    tree.entries
        .into_iter()
        .map(|(name, node)| (name, node.into_json()))
        .collect()
}

/// Split `a[b][]` into `[Some("a"), Some("b"), None]`; `None` appends.
fn key_path(name: &str) -> Option<Vec<Option<String>>> {
    let (base, mut rest) = match name.find('[') {
        // an unclosed bracket makes the whole name literal
        Some(open) if name[open..].contains(']') => name.split_at(open),
        _ => (name, ""),
    };
    if base.is_empty() {
        return None;
    }

    let mut path = vec![Some(base.to_string())];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        let segment = &inner[..close];
        path.push((!segment.is_empty()).then(|| segment.to_string()));
        rest = &inner[close + 1..];
    }
    Some(path)
}

/// Ordered key/value tree; keys `0..n` in order serialize as a JSON array.
#[derive(Debug, Default)]
struct FormTree {
    entries: Vec<(String, FormNode)>,
    next_index: u64,
}

#[derive(Debug)]
enum FormNode {
    Value(String),
    Tree(FormTree),
}

impl FormTree {
    fn insert(&mut self, path: &[Option<String>], value: String) {
        let Some((segment, rest)) = path.split_first() else {
            return;
        };
        let key = match segment {
            Some(key) => key.clone(),
            None => self.next_index.to_string(),
        };
        if let Ok(index) = key.parse::<u64>() {
            if index.to_string() == key {
                self.next_index = self.next_index.max(index.saturating_add(1));
            }
        }

        let position = match self.entries.iter().position(|(name, _)| *name == key) {
            Some(position) => position,
            None => {
                self.entries.push((key, FormNode::Value(String::new())));
                self.entries.len() - 1
            },
        };
        let node = &mut self.entries[position].1;

        if rest.is_empty() {
            *node = FormNode::Value(value);
            return;
        }
        if !matches!(node, FormNode::Tree(_)) {
            *node = FormNode::Tree(FormTree::default());
        }
        if let FormNode::Tree(tree) = node {
            tree.insert(rest, value);
        }
    }

    fn into_json(self) -> JsonValue {
        let is_list = self
            .entries
            .iter()
            .enumerate()
            .all(|(index, (name, _))| *name == index.to_string());

        if is_list {
            JsonValue::Array(self.entries.into_iter().map(|(_, node)| node.into_json()).collect())
        } else {
            JsonValue::Object(
                self.entries
                    .into_iter()
                    .map(|(name, node)| (name, node.into_json()))
                    .collect(),
            )
        }
    }
}

impl FormNode {
    fn into_json(self) -> JsonValue {
        match self {
            Self::Value(value) => JsonValue::String(value),
            Self::Tree(tree) => tree.into_json(),
        }
    }
}

fn forwarded_client(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}
