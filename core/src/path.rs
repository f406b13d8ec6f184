//! Dotted path addressing over `serde_json::Value` trees.
//!
//! Parses paths like `tags.0`, `manufacturer.name` or `rows[2].amount` into
//! a [`FieldPath`] and resolves, writes and removes values at that location.
//! A segment that reads as a non-negative integer addresses an array index,
//! anything else a mapping key. The empty path addresses the root.
//!
//! Writes coerce: when an intermediate value cannot hold the next segment it
//! is replaced by a fresh container of the right kind, and a warning is
//! logged. [`try_set`] reports the collision instead.

use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::FormError;

/// How many `null` slots a single write may pad onto the end of an array.
pub const MAX_INDEX_GAP: usize = 1024;


/// A single step within a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key, e.g. `name`
    Key(String),
    /// Array index, e.g. `3`
    Index(usize),
}

impl Segment {
    /// Classify a raw segment. Only canonical decimal integers (`0`, `17`,
    /// never `007` or `-1`) become indices.
    pub fn parse(raw: &str) -> Segment {
        let canonical = !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit())
            && (raw == "0" || !raw.starts_with('0'));
        if canonical {
            if let Ok(index) = raw.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(raw.to_string())
    }

    /// The mapping key this segment uses when the container is a mapping.
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Segment::Key(k) => Cow::Borrowed(k),
            Segment::Index(i) => Cow::Owned(i.to_string()),
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Key(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}


/// A parsed path. Parsing never fails: any string is a valid path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path, addressing the whole tree.
    pub fn root() -> Self {
        FieldPath { segments: Vec::new() }
    }

    /// Parse `a.b.3.c` or `a.b[3].c`.
    pub fn parse(input: &str) -> Self {
        let mut segments = Vec::new();
        if input.is_empty() {
            return FieldPath { segments };
        }
        for part in input.split('.') {
            push_part(part, &mut segments);
        }
        FieldPath { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// This path extended by one segment.
    pub fn child(&self, segment: Segment) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.push(segment);
        FieldPath { segments }
    }

    /// Read the value at this path, `None` when nothing is stored there.
    pub fn resolve<'a>(&self, tree: &'a Value) -> Option<&'a Value> {
        let mut node = tree;
        for seg in &self.segments {
            node = step(node, seg)?;
        }
        Some(node)
    }

    pub fn resolve_mut<'a>(&self, tree: &'a mut Value) -> Option<&'a mut Value> {
        let mut node = tree;
        for seg in &self.segments {
            node = step_mut(node, seg)?;
        }
        Some(node)
    }

    /// Write `value` at this path, creating and coercing containers on the
    /// way. Array slots skipped over are filled with `null`. A write whose
    /// index lies more than [`MAX_INDEX_GAP`] past the end of its array is
    /// dropped with a warning and leaves the tree untouched.
    pub fn assign(&self, tree: &mut Value, value: Value) {
        if let Some((seg, Blocked::Gap { len, .. })) = self.obstacle(tree, false) {
            warn!(path = %self, segment = %seg, len, "index too far past the end of the list, write dropped");
            return;
        }
        let mut node = tree;
        for seg in &self.segments {
            node = slot(node, seg);
        }
        *node = value;
    }

    /// Like [`assign`](Self::assign) but refuses to replace a non-null
    /// scalar, or an array addressed by key, on the way down, and reports
    /// an index too far past the end of its array. On error the tree is
    /// left as it was.
    pub fn try_assign(&self, tree: &mut Value, value: Value) -> Result<(), FormError> {
        match self.obstacle(tree, true) {
            Some((seg, Blocked::Kind(found))) => Err(FormError::PathCollision {
                path: self.to_string(),
                segment: seg.to_string(),
                found,
            }),
            Some((_, Blocked::Gap { index, len })) => Err(FormError::IndexOutOfRange {
                path: self.to_string(),
                index,
                len,
            }),
            None => {
                self.assign(tree, value);
                Ok(())
            }
        }
    }

    /// First segment a write would stop at, found without touching the
    /// tree. Kind collisions only count when `strict`; otherwise the node
    /// is coerced and everything below it starts out empty.
    fn obstacle(&self, tree: &Value, strict: bool) -> Option<(&Segment, Blocked)> {
        let mut node = Some(tree).filter(|n| !n.is_null());
        for seg in &self.segments {
            let fits = matches!(
                (node, seg),
                (Some(Value::Object(_)), _) | (Some(Value::Array(_)), Segment::Index(_))
            );
            if let (Some(found), false, true) = (node, fits, strict) {
                return Some((seg, Blocked::Kind(kind_name(found))));
            }
            if let Segment::Index(index) = seg {
                if !matches!(node, Some(Value::Object(_))) {
                    let len = node.and_then(Value::as_array).map_or(0, Vec::len);
                    if index.saturating_sub(len) > MAX_INDEX_GAP {
                        return Some((seg, Blocked::Gap { index: *index, len }));
                    }
                }
            }
            node = node
                .filter(|_| fits)
                .and_then(|n| step(n, seg))
                .filter(|n| !n.is_null());
        }
        None
    }

    /// Remove the value at this path and return it.
    ///
    /// Mapping entries are deleted. Array elements are replaced by `null`
    /// so that the indices of their siblings stay put. Removing the root
    /// empties the tree but keeps its container kind.
    pub fn remove(&self, tree: &mut Value) -> Option<Value> {
        let Some((last, parents)) = self.segments.split_last() else {
            let empty = empty_like(tree);
            return Some(std::mem::replace(tree, empty));
        };
        let mut node = tree;
        for seg in parents {
            node = step_mut(node, seg)?;
        }
        match node {
            Value::Object(map) => map.remove(last.key().as_ref()),
            Value::Array(items) => items.get_mut(last.as_index()?).map(std::mem::take),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    fn from(input: &str) -> Self {
        FieldPath::parse(input)
    }
}


// ---------------------------------------------------------------------------
// Tree-level contract: get / has / set / unset
// ---------------------------------------------------------------------------

/// Value at `path`, `None` when absent. A stored `null` is `Some(Value::Null)`.
pub fn get<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    FieldPath::parse(path).resolve(tree)
}

/// True when anything, including `null`, is stored at `path`.
pub fn has(tree: &Value, path: &str) -> bool {
    get(tree, path).is_some()
}

/// New tree with `value` written at `path`. The input tree is untouched.
pub fn set(tree: &Value, path: &str, value: Value) -> Value {
    let mut next = tree.clone();
    FieldPath::parse(path).assign(&mut next, value);
    next
}

/// Fail-fast [`set`]: errors instead of overwriting a colliding value.
pub fn try_set(tree: &Value, path: &str, value: Value) -> Result<Value, FormError> {
    let mut next = tree.clone();
    FieldPath::parse(path).try_assign(&mut next, value)?;
    Ok(next)
}

/// New tree with `path` removed. The input tree is untouched.
pub fn unset(tree: &Value, path: &str) -> Value {
    let mut next = tree.clone();
    FieldPath::parse(path).remove(&mut next);
    next
}

/// An empty container of the same kind as `value`: `[]` for arrays, `{}`
/// for everything else.
pub fn empty_like(value: &Value) -> Value {
    match value {
        Value::Array(_) => Value::Array(Vec::new()),
        _ => Value::Object(Map::new()),
    }
}

/// Short type name used in logs and errors.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}


// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

fn push_part(part: &str, out: &mut Vec<Segment>) {
    let Some(open) = part.find('[') else {
        out.push(Segment::parse(part));
        return;
    };
    if open > 0 {
        out.push(Segment::parse(&part[..open]));
    }
    let mut rest = &part[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        match inner.find(']') {
            Some(close) => {
                out.push(Segment::parse(&inner[..close]));
                rest = &inner[close + 1..];
            }
            None => {
                out.push(Segment::parse(inner));
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        out.push(Segment::parse(rest));
    }
}

fn step<'a>(node: &'a Value, seg: &Segment) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(seg.key().as_ref()),
        Value::Array(items) => items.get(seg.as_index()?),
        _ => None,
    }
}

fn step_mut<'a>(node: &'a mut Value, seg: &Segment) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(seg.key().as_ref()),
        Value::Array(items) => items.get_mut(seg.as_index()?),
        _ => None,
    }
}

fn container_for(seg: &Segment) -> Value {
    match seg {
        Segment::Index(_) => Value::Array(Vec::new()),
        Segment::Key(_) => Value::Object(Map::new()),
    }
}

/// Why a write cannot go through.
enum Blocked {
    /// A non-null value of this kind sits where a container is needed.
    Kind(&'static str),
    /// The index would pad the array by more than [`MAX_INDEX_GAP`].
    Gap { index: usize, len: usize },
}

/// Child slot of `node` for `seg`, creating it (as `null`) when missing.
fn slot<'a>(node: &'a mut Value, seg: &Segment) -> &'a mut Value {
    let fits = matches!(
        (&*node, seg),
        (Value::Object(_), _) | (Value::Array(_), Segment::Index(_))
    );
    if !fits {
        if !node.is_null() {
            warn!(segment = %seg, found = kind_name(node), "overwriting value to make room for path segment");
        }
        *node = container_for(seg);
    }
    match node {
        Value::Array(items) => {
            let index = seg.as_index().unwrap_or(items.len());
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[index]
        }
        Value::Object(map) => map.entry(seg.key().into_owned()).or_insert(Value::Null),
        // coerced above
        other => other,
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
