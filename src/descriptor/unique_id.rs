use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters with structural meaning in the rendered form. They are
/// backslash-escaped inside segment types and values so that parsing a
/// rendered id always reproduces the original segment sequence.
const RESERVED: [char; 5] = ['\\', '[', ']', '/', ':'];

/// One `(type, value)` element of a hierarchical unique id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment {
    segment_type: String,
    value: String,
}

impl Segment {
    pub fn new(segment_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            segment_type: segment_type.into(),
            value: value.into(),
        }
    }

    pub fn segment_type(&self) -> &str {
        &self.segment_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", escape(&self.segment_type), escape(&self.value))
    }
}

/// Hierarchical identifier of a descriptor: a non-empty ordered segment
/// sequence. The first segment identifies the engine that owns the tree;
/// every descendant id is its parent's id plus exactly one segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniqueId {
    segments: Vec<Segment>,
}

impl UniqueId {
    /// Creates a single-segment id, the form every engine root carries.
    pub fn forge(segment_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::new(segment_type, value)],
        }
    }

    /// Shorthand for the conventional `[engine:<id>]` root form.
    pub fn root(engine_id: impl Into<String>) -> Self {
        Self::forge(ENGINE_SEGMENT_TYPE, engine_id)
    }

    pub fn append(&self, segment_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.append_segment(Segment::new(segment_type, value))
    }

    pub fn append_segment(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn last(&self) -> &Segment {
        // segments is non-empty by construction
        &self.segments[self.segments.len() - 1]
    }

    /// The engine id this identifier belongs to, when the leading segment
    /// uses the conventional `engine` type.
    pub fn engine_id(&self) -> Option<&str> {
        let first = &self.segments[0];
        (first.segment_type == ENGINE_SEGMENT_TYPE).then_some(first.value.as_str())
    }

    /// The id with the last segment removed; `None` for a root id.
    pub fn parent(&self) -> Option<UniqueId> {
        (self.segments.len() > 1).then(|| Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// True when `other` starts with all of this id's segments. Every id is
    /// a prefix of itself.
    pub fn is_prefix_of(&self, other: &UniqueId) -> bool {
        other.segments.len() >= self.segments.len()
            && self.segments == other.segments[..self.segments.len()]
    }
}

/// Segment type used for the leading segment of every tree.
pub const ENGINE_SEGMENT_TYPE: &str = "engine";

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseUniqueIdError {
    #[error("unique id must contain at least one segment")]
    Empty,

    #[error("segment starting at position {0} has no ':' between type and value")]
    MissingTypeSeparator(usize),

    #[error("unterminated segment starting at position {0}")]
    UnterminatedSegment(usize),

    #[error("unexpected character '{1}' at position {0}")]
    UnexpectedCharacter(usize, char),
}

impl FromStr for UniqueId {
    type Err = ParseUniqueIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.is_empty() {
            return Err(ParseUniqueIdError::Empty);
        }

        let mut chars = input.char_indices().peekable();
        let mut segments = Vec::new();

        loop {
            let start = match chars.next() {
                Some((i, '[')) => i,
                Some((i, c)) => return Err(ParseUniqueIdError::UnexpectedCharacter(i, c)),
                None => break,
            };

            let segment_type = read_part(&mut chars, start, ':')?;
            let value = read_part(&mut chars, start, ']')?;
            segments.push(Segment::new(segment_type, value));

            match chars.next() {
                None => break,
                Some((_, '/')) => continue,
                Some((i, c)) => return Err(ParseUniqueIdError::UnexpectedCharacter(i, c)),
            }
        }

        if segments.is_empty() {
            return Err(ParseUniqueIdError::Empty);
        }
        Ok(Self { segments })
    }
}

fn read_part(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    start: usize,
    delimiter: char,
) -> Result<String, ParseUniqueIdError> {
    let mut out = String::new();
    loop {
        match chars.next() {
            None => return Err(ParseUniqueIdError::UnterminatedSegment(start)),
            Some((_, c)) if c == delimiter => return Ok(out),
            Some((_, '\\')) => match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => return Err(ParseUniqueIdError::UnterminatedSegment(start)),
            },
            Some((_, ']')) if delimiter == ':' => {
                return Err(ParseUniqueIdError::MissingTypeSeparator(start))
            }
            Some((i, c)) if RESERVED.contains(&c) => {
                return Err(ParseUniqueIdError::UnexpectedCharacter(i, c))
            }
            Some((_, c)) => out.push(c),
        }
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl Serialize for UniqueId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UniqueId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rendered = String::deserialize(deserializer)?;
        rendered.parse().map_err(D::Error::custom)
    }
}
