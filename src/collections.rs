//! Frame collection and management.
//!
//! The codec itself works on plain frame lists, since a tag is defined as an ordered
//! sequence of frames. [`FrameMap`](FrameMap) is the ergonomic layer on top: an
//! insertion-ordered map from [frame keys](crate::frames::FrameBody::key) to frames,
//! which makes duplicate handling and lookup straightforward when building tags
//! programmatically.

use crate::frames::Frame;
use indexmap::map::{IntoIter, Keys};
use indexmap::IndexMap;
use std::iter::{Extend, FromIterator};
use std::ops::Index;

/// An insertion-ordered collection of frames, keyed by frame key.
///
/// ```
/// use tagweld::collections::FrameMap;
/// use tagweld::frames::Frame;
/// use tagweld::text_frame;
///
/// let mut frames = FrameMap::new();
/// frames.add(Frame::new(text_frame![b"TIT2"; "Cirrus"]));
///
/// assert_eq!(frames["TIT2"].to_string(), "Cirrus");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameMap {
    map: IndexMap<String, Frame>,
}

impl FrameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `frame` to the collection if no frame with the same key is present.
    pub fn add(&mut self, frame: Frame) {
        self.map.entry(frame.key()).or_insert(frame);
    }

    /// Inserts `frame` into the collection, replacing any frame with the same key.
    pub fn insert(&mut self, frame: Frame) {
        self.map.insert(frame.key(), frame);
    }

    pub fn get(&self, key: &str) -> Option<&Frame> {
        self.map.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Frame> {
        self.map.get_mut(key)
    }

    /// Returns every frame whose identifier matches `id`, e.g all `TXXX` frames.
    pub fn get_all(&self, id: &[u8; 4]) -> Vec<&Frame> {
        self.values().filter(|frame| frame.id() == id).collect()
    }

    pub fn remove(&mut self, key: &str) -> Option<Frame> {
        self.map.shift_remove(key)
    }

    /// Removes and returns every frame whose identifier matches `id`.
    pub fn remove_all(&mut self, id: &[u8; 4]) -> Vec<Frame> {
        let mut removed = Vec::new();

        self.map.retain(|_, frame| {
            if frame.id() == id {
                removed.push(frame.clone());
                false
            } else {
                true
            }
        });

        removed
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Returns whether any frame in the collection has the identifier `id`.
    pub fn contains_any(&self, id: &[u8; 4]) -> bool {
        self.values().any(|frame| frame.id() == id)
    }

    pub fn keys(&self) -> Keys<String, Frame> {
        self.map.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Frame> + '_ {
        self.map.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Frame)> + '_ {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear()
    }

    /// Consumes the collection into its frames, preserving insertion order.
    pub fn into_frames(self) -> Vec<Frame> {
        self.map.into_iter().map(|(_, frame)| frame).collect()
    }
}

impl Index<&str> for FrameMap {
    type Output = Frame;

    fn index(&self, key: &str) -> &Self::Output {
        &self.map[key]
    }
}

impl IntoIterator for FrameMap {
    type Item = (String, Frame);
    type IntoIter = IntoIter<String, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl Extend<Frame> for FrameMap {
    fn extend<I: IntoIterator<Item = Frame>>(&mut self, iterable: I) {
        for frame in iterable {
            self.add(frame);
        }
    }
}

impl FromIterator<Frame> for FrameMap {
    fn from_iter<I: IntoIterator<Item = Frame>>(iterable: I) -> Self {
        let mut map = Self::new();
        map.extend(iterable);
        map
    }
}

impl From<Vec<Frame>> for FrameMap {
    fn from(frames: Vec<Frame>) -> Self {
        frames.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{CommentsFrame, Language};

    fn comment(desc: &str, text: &str) -> Frame {
        Frame::new(CommentsFrame {
            lang: Language::new(b"eng").unwrap(),
            desc: String::from(desc),
            text: String::from(text),
        })
    }

    #[test]
    fn keyed_access() {
        let mut frames = FrameMap::new();

        frames.add(Frame::new(crate::text_frame![b"TIT2"; "Cirrus"]));
        frames.add(comment("", "gapless playback"));
        frames.add(comment("mix notes", "low end trimmed"));

        assert_eq!(frames.len(), 3);
        assert_eq!(frames["TIT2"].to_string(), "Cirrus");
        assert_eq!(frames["COMM::eng"].to_string(), "gapless playback");
        assert_eq!(frames["COMM:mix notes:eng"].to_string(), "low end trimmed");
    }

    #[test]
    fn add_keeps_first() {
        let mut frames = FrameMap::new();

        frames.add(comment("", "first"));
        frames.add(comment("", "second"));

        assert_eq!(frames.len(), 1);
        assert_eq!(frames["COMM::eng"].to_string(), "first");

        frames.insert(comment("", "second"));
        assert_eq!(frames["COMM::eng"].to_string(), "second");
    }

    #[test]
    fn id_queries() {
        let mut frames = FrameMap::new();

        frames.add(comment("a", "one"));
        frames.add(comment("b", "two"));
        frames.add(Frame::new(crate::text_frame![b"TIT2"; "Cirrus"]));

        assert!(frames.contains_any(b"COMM"));
        assert_eq!(frames.get_all(b"COMM").len(), 2);

        let removed = frames.remove_all(b"COMM");
        assert_eq!(removed.len(), 2);
        assert!(!frames.contains_any(b"COMM"));
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn order_preserved() {
        let mut frames = FrameMap::new();

        frames.add(Frame::new(crate::text_frame![b"TPE1"; "Boards of Canada"]));
        frames.add(Frame::new(crate::text_frame![b"TIT2"; "Cirrus"]));
        frames.add(comment("", "Tomorrow's Harvest"));

        let keys: Vec<&str> = frames.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["TPE1", "TIT2", "COMM::eng"]);

        let ids: Vec<_> = frames
            .into_frames()
            .into_iter()
            .map(|frame| frame.id())
            .collect();
        assert_eq!(ids, [b"TPE1", b"TIT2", b"COMM"]);
    }
}
