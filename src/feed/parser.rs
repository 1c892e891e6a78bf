use crate::feed::FeedError;
use quick_xml::events::Event;
use quick_xml::Reader;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// An `<item>` that carried a usable title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    /// Title text with surrounding whitespace removed. Never empty.
    pub title: String,
}

/// Turns fetched feed bytes into raw items.
pub trait ParseFeed: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RawItem>, FeedError>;
}

/// RSS 2.0 parser over `quick-xml` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct RssParser;

impl ParseFeed for RssParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RawItem>, FeedError> {
        parse_rss(bytes)
    }
}

/// Parses an RSS document and returns its titled items in document order.
///
/// Only the layout `<root><channel><item><title>` is considered: the first
/// `channel` directly under the root element, its direct `item` children,
/// and the first direct `title` of each item. Text and CDATA inside the
/// title up to its first child element are concatenated and trimmed. Text is
/// decoded using the encoding named in the XML declaration. Items with no
/// title or a blank one are skipped.
///
/// # Errors
///
/// - [`FeedError::Parse`] - The document is not well-formed: mismatched or
///   unclosed tags, no root element, content after the root element, or
///   an unrecognized entity inside a title
/// - [`FeedError::MissingChannel`] - The root element has no `channel` child
///
/// # Security
///
/// SEC-002: `quick-xml` (0.37) never expands `<!ENTITY>` declarations. Custom
/// entities in a title fail `unescape()` and surface as a parse error.
pub fn parse_rss(bytes: &[u8]) -> Result<Vec<RawItem>, FeedError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut walker = FeedWalker::default();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| FeedError::Parse(format!("{} (at byte {})", e, reader.buffer_position())))?;

        match event {
            Event::Start(e) => walker.open(e.name().as_ref())?,
            Event::Empty(e) => {
                walker.open(e.name().as_ref())?;
                walker.close();
            }
            Event::End(_) => walker.close(),
            Event::Text(e) => {
                if walker.at_top_level() {
                    if !e.iter().all(u8::is_ascii_whitespace) {
                        return Err(junk(&reader));
                    }
                } else if walker.wants_text() {
                    let text = e
                        .unescape()
                        .map_err(|e| FeedError::Parse(e.to_string()))?;
                    walker.push_text(&text);
                }
            }
            Event::CData(e) => {
                if walker.at_top_level() {
                    return Err(junk(&reader));
                }
                if walker.wants_text() {
                    let text = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|e| FeedError::Parse(e.to_string()))?;
                    walker.push_text(&text);
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
        buf.clear();
    }

    walker.finish()
}

fn junk(reader: &Reader<&[u8]>) -> FeedError {
    FeedError::Parse(format!(
        "content outside the document element (at byte {})",
        reader.buffer_position()
    ))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum ChannelState {
    #[default]
    NotSeen,
    Open,
    Closed,
}

#[derive(Debug, Default)]
struct ItemState {
    title: Option<String>,
    in_title: bool,
}

/// Tracks where the reader is relative to `root > channel > item > title`.
///
/// `depth` counts currently open elements, so the root opens at depth 0,
/// the channel at 1, items at 2 and titles at 3.
#[derive(Debug, Default)]
struct FeedWalker {
    depth: usize,
    seen_root: bool,
    channel: ChannelState,
    item: Option<ItemState>,
    items: Vec<RawItem>,
}

impl FeedWalker {
    fn open(&mut self, name: &[u8]) -> Result<(), FeedError> {
        match self.depth {
            0 if self.seen_root => {
                return Err(FeedError::Parse(
                    "junk after document element".to_string(),
                ))
            }
            0 => self.seen_root = true,
            1 if name == b"channel" && self.channel == ChannelState::NotSeen => {
                self.channel = ChannelState::Open;
            }
            2 if name == b"item" && self.channel == ChannelState::Open => {
                self.item = Some(ItemState::default());
            }
            3 if name == b"title" => {
                if let Some(item) = self.item.as_mut() {
                    if item.title.is_none() {
                        item.title = Some(String::new());
                        item.in_title = true;
                    }
                }
            }
            // A child element ends the title's leading text
            4 => {
                if let Some(item) = self.item.as_mut() {
                    item.in_title = false;
                }
            }
            _ => {}
        }
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self) {
        // Unbalanced end tags are rejected by the reader before they get here
        self.depth = self.depth.saturating_sub(1);
        match self.depth {
            3 => {
                if let Some(item) = self.item.as_mut() {
                    item.in_title = false;
                }
            }
            2 => {
                if let Some(item) = self.item.take() {
                    if let Some(title) = item.title {
                        let trimmed = title.trim();
                        if !trimmed.is_empty() {
                            self.items.push(RawItem {
                                title: trimmed.to_string(),
                            });
                        }
                    }
                }
            }
            1 if self.channel == ChannelState::Open => self.channel = ChannelState::Closed,
            _ => {}
        }
    }

    fn at_top_level(&self) -> bool {
        self.depth == 0
    }

    /// True only for text directly inside an item's first title.
    fn wants_text(&self) -> bool {
        self.depth == 4 && self.item.as_ref().is_some_and(|item| item.in_title)
    }

    fn push_text(&mut self, text: &str) {
        if let Some(title) = self.item.as_mut().and_then(|item| item.title.as_mut()) {
            title.push_str(text);
        }
    }

    fn finish(self) -> Result<Vec<RawItem>, FeedError> {
        if self.depth > 0 {
            return Err(FeedError::Parse(format!(
                "unclosed element at end of document ({} still open)",
                self.depth
            )));
        }
        if !self.seen_root {
            return Err(FeedError::Parse("no element found".to_string()));
        }
        if self.channel == ChannelState::NotSeen {
            return Err(FeedError::MissingChannel);
        }
        Ok(self.items)
    }
}
