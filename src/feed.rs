//! media-RSS feeds listing the playable items of an episode.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// namespace of the `media:` elements.
pub const MEDIA_RSS_NS: &[u8] = b"http://search.yahoo.com/mrss/";

/// the parts of a feed `<item>` the catalog clients use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub guid: Option<String>,
    pub title: Option<String>,
    /// `media:group/media:title`
    pub media_title: Option<String>,
    /// `url` of the first `media:group/media:content`
    pub content_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tag {
    media: bool,
    name: Vec<u8>,
}

impl Tag {
    fn is(&self, media: bool, name: &[u8]) -> bool {
        self.media == media && self.name == name
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Guid,
    Title,
    MediaTitle,
}

/// which item field the text under `path` belongs to.
fn field_at(path: &[Tag]) -> Option<Field> {
    match path {
        [tag] if tag.is(false, b"guid") => Some(Field::Guid),
        [tag] if tag.is(false, b"title") => Some(Field::Title),
        [group, tag] if group.is(true, b"group") && tag.is(true, b"title") => {
            Some(Field::MediaTitle)
        }
        _ => None,
    }
}

/// parses every `<item>` of a feed, at any depth, in document order.
pub fn parse_media_feed(xml: &str) -> quick_xml::Result<Vec<FeedItem>> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut buf = Vec::new();
    let mut current: Option<FeedItem> = None;
    // elements opened inside the current item
    let mut path: Vec<Tag> = Vec::new();

    loop {
        let (ns, event) = reader.read_resolved_event_into(&mut buf)?;
        let media = matches!(ns, ResolveResult::Bound(Namespace(n)) if n == MEDIA_RSS_NS);

        match event {
            Event::Start(ref e) => {
                let name = e.local_name().as_ref().to_vec();

                if let Some(item) = current.as_mut() {
                    read_content_url(item, &path, media, e)?;
                    path.push(Tag { media, name });
                } else if !media && name == b"item" {
                    current = Some(FeedItem::default());
                    path.clear();
                }
            }
            Event::Empty(ref e) => {
                if let Some(item) = current.as_mut() {
                    read_content_url(item, &path, media, e)?;
                }
            }
            Event::End(_) => {
                if current.is_some() && path.pop().is_none() {
                    items.extend(current.take());
                }
            }
            Event::Text(ref e) => {
                if let Some(item) = current.as_mut() {
                    let text = e.unescape()?;
                    push_text(item, &path, &text);
                }
            }
            Event::CData(e) => {
                if let Some(item) = current.as_mut() {
                    let text = e.into_inner();
                    push_text(item, &path, &String::from_utf8_lossy(&text));
                }
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    Ok(items)
}

fn read_content_url(
    item: &mut FeedItem,
    path: &[Tag],
    media: bool,
    element: &BytesStart<'_>,
) -> quick_xml::Result<()> {
    let in_group = matches!(path, [group] if group.is(true, b"group"));
    if !in_group || !media || element.local_name().as_ref() != b"content" {
        return Ok(());
    }

    if item.content_url.is_none()
        && let Some(url) = element.try_get_attribute("url")?
    {
        item.content_url = Some(url.unescape_value()?.into_owned());
    }

    Ok(())
}

fn push_text(item: &mut FeedItem, path: &[Tag], text: &str) {
    let slot = match field_at(path) {
        Some(Field::Guid) => &mut item.guid,
        Some(Field::Title) => &mut item.title,
        Some(Field::MediaTitle) => &mut item.media_title,
        None => return,
    };

    slot.get_or_insert_with(String::new).push_str(text);
}
