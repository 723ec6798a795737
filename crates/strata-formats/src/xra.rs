//! XRA: the native XML serialization of the annotation model.
//!
//! XRA is the reference round-trip format — the only one whose capability
//! vector is complete. The schema mirrors the model one-to-one:
//!
//! ```xml
//! <Document format="1.0" id="...">
//!   <Metadata><Entry key="created">2024-01-01</Entry></Metadata>
//!   <Media id="m1" url="talk.wav" mimetype="audio/x-wav"/>
//!   <Vocabulary id="v0" name="Tones" description="...">
//!     <Entry type="str" description="high">H</Entry>
//!   </Vocabulary>
//!   <Tier id="t1" name="Tokens" vocab="Tones" media="m1">
//!     <Annotation id="a1">
//!       <Location>
//!         <Interval score="0.9">
//!           <Begin midpoint="0.0" radius="0.005"/>
//!           <End midpoint="1.0"/>
//!         </Interval>
//!       </Location>
//!       <Label key="k1">
//!         <Tag type="str" score="0.8">hello</Tag>
//!       </Label>
//!     </Annotation>
//!   </Tier>
//!   <Hierarchy>
//!     <Link type="TimeAlignment" parent="t1" child="t2"/>
//!   </Hierarchy>
//! </Document>
//! ```
//!
//! Point annotations use an empty `<Point midpoint=".." radius=".."/>`
//! element; disjoint ones wrap several `<Interval>` children in a
//! `<Disjoint>`. Every identifier is carried as an `id` attribute, so the
//! `Metadata` blocks never repeat it.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use strata_core::{
    Annotation, CtrlVocab, Label, LinkType, Localization, Location, Media, Metadata, Tag,
    Tier, TimeDisjoint, TimeInterval, TimePoint, Transcription,
};

use crate::adapter::FormatAdapter;
use crate::caps::Capabilities;
use crate::errors::{FormatError, Result};

/// Adapter for the native XRA format.
#[derive(Debug, Clone, Copy, Default)]
pub struct XraAdapter;

impl FormatAdapter for XraAdapter {
    fn name(&self) -> &'static str {
        "XraAdapter"
    }

    fn software(&self) -> &'static str {
        "strata"
    }

    fn default_extension(&self) -> &'static str {
        "xra"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::FULL
    }

    fn read(&self, path: &Path) -> Result<Transcription> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|e| FormatError::Encoding {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        parse_document(&content, path)
    }

    fn write(&self, path: &Path, trs: &Transcription) -> Result<()> {
        let mut buffer = Vec::new();
        let mut writer = Writer::new_with_indent(&mut buffer, b' ', 2);
        write_document(&mut writer, trs).map_err(|e| FormatError::Encoding {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        fs::write(path, buffer)?;
        Ok(())
    }

    fn detect(&self, path: &Path) -> bool {
        match fs::read(path) {
            Ok(bytes) => {
                let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
                head.contains("<Document")
            }
            Err(_) => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Writer
// ─────────────────────────────────────────────────────────────────────────────

type XmlResult = std::io::Result<()>;

fn write_document(writer: &mut Writer<&mut Vec<u8>>, trs: &Transcription) -> XmlResult {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("Document");
    root.push_attribute(("format", "1.0"));
    root.push_attribute(("id", trs.id()));
    if let Some(name) = trs.name() {
        root.push_attribute(("name", name));
    }
    writer.write_event(Event::Start(root))?;

    write_metadata(writer, trs.meta())?;

    // media: the document list first, then tier-attached ones not in it
    let mut media: Vec<&Media> = trs.media().iter().collect();
    for tier in trs.iter() {
        if let Some(m) = tier.media() {
            if !media.iter().any(|x| x.id() == m.id()) {
                media.push(m);
            }
        }
    }
    for m in &media {
        let mut e = BytesStart::new("Media");
        e.push_attribute(("id", m.id()));
        e.push_attribute(("url", m.url()));
        e.push_attribute(("mimetype", m.mime_type()));
        writer.write_event(Event::Empty(e))?;
    }

    // vocabularies, deduplicated by name
    let mut vocabs: Vec<&CtrlVocab> = trs.vocabs().iter().collect();
    for tier in trs.iter() {
        if let Some(v) = tier.ctrl_vocab() {
            if !vocabs.iter().any(|x| x.name() == v.name()) {
                vocabs.push(v);
            }
        }
    }
    for v in &vocabs {
        write_vocabulary(writer, v)?;
    }

    for tier in trs.iter() {
        write_tier(writer, tier)?;
    }

    if !trs.hierarchy().is_empty() {
        writer.write_event(Event::Start(BytesStart::new("Hierarchy")))?;
        for link in trs.hierarchy().links() {
            let mut e = BytesStart::new("Link");
            e.push_attribute(("type", link.link_type.to_string().as_str()));
            e.push_attribute(("parent", link.parent_id.as_str()));
            e.push_attribute(("child", link.child_id.as_str()));
            writer.write_event(Event::Empty(e))?;
        }
        writer.write_event(Event::End(BytesStart::new("Hierarchy").to_end()))?;
    }

    writer.write_event(Event::End(BytesStart::new("Document").to_end()))?;
    Ok(())
}

fn write_metadata(writer: &mut Writer<&mut Vec<u8>>, meta: &Metadata) -> XmlResult {
    if meta.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("Metadata")))?;
    for (key, value) in meta.iter() {
        if key == "id" {
            continue;
        }
        let mut e = BytesStart::new("Entry");
        e.push_attribute(("key", key));
        writer.write_event(Event::Start(e))?;
        writer.write_event(Event::Text(BytesText::new(value)))?;
        writer.write_event(Event::End(BytesStart::new("Entry").to_end()))?;
    }
    writer.write_event(Event::End(BytesStart::new("Metadata").to_end()))?;
    Ok(())
}

fn write_vocabulary(writer: &mut Writer<&mut Vec<u8>>, vocab: &CtrlVocab) -> XmlResult {
    let mut e = BytesStart::new("Vocabulary");
    e.push_attribute(("id", vocab.id()));
    e.push_attribute(("name", vocab.name()));
    if !vocab.description().is_empty() {
        e.push_attribute(("description", vocab.description()));
    }
    writer.write_event(Event::Start(e))?;
    for (tag, description) in vocab.iter() {
        let mut e = BytesStart::new("Entry");
        e.push_attribute(("type", tag.type_name()));
        if !description.is_empty() {
            e.push_attribute(("description", description));
        }
        writer.write_event(Event::Start(e))?;
        writer.write_event(Event::Text(BytesText::new(&tag.content())))?;
        writer.write_event(Event::End(BytesStart::new("Entry").to_end()))?;
    }
    writer.write_event(Event::End(BytesStart::new("Vocabulary").to_end()))?;
    Ok(())
}

fn write_tier(writer: &mut Writer<&mut Vec<u8>>, tier: &Tier) -> XmlResult {
    let mut e = BytesStart::new("Tier");
    e.push_attribute(("id", tier.id()));
    e.push_attribute(("name", tier.name()));
    if let Some(v) = tier.ctrl_vocab() {
        e.push_attribute(("vocab", v.name()));
    }
    if let Some(m) = tier.media() {
        e.push_attribute(("media", m.id()));
    }
    if tier.allows_overlaps() {
        e.push_attribute(("overlaps", "true"));
    }
    writer.write_event(Event::Start(e))?;
    write_metadata(writer, tier.meta())?;
    for ann in tier.iter() {
        write_annotation(writer, ann)?;
    }
    writer.write_event(Event::End(BytesStart::new("Tier").to_end()))?;
    Ok(())
}

fn write_annotation(writer: &mut Writer<&mut Vec<u8>>, ann: &Annotation) -> XmlResult {
    let mut e = BytesStart::new("Annotation");
    e.push_attribute(("id", ann.id()));
    writer.write_event(Event::Start(e))?;
    write_metadata(writer, ann.meta())?;

    writer.write_event(Event::Start(BytesStart::new("Location")))?;
    for (localization, score) in ann.location().iter() {
        write_localization(writer, localization, score)?;
    }
    writer.write_event(Event::End(BytesStart::new("Location").to_end()))?;

    for label in ann.labels() {
        let mut e = BytesStart::new("Label");
        if let Some(key) = label.key() {
            e.push_attribute(("key", key));
        }
        writer.write_event(Event::Start(e))?;
        for (tag, score) in label.iter() {
            let mut t = BytesStart::new("Tag");
            t.push_attribute(("type", tag.type_name()));
            if let Some(s) = score {
                t.push_attribute(("score", s.to_string().as_str()));
            }
            writer.write_event(Event::Start(t))?;
            writer.write_event(Event::Text(BytesText::new(&tag.content())))?;
            writer.write_event(Event::End(BytesStart::new("Tag").to_end()))?;
        }
        writer.write_event(Event::End(BytesStart::new("Label").to_end()))?;
    }

    writer.write_event(Event::End(BytesStart::new("Annotation").to_end()))?;
    Ok(())
}

fn write_localization(
    writer: &mut Writer<&mut Vec<u8>>,
    localization: &Localization,
    score: Option<f64>,
) -> XmlResult {
    match localization {
        Localization::Point(p) => {
            let mut e = point_element("Point", *p);
            if let Some(s) = score {
                e.push_attribute(("score", s.to_string().as_str()));
            }
            writer.write_event(Event::Empty(e))?;
        }
        Localization::Interval(i) => {
            let mut e = BytesStart::new("Interval");
            if let Some(s) = score {
                e.push_attribute(("score", s.to_string().as_str()));
            }
            writer.write_event(Event::Start(e))?;
            write_interval_bounds(writer, i)?;
            writer.write_event(Event::End(BytesStart::new("Interval").to_end()))?;
        }
        Localization::Disjoint(d) => {
            let mut e = BytesStart::new("Disjoint");
            if let Some(s) = score {
                e.push_attribute(("score", s.to_string().as_str()));
            }
            writer.write_event(Event::Start(e))?;
            for interval in d.intervals() {
                writer.write_event(Event::Start(BytesStart::new("Interval")))?;
                write_interval_bounds(writer, interval)?;
                writer.write_event(Event::End(BytesStart::new("Interval").to_end()))?;
            }
            writer.write_event(Event::End(BytesStart::new("Disjoint").to_end()))?;
        }
    }
    Ok(())
}

fn write_interval_bounds(writer: &mut Writer<&mut Vec<u8>>, interval: &TimeInterval) -> XmlResult {
    writer.write_event(Event::Empty(point_element("Begin", interval.begin())))?;
    writer.write_event(Event::Empty(point_element("End", interval.end())))?;
    Ok(())
}

fn point_element(name: &str, point: TimePoint) -> BytesStart<'static> {
    let mut e = BytesStart::new(name.to_owned());
    e.push_attribute(("midpoint", point.midpoint().to_string().as_str()));
    if let Some(r) = point.radius() {
        e.push_attribute(("radius", r.to_string().as_str()));
    }
    e
}

// ─────────────────────────────────────────────────────────────────────────────
// Reader
// ─────────────────────────────────────────────────────────────────────────────

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
    content: &'a str,
    path: &'a Path,
}

impl<'a> Parser<'a> {
    fn new(content: &'a str, path: &'a Path) -> Self {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            content,
            path,
        }
    }

    fn next(&mut self) -> Result<Event<'a>> {
        let position = self.reader.buffer_position();
        self.reader.read_event().map_err(|e| self.err_at(position, &e.to_string()))
    }

    fn err(&self, detail: &str) -> FormatError {
        self.err_at(self.reader.buffer_position(), detail)
    }

    fn err_at(&self, position: u64, detail: &str) -> FormatError {
        let offset = (position as usize).min(self.content.len());
        let line = self.content[..offset].matches('\n').count() + 1;
        FormatError::Parse {
            path: self.path.to_path_buf(),
            line,
            detail: detail.to_owned(),
        }
    }

    fn attr(&self, e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
        match e.try_get_attribute(name) {
            Ok(Some(a)) => {
                let value = a
                    .unescape_value()
                    .map_err(|err| self.err(&err.to_string()))?;
                Ok(Some(value.into_owned()))
            }
            Ok(None) => Ok(None),
            Err(err) => Err(self.err(&err.to_string())),
        }
    }

    fn req_attr(&self, e: &BytesStart<'_>, name: &str) -> Result<String> {
        self.attr(e, name)?.ok_or_else(|| {
            let element = String::from_utf8_lossy(e.name().as_ref()).into_owned();
            self.err(&format!("<{element}> is missing the '{name}' attribute"))
        })
    }

    fn f64_attr(&self, e: &BytesStart<'_>, name: &str) -> Result<Option<f64>> {
        match self.attr(e, name)? {
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.err(&format!("'{raw}' is not a valid '{name}' number"))),
            None => Ok(None),
        }
    }

    fn point_from(&self, e: &BytesStart<'_>) -> Result<TimePoint> {
        let midpoint = self
            .f64_attr(e, "midpoint")?
            .ok_or_else(|| self.err("missing 'midpoint' attribute"))?;
        match self.f64_attr(e, "radius")? {
            Some(r) => Ok(TimePoint::with_radius(midpoint, r)?),
            None => Ok(TimePoint::new(midpoint)),
        }
    }

    /// Consume events until the named end tag, collecting the text.
    fn read_text_until(&mut self, end: &str) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Event::Text(t) => {
                    text.push_str(&t.unescape().map_err(|e| self.err(&e.to_string()))?);
                }
                Event::End(e) if e.name().as_ref() == end.as_bytes() => return Ok(text),
                Event::Eof => return Err(self.err(&format!("unexpected end of file in <{end}>"))),
                _ => {}
            }
        }
    }

    /// Skip everything until the named end tag.
    fn skip_until(&mut self, end: &str) -> Result<()> {
        loop {
            match self.next()? {
                Event::End(e) if e.name().as_ref() == end.as_bytes() => return Ok(()),
                Event::Eof => return Err(self.err(&format!("unexpected end of file in <{end}>"))),
                _ => {}
            }
        }
    }
}

fn parse_document(content: &str, path: &Path) -> Result<Transcription> {
    let mut p = Parser::new(content, path);
    let mut trs = Transcription::new();
    let mut seen_document = false;
    // (vocab name, media id) references, resolved after all elements are read
    let mut tier_vocabs: Vec<(String, String)> = Vec::new();
    let mut tier_media: Vec<(String, String)> = Vec::new();
    let mut links: Vec<(LinkType, String, String)> = Vec::new();

    loop {
        match p.next()? {
            Event::Start(e) => match e.name().as_ref() {
                b"Document" => {
                    seen_document = true;
                    if let Some(id) = p.attr(&e, "id")? {
                        trs.meta_mut().set("id", id);
                    }
                    if let Some(name) = p.attr(&e, "name")? {
                        trs = rename(trs, &name);
                    }
                }
                b"Metadata" => {
                    let mut meta = std::mem::take(trs.meta_mut());
                    read_metadata(&mut p, &mut meta)?;
                    *trs.meta_mut() = meta;
                }
                b"Vocabulary" => {
                    let vocab = read_vocabulary(&mut p, &e)?;
                    trs.add_vocab(vocab);
                }
                b"Media" => {
                    trs.add_media(read_media(&p, &e)?);
                    p.skip_until("Media")?;
                }
                b"Tier" => {
                    let (tier, vocab_name, media_id) = read_tier(&mut p, &e)?;
                    if let Some(v) = vocab_name {
                        tier_vocabs.push((tier.name().to_owned(), v));
                    }
                    if let Some(m) = media_id {
                        tier_media.push((tier.name().to_owned(), m));
                    }
                    trs.append_tier(tier)?;
                }
                b"Hierarchy" => read_hierarchy(&mut p, &mut links)?,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"Media" => trs.add_media(read_media(&p, &e)?),
                b"Link" => links.push(read_link(&p, &e)?),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_document {
        return Err(p.err("no <Document> root element"));
    }

    // resolve tier → vocabulary / media references
    for (tier_name, vocab_name) in tier_vocabs {
        let vocab = trs.vocab_by_name(&vocab_name).cloned();
        if let (Some(vocab), Some(tier)) = (vocab, trs.tier_mut(&tier_name)) {
            tier.set_ctrl_vocab(Some(vocab))?;
        }
    }
    for (tier_name, media_id) in tier_media {
        let media = trs.media_by_id(&media_id).cloned();
        if let (Some(media), Some(tier)) = (media, trs.tier_mut(&tier_name)) {
            tier.set_media(Some(media));
        }
    }

    // hierarchy links reference tier ids; register them through the
    // validating path
    for (link_type, parent_id, child_id) in links {
        let parent = tier_name_by_id(&trs, &parent_id)
            .ok_or_else(|| p.err(&format!("hierarchy link references unknown tier '{parent_id}'")))?;
        let child = tier_name_by_id(&trs, &child_id)
            .ok_or_else(|| p.err(&format!("hierarchy link references unknown tier '{child_id}'")))?;
        trs.add_hierarchy_link(link_type, &parent, &child)?;
    }

    Ok(trs)
}

/// Rebuild the transcription with a name, keeping everything else.
fn rename(trs: Transcription, name: &str) -> Transcription {
    let mut named = Transcription::with_name(name);
    *named.meta_mut() = trs.meta().clone();
    named
}

fn tier_name_by_id(trs: &Transcription, id: &str) -> Option<String> {
    trs.iter()
        .find(|t| t.id() == id)
        .map(|t| t.name().to_owned())
}

fn read_metadata(p: &mut Parser<'_>, meta: &mut Metadata) -> Result<()> {
    loop {
        match p.next()? {
            Event::Start(e) if e.name().as_ref() == b"Entry" => {
                let key = p.req_attr(&e, "key")?;
                let value = p.read_text_until("Entry")?;
                meta.set(&key, value);
            }
            Event::End(e) if e.name().as_ref() == b"Metadata" => return Ok(()),
            Event::Eof => return Err(p.err("unexpected end of file in <Metadata>")),
            _ => {}
        }
    }
}

fn read_media(p: &Parser<'_>, e: &BytesStart<'_>) -> Result<Media> {
    let id = p.req_attr(e, "id")?;
    let url = p.req_attr(e, "url")?;
    let media = match p.attr(e, "mimetype")? {
        Some(mime) => Media::with_mime(&url, &mime),
        None => Media::new(&url),
    };
    Ok(media.with_id(&id))
}

fn read_link(p: &Parser<'_>, e: &BytesStart<'_>) -> Result<(LinkType, String, String)> {
    let raw = p.req_attr(e, "type")?;
    let link_type: LinkType = raw
        .parse()
        .map_err(|_| p.err(&format!("'{raw}' is not a hierarchy link type")))?;
    Ok((link_type, p.req_attr(e, "parent")?, p.req_attr(e, "child")?))
}

fn read_hierarchy(p: &mut Parser<'_>, links: &mut Vec<(LinkType, String, String)>) -> Result<()> {
    loop {
        match p.next()? {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Link" => {
                links.push(read_link(p, &e)?);
            }
            Event::End(e) if e.name().as_ref() == b"Hierarchy" => return Ok(()),
            Event::Eof => return Err(p.err("unexpected end of file in <Hierarchy>")),
            _ => {}
        }
    }
}

fn read_vocabulary(p: &mut Parser<'_>, start: &BytesStart<'_>) -> Result<CtrlVocab> {
    let id = p.attr(start, "id")?;
    let name = p.req_attr(start, "name")?;
    let mut vocab = CtrlVocab::new(&name);
    if let Some(id) = id {
        vocab.meta_mut().set("id", id);
    }
    if let Some(description) = p.attr(start, "description")? {
        vocab.set_description(&description);
    }
    loop {
        match p.next()? {
            Event::Start(e) if e.name().as_ref() == b"Entry" => {
                let type_name = p.attr(&e, "type")?.unwrap_or_else(|| "str".to_owned());
                let description = p.attr(&e, "description")?.unwrap_or_default();
                let content = p.read_text_until("Entry")?;
                let tag = Tag::from_typed_str(&content, &type_name)?;
                let _ = vocab.add_with_description(tag, &description)?;
            }
            Event::End(e) if e.name().as_ref() == b"Vocabulary" => return Ok(vocab),
            Event::Eof => return Err(p.err("unexpected end of file in <Vocabulary>")),
            _ => {}
        }
    }
}

fn read_tier(
    p: &mut Parser<'_>,
    start: &BytesStart<'_>,
) -> Result<(Tier, Option<String>, Option<String>)> {
    let name = p.req_attr(start, "name")?;
    let overlaps = p.attr(start, "overlaps")?.as_deref() == Some("true");
    let mut tier = if overlaps {
        Tier::new_with_overlaps(&name)
    } else {
        Tier::new(&name)
    };
    if let Some(id) = p.attr(start, "id")? {
        tier.meta_mut().set("id", id);
    }
    let vocab_name = p.attr(start, "vocab")?;
    let media_id = p.attr(start, "media")?;

    loop {
        match p.next()? {
            Event::Start(e) => match e.name().as_ref() {
                b"Metadata" => {
                    let mut meta = std::mem::take(tier.meta_mut());
                    read_metadata(p, &mut meta)?;
                    *tier.meta_mut() = meta;
                }
                b"Annotation" => {
                    let ann = read_annotation(p, &e)?;
                    let _ = tier.append(ann)?;
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Tier" => {
                return Ok((tier, vocab_name, media_id));
            }
            Event::Eof => return Err(p.err("unexpected end of file in <Tier>")),
            _ => {}
        }
    }
}

fn read_annotation(p: &mut Parser<'_>, start: &BytesStart<'_>) -> Result<Annotation> {
    let id = p.attr(start, "id")?;
    let mut location: Option<Location> = None;
    let mut labels: Vec<Label> = Vec::new();
    let mut meta: Option<Metadata> = None;

    loop {
        match p.next()? {
            Event::Start(e) => match e.name().as_ref() {
                b"Location" => location = Some(read_location(p)?),
                b"Label" => labels.push(read_label(p, &e)?),
                b"Metadata" => {
                    let mut m = Metadata::new();
                    read_metadata(p, &mut m)?;
                    meta = Some(m);
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Annotation" => break,
            Event::Eof => return Err(p.err("unexpected end of file in <Annotation>")),
            _ => {}
        }
    }

    let location = location.ok_or_else(|| p.err("<Annotation> has no <Location>"))?;
    let mut ann = Annotation::with_labels(location, labels);
    if let Some(m) = meta {
        ann.meta_mut().absorb(&m);
    }
    if let Some(id) = id {
        ann.meta_mut().set("id", id);
    }
    Ok(ann)
}

fn read_location(p: &mut Parser<'_>) -> Result<Location> {
    let mut alternatives: Vec<(Localization, Option<f64>)> = Vec::new();
    loop {
        match p.next()? {
            Event::Empty(e) if e.name().as_ref() == b"Point" => {
                let score = p.f64_attr(&e, "score")?;
                let point = p.point_from(&e)?;
                alternatives.push((Localization::Point(point), score));
            }
            Event::Start(e) if e.name().as_ref() == b"Interval" => {
                let score = p.f64_attr(&e, "score")?;
                let interval = read_interval_bounds(p)?;
                alternatives.push((Localization::Interval(interval), score));
            }
            Event::Start(e) if e.name().as_ref() == b"Disjoint" => {
                let score = p.f64_attr(&e, "score")?;
                let mut intervals = Vec::new();
                loop {
                    match p.next()? {
                        Event::Start(i) if i.name().as_ref() == b"Interval" => {
                            intervals.push(read_interval_bounds(p)?);
                        }
                        Event::End(end) if end.name().as_ref() == b"Disjoint" => break,
                        Event::Eof => return Err(p.err("unexpected end of file in <Disjoint>")),
                        _ => {}
                    }
                }
                alternatives.push((Localization::Disjoint(TimeDisjoint::new(intervals)?), score));
            }
            Event::End(e) if e.name().as_ref() == b"Location" => break,
            Event::Eof => return Err(p.err("unexpected end of file in <Location>")),
            _ => {}
        }
    }

    let mut iter = alternatives.into_iter();
    let (first, first_score) = iter
        .next()
        .ok_or_else(|| p.err("<Location> has no localization"))?;
    let mut location = match first_score {
        Some(s) => Location::with_score(first, s),
        None => Location::new(first),
    };
    for (localization, score) in iter {
        location.add_alternative(localization, score)?;
    }
    Ok(location)
}

/// Read `<Begin .../><End .../>` then the `</Interval>` end tag.
fn read_interval_bounds(p: &mut Parser<'_>) -> Result<TimeInterval> {
    let mut begin: Option<TimePoint> = None;
    let mut end: Option<TimePoint> = None;
    loop {
        match p.next()? {
            Event::Empty(e) if e.name().as_ref() == b"Begin" => begin = Some(p.point_from(&e)?),
            Event::Empty(e) if e.name().as_ref() == b"End" => end = Some(p.point_from(&e)?),
            Event::End(e) if e.name().as_ref() == b"Interval" => break,
            Event::Eof => return Err(p.err("unexpected end of file in <Interval>")),
            _ => {}
        }
    }
    let begin = begin.ok_or_else(|| p.err("<Interval> has no <Begin>"))?;
    let end = end.ok_or_else(|| p.err("<Interval> has no <End>"))?;
    Ok(TimeInterval::new(begin, end)?)
}

fn read_label(p: &mut Parser<'_>, start: &BytesStart<'_>) -> Result<Label> {
    let key = p.attr(start, "key")?;
    let mut tags: Vec<(Tag, Option<f64>)> = Vec::new();
    loop {
        match p.next()? {
            Event::Start(e) if e.name().as_ref() == b"Tag" => {
                let type_name = p.attr(&e, "type")?.unwrap_or_else(|| "str".to_owned());
                let score = p.f64_attr(&e, "score")?;
                let content = p.read_text_until("Tag")?;
                tags.push((Tag::from_typed_str(&content, &type_name)?, score));
            }
            Event::End(e) if e.name().as_ref() == b"Label" => break,
            Event::Eof => return Err(p.err("unexpected end of file in <Label>")),
            _ => {}
        }
    }

    let mut iter = tags.into_iter();
    let (first, first_score) = iter.next().ok_or_else(|| p.err("<Label> has no <Tag>"))?;
    let mut label = match first_score {
        Some(s) => Label::with_score(first, s),
        None => Label::new(first),
    };
    for (tag, score) in iter {
        label.append(tag, score)?;
    }
    if let Some(key) = key {
        label.set_key(Some(&key));
    }
    Ok(label)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
